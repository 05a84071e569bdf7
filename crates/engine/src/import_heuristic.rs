//! Script-mode dependency heuristic: scans top-level `import`/`from ...
//! import` statements and records names not in a small pre-installed
//! allow-list. Diagnostics only — the sandbox has no network regardless,
//! so an unresolved import never blocks execution.

const PREINSTALLED: &[&str] = &[
    "os", "sys", "json", "math", "re", "time", "datetime", "itertools", "functools", "collections",
    "typing", "pathlib", "subprocess", "io", "random", "hashlib", "base64", "string", "enum",
];

/// Returns the set of top-level module names this code imports that are
/// not in the pre-installed allow-list, in first-seen order.
pub fn scan_unresolved_imports(code: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for line in code.lines() {
        let line = line.trim();
        let module = if let Some(rest) = line.strip_prefix("import ") {
            rest.split([',', ' ']).next()
        } else if let Some(rest) = line.strip_prefix("from ") {
            rest.split(' ').next()
        } else {
            None
        };

        let Some(module) = module else { continue };
        let top_level = module.split('.').next().unwrap_or(module);
        if top_level.is_empty() || PREINSTALLED.contains(&top_level) {
            continue;
        }
        if !seen.iter().any(|m: &String| m == top_level) {
            seen.push(top_level.to_string());
        }
    }
    seen
}

#[cfg(test)]
#[path = "import_heuristic_tests.rs"]
mod tests;
