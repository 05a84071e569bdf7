//! Artifact filename validation.
//!
//! Artifact names must be a single path component: no separators, no `.`
//! or `..`, not empty. This is the only gate standing between a job's
//! declared output names and the filesystem path the engine writes to —
//! get it wrong and a job can escape its own output directory.

use crate::error::FabricError;

/// Validate an artifact filename as a single, safe path component.
///
/// Rejects empty names, names containing `/` or `\`, and the special
/// components `.` and `..`.
pub fn validate_artifact_name(name: &str) -> Result<(), FabricError> {
    if name.is_empty() {
        return Err(FabricError::validation("artifact filename must not be empty"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(FabricError::validation("artifact filename must not contain a path separator"));
    }
    if name == "." || name == ".." {
        return Err(FabricError::validation("artifact filename must not be '.' or '..'"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
