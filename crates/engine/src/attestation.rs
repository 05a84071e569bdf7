//! Notebook-cell attestation: a digest over (job-id, code, container-id,
//! start-time) emitted as the cell's first log line.

use sha2::{Digest, Sha256};

pub fn compute_digest(job_id: &str, code: &str, container_id: &str, start_time_ms: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(job_id.as_bytes());
    hasher.update(b"\0");
    hasher.update(code.as_bytes());
    hasher.update(b"\0");
    hasher.update(container_id.as_bytes());
    hasher.update(b"\0");
    hasher.update(start_time_ms.to_be_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "attestation_tests.rs"]
mod tests;
