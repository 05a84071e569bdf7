//! Black-box entry point: one `fabric-coordinator` process per test,
//! driven purely through its REST surface.

#[path = "specs/support.rs"]
mod support;

#[path = "specs/hello_world.rs"]
mod hello_world;

#[path = "specs/script_exit_code.rs"]
mod script_exit_code;

#[path = "specs/script_timeout.rs"]
mod script_timeout;

#[path = "specs/cli_allowlist.rs"]
mod cli_allowlist;

#[path = "specs/concurrent_sessions.rs"]
mod concurrent_sessions;

#[path = "specs/worker_liveness.rs"]
mod worker_liveness;
