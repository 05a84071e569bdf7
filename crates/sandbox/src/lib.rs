//! Ephemeral sandbox launch for the job execution engine: a container
//! runtime backend with a policy-gated direct-subprocess fallback, built
//! from programmatic argv arrays rather than shell-concatenated strings.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod backend;
mod container;
mod error;
#[cfg(feature = "test-support")]
mod fake;
mod spec;
mod subprocess;

pub use backend::{SandboxBackend, SandboxHandle};
pub use container::ContainerBackend;
pub use error::SandboxError;
#[cfg(feature = "test-support")]
pub use fake::FakeBackend;
pub use spec::{Mount, ResourceCaps, SandboxSpec};
pub use subprocess::SubprocessBackend;
