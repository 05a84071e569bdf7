//! Recording backend for engine tests, gated behind `test-support`.
//!
//! Delegates actual process launch to [`SubprocessBackend`] — tests pass
//! shell one-liners (`sh -c "echo hello"`) as the spec's argv, exercising
//! the real stdout/stderr/deadline plumbing without a container runtime.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::backend::{SandboxBackend, SandboxHandle};
use crate::error::SandboxError;
use crate::spec::SandboxSpec;
use crate::subprocess::SubprocessBackend;

#[derive(Default)]
pub struct FakeBackend {
    launched: Mutex<Vec<SandboxSpec>>,
    delegate: SubprocessBackend,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn launched_specs(&self) -> Vec<SandboxSpec> {
        self.launched.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl SandboxBackend for FakeBackend {
    async fn launch(&self, spec: &SandboxSpec) -> Result<SandboxHandle, SandboxError> {
        self.launched.lock().unwrap_or_else(|e| e.into_inner()).push(spec.clone());
        self.delegate.launch(spec).await
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
