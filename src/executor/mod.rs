mod direct_executor;
mod subprocess_executor;

pub use direct_executor::DirectExecutor;
pub use subprocess_executor::SubprocessExecutor;

use crate::types::ExecutionResult;
use log::warn;
use std::path::PathBuf;
use std::time::Duration;

pub const EXECUTION_TIMEOUT_SECS: u64 = 30;

/// Runs submitted code with the system interpreter and folds every failure
/// into an [`ExecutionResult`]; `execute` never errors at the call site.
#[derive(Clone, Debug)]
pub struct ExecutionEngine {
    interpreter: String,
    scratch_dir: PathBuf,
    timeout: Duration,
}

impl ExecutionEngine {
    pub fn new() -> Self {
        Self::with_config("python3", "/tmp", Duration::from_secs(EXECUTION_TIMEOUT_SECS))
    }

    pub fn with_config(
        interpreter: impl Into<String>,
        scratch_dir: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        ExecutionEngine {
            interpreter: interpreter.into(),
            scratch_dir: scratch_dir.into(),
            timeout,
        }
    }

    pub async fn execute(&self, code: &str) -> ExecutionResult {
        // Direct execution first. The subprocess path is reserved for failures
        // of the mechanism itself (spawn error, oversized argv), never for
        // failures of the submitted code.
        match DirectExecutor::execute(self, code).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Direct execution failed: {}", e);
                SubprocessExecutor::execute(self, code).await
            }
        }
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}
