use serde::{
    Deserialize,
    Serialize,
};
use std::process::Output;

#[derive(Deserialize, Debug)]
pub struct ExecutionRequest {
    pub code: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

impl ExecutionResult {
    /// Builds a result from a finished child process. A nonzero exit code is a
    /// user-code failure, not an engine error; `success` tracks the exit code.
    pub fn from_output(output: &Output) -> Self {
        let exit_code = output.status.code().unwrap_or(1);
        ExecutionResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code,
            success: exit_code == 0,
        }
    }

    pub fn failure(message: String) -> Self {
        ExecutionResult {
            stdout: String::new(),
            stderr: message,
            exit_code: 1,
            success: false,
        }
    }

    pub fn timed_out(timeout_secs: u64) -> Self {
        Self::failure(format!(
            "Code execution timed out ({} seconds)",
            timeout_secs
        ))
    }
}

#[derive(Serialize, Debug)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
}

impl HealthStatus {
    pub fn healthy() -> Self {
        HealthStatus {
            status: "healthy",
            message: "VM API server is running",
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ShutdownAck {
    pub status: &'static str,
    pub message: &'static str,
}

impl ShutdownAck {
    pub fn shutting_down() -> Self {
        ShutdownAck {
            status: "shutting_down",
            message: "VM is shutting down",
        }
    }
}
