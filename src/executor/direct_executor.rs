use crate::executor::ExecutionEngine;
use crate::types::ExecutionResult;
use log::debug;
use std::io;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::timeout;

pub struct DirectExecutor;

impl DirectExecutor {
    /// Hands the code to the interpreter on its command line, no filesystem
    /// contact. `Err` means the mechanism itself could not run (interpreter
    /// missing, argv over the kernel limit) and the caller should fall back;
    /// user-code failures and timeouts come back as `Ok` results.
    pub async fn execute(engine: &ExecutionEngine, code: &str) -> io::Result<ExecutionResult> {
        let mut command = Command::new(&engine.interpreter);
        command
            .arg("-c")
            .arg(code)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        match timeout(engine.timeout, command.output()).await {
            Ok(Ok(output)) => Ok(ExecutionResult::from_output(&output)),
            Ok(Err(e)) => Err(e),
            Err(_) => {
                // kill_on_drop reaps the child when the elapsed future is
                // dropped. The code did run, so this is not a fallback case.
                debug!("Direct execution exceeded {:?}", engine.timeout);
                Ok(ExecutionResult::timed_out(engine.timeout.as_secs()))
            }
        }
    }
}
