use crate::executor::ExecutionEngine;
use crate::types::ExecutionResult;
use log::{
    debug,
    error,
};
use std::fs;
use std::io::{
    self,
    Write,
};
use std::os::unix::fs::PermissionsExt;
use std::process::Stdio;
use tempfile::{
    Builder,
    NamedTempFile,
};
use tokio::process::Command;
use tokio::time::timeout;

pub struct SubprocessExecutor;

impl SubprocessExecutor {
    /// Fallback path: writes the code to a uniquely named file in the scratch
    /// directory and runs it as a standalone program. Never fails upward;
    /// spawn errors, temp-file I/O errors and timeouts all fold into the
    /// result.
    pub async fn execute(engine: &ExecutionEngine, code: &str) -> ExecutionResult {
        let script = match Self::write_script(engine, code) {
            Ok(file) => file,
            Err(e) => {
                error!("Failed to create temp file: {}", e);
                return ExecutionResult::failure(format!(
                    "Failed to create temporary file: {}",
                    e
                ));
            }
        };
        debug!("Created temp file: {}", script.path().display());

        let mut command = Command::new(&engine.interpreter);
        command
            .arg(script.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Dropping `script` at the end of this function unlinks the temp file
        // on the success, spawn-error and timeout paths alike.
        match timeout(engine.timeout, command.output()).await {
            Ok(Ok(output)) => ExecutionResult::from_output(&output),
            Ok(Err(e)) => ExecutionResult::failure(format!("Execution error: {}", e)),
            Err(_) => {
                debug!("Subprocess execution exceeded {:?}", engine.timeout);
                ExecutionResult::timed_out(engine.timeout.as_secs())
            }
        }
    }

    fn write_script(engine: &ExecutionEngine, code: &str) -> io::Result<NamedTempFile> {
        fs::create_dir_all(&engine.scratch_dir)?;
        fs::set_permissions(&engine.scratch_dir, fs::Permissions::from_mode(0o1777))?;

        let mut file = Builder::new()
            .prefix("exec-")
            .suffix(".py")
            .tempfile_in(&engine.scratch_dir)?;
        file.write_all(code.as_bytes())?;
        file.flush()?;
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o644))?;
        Ok(file)
    }
}
