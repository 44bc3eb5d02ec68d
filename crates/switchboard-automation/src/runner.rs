//! Script runners: the thing that actually talks to the automation host.

use async_trait::async_trait;
use std::process::Stdio;
use switchboard_core::AutomationError;
use tokio::process::Command;
use tracing::debug;

/// Executes one script against the automation target.
///
/// Runners are not expected to serialize themselves; [`crate::ScriptChannel`]
/// does that. A runner future may be dropped at any point when the channel's
/// time limit elapses.
#[async_trait]
pub trait ScriptRunner: Send + Sync {
    async fn execute(&self, script: &str) -> Result<String, AutomationError>;
}

/// Runs AppleScript through `osascript`.
///
/// The child is spawned with `kill_on_drop`, so a call abandoned by the
/// channel's timeout also terminates the process instead of leaving it
/// running against the target application.
#[derive(Debug, Clone)]
pub struct OsascriptRunner {
    program: String,
}

impl Default for OsascriptRunner {
    fn default() -> Self {
        Self {
            program: "osascript".to_string(),
        }
    }
}

impl OsascriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different interpreter binary (mainly for tests on non-macOS hosts).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl ScriptRunner for OsascriptRunner {
    async fn execute(&self, script: &str) -> Result<String, AutomationError> {
        let output = Command::new(&self.program)
            .arg("-e")
            .arg(script)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| {
                AutomationError::ExecutionFailed(format!("failed to execute {}: {err}", self.program))
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!(
            status = ?output.status.code(),
            stdout_len = stdout.len(),
            stderr_len = stderr.len(),
            "osascript finished"
        );

        if output.status.success() {
            Ok(stdout)
        } else {
            Err(classify_failure(output.status.code(), &stderr))
        }
    }
}

/// Classify a failed invocation from its exit code and stderr.
///
/// osascript reports source errors as `<start>:<end>: syntax error: ...`;
/// everything else that exits non-zero is an execution failure.
pub fn classify_failure(code: Option<i32>, stderr: &str) -> AutomationError {
    let message = if stderr.is_empty() {
        match code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    } else {
        stderr.to_string()
    };

    if stderr.contains("syntax error") {
        AutomationError::CompilationFailed(message)
    } else {
        AutomationError::ExecutionFailed(message)
    }
}

/// Escape a value for use inside an AppleScript string literal.
pub fn escape_applescript_string(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}
