//! # Serialized External-Call Channel
//!
//! Scriptable applications do not tolerate interleaved commands: two
//! "activate and navigate" scripts racing inside the same application can
//! leave it in a state neither caller asked for. [`ScriptChannel`] is the one
//! place where scripts are admitted, and it runs them strictly one at a time.
//!
//! Admission is FIFO. Tokio's mutex is fair, so callers are served in the
//! order they started waiting, and each receives only its own result.

use crate::runner::{OsascriptRunner, ScriptRunner};
use once_cell::sync::OnceCell;
use std::sync::Arc;
use std::time::{Duration, Instant};
use switchboard_core::AutomationError;
use tokio::sync::{Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Time limit applied to each script when none is configured.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(20);

static GLOBAL: OnceCell<ScriptChannel> = OnceCell::new();

/// Serialization point in front of a [`ScriptRunner`].
///
/// Cloning is cheap and every clone shares the same gate, so the exclusion
/// guarantee holds across all holders of a channel.
#[derive(Clone)]
pub struct ScriptChannel {
    runner: Arc<dyn ScriptRunner>,
    gate: Arc<Mutex<()>>,
    timeout: Duration,
}

impl ScriptChannel {
    pub fn new(runner: Arc<dyn ScriptRunner>) -> Self {
        Self {
            runner,
            gate: Arc::new(Mutex::new(())),
            timeout: DEFAULT_SCRIPT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Process-wide channel in front of `osascript`.
    ///
    /// The first caller fixes the configuration; later calls return the same
    /// channel and log a warning when they ask for a different timeout.
    pub fn global_with_timeout(timeout: Duration) -> &'static ScriptChannel {
        let channel = GLOBAL.get_or_init(|| {
            ScriptChannel::new(Arc::new(OsascriptRunner::new())).with_timeout(timeout)
        });
        if channel.timeout != timeout {
            warn!(
                requested = %humantime::format_duration(timeout),
                active = %humantime::format_duration(channel.timeout),
                "Script channel already configured; keeping the active timeout"
            );
        }
        channel
    }

    /// Process-wide channel with the default timeout.
    pub fn global() -> &'static ScriptChannel {
        Self::global_with_timeout(DEFAULT_SCRIPT_TIMEOUT)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `script`, waiting for any call already in progress to finish first.
    ///
    /// The time limit covers execution only, not time spent queued. On
    /// timeout the runner future is dropped, which for [`OsascriptRunner`]
    /// kills the child process. Failures are reported once; retrying is left
    /// to the caller.
    pub async fn run(&self, script: &str) -> Result<String, AutomationError> {
        let queued = Instant::now();
        let turn = self.gate.lock().await;
        self.execute_admitted(script, queued, turn).await
    }

    /// Like [`run`](Self::run), but gives up if `cancel` fires before the
    /// script is admitted.
    ///
    /// Returns `None` when the call was cancelled while queued; the script
    /// never reaches the runner in that case. Once admitted, the script runs
    /// to completion or to the channel's time limit.
    pub async fn run_unless_cancelled(
        &self,
        script: &str,
        cancel: &CancellationToken,
    ) -> Option<Result<String, AutomationError>> {
        let queued = Instant::now();
        let turn = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            turn = self.gate.lock() => Some(turn),
        };
        let Some(turn) = turn.filter(|_| !cancel.is_cancelled()) else {
            debug!(
                waited_ms = queued.elapsed().as_millis() as u64,
                "Automation call cancelled before admission"
            );
            return None;
        };
        Some(self.execute_admitted(script, queued, turn).await)
    }

    async fn execute_admitted(
        &self,
        script: &str,
        queued: Instant,
        _turn: MutexGuard<'_, ()>,
    ) -> Result<String, AutomationError> {
        let started = Instant::now();
        debug!(
            waited_ms = started.duration_since(queued).as_millis() as u64,
            "Automation call admitted"
        );

        let result = match tokio::time::timeout(self.timeout, self.runner.execute(script)).await {
            Ok(result) => result,
            Err(_) => Err(AutomationError::Timeout {
                seconds: self.timeout.as_secs(),
            }),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(elapsed_ms, "Automation call completed"),
            Err(err) => warn!(elapsed_ms, error = %err, "Automation call failed"),
        }
        result
    }
}

impl std::fmt::Debug for ScriptChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptChannel")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
