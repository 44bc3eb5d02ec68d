//! # Dispatcher
//!
//! Sole entry point for tool calls. The dispatcher looks a tool up, runs its
//! handler on a dedicated task under a deadline, and folds every outcome,
//! including panics, into a [`ToolResult`]. It is the availability boundary
//! of the service: `dispatch` never panics and never returns an error.

use crate::registry::ToolRegistry;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use switchboard_core::{Arguments, CallContext, HandlerError, ToolResult, describe, race};
use tokio::task::JoinError;
use tracing::{Instrument, debug, info_span, warn};

/// How a single call ended, before it is rendered into a [`ToolResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success(ToolResult),
    UnknownTool(String),
    DeadlineExceeded(u64),
    Cancelled,
    InternalError(String),
}

impl DispatchOutcome {
    /// Render this outcome as the envelope returned for tool `name`.
    pub fn into_tool_result(self, name: &str) -> ToolResult {
        match self {
            DispatchOutcome::Success(result) => result,
            DispatchOutcome::UnknownTool(unknown) => {
                ToolResult::error(format!("UNKNOWN_TOOL: '{unknown}' is not a registered tool"))
            }
            DispatchOutcome::DeadlineExceeded(seconds) => ToolResult::error(format!(
                "TIMEOUT: Tool '{name}' timed out after {seconds} seconds"
            )),
            DispatchOutcome::Cancelled => {
                ToolResult::error(format!("CANCELLED: Tool '{name}' was cancelled"))
            }
            DispatchOutcome::InternalError(message) => {
                ToolResult::error(format!("INTERNAL_ERROR: Tool '{name}' failed: {message}"))
            }
        }
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Success(result) if result.is_error() => "tool_error",
            DispatchOutcome::Success(_) => "success",
            DispatchOutcome::UnknownTool(_) => "unknown_tool",
            DispatchOutcome::DeadlineExceeded(_) => "timeout",
            DispatchOutcome::Cancelled => "cancelled",
            DispatchOutcome::InternalError(_) => "internal_error",
        }
    }

    fn from_handler(result: Result<ToolResult, HandlerError>) -> Self {
        match result {
            Ok(result) => DispatchOutcome::Success(result),
            Err(HandlerError::DeadlineExceeded(exceeded)) => {
                DispatchOutcome::DeadlineExceeded(exceeded.seconds)
            }
            Err(HandlerError::Cancelled) => DispatchOutcome::Cancelled,
            Err(other) => DispatchOutcome::InternalError(describe(&other)),
        }
    }
}

/// Routes tool calls to registered handlers under a deadline.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    default_deadline: Duration,
}

impl Dispatcher {
    /// Deadline applied when the caller does not pick one.
    pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            default_deadline: Self::DEFAULT_DEADLINE,
        }
    }

    #[must_use]
    pub fn with_default_deadline(mut self, deadline: Duration) -> Self {
        self.default_deadline = deadline;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn default_deadline(&self) -> Duration {
        self.default_deadline
    }

    /// Dispatch `name` with the default deadline.
    pub async fn dispatch(&self, name: &str, args: Arguments) -> ToolResult {
        self.dispatch_with_deadline(name, args, self.default_deadline)
            .await
    }

    /// Dispatch `name`, answering no later than `deadline`.
    pub async fn dispatch_with_deadline(
        &self,
        name: &str,
        args: Arguments,
        deadline: Duration,
    ) -> ToolResult {
        self.execute(name, args, deadline)
            .await
            .into_tool_result(name)
    }

    /// Run a call and report how it ended without rendering it.
    pub async fn execute(&self, name: &str, args: Arguments, deadline: Duration) -> DispatchOutcome {
        let Some(entry) = self.registry.lookup(name) else {
            warn!(tool = %name, "Dispatch to unknown tool");
            return DispatchOutcome::UnknownTool(name.to_string());
        };

        let ctx = CallContext::new(name);
        let cancel = ctx.cancellation().clone();
        let span = info_span!(
            "dispatch",
            tool = %name,
            call_id = %ctx.call_id(),
            deadline_ms = deadline.as_millis() as u64,
        );

        async move {
            let started = Instant::now();
            let handler = entry.handler();
            // Own task: a panicking handler only poisons its JoinHandle, and a
            // timed-out handler is detached instead of blocking the caller.
            let task = tokio::spawn(async move { handler.call(args, ctx).await });
            let joined = async move { task.await.unwrap_or_else(|err| Err(join_failure(err))) };

            let outcome = DispatchOutcome::from_handler(race(deadline, &cancel, joined).await);
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &outcome {
                DispatchOutcome::Success(_) => {
                    debug!(elapsed_ms, outcome = outcome.label(), "Tool call completed");
                }
                DispatchOutcome::InternalError(message) => {
                    warn!(elapsed_ms, error = %message, "Tool call failed");
                }
                _ => warn!(elapsed_ms, outcome = outcome.label(), "Tool call did not complete"),
            }
            outcome
        }
        .instrument(span)
        .await
    }
}

fn join_failure(err: JoinError) -> HandlerError {
    if err.is_cancelled() {
        return HandlerError::Cancelled;
    }
    match err.try_into_panic() {
        Ok(payload) => HandlerError::internal(format!(
            "handler panicked: {}",
            panic_message(payload.as_ref())
        )),
        Err(err) => HandlerError::internal(err.to_string()),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
