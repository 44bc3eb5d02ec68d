//! Per-call context handed to every tool handler.

use crate::error::HandlerError;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Context for a single tool invocation.
///
/// Carries the tool name, a call identifier for log correlation and the
/// cancellation token the deadline racer signals when the call runs out of
/// time. Cancellation is cooperative: handlers that never look at the token
/// keep running until they finish on their own.
#[derive(Debug, Clone)]
pub struct CallContext {
    tool: String,
    call_id: Uuid,
    cancel: CancellationToken,
}

impl CallContext {
    /// Create a context with a fresh call id and cancellation token.
    pub fn new(tool: impl Into<String>) -> Self {
        Self::with_cancellation(tool, CancellationToken::new())
    }

    /// Create a context bound to an existing cancellation token.
    pub fn with_cancellation(tool: impl Into<String>, cancel: CancellationToken) -> Self {
        Self {
            tool: tool.into(),
            call_id: Uuid::new_v4(),
            cancel,
        }
    }

    /// Name of the tool being invoked.
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// Unique identifier of this invocation.
    pub fn call_id(&self) -> Uuid {
        self.call_id
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Resolve once the call has been cancelled.
    pub async fn cancelled(&self) {
        self.cancel.cancelled().await;
    }

    /// Bail out with [`HandlerError::Cancelled`] if cancellation was signalled.
    pub fn check_cancelled(&self) -> Result<(), HandlerError> {
        if self.is_cancelled() {
            Err(HandlerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_cancelled_reports_signal() {
        let ctx = CallContext::new("calendar_list");
        assert!(ctx.check_cancelled().is_ok());

        ctx.cancellation().cancel();
        assert!(matches!(ctx.check_cancelled(), Err(HandlerError::Cancelled)));
    }

    #[test]
    fn clones_share_cancellation() {
        let ctx = CallContext::new("notes_get");
        let clone = ctx.clone();
        ctx.cancellation().cancel();
        assert!(clone.is_cancelled());
        assert_eq!(clone.call_id(), ctx.call_id());
    }
}
