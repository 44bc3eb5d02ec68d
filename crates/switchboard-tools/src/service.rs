//! Adapters exposing domain collaborators as tool handlers.
//!
//! Domain services (calendar, reminders, notes, ...) are external
//! collaborators. They implement [`DomainService`] and know nothing about the
//! dispatcher; [`ServiceHandler`] binds one service operation to a tool name
//! and turns collaborator errors into `Error:` results at the handler
//! boundary so they never reach the dispatcher as failures.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use switchboard_core::{
    Arguments, CallContext, DomainError, HandlerError, SharedHandler, ToolHandler, ToolResult,
    domain_error_result,
};
use tracing::debug;

/// Interface implemented by every domain collaborator.
#[async_trait]
pub trait DomainService: Send + Sync {
    /// Short domain label, e.g. `calendar`.
    fn domain(&self) -> &str;

    /// Run `operation` with `args`, returning a JSON payload.
    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Value, DomainError>;
}

/// Binds a single [`DomainService`] operation to a tool.
#[derive(Clone)]
pub struct ServiceHandler {
    service: Arc<dyn DomainService>,
    operation: String,
}

impl ServiceHandler {
    pub fn new(service: Arc<dyn DomainService>, operation: impl Into<String>) -> Self {
        Self {
            service,
            operation: operation.into(),
        }
    }

    pub fn shared(service: Arc<dyn DomainService>, operation: impl Into<String>) -> SharedHandler {
        Arc::new(Self::new(service, operation))
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

#[async_trait]
impl ToolHandler for ServiceHandler {
    async fn call(&self, args: Arguments, ctx: CallContext) -> Result<ToolResult, HandlerError> {
        ctx.check_cancelled()?;
        match self.service.invoke(&self.operation, &args).await {
            Ok(payload) => Ok(ToolResult::json(&payload)),
            Err(err) => {
                debug!(
                    tool = %ctx.tool(),
                    domain = %self.service.domain(),
                    kind = err.kind(),
                    "Domain operation failed"
                );
                Ok(domain_error_result(&err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FakeCalendar;

    #[async_trait]
    impl DomainService for FakeCalendar {
        fn domain(&self) -> &str {
            "calendar"
        }

        async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Value, DomainError> {
            match operation {
                "list" => Ok(json!({"events": [], "cursor": args.get("cursor")})),
                "delete" => Err(DomainError::not_found("Event 'e1' not found")),
                _ => Err(DomainError::validation(format!("Unknown operation '{operation}'"))),
            }
        }
    }

    #[tokio::test]
    async fn success_renders_sorted_json() {
        let handler = ServiceHandler::new(Arc::new(FakeCalendar), "list");
        let result = handler
            .call(Arguments::new(), CallContext::new("calendar_list"))
            .await
            .unwrap();

        assert!(!result.is_error());
        let text = result.text_content();
        assert!(text.find("\"cursor\"").unwrap() < text.find("\"events\"").unwrap());
    }

    #[tokio::test]
    async fn domain_errors_stay_at_handler_boundary() {
        let handler = ServiceHandler::new(Arc::new(FakeCalendar), "delete");
        let result = handler
            .call(Arguments::new(), CallContext::new("calendar_delete"))
            .await
            .unwrap();

        assert!(result.is_error());
        assert_eq!(result.text_content(), "Error: Event 'e1' not found");
    }

    #[tokio::test]
    async fn cancelled_context_short_circuits() {
        let handler = ServiceHandler::new(Arc::new(FakeCalendar), "list");
        let ctx = CallContext::new("calendar_list");
        ctx.cancellation().cancel();

        let result = handler.call(Arguments::new(), ctx).await;
        assert!(matches!(result, Err(HandlerError::Cancelled)));
    }
}
