//! Tool handler trait.

use crate::context::CallContext;
use crate::error::HandlerError;
use crate::result::{Arguments, ToolResult};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// The callable bound to a tool name.
///
/// Handlers receive owned arguments and a [`CallContext`]. They run on their
/// own task, so a handler that ignores cancellation can outlive the deadline
/// that was set for it.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, args: Arguments, ctx: CallContext) -> Result<ToolResult, HandlerError>;
}

/// Shared, type-erased handler as stored in the registry.
pub type SharedHandler = Arc<dyn ToolHandler>;

/// Adapter turning an async closure into a [`ToolHandler`].
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ToolHandler for FnHandler<F>
where
    F: Fn(Arguments, CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolResult, HandlerError>> + Send + 'static,
{
    async fn call(&self, args: Arguments, ctx: CallContext) -> Result<ToolResult, HandlerError> {
        (self.f)(args, ctx).await
    }
}

/// Build a shared handler from an async closure.
///
/// ```rust
/// use switchboard_core::{ToolResult, handler_fn};
///
/// let echo = handler_fn(|args, _ctx| async move {
///     Ok(ToolResult::json(&serde_json::Value::Object(args)))
/// });
/// # let _ = echo;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> SharedHandler
where
    F: Fn(Arguments, CallContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<ToolResult, HandlerError>> + Send + 'static,
{
    Arc::new(FnHandler::new(f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn closure_handler_receives_arguments() {
        let handler = handler_fn(|args, ctx| async move {
            Ok(ToolResult::text(format!(
                "{} got {}",
                ctx.tool(),
                args.get("x").cloned().unwrap_or_default()
            )))
        });

        let mut args = Arguments::new();
        args.insert("x".into(), json!(1));
        let result = handler.call(args, CallContext::new("echo")).await.unwrap();
        assert_eq!(result.text_content(), "echo got 1");
    }
}
