//! # Mock Handlers
//!
//! Tool handlers with predictable behaviour: canned answers, echoes, slow
//! calls, failures and panics. They exercise every branch of the dispatcher
//! without touching a real domain service.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use switchboard_core::{
    Arguments, CallContext, DomainError, HandlerError, SharedHandler, ToolHandler, ToolResult,
};

/// A handler that answers from a table of canned responses.
///
/// Responses are keyed by the compact JSON text of the arguments. Clones
/// share their call history, so a test can keep one copy for assertions
/// while the registry owns another.
#[derive(Debug, Clone)]
pub struct MockHandler {
    responses: HashMap<String, ToolResult>,
    default_response: Option<ToolResult>,
    call_count: Arc<AtomicUsize>,
    call_history: Arc<Mutex<Vec<Arguments>>>,
}

impl Default for MockHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHandler {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            default_response: None,
            call_count: Arc::new(AtomicUsize::new(0)),
            call_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer `args` with a text result.
    pub fn with_response(mut self, args: Value, response: impl Into<String>) -> Self {
        self.responses
            .insert(args.to_string(), ToolResult::text(response.into()));
        self
    }

    /// Answer `args` with an error result.
    pub fn with_failure(mut self, args: Value, error: impl Into<String>) -> Self {
        self.responses
            .insert(args.to_string(), ToolResult::error(error.into()));
        self
    }

    /// Answer for any arguments without a canned response.
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(ToolResult::text(response.into()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn call_history(&self) -> Vec<Arguments> {
        self.call_history.lock().unwrap().clone()
    }

    pub fn was_called_with(&self, args: &Value) -> bool {
        self.call_history
            .lock()
            .unwrap()
            .iter()
            .any(|recorded| Value::Object(recorded.clone()) == *args)
    }

    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.call_history.lock().unwrap().clear();
    }

    pub fn shared(&self) -> SharedHandler {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl ToolHandler for MockHandler {
    async fn call(&self, args: Arguments, ctx: CallContext) -> Result<ToolResult, HandlerError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.call_history.lock().unwrap().push(args.clone());

        let key = Value::Object(args).to_string();
        if let Some(response) = self.responses.get(&key) {
            Ok(response.clone())
        } else if let Some(default) = &self.default_response {
            Ok(default.clone())
        } else {
            Ok(ToolResult::text(format!("Mock response from {}", ctx.tool())))
        }
    }
}

/// Returns its arguments as a key-sorted JSON text block.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoHandler;

impl EchoHandler {
    pub fn shared() -> SharedHandler {
        Arc::new(EchoHandler)
    }
}

#[async_trait]
impl ToolHandler for EchoHandler {
    async fn call(&self, args: Arguments, _ctx: CallContext) -> Result<ToolResult, HandlerError> {
        Ok(ToolResult::json(&Value::Object(args)))
    }
}

/// Sleeps before answering.
///
/// A cooperative sleeper stops early with [`HandlerError::Cancelled`] once
/// its context is cancelled; a stubborn one ignores the signal and sleeps to
/// the end, like a handler stuck in native code.
#[derive(Debug, Clone)]
pub struct SleepingHandler {
    duration: Duration,
    cooperative: bool,
    finished: Arc<AtomicBool>,
    observed_cancel: Arc<AtomicBool>,
}

impl SleepingHandler {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            cooperative: false,
            finished: Arc::new(AtomicBool::new(false)),
            observed_cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn cooperative(mut self) -> Self {
        self.cooperative = true;
        self
    }

    /// Whether a call ran its sleep to completion.
    pub fn finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }

    /// Whether a cooperative call stopped because of cancellation.
    pub fn observed_cancel(&self) -> bool {
        self.observed_cancel.load(Ordering::SeqCst)
    }

    pub fn shared(&self) -> SharedHandler {
        Arc::new(self.clone())
    }
}

#[async_trait]
impl ToolHandler for SleepingHandler {
    async fn call(&self, _args: Arguments, ctx: CallContext) -> Result<ToolResult, HandlerError> {
        if self.cooperative {
            tokio::select! {
                _ = ctx.cancelled() => {
                    self.observed_cancel.store(true, Ordering::SeqCst);
                    return Err(HandlerError::Cancelled);
                }
                _ = tokio::time::sleep(self.duration) => {}
            }
        } else {
            tokio::time::sleep(self.duration).await;
        }
        self.finished.store(true, Ordering::SeqCst);
        Ok(ToolResult::text(format!(
            "slept {} ms",
            self.duration.as_millis()
        )))
    }
}

/// What a [`FailingHandler`] fails with.
#[derive(Debug, Clone)]
pub enum Failure {
    Domain(DomainError),
    Internal(String),
    Cancelled,
}

/// Always returns an error from `call`.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    failure: Failure,
}

impl FailingHandler {
    pub fn domain(err: DomainError) -> SharedHandler {
        Arc::new(Self {
            failure: Failure::Domain(err),
        })
    }

    pub fn internal(message: impl Into<String>) -> SharedHandler {
        Arc::new(Self {
            failure: Failure::Internal(message.into()),
        })
    }

    pub fn cancelled() -> SharedHandler {
        Arc::new(Self {
            failure: Failure::Cancelled,
        })
    }
}

#[async_trait]
impl ToolHandler for FailingHandler {
    async fn call(&self, _args: Arguments, _ctx: CallContext) -> Result<ToolResult, HandlerError> {
        Err(match &self.failure {
            Failure::Domain(err) => HandlerError::Domain(err.clone()),
            Failure::Internal(message) => HandlerError::internal(message.clone()),
            Failure::Cancelled => HandlerError::Cancelled,
        })
    }
}

/// Panics with a fixed message.
#[derive(Debug, Clone)]
pub struct PanickingHandler {
    message: String,
}

impl PanickingHandler {
    pub fn shared(message: impl Into<String>) -> SharedHandler {
        Arc::new(Self {
            message: message.into(),
        })
    }
}

#[async_trait]
impl ToolHandler for PanickingHandler {
    async fn call(&self, _args: Arguments, _ctx: CallContext) -> Result<ToolResult, HandlerError> {
        panic!("{}", self.message);
    }
}
