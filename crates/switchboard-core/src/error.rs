//! # Error Types
//!
//! Two layers of failure meet at a tool handler:
//!
//! - **Collaborator errors** ([`DomainError`]) raised by the domain services a
//!   handler delegates to: validation, permission, not-found, locked-resource
//!   and external-automation failures. Each carries a user-facing message.
//! - **Handler errors** ([`HandlerError`]) are what a handler hands back to the
//!   dispatcher when it cannot produce a [`ToolResult`].
//!
//! The mapper functions at the bottom of this module turn either layer into
//! text without exposing internal types to the caller.

use crate::deadline::DeadlineExceeded;
use crate::result::ToolResult;
use thiserror::Error;

/// Failure of a call against the scriptable automation target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AutomationError {
    /// The script ran but reported an error, or could not be launched.
    #[error("Script execution failed: {0}")]
    ExecutionFailed(String),

    /// The script did not finish within the channel's time limit.
    #[error("Script timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    /// The automation host rejected the script source.
    #[error("Script compilation failed: {0}")]
    CompilationFailed(String),
}

/// Errors raised by domain collaborators (calendar, notes, mail, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Arguments were missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The platform denied access to the backing data.
    #[error("{0}")]
    Permission(String),

    /// The requested item does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The backing store is held by another process.
    #[error("{0} (the resource is locked by another process, try again shortly)")]
    ResourceLocked(String),

    /// A call through the automation channel failed.
    #[error(transparent)]
    ExternalAutomation(#[from] AutomationError),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation(message.into())
    }

    pub fn permission(message: impl Into<String>) -> Self {
        DomainError::Permission(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        DomainError::NotFound(message.into())
    }

    pub fn resource_locked(message: impl Into<String>) -> Self {
        DomainError::ResourceLocked(message.into())
    }

    /// Short machine-friendly label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            DomainError::Validation(_) => "validation",
            DomainError::Permission(_) => "permission",
            DomainError::NotFound(_) => "not_found",
            DomainError::ResourceLocked(_) => "resource_locked",
            DomainError::ExternalAutomation(_) => "external_automation",
        }
    }
}

/// Error returned by a tool handler instead of a [`ToolResult`].
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    DeadlineExceeded(#[from] DeadlineExceeded),

    #[error("operation was cancelled")]
    Cancelled,

    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl HandlerError {
    pub fn internal(message: impl Into<String>) -> Self {
        HandlerError::Internal(message.into())
    }

    /// Wrap any error type that does not belong to the known taxonomy.
    pub fn other<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HandlerError::Other(Box::new(err))
    }
}

impl From<AutomationError> for HandlerError {
    fn from(err: AutomationError) -> Self {
        HandlerError::Domain(DomainError::ExternalAutomation(err))
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::other(err)
    }
}

/// Describe a handler error in user-facing terms.
///
/// Known kinds contribute their own message; anything else falls back to its
/// `Display` text.
pub fn describe(err: &HandlerError) -> String {
    match err {
        HandlerError::Domain(domain) => domain.to_string(),
        HandlerError::DeadlineExceeded(exceeded) => {
            format!("timed out after {} seconds", exceeded.seconds)
        }
        HandlerError::Cancelled => "operation was cancelled".to_string(),
        HandlerError::Internal(message) => message.clone(),
        HandlerError::Other(source) => source.to_string(),
    }
}

/// Render a collaborator error as the `Error:`-prefixed result envelope.
pub fn domain_error_result(err: &DomainError) -> ToolResult {
    ToolResult::error(format!("Error: {err}"))
}
