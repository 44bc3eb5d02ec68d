//! MCP error types
//!
//! Dispatch never fails: every tool outcome, including unknown tools and
//! timeouts, travels back as a result envelope. What remains here are the
//! failures of the server itself: transport setup and tool publication.

use thiserror::Error;

/// MCP operation result type
pub type McpResult<T> = Result<T, McpError>;

/// Errors that can occur while running the MCP surface
#[derive(Debug, Error)]
pub enum McpError {
    /// A registry entry could not be published as an MCP tool
    #[error("Invalid tool definition for '{tool}': {reason}")]
    InvalidToolDefinition { tool: String, reason: String },

    /// The transport could not be established
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The MCP session ended abnormally
    #[error("Server error: {0}")]
    ServerError(String),
}

impl McpError {
    pub fn invalid_tool(tool: impl Into<String>, reason: impl Into<String>) -> Self {
        McpError::InvalidToolDefinition {
            tool: tool.into(),
            reason: reason.into(),
        }
    }
}
