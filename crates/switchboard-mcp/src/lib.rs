//! # Switchboard MCP - Model Context Protocol Surface
//!
//! Exposes the Switchboard dispatcher to MCP clients over stdio. Tools are
//! listed from the registry and every call goes through the dispatcher, so
//! clients always get a bounded-time answer.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use switchboard_mcp::BridgeServer;
//! use switchboard_tools::{Catalog, Dispatcher, ToolRegistry};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(ToolRegistry::new());
//!     Catalog::load()?.register_placeholders(&registry);
//!
//!     BridgeServer::new(Arc::new(Dispatcher::new(registry)))
//!         .serve_stdio()
//!         .await?;
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod error;
pub mod server;

pub use adapter::{to_call_tool_result, to_mcp_tool};
pub use error::{McpError, McpResult};
pub use server::{BridgeServer, ServerIdentity};
