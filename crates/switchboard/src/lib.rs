//! # Switchboard
//!
//! Switchboard exposes personal-data backends (calendar, reminders,
//! contacts, notes, messages, mail, maps) as uniformly named tools behind a
//! single dispatch entry point.
//!
//! ## Core Components
//!
//! - **[ToolRegistry]**: named entries pairing an input contract with a handler
//! - **[Dispatcher]**: lookup, deadline race and error normalisation; every
//!   call produces exactly one [`ToolResult`]
//! - **[ScriptChannel]**: process-wide serialization of automation scripts
//! - **[BridgeServer]**: the MCP surface over the dispatcher
//!
//! ## Quick Start
//!
//! ```rust
//! use switchboard::{Arguments, Dispatcher, standard_registry};
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let registry = standard_registry(None).unwrap();
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//!
//! let result = dispatcher.dispatch("notes_list", Arguments::new()).await;
//! assert!(result.is_error());
//! assert_eq!(
//!     result.text_content(),
//!     "Error: Tool 'notes_list' is not implemented yet"
//! );
//! # });
//! ```

pub mod bridge;
pub mod config;

pub use bridge::{standard_dispatcher, standard_registry};
pub use config::{BridgeConfig, BridgeConfigBuilder, ConfigError, LogFormat};

pub use switchboard_automation::{
    OsascriptRunner, ScriptChannel, ScriptHandler, ScriptRunner, ScriptTemplate, maps_handlers,
};
pub use switchboard_core::{
    Arguments, AutomationError, CallContext, ContentBlock, Cursor, DeadlineExceeded,
    DeadlineRacer, DomainError, HandlerError, SharedHandler, ToolHandler, ToolName, ToolResult,
    handler_fn,
};
pub use switchboard_mcp::{BridgeServer, McpError};
pub use switchboard_tools::{
    Catalog, CatalogError, DispatchOutcome, Dispatcher, DomainService, PlaceholderHandler, RegistryEntry,
    ServiceHandler, ToolRegistry,
};

/// Test doubles, available with the `testing` feature.
#[cfg(feature = "testing")]
pub mod testing {
    pub use switchboard_testing::*;
}
