//! # Switchboard Tools
//!
//! The call-routing layer of Switchboard:
//!
//! - **Registry** (`registry`): named entries pairing an input contract with a
//!   handler, with in-place handler replacement for phased enablement
//! - **Dispatcher** (`dispatcher`): lookup + deadline race + error
//!   normalisation into a single result envelope
//! - **Catalog** (`catalog`): the declarative input contracts of every tool,
//!   loaded from a data table
//! - **Service adapter** (`service`): wraps domain collaborators as handlers
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use switchboard_core::{Arguments, ToolResult, handler_fn};
//! use switchboard_tools::{Dispatcher, ToolRegistry};
//!
//! # tokio_test::block_on(async {
//! let registry = Arc::new(ToolRegistry::new());
//! registry.register(
//!     "echo",
//!     serde_json::json!({"type": "object"}),
//!     handler_fn(|args, _ctx| async move { Ok(ToolResult::json(&args.into())) }),
//! );
//!
//! let dispatcher = Dispatcher::new(registry);
//! let result = dispatcher.dispatch("echo", Arguments::new()).await;
//! assert!(!result.is_error());
//! # });
//! ```

/// Declarative tool contracts loaded from the embedded catalog table.
pub mod catalog;
/// Dispatcher composing registry lookup and deadline racing.
pub mod dispatcher;
/// Concurrent tool registry.
pub mod registry;
/// Adapters exposing domain collaborators as tool handlers.
pub mod service;

pub use catalog::{Catalog, CatalogError, ToolSpec};
pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use registry::{PlaceholderHandler, RegistryEntry, ToolRegistry};
pub use service::{DomainService, ServiceHandler};
