//! # Switchboard Core
//!
//! Core traits and types shared by every Switchboard crate: the tool result
//! envelope, the handler trait, the error taxonomy with its user-facing
//! mapper, the pagination cursor convention and the deadline racer.

pub mod context;
pub mod cursor;
pub mod deadline;
pub mod error;
pub mod handler;
pub mod name;
pub mod result;

pub use context::CallContext;
pub use cursor::{Cursor, CursorError, Page, paginate};
pub use deadline::{DeadlineExceeded, DeadlineRacer, race};
pub use error::{AutomationError, DomainError, HandlerError, describe, domain_error_result};
pub use handler::{FnHandler, SharedHandler, ToolHandler, handler_fn};
pub use name::{InvalidToolName, ToolName};
pub use result::{Arguments, ContentBlock, ToolResult};
