//! # Switchboard Automation
//!
//! Serialized access to the scriptable automation host. Every script goes
//! through a [`ScriptChannel`], which admits one call at a time, bounds its
//! running time and classifies failures into
//! [`AutomationError`](switchboard_core::AutomationError).
//!
//! ```no_run
//! use switchboard_automation::ScriptChannel;
//!
//! # async fn demo() -> Result<(), switchboard_core::AutomationError> {
//! let output = ScriptChannel::global()
//!     .run(r#"tell application "Maps" to activate"#)
//!     .await?;
//! println!("{output}");
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod handler;
pub mod maps;
pub mod runner;

pub use channel::{DEFAULT_SCRIPT_TIMEOUT, ScriptChannel};
pub use handler::{ScriptHandler, ScriptTemplate};
pub use maps::{direction_flag, maps_handlers, maps_templates};
pub use runner::{OsascriptRunner, ScriptRunner, classify_failure, escape_applescript_string};
