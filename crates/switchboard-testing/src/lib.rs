//! # Switchboard Testing
//!
//! Test doubles for the Switchboard crates.
//!
//! - **Mock handlers**: canned, echoing, sleeping, failing and panicking tool
//!   handlers for driving the dispatcher through every outcome.
//! - **Mock runners**: a [`RecordingRunner`] that replaces the automation
//!   host and records execution windows for overlap checks.
//!
//! ```rust
//! use switchboard_testing::{EchoHandler, RecordingRunner};
//! use switchboard_automation::ScriptChannel;
//!
//! let echo = EchoHandler::shared();
//! let channel = ScriptChannel::new(RecordingRunner::new().shared());
//! # let _ = (echo, channel);
//! ```

pub mod mock_handlers;
pub mod mock_runner;

pub use mock_handlers::{
    EchoHandler, FailingHandler, Failure, MockHandler, PanickingHandler, SleepingHandler,
};
pub use mock_runner::{ExecutionWindow, RecordingRunner, assert_no_overlap};
