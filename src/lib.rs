//! # Switchboard Workspace
//!
//! Workspace-level package. It re-exports the [`switchboard`] meta crate so
//! the cross-crate scenarios under `tests/` exercise the same surface an
//! embedder sees.

pub use switchboard::*;
