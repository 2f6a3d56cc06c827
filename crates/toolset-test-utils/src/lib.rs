//! Shared test utilities for the toolset-manager workspace.
//!
//! This crate provides a recording [`toolset_core::ToolHost`] and a trivial named tool so
//! crate test suites can drive activation without a real host. It is a
//! dev-dependency only, never published.

pub mod host;

pub use host::{HostRejected, NamedTool, RecordedCall, RecordingHost, named};
