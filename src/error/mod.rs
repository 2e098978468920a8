//! Error handling for scene-walker
//!
//! This module provides the error types, result alias and error context
//! utilities used across the analyzer, the repackager and the CLI.

pub mod context;
pub mod types;

pub use context::{ResultExt, try_with_recovery};
pub use types::{ErrorSeverity, Result, WalkerError};
