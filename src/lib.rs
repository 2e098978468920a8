//! scene-walker - dependency inventory and repackaging for USD scenes
//!
//! This library follows the sublayers, references and payloads reachable
//! from a root scene document, collects the textures its materials use,
//! and copies the whole asset into a self-contained folder tree.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod output;
pub mod parsers;
pub mod scene;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{compute_relative_destination, GraphWalker, RepackageOptions, Repackager, WalkOptions};
pub use error::{try_with_recovery, ErrorSeverity, Result, ResultExt, WalkerError};
pub use models::{
    analysis::{AnalysisReport, ReferenceEntry, ReferenceKind, TextureEntry, WalkIssue},
    config::Settings,
    package::{CopyReport, RepackageRequest},
};
pub use scene::{NullSceneProvider, SceneGraphProvider, SceneStage, StaticSceneProvider, StaticStage};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
