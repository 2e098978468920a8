//! Data models and structures for scene-walker

pub mod analysis;
pub mod config;
pub mod dependency_graph;
pub mod package;

pub use analysis::{
    AnalysisReport, IssueKind, ReferenceEntry, ReferenceKind, ReportDocument, TextureEntry, WalkIssue,
};
pub use config::{OutputFormat, PartialSettings, Settings};
pub use dependency_graph::DependencyGraph;
pub use package::{CopiedFile, CopyCategory, CopyReport, RepackageRequest, SkippedFile};
