//! Core functionality: dependency traversal, normalization and repackaging

pub mod normalizer;
pub mod parallel;
pub mod repackager;
pub mod walker;

pub use normalizer::ResultNormalizer;
pub use repackager::{compute_relative_destination, DestinationContext, RepackageOptions, Repackager};
pub use walker::{GraphWalker, WalkOptions};
