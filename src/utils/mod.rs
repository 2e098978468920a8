//! Path handling utilities

pub mod canonical;
pub mod path_resolver;
pub mod tiles;

pub use canonical::{canonical_path, canonical_string, comparison_key, is_absolute_token};
pub use path_resolver::{clean_token, PathResolver, DEFAULT_STAGING_ALIASES};
pub use tiles::{is_tiled, TilePlaceholder, TileSetEnumerator};
