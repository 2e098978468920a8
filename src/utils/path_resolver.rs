//! Asset path resolution utilities
//!
//! Turns raw path tokens found in scene documents into best-effort absolute
//! paths. Relative tokens are joined onto a base directory; when that does
//! not exist on disk, texture staging directories next to the base are
//! searched for a file with the same name.

use crate::utils::canonical::{canonical_path, is_absolute_token};
use crate::utils::tiles::TilePlaceholder;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Staging directory names searched when a relative token does not resolve
pub const DEFAULT_STAGING_ALIASES: [&str; 2] = ["txt", "publish"];

const SEARCH_CACHE_CAPACITY: usize = 256;

/// Strip surrounding whitespace and quotes from a raw token
pub fn clean_token(token: &str) -> &str {
    token.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Path resolver with a memoized staging-directory search
pub struct PathResolver {
    working_dir: PathBuf,
    staging_aliases: Vec<String>,
    search_cache: LruCache<(PathBuf, String), Option<PathBuf>>,
}

impl Default for PathResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathResolver {
    /// Create a resolver anchored at the process working directory
    pub fn new() -> Self {
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::with_working_dir(working_dir)
    }

    /// Create a resolver anchored at `working_dir` for tokens without a base
    pub fn with_working_dir(working_dir: impl Into<PathBuf>) -> Self {
        let capacity = NonZeroUsize::new(SEARCH_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            working_dir: working_dir.into(),
            staging_aliases: DEFAULT_STAGING_ALIASES.iter().map(|s| s.to_string()).collect(),
            search_cache: LruCache::new(capacity),
        }
    }

    /// Replace the staging directory names searched on a miss
    pub fn with_staging_aliases(mut self, aliases: Vec<String>) -> Self {
        self.staging_aliases = aliases;
        self
    }

    /// Forget memoized staging-search results
    pub fn clear_cache(&mut self) {
        self.search_cache.clear();
    }

    /// Resolve a raw token against `base_dir` (or the working directory).
    ///
    /// Returns `None` only for an empty token. Absolute tokens are returned
    /// as-is. A tiled token keeps its placeholder in the returned file name.
    pub fn resolve(&mut self, token: &str, base_dir: Option<&Path>) -> Option<PathBuf> {
        let token = clean_token(token);
        if token.is_empty() {
            return None;
        }
        if is_absolute_token(token) {
            return Some(PathBuf::from(token));
        }

        let token = token.replace('\\', "/");
        let placeholder = TilePlaceholder::detect(&token);
        let probe = match placeholder {
            Some(placeholder) => placeholder.substitute(&token),
            None => token.clone(),
        };

        let base = base_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.working_dir.clone());
        let joined = canonical_path(&base.join(&probe));

        if joined.exists() {
            trace!("Resolved {} -> {}", token, joined.display());
            return Some(restore_template(joined, &token, placeholder));
        }

        if let Some(found) = self.search_staging(&base, &token, &probe, placeholder) {
            debug!("Resolved {} via staging search -> {}", token, found.display());
            return Some(restore_template(found, &token, placeholder));
        }

        Some(restore_template(joined, &token, placeholder))
    }

    /// Search `<parent of base>/<alias>` trees for a file named like the token
    fn search_staging(
        &mut self,
        base: &Path,
        token: &str,
        probe: &str,
        placeholder: Option<TilePlaceholder>,
    ) -> Option<PathBuf> {
        let parent = base.parent()?;
        let probe_name = Path::new(probe).file_name()?.to_string_lossy().into_owned();
        let template_name = Path::new(token).file_name()?.to_string_lossy().into_owned();
        let tile_bounds = placeholder.and_then(|p| p.split(&template_name));

        for alias in &self.staging_aliases {
            let staging_dir = parent.join(alias);
            if !staging_dir.is_dir() {
                continue;
            }

            // Tiled and literal lookups match differently, so key on the template
            let key = (staging_dir.clone(), template_name.clone());
            if let Some(cached) = self.search_cache.get(&key) {
                if cached.is_some() {
                    return cached.clone();
                }
                continue;
            }

            let found = WalkDir::new(&staging_dir)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .find(|entry| {
                    let name = entry.file_name().to_string_lossy();
                    name == probe_name.as_str()
                        || tile_bounds.is_some_and(|(prefix, suffix)| {
                            name.starts_with(prefix) && name.ends_with(suffix)
                        })
                })
                .map(|entry| entry.into_path());

            self.search_cache.put(key, found.clone());
            if found.is_some() {
                return found;
            }
        }

        None
    }
}

/// Put the template's file name back onto a resolved tiled path
fn restore_template(resolved: PathBuf, token: &str, placeholder: Option<TilePlaceholder>) -> PathBuf {
    if placeholder.is_none() {
        return resolved;
    }
    match Path::new(token).file_name() {
        Some(template_name) => resolved.with_file_name(template_name),
        None => resolved,
    }
}
