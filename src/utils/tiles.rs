//! Tiled texture placeholders and tile-set enumeration
//!
//! A tiled texture is authored once with a placeholder (`<UDIM>`, `<udim>`
//! or a dot-delimited `####` run) and exists on disk as one file per tile,
//! e.g. `wood.<UDIM>.exr` → `wood.1001.exr`, `wood.1002.exr`, ...

use crate::error::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Tile index substituted for a placeholder when a concrete file name is needed
pub const TEST_TILE_INDEX: &str = "1001";

/// Extensions counted by the directory-wide texture census
pub const CENSUS_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "tif", "tiff", "exr", "hdr", "tx", "tex",
];

/// One supported placeholder syntax.
///
/// `marker` is what has to be present for the placeholder to be detected,
/// `slot` is the part that stands for the tile index and gets substituted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TilePlaceholder {
    marker: &'static str,
    slot: &'static str,
}

/// Placeholder syntaxes in detection priority order. The dot-wrapped
/// `.<UDIM>.`/`.<udim>.` spellings are covered by the bare markers.
pub const TILE_PLACEHOLDERS: [TilePlaceholder; 3] = [
    TilePlaceholder { marker: "<UDIM>", slot: "<UDIM>" },
    TilePlaceholder { marker: "<udim>", slot: "<udim>" },
    TilePlaceholder { marker: ".####.", slot: "####" },
];

impl TilePlaceholder {
    /// First placeholder (in priority order) present in `text`
    pub fn detect(text: &str) -> Option<TilePlaceholder> {
        TILE_PLACEHOLDERS
            .iter()
            .copied()
            .find(|placeholder| text.contains(placeholder.marker))
    }

    /// The substring standing for the tile index
    pub fn slot(&self) -> &'static str {
        self.slot
    }

    /// Replace the placeholder with the test tile index
    pub fn substitute(&self, text: &str) -> String {
        text.replacen(self.slot, TEST_TILE_INDEX, 1)
    }

    /// Split a file name around the placeholder into `(prefix, suffix)`
    pub fn split<'a>(&self, file_name: &'a str) -> Option<(&'a str, &'a str)> {
        if !file_name.contains(self.marker) {
            return None;
        }
        file_name.split_once(self.slot)
    }
}

/// Returns true when the path's file name carries a tile placeholder
pub fn is_tiled(path: &Path) -> bool {
    file_name_of(path)
        .map(|name| TilePlaceholder::detect(&name).is_some())
        .unwrap_or(false)
}

fn file_name_of(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Expands placeholder paths into the concrete tile files on disk
#[derive(Debug, Clone)]
pub struct TileSetEnumerator {
    min_index: u32,
    max_index: u32,
}

impl Default for TileSetEnumerator {
    fn default() -> Self {
        Self {
            min_index: 1000,
            max_index: 1999,
        }
    }
}

impl TileSetEnumerator {
    /// Create an enumerator using the conventional 1000-1999 index range
    pub fn new() -> Self {
        Self::default()
    }

    /// List the files a templated path expands to, sorted by file name.
    ///
    /// A path without a placeholder lists itself when it exists.
    pub fn list_tiles(&self, templated: &Path) -> Vec<PathBuf> {
        match self.try_list_tiles(templated) {
            Ok(tiles) => tiles,
            Err(e) => {
                warn!("Failed to enumerate tiles for {}: {}", templated.display(), e);
                Vec::new()
            }
        }
    }

    /// Number of files a templated path expands to
    pub fn count_tiles(&self, templated: &Path) -> usize {
        self.list_tiles(templated).len()
    }

    fn try_list_tiles(&self, templated: &Path) -> Result<Vec<PathBuf>> {
        let Some(file_name) = file_name_of(templated) else {
            return Ok(Vec::new());
        };

        let Some((prefix, suffix)) =
            TilePlaceholder::detect(&file_name).and_then(|p| p.split(&file_name))
        else {
            return Ok(if templated.is_file() {
                vec![templated.to_path_buf()]
            } else {
                Vec::new()
            });
        };

        let dir = match templated.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let names = list_file_names(&dir)?;
        let (prefix, suffix) = (regex::escape(prefix), regex::escape(suffix));

        let strict = Regex::new(&format!(r"^{}(\d{{4}}){}$", prefix, suffix))?;
        let tiles: Vec<PathBuf> = names
            .iter()
            .filter(|name| {
                strict
                    .captures(name)
                    .and_then(|caps| caps[1].parse::<u32>().ok())
                    .is_some_and(|index| (self.min_index..=self.max_index).contains(&index))
            })
            .map(|name| dir.join(name))
            .collect();
        if !tiles.is_empty() {
            return Ok(tiles);
        }

        let loose = Regex::new(&format!(r"^{}(\d+){}$", prefix, suffix))?;
        let tiles: Vec<PathBuf> = names
            .iter()
            .filter(|name| loose.is_match(name))
            .map(|name| dir.join(name))
            .collect();
        if !tiles.is_empty() {
            debug!("Loose tile match for {}: {} files", templated.display(), tiles.len());
            return Ok(tiles);
        }

        self.glob_tiles(&dir, &file_name)
    }

    /// Last resort: wildcard expansion of the placeholder slot
    fn glob_tiles(&self, dir: &Path, file_name: &str) -> Result<Vec<PathBuf>> {
        let Some((prefix, suffix)) =
            TilePlaceholder::detect(file_name).and_then(|p| p.split(file_name))
        else {
            return Ok(Vec::new());
        };

        let pattern = format!(
            "{}/{}*{}",
            glob::Pattern::escape(&dir.to_string_lossy()),
            glob::Pattern::escape(prefix),
            glob::Pattern::escape(suffix)
        );

        let mut tiles: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect();
        tiles.sort();
        if !tiles.is_empty() {
            debug!("Glob tile match {}: {} files", pattern, tiles.len());
        }
        Ok(tiles)
    }

    /// Count the image files sitting next to `path` (directory-wide census)
    pub fn count_directory_textures(&self, path: &Path) -> usize {
        let Some(dir) = path.parent() else {
            return 0;
        };
        let Ok(names) = list_file_names(dir) else {
            return 0;
        };
        names
            .iter()
            .filter(|name| {
                Path::new(name)
                    .extension()
                    .map(|ext| ext.to_string_lossy().to_lowercase())
                    .is_some_and(|ext| CENSUS_EXTENSIONS.contains(&ext.as_str()))
            })
            .count()
    }
}

/// Sorted names of the regular files in `dir`
fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
