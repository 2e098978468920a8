//! Repackaging of an analyzed asset into a new directory tree
//!
//! Every source file gets a destination below `dest_root` that keeps as
//! much of its production layout as can be recognized, so relative tokens
//! inside the copied documents keep resolving. Copies run sequentially and
//! a failing file never stops the batch.

use crate::core::parallel::{ProgressCallback, ProgressUpdate};
use crate::error::{Result, WalkerError};
use crate::models::package::{
    CopiedFiles, CopyCategory, CopyPlanEntry, CopyReport, RepackageRequest, SkippedFile,
};
use crate::utils::canonical::{canonical_path, comparison_key, segments};
use crate::utils::tiles::{is_tiled, TileSetEnumerator};
use std::collections::HashSet;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Path segment from which destinations are rebuilt by default
pub const DEFAULT_ROOT_MARKER: &str = "filmserver";

/// Convention folders for scene documents, highest priority first
pub const DEFAULT_REFERENCE_FOLDERS: [&str; 6] = ["USD", "usd", "assets", "scenes", "shots", "env"];

/// Convention folders for textures, highest priority first
pub const DEFAULT_TEXTURE_FOLDERS: [&str; 10] = [
    "texture", "textures", "tex", "maps", "images", "txt", "publish", "USD", "usd", "assets",
];

/// Inputs to [`compute_relative_destination`]
#[derive(Debug, Clone, Copy)]
pub struct DestinationContext<'a> {
    pub root_marker: &'a str,
    /// Directory of the main asset being repackaged
    pub main_asset_dir: Option<&'a Path>,
    /// Convention folders, highest priority first
    pub convention_folders: &'a [String],
}

/// Compute the destination of `path` relative to the destination root.
///
/// The first rule that applies wins:
/// 1. the root marker is a segment: keep the path from the marker onward
/// 2. the path lies under the main asset's directory: keep the remainder
/// 3. a convention folder is a segment: keep the path from that folder on
/// 4. otherwise `parent_dir_name/file_name`
pub fn compute_relative_destination(path: &Path, context: &DestinationContext<'_>) -> PathBuf {
    let parts = segments(path);
    let Some((file_name, directories)) = parts.split_last() else {
        return PathBuf::new();
    };

    if !context.root_marker.is_empty() {
        if let Some(index) = directories.iter().position(|s| s == context.root_marker) {
            return parts[index..].iter().collect();
        }
    }

    if let Some(main_dir) = context.main_asset_dir {
        let main_parts = segments(main_dir);
        let under_main = parts.len() > main_parts.len()
            && comparison_key(main_dir) != "."
            && parts
                .iter()
                .zip(&main_parts)
                .all(|(a, b)| a.to_lowercase() == b.to_lowercase());
        if under_main {
            return parts[main_parts.len()..].iter().collect();
        }
    }

    for folder in context.convention_folders {
        if let Some(index) = directories.iter().position(|s| s == folder) {
            return parts[index..].iter().collect();
        }
    }

    match directories.last() {
        Some(parent) => [parent.as_str(), file_name.as_str()].iter().collect(),
        None => PathBuf::from(file_name),
    }
}

/// Options for one repackager
#[derive(Debug, Clone)]
pub struct RepackageOptions {
    pub root_marker: String,
    pub reference_folders: Vec<String>,
    pub texture_folders: Vec<String>,
    /// Plan and report without touching the filesystem
    pub dry_run: bool,
}

impl Default for RepackageOptions {
    fn default() -> Self {
        Self {
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
            reference_folders: DEFAULT_REFERENCE_FOLDERS.iter().map(|s| s.to_string()).collect(),
            texture_folders: DEFAULT_TEXTURE_FOLDERS.iter().map(|s| s.to_string()).collect(),
            dry_run: false,
        }
    }
}

impl From<&crate::models::config::Settings> for RepackageOptions {
    fn from(settings: &crate::models::config::Settings) -> Self {
        Self {
            root_marker: settings.root_marker.clone(),
            reference_folders: settings.reference_folders.clone(),
            texture_folders: settings.texture_folders.clone(),
            dry_run: settings.dry_run,
        }
    }
}

/// Copies an analyzed asset and its dependencies into a new root
pub struct Repackager {
    options: RepackageOptions,
    enumerator: TileSetEnumerator,
    progress: Option<ProgressCallback>,
}

impl Repackager {
    pub fn new(options: RepackageOptions) -> Self {
        Self {
            options,
            enumerator: TileSetEnumerator::new(),
            progress: None,
        }
    }

    /// Report each copied file to `callback`
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Copy everything in `request`. Per-file failures are reported in
    /// `skipped`; nothing already copied is rolled back.
    pub fn repackage(&self, request: &RepackageRequest) -> CopyReport {
        if let Err(e) = request.validate() {
            warn!("{}", e);
            let mut report = CopyReport::new(CopiedFiles::default(), Vec::new(), &request.dest_root, self.options.dry_run);
            report.message = e.user_message();
            return report;
        }

        let (plan, mut skipped) = self.plan(request);
        info!(
            "Repackaging {} files into {}{}",
            plan.len(),
            request.dest_root.display(),
            if self.options.dry_run { " (dry run)" } else { "" }
        );

        let mut copied = CopiedFiles::default();
        let total = plan.len();
        for (index, entry) in plan.into_iter().enumerate() {
            self.report_progress(index + 1, total, &entry.source);

            if self.options.dry_run {
                copied.push(entry.into());
                continue;
            }

            match copy_preserving_metadata(&entry.source, &entry.target) {
                Ok(CopyOutcome::Copied) => {
                    info!("Copied {} -> {}", entry.source.display(), entry.target.display());
                    copied.push(entry.into());
                }
                Ok(CopyOutcome::SameFile) => {
                    debug!("Skipping {}: already at its destination", entry.source.display());
                    skipped.push(SkippedFile {
                        source: entry.source,
                        category: entry.category,
                        reason: "source and destination are the same file".to_string(),
                    });
                }
                Err(e) => {
                    warn!("{}", e);
                    skipped.push(SkippedFile {
                        source: entry.source,
                        category: entry.category,
                        reason: e.to_string(),
                    });
                }
            }
        }

        let report = CopyReport::new(copied, skipped, &request.dest_root, self.options.dry_run);
        info!("{}", report.message);
        report
    }

    /// Build the copy plan. Missing sources and empty tile sets are skipped.
    pub fn plan(&self, request: &RepackageRequest) -> (Vec<CopyPlanEntry>, Vec<SkippedFile>) {
        let main = canonical_path(&request.main_asset_path);
        let main_dir = main.parent().map(Path::to_path_buf);
        let mut builder = PlanBuilder::default();

        let reference_context = DestinationContext {
            root_marker: &self.options.root_marker,
            main_asset_dir: main_dir.as_deref(),
            convention_folders: &self.options.reference_folders,
        };
        let texture_context = DestinationContext {
            convention_folders: &self.options.texture_folders,
            ..reference_context
        };

        let target = request
            .dest_root
            .join(compute_relative_destination(&main, &reference_context));
        builder.add(main.clone(), target, CopyCategory::Main, String::new());

        for reference in &request.references {
            let source = canonical_path(&reference.path);
            let target = request
                .dest_root
                .join(compute_relative_destination(&source, &reference_context));
            builder.add(source, target, CopyCategory::Reference, reference.kind.to_string());
        }

        for texture in &request.textures {
            let source = canonical_path(&texture.path);
            let target = request
                .dest_root
                .join(compute_relative_destination(&source, &texture_context));

            if !is_tiled(&source) {
                builder.add(source, target, CopyCategory::Texture, texture.source.clone());
                continue;
            }

            let tiles = self.enumerator.list_tiles(&source);
            if tiles.is_empty() {
                builder.skip(source, CopyCategory::Texture, "no tiles found");
                continue;
            }
            let target_dir = target.parent().map(Path::to_path_buf).unwrap_or_default();
            for tile in tiles {
                let Some(tile_name) = tile.file_name() else {
                    continue;
                };
                let tile_target = target_dir.join(tile_name);
                builder.add(tile, tile_target, CopyCategory::Texture, texture.source.clone());
            }
        }

        (builder.plan, builder.skipped)
    }

    fn report_progress(&self, current: usize, total: usize, source: &Path) {
        if let Some(callback) = &self.progress {
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            callback(ProgressUpdate::new(current, total, format!("Copying {}", name)));
        }
    }
}

#[derive(Default)]
struct PlanBuilder {
    plan: Vec<CopyPlanEntry>,
    skipped: Vec<SkippedFile>,
    planned: HashSet<String>,
}

impl PlanBuilder {
    fn add(&mut self, source: PathBuf, target: PathBuf, category: CopyCategory, source_info: String) {
        if !source.is_file() {
            self.skip(source, category, "source does not exist");
            return;
        }
        if self.planned.insert(comparison_key(&source)) {
            self.plan.push(CopyPlanEntry {
                source,
                target,
                category,
                source_info,
            });
        }
    }

    fn skip(&mut self, source: PathBuf, category: CopyCategory, reason: &str) {
        self.skipped.push(SkippedFile {
            source,
            category,
            reason: reason.to_string(),
        });
    }
}

enum CopyOutcome {
    Copied,
    SameFile,
}

/// Copy one file, creating parent directories and keeping its permissions
/// and access/modification times
fn copy_preserving_metadata(source: &Path, target: &Path) -> Result<CopyOutcome> {
    let fail = |e| WalkerError::copy_failure(source, target, e);

    if target.exists() && same_file::is_same_file(source, target).map_err(fail)? {
        return Ok(CopyOutcome::SameFile);
    }
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(fail)?;
    }

    fs::copy(source, target).map_err(fail)?;

    let metadata = fs::metadata(source).map_err(fail)?;
    let mut times = FileTimes::new();
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    if let Ok(modified) = metadata.modified() {
        times = times.set_modified(modified);
    }
    File::options()
        .write(true)
        .open(target)
        .and_then(|file| file.set_times(times))
        .map_err(fail)?;

    Ok(CopyOutcome::Copied)
}
