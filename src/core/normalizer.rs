//! Result normalization
//!
//! Turns the raw references and textures collected by the walker into the
//! final report: canonical spelling, existence re-checked, case-insensitive
//! deduplication in first-discovery order, and tile counts.

use crate::core::parallel::process_in_order;
use crate::models::analysis::{AnalysisReport, IssueKind, ReferenceEntry, TextureEntry, WalkIssue};
use crate::utils::canonical::{canonical_path, canonical_string, comparison_key};
use crate::utils::tiles::TileSetEnumerator;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Outcome of evaluating one texture against the filesystem
enum TextureCheck {
    Kept(TextureEntry),
    Missing(PathBuf),
}

pub struct ResultNormalizer {
    enumerator: TileSetEnumerator,
    parallel: bool,
}

impl ResultNormalizer {
    pub fn new(enumerator: TileSetEnumerator, parallel: bool) -> Self {
        Self { enumerator, parallel }
    }

    /// Build the final report. The returned report's `root` is left empty
    /// for the caller to fill in.
    pub fn normalize(
        &self,
        references: Vec<ReferenceEntry>,
        textures: Vec<TextureEntry>,
        issues: Vec<WalkIssue>,
    ) -> AnalysisReport {
        let mut report = AnalysisReport::empty(PathBuf::new());
        report.issues = issues;

        let mut seen = HashSet::new();
        for mut entry in references {
            let Some(path) = entry.resolved_path.as_deref().map(canonical_path) else {
                continue;
            };
            if !seen.insert(comparison_key(&path)) {
                continue;
            }
            if !path.is_file() {
                warn!("Dropping missing reference {}", path.display());
                report.issues.push(WalkIssue::new(IssueKind::NotFound, &path, "referenced document does not exist"));
                continue;
            }
            entry.resolved_path = Some(path);
            report.references.push(entry);
        }

        let mut seen = HashSet::new();
        let candidates: Vec<TextureEntry> = textures
            .into_iter()
            .filter_map(|mut entry| {
                let path = canonical_path(entry.resolved_path.as_deref()?);
                if !seen.insert(comparison_key(&path)) {
                    return None;
                }
                entry.resolved_path = Some(path);
                Some(entry)
            })
            .collect();

        let checks = process_in_order(candidates, self.parallel, |entry| self.check_texture(entry));
        for check in checks {
            match check {
                TextureCheck::Kept(entry) => {
                    if let Some(path) = &entry.resolved_path {
                        report.tile_counts.insert(canonical_string(path), entry.tile_count);
                    }
                    report.textures.push(entry);
                }
                TextureCheck::Missing(path) => {
                    warn!("Dropping missing texture {}", path.display());
                    report.issues.push(WalkIssue::new(IssueKind::NotFound, path, "texture does not exist"));
                }
            }
        }

        dedupe_issues(&mut report.issues);
        debug!(
            "Normalized {} references, {} textures",
            report.references.len(),
            report.textures.len()
        );
        report
    }

    fn check_texture(&self, mut entry: TextureEntry) -> TextureCheck {
        let Some(path) = entry.resolved_path.clone() else {
            return TextureCheck::Missing(PathBuf::new());
        };

        if entry.is_tiled {
            let count = self.enumerator.count_tiles(&path);
            if count == 0 {
                return TextureCheck::Missing(path);
            }
            entry.tile_count = count;
        } else {
            if !path.is_file() {
                return TextureCheck::Missing(path);
            }
            entry.tile_count = self.enumerator.count_directory_textures(&path);
        }
        TextureCheck::Kept(entry)
    }
}

/// Keep the first issue per (kind, path)
fn dedupe_issues(issues: &mut Vec<WalkIssue>) {
    let mut seen = HashSet::new();
    issues.retain(|issue| seen.insert((issue.kind, comparison_key(&issue.path))));
}
