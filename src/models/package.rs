//! Repackaging request and result structures

use super::analysis::{AnalysisReport, ReferenceKind};
use crate::error::{Result, WalkerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Everything needed to copy an analyzed asset into a new tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepackageRequest {
    pub main_asset_path: PathBuf,
    pub dest_root: PathBuf,
    #[serde(default)]
    pub references: Vec<RepackageReference>,
    #[serde(default)]
    pub textures: Vec<RepackageTexture>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepackageReference {
    pub path: PathBuf,
    #[serde(rename = "type", default)]
    pub kind: ReferenceKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepackageTexture {
    pub path: PathBuf,
    #[serde(default)]
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_count: Option<usize>,
}

impl RepackageRequest {
    /// Build a request copying everything an analysis found
    pub fn from_report(report: &AnalysisReport, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            main_asset_path: report.root.clone(),
            dest_root: dest_root.into(),
            references: report
                .references
                .iter()
                .filter_map(|r| {
                    r.resolved_path.as_ref().map(|path| RepackageReference {
                        path: path.clone(),
                        kind: r.kind,
                    })
                })
                .collect(),
            textures: report
                .textures
                .iter()
                .filter_map(|t| {
                    t.resolved_path.as_ref().map(|path| RepackageTexture {
                        path: path.clone(),
                        source: t.source.clone(),
                        tile_count: t.is_tiled.then_some(t.tile_count),
                    })
                })
                .collect(),
        }
    }

    /// Reject requests missing their main asset or destination
    pub fn validate(&self) -> Result<()> {
        if self.main_asset_path.as_os_str().is_empty() {
            return Err(WalkerError::invalid_request("mainAssetPath is empty"));
        }
        if self.dest_root.as_os_str().is_empty() {
            return Err(WalkerError::invalid_request("destRoot is empty"));
        }
        if self.references.iter().any(|r| r.path.as_os_str().is_empty())
            || self.textures.iter().any(|t| t.path.as_os_str().is_empty())
        {
            return Err(WalkerError::invalid_request("request contains an empty path"));
        }
        Ok(())
    }

    /// Number of entries in the request, main asset included
    pub fn entry_count(&self) -> usize {
        1 + self.references.len() + self.textures.len()
    }
}

/// Which part of the inventory a copied file belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CopyCategory {
    Main,
    Reference,
    Texture,
}

impl fmt::Display for CopyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CopyCategory::Main => write!(f, "main"),
            CopyCategory::Reference => write!(f, "reference"),
            CopyCategory::Texture => write!(f, "texture"),
        }
    }
}

/// One planned copy: `source` → `target`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyPlanEntry {
    pub source: PathBuf,
    pub target: PathBuf,
    pub category: CopyCategory,
    /// Reference kind or texture provenance label
    pub source_info: String,
}

/// A file that was (or, in a dry run, would be) copied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopiedFile {
    pub source: PathBuf,
    pub target: PathBuf,
    #[serde(rename = "type")]
    pub category: CopyCategory,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_info: String,
}

impl From<CopyPlanEntry> for CopiedFile {
    fn from(entry: CopyPlanEntry) -> Self {
        Self {
            source: entry.source,
            target: entry.target,
            category: entry.category,
            source_info: entry.source_info,
        }
    }
}

/// Copied files grouped by category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopiedFiles {
    pub main: Option<CopiedFile>,
    pub references: Vec<CopiedFile>,
    pub textures: Vec<CopiedFile>,
}

impl CopiedFiles {
    pub fn push(&mut self, file: CopiedFile) {
        match file.category {
            CopyCategory::Main => self.main = Some(file),
            CopyCategory::Reference => self.references.push(file),
            CopyCategory::Texture => self.textures.push(file),
        }
    }

    pub fn total(&self) -> usize {
        usize::from(self.main.is_some()) + self.references.len() + self.textures.len()
    }
}

/// A requested file that was not copied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub source: PathBuf,
    #[serde(rename = "type")]
    pub category: CopyCategory,
    pub reason: String,
}

/// Outcome of one repackaging run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyReport {
    pub success: bool,
    pub message: String,
    pub copied: CopiedFiles,
    pub skipped: Vec<SkippedFile>,
    #[serde(default)]
    pub dry_run: bool,
    pub completed_at: DateTime<Utc>,
}

impl CopyReport {
    /// Assemble the report and its summary message
    pub fn new(copied: CopiedFiles, skipped: Vec<SkippedFile>, dest_root: &Path, dry_run: bool) -> Self {
        let verb = if dry_run { "Would copy" } else { "Copied" };
        let main_count = usize::from(copied.main.is_some());
        let mut message = format!(
            "{} {} main file, {} references, {} textures to {}",
            verb,
            main_count,
            copied.references.len(),
            copied.textures.len(),
            dest_root.display()
        );
        if !skipped.is_empty() {
            message.push_str(&format!(" ({} skipped)", skipped.len()));
        }

        Self {
            success: copied.main.is_some(),
            message,
            copied,
            skipped,
            dry_run,
            completed_at: Utc::now(),
        }
    }
}
