//! Analysis result structures

use crate::error::WalkerError;
use crate::utils::canonical::canonical_string;
use crate::utils::tiles::is_tiled;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Composition mechanism through which a dependency was discovered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReferenceKind {
    #[default]
    #[serde(rename = "reference")]
    Reference,
    #[serde(rename = "subLayer")]
    SubLayer,
    #[serde(rename = "payload")]
    Payload,
    /// Shading override document driving a branch's textures
    #[serde(rename = "shader")]
    ShaderTexture,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Reference => write!(f, "reference"),
            ReferenceKind::SubLayer => write!(f, "subLayer"),
            ReferenceKind::Payload => write!(f, "payload"),
            ReferenceKind::ShaderTexture => write!(f, "shader"),
        }
    }
}

impl std::str::FromStr for ReferenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reference" => Ok(ReferenceKind::Reference),
            "sublayer" => Ok(ReferenceKind::SubLayer),
            "payload" => Ok(ReferenceKind::Payload),
            "shader" => Ok(ReferenceKind::ShaderTexture),
            _ => Err(format!("Invalid reference kind: {}", s)),
        }
    }
}

/// A scene document dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceEntry {
    pub raw_token: String,
    pub kind: ReferenceKind,
    pub resolved_path: Option<PathBuf>,
}

impl ReferenceEntry {
    pub fn new(raw_token: impl Into<String>, kind: ReferenceKind, resolved_path: Option<PathBuf>) -> Self {
        Self {
            raw_token: raw_token.into(),
            kind,
            resolved_path,
        }
    }
}

/// A texture dependency, possibly a tiled set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureEntry {
    pub raw_token: String,
    /// Provenance label, e.g. `"shot.usda:diffuse"`
    pub source: String,
    pub resolved_path: Option<PathBuf>,
    pub is_tiled: bool,
    /// Tile count for tiled textures, directory census otherwise.
    /// Filled in during normalization.
    pub tile_count: usize,
}

impl TextureEntry {
    pub fn new(raw_token: impl Into<String>, source: impl Into<String>, resolved_path: Option<PathBuf>) -> Self {
        let raw_token = raw_token.into();
        let is_tiled = resolved_path
            .as_deref()
            .map(is_tiled)
            .unwrap_or_else(|| is_tiled(Path::new(&raw_token)));
        Self {
            raw_token,
            source: source.into(),
            resolved_path,
            is_tiled,
            tile_count: 0,
        }
    }
}

/// Category of a per-item problem met during analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueKind {
    NotFound,
    UnreadableDocument,
    ProviderFailure,
    DepthLimit,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::NotFound => write!(f, "not found"),
            IssueKind::UnreadableDocument => write!(f, "unreadable"),
            IssueKind::ProviderFailure => write!(f, "provider failure"),
            IssueKind::DepthLimit => write!(f, "depth limit"),
        }
    }
}

/// A per-item problem; never fatal to the analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkIssue {
    pub path: PathBuf,
    pub kind: IssueKind,
    pub message: String,
}

impl WalkIssue {
    pub fn new(kind: IssueKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    /// Build an issue from a walker error, keeping its user-facing message
    pub fn from_error(error: &WalkerError) -> Self {
        let (kind, path) = match error {
            WalkerError::NotFound { path } => (IssueKind::NotFound, path.clone()),
            WalkerError::UnreadableDocument { path, .. } => (IssueKind::UnreadableDocument, path.clone()),
            WalkerError::ProviderFailure { path, .. } => (IssueKind::ProviderFailure, path.clone()),
            WalkerError::PermissionDenied { path } => (IssueKind::UnreadableDocument, path.clone()),
            WalkerError::DirectoryTraversal { path, .. } => (IssueKind::UnreadableDocument, path.clone()),
            _ => (IssueKind::ProviderFailure, PathBuf::new()),
        };
        Self::new(kind, path, error.user_message())
    }
}

/// Immutable result of one analysis run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// The analyzed root document
    pub root: PathBuf,
    pub references: Vec<ReferenceEntry>,
    pub textures: Vec<TextureEntry>,
    /// Tile count per canonical texture path; the directory census for
    /// non-tiled textures
    pub tile_counts: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<WalkIssue>,
}

impl AnalysisReport {
    /// Create an empty report for `root`
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            references: Vec::new(),
            textures: Vec::new(),
            tile_counts: BTreeMap::new(),
            issues: Vec::new(),
        }
    }

    /// Tiled texture entries
    pub fn tiled_textures(&self) -> Vec<&TextureEntry> {
        self.textures.iter().filter(|t| t.is_tiled).collect()
    }

    /// Total number of physical files behind the texture entries
    pub fn texture_file_count(&self) -> usize {
        self.textures
            .iter()
            .map(|t| if t.is_tiled { t.tile_count } else { 1 })
            .sum()
    }

    /// Caller-facing shape of the report
    pub fn to_document(&self) -> ReportDocument {
        ReportDocument {
            references: self
                .references
                .iter()
                .filter_map(|r| {
                    r.resolved_path.as_ref().map(|path| ReportReference {
                        path: canonical_string(path),
                        kind: r.kind,
                        exists: true,
                    })
                })
                .collect(),
            textures: self
                .textures
                .iter()
                .filter_map(|t| {
                    t.resolved_path.as_ref().map(|path| ReportTexture {
                        path: canonical_string(path),
                        source: t.source.clone(),
                        exists: true,
                        actual_texture_count: t.tile_count,
                    })
                })
                .collect(),
            texture_udim_counts: self.tile_counts.clone(),
            issues: self.issues.clone(),
        }
    }
}

/// Report shape consumed by callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDocument {
    pub references: Vec<ReportReference>,
    pub textures: Vec<ReportTexture>,
    pub texture_udim_counts: BTreeMap<String, usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<WalkIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportReference {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: ReferenceKind,
    pub exists: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTexture {
    pub path: String,
    pub source: String,
    pub exists: bool,
    pub actual_texture_count: usize,
}
