//! Configuration-related data structures

use crate::core::repackager::{DEFAULT_REFERENCE_FOLDERS, DEFAULT_ROOT_MARKER, DEFAULT_TEXTURE_FOLDERS};
use crate::core::walker::{DEFAULT_SHADER_OVERRIDE_DIR, DEFAULT_SHADER_OVERRIDE_DOCUMENT};
use crate::utils::path_resolver::DEFAULT_STAGING_ALIASES;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Main configuration settings for scene-walker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Root scene document to analyze
    pub scene_path: PathBuf,

    /// Base directory for resolving the root document's relative tokens
    pub base_dir: Option<PathBuf>,

    /// Output format (text, json, csv)
    pub output_format: OutputFormat,

    /// Output file path (if not specified, output to stdout)
    pub output_file: Option<PathBuf>,

    /// Destination root; when set the analyzed asset is repackaged there
    pub package_dir: Option<PathBuf>,

    /// Write the reference graph as Graphviz DOT to this file
    pub graph_output: Option<PathBuf>,

    /// Path segment from which destination paths are rebuilt
    pub root_marker: String,

    /// Staging directory names searched for unresolved tokens
    pub staging_aliases: Vec<String>,

    /// Convention folders for reference destinations, highest priority first
    pub reference_folders: Vec<String>,

    /// Convention folders for texture destinations, highest priority first
    pub texture_folders: Vec<String>,

    /// Directory next to a document holding its shading override
    pub shader_override_dir: String,

    /// File name of the shading override document
    pub shader_override_document: String,

    /// Maximum reference depth to traverse
    pub max_depth: Option<usize>,

    /// Whether to evaluate textures on the rayon pool
    pub parallel: bool,

    /// Plan the repackage without copying anything
    pub dry_run: bool,

    /// Whether to suppress non-essential output
    pub quiet: bool,

    /// Whether to show raw tokens, issues and debug logging
    pub verbose: bool,

    /// Whether to use colors in text output
    pub use_colors: bool,

    /// Whether to show progress bars
    pub show_progress: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene_path: PathBuf::from("."),
            base_dir: None,
            output_format: OutputFormat::Text,
            output_file: None,
            package_dir: None,
            graph_output: None,
            root_marker: DEFAULT_ROOT_MARKER.to_string(),
            staging_aliases: owned(&DEFAULT_STAGING_ALIASES),
            reference_folders: owned(&DEFAULT_REFERENCE_FOLDERS),
            texture_folders: owned(&DEFAULT_TEXTURE_FOLDERS),
            shader_override_dir: DEFAULT_SHADER_OVERRIDE_DIR.to_string(),
            shader_override_document: DEFAULT_SHADER_OVERRIDE_DOCUMENT.to_string(),
            max_depth: None,
            parallel: true,
            dry_run: false,
            quiet: false,
            verbose: false,
            use_colors: true,
            show_progress: true,
        }
    }
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Partial settings for configuration merging
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartialSettings {
    pub scene_path: Option<PathBuf>,
    pub base_dir: Option<PathBuf>,
    pub output_format: Option<OutputFormat>,
    pub output_file: Option<PathBuf>,
    pub package_dir: Option<PathBuf>,
    pub graph_output: Option<PathBuf>,
    pub root_marker: Option<String>,
    pub staging_aliases: Option<Vec<String>>,
    pub reference_folders: Option<Vec<String>>,
    pub texture_folders: Option<Vec<String>>,
    pub shader_override_dir: Option<String>,
    pub shader_override_document: Option<String>,
    pub max_depth: Option<usize>,
    pub parallel: Option<bool>,
    pub dry_run: Option<bool>,
    pub quiet: Option<bool>,
    pub verbose: Option<bool>,
    pub use_colors: Option<bool>,
    pub show_progress: Option<bool>,
}

macro_rules! merge_fields {
    ($target:expr, $other:expr, $($field:ident),+ $(,)?) => {
        $(
            if $other.$field.is_some() {
                $target.$field = $other.$field;
            }
        )+
    };
}

impl PartialSettings {
    /// Merge another PartialSettings into this one
    /// Fields from `other` take precedence over existing fields
    pub fn merge_from(&mut self, other: PartialSettings) {
        merge_fields!(
            self,
            other,
            scene_path,
            base_dir,
            output_format,
            output_file,
            package_dir,
            graph_output,
            root_marker,
            staging_aliases,
            reference_folders,
            texture_folders,
            shader_override_dir,
            shader_override_document,
            max_depth,
            parallel,
            dry_run,
            quiet,
            verbose,
            use_colors,
            show_progress,
        );
    }

    /// Convert partial settings to full settings
    /// Uses defaults for any fields that are None
    pub fn to_settings(&self) -> Settings {
        let mut settings = Settings::default();

        if let Some(scene_path) = &self.scene_path {
            settings.scene_path = scene_path.clone();
        }
        if let Some(base_dir) = &self.base_dir {
            settings.base_dir = Some(base_dir.clone());
        }
        if let Some(output_format) = self.output_format {
            settings.output_format = output_format;
        }
        if let Some(output_file) = &self.output_file {
            settings.output_file = Some(output_file.clone());
        }
        if let Some(package_dir) = &self.package_dir {
            settings.package_dir = Some(package_dir.clone());
        }
        if let Some(graph_output) = &self.graph_output {
            settings.graph_output = Some(graph_output.clone());
        }
        if let Some(root_marker) = &self.root_marker {
            settings.root_marker = root_marker.clone();
        }
        if let Some(staging_aliases) = &self.staging_aliases {
            settings.staging_aliases = staging_aliases.clone();
        }
        if let Some(reference_folders) = &self.reference_folders {
            settings.reference_folders = reference_folders.clone();
        }
        if let Some(texture_folders) = &self.texture_folders {
            settings.texture_folders = texture_folders.clone();
        }
        if let Some(shader_override_dir) = &self.shader_override_dir {
            settings.shader_override_dir = shader_override_dir.clone();
        }
        if let Some(shader_override_document) = &self.shader_override_document {
            settings.shader_override_document = shader_override_document.clone();
        }
        if let Some(max_depth) = self.max_depth {
            settings.max_depth = Some(max_depth);
        }
        if let Some(parallel) = self.parallel {
            settings.parallel = parallel;
        }
        if let Some(dry_run) = self.dry_run {
            settings.dry_run = dry_run;
        }
        if let Some(quiet) = self.quiet {
            settings.quiet = quiet;
        }
        if let Some(verbose) = self.verbose {
            settings.verbose = verbose;
        }
        if let Some(use_colors) = self.use_colors {
            settings.use_colors = use_colors;
        }
        if let Some(show_progress) = self.show_progress {
            settings.show_progress = show_progress;
        }

        settings
    }
}
