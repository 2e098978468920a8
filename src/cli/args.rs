//! Command-line argument parsing

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// scene-walker - dependency inventory and repackaging for USD scenes
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "scene-walker")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inventory the layers, references and textures of a USD scene and repackage them")]
#[command(long_about = "scene-walker follows every sublayer, reference and payload reachable from a root \
USD document, collects the textures its materials use (expanding UDIM tile sets), and can copy the \
whole asset into a self-contained folder tree rooted at a configurable path segment.")]
#[command(after_help = "EXAMPLES:

Analysis:
    # Inventory a scene
    scene-walker /show/filmserver/library/prop/chair/main.usda

    # Machine-readable report written to a file
    scene-walker main.usda --format json --output report.json

    # Search extra staging folders for unresolved tokens
    scene-walker main.usda --staging-alias txt --staging-alias wip

    # Export the reference graph for Graphviz
    scene-walker main.usda --graph references.dot

Repackaging:
    # Copy the asset and everything it needs
    scene-walker main.usda --package-to /tmp/chair

    # Show what would be copied
    scene-walker main.usda --package-to /tmp/chair --dry-run

    # Rebuild destination paths from a different root segment
    scene-walker main.usda --package-to /tmp/chair --root-marker library

Configuration:
    # Use a specific configuration file
    scene-walker main.usda --config ./scene-walker.toml

    # Create a default .scene-walker.toml in the current directory
    scene-walker --init
")]
pub struct Args {
    /// Root scene document
    #[arg(value_name = "SCENE", help = "Root USD document to analyze (.usd, .usda, .usdc or .usdz)")]
    pub scene: Option<PathBuf>,

    /// Base directory for the root document's relative tokens
    #[arg(short, long, value_name = "DIR", help = "Directory used to resolve relative paths found in the root document (defaults to the document's own folder)")]
    pub base_dir: Option<PathBuf>,

    /// Output format (text, json, csv)
    #[arg(short, long, value_enum, value_name = "FORMAT", help = "Output format: 'text' for people, 'json' for tools, 'csv' for spreadsheets")]
    pub format: Option<OutputFormat>,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE", help = "File to write the report to (uses stdout if not specified)")]
    pub output: Option<PathBuf>,

    /// Repackage into this directory
    #[arg(short, long = "package-to", value_name = "DIR", help = "Copy the analyzed asset and its dependencies under this directory")]
    pub package_to: Option<PathBuf>,

    /// Path segment destination paths are rebuilt from
    #[arg(long, value_name = "NAME", help = "Path segment from which destination paths are rebuilt when repackaging (default: filmserver)")]
    pub root_marker: Option<String>,

    /// Staging directory names searched for unresolved tokens
    #[arg(long = "staging-alias", value_name = "NAME", help = "Staging folder searched for tokens that do not resolve directly (can be specified multiple times)")]
    pub staging_aliases: Vec<String>,

    /// Maximum reference depth
    #[arg(long, value_name = "DEPTH", help = "Stop following references deeper than this many levels below the root")]
    pub max_depth: Option<usize>,

    /// Graphviz DOT export of the reference graph
    #[arg(long, value_name = "FILE", help = "Write the reference graph in DOT format for visualization")]
    pub graph: Option<PathBuf>,

    /// Plan the repackage without copying
    #[arg(long, help = "Report what --package-to would copy without touching the filesystem")]
    pub dry_run: bool,

    /// Disable parallel processing
    #[arg(long, help = "Evaluate textures on a single thread")]
    pub no_parallel: bool,

    /// Suppress non-essential output
    #[arg(short, long, help = "Only print a one-line summary and errors")]
    pub quiet: bool,

    /// Show raw tokens, issues and debug logging
    #[arg(short, long, help = "List raw tokens and every issue, and log at debug level")]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, help = "Disable colored output (useful when piping output)")]
    pub no_color: bool,

    /// Disable progress bars
    #[arg(long, help = "Disable progress bars (useful for CI environments)")]
    pub no_progress: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", help = "Path to a configuration file (defaults to .scene-walker.toml in the current directory)")]
    pub config: Option<PathBuf>,

    /// Initialize a default configuration file
    #[arg(long, help = "Create a default configuration file (.scene-walker.toml) in the current directory")]
    pub init: bool,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for programmatic consumption
    Json,
    /// CSV output for spreadsheet analysis
    Csv,
}

impl From<OutputFormat> for crate::models::config::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => Self::Text,
            OutputFormat::Json => Self::Json,
            OutputFormat::Csv => Self::Csv,
        }
    }
}

impl Args {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }
}
