//! Error types and definitions for scene-walker
//!
//! This module provides the error taxonomy shared by the analyzer, the
//! repackager and the command-line front end, together with the severity
//! classification used to decide whether a failure stops the process.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity levels for different error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Warning level errors - operation can continue
    Warning,
    /// Error level - current operation fails but overall process can continue
    Error,
    /// Critical level - process should terminate
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Warning => write!(f, "WARNING"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Main error type for scene-walker operations
#[derive(Debug, Error)]
pub enum WalkerError {
    /// Referenced file absent after all fallback search
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// Scene or material document could not be read
    #[error("Unreadable document {path}: {source}")]
    UnreadableDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Structural scene engine call failed
    #[error("Scene provider failed on {path}: {message}")]
    ProviderFailure { path: PathBuf, message: String },

    /// Copying a single file during repackaging failed
    #[error("Failed to copy {source_path} to {target}: {source}")]
    CopyFailure {
        source_path: PathBuf,
        target: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Standard IO errors
    #[error("IO error: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Permission denied errors
    #[error("Permission denied accessing {path}")]
    PermissionDenied { path: PathBuf },

    /// Invalid path errors
    #[error("Invalid path: {path}")]
    InvalidPath { path: PathBuf },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlParse {
        #[source]
        source: toml::de::Error,
    },

    /// CSV handling errors
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    /// Glob pattern errors
    #[error("Glob pattern error: {source}")]
    GlobPattern {
        #[source]
        source: glob::PatternError,
    },

    /// Regular expression compilation errors
    #[error("Pattern error: {source}")]
    Pattern {
        #[source]
        source: regex::Error,
    },

    /// Configuration file not found
    #[error("Configuration file not found at {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration file read errors
    #[error("Error reading configuration file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file parse errors
    #[error("Error parsing configuration file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Output file write errors
    #[error("Error writing to output file {path}: {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stdout write errors
    #[error("Error writing to stdout: {source}")]
    StdoutWrite {
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal errors
    #[error("Directory traversal error for {path}: {message}")]
    DirectoryTraversal { path: PathBuf, message: String },

    /// Malformed repackage request
    #[error("Invalid repackage request: {message}")]
    InvalidRequest { message: String },

    /// Analysis errors carrying free-form context
    #[error("Analysis error: {message}")]
    Analysis { message: String },

    /// JSON serialization error
    #[error("JSON serialization error: {source}")]
    JsonSerialize {
        #[source]
        source: serde_json::Error,
    },

    /// CSV serialization error
    #[error("CSV serialization error: {source}")]
    CsvSerialize {
        #[source]
        source: std::string::FromUtf8Error,
    },
}

impl WalkerError {
    /// Get the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // Per-item failures never stop an analysis or a copy batch
            WalkerError::NotFound { .. } => ErrorSeverity::Warning,
            WalkerError::UnreadableDocument { .. } => ErrorSeverity::Warning,
            WalkerError::ProviderFailure { .. } => ErrorSeverity::Warning,
            WalkerError::CopyFailure { .. } => ErrorSeverity::Warning,
            WalkerError::PermissionDenied { .. } => ErrorSeverity::Warning,

            WalkerError::Config { .. } => ErrorSeverity::Critical,
            WalkerError::ConfigNotFound { .. } => ErrorSeverity::Critical,
            WalkerError::ConfigRead { .. } => ErrorSeverity::Critical,
            WalkerError::ConfigParse { .. } => ErrorSeverity::Critical,
            WalkerError::StdoutWrite { .. } => ErrorSeverity::Critical,

            _ => ErrorSeverity::Error,
        }
    }

    /// Check if this is a critical error that should terminate the process
    pub fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            WalkerError::NotFound { path } => {
                format!("'{}' does not exist. The entry was dropped from the inventory.", path.display())
            }
            WalkerError::UnreadableDocument { path, source } => {
                format!("Could not read '{}': {}. Its dependencies were skipped.", path.display(), source)
            }
            WalkerError::ProviderFailure { path, message } => {
                format!("Scene engine could not inspect '{}': {}. Continuing with text scanning only.", path.display(), message)
            }
            WalkerError::CopyFailure { source_path, target, source } => {
                format!("Could not copy '{}' to '{}': {}.", source_path.display(), target.display(), source)
            }
            WalkerError::PermissionDenied { path } => {
                format!("Cannot access '{}' due to permission denied. Check file permissions.", path.display())
            }
            WalkerError::Io { source } => {
                format!("File system error: {}. Check disk space and permissions.", source)
            }
            WalkerError::InvalidPath { path } => {
                format!("Invalid path: '{}'. Please provide an existing scene file.", path.display())
            }
            WalkerError::ConfigNotFound { path } => {
                format!("Configuration file not found at '{}'. Create one with --init or use command line options.", path.display())
            }
            _ => self.to_string(),
        }
    }

    /// Create an IO error with context
    pub fn io_error(source: std::io::Error) -> Self {
        WalkerError::Io { source }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        WalkerError::Config {
            message: message.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        WalkerError::PermissionDenied { path: path.into() }
    }

    /// Create a not-found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        WalkerError::NotFound { path: path.into() }
    }

    /// Create an unreadable-document error
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WalkerError::UnreadableDocument {
            path: path.into(),
            source,
        }
    }

    /// Create a scene provider failure
    pub fn provider_failure(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        WalkerError::ProviderFailure {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a copy failure
    pub fn copy_failure(
        source_path: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        WalkerError::CopyFailure {
            source_path: source_path.into(),
            target: target.into(),
            source,
        }
    }

    /// Create an analysis error
    pub fn analysis_error(message: impl Into<String>) -> Self {
        WalkerError::Analysis {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        WalkerError::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        WalkerError::DirectoryTraversal {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for WalkerError {
    fn from(err: std::io::Error) -> Self {
        WalkerError::Io { source: err }
    }
}

impl From<toml::de::Error> for WalkerError {
    fn from(err: toml::de::Error) -> Self {
        WalkerError::TomlParse { source: err }
    }
}

impl From<glob::PatternError> for WalkerError {
    fn from(err: glob::PatternError) -> Self {
        WalkerError::GlobPattern { source: err }
    }
}

impl From<regex::Error> for WalkerError {
    fn from(err: regex::Error) -> Self {
        WalkerError::Pattern { source: err }
    }
}

impl From<csv::Error> for WalkerError {
    fn from(err: csv::Error) -> Self {
        WalkerError::Csv { source: err }
    }
}

impl From<serde_json::Error> for WalkerError {
    fn from(err: serde_json::Error) -> Self {
        WalkerError::JsonSerialize { source: err }
    }
}

/// Result type alias for scene-walker operations
pub type Result<T> = std::result::Result<T, WalkerError>;
