//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use crate::error::{Result, WalkerError};
use crate::models::config::{OutputFormat, PartialSettings};
use super::{parser, ConfigSource};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".scene-walker.toml";

/// Prefix of the environment variables read by [`EnvConfig`]
pub const ENV_PREFIX: &str = "SCENE_WALKER";

/// Variable suffixes understood by [`EnvConfig`]
const ENV_KEYS: [&str; 11] = [
    "SCENE_PATH",
    "BASE_DIR",
    "OUTPUT_FORMAT",
    "OUTPUT_FILE",
    "PACKAGE_DIR",
    "ROOT_MARKER",
    "STAGING_ALIASES",
    "MAX_DEPTH",
    "QUIET",
    "VERBOSE",
    "NO_COLOR",
];

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
    priority: u8,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
            priority: 20,
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
            priority: 20,
        }
    }

    /// Get the path of this configuration file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> Result<PartialSettings> {
        if !self.is_available() {
            return Err(WalkerError::ConfigNotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source
pub struct EnvConfig {
    prefix: String,
    name: String,
    priority: u8,
}

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
            priority: 10,
        }
    }

    fn var(&self, key: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, key))
            .ok()
            .filter(|value| !value.trim().is_empty())
    }

    fn flag(&self, key: &str) -> Result<Option<bool>> {
        match self.var(key) {
            None => Ok(None),
            Some(value) => parse_bool(&value)
                .map(Some)
                .ok_or_else(|| {
                    WalkerError::config_error(format!(
                        "{}_{} must be a boolean, got '{}'",
                        self.prefix, key, value
                    ))
                }),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> Result<PartialSettings> {
        let mut settings = PartialSettings::default();

        settings.scene_path = self.var("SCENE_PATH").map(PathBuf::from);
        settings.base_dir = self.var("BASE_DIR").map(PathBuf::from);
        settings.output_file = self.var("OUTPUT_FILE").map(PathBuf::from);
        settings.package_dir = self.var("PACKAGE_DIR").map(PathBuf::from);
        settings.root_marker = self.var("ROOT_MARKER");
        settings.staging_aliases = self.var("STAGING_ALIASES").map(|v| split_list(&v));

        if let Some(format) = self.var("OUTPUT_FORMAT") {
            settings.output_format = Some(
                format
                    .parse::<OutputFormat>()
                    .map_err(WalkerError::config_error)?,
            );
        }

        if let Some(depth) = self.var("MAX_DEPTH") {
            let depth = depth.trim().parse::<usize>().map_err(|_| {
                WalkerError::config_error(format!(
                    "{}_MAX_DEPTH must be a positive integer, got '{}'",
                    self.prefix, depth
                ))
            })?;
            settings.max_depth = Some(depth);
        }

        settings.quiet = self.flag("QUIET")?;
        settings.verbose = self.flag("VERBOSE")?;
        // NO_COLOR follows the usual convention: any value disables colours
        if self.var("NO_COLOR").is_some() {
            settings.use_colors = Some(false);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        ENV_KEYS.iter().any(|key| self.var(key).is_some())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn priority(&self) -> u8 {
        self.priority
    }
}
