//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, WalkerError};
use crate::models::config::PartialSettings;
use super::file::DEFAULT_CONFIG_FILE;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(WalkerError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| WalkerError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(content: &str, path: P) -> Result<PartialSettings> {
    let path = path.as_ref();

    let settings: PartialSettings = toml::from_str(content).map_err(|e| WalkerError::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })?;

    validate_partial_settings(&settings, path)?;

    Ok(settings)
}

fn invalid(path: &Path, what: &str) -> WalkerError {
    WalkerError::config_error(format!("{} in config file: {}", what, path.display()))
}

fn check_path(value: &Option<PathBuf>, key: &str, path: &Path) -> Result<()> {
    match value {
        Some(p) if p.as_os_str().is_empty() => Err(invalid(path, &format!("Invalid empty {}", key))),
        _ => Ok(()),
    }
}

fn check_names(value: &Option<Vec<String>>, key: &str, path: &Path) -> Result<()> {
    match value {
        Some(names) if names.iter().any(|n| n.trim().is_empty()) => {
            Err(invalid(path, &format!("Empty entry in {}", key)))
        }
        _ => Ok(()),
    }
}

/// Validate partial settings for obvious errors
pub fn validate_partial_settings<P: AsRef<Path>>(settings: &PartialSettings, path: P) -> Result<()> {
    let path = path.as_ref();

    check_path(&settings.scene_path, "scene_path", path)?;
    check_path(&settings.base_dir, "base_dir", path)?;
    check_path(&settings.output_file, "output_file", path)?;
    check_path(&settings.package_dir, "package_dir", path)?;
    check_path(&settings.graph_output, "graph_output", path)?;

    check_names(&settings.staging_aliases, "staging_aliases", path)?;
    check_names(&settings.reference_folders, "reference_folders", path)?;
    check_names(&settings.texture_folders, "texture_folders", path)?;

    if let Some(marker) = &settings.root_marker {
        if marker.trim().is_empty() {
            return Err(invalid(path, "Invalid empty root_marker"));
        }
    }

    if settings.max_depth == Some(0) {
        return Err(invalid(path, "Invalid max_depth 0 (must be at least 1)"));
    }

    Ok(())
}

/// Find and load configuration from default locations
///
/// The working directory wins over the home directory, which wins over
/// `<config_dir>/scene-walker/config.toml`.
pub fn find_default_config() -> Result<Option<PartialSettings>> {
    let current_dir_config = PathBuf::from(DEFAULT_CONFIG_FILE);
    if current_dir_config.is_file() {
        return Ok(Some(parse_config_file(current_dir_config)?));
    }

    if let Some(home_dir) = dirs::home_dir() {
        let home_config = home_dir.join(DEFAULT_CONFIG_FILE);
        if home_config.is_file() {
            return Ok(Some(parse_config_file(home_config)?));
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let xdg_config = config_dir.join("scene-walker").join("config.toml");
        if xdg_config.is_file() {
            return Ok(Some(parse_config_file(xdg_config)?));
        }
    }

    Ok(None)
}

/// Create a default configuration file at the specified path
pub fn create_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(WalkerError::io_error)?;
        }
    }

    fs::write(path, include_str!("default_config.toml")).map_err(|e| WalkerError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}
