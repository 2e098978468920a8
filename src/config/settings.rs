//! Settings validation

use std::path::{Path, MAIN_SEPARATOR};

use crate::error::{Result, ResultExt, WalkerError};
use crate::models::config::Settings;

/// Settings validator for ensuring configuration is valid
pub struct SettingsValidator;

impl SettingsValidator {
    /// Validate settings and return errors if invalid
    pub fn validate(settings: &Settings) -> Result<()> {
        if !settings.scene_path.is_file() {
            return Err(WalkerError::InvalidPath {
                path: settings.scene_path.clone(),
            });
        }

        if let Some(base_dir) = &settings.base_dir {
            if !base_dir.is_dir() {
                return Err(WalkerError::config_error(format!(
                    "Base directory '{}' is not a directory",
                    base_dir.display()
                )));
            }
        }

        if settings.max_depth == Some(0) {
            return Err(WalkerError::config_error("Max depth must be at least 1"));
        }

        Self::validate_root_marker(&settings.root_marker)?;
        Self::validate_names("staging alias", &settings.staging_aliases)?;
        Self::validate_names("reference folder", &settings.reference_folders)?;
        Self::validate_names("texture folder", &settings.texture_folders)?;
        Self::validate_names(
            "shader override",
            &[
                settings.shader_override_dir.clone(),
                settings.shader_override_document.clone(),
            ],
        )?;

        if let Some(path) = &settings.output_file {
            Self::validate_output_path(path)?;
        }
        if let Some(path) = &settings.graph_output {
            Self::validate_output_path(path)?;
        }

        Ok(())
    }

    fn validate_root_marker(marker: &str) -> Result<()> {
        if marker.trim().is_empty() {
            return Err(WalkerError::config_error("Root marker must not be empty"));
        }
        if marker.contains('/') || marker.contains('\\') || marker.contains(MAIN_SEPARATOR) {
            return Err(WalkerError::config_error(format!(
                "Root marker '{}' must be a single path segment",
                marker
            )));
        }
        Ok(())
    }

    fn validate_names(kind: &str, names: &[String]) -> Result<()> {
        match names.iter().find(|n| n.trim().is_empty()) {
            Some(_) => Err(WalkerError::config_error(format!("Empty {} name", kind))),
            None => Ok(()),
        }
    }

    /// Validate that an output path can be created
    fn validate_output_path(path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => return Ok(()),
        };

        if !parent.exists() {
            return Err(WalkerError::InvalidPath {
                path: parent.to_path_buf(),
            });
        }

        let metadata = std::fs::metadata(parent).with_file_context(parent)?;
        if metadata.permissions().readonly() {
            return Err(WalkerError::permission_denied(parent));
        }

        Ok(())
    }
}
