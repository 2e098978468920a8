//! Error context utilities for scene-walker
//!
//! This module provides utilities for adding context to errors and handling
//! errors in a consistent way throughout the application.

use std::path::Path;
use crate::error::{ErrorSeverity, Result, WalkerError};

/// Extension trait for Result to add context to errors
pub trait ResultExt<T, E> {
    /// Add context to an error with a custom message
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;

    /// Add file context to an error
    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T>;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: std::error::Error + 'static,
{
    fn with_context<C, F>(self, context: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|err| {
            WalkerError::Analysis {
                message: format!("{}: {}", context(), err),
            }
        })
    }

    fn with_file_context<P: AsRef<Path>>(self, path: P) -> Result<T> {
        self.map_err(|err| {
            let dyn_err: &(dyn std::error::Error + 'static) = &err;
            if let Some(io_err) = dyn_err.downcast_ref::<std::io::Error>() {
                match io_err.kind() {
                    std::io::ErrorKind::PermissionDenied => {
                        return WalkerError::permission_denied(path.as_ref());
                    }
                    std::io::ErrorKind::NotFound => {
                        return WalkerError::not_found(path.as_ref());
                    }
                    _ => {}
                }
            }

            WalkerError::directory_traversal_error(path.as_ref(), err.to_string())
        })
    }
}

/// Handle an error based on its severity
///
/// - Warning: Log the error and return None
/// - Error: Log the error and return None
/// - Critical: Log the error and return Some(error)
pub fn handle_error(err: WalkerError) -> Option<WalkerError> {
    let message = err.user_message();

    match err.severity() {
        ErrorSeverity::Warning => {
            tracing::warn!("{}", message);
            None
        }
        ErrorSeverity::Error => {
            tracing::error!("{}", message);
            None
        }
        ErrorSeverity::Critical => {
            tracing::error!("critical: {}", message);
            Some(err)
        }
    }
}

/// Try to run a function and handle any errors based on their severity
///
/// Returns Ok(T) if the function succeeds, or Err(WalkerError) if a critical error occurs.
/// Non-critical errors are logged but do not cause the function to fail.
pub fn try_with_recovery<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            if let Some(critical_err) = handle_error(err) {
                Err(critical_err)
            } else {
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_with_context() {
        let result: std::result::Result<(), io::Error> = Err(io::Error::new(
            io::ErrorKind::NotFound,
            "file not found",
        ));
        
        let with_context = result.with_context(|| "Failed to scan layer");
        assert!(with_context.is_err());

        if let Err(err) = with_context {
            if let WalkerError::Analysis { message } = err {
                assert!(message.contains("Failed to scan layer"));
                assert!(message.contains("file not found"));
            } else {
                panic!("Expected Analysis error");
            }
        }
    }

    #[test]
    fn test_with_file_context() {
        let result: std::result::Result<(), io::Error> = Err(io::Error::new(
            io::ErrorKind::Other,
            "disk on fire",
        ));

        let with_context = result.with_file_context("scenes/shot.usda");
        assert!(with_context.is_err());

        if let Err(err) = with_context {
            if let WalkerError::DirectoryTraversal { path, message } = err {
                assert_eq!(path.to_string_lossy(), "scenes/shot.usda");
                assert!(message.contains("disk on fire"));
            } else {
                panic!("Expected DirectoryTraversal error");
            }
        }
    }

    #[test]
    fn test_with_file_context_not_found() {
        let result: std::result::Result<(), io::Error> = Err(io::Error::new(
            io::ErrorKind::NotFound,
            "file not found",
        ));

        match result.with_file_context("textures/wood.jpg") {
            Err(WalkerError::NotFound { path }) => {
                assert_eq!(path.to_string_lossy(), "textures/wood.jpg");
            }
            other => panic!("Expected NotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_try_with_recovery_swallows_warnings() {
        let recovered: Result<Option<()>> =
            try_with_recovery(|| Err(WalkerError::not_found("missing.usda")));
        assert!(matches!(recovered, Ok(None)));

        let critical: Result<Option<()>> =
            try_with_recovery(|| Err(WalkerError::config_error("bad marker")));
        assert!(critical.is_err());
    }

    #[test]
    fn test_with_file_context_permission_denied() {
        let result: std::result::Result<(), io::Error> = Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "permission denied",
        ));
        
        let with_context = result.with_file_context("test/path");
        assert!(with_context.is_err());
        
        if let Err(err) = with_context {
            if let WalkerError::PermissionDenied { path, .. } = err {
                assert_eq!(path.to_string_lossy(), "test/path");
            } else {
                panic!("Expected PermissionDenied error");
            }
        }
    }
}
