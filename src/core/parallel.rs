//! Parallel processing utilities

use rayon::prelude::*;

/// Progress update information for long-running operations
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub current: usize,
    pub total: usize,
    pub message: String,
}

impl ProgressUpdate {
    /// Create a new progress update
    pub fn new(current: usize, total: usize, message: impl Into<String>) -> Self {
        Self {
            current,
            total,
            message: message.into(),
        }
    }

    /// Calculate progress percentage
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.current as f64 / self.total as f64) * 100.0
        }
    }
}

/// Callback receiving progress updates
pub type ProgressCallback = Box<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Map `f` over `items`, on the rayon pool when `parallel` is set.
///
/// Output order always matches input order, so callers get identical
/// results either way.
pub fn process_in_order<T, F, R>(items: Vec<T>, parallel: bool, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    if parallel {
        items.into_par_iter().map(f).collect()
    } else {
        items.into_iter().map(f).collect()
    }
}
