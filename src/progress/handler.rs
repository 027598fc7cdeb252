//! Progress handler trait and events

use std::path::PathBuf;
use std::time::Duration;

/// Events emitted while scanning recipe files
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Scan started over `total` recipe files
    ScanStarted { total: usize },

    /// One recipe file was parsed
    RecipeProcessed {
        path: PathBuf,
        index: usize,
        total: usize,
    },

    /// Every recipe file was parsed and grouped
    ScanComplete {
        packages: usize,
        entries: usize,
        scan_time: Duration,
    },

    /// Entries without an installed module were dropped
    InstalledFiltered { packages: usize, entries: usize },
}

/// Trait for handling progress events during recipe scans
pub trait ProgressHandler {
    /// Called when a progress event occurs
    fn on_progress(&self, event: &ProgressEvent);
}

/// No-op handler that ignores all events
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHandler;

impl ProgressHandler for NoOpHandler {
    fn on_progress(&self, _event: &ProgressEvent) {}
}
