//! Logging-based progress handler

use super::{ProgressEvent, ProgressHandler};
use tracing::{debug, info};

/// Handler that logs progress events using tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandler;

impl ProgressHandler for LoggingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::ScanStarted { total } => {
                debug!(total, "Scanning recipe files");
            }
            ProgressEvent::RecipeProcessed { path, index, total } => {
                debug!(
                    recipe = %path.display(),
                    progress = format!("{}/{}", index, total),
                    "Processed recipe"
                );
            }
            ProgressEvent::ScanComplete {
                packages,
                entries,
                scan_time,
            } => {
                info!(
                    packages,
                    entries,
                    scan_time_ms = scan_time.as_millis(),
                    "Found {} different software packages",
                    packages
                );
            }
            ProgressEvent::InstalledFiltered { packages, entries } => {
                info!(
                    packages,
                    entries,
                    "Retained {} installed software packages",
                    packages
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_logging_all_events() {
        let handler = LoggingHandler;

        let events = vec![
            ProgressEvent::ScanStarted { total: 2 },
            ProgressEvent::RecipeProcessed {
                path: PathBuf::from("/recipes/f/Foo/Foo-1.0.eb"),
                index: 1,
                total: 2,
            },
            ProgressEvent::ScanComplete {
                packages: 1,
                entries: 2,
                scan_time: Duration::from_millis(12),
            },
            ProgressEvent::InstalledFiltered {
                packages: 1,
                entries: 1,
            },
        ];

        for event in events {
            handler.on_progress(&event);
        }
    }
}
