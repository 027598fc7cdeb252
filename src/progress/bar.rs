//! Terminal progress bar

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::{LoggingHandler, ProgressEvent, ProgressHandler};

const TEMPLATE: &str = "Processed {pos}/{len} recipes {bar:40} {elapsed}";

/// Draws a progress bar on stderr while recipes are parsed and forwards
/// every event to the [`LoggingHandler`]. A silent bar draws nothing.
#[derive(Debug)]
pub struct BarHandler {
    bar: ProgressBar,
}

impl BarHandler {
    pub fn new(silent: bool) -> Self {
        let bar = if silent {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr());
            let style = ProgressStyle::with_template(TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style);
            bar
        };
        Self { bar }
    }

    pub fn is_hidden(&self) -> bool {
        self.bar.is_hidden()
    }
}

impl ProgressHandler for BarHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        match event {
            ProgressEvent::ScanStarted { total } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(0);
            }
            ProgressEvent::RecipeProcessed { index, .. } => {
                self.bar.set_position(*index as u64);
            }
            ProgressEvent::ScanComplete { .. } => {
                self.bar.finish_and_clear();
            }
            ProgressEvent::InstalledFiltered { .. } => {}
        }
        LoggingHandler.on_progress(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn test_silent_bar_is_hidden() {
        let handler = BarHandler::new(true);
        assert!(handler.is_hidden());
        handler.on_progress(&ProgressEvent::ScanStarted { total: 1 });
        handler.on_progress(&ProgressEvent::RecipeProcessed {
            path: PathBuf::from("Foo-1.0.eb"),
            index: 1,
            total: 1,
        });
        handler.on_progress(&ProgressEvent::ScanComplete {
            packages: 1,
            entries: 1,
            scan_time: Duration::from_millis(1),
        });
    }
}
