use std::time::{Duration, Instant};
use indicatif::{ProgressBar, ProgressStyle};
use console::style;

use crate::client::ExportFilter;

/// Spinner shown on stderr while an export job runs.
pub struct ExportSpinner {
    bar: ProgressBar,
    start_time: Instant,
}

impl ExportSpinner {
    pub fn new(filter: &ExportFilter, visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg} {elapsed:.dim}") {
            bar.set_style(spinner_style);
        }
        bar.set_message(format!("Exporting {}...", filter));
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar, start_time: Instant::now() }
    }

    pub fn finish(&self, exported: usize) {
        self.bar.finish_and_clear();
        if !self.bar.is_hidden() {
            eprintln!(
                "  {} Export job finished: {} assets in {}",
                style("✓").green(),
                exported,
                format_duration(self.start_time.elapsed()),
            );
        }
    }

    pub fn fail(&self) {
        self.bar.abandon_with_message(format!("{}", style("Export failed").red()));
    }
}

pub fn format_duration(elapsed: Duration) -> String {
    let ms = elapsed.as_millis() as u64;
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}
