//! Scan observer printing classifications and driving a progress spinner.

use console::Term;
use indicatif::ProgressBar;
use indicatif::ProgressStyle;
use jarscope_core::Entry;
use jarscope_core::ScanObserver;
use std::time::Duration;

/// Printed after the classification lines, before the report.
pub const SEPARATOR: &str = "-----------------------------------";

/// CLI implementation of `ScanObserver`.
///
/// With `classify` set, prints `<name> is archive: <bool>` to stdout for every
/// member as it is discovered, then [`SEPARATOR`] once the walk completes.
pub struct CliObserver {
    classify: bool,
    out: Term,
    spinner: Option<ProgressBar>,
}

impl CliObserver {
    /// Creates an observer; the spinner is only shown on an interactive stderr.
    pub fn new(classify: bool, progress: bool) -> Self {
        let spinner = (progress && Term::stderr().is_term()).then(|| {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.cyan} {msg} {pos} entries ({elapsed})")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.set_message("Scanning");
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        });

        Self {
            classify,
            out: Term::stdout(),
            spinner,
        }
    }

    fn line(&self, text: &str) {
        match &self.spinner {
            Some(bar) => bar.suspend(|| {
                let _ = self.out.write_line(text);
            }),
            None => {
                let _ = self.out.write_line(text);
            }
        }
    }
}

/// Diagnostic line for one classified member.
pub fn classification_line(entry: &Entry) -> String {
    format!("{} is archive: {}", entry.name(), entry.is_container())
}

impl ScanObserver for CliObserver {
    fn on_entry_discovered(&mut self, entry: &Entry, _path: &str) {
        if self.classify {
            self.line(&classification_line(entry));
        }
        if let Some(bar) = &self.spinner {
            bar.inc(1);
        }
    }

    fn on_container_expanded(&mut self, entry: &Entry, _children: usize) {
        if let Some(bar) = &self.spinner
            && !entry.is_root()
        {
            bar.set_message(format!("Scanning {}", entry.name()));
        }
    }

    fn on_container_skipped(&mut self, _entry: &Entry, _reason: &str) {}

    fn on_complete(&mut self, _total: usize) {
        if let Some(bar) = self.spinner.take() {
            bar.finish_and_clear();
        }
        if self.classify {
            self.line(SEPARATOR);
        }
    }
}

impl Drop for CliObserver {
    fn drop(&mut self) {
        if let Some(bar) = self.spinner.take() {
            bar.finish_and_clear();
        }
    }
}
