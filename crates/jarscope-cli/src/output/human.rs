//! Plain-text report lines, one per discovered member.

use super::formatter::OutputFormatter;
use super::formatter::ReportOptions;
use anyhow::Result;
use console::Term;
use console::style;
use jarscope_core::Entry;
use jarscope_core::ScanReport;
use jarscope_core::SortOrder;
use std::path::Path;

/// Blank placeholder with the width of a `#NNN` marker.
const NO_DUPLICATE: &str = "    ";

pub struct HumanFormatter {
    use_colors: bool,
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: console::colors_enabled(),
        }
    }
}

/// `#NNN` when `count` exceeds one, four spaces otherwise, and nothing at
/// all when duplicate highlighting is off.
pub fn duplicate_marker(count: usize, enabled: bool) -> String {
    if !enabled {
        String::new()
    } else if count > 1 {
        format!("#{count:>3}")
    } else {
        NO_DUPLICATE.to_string()
    }
}

pub fn checksum_line(digest: &str, marker: &str, path: &str, name: &str) -> String {
    format!("{digest} {marker}  {path:<40}   {name}")
}

pub fn name_line(name: &str, marker: &str, path: &str, digest: &str) -> String {
    format!("{name:<64} {marker} {path} {digest}")
}

fn render_line(report: &ScanReport, entry: &Entry, options: ReportOptions, colors: bool) -> String {
    let count = report.occurrences(entry);
    let mut marker = duplicate_marker(count, options.duplicates);
    if colors && count > 1 && options.duplicates {
        marker = style(marker).yellow().bold().to_string();
    }
    let path = report.path(entry);
    let digest = entry.digest().as_str();

    match options.order {
        SortOrder::Checksum => checksum_line(digest, &marker, &path, entry.name()),
        SortOrder::Name => name_line(entry.name(), &marker, &path, digest),
    }
}

/// Renders one line per member in report order.
pub fn render(report: &ScanReport, options: ReportOptions, colors: bool) -> Vec<String> {
    report
        .sorted(options.order)
        .into_iter()
        .map(|entry| render_line(report, entry, options, colors))
        .collect()
}

impl OutputFormatter for HumanFormatter {
    fn format_report(
        &self,
        _archive: &Path,
        report: &ScanReport,
        options: ReportOptions,
    ) -> Result<()> {
        let term = Term::buffered_stdout();
        for line in render(report, options, self.use_colors) {
            term.write_line(&line)?;
        }
        term.flush()?;
        Ok(())
    }

    fn format_warning(&self, message: &str) {
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {message}", style("warning:").yellow().bold()));
        } else {
            let _ = term.write_line(&format!("warning: {message}"));
        }
    }
}
