//! Scan command implementation.

use crate::cli::Cli;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::output::ReportOptions;
use crate::progress::CliObserver;
use anyhow::Context;
use anyhow::Result;
use jarscope_core::Entry;
use jarscope_core::ScanReport;
use jarscope_core::walk_with_observer;
use std::path::Path;

pub fn execute(cli: &Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let archive = cli
        .input_file
        .as_deref()
        .context("no input file given")?;

    let config = cli.scan_config();
    let mut observer = CliObserver::new(cli.show_classification(), cli.progress);
    let report = add_archive_context(
        walk_with_observer(archive, &config, &mut observer),
        archive,
    )?;
    drop(observer);

    if report.has_warnings() {
        for warning in scan_warnings(archive, &report) {
            formatter.format_warning(&warning);
        }
    }

    formatter.format_report(
        archive,
        &report,
        ReportOptions {
            order: cli.sort_order(),
            duplicates: cli.duplicates,
        },
    )
}

/// One message per skipped nested archive and per container with hidden
/// member records.
fn scan_warnings(archive: &Path, report: &ScanReport) -> Vec<String> {
    let location = |entry: &Entry| {
        if entry.is_root() {
            archive.display().to_string()
        } else {
            format!("{}{}", report.path(entry), entry.name())
        }
    };

    let skipped = report.skipped.iter().filter_map(|skip| {
        let entry = report.tree.get(skip.id)?;
        Some(format!(
            "skipped nested archive {}: {}",
            location(entry),
            skip.reason
        ))
    });
    let shadowed = report.shadowed.iter().filter_map(|shadow| {
        let entry = report.tree.get(shadow.id)?;
        Some(format!(
            "{}: {} member record(s) not listed, a later record has the same name",
            location(entry),
            shadow.hidden
        ))
    });

    skipped.chain(shadowed).collect()
}
