//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::ReportOptions;
use anyhow::Result;
use jarscope_core::ScanReport;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

#[derive(Debug, Serialize)]
pub struct EntryOutput {
    pub name: String,
    pub path: String,
    pub digest: String,
    pub kind: &'static str,
    pub size: u64,
    pub depth: usize,
    pub occurrences: usize,
}

#[derive(Debug, Serialize)]
pub struct SkippedOutput {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct ShadowedOutput {
    pub path: String,
    pub hidden: usize,
}

#[derive(Debug, Serialize)]
pub struct ScanOutput {
    pub archive: String,
    pub sort: &'static str,
    pub total_entries: usize,
    pub containers: usize,
    pub unique_digests: usize,
    pub duplicate_digests: usize,
    pub bytes_read: u64,
    pub duration_ms: u128,
    pub entries: Vec<EntryOutput>,
    pub skipped: Vec<SkippedOutput>,
    pub shadowed: Vec<ShadowedOutput>,
}

impl ScanOutput {
    pub fn new(archive: &Path, report: &ScanReport, options: ReportOptions) -> Self {
        let entries = report
            .sorted(options.order)
            .into_iter()
            .map(|entry| EntryOutput {
                name: entry.name().to_string(),
                path: report.path(entry),
                digest: entry.digest().to_string(),
                kind: entry.kind().as_str(),
                size: entry.size(),
                depth: entry.depth(),
                occurrences: report.occurrences(entry),
            })
            .collect();

        let skipped = report
            .skipped
            .iter()
            .filter_map(|skip| {
                let entry = report.tree.get(skip.id)?;
                Some(SkippedOutput {
                    path: format!("{}{}", report.path(entry), entry.name()),
                    reason: skip.reason.clone(),
                })
            })
            .collect();

        let shadowed = report
            .shadowed
            .iter()
            .filter_map(|shadow| {
                let entry = report.tree.get(shadow.id)?;
                Some(ShadowedOutput {
                    path: format!("{}{}", report.path(entry), entry.name()),
                    hidden: shadow.hidden,
                })
            })
            .collect();

        Self {
            archive: archive.display().to_string(),
            sort: options.order.as_str(),
            total_entries: report.total_entries(),
            containers: report.containers(),
            unique_digests: report.counts.unique_digests(),
            duplicate_digests: report.counts.duplicates().len(),
            bytes_read: report.bytes_read,
            duration_ms: report.duration.as_millis(),
            entries,
            skipped,
            shadowed,
        }
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(
        &self,
        archive: &Path,
        report: &ScanReport,
        options: ReportOptions,
    ) -> Result<()> {
        let output = JsonOutput::success("scan", ScanOutput::new(archive, report, options));
        Self::output(&output)
    }

    fn format_warning(&self, message: &str) {
        // stdout carries the JSON document only
        let _ = writeln!(io::stderr(), "warning: {message}");
    }
}
