//! Output formatter trait for CLI results.

use anyhow::Result;
use jarscope_core::ScanReport;
use jarscope_core::SortOrder;
use serde::Serialize;
use std::path::Path;

/// Presentation choices that apply to every formatter.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub order: SortOrder,
    pub duplicates: bool,
}

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the full scan report
    fn format_report(&self, archive: &Path, report: &ScanReport, options: ReportOptions)
    -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// Envelope around every JSON document.
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: &'static str,
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> JsonOutput<T> {
    pub const fn success(operation: &'static str, data: T) -> Self {
        Self {
            operation,
            status: "success",
            data,
        }
    }
}
