//! CLI argument parsing using clap.

use clap::ArgAction;
use clap::Parser;
use clap_complete::Shell;
use jarscope_core::CorruptContainerPolicy;
use jarscope_core::ScanConfig;
use jarscope_core::SortOrder;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "jarscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Archive to inspect (EAR, WAR, JAR or any zip file)
    #[arg(value_name = "INPUT_FILE", required_unless_present = "completions")]
    pub input_file: Option<PathBuf>,

    /// Be verbose (repeat for more detail; -vvv lists each member's classification)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Sort by SHA1 checksum value
    #[arg(short = 's', long = "sort_checksum", visible_alias = "sort-checksum")]
    pub sort_checksum: bool,

    /// Sort by archive member name (default)
    #[arg(short = 'n', long = "sort_name", visible_alias = "sort-name")]
    pub sort_name: bool,

    /// Highlight duplicates with their occurrence count
    #[arg(short, long)]
    pub duplicates: bool,

    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Fail instead of skipping nested archives that cannot be read
    #[arg(long)]
    pub strict: bool,

    /// Deepest nesting level whose archives are expanded
    #[arg(long, value_name = "LEVEL")]
    pub max_depth: Option<usize>,

    /// Maximum decompressed size of a single member
    #[arg(long, value_name = "SIZE", value_parser = parse_byte_size)]
    pub max_entry_size: Option<u64>,

    /// Maximum decompressed bytes of non-archive members in total
    #[arg(long, value_name = "SIZE", value_parser = parse_byte_size)]
    pub max_total_size: Option<u64>,

    /// Maximum number of members discovered in total
    #[arg(long, value_name = "COUNT")]
    pub max_entries: Option<usize>,

    /// Show a progress spinner on stderr while scanning
    #[arg(long)]
    pub progress: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", value_enum, exclusive = true)]
    pub completions: Option<Shell>,
}

impl Cli {
    /// Checksum order wins when both sort flags are given.
    pub const fn sort_order(&self) -> SortOrder {
        if self.sort_checksum {
            SortOrder::Checksum
        } else {
            SortOrder::Name
        }
    }

    /// Whether each member's classification is printed while scanning.
    pub const fn show_classification(&self) -> bool {
        self.verbose > 2 && !self.json
    }

    pub fn scan_config(&self) -> ScanConfig {
        let defaults = ScanConfig::default();
        ScanConfig {
            max_entry_size: self.max_entry_size.unwrap_or(defaults.max_entry_size),
            max_total_size: self.max_total_size.unwrap_or(defaults.max_total_size),
            max_entry_count: self.max_entries.unwrap_or(defaults.max_entry_count),
            max_depth: self.max_depth.unwrap_or(defaults.max_depth),
            on_corrupt: if self.strict {
                CorruptContainerPolicy::Abort
            } else {
                CorruptContainerPolicy::Skip
            },
        }
    }
}

/// Parse byte size with optional suffix (K, M, G, T)
#[allow(clippy::option_if_let_else)]
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (num_str, multiplier) = if let Some(stripped) = s.strip_suffix('T') {
        (stripped, 1024_u64.pow(4))
    } else if let Some(stripped) = s.strip_suffix('G') {
        (stripped, 1024_u64.pow(3))
    } else if let Some(stripped) = s.strip_suffix('M') {
        (stripped, 1024_u64.pow(2))
    } else if let Some(stripped) = s.strip_suffix('K') {
        (stripped, 1024)
    } else {
        (s, 1)
    };

    num_str
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}
