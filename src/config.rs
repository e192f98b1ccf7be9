use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

pub const URLS_FILE: &str = "urls.txt";
pub const KEYWORDS_FILE: &str = "keywords.json";
pub const OUTPUT_DIR: &str = "output_configs";
pub const README_FILE: &str = "README.md";
pub const OUTPUT_EXTENSION: &str = "txt";

pub const REQUEST_TIMEOUT_SECS: u64 = 15;
pub const CONCURRENT_REQUESTS: usize = 10;

/// Separator between a config's connection part and its display name.
pub const NAME_MARKER: char = '#';

/// Report timestamps are rendered at UTC+03:30.
pub const REPORT_UTC_OFFSET_SECS: i32 = 3 * 3600 + 30 * 60;

/// Shortest whitespace-free page body considered as a base64 subscription blob.
pub const MIN_BASE64_BLOB_LEN: usize = 16;

#[derive(Parser, Debug, Clone)]
#[command(about = "Harvest proxy configs from web pages and group them by protocol and country")]
pub struct Args {
    /// Newline-delimited list of page URLs
    #[arg(short = 'u', long, default_value = URLS_FILE)]
    pub urls: PathBuf,

    /// Category definitions (JSON, or YAML by extension)
    #[arg(short = 'k', long, default_value = KEYWORDS_FILE)]
    pub keywords: PathBuf,

    /// Directory for per-category files, wiped on every run
    #[arg(short = 'o', long, default_value = OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Generated summary report
    #[arg(short = 'r', long, default_value = README_FILE)]
    pub report: PathBuf,

    /// File extension for per-category files
    #[arg(long, default_value = OUTPUT_EXTENSION)]
    pub extension: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Maximum simultaneous requests
    #[arg(short = 'c', long, default_value_t = CONCURRENT_REQUESTS)]
    pub concurrency: usize,

    /// Also decode pages that are a single base64 subscription blob
    #[arg(long)]
    pub decode_base64: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn concurrency_limit(&self) -> usize {
        self.concurrency.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let args = Args::parse_from(["harvester"]);
        assert_eq!(args.urls, PathBuf::from(URLS_FILE));
        assert_eq!(args.keywords, PathBuf::from(KEYWORDS_FILE));
        assert_eq!(args.output_dir, PathBuf::from(OUTPUT_DIR));
        assert_eq!(args.report, PathBuf::from(README_FILE));
        assert_eq!(args.extension, "txt");
        assert_eq!(args.request_timeout(), Duration::from_secs(15));
        assert_eq!(args.concurrency_limit(), 10);
        assert!(!args.decode_base64);
    }

    #[test]
    fn zero_concurrency_is_clamped() {
        let args = Args::parse_from(["harvester", "--concurrency", "0"]);
        assert_eq!(args.concurrency_limit(), 1);
    }
}
