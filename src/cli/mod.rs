//! # Command Line
//!
//! The base URL and verbosity are the only runtime inputs; everything else
//! is a fixed default in `HarnessConfig`.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const REPORT_FILE: &str = "test_results.json";
const LOG_FILE: &str = "route_tests.log";

#[derive(Debug, Clone, Parser)]
#[command(name = "routecheck", version, about = "Run the endpoint conformance suites against a running API")]
pub struct Cli {
    /// Base URL of the API under test.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub url: String,

    /// Enable debug logging.
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    pub base_url: String,
    pub verbose: bool,
    /// Upper bound on each request, connect through body.
    pub timeout: Duration,
    pub report_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            verbose: false,
            timeout: DEFAULT_TIMEOUT,
            report_path: PathBuf::from(REPORT_FILE),
            log_path: PathBuf::from(LOG_FILE),
        }
    }
}

impl From<Cli> for HarnessConfig {
    fn from(cli: Cli) -> Self {
        Self {
            base_url: cli.url,
            verbose: cli.verbose,
            ..Self::default()
        }
    }
}
