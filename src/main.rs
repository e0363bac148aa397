mod cli;
mod error;
mod http;
mod logging;
mod report;
mod storage;
mod testing;

use std::future::Future;
use std::process::ExitCode;

use clap::Parser;

use cli::{Cli, HarnessConfig};
use error::HarnessError;
use http::client::HttpClient;
use report::SuiteReport;
use testing::case::Suite;
use testing::catalog;
use testing::runner::Runner;

#[tokio::main]
async fn main() -> ExitCode {
    let config = HarnessConfig::from(Cli::parse());
    logging::init(config.verbose, &config.log_path);

    match run(&config, catalog::default_catalog(), wait_for_interrupt()).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(HarnessError::Interrupted) => {
            log::info!("Tests interrupted by user");
            ExitCode::from(HarnessError::Interrupted.exit_code())
        }
        Err(err) => {
            log::error!("Test execution failed: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

/// Validates the catalog, runs it, logs the summary and persists the report.
///
/// If `interrupt` resolves first the in-flight run is dropped together with
/// every outcome collected so far and no report is written.
async fn run<I>(config: &HarnessConfig, suites: Vec<Suite>, interrupt: I) -> Result<SuiteReport, HarnessError>
where
    I: Future<Output = ()>,
{
    catalog::validate(&suites)?;
    let client = HttpClient::new(&config.base_url, config.timeout)?;

    log::info!("Testing API at: {}", client.base_url());
    log::info!("Ensure the target service is running before executing tests");

    let runner = Runner::new(client);
    let report = tokio::select! {
        report = runner.run(&suites) => report,
        _ = interrupt => return Err(HarnessError::Interrupted),
    };

    report.log_summary();
    match storage::save_report(&config.report_path, &report) {
        Ok(()) => log::info!("Detailed results saved to: {}", config.report_path.display()),
        Err(err) => log::error!("{err}"),
    }

    Ok(report)
}

async fn wait_for_interrupt() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::warn!("Failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}
