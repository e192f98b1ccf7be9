use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use proxy_config_harvester::config::Args;
use proxy_config_harvester::pipeline;
use proxy_config_harvester::utils::format_duration;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);
    let start_time = Instant::now();

    info!("🚀 Starting config harvest...");

    let summary = match pipeline::run(&args).await {
        Ok(summary) => summary,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        "🏁 Done in {}: {}/{} pages fetched, {} protocol files, {} country files",
        format_duration(start_time.elapsed()),
        summary.pages_fetched,
        summary.pages_attempted,
        summary.protocol_counts.len(),
        summary.country_counts.len()
    );

    ExitCode::SUCCESS
}
