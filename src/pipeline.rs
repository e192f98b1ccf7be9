use tracing::info;

use crate::aggregate::Aggregator;
use crate::config::Args;
use crate::discovery::CompiledCategories;
use crate::error::Result;
use crate::io::{
    link_prefix, load_categories, load_urls, prepare_output_dir, render_report, report_timestamp,
    save_all, write_report,
};
use crate::models::{PageResult, RunSummary, partition_categories};
use crate::network::{build_client, fetch_all};

/// Folds fetched pages into an aggregator; failed pages contribute nothing.
pub fn aggregate_pages(pages: &[PageResult], protocols: &CompiledCategories, aggregator: &mut Aggregator) {
    for page in pages {
        let Some(text) = page.text.as_deref() else {
            continue;
        };
        if text.is_empty() {
            continue;
        }
        aggregator.add_page(&protocols.match_text(text));
    }
}

pub async fn run(args: &Args) -> Result<RunSummary> {
    let urls = load_urls(&args.urls).await?;
    let categories = load_categories(&args.keywords).await?;
    let (protocol_categories, country_categories) = partition_categories(&categories);

    info!(
        "Loaded {} URLs and {} categories ({} protocol, {} country)",
        urls.len(),
        categories.len(),
        protocol_categories.len(),
        country_categories.len()
    );

    let compiled = CompiledCategories::compile(&protocol_categories);
    let client = build_client()?;

    info!("Fetching {} pages with {} workers...", urls.len(), args.concurrency_limit());
    let pages = fetch_all(
        &client,
        urls,
        args.concurrency_limit(),
        args.request_timeout(),
        args.decode_base64,
    )
    .await;

    info!("Processing pages for config name association...");
    let mut aggregator = Aggregator::new(&country_categories);
    aggregate_pages(&pages, &compiled, &mut aggregator);
    let (protocol_sets, country_sets) = aggregator.into_sets();

    prepare_output_dir(&args.output_dir).await?;
    info!("Saving files to directory: {}", args.output_dir.display());
    let protocol_counts = save_all(&args.output_dir, &protocol_sets, &args.extension).await;
    let country_counts = save_all(&args.output_dir, &country_sets, &args.extension).await;

    let report = render_report(
        &protocol_counts,
        &country_counts,
        &report_timestamp(),
        &link_prefix(&args.report, &args.output_dir),
        &args.extension,
    );
    write_report(&args.report, &report).await;

    Ok(RunSummary {
        pages_attempted: pages.len(),
        pages_fetched: pages.iter().filter(|p| p.is_fetched()).count(),
        protocol_counts,
        country_counts,
    })
}
