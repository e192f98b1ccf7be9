use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::models::PageResult;
use crate::network::fetcher::fetch_page;

/// Runs `fetch` for every URL with at most `limit` calls in flight.
///
/// Every URL yields exactly one `PageResult`; a panicked task is reported as a
/// failed page rather than aborting the batch.
pub async fn run_bounded<F, Fut>(urls: Vec<String>, limit: usize, fetch: F) -> Vec<PageResult>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = PageResult> + Send + 'static,
{
    let total = urls.len();
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let counter = Arc::new(AtomicUsize::new(0));
    let fetch = Arc::new(fetch);

    let mut tasks = Vec::with_capacity(total);
    for url in urls {
        let semaphore = semaphore.clone();
        let counter = counter.clone();
        let fetch = fetch.clone();
        let task_url = url.clone();

        let handle = tokio::spawn(async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return PageResult::failed(task_url);
            };
            let page = (*fetch)(task_url).await;
            let count = counter.fetch_add(1, Ordering::SeqCst) + 1;

            let status = if page.is_fetched() { "OK" } else { "FAIL" };
            let size = page.text.as_ref().map_or(0, |t| t.len());
            info!("Fetch [{}/{}] {} -> {}, {} chars", count, total, page.url, status, size);

            page
        });
        tasks.push((url, handle));
    }

    let mut pages = Vec::with_capacity(total);
    for (url, task) in tasks {
        match task.await {
            Ok(page) => pages.push(page),
            Err(e) => {
                error!("Fetch task for {} did not complete: {}", url, e);
                pages.push(PageResult::failed(url));
            }
        }
    }
    pages
}

pub async fn fetch_all(
    client: &Client,
    urls: Vec<String>,
    limit: usize,
    timeout_duration: Duration,
    decode_base64: bool,
) -> Vec<PageResult> {
    let client = client.clone();
    run_bounded(urls, limit, move |url| {
        let client = client.clone();
        async move { fetch_page(&client, &url, timeout_duration, decode_base64).await }
    })
    .await
}
