// async_search.rs
use crate::{error::SearchError, Found, SearchOptions, WhichHunt};
use tokio::{task, time};
use tracing::debug;

/// Runs a blocking search without stalling the async runtime
///
/// The walk runs on tokio's blocking pool. When `opts.timeout` is set the
/// caller stops waiting after that long and gets `SearchError::Timeout`;
/// the walk itself cannot be interrupted and finishes in the background.
///
/// # Errors
///
/// Returns the errors of [`WhichHunt::search`], `SearchError::Timeout` when
/// the deadline passes, and `SearchError::Join` if the blocking task panics.
pub async fn search(
    pattern: &str,
    roots: &[&str],
    opts: &SearchOptions,
) -> Result<Found, SearchError> {
    let pattern = pattern.to_string();
    let roots: Vec<String> = roots.iter().map(|r| r.to_string()).collect();
    let timeout = opts.timeout;
    let opts = opts.clone();

    let handle = task::spawn_blocking(move || {
        let roots: Vec<&str> = roots.iter().map(String::as_str).collect();
        WhichHunt::search(&pattern, &roots, &opts)
    });

    let joined = match timeout {
        Some(limit) => match time::timeout(limit, handle).await {
            Ok(joined) => joined,
            Err(_) => {
                debug!(?limit, "search abandoned after deadline");
                return Err(SearchError::Timeout);
            }
        },
        None => handle.await,
    };

    joined.map_err(|e| SearchError::Join(e.to_string()))?
}
