//! Bounded-concurrency download of every blob in a container
//!
//! The listing is walked page by page from a single controlling loop. Each
//! entry waits for a slot in a fixed-size gate and is then transferred by its
//! own task; the loop only blocks while the gate is full. Once the listing is
//! exhausted the loop waits for all in-flight transfers before reporting.

mod types;
mod worker;

pub use types::{DownloadError, DownloadSummary, TransferResult, DEFAULT_CONCURRENCY};

use crate::blob::{BlobSource, Pager, StorageError};
use fanout::FanOut;
use std::path::Path;
use std::sync::Arc;

/// Download every blob from `source` into `dest_dir`, running at most
/// `concurrency` transfers at once.
///
/// Per-blob failures are logged and counted; only a listing failure (or a
/// failure to create `dest_dir`) aborts the run.
pub async fn download_all<S>(
    source: Arc<S>,
    dest_dir: &Path,
    concurrency: usize,
) -> Result<DownloadSummary, DownloadError>
where
    S: BlobSource + ?Sized + 'static,
{
    tokio::fs::create_dir_all(dest_dir)
        .await
        .map_err(StorageError::from)?;

    let mut transfers: FanOut<TransferResult, DownloadSummary> =
        FanOut::folding(concurrency, DownloadSummary::default(), |summary, result| {
            summary.record(&result)
        });
    let mut pager = Pager::new(source.as_ref());
    let mut count = 0usize;

    while let Some(entries) = pager.next_page().await? {
        count += entries.len();

        for entry in entries {
            let source = source.clone();
            let dest_dir = dest_dir.to_path_buf();
            transfers
                .spawn(async move {
                    worker::transfer_blob(source.as_ref(), &dest_dir, &entry.name).await
                })
                .await?;
        }

        log::info!("Now search items count to: {}", count);
    }

    log::debug!(
        "listing finished after {} pages, waiting for {} in-flight transfers",
        pager.pages(),
        transfers.in_flight()
    );
    let joined = transfers.join().await;

    let mut summary = joined.output;
    summary.listed = count;
    summary.abandoned = joined.failed;

    Ok(summary)
}
