//! In-memory `BlobSource` for tests

use super::error::StorageError;
use super::source::BlobSource;
use super::types::{BlobConfig, BlobEntry, BlobResult, BlobSegment, PageToken};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub(crate) struct MemorySource {
    config: BlobConfig,
    pages: Vec<Vec<String>>,
    contents: HashMap<String, Vec<u8>>,
    failing: HashSet<String>,
    list_failure: Option<(usize, u16, &'static str)>,
    delay: Duration,
    list_calls: AtomicUsize,
    active: AtomicUsize,
    peak: AtomicUsize,
    downloads: AtomicUsize,
}

impl MemorySource {
    /// Blobs whose content is their own name, split into pages of `page_size`.
    pub(crate) fn with_names(names: &[String], page_size: usize) -> Self {
        let blobs: Vec<(&str, Vec<u8>)> = names
            .iter()
            .map(|n| (n.as_str(), n.as_bytes().to_vec()))
            .collect();
        Self::with_blobs(&blobs, page_size)
    }

    pub(crate) fn with_blobs(blobs: &[(&str, Vec<u8>)], page_size: usize) -> Self {
        let pages = blobs
            .chunks(page_size.max(1))
            .map(|chunk| chunk.iter().map(|(name, _)| name.to_string()).collect())
            .collect();
        let contents = blobs
            .iter()
            .map(|(name, body)| (name.to_string(), body.clone()))
            .collect();

        Self {
            config: BlobConfig::new("acct", "container"),
            pages,
            contents,
            failing: HashSet::new(),
            list_failure: None,
            delay: Duration::ZERO,
            list_calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
        }
    }

    pub(crate) fn fail_download(mut self, name: &str) -> Self {
        self.failing.insert(name.to_string());
        self
    }

    pub(crate) fn fail_listing_at(mut self, page: usize, status: u16, code: &'static str) -> Self {
        self.list_failure = Some((page, status, code));
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn config(&self) -> &BlobConfig {
        &self.config
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Most downloads observed running at the same time.
    pub(crate) fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobSource for MemorySource {
    async fn list_segment(&self, token: &PageToken) -> BlobResult<BlobSegment> {
        let index = match token {
            PageToken::Start => 0,
            PageToken::Continue(marker) => marker
                .parse::<usize>()
                .map_err(|_| StorageError::Malformed(format!("unknown marker {}", marker)))?,
            PageToken::Done => {
                return Err(StorageError::Malformed("listing already finished".to_string()))
            }
        };
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        if let Some((page, status, code)) = self.list_failure {
            if page == index {
                return Err(StorageError::service(status, code, "injected listing failure"));
            }
        }

        let entries = self
            .pages
            .get(index)
            .map(|names| names.iter().map(BlobEntry::new).collect())
            .unwrap_or_default();
        let next = if index + 1 < self.pages.len() {
            PageToken::Continue((index + 1).to_string())
        } else {
            PageToken::Done
        };

        Ok(BlobSegment { entries, next })
    }

    async fn download_to_file(&self, name: &str, file: &mut File) -> BlobResult<u64> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.downloads.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = match self.contents.get(name) {
            _ if self.failing.contains(name) => Err(StorageError::service(
                500,
                "InternalError",
                "injected transfer failure",
            )),
            Some(body) => match file.write_all(body).await {
                Ok(()) => file.flush().await.map(|()| body.len() as u64).map_err(Into::into),
                Err(e) => Err(e.into()),
            },
            None => Err(StorageError::service(404, "BlobNotFound", "no such blob")),
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn blob_url(&self, name: &str) -> String {
        self.config.blob_url(name)
    }
}
