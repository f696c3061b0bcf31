use super::types::{BlobResult, BlobSegment, PageToken};
use async_trait::async_trait;
use tokio::fs::File;

/// A container the lister, writer and downloader can read from.
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Fetch the page of the flat listing that `token` points at.
    async fn list_segment(&self, token: &PageToken) -> BlobResult<BlobSegment>;

    /// Write the full content of blob `name` into `file`, returning the byte count.
    async fn download_to_file(&self, name: &str, file: &mut File) -> BlobResult<u64>;

    /// Public URL of blob `name`.
    fn blob_url(&self, name: &str) -> String;
}
