//! Paginated container listing

use super::error::ErrorClass;
use super::source::BlobSource;
use super::types::{BlobEntry, BlobResult, PageToken};

/// Walks a container listing one page at a time, following the service's
/// continuation marker until it reports no further pages.
pub struct Pager<'a, S: ?Sized> {
    source: &'a S,
    token: PageToken,
    pages: usize,
}

impl<'a, S: BlobSource + ?Sized> Pager<'a, S> {
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            token: PageToken::Start,
            pages: 0,
        }
    }

    /// Pages fetched so far.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// Fetch the next page of entries, or `None` once the listing is exhausted.
    ///
    /// An `AlreadyExists` failure ends the listing quietly; any other failure
    /// ends it with the error.
    pub async fn next_page(&mut self) -> BlobResult<Option<Vec<BlobEntry>>> {
        if self.token.is_done() {
            return Ok(None);
        }

        match self.source.list_segment(&self.token).await {
            Ok(segment) => {
                self.pages += 1;
                self.token = segment.next;
                log::debug!(
                    "listed page {} with {} blobs, more pages: {}",
                    self.pages,
                    segment.entries.len(),
                    !self.token.is_done()
                );
                Ok(Some(segment.entries))
            }
            Err(e) if e.class() == ErrorClass::AlreadyExists => {
                log::info!("Received 409. Resource already exists: {}", e);
                self.token = PageToken::Done;
                Ok(None)
            }
            Err(e) => {
                self.token = PageToken::Done;
                Err(e)
            }
        }
    }
}

/// List every blob in the container
pub async fn list_all_blobs<S: BlobSource + ?Sized>(source: &S) -> BlobResult<Vec<BlobEntry>> {
    let mut pager = Pager::new(source);
    let mut all_entries = Vec::new();

    while let Some(entries) = pager.next_page().await? {
        all_entries.extend(entries);
    }

    Ok(all_entries)
}
