//! Download outcome types

use crate::blob::StorageError;
use fanout::FanOutError;
use std::fmt;
use thiserror::Error;

/// Maximum concurrent blob downloads unless overridden on the command line
pub const DEFAULT_CONCURRENCY: usize = 32;

/// Outcome of one blob transfer
#[derive(Debug)]
pub enum TransferResult {
    Success { name: String, bytes: u64 },
    /// The local file could not be created or opened.
    LocalIoError { name: String, error: String },
    /// The blob could not be fetched or written out.
    RemoteTransferError { name: String, error: StorageError },
}

impl TransferResult {
    pub fn name(&self) -> &str {
        match self {
            TransferResult::Success { name, .. }
            | TransferResult::LocalIoError { name, .. }
            | TransferResult::RemoteTransferError { name, .. } => name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferResult::Success { .. })
    }
}

/// Totals reported once every transfer has finished
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadSummary {
    pub listed: usize,
    pub succeeded: usize,
    pub local_failures: usize,
    pub remote_failures: usize,
    /// Tasks that panicked instead of reporting a result.
    pub abandoned: usize,
    pub bytes: u64,
}

impl DownloadSummary {
    pub(crate) fn record(&mut self, result: &TransferResult) {
        match result {
            TransferResult::Success { bytes, .. } => {
                self.succeeded += 1;
                self.bytes += bytes;
            }
            TransferResult::LocalIoError { .. } => self.local_failures += 1,
            TransferResult::RemoteTransferError { .. } => self.remote_failures += 1,
        }
    }

    pub fn failed(&self) -> usize {
        self.local_failures + self.remote_failures + self.abandoned
    }
}

impl fmt::Display for DownloadSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "listed {} blobs, downloaded {} ({} bytes), failed {}",
            self.listed,
            self.succeeded,
            self.bytes,
            self.failed()
        )
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Gate(#[from] FanOutError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = DownloadSummary {
            listed: 4,
            ..Default::default()
        };
        summary.record(&TransferResult::Success {
            name: "a".to_string(),
            bytes: 10,
        });
        summary.record(&TransferResult::Success {
            name: "b".to_string(),
            bytes: 5,
        });
        summary.record(&TransferResult::LocalIoError {
            name: "c".to_string(),
            error: "permission denied".to_string(),
        });
        summary.record(&TransferResult::RemoteTransferError {
            name: "d".to_string(),
            error: StorageError::service(500, "InternalError", "boom"),
        });

        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.bytes, 15);
        assert_eq!(summary.failed(), 2);
        assert_eq!(
            summary.to_string(),
            "listed 4 blobs, downloaded 2 (15 bytes), failed 2"
        );
    }
}
