//! Blob module - container listing and blob transfer over the storage REST API
//!
//! This module is organized into submodules:
//! - `types`: Container addressing, entries and page tokens
//! - `error`: Storage errors and their classification
//! - `signing`: Shared-key request signing
//! - `xml`: Listing and error body parsing
//! - `source`: The `BlobSource` trait the rest of the crate works against
//! - `client`: The HTTP-backed `BlobSource`
//! - `list`: Paginated listing

mod client;
mod error;
mod list;
mod signing;
mod source;
mod types;
mod xml;

#[cfg(test)]
pub(crate) mod memory;

// Re-export types
pub use types::{
    encode_blob_path, parse_blob_url, BlobAddress, BlobConfig, BlobEntry, BlobResult,
    BlobSegment, PageToken, DEFAULT_SERVICE_DOMAIN,
};

// Re-export errors
pub use error::{classify_service, ErrorClass, StorageError};

// Re-export signing
pub use signing::{SharedKeyCredential, API_VERSION};

// Re-export the source seam and its HTTP implementation
pub use client::BlobClient;
pub use source::BlobSource;

// Re-export list operations
pub use list::{list_all_blobs, Pager};
