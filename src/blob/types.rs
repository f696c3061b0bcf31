//! Blob types and container addressing

use super::error::StorageError;

pub type BlobResult<T> = Result<T, StorageError>;

/// Default blob service domain; accounts live at `https://{account}.{domain}`.
pub const DEFAULT_SERVICE_DOMAIN: &str = "blob.core.chinacloudapi.cn";

/// Everything needed to address a container. Passed explicitly to every
/// component that builds URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobConfig {
    pub account_name: String,
    pub container: String,
    pub service_domain: String,
    /// Path-style base URL used instead of `https://{account}.{domain}`,
    /// e.g. `http://127.0.0.1:10000/devstoreaccount1` for an emulator.
    pub endpoint: Option<String>,
}

impl BlobConfig {
    pub fn new(account_name: &str, container: &str) -> Self {
        Self {
            account_name: account_name.to_string(),
            container: container.to_string(),
            service_domain: DEFAULT_SERVICE_DOMAIN.to_string(),
            endpoint: None,
        }
    }

    fn base_url(&self) -> String {
        match self.endpoint.as_deref().map(|e| e.trim().trim_end_matches('/')) {
            Some(endpoint) if !endpoint.is_empty() => endpoint.to_string(),
            _ => format!("https://{}.{}", self.account_name, self.service_domain),
        }
    }

    pub fn container_url(&self) -> String {
        format!("{}/{}", self.base_url(), self.container)
    }

    pub fn blob_url(&self, name: &str) -> String {
        format!("{}/{}", self.container_url(), encode_blob_path(name))
    }
}

/// Encode a blob name for use in a URL path - each segment individually,
/// keeping `/` as the separator
pub fn encode_blob_path(name: &str) -> String {
    name.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// The parts a public blob URL is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobAddress {
    pub account_name: String,
    pub container: String,
    pub blob: String,
}

/// Split `https://{account}.{domain}/{container}/{blob}` back into its parts.
pub fn parse_blob_url(url: &str, service_domain: &str) -> Option<BlobAddress> {
    let rest = url.strip_prefix("https://")?;
    let (host, path) = rest.split_once('/')?;
    let account = host.strip_suffix(service_domain)?.strip_suffix('.')?;
    let (container, blob) = path.split_once('/')?;

    if account.is_empty() || container.is_empty() || blob.is_empty() {
        return None;
    }

    Some(BlobAddress {
        account_name: account.to_string(),
        container: container.to_string(),
        blob: urlencoding::decode(blob).ok()?.into_owned(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobEntry {
    pub name: String,
}

impl BlobEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Continuation state of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// No request made yet.
    Start,
    /// Marker returned by the service, sent back verbatim.
    Continue(String),
    /// The service reported no further pages.
    Done,
}

impl PageToken {
    /// Token for the page after one whose `NextMarker` was `next_marker`.
    pub fn from_next_marker(next_marker: Option<String>) -> Self {
        match next_marker {
            Some(marker) if !marker.is_empty() => PageToken::Continue(marker),
            _ => PageToken::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, PageToken::Done)
    }

    pub fn marker(&self) -> Option<&str> {
        match self {
            PageToken::Continue(marker) => Some(marker),
            _ => None,
        }
    }
}

/// One page of a container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobSegment {
    pub entries: Vec<BlobEntry>,
    pub next: PageToken,
}
