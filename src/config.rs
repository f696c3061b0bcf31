//! Run configuration: credentials from the environment and the chosen mode

use crate::blob::SharedKeyCredential;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub const ACCOUNT_ENV: &str = "AZURE_STORAGE_ACCOUNT";
pub const ACCESS_KEY_ENV: &str = "AZURE_STORAGE_ACCESS_KEY";

/// Printed when either credential variable is missing.
pub const MISSING_CREDENTIALS_TIP: &str = r#"
Either the AZURE_STORAGE_ACCOUNT or AZURE_STORAGE_ACCESS_KEY environment variable is not set
### Environment variable to set

export AZURE_STORAGE_ACCOUNT="<youraccountname>"

export AZURE_STORAGE_ACCESS_KEY="<youraccountkey>""#;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("either the AZURE_STORAGE_ACCOUNT or AZURE_STORAGE_ACCESS_KEY environment variable is not set")]
    MissingCredentials,
    #[error("invalid credentials: {0}")]
    InvalidKey(#[from] base64::DecodeError),
}

/// Storage account name and access key.
#[derive(Clone)]
pub struct Credentials {
    pub account_name: String,
    account_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_name", &self.account_name)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read both variables through `lookup`; empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let account_name = lookup(ACCOUNT_ENV).filter(|v| !v.is_empty());
        let account_key = lookup(ACCESS_KEY_ENV).filter(|v| !v.is_empty());

        match (account_name, account_key) {
            (Some(account_name), Some(account_key)) => Ok(Self {
                account_name,
                account_key,
            }),
            _ => Err(ConfigError::MissingCredentials),
        }
    }

    pub fn shared_key(&self) -> Result<SharedKeyCredential, ConfigError> {
        Ok(SharedKeyCredential::new(
            &self.account_name,
            &self.account_key,
        )?)
    }
}

/// What to do with the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    /// Append every blob URL to `bloblist.txt`.
    ListUrls,
    /// Download every blob.
    DownloadBlobs,
}

impl Mode {
    /// Interactive selector: exactly `2` lists URLs, anything else downloads.
    /// Only the line ending is dropped; surrounding spaces select download.
    pub fn from_selector(input: &str) -> Self {
        if input.trim_end_matches(['\r', '\n']) == "2" {
            Mode::ListUrls
        } else {
            Mode::DownloadBlobs
        }
    }
}

/// The three answers the front-end collects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub container: String,
    pub local_dir: PathBuf,
    pub mode: Mode,
}
