use crate::blob::DEFAULT_SERVICE_DOMAIN;
use crate::config::Mode;
use crate::download::DEFAULT_CONCURRENCY;
use clap::builder::RangedU64ValueParser;
use clap::Parser;
use std::path::PathBuf;

/// blobdl - list or download every blob in a storage container
///
/// Credentials are read from AZURE_STORAGE_ACCOUNT and AZURE_STORAGE_ACCESS_KEY.
/// Anything not given as a flag is asked for interactively.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// The container to read blobs from
    #[arg(long)]
    pub container: Option<String>,
    /// The local directory to save into
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Whether to download blobs or only save their URLs
    #[arg(long, value_enum)]
    pub mode: Option<Mode>,
    /// The number of blobs downloaded at the same time
    #[arg(
        long,
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub concurrency: usize,
    /// Blob service domain; accounts are reached at https://{account}.{domain}
    #[arg(long, env = "AZURE_STORAGE_DOMAIN", default_value = DEFAULT_SERVICE_DOMAIN)]
    pub domain: String,
    /// Path-style endpoint used instead of the account host (e.g. a local emulator)
    #[arg(long)]
    pub endpoint: Option<String>,
    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}
