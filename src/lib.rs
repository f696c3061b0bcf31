use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

pub mod blob;
pub mod cli;
pub mod config;
pub mod download;
mod logging;
pub mod prompt;
pub mod writer;

use blob::{BlobClient, BlobConfig, BlobSource, SharedKeyCredential};
use cli::Args;
use config::{Credentials, Mode, RunRequest, MISSING_CREDENTIALS_TIP};
use prompt::Prompter;

pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Run the selected mode against `source`.
pub async fn dispatch<S>(
    source: Arc<S>,
    mode: Mode,
    local_dir: &Path,
    concurrency: usize,
) -> AppResult<()>
where
    S: BlobSource + ?Sized + 'static,
{
    match mode {
        Mode::ListUrls => {
            let (path, lines) = writer::save_list_to_dir(source.as_ref(), local_dir).await?;
            log::info!("save URL list to {} finished ({} URLs).", path.display(), lines);
        }
        Mode::DownloadBlobs => {
            log::info!("Listing the blobs in the container:");
            let summary = download::download_all(source, local_dir, concurrency).await?;
            log::info!("Download finished: {}", summary);
        }
    }

    Ok(())
}

async fn execute(
    args: &Args,
    credential: SharedKeyCredential,
    request: RunRequest,
) -> AppResult<()> {
    let config = BlobConfig {
        account_name: credential.account_name().to_string(),
        container: request.container,
        service_domain: args.domain.clone(),
        endpoint: args.endpoint.clone(),
    };
    log::debug!("using container {}", config.container_url());

    let client = Arc::new(BlobClient::new(config, credential)?);
    dispatch(client, request.mode, &request.local_dir, args.concurrency).await
}

/// Command-line entry point
pub fn run() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = logging::init_logging(args.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    println!("####Blob Storage Quick Download Tool####");

    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(_) => {
            println!("{}", MISSING_CREDENTIALS_TIP);
            return ExitCode::FAILURE;
        }
    };
    let credential = match credentials.shared_key() {
        Ok(credential) => credential,
        Err(e) => {
            log::error!("Invalid credentials with error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let request = {
        let mut prompter = Prompter::new(io::stdin().lock(), io::stdout());
        match prompt::resolve_request(&args, &mut prompter) {
            Ok(request) => request,
            Err(e) => {
                log::error!("Failed to read input: {}", e);
                return ExitCode::FAILURE;
            }
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(&args, credential, request)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
