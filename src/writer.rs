//! URL list output: one public blob URL per line

use crate::blob::{BlobResult, BlobSource, Pager};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// File the URL list is appended to inside the chosen directory
pub const URL_LIST_FILE: &str = "bloblist.txt";

/// Append `<url>\n` for every blob in `source` to `out`. Returns the number of
/// lines written.
pub async fn save_list<S, W>(source: &S, out: &mut W) -> BlobResult<usize>
where
    S: BlobSource + ?Sized,
    W: AsyncWrite + Unpin,
{
    let mut pager = Pager::new(source);
    let mut lines = 0usize;

    while let Some(entries) = pager.next_page().await? {
        for entry in entries {
            let line = format!("{}\n", source.blob_url(&entry.name));
            out.write_all(line.as_bytes()).await?;
            log::debug!("{} {} bytes", line.trim_end(), line.len());
            lines += 1;
        }
    }
    out.flush().await?;

    Ok(lines)
}

/// Append the URL list to `dir/bloblist.txt`, creating `dir` if needed.
/// Re-running appends another copy of the list.
pub async fn save_list_to_dir<S>(source: &S, dir: &Path) -> BlobResult<(PathBuf, usize)>
where
    S: BlobSource + ?Sized,
{
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(URL_LIST_FILE);

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .await?;
    let lines = save_list(source, &mut file).await?;

    Ok((path, lines))
}
