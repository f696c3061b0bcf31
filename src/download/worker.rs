//! Download worker - one blob from the container to one local file

use crate::blob::BlobSource;
use std::path::{Component, Path, PathBuf};
use tokio::fs::OpenOptions;

use super::types::TransferResult;

/// Local path for blob `name` under `dest_dir`. Names that would climb out of
/// `dest_dir` (absolute paths, `..`) have no local path.
pub(crate) fn local_path_for(dest_dir: &Path, name: &str) -> Option<PathBuf> {
    let mut path = dest_dir.to_path_buf();
    let mut pushed = false;

    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => {
                path.push(part);
                pushed = true;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    pushed.then_some(path)
}

fn local_failure(name: &str, error: String) -> TransferResult {
    log::warn!("open file err: {}", error);
    log::warn!("\tBlob name: {} - failed", name);
    TransferResult::LocalIoError {
        name: name.to_string(),
        error,
    }
}

/// Download blob `name` into `dest_dir`, creating parent directories and
/// truncating any existing file. Failures are logged and reported, never raised.
pub(crate) async fn transfer_blob<S: BlobSource + ?Sized>(
    source: &S,
    dest_dir: &Path,
    name: &str,
) -> TransferResult {
    let Some(destination) = local_path_for(dest_dir, name) else {
        return local_failure(name, "blob name escapes the destination directory".to_string());
    };

    // Folder placeholder (`x/`): nothing to fetch, and a file named `x` would
    // block every blob below it.
    if name.ends_with('/') {
        if let Err(e) = tokio::fs::create_dir_all(&destination).await {
            let error = format!("failed to create {}: {}", destination.display(), e);
            return local_failure(name, error);
        }
        log::info!("\tBlob name: {} - success", name);
        return TransferResult::Success {
            name: name.to_string(),
            bytes: 0,
        };
    }

    if let Some(parent) = destination.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return local_failure(name, format!("failed to create {}: {}", parent.display(), e));
        }
    }

    let mut file = match OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(true)
        .open(&destination)
        .await
    {
        Ok(file) => file,
        Err(e) => {
            return local_failure(name, format!("failed to open {}: {}", destination.display(), e))
        }
    };

    let result = source.download_to_file(name, &mut file).await;
    drop(file);

    match result {
        Ok(bytes) => {
            log::info!("\tBlob name: {} - success", name);
            TransferResult::Success {
                name: name.to_string(),
                bytes,
            }
        }
        Err(error) => {
            log::warn!("downloading err {}", error);
            log::warn!("\tBlob name: {} - failed", name);
            TransferResult::RemoteTransferError {
                name: name.to_string(),
                error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::memory::MemorySource;

    #[test]
    fn local_paths_stay_inside_destination() {
        let dir = Path::new("/data/out");
        assert_eq!(local_path_for(dir, "a.txt"), Some(dir.join("a.txt")));
        assert_eq!(local_path_for(dir, "b/c.txt"), Some(dir.join("b").join("c.txt")));
        assert_eq!(local_path_for(dir, "./b//c.txt"), Some(dir.join("b").join("c.txt")));
        assert_eq!(local_path_for(dir, "../escape.txt"), None);
        assert_eq!(local_path_for(dir, "b/../../escape.txt"), None);
        assert_eq!(local_path_for(dir, "/etc/passwd"), None);
        assert_eq!(local_path_for(dir, ""), None);
    }

    #[tokio::test]
    async fn overwrites_existing_file_with_blob_content() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"stale content that is longer").unwrap();

        let source = MemorySource::with_blobs(&[("a.txt", b"fresh".to_vec())], 10);
        let result = transfer_blob(&source, dir.path(), "a.txt").await;

        assert!(result.is_success());
        assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"fresh");
    }

    #[tokio::test]
    async fn remote_failure_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let source =
            MemorySource::with_blobs(&[("x.bin", vec![1, 2, 3])], 10).fail_download("x.bin");

        match transfer_blob(&source, dir.path(), "x.bin").await {
            TransferResult::RemoteTransferError { name, error } => {
                assert_eq!(name, "x.bin");
                assert_eq!(error.class(), crate::blob::ErrorClass::Transient);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn directory_marker_creates_a_directory_without_downloading() {
        let dir = tempfile::tempdir().unwrap();
        let source =
            MemorySource::with_blobs(&[("x/", Vec::new()), ("x/y.txt", b"y".to_vec())], 10);

        let marker = transfer_blob(&source, dir.path(), "x/").await;
        assert!(matches!(marker, TransferResult::Success { bytes: 0, .. }));
        assert!(dir.path().join("x").is_dir());
        assert_eq!(source.downloads(), 0);

        let child = transfer_blob(&source, dir.path(), "x/y.txt").await;
        assert!(child.is_success());
        assert_eq!(std::fs::read(dir.path().join("x/y.txt")).unwrap(), b"y");
    }

    #[tokio::test]
    async fn directory_marker_after_its_child_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let source =
            MemorySource::with_blobs(&[("x/y.txt", b"y".to_vec()), ("x/", Vec::new())], 10);

        assert!(transfer_blob(&source, dir.path(), "x/y.txt").await.is_success());
        assert!(transfer_blob(&source, dir.path(), "x/").await.is_success());
        assert_eq!(std::fs::read(dir.path().join("x/y.txt")).unwrap(), b"y");
    }

    #[tokio::test]
    async fn escaping_name_is_a_local_failure() {
        let dir = tempfile::tempdir().unwrap();
        let source = MemorySource::with_blobs(&[("../up.txt", vec![1])], 10);

        let result = transfer_blob(&source, dir.path(), "../up.txt").await;
        assert!(matches!(result, TransferResult::LocalIoError { .. }));
        assert_eq!(source.downloads(), 0);
    }
}
