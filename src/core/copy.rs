use crate::cli::args::CollisionPolicy;
use crate::error::{SortError, SortResult};
use crate::utility::backup::{create_backup, generate_backup_path, generate_numbered_name};
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info};

/// What happened to a single file copied into a bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { bytes: u64 },
    Overwritten { bytes: u64 },
    Renamed { destination: PathBuf, bytes: u64 },
    BackedUp { backup: PathBuf, bytes: u64 },
    Skipped,
}

/// Create `path` if it is missing. Only one level is created; a missing
/// parent is an error.
pub async fn ensure_directory(path: &Path) -> SortResult<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => return Err(SortError::NotADirectory(path.to_path_buf())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(SortError::io("inspect directory", path, e)),
    }
    match tokio::fs::create_dir(path).await {
        Ok(()) => {
            debug!("created directory {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(SortError::io("create directory", path, e)),
    }
}

/// Copy `source` into `bucket_dir` under its own file name.
///
/// `bucket_dir` must already exist. Only the byte content is copied.
pub async fn copy_into_bucket(
    source: &Path,
    bucket_dir: &Path,
    policy: CollisionPolicy,
) -> SortResult<CopyOutcome> {
    let file_name = source.file_name().ok_or_else(|| {
        SortError::io(
            "copy",
            source,
            io::Error::new(io::ErrorKind::InvalidInput, "Invalid source path"),
        )
    })?;
    let destination = bucket_dir.join(file_name);

    let exists = tokio::fs::try_exists(&destination)
        .await
        .map_err(|e| SortError::io("inspect", &destination, e))?;
    if !exists {
        let bytes = copy_contents(source, &destination).await?;
        return Ok(CopyOutcome::Copied { bytes });
    }
    if is_same_file(source, &destination).await? {
        return Err(SortError::SameFile(destination));
    }

    match policy {
        CollisionPolicy::Overwrite => {
            let bytes = copy_contents(source, &destination).await?;
            info!("overwrote {}", destination.display());
            Ok(CopyOutcome::Overwritten { bytes })
        }
        CollisionPolicy::Skip => {
            info!("kept existing {}", destination.display());
            Ok(CopyOutcome::Skipped)
        }
        CollisionPolicy::Rename => {
            let renamed = generate_numbered_name(&destination)
                .await
                .map_err(|e| SortError::io("pick a free name for", &destination, e))?;
            let bytes = copy_contents(source, &renamed).await?;
            info!(
                "{} exists, copied as {}",
                destination.display(),
                renamed.display()
            );
            Ok(CopyOutcome::Renamed {
                destination: renamed,
                bytes,
            })
        }
        CollisionPolicy::Backup => {
            let backup = generate_backup_path(&destination)
                .await
                .map_err(|e| SortError::io("pick a backup name for", &destination, e))?;
            create_backup(&destination, &backup)
                .await
                .map_err(|e| SortError::io("back up", &destination, e))?;
            let bytes = copy_contents(source, &destination).await?;
            info!(
                "backed up {} to {}",
                destination.display(),
                backup.display()
            );
            Ok(CopyOutcome::BackedUp { backup, bytes })
        }
        CollisionPolicy::Fail => Err(SortError::Collision(destination)),
    }
}

async fn is_same_file(source: &Path, destination: &Path) -> SortResult<bool> {
    let source = tokio::fs::canonicalize(source)
        .await
        .map_err(|e| SortError::io("resolve", source, e))?;
    let destination = tokio::fs::canonicalize(destination)
        .await
        .map_err(|e| SortError::io("resolve", destination, e))?;
    Ok(source == destination)
}

async fn copy_contents(source: &Path, destination: &Path) -> SortResult<u64> {
    let src_file = tokio::fs::File::open(source)
        .await
        .map_err(|e| SortError::io("open", source, e))?;
    let file_size = src_file
        .metadata()
        .await
        .map_err(|e| SortError::io("read metadata of", source, e))?
        .len();
    let dest_file = tokio::fs::File::create(destination)
        .await
        .map_err(|e| SortError::io("create", destination, e))?;

    let buffer_size: usize = if file_size < 1024 * 1024 {
        64 * 1024
    } else if file_size < 64 * 1024 * 1024 {
        512 * 1024
    } else {
        2 * 1024 * 1024
    };

    let mut src_file = tokio::io::BufReader::with_capacity(buffer_size, src_file);
    let mut dest_file = tokio::io::BufWriter::with_capacity(buffer_size, dest_file);
    let mut buffer = vec![0u8; buffer_size];
    let mut total = 0u64;

    loop {
        let bytes_read = src_file
            .read(&mut buffer)
            .await
            .map_err(|e| SortError::io("read", source, e))?;
        if bytes_read == 0 {
            break;
        }
        dest_file
            .write_all(&buffer[..bytes_read])
            .await
            .map_err(|e| SortError::io("write", destination, e))?;
        total += bytes_read as u64;
    }
    dest_file
        .flush()
        .await
        .map_err(|e| SortError::io("write", destination, e))?;
    debug!("copied {} -> {}", source.display(), destination.display());
    Ok(total)
}

/// Remove `path` and everything below it. A missing path is not an error.
pub async fn delete_tree(path: &Path) -> SortResult<()> {
    let meta = match tokio::fs::symlink_metadata(path).await {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(SortError::Delete {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let result = if meta.is_dir() {
        tokio::fs::remove_dir_all(path).await
    } else {
        tokio::fs::remove_file(path).await
    };
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SortError::Delete {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("Report.txt");
        fs::write(&source, b"new content").unwrap();
        let bucket = temp_dir.path().join("r");
        fs::create_dir(&bucket).unwrap();
        (temp_dir, source, bucket)
    }

    #[tokio::test]
    async fn test_ensure_directory_creates_and_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("dist");

        ensure_directory(&dir).await.unwrap();
        assert!(dir.is_dir());
        ensure_directory(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_ensure_directory_does_not_create_parents() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("missing").join("dist");

        let result = ensure_directory(&dir).await;
        assert!(matches!(result, Err(SortError::Io { .. })));
        assert!(!temp_dir.path().join("missing").exists());
    }

    #[tokio::test]
    async fn test_ensure_directory_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("dist");
        fs::write(&file, b"not a dir").unwrap();

        let result = ensure_directory(&file).await;
        assert!(matches!(result, Err(SortError::NotADirectory(_))));
    }

    #[tokio::test]
    async fn test_copy_into_empty_bucket() {
        let (_temp_dir, source, bucket) = setup();

        let outcome = copy_into_bucket(&source, &bucket, CollisionPolicy::Overwrite)
            .await
            .unwrap();
        assert_eq!(outcome, CopyOutcome::Copied { bytes: 11 });
        assert_eq!(fs::read(bucket.join("Report.txt")).unwrap(), b"new content");
    }

    #[tokio::test]
    async fn test_copy_preserves_binary_content() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("blob.bin");
        let data: Vec<u8> = (0..=255).cycle().take(200 * 1024).collect();
        fs::write(&source, &data).unwrap();
        let bucket = temp_dir.path().join("b");
        fs::create_dir(&bucket).unwrap();

        copy_into_bucket(&source, &bucket, CollisionPolicy::Overwrite)
            .await
            .unwrap();
        assert_eq!(fs::read(bucket.join("blob.bin")).unwrap(), data);
    }

    #[tokio::test]
    async fn test_collision_overwrite() {
        let (_temp_dir, source, bucket) = setup();
        fs::write(bucket.join("Report.txt"), b"old and longer content").unwrap();

        let outcome = copy_into_bucket(&source, &bucket, CollisionPolicy::Overwrite)
            .await
            .unwrap();
        assert_eq!(outcome, CopyOutcome::Overwritten { bytes: 11 });
        assert_eq!(fs::read(bucket.join("Report.txt")).unwrap(), b"new content");
    }

    #[tokio::test]
    async fn test_collision_skip() {
        let (_temp_dir, source, bucket) = setup();
        fs::write(bucket.join("Report.txt"), b"old").unwrap();

        let outcome = copy_into_bucket(&source, &bucket, CollisionPolicy::Skip)
            .await
            .unwrap();
        assert_eq!(outcome, CopyOutcome::Skipped);
        assert_eq!(fs::read(bucket.join("Report.txt")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_collision_rename() {
        let (_temp_dir, source, bucket) = setup();
        fs::write(bucket.join("Report.txt"), b"old").unwrap();

        let outcome = copy_into_bucket(&source, &bucket, CollisionPolicy::Rename)
            .await
            .unwrap();
        let expected = bucket.join("Report~1.txt");
        assert_eq!(
            outcome,
            CopyOutcome::Renamed {
                destination: expected.clone(),
                bytes: 11
            }
        );
        assert_eq!(fs::read(bucket.join("Report.txt")).unwrap(), b"old");
        assert_eq!(fs::read(expected).unwrap(), b"new content");
    }

    #[tokio::test]
    async fn test_collision_backup() {
        let (_temp_dir, source, bucket) = setup();
        fs::write(bucket.join("Report.txt"), b"old").unwrap();

        let outcome = copy_into_bucket(&source, &bucket, CollisionPolicy::Backup)
            .await
            .unwrap();
        let backup = bucket.join("Report.txt~");
        assert_eq!(
            outcome,
            CopyOutcome::BackedUp {
                backup: backup.clone(),
                bytes: 11
            }
        );
        assert_eq!(fs::read(backup).unwrap(), b"old");
        assert_eq!(fs::read(bucket.join("Report.txt")).unwrap(), b"new content");
    }

    #[tokio::test]
    async fn test_collision_fail() {
        let (_temp_dir, source, bucket) = setup();
        fs::write(bucket.join("Report.txt"), b"old").unwrap();

        let result = copy_into_bucket(&source, &bucket, CollisionPolicy::Fail).await;
        assert!(matches!(result, Err(SortError::Collision(_))));
        assert_eq!(fs::read(bucket.join("Report.txt")).unwrap(), b"old");
    }

    #[tokio::test]
    async fn test_copy_onto_itself_keeps_content() {
        let temp_dir = TempDir::new().unwrap();
        let bucket = temp_dir.path().join("a");
        fs::create_dir(&bucket).unwrap();
        let source = bucket.join("apple.txt");
        fs::write(&source, b"precious data").unwrap();

        for policy in [CollisionPolicy::Overwrite, CollisionPolicy::Backup] {
            let result = copy_into_bucket(&source, &bucket, policy).await;
            assert!(matches!(result, Err(SortError::SameFile(_))));
            assert_eq!(fs::read(&source).unwrap(), b"precious data");
        }
        assert!(!bucket.join("apple.txt~").exists());
    }

    #[tokio::test]
    async fn test_copy_missing_source_is_error() {
        let (temp_dir, _source, bucket) = setup();
        let missing = temp_dir.path().join("Ghost.txt");

        let result = copy_into_bucket(&missing, &bucket, CollisionPolicy::Overwrite).await;
        assert!(matches!(result, Err(SortError::Io { .. })));
    }

    #[tokio::test]
    async fn test_delete_tree_removes_nested() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src");
        fs::create_dir_all(src.join("b/c")).unwrap();
        fs::write(src.join("A.txt"), b"a").unwrap();
        fs::write(src.join("b/c/C.txt"), b"c").unwrap();

        delete_tree(&src).await.unwrap();
        assert!(!src.exists());
    }

    #[tokio::test]
    async fn test_delete_tree_missing_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        delete_tree(&temp_dir.path().join("nothing")).await.unwrap();
    }
}
