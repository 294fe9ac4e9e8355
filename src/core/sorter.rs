//! Depth-first traversal that sorts a source tree into buckets.
//!
//! The walk is strictly sequential: every filesystem call is awaited before
//! the next one starts, and a subdirectory is finished before its next
//! sibling is looked at.

use crate::cli::args::SortOptions;
use crate::core::bucket::bucket_name;
use crate::core::copy::{CopyOutcome, copy_into_bucket, ensure_directory};
use crate::error::{SortError, SortResult};
use crate::utility::helper::normalize_path;
use futures::future::{BoxFuture, FutureExt};
use std::fs::FileType;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Classification of a directory entry. Symbolic links are never followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
    Other,
}

impl EntryKind {
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_symlink() {
            EntryKind::Other
        } else if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortReport {
    pub directories_visited: usize,
    pub files_copied: usize,
    pub bytes_copied: u64,
    pub overwritten: usize,
    pub renamed: usize,
    pub backed_up: usize,
    pub skipped_existing: usize,
    pub skipped_other: usize,
}

impl SortReport {
    fn record(&mut self, outcome: &CopyOutcome) {
        match outcome {
            CopyOutcome::Copied { bytes } => {
                self.files_copied += 1;
                self.bytes_copied += bytes;
            }
            CopyOutcome::Overwritten { bytes } => {
                self.files_copied += 1;
                self.overwritten += 1;
                self.bytes_copied += bytes;
            }
            CopyOutcome::Renamed { bytes, .. } => {
                self.files_copied += 1;
                self.renamed += 1;
                self.bytes_copied += bytes;
            }
            CopyOutcome::BackedUp { bytes, .. } => {
                self.files_copied += 1;
                self.backed_up += 1;
                self.bytes_copied += bytes;
            }
            CopyOutcome::Skipped => self.skipped_existing += 1,
        }
    }
}

pub struct TreeSorter<'a> {
    options: &'a SortOptions,
    report: SortReport,
}

impl<'a> TreeSorter<'a> {
    pub fn new(options: &'a SortOptions) -> Self {
        Self {
            options,
            report: SortReport::default(),
        }
    }

    /// Sort every regular file below the configured source into buckets.
    pub async fn sort(mut self) -> SortResult<SortReport> {
        let source = self.options.source.clone();
        let meta = tokio::fs::metadata(&source)
            .await
            .map_err(|e| SortError::io("read", &source, e))?;
        if !meta.is_dir() {
            return Err(SortError::SourceNotDirectory(source));
        }

        info!(
            "sorting {} into {}",
            source.display(),
            self.options.destination.display()
        );
        self.walk(source).await?;
        info!(
            "copied {} files ({} bytes) from {} directories",
            self.report.files_copied, self.report.bytes_copied, self.report.directories_visited
        );
        Ok(self.report)
    }

    fn walk(&mut self, dir: PathBuf) -> BoxFuture<'_, SortResult<()>> {
        async move {
            self.report.directories_visited += 1;
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| SortError::io("read directory", &dir, e))?;

            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| SortError::io("read directory", &dir, e))?
            {
                let path = entry.path();
                let meta = tokio::fs::symlink_metadata(&path)
                    .await
                    .map_err(|e| SortError::io("read metadata of", &path, e))?;

                match EntryKind::from_file_type(meta.file_type()) {
                    EntryKind::Directory => {
                        if path == self.options.destination {
                            warn!(
                                "skipping destination folder {} inside the source",
                                path.display()
                            );
                            continue;
                        }
                        self.walk(path).await?;
                    }
                    EntryKind::File => self.sort_file(&path).await?,
                    EntryKind::Other => {
                        warn!("skipping {}: not a regular file", path.display());
                        self.report.skipped_other += 1;
                    }
                }
            }
            Ok(())
        }
        .boxed()
    }

    async fn sort_file(&mut self, path: &Path) -> SortResult<()> {
        let destination = &self.options.destination;
        ensure_directory(destination).await?;

        let bucket = bucket_name(path)?;
        // A "." bucket (dotfiles) normalizes to the destination root itself.
        let bucket_dir = normalize_path(&destination.join(&bucket));
        ensure_directory(&bucket_dir).await?;

        let outcome = copy_into_bucket(path, &bucket_dir, self.options.collision).await?;
        debug!("{} -> bucket '{}': {:?}", path.display(), bucket, outcome);
        self.report.record(&outcome);
        Ok(())
    }
}
