//! Local submission storage
//!
//! Layout: `<root>/<YYYY-MM-DD>/<student id>/<file name>`. Writes overwrite,
//! nothing is ever deleted.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::checksum::crc32_path;
use crate::error::StorageError;

/// A file written to the submission tree
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub path: PathBuf,
    pub size: usize,
    /// CRC-32 of the bytes read back from disk
    pub checksum: u32,
}

/// Filesystem-backed submission store
#[derive(Debug, Clone)]
pub struct SubmissionStore {
    root: PathBuf,
}

impl SubmissionStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one student's files for one day
    pub fn student_dir(&self, date: NaiveDate, student_id: &str) -> PathBuf {
        self.root
            .join(date.format("%Y-%m-%d").to_string())
            .join(student_id)
    }

    /// Write `data` as `file_name` and checksum what landed on disk.
    ///
    /// `file_name` must already be sanitized.
    pub async fn store(
        &self,
        date: NaiveDate,
        student_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<StoredFile, StorageError> {
        let dir = self.student_dir(date, student_id);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|source| StorageError::CreateDir {
                path: dir.clone(),
                source,
            })?;

        let path = dir.join(file_name);
        tokio::fs::write(&path, data)
            .await
            .map_err(|source| StorageError::Write {
                path: path.clone(),
                source,
            })?;

        let checksum = crc32_path(&path)
            .await
            .map_err(|source| StorageError::Read {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %path.display(),
            size = data.len(),
            "Submission written"
        );

        Ok(StoredFile {
            path,
            size: data.len(),
            checksum,
        })
    }
}
