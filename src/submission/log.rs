//! Append-only submission log

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::checksum::format_checksum;
use crate::error::LogError;

/// One successful submission
#[derive(Debug, Clone)]
pub struct SubmissionRecord {
    pub student_id: String,
    pub file_name: String,
    pub submitted_at: NaiveDateTime,
    pub checksum: u32,
}

impl SubmissionRecord {
    /// Log line, without the trailing newline
    pub fn log_line(&self) -> String {
        format!(
            "Student [[{}]] submitted [[{}]] at [[{}]], CRC32 [[{}]]",
            self.student_id,
            self.file_name,
            self.submitted_at.format("%Y-%m-%d %H:%M:%S%.6f"),
            format_checksum(self.checksum),
        )
    }
}

/// Shared handle to the submission log file
#[derive(Clone)]
pub struct SubmissionLog {
    inner: Arc<SubmissionLogInner>,
}

struct SubmissionLogInner {
    path: PathBuf,
    file: Mutex<File>,
}

impl SubmissionLog {
    /// Open (or create) the log for appending
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, LogError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| LogError::Open {
                    path: path.clone(),
                    source,
                })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            inner: Arc::new(SubmissionLogInner {
                path,
                file: Mutex::new(file),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Append one record. Lines from concurrent requests never interleave.
    pub async fn append(&self, record: &SubmissionRecord) -> Result<(), LogError> {
        let mut line = record.log_line();
        line.push('\n');

        let mut file = self.inner.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn record(file_name: &str) -> SubmissionRecord {
        SubmissionRecord {
            student_id: "12345678901".to_string(),
            file_name: file_name.to_string(),
            submitted_at: NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_micro_opt(14, 5, 9, 42)
                .unwrap(),
            checksum: 0x3610A686,
        }
    }

    #[test]
    fn test_log_line_format() {
        assert_eq!(
            record("report.pdf").log_line(),
            "Student [[12345678901]] submitted [[report.pdf]] at [[2024-03-07 14:05:09.000042]], CRC32 [[0x3610A686]]"
        );
    }

    #[tokio::test]
    async fn test_append_only() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logs/submission.log");

        let log = SubmissionLog::open(&path).await.unwrap();
        log.append(&record("a.txt")).await.unwrap();
        log.append(&record("b.txt")).await.unwrap();

        // Reopening must not truncate
        let reopened = SubmissionLog::open(&path).await.unwrap();
        reopened.append(&record("c.txt")).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("[[a.txt]]"));
        assert!(lines[2].contains("[[c.txt]]"));
    }

    #[tokio::test]
    async fn test_concurrent_appends() {
        let temp_dir = TempDir::new().unwrap();
        let log = SubmissionLog::open(temp_dir.path().join("submission.log"))
            .await
            .unwrap();

        let mut handles = Vec::new();
        for i in 0..32 {
            let log = log.clone();
            handles.push(tokio::spawn(async move {
                log.append(&record(&format!("file{i}.txt"))).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let contents = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert_eq!(contents.lines().count(), 32);
        assert!(contents.lines().all(|l| l.starts_with("Student [[") && l.ends_with("]]")));
    }
}
