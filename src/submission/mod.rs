//! Submission processing
//!
//! Turns a validated form into a stored file, a log record and a receipt:
//! 1. Sanitize the client file name
//! 2. Write it under `<root>/<today>/<student id>/`
//! 3. Checksum the stored bytes
//! 4. Append to the submission log

pub mod checksum;
pub mod log;
pub mod sanitize;
pub mod storage;
pub mod validation;

use chrono::{Local, NaiveDateTime};

pub use checksum::{crc32, crc32_path, format_checksum};
pub use log::{SubmissionLog, SubmissionRecord};
pub use sanitize::{sanitize_filename, sanitize_or_generate};
pub use storage::{StoredFile, SubmissionStore};
pub use validation::{is_valid_student_id, SubmissionForm, UploadedFile, ValidSubmission};

use crate::error::AppError;

/// File names longer than this are elided in receipts
pub const DISPLAY_NAME_CHARS: usize = 20;

/// Marker appended to elided file names
pub const ELISION: &str = "[...]";

/// What the student is told after a successful submission
#[derive(Debug, Clone)]
pub struct Receipt {
    pub record: SubmissionRecord,
    pub stored: StoredFile,
}

impl Receipt {
    /// One-line confirmation, e.g. `CRC32(report.pdf) = 0x3610A686.`
    pub fn message(&self) -> String {
        format!(
            "CRC32({}) = {}.",
            display_name(&self.record.file_name),
            format_checksum(self.record.checksum)
        )
    }
}

/// Shortens a file name to 20 characters plus `[...]` when needed.
pub fn display_name(file_name: &str) -> String {
    match file_name.char_indices().nth(DISPLAY_NAME_CHARS) {
        Some((cut, _)) => format!("{}{}", &file_name[..cut], ELISION),
        None => file_name.to_string(),
    }
}

/// Store a validated submission and record it.
pub async fn process(
    store: &SubmissionStore,
    log: &SubmissionLog,
    submission: ValidSubmission,
) -> Result<Receipt, AppError> {
    process_at(store, log, submission, Local::now().naive_local()).await
}

/// [`process`] with an explicit clock
pub async fn process_at(
    store: &SubmissionStore,
    log: &SubmissionLog,
    submission: ValidSubmission,
    now: NaiveDateTime,
) -> Result<Receipt, AppError> {
    let file_name = sanitize_or_generate(&submission.file_name);
    if file_name != submission.file_name {
        tracing::debug!(
            original = %submission.file_name,
            sanitized = %file_name,
            "File name sanitized"
        );
    }

    let stored = store
        .store(now.date(), &submission.student_id, &file_name, &submission.data)
        .await?;

    let record = SubmissionRecord {
        student_id: submission.student_id,
        file_name,
        submitted_at: now,
        checksum: stored.checksum,
    };
    log.append(&record).await?;

    tracing::info!(
        student_id = %record.student_id,
        file_name = %record.file_name,
        size = stored.size,
        checksum = %format_checksum(record.checksum),
        "Submission stored"
    );

    Ok(Receipt { record, stored })
}
