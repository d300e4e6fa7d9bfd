//! Form validation

use axum::body::Bytes;

use crate::error::ValidationError;

/// Length of a student ID in digits
pub const STUDENT_ID_LEN: usize = 11;

/// True iff `s` is exactly eleven ASCII digits.
pub fn is_valid_student_id(s: &str) -> bool {
    s.len() == STUDENT_ID_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// A file part as received from the client
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// `filename` parameter of the part, if the part had one
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Raw submission form, before validation
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub student_id: Option<String>,
    pub submission: Option<UploadedFile>,
}

/// A submission that passed every check
#[derive(Debug, Clone)]
pub struct ValidSubmission {
    pub student_id: String,
    pub file_name: String,
    pub data: Bytes,
}

impl SubmissionForm {
    /// Check the form, failing on the first problem found.
    pub fn validate(self) -> Result<ValidSubmission, ValidationError> {
        let student_id = match self.student_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(ValidationError::MissingStudentId),
        };

        if !is_valid_student_id(&student_id) {
            return Err(ValidationError::MalformedStudentId);
        }

        let (file_name, data) = match self.submission {
            Some(UploadedFile {
                file_name: Some(name),
                data,
            }) => (name, data),
            _ => return Err(ValidationError::MissingFilePart),
        };

        // Browsers send an empty part when no file was picked
        if file_name.is_empty() {
            return Err(ValidationError::NoFileSelected);
        }

        Ok(ValidSubmission {
            student_id,
            file_name,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: Option<&str>) -> Option<UploadedFile> {
        Some(UploadedFile {
            file_name: name.map(str::to_string),
            data: Bytes::from_static(b"hello"),
        })
    }

    fn form(id: Option<&str>, submission: Option<UploadedFile>) -> SubmissionForm {
        SubmissionForm {
            student_id: id.map(str::to_string),
            submission,
        }
    }

    #[test]
    fn test_valid_student_ids() {
        assert!(is_valid_student_id("12345678901"));
        assert!(is_valid_student_id("00000000000"));
        assert!(is_valid_student_id("99999999999"));
    }

    #[test]
    fn test_invalid_student_ids() {
        assert!(!is_valid_student_id(""));
        assert!(!is_valid_student_id("1234567890"));
        assert!(!is_valid_student_id("123456789012"));
        assert!(!is_valid_student_id("1234567890a"));
        assert!(!is_valid_student_id(" 2345678901"));
        assert!(!is_valid_student_id("12345678901\n"));
        // Non-ASCII digits are rejected even though they are numeric
        assert!(!is_valid_student_id("١٢٣٤٥٦٧٨٩٠١"));
        assert!(!is_valid_student_id("１２３４５６７８９０１"));
    }

    #[test]
    fn test_missing_student_id_wins() {
        assert_eq!(
            form(None, file(Some("a.txt"))).validate().unwrap_err(),
            ValidationError::MissingStudentId
        );
        assert_eq!(
            form(Some(""), None).validate().unwrap_err(),
            ValidationError::MissingStudentId
        );
    }

    #[test]
    fn test_malformed_before_file_checks() {
        assert_eq!(
            form(Some("123"), None).validate().unwrap_err(),
            ValidationError::MalformedStudentId
        );
    }

    #[test]
    fn test_missing_file_part() {
        assert_eq!(
            form(Some("12345678901"), None).validate().unwrap_err(),
            ValidationError::MissingFilePart
        );
        // A part without a filename parameter is a plain field, not a file
        assert_eq!(
            form(Some("12345678901"), file(None)).validate().unwrap_err(),
            ValidationError::MissingFilePart
        );
    }

    #[test]
    fn test_no_file_selected() {
        assert_eq!(
            form(Some("12345678901"), file(Some(""))).validate().unwrap_err(),
            ValidationError::NoFileSelected
        );
    }

    #[test]
    fn test_valid_submission() {
        let valid = form(Some("12345678901"), file(Some("report.pdf")))
            .validate()
            .unwrap();
        assert_eq!(valid.student_id, "12345678901");
        assert_eq!(valid.file_name, "report.pdf");
        assert_eq!(&valid.data[..], b"hello");
    }
}
