//! Submission form routes
//!
//! Endpoints:
//! - GET / - Render the upload form and any pending flash messages
//! - POST / - Validate and store a submission, then redirect back to the form

use axum::{
    extract::{
        multipart::MultipartError, rejection::FormRejection, DefaultBodyLimit, FromRequest,
        Multipart, Request, State,
    },
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use axum_extra::extract::cookie::CookieJar;

use crate::error::Result;
use crate::html::render_form;
use crate::state::AppState;
use crate::submission::{self, SubmissionForm, UploadedFile};

/// Form field carrying the student ID
pub const STUDENT_ID_FIELD: &str = "student-id";

/// Form field carrying the uploaded file
pub const SUBMISSION_FIELD: &str = "submission";

/// Shown when the file could not be written or logged
pub const STORE_FAILED_MESSAGE: &str = "Submission could not be stored, please try again.";

/// Create the submission router
pub fn router(max_body: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(show_form).post(submit))
        .layer(DefaultBodyLimit::max(max_body))
}

/// GET /
async fn show_form(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Html<String>) {
    let (jar, messages) = state.flash().take(jar);
    (jar, Html(render_form(&messages)))
}

/// POST /
///
/// Every outcome the student can act on ends in a redirect to the form with a
/// flash message. Only malformed or oversized bodies get an error status.
async fn submit(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
) -> Result<(CookieJar, Response)> {
    let form = read_request(request).await?;

    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(e) => {
            tracing::info!(reason = %e, "Submission rejected");
            let jar = state.flash().push(jar, e.user_message());
            return Ok((jar, back_to_form()));
        }
    };

    let message = match submission::process(state.store(), state.log(), valid).await {
        Ok(receipt) => receipt.message(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to store submission");
            STORE_FAILED_MESSAGE.to_string()
        }
    };

    Ok((state.flash().push(jar, message), back_to_form()))
}

/// 302 to the form page
fn back_to_form() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
        .unwrap_or(false)
}

/// Read the form from a multipart body. Any other body can never carry a
/// file, so it is read as a urlencoded form if possible and as an empty one
/// otherwise; validation then reports what is missing.
async fn read_request(request: Request) -> Result<SubmissionForm> {
    if is_multipart(request.headers()) {
        let multipart = Multipart::from_request(request, &()).await?;
        return Ok(read_form(multipart).await?);
    }

    match Form::<Vec<(String, String)>>::from_request(request, &()).await {
        Ok(Form(fields)) => {
            let student_id = fields
                .into_iter()
                .find(|(name, _)| name == STUDENT_ID_FIELD)
                .map(|(_, value)| value);
            Ok(SubmissionForm {
                student_id,
                submission: None,
            })
        }
        Err(FormRejection::InvalidFormContentType(_)) => {
            tracing::debug!("POST without a form body");
            Ok(SubmissionForm::default())
        }
        Err(e) => Err(e.into()),
    }
}

/// Collect the fields we care about. The first occurrence of a field wins;
/// unknown fields are skipped.
async fn read_form(mut multipart: Multipart) -> std::result::Result<SubmissionForm, MultipartError> {
    let mut form = SubmissionForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            STUDENT_ID_FIELD if form.student_id.is_none() => {
                form.student_id = Some(field.text().await?);
            }
            SUBMISSION_FIELD if form.submission.is_none() => {
                let file_name = field.file_name().map(|s| s.to_string());
                let data = field.bytes().await?;

                tracing::debug!(
                    file_name = ?file_name,
                    size = data.len(),
                    "Received submission part"
                );

                form.submission = Some(UploadedFile { file_name, data });
            }
            _ => {
                tracing::debug!(field = %name, "Skipping form field");
            }
        }
    }

    Ok(form)
}
