use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::interview::agent::InterviewSession;
use crate::models::candidate::CandidateProfile;
use crate::resume::analyzer::analyze_resume;
use crate::resume::pdf::prepare_resume;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResumeUploadResponse {
    pub session_id: String,
    pub candidate_profile: CandidateProfile,
    pub message: String,
}

#[derive(Debug, Default)]
struct UploadForm {
    file_name: Option<String>,
    file: Option<Bytes>,
    job_description: Option<String>,
}

/// Maps a multipart read failure onto the status axum assigns it, so an
/// upload over the body limit becomes 413 rather than a generic 400.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    let message = format!("{context}: {}", e.body_text());
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(message)
    } else {
        AppError::Validation(message)
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed multipart body", e))?
    {
        match field.name() {
            Some("file") => {
                form.file_name = field.file_name().map(str::to_string);
                form.file = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| multipart_error("Failed to read file", e))?,
                );
            }
            Some("job_description") => {
                form.job_description = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| multipart_error("Failed to read job_description", e))?,
                );
            }
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/upload-resume
///
/// Multipart form with `file` (PDF) and `job_description` (form field or query
/// parameter). Extracts the candidate profile and opens an interview session.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    multipart: Multipart,
) -> Result<Json<ResumeUploadResponse>, AppError> {
    let form = read_form(multipart).await?;

    let file_name = form
        .file_name
        .ok_or_else(|| AppError::Validation("A resume file is required".to_string()))?;
    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err(AppError::Validation("File must be a PDF".to_string()));
    }
    let file = form.file.unwrap_or_default();
    if file.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let job_description = form
        .job_description
        .or(query.job_description)
        .filter(|jd| !jd.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Job description is required".to_string()))?;

    info!("Uploaded resume: {} ({} bytes)", file_name, file.len());

    let page = prepare_resume(&file, &state.pdf_settings).await?;
    let candidate_profile = analyze_resume(&page, state.llm.as_ref()).await?;

    let session = InterviewSession::new(candidate_profile.clone(), job_description);
    state.sessions.save(&session).await?;
    info!("Interview session created: {}", session.session_id);

    Ok(Json(ResumeUploadResponse {
        session_id: session.session_id,
        candidate_profile,
        message: "Resume uploaded and interview session created successfully".to_string(),
    }))
}
