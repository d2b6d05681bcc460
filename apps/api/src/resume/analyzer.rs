//! Resume Analyzer: turns a prepared resume page into a `CandidateProfile`
//! with a single vision-language model call.

use tracing::{error, info};

use crate::errors::AppError;
use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{parse_json_reply, ChatMessage, ChatModel, CompletionRequest, ModelKind};
use crate::models::candidate::CandidateProfile;
use crate::resume::pdf::ResumePage;
use crate::resume::prompts::{RESUME_PARSE_MAX_TOKENS, RESUME_PARSE_PROMPT, RESUME_TEXT_HEADER};

pub fn build_request(page: &ResumePage) -> CompletionRequest {
    let message = match page {
        ResumePage::Image { png_base64 } => {
            ChatMessage::user_with_image(RESUME_PARSE_PROMPT, "image/png", png_base64)
        }
        ResumePage::Text(text) => ChatMessage::user(format!(
            "{RESUME_PARSE_PROMPT}\n\n{JSON_ONLY_INSTRUCTION}\n\n{RESUME_TEXT_HEADER}\n{text}"
        )),
    };
    CompletionRequest::new(ModelKind::Vision, vec![message]).max_tokens(RESUME_PARSE_MAX_TOKENS)
}

/// Extracts a structured candidate profile from the resume.
pub async fn analyze_resume(
    page: &ResumePage,
    model: &dyn ChatModel,
) -> Result<CandidateProfile, AppError> {
    let source = match page {
        ResumePage::Image { .. } => "image",
        ResumePage::Text(_) => "text",
    };
    info!("Analyzing resume ({source}) with vision model");

    let reply = model
        .complete(build_request(page))
        .await
        .map_err(|e| AppError::Llm(format!("Resume analysis failed: {e}")))?;

    let profile: CandidateProfile = parse_json_reply(&reply).map_err(|e| {
        error!("Failed to parse resume JSON: {e}");
        error!("Response text: {}", truncate_chars(&reply, 500));
        AppError::Llm("Failed to parse structured data from AI response".to_string())
    })?;

    info!("Successfully extracted profile for: {}", profile.name);
    Ok(profile)
}
