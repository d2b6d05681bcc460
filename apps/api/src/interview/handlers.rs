//! Axum route handlers for the Interview API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::interview::agent::{InterviewSession, TurnOutcome};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct OpeningRequest {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct InterviewMessageRequest {
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewMessageResponse {
    pub session_id: String,
    pub message: String,
    pub current_phase: u8,
    pub phase_name: String,
    pub total_questions: u32,
    pub interview_complete: bool,
}

impl InterviewMessageResponse {
    fn from_turn(session: &InterviewSession, outcome: TurnOutcome) -> Self {
        Self {
            session_id: session.session_id.clone(),
            message: outcome.message,
            current_phase: session.current_phase.number(),
            phase_name: session.current_phase.name().to_string(),
            total_questions: session.total_questions,
            interview_complete: outcome.interview_complete,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InterviewStatusResponse {
    pub session_id: String,
    pub status: String,
    pub current_phase: u8,
    pub phase_name: String,
    pub total_questions: u32,
    pub conversation_length: usize,
    pub started_at: DateTime<Utc>,
}

/// Loads a session or fails with 404.
pub(crate) async fn load_session(
    state: &AppState,
    session_id: &str,
) -> Result<InterviewSession, AppError> {
    state
        .sessions
        .get(session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Interview session not found".to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/interview/opening
///
/// Returns the interviewer's greeting, generating it on first call.
pub async fn handle_opening(
    State(state): State<AppState>,
    Json(request): Json<OpeningRequest>,
) -> Result<Json<InterviewMessageResponse>, AppError> {
    let _turn = state.session_locks.acquire(&request.session_id).await;
    let mut session = load_session(&state, &request.session_id).await?;

    let had_history = !session.conversation_history.is_empty();
    let message = session.generate_opening(state.llm.as_ref()).await?;
    if !had_history {
        state.sessions.save(&session).await?;
    }

    let outcome = TurnOutcome {
        message,
        interview_complete: session.is_complete(),
    };
    Ok(Json(InterviewMessageResponse::from_turn(&session, outcome)))
}

/// POST /api/interview/message
///
/// Records the candidate's answer and returns the next question, or the
/// closing message once every phase is exhausted.
pub async fn handle_message(
    State(state): State<AppState>,
    Json(request): Json<InterviewMessageRequest>,
) -> Result<Json<InterviewMessageResponse>, AppError> {
    if request.message.trim().is_empty() {
        return Err(AppError::Validation("message cannot be empty".to_string()));
    }

    let _turn = state.session_locks.acquire(&request.session_id).await;
    let mut session = load_session(&state, &request.session_id).await?;

    let outcome = session
        .respond(state.llm.as_ref(), request.message.trim())
        .await?;
    state.sessions.save(&session).await?;

    Ok(Json(InterviewMessageResponse::from_turn(&session, outcome)))
}

/// GET /api/interview/status/:session_id
pub async fn handle_status(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<InterviewStatusResponse>, AppError> {
    let session = load_session(&state, &session_id).await?;
    Ok(Json(InterviewStatusResponse {
        session_id: session.session_id,
        status: session.status.as_str().to_string(),
        current_phase: session.current_phase.number(),
        phase_name: session.current_phase.name().to_string(),
        total_questions: session.total_questions,
        conversation_length: session.conversation_history.len(),
        started_at: session.started_at,
    }))
}

/// GET /api/interview/state/:session_id
///
/// Full session snapshot including the transcript.
pub async fn handle_state(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<InterviewSession>, AppError> {
    Ok(Json(load_session(&state, &session_id).await?))
}
