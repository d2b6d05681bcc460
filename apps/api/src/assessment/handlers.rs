use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assessment::engine::generate_report;
use crate::errors::AppError;
use crate::interview::handlers::load_session;
use crate::models::report::InterviewReport;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub refresh: bool,
}

#[derive(Debug, Serialize)]
pub struct InterviewReportResponse {
    pub report: InterviewReport,
}

/// GET /api/interview/report/:session_id
///
/// Returns the cached assessment, generating it on first request or when
/// `?refresh=true` is passed.
pub async fn handle_report(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<InterviewReportResponse>, AppError> {
    let _turn = state.session_locks.acquire(&session_id).await;
    let mut session = load_session(&state, &session_id).await?;

    if !query.refresh {
        if let Some(report) = session.report.clone() {
            return Ok(Json(InterviewReportResponse { report }));
        }
    }

    let report = generate_report(&session, state.llm.as_ref()).await;
    info!("Report generated for session {session_id}");

    // Fallback reports are not cached so the next request retries the model.
    if report.raw_analysis.is_some() {
        session.report = Some(report.clone());
        state.sessions.save(&session).await?;
    }

    Ok(Json(InterviewReportResponse { report }))
}
