//! Assessment engine: scores a finished (or partial) interview.
//!
//! One chat-model call produces the scores; the engine validates them and
//! derives phase averages. Any failure degrades to a neutral fallback report
//! so the endpoint always has something to show a reviewer.

use chrono::Utc;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::assessment::prompts::{
    ASSESSMENT_PROMPT_TEMPLATE, ASSESSMENT_SYSTEM, ASSESSMENT_TEMPERATURE, JOB_DESCRIPTION_CHARS,
    TRANSCRIPT_CHARS, TRANSCRIPT_MESSAGES,
};
use crate::interview::agent::InterviewSession;
use crate::interview::phases::Phase;
use crate::llm_client::prompts::{render_template, truncate_chars};
use crate::llm_client::{
    parse_json_reply, ChatMessage, ChatModel, CompletionRequest, LlmError, ModelKind, Role,
};
use crate::models::report::{
    CandidateStrengths, CandidateWeaknesses, InterviewReport, PhaseScore, Recommendation,
};

const JOB_TITLE_KEYWORDS: &[&str] = &["engineer", "developer", "software", "architect", "scientist"];
const DEFAULT_JOB_TITLE: &str = "Software Engineer";
const NEUTRAL_SCORE: f64 = 5.0;

#[derive(Debug, Error)]
enum AssessmentError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("assessment did not match the expected schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("{0}")]
    OutOfRange(String),
}

#[derive(Debug, Deserialize)]
struct AssessmentPayload {
    #[serde(deserialize_with = "loose_score")]
    overall_score: f64,
    recommendation: Recommendation,
    #[serde(default)]
    phase_scores: Vec<RawPhaseScore>,
    strengths: CandidateStrengths,
    weaknesses: CandidateWeaknesses,
    summary: String,
    key_highlights: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawPhaseScore {
    phase_number: u8,
    #[serde(default)]
    phase_name: Option<String>,
    #[serde(deserialize_with = "loose_score")]
    technical_accuracy: f64,
    #[serde(deserialize_with = "loose_score")]
    problem_solving: f64,
    #[serde(deserialize_with = "loose_score")]
    communication: f64,
    #[serde(deserialize_with = "loose_score")]
    depth_of_knowledge: f64,
}

/// Scores may arrive as numbers or numeric strings.
fn loose_score<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("score is not a finite number")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("score '{s}' is not numeric"))),
        other => Err(serde::de::Error::custom(format!(
            "expected a numeric score, got {other}"
        ))),
    }
}

fn check_score(label: &str, score: f64) -> Result<f64, AssessmentError> {
    if score.is_finite() && (0.0..=10.0).contains(&score) {
        Ok(score)
    } else {
        Err(AssessmentError::OutOfRange(format!(
            "{label} must be between 0 and 10, got {score}"
        )))
    }
}

impl RawPhaseScore {
    fn validate(self) -> Result<PhaseScore, AssessmentError> {
        let phase = Phase::from_number(self.phase_number).ok_or_else(|| {
            AssessmentError::OutOfRange(format!("invalid phase_number {}", self.phase_number))
        })?;
        let name = self
            .phase_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| phase.name().to_string());
        Ok(PhaseScore::new(
            phase.number(),
            name,
            check_score("technical_accuracy", self.technical_accuracy)?,
            check_score("problem_solving", self.problem_solving)?,
            check_score("communication", self.communication)?,
            check_score("depth_of_knowledge", self.depth_of_knowledge)?,
        ))
    }
}

/// Renders the assessment prompt for a session.
pub fn build_assessment_prompt(session: &InterviewSession) -> String {
    let start = session
        .conversation_history
        .len()
        .saturating_sub(TRANSCRIPT_MESSAGES);
    let recent = &session.conversation_history[start..];
    let transcript = recent
        .iter()
        .map(|m| format!("{}: {}", role_label(m.role), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    let phase_breakdown = Phase::ALL
        .iter()
        .map(|p| format!("- Phase {}: {} - {}", p.number(), p.name(), p.description()))
        .collect::<Vec<_>>()
        .join("\n");

    let skills = session.candidate_profile.all_skills();
    let listed_skills = if skills.is_empty() {
        "None listed".to_string()
    } else {
        skills.join(", ")
    };

    render_template(
        ASSESSMENT_PROMPT_TEMPLATE,
        &[
            (
                "job_description",
                truncate_chars(&session.job_description, JOB_DESCRIPTION_CHARS),
            ),
            ("candidate_name", session.candidate_profile.name.as_str()),
            ("listed_skills", listed_skills.as_str()),
            ("phase_breakdown", phase_breakdown.as_str()),
            ("message_count", recent.len().to_string().as_str()),
            ("transcript", truncate_chars(&transcript, TRANSCRIPT_CHARS)),
        ],
    )
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::System => "SYSTEM",
        Role::User => "USER",
        Role::Assistant => "ASSISTANT",
    }
}

/// Generates the assessment report. Never fails: model or parsing problems
/// produce `fallback_report` instead.
pub async fn generate_report(session: &InterviewSession, model: &dyn ChatModel) -> InterviewReport {
    info!("Generating assessment for session {}", session.session_id);

    match assess(session, model).await {
        Ok(report) => {
            info!(
                "Assessment complete. Overall score: {}/10",
                report.overall_score
            );
            report
        }
        Err(e) => {
            error!(
                "Error generating assessment for session {}: {e}",
                session.session_id
            );
            fallback_report(session)
        }
    }
}

async fn assess(
    session: &InterviewSession,
    model: &dyn ChatModel,
) -> Result<InterviewReport, AssessmentError> {
    let request = CompletionRequest::new(
        ModelKind::Chat,
        vec![
            ChatMessage::system(ASSESSMENT_SYSTEM),
            ChatMessage::user(build_assessment_prompt(session)),
        ],
    )
    .temperature(ASSESSMENT_TEMPERATURE);

    let reply = model.complete(request).await?;
    let raw: Value = parse_json_reply(&reply).map_err(|e| {
        error!("Failed to parse assessment JSON: {e}");
        error!("Response: {}", truncate_chars(&reply, 500));
        e
    })?;
    let payload: AssessmentPayload = serde_json::from_value(raw.clone())?;

    let overall_score = check_score("overall_score", payload.overall_score)?;
    let phase_scores = payload
        .phase_scores
        .into_iter()
        .map(RawPhaseScore::validate)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(InterviewReport {
        session_id: session.session_id.clone(),
        candidate_name: session.candidate_profile.name.clone(),
        job_title: extract_job_title(&session.job_description),
        overall_score,
        recommendation: payload.recommendation,
        phase_scores,
        strengths: payload.strengths,
        weaknesses: payload.weaknesses,
        summary: payload.summary,
        key_highlights: payload.key_highlights,
        generated_at: Utc::now(),
        raw_analysis: Some(raw),
    })
}

/// Neutral report used whenever the model assessment cannot be produced.
pub fn fallback_report(session: &InterviewSession) -> InterviewReport {
    warn!("Using fallback assessment report for {}", session.session_id);

    InterviewReport {
        session_id: session.session_id.clone(),
        candidate_name: session.candidate_profile.name.clone(),
        job_title: extract_job_title(&session.job_description),
        overall_score: NEUTRAL_SCORE,
        recommendation: Recommendation::Maybe,
        phase_scores: Phase::ALL
            .iter()
            .map(|p| {
                PhaseScore::new(
                    p.number(),
                    p.name(),
                    NEUTRAL_SCORE,
                    NEUTRAL_SCORE,
                    NEUTRAL_SCORE,
                    NEUTRAL_SCORE,
                )
            })
            .collect(),
        strengths: CandidateStrengths {
            top_strengths: vec!["Completed interview successfully".to_string()],
            demonstrated_skills: vec![],
            notable_achievements: vec![],
        },
        weaknesses: CandidateWeaknesses {
            areas_for_improvement: vec!["Assessment incomplete".to_string()],
            missing_skills: vec![],
            concerns: vec!["AI assessment generation failed".to_string()],
        },
        summary: "Assessment report generation encountered an error. Manual review recommended."
            .to_string(),
        key_highlights: vec!["Interview session completed".to_string()],
        generated_at: Utc::now(),
        raw_analysis: None,
    }
}

/// Uses the first line of the job description as the title when it reads like one.
pub fn extract_job_title(job_description: &str) -> String {
    let first_line = job_description.split('\n').next().unwrap_or_default().trim();
    let lower = first_line.to_lowercase();
    if first_line.chars().count() < 100 && JOB_TITLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        first_line.to_string()
    } else {
        DEFAULT_JOB_TITLE.to_string()
    }
}
