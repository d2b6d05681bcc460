//! Interview agent: the phase counter wrapped around the interviewer model.
//!
//! An `InterviewSession` is plain data so it can live in any `SessionStore`.
//! Each candidate turn: record the answer → maybe advance phase → ask the
//! model for the next question over the recent history window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::phases::Phase;
use crate::interview::prompts::{
    CLOSING_MESSAGE, HISTORY_WINDOW, INTERVIEWER_SYSTEM_TEMPLATE, INTERVIEWER_TEMPERATURE,
    JOB_DESCRIPTION_PROMPT_CHARS, OPENING_TEMPLATE,
};
use crate::llm_client::prompts::{render_template, truncate_chars};
use crate::llm_client::{ChatMessage, ChatModel, CompletionRequest, ModelKind, Role};
use crate::models::candidate::CandidateProfile;
use crate::models::report::InterviewReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Active,
    Completed,
    Paused,
}

impl InterviewStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            InterviewStatus::Active => "active",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Paused => "paused",
        }
    }
}

/// A single message in the interview transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl InterviewMessage {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Result of one candidate turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub message: String,
    pub interview_complete: bool,
}

/// Full state of one interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub session_id: String,
    pub candidate_profile: CandidateProfile,
    pub job_description: String,
    pub current_phase: Phase,
    pub questions_in_phase: u32,
    pub total_questions: u32,
    pub conversation_history: Vec<InterviewMessage>,
    pub started_at: DateTime<Utc>,
    pub status: InterviewStatus,
    /// Cached assessment, filled on the first report request.
    #[serde(default)]
    pub report: Option<InterviewReport>,
}

impl InterviewSession {
    pub fn new(candidate_profile: CandidateProfile, job_description: impl Into<String>) -> Self {
        let session = Self {
            session_id: Uuid::new_v4().to_string(),
            candidate_profile,
            job_description: job_description.into(),
            current_phase: Phase::WarmUp,
            questions_in_phase: 0,
            total_questions: 0,
            conversation_history: Vec::new(),
            started_at: Utc::now(),
            status: InterviewStatus::Active,
            report: None,
        };
        info!(
            "Initialized interview session {} for {}",
            session.session_id, session.candidate_profile.name
        );
        session
    }

    pub fn is_complete(&self) -> bool {
        self.status == InterviewStatus::Completed
    }

    /// Renders the interviewer system prompt for the current phase.
    pub fn system_prompt(&self) -> String {
        let profile = &self.candidate_profile;
        let years = profile
            .years_of_experience
            .map(|y| y.to_string())
            .unwrap_or_else(|| "Not specified".to_string());
        let phase_overview = Phase::ALL
            .iter()
            .map(|p| format!("- Phase {}: {} ({})", p.number(), p.name(), p.description()))
            .collect::<Vec<_>>()
            .join("\n");

        render_template(
            INTERVIEWER_SYSTEM_TEMPLATE,
            &[
                ("candidate_name", profile.name.as_str()),
                ("years", years.as_str()),
                ("skills", profile.all_skills().join(", ").as_str()),
                (
                    "job_description",
                    truncate_chars(&self.job_description, JOB_DESCRIPTION_PROMPT_CHARS),
                ),
                ("phase_overview", phase_overview.as_str()),
                ("current_phase", self.current_phase.number().to_string().as_str()),
            ],
        )
    }

    /// Produces the interviewer's first message. Idempotent: once the
    /// conversation has started, the existing opening is returned.
    pub async fn generate_opening(&mut self, model: &dyn ChatModel) -> Result<String, AppError> {
        if let Some(existing) = self
            .conversation_history
            .iter()
            .find(|m| m.role == Role::Assistant)
        {
            return Ok(existing.content.clone());
        }

        let skills = self.candidate_profile.all_skills();
        let top_skills = skills.iter().take(5).copied().collect::<Vec<_>>().join(", ");
        let greeting = render_template(
            OPENING_TEMPLATE,
            &[
                ("candidate_name", self.candidate_profile.name.as_str()),
                ("top_skills", top_skills.as_str()),
            ],
        );

        let request = CompletionRequest::new(
            ModelKind::Chat,
            vec![
                ChatMessage::system(self.system_prompt()),
                ChatMessage::assistant(greeting),
            ],
        )
        .temperature(INTERVIEWER_TEMPERATURE);

        let opening = model
            .complete(request)
            .await
            .map_err(|e| AppError::Llm(format!("Opening generation failed: {e}")))?;

        self.conversation_history
            .push(InterviewMessage::new(Role::Assistant, opening.clone()));
        Ok(opening)
    }

    /// Records the candidate's answer and produces the next interviewer message.
    pub async fn respond(
        &mut self,
        model: &dyn ChatModel,
        candidate_message: &str,
    ) -> Result<TurnOutcome, AppError> {
        if self.is_complete() {
            return Err(AppError::Conflict(format!(
                "Interview {} is already complete",
                self.session_id
            )));
        }

        self.conversation_history
            .push(InterviewMessage::new(Role::User, candidate_message));

        if self.questions_in_phase >= self.current_phase.max_questions() {
            match self.current_phase.next() {
                Some(next) => {
                    self.current_phase = next;
                    self.questions_in_phase = 0;
                    info!(
                        "Session {} advancing to Phase {}",
                        self.session_id,
                        next.number()
                    );
                }
                None => {
                    self.status = InterviewStatus::Completed;
                    self.conversation_history
                        .push(InterviewMessage::new(Role::Assistant, CLOSING_MESSAGE));
                    info!("Interview {} completed", self.session_id);
                    return Ok(TurnOutcome {
                        message: CLOSING_MESSAGE.to_string(),
                        interview_complete: true,
                    });
                }
            }
        }

        let next_message = model
            .complete(self.next_turn_request())
            .await
            .map_err(|e| AppError::Llm(format!("Interview turn failed: {e}")))?;

        self.questions_in_phase += 1;
        self.total_questions += 1;
        self.conversation_history
            .push(InterviewMessage::new(Role::Assistant, next_message.clone()));

        Ok(TurnOutcome {
            message: next_message,
            interview_complete: false,
        })
    }

    fn next_turn_request(&self) -> CompletionRequest {
        let start = self.conversation_history.len().saturating_sub(HISTORY_WINDOW);
        let mut messages = Vec::with_capacity(HISTORY_WINDOW + 1);
        messages.push(ChatMessage::system(self.system_prompt()));
        messages.extend(
            self.conversation_history[start..]
                .iter()
                .map(|m| ChatMessage::text(m.role, m.content.clone())),
        );
        CompletionRequest::new(ModelKind::Chat, messages).temperature(INTERVIEWER_TEMPERATURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedModel;
    use crate::llm_client::MessageContent;
    use crate::models::candidate::ResumeSkills;

    fn profile() -> CandidateProfile {
        CandidateProfile {
            name: "Grace Hopper".to_string(),
            email: None,
            phone: None,
            summary: None,
            skills: ResumeSkills {
                languages: vec!["COBOL".into(), "Rust".into(), "Python".into()],
                frameworks: vec!["Axum".into()],
                tools: vec!["Git".into(), "Docker".into()],
                databases: vec![],
                cloud_platforms: vec![],
            },
            experience: vec![],
            education: vec![],
            projects: vec![],
            years_of_experience: Some(12),
        }
    }

    fn text_of(msg: &ChatMessage) -> &str {
        match &msg.content {
            MessageContent::Text(t) => t,
            MessageContent::Parts(_) => panic!("expected text content"),
        }
    }

    #[test]
    fn test_new_session_starts_in_first_phase() {
        let session = InterviewSession::new(profile(), "Backend Engineer");
        assert_eq!(session.current_phase, Phase::WarmUp);
        assert_eq!(session.total_questions, 0);
        assert_eq!(session.status, InterviewStatus::Active);
        assert!(session.conversation_history.is_empty());
        assert!(Uuid::parse_str(&session.session_id).is_ok());
    }

    #[test]
    fn test_system_prompt_mentions_candidate_and_phase() {
        let session = InterviewSession::new(profile(), "Senior Rust Engineer\nBuild things.");
        let prompt = session.system_prompt();
        assert!(prompt.contains("Name: Grace Hopper"));
        assert!(prompt.contains("Experience: 12 years"));
        assert!(prompt.contains("Skills: COBOL, Rust, Python, Axum, Git, Docker"));
        assert!(prompt.contains("Phase 4: Behavioral & Wrap-up"));
        assert!(prompt.contains("currently in Phase 1"));
    }

    #[test]
    fn test_system_prompt_truncates_job_description() {
        let long_jd = "x".repeat(5000);
        let session = InterviewSession::new(profile(), long_jd);
        let prompt = session.system_prompt();
        assert!(prompt.contains(&"x".repeat(1000)));
        assert!(!prompt.contains(&"x".repeat(1001)));
    }

    #[test]
    fn test_system_prompt_keeps_braces_in_user_text() {
        let mut p = profile();
        p.name = "Grace {years} Hopper".to_string();
        let session = InterviewSession::new(p, "Pipeline owner: {current_phase} matters");
        let prompt = session.system_prompt();
        assert!(prompt.contains("Name: Grace {years} Hopper"));
        assert!(prompt.contains("Pipeline owner: {current_phase} matters"));
        assert!(prompt.contains("currently in Phase 1"));
    }

    #[test]
    fn test_system_prompt_without_years() {
        let mut p = profile();
        p.years_of_experience = None;
        let prompt = InterviewSession::new(p, "JD").system_prompt();
        assert!(prompt.contains("Experience: Not specified years"));
    }

    #[tokio::test]
    async fn test_opening_is_recorded_and_idempotent() {
        let model = ScriptedModel::new(["Welcome, Grace!"]);
        let mut session = InterviewSession::new(profile(), "JD");

        let first = session.generate_opening(&model).await.unwrap();
        assert_eq!(first, "Welcome, Grace!");
        assert_eq!(session.conversation_history.len(), 1);
        assert_eq!(session.total_questions, 0);

        let request = model.last_request().unwrap();
        assert_eq!(request.model, ModelKind::Chat);
        assert_eq!(request.temperature, Some(INTERVIEWER_TEMPERATURE));
        assert_eq!(request.messages[1].role, Role::Assistant);
        assert!(text_of(&request.messages[1]).contains("COBOL, Rust, Python, Axum, Git"));
        assert!(!text_of(&request.messages[1]).contains("Docker"));

        let again = session.generate_opening(&model).await.unwrap();
        assert_eq!(again, "Welcome, Grace!");
        assert_eq!(model.request_count(), 1);
        assert_eq!(session.conversation_history.len(), 1);
    }

    #[tokio::test]
    async fn test_full_interview_walks_all_phases_then_closes() {
        let replies: Vec<String> = (1..=16).map(|i| format!("Question {i}")).collect();
        let model = ScriptedModel::new(replies);
        let mut session = InterviewSession::new(profile(), "JD");

        let mut phases_seen = Vec::new();
        for turn in 1..=16 {
            let outcome = session.respond(&model, "my answer").await.unwrap();
            assert_eq!(outcome.message, format!("Question {turn}"));
            assert!(!outcome.interview_complete);
            phases_seen.push(session.current_phase.number());
        }
        assert_eq!(
            phases_seen,
            vec![1, 1, 1, 2, 2, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4]
        );
        assert_eq!(session.total_questions, 16);

        let outcome = session.respond(&model, "final answer").await.unwrap();
        assert!(outcome.interview_complete);
        assert_eq!(outcome.message, CLOSING_MESSAGE);
        assert_eq!(session.status, InterviewStatus::Completed);
        assert_eq!(session.current_phase, Phase::Behavioral);
        assert_eq!(session.total_questions, 16);
        assert_eq!(model.request_count(), 16);

        let err = session.respond(&model, "hello?").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_phase_advance_updates_system_prompt() {
        let model = ScriptedModel::new(["q1", "q2", "q3", "q4"]);
        let mut session = InterviewSession::new(profile(), "JD");
        for _ in 0..4 {
            session.respond(&model, "answer").await.unwrap();
        }
        let request = model.last_request().unwrap();
        assert!(text_of(&request.messages[0]).contains("currently in Phase 2"));
        assert_eq!(session.questions_in_phase, 1);
    }

    #[tokio::test]
    async fn test_turn_sends_only_recent_history() {
        let replies: Vec<String> = (0..8).map(|i| format!("q{i}")).collect();
        let model = ScriptedModel::new(replies);
        let mut session = InterviewSession::new(profile(), "JD");
        for i in 0..8 {
            session.respond(&model, &format!("a{i}")).await.unwrap();
        }
        let request = model.last_request().unwrap();
        // system prompt + the 10-message window
        assert_eq!(request.messages.len(), 1 + HISTORY_WINDOW);
        assert_eq!(request.messages[0].role, Role::System);
        let last = request.messages.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(text_of(last), "a7");
    }

    #[tokio::test]
    async fn test_model_failure_does_not_count_a_question() {
        let model = ScriptedModel::failing();
        let mut session = InterviewSession::new(profile(), "JD");
        let err = session.respond(&model, "answer").await.unwrap_err();
        assert!(matches!(err, AppError::Llm(_)));
        assert_eq!(session.total_questions, 0);
        assert_eq!(session.questions_in_phase, 0);
    }

    #[test]
    fn test_session_round_trips_through_json() {
        let session = InterviewSession::new(profile(), "JD");
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["current_phase"], 1);
        assert_eq!(json["status"], "active");
        let back: InterviewSession = serde_json::from_value(json).unwrap();
        assert_eq!(back.session_id, session.session_id);
        assert!(back.report.is_none());
    }
}
