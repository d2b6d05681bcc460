use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Hiring recommendation emitted by the assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongYes,
    Yes,
    Maybe,
    No,
    StrongNo,
}

/// Scores for one interview phase, each on a 0–10 scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseScore {
    pub phase_number: u8,
    pub phase_name: String,
    pub technical_accuracy: f64,
    pub problem_solving: f64,
    pub communication: f64,
    pub depth_of_knowledge: f64,
    /// Mean of the four dimension scores.
    pub average_score: f64,
}

impl PhaseScore {
    pub fn new(
        phase_number: u8,
        phase_name: impl Into<String>,
        technical_accuracy: f64,
        problem_solving: f64,
        communication: f64,
        depth_of_knowledge: f64,
    ) -> Self {
        let average_score =
            (technical_accuracy + problem_solving + communication + depth_of_knowledge) / 4.0;
        Self {
            phase_number,
            phase_name: phase_name.into(),
            technical_accuracy,
            problem_solving,
            communication,
            depth_of_knowledge,
            average_score,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateStrengths {
    #[serde(default)]
    pub top_strengths: Vec<String>,
    #[serde(default)]
    pub demonstrated_skills: Vec<String>,
    #[serde(default)]
    pub notable_achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateWeaknesses {
    #[serde(default)]
    pub areas_for_improvement: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub concerns: Vec<String>,
}

/// Final assessment report for one interview session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewReport {
    pub session_id: String,
    pub candidate_name: String,
    pub job_title: String,
    pub overall_score: f64,
    pub recommendation: Recommendation,
    pub phase_scores: Vec<PhaseScore>,
    pub strengths: CandidateStrengths,
    pub weaknesses: CandidateWeaknesses,
    pub summary: String,
    pub key_highlights: Vec<String>,
    pub generated_at: DateTime<Utc>,
    /// The parsed model output the report was built from. Absent for fallback reports.
    pub raw_analysis: Option<Value>,
}
