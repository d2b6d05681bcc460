//! The fixed four-phase interview script.

use serde::{Deserialize, Serialize};

/// One stage of the interview. Serialized as its 1-based phase number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Phase {
    WarmUp,
    TechnicalDepth,
    ProblemSolving,
    Behavioral,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::WarmUp,
        Phase::TechnicalDepth,
        Phase::ProblemSolving,
        Phase::Behavioral,
    ];

    pub fn number(self) -> u8 {
        match self {
            Phase::WarmUp => 1,
            Phase::TechnicalDepth => 2,
            Phase::ProblemSolving => 3,
            Phase::Behavioral => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.number() == number)
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::WarmUp => "Warm-up & Background",
            Phase::TechnicalDepth => "Technical Depth",
            Phase::ProblemSolving => "Problem-Solving Scenario",
            Phase::Behavioral => "Behavioral & Wrap-up",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Phase::WarmUp => "Getting to know the candidate and their background",
            Phase::TechnicalDepth => "Deep dive into technical skills from the resume",
            Phase::ProblemSolving => "Real-world problem-solving and system design",
            Phase::Behavioral => "Soft skills, behavioral questions, and conclusion",
        }
    }

    /// Questions the interviewer asks before moving on.
    pub fn max_questions(self) -> u32 {
        match self {
            Phase::WarmUp => 3,
            Phase::TechnicalDepth => 6,
            Phase::ProblemSolving => 4,
            Phase::Behavioral => 3,
        }
    }

    /// The following phase, or `None` after the last one.
    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> Self {
        phase.number()
    }
}

impl TryFrom<u8> for Phase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Phase::from_number(value).ok_or_else(|| format!("invalid interview phase: {value}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_progression_is_linear() {
        assert_eq!(Phase::WarmUp.next(), Some(Phase::TechnicalDepth));
        assert_eq!(Phase::TechnicalDepth.next(), Some(Phase::ProblemSolving));
        assert_eq!(Phase::ProblemSolving.next(), Some(Phase::Behavioral));
        assert_eq!(Phase::Behavioral.next(), None);
    }

    #[test]
    fn test_question_budget_totals_sixteen() {
        let total: u32 = Phase::ALL.iter().map(|p| p.max_questions()).sum();
        assert_eq!(total, 16);
    }

    #[test]
    fn test_phase_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Phase::ProblemSolving).unwrap(), "3");
        let phase: Phase = serde_json::from_str("2").unwrap();
        assert_eq!(phase, Phase::TechnicalDepth);
        assert!(serde_json::from_str::<Phase>("5").is_err());
        assert!(serde_json::from_str::<Phase>("0").is_err());
    }
}
