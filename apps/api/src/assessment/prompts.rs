// Assessment prompts.

pub const ASSESSMENT_SYSTEM: &str = "You are an expert technical interviewer and hiring manager.";

/// Assessment prompt template.
/// Replace: {job_description}, {candidate_name}, {listed_skills}, {phase_breakdown},
///          {message_count}, {transcript}
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"You are an expert hiring manager analyzing a technical interview transcript.

Analyze the candidate's responses throughout the interview and provide a comprehensive assessment.

Interview Context:
- Job Description: {job_description}
- Candidate: {candidate_name}
- Skills listed on resume: {listed_skills}
- Phase Breakdown:
{phase_breakdown}

Interview Transcript (last {message_count} messages):
{transcript}

Provide your assessment as JSON with this structure:
{
    "overall_score": <float 0-10>,
    "recommendation": "strong_yes" | "yes" | "maybe" | "no" | "strong_no",
    "phase_scores": [
        {
            "phase_number": 1,
            "phase_name": "Warm-up & Background",
            "technical_accuracy": <float 0-10>,
            "problem_solving": <float 0-10>,
            "communication": <float 0-10>,
            "depth_of_knowledge": <float 0-10>
        },
        {... for each phase}
    ],
    "strengths": {
        "top_strengths": ["strength1", "strength2", ...],
        "demonstrated_skills": ["skill1", "skill2", ...],
        "notable_achievements": ["achievement1", ...]
    },
    "weaknesses": {
        "areas_for_improvement": ["area1", "area2", ...],
        "missing_skills": ["skill1", ...],
        "concerns": ["concern1", ...]
    },
    "summary": "Overall assessment summary paragraph",
    "key_highlights": ["highlight1", "highlight2", ...]
}

Focus on:
- Technical accuracy and depth of knowledge
- Problem-solving approach and reasoning
- Communication clarity and articulation
- Alignment with job requirements
- Demonstrated skills vs. listed skills"#;

/// Low temperature keeps scoring consistent between runs.
pub const ASSESSMENT_TEMPERATURE: f32 = 0.3;

pub const JOB_DESCRIPTION_CHARS: usize = 500;
pub const TRANSCRIPT_MESSAGES: usize = 20;
pub const TRANSCRIPT_CHARS: usize = 3000;
