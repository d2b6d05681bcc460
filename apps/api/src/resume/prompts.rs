// Resume extraction prompts for the vision-language model.

/// Resume parsing prompt. Sent alongside the rendered page image, or followed by
/// the extracted text when no image is available.
pub const RESUME_PARSE_PROMPT: &str = r#"You are an expert resume parser. Analyze this resume and extract structured information in JSON format.

Return ONLY a JSON object with the following structure:
{
    "name": "Candidate's full name",
    "email": "Email address if available",
    "phone": "Phone number if available",
    "summary": "Professional summary or objective if present",
    "years_of_experience": <number> or null,
    "skills": {
        "languages": ["Python", "Java", ...],
        "frameworks": ["React", "Django", ...],
        "tools": ["Git", "Docker", ...],
        "databases": ["PostgreSQL", "MongoDB", ...],
        "cloud_platforms": ["AWS", "Azure", ...]
    },
    "experience": [
        {
            "company": "Company name",
            "position": "Job title",
            "duration": "Start date - End date",
            "description": "Key responsibilities and achievements"
        }
    ],
    "education": [
        {
            "institution": "School/University name",
            "degree": "Degree type",
            "field": "Field of study",
            "graduation_year": "YYYY" or null
        }
    ],
    "projects": [
        {
            "name": "Project name",
            "description": "Project description",
            "technologies": ["tech1", "tech2", ...]
        }
    ]
}

Be thorough and extract all relevant technical information. If a field is not available, use null or an empty list.
Focus on technical skills, programming languages, frameworks, and experience relevant to software engineering."#;

/// Header placed before extracted resume text in the text-only fallback.
pub const RESUME_TEXT_HEADER: &str = "RESUME TEXT:";

/// The vision model needs room for long experience sections.
pub const RESUME_PARSE_MAX_TOKENS: u32 = 4096;
