use serde::{Deserialize, Deserializer, Serialize};

/// Skills extracted from a resume, grouped by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeSkills {
    #[serde(default, deserialize_with = "null_as_default")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub frameworks: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tools: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub databases: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cloud_platforms: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub degree: String,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub graduation_year: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

/// Complete candidate profile extracted from a resume.
///
/// Deserialization is lenient: the vision model routinely emits `null` for
/// lists, numbers as strings, or omits whole sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    #[serde(default = "unknown_candidate", deserialize_with = "name_or_unknown")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub skills: ResumeSkills,
    #[serde(default, deserialize_with = "null_as_default")]
    pub experience: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "loose_years")]
    pub years_of_experience: Option<u32>,
}

impl CandidateProfile {
    /// All skills in category order: languages, frameworks, tools, databases, cloud.
    pub fn all_skills(&self) -> Vec<&str> {
        let s = &self.skills;
        s.languages
            .iter()
            .chain(&s.frameworks)
            .chain(&s.tools)
            .chain(&s.databases)
            .chain(&s.cloud_platforms)
            .map(String::as_str)
            .collect()
    }
}

fn unknown_candidate() -> String {
    "Unknown Candidate".to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn name_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(unknown_candidate))
}

/// Accepts a string or a bare number (e.g. `2021` for a graduation year).
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts an integer, a float (rounded) or a numeric string such as `"5+"`.
fn loose_years<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .filter(|f| f.is_finite() && *f >= 0.0)
            .map(|f| f.round() as u32),
        Some(serde_json::Value::String(s)) => {
            let digits: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse::<f64>().ok().map(|f| f.round() as u32)
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_profile_deserializes() {
        let json = r#"{
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "phone": null,
            "summary": "Analytical engine programmer",
            "years_of_experience": 7,
            "skills": {
                "languages": ["Rust", "Python"],
                "frameworks": ["Axum"],
                "tools": ["Git"],
                "databases": ["PostgreSQL"],
                "cloud_platforms": ["AWS"]
            },
            "experience": [
                {"company": "Babbage Ltd", "position": "Engineer", "duration": "2018 - 2025", "description": "Built things"}
            ],
            "education": [
                {"institution": "University of London", "degree": "BSc", "field": "Mathematics", "graduation_year": 2017}
            ],
            "projects": [
                {"name": "Notes", "description": "Bernoulli numbers", "technologies": ["Punch cards"]}
            ]
        }"#;

        let profile: CandidateProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.name, "Ada Lovelace");
        assert_eq!(profile.years_of_experience, Some(7));
        assert_eq!(profile.education[0].graduation_year.as_deref(), Some("2017"));
        assert_eq!(profile.experience[0].company, "Babbage Ltd");
        assert_eq!(
            profile.all_skills(),
            vec!["Rust", "Python", "Axum", "Git", "PostgreSQL", "AWS"]
        );
    }

    #[test]
    fn test_sparse_profile_uses_defaults() {
        let profile: CandidateProfile =
            serde_json::from_str(r#"{"skills": null, "experience": null, "name": null}"#).unwrap();
        assert_eq!(profile.name, "Unknown Candidate");
        assert!(profile.all_skills().is_empty());
        assert!(profile.experience.is_empty());
        assert!(profile.years_of_experience.is_none());
    }

    #[test]
    fn test_missing_name_defaults_to_unknown() {
        let profile: CandidateProfile = serde_json::from_str("{}").unwrap();
        assert_eq!(profile.name, "Unknown Candidate");
    }

    #[test]
    fn test_years_of_experience_accepts_loose_forms() {
        let parse = |raw: &str| -> Option<u32> {
            let json = format!(r#"{{"years_of_experience": {raw}}}"#);
            serde_json::from_str::<CandidateProfile>(&json)
                .unwrap()
                .years_of_experience
        };
        assert_eq!(parse("4.6"), Some(5));
        assert_eq!(parse(r#""5+""#), Some(5));
        assert_eq!(parse(r#""about five""#), None);
        assert_eq!(parse("null"), None);
        assert_eq!(parse("-2"), None);
    }

    #[test]
    fn test_partial_skill_groups() {
        let profile: CandidateProfile =
            serde_json::from_str(r#"{"name": "Sam", "skills": {"tools": ["Docker"], "languages": null}}"#)
                .unwrap();
        assert_eq!(profile.all_skills(), vec!["Docker"]);
    }
}
