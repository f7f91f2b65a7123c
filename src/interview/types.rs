//! Interview domain types: difficulty, category, job analysis, and the
//! question / answer / evaluation records accumulated during a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::error::InterviewError;

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// Difficulty tier selecting the instruction block of every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lower-case tag as used in prompts (`"easy"`, `"medium"`, `"hard"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a difficulty tag.  Surrounding whitespace and letter case are
/// ignored; anything else outside `easy | medium | hard` is an
/// [`InterviewError::Input`].
///
/// ```
/// use interview_coach::interview::Difficulty;
///
/// assert_eq!(" Medium ".parse::<Difficulty>().unwrap(), Difficulty::Medium);
/// assert!("extreme".parse::<Difficulty>().is_err());
/// ```
impl FromStr for Difficulty {
    type Err = InterviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(InterviewError::input(format!(
                "unknown difficulty {other:?} (expected easy, medium or hard)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Question template family.  [`Category::ALL`] is also the order in which a
/// session generates and asks questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Behavioral,
    Technical,
    Situational,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::Behavioral,
        Category::Technical,
        Category::Situational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Behavioral => "behavioral",
            Category::Technical => "technical",
            Category::Situational => "situational",
        }
    }

    /// Capitalised name for display.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Behavioral => "Behavioral",
            Category::Technical => "Technical",
            Category::Situational => "Situational",
        }
    }

    /// Short answering tips shown next to a question of this category.
    pub fn tips(&self) -> &'static [&'static str] {
        match self {
            Category::Behavioral => &[
                "Use the STAR method",
                "Give specific examples",
                "Show impact and results",
            ],
            Category::Technical => &[
                "Think out loud",
                "Explain trade-offs",
                "Consider edge cases",
            ],
            Category::Situational => &[
                "Show problem-solving",
                "Consider stakeholders",
                "Explain your reasoning",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// QuestionCounts
// ---------------------------------------------------------------------------

/// Requested number of questions per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionCounts {
    pub behavioral: u32,
    pub technical: u32,
    pub situational: u32,
}

impl QuestionCounts {
    pub fn new(behavioral: u32, technical: u32, situational: u32) -> Self {
        Self {
            behavioral,
            technical,
            situational,
        }
    }

    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Behavioral => self.behavioral,
            Category::Technical => self.technical,
            Category::Situational => self.situational,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut u32 {
        match category {
            Category::Behavioral => &mut self.behavioral,
            Category::Technical => &mut self.technical,
            Category::Situational => &mut self.situational,
        }
    }

    pub fn total(&self) -> u32 {
        self.behavioral + self.technical + self.situational
    }

    /// Rejects a total of zero and any single count above `max_per_category`.
    pub fn validate(&self, max_per_category: u32) -> Result<(), InterviewError> {
        for category in Category::ALL {
            let count = self.get(category);
            if count > max_per_category {
                return Err(InterviewError::input(format!(
                    "{count} {category} questions requested (maximum {max_per_category})"
                )));
            }
        }
        if self.total() == 0 {
            return Err(InterviewError::input(
                "select at least one type of question",
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JobAnalysis
// ---------------------------------------------------------------------------

/// Structured summary of a job posting, extracted by the language model.
///
/// Deserialisation is lenient: every field may be missing, scalar fields may
/// arrive as numbers, and list fields may arrive as a single string.  Absent
/// scalars stay `None`; prompts substitute their own placeholder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobAnalysis {
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub seniority_level: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub technical_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub soft_skills: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub experience_years: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub team_role: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub key_responsibilities: Vec<String>,
}

impl JobAnalysis {
    /// Convert an extracted JSON value into a `JobAnalysis`.
    ///
    /// Anything other than a JSON object is a parse error.
    pub fn from_value(value: Value) -> Result<Self, InterviewError> {
        if !value.is_object() {
            return Err(InterviewError::parse(
                "job analysis is not a JSON object",
                &value.to_string(),
            ));
        }
        let text = value.to_string();
        serde_json::from_value(value)
            .map_err(|e| InterviewError::parse(format!("job analysis: {e}"), &text))
    }

    /// Technical skills followed by soft skills.
    pub fn required_skills(&self) -> Vec<&str> {
        self.technical_skills
            .iter()
            .chain(self.soft_skills.iter())
            .map(String::as_str)
            .collect()
    }
}

/// Returns the field value or `placeholder` when absent.
pub(crate) fn or_placeholder<'a>(field: &'a Option<String>, placeholder: &'a str) -> &'a str {
    field.as_deref().unwrap_or(placeholder)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(other) => Some(other.to_string()),
    })
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let items = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) => vec![s],
        Some(other) => vec![other.to_string()],
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

// ---------------------------------------------------------------------------
// Session records
// ---------------------------------------------------------------------------

/// Job details entered by the user at the start of a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobInfo {
    pub profile: String,
    pub description: String,
}

/// A generated interview question.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub text: String,
    pub category: Category,
    pub difficulty: Difficulty,
}

/// A transcribed answer.  An empty transcript means nothing usable was
/// captured for the question at the same index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answer {
    pub transcript: String,
}

impl Answer {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            transcript: transcript.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transcript.trim().is_empty()
    }
}

/// Free-form feedback for the question/answer pair at `question_index`.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub question_index: usize,
    pub feedback: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn difficulty_parses_known_tags() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
    }

    #[test]
    fn unknown_difficulty_is_input_error() {
        for tag in ["", "expert", "med", "easy-ish", "3"] {
            let err = tag.parse::<Difficulty>().unwrap_err();
            assert!(
                matches!(err, InterviewError::Input(_)),
                "tag {tag:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn category_order_is_behavioral_technical_situational() {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, ["behavioral", "technical", "situational"]);
    }

    #[test]
    fn every_category_has_tips() {
        for category in Category::ALL {
            assert_eq!(category.tips().len(), 3);
        }
    }

    #[test]
    fn counts_reject_zero_total() {
        let err = QuestionCounts::new(0, 0, 0).validate(10).unwrap_err();
        assert!(matches!(err, InterviewError::Input(_)));
    }

    #[test]
    fn counts_reject_above_maximum() {
        assert!(QuestionCounts::new(11, 0, 0).validate(10).is_err());
        assert!(QuestionCounts::new(10, 0, 1).validate(10).is_ok());
    }

    #[test]
    fn counts_get_mut_updates_the_right_field() {
        let mut counts = QuestionCounts::default();
        *counts.get_mut(Category::Technical) = 4;
        assert_eq!(counts, QuestionCounts::new(0, 4, 0));
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn job_analysis_full_object() {
        let value = json!({
            "job_title": "Backend Engineer",
            "seniority_level": "senior",
            "technical_skills": ["Rust", "PostgreSQL"],
            "soft_skills": ["communication"],
            "industry": "fintech",
            "experience_years": "5-7 years",
            "team_role": "individual_contributor",
            "key_responsibilities": ["design APIs"]
        });
        let analysis = JobAnalysis::from_value(value).unwrap();
        assert_eq!(analysis.job_title.as_deref(), Some("Backend Engineer"));
        assert_eq!(analysis.technical_skills, ["Rust", "PostgreSQL"]);
        assert_eq!(
            analysis.required_skills(),
            ["Rust", "PostgreSQL", "communication"]
        );
    }

    #[test]
    fn job_analysis_tolerates_missing_and_odd_fields() {
        let value = json!({
            "job_title": "Engineer",
            "experience_years": 3,
            "soft_skills": "teamwork",
            "technical_skills": null,
            "industry": "  "
        });
        let analysis = JobAnalysis::from_value(value).unwrap();
        assert_eq!(analysis.experience_years.as_deref(), Some("3"));
        assert_eq!(analysis.soft_skills, ["teamwork"]);
        assert!(analysis.technical_skills.is_empty());
        assert!(analysis.industry.is_none());
        assert!(analysis.seniority_level.is_none());
    }

    #[test]
    fn job_analysis_rejects_non_object() {
        let err = JobAnalysis::from_value(json!(["a", "b"])).unwrap_err();
        assert!(matches!(err, InterviewError::Parse { .. }));
    }

    #[test]
    fn placeholder_used_only_when_absent() {
        assert_eq!(or_placeholder(&None, "the position"), "the position");
        assert_eq!(
            or_placeholder(&Some("SRE".into()), "the position"),
            "SRE"
        );
    }

    #[test]
    fn blank_answer_is_empty() {
        assert!(Answer::new("  \n").is_empty());
        assert!(!Answer::new("I led the migration").is_empty());
    }
}
