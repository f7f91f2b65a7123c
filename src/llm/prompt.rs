//! Prompt templates for job analysis, question generation and answer
//! evaluation.
//!
//! Every question prompt embeds a difficulty-specific instruction block
//! chosen from a fixed `(Category, Difficulty)` table, and asks the model for
//! a plain numbered list so [`crate::llm::parse_numbered_list`] can read it.

use serde_json::{json, Value};

use crate::interview::types::or_placeholder;
use crate::interview::{Category, Difficulty, JobAnalysis, JobInfo};

// ---------------------------------------------------------------------------
// Job analysis
// ---------------------------------------------------------------------------

/// Prompt asking the model to summarise a posting as a JSON object.
pub fn job_analysis_prompt(info: &JobInfo) -> String {
    format!(
        r#"
Analyze this job description and extract key information. Return your response as a valid JSON object with no extra text or formatting.

Job Profile: {profile}
Job Description: {description}

Return EXACTLY this JSON structure with actual values filled in:
{{
  "job_title": "exact title from posting",
  "seniority_level": "entry/mid/senior/lead",
  "technical_skills": ["skill1", "skill2"],
  "soft_skills": ["skill1", "skill2"],
  "industry": "industry type",
  "experience_years": "X-Y years or not specified",
  "team_role": "individual_contributor/team_lead/manager",
  "key_responsibilities": ["responsibility1", "responsibility2"]
}}

IMPORTANT: Return ONLY the JSON object, no explanations or additional text.
"#,
        profile = info.profile.trim(),
        description = info.description.trim(),
    )
}

/// Response schema for schema-constrained generation of a [`JobAnalysis`]
/// (OpenAPI subset accepted by Gemini's `responseSchema`).
pub fn job_analysis_schema() -> Value {
    let string = json!({ "type": "STRING" });
    let list = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "job_title": string,
            "seniority_level": string,
            "technical_skills": list,
            "soft_skills": list,
            "industry": string,
            "experience_years": string,
            "team_role": string,
            "key_responsibilities": list
        },
        "required": ["job_title", "seniority_level", "technical_skills", "soft_skills"]
    })
}

// ---------------------------------------------------------------------------
// Difficulty instruction blocks
// ---------------------------------------------------------------------------

const BEHAVIORAL_EASY: &str = "\
- Focus on basic workplace scenarios and learning experiences
- Ask about simple challenges and how they overcame them
- Questions about teamwork and communication at entry level
- Example: \"Tell me about a time you had to learn something new quickly\"";

const BEHAVIORAL_MEDIUM: &str = "\
- Focus on project ownership and cross-team collaboration
- Ask about handling competing priorities and difficult decisions
- Questions about leadership moments and conflict resolution
- Example: \"Describe a time you had to manage multiple stakeholders with different priorities\"";

const BEHAVIORAL_HARD: &str = "\
- Focus on strategic decision-making and organizational impact
- Ask about leading through crisis and complex problem-solving
- Questions about mentoring, architecture decisions, and business impact
- Example: \"Tell me about a time you had to make a critical decision that affected the entire organization\"";

const TECHNICAL_EASY: &str = "\
- Focus on fundamental concepts and basic implementation
- Ask about simple coding problems and basic system understanding
- Test core technology knowledge without complex scenarios
- Example: \"How would you implement a basic REST API endpoint?\"";

const TECHNICAL_MEDIUM: &str = "\
- Focus on practical problem-solving and best practices
- Ask about debugging, optimization, and design patterns
- Test ability to explain trade-offs and handle moderate complexity
- Example: \"How would you optimize a slow database query and what factors would you consider?\"";

const TECHNICAL_HARD: &str = "\
- Focus on system design, architecture, and complex problem-solving
- Ask about scalability, distributed systems, and technical leadership
- Test ability to design solutions and make architectural decisions
- Example: \"Design a distributed system to handle 1 million concurrent users with 99.9% uptime\"";

const SITUATIONAL_EASY: &str = "\
- Focus on individual contributor scenarios and basic professional situations
- Ask about learning from mistakes and asking for help
- Simple conflict resolution and priority management
- Example: \"What would you do if you realized you made an error that affected your team?\"";

const SITUATIONAL_MEDIUM: &str = "\
- Focus on project ownership and cross-team collaboration
- Ask about managing competing demands and difficult conversations
- Moderate stakeholder management and team coordination
- Example: \"How would you handle conflicting requirements from two different departments?\"";

const SITUATIONAL_HARD: &str = "\
- Focus on organizational leadership and strategic decision-making
- Ask about crisis management and transformational change
- Complex stakeholder management and business-critical decisions
- Example: \"What would you do if you had to lead a critical project with unclear requirements and tight deadlines?\"";

/// Instruction block for one `(category, difficulty)` cell.
pub fn difficulty_requirements(category: Category, difficulty: Difficulty) -> &'static str {
    use Category::*;
    use Difficulty::*;

    match (category, difficulty) {
        (Behavioral, Easy) => BEHAVIORAL_EASY,
        (Behavioral, Medium) => BEHAVIORAL_MEDIUM,
        (Behavioral, Hard) => BEHAVIORAL_HARD,
        (Technical, Easy) => TECHNICAL_EASY,
        (Technical, Medium) => TECHNICAL_MEDIUM,
        (Technical, Hard) => TECHNICAL_HARD,
        (Situational, Easy) => SITUATIONAL_EASY,
        (Situational, Medium) => SITUATIONAL_MEDIUM,
        (Situational, Hard) => SITUATIONAL_HARD,
    }
}

// ---------------------------------------------------------------------------
// Question generation
// ---------------------------------------------------------------------------

const LIST_FORMAT: &str = "\
Format your response as:
1. [First question]
2. [Second question]
3. [Third question]
etc.

Generate ONLY the numbered questions, no additional text.";

/// Prompt asking for `count` questions of `category` at `difficulty`.
pub fn question_prompt(
    category: Category,
    analysis: &JobAnalysis,
    count: u32,
    difficulty: Difficulty,
) -> String {
    match category {
        Category::Behavioral => behavioral_prompt(analysis, count, difficulty),
        Category::Technical => technical_prompt(analysis, count, difficulty),
        Category::Situational => situational_prompt(analysis, count, difficulty),
    }
}

fn behavioral_prompt(analysis: &JobAnalysis, count: u32, difficulty: Difficulty) -> String {
    let job_title = or_placeholder(&analysis.job_title, "the position");
    let seniority = or_placeholder(&analysis.seniority_level, "mid-level");

    format!(
        "
Generate {count} behavioral interview questions for a {job_title} position at {seniority} level.

DIFFICULTY LEVEL: {level}
{requirements}

Focus on these soft skills: {soft_skills}
Key responsibilities: {responsibilities}

Requirements for each question:
1. Use STAR method (Situation, Task, Action, Result)
2. Match {difficulty} difficulty level complexity
3. Be specific to this role and seniority level
4. Test real workplace scenarios appropriate for {difficulty} level
5. Be answerable in 2-3 minutes

{LIST_FORMAT}
",
        level = difficulty.as_str().to_uppercase(),
        requirements = difficulty_requirements(Category::Behavioral, difficulty),
        soft_skills = analysis.soft_skills.join(", "),
        responsibilities = analysis.key_responsibilities.join(", "),
    )
}

fn technical_prompt(analysis: &JobAnalysis, count: u32, difficulty: Difficulty) -> String {
    let job_title = or_placeholder(&analysis.job_title, "the position");
    let seniority = or_placeholder(&analysis.seniority_level, "mid-level");

    format!(
        "
Generate {count} technical interview questions for a {job_title} position at {seniority} level.

DIFFICULTY LEVEL: {level}
{requirements}

Required technical skills: {technical_skills}

Requirements for each question:
1. Match {difficulty} difficulty level complexity
2. Focus on practical application appropriate for {difficulty} level
3. Can be answered in 2-3 minutes
4. Test real-world problem-solving at {difficulty} level
5. Specific to the required technologies

{LIST_FORMAT}
",
        level = difficulty.as_str().to_uppercase(),
        requirements = difficulty_requirements(Category::Technical, difficulty),
        technical_skills = analysis.technical_skills.join(", "),
    )
}

fn situational_prompt(analysis: &JobAnalysis, count: u32, difficulty: Difficulty) -> String {
    let job_title = or_placeholder(&analysis.job_title, "the position");
    let industry = or_placeholder(&analysis.industry, "technology");
    let team_role = or_placeholder(&analysis.team_role, "individual_contributor");

    format!(
        "
Generate {count} situational interview questions for a {job_title} in {industry} industry.

DIFFICULTY LEVEL: {level}
{requirements}

Team role: {team_role}

Requirements for each question:
1. Present realistic workplace scenarios for {difficulty} level
2. Test decision-making appropriate for {difficulty} complexity
3. Match the responsibility level and industry context
4. Start with \"What would you do if...\" or \"How would you handle...\"
5. Be specific to the work environment

{LIST_FORMAT}
",
        level = difficulty.as_str().to_uppercase(),
        requirements = difficulty_requirements(Category::Situational, difficulty),
    )
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Prompt asking the model to coach one answer.
pub fn evaluation_prompt(
    analysis: &JobAnalysis,
    question: &str,
    answer: &str,
    difficulty: Difficulty,
) -> String {
    format!(
        r#"
You are an expert interview coach. Evaluate this candidate's answer and provide constructive feedback.

CONTEXT:
- Job Title: {job_title}
- Seniority Level: {seniority}
- Required Skills: {skills}
- Difficulty Level: {difficulty}

QUESTION ASKED:
{question}

CANDIDATE'S ANSWER:
{answer}

Please provide evaluation in this EXACT format:

SCORE: [X/10]

STRENGTHS:
- [Strength 1]
- [Strength 2]
- [Strength 3]

AREAS FOR IMPROVEMENT:
- [Area 1]
- [Area 2]
- [Area 3]

BETTER PHRASING SUGGESTIONS:
Instead of: "[problematic phrase from answer]"
Try: "[improved version]"

Instead of: "[another problematic phrase]"
Try: "[improved version]"

RECOMMENDED KEYWORDS TO USE:
- [keyword 1] - [why it's important]
- [keyword 2] - [why it's important]
- [keyword 3] - [why it's important]

OVERALL FEEDBACK:
[2-3 sentences of constructive advice]

Evaluate based on:
1. Structure and clarity
2. Relevance to the question
3. Use of specific examples
4. Professional language
5. Depth appropriate for {difficulty} level
"#,
        job_title = or_placeholder(&analysis.job_title, "N/A"),
        seniority = or_placeholder(&analysis.seniority_level, "N/A"),
        skills = analysis.required_skills().join(", "),
        question = question.trim(),
        answer = answer.trim(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_analysis() -> JobAnalysis {
        JobAnalysis {
            job_title: Some("Backend Engineer".into()),
            seniority_level: Some("senior".into()),
            technical_skills: vec!["Rust".into(), "Kafka".into()],
            soft_skills: vec!["ownership".into(), "mentoring".into()],
            industry: Some("logistics".into()),
            experience_years: Some("5+ years".into()),
            team_role: Some("team_lead".into()),
            key_responsibilities: vec!["design services".into()],
        }
    }

    #[test]
    fn analysis_prompt_embeds_job_info() {
        let prompt = job_analysis_prompt(&JobInfo {
            profile: "Backend Engineer".into(),
            description: "Build payment APIs in Rust.".into(),
        });
        assert!(prompt.contains("Job Profile: Backend Engineer"));
        assert!(prompt.contains("Job Description: Build payment APIs in Rust."));
        assert!(prompt.contains("\"key_responsibilities\""));
        assert!(!prompt.contains("{{"), "escaped braces must render single");
    }

    #[test]
    fn schema_lists_every_field() {
        let schema = job_analysis_schema();
        for field in [
            "job_title",
            "seniority_level",
            "technical_skills",
            "soft_skills",
            "industry",
            "experience_years",
            "team_role",
            "key_responsibilities",
        ] {
            assert!(schema["properties"].get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn every_cell_has_a_distinct_block() {
        let mut seen = std::collections::HashSet::new();
        for category in Category::ALL {
            for difficulty in Difficulty::ALL {
                let block = difficulty_requirements(category, difficulty);
                assert!(block.contains("Example:"));
                assert!(seen.insert(block), "{category}/{difficulty} reused a block");
            }
        }
    }

    #[test]
    fn behavioral_prompt_uses_soft_skills() {
        let prompt = question_prompt(
            Category::Behavioral,
            &backend_analysis(),
            3,
            Difficulty::Medium,
        );
        assert!(prompt.contains("Generate 3 behavioral interview questions"));
        assert!(prompt.contains("Backend Engineer position at senior level"));
        assert!(prompt.contains("DIFFICULTY LEVEL: MEDIUM"));
        assert!(prompt.contains("ownership, mentoring"));
        assert!(prompt.contains("design services"));
        assert!(prompt.contains(BEHAVIORAL_MEDIUM));
        assert!(prompt.contains("Generate ONLY the numbered questions"));
    }

    #[test]
    fn technical_prompt_uses_technical_skills() {
        let prompt = question_prompt(Category::Technical, &backend_analysis(), 2, Difficulty::Hard);
        assert!(prompt.contains("Generate 2 technical interview questions"));
        assert!(prompt.contains("Required technical skills: Rust, Kafka"));
        assert!(prompt.contains(TECHNICAL_HARD));
    }

    #[test]
    fn situational_prompt_uses_industry_and_role() {
        let prompt =
            question_prompt(Category::Situational, &backend_analysis(), 1, Difficulty::Easy);
        assert!(prompt.contains("for a Backend Engineer in logistics industry"));
        assert!(prompt.contains("Team role: team_lead"));
        assert!(prompt.contains(SITUATIONAL_EASY));
    }

    #[test]
    fn missing_fields_use_placeholders() {
        let empty = JobAnalysis::default();

        let behavioral = question_prompt(Category::Behavioral, &empty, 1, Difficulty::Easy);
        assert!(behavioral.contains("the position position at mid-level level"));

        let situational = question_prompt(Category::Situational, &empty, 1, Difficulty::Easy);
        assert!(situational.contains("in technology industry"));
        assert!(situational.contains("Team role: individual_contributor"));

        let evaluation = evaluation_prompt(&empty, "Q", "A", Difficulty::Easy);
        assert!(evaluation.contains("- Job Title: N/A"));
        assert!(evaluation.contains("- Seniority Level: N/A"));
    }

    #[test]
    fn evaluation_prompt_embeds_pair_and_skills() {
        let prompt = evaluation_prompt(
            &backend_analysis(),
            "Tell me about a migration you led.",
            "We moved billing to Kafka.",
            Difficulty::Hard,
        );
        assert!(prompt.contains("QUESTION ASKED:\nTell me about a migration you led."));
        assert!(prompt.contains("CANDIDATE'S ANSWER:\nWe moved billing to Kafka."));
        assert!(prompt.contains("Required Skills: Rust, Kafka, ownership, mentoring"));
        assert!(prompt.contains("Difficulty Level: hard"));
        assert!(prompt.contains("SCORE: [X/10]"));
    }
}
