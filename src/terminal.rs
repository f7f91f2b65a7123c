//! Line-oriented terminal front end.
//!
//! [`Console`] is generic over its input and output so prompts can be driven
//! from a byte buffer in tests.  Invalid entries are reported and asked
//! again; end of input is an [`io::ErrorKind::UnexpectedEof`] error.

use std::io::{self, BufRead, Write};

use crate::interview::{Category, Difficulty, Evaluation, JobAnalysis, JobInfo, Question, QuestionCounts};
use crate::session::{estimated_minutes, SessionContext};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print `label`, read one line and return it trimmed.
    pub fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn prompt_required(&mut self, label: &str, what: &str) -> io::Result<String> {
        loop {
            let value = self.prompt(label)?;
            if !value.is_empty() {
                return Ok(value);
            }
            writeln!(self.output, "Please enter the {what}.")?;
        }
    }

    pub fn say(&mut self, text: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    pub fn read_api_key(&mut self) -> io::Result<String> {
        self.prompt_required("Enter your Gemini API key: ", "API key")
    }

    pub fn read_job_info(&mut self) -> io::Result<JobInfo> {
        let profile = self.prompt_required("Enter the job profile: ", "job profile")?;
        let description = self.prompt_required("Enter the job description: ", "job description")?;
        Ok(JobInfo {
            profile,
            description,
        })
    }

    pub fn read_difficulty(&mut self) -> io::Result<Difficulty> {
        loop {
            let raw = self.prompt("Enter difficulty (easy, medium, hard): ")?;
            match raw.parse::<Difficulty>() {
                Ok(difficulty) => return Ok(difficulty),
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    fn read_count(&mut self, category: Category, max: u32) -> io::Result<u32> {
        let label = format!("How many {category} questions? (0-{max}): ");
        loop {
            match self.prompt(&label)?.parse::<u32>() {
                Ok(n) if n <= max => return Ok(n),
                _ => writeln!(self.output, "Enter a whole number from 0 to {max}.")?,
            }
        }
    }

    /// Ask for all three counts until they pass [`QuestionCounts::validate`].
    pub fn read_counts(&mut self, max: u32) -> io::Result<QuestionCounts> {
        loop {
            let mut counts = QuestionCounts::default();
            for category in Category::ALL {
                *counts.get_mut(category) = self.read_count(category, max)?;
            }
            match counts.validate(max) {
                Ok(()) => {
                    writeln!(
                        self.output,
                        "{} questions, about {} minutes.",
                        counts.total(),
                        estimated_minutes(&counts)
                    )?;
                    return Ok(counts);
                }
                Err(e) => writeln!(self.output, "{e}")?,
            }
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    pub fn show_analysis(&mut self, analysis: &JobAnalysis) -> io::Result<()> {
        let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".into());
        let list = |v: &[String]| if v.is_empty() { "N/A".to_string() } else { v.join(", ") };

        writeln!(self.output, "\n=== Job Analysis ===")?;
        writeln!(self.output, "Title:            {}", na(&analysis.job_title))?;
        writeln!(self.output, "Seniority:        {}", na(&analysis.seniority_level))?;
        writeln!(self.output, "Industry:         {}", na(&analysis.industry))?;
        writeln!(self.output, "Experience:       {}", na(&analysis.experience_years))?;
        writeln!(self.output, "Technical skills: {}", list(&analysis.technical_skills))?;
        writeln!(self.output, "Soft skills:      {}", list(&analysis.soft_skills))?;
        writeln!(self.output, "Responsibilities: {}", list(&analysis.key_responsibilities))?;
        writeln!(self.output)
    }

    pub fn show_question(&mut self, ctx: &SessionContext, question: &Question) -> io::Result<()> {
        if let Some(progress) = ctx.progress_label() {
            writeln!(self.output, "\n{progress}")?;
        }
        writeln!(self.output, "{}", question.text)?;
        writeln!(self.output, "Tips: {}", question.category.tips().join(" | "))
    }

    pub fn show_evaluations(
        &mut self,
        ctx: &SessionContext,
        evaluations: &[Evaluation],
    ) -> io::Result<()> {
        writeln!(self.output, "\n=== Evaluation ===")?;
        for (index, question) in ctx.questions.iter().enumerate() {
            writeln!(self.output, "\nQ{}: {}", index + 1, question.text)?;
            let answer = ctx
                .answers
                .get(index)
                .filter(|a| !a.is_empty())
                .map(|a| a.transcript.as_str())
                .unwrap_or("(no answer)");
            writeln!(self.output, "Your answer: {answer}")?;
            match evaluations.iter().find(|e| e.question_index == index) {
                Some(e) => writeln!(self.output, "{}", e.feedback)?,
                None => writeln!(self.output, "(not evaluated)")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::Answer;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(c: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(c.output).unwrap()
    }

    #[test]
    fn job_info_reasks_blank_fields() {
        let mut c = console("\nBackend Engineer\n  \nBuild APIs\n");
        let info = c.read_job_info().unwrap();
        assert_eq!(info.profile, "Backend Engineer");
        assert_eq!(info.description, "Build APIs");
        assert!(output(c).contains("Please enter the job profile."));
    }

    #[test]
    fn difficulty_reasks_until_valid() {
        let mut c = console("extreme\n MEDIUM \n");
        assert_eq!(c.read_difficulty().unwrap(), Difficulty::Medium);
        assert!(output(c).contains("extreme"));
    }

    #[test]
    fn counts_reject_out_of_range_and_all_zero() {
        let mut c = console("11\n1\nx\n1\n1\n0\n0\n0\n0\n0\n2\n");
        let counts = c.read_counts(10).unwrap();
        assert_eq!(counts, QuestionCounts::new(1, 1, 1));

        let mut c = console("0\n0\n0\n0\n2\n0\n");
        let counts = c.read_counts(10).unwrap();
        assert_eq!(counts, QuestionCounts::new(0, 2, 0));
        let out = output(c);
        assert!(out.contains("select at least one type of question"));
        assert!(out.contains("about 4 minutes"));
    }

    #[test]
    fn eof_is_unexpected_eof() {
        let mut c = console("");
        let err = c.read_difficulty().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn analysis_shows_na_for_missing_fields() {
        let mut c = console("");
        let analysis = JobAnalysis {
            job_title: Some("Engineer".into()),
            technical_skills: vec!["Go".into(), "SQL".into()],
            ..JobAnalysis::default()
        };
        c.show_analysis(&analysis).unwrap();
        let out = output(c);
        assert!(out.contains("Title:            Engineer"));
        assert!(out.contains("Seniority:        N/A"));
        assert!(out.contains("Go, SQL"));
    }

    #[test]
    fn evaluations_mark_unanswered_questions() {
        let q = |text: &str| Question {
            text: text.into(),
            category: Category::Technical,
            difficulty: Difficulty::Easy,
        };
        let ctx = SessionContext {
            questions: vec![q("Q one"), q("Q two")],
            answers: vec![Answer::new("answer one"), Answer::default()],
            ..SessionContext::default()
        };
        let evals = [Evaluation {
            question_index: 0,
            feedback: "SCORE: 8/10".into(),
        }];
        let mut c = console("");
        c.show_evaluations(&ctx, &evals).unwrap();
        let out = output(c);
        assert!(out.contains("SCORE: 8/10"));
        assert!(out.contains("(no answer)"));
        assert!(out.contains("(not evaluated)"));
    }
}
