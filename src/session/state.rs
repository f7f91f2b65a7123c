//! Session stage machine and the context every stage reads and writes.
//!
//! [`SessionContext`] is plain owned data.  The driver of a session (the
//! terminal loop or the widget's background worker) owns exactly one; the
//! widget UI only ever receives clones of it.

use crate::interview::{
    Answer, Difficulty, Evaluation, JobAnalysis, JobInfo, Question, QuestionCounts,
};

/// Estimated answering time per question, shown before generation.
pub const MINUTES_PER_QUESTION: u32 = 2;

// ---------------------------------------------------------------------------
// Stage
// ---------------------------------------------------------------------------

/// Stages of an interview session.
///
/// ```text
/// CollectJobInfo ──job info──▶ AnalyzeJob
///                ──analysis──▶ ConfigureQuestionCounts
///                ──questions─▶ AskAndRecord
///                ──all asked─▶ Evaluate
///                ──feedback──▶ Complete
/// any stage ──reset──▶ CollectJobInfo
/// ```
///
/// A failed stage leaves the session where it was so it can be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    #[default]
    CollectJobInfo,
    AnalyzeJob,
    ConfigureQuestionCounts,
    AskAndRecord,
    Evaluate,
    Complete,
}

impl Stage {
    /// The five user-visible steps, in order.
    pub const STEPS: [Stage; 5] = [
        Stage::CollectJobInfo,
        Stage::AnalyzeJob,
        Stage::ConfigureQuestionCounts,
        Stage::AskAndRecord,
        Stage::Evaluate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::CollectJobInfo => "Job Information",
            Stage::AnalyzeJob => "Job Analysis",
            Stage::ConfigureQuestionCounts => "Question Setup",
            Stage::AskAndRecord => "Interview",
            Stage::Evaluate => "Evaluation",
            Stage::Complete => "Complete",
        }
    }

    /// Position in the stage order; `Complete` is 5.
    pub fn index(&self) -> usize {
        match self {
            Stage::CollectJobInfo => 0,
            Stage::AnalyzeJob => 1,
            Stage::ConfigureQuestionCounts => 2,
            Stage::AskAndRecord => 3,
            Stage::Evaluate => 4,
            Stage::Complete => 5,
        }
    }

    /// Status of `step` as seen from `self`.
    ///
    /// ```
    /// use interview_coach::session::{Stage, StepStatus};
    ///
    /// let now = Stage::ConfigureQuestionCounts;
    /// assert_eq!(now.step_status(Stage::AnalyzeJob), StepStatus::Done);
    /// assert_eq!(now.step_status(now), StepStatus::Current);
    /// assert_eq!(now.step_status(Stage::Evaluate), StepStatus::Pending);
    /// ```
    pub fn step_status(&self, step: Stage) -> StepStatus {
        use std::cmp::Ordering;
        match step.index().cmp(&self.index()) {
            Ordering::Less => StepStatus::Done,
            Ordering::Equal => StepStatus::Current,
            Ordering::Greater => StepStatus::Pending,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Marker for the step list in both front ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Done,
    Current,
    Pending,
}

impl StepStatus {
    pub fn marker(&self) -> &'static str {
        match self {
            StepStatus::Done => "✅",
            StepStatus::Current => "▶",
            StepStatus::Pending => "○",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionContext
// ---------------------------------------------------------------------------

/// Everything a session has gathered so far.
///
/// `answers[i]` always belongs to `questions[i]`; the question currently
/// being asked is `questions[answers.len()]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionContext {
    pub stage: Stage,
    pub job_info: Option<JobInfo>,
    pub difficulty: Difficulty,
    pub analysis: Option<JobAnalysis>,
    pub counts: QuestionCounts,
    pub questions: Vec<Question>,
    pub answers: Vec<Answer>,
    pub evaluations: Vec<Evaluation>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything and return to [`Stage::CollectJobInfo`].
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Index and question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<(usize, &Question)> {
        let index = self.answers.len();
        self.questions.get(index).map(|q| (index, q))
    }

    pub fn all_answered(&self) -> bool {
        !self.questions.is_empty() && self.answers.len() >= self.questions.len()
    }

    /// Answers with a non-empty transcript.
    pub fn usable_answers(&self) -> usize {
        self.answers.iter().filter(|a| !a.is_empty()).count()
    }

    /// Fraction of questions answered, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f32 {
        if self.questions.is_empty() {
            return 0.0;
        }
        self.answers.len().min(self.questions.len()) as f32 / self.questions.len() as f32
    }

    /// `"Question 2 of 5 (Technical)"` for the current question.
    pub fn progress_label(&self) -> Option<String> {
        self.current_question().map(|(i, q)| {
            format!(
                "Question {} of {} ({})",
                i + 1,
                self.questions.len(),
                q.category.label()
            )
        })
    }

    /// Feedback for the pair at `index`, if it was evaluated.
    pub fn evaluation_for(&self, index: usize) -> Option<&Evaluation> {
        self.evaluations.iter().find(|e| e.question_index == index)
    }
}

/// Estimated minutes to answer `counts`.
pub fn estimated_minutes(counts: &QuestionCounts) -> u32 {
    counts.total() * MINUTES_PER_QUESTION
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::Category;

    fn question(text: &str, category: Category) -> Question {
        Question {
            text: text.into(),
            category,
            difficulty: Difficulty::Easy,
        }
    }

    #[test]
    fn default_starts_collecting_job_info() {
        let ctx = SessionContext::new();
        assert_eq!(ctx.stage, Stage::CollectJobInfo);
        assert!(ctx.current_question().is_none());
        assert_eq!(ctx.progress(), 0.0);
    }

    #[test]
    fn current_question_follows_answers() {
        let mut ctx = SessionContext::new();
        ctx.questions = vec![
            question("B1", Category::Behavioral),
            question("T1", Category::Technical),
        ];
        assert_eq!(ctx.current_question().map(|(i, _)| i), Some(0));

        ctx.answers.push(Answer::new("first"));
        let (i, q) = ctx.current_question().unwrap();
        assert_eq!((i, q.text.as_str()), (1, "T1"));
        assert_eq!(
            ctx.progress_label().as_deref(),
            Some("Question 2 of 2 (Technical)")
        );

        ctx.answers.push(Answer::default());
        assert!(ctx.current_question().is_none());
        assert!(ctx.all_answered());
        assert_eq!(ctx.usable_answers(), 1);
        assert_eq!(ctx.progress(), 1.0);
    }

    #[test]
    fn reset_clears_everything() {
        let mut ctx = SessionContext {
            stage: Stage::Evaluate,
            difficulty: Difficulty::Hard,
            questions: vec![question("Q", Category::Situational)],
            answers: vec![Answer::new("A")],
            ..SessionContext::default()
        };
        ctx.reset();
        assert_eq!(ctx, SessionContext::default());
    }

    #[test]
    fn step_status_markers() {
        let now = Stage::AskAndRecord;
        let markers: Vec<_> = Stage::STEPS
            .iter()
            .map(|s| now.step_status(*s))
            .collect();
        assert_eq!(
            markers,
            [
                StepStatus::Done,
                StepStatus::Done,
                StepStatus::Done,
                StepStatus::Current,
                StepStatus::Pending
            ]
        );
        assert!(Stage::Complete
            .step_status(Stage::Evaluate)
            .eq(&StepStatus::Done));
    }

    #[test]
    fn two_minutes_per_question() {
        assert_eq!(estimated_minutes(&QuestionCounts::new(2, 2, 1)), 10);
        assert_eq!(estimated_minutes(&QuestionCounts::default()), 0);
    }
}
