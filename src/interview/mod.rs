//! Interview domain model.
//!
//! * [`Difficulty`] / [`Category`] — the two tags every question carries.
//! * [`JobAnalysis`] — structured job summary produced by the model.
//! * [`Question`], [`Answer`], [`Evaluation`] — records accumulated during a
//!   session.
//! * [`InterviewError`] — the session-level error taxonomy.

pub mod error;
pub mod types;

pub use error::InterviewError;
pub use types::{
    Answer, Category, Difficulty, Evaluation, JobAnalysis, JobInfo, Question, QuestionCounts,
};
