//! Interview session: stage machine, context and driver.
//!
//! ```text
//!   front end (terminal loop / widget worker)
//!          │ owns
//!          ▼
//!   InterviewSession ──► Arc<dyn LlmClient>   job analysis, questions, feedback
//!          │           ──► Arc<dyn Speaker>     read question aloud
//!          │           ──► Arc<dyn Recorder>    fixed-length answer
//!          │           ──► Arc<dyn SttEngine>   transcript
//!          ▼
//!   SessionContext  (cloned into snapshots for the UI)
//! ```

pub mod runner;
pub mod state;

pub use runner::{InterviewSession, SessionSettings, MAX_ANSWER_SECS};
pub use state::{estimated_minutes, SessionContext, Stage, StepStatus, MINUTES_PER_QUESTION};
