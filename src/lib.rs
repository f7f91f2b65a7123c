//! Interview Coach — spoken mock interviews driven by a language model.
//!
//! A session walks five stages: collect the job details, analyse them,
//! choose how many questions of each kind to ask, ask and record each
//! answer, then evaluate the transcripts.  See [`session::InterviewSession`].

pub mod app;
pub mod audio;
pub mod config;
pub mod interview;
pub mod llm;
pub mod session;
pub mod stt;
pub mod terminal;
pub mod tts;
