//! Session-level error taxonomy.
//!
//! Every stage of an interview session reports failure through
//! [`InterviewError`].  [`InterviewError::Api`] means the model call failed
//! and [`InterviewError::Parse`] that its reply had an unexpected shape.
//! [`InterviewError::Input`] covers unusable user input, and
//! [`InterviewError::Audio`] microphone or transcription failures.

use thiserror::Error;

use crate::audio::RecordError;
use crate::llm::LlmError;
use crate::stt::SttError;

/// Errors surfaced by interview stages.
#[derive(Debug, Error)]
pub enum InterviewError {
    /// The language-model service was unreachable or rejected the request.
    #[error("language model request failed: {0}")]
    Api(#[from] LlmError),

    /// The model response did not contain the expected JSON object or
    /// numbered list.  `text` holds the offending response for diagnostics.
    #[error("could not parse model response: {message}")]
    Parse { message: String, text: String },

    /// Unrecognised difficulty tag, empty required field, invalid counts.
    #[error("invalid input: {0}")]
    Input(String),

    /// Recording or transcription of an answer failed.
    #[error("audio error: {0}")]
    Audio(String),
}

impl InterviewError {
    /// Build a [`InterviewError::Parse`] keeping a copy of the response text.
    pub fn parse(message: impl Into<String>, text: &str) -> Self {
        InterviewError::Parse {
            message: message.into(),
            text: text.to_string(),
        }
    }

    /// Build a [`InterviewError::Input`].
    pub fn input(message: impl Into<String>) -> Self {
        InterviewError::Input(message.into())
    }
}

impl From<RecordError> for InterviewError {
    fn from(e: RecordError) -> Self {
        InterviewError::Audio(e.to_string())
    }
}

impl From<SttError> for InterviewError {
    fn from(e: SttError) -> Self {
        InterviewError::Audio(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_keeps_offending_text() {
        let err = InterviewError::parse("no JSON object found", "just prose");
        match err {
            InterviewError::Parse { message, text } => {
                assert_eq!(message, "no JSON object found");
                assert_eq!(text, "just prose");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn llm_error_converts_to_api() {
        let err: InterviewError = LlmError::Timeout.into();
        assert!(matches!(err, InterviewError::Api(LlmError::Timeout)));
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn stt_error_converts_to_audio() {
        let err: InterviewError = SttError::AudioTooShort.into();
        assert!(matches!(err, InterviewError::Audio(_)));
    }
}
