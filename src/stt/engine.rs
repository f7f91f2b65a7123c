//! Speech-to-text engine trait and implementations.
//!
//! [`SttEngine`] is the interface the interview session transcribes answers
//! through.  It is object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn SttEngine>` and called from `spawn_blocking`.
//!
//! [`WhisperEngine`] wraps a `whisper_rs::WhisperContext` that is loaded once
//! and reused for every answer.  [`MissingModel`] stands in when no model
//! file is present so the application still starts.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters};

use crate::stt::transcribe::{SamplingStrategy, TranscribeParams};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("Whisper model not found: {0}")]
    ModelNotFound(String),

    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Less than 0.5 s of 16 kHz audio.
    #[error("answer audio too short (minimum 0.5 s)")]
    AudioTooShort,

    /// More than 10 minutes of 16 kHz audio.
    #[error("answer audio too long (maximum 10 min)")]
    AudioTooLong,
}

// ---------------------------------------------------------------------------
// SttEngine trait
// ---------------------------------------------------------------------------

/// Transcribes 16 kHz mono `f32` PCM into text.
///
/// Implementations return [`SttError::AudioTooShort`] below
/// [`MIN_AUDIO_SAMPLES`] and [`SttError::AudioTooLong`] above
/// [`MAX_AUDIO_SAMPLES`].
pub trait SttEngine: Send + Sync {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError>;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SttEngine>) {}
};

/// 0.5 s at 16 kHz.
pub const MIN_AUDIO_SAMPLES: usize = 8_000;
/// 10 min at 16 kHz.
pub const MAX_AUDIO_SAMPLES: usize = 9_600_000;

fn check_length(audio: &[f32]) -> Result<(), SttError> {
    if audio.len() < MIN_AUDIO_SAMPLES {
        return Err(SttError::AudioTooShort);
    }
    if audio.len() > MAX_AUDIO_SAMPLES {
        return Err(SttError::AudioTooLong);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// Production engine backed by a local GGML Whisper model.
///
/// A fresh `WhisperState` is created per call, so one engine can serve
/// concurrent callers without locking.
pub struct WhisperEngine {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// SAFETY: whisper-rs declares WhisperContext Send + Sync; the weights are
// read-only after loading and TranscribeParams is plain owned data.
unsafe impl Send for WhisperEngine {}
unsafe impl Sync for WhisperEngine {}

impl WhisperEngine {
    /// Load the GGML model at `model_path`.
    ///
    /// # Errors
    ///
    /// - [`SttError::ModelNotFound`] if the file does not exist.
    /// - [`SttError::ContextInit`] if whisper-rs rejects it.
    pub fn load(model_path: impl AsRef<Path>, params: TranscribeParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(params.use_gpu);
        let ctx = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        log::info!("Whisper model loaded from {}", path.display());
        Ok(Self { ctx, params })
    }

    fn full_params(&self) -> FullParams<'_, '_> {
        use whisper_rs::SamplingStrategy as WS;
        let strategy = match self.params.strategy {
            SamplingStrategy::Greedy { best_of } => WS::Greedy { best_of },
            SamplingStrategy::BeamSearch {
                beam_size,
                patience,
            } => WS::BeamSearch {
                beam_size,
                patience,
            },
        };

        let mut fp = FullParams::new(strategy);
        fp.set_language(self.params.language_hint());
        fp.set_n_threads(self.params.n_threads);
        fp.set_print_progress(false);
        fp.set_print_realtime(false);
        fp.set_print_special(false);
        fp.set_print_timestamps(false);
        fp
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        check_length(audio)?;

        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        let started = std::time::Instant::now();
        state
            .full(self.full_params(), audio)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
            text.push_str(&segment);
        }

        log::debug!(
            "transcribed {:.1}s of audio in {} ms ({n_segments} segments)",
            audio.len() as f32 / 16_000.0,
            started.elapsed().as_millis()
        );
        Ok(text.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// MissingModel
// ---------------------------------------------------------------------------

/// Engine used when the Whisper model could not be loaded.  Every call fails
/// with [`SttError::ModelNotFound`] naming the expected path.
#[derive(Debug, Clone)]
pub struct MissingModel {
    path: String,
}

impl MissingModel {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().display().to_string(),
        }
    }
}

impl SttEngine for MissingModel {
    fn transcribe(&self, _audio: &[f32]) -> Result<String, SttError> {
        Err(SttError::ModelNotFound(self.path.clone()))
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------

/// Returns a pre-configured response without loading any model file.
///
/// The audio-length contract is enforced so callers are tested against it.
#[cfg(test)]
pub struct MockSttEngine {
    response: Result<String, SttError>,
}

#[cfg(test)]
impl MockSttEngine {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
        }
    }

    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
impl SttEngine for MockSttEngine {
    fn transcribe(&self, audio: &[f32]) -> Result<String, SttError> {
        check_length(audio)?;
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_ok_returns_configured_text() {
        let engine = MockSttEngine::ok("I led the migration to Kubernetes.");
        let audio = vec![0.0f32; MIN_AUDIO_SAMPLES];
        assert_eq!(
            engine.transcribe(&audio).unwrap(),
            "I led the migration to Kubernetes."
        );
    }

    #[test]
    fn mock_err_returns_configured_error() {
        let engine = MockSttEngine::err(SttError::Transcription("boom".into()));
        let err = engine.transcribe(&vec![0.0f32; MIN_AUDIO_SAMPLES]).unwrap_err();
        assert!(matches!(err, SttError::Transcription(_)));
    }

    #[test]
    fn one_below_min_audio_is_too_short() {
        let engine = MockSttEngine::ok("ok");
        let short = vec![0.0f32; MIN_AUDIO_SAMPLES - 1];
        assert!(matches!(
            engine.transcribe(&short).unwrap_err(),
            SttError::AudioTooShort
        ));
    }

    #[test]
    fn above_max_audio_is_too_long() {
        assert!(matches!(
            check_length(&vec![0.0f32; MAX_AUDIO_SAMPLES + 1]),
            Err(SttError::AudioTooLong)
        ));
    }

    #[test]
    fn twenty_second_answer_is_accepted() {
        assert!(check_length(&vec![0.0f32; 20 * 16_000]).is_ok());
    }

    #[test]
    fn load_missing_model_returns_model_not_found() {
        let result = WhisperEngine::load("/nonexistent/model.bin", TranscribeParams::default());
        assert!(
            matches!(result, Err(SttError::ModelNotFound(_))),
            "expected ModelNotFound, got: {result:?}"
        );
    }

    #[test]
    fn missing_model_reports_path() {
        let engine: Box<dyn SttEngine> = Box::new(MissingModel::new("/models/ggml-small.bin"));
        let err = engine.transcribe(&vec![0.0f32; MIN_AUDIO_SAMPLES]).unwrap_err();
        assert!(err.to_string().contains("/models/ggml-small.bin"));
    }
}
