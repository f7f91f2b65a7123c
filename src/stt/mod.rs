//! Speech-to-text for recorded answers.
//!
//! ```text
//!  SttConfig ──► ModelPaths::model_path(resolve_model(id))
//!                        │
//!                        ▼
//!          WhisperEngine::load(path, TranscribeParams)
//!                        │   (or MissingModel if absent)
//!                        ▼
//!       Arc<dyn SttEngine>::transcribe(&[f32] @ 16 kHz) ──► String
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use interview_coach::config::{AppConfig, AppPaths};
//! use interview_coach::stt::load_engine;
//!
//! let config = AppConfig::default();
//! let engine = load_engine(&config.stt, &AppPaths::new());
//! let silence = vec![0.0f32; 16_000];
//! match engine.transcribe(&silence) {
//!     Ok(text) => println!("{text}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```

pub mod engine;
pub mod model;
pub mod transcribe;

use std::sync::Arc;

use crate::config::{AppPaths, SttConfig};

pub use engine::{MissingModel, SttEngine, SttError, WhisperEngine, MAX_AUDIO_SAMPLES, MIN_AUDIO_SAMPLES};
pub use model::{find_model_by_id, resolve_model, ModelInfo, ModelPaths, DEFAULT_MODEL_ID, WHISPER_MODELS};
pub use transcribe::{SamplingStrategy, TranscribeParams};

#[cfg(test)]
pub use engine::MockSttEngine;

/// Load the configured Whisper model once, degrading to [`MissingModel`] so
/// the application can still start without a model file.
pub fn load_engine(config: &SttConfig, paths: &AppPaths) -> Arc<dyn SttEngine> {
    let model = resolve_model(&config.model);
    let model_paths = ModelPaths::from_app_paths(paths);
    let path = model_paths.model_path(model);

    match WhisperEngine::load(&path, TranscribeParams::from_config(config)) {
        Ok(engine) => Arc::new(engine),
        Err(e) => {
            log::warn!(
                "could not load Whisper model ({e}); answers will not be transcribed. \
                 Download it from {}",
                model.download_url()
            );
            let local = model_paths.list_local_models();
            if !local.is_empty() {
                let ids: Vec<_> = local.iter().map(|m| m.id).collect();
                log::warn!("models already downloaded: {}; set stt.model to use one", ids.join(", "));
            }
            Arc::new(MissingModel::new(&path))
        }
    }
}
