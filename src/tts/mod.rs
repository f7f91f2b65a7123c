//! Reading questions aloud.
//!
//! [`Speaker`] is the async seam the interview session speaks through.
//! [`GoogleTts`] synthesises MP3 audio with the public Google Translate TTS
//! endpoint, writes it to `question_audio.mp3` and plays it with an external
//! command-line player.  [`SilentSpeaker`] is used when speech is disabled.
//!
//! Speech failures are never fatal to a session; callers log and continue.

pub mod google;
pub mod player;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{AppPaths, TtsConfig};

pub use google::{chunk_text, GoogleTts, MAX_CHUNK_CHARS};
pub use player::{default_player, PlayerCommand};

// ---------------------------------------------------------------------------
// TtsError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("speech synthesis request failed: {0}")]
    Request(String),

    #[error("speech synthesis returned HTTP {0}")]
    Status(u16),

    #[error("could not write question audio: {0}")]
    Io(#[from] std::io::Error),

    /// No player configured and none known for this platform.
    #[error("no audio player available; set `tts.player` in settings.toml")]
    NoPlayer,

    #[error("audio player failed: {0}")]
    Playback(String),
}

impl From<reqwest::Error> for TtsError {
    fn from(e: reqwest::Error) -> Self {
        TtsError::Request(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Speaker trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak `text`, returning once playback has finished.
    async fn speak(&self, text: &str) -> Result<(), TtsError>;
}

/// Does nothing.  Used when `tts.enabled = false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSpeaker;

#[async_trait]
impl Speaker for SilentSpeaker {
    async fn speak(&self, _text: &str) -> Result<(), TtsError> {
        Ok(())
    }
}

/// Build the speaker described by `config`.
pub fn speaker_from_config(config: &TtsConfig, paths: &AppPaths) -> Arc<dyn Speaker> {
    if !config.enabled {
        log::info!("question read-aloud disabled");
        return Arc::new(SilentSpeaker);
    }
    let player = PlayerCommand::resolve(config.player.as_deref());
    if player.is_none() {
        log::warn!("no audio player found; questions will be synthesised but not played");
    }
    Arc::new(GoogleTts::new(
        config.language.clone(),
        paths.question_audio.clone(),
        player,
    ))
}

// ---------------------------------------------------------------------------
// FailingSpeaker  (test-only)
// ---------------------------------------------------------------------------

/// Always fails; records what it was asked to say.
#[cfg(test)]
#[derive(Default)]
pub struct FailingSpeaker {
    spoken: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl FailingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl Speaker for FailingSpeaker {
    async fn speak(&self, text: &str) -> Result<(), TtsError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Err(TtsError::NoPlayer)
    }
}
