//! Google Translate TTS client.
//!
//! The endpoint accepts at most [`MAX_CHUNK_CHARS`] characters per request,
//! so longer questions are split at word boundaries and the returned MP3
//! frames are concatenated into one file.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::player::PlayerCommand;
use super::{Speaker, TtsError};

const ENDPOINT: &str = "https://translate.google.com/translate_tts";

/// Per-request character limit of the endpoint.
pub const MAX_CHUNK_CHARS: usize = 100;

/// Split `text` into pieces of at most `max` characters, breaking on
/// whitespace.  A single word longer than `max` is split mid-word.
///
/// ```
/// use interview_coach::tts::chunk_text;
///
/// let chunks = chunk_text("Describe a time you disagreed with a teammate.", 20);
/// assert!(chunks.iter().all(|c| c.chars().count() <= 20));
/// assert_eq!(chunks.join(" "), "Describe a time you disagreed with a teammate.");
/// ```
pub fn chunk_text(text: &str, max: usize) -> Vec<String> {
    let max = max.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Speaks via Google Translate TTS and an external player.
#[derive(Debug, Clone)]
pub struct GoogleTts {
    client: Client,
    language: String,
    output: PathBuf,
    player: Option<PlayerCommand>,
}

impl GoogleTts {
    pub fn new(language: String, output: PathBuf, player: Option<PlayerCommand>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            client,
            language,
            output,
            player,
        }
    }

    /// Fetch MP3 audio for `text`.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        let total = chunks.len().to_string();
        let mut audio = Vec::new();

        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let resp = self
                .client
                .get(ENDPOINT)
                .query(&[
                    ("ie", "UTF-8"),
                    ("q", chunk.as_str()),
                    ("tl", self.language.as_str()),
                    ("client", "tw-ob"),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(TtsError::Status(status.as_u16()));
            }
            audio.extend_from_slice(&resp.bytes().await?);
        }

        Ok(audio)
    }
}

#[async_trait]
impl Speaker for GoogleTts {
    async fn speak(&self, text: &str) -> Result<(), TtsError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        let audio = self.synthesize(text).await?;
        if let Some(parent) = self.output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.output, &audio).await?;
        log::debug!("question audio saved to {} ({} bytes)", self.output.display(), audio.len());

        let player = self.player.clone().ok_or(TtsError::NoPlayer)?;
        let path = self.output.clone();
        tokio::task::spawn_blocking(move || player.play(&path))
            .await
            .map_err(|e| TtsError::Playback(e.to_string()))?
    }
}
