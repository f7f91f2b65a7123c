//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and handed to the
//! widget's background worker.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::interview::{Difficulty, QuestionCounts};

/// Environment variables checked (in order) for the model API key.
pub const API_KEY_ENV_VARS: [&str; 2] = ["INTERVIEW_COACH_API_KEY", "GEMINI_API_KEY"];

// ---------------------------------------------------------------------------
// LlmProvider
// ---------------------------------------------------------------------------

/// Wire format used to talk to the language model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LlmProvider {
    /// Google Gemini `generateContent` REST API.
    Gemini,
    /// Any OpenAI-compatible `/v1/chat/completions` endpoint (OpenAI, Groq,
    /// Ollama in OpenAI mode, LM Studio …).
    OpenAiCompatible,
}

impl Default for LlmProvider {
    fn default() -> Self {
        Self::Gemini
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the language-model client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Which wire format to speak.
    pub provider: LlmProvider,
    /// Base URL of the API endpoint.
    ///
    /// - Gemini: `https://generativelanguage.googleapis.com`
    /// - OpenAI: `https://api.openai.com`
    pub base_url: String,
    /// API key.  `None` until supplied by env, file or the user.
    pub api_key: Option<String>,
    /// Model identifier (e.g. `"gemini-2.5-flash"`, `"gpt-4o-mini"`).
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum seconds to wait for one completion.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            model: "gemini-2.5-flash".into(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl LlmConfig {
    /// Returns the configured key if it is a non-empty string.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper STT engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// Whisper model id (`"tiny"`, `"base"`, `"small"`, `"medium"`, `"large"`).
    pub model: String,
    /// Spoken language as an ISO-639-1 code, or `"auto"`.
    pub language: String,
    /// Attempt GPU-accelerated inference when available.
    pub use_gpu: bool,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "small".into(),
            language: "en".into(),
            use_gpu: false,
        }
    }
}

// ---------------------------------------------------------------------------
// AudioConfig
// ---------------------------------------------------------------------------

/// Settings for answer recording.  Answers are always captured at 16 kHz.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Fixed length of every recorded answer in seconds.
    pub answer_secs: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            answer_secs: 20,
        }
    }
}

// ---------------------------------------------------------------------------
// TtsConfig
// ---------------------------------------------------------------------------

/// Settings for reading questions aloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    /// Whether questions are spoken at all.
    pub enabled: bool,
    /// Language code passed to the TTS service.
    pub language: String,
    /// Command used to play the MP3 file.  `None` picks a platform default
    /// (`afplay` on macOS, `mpg123` on Linux).
    pub player: Option<String>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: "en".into(),
            player: None,
        }
    }
}

// ---------------------------------------------------------------------------
// InterviewConfig
// ---------------------------------------------------------------------------

/// Defaults offered by the front ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Pre-selected difficulty.
    pub difficulty: Difficulty,
    /// Pre-filled question counts.
    pub counts: QuestionCounts,
    /// Upper bound for a single category count.
    pub max_per_category: u32,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            counts: QuestionCounts::new(2, 2, 1),
            max_per_category: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// Every section and field is optional in the file; anything left out keeps
/// its default.
///
/// ```rust,no_run
/// use interview_coach::config::AppConfig;
///
/// // Writes the defaults on first run
/// let config = AppConfig::load_or_create().unwrap();
/// println!("model: {}", config.llm.model);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub stt: SttConfig,
    pub audio: AudioConfig,
    pub tts: TtsConfig,
    pub interview: InterviewConfig,
}

impl AppConfig {
    /// Load the platform-appropriate `settings.toml`, writing the defaults
    /// there first if it does not exist yet.
    pub fn load_or_create() -> Result<Self> {
        Self::load_or_create_at(&AppPaths::new().settings_file)
    }

    /// [`AppConfig::load_or_create`] for an explicit path.  Failing to write
    /// the default file is only logged.
    pub fn load_or_create_at(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            return Self::load_from(path);
        }
        let config = Self::default();
        match config.save_to(path) {
            Ok(()) => log::info!("wrote default settings to {}", path.display()),
            Err(e) => log::warn!("could not write default settings to {}: {e}", path.display()),
        }
        Ok(config)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlay the API key from the environment, if one is set.
    ///
    /// Environment wins over the file so a key never has to be written to
    /// disk.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|name| std::env::var(name).ok());
    }

    fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty());

        if let Some(key) = key {
            self.llm.api_key = Some(key);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
