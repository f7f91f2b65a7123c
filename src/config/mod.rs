//! Configuration module for Interview Coach.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform data directories, and TOML persistence via
//! `AppConfig::load_or_create` / `AppConfig::save_to`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, AudioConfig, InterviewConfig, LlmConfig, LlmProvider, SttConfig, TtsConfig,
    API_KEY_ENV_VARS,
};
