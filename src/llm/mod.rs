//! Language-model layer for Interview Coach.
//!
//! This module provides:
//! * [`LlmClient`] — async trait implemented by all model backends.
//! * [`ApiClient`] — Gemini / OpenAI-compatible REST client.
//! * [`prompt`] — job-analysis, question and evaluation prompt templates.
//! * [`extract_json`] / [`parse_numbered_list`] — response post-processing.
//! * [`LlmError`] — error variants for model calls.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use interview_coach::config::AppConfig;
//! use interview_coach::interview::JobInfo;
//! use interview_coach::llm::{extract_json, prompt, ApiClient, LlmClient, ResponseFormat};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut config = AppConfig::default();
//!     config.apply_env();
//!     let client = ApiClient::from_config(&config.llm).unwrap();
//!
//!     let info = JobInfo {
//!         profile: "Backend Engineer".into(),
//!         description: "Design and operate payment services.".into(),
//!     };
//!     let format = ResponseFormat::Json { schema: Some(prompt::job_analysis_schema()) };
//!     let raw = client.generate(&prompt::job_analysis_prompt(&info), &format).await.unwrap();
//!     println!("{}", extract_json(&raw).unwrap());
//! }
//! ```

pub mod client;
pub mod parser;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ApiClient, LlmClient, LlmError, NoApiKey, ResponseFormat};
pub use parser::{extract_json, parse_numbered_list};

#[cfg(test)]
pub use client::MockLlm;
