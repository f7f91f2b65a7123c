//! Core `LlmClient` trait and the HTTP-backed `ApiClient`.
//!
//! `ApiClient` speaks two wire formats, selected by [`LlmProvider`]:
//!
//! * **Gemini** — `POST {base_url}/v1beta/models/{model}:generateContent`
//!   with the key in the `x-goog-api-key` header.
//! * **OpenAI-compatible** — `POST {base_url}/v1/chat/completions` with a
//!   bearer token (OpenAI, Groq, Ollama in OpenAI mode, LM Studio, vLLM …).
//!
//! All connection details come from [`LlmConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{LlmConfig, LlmProvider};

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the language model.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key was configured.
    #[error("no API key configured")]
    MissingApiKey,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("LLM request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The HTTP response body was not the expected JSON envelope.
    #[error("failed to parse LLM response: {0}")]
    Parse(String),

    /// The LLM returned a response with no usable text content.
    #[error("LLM returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ResponseFormat
// ---------------------------------------------------------------------------

/// Output shape requested from the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseFormat {
    /// Free text.
    Text,
    /// A JSON object, optionally constrained by a JSON schema where the
    /// provider supports schema-constrained generation.
    Json { schema: Option<Value> },
}

// ---------------------------------------------------------------------------
// LlmClient trait
// ---------------------------------------------------------------------------

/// One prompt in, raw text out.
///
/// Implementors must be `Send + Sync` so they can be shared behind an
/// `Arc<dyn LlmClient>`.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str, format: &ResponseFormat) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// HTTP client for Gemini or any OpenAI-compatible endpoint.
pub struct ApiClient {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: String,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("provider", &self.config.provider)
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build an `ApiClient` from config.
    ///
    /// # Errors
    ///
    /// [`LlmError::MissingApiKey`] when `config.api_key` is absent or blank.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let key = config.api_key().ok_or(LlmError::MissingApiKey)?.to_string();
        Ok(Self::with_api_key(config, key))
    }

    /// Build an `ApiClient` using `api_key` instead of the configured one
    /// (e.g. a key pasted into the widget).
    pub fn with_api_key(config: &LlmConfig, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    /// Send a trivial prompt to confirm the key is accepted.
    pub async fn validate(&self) -> Result<(), LlmError> {
        self.generate("Hello", &ResponseFormat::Text).await.map(|_| ())
    }

    fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match self.config.provider {
            LlmProvider::Gemini => {
                format!("{base}/v1beta/models/{}:generateContent", self.config.model)
            }
            LlmProvider::OpenAiCompatible => format!("{base}/v1/chat/completions"),
        }
    }

    fn request_body(&self, prompt: &str, format: &ResponseFormat) -> Value {
        match self.config.provider {
            LlmProvider::Gemini => gemini_body(prompt, format, self.config.temperature),
            LlmProvider::OpenAiCompatible => {
                openai_body(&self.config.model, prompt, format, self.config.temperature)
            }
        }
    }
}

#[async_trait]
impl LlmClient for ApiClient {
    async fn generate(&self, prompt: &str, format: &ResponseFormat) -> Result<String, LlmError> {
        let url = self.endpoint();
        let body = self.request_body(prompt, format);

        log::debug!(
            "llm: POST {url} ({} prompt chars, format {format:?})",
            prompt.len()
        );

        let req = self.client.post(&url).json(&body);
        let req = match self.config.provider {
            LlmProvider::Gemini => req.header("x-goog-api-key", &self.api_key),
            LlmProvider::OpenAiCompatible => req.bearer_auth(&self.api_key),
        };

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                message: api_error_message(&text),
            });
        }

        let json: Value =
            serde_json::from_str(&text).map_err(|e| LlmError::Parse(e.to_string()))?;

        match self.config.provider {
            LlmProvider::Gemini => gemini_text(&json),
            LlmProvider::OpenAiCompatible => openai_text(&json),
        }
    }
}

// ---------------------------------------------------------------------------
// NoApiKey
// ---------------------------------------------------------------------------

/// Stand-in client used until a key has been entered; every call fails with
/// [`LlmError::MissingApiKey`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoApiKey;

#[async_trait]
impl LlmClient for NoApiKey {
    async fn generate(&self, _prompt: &str, _format: &ResponseFormat) -> Result<String, LlmError> {
        Err(LlmError::MissingApiKey)
    }
}

// ---------------------------------------------------------------------------
// Wire helpers
// ---------------------------------------------------------------------------

fn gemini_body(prompt: &str, format: &ResponseFormat, temperature: f32) -> Value {
    let mut generation_config = json!({ "temperature": temperature });
    if let ResponseFormat::Json { schema } = format {
        generation_config["responseMimeType"] = json!("application/json");
        if let Some(schema) = schema {
            generation_config["responseSchema"] = schema.clone();
        }
    }

    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": generation_config
    })
}

fn openai_body(model: &str, prompt: &str, format: &ResponseFormat, temperature: f32) -> Value {
    let mut body = json!({
        "model":       model,
        "messages":    [ { "role": "user", "content": prompt } ],
        "stream":      false,
        "temperature": temperature
    });
    if matches!(format, ResponseFormat::Json { .. }) {
        body["response_format"] = json!({ "type": "json_object" });
    }
    body
}

/// Concatenate the text parts of the first Gemini candidate.
fn gemini_text(json: &Value) -> Result<String, LlmError> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(LlmError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();

    non_empty(text)
}

fn openai_text(json: &Value) -> Result<String, LlmError> {
    let text = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(LlmError::EmptyResponse)?;
    non_empty(text.to_string())
}

fn non_empty(text: String) -> Result<String, LlmError> {
    let text = text.trim();
    if text.is_empty() {
        Err(LlmError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}

/// Pull `error.message` out of an error body, falling back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

// ---------------------------------------------------------------------------
// MockLlm  (test-only)
// ---------------------------------------------------------------------------

/// Test double that answers every prompt through a closure and records the
/// prompts it was given.
#[cfg(test)]
pub struct MockLlm {
    respond: Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>,
    prompts: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl MockLlm {
    pub fn new(respond: impl Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            prompts: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Every prompt received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl LlmClient for MockLlm {
    async fn generate(&self, prompt: &str, _format: &ResponseFormat) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(provider: LlmProvider, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            base_url: "https://example.test/".into(),
            api_key: api_key.map(str::to_string),
            model: "test-model".into(),
            temperature: 0.2,
            timeout_secs: 5,
        }
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = ApiClient::from_config(&make_config(LlmProvider::Gemini, None)).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));

        let err = ApiClient::from_config(&make_config(LlmProvider::Gemini, Some(" "))).unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }

    #[test]
    fn gemini_endpoint_includes_model() {
        let client =
            ApiClient::from_config(&make_config(LlmProvider::Gemini, Some("key"))).unwrap();
        assert_eq!(
            client.endpoint(),
            "https://example.test/v1beta/models/test-model:generateContent"
        );
    }

    #[test]
    fn openai_endpoint_is_chat_completions() {
        let client =
            ApiClient::from_config(&make_config(LlmProvider::OpenAiCompatible, Some("key")))
                .unwrap();
        assert_eq!(client.endpoint(), "https://example.test/v1/chat/completions");
    }

    #[test]
    fn gemini_body_requests_json_with_schema() {
        let schema = json!({ "type": "OBJECT" });
        let body = gemini_body(
            "analyze",
            &ResponseFormat::Json {
                schema: Some(schema.clone()),
            },
            0.5,
        );
        assert_eq!(body["contents"][0]["parts"][0]["text"], "analyze");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"], schema);
    }

    #[test]
    fn gemini_body_plain_text_has_no_mime_type() {
        let body = gemini_body("hi", &ResponseFormat::Text, 0.5);
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn openai_body_json_mode() {
        let body = openai_body("m", "p", &ResponseFormat::Json { schema: None }, 0.1);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["messages"][0]["content"], "p");

        let body = openai_body("m", "p", &ResponseFormat::Text, 0.1);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn gemini_text_joins_parts() {
        let response = json!({
            "candidates": [
                { "content": { "parts": [ { "text": "1. One\n" }, { "text": "2. Two" } ] } }
            ]
        });
        assert_eq!(gemini_text(&response).unwrap(), "1. One\n2. Two");
    }

    #[test]
    fn gemini_text_without_candidates_is_empty_response() {
        let response = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(matches!(
            gemini_text(&response),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn openai_text_trims_content() {
        let response = json!({
            "choices": [ { "message": { "content": "  feedback  " } } ]
        });
        assert_eq!(openai_text(&response).unwrap(), "feedback");
    }

    #[test]
    fn error_message_prefers_json_error_field() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid"}}"#;
        assert_eq!(api_error_message(body), "API key not valid");
        assert_eq!(api_error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn client_is_object_safe() {
        let client =
            ApiClient::from_config(&make_config(LlmProvider::Gemini, Some("key"))).unwrap();
        let _: Box<dyn LlmClient> = Box::new(client);
    }

    #[tokio::test]
    async fn mock_records_prompts() {
        let mock = MockLlm::new(|prompt| Ok(format!("echo: {prompt}")));
        let out = mock.generate("hello", &ResponseFormat::Text).await.unwrap();
        assert_eq!(out, "echo: hello");
        assert_eq!(mock.prompts(), ["hello"]);
    }

    #[tokio::test]
    async fn no_api_key_always_fails() {
        let err = NoApiKey.generate("Hello", &ResponseFormat::Text).await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
