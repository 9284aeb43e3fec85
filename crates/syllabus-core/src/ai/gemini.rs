use std::borrow::Cow;
use std::time::Duration;

use chrono::Local;
use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use super::{prompts, AiError, AiResult, AiService, EMPTY_ARRAY};
use crate::config::AiConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const API_KEY_HEADER: &str = "x-goog-api-key";
const TRUNCATION_MARKER: &str = "\n\n...[TRUNCATED]...\n\n";

/// HTTP client for the Gemini `generateContent` API.
///
/// In demo mode (no usable key) every call answers with a fixed payload and
/// never opens a connection.
pub struct GeminiClient {
    config: AiConfig,
    http: Client,
}

impl GeminiClient {
    pub fn new(config: AiConfig) -> AiResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(
                CONNECT_TIMEOUT_SECS.min(config.timeout_secs),
            ))
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("syllabus/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    async fn call(&self, prompt: &str) -> AiResult<String> {
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|_| !self.config.is_demo_mode())
            .ok_or(AiError::NotConfigured)?;
        let url = Url::parse(&self.config.endpoint_url())?;

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topK": 40,
                "topP": 0.8,
                "maxOutputTokens": self.config.max_output_tokens,
                "responseMimeType": "application/json",
            },
        });

        tracing::debug!(prompt_len = prompt.len(), model = %self.config.model, "Calling generateContent");

        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        let text = parse_generate_response(&value)?;
        tracing::info!(response_len = text.len(), "AI call succeeded");
        Ok(text)
    }

    async fn extract_with(
        &self,
        category: &'static str,
        content: &str,
        build_prompt: impl FnOnce(&str) -> String,
    ) -> AiResult<String> {
        if !self.is_configured() {
            tracing::warn!(category, "AI service not configured, returning empty result");
            return Ok(EMPTY_ARRAY.to_string());
        }

        tracing::debug!(category, content_len = content.len(), "Extracting with AI");
        let content = shorten_content(content, self.config.max_content_chars);
        self.call(&build_prompt(&content)).await
    }
}

#[async_trait::async_trait]
impl AiService for GeminiClient {
    fn is_configured(&self) -> bool {
        !self.config.is_demo_mode()
    }

    async fn extract_topics(&self, content: &str) -> AiResult<String> {
        self.extract_with("topics", content, prompts::topics).await
    }

    async fn extract_deadlines(&self, content: &str) -> AiResult<String> {
        let start = prompts::default_semester_start(Local::now().date_naive());
        self.extract_with("deadlines", content, |c| prompts::deadlines(c, start))
            .await
    }

    async fn extract_materials(&self, content: &str) -> AiResult<String> {
        self.extract_with("materials", content, prompts::materials).await
    }

    async fn generate_text(&self, prompt: &str) -> AiResult<String> {
        if !self.is_configured() {
            return Ok("MEDIUM".to_string());
        }
        self.call(prompt).await
    }
}

/// Pulls the generated text out of a `generateContent` response body.
///
/// A reply cut off at the token limit still yields whatever text arrived.
pub fn parse_generate_response(value: &Value) -> AiResult<String> {
    let candidate = value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or_else(|| AiError::MalformedResponse("no candidates in response".into()))?;

    let text = candidate
        .pointer("/content/parts/0/text")
        .and_then(Value::as_str)
        .unwrap_or_default();

    match candidate.get("finishReason").and_then(Value::as_str) {
        Some("MAX_TOKENS") => {
            tracing::warn!(partial_len = text.len(), "Response truncated at token limit");
            return Ok(if text.is_empty() {
                EMPTY_ARRAY.to_string()
            } else {
                text.to_string()
            });
        }
        Some("SAFETY") => return Err(AiError::Blocked("safety filters".into())),
        _ => {}
    }

    if candidate.pointer("/content/parts/0").is_none() {
        return Err(AiError::MalformedResponse("no parts in content".into()));
    }

    if text.is_empty() {
        tracing::warn!("Empty text in AI response");
        return Ok(EMPTY_ARRAY.to_string());
    }

    Ok(text.to_string())
}

/// Keeps the head and tail of an over-long document, dropping the middle.
#[must_use]
pub fn shorten_content(content: &str, max_chars: usize) -> Cow<'_, str> {
    let count = content.chars().count();
    if count <= max_chars {
        return Cow::Borrowed(content);
    }

    tracing::warn!(from = count, to = max_chars, "Shortening document before prompting");

    let half = max_chars / 2;
    let head: String = content.chars().take(half).collect();
    let tail: String = content.chars().skip(count - half).collect();
    Cow::Owned(format!("{head}{TRUNCATION_MARKER}{tail}"))
}
