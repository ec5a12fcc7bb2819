//! OpenAiPhraser - Direct REST API implementation for OpenAI chat completions.
//!
//! Each question is produced by a single chat-completions call whose user
//! message combines the legal context for the document type, the
//! conversation so far, and the answers collected so far.

use crate::error::PhraserError;
use crate::prompt::build_question_prompt;
use async_trait::async_trait;
use lexfill_core::config::PhraserConfig;
use lexfill_core::error::{FillError, Result};
use lexfill_core::phrasing::{PhraseRequest, Phraser};
use lexfill_infrastructure::PromptRegistry;
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Phraser that asks the OpenAI HTTP API to word each question.
#[derive(Clone)]
pub struct OpenAiPhraser {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    endpoint: String,
    prompts: PromptRegistry,
}

impl OpenAiPhraser {
    /// Creates a phraser from the `[phraser]` configuration.
    ///
    /// # Errors
    ///
    /// - `Config` if no API key is configured or the HTTP client cannot be built
    pub fn from_config(config: &PhraserConfig, prompts: PromptRegistry) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| FillError::config("OPENAI_API_KEY not found in config file or environment variables"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FillError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            prompts,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &ChatCompletionRequest<'_>) -> std::result::Result<String, PhraserError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| PhraserError::Request {
                message: err.to_string(),
                is_retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| PhraserError::InvalidResponse(format!("Failed to parse OpenAI response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl Phraser for OpenAiPhraser {
    async fn phrase(&self, request: PhraseRequest<'_>) -> Result<String> {
        let legal_context = self.prompts.legal_context(request.doc_type).await;
        let prompt = build_question_prompt(&legal_context, &request)?;

        let body = ChatCompletionRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
        };

        tracing::debug!(
            placeholder = %request.placeholder,
            model = %self.model,
            "Requesting question from OpenAI"
        );

        let question = self.send_request(&body).await.map_err(|err| {
            tracing::warn!(
                placeholder = %request.placeholder,
                retryable = err.is_retryable(),
                retry_after = ?err.retry_after(),
                error = %err,
                "OpenAI request failed"
            );
            err
        })?;

        Ok(question.trim().to_string())
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> std::result::Result<String, PhraserError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| PhraserError::InvalidResponse("OpenAI API returned no content in the response".into()))
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> PhraserError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    PhraserError::Http {
        status_code: status.as_u16(),
        message,
        is_retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    // HTTP-date values are not supported
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config_requires_api_key() {
        let config = PhraserConfig::default();
        let err = OpenAiPhraser::from_config(&config, PromptRegistry::default()).err().unwrap();
        assert!(matches!(err, FillError::Config(_)));
    }

    #[test]
    fn test_from_config_builds_endpoint() {
        let config = PhraserConfig {
            api_key: Some("sk-test".to_string()),
            base_url: "http://localhost:8080/v1/".to_string(),
            ..PhraserConfig::default()
        };
        let phraser = OpenAiPhraser::from_config(&config, PromptRegistry::default()).unwrap();
        assert_eq!(phraser.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(phraser.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_request_body_shape() {
        let body = ChatCompletionRequest {
            model: "gpt-4o-mini",
            temperature: 0.0,
            messages: vec![ChatMessage {
                role: "user",
                content: "hello",
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_extract_text_response() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"What is the investor's name?"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(parsed).unwrap(), "What is the investor's name?");

        let empty: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(
            extract_text_response(empty),
            Err(PhraserError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_map_http_error_parses_body() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#.to_string(),
            Some(Duration::from_secs(3)),
        );
        assert!(err.is_retryable());
        assert_eq!(err.retry_after(), Some(Duration::from_secs(3)));
        assert_eq!(err.to_string(), "OpenAI API error (429): Rate limit reached");

        let err = map_http_error(StatusCode::UNAUTHORIZED, "plain text".to_string(), None);
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("plain text"));

        let fill: FillError = err.into();
        assert!(matches!(fill, FillError::PhraseFailed(_)));
    }

    #[test]
    fn test_parse_retry_after() {
        let header = HeaderValue::from_static("12");
        assert_eq!(parse_retry_after(Some(&header)), Some(Duration::from_secs(12)));
        let date = HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT");
        assert_eq!(parse_retry_after(Some(&date)), None);
        assert_eq!(parse_retry_after(None), None);
    }
}
