//! Adapter for the Anthropic messages API.

use std::env;

use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{BackendConfig, TextGenerator};
use crate::error::{Error, Result};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";

pub struct AnthropicClient {
    client: Client,
    url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct AnthropicError {
    error: AnthropicErrorDetail,
}

#[derive(Deserialize)]
struct AnthropicErrorDetail {
    message: String,
}

impl AnthropicClient {
    /// Key from `config.api_key` or `ANTHROPIC_API_KEY`; model from
    /// `config.model`, `TREEDOC_MODEL`, or [`DEFAULT_ANTHROPIC_MODEL`].
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| env::var("ANTHROPIC_API_KEY").ok())
            .ok_or_else(|| {
                Error::Backend("ANTHROPIC_API_KEY environment variable not set".to_string())
            })?;
        let model = config
            .model
            .clone()
            .or_else(|| env::var("TREEDOC_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string());

        Ok(Self {
            client: Client::builder().timeout(config.timeout).build()?,
            url: config
                .url
                .clone()
                .unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            api_key,
            model,
            max_tokens: config.max_tokens,
        })
    }
}

impl TextGenerator for AnthropicClient {
    fn invoke(&self, prompt: &str) -> Result<String> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };
        debug!("POST {} model={}", self.url, self.model);

        let response = self
            .client
            .post(&self.url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()?;
        let status = response.status();
        let text = response.text()?;
        parse_response(status, &text)
    }
}

fn parse_response(status: StatusCode, body: &str) -> Result<String> {
    if !status.is_success() {
        let msg = serde_json::from_str::<AnthropicError>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.to_string());
        return Err(Error::Backend(format!(
            "Anthropic API error ({}): {msg}",
            status.as_u16()
        )));
    }

    let parsed: AnthropicResponse = serde_json::from_str(body)
        .map_err(|e| Error::Backend(format!("failed to parse Anthropic API response: {e}")))?;
    Ok(parsed.content.into_iter().map(|block| block.text).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success_concatenates_text_blocks() {
        let body = r#"{"content":[{"type":"text","text":"Hello "},{"type":"text","text":"world"}],"usage":{"input_tokens":3,"output_tokens":2}}"#;
        assert_eq!(parse_response(StatusCode::OK, body).unwrap(), "Hello world");
    }

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        let err = parse_response(StatusCode::from_u16(529).unwrap(), body).unwrap_err();
        assert!(err.to_string().contains("Overloaded"));
        assert!(err.to_string().contains("529"));
    }

    #[test]
    fn test_parse_error_with_plain_body() {
        let err = parse_response(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert!(err.to_string().contains("upstream down"));
    }

    #[test]
    fn test_explicit_key_and_model() {
        let config = BackendConfig {
            api_key: Some("test-key".to_string()),
            model: Some("some-model".to_string()),
            ..Default::default()
        };
        let client = AnthropicClient::from_config(&config).unwrap();
        assert_eq!(client.model, "some-model");
        assert_eq!(client.url, ANTHROPIC_API_URL);
    }
}
