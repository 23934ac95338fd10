//! Adapter for a local llamafile (llama.cpp) completion server.

use std::env;

use log::debug;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::{BackendConfig, TextGenerator};
use crate::error::{Error, Result};

pub const DEFAULT_LLAMAFILE_URL: &str = "http://localhost:8080";

/// Blocking client for the `/completion` endpoint.
pub struct LlamafileClient {
    client: Client,
    url: String,
    n_predict: i64,
    temperature: f32,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: i64,
    temperature: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LlamafileClient {
    /// Uses `config.url`, then `LLAMAFILE_URL`, then [`DEFAULT_LLAMAFILE_URL`].
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let url = config
            .url
            .clone()
            .or_else(|| env::var("LLAMAFILE_URL").ok())
            .unwrap_or_else(|| DEFAULT_LLAMAFILE_URL.to_string());
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            n_predict: i64::from(config.max_tokens),
            temperature: 0.2,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/completion", self.url)
    }
}

impl TextGenerator for LlamafileClient {
    fn invoke(&self, prompt: &str) -> Result<String> {
        let body = CompletionRequest {
            prompt,
            n_predict: self.n_predict,
            temperature: self.temperature,
            stream: false,
        };
        debug!("POST {} ({} byte prompt)", self.endpoint(), prompt.len());

        let response = self.client.post(self.endpoint()).json(&body).send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(Error::Backend(format!(
                "llamafile returned {}: {}",
                status.as_u16(),
                text
            )));
        }
        parse_completion(&text)
    }
}

fn parse_completion(body: &str) -> Result<String> {
    serde_json::from_str::<CompletionResponse>(body)
        .map(|r| r.content)
        .map_err(|e| Error::Backend(format!("unexpected llamafile response: {e}")))
}
