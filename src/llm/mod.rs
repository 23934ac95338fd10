//! Text-generation backends
//!
//! The summary generator only needs `prompt -> text`; concrete adapters
//! talk to a local llamafile server or the Anthropic messages API.

mod anthropic;
mod llamafile;

use std::time::Duration;

use clap::ValueEnum;

use crate::error::Result;

pub use anthropic::AnthropicClient;
pub use llamafile::LlamafileClient;

/// End-of-turn token some local model runtimes leave at the end of a completion.
pub const END_OF_TURN: &str = "<end_of_turn>";

/// Default time allowed for a single completion request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Anything that can turn a prompt into generated text.
///
/// Calls are blocking; errors abort the run.
pub trait TextGenerator {
    fn invoke(&self, prompt: &str) -> Result<String>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for Box<T> {
    fn invoke(&self, prompt: &str) -> Result<String> {
        (**self).invoke(prompt)
    }
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn invoke(&self, prompt: &str) -> Result<String> {
        (**self).invoke(prompt)
    }
}

/// Remove a single trailing [`END_OF_TURN`] marker, if present.
pub fn strip_end_marker(text: &str) -> &str {
    text.strip_suffix(END_OF_TURN).unwrap_or(text)
}

/// Which backend adapter to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum BackendKind {
    /// Local llamafile / llama.cpp server
    #[default]
    Llamafile,
    /// Anthropic messages API
    Anthropic,
}

/// Settings for constructing a backend. Unset fields fall back to the
/// adapter's environment variables and defaults.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub kind: BackendKind,
    pub url: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            url: None,
            model: None,
            api_key: None,
            max_tokens: 1024,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Build the adapter selected by `config.kind`.
pub fn build_backend(config: &BackendConfig) -> Result<Box<dyn TextGenerator>> {
    Ok(match config.kind {
        BackendKind::Llamafile => Box::new(LlamafileClient::from_config(config)?),
        BackendKind::Anthropic => Box::new(AnthropicClient::from_config(config)?),
    })
}
