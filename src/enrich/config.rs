//! Configuration for the enrichment services.
//!
//! Constructed explicitly at startup and handed to the pipeline. A missing
//! API key is a valid configuration: enrichment is disabled and notes
//! finalize with default content instead of failing.

use crate::{Result, VoxnoteError};

/// Configuration for the speech-to-text and title/highlight services
#[derive(Clone, Debug)]
pub struct EnrichmentConfig {
    /// Bearer credential; `None` disables enrichment entirely
    pub api_key: Option<String>,

    /// Speech-to-text endpoint (multipart upload)
    pub transcription_endpoint: String,

    /// Speech-to-text model identifier
    pub transcription_model: String,

    /// Chat-completion endpoint for titles and highlights
    pub chat_endpoint: String,

    /// Chat-completion model identifier
    pub chat_model: String,

    /// Sampling temperature for generation calls
    pub temperature: f32,

    /// Token budget per generation call
    pub max_tokens: u32,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            transcription_endpoint: "https://api.openai.com/v1/audio/transcriptions".to_string(),
            transcription_model: "whisper-1".to_string(),
            chat_endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 256,
        }
    }
}

impl EnrichmentConfig {
    /// Enable enrichment with the given credential
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Point both services at a different base (testing, proxies)
    pub fn with_endpoints(
        mut self,
        transcription: impl Into<String>,
        chat: impl Into<String>,
    ) -> Self {
        self.transcription_endpoint = transcription.into();
        self.chat_endpoint = chat.into();
        self
    }

    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Whether the external services will be called at all
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.transcription_endpoint.is_empty() || self.chat_endpoint.is_empty() {
            return Err(VoxnoteError::ConfigError(
                "enrichment endpoints must not be empty".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(VoxnoteError::ConfigError(format!(
                "temperature out of range: {}",
                self.temperature
            )));
        }
        if self.max_tokens == 0 {
            return Err(VoxnoteError::ConfigError("max_tokens must be positive".into()));
        }
        Ok(())
    }
}
