//! Clients for the external speech-to-text and generation services.
//!
//! Both services are best-effort collaborators: every call returns an
//! `EnrichmentError` the pipeline converts to fallback content, never a
//! crash of the save path.

use crate::audio::AudioBlob;
use crate::enrich::config::EnrichmentConfig;
use crate::{Result, VoxnoteError};
use serde::{Deserialize, Serialize};

/// Highlight lists are capped at this many entries
pub const MAX_HIGHLIGHTS: usize = 4;

/// Overlong heuristic lines are dropped rather than truncated
const MAX_HIGHLIGHT_CHARS: usize = 100;

const TITLE_SYSTEM_PROMPT: &str = "You title voice notes. Given a transcript, reply with one \
short title of 3-6 words. Output only the title, with no quotes and no trailing punctuation.";

const HIGHLIGHTS_SYSTEM_PROMPT: &str = "You summarize collections of voice notes. Given several \
transcripts, reply with a JSON array of 2-4 short highlight phrases capturing the recurring \
themes. Output only the JSON array.";

/// Chat-completion request types
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

/// Chat-completion response types
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// HTTP client for the enrichment collaborators.
pub struct EnrichmentService {
    client: reqwest::Client,
    config: EnrichmentConfig,
}

impl EnrichmentService {
    pub fn new(config: EnrichmentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Whether any external call will be made
    pub fn is_enabled(&self) -> bool {
        self.config.is_enabled()
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| VoxnoteError::EnrichmentError("enrichment is disabled".into()))
    }

    /// Transcribe an audio payload via the speech-to-text service
    pub async fn transcribe(&self, audio: &AudioBlob) -> Result<String> {
        let key = self.api_key()?;

        let part = reqwest::multipart::Part::bytes(audio.bytes.clone())
            .file_name("note.wav")
            .mime_str(&audio.mime)
            .map_err(|e| VoxnoteError::EnrichmentError(format!("audio part: {}", e)))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.config.transcription_model.clone());

        let response = self
            .client
            .post(&self.config.transcription_endpoint)
            .bearer_auth(key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoxnoteError::EnrichmentError(format!("transcription request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VoxnoteError::EnrichmentError(format!(
                "transcription API error {}: {}",
                status, body
            )));
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| VoxnoteError::EnrichmentError(format!("transcription response: {}", e)))?;

        Ok(parsed.text.trim().to_string())
    }

    /// Generate a short title for a transcript
    pub async fn generate_title(&self, transcript: &str) -> Result<String> {
        let content = self.chat(TITLE_SYSTEM_PROMPT, transcript.to_string()).await?;
        Ok(clean_title(&content))
    }

    /// Generate highlight phrases across a set of transcripts.
    /// An empty input short-circuits without touching the network.
    pub async fn generate_highlights(&self, transcripts: &[String]) -> Result<Vec<String>> {
        if transcripts.is_empty() {
            return Ok(Vec::new());
        }

        let joined = transcripts.join("\n---\n");
        let content = self.chat(HIGHLIGHTS_SYSTEM_PROMPT, joined).await?;
        Ok(parse_highlights(&content))
    }

    async fn chat(&self, system: &'static str, user: String) -> Result<String> {
        let key = self.api_key()?;

        let body = ChatRequest {
            model: self.config.chat_model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: system.to_string() },
                ChatMessage { role: "user", content: user },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(&self.config.chat_endpoint)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| VoxnoteError::EnrichmentError(format!("chat request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(VoxnoteError::EnrichmentError(format!(
                "chat API error {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| VoxnoteError::EnrichmentError(format!("chat response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| VoxnoteError::EnrichmentError("chat response had no choices".into()))
    }
}

/// Trim whitespace and one layer of surrounding quotes. Length stays a soft
/// convention enforced only by the prompt.
fn clean_title(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim()
        .to_string()
}

/// Parse a highlights response defensively.
///
/// The service is asked for a JSON array of strings, but models drift; when
/// structured parsing fails, fall back to line-based extraction.
pub(crate) fn parse_highlights(content: &str) -> Vec<String> {
    let stripped = strip_code_fence(content);

    if let Ok(items) = serde_json::from_str::<Vec<String>>(stripped) {
        return items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .take(MAX_HIGHLIGHTS)
            .collect();
    }

    stripped
        .lines()
        .map(clean_highlight_line)
        .filter(|line| !line.is_empty() && line.len() <= MAX_HIGHLIGHT_CHARS)
        .take(MAX_HIGHLIGHTS)
        .collect()
}

fn clean_highlight_line(line: &str) -> String {
    let mut cleaned = line.trim();

    cleaned = cleaned.trim_start_matches(['-', '*', '•', '>']).trim_start();
    // Numbered list prefixes like "1." or "2)"
    if let Some(rest) = cleaned
        .split_once(['.', ')'])
        .filter(|(prefix, _)| !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()))
        .map(|(_, rest)| rest)
    {
        cleaned = rest.trim_start();
    }

    cleaned.trim_matches(['"', '\'', '[', ']', ',']).trim().to_string()
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Skip a language tag on the opening fence
    match inner.split_once('\n') {
        Some((first, rest)) if first.chars().all(|c| c.is_ascii_alphanumeric()) => rest.trim(),
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_highlights_json_array() {
        let parsed = parse_highlights(r#"["Budget planning", "Trip ideas", "Standup notes"]"#);
        assert_eq!(parsed, vec!["Budget planning", "Trip ideas", "Standup notes"]);
    }

    #[test]
    fn test_parse_highlights_fenced_json() {
        let parsed = parse_highlights("```json\n[\"One thing\", \"Another\"]\n```");
        assert_eq!(parsed, vec!["One thing", "Another"]);
    }

    #[test]
    fn test_parse_highlights_bulleted_fallback() {
        let content = "- First highlight\n* Second highlight\n• Third highlight";
        let parsed = parse_highlights(content);
        assert_eq!(parsed, vec!["First highlight", "Second highlight", "Third highlight"]);
    }

    #[test]
    fn test_parse_highlights_numbered_fallback() {
        let parsed = parse_highlights("1. Alpha\n2) Beta");
        assert_eq!(parsed, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_parse_highlights_caps_at_four() {
        let content = "- a\n- b\n- c\n- d\n- e\n- f";
        assert_eq!(parse_highlights(content).len(), MAX_HIGHLIGHTS);
    }

    #[test]
    fn test_parse_highlights_drops_empty_and_overlong() {
        let long = "x".repeat(MAX_HIGHLIGHT_CHARS + 1);
        let content = format!("- Keep me\n-\n- {}\n", long);
        assert_eq!(parse_highlights(&content), vec!["Keep me"]);
    }

    #[test]
    fn test_clean_title_strips_quotes() {
        assert_eq!(clean_title("\"Grocery run plan\"\n"), "Grocery run plan");
        assert_eq!(clean_title("  Morning ideas "), "Morning ideas");
    }

    #[test]
    fn test_disabled_service_rejects_calls() {
        let service = EnrichmentService::new(EnrichmentConfig::default());
        assert!(!service.is_enabled());
        assert!(service.api_key().is_err());
    }
}
