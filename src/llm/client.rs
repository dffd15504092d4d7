use std::collections::HashMap;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::llm::prompts::{
    build_name_map_prompt, build_split_prompt, NAME_MAP_SYSTEM_PROMPT, SPLIT_SYSTEM_PROMPT,
};
use crate::models::{SpeakerNameMap, SpeakerSegment};

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;

        Ok(Self {
            api_key,
            model: "claude-sonnet-4-20250514".to_string(),
            temperature: 0.3,
            max_tokens: 2048,
        })
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            temperature: 0.3,
            max_tokens: 2048,
        }
    }
}

/// One per-segment speaker assignment returned by the split request
#[derive(Debug, Clone, Deserialize)]
pub struct SegmentAssignment {
    /// 1-based segment index matching the submitted transcript
    #[serde(rename = "segmentIndex")]
    pub segment_index: usize,
    #[serde(rename = "speakerName")]
    pub speaker_name: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Anthropic API client used for optional name enrichment.
///
/// All failures here are recoverable: callers log and fall back to the
/// local heuristics.
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Ask the model to re-derive turn boundaries and name each segment of
    /// a single-label transcript.
    pub async fn split_transcript(
        &self,
        segments: &[SpeakerSegment],
    ) -> Result<Vec<SegmentAssignment>> {
        let prompt = build_split_prompt(segments);
        let content = self.send_message(SPLIT_SYSTEM_PROMPT, &prompt).await?;
        let json = extract_json(&content);

        serde_json::from_str(json).context("Failed to parse split response as JSON array")
    }

    /// Ask the model for a label -> name map over an already-separated
    /// transcript.
    pub async fn resolve_name_map(
        &self,
        segments: &[SpeakerSegment],
        labels: &[String],
    ) -> Result<SpeakerNameMap> {
        let prompt = build_name_map_prompt(segments, labels);
        let content = self.send_message(NAME_MAP_SYSTEM_PROMPT, &prompt).await?;
        let json = extract_json(&content);

        let map: HashMap<String, String> =
            serde_json::from_str(json).context("Failed to parse name map response as JSON object")?;
        Ok(map)
    }

    /// Send a message to Claude and get a response
    pub async fn send_message(&self, system: &str, user: &str) -> Result<String> {
        let request = AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            temperature: Some(self.config.temperature),
            system: Some(system.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error: {} - {}", status, body);
        }

        let response: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic API response")?;

        // Extract text from the first content block
        response
            .content
            .first()
            .and_then(|c| {
                if c.content_type == "text" {
                    Some(c.text.clone())
                } else {
                    None
                }
            })
            .context("No text content in response")
    }
}

/// Unwrap a markdown code fence if the model returned one
fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();
    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        let after = after.strip_prefix("json").unwrap_or(after);
        if let Some(end) = after.find("```") {
            return after[..end].trim();
        }
    }
    trimmed
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json(r#"  {"a": 1}  "#), r#"{"a": 1}"#);
    }

    #[test]
    fn test_extract_json_fenced() {
        let content = "Here you go:\n```json\n[{\"segmentIndex\": 1}]\n```";
        assert_eq!(extract_json(content), r#"[{"segmentIndex": 1}]"#);
    }

    #[test]
    fn test_extract_json_fenced_without_tag() {
        let content = "```\n{\"SPEAKER_00\": \"Asha\"}\n```";
        assert_eq!(extract_json(content), r#"{"SPEAKER_00": "Asha"}"#);
    }

    #[test]
    fn test_parse_segment_assignment() {
        let json = r#"[{"segmentIndex": 2, "speakerName": "Archana", "reason": "responds"}]"#;
        let parsed: Vec<SegmentAssignment> = serde_json::from_str(json).unwrap();
        assert_eq!(parsed[0].segment_index, 2);
        assert_eq!(parsed[0].speaker_name, "Archana");
    }
}
