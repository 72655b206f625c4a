use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use crate::error::{CommitdayError, Result};
use crate::stats::{weekday_name, WeekdayCounts};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Instruction appended after the weekday listing.
pub const INSTRUCTIONS: &str = "Make a cool interpretation of my GitHub commits \
based on the data above and give me a response as a tagline like:
You are a weekend warrior! You do most of your work on the weekends
Reply only with the tagline, do not add anything else to the response.";

/// A single-turn text generation service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` as one user message and returns the first reply verbatim.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// `Monday: 5` lines, Monday first.
pub fn format_counts(counts: &WeekdayCounts) -> String {
    counts
        .iter()
        .map(|(day, count)| format!("{}: {}", weekday_name(day), count))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(counts: &WeekdayCounts) -> String {
    format!("{}\n{}", format_counts(counts), INSTRUCTIONS)
}

/// Asks the generator for a tagline describing `counts`.
///
/// The reply is untrusted text and is returned exactly as received.
pub async fn tagline(generator: &dyn TextGenerator, counts: &WeekdayCounts) -> Result<String> {
    let start_time = Instant::now();
    info!(action = "start", component = "tagline", "Requesting tagline");
    let prompt = build_prompt(counts);
    let reply = generator.complete(&prompt).await?;
    info!(
        action = "complete",
        component = "tagline",
        chars = reply.chars().count(),
        duration_ms = start_time.elapsed().as_millis(),
        "Tagline generated"
    );
    Ok(reply)
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    api_base: String,
    api_key: Option<String>,
    model: String,
}

impl ChatCompletionsClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // The key is only checked here so a missing key fails each request, not startup.
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CommitdayError::Generation("no API key configured (set OPENAI_API_KEY)".to_string())
            })?;

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CommitdayError::Generation("request timed out".to_string())
                } else {
                    CommitdayError::Generation(format!("request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            warn!(
                action = "complete",
                component = "chat_api",
                status = status.as_u16(),
                model = %self.model,
                "Chat API returned an error status"
            );
            let reason = match status.as_u16() {
                401 | 403 => "authentication rejected".to_string(),
                429 => "rate limited".to_string(),
                _ => format!("HTTP status {}", status),
            };
            return Err(CommitdayError::Generation(format!("{}: {}", reason, text.trim())));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| CommitdayError::Generation(format!("malformed response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| CommitdayError::Generation("response contained no reply".to_string()))
    }
}
