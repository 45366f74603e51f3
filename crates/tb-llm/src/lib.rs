//! Claude API integration for the timetable builder.
//!
//! When the engine finds no conflict-free combination, the surrounding
//! application can forward the course dataset here to get a short list of
//! human-readable suggestions (drop a section, move a lab, split across
//! terms). The engine itself knows nothing about this crate.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use tb_core::Course;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const ADVICE_MAX_TOKENS: u32 = 500;
const ADVICE_TEMPERATURE: f32 = 0.3;

/// LLM client errors.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The provided API key was invalid.
    #[error("invalid API key: {reason}")]
    InvalidApiKey { reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// API returned an error response.
    #[error("API error: {message}")]
    Api { message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Why the dataset admits no schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Weekly meeting times overlap.
    Time,
    /// Exam periods collide.
    ExamPeriod,
}

impl ConflictKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::ExamPeriod => "exam_period",
        }
    }
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claude API client.
///
/// # Thread Safety
///
/// The client is safe to clone and share across threads. Each clone shares
/// the underlying HTTP connection pool.
pub struct Client {
    http: reqwest::Client,
    api_key: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new client with the given API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or whitespace-only, or if
    /// the HTTP client fails to build.
    pub fn new(api_key: impl Into<String>) -> Result<Self, LlmError> {
        let api_key = api_key.into();

        if api_key.is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be empty",
            });
        }
        if api_key.trim().is_empty() {
            return Err(LlmError::InvalidApiKey {
                reason: "API key cannot be whitespace-only",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(LlmError::ClientBuild)?;

        Ok(Self { http, api_key })
    }

    /// Asks Claude for workarounds when a dataset admits no schedule.
    ///
    /// Returns a short list of human-readable suggestion strings, trimmed
    /// and deduplicated in response order.
    pub async fn suggest_alternatives(
        &self,
        model: &str,
        courses: &[Course],
        kind: ConflictKind,
    ) -> Result<Vec<String>, LlmError> {
        let prompt = build_advice_prompt(courses, kind);
        let request = MessageRequest {
            model: model.to_string(),
            max_tokens: ADVICE_MAX_TOKENS,
            temperature: ADVICE_TEMPERATURE,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(&body).unwrap_or_else(|| LlmError::Api {
                message: format!("status {status}: {body}"),
            }));
        }

        let payload: MessageResponse = serde_json::from_str(&body)
            .map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
        let text = extract_text(payload.content)?;
        let suggestions = parse_suggestions(&text)?;
        Ok(normalize_suggestions(suggestions))
    }
}

#[derive(Debug, Serialize)]
struct MessageRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
}

fn extract_text(blocks: Vec<ContentBlock>) -> Result<String, LlmError> {
    let mut pieces = Vec::new();
    for block in blocks {
        let ContentBlock::Text { text } = block;
        pieces.push(text);
    }
    if pieces.is_empty() {
        return Err(LlmError::InvalidResponse(
            "missing text content".to_string(),
        ));
    }
    Ok(pieces.join("\n"))
}

fn parse_api_error(body: &str) -> Option<LlmError> {
    #[derive(Deserialize)]
    struct ErrorPayload {
        error: ErrorDetails,
    }

    #[derive(Deserialize)]
    struct ErrorDetails {
        message: String,
    }

    serde_json::from_str::<ErrorPayload>(body)
        .ok()
        .map(|payload| LlmError::Api {
            message: payload.error.message,
        })
}

fn build_advice_prompt(courses: &[Course], kind: ConflictKind) -> String {
    let mut lines = Vec::new();
    lines.push(
        "You are a university scheduling assistant. A student's course picks admit no \
         conflict-free weekly timetable."
            .to_string(),
    );
    lines.push("Return strict JSON: {\"suggestions\":[\"...\",\"...\"]}".to_string());
    lines.push("Rules:".to_string());
    lines.push("- Provide 2-5 short, actionable suggestions in plain language.".to_string());
    lines.push("- Refer to courses and sections by the IDs given below.".to_string());
    lines.push("- Do not invent sections or meeting times that are not listed.".to_string());
    lines.push(String::new());
    lines.push(format!("conflict_kind: {kind}"));
    for course in courses {
        lines.push(format!("course: {}", course.id));
        for section in &course.sections {
            let mut rendered = format!("  section {}: lecture {}", section.id, section.lecture);
            if let Some(lab) = &section.lab {
                rendered.push_str(&format!(", lab {lab}"));
            }
            lines.push(rendered);
        }
    }
    lines.join("\n")
}

fn parse_suggestions(text: &str) -> Result<Vec<String>, LlmError> {
    #[derive(Deserialize)]
    struct Payload {
        suggestions: Vec<String>,
    }

    let payload: Payload =
        serde_json::from_str(text).map_err(|err| LlmError::InvalidResponse(err.to_string()))?;
    Ok(payload.suggestions)
}

fn normalize_suggestions(suggestions: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for suggestion in suggestions {
        let trimmed = suggestion.trim().to_string();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.clone()) {
            kept.push(trimmed);
        }
    }
    kept
}
