// WHY: Delegated formatting via an external language-model HTTP service
// Single request/response round trip with no retries; every failure surfaces
// to the caller, which owns the fallback to local segmentation

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Model used when the caller does not override it
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Hosted endpoint for the generateContent API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the delegated formatter
#[derive(Debug, Clone)]
pub struct SmartConfig {
    /// API key for the language-model service
    pub api_key: String,
    /// Model name appended to the generateContent path
    pub model: String,
    /// Service base URL, overridable for testing
    pub base_url: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl SmartConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Read the API key from `GEMINI_API_KEY`, falling back to the legacy
    /// `API_KEY` variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .map_err(|_| anyhow!("API key is missing: set GEMINI_API_KEY (or API_KEY)"))?;
        Ok(Self::new(api_key))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Delegated language-model formatter
pub struct SmartFormatter {
    client: Client,
    config: SmartConfig,
}

impl SmartFormatter {
    pub fn new(config: SmartConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client for smart formatting")?;
        Ok(Self { client, config })
    }

    /// Construct from environment configuration (`GEMINI_API_KEY` / `API_KEY`)
    pub fn from_env() -> Result<Self> {
        Self::new(SmartConfig::from_env()?)
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    /// Format text through the language model
    ///
    /// Returns the model's formatted blob, trimmed, using the same `\n\n`
    /// separator convention as local segmentation. Empty or whitespace-only
    /// input short-circuits without a network call.
    pub async fn format(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: build_prompt(text),
                }],
            }],
        };

        debug!(
            model = %self.config.model,
            text_chars = text.chars().count(),
            "Sending smart format request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    anyhow!("Smart formatting request timed out")
                } else if e.is_connect() {
                    anyhow!("Cannot connect to the smart formatting service: {e}")
                } else {
                    anyhow!("Smart formatting request failed: {e}")
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Smart formatting service returned HTTP {status}: {body}");
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to decode smart formatting response")?;

        Ok(extract_text(&payload))
    }
}

fn extract_text(payload: &GenerateContentResponse) -> String {
    let mut combined = String::new();
    if let Some(content) = payload.candidates.first().and_then(|c| c.content.as_ref()) {
        for part in &content.parts {
            combined.push_str(&part.text);
        }
    }
    combined.trim().to_string()
}

/// Instruction set equivalent to the local segmentation rules, plus the
/// semantic nuance the scanner cannot provide (abbreviation non-splitting)
fn build_prompt(text: &str) -> String {
    format!(
        r#"You are an expert text formatting engine.

OBJECTIVE:
Format the input text so that each complete sentence is separated by an empty line (double line break).

DEFINITION OF A SENTENCE UNIT:
1. A sentence ends with a terminal punctuation mark: Period (.), Chinese Period (。), Question Mark (?/？), or Exclamation Mark (!/！).
2. CRITICAL RULE: If the terminal punctuation is immediately followed by closing quotation marks (” " ’ ') or closing parentheses () ）), these closing marks BELONG to the sentence. Do NOT split the line between the punctuation and the closing mark.

Example of CORRECT behavior:
Input: He asked, "Are you ready?" The game began.
Output:
He asked, "Are you ready?"

The game began.

INSTRUCTIONS:
1. Preserve all original wording, spelling, and non-structural punctuation exactly.
2. Do not treat abbreviations (like "Mr.", "U.S.A.", "No. 1") as sentence endings.
3. Keep consecutive punctuation runs (like "?!" or "!!!") together as a single sentence ending.
4. Ensure there is exactly one empty line (two newlines) between valid sentence units.
5. Return ONLY the formatted text.

Input Text:
"""
{text}
"""
"#
    )
}
