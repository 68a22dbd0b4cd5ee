use serde::{Deserialize, Serialize};

use super::types::GenerationClient;
use super::StructuringError;
use crate::config::Config;

/// Default Gemini API endpoint.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generation calls over slow uplinks can take a while; transport timeout
/// only, the core adds no timeout of its own.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Gemini HTTP client for the structured-extraction generation call.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Build from process configuration against the public endpoint.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            DEFAULT_BASE_URL,
            &config.gemini_api_key,
            &config.gemini_model,
            DEFAULT_TIMEOUT_SECS,
        )
    }
}

/// Request body for `models/{model}:generateContent`.
#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response body from `models/{model}:generateContent`.
#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: String,
}

/// Pull the generated text out of the response envelope: first part of the
/// first candidate.
fn first_candidate_text(response: GenerateContentResponse) -> Result<String, StructuringError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| {
            StructuringError::ResponseParsing("No candidates in generation response".into())
        })
}

impl GenerationClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, StructuringError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_connect() {
                    StructuringError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    StructuringError::Timeout(self.timeout_secs)
                } else {
                    StructuringError::HttpClient(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(StructuringError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .map_err(|e| StructuringError::ResponseParsing(e.to_string()))?;

        first_candidate_text(parsed)
    }
}

/// Mock generation client for testing — returns a configurable reply.
pub struct MockGenerationClient {
    reply: String,
}

impl MockGenerationClient {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
        }
    }
}

impl GenerationClient for MockGenerationClient {
    fn generate(&self, _prompt: &str) -> Result<String, StructuringError> {
        Ok(self.reply.clone())
    }
}
