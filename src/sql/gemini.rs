//! Gemini `generateContent` client
//!
//! Blocking HTTP; one request per call, no retries. The API key is held as a
//! [`SecretString`] and only exposed when the request header is built.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::generator::LanguageModel;
use crate::core::config::GeneratorConfig;
use crate::core::error::{QueryError, Result};

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
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
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Text parts of the first candidate, concatenated. Empty if none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

pub struct GeminiClient {
    client: reqwest::blocking::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: SecretString, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: model.into(),
        })
    }

    pub fn from_config(config: &GeneratorConfig, api_key: SecretString) -> Result<Self> {
        Ok(Self::new(api_key, config.model.clone(), config.timeout())?
            .with_base_url(config.base_url.clone()))
    }

    /// Override the base URL (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

impl LanguageModel for GeminiClient {
    fn generate_text(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        tracing::debug!(model = %self.model, "requesting SQL generation");

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(QueryError::Generation(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let body: GenerateContentResponse = response.json()?;
        Ok(body.text())
    }
}
