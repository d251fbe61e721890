// ABOUTME: AI service for text generation calls to Google Gemini
// ABOUTME: Handles API requests, error mapping, and response extraction

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Error)]
pub enum AiServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid response format")]
    InvalidResponse,
}

pub type AiServiceResult<T> = Result<T, AiServiceError>;

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

/// Client for Gemini text generation.
pub struct AiService {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_base: String,
}

impl AiService {
    fn create_client() -> Client {
        Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client")
    }

    /// Creates a new service. A `None` key defers the failure to the first
    /// generation call so the server can still boot without AI configured.
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            info!("GEMINI_API_KEY not set - document drafting is disabled");
        }

        Self {
            client: Self::create_client(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
        }
    }

    pub fn with_model(api_key: Option<String>, model: String) -> Self {
        Self {
            client: Self::create_client(),
            api_key,
            model,
            api_base: GEMINI_API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    fn with_api_base(api_key: Option<String>, api_base: String) -> Self {
        Self {
            client: Self::create_client(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_base,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a text generation call to Gemini and returns the first
    /// candidate's text.
    pub async fn generate_text(&self, prompt: String) -> AiServiceResult<String> {
        let api_key = self.api_key.as_ref().ok_or(AiServiceError::NoApiKey)?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let url = format!("{}/{}:generateContent", self.api_base, self.model);

        info!("Making Gemini API request: model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Gemini API request timed out");
                    AiServiceError::ApiError("Request timed out".to_string())
                } else if e.is_connect() {
                    error!("Failed to connect to Gemini API: {}", e);
                    AiServiceError::ApiError(format!("Connection failed: {}", e))
                } else {
                    AiServiceError::RequestFailed(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(AiServiceError::ApiError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let generate_response: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AiServiceError::ParseError(e.to_string()))?;

        let text = generate_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or(AiServiceError::InvalidResponse)?;

        info!("Received {} chars from Gemini", text.len());

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_no_api_key_fails_without_network() {
        let service = AiService::new(None);
        let result = service.generate_text("hello".to_string()).await;
        assert!(matches!(result, Err(AiServiceError::NoApiKey)));
    }

    #[tokio::test]
    async fn test_generate_text_extracts_first_candidate() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/{}:generateContent", DEFAULT_MODEL)))
            .and(header("x-goog-api-key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [
                    { "content": { "parts": [ { "text": "# Discovery Document" } ] } }
                ]
            })))
            .mount(&server)
            .await;

        let service = AiService::with_api_base(Some("test-key".to_string()), server.uri());
        let text = service.generate_text("draft it".to_string()).await.unwrap();
        assert_eq!(text, "# Discovery Document");
    }

    #[tokio::test]
    async fn test_api_error_surfaces_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let service = AiService::with_api_base(Some("test-key".to_string()), server.uri());
        let result = service.generate_text("draft it".to_string()).await;
        match result {
            Err(AiServiceError::ApiError(msg)) => assert!(msg.contains("429")),
            other => panic!("expected ApiError, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_empty_candidates_is_invalid_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let service = AiService::with_api_base(Some("test-key".to_string()), server.uri());
        let result = service.generate_text("draft it".to_string()).await;
        assert!(matches!(result, Err(AiServiceError::InvalidResponse)));
    }
}
