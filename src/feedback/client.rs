//! HTTP client for the external text-generation collaborator.
//!
//! Talks to an OpenAI-compatible chat-completions endpoint. The rest of the
//! crate treats text generation as a black box behind [`TextGenerator`], so
//! analytics keep working when this collaborator is slow or down.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default completions endpoint (Groq's OpenAI-compatible API).
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Request timeout for completion calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Black-box text generation: prompt in, text out.
pub trait TextGenerator {
    fn complete(&self, prompt: &str)
        -> impl Future<Output = Result<String, FeedbackError>> + Send;
}

/// Chat-completions client.
pub struct HttpTextClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl HttpTextClient {
    /// Create a client for the default endpoint.
    pub fn new(api_key: String, model: String) -> Result<Self, FeedbackError> {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL.to_string())
    }

    /// Create a client with a custom base URL.
    pub fn with_base_url(
        api_key: String,
        model: String,
        base_url: String,
    ) -> Result<Self, FeedbackError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| FeedbackError::RequestFailed(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            api_key,
            model,
        })
    }
}

impl TextGenerator for HttpTextClient {
    async fn complete(&self, prompt: &str) -> Result<String, FeedbackError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
        };

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| FeedbackError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FeedbackError::RequestFailed(format!(
                "status {}",
                response.status()
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| FeedbackError::InvalidResponse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| FeedbackError::InvalidResponse("no choices in response".to_string()))
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Text-generation errors.
#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Text generation request failed: {0}")]
    RequestFailed(String),

    #[error("Unexpected text generation response: {0}")]
    InvalidResponse(String),
}
