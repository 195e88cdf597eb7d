//! HTTP client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{LlmError, Result};
use crate::protocol::{GenerateRequest, GenerateResponse};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One generation attempt against one named model.
///
/// The gateway drives this seam; tests substitute scripted implementations.
#[async_trait]
pub trait GenerateBackend: Send + Sync {
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse>;
}

/// Google Gemini API client.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    /// Create a new client with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Set a custom base URL (e.g., for proxies or mock servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        )
    }
}

#[async_trait]
impl GenerateBackend for GeminiClient {
    async fn generate(&self, model: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let url = self.request_url(model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(LlmError::Http)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.map_err(LlmError::Http)?;

            if status == 401 || status == 403 {
                return Err(LlmError::Auth(format!(
                    "Gemini authentication failed: {}. Please check your API key.",
                    text
                )));
            }

            return Err(LlmError::Api(format!(
                "Gemini API error: HTTP {}: {}",
                status, text
            )));
        }

        response.json::<GenerateResponse>().await.map_err(LlmError::Http)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_client() {
        let client = GeminiClient::new("test_key");
        assert_eq!(client.api_key, "test_key");
        assert_eq!(client.base_url, DEFAULT_API_BASE);
    }

    #[test]
    fn test_with_base_url() {
        let client = GeminiClient::new("test_key").with_base_url("https://custom.googleapis.com/v1");
        assert_eq!(client.base_url, "https://custom.googleapis.com/v1");
    }

    #[test]
    fn test_url_construction() {
        let client = GeminiClient::new("my_api_key_123").with_base_url("https://test.api.com/v1beta");

        assert_eq!(
            client.request_url("gemini-2.5-flash"),
            "https://test.api.com/v1beta/models/gemini-2.5-flash:generateContent?key=my_api_key_123"
        );
    }
}
