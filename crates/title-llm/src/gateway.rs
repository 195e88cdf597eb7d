//! Sequential model-fallback over an ordered candidate list.

use std::sync::Arc;

use log::warn;

use crate::client::GenerateBackend;
use crate::error::{LlmError, Result};
use crate::protocol::{GenerateRequest, GenerateResponse};

/// Candidate models in priority order, fastest first.
pub const DEFAULT_MODEL_PRIORITY: [&str; 5] = [
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-3-pro-preview",
    "gemini-2.5-pro",
    "gemini-1.5-flash",
];

/// Tries one logical generation against each candidate model in order until
/// one succeeds. Attempts are strictly sequential; a later candidate is only
/// reached after the current one has definitively failed.
pub struct ModelGateway {
    backend: Arc<dyn GenerateBackend>,
    models: Vec<String>,
}

impl ModelGateway {
    pub fn new(backend: Arc<dyn GenerateBackend>) -> Self {
        Self {
            backend,
            models: DEFAULT_MODEL_PRIORITY.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Replace the candidate list; an empty list keeps the default.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        if !models.is_empty() {
            self.models = models;
        }
        self
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Run `request` against the candidates, returning the first success.
    /// `task` labels the logical operation in logs and errors.
    pub async fn generate(&self, task: &str, request: &GenerateRequest) -> Result<GenerateResponse> {
        let mut last_error: Option<LlmError> = None;

        for model in &self.models {
            match self.backend.generate(model, request).await {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!("model {} failed for {}: {}", model, task, err);
                    last_error = Some(err);
                }
            }
        }

        Err(LlmError::Exhausted {
            task: task.to_string(),
            attempts: self.models.len(),
            source: Box::new(
                last_error.unwrap_or_else(|| LlmError::Api("no candidate models configured".to_string())),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::protocol::{Candidate, Content, Part};

    fn response_with_text(text: &str) -> GenerateResponse {
        GenerateResponse {
            candidates: vec![Candidate {
                content: Content {
                    role: "model".to_string(),
                    parts: vec![Part {
                        text: Some(text.to_string()),
                    }],
                },
                finish_reason: None,
            }],
        }
    }

    /// Fails every model before `succeed_at`, recording the order of attempts.
    struct ScriptedBackend {
        succeed_at: Option<String>,
        attempts: Mutex<Vec<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn failing_until(model: &str) -> Self {
            Self {
                succeed_at: Some(model.to_string()),
                attempts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }

        fn always_failing() -> Self {
            Self {
                succeed_at: None,
                attempts: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerateBackend for ScriptedBackend {
        async fn generate(&self, model: &str, _request: &GenerateRequest) -> Result<GenerateResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.attempts.lock().unwrap().push(model.to_string());

            if self.succeed_at.as_deref() == Some(model) {
                Ok(response_with_text(&format!("from {}", model)))
            } else {
                Err(LlmError::Api(format!("model {} unavailable", model)))
            }
        }
    }

    #[tokio::test]
    async fn returns_first_successful_candidate() {
        let backend = Arc::new(ScriptedBackend::failing_until("b"));
        let gateway = ModelGateway::new(backend.clone())
            .with_models(vec!["a".to_string(), "b".to_string(), "c".to_string()]);

        let response = gateway
            .generate("test task", &GenerateRequest::from_text("p"))
            .await
            .expect("should fall back to b");

        assert_eq!(response.text(), "from b");
        // c is never tried once b succeeds
        assert_eq!(*backend.attempts.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn first_candidate_success_skips_the_rest() {
        let backend = Arc::new(ScriptedBackend::failing_until("a"));
        let gateway =
            ModelGateway::new(backend.clone()).with_models(vec!["a".to_string(), "b".to_string()]);

        let response = gateway
            .generate("test task", &GenerateRequest::from_text("p"))
            .await
            .unwrap();

        assert_eq!(response.text(), "from a");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn exhaustion_wraps_last_failure() {
        let backend = Arc::new(ScriptedBackend::always_failing());
        let gateway =
            ModelGateway::new(backend.clone()).with_models(vec!["a".to_string(), "b".to_string()]);

        let err = gateway
            .generate("test task", &GenerateRequest::from_text("p"))
            .await
            .expect_err("all candidates fail");

        match err {
            LlmError::Exhausted { task, attempts, source } => {
                assert_eq!(task, "test task");
                assert_eq!(attempts, 2);
                assert!(source.to_string().contains("model b unavailable"));
            }
            other => panic!("expected Exhausted, got {:?}", other),
        }
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_priority_is_fastest_first() {
        let backend = Arc::new(ScriptedBackend::always_failing());
        let gateway = ModelGateway::new(backend);
        assert_eq!(gateway.models()[0], "gemini-2.5-flash");
        assert_eq!(gateway.models().len(), DEFAULT_MODEL_PRIORITY.len());
    }

    #[test]
    fn empty_override_keeps_default_list() {
        let backend = Arc::new(ScriptedBackend::always_failing());
        let gateway = ModelGateway::new(backend).with_models(Vec::new());
        assert_eq!(gateway.models().len(), DEFAULT_MODEL_PRIORITY.len());
    }
}
