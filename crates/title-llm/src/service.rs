//! Semantic seam between the orchestrator and the model layer.

use async_trait::async_trait;

use title_core::VariationMode;

use crate::error::Result;
use crate::gateway::ModelGateway;
use crate::variations::BatchResult;

/// The two operations a run needs from the model layer.
///
/// The orchestrator only sees this trait; production wires in
/// [`GeminiTitleService`], tests wire in scripted implementations.
#[async_trait]
pub trait TitleBackend: Send + Sync {
    /// Best-effort label of the niche the titles share.
    async fn detect_niche(&self, titles: &[String]) -> Result<String>;

    /// Three variations per title for one bounded batch.
    async fn generate_variations(
        &self,
        titles: &[String],
        mode: VariationMode,
        context_niche: Option<&str>,
        target_niche: Option<&str>,
    ) -> Result<Vec<BatchResult>>;
}

/// [`TitleBackend`] over the Gemini model gateway.
pub struct GeminiTitleService {
    gateway: ModelGateway,
}

impl GeminiTitleService {
    pub fn new(gateway: ModelGateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl TitleBackend for GeminiTitleService {
    async fn detect_niche(&self, titles: &[String]) -> Result<String> {
        crate::niche::detect_niche(&self.gateway, titles).await
    }

    async fn generate_variations(
        &self,
        titles: &[String],
        mode: VariationMode,
        context_niche: Option<&str>,
        target_niche: Option<&str>,
    ) -> Result<Vec<BatchResult>> {
        crate::variations::generate_variations(&self.gateway, titles, mode, context_niche, target_niche)
            .await
    }
}
