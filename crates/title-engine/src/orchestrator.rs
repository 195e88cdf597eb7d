//! Chunked, concurrent dispatch of a run and per-chunk reconciliation.

use std::sync::Arc;

use futures::future::join_all;
use log::warn;

use title_core::{GenerationOptions, VariationMode};
use title_llm::{BatchResult, TitleBackend};

use crate::error::{EngineError, Result};
use crate::state::{ChunkPatch, ResultsStore, TitleOutcome};

/// Titles per backend call. Chunks are dispatched concurrently and settle in
/// any order.
pub const CHUNK_SIZE: usize = title_llm::BATCH_LIMIT;

const TITLE_FAILURE_MESSAGE: &str = "This title was not resolved by its batch.";
const BATCH_FAILURE_MESSAGE: &str = "Variation generation failed for this batch.";

/// Drives one run end to end against a [`TitleBackend`], publishing per-title
/// state into a [`ResultsStore`].
pub struct Engine {
    backend: Arc<dyn TitleBackend>,
    store: Arc<ResultsStore>,
}

impl Engine {
    pub fn new(backend: Arc<dyn TitleBackend>, store: Arc<ResultsStore>) -> Self {
        Self { backend, store }
    }

    /// Run the full pipeline: validate, resolve the context niche, fan out
    /// chunk requests, and wait for every chunk to settle. Returns once the
    /// processing flag has been cleared; per-title failures are reported
    /// through the store, not as an error here.
    pub async fn run(
        &self,
        titles: Vec<String>,
        mode: VariationMode,
        options: GenerationOptions,
    ) -> Result<()> {
        if titles.is_empty() {
            let err = EngineError::EmptyInput;
            self.store.reject_run(&err.to_string());
            return Err(err);
        }

        let context_niche = match mode {
            VariationMode::SameNiche => self.resolve_context_niche(&titles, &options).await,
            _ => None,
        };

        let generation = self.store.begin_run(&titles);

        let jobs = titles.chunks(CHUNK_SIZE).enumerate().map(|(index, chunk)| {
            self.process_chunk(
                generation,
                index * CHUNK_SIZE,
                chunk,
                mode,
                context_niche.as_deref(),
                options.target_niche.as_deref(),
            )
        });
        // settle-all join: a failed chunk resolves into a failure patch, so
        // no chunk can cancel or block its siblings
        join_all(jobs).await;

        self.store.finish_run(generation);
        Ok(())
    }

    /// Manual niche wins verbatim when non-blank; otherwise auto-detection
    /// over the full (unbatched) title list. Detection failures are logged
    /// and swallowed.
    async fn resolve_context_niche(
        &self,
        titles: &[String],
        options: &GenerationOptions,
    ) -> Option<String> {
        if let Some(manual) = options.manual_niche.as_deref() {
            let manual = manual.trim();
            if !manual.is_empty() {
                return Some(manual.to_string());
            }
        }

        match self.backend.detect_niche(titles).await {
            Ok(niche) if !niche.is_empty() => Some(niche),
            Ok(_) => None,
            Err(err) => {
                warn!("niche auto-detection failed, continuing without one: {}", err);
                None
            }
        }
    }

    async fn process_chunk(
        &self,
        generation: u64,
        offset: usize,
        chunk: &[String],
        mode: VariationMode,
        context_niche: Option<&str>,
        target_niche: Option<&str>,
    ) {
        let patch = match self
            .backend
            .generate_variations(chunk, mode, context_niche, target_niche)
            .await
        {
            Ok(results) => reconcile_chunk(offset, chunk, results),
            Err(err) => {
                warn!("chunk at offset {} failed as a whole: {}", offset, err);
                ChunkPatch {
                    entries: (0..chunk.len())
                        .map(|i| (offset + i, TitleOutcome::Failed(BATCH_FAILURE_MESSAGE.to_string())))
                        .collect(),
                }
            }
        };
        self.store.apply(generation, patch);
    }
}

/// Match returned results to chunk positions.
///
/// The echoed id claims its position directly; results without a usable id
/// claim the first unclaimed position with equal title text. Chunk inputs
/// left unclaimed afterwards are failed individually, so a partial backend
/// answer never leaves a record loading.
fn reconcile_chunk(offset: usize, chunk: &[String], results: Vec<BatchResult>) -> ChunkPatch {
    let mut claimed = vec![false; chunk.len()];
    let mut entries = Vec::with_capacity(chunk.len());

    for result in results {
        let by_id = result
            .id
            .filter(|&id| id < chunk.len() && !claimed[id]);
        let position = by_id.or_else(|| {
            chunk
                .iter()
                .enumerate()
                .position(|(i, title)| !claimed[i] && *title == result.original_title)
        });

        let Some(position) = position else {
            warn!(
                "discarding result for unknown title {:?} (id {:?})",
                result.original_title, result.id
            );
            continue;
        };

        claimed[position] = true;
        entries.push((offset + position, TitleOutcome::Resolved(result.variations)));
    }

    for (i, was_claimed) in claimed.iter().enumerate() {
        if !*was_claimed {
            entries.push((offset + i, TitleOutcome::Failed(TITLE_FAILURE_MESSAGE.to_string())));
        }
    }

    ChunkPatch { entries }
}
