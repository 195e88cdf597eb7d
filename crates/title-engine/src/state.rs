//! Single-owner container for the shared run state.
//!
//! All mutation funnels through [`ResultsStore::apply`] and friends; every
//! change replaces the whole snapshot and re-publishes it on a watch channel
//! so observers re-render per change. Completions that belong to an abandoned
//! run are identified by their generation tag and dropped.

use std::sync::Mutex;

use serde::Serialize;
use tokio::sync::watch;

use title_core::TitleResult;

/// Everything an observer needs to render a run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSnapshot {
    /// One record per input title, in input order.
    pub results: Vec<TitleResult>,
    /// True from run start until every chunk has settled.
    pub processing: bool,
    /// Whole-run rejection message (e.g. empty input); per-title failures
    /// never land here.
    pub fatal_error: Option<String>,
}

/// Outcome applied to a single title position.
#[derive(Debug, Clone, PartialEq)]
pub enum TitleOutcome {
    Resolved(Vec<String>),
    Failed(String),
}

/// Position-keyed updates produced when one chunk settles.
#[derive(Debug, Clone)]
pub struct ChunkPatch {
    pub entries: Vec<(usize, TitleOutcome)>,
}

struct Inner {
    generation: u64,
    snapshot: RunSnapshot,
}

/// Owner of the run state.
pub struct ResultsStore {
    inner: Mutex<Inner>,
    tx: watch::Sender<RunSnapshot>,
}

impl ResultsStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(RunSnapshot::default());
        Self {
            inner: Mutex::new(Inner {
                generation: 0,
                snapshot: RunSnapshot::default(),
            }),
            tx,
        }
    }

    /// Receiver that yields the snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<RunSnapshot> {
        self.tx.subscribe()
    }

    /// Current snapshot, for one-shot reads.
    pub fn snapshot(&self) -> RunSnapshot {
        self.inner.lock().unwrap().snapshot.clone()
    }

    /// Start a new run: bump the generation, replace the collection with one
    /// loading record per title, clear any previous rejection. Returns the
    /// generation tag the run's completions must carry.
    pub fn begin_run(&self, titles: &[String]) -> u64 {
        let mut inner = self.inner.lock().unwrap();
        inner.generation += 1;
        inner.snapshot = RunSnapshot {
            results: titles
                .iter()
                .map(|title| TitleResult::pending(title.clone()))
                .collect(),
            processing: true,
            fatal_error: None,
        };
        self.tx.send_replace(inner.snapshot.clone());
        inner.generation
    }

    /// Publish a whole-run rejection. Existing records are left untouched.
    pub fn reject_run(&self, message: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.snapshot.fatal_error = Some(message.to_string());
        self.tx.send_replace(inner.snapshot.clone());
    }

    /// Apply one chunk's outcomes. A no-op when `generation` is not the
    /// current run's tag.
    pub fn apply(&self, generation: u64, patch: ChunkPatch) {
        let mut inner = self.inner.lock().unwrap();
        if inner.generation != generation {
            log::debug!(
                "dropping stale chunk patch from generation {} (current {})",
                generation,
                inner.generation
            );
            return;
        }

        let mut results = inner.snapshot.results.clone();
        for (position, outcome) in patch.entries {
            let Some(record) = results.get_mut(position) else {
                log::warn!("chunk patch addressed position {} beyond the run", position);
                continue;
            };
            match outcome {
                TitleOutcome::Resolved(variations) => {
                    record.variations = variations;
                    record.is_loading = false;
                    record.error = None;
                }
                TitleOutcome::Failed(message) => {
                    record.is_loading = false;
                    record.error = Some(message);
                }
            }
        }

        inner.snapshot.results = results;
        self.tx.send_replace(inner.snapshot.clone());
    }

    /// Clear the processing flag once every chunk of the tagged run settled.
    /// A no-op for superseded runs.
    pub fn finish_run(&self, generation: u64) {
        let mut inner = self.inner.lock().unwrap();
        if inner.generation != generation {
            return;
        }
        inner.snapshot.processing = false;
        self.tx.send_replace(inner.snapshot.clone());
    }
}

impl Default for ResultsStore {
    fn default() -> Self {
        Self::new()
    }
}
