//! Run orchestration: chunking, concurrent dispatch, and reconciliation of
//! per-chunk outcomes into one observable results collection.

pub mod error;
pub mod orchestrator;
pub mod state;

pub use error::{EngineError, Result};
pub use orchestrator::{Engine, CHUNK_SIZE};
pub use state::{ChunkPatch, ResultsStore, RunSnapshot, TitleOutcome};
