//! Gemini-backed generation layer: wire protocol, HTTP client, model-fallback
//! gateway, and the two operations built on top of it (niche detection and
//! batched title variation generation).

pub mod client;
pub mod error;
pub mod gateway;
pub mod niche;
pub mod protocol;
pub mod service;
pub mod variations;

pub use client::{GeminiClient, GenerateBackend, DEFAULT_API_BASE};
pub use error::{LlmError, Result};
pub use gateway::{ModelGateway, DEFAULT_MODEL_PRIORITY};
pub use niche::detect_niche;
pub use protocol::{Candidate, Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};
pub use service::{GeminiTitleService, TitleBackend};
pub use variations::{generate_variations, BatchResult, BATCH_LIMIT};
