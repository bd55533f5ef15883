//! ImagineThat Core
//!
//! Turns a user topic into a short list of future-oriented ideas, each with
//! a generated illustration and narration. The text, image and speech
//! backends are consumed through traits and injected into the pipeline.

pub mod idea;
pub mod llm_client;
pub mod media;
pub mod parser;
pub mod pipeline;
pub mod prompt;

pub use idea::{IdeaBundle, IdeaList, IdeaRecord, MediaFailure, MediaKind};
pub use pipeline::{FailurePolicy, IdeaPipeline, PipelineError, PipelineOptions};
