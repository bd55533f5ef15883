//! API Models
//!
//! Request and response bodies for the HTTP API, with `utoipa` schemas for
//! the OpenAPI document. Binary media is carried as standard base64.

use base64::Engine;
use imaginethat_core::{IdeaBundle, IdeaList, MediaFailure};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct IdeasPayload {
    #[schema(example = "Arena")]
    pub topic: String,
    /// Maximum number of ideas to illustrate. Falls back to the server default.
    #[serde(default)]
    #[schema(example = 1)]
    pub max_ideas: Option<usize>,
}

#[derive(Deserialize, ToSchema)]
pub struct IntroAudioPayload {
    #[schema(example = "Arena")]
    pub topic: String,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct FailureResponse {
    #[schema(example = "image")]
    pub kind: String,
    pub message: String,
}

impl From<&MediaFailure> for FailureResponse {
    fn from(failure: &MediaFailure) -> Self {
        Self {
            kind: failure.kind.to_string(),
            message: failure.message.clone(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct IdeaResponse {
    #[schema(example = "Smart Roofs")]
    pub title: String,
    #[schema(example = "Solar panels that change color.")]
    pub description: String,
    /// Base64-encoded image bytes.
    pub image: Option<String>,
    /// Base64-encoded mp3 bytes.
    pub audio: Option<String>,
    pub failures: Vec<FailureResponse>,
}

impl From<&IdeaBundle> for IdeaResponse {
    fn from(bundle: &IdeaBundle) -> Self {
        Self {
            title: bundle.title().to_string(),
            description: bundle.description().to_string(),
            image: bundle.image().map(encode),
            audio: bundle.audio().map(encode),
            failures: bundle.failures().iter().map(FailureResponse::from).collect(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct IdeasResponse {
    pub ideas: Vec<IdeaResponse>,
    /// Plain-text rendition of the ideas for a chat history.
    #[schema(example = "1. Smart Roofs: Solar panels that change color.")]
    pub summary: String,
}

impl From<&IdeaList> for IdeasResponse {
    fn from(list: &IdeaList) -> Self {
        Self {
            ideas: list.iter().map(IdeaResponse::from).collect(),
            summary: list.summary(),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct IntroAudioResponse {
    /// Base64-encoded mp3 bytes, absent when synthesis failed.
    pub audio: Option<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub message: String,
}

/// Standard base64 with padding, as carried by every media field.
pub(crate) fn encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}
