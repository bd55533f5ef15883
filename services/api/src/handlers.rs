//! Axum Handlers for the REST API
//!
//! This module exposes the two pipeline entry points over HTTP. It uses
//! `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    models::{
        ErrorResponse, IdeasPayload, IdeasResponse, IntroAudioPayload, IntroAudioResponse,
        encode,
    },
    state::AppState,
};

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    InternalServerError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse { message })).into_response()
            }
            ApiError::InternalServerError(err) => {
                error!("Internal Server Error: {:?}", err);
                let message = "An internal server error occurred.".to_string();
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse { message }),
                )
                    .into_response()
            }
        }
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::InternalServerError(err.into())
    }
}

fn require_topic(topic: &str) -> Result<&str, ApiError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ApiError::BadRequest("topic must not be empty".to_string()));
    }
    Ok(topic)
}

/// Generate ideas with an illustration and narration for each.
#[utoipa::path(
    post,
    path = "/ideas",
    request_body = IdeasPayload,
    responses(
        (status = 200, description = "Ideas generated", body = IdeasResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "A backend call failed", body = ErrorResponse)
    )
)]
pub async fn generate_ideas(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IdeasPayload>,
) -> Result<Json<IdeasResponse>, ApiError> {
    let topic = require_topic(&payload.topic)?;
    let max_ideas = payload.max_ideas.unwrap_or(state.config.max_ideas);
    if max_ideas == 0 {
        return Err(ApiError::BadRequest(
            "max_ideas must be at least 1".to_string(),
        ));
    }

    info!(topic = %topic, max_ideas, "Generating ideas");
    let ideas = state
        .gate
        .run(state.pipeline.generate_ideas_with_media(topic, max_ideas))
        .await?;

    Ok(Json(IdeasResponse::from(&ideas)))
}

/// Generate the intro narration for a topic.
///
/// Never fails on backend errors; `audio` is null instead.
#[utoipa::path(
    post,
    path = "/intro-audio",
    request_body = IntroAudioPayload,
    responses(
        (status = 200, description = "Intro audio, or null if synthesis failed", body = IntroAudioResponse),
        (status = 400, description = "Bad request", body = ErrorResponse)
    )
)]
pub async fn intro_audio(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<IntroAudioPayload>,
) -> Result<Json<IntroAudioResponse>, ApiError> {
    let topic = require_topic(&payload.topic)?;

    let audio = state.pipeline.generate_intro_audio(topic).await;
    Ok(Json(IntroAudioResponse {
        audio: audio.as_deref().map(encode),
    }))
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String))
)]
pub async fn health() -> &'static str {
    "ok"
}
