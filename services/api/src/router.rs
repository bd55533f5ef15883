//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the REST API and OpenAPI documentation.

use crate::{
    handlers,
    models::{
        ErrorResponse, FailureResponse, IdeaResponse, IdeasPayload, IdeasResponse,
        IntroAudioPayload, IntroAudioResponse,
    },
    state::AppState,
};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::generate_ideas,
        handlers::intro_audio,
        handlers::health,
    ),
    components(
        schemas(IdeasPayload, IdeasResponse, IdeaResponse, FailureResponse, IntroAudioPayload, IntroAudioResponse, ErrorResponse)
    ),
    tags(
        (name = "ImagineThat API", description = "Future-of-architecture ideas with illustrations and narration")
    )
)]
pub struct ApiDoc;

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route("/ideas", post(handlers::generate_ideas))
        .route("/intro-audio", post(handlers::intro_audio))
        .route("/health", get(handlers::health))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
}
