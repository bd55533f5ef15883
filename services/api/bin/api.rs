//! Main Entrypoint for the ImagineThat API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing the text, image and speech backends.
//! 3. Building the idea pipeline and the request gate.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use async_openai::config::OpenAIConfig;
use imaginethat_api::{
    config::{Backend, Config},
    gate::RequestGate,
    router::create_router,
    state::AppState,
};
use imaginethat_core::{
    IdeaPipeline, PipelineOptions,
    llm_client::{CompletionClient, MockCompletionClient, OpenAICompatibleClient},
    media::{
        ImageGenerator, MediaSynthesizer, MockImageGenerator, MockSpeechSynthesizer,
        OpenAIImageGenerator, OpenAISpeechSynthesizer, SpeechSynthesizer, voice_from_name,
    },
    prompt::DEFAULT_IDEA_COUNT,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal. Shutting down gracefully...");
}

/// Builds the three backends for the configured provider.
fn build_backends(
    config: &Config,
) -> anyhow::Result<(
    Arc<dyn CompletionClient>,
    Arc<dyn ImageGenerator>,
    Arc<dyn SpeechSynthesizer>,
)> {
    match config.backend {
        Backend::OpenAI => {
            info!("Using OpenAI backends.");
            let api_key = config
                .openai_api_key
                .as_ref()
                .context("OPENAI_API_KEY is required for the OpenAI backend")?;
            let openai_config = OpenAIConfig::new()
                .with_api_key(api_key)
                .with_api_base(&config.openai_api_base);
            let voice = voice_from_name(&config.speech_voice)
                .with_context(|| format!("Unsupported voice '{}'", config.speech_voice))?;

            let completion: Arc<dyn CompletionClient> = Arc::new(OpenAICompatibleClient::new(
                openai_config.clone(),
                config.chat_model.clone(),
            ));
            let images: Arc<dyn ImageGenerator> = Arc::new(OpenAIImageGenerator::new(
                openai_config.clone(),
                config.image_model.clone(),
            ));
            let speech: Arc<dyn SpeechSynthesizer> = Arc::new(OpenAISpeechSynthesizer::new(
                openai_config,
                config.speech_model.clone(),
                voice,
            ));
            Ok((completion, images, speech))
        }
        Backend::Mock => {
            info!("Using mock backends.");
            let completion: Arc<dyn CompletionClient> = Arc::new(MockCompletionClient::default());
            let images: Arc<dyn ImageGenerator> = Arc::new(MockImageGenerator);
            let speech: Arc<dyn SpeechSynthesizer> = Arc::new(MockSpeechSynthesizer);
            Ok((completion, images, speech))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 2. Initialize Backends ---
    let (completion, images, speech) = build_backends(&config)?;

    // --- 3. Build Pipeline and Gate ---
    let pipeline = IdeaPipeline::new(
        completion,
        MediaSynthesizer::new(images, speech),
        PipelineOptions {
            requested_ideas: DEFAULT_IDEA_COUNT,
            failure_policy: config.failure_policy,
        },
    );

    let app_state = Arc::new(AppState {
        pipeline: Arc::new(pipeline),
        gate: Arc::new(RequestGate::new(config.min_request_interval)),
        config: Arc::new(config.clone()),
    });

    // --- 4. Create Router and Apply Middleware ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(app_state).layer(cors);

    // --- 5. Start Server ---
    info!(
        backend = ?config.backend,
        chat_model = %config.chat_model,
        image_model = %config.image_model,
        speech_model = %config.speech_model,
        failure_policy = ?config.failure_policy,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has shut down.");
    Ok(())
}
