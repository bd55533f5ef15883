//! Media Synthesis
//!
//! Turns an [`IdeaRecord`] into an illustration and a narration clip. The
//! image and speech backends sit behind the [`ImageGenerator`] and
//! [`SpeechSynthesizer`] traits so the pipeline can run against OpenAI or
//! against deterministic mocks.

use crate::{idea::IdeaRecord, prompt};
use anyhow::{Context, Result, bail};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        CreateImageRequestArgs, CreateSpeechRequestArgs, Image, ImageModel, ImageQuality,
        ImageSize, ImagesResponse, SpeechModel, SpeechResponseFormat, Voice,
    },
};
use async_trait::async_trait;
use base64::Engine;
use std::sync::Arc;
use tracing::{debug, warn};

/// An image-generation backend.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one square image for `prompt` and returns its raw bytes.
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
}

/// A speech-synthesis backend.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesizes `text` and returns the complete encoded audio (mp3).
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>>;
}

/// Generates images through the OpenAI images endpoint.
///
/// Requests a single 1024x1024 image at the `low` quality tier and decodes
/// the base64 payload.
pub struct OpenAIImageGenerator {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAIImageGenerator {
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenAIImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        let request = CreateImageRequestArgs::default()
            .model(ImageModel::Other(self.model.clone()))
            .prompt(prompt)
            .n(1)
            .size(ImageSize::S1024x1024)
            .quality(ImageQuality::Low)
            .build()?;

        debug!(model = %self.model, "Requesting image generation");
        let response = self.client.images().create(request).await?;
        decode_image(&response)
    }
}

/// Extracts the first image of a generation response as raw bytes.
///
/// Only base64 payloads are accepted; a URL response is an error.
pub fn decode_image(response: &ImagesResponse) -> Result<Vec<u8>> {
    let image: &Image = response
        .data
        .first()
        .context("No image in image generation response")?;

    match image {
        Image::B64Json { b64_json, .. } => base64::engine::general_purpose::STANDARD
            .decode(b64_json.as_bytes())
            .context("Image payload is not valid base64"),
        Image::Url { .. } => bail!("Image backend returned a URL instead of a base64 payload"),
    }
}

/// Synthesizes speech through the OpenAI audio endpoint as mp3.
pub struct OpenAISpeechSynthesizer {
    client: Client<OpenAIConfig>,
    model: String,
    voice: Voice,
}

impl OpenAISpeechSynthesizer {
    pub fn new(config: OpenAIConfig, model: String, voice: Voice) -> Self {
        Self {
            client: Client::with_config(config),
            model,
            voice,
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAISpeechSynthesizer {
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>> {
        let request = CreateSpeechRequestArgs::default()
            .input(text)
            .model(SpeechModel::Other(self.model.clone()))
            .voice(self.voice.clone())
            .response_format(SpeechResponseFormat::Mp3)
            .build()?;

        debug!(model = %self.model, bytes = text.len(), "Requesting speech synthesis");
        let response = self.client.audio().speech(request).await?;
        Ok(response.bytes.to_vec())
    }
}

/// Maps a voice name from configuration to an OpenAI voice.
pub fn voice_from_name(name: &str) -> Option<Voice> {
    match name.to_lowercase().as_str() {
        "alloy" => Some(Voice::Alloy),
        "echo" => Some(Voice::Echo),
        "fable" => Some(Voice::Fable),
        "onyx" => Some(Voice::Onyx),
        "nova" => Some(Voice::Nova),
        "shimmer" => Some(Voice::Shimmer),
        _ => None,
    }
}

/// A mock `ImageGenerator` that echoes the prompt back as the image bytes.
#[derive(Default)]
pub struct MockImageGenerator;

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>> {
        Ok(prompt.as_bytes().to_vec())
    }
}

/// A mock `SpeechSynthesizer` that echoes the narration text back as the audio bytes.
#[derive(Default)]
pub struct MockSpeechSynthesizer;

#[async_trait]
impl SpeechSynthesizer for MockSpeechSynthesizer {
    async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>> {
        Ok(text.as_bytes().to_vec())
    }
}

/// Produces the illustration and narration for ideas, and the intro clip for a topic.
#[derive(Clone)]
pub struct MediaSynthesizer {
    images: Arc<dyn ImageGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl MediaSynthesizer {
    pub fn new(images: Arc<dyn ImageGenerator>, speech: Arc<dyn SpeechSynthesizer>) -> Self {
        Self { images, speech }
    }

    /// Generates the illustration for `idea` from its combined text.
    pub async fn image_for(&self, idea: &IdeaRecord) -> Result<Vec<u8>> {
        self.images.generate_image(&idea.combined_text()).await
    }

    /// Generates the narration clip for `idea`.
    pub async fn narration_for(&self, idea: &IdeaRecord) -> Result<Vec<u8>> {
        let text = prompt::idea_narration(&idea.combined_text());
        self.speech.synthesize_speech(&text).await
    }

    /// Generates the intro clip for `topic`. Failures are logged and yield `None`.
    pub async fn intro_audio(&self, topic: &str) -> Option<Vec<u8>> {
        let text = prompt::intro_narration(topic);
        match self.speech.synthesize_speech(&text).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(topic = %topic, error = ?e, "Intro audio generation failed");
                None
            }
        }
    }
}
