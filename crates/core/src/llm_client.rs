use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
    },
};
use async_trait::async_trait;
use tracing::debug;

/// A text-generation backend that answers a single prompt.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends one request with the given system instruction and user prompt,
    /// returning the reply text.
    ///
    /// Backend failures are returned as-is; no retry is attempted.
    async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String>;
}

/// An implementation of `CompletionClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The model identifier to use for chat completions (e.g., "gpt-5-nano").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAICompatibleClient {
    async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system_instruction)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()?
                    .into(),
            ])
            .build()?;

        debug!(model = %self.model, "Requesting chat completion");
        let response = self.client.chat().create(request).await?;
        reply_text(&response)
    }
}

/// Extracts the text of the first choice. A response without choices or
/// without content is an error.
pub fn reply_text(response: &CreateChatCompletionResponse) -> Result<String> {
    let answer = response
        .choices
        .first()
        .context("No response choice from LLM")?
        .message
        .content
        .clone()
        .context("No content in LLM response")?;

    Ok(answer)
}

/// A mock `CompletionClient` for development and integration testing.
///
/// Always answers with the same reply, regardless of the prompt.
pub struct MockCompletionClient {
    reply: String,
}

impl MockCompletionClient {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

impl Default for MockCompletionClient {
    /// A reply in the expected idea format.
    fn default() -> Self {
        Self::new(
            "1. Smart Roofs: Solar panels that change color to adjust heat absorption.\n\n\
             2. Floating Stages: Modular stages that hover above crowds.\n\n\
             3. Living Walls: Vertical gardens that filter the air in exhibit halls.",
        )
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, _system_instruction: &str, _prompt: &str) -> Result<String> {
        Ok(self.reply.clone())
    }
}
