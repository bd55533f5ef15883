//! Idea Pipeline
//!
//! Sequences prompt construction, the completion call, reply parsing and
//! per-idea media synthesis into an [`IdeaList`]. Every backend call is
//! awaited before the next one starts; ideas are processed one at a time.

use crate::{
    idea::{IdeaBundle, IdeaList, IdeaRecord, MediaFailure, MediaKind},
    llm_client::CompletionClient,
    media::MediaSynthesizer,
    parser::parse_ideas_reply_detailed,
    prompt::{self, DEFAULT_IDEA_COUNT, SYSTEM_INSTRUCTION},
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Default number of ideas kept from a reply and sent to media synthesis.
pub const DEFAULT_MAX_IDEAS: usize = 1;

/// How a media failure for one idea affects the rest of the batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failure and report which idea caused it.
    #[default]
    FailFast,
    /// Record the failure on the affected bundle and carry on.
    FailSoft,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Idea completion request failed")]
    Completion(#[source] anyhow::Error),
    #[error("{kind} generation failed for idea {index} ('{title}')")]
    Media {
        index: usize,
        title: String,
        kind: MediaKind,
        #[source]
        source: anyhow::Error,
    },
}

/// Tunables for an [`IdeaPipeline`].
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// How many ideas the prompt asks the model for.
    pub requested_ideas: usize,
    pub failure_policy: FailurePolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            requested_ideas: DEFAULT_IDEA_COUNT,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// The idea-generation pipeline.
///
/// Backends are injected at construction and shared for the pipeline's
/// lifetime.
pub struct IdeaPipeline {
    completion: Arc<dyn CompletionClient>,
    media: MediaSynthesizer,
    options: PipelineOptions,
}

impl IdeaPipeline {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        media: MediaSynthesizer,
        options: PipelineOptions,
    ) -> Self {
        Self {
            completion,
            media,
            options,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Generates the intro clip for `topic`. Never fails; a backend error yields `None`.
    pub async fn generate_intro_audio(&self, topic: &str) -> Option<Vec<u8>> {
        self.media.intro_audio(topic).await
    }

    /// Runs the full pipeline for `topic`, keeping at most `max_ideas` ideas.
    ///
    /// The result may hold fewer ideas than requested, or none, when the
    /// reply contains malformed blocks.
    pub async fn generate_ideas_with_media(
        &self,
        topic: &str,
        max_ideas: usize,
    ) -> Result<IdeaList, PipelineError> {
        let records = self.fetch_ideas(topic).await?;
        let records: Vec<IdeaRecord> = records.into_iter().take(max_ideas).collect();

        let mut bundles = Vec::with_capacity(records.len());
        for (index, idea) in records.into_iter().enumerate() {
            debug!(index, title = %idea.title(), "Synthesizing media for idea");
            bundles.push(self.bundle(index, idea).await?);
        }

        info!(topic = %topic, ideas = bundles.len(), "Idea pipeline finished");
        Ok(IdeaList::from(bundles))
    }

    /// Asks the completion backend for ideas and parses the reply.
    async fn fetch_ideas(&self, topic: &str) -> Result<Vec<IdeaRecord>, PipelineError> {
        let prompt = prompt::build_ideas_prompt_with_count(topic, self.options.requested_ideas);
        debug!(topic = %topic, "Sending idea prompt");

        let reply = self
            .completion
            .complete(SYSTEM_INSTRUCTION, &prompt)
            .await
            .map_err(|e| {
                error!(topic = %topic, error = ?e, "Idea completion failed");
                PipelineError::Completion(e)
            })?;

        let parsed = parse_ideas_reply_detailed(&reply);
        info!(
            topic = %topic,
            parsed = parsed.records.len(),
            dropped = parsed.dropped,
            "Parsed idea reply"
        );
        Ok(parsed.records)
    }

    /// Builds the bundle for one idea: image first, then narration.
    async fn bundle(&self, index: usize, idea: IdeaRecord) -> Result<IdeaBundle, PipelineError> {
        let mut failures = Vec::new();

        let image = self.media.image_for(&idea).await;
        let image = self.settle(index, &idea, MediaKind::Image, image, &mut failures)?;

        let audio = self.media.narration_for(&idea).await;
        let audio = self.settle(index, &idea, MediaKind::Audio, audio, &mut failures)?;

        Ok(IdeaBundle::new(idea, image, audio, failures))
    }

    /// Applies the failure policy to the outcome of one media step.
    fn settle(
        &self,
        index: usize,
        idea: &IdeaRecord,
        kind: MediaKind,
        result: anyhow::Result<Vec<u8>>,
        failures: &mut Vec<MediaFailure>,
    ) -> Result<Option<Vec<u8>>, PipelineError> {
        let source = match result {
            Ok(bytes) => return Ok(Some(bytes)),
            Err(source) => source,
        };

        match self.options.failure_policy {
            FailurePolicy::FailFast => {
                error!(index, title = %idea.title(), %kind, error = ?source, "Media generation failed, aborting batch");
                Err(PipelineError::Media {
                    index,
                    title: idea.title().to_string(),
                    kind,
                    source,
                })
            }
            FailurePolicy::FailSoft => {
                warn!(index, title = %idea.title(), %kind, error = ?source, "Media generation failed, continuing");
                failures.push(MediaFailure {
                    kind,
                    message: format!("{source:#}"),
                });
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        llm_client::MockCompletionClient,
        media::{ImageGenerator, MockImageGenerator, MockSpeechSynthesizer, SpeechSynthesizer},
    };
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use mockall::mock;

    mock! {
        Completion {}
        #[async_trait]
        impl CompletionClient for Completion {
            async fn complete(&self, system_instruction: &str, prompt: &str) -> Result<String>;
        }
    }

    mock! {
        Images {}
        #[async_trait]
        impl ImageGenerator for Images {
            async fn generate_image(&self, prompt: &str) -> Result<Vec<u8>>;
        }
    }

    mock! {
        Speech {}
        #[async_trait]
        impl SpeechSynthesizer for Speech {
            async fn synthesize_speech(&self, text: &str) -> Result<Vec<u8>>;
        }
    }

    const TWO_IDEAS: &str = "1. Smart Roofs: Solar panels that change color.\n\n2. Floating Stages: Modular stages that hover above crowds.";

    fn pipeline_with(
        completion: impl CompletionClient + 'static,
        images: impl ImageGenerator + 'static,
        speech: impl SpeechSynthesizer + 'static,
        failure_policy: FailurePolicy,
    ) -> IdeaPipeline {
        IdeaPipeline::new(
            Arc::new(completion),
            MediaSynthesizer::new(Arc::new(images), Arc::new(speech)),
            PipelineOptions {
                failure_policy,
                ..Default::default()
            },
        )
    }

    fn mock_pipeline(reply: &str) -> IdeaPipeline {
        pipeline_with(
            MockCompletionClient::new(reply),
            MockImageGenerator,
            MockSpeechSynthesizer,
            FailurePolicy::FailFast,
        )
    }

    #[tokio::test]
    async fn test_single_idea_scenario() {
        let ideas = mock_pipeline(TWO_IDEAS)
            .generate_ideas_with_media("Convention Center", 1)
            .await
            .unwrap();

        assert_eq!(ideas.len(), 1);
        let bundle = &ideas.as_slice()[0];
        assert_eq!(bundle.title(), "Smart Roofs");
        assert_eq!(bundle.description(), "Solar panels that change color.");
        assert_eq!(
            bundle.image(),
            Some(&b"Smart Roofs: Solar panels that change color."[..])
        );
        assert!(bundle.audio().is_some());
        assert!(bundle.is_complete());
    }

    #[tokio::test]
    async fn test_truncates_to_min_of_max_and_parsed() {
        let pipeline = mock_pipeline(TWO_IDEAS);

        for (max, expected) in [(0, 0), (1, 1), (2, 2), (5, 2)] {
            let ideas = pipeline.generate_ideas_with_media("Arena", max).await.unwrap();
            assert_eq!(ideas.len(), expected, "max_ideas = {max}");
        }

        let ideas = pipeline.generate_ideas_with_media("Arena", 5).await.unwrap();
        let titles: Vec<&str> = ideas.iter().map(|b| b.title()).collect();
        assert_eq!(titles, vec!["Smart Roofs", "Floating Stages"]);
    }

    #[tokio::test]
    async fn test_malformed_reply_yields_empty_list() {
        let ideas = mock_pipeline("1 Smart Roofs Solar panels")
            .generate_ideas_with_media("Arena", 1)
            .await
            .unwrap();
        assert!(ideas.is_empty());
    }

    #[tokio::test]
    async fn test_sends_system_instruction_and_topic_prompt() {
        let mut completion = MockCompletion::new();
        completion
            .expect_complete()
            .withf(|system, prompt| {
                system == SYSTEM_INSTRUCTION
                    && prompt.contains("future of Arena")
                    && prompt.contains("list of 5 ideas")
            })
            .times(1)
            .returning(|_, _| Ok(TWO_IDEAS.to_string()));

        let pipeline = pipeline_with(
            completion,
            MockImageGenerator,
            MockSpeechSynthesizer,
            FailurePolicy::FailFast,
        );
        let ideas = pipeline.generate_ideas_with_media("Arena", 1).await.unwrap();
        assert_eq!(ideas.len(), 1);
    }

    #[tokio::test]
    async fn test_completion_error_propagates() {
        let mut completion = MockCompletion::new();
        completion
            .expect_complete()
            .returning(|_, _| Err(anyhow!("401 unauthorized")));

        let pipeline = pipeline_with(
            completion,
            MockImageGenerator,
            MockSpeechSynthesizer,
            FailurePolicy::FailSoft,
        );
        let err = pipeline
            .generate_ideas_with_media("Arena", 1)
            .await
            .unwrap_err();

        match err {
            PipelineError::Completion(source) => assert!(source.to_string().contains("401")),
            other => panic!("Expected Completion error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_failing_idea() {
        let mut images = MockImages::new();
        images
            .expect_generate_image()
            .withf(|prompt| prompt.starts_with("Smart Roofs"))
            .times(1)
            .returning(|prompt| Ok(prompt.as_bytes().to_vec()));
        images
            .expect_generate_image()
            .withf(|prompt| prompt.starts_with("Floating Stages"))
            .times(1)
            .returning(|_| Err(anyhow!("quota exceeded")));

        // Narration only runs for the first idea; the second aborts at its image.
        let mut speech = MockSpeech::new();
        speech
            .expect_synthesize_speech()
            .times(1)
            .returning(|text| Ok(text.as_bytes().to_vec()));

        let pipeline = pipeline_with(
            MockCompletionClient::new(TWO_IDEAS),
            images,
            speech,
            FailurePolicy::FailFast,
        );
        let err = pipeline
            .generate_ideas_with_media("Arena", 2)
            .await
            .unwrap_err();

        match &err {
            PipelineError::Media {
                index, title, kind, ..
            } => {
                assert_eq!(*index, 1);
                assert_eq!(title, "Floating Stages");
                assert_eq!(*kind, MediaKind::Image);
            }
            other => panic!("Expected Media error, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "image generation failed for idea 1 ('Floating Stages')"
        );
    }

    #[tokio::test]
    async fn test_fail_soft_isolates_each_idea() {
        let mut images = MockImages::new();
        images
            .expect_generate_image()
            .withf(|prompt| prompt.starts_with("Smart Roofs"))
            .returning(|_| Err(anyhow!("quota exceeded")));
        images
            .expect_generate_image()
            .withf(|prompt| prompt.starts_with("Floating Stages"))
            .returning(|prompt| Ok(prompt.as_bytes().to_vec()));

        let mut speech = MockSpeech::new();
        speech
            .expect_synthesize_speech()
            .withf(|text| text.contains("Floating Stages"))
            .returning(|_| Err(anyhow!("tts timeout")));
        speech
            .expect_synthesize_speech()
            .returning(|text| Ok(text.as_bytes().to_vec()));

        let pipeline = pipeline_with(
            MockCompletionClient::new(TWO_IDEAS),
            images,
            speech,
            FailurePolicy::FailSoft,
        );
        let ideas = pipeline.generate_ideas_with_media("Arena", 2).await.unwrap();

        assert_eq!(ideas.len(), 2);
        let first = &ideas.as_slice()[0];
        assert!(first.image().is_none());
        assert!(first.audio().is_some());
        assert_eq!(first.failures().len(), 1);
        assert_eq!(first.failures()[0].kind, MediaKind::Image);
        assert!(first.failures()[0].message.contains("quota exceeded"));

        let second = &ideas.as_slice()[1];
        assert!(second.image().is_some());
        assert!(second.audio().is_none());
        assert_eq!(second.failures()[0].kind, MediaKind::Audio);
    }

    #[tokio::test]
    async fn test_intro_audio_never_fails() {
        let mut speech = MockSpeech::new();
        speech
            .expect_synthesize_speech()
            .returning(|_| Err(anyhow!("tts down")));

        let pipeline = pipeline_with(
            MockCompletionClient::default(),
            MockImageGenerator,
            speech,
            FailurePolicy::FailFast,
        );
        assert!(pipeline.generate_intro_audio("Arena").await.is_none());

        let audio = mock_pipeline(TWO_IDEAS)
            .generate_intro_audio("Arena")
            .await
            .unwrap();
        assert!(String::from_utf8(audio).unwrap().contains("future of Arena"));
    }

    #[tokio::test]
    async fn test_requested_idea_count_reaches_prompt() {
        let mut completion = MockCompletion::new();
        completion
            .expect_complete()
            .withf(|_, prompt| prompt.starts_with("Give me a list of 3 ideas"))
            .returning(|_, _| Ok(String::new()));

        let pipeline = IdeaPipeline::new(
            Arc::new(completion),
            MediaSynthesizer::new(Arc::new(MockImageGenerator), Arc::new(MockSpeechSynthesizer)),
            PipelineOptions {
                requested_ideas: 3,
                failure_policy: FailurePolicy::FailFast,
            },
        );
        let ideas = pipeline.generate_ideas_with_media("Arena", 1).await.unwrap();
        assert!(ideas.is_empty());
        assert_eq!(pipeline.options().requested_ideas, 3);
    }
}
