use std::fmt;

/// A single future-oriented idea parsed from the model's reply.
///
/// Both fields are trimmed and guaranteed non-empty; a record that would
/// violate this is never constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaRecord {
    title: String,
    description: String,
}

impl IdeaRecord {
    /// Creates a record from raw parts, trimming both.
    ///
    /// Returns `None` if either part is empty after trimming.
    pub fn new(title: &str, description: &str) -> Option<Self> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() || description.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            description: description.to_string(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The combined `"<title>: <description>"` text used for both the image
    /// prompt and the narration.
    pub fn combined_text(&self) -> String {
        format!("{}: {}", self.title, self.description)
    }
}

/// Which media generation step produced a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Audio,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Audio => write!(f, "audio"),
        }
    }
}

/// A media step that failed for one idea while running fail-soft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFailure {
    pub kind: MediaKind,
    pub message: String,
}

/// An idea enriched with its generated illustration and narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaBundle {
    idea: IdeaRecord,
    image: Option<Vec<u8>>,
    audio: Option<Vec<u8>>,
    failures: Vec<MediaFailure>,
}

impl IdeaBundle {
    pub(crate) fn new(
        idea: IdeaRecord,
        image: Option<Vec<u8>>,
        audio: Option<Vec<u8>>,
        failures: Vec<MediaFailure>,
    ) -> Self {
        Self {
            idea,
            image,
            audio,
            failures,
        }
    }

    pub fn idea(&self) -> &IdeaRecord {
        &self.idea
    }

    pub fn title(&self) -> &str {
        self.idea.title()
    }

    pub fn description(&self) -> &str {
        self.idea.description()
    }

    /// Raw image bytes as decoded from the image backend.
    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }

    /// Raw mp3 bytes from the speech backend.
    pub fn audio(&self) -> Option<&[u8]> {
        self.audio.as_deref()
    }

    /// Media steps that failed for this idea. Always empty under fail-fast.
    pub fn failures(&self) -> &[MediaFailure] {
        &self.failures
    }

    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// The ordered result of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdeaList(Vec<IdeaBundle>);

impl IdeaList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IdeaBundle> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[IdeaBundle] {
        &self.0
    }

    /// Plain-text rendition for a chat history entry:
    /// `"1. Title: Description"` per idea, separated by blank lines.
    pub fn summary(&self) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, bundle)| format!("{}. {}", idx + 1, bundle.idea.combined_text()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl From<Vec<IdeaBundle>> for IdeaList {
    fn from(bundles: Vec<IdeaBundle>) -> Self {
        Self(bundles)
    }
}

impl IntoIterator for IdeaList {
    type Item = IdeaBundle;
    type IntoIter = std::vec::IntoIter<IdeaBundle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IdeaList {
    type Item = &'a IdeaBundle;
    type IntoIter = std::slice::Iter<'a, IdeaBundle>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
