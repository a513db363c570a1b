//! Captured memory record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media modality of a captured record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    /// Still image.
    Photo,
    /// Video clip.
    Video,
    /// Audio recording.
    Audio,
    /// Text-only capture (e.g. a saved note).
    Text,
}

impl Modality {
    /// Return the modality as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Photo => "photo",
            Modality::Video => "video",
            Modality::Audio => "audio",
            Modality::Text => "text",
        }
    }

    /// Parse a modality from a lowercase string.
    pub fn parse(value: &str) -> Self {
        match value {
            "photo" | "image" => Modality::Photo,
            "video" => Modality::Video,
            "audio" => Modality::Audio,
            _ => Modality::Text,
        }
    }
}

/// Canonical record for one captured experience.
///
/// Records are appended by the analysis pipeline once a media file has been
/// processed and are read-only to the retrieval side. The retrieval core
/// never reads the underlying blob, only `source_uri` and the textual
/// by-products below.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryRecord {
    /// Record identifier, stable for the record's lifetime.
    pub id: Uuid,
    /// Owner the record belongs to; every query is scoped to one owner.
    pub owner_id: String,
    /// Media modality.
    pub modality: Modality,
    /// When the underlying experience occurred (not when it was indexed).
    pub captured_at: DateTime<Utc>,
    /// Reference to the underlying blob, owned by external storage.
    pub source_uri: String,
    /// Free-text description from the vision/audio analysis step.
    #[serde(default)]
    pub ai_description: Option<String>,
    /// Speech transcript, present for audio/video with speech.
    #[serde(default)]
    pub transcription: Option<String>,
    /// Recognized objects, entities, and activities.
    #[serde(default)]
    pub detected_labels: Vec<String>,
}

impl MemoryRecord {
    /// Whether the record carries at least one non-empty searchable text
    /// surface. Records without any can never be returned by the ranker.
    pub fn has_text_surface(&self) -> bool {
        let non_empty = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty())
        };
        non_empty(&self.ai_description)
            || non_empty(&self.transcription)
            || self
                .detected_labels
                .iter()
                .any(|label| !label.trim().is_empty())
    }
}
