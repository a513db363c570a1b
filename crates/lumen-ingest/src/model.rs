//! Models for fetched media and analysis results.

use chrono::{DateTime, Utc};
use lumen_memory::Modality;
use serde::{Deserialize, Serialize};

/// Kind of a captured media file as reported by the media service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Still image.
    Image,
    /// Video clip.
    Video,
    /// Audio recording.
    Audio,
}

impl MediaKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }

    /// Parse a kind from a lowercase string; unknown kinds default to
    /// image, matching the media service's own default.
    pub fn parse(value: &str) -> Self {
        match value {
            "video" => MediaKind::Video,
            "audio" => MediaKind::Audio,
            _ => MediaKind::Image,
        }
    }

    /// The record modality this media kind maps to.
    pub fn to_modality(self) -> Modality {
        match self {
            MediaKind::Image => Modality::Photo,
            MediaKind::Video => Modality::Video,
            MediaKind::Audio => Modality::Audio,
        }
    }
}

/// Metadata for one captured media file awaiting analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaObject {
    /// Media identifier at the media service.
    pub id: String,
    /// Owner the media belongs to.
    pub owner_id: String,
    /// Media kind.
    pub kind: MediaKind,
    /// Download URL for the underlying blob.
    pub file_url: String,
    /// Original filename.
    pub file_name: String,
    /// When the media was captured.
    pub captured_at: DateTime<Utc>,
}

/// Textual by-products of analyzing one media item.
///
/// All fields may be absent; an item is still recorded so the capture
/// itself is not lost, it just never surfaces in ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaAnalysis {
    /// Vision description of the content.
    pub description: Option<String>,
    /// Speech transcript.
    pub transcript: Option<String>,
    /// Recognized objects, entities, and activities.
    pub labels: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::MediaKind;
    use lumen_memory::Modality;
    use pretty_assertions::assert_eq;

    #[test]
    fn media_kinds_map_to_modalities() {
        assert_eq!(MediaKind::Image.to_modality(), Modality::Photo);
        assert_eq!(MediaKind::Video.to_modality(), Modality::Video);
        assert_eq!(MediaKind::Audio.to_modality(), Modality::Audio);
    }

    #[test]
    fn unknown_kinds_default_to_image() {
        assert_eq!(MediaKind::parse("screenshot"), MediaKind::Image);
        assert_eq!(MediaKind::parse("audio"), MediaKind::Audio);
    }
}
