//! Evidence assembly for the grounded-answer protocol.
//!
//! Pure deduplication, truncation, and formatting. Nothing here judges
//! content; the assembled block is the only evidentiary basis the answer
//! protocol is allowed to see.

use crate::ranker::{MatchSource, RankedCandidate};
use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use lumen_memory::{MemoryRecord, Modality};
use std::collections::HashMap;
use uuid::Uuid;

/// How a record's content was confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Confirmed by visual analysis (description or detected labels).
    Visual,
    /// Confirmed by speech (transcript, or any surface of an audio record).
    Audio,
    /// Independently confirmed by both visual and audio surfaces.
    Both,
}

impl Confirmation {
    /// Return the confirmation tag as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Confirmation::Visual => "visual",
            Confirmation::Audio => "audio",
            Confirmation::Both => "both",
        }
    }

    fn merge(self, other: Confirmation) -> Confirmation {
        if self == other { self } else { Confirmation::Both }
    }
}

/// One deduplicated, citable evidence entry.
#[derive(Debug, Clone)]
pub struct EvidenceEntry {
    /// Backing record id.
    pub record_id: Uuid,
    /// Reference to the underlying media blob.
    pub source_uri: String,
    /// Media modality.
    pub modality: Modality,
    /// When the experience occurred.
    pub captured_at: DateTime<Utc>,
    /// Confirmation tag derived from the matching surfaces.
    pub confirmation: Confirmation,
    /// Highest relevance among the record's matches.
    pub relevance: f32,
    /// The record's text surfaces, for the context section of an answer.
    pub excerpt: String,
}

/// Ordered, deduplicated, capped evidence handed to the reasoner and the
/// presentation layer.
#[derive(Debug, Clone, Default)]
pub struct EvidenceBlock {
    /// Entries in ranked order.
    pub entries: Vec<EvidenceEntry>,
}

impl EvidenceBlock {
    /// Whether the block carries no evidence.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether a cited source refers to an entry in this block.
    pub fn contains_source(&self, source_uri: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.source_uri == source_uri)
    }

    /// Render the block as numbered, fixed-field text for prompt injection
    /// and for evidence cards.
    pub fn render(&self) -> String {
        let mut lines = Vec::new();
        for (position, entry) in self.entries.iter().enumerate() {
            lines.push(format!(
                "[{}] file: {} | time: {} | modality: {} | confirmation: {}",
                position + 1,
                entry.source_uri,
                entry
                    .captured_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                entry.modality.as_str(),
                entry.confirmation.as_str()
            ));
            for excerpt_line in entry.excerpt.lines() {
                lines.push(format!("    {excerpt_line}"));
            }
        }
        lines.join("\n")
    }
}

/// Deduplicate candidates by record id (keeping the highest-relevance
/// match and merging confirmations), then truncate to `max_entries`.
/// Order is preserved from the ranker's output.
pub fn assemble(candidates: &[RankedCandidate], max_entries: usize) -> EvidenceBlock {
    let mut entries: Vec<EvidenceEntry> = Vec::new();
    let mut positions: HashMap<Uuid, usize> = HashMap::new();

    for candidate in candidates {
        let confirmation = confirmation_for(candidate.match_source, candidate.record.modality);
        match positions.get(&candidate.record.id) {
            Some(&position) => {
                let entry = &mut entries[position];
                entry.confirmation = entry.confirmation.merge(confirmation);
                if candidate.relevance > entry.relevance {
                    entry.relevance = candidate.relevance;
                }
            }
            None => {
                positions.insert(candidate.record.id, entries.len());
                entries.push(EvidenceEntry {
                    record_id: candidate.record.id,
                    source_uri: candidate.record.source_uri.clone(),
                    modality: candidate.record.modality,
                    captured_at: candidate.record.captured_at,
                    confirmation,
                    relevance: candidate.relevance,
                    excerpt: excerpt_for(&candidate.record),
                });
            }
        }
    }

    entries.truncate(max_entries);
    debug!(
        "assembled evidence (candidates={}, entries={})",
        candidates.len(),
        entries.len()
    );
    EvidenceBlock { entries }
}

/// Confirmation tag for a single matching surface.
fn confirmation_for(source: MatchSource, modality: Modality) -> Confirmation {
    match source {
        MatchSource::Transcript => Confirmation::Audio,
        MatchSource::Description | MatchSource::DetectedLabel => match modality {
            Modality::Audio => Confirmation::Audio,
            _ => Confirmation::Visual,
        },
    }
}

/// The record's text surfaces, one per line.
fn excerpt_for(record: &MemoryRecord) -> String {
    let mut parts = Vec::new();
    if let Some(description) = record.ai_description.as_deref() {
        let trimmed = description.trim();
        if !trimmed.is_empty() {
            parts.push(format!("visual: {trimmed}"));
        }
    }
    if let Some(transcription) = record.transcription.as_deref() {
        let trimmed = transcription.trim();
        if !trimmed.is_empty() {
            parts.push(format!("transcript: {trimmed}"));
        }
    }
    let labels: Vec<&str> = record
        .detected_labels
        .iter()
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .collect();
    if !labels.is_empty() {
        parts.push(format!("labels: {}", labels.join(", ")));
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::{Confirmation, assemble};
    use crate::ranker::{MatchSource, RankedCandidate};
    use chrono::Utc;
    use lumen_memory::{MemoryRecord, Modality};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn record(modality: Modality, uri: &str) -> MemoryRecord {
        MemoryRecord {
            id: Uuid::new_v4(),
            owner_id: "u1".to_string(),
            modality,
            captured_at: Utc::now(),
            source_uri: uri.to_string(),
            ai_description: Some("a wallet on the dresser".to_string()),
            transcription: None,
            detected_labels: vec!["wallet".to_string()],
        }
    }

    fn candidate(record: &MemoryRecord, source: MatchSource, relevance: f32) -> RankedCandidate {
        RankedCandidate {
            record: record.clone(),
            match_source: source,
            relevance,
        }
    }

    #[test]
    fn duplicate_records_collapse_to_their_best_match() {
        let wallet = record(Modality::Video, "media/wallet.mp4");
        let candidates = vec![
            candidate(&wallet, MatchSource::Transcript, 0.9),
            candidate(&wallet, MatchSource::Description, 0.6),
        ];
        let block = assemble(&candidates, 10);
        assert_eq!(block.len(), 1);
        assert_eq!(block.entries[0].relevance, 0.9);
        assert_eq!(block.entries[0].confirmation, Confirmation::Both);
    }

    #[test]
    fn order_is_preserved_and_relevance_is_non_increasing() {
        let first = record(Modality::Video, "media/first.mp4");
        let second = record(Modality::Photo, "media/second.jpg");
        let candidates = vec![
            candidate(&first, MatchSource::Transcript, 0.8),
            candidate(&second, MatchSource::DetectedLabel, 0.5),
        ];
        let block = assemble(&candidates, 10);
        assert_eq!(block.len(), 2);
        assert_eq!(block.entries[0].source_uri, "media/first.mp4");
        assert_eq!(block.entries[1].source_uri, "media/second.jpg");
        assert!(block.entries[0].relevance >= block.entries[1].relevance);
    }

    #[test]
    fn truncation_keeps_the_top_entries() {
        let records: Vec<MemoryRecord> = (0..5)
            .map(|index| record(Modality::Photo, &format!("media/{index}.jpg")))
            .collect();
        let candidates: Vec<RankedCandidate> = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                candidate(record, MatchSource::Description, 1.0 - index as f32 * 0.1)
            })
            .collect();
        let block = assemble(&candidates, 3);
        assert_eq!(block.len(), 3);
        assert_eq!(block.entries[0].source_uri, "media/0.jpg");
        assert_eq!(block.entries[2].source_uri, "media/2.jpg");
    }

    #[test]
    fn confirmation_follows_surface_and_modality() {
        let photo = record(Modality::Photo, "media/photo.jpg");
        let block = assemble(&[candidate(&photo, MatchSource::Description, 0.4)], 10);
        assert_eq!(block.entries[0].confirmation, Confirmation::Visual);

        let voice_note = record(Modality::Audio, "media/note.m4a");
        let block = assemble(&[candidate(&voice_note, MatchSource::DetectedLabel, 0.4)], 10);
        assert_eq!(block.entries[0].confirmation, Confirmation::Audio);

        let clip = record(Modality::Video, "media/clip.mp4");
        let block = assemble(&[candidate(&clip, MatchSource::Transcript, 0.4)], 10);
        assert_eq!(block.entries[0].confirmation, Confirmation::Audio);
    }

    #[test]
    fn render_exposes_fixed_fields_and_excerpts() {
        let mut keys = record(Modality::Photo, "media/keys.jpg");
        keys.ai_description = Some("a set of keys on a kitchen counter".to_string());
        keys.detected_labels = vec!["keys".to_string(), "counter".to_string()];
        let block = assemble(&[candidate(&keys, MatchSource::Description, 0.7)], 10);
        let rendered = block.render();
        assert!(rendered.starts_with("[1] file: media/keys.jpg | time: "));
        assert!(rendered.contains("| modality: photo | confirmation: visual"));
        assert!(rendered.contains("    visual: a set of keys on a kitchen counter"));
        assert!(rendered.contains("    labels: keys, counter"));
    }

    #[test]
    fn empty_candidates_assemble_to_an_empty_block() {
        let block = assemble(&[], 10);
        assert!(block.is_empty());
        assert_eq!(block.render(), "");
    }
}
