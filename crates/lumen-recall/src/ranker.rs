//! Relevance scoring over record text surfaces.
//!
//! The scoring backend sits behind [`RelevanceScorer`] so an external
//! ranked full-text facility can replace the in-process TF/IDF default
//! without touching assembly or the answer protocol.

use crate::error::RecallError;
use async_trait::async_trait;
use log::debug;
use lumen_memory::MemoryRecord;
use std::collections::{HashMap, HashSet};

/// Text surface of a record that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchSource {
    /// The `ai_description` field.
    Description,
    /// The `transcription` field.
    Transcript,
    /// One of the `detected_labels`.
    DetectedLabel,
}

/// Candidate produced for one matching surface of one record.
///
/// A record may yield several candidates when more than one surface
/// matches; the evidence assembler deduplicates by record id.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    /// The matching record.
    pub record: MemoryRecord,
    /// Surface that matched.
    pub match_source: MatchSource,
    /// Relevance score, always greater than zero.
    pub relevance: f32,
}

#[async_trait]
/// Ranking backend for one owner's record snapshot.
pub trait RelevanceScorer: Send + Sync {
    /// Score `records` against `query`, strictly descending by relevance
    /// with recency breaking ties. `records` must already be scoped to
    /// `owner_id`; a foreign record fails the whole query.
    async fn search(
        &self,
        query: &str,
        records: &[MemoryRecord],
        owner_id: &str,
    ) -> Result<Vec<RankedCandidate>, RecallError>;
}

/// In-process TF/IDF scorer.
///
/// Each text surface is a bag of terms; relevance is term overlap weighted
/// by term rarity across the snapshot, normalized by surface length.
/// Surfaces with no overlapping terms produce no candidate at all.
#[derive(Debug, Clone, Default)]
pub struct TfIdfScorer {
    min_score: Option<f32>,
}

impl TfIdfScorer {
    /// Create a scorer with no score floor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer that drops candidates scoring below `min_score`.
    pub fn with_min_score(min_score: f32) -> Self {
        Self {
            min_score: Some(min_score),
        }
    }
}

#[async_trait]
impl RelevanceScorer for TfIdfScorer {
    async fn search(
        &self,
        query: &str,
        records: &[MemoryRecord],
        owner_id: &str,
    ) -> Result<Vec<RankedCandidate>, RecallError> {
        for record in records {
            if record.owner_id != owner_id {
                return Err(RecallError::OwnerScopeViolation {
                    record_id: record.id,
                    record_owner: record.owner_id.clone(),
                    requested_owner: owner_id.to_string(),
                });
            }
        }

        let query_terms: HashSet<String> = tokenize(query).into_iter().collect();
        if query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let surfaces = collect_surfaces(records);
        let idf = inverse_document_frequencies(&surfaces);

        let mut candidates = Vec::new();
        for surface in &surfaces {
            let Some(relevance) = score_surface(&surface.terms, &query_terms, &idf) else {
                continue;
            };
            if self.min_score.is_some_and(|floor| relevance < floor) {
                continue;
            }
            candidates.push(RankedCandidate {
                record: records[surface.record_index].clone(),
                match_source: surface.source,
                relevance,
            });
        }

        // One candidate per (record, surface kind): keep the best label.
        dedup_label_matches(&mut candidates);

        candidates.sort_by(|a, b| {
            b.relevance
                .partial_cmp(&a.relevance)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| b.record.captured_at.cmp(&a.record.captured_at))
        });
        debug!(
            "ranked memory records (owner={owner_id}, records={}, candidates={})",
            records.len(),
            candidates.len()
        );
        Ok(candidates)
    }
}

/// One searchable text surface extracted from a record.
struct Surface {
    record_index: usize,
    source: MatchSource,
    terms: Vec<String>,
}

/// Split text into lowercase alphanumeric terms, dropping one-character
/// fragments.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}

/// Extract every non-empty text surface; records with none are excluded
/// from ranking entirely.
fn collect_surfaces(records: &[MemoryRecord]) -> Vec<Surface> {
    let mut surfaces = Vec::new();
    for (record_index, record) in records.iter().enumerate() {
        if !record.has_text_surface() {
            continue;
        }
        if let Some(description) = record.ai_description.as_deref() {
            let terms = tokenize(description);
            if !terms.is_empty() {
                surfaces.push(Surface {
                    record_index,
                    source: MatchSource::Description,
                    terms,
                });
            }
        }
        if let Some(transcription) = record.transcription.as_deref() {
            let terms = tokenize(transcription);
            if !terms.is_empty() {
                surfaces.push(Surface {
                    record_index,
                    source: MatchSource::Transcript,
                    terms,
                });
            }
        }
        for label in &record.detected_labels {
            let terms = tokenize(label);
            if !terms.is_empty() {
                surfaces.push(Surface {
                    record_index,
                    source: MatchSource::DetectedLabel,
                    terms,
                });
            }
        }
    }
    surfaces
}

/// Smoothed inverse document frequency per term over all surfaces.
fn inverse_document_frequencies(surfaces: &[Surface]) -> HashMap<&str, f32> {
    let mut document_frequency: HashMap<&str, usize> = HashMap::new();
    for surface in surfaces {
        let unique: HashSet<&str> = surface.terms.iter().map(String::as_str).collect();
        for term in unique {
            *document_frequency.entry(term).or_default() += 1;
        }
    }
    let total = surfaces.len() as f32;
    document_frequency
        .into_iter()
        .map(|(term, frequency)| {
            let idf = ((1.0 + total) / (1.0 + frequency as f32)).ln() + 1.0;
            (term, idf)
        })
        .collect()
}

/// Score one surface against the query terms; `None` when nothing overlaps.
fn score_surface(
    terms: &[String],
    query_terms: &HashSet<String>,
    idf: &HashMap<&str, f32>,
) -> Option<f32> {
    let mut weighted_overlap = 0.0f32;
    let mut matched = false;
    for query_term in query_terms {
        let count = terms.iter().filter(|term| *term == query_term).count();
        if count == 0 {
            continue;
        }
        matched = true;
        let rarity = idf.get(query_term.as_str()).copied().unwrap_or(1.0);
        weighted_overlap += count as f32 * rarity;
    }
    if !matched {
        return None;
    }
    Some(weighted_overlap / terms.len() as f32)
}

/// Keep only the best-scoring label candidate per record.
fn dedup_label_matches(candidates: &mut Vec<RankedCandidate>) {
    let mut best_label: HashMap<uuid::Uuid, f32> = HashMap::new();
    for candidate in candidates.iter() {
        if candidate.match_source == MatchSource::DetectedLabel {
            let entry = best_label.entry(candidate.record.id).or_insert(0.0);
            if candidate.relevance > *entry {
                *entry = candidate.relevance;
            }
        }
    }
    let mut kept: HashSet<uuid::Uuid> = HashSet::new();
    candidates.retain(|candidate| {
        if candidate.match_source != MatchSource::DetectedLabel {
            return true;
        }
        let best = best_label
            .get(&candidate.record.id)
            .copied()
            .unwrap_or_default();
        candidate.relevance >= best && kept.insert(candidate.record.id)
    });
}
