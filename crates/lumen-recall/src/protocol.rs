//! The grounded-answer protocol.
//!
//! The reasoner is instructed to emit one of exactly two shapes: a
//! structured, fully-cited answer, or the refusal sentence. Instructions
//! alone are not trusted; every raw response is parsed against the two
//! shapes here and anything else fails closed to refusal.

use crate::error::RecallError;
use crate::evidence::EvidenceBlock;

/// Exact refusal sentence; the only permitted non-answer output.
pub const REFUSAL: &str = "I do not have sufficient verified evidence to answer this question.";

/// System instructions binding the reasoner to the two permitted shapes.
pub const REASONER_INSTRUCTIONS: &str = "\
You are the memory recall engine for a smart-glasses companion.

You receive a question and an evidence block of captured memories. The
evidence block is the only thing you know: no world knowledge, no other
context.

ABSOLUTE RULES:
1. Every factual claim must come from a specific evidence entry.
2. Never invent files, timestamps, or details that are not in the evidence.
3. When several entries could answer, prefer the most recently captured one.
4. If the evidence is absent, ambiguous, or insufficient to fill every
   field truthfully, reply with exactly this sentence and nothing else:
I do not have sufficient verified evidence to answer this question.

OTHERWISE reply in exactly this shape:
Answer: <one factual sentence>
Evidence:
- file: <file> | time: <timestamp> | modality: <modality> | confirmation: <visual|audio|both>
Context: <environment, actions, and object placement drawn only from the evidence text>
Confidence: <High|Medium|Low> - <one-line justification>";

/// Build the user turn handed to the reasoner: the literal query plus the
/// rendered evidence, nothing else.
pub fn reasoner_input(query: &str, evidence: &str) -> String {
    format!("Question: {query}\n\nEvidence block:\n{evidence}")
}

/// Confidence label for an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Return the label as written in answers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }

    /// Parse a label from the closed set.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "High" => Some(Confidence::High),
            "Medium" => Some(Confidence::Medium),
            "Low" => Some(Confidence::Low),
            _ => None,
        }
    }
}

/// One citation copied from the evidence block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// Cited media reference; must exist in the supplied evidence.
    pub source_uri: String,
    /// Timestamp as written by the reasoner.
    pub timestamp: String,
    /// Modality token.
    pub modality: String,
    /// Confirmation token.
    pub confirmation: String,
}

/// A validated ANSWER-state response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundedAnswer {
    /// The single direct-answer sentence.
    pub answer: String,
    /// Citations, all resolvable against the supplied evidence.
    pub citations: Vec<Citation>,
    /// Context drawn from the evidence text.
    pub context: String,
    /// Confidence label.
    pub confidence: Confidence,
    /// One-line justification for the confidence label.
    pub justification: String,
}

/// Terminal state of a validated reasoner response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Structured answer citing the supplied evidence.
    Answer(GroundedAnswer),
    /// The reasoner refused with the exact sentence.
    Refuse,
}

/// Validate a raw reasoner response against the two permitted shapes.
///
/// Returns `Err(RecallError::Protocol)` for anything else; callers must
/// treat that as an external-service failure and refuse.
pub fn validate_response(raw: &str, evidence: &EvidenceBlock) -> Result<Verdict, RecallError> {
    let text = raw.trim();
    if text == REFUSAL {
        return Ok(Verdict::Refuse);
    }
    parse_answer(text, evidence).map(Verdict::Answer)
}

fn violation(message: impl Into<String>) -> RecallError {
    RecallError::Protocol(message.into())
}

fn parse_answer(text: &str, evidence: &EvidenceBlock) -> Result<GroundedAnswer, RecallError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut index = 0;

    let answer = section_line(&lines, &mut index, "Answer:")?;
    if answer.is_empty() {
        return Err(violation("empty direct answer"));
    }

    skip_blank(&lines, &mut index);
    if lines.get(index).map(|line| line.trim()) != Some("Evidence:") {
        return Err(violation("missing Evidence section"));
    }
    index += 1;

    let mut citations = Vec::new();
    while let Some(line) = lines.get(index) {
        let Some(body) = line.trim().strip_prefix("- ") else {
            break;
        };
        citations.push(parse_citation(body, evidence)?);
        index += 1;
    }
    if citations.is_empty() {
        return Err(violation("Evidence section lists no entries"));
    }

    skip_blank(&lines, &mut index);
    let context_head = section_line(&lines, &mut index, "Context:")?;
    let mut context_parts = Vec::new();
    if !context_head.is_empty() {
        context_parts.push(context_head);
    }
    while let Some(line) = lines.get(index) {
        if line.trim().starts_with("Confidence:") {
            break;
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            context_parts.push(trimmed.to_string());
        }
        index += 1;
    }
    let context = context_parts.join(" ");
    if context.is_empty() {
        return Err(violation("empty Context section"));
    }

    let confidence_line = section_line(&lines, &mut index, "Confidence:")?;
    let (label, justification) = confidence_line
        .split_once(" - ")
        .ok_or_else(|| violation("Confidence line missing justification"))?;
    let confidence = Confidence::parse(label.trim())
        .ok_or_else(|| violation(format!("unknown confidence label: {}", label.trim())))?;
    let justification = justification.trim().to_string();
    if justification.is_empty() {
        return Err(violation("empty confidence justification"));
    }

    skip_blank(&lines, &mut index);
    if index < lines.len() {
        return Err(violation("trailing content after the Confidence line"));
    }

    Ok(GroundedAnswer {
        answer,
        citations,
        context,
        confidence,
        justification,
    })
}

/// Consume the line at `index`, requiring `prefix`, and return the rest.
fn section_line(lines: &[&str], index: &mut usize, prefix: &str) -> Result<String, RecallError> {
    let line = lines
        .get(*index)
        .ok_or_else(|| violation(format!("missing {prefix} section")))?;
    let rest = line
        .trim()
        .strip_prefix(prefix)
        .ok_or_else(|| violation(format!("expected {prefix} section, found: {}", line.trim())))?;
    *index += 1;
    Ok(rest.trim().to_string())
}

fn skip_blank(lines: &[&str], index: &mut usize) {
    while lines
        .get(*index)
        .is_some_and(|line| line.trim().is_empty())
    {
        *index += 1;
    }
}

const MODALITY_TOKENS: &[&str] = &["photo", "video", "audio", "text"];
const CONFIRMATION_TOKENS: &[&str] = &["visual", "audio", "both"];

fn parse_citation(body: &str, evidence: &EvidenceBlock) -> Result<Citation, RecallError> {
    let mut source_uri = None;
    let mut timestamp = None;
    let mut modality = None;
    let mut confirmation = None;

    for field in body.split(" | ") {
        let (key, value) = field
            .split_once(": ")
            .ok_or_else(|| violation(format!("malformed citation field: {field}")))?;
        let value = value.trim().to_string();
        match key.trim() {
            "file" => source_uri = Some(value),
            "time" => timestamp = Some(value),
            "modality" => modality = Some(value),
            "confirmation" => confirmation = Some(value),
            other => return Err(violation(format!("unknown citation field: {other}"))),
        }
    }

    let source_uri = source_uri.ok_or_else(|| violation("citation missing file field"))?;
    let timestamp = timestamp.ok_or_else(|| violation("citation missing time field"))?;
    let modality = modality.ok_or_else(|| violation("citation missing modality field"))?;
    let confirmation =
        confirmation.ok_or_else(|| violation("citation missing confirmation field"))?;

    if !MODALITY_TOKENS.contains(&modality.as_str()) {
        return Err(violation(format!("unknown modality token: {modality}")));
    }
    if !CONFIRMATION_TOKENS.contains(&confirmation.as_str()) {
        return Err(violation(format!(
            "unknown confirmation token: {confirmation}"
        )));
    }
    if !evidence.contains_source(&source_uri) {
        return Err(violation(format!(
            "citation references a source outside the evidence block: {source_uri}"
        )));
    }

    Ok(Citation {
        source_uri,
        timestamp,
        modality,
        confirmation,
    })
}
