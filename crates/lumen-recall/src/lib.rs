//! Retrieval and grounded answering over captured memories.
//!
//! One query-answer cycle runs classify → search → assemble → reason:
//! the utterance is classified as memory-recall or general conversation,
//! the owner's records are ranked against it, the top candidates become a
//! bounded evidence block, and the downstream reasoner is held to a strict
//! answer-or-refuse contract validated before anything reaches the user.

pub mod classifier;
pub mod error;
pub mod evidence;
pub mod llm;
pub mod pipeline;
pub mod protocol;
pub mod ranker;
pub mod reasoner;

/// Lexical query classification.
pub use classifier::{QueryClassifier, QueryIntent};
/// Recall error type.
pub use error::RecallError;
/// Evidence assembly types.
pub use evidence::{Confirmation, EvidenceBlock, EvidenceEntry, assemble};
/// HTTP-backed reasoner client.
pub use llm::HttpReasoner;
/// Pipeline wiring and outcomes.
pub use pipeline::{QueryOutcome, RecallOptions, RecallPipeline};
/// Answer protocol contract and validation.
pub use protocol::{Citation, Confidence, GroundedAnswer, REFUSAL, Verdict};
/// Relevance scoring interface and default backend.
pub use ranker::{MatchSource, RankedCandidate, RelevanceScorer, TfIdfScorer};
/// Reasoner interface.
pub use reasoner::{Reasoner, ReasonerError};
