//! The query pipeline: classify, search, assemble, reason, validate.
//!
//! Steps are strictly sequential within one query; independent queries can
//! run concurrently because the store is read-only here. Every external
//! failure is absorbed at this boundary and surfaced as the refusal
//! sentence; only owner-scope violations and empty queries escape as
//! errors.

use crate::classifier::QueryClassifier;
use crate::error::RecallError;
use crate::evidence::{self, EvidenceBlock};
use crate::protocol::{self, GroundedAnswer, Verdict};
use crate::ranker::{RankedCandidate, RelevanceScorer, TfIdfScorer};
use crate::reasoner::Reasoner;
use log::{debug, warn};
use lumen_config::RecallConfig;
use lumen_memory::MemoryStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

/// Caps and deadlines for one pipeline instance.
#[derive(Debug, Clone)]
pub struct RecallOptions {
    /// Maximum candidates taken from the ranker.
    pub max_candidates: usize,
    /// Maximum evidence entries handed to the reasoner.
    pub max_evidence: usize,
    /// Deadline for listing and ranking records.
    pub search_timeout: Duration,
    /// Deadline for the reasoner call.
    pub reasoner_timeout: Duration,
}

impl Default for RecallOptions {
    fn default() -> Self {
        Self {
            max_candidates: 50,
            max_evidence: 10,
            search_timeout: Duration::from_secs(5),
            reasoner_timeout: Duration::from_secs(30),
        }
    }
}

impl RecallOptions {
    /// Derive options from a loaded config.
    pub fn from_config(config: &RecallConfig) -> Self {
        Self {
            max_candidates: config.ranker.max_candidates,
            max_evidence: config.evidence.max_entries,
            search_timeout: Duration::from_millis(config.timeouts.search_ms),
            reasoner_timeout: Duration::from_millis(config.timeouts.reasoner_ms),
        }
    }
}

/// Outcome of one query-answer cycle.
#[derive(Debug)]
pub enum QueryOutcome {
    /// Not a memory query; retrieval was skipped entirely.
    Bypassed,
    /// Grounded answer with its supporting evidence.
    Answered {
        /// Validated response text, safe to surface.
        text: String,
        /// Parsed answer structure.
        answer: GroundedAnswer,
        /// Evidence used, for rendering evidence cards.
        evidence: EvidenceBlock,
    },
    /// Refusal; `text` is always exactly [`protocol::REFUSAL`].
    Refused {
        /// The refusal sentence.
        text: String,
        /// Evidence assembled before refusing, if any.
        evidence: Option<EvidenceBlock>,
    },
}

/// Recall pipeline wiring the store, ranker, and reasoner together.
///
/// Collaborators are injected at construction; the pipeline holds no
/// hidden shared state and is cheap to clone behind `Arc`s.
pub struct RecallPipeline {
    store: Arc<dyn MemoryStore>,
    scorer: Arc<dyn RelevanceScorer>,
    reasoner: Arc<dyn Reasoner>,
    classifier: QueryClassifier,
    options: RecallOptions,
}

impl RecallPipeline {
    /// Create a pipeline with the default scorer, classifier, and options.
    pub fn new(store: Arc<dyn MemoryStore>, reasoner: Arc<dyn Reasoner>) -> Self {
        Self {
            store,
            scorer: Arc::new(TfIdfScorer::new()),
            reasoner,
            classifier: QueryClassifier::default(),
            options: RecallOptions::default(),
        }
    }

    /// Create a pipeline wired from a loaded config: classifier tables,
    /// score floor, caps, and deadlines.
    pub fn from_config(
        store: Arc<dyn MemoryStore>,
        reasoner: Arc<dyn Reasoner>,
        config: &RecallConfig,
    ) -> Self {
        let scorer: Arc<dyn RelevanceScorer> = match config.ranker.min_score {
            Some(floor) => Arc::new(TfIdfScorer::with_min_score(floor)),
            None => Arc::new(TfIdfScorer::new()),
        };
        Self {
            store,
            scorer,
            reasoner,
            classifier: QueryClassifier::from_config(&config.classifier),
            options: RecallOptions::from_config(config),
        }
    }

    /// Replace the relevance scoring backend.
    pub fn with_scorer(mut self, scorer: Arc<dyn RelevanceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Replace the query classifier.
    pub fn with_classifier(mut self, classifier: QueryClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Replace caps and deadlines.
    pub fn with_options(mut self, options: RecallOptions) -> Self {
        self.options = options;
        self
    }

    /// Run one query-answer cycle for `owner_id`.
    pub async fn answer(&self, owner_id: &str, query: &str) -> Result<QueryOutcome, RecallError> {
        if query.trim().is_empty() {
            return Err(RecallError::EmptyQuery);
        }

        let intent = self.classifier.classify(query);
        if !intent.is_memory_query {
            debug!("query bypassed retrieval (owner={owner_id})");
            return Ok(QueryOutcome::Bypassed);
        }

        let candidates = match self.search(owner_id, query).await {
            Ok(candidates) => candidates,
            Err(err @ RecallError::OwnerScopeViolation { .. }) => return Err(err),
            Err(err) => {
                warn!("search failed, refusing (owner={owner_id}): {err}");
                return Ok(Self::refuse(None));
            }
        };

        let evidence = evidence::assemble(&candidates, self.options.max_evidence);
        if evidence.is_empty() {
            // An empty result is a normal terminal state, not a failure.
            debug!("no evidence found, refusing without the reasoner (owner={owner_id})");
            return Ok(Self::refuse(None));
        }

        let rendered = evidence.render();
        let raw = match timeout(
            self.options.reasoner_timeout,
            self.reasoner.reason(query, &rendered),
        )
        .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(err)) => {
                warn!("reasoner failed, refusing (owner={owner_id}): {err}");
                return Ok(Self::refuse(Some(evidence)));
            }
            Err(_) => {
                warn!(
                    "reasoner timed out after {:?}, refusing (owner={owner_id})",
                    self.options.reasoner_timeout
                );
                return Ok(Self::refuse(Some(evidence)));
            }
        };

        match protocol::validate_response(&raw, &evidence) {
            Ok(Verdict::Answer(answer)) => {
                debug!(
                    "query answered (owner={owner_id}, citations={})",
                    answer.citations.len()
                );
                Ok(QueryOutcome::Answered {
                    text: raw.trim().to_string(),
                    answer,
                    evidence,
                })
            }
            Ok(Verdict::Refuse) => {
                debug!("reasoner refused (owner={owner_id})");
                Ok(Self::refuse(Some(evidence)))
            }
            Err(err) => {
                warn!("reasoner output rejected, refusing (owner={owner_id}): {err}");
                Ok(Self::refuse(Some(evidence)))
            }
        }
    }

    /// List and rank the owner's records under the search deadline.
    async fn search(
        &self,
        owner_id: &str,
        query: &str,
    ) -> Result<Vec<RankedCandidate>, RecallError> {
        let records = timeout(self.options.search_timeout, self.store.list_records(owner_id))
            .await
            .map_err(|_| RecallError::Timeout("memory store"))??;
        let mut candidates = timeout(
            self.options.search_timeout,
            self.scorer.search(query, &records, owner_id),
        )
        .await
        .map_err(|_| RecallError::Timeout("relevance scorer"))??;
        candidates.truncate(self.options.max_candidates);
        Ok(candidates)
    }

    fn refuse(evidence: Option<EvidenceBlock>) -> QueryOutcome {
        QueryOutcome::Refused {
            text: protocol::REFUSAL.to_string(),
            evidence,
        }
    }
}
