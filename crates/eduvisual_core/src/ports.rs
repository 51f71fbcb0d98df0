//! crates/eduvisual_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of specific external implementations like the
//! generative-text provider, the image-search provider, or the lecture store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{EnhancementResult, ImageCandidate, Lecture, Question};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g.,
/// the text-generation API, the image-search API, or storage).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Upstream provider error: {0}")]
    Upstream(String),
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Provenance
//=========================================================================================

/// Marks whether a gateway result came from the live provider or from the
/// deterministic fallback used when the provider is unconfigured or failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    Live,
    Mock,
}

/// A batch of generated questions together with where they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionBatch {
    pub questions: Vec<Question>,
    pub provenance: Provenance,
}

/// The image candidates sourced for one topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicVisuals {
    pub topic: String,
    pub images: Vec<ImageCandidate>,
    pub provenance: Provenance,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Enhances raw lecture content into summaries, clarifications and
/// visual/activity suggestions.
///
/// There is no mock fallback for this port: a failing provider surfaces as a
/// `PortError`, and callers must treat "no enhancement" as a valid degraded
/// state for a slide.
#[async_trait]
pub trait ContentEnhancementService: Send + Sync {
    async fn enhance(&self, content: &str, topic: &str) -> PortResult<EnhancementResult>;
}

/// Generates quiz questions for a piece of content.
///
/// Implementations must degrade to a deterministic mock batch (tagged
/// `Provenance::Mock`) when the provider is unconfigured, fails, or returns
/// something unparsable; they never propagate upstream failures.
#[async_trait]
pub trait QuestionGenerationService: Send + Sync {
    async fn generate(&self, content: &str, topic: &str, count: usize)
        -> PortResult<QuestionBatch>;
}

/// Sources illustrative image candidates per topic.
///
/// Degradation is per topic: a live search failure for one topic yields
/// placeholder images for that topic only and must not abort the others.
#[async_trait]
pub trait VisualSuggestionService: Send + Sync {
    async fn suggest(&self, topics: &[String]) -> PortResult<Vec<TopicVisuals>>;
}

/// Storage abstraction for lectures.
///
/// The contract is deliberately narrow (get/insert/update/contains) so the
/// in-memory map used at this scope can later be swapped for a persistent
/// store without touching the generation job. There is exactly one writer
/// per lecture id for its lifetime; `update` is last-write-wins.
#[async_trait]
pub trait LectureStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Option<Lecture>;
    async fn insert(&self, lecture: Lecture) -> PortResult<()>;
    async fn update(&self, lecture: Lecture) -> PortResult<()>;
    async fn contains(&self, id: Uuid) -> bool;
}
