//! crates/eduvisual_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage backend or transport; serde
//! derives exist because the same shapes cross the HTTP boundary verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A single heading detected in the source document, with the lines judged
/// to be nested under it. Produced once by the outline extractor and
/// immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub subtopics: Vec<String>,
}

/// Lifecycle state of a lecture's background generation job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Terminal states admit no further transition.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// The accepted source document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFileType {
    Pdf,
    Text,
}

/// A quiz question, tagged by its shape on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Question {
    Reflective {
        id: u32,
        question: String,
        correct_answer: String,
        explanation: String,
    },
    TrueFalse {
        id: u32,
        question: String,
        correct_answer: String,
        explanation: String,
    },
    MultipleChoice {
        id: u32,
        question: String,
        /// Keyed by a single letter, `a` through `d`. A BTreeMap keeps the
        /// option order stable on the wire.
        options: BTreeMap<String, String>,
        correct_answer: String,
        explanation: String,
    },
}

impl Question {
    pub fn id(&self) -> u32 {
        match self {
            Question::Reflective { id, .. }
            | Question::TrueFalse { id, .. }
            | Question::MultipleChoice { id, .. } => *id,
        }
    }

    pub fn question(&self) -> &str {
        match self {
            Question::Reflective { question, .. }
            | Question::TrueFalse { question, .. }
            | Question::MultipleChoice { question, .. } => question,
        }
    }
}

/// Whether an image candidate came from the live search provider or from
/// the deterministic placeholder fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageProvenance {
    Live,
    Placeholder,
}

/// One illustrative photo sourced for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCandidate {
    pub id: String,
    pub url: String,
    pub thumb_url: String,
    pub description: String,
    pub photographer: String,
    pub photographer_url: String,
    pub source_url: String,
    pub provenance: ImageProvenance,
}

/// A short explanation attached to a difficult term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clarification {
    pub term: String,
    pub explanation: String,
}

/// A suggestion for a visual or an activity, with where to place it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementSuggestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub placement: String,
    pub reason: String,
}

/// One enhanced section of the lecture content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedSection {
    pub title: String,
    pub content: String,
    pub summary: String,
    #[serde(default)]
    pub clarifications: Vec<Clarification>,
    #[serde(default)]
    pub visual_suggestions: Vec<PlacementSuggestion>,
    #[serde(default)]
    pub activity_suggestions: Vec<PlacementSuggestion>,
}

/// Lecture-wide recommendations produced alongside the per-section output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSuggestions {
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    #[serde(default)]
    pub recommended_visuals: Vec<String>,
    #[serde(default)]
    pub recommended_activities: Vec<String>,
}

/// The structured result of a content-enhancement call: an overall summary,
/// enhanced sections, and lecture-wide suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancementResult {
    pub summary: String,
    #[serde(default)]
    pub sections: Vec<EnhancedSection>,
    #[serde(default)]
    pub overall_suggestions: OverallSuggestions,
}

/// One slide of the composed lecture, produced per topic in topic order.
/// Mutated only by the background job that owns the lecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    pub id: String,
    pub title: String,
    pub description: String,
    pub enhanced_content: Option<EnhancementResult>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub visuals: Vec<ImageCandidate>,
    #[serde(default)]
    pub subtopics: Vec<String>,
    pub selected_image: Option<ImageCandidate>,
    pub selected_flowchart: Option<ImageCandidate>,
}

impl Slide {
    /// Positional slide id, stable within one lecture.
    pub fn positional_id(index: usize) -> String {
        format!("slide-{}", index + 1)
    }
}

/// An uploaded lecture together with everything derived from it.
///
/// Invariants, maintained by the generation job:
/// - `progress` is non-decreasing while `status` is `Processing`;
/// - `slides.len()` grows toward `topics.len()` while processing;
/// - `Completed` implies `slides.len() == topics.len()` and `progress == 100`;
/// - `Failed` implies `error` is set; terminal states are never mutated again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: Uuid,
    pub title: String,
    pub file_name: String,
    pub file_type: SourceFileType,
    pub content: String,
    pub topics: Vec<Topic>,
    pub status: JobStatus,
    pub progress: u8,
    pub slides: Vec<Slide>,
    pub created_at: DateTime<Utc>,
    pub error: Option<String>,
}

impl Lecture {
    /// Creates a freshly accepted lecture in the `Pending` state.
    pub fn new(
        title: String,
        file_name: String,
        file_type: SourceFileType,
        content: String,
        topics: Vec<Topic>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            file_name,
            file_type,
            content,
            topics,
            status: JobStatus::Pending,
            progress: 0,
            slides: Vec::new(),
            created_at: Utc::now(),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_wire_shape_is_flat_and_tagged() {
        let q = Question::MultipleChoice {
            id: 3,
            question: "Which layer owns the domain types?".to_string(),
            options: BTreeMap::from([
                ("a".to_string(), "core".to_string()),
                ("b".to_string(), "api".to_string()),
                ("c".to_string(), "frontend".to_string()),
                ("d".to_string(), "database".to_string()),
            ]),
            correct_answer: "a".to_string(),
            explanation: "Domain structs live in the core crate.".to_string(),
        };

        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "multiple-choice");
        assert_eq!(value["id"], 3);
        assert_eq!(value["correctAnswer"], "a");
        assert_eq!(value["options"]["d"], "database");

        let back: Question = serde_json::from_value(value).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn lecture_starts_pending_with_no_slides() {
        let lecture = Lecture::new(
            "Photosynthesis".to_string(),
            "photosynthesis.txt".to_string(),
            SourceFileType::Text,
            "Light reactions. Dark reactions.".to_string(),
            vec![Topic { title: "Light reactions".to_string(), subtopics: vec![] }],
        );
        assert_eq!(lecture.status, JobStatus::Pending);
        assert_eq!(lecture.progress, 0);
        assert!(lecture.slides.is_empty());
        assert!(lecture.error.is_none());
        assert!(!lecture.status.is_terminal());
    }

    #[test]
    fn enhancement_result_tolerates_missing_optional_lists() {
        let raw = r#"{
            "summary": "A short overview.",
            "sections": [{"title": "Intro", "content": "Body", "summary": "S"}]
        }"#;
        let parsed: EnhancementResult = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.sections.len(), 1);
        assert!(parsed.sections[0].clarifications.is_empty());
        assert!(parsed.overall_suggestions.key_takeaways.is_empty());
    }
}
