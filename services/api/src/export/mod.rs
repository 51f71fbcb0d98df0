//! services/api/src/export/mod.rs
//!
//! The export renderers: three independent pure transforms of a composed
//! lecture into a slide deck, an HTML document, or a canonical JSON dump.
//! Each renderer builds its artifact fully in memory and returns it whole;
//! nothing is ever partially written on failure.

pub mod html;
pub mod json;
pub mod slide_deck;

use serde::Deserialize;

use eduvisual_core::domain::Question;

pub use html::render_html_document;
pub use json::render_json;
pub use slide_deck::render_slide_deck;

/// The lecture-shaped payload the renderers accept. Deserialization is
/// lenient: every field is optional and a serialized `Lecture` maps onto it
/// directly (`slides`/`description` are aliases for `sections`/`content`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportPayload {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(default, alias = "slides")]
    pub sections: Vec<ExportSection>,
}

/// One exportable section: a title, body text and optional questions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportSection {
    pub title: Option<String>,
    #[serde(alias = "description")]
    pub content: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduvisual_core::domain::{Lecture, SourceFileType, Topic};

    #[test]
    fn a_serialized_lecture_deserializes_as_a_payload() {
        let lecture = Lecture::new(
            "Cells".to_string(),
            "cells.txt".to_string(),
            SourceFileType::Text,
            "Cell walls. Membranes.".to_string(),
            vec![Topic { title: "Walls".to_string(), subtopics: vec![] }],
        );

        let value = serde_json::to_value(&lecture).unwrap();
        let payload: ExportPayload = serde_json::from_value(value).unwrap();
        assert_eq!(payload.title.as_deref(), Some("Cells"));
        // A freshly accepted lecture has no slides yet.
        assert!(payload.sections.is_empty());
    }

    #[test]
    fn sections_accept_the_slide_field_names() {
        let raw = r#"{
            "title": "T",
            "slides": [{"title": "S1", "description": "Body text"}]
        }"#;
        let payload: ExportPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.sections.len(), 1);
        assert_eq!(payload.sections[0].content.as_deref(), Some("Body text"));
    }
}
