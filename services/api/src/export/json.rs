//! services/api/src/export/json.rs
//!
//! The JSON export: a pretty-printed canonical dump of the lecture payload,
//! used both as an export format and as a debugging artifact.

use serde_json::Value;

use crate::error::ApiError;

/// Pretty-prints the payload exactly as received; parsing the artifact back
/// yields a value deep-equal to the input.
pub fn render_json(payload: &Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(payload)
        .map_err(|e| ApiError::Export(format!("could not serialize lecture: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduvisual_core::domain::{Lecture, SourceFileType, Topic};

    #[test]
    fn round_trips_arbitrary_payloads() {
        let payload = serde_json::json!({
            "title": "T",
            "sections": [{"title": "S", "questions": []}],
            "nested": {"deep": [1, 2, 3]}
        });
        let artifact = render_json(&payload).unwrap();
        let back: Value = serde_json::from_str(&artifact).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn round_trips_a_full_lecture() {
        let lecture = Lecture::new(
            "Genetics".to_string(),
            "genetics.pdf".to_string(),
            SourceFileType::Pdf,
            "DNA. RNA.".to_string(),
            vec![Topic { title: "DNA".to_string(), subtopics: vec!["bases".to_string()] }],
        );
        let value = serde_json::to_value(&lecture).unwrap();
        let artifact = render_json(&value).unwrap();
        let back: Lecture = serde_json::from_str(&artifact).unwrap();
        assert_eq!(back, lecture);
    }
}
