//! services/api/src/adapters/response.rs
//!
//! The single place where raw generative-text output is turned into
//! structured data. Providers frequently wrap their JSON in a markdown code
//! fence; every LLM adapter routes its response text through here instead of
//! stripping fences at its own call site.

use eduvisual_core::ports::{PortError, PortResult};
use serde::de::DeserializeOwned;

/// Parses a provider's raw text response as JSON, tolerating a leading and
/// trailing markdown fence (```` ``` ```` or ```` ```json ````). A response
/// that still fails to parse is a gateway failure, never a crash.
pub fn parse_structured_response<T: DeserializeOwned>(raw: &str) -> PortResult<T> {
    let stripped = strip_code_fence(raw.trim());
    serde_json::from_str(stripped)
        .map_err(|e| PortError::MalformedResponse(format!("invalid JSON from provider: {}", e)))
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string ("json", "JSON", ...) up to the first newline.
    let body = match rest.split_once('\n') {
        Some((_info, body)) => body,
        None => rest,
    };
    body.trim_end().trim_end_matches("```").trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn parses_unfenced_json() {
        let v: Value = parse_structured_response(r#"{"a": 1}"#).unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn parses_plain_fenced_json() {
        let raw = "```\n{\"a\": 1}\n```";
        let v: Value = parse_structured_response(raw).unwrap();
        assert_eq!(v["a"], 1);
    }

    #[test]
    fn parses_json_fenced_with_language_tag() {
        let raw = "```json\n[{\"id\": 1}, {\"id\": 2}]\n```";
        let v: Vec<Value> = parse_structured_response(raw).unwrap();
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let raw = "  \n```json\n{\"ok\": true}\n```\n  ";
        let v: Value = parse_structured_response(raw).unwrap();
        assert_eq!(v["ok"], true);
    }

    #[test]
    fn malformed_payload_is_a_gateway_failure() {
        let err = parse_structured_response::<Value>("```json\nnot json at all\n```").unwrap_err();
        assert!(matches!(err, PortError::MalformedResponse(_)));
    }
}
