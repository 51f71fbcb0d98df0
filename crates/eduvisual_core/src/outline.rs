//! crates/eduvisual_core/src/outline.rs
//!
//! The heuristic outline extractor: raw document text in, ordered topics out.
//! Line-oriented, single pass, deterministic, and total — it never fails and
//! never drops content.

use crate::domain::Topic;

const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];

/// Splits raw document text into an ordered list of topics.
///
/// A line opens a new topic when it carries a leading enumeration marker
/// (`1. ` / `1) `) or ends with a colon. Indented or bulleted lines nest
/// under the current topic. Any other non-blank line nests too, except that
/// the very first one (no topic open yet) opens the initial topic, so a
/// document with no heading lines at all still yields exactly one topic.
/// Empty or whitespace-only input yields an empty list.
pub fn extract_topics(text: &str) -> Vec<Topic> {
    let mut topics: Vec<Topic> = Vec::new();
    let mut current: Option<Topic> = None;

    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }

        if has_enumeration_marker(line) || line.trim_end().ends_with(':') {
            if let Some(done) = current.take() {
                topics.push(done);
            }
            current = Some(Topic {
                title: clean_line(line),
                subtopics: Vec::new(),
            });
            continue;
        }

        match current.as_mut() {
            Some(topic) => topic.subtopics.push(clean_line(line)),
            // Fallback opener: the first non-blank line of a document with no
            // heading markers (this also catches ALL-CAPS banner lines).
            None => {
                current = Some(Topic {
                    title: clean_line(line),
                    subtopics: Vec::new(),
                })
            }
        }
    }

    if let Some(done) = current.take() {
        topics.push(done);
    }

    topics
}

/// True for `"<digits>. "` and `"<digits>) "` prefixes.
fn has_enumeration_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return false;
    }
    let rest = &trimmed[digits..];
    rest.starts_with(". ") || rest.starts_with(") ")
}

/// Strips enumeration markers, bullet markers and a trailing colon, then trims.
fn clean_line(line: &str) -> String {
    let mut text = line.trim();

    if has_enumeration_marker(text) {
        let digits = text.chars().take_while(|c| c.is_ascii_digit()).count();
        text = text[digits + 1..].trim_start();
    }

    if let Some(stripped) = text.strip_prefix("- ") {
        text = stripped;
    } else if let Some(first) = text.chars().next() {
        if BULLET_MARKERS.contains(&first) {
            text = text[first.len_utf8()..].trim_start();
        }
    }

    text.trim_end_matches(':').trim().to_string()
}

/// Derives a human-readable lecture title from an uploaded file name:
/// extension off, separators to spaces.
pub fn derive_title(file_name: &str) -> String {
    let stem = match file_name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => file_name,
    };
    let title = stem
        .chars()
        .map(|c| if c == '_' || c == '-' { ' ' } else { c })
        .collect::<String>();
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    if title.is_empty() {
        "Untitled Lecture".to_string()
    } else {
        title
    }
}

/// A cheap extractive summary: the first two sentences, capped at 300 chars.
pub fn brief_summary(content: &str) -> String {
    let sentences: Vec<&str> = content
        .split(|c: char| c == '.' || c == '?' || c == '!')
        .filter(|s| !s.trim().is_empty())
        .take(2)
        .collect();

    let mut summary = sentences
        .iter()
        .map(|s| format!("{}.", s.trim()))
        .collect::<Vec<_>>()
        .join(" ");

    if summary.len() > 300 {
        let mut cut = 297;
        while !summary.is_char_boundary(cut) {
            cut -= 1;
        }
        summary.truncate(cut);
        summary.push_str("...");
    }
    summary
}
