//! services/api/src/export/html.rs
//!
//! Renders a lecture into a single self-contained HTML document: a title
//! page followed by one page per section with inline questions, answers and
//! explanations. The caller converts it to PDF client-side; this transform
//! only produces the document string.
//!
//! Content is trusted internal data and is injected verbatim; the renderer's
//! only obligation is to never fail on missing optional fields.

use eduvisual_core::domain::Question;

use super::ExportPayload;
use crate::error::ApiError;

const DOCUMENT_CSS: &str = r#"    * { margin: 0; padding: 0; box-sizing: border-box; }
    body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; }
    .page { page-break-after: always; padding: 40px; }
    .title-page { background: linear-gradient(135deg, #3B82F6 0%, #1E40AF 100%); color: white; display: flex; flex-direction: column; justify-content: center; align-items: center; min-height: 100vh; }
    .title-page h1 { font-size: 48px; margin-bottom: 20px; }
    .title-page p { font-size: 24px; opacity: 0.9; }
    h1 { color: #1F2937; font-size: 36px; margin-bottom: 20px; border-bottom: 3px solid #3B82F6; padding-bottom: 10px; }
    h2 { color: #374151; font-size: 28px; margin-top: 30px; margin-bottom: 15px; }
    h3 { color: #4B5563; font-size: 20px; margin-top: 20px; margin-bottom: 10px; }
    p { margin-bottom: 15px; text-align: justify; }
    .section { margin-bottom: 40px; }
    .question { background: #F3F4F6; padding: 15px; margin: 15px 0; border-left: 4px solid #3B82F6; }
    .question-text { font-weight: bold; margin-bottom: 10px; }
    .options { margin-left: 20px; }
    .option { margin: 5px 0; }
    .answer { color: #059669; font-weight: bold; margin-top: 10px; }
    .explanation { color: #6B7280; font-size: 14px; margin-top: 10px; font-style: italic; }
    img { max-width: 100%; height: auto; margin: 20px 0; }"#;

/// Renders the complete HTML document. Total: every optional field simply
/// collapses to nothing.
pub fn render_html_document(payload: &ExportPayload) -> Result<String, ApiError> {
    let title = payload.title.as_deref().unwrap_or("Lecture");

    let mut html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
{DOCUMENT_CSS}
  </style>
</head>
<body>
  <div class="page title-page">
    <h1>{title}</h1>
"#
    );
    if let Some(subtitle) = payload.subtitle.as_deref() {
        html.push_str(&format!("    <p>{subtitle}</p>\n"));
    }
    html.push_str("  </div>\n");

    for section in &payload.sections {
        let section_title = section.title.as_deref().unwrap_or("Section");
        html.push_str(&format!(
            "  <div class=\"page\">\n    <div class=\"section\">\n      <h1>{section_title}</h1>\n"
        ));
        if let Some(content) = section.content.as_deref() {
            html.push_str(&format!("      <p>{content}</p>\n"));
        }

        if !section.questions.is_empty() {
            html.push_str("      <h2>Questions</h2>\n");
            for question in &section.questions {
                html.push_str(&render_question(question));
            }
        }

        html.push_str("    </div>\n  </div>\n");
    }

    html.push_str("</body></html>");
    Ok(html)
}

fn render_question(question: &Question) -> String {
    let mut block = format!(
        "      <div class=\"question\">\n        <div class=\"question-text\">{}</div>\n",
        question.question()
    );

    let (correct_answer, explanation) = match question {
        Question::Reflective { correct_answer, explanation, .. }
        | Question::TrueFalse { correct_answer, explanation, .. }
        | Question::MultipleChoice { correct_answer, explanation, .. } => {
            (correct_answer, explanation)
        }
    };

    if let Question::MultipleChoice { options, .. } = question {
        block.push_str("        <div class=\"options\">\n");
        for (key, value) in options {
            block.push_str(&format!(
                "          <div class=\"option\">{key}) {value}</div>\n"
            ));
        }
        block.push_str("        </div>\n");
    }

    if !correct_answer.is_empty() {
        block.push_str(&format!(
            "        <div class=\"answer\">Answer: {correct_answer}</div>\n"
        ));
    }
    if !explanation.is_empty() {
        block.push_str(&format!(
            "        <div class=\"explanation\">{explanation}</div>\n"
        ));
    }

    block.push_str("      </div>\n");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::ExportSection;
    use std::collections::BTreeMap;

    #[test]
    fn empty_payload_still_renders_a_document() {
        let html = render_html_document(&ExportPayload::default()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Lecture</h1>"));
        assert!(html.ends_with("</body></html>"));
    }

    #[test]
    fn sections_and_questions_are_inlined() {
        let payload = ExportPayload {
            title: Some("Biology 101".to_string()),
            subtitle: Some("Week 3".to_string()),
            sections: vec![ExportSection {
                title: Some("Cells".to_string()),
                content: Some("The cell is the basic unit of life.".to_string()),
                questions: vec![Question::MultipleChoice {
                    id: 1,
                    question: "What bounds a cell?".to_string(),
                    options: BTreeMap::from([
                        ("a".to_string(), "A membrane".to_string()),
                        ("b".to_string(), "A shell".to_string()),
                    ]),
                    correct_answer: "a".to_string(),
                    explanation: "The plasma membrane bounds every cell.".to_string(),
                }],
            }],
        };

        let html = render_html_document(&payload).unwrap();
        assert!(html.contains("<h1>Biology 101</h1>"));
        assert!(html.contains("<p>Week 3</p>"));
        assert!(html.contains("<h2>Questions</h2>"));
        assert!(html.contains("a) A membrane"));
        assert!(html.contains("Answer: a"));
        assert!(html.contains("The plasma membrane bounds every cell."));
    }

    #[test]
    fn missing_optional_fields_never_fail() {
        let payload = ExportPayload {
            title: None,
            subtitle: None,
            sections: vec![ExportSection::default()],
        };
        let html = render_html_document(&payload).unwrap();
        assert!(html.contains("<h1>Section</h1>"));
        assert!(!html.contains("<h2>Questions</h2>"));
    }
}
