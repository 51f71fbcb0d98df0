//! services/api/src/adapters/question_llm.rs
//!
//! This module contains the adapter for the question-generation LLM and the
//! deterministic mock batch both fallback paths share. It implements the
//! `QuestionGenerationService` port from the `core` crate.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tracing::warn;

use eduvisual_core::{
    domain::Question,
    ports::{PortError, PortResult, Provenance, QuestionBatch, QuestionGenerationService},
};

use crate::adapters::response::parse_structured_response;

//=========================================================================================
// Deterministic Mock Batch
//=========================================================================================

/// The fixed-shape fallback question set: exactly `min(count, 3)` questions,
/// ids sequential from 1, deterministic for a given `(topic, count)`.
pub fn mock_question_batch(topic: &str, count: usize) -> QuestionBatch {
    let all = [
        Question::Reflective {
            id: 1,
            question: format!("What are the main concepts discussed in this {} content?", topic),
            correct_answer: "Students should identify and explain the key concepts from the content"
                .to_string(),
            explanation: "Reflective questions encourage critical thinking and personal understanding."
                .to_string(),
        },
        Question::TrueFalse {
            id: 2,
            question: format!("The content about {} covers multiple important aspects.", topic),
            correct_answer: "true".to_string(),
            explanation: "This is generally true for comprehensive lecture content.".to_string(),
        },
        Question::MultipleChoice {
            id: 3,
            question: format!(
                "Which of the following best describes the primary focus of this {} lesson?",
                topic
            ),
            options: BTreeMap::from([
                ("a".to_string(), "Understanding fundamental concepts".to_string()),
                ("b".to_string(), "Memorizing definitions".to_string()),
                ("c".to_string(), "Practical application".to_string()),
                ("d".to_string(), "Historical context".to_string()),
            ]),
            correct_answer: "a".to_string(),
            explanation: "Educational content typically focuses on understanding core concepts first."
                .to_string(),
        },
    ];

    QuestionBatch {
        questions: all.into_iter().take(count).collect(),
        provenance: Provenance::Mock,
    }
}

//=========================================================================================
// Mock Adapter (used when no API key is configured)
//=========================================================================================

/// A `QuestionGenerationService` that always answers with the mock batch.
pub struct MockQuestionAdapter;

#[async_trait]
impl QuestionGenerationService for MockQuestionAdapter {
    async fn generate(
        &self,
        _content: &str,
        topic: &str,
        count: usize,
    ) -> PortResult<QuestionBatch> {
        Ok(mock_question_batch(topic, count))
    }
}

//=========================================================================================
// The Live Adapter Struct
//=========================================================================================

/// An adapter that implements `QuestionGenerationService` using the Gemini
/// API through its OpenAI-compatible endpoint. Upstream or parse failures
/// degrade to the mock batch instead of propagating.
#[derive(Clone)]
pub struct GeminiQuestionAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiQuestionAdapter {
    /// Creates a new `GeminiQuestionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }

    fn build_prompt(content: &str, topic: &str, count: usize) -> String {
        format!(
            r#"You are an expert educational content creator. Generate exactly {count} educational questions based on the following content.

For each question, include:
1. A question
2. The type (one of: "reflective", "true-false", "multiple-choice")
3. For multiple-choice: provide 4 options (a, b, c, d)
4. The correct answer
5. An explanation

Content:
{content}

Topic: {topic}

Return ONLY a valid JSON array with this structure:
[
  {{
    "id": 1,
    "type": "reflective",
    "question": "...",
    "correctAnswer": "...",
    "explanation": "..."
  }},
  {{
    "id": 2,
    "type": "true-false",
    "question": "...",
    "correctAnswer": "true" or "false",
    "explanation": "..."
  }},
  {{
    "id": 3,
    "type": "multiple-choice",
    "question": "...",
    "options": {{
      "a": "...",
      "b": "...",
      "c": "...",
      "d": "..."
    }},
    "correctAnswer": "a",
    "explanation": "..."
  }}
]

Return ONLY the JSON array, no markdown or extra text."#
        )
    }

    async fn generate_live(
        &self,
        content: &str,
        topic: &str,
        count: usize,
    ) -> PortResult<Vec<Question>> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(Self::build_prompt(content, topic, count))
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        let raw = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::MalformedResponse(
                    "Question LLM response contained no text content.".to_string(),
                )
            })?;

        parse_structured_response::<Vec<Question>>(&raw)
    }
}

//=========================================================================================
// `QuestionGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuestionGenerationService for GeminiQuestionAdapter {
    /// Generates quiz questions, falling back to the deterministic mock
    /// batch if the provider fails or returns something unparsable.
    async fn generate(
        &self,
        content: &str,
        topic: &str,
        count: usize,
    ) -> PortResult<QuestionBatch> {
        match self.generate_live(content, topic, count).await {
            Ok(questions) => Ok(QuestionBatch {
                questions,
                provenance: Provenance::Live,
            }),
            Err(e) => {
                warn!("question generation failed, using mock batch: {}", e);
                Ok(mock_question_batch(topic, count))
            }
        }
    }
}
