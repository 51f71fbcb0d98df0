//! services/api/src/adapters/enhancer_llm.rs
//!
//! This module contains the adapter for the content-enhancement LLM.
//! It implements the `ContentEnhancementService` port from the `core` crate.

const ENHANCEMENT_PROMPT: &str = r#"You are an expert educational content enhancer. Your task is to analyze lecture content and enhance it for better student comprehension.

For the given lecture content, you must:

1. **Summarize**: Break down the content into clear, digestible sections with concise summaries
2. **Clarify**: Add brief explanations for complex concepts, technical terms, or difficult ideas
3. **Suggest Visuals**: Identify where diagrams, charts, images, or infographics would help understanding
4. **Suggest Activities**: Recommend where interactive elements (quizzes, exercises, simulations) should be placed

Return your response in the following JSON format:
{
  "summary": "A brief overall summary of the lecture content (2-3 sentences)",
  "sections": [
    {
      "title": "Section title",
      "content": "Original content for this section",
      "summary": "Concise summary of this section",
      "clarifications": [
        { "term": "Complex term or concept", "explanation": "Simple, clear explanation" }
      ],
      "visualSuggestions": [
        { "type": "diagram|chart|image|infographic", "description": "What the visual should show", "placement": "before|after|inline", "reason": "Why this visual would help" }
      ],
      "activitySuggestions": [
        { "type": "quiz|exercise|simulation|discussion", "description": "What the activity should involve", "placement": "before|after|inline", "reason": "Why this activity would help" }
      ]
    }
  ],
  "overallSuggestions": {
    "keyTakeaways": ["Key point 1", "Key point 2", "..."],
    "recommendedVisuals": ["Overall visual recommendation 1", "..."],
    "recommendedActivities": ["Overall activity recommendation 1", "..."]
  }
}

Be specific, practical, and focused on enhancing student learning outcomes."#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use eduvisual_core::{
    domain::EnhancementResult,
    ports::{ContentEnhancementService, PortError, PortResult},
};

use crate::adapters::response::parse_structured_response;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `ContentEnhancementService` using the Gemini
/// API through its OpenAI-compatible endpoint.
///
/// This port deliberately has no mock fallback: a provider failure surfaces
/// as a `PortError`, and callers store the slide without enhanced content.
#[derive(Clone)]
pub struct GeminiEnhancerAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GeminiEnhancerAdapter {
    /// Creates a new `GeminiEnhancerAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `ContentEnhancementService` Trait Implementation
//=========================================================================================

#[async_trait]
impl ContentEnhancementService for GeminiEnhancerAdapter {
    /// Enhances one topic's content into summaries, clarifications and
    /// visual/activity suggestions.
    async fn enhance(&self, content: &str, topic: &str) -> PortResult<EnhancementResult> {
        let user_input = format!(
            "Topic: {}\n\n{}\n\nLecture Content:\n{}",
            topic, ENHANCEMENT_PROMPT, content
        );

        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(user_input)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Upstream(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        let raw = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::MalformedResponse(
                    "Enhancement LLM response contained no text content.".to_string(),
                )
            })?;

        parse_structured_response::<EnhancementResult>(&raw)
    }
}
