//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use crate::config::Config;
use eduvisual_core::ports::{
    ContentEnhancementService, LectureStore, QuestionGenerationService, VisualSuggestionService,
};

/// The shared application state, created once at startup and passed to all
/// handlers and to every background generation task.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn LectureStore>,
    /// Absent when no generative-text key is configured; slides then carry
    /// their plain description without enhanced content.
    pub enhancer: Option<Arc<dyn ContentEnhancementService>>,
    pub questions: Arc<dyn QuestionGenerationService>,
    pub visuals: Arc<dyn VisualSuggestionService>,
}
