pub mod domain;
pub mod outline;
pub mod ports;
pub mod progress;

pub use domain::{
    Clarification, EnhancedSection, EnhancementResult, ImageCandidate, ImageProvenance,
    JobStatus, Lecture, OverallSuggestions, PlacementSuggestion, Question, Slide,
    SourceFileType, Topic,
};
pub use outline::{brief_summary, derive_title, extract_topics};
pub use ports::{
    ContentEnhancementService, LectureStore, PortError, PortResult, Provenance,
    QuestionBatch, QuestionGenerationService, TopicVisuals, VisualSuggestionService,
};
pub use progress::{compute_progress, GENERATION_SUB_STEPS};
