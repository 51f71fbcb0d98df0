pub mod enhancer_llm;
pub mod pdf;
pub mod question_llm;
pub mod response;
pub mod store;
pub mod visual_search;

pub use enhancer_llm::GeminiEnhancerAdapter;
pub use question_llm::{GeminiQuestionAdapter, MockQuestionAdapter};
pub use store::InMemoryLectureStore;
pub use visual_search::{PlaceholderVisualAdapter, UnsplashVisualAdapter};
