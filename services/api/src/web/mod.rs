pub mod job;
pub mod rest;
pub mod state;

// Re-export the handlers the binary needs to build the router.
pub use rest::{
    ai_status_handler, create_text_lecture_handler, enhance_handler, export_lecture_handler,
    generate_questions_handler, generate_section_questions_handler, get_lecture_handler,
    lecture_status_handler, suggest_visuals_handler, upload_lecture_handler,
    visual_status_handler,
};
