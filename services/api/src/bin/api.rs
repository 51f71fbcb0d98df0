//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        GeminiEnhancerAdapter, GeminiQuestionAdapter, InMemoryLectureStore, MockQuestionAdapter,
        PlaceholderVisualAdapter, UnsplashVisualAdapter,
    },
    config::Config,
    error::ApiError,
    web::{
        ai_status_handler, create_text_lecture_handler, enhance_handler, export_lecture_handler,
        generate_questions_handler, generate_section_questions_handler, get_lecture_handler,
        lecture_status_handler, rest::ApiDoc, state::AppState, suggest_visuals_handler,
        upload_lecture_handler, visual_status_handler,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use eduvisual_core::ports::{
    ContentEnhancementService, QuestionGenerationService, VisualSuggestionService,
};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    // Both provider keys are optional; without them the service runs on its
    // deterministic fallbacks so the rest of the pipeline stays usable.
    let (enhancer, questions): (
        Option<Arc<dyn ContentEnhancementService>>,
        Arc<dyn QuestionGenerationService>,
    ) = match config.gemini_api_key.as_ref() {
        Some(key) => {
            let gemini_config = OpenAIConfig::new()
                .with_api_key(key)
                .with_api_base(&config.gemini_api_base);
            let gemini_client = Client::with_config(gemini_config);
            (
                Some(Arc::new(GeminiEnhancerAdapter::new(
                    gemini_client.clone(),
                    config.enhancer_model.clone(),
                ))),
                Arc::new(GeminiQuestionAdapter::new(
                    gemini_client,
                    config.question_model.clone(),
                )),
            )
        }
        None => {
            info!("GEMINI_API_KEY not set: content enhancement disabled, questions use the mock batch");
            (None, Arc::new(MockQuestionAdapter))
        }
    };

    let visuals: Arc<dyn VisualSuggestionService> = match config.unsplash_api_key.as_ref() {
        Some(key) => Arc::new(UnsplashVisualAdapter::new(
            reqwest::Client::new(),
            config.unsplash_api_base.clone(),
            key.clone(),
        )),
        None => {
            info!("UNSPLASH_API_KEY not set: visual suggestions use placeholder images");
            Arc::new(PlaceholderVisualAdapter)
        }
    };

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        store: Arc::new(InMemoryLectureStore::new()),
        enhancer,
        questions,
        visuals,
    });

    // --- 4. Create the Web Router ---
    let api_router = Router::new()
        .route("/api/lectures/text", post(create_text_lecture_handler))
        .route("/api/lectures/upload", post(upload_lecture_handler))
        .route("/api/lectures/{id}/status", get(lecture_status_handler))
        .route("/api/lectures/{id}", get(get_lecture_handler))
        .route("/api/lectures/enhance", post(enhance_handler))
        .route("/api/lectures/suggest-visuals", post(suggest_visuals_handler))
        .route("/api/lectures/generate-questions", post(generate_questions_handler))
        .route(
            "/api/lectures/generate-questions-sections",
            post(generate_section_questions_handler),
        )
        .route("/api/lectures/export/{format}", post(export_lecture_handler))
        .route("/api/ai-status", get(ai_status_handler))
        .route("/api/visual-status", get(visual_status_handler))
        // Leave headroom above the document cap for multipart framing; the
        // upload handler enforces the exact byte limit itself.
        .layer(DefaultBodyLimit::max(config.max_upload_bytes + 1024 * 1024))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
