//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use eduvisual_core::{
    domain::{Lecture, SourceFileType},
    outline::{brief_summary, derive_title, extract_topics},
    ports::Provenance,
};

use crate::adapters::pdf::extract_pdf_text;
use crate::error::ApiError;
use crate::export::{render_html_document, render_json, render_slide_deck, ExportPayload};
use crate::web::{job::spawn_generation, state::AppState};

/// Documents shorter than this are rejected before any processing.
const MIN_CONTENT_CHARS: usize = 10;

/// Default question count for the ad hoc generation endpoint.
const DEFAULT_QUESTION_COUNT: usize = 3;
const DEFAULT_QUESTIONS_PER_SECTION: usize = 2;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(ai_status_handler, visual_status_handler),
    components(schemas(ProviderStatus)),
    tags(
        (name = "EduVisual API", description = "API endpoints for lecture upload, enhancement and export.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Request and Response Structs
//=========================================================================================

#[derive(Deserialize)]
pub struct TextLectureRequest {
    content: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
pub struct EnhanceRequest {
    content: Option<String>,
    topic: Option<String>,
}

#[derive(Deserialize)]
pub struct SuggestVisualsRequest {
    topics: Option<Vec<String>>,
}

#[derive(Deserialize)]
pub struct GenerateQuestionsRequest {
    content: Option<String>,
    topic: Option<String>,
    count: Option<usize>,
}

#[derive(Deserialize)]
pub struct SectionInput {
    title: Option<String>,
    content: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionQuestionsRequest {
    sections: Option<Vec<SectionInput>>,
    questions_per_section: Option<usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    lecture_data: Option<Value>,
    filename: Option<String>,
}

/// Configuration status of an external provider.
#[derive(Serialize, ToSchema)]
pub struct ProviderStatus {
    configured: bool,
    provider: &'static str,
    message: &'static str,
}

//=========================================================================================
// Helpers
//=========================================================================================

fn require_content(content: &Option<String>) -> Result<String, ApiError> {
    let content = content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::Validation("Content is required".to_string()))?;
    Ok(content.to_string())
}

fn require_lecture_content(content: &Option<String>) -> Result<String, ApiError> {
    let content = require_content(content)?;
    if content.chars().count() < MIN_CONTENT_CHARS {
        return Err(ApiError::Validation(format!(
            "Content must be at least {} characters",
            MIN_CONTENT_CHARS
        )));
    }
    Ok(content)
}

fn question_provider(provenance: Provenance) -> &'static str {
    match provenance {
        Provenance::Live => "gemini",
        Provenance::Mock => "mock",
    }
}

fn enhancement_metadata(content: &str, topic: &str) -> Value {
    json!({
        "originalLength": content.len(),
        "processedAt": Utc::now().to_rfc3339(),
        "topic": topic,
    })
}

//=========================================================================================
// Lecture Lifecycle Handlers
//=========================================================================================

/// Accepts raw pasted text and returns its extracted outline without
/// starting a generation job.
pub async fn create_text_lecture_handler(
    Json(request): Json<TextLectureRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = require_lecture_content(&request.content)?;

    let topics = extract_topics(&content);
    let title = request
        .title
        .filter(|t| !t.trim().is_empty())
        .or_else(|| topics.first().map(|t| t.title.clone()))
        .unwrap_or_else(|| "Untitled Lecture".to_string());

    Ok(Json(json!({
        "success": true,
        "data": {
            "title": title,
            "topics": topics,
            "summary": brief_summary(&content),
        }
    })))
}

/// Accepts a PDF or plain-text upload, stores the lecture and schedules the
/// background generation job, returning immediately with the lecture id.
pub async fn upload_lecture_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let mut upload: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart request: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("untitled.txt").to_string();
        let content_type = field.content_type().map(|ct| ct.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(format!("Failed to read file: {}", e)))?;
        upload = Some((file_name, content_type, data.to_vec()));
        break;
    }

    let (file_name, content_type, data) = upload
        .ok_or_else(|| ApiError::Validation("Multipart form must include a file".to_string()))?;

    if data.len() > app_state.config.max_upload_bytes {
        return Err(ApiError::Validation(format!(
            "File exceeds the maximum size of {} bytes",
            app_state.config.max_upload_bytes
        )));
    }

    let file_type = detect_file_type(&file_name, content_type.as_deref())?;
    let content = match file_type {
        SourceFileType::Pdf => extract_pdf_text(&data)?,
        SourceFileType::Text => String::from_utf8(data).map_err(|e| {
            ApiError::Parsing(format!("Uploaded file is not valid UTF-8 text: {}", e))
        })?,
    };

    if content.trim().chars().count() < MIN_CONTENT_CHARS {
        return Err(ApiError::Validation(format!(
            "Document must contain at least {} characters of text",
            MIN_CONTENT_CHARS
        )));
    }

    let topics = extract_topics(&content);
    let title = derive_title(&file_name);
    let summary = brief_summary(&content);

    let lecture = Lecture::new(title.clone(), file_name, file_type, content, topics.clone());
    let lecture_id = lecture.id;
    app_state.store.insert(lecture).await?;
    spawn_generation(app_state.clone(), lecture_id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": {
                "id": lecture_id,
                "title": title,
                "topics": topics,
                "summary": summary,
            }
        })),
    ))
}

fn detect_file_type(file_name: &str, content_type: Option<&str>) -> Result<SourceFileType, ApiError> {
    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
    match (content_type, extension.as_deref()) {
        (Some("application/pdf"), _) | (_, Some("pdf")) => Ok(SourceFileType::Pdf),
        (Some("text/plain"), _) | (_, Some("txt")) => Ok(SourceFileType::Text),
        _ => Err(ApiError::Validation(
            "Unsupported file type: only PDF and plain text are accepted".to_string(),
        )),
    }
}

/// Reports the background job's current status for pollers.
pub async fn lecture_status_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let lecture = app_state
        .store
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("No lecture with id {}", id)))?;

    Ok(Json(json!({
        "success": true,
        "status": lecture.status,
        "progress": lecture.progress,
        "data": lecture,
    })))
}

pub async fn get_lecture_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let lecture = app_state
        .store
        .get(id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("No lecture with id {}", id)))?;

    Ok(Json(json!({ "success": true, "data": lecture })))
}

//=========================================================================================
// Gateway Passthrough Handlers
//=========================================================================================

/// Runs the content enhancer over ad hoc text. A gateway failure is reported
/// in the body with its metadata rather than as a bare 500.
pub async fn enhance_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<EnhanceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = require_content(&request.content)?;
    let topic = request.topic.unwrap_or_else(|| "Not specified".to_string());
    let metadata = enhancement_metadata(&content, &topic);

    let Some(enhancer) = app_state.enhancer.as_ref() else {
        return Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "provider": "gemini",
                "error": "Gemini API key not configured",
                "metadata": metadata,
            })),
        ));
    };

    match enhancer.enhance(&content, &topic).await {
        Ok(result) => Ok((
            StatusCode::OK,
            Json(json!({
                "success": true,
                "provider": "gemini",
                "data": result,
                "metadata": metadata,
            })),
        )),
        Err(e) => Ok((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "provider": "gemini",
                "error": e.to_string(),
                "metadata": metadata,
            })),
        )),
    }
}

pub async fn suggest_visuals_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<SuggestVisualsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let topics = request
        .topics
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("Topics array is required".to_string()))?;

    let visuals = app_state.visuals.suggest(&topics).await?;
    let total = visuals.len();

    Ok(Json(json!({
        "success": true,
        "data": {
            "visuals": visuals,
            "total": total,
            "timestamp": Utc::now().to_rfc3339(),
        }
    })))
}

pub async fn generate_questions_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<GenerateQuestionsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let content = require_content(&request.content)?;
    let topic = request.topic.unwrap_or_else(|| "General".to_string());
    let count = request.count.unwrap_or(DEFAULT_QUESTION_COUNT);

    let batch = app_state.questions.generate(&content, &topic, count).await?;
    let total = batch.questions.len();

    Ok(Json(json!({
        "success": true,
        "provider": question_provider(batch.provenance),
        "data": {
            "questions": batch.questions,
            "total": total,
            "topic": topic,
            "generatedAt": Utc::now().to_rfc3339(),
        }
    })))
}

pub async fn generate_section_questions_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<SectionQuestionsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let sections = request
        .sections
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::Validation("Sections array is required".to_string()))?;
    let per_section = request
        .questions_per_section
        .unwrap_or(DEFAULT_QUESTIONS_PER_SECTION);

    let mut results = Vec::with_capacity(sections.len());
    let mut total_questions = 0;

    for section in &sections {
        let topic = section.title.clone().unwrap_or_else(|| "General".to_string());
        let content = section.content.clone().unwrap_or_default();
        let batch = app_state.questions.generate(&content, &topic, per_section).await?;
        let section_total = batch.questions.len();
        total_questions += section_total;
        results.push(json!({
            "section": topic,
            "success": true,
            "provider": question_provider(batch.provenance),
            "data": {
                "questions": batch.questions,
                "total": section_total,
            }
        }));
    }

    Ok(Json(json!({
        "success": true,
        "data": {
            "sections": results,
            "total": results.len(),
            "totalQuestions": total_questions,
        }
    })))
}

//=========================================================================================
// Export Handlers
//=========================================================================================

pub async fn export_lecture_handler(
    Path(format): Path<String>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let lecture_data = request
        .lecture_data
        .ok_or_else(|| ApiError::Validation("Lecture data is required".to_string()))?;

    match format.as_str() {
        "powerpoint" => {
            let payload: ExportPayload = serde_json::from_value(lecture_data)
                .map_err(|e| ApiError::Validation(format!("Invalid lecture data: {}", e)))?;
            let bytes = render_slide_deck(&payload)?;
            let filename = request.filename.unwrap_or_else(|| "lecture.pptx".to_string());
            Ok(Json(json!({
                "success": true,
                "format": "powerpoint",
                "filename": filename,
                "data": base64_encode(&bytes),
                "message": "Lecture exported to PowerPoint successfully",
            })))
        }
        "pdf" => {
            let payload: ExportPayload = serde_json::from_value(lecture_data)
                .map_err(|e| ApiError::Validation(format!("Invalid lecture data: {}", e)))?;
            let html = render_html_document(&payload)?;
            let filename = request.filename.unwrap_or_else(|| "lecture.pdf".to_string());
            Ok(Json(json!({
                "success": true,
                "format": "pdf",
                "filename": filename,
                "htmlContent": html,
                "message": "Lecture prepared for PDF export",
            })))
        }
        "json" => {
            let artifact = render_json(&lecture_data)?;
            let filename = request.filename.unwrap_or_else(|| "lecture.json".to_string());
            Ok(Json(json!({
                "success": true,
                "format": "json",
                "filename": filename,
                "jsonContent": artifact,
                "message": "Lecture exported to JSON successfully",
            })))
        }
        other => Err(ApiError::Validation(format!(
            "Unknown export format '{}': expected powerpoint, pdf or json",
            other
        ))),
    }
}

fn base64_encode(bytes: &[u8]) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

//=========================================================================================
// Provider Status Handlers
//=========================================================================================

/// Report whether the generative-text provider is configured.
#[utoipa::path(
    get,
    path = "/api/ai-status",
    responses((status = 200, description = "Provider configuration status", body = ProviderStatus))
)]
pub async fn ai_status_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<ProviderStatus> {
    let configured = app_state.config.gemini_api_key.is_some();
    Json(ProviderStatus {
        configured,
        provider: "gemini",
        message: if configured {
            "Gemini AI is configured and ready"
        } else {
            "Gemini API key not found. Please set GEMINI_API_KEY in .env file"
        },
    })
}

/// Report whether the image-search provider is configured.
#[utoipa::path(
    get,
    path = "/api/visual-status",
    responses((status = 200, description = "Provider configuration status", body = ProviderStatus))
)]
pub async fn visual_status_handler(
    State(app_state): State<Arc<AppState>>,
) -> Json<ProviderStatus> {
    let configured = app_state.config.unsplash_api_key.is_some();
    Json(ProviderStatus {
        configured,
        provider: "unsplash",
        message: if configured {
            "Unsplash API is configured"
        } else {
            "Unsplash API not configured - using mock visuals"
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryLectureStore, MockQuestionAdapter, PlaceholderVisualAdapter};
    use crate::config::Config;
    use axum::response::IntoResponse;

    fn test_state() -> Arc<AppState> {
        Arc::new(AppState {
            config: Arc::new(Config {
                bind_address: "127.0.0.1:0".parse().unwrap(),
                log_level: tracing::Level::INFO,
                gemini_api_key: None,
                gemini_api_base: String::new(),
                enhancer_model: String::new(),
                question_model: String::new(),
                unsplash_api_key: None,
                unsplash_api_base: String::new(),
                max_upload_bytes: 1024 * 1024,
            }),
            store: Arc::new(InMemoryLectureStore::new()),
            enhancer: None,
            questions: Arc::new(MockQuestionAdapter),
            visuals: Arc::new(PlaceholderVisualAdapter),
        })
    }

    #[tokio::test]
    async fn nine_char_content_is_rejected_and_ten_accepted() {
        let short = create_text_lecture_handler(Json(TextLectureRequest {
            content: Some("123456789".to_string()),
            title: None,
        }))
        .await;
        let response = short.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let ok = create_text_lecture_handler(Json(TextLectureRequest {
            content: Some("1234567890".to_string()),
            title: None,
        }))
        .await;
        assert_eq!(ok.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_content_is_a_validation_error() {
        let result = create_text_lecture_handler(Json(TextLectureRequest {
            content: None,
            title: None,
        }))
        .await;
        assert_eq!(result.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_lecture_id_is_404() {
        let state = test_state();
        let result = lecture_status_handler(State(state), Path(Uuid::new_v4())).await;
        assert_eq!(result.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn suggest_visuals_requires_topics() {
        let state = test_state();
        let result =
            suggest_visuals_handler(State(state), Json(SuggestVisualsRequest { topics: None }))
                .await;
        assert_eq!(result.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn generate_questions_uses_mock_provider_without_a_key() {
        let state = test_state();
        let result = generate_questions_handler(
            State(state),
            Json(GenerateQuestionsRequest {
                content: Some("Some lecture content".to_string()),
                topic: Some("Biology".to_string()),
                count: Some(5),
            }),
        )
        .await;
        assert_eq!(result.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn enhance_without_key_reports_failure_with_metadata() {
        let state = test_state();
        let result = enhance_handler(
            State(state),
            Json(EnhanceRequest {
                content: Some("Some lecture content".to_string()),
                topic: None,
            }),
        )
        .await;
        assert_eq!(
            result.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn export_requires_lecture_data() {
        let result = export_lecture_handler(
            Path("json".to_string()),
            Json(ExportRequest {
                lecture_data: None,
                filename: None,
            }),
        )
        .await;
        assert_eq!(result.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_rejects_unknown_formats() {
        let result = export_lecture_handler(
            Path("docx".to_string()),
            Json(ExportRequest {
                lecture_data: Some(json!({"title": "T"})),
                filename: None,
            }),
        )
        .await;
        assert_eq!(result.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_json_succeeds_for_a_minimal_payload() {
        let result = export_lecture_handler(
            Path("json".to_string()),
            Json(ExportRequest {
                lecture_data: Some(json!({"title": "T", "sections": []})),
                filename: None,
            }),
        )
        .await;
        assert_eq!(result.into_response().status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn detect_file_type_honors_extension_and_mime() {
        assert!(matches!(
            detect_file_type("notes.pdf", None).unwrap(),
            SourceFileType::Pdf
        ));
        assert!(matches!(
            detect_file_type("notes", Some("text/plain")).unwrap(),
            SourceFileType::Text
        ));
        assert!(detect_file_type("slides.docx", Some("application/msword")).is_err());
    }
}
