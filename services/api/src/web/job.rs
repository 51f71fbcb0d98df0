//! services/api/src/web/job.rs
//!
//! This module contains the asynchronous "worker" function responsible for
//! generating a lecture's slides: the pending → processing → completed/failed
//! state machine described by the lecture invariants.
//!
//! Per topic it awaits the three gateways sequentially (enhance, questions,
//! visuals), bumps progress after each sub-step, and appends the finished
//! slide. Per-call degradation is absorbed by the gateways; only an error
//! escaping this loop flips the job to failed, and the slides accumulated up
//! to that point are kept.

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use eduvisual_core::{
    domain::{JobStatus, Slide, Topic},
    ports::{PortError, PortResult},
    progress::compute_progress,
};

use crate::web::state::AppState;

/// Schedules the background generation task for an accepted lecture and
/// returns immediately. The caller must have stored the lecture (in the
/// `Pending` state) before calling this.
pub fn spawn_generation(state: Arc<AppState>, lecture_id: Uuid) {
    tokio::spawn(async move {
        if let Err(e) = run_generation(state.clone(), lecture_id).await {
            error!("lecture {} generation failed: {}", lecture_id, e);
            mark_failed(&state, lecture_id, &e).await;
        }
    });
}

/// The generation loop itself. Separated from `spawn_generation` so tests
/// can drive it to completion without scheduling.
///
/// No timeout is enforced on the gateway calls: a hung provider stalls this
/// lecture's progress indefinitely. A known hardening point, deliberately
/// not papered over here.
pub async fn run_generation(state: Arc<AppState>, lecture_id: Uuid) -> PortResult<()> {
    let mut lecture = state
        .store
        .get(lecture_id)
        .await
        .ok_or_else(|| PortError::NotFound(format!("lecture {}", lecture_id)))?;

    // One loop instance per lecture id for its lifetime.
    if lecture.status != JobStatus::Pending {
        warn!(
            "lecture {} is {:?}, refusing to start a second generation loop",
            lecture_id, lecture.status
        );
        return Ok(());
    }

    let topics = lecture.topics.clone();
    let total = topics.len();
    info!("lecture {} processing {} topics", lecture_id, total);

    lecture.status = JobStatus::Processing;
    lecture.progress = compute_progress(0, total, 0);
    state.store.update(lecture.clone()).await?;

    for (index, topic) in topics.iter().enumerate() {
        let content = topic_body(topic);

        // Sub-step 1: enhancement. A failure here is a valid degraded state;
        // the slide keeps its plain description.
        let enhanced = match &state.enhancer {
            Some(enhancer) => match enhancer.enhance(&content, &topic.title).await {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("enhancement failed for topic \"{}\": {}", topic.title, e);
                    None
                }
            },
            None => None,
        };
        lecture.progress = compute_progress(index, total, 1);
        state.store.update(lecture.clone()).await?;

        // Sub-step 2: questions. The gateway degrades to its mock batch
        // internally; an error here is unexpected and escapes.
        let batch = state.questions.generate(&content, &topic.title, 3).await?;
        lecture.progress = compute_progress(index, total, 2);
        state.store.update(lecture.clone()).await?;

        // Sub-step 3: visuals. Per-topic degradation happens inside the port.
        let topic_visuals = state
            .visuals
            .suggest(std::slice::from_ref(&topic.title))
            .await?;
        let images = topic_visuals
            .into_iter()
            .next()
            .map(|v| v.images)
            .unwrap_or_default();

        let slide = Slide {
            id: Slide::positional_id(index),
            title: topic.title.clone(),
            description: content,
            enhanced_content: enhanced,
            questions: batch.questions,
            selected_image: images.first().cloned(),
            selected_flowchart: None,
            visuals: images,
            subtopics: topic.subtopics.clone(),
        };
        lecture.slides.push(slide);
        lecture.progress = compute_progress(index + 1, total, 0);
        state.store.update(lecture.clone()).await?;
    }

    lecture.status = JobStatus::Completed;
    lecture.progress = 100;
    state.store.update(lecture).await?;
    info!("lecture {} completed", lecture_id);

    Ok(())
}

/// Flips the stored lecture to `Failed`, keeping whatever slides the loop
/// managed to append before the error.
async fn mark_failed(state: &Arc<AppState>, lecture_id: Uuid, cause: &PortError) {
    let Some(mut lecture) = state.store.get(lecture_id).await else {
        return;
    };
    if lecture.status.is_terminal() {
        return;
    }
    lecture.status = JobStatus::Failed;
    lecture.error = Some(cause.to_string());
    if state.store.update(lecture).await.is_err() {
        error!("could not record failure for lecture {}", lecture_id);
    }
}

/// The slide's base text: the topic's own lines, or its title when the
/// outline put nothing under it.
fn topic_body(topic: &Topic) -> String {
    if topic.subtopics.is_empty() {
        topic.title.clone()
    } else {
        topic.subtopics.join("\n")
    }
}
