//! services/api/src/adapters/store.rs
//!
//! The in-memory lecture store, the concrete implementation of the
//! `LectureStore` port. Lectures live for the process lifetime only;
//! swapping in a durable store means replacing this adapter, not the job.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use eduvisual_core::{
    domain::Lecture,
    ports::{LectureStore, PortResult},
};

/// A process-local lecture store backed by a `HashMap`.
///
/// There is exactly one writer per lecture id (its generation job), so the
/// lock only has to serialize whole-lecture snapshots against concurrent
/// status polls; `update` is last-write-wins by contract.
#[derive(Default)]
pub struct InMemoryLectureStore {
    lectures: RwLock<HashMap<Uuid, Lecture>>,
}

impl InMemoryLectureStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LectureStore for InMemoryLectureStore {
    async fn get(&self, id: Uuid) -> Option<Lecture> {
        self.lectures.read().await.get(&id).cloned()
    }

    async fn insert(&self, lecture: Lecture) -> PortResult<()> {
        self.lectures.write().await.insert(lecture.id, lecture);
        Ok(())
    }

    async fn update(&self, lecture: Lecture) -> PortResult<()> {
        self.lectures.write().await.insert(lecture.id, lecture);
        Ok(())
    }

    async fn contains(&self, id: Uuid) -> bool {
        self.lectures.read().await.contains_key(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eduvisual_core::domain::{JobStatus, SourceFileType};

    fn sample_lecture() -> Lecture {
        Lecture::new(
            "Sample".to_string(),
            "sample.txt".to_string(),
            SourceFileType::Text,
            "Some content here.".to_string(),
            Vec::new(),
        )
    }

    #[tokio::test]
    async fn insert_then_get_round_trips() {
        let store = InMemoryLectureStore::new();
        let lecture = sample_lecture();
        let id = lecture.id;

        store.insert(lecture.clone()).await.unwrap();
        assert!(store.contains(id).await);
        assert_eq!(store.get(id).await.unwrap(), lecture);
    }

    #[tokio::test]
    async fn get_unknown_id_is_none() {
        let store = InMemoryLectureStore::new();
        assert!(store.get(Uuid::new_v4()).await.is_none());
        assert!(!store.contains(Uuid::new_v4()).await);
    }

    #[tokio::test]
    async fn update_replaces_the_snapshot() {
        let store = InMemoryLectureStore::new();
        let mut lecture = sample_lecture();
        let id = lecture.id;
        store.insert(lecture.clone()).await.unwrap();

        lecture.status = JobStatus::Processing;
        lecture.progress = 40;
        store.update(lecture).await.unwrap();

        let stored = store.get(id).await.unwrap();
        assert_eq!(stored.status, JobStatus::Processing);
        assert_eq!(stored.progress, 40);
    }
}
