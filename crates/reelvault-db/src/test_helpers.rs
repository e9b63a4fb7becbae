//! In-memory `VideoStore` for tests.

use crate::traits::VideoStore;
use async_trait::async_trait;
use chrono::Utc;
use reelvault_core::{models::Video, AppError};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    videos: HashMap<Uuid, Video>,
    updates: HashMap<Uuid, usize>,
}

/// Mutex-guarded map that also counts `update_video` calls per record.
#[derive(Clone, Default)]
pub struct InMemoryVideoStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record.
    pub fn insert(&self, video: Video) {
        let mut inner = self.inner.lock().unwrap();
        inner.videos.insert(video.id, video);
    }

    pub fn snapshot(&self, id: Uuid) -> Option<Video> {
        self.inner.lock().unwrap().videos.get(&id).cloned()
    }

    pub fn update_count(&self, id: Uuid) -> usize {
        self.inner
            .lock()
            .unwrap()
            .updates
            .get(&id)
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.inner.lock().unwrap().videos.get(&id).cloned())
    }

    async fn update_video(&self, video: &Video) -> Result<Video, AppError> {
        let mut inner = self.inner.lock().unwrap();
        let stored = inner
            .videos
            .get_mut(&video.id)
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        stored.title = video.title.clone();
        stored.description = video.description.clone();
        stored.thumbnail_url = video.thumbnail_url.clone();
        stored.video_url = video.video_url.clone();
        stored.updated_at = Utc::now();
        let updated = stored.clone();

        *inner.updates.entry(video.id).or_insert(0) += 1;
        Ok(updated)
    }

    async fn reset(&self) -> Result<(), AppError> {
        let mut inner = self.inner.lock().unwrap();
        inner.videos.clear();
        inner.updates.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn update_counts_and_preserves_owner() {
        let store = InMemoryVideoStore::new();
        let owner = Uuid::new_v4();
        let created = Video::new(owner, "clip");
        store.insert(created.clone());

        let mut changed = created.clone();
        changed.video_url = Some("https://cdn.example/landscape/aa.mp4".to_string());
        changed.user_id = Uuid::new_v4();
        let updated = store.update_video(&changed).await.unwrap();

        assert_eq!(updated.user_id, owner);
        assert_eq!(updated.video_url, changed.video_url);
        assert_eq!(store.update_count(created.id), 1);
    }

    #[tokio::test]
    async fn update_of_missing_record_is_not_found() {
        let store = InMemoryVideoStore::new();
        let err = store
            .update_video(&Video::new(Uuid::new_v4(), "ghost"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let store = InMemoryVideoStore::new();
        store.insert(Video::new(Uuid::new_v4(), "a"));
        store.insert(Video::new(Uuid::new_v4(), "b"));
        store.reset().await.unwrap();
        assert!(store.is_empty());
    }
}
