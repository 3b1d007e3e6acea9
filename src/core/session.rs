use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::config::PreviewConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::locator::LocatorRegistry;
use crate::core::parser::TextExtractor;
use crate::core::sheet::SheetDecoder;
use crate::core::state::ViewState;
use crate::SelectedFileSet;

/// One selection event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Batch {
    pub id: Uuid,
    pub selected_at: DateTime<Utc>,
}

impl Batch {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            selected_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: ViewState,
    /// Bumped by every selection and clear; a batch only commits if it still matches.
    generation: u64,
    active_batch: Option<Batch>,
}

/// Owns the view state and reconciles selections and clears against it.
pub struct PreviewSession {
    dispatcher: Dispatcher,
    registry: Arc<LocatorRegistry>,
    config: PreviewConfig,
    inner: Mutex<Inner>,
}

impl PreviewSession {
    pub fn new(config: PreviewConfig) -> Self {
        let registry = Arc::new(LocatorRegistry::new());
        Self {
            dispatcher: Dispatcher::new(Arc::clone(&registry), config.clone()),
            registry,
            config,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn TextExtractor>) -> Self {
        self.dispatcher = self.dispatcher.with_extractor(extractor);
        self
    }

    pub fn with_decoder(mut self, decoder: Arc<dyn SheetDecoder>) -> Self {
        self.dispatcher = self.dispatcher.with_decoder(decoder);
        self
    }

    pub fn registry(&self) -> &Arc<LocatorRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Handle a selection event.
    ///
    /// The state is reset immediately and the previous batch's locators are
    /// released. Once every file has resolved, the batch is committed in one pass
    /// and the new state returned. Returns `None` if a newer selection or a clear
    /// superseded this batch in the meantime; its results are then dropped.
    pub async fn select(&self, files: SelectedFileSet) -> Option<ViewState> {
        let batch = Batch::new();
        let generation = {
            let mut inner = self.inner.lock().await;
            inner.generation += 1;
            inner.state.clear();
            if let Some(previous) = inner.active_batch.replace(batch) {
                self.registry.release_batch(previous.id);
            }
            inner.generation
        };

        info!(
            "Selected {} files at {} (batch {})",
            files.len(),
            batch.selected_at.to_rfc3339(),
            batch.id
        );

        let outcomes = self.dispatcher.dispatch(batch.id, &files).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            info!("Discarding superseded batch {}", batch.id);
            self.registry.release_batch(batch.id);
            return None;
        }

        inner.state = ViewState::from_outcomes(outcomes);
        info!(
            "Committed batch {}: {} documents, {} text bytes, table: {}, {} errors",
            batch.id,
            inner.state.documents.len(),
            inner.state.text_content.len(),
            inner.state.table_content.is_some(),
            inner.state.errors.len()
        );
        Some(inner.state.clone())
    }

    /// Reset all slots and release the active batch. In-flight batches are discarded
    /// when they resolve.
    pub async fn clear(&self) {
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.state.clear();
        if let Some(batch) = inner.active_batch.take() {
            self.registry.release_batch(batch.id);
        }
        info!("Cleared view state");
    }

    pub async fn snapshot(&self) -> ViewState {
        self.inner.lock().await.state.clone()
    }

    pub async fn active_batch(&self) -> Option<Batch> {
        self.inner.lock().await.active_batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectedFile;

    #[tokio::test]
    async fn test_new_selection_resets_previous_slots() {
        let session = PreviewSession::new(PreviewConfig::default());

        let first = session
            .select(vec![SelectedFile::from_bytes("a.txt", "text/plain", b"a".to_vec())])
            .await
            .unwrap();
        assert_eq!(first.text_content, "a");

        let second = session
            .select(vec![SelectedFile::from_bytes("b.png", "image/png", b"png".to_vec())])
            .await
            .unwrap();
        assert!(second.text_content.is_empty());
        assert_eq!(second.documents.len(), 1);
    }

    #[tokio::test]
    async fn test_active_batch_tracks_selection_and_clear() {
        let session = PreviewSession::new(PreviewConfig::default());
        assert!(session.active_batch().await.is_none());

        session
            .select(vec![SelectedFile::from_bytes("a.txt", "text/plain", b"a".to_vec())])
            .await;
        assert!(session.active_batch().await.is_some());

        session.clear().await;
        assert!(session.active_batch().await.is_none());
        assert!(session.snapshot().await.is_empty());
    }
}
