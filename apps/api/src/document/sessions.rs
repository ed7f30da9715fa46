//! In-memory editing sessions: one `DocumentStore` per open document id.
//!
//! Handlers hold the write guard for the whole store call, so readers never
//! observe a half-applied mutation.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::document::models::CoverLetterDocument;
use crate::document::store::{DocumentStore, LayoutMode, StoreError};
use crate::errors::AppError;

pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, DocumentStore>>,
    max_sessions: usize,
    default_mode: LayoutMode,
}

impl SessionRegistry {
    pub fn new(max_sessions: usize, default_mode: LayoutMode) -> Self {
        SessionRegistry {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            default_mode,
        }
    }

    /// Loads `document` into its session, opening one if needed.
    pub async fn open<T>(
        &self,
        document: CoverLetterDocument,
        f: impl FnOnce(&DocumentStore) -> T,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let id = document.id.clone();

        if !sessions.contains_key(&id) {
            if sessions.len() >= self.max_sessions {
                warn!(
                    "Session limit reached ({}); refusing to open {id}",
                    self.max_sessions
                );
                return Err(AppError::Unavailable(format!(
                    "Session limit of {} open documents reached",
                    self.max_sessions
                )));
            }
            info!("Opening editing session for cover letter {id}");
        }

        let store = sessions
            .entry(id)
            .or_insert_with(|| DocumentStore::new(self.default_mode));
        store.set_cover_letter(document);
        Ok(f(store))
    }

    pub async fn read<T>(
        &self,
        id: &str,
        f: impl FnOnce(&DocumentStore) -> T,
    ) -> Result<T, AppError> {
        let sessions = self.sessions.read().await;
        let store = sessions.get(id).ok_or_else(|| not_open(id))?;
        Ok(f(store))
    }

    /// Runs one store operation under the write lock.
    pub async fn write<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut DocumentStore) -> Result<T, StoreError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let store = sessions.get_mut(id).ok_or_else(|| not_open(id))?;
        Ok(f(store)?)
    }

    pub async fn close(&self, id: &str) -> Result<(), AppError> {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(_) => {
                info!("Closed editing session for cover letter {id}");
                Ok(())
            }
            None => Err(not_open(id)),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn not_open(id: &str) -> AppError {
    AppError::NotFound(format!("Cover letter {id} is not open"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::models::{BlockType, DocumentContent, NewBlock};
    use chrono::Utc;

    fn doc(id: &str) -> CoverLetterDocument {
        CoverLetterDocument {
            id: id.to_string(),
            title: "Letter".to_string(),
            content: DocumentContent {
                blocks: vec![],
                layout: vec![],
                style: "modern".to_string(),
                structure: None,
            },
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let registry = SessionRegistry::new(10, LayoutMode::AutoFlow);
        registry.open(doc("one"), |_| ()).await.unwrap();
        registry.open(doc("two"), |_| ()).await.unwrap();

        registry
            .write("one", |store| {
                store.add_block(NewBlock::new(BlockType::Content, "hello"), None)
            })
            .await
            .unwrap();

        let one = registry
            .read("one", |s| s.document().unwrap().content.blocks.len())
            .await
            .unwrap();
        let two = registry
            .read("two", |s| s.document().unwrap().content.blocks.len())
            .await
            .unwrap();
        assert_eq!((one, two), (1, 0));
    }

    #[tokio::test]
    async fn test_reopen_replaces_document_in_place() {
        let registry = SessionRegistry::new(1, LayoutMode::FreeForm);
        let first = registry.open(doc("one"), |s| s.revision()).await.unwrap();
        let mut updated = doc("one");
        updated.title = "Renamed".to_string();
        let second = registry.open(updated, |s| s.revision()).await.unwrap();

        assert!(second > first);
        assert_eq!(registry.len().await, 1);
        let (title, mode) = registry
            .read("one", |s| (s.document().unwrap().title.clone(), s.layout_mode()))
            .await
            .unwrap();
        assert_eq!(title, "Renamed");
        assert_eq!(mode, LayoutMode::FreeForm);
    }

    #[tokio::test]
    async fn test_session_limit_refuses_new_documents() {
        let registry = SessionRegistry::new(1, LayoutMode::AutoFlow);
        registry.open(doc("one"), |_| ()).await.unwrap();
        let err = registry.open(doc("two"), |_| ()).await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_session_and_store_errors_surface() {
        let registry = SessionRegistry::new(5, LayoutMode::AutoFlow);
        assert!(matches!(
            registry.read("nope", |_| ()).await,
            Err(AppError::NotFound(_))
        ));

        registry.open(doc("one"), |_| ()).await.unwrap();
        let err = registry
            .write("one", |store| store.remove_block("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        registry.close("one").await.unwrap();
        assert!(registry.close("one").await.is_err());
        assert_eq!(registry.len().await, 0);
    }
}
