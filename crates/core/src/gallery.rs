//! The persisted personal collection.
//!
//! [`GalleryStore`] owns the ordered list of saved results (most recent
//! first) and writes the whole list to its [`Storage`] after every mutation.
//! The in-memory list is authoritative: a failed write is reported to the
//! caller but the mutation is kept, so the persisted copy may lag behind until
//! the next successful write.

use crate::error::{AppError, Result};
use crate::storage::Storage;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Storage key of the persisted gallery. Bumped when the record layout changes.
pub const GALLERY_KEY: &str = "artisan_gallery_v2";

/// A saved pairing of a photo and its stylized rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryItem {
    pub id: String,
    /// Captured source image (data URI).
    pub original_image: String,
    /// Generated result (data URI).
    pub processed_image: String,
    /// Style used; not checked against the catalog.
    pub style_id: String,
    /// Creation instant in milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl GalleryItem {
    /// Creates an item stamped with the current time and a fresh time-ordered id.
    pub fn new(
        original_image: impl Into<String>,
        processed_image: impl Into<String>,
        style_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            original_image: original_image.into(),
            processed_image: processed_image.into(),
            style_id: style_id.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

pub struct GalleryStore {
    items: Vec<GalleryItem>,
    storage: Box<dyn Storage>,
}

impl GalleryStore {
    /// Loads the persisted gallery.
    ///
    /// Never fails: missing data yields an empty gallery, unreadable data is
    /// discarded with a warning.
    pub fn load(storage: Box<dyn Storage>) -> Self {
        let mut store = Self {
            items: Vec::new(),
            storage,
        };

        match store.read_persisted() {
            Ok(items) => {
                tracing::info!(event = "core.gallery.loaded", count = items.len());
                store.items = items;
            }
            Err(e) => {
                tracing::warn!(
                    event = "core.gallery.load_failed",
                    error = %e,
                    message = "Starting with an empty gallery"
                );
                if matches!(e, AppError::PersistenceCorrupt(_))
                    && let Err(remove_err) = store.storage.remove(GALLERY_KEY)
                {
                    tracing::warn!(event = "core.gallery.discard_failed", error = %remove_err);
                }
            }
        }

        store
    }

    fn read_persisted(&self) -> Result<Vec<GalleryItem>> {
        let Some(raw) = self.storage.read(GALLERY_KEY)? else {
            return Ok(Vec::new());
        };

        let items: Vec<GalleryItem> = serde_json::from_str(&raw)
            .map_err(|e| AppError::PersistenceCorrupt(e.to_string()))?;

        Ok(dedup_by_id(items))
    }

    /// Prepends `item`, replacing any existing item with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::PersistenceWrite`] if the write fails. The item is
    /// still in the in-memory gallery in that case.
    pub fn add(&mut self, item: GalleryItem) -> Result<()> {
        self.items.retain(|existing| existing.id != item.id);
        tracing::info!(event = "core.gallery.item_added", id = %item.id, style_id = %item.style_id);
        self.items.insert(0, item);
        self.persist()
    }

    /// Removes the item with `id`. Returns whether anything was removed.
    ///
    /// Unknown ids are a no-op and do not touch the storage.
    pub fn remove(&mut self, id: &str) -> Result<bool> {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() == before {
            return Ok(false);
        }
        tracing::info!(event = "core.gallery.item_removed", id = %id);
        self.persist()?;
        Ok(true)
    }

    pub fn all(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&GalleryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.items)?;
        self.storage.write(GALLERY_KEY, &json).inspect_err(|e| {
            tracing::warn!(
                event = "core.gallery.persist_failed",
                error = %e,
                count = self.items.len()
            );
        })
    }
}

/// Keeps the first (most recent) occurrence of each id.
fn dedup_by_id(items: Vec<GalleryItem>) -> Vec<GalleryItem> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.id.clone()))
        .collect()
}
