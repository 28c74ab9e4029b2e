//! Backend access through injected client handles.
//!
//! Each remote surface (object storage, realtime database, document store)
//! sits behind a trait. `Backend` bundles one handle per surface and is what
//! the repositories hang their fetch operations off, so tests swap in
//! in-memory fakes without touching the network.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub mod config;
pub mod firebase;
pub mod helpers;
mod repositories;
pub mod schemas;

#[cfg(test)]
pub(crate) mod testing;

pub use config::BackendConfig;
pub use firebase::FirebaseRest;
pub use repositories::predictions::DEFAULT_PREDICTION_LIMIT;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("{url} returned HTTP {status}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },
}

/// Remote file storage. Paths are bucket-relative, e.g.
/// `detections/detection_index.json`.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Resolves a path to a fetchable URL. Fails when the object is missing.
    async fn download_url(&self, path: &str) -> Result<String>;

    async fn fetch_json(&self, url: &str) -> Result<Value>;
}

/// JSON tree database addressed by slash-separated paths.
#[async_trait]
pub trait RealtimeDatabase: Send + Sync {
    /// Returns `Value::Null` when nothing is stored at `path`.
    async fn read(&self, path: &str) -> Result<Value>;
}

/// A document decoded into plain JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Value,
}

/// Collection-oriented document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Newest-first documents of `collection`, ordered by `order_by` descending.
    async fn query_latest(
        &self,
        collection: &str,
        order_by: &str,
        limit: usize,
    ) -> Result<Vec<Document>>;
}

struct BackendInner {
    objects: Arc<dyn ObjectStore>,
    realtime: Arc<dyn RealtimeDatabase>,
    documents: Arc<dyn DocumentStore>,
}

#[derive(Clone)]
pub struct Backend {
    inner: Arc<BackendInner>,
}

impl Backend {
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        realtime: Arc<dyn RealtimeDatabase>,
        documents: Arc<dyn DocumentStore>,
    ) -> Self {
        Self {
            inner: Arc::new(BackendInner {
                objects,
                realtime,
                documents,
            }),
        }
    }

    /// All three surfaces served by one hosted project.
    pub fn from_firebase(client: Arc<FirebaseRest>) -> Self {
        Self::new(client.clone(), client.clone(), client)
    }

    pub(crate) fn objects(&self) -> &dyn ObjectStore {
        self.inner.objects.as_ref()
    }

    pub(crate) fn realtime(&self) -> &dyn RealtimeDatabase {
        self.inner.realtime.as_ref()
    }

    pub(crate) fn documents(&self) -> &dyn DocumentStore {
        self.inner.documents.as_ref()
    }
}
