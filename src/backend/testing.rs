//! In-memory fakes for the backend traits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::repositories::detections::INDEX_PATH;
use super::{Backend, Document, DocumentStore, ObjectStore, RealtimeDatabase};

const URL_PREFIX: &str = "mem://";

#[derive(Default)]
struct MemoryState {
    objects: Mutex<HashMap<String, Value>>,
    realtime: Mutex<HashMap<String, Value>>,
    collections: Mutex<HashMap<String, Vec<Document>>>,
    index_fetches: AtomicUsize,
    fetch_delay: Mutex<Option<Duration>>,
}

#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<MemoryState>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn backend(&self) -> Backend {
        let fake = Arc::new(self.clone());
        Backend::new(fake.clone(), fake.clone(), fake)
    }

    pub fn put_object(&self, path: &str, value: Value) {
        self.state
            .objects
            .lock()
            .unwrap()
            .insert(path.to_string(), value);
    }

    pub fn put_realtime(&self, path: &str, value: Value) {
        self.state
            .realtime
            .lock()
            .unwrap()
            .insert(path.to_string(), value);
    }

    pub fn put_document(&self, collection: &str, id: &str, fields: Value) {
        self.state
            .collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.to_string(),
                fields,
            });
    }

    /// Slows down every JSON download, to hold a refresh in flight.
    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.state.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn index_fetches(&self) -> usize {
        self.state.index_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn download_url(&self, path: &str) -> Result<String> {
        if path == INDEX_PATH {
            self.state.index_fetches.fetch_add(1, Ordering::SeqCst);
        }
        if self.state.objects.lock().unwrap().contains_key(path) {
            Ok(format!("{URL_PREFIX}{path}"))
        } else {
            Err(anyhow!("object {path} does not exist"))
        }
    }

    async fn fetch_json(&self, url: &str) -> Result<Value> {
        let delay = *self.state.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let path = url
            .strip_prefix(URL_PREFIX)
            .ok_or_else(|| anyhow!("unexpected url {url}"))?;
        self.state
            .objects
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("object {path} does not exist"))
    }
}

#[async_trait]
impl RealtimeDatabase for MemoryBackend {
    async fn read(&self, path: &str) -> Result<Value> {
        Ok(self
            .state
            .realtime
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or(Value::Null))
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn query_latest(
        &self,
        collection: &str,
        order_by: &str,
        limit: usize,
    ) -> Result<Vec<Document>> {
        let mut documents = self
            .state
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default();

        let key = |doc: &Document| doc.fields.get(order_by).map(|v| v.to_string());
        documents.sort_by(|a, b| key(b).cmp(&key(a)));
        documents.truncate(limit);
        Ok(documents)
    }
}

pub fn environment_doc(light_intensity: f64) -> Value {
    json!({
        "air_temperature_c": 24.0,
        "water_temperature_c": 22.0,
        "humidity_percent": 60.0,
        "light_intensity": light_intensity
    })
}

pub fn growth_doc(stage: &str, pest: &str) -> Value {
    json!({
        "leaf_data_per_box": [{
            "growth_stage": stage,
            "pest_detected": pest,
            "height_cm": 10.0,
            "largest_leaf_area": 20.0,
            "leaf_count": 6,
            "days_since_transplant": 4
        }]
    })
}
