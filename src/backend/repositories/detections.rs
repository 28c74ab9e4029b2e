use anyhow::{Context, Result};

use crate::backend::schemas::object_store::{assemble_detection, parse_index};
use crate::backend::Backend;
use crate::models::DetectionRecord;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info, log_warn};

pub const DETECTIONS_ROOT: &str = "detections";
pub const INDEX_PATH: &str = "detections/detection_index.json";

const RAW_IMAGE: &str = "Raw.jpg";
const DETECTED_IMAGE: &str = "Detected.jpg";
const ENVIRONMENT_DATA: &str = "environment_data.json";
const GROWTH_PARAMETERS: &str = "growth_parameters.json";

fn artifact_path(id: &str, file: &str) -> String {
    format!("{DETECTIONS_ROOT}/{id}/{file}")
}

impl Backend {
    /// Record ids in index order (chronological as published upstream).
    pub async fn fetch_index(&self) -> Result<Vec<String>> {
        let store = self.objects();
        let url = store
            .download_url(INDEX_PATH)
            .await
            .context("failed to resolve detection index")?;
        let doc = store
            .fetch_json(&url)
            .await
            .context("failed to download detection index")?;
        parse_index(doc)
    }

    /// Fetches and assembles one record. The four artifact locations are
    /// resolved concurrently, then both JSON documents are fetched concurrently.
    pub async fn fetch_detection(&self, id: &str) -> Result<DetectionRecord> {
        let store = self.objects();
        let raw_path = artifact_path(id, RAW_IMAGE);
        let detected_path = artifact_path(id, DETECTED_IMAGE);
        let env_path = artifact_path(id, ENVIRONMENT_DATA);
        let growth_path = artifact_path(id, GROWTH_PARAMETERS);

        let (raw_url, detected_url, env_url, growth_url) = tokio::try_join!(
            store.download_url(&raw_path),
            store.download_url(&detected_path),
            store.download_url(&env_path),
            store.download_url(&growth_path),
        )
        .with_context(|| format!("failed to resolve artifacts for {id}"))?;

        let (env_doc, growth_doc) =
            tokio::try_join!(store.fetch_json(&env_url), store.fetch_json(&growth_url))
                .with_context(|| format!("failed to download measurements for {id}"))?;

        assemble_detection(id, raw_url, detected_url, env_doc, growth_doc)
    }

    /// Every record listed in the index, in index order.
    ///
    /// Best effort: a record whose artifacts cannot be fetched or parsed is
    /// logged and skipped. If the index itself is unavailable the result is
    /// empty. Nothing is retried.
    pub async fn fetch_detections(&self) -> Vec<DetectionRecord> {
        let ids = match self.fetch_index().await {
            Ok(ids) => ids,
            Err(err) => {
                log_error!("Failed to load detection index: {err:#}");
                return Vec::new();
            }
        };

        log_debug!("Detection index lists {} records", ids.len());

        let mut detections = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.fetch_detection(id).await {
                Ok(record) => detections.push(record),
                Err(err) => log_warn!("Skipping detection {id}: {err:#}"),
            }
        }

        log_info!(
            "Loaded {} of {} detections",
            detections.len(),
            ids.len()
        );
        detections
    }
}
