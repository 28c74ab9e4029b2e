use serde_json::Value;

use crate::backend::schemas::realtime::parse_entry;
use crate::backend::Backend;
use crate::models::DetectionRecord;

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info, log_warn};

pub const REALTIME_DETECTIONS_PATH: &str = "detections";

impl Backend {
    /// Records from the realtime-database mirror, ordered by id.
    ///
    /// Same policy as the object-store fetch: malformed entries are skipped
    /// with a warning and a failed read yields an empty list.
    pub async fn fetch_realtime_detections(&self) -> Vec<DetectionRecord> {
        let tree = match self.realtime().read(REALTIME_DETECTIONS_PATH).await {
            Ok(tree) => tree,
            Err(err) => {
                log_error!("Failed to read realtime detections: {err:#}");
                return Vec::new();
            }
        };

        let entries = match tree {
            Value::Object(map) => map,
            Value::Null => return Vec::new(),
            other => {
                log_error!("Realtime detections root is not a map: {other}");
                return Vec::new();
            }
        };

        let mut entries: Vec<(String, Value)> = entries.into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let total = entries.len();
        let mut detections = Vec::with_capacity(total);
        for (id, value) in entries {
            match parse_entry(&id, value) {
                Ok(record) => detections.push(record),
                Err(err) => log_warn!("Skipping realtime detection {id}: {err:#}"),
            }
        }

        log_info!("Loaded {} of {total} realtime detections", detections.len());
        detections
    }
}
