//! Realtime-database layout: a map keyed by record id whose values carry an
//! inline base64 `Detected` image and the same environment/growth objects as
//! the object-store JSON files.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::object_store::{EnvironmentDoc, GrowthParametersDoc};
use crate::backend::helpers::image_data_uri;
use crate::models::DetectionRecord;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RealtimeEntry {
    #[serde(rename = "Detected")]
    pub detected: Option<String>,
    #[serde(default)]
    pub growth_parameters: GrowthParametersDoc,
    #[serde(default)]
    pub environment_data: EnvironmentDoc,
}

pub fn parse_entry(id: &str, value: Value) -> Result<DetectionRecord> {
    let entry: RealtimeEntry = serde_json::from_value(value)
        .with_context(|| format!("malformed realtime entry {id}"))?;

    Ok(DetectionRecord {
        id: id.to_string(),
        raw_image_ref: None,
        detected_image_ref: entry.detected.as_deref().map(image_data_uri),
        environment: entry.environment_data.into(),
        growth: entry.growth_parameters.try_into()?,
    })
}
