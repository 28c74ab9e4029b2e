//! Object-store layout: `environment_data.json` and `growth_parameters.json`
//! written per capture by the ML pipeline.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::backend::helpers::{non_empty_or, to_count};
use crate::models::{DetectionRecord, Environment, Growth, PEST_SENTINEL, UNKNOWN_STAGE};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvironmentDoc {
    pub air_temperature_c: Option<f64>,
    pub water_temperature_c: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub light_intensity: Option<f64>,
}

impl From<EnvironmentDoc> for Environment {
    fn from(doc: EnvironmentDoc) -> Self {
        Self {
            air_temperature_c: doc.air_temperature_c.unwrap_or(0.0),
            water_temperature_c: doc.water_temperature_c.unwrap_or(0.0),
            humidity_percent: doc.humidity_percent.unwrap_or(0.0),
            light_intensity_lux: doc.light_intensity.unwrap_or(0.0),
        }
    }
}

/// Measurements for one detected plant box.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeafData {
    pub growth_stage: Option<String>,
    pub pest_detected: Option<String>,
    pub height_cm: Option<f64>,
    pub largest_leaf_area: Option<f64>,
    pub leaf_count: Option<f64>,
    pub days_since_transplant: Option<f64>,
}

/// Boxes stay untyped: only the first one is read, so a bad later box
/// must not sink the record.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrowthParametersDoc {
    pub leaf_data_per_box: Option<Vec<Value>>,
}

impl TryFrom<GrowthParametersDoc> for Growth {
    type Error = anyhow::Error;

    /// The first plant box stands in for the whole tray; the box count is
    /// the plant count.
    fn try_from(doc: GrowthParametersDoc) -> Result<Self> {
        let boxes = doc.leaf_data_per_box.unwrap_or_default();
        let plant_count = u32::try_from(boxes.len()).unwrap_or(u32::MAX);
        let first: LeafData = match boxes.into_iter().next() {
            None | Some(Value::Null) => LeafData::default(),
            Some(first) => serde_json::from_value(first).context("malformed first plant box")?,
        };

        Ok(Self {
            plant_count,
            growth_stage: non_empty_or(first.growth_stage, UNKNOWN_STAGE),
            pest_detected: non_empty_or(first.pest_detected, PEST_SENTINEL),
            height_cm: first.height_cm.unwrap_or(0.0),
            leaf_area_cm2: first.largest_leaf_area.unwrap_or(0.0),
            leaf_count: to_count(first.leaf_count),
            days_since_transplant: first.days_since_transplant,
        })
    }
}

pub fn parse_environment(doc: Value) -> Result<Environment> {
    let doc: EnvironmentDoc =
        serde_json::from_value(doc).context("malformed environment_data.json")?;
    Ok(doc.into())
}

pub fn parse_growth(doc: Value) -> Result<Growth> {
    let doc: GrowthParametersDoc =
        serde_json::from_value(doc).context("malformed growth_parameters.json")?;
    doc.try_into()
}

/// Builds a record from the four per-capture artifacts.
pub fn assemble_detection(
    id: &str,
    raw_image_url: String,
    detected_image_url: String,
    environment: Value,
    growth: Value,
) -> Result<DetectionRecord> {
    Ok(DetectionRecord {
        id: id.to_string(),
        raw_image_ref: Some(raw_image_url),
        detected_image_ref: Some(detected_image_url),
        environment: parse_environment(environment)?,
        growth: parse_growth(growth)?,
    })
}

/// Parses `detection_index.json`: an ordered array of record ids.
pub fn parse_index(doc: Value) -> Result<Vec<String>> {
    serde_json::from_value(doc).context("detection index is not an array of ids")
}
