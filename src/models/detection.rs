//! Canonical detection record shared by every backend adapter.
//!
//! One record is one capture from the edge device: the raw and annotated
//! images plus the environment readings and growth measurements the ML
//! pipeline derived from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Pest label the ML pipeline writes when nothing was found.
pub const PEST_SENTINEL: &str = "None";

/// Growth stage placeholder used when the pipeline produced no plant boxes.
pub const UNKNOWN_STAGE: &str = "N/A";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GrowthStage {
    Seedling,
    Vegetative,
    Mature,
}

impl GrowthStage {
    pub const ALL: [GrowthStage; 3] = [
        GrowthStage::Seedling,
        GrowthStage::Vegetative,
        GrowthStage::Mature,
    ];

    /// Returns `None` for sentinels such as `"N/A"` and anything unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(value))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Seedling => "Seedling",
            GrowthStage::Vegetative => "Vegetative",
            GrowthStage::Mature => "Mature",
        }
    }

    pub fn ordinal(&self) -> u8 {
        match self {
            GrowthStage::Seedling => 1,
            GrowthStage::Vegetative => 2,
            GrowthStage::Mature => 3,
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// True when `label` is the "no pest" sentinel, ignoring case.
pub fn is_pest_free(label: &str) -> bool {
    label.trim().eq_ignore_ascii_case(PEST_SENTINEL)
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub air_temperature_c: f64,
    pub water_temperature_c: f64,
    pub humidity_percent: f64,
    pub light_intensity_lux: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Growth {
    pub plant_count: u32,
    /// Raw stage label; kept verbatim so sentinels survive for display.
    pub growth_stage: String,
    pub pest_detected: String,
    pub height_cm: f64,
    pub leaf_area_cm2: f64,
    pub leaf_count: u32,
    pub days_since_transplant: Option<f64>,
}

impl Default for Growth {
    fn default() -> Self {
        Self {
            plant_count: 0,
            growth_stage: UNKNOWN_STAGE.into(),
            pest_detected: PEST_SENTINEL.into(),
            height_cm: 0.0,
            leaf_area_cm2: 0.0,
            leaf_count: 0,
            days_since_transplant: None,
        }
    }
}

impl Growth {
    pub fn stage(&self) -> Option<GrowthStage> {
        GrowthStage::parse(&self.growth_stage)
    }

    pub fn has_pest(&self) -> bool {
        !is_pest_free(&self.pest_detected)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    pub id: String,
    pub raw_image_ref: Option<String>,
    pub detected_image_ref: Option<String>,
    pub environment: Environment,
    pub growth: Growth,
}

impl DetectionRecord {
    /// Calendar date encoded in the `YYYY-MM-DD_HH-MM-SS` id, if the id follows
    /// that convention.
    pub fn capture_date(&self) -> Option<NaiveDate> {
        let prefix = self.id.get(..10)?;
        NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
    }
}

/// Latest record by id. Ids sort chronologically, so this is the greatest id
/// regardless of the order the index listed them in.
pub fn latest_detection(records: &[DetectionRecord]) -> Option<&DetectionRecord> {
    records.iter().max_by(|a, b| a.id.cmp(&b.id))
}
