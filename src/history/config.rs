use serde::{Deserialize, Serialize};

use crate::models::GrowthStage;

/// Expected days spent in each growth stage before the crop matures.
/// A zero duration marks a terminal stage with no maturity estimate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StageDurations {
    pub seedling_days: u32,
    pub vegetative_days: u32,
    pub mature_days: u32,
}

impl Default for StageDurations {
    fn default() -> Self {
        Self {
            seedling_days: 5,
            vegetative_days: 10,
            mature_days: 0,
        }
    }
}

impl StageDurations {
    pub fn days_for(&self, stage: GrowthStage) -> u32 {
        match stage {
            GrowthStage::Seedling => self.seedling_days,
            GrowthStage::Vegetative => self.vegetative_days,
            GrowthStage::Mature => self.mature_days,
        }
    }
}
