use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{GrowthStage, HistoryEntry};

/// History screen filter. Empty fields match everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryFilter {
    pub date: Option<NaiveDate>,
    pub stage: Option<GrowthStage>,
}

impl HistoryFilter {
    pub fn matches(&self, entry: &HistoryEntry) -> bool {
        let date_match = self.date.map_or(true, |date| {
            entry
                .record
                .id
                .contains(&date.format("%Y-%m-%d").to_string())
        });
        // Stage filtering looks at the reported label, not the carried-forward stage.
        let stage_match = self
            .stage
            .map_or(true, |stage| entry.record.growth.growth_stage == stage.as_str());

        date_match && stage_match
    }

    pub fn apply(&self, entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
        entries.into_iter().filter(|entry| self.matches(entry)).collect()
    }
}

/// Reverses a chronological history for newest-first display.
pub fn newest_first(mut entries: Vec<HistoryEntry>) -> Vec<HistoryEntry> {
    entries.reverse();
    entries
}
