//! Reconciled history entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{DetectionRecord, GrowthStage};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TransitionDirection {
    Improving,
    Regressing,
}

impl TransitionDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionDirection::Improving => "improving",
            TransitionDirection::Regressing => "regressing",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StageTransition {
    pub from: GrowthStage,
    pub to: GrowthStage,
    pub direction: TransitionDirection,
    pub description: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PestTransitionKind {
    /// Pest-free before, pest now.
    New,
    /// One pest label replaced by another.
    Changed,
    /// Pest before, pest-free now.
    Resolved,
}

impl PestTransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PestTransitionKind::New => "new infestation",
            PestTransitionKind::Changed => "changed infestation",
            PestTransitionKind::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PestTransition {
    pub from: String,
    pub to: String,
    pub kind: PestTransitionKind,
    pub description: String,
}

/// A detection record plus the annotations derived from its predecessors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub record: DetectionRecord,
    pub stage_transition: Option<StageTransition>,
    pub pest_transition: Option<PestTransition>,
    pub days_remaining: Option<i64>,
    pub estimated_maturity_date: Option<NaiveDate>,
}
