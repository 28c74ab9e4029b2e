//! Prediction summaries from the structured-database `predictions` collection.
//!
//! These documents carry only the classification outcome (no environment
//! readings or growth measurements), so they stay a separate type instead of
//! being padded out into a `DetectionRecord`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub id: String,
    pub maturity: String,
    pub pest: String,
    pub image_url: String,
    /// RFC 3339 with millisecond precision.
    pub timestamp: Option<String>,
}
