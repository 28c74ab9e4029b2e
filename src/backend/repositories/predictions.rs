use anyhow::{Context, Result};

use crate::backend::schemas::documents::parse_prediction;
use crate::backend::Backend;
use crate::models::Prediction;

const ENABLE_LOGS: bool = true;

use crate::log_warn;

pub const PREDICTIONS_COLLECTION: &str = "predictions";
pub const DEFAULT_PREDICTION_LIMIT: usize = 5;

impl Backend {
    /// Most recent predictions, newest first.
    pub async fn fetch_latest_predictions(&self, limit: usize) -> Result<Vec<Prediction>> {
        let documents = self
            .documents()
            .query_latest(PREDICTIONS_COLLECTION, "timestamp", limit)
            .await
            .context("failed to query predictions")?;

        let mut predictions = Vec::with_capacity(documents.len());
        for document in documents {
            let id = document.id.clone();
            match parse_prediction(document) {
                Ok(prediction) => predictions.push(prediction),
                Err(err) => log_warn!("Skipping prediction {id}: {err:#}"),
            }
        }
        Ok(predictions)
    }
}
