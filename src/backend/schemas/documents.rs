//! Structured-database layout: `predictions` documents of
//! `{ maturity, pest, image_url, timestamp }`.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::backend::helpers::non_empty_or;
use crate::backend::Document;
use crate::models::{Prediction, PEST_SENTINEL, UNKNOWN_STAGE};

#[derive(Debug, Clone, Default, Deserialize)]
struct PredictionDoc {
    maturity: Option<String>,
    pest: Option<String>,
    image_url: Option<String>,
    timestamp: Option<Value>,
}

pub fn parse_prediction(document: Document) -> Result<Prediction> {
    let Document { id, fields } = document;
    let doc: PredictionDoc = serde_json::from_value(fields)
        .with_context(|| format!("malformed prediction document {id}"))?;

    // Native timestamps arrive already rendered as RFC 3339 strings; any other
    // JSON type is not a usable timestamp.
    let timestamp = doc.timestamp.and_then(|value| match value {
        Value::String(raw) => Some(raw),
        _ => None,
    });

    Ok(Prediction {
        id,
        maturity: non_empty_or(doc.maturity, UNKNOWN_STAGE),
        pest: non_empty_or(doc.pest, PEST_SENTINEL),
        image_url: doc.image_url.unwrap_or_default(),
        timestamp,
    })
}
