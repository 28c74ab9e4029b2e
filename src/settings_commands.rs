//! Commands for reading and editing the alert thresholds and stage durations.

use log::info;

use crate::{alerts::AlertThresholds, history::StageDurations, settings::Settings, AppState};

pub async fn get_settings(state: &AppState) -> Result<Settings, String> {
    let mut settings = state.settings.snapshot();
    settings.backend.api_key.clear();
    Ok(settings)
}

pub async fn update_thresholds(
    state: &AppState,
    thresholds: AlertThresholds,
) -> Result<AlertThresholds, String> {
    thresholds.validate().map_err(|e| e.to_string())?;

    state
        .settings
        .update_thresholds(thresholds.clone())
        .map_err(|e| e.to_string())?;
    info!("Alert thresholds updated");
    Ok(thresholds)
}

pub async fn update_stage_durations(
    state: &AppState,
    durations: StageDurations,
) -> Result<StageDurations, String> {
    state
        .settings
        .update_stage_durations(durations.clone())
        .map_err(|e| e.to_string())?;
    info!("Stage durations updated");
    Ok(durations)
}
