//! UI-facing commands for the dashboard, history and alert screens.

use chrono::Local;
use tokio::time::Duration;

use crate::{
    backend::DEFAULT_PREDICTION_LIMIT,
    dashboard::DashboardSnapshot,
    history::{newest_first, reconcile_history, HistoryFilter},
    models::{AlertReport, DetectionRecord, HistoryEntry, Prediction},
    AppState,
};

pub async fn get_detections(state: &AppState) -> Result<Vec<DetectionRecord>, String> {
    Ok(state.backend.fetch_detections().await)
}

pub async fn get_realtime_detections(state: &AppState) -> Result<Vec<DetectionRecord>, String> {
    Ok(state.backend.fetch_realtime_detections().await)
}

/// Reconciled history, newest first, narrowed by `filter`.
pub async fn get_history(
    state: &AppState,
    filter: HistoryFilter,
) -> Result<Vec<HistoryEntry>, String> {
    let records = state.backend.fetch_detections().await;
    let today = Local::now().date_naive();
    let history = reconcile_history(&records, today, &state.settings.stage_durations());
    Ok(filter.apply(newest_first(history)))
}

pub async fn get_predictions(
    state: &AppState,
    limit: Option<usize>,
) -> Result<Vec<Prediction>, String> {
    state
        .backend
        .fetch_latest_predictions(limit.unwrap_or(DEFAULT_PREDICTION_LIMIT))
        .await
        .map_err(|e| e.to_string())
}

pub async fn refresh_dashboard(state: &AppState) -> Result<DashboardSnapshot, String> {
    state.dashboard.refresh().await;
    Ok(state.dashboard.snapshot().await)
}

pub async fn get_dashboard(state: &AppState) -> Result<DashboardSnapshot, String> {
    Ok(state.dashboard.snapshot().await)
}

pub async fn get_latest_alert(state: &AppState) -> Result<Option<AlertReport>, String> {
    Ok(state.dashboard.snapshot().await.latest_alert)
}

/// Starts the background refresh using the configured interval and timeout.
pub async fn start_auto_refresh(state: &AppState) -> Result<(), String> {
    let settings = state.settings.snapshot();
    state
        .controller
        .lock()
        .await
        .start(
            Duration::from_secs(settings.refresh_interval_secs),
            Duration::from_secs(settings.fetch_timeout_secs),
        )
        .map_err(|e| e.to_string())
}

pub async fn stop_auto_refresh(state: &AppState) -> Result<(), String> {
    state
        .controller
        .lock()
        .await
        .stop()
        .await
        .map_err(|e| e.to_string())
}
