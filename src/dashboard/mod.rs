//! Dashboard state: the latest fetched records, their reconciled history and
//! the alert guard, refreshed on demand or by the background loop.

pub mod commands;
mod controller;
mod loop_worker;

pub use controller::DashboardController;

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::alerts::{check_latest, Notifier, ALERT_TITLE};
use crate::backend::Backend;
use crate::history::reconcile_history;
use crate::models::{AlertReport, AlertState, DetectionRecord, HistoryEntry};
use crate::settings::SettingsStore;

const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    /// Chronological, as listed by the index.
    pub records: Vec<DetectionRecord>,
    pub history: Vec<HistoryEntry>,
    pub alert_state: AlertState,
    /// Most recent report raised; kept until a newer record raises another.
    pub latest_alert: Option<AlertReport>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed { records: usize, alerted: bool },
    /// Another refresh was already in flight.
    Skipped,
}

#[derive(Clone)]
pub struct Dashboard {
    backend: Backend,
    settings: Arc<SettingsStore>,
    notifier: Arc<dyn Notifier>,
    snapshot: Arc<RwLock<DashboardSnapshot>>,
    refresh_lock: Arc<Mutex<()>>,
}

impl Dashboard {
    pub fn new(backend: Backend, settings: Arc<SettingsStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            backend,
            settings,
            notifier,
            snapshot: Arc::new(RwLock::new(DashboardSnapshot::default())),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.snapshot.read().await.clone()
    }

    /// One fetch → reconcile → alert pass. The snapshot is only replaced once
    /// the whole pass has completed; overlapping calls are skipped.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Ok(_in_flight) = self.refresh_lock.try_lock() else {
            log_debug!("Dashboard refresh already running; skipping");
            return RefreshOutcome::Skipped;
        };

        let records = self.backend.fetch_detections().await;
        let today = Local::now().date_naive();
        let history = reconcile_history(&records, today, &self.settings.stage_durations());

        let previous_state = self.snapshot.read().await.alert_state.clone();
        let (alert_state, report) =
            check_latest(&previous_state, &records, &self.settings.thresholds());

        let alerted = report.is_some();
        if let Some(report) = &report {
            self.notifier.notify(ALERT_TITLE, report);
        }

        let count = records.len();
        {
            let mut snapshot = self.snapshot.write().await;
            snapshot.records = records;
            snapshot.history = history;
            snapshot.alert_state = alert_state;
            if report.is_some() {
                snapshot.latest_alert = report;
            }
            snapshot.refreshed_at = Some(Utc::now());
        }

        log_info!("Dashboard refreshed: {count} records, alert raised: {alerted}");
        RefreshOutcome::Refreshed {
            records: count,
            alerted,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::backend::testing::{environment_doc, growth_doc, MemoryBackend};

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub reports: StdMutex<Vec<AlertReport>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, _title: &str, report: &AlertReport) {
            self.reports.lock().unwrap().push(report.clone());
        }
    }

    pub(crate) fn seed(fake: &MemoryBackend, ids: &[(&str, &str, f64)]) {
        let index: Vec<_> = ids.iter().map(|(id, _, _)| *id).collect();
        fake.put_object("detections/detection_index.json", json!(index));
        for (id, stage, light) in ids {
            fake.put_object(&format!("detections/{id}/Raw.jpg"), json!(null));
            fake.put_object(&format!("detections/{id}/Detected.jpg"), json!(null));
            fake.put_object(
                &format!("detections/{id}/environment_data.json"),
                environment_doc(*light),
            );
            fake.put_object(
                &format!("detections/{id}/growth_parameters.json"),
                growth_doc(stage, "None"),
            );
        }
    }

    pub(crate) fn test_settings(name: &str) -> Arc<SettingsStore> {
        let path = std::env::temp_dir()
            .join(format!("agrisense-dashboard-{}-{name}", std::process::id()))
            .join("settings.json");
        Arc::new(SettingsStore::new(path).unwrap())
    }

    #[tokio::test]
    async fn refresh_alerts_once_per_new_record() {
        let fake = MemoryBackend::new();
        seed(
            &fake,
            &[
                ("2024-01-01_10-00-00", "Seedling", 600.0),
                ("2024-01-05_10-00-00", "Vegetative", 250.0),
            ],
        );
        let notifier = Arc::new(RecordingNotifier::default());
        let dashboard = Dashboard::new(fake.backend(), test_settings("once"), notifier.clone());

        assert_eq!(
            dashboard.refresh().await,
            RefreshOutcome::Refreshed {
                records: 2,
                alerted: true
            }
        );
        assert_eq!(
            dashboard.refresh().await,
            RefreshOutcome::Refreshed {
                records: 2,
                alerted: false
            }
        );

        let reports = notifier.reports.lock().unwrap().clone();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].message(), "Warning: Low light intensity (250.0 lux)");

        let snapshot = dashboard.snapshot().await;
        assert_eq!(snapshot.history.len(), 2);
        assert!(snapshot.history[1].stage_transition.is_some());
        assert_eq!(
            snapshot.alert_state.last_seen_id.as_deref(),
            Some("2024-01-05_10-00-00")
        );
        assert!(snapshot.latest_alert.is_some());
        assert!(snapshot.refreshed_at.is_some());
    }

    #[tokio::test]
    async fn overlapping_refreshes_fetch_once() {
        let fake = MemoryBackend::new();
        seed(&fake, &[("2024-01-01_10-00-00", "Seedling", 600.0)]);
        fake.set_fetch_delay(Duration::from_millis(50));
        let dashboard = Dashboard::new(
            fake.backend(),
            test_settings("overlap"),
            Arc::new(RecordingNotifier::default()),
        );

        let (first, second) = tokio::join!(dashboard.refresh(), dashboard.refresh());

        let outcomes = [first, second];
        assert!(outcomes.contains(&RefreshOutcome::Skipped));
        assert!(outcomes.contains(&RefreshOutcome::Refreshed {
            records: 1,
            alerted: false
        }));
        assert_eq!(fake.index_fetches(), 1);
    }
}
