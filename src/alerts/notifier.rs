use log::warn;

use crate::models::AlertReport;

pub const ALERT_TITLE: &str = "AgriSense Alert";

/// Delivers alert reports to the user. The app shell plugs in its local
/// notification bridge; headless runs use [`LogNotifier`].
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, report: &AlertReport);
}

#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, report: &AlertReport) {
        for line in report.message().lines() {
            warn!("{title} [{}]: {line}", report.record_id);
        }
    }
}
