pub mod config;
pub mod evaluator;
pub mod notifier;

pub use config::{AlertThresholds, Band};
pub use evaluator::{check_latest, evaluate_alerts};
pub use notifier::{LogNotifier, Notifier, ALERT_TITLE};
