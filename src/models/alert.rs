use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    Warning,
    Alert,
    Info,
}

impl AlertKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::Warning => "Warning",
            AlertKind::Alert => "Alert",
            AlertKind::Info => "Info",
        }
    }
}

/// Alert rules, declared in the order they are evaluated and displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AlertRule {
    LightIntensity,
    AirTemperature,
    WaterTemperature,
    Humidity,
    Pest,
    MatureStage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub kind: AlertKind,
    pub rule: AlertRule,
    pub message: String,
}

/// Alerts raised for one newly observed record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlertReport {
    pub record_id: String,
    pub alerts: Vec<Alert>,
}

impl AlertReport {
    /// Display text: one alert per line, in rule order.
    pub fn message(&self) -> String {
        self.alerts
            .iter()
            .map(|alert| alert.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// De-duplication guard threaded through successive alert checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AlertState {
    pub last_seen_id: Option<String>,
}
