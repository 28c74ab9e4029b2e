use crate::alerts::config::{AlertThresholds, Band};
use crate::models::{
    latest_detection, Alert, AlertKind, AlertReport, AlertRule, AlertState, DetectionRecord,
    GrowthStage,
};

/// Evaluates every alert rule against one record. Rules are independent; the
/// result keeps the fixed rule order.
pub fn evaluate_alerts(record: &DetectionRecord, thresholds: &AlertThresholds) -> Vec<Alert> {
    let env = &record.environment;
    let mut alerts = Vec::new();

    alerts.extend(band_warning(
        AlertRule::LightIntensity,
        "light intensity",
        env.light_intensity_lux,
        " lux",
        thresholds.light_intensity_lux,
    ));
    alerts.extend(band_warning(
        AlertRule::AirTemperature,
        "air temperature",
        env.air_temperature_c,
        "°C",
        thresholds.air_temperature_c,
    ));
    alerts.extend(band_warning(
        AlertRule::WaterTemperature,
        "water temperature",
        env.water_temperature_c,
        "°C",
        thresholds.water_temperature_c,
    ));
    alerts.extend(band_warning(
        AlertRule::Humidity,
        "humidity",
        env.humidity_percent,
        "%",
        thresholds.humidity_percent,
    ));

    if record.growth.has_pest() {
        alerts.push(Alert {
            kind: AlertKind::Alert,
            rule: AlertRule::Pest,
            message: format!(
                "{}: Pest detected ({})",
                AlertKind::Alert.as_str(),
                record.growth.pest_detected
            ),
        });
    }

    if record.growth.stage() == Some(GrowthStage::Mature) {
        alerts.push(Alert {
            kind: AlertKind::Info,
            rule: AlertRule::MatureStage,
            message: format!(
                "{}: Plants have reached the Mature stage and are ready for harvest",
                AlertKind::Info.as_str()
            ),
        });
    }

    alerts
}

fn band_warning(rule: AlertRule, label: &str, value: f64, unit: &str, band: Band) -> Option<Alert> {
    let level = if value < band.low {
        "Low"
    } else if value > band.high {
        "High"
    } else {
        return None;
    };

    Some(Alert {
        kind: AlertKind::Warning,
        rule,
        message: format!(
            "{}: {level} {label} ({value:.1}{unit})",
            AlertKind::Warning.as_str()
        ),
    })
}

/// Runs the alert rules on the latest record, once per newly observed id.
///
/// Returns the updated guard state and a report when the new record raised
/// at least one alert. A record that was already seen yields no report, so
/// re-fetching the same latest record never re-triggers a dismissed alert.
pub fn check_latest(
    state: &AlertState,
    records: &[DetectionRecord],
    thresholds: &AlertThresholds,
) -> (AlertState, Option<AlertReport>) {
    let Some(latest) = latest_detection(records) else {
        return (state.clone(), None);
    };

    if state.last_seen_id.as_deref() == Some(latest.id.as_str()) {
        return (state.clone(), None);
    }

    let next_state = AlertState {
        last_seen_id: Some(latest.id.clone()),
    };
    let alerts = evaluate_alerts(latest, thresholds);
    if alerts.is_empty() {
        return (next_state, None);
    }

    (
        next_state,
        Some(AlertReport {
            record_id: latest.id.clone(),
            alerts,
        }),
    )
}
