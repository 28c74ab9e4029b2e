use chrono::{DateTime, SecondsFormat, Utc};

/// Falls back to `default` for missing or blank strings.
pub fn non_empty_or(value: Option<String>, default: &str) -> String {
    match value {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => default.to_string(),
    }
}

/// Clamps a JSON number to a non-negative whole count.
pub fn to_count(value: Option<f64>) -> u32 {
    match value {
        Some(raw) if raw.is_finite() && raw > 0.0 => raw.round().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Normalizes an RFC 3339 timestamp to UTC with millisecond precision.
/// Unparseable input is returned unchanged.
pub fn normalize_timestamp(value: &str) -> String {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| {
            dt.with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true)
        })
        .unwrap_or_else(|_| value.to_string())
}

/// Wraps an inline base64 JPEG as a `data:` URI the UI can render directly.
/// Payloads that already carry a `data:` prefix pass through.
pub fn image_data_uri(base64: &str) -> String {
    if base64.starts_with("data:") {
        base64.to_string()
    } else {
        format!("data:image/jpeg;base64,{base64}")
    }
}
