use serde::{Deserialize, Serialize};

/// Acceptable range for one environment signal. Values strictly below
/// `low` or strictly above `high` raise a warning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }
}

/// Environment thresholds for the alert rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AlertThresholds {
    pub light_intensity_lux: Band,
    pub air_temperature_c: Band,
    pub water_temperature_c: Band,
    pub humidity_percent: Band,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            light_intensity_lux: Band::new(500.0, 10_000.0),
            air_temperature_c: Band::new(15.0, 35.0),
            water_temperature_c: Band::new(15.0, 30.0),
            humidity_percent: Band::new(40.0, 80.0),
        }
    }
}

impl AlertThresholds {
    /// Each band with a readable name, in rule order.
    pub fn bands(&self) -> [(&'static str, Band); 4] {
        [
            ("light intensity", self.light_intensity_lux),
            ("air temperature", self.air_temperature_c),
            ("water temperature", self.water_temperature_c),
            ("humidity", self.humidity_percent),
        ]
    }

    /// Every bound must be finite and no band may be inverted.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, band) in self.bands() {
            if !band.low.is_finite() || !band.high.is_finite() {
                anyhow::bail!("{name}: bounds must be finite numbers");
            }
            if band.low > band.high {
                anyhow::bail!("{name}: low bound exceeds high bound");
            }
        }
        Ok(())
    }
}
