use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Temperature-control category of a storage zone.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TemperatureZone {
    Ambient,
    Refrigerated,
    Frozen,
}

/// Unit a reading was reported in. Policy thresholds are defined in Celsius;
/// Fahrenheit readings are normalized before comparison.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn to_celsius(self, value: f64) -> f64 {
        match self {
            Self::Celsius => value,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// Acceptable range for one zone, in Celsius. Boundary values are compliant.
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ZoneThreshold {
    pub min: f64,
    pub max: f64,
}

impl ZoneThreshold {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// Absolute deviation from the nearest bound; zero when in range.
    pub fn deviation(&self, value: f64) -> f64 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }
}

/// Per-deployment temperature compliance policy. The defaults here are
/// illustrative and overridable through configuration.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TemperaturePolicy {
    #[serde(default = "default_ambient")]
    pub ambient: ZoneThreshold,
    #[serde(default = "default_refrigerated")]
    pub refrigerated: ZoneThreshold,
    #[serde(default = "default_frozen")]
    pub frozen: ZoneThreshold,
    /// Deviation beyond `ratio × range width` escalates severity to high.
    #[serde(default = "default_high_deviation_ratio")]
    pub high_deviation_ratio: f64,
}

fn default_ambient() -> ZoneThreshold {
    ZoneThreshold {
        min: 15.0,
        max: 25.0,
    }
}

fn default_refrigerated() -> ZoneThreshold {
    ZoneThreshold { min: 2.0, max: 8.0 }
}

fn default_frozen() -> ZoneThreshold {
    ZoneThreshold {
        min: -25.0,
        max: -15.0,
    }
}

fn default_high_deviation_ratio() -> f64 {
    0.5
}

impl Default for TemperaturePolicy {
    fn default() -> Self {
        Self {
            ambient: default_ambient(),
            refrigerated: default_refrigerated(),
            frozen: default_frozen(),
            high_deviation_ratio: default_high_deviation_ratio(),
        }
    }
}

/// Outcome of evaluating a reading that violated its zone threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct ThresholdViolation {
    pub severity: AlertSeverity,
    pub value_celsius: f64,
    pub deviation: f64,
}

impl TemperaturePolicy {
    pub fn threshold(&self, zone: TemperatureZone) -> ZoneThreshold {
        match zone {
            TemperatureZone::Ambient => self.ambient,
            TemperatureZone::Refrigerated => self.refrigerated,
            TemperatureZone::Frozen => self.frozen,
        }
    }

    /// Evaluates a raw reading against its zone. Returns `None` when the
    /// normalized value sits within the acceptable range, boundaries included.
    pub fn evaluate(
        &self,
        value: f64,
        unit: TemperatureUnit,
        zone: TemperatureZone,
    ) -> Option<ThresholdViolation> {
        let celsius = unit.to_celsius(value);
        let threshold = self.threshold(zone);
        let deviation = threshold.deviation(celsius);
        if deviation <= 0.0 {
            return None;
        }
        let severity = if deviation > self.high_deviation_ratio * threshold.width() {
            AlertSeverity::High
        } else {
            AlertSeverity::Medium
        };
        Some(ThresholdViolation {
            severity,
            value_celsius: celsius,
            deviation,
        })
    }
}
