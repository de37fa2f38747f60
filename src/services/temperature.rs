use crate::models::{AlertSeverity, TemperaturePolicy, TemperatureUnit, TemperatureZone};

/// Evaluates readings against the configured per-zone thresholds. Pure and
/// synchronous: persistence of readings and alerts belongs to the shipment
/// service, which calls this inside its transaction.
#[derive(Clone, Debug)]
pub struct TemperatureMonitor {
    policy: TemperaturePolicy,
}

/// A violation ready to be persisted as an alert row.
#[derive(Clone, Debug)]
pub struct AlertDraft {
    pub severity: AlertSeverity,
    pub message: String,
}

impl TemperatureMonitor {
    pub fn new(policy: TemperaturePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &TemperaturePolicy {
        &self.policy
    }

    /// Returns an alert draft when the reading violates its zone threshold,
    /// `None` when compliant. Boundary values are compliant.
    pub fn evaluate(
        &self,
        value: f64,
        unit: TemperatureUnit,
        zone: TemperatureZone,
    ) -> Option<AlertDraft> {
        let violation = self.policy.evaluate(value, unit, zone)?;
        let threshold = self.policy.threshold(zone);
        let message = format!(
            "{} reading {:.1}°C outside [{:.1}, {:.1}]°C by {:.1}°C",
            zone, violation.value_celsius, threshold.min, threshold.max, violation.deviation
        );
        Some(AlertDraft {
            severity: violation.severity,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compliant_reading_produces_no_alert() {
        let monitor = TemperatureMonitor::new(TemperaturePolicy::default());
        assert!(monitor
            .evaluate(5.0, TemperatureUnit::Celsius, TemperatureZone::Refrigerated)
            .is_none());
    }

    #[test]
    fn violation_message_names_zone_and_deviation() {
        let monitor = TemperatureMonitor::new(TemperaturePolicy::default());
        let alert = monitor
            .evaluate(9.0, TemperatureUnit::Celsius, TemperatureZone::Refrigerated)
            .unwrap();
        assert_eq!(alert.severity, AlertSeverity::Medium);
        assert_eq!(
            alert.message,
            "refrigerated reading 9.0°C outside [2.0, 8.0]°C by 1.0°C"
        );
    }
}
