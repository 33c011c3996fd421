//! Telemetry hub
//!
//! Holds the most recent decoded sensor sample for the rest of the
//! application. Samples are replaced wholesale; readers either see the
//! previous complete sample or the new one, never a mix of fields.

use farad_protocol::TelemetrySample;

/// Latest-sample store feeding the broadcast path and the animation engine
#[derive(Debug, Default)]
pub struct TelemetryHub {
    latest: Option<TelemetrySample>,
}

impl TelemetryHub {
    pub const fn new() -> Self {
        Self { latest: None }
    }

    /// Replace the held sample
    pub fn update(&mut self, sample: TelemetrySample) {
        self.latest = Some(sample);
    }

    /// The most recent sample, if any arrived yet
    pub fn latest(&self) -> Option<&TelemetrySample> {
        self.latest.as_ref()
    }

    /// Battery fraction for the color ramp, 0.0 before the first sample
    pub fn battery_fraction(&self) -> f32 {
        self.latest.as_ref().map_or(0.0, |s| s.battery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(battery: f32) -> TelemetrySample {
        TelemetrySample {
            voltage: 13.2,
            ac_voltage: 229.8,
            temperature: 31.5,
            battery,
            current: 2.4,
        }
    }

    #[test]
    fn test_empty_hub_reports_zero_battery() {
        let hub = TelemetryHub::new();
        assert!(hub.latest().is_none());
        assert_eq!(hub.battery_fraction(), 0.0);
    }

    #[test]
    fn test_update_replaces_wholesale() {
        let mut hub = TelemetryHub::new();
        hub.update(sample(0.8));
        assert_eq!(hub.battery_fraction(), 0.8);

        hub.update(sample(0.25));
        let latest = hub.latest().unwrap();
        assert_eq!(latest.battery, 0.25);
        assert_eq!(latest.voltage, 13.2);
    }
}
