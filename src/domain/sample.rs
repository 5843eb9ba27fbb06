// Sensor sample domain models
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PERCENT_MAX: f64 = 100.0;
pub const FULL_TURN_DEG: f64 = 360.0;

/// One reading wrapped with the time it was taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timestamped<S> {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub sample: S,
}

impl<S> Timestamped<S> {
    pub fn new(timestamp: DateTime<Utc>, sample: S) -> Self {
        Self { timestamp, sample }
    }

    pub fn time_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalSample {
    pub temp: f64,
    pub humidity: f64,
    pub wind_speed: f64,
    pub pressure: f64,
}

/// Snake_case on the wire, since it doubles as the `flight.initial` config section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightTelemetrySample {
    pub battery: f64,
    pub signal: f64,
    pub gps_sat_count: u32,
    pub heading: f64,
    pub wind_speed: f64,
    pub flight_time_sec: u64,
}

impl FlightTelemetrySample {
    /// Apply the per-field limits: percentages into [0,100], heading into [0,360),
    /// wind speed floored at zero.
    pub fn clamped(self) -> Self {
        Self {
            battery: clamp_percent(self.battery),
            signal: clamp_percent(self.signal),
            heading: wrap_heading(self.heading),
            wind_speed: self.wind_speed.max(0.0),
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThermalSample {
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_temp: f64,
}

impl ThermalSample {
    /// Enforce `min <= avg <= max`.
    ///
    /// An inverted `min`/`max` pair means the field models are misconfigured;
    /// debug builds stop here, release builds raise `max` to `min`.
    pub fn normalized(self) -> Self {
        debug_assert!(
            self.min_temp <= self.max_temp,
            "thermal min {} above max {}",
            self.min_temp,
            self.max_temp
        );
        let max_temp = self.max_temp.max(self.min_temp);
        Self {
            max_temp,
            min_temp: self.min_temp,
            avg_temp: self.avg_temp.clamp(self.min_temp, max_temp),
        }
    }
}

pub fn clamp_percent(value: f64) -> f64 {
    value.clamp(0.0, PERCENT_MAX)
}

pub fn wrap_heading(heading: f64) -> f64 {
    let wrapped = heading.rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN_DEG { 0.0 } else { wrapped }
}

/// Format a duration as `mm:ss`, the way the recording badge shows it.
pub fn format_mm_ss(total_secs: u64) -> String {
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Format a duration as `m:ss`, the way flight time is shown.
pub fn format_m_ss(total_secs: u64) -> String {
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_wrap_heading() {
        assert_eq!(wrap_heading(245.0), 245.0);
        assert_eq!(wrap_heading(362.5), 2.5);
        assert_eq!(wrap_heading(-5.0), 355.0);
        assert_eq!(wrap_heading(360.0), 0.0);
        assert!(wrap_heading(-1e-18) < FULL_TURN_DEG);
    }

    #[test]
    fn test_flight_sample_clamped() {
        let sample = FlightTelemetrySample {
            battery: -3.0,
            signal: 104.0,
            gps_sat_count: 12,
            heading: 370.0,
            wind_speed: -0.4,
            flight_time_sec: 10,
        }
        .clamped();

        assert_eq!(sample.battery, 0.0);
        assert_eq!(sample.signal, 100.0);
        assert_eq!(sample.heading, 10.0);
        assert_eq!(sample.wind_speed, 0.0);
    }

    #[test]
    fn test_thermal_avg_clamped_into_range() {
        let sample = ThermalSample {
            max_temp: 40.0,
            min_temp: 20.0,
            avg_temp: 44.0,
        }
        .normalized();
        assert_eq!(sample.avg_temp, 40.0);

        let sample = ThermalSample {
            max_temp: 40.0,
            min_temp: 20.0,
            avg_temp: 10.0,
        }
        .normalized();
        assert_eq!(sample.avg_temp, 20.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_mm_ss(5), "00:05");
        assert_eq!(format_mm_ss(754), "12:34");
        assert_eq!(format_m_ss(1247), "20:47");
    }

    #[test]
    fn test_timestamped_serializes_flat() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let point = Timestamped::new(
            ts,
            ThermalSample {
                max_temp: 45.0,
                min_temp: 18.0,
                avg_temp: 32.0,
            },
        );

        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T12:00:00Z");
        assert_eq!(json["maxTemp"], 45.0);
        assert_eq!(point.time_ms(), ts.timestamp_millis());
    }
}
