// Derived statistics: severity tiers, risk, distributions and window aggregates
use crate::domain::hotspot::{
    BandShare, Severity, TemperatureBand, ThermalDistribution, ZoneHotspotRecord,
};
use crate::domain::sample::{ThermalSample, Timestamped};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

pub const MEDIUM_TEMP: f64 = 30.0;
pub const HIGH_TEMP: f64 = 50.0;
pub const CRITICAL_TEMP: f64 = 70.0;

const RISK_PER_DEGREE: f64 = 1.2;

/// Severity tier for an average temperature. Boundaries belong to the higher tier.
pub fn classify_severity(avg_temp: f64) -> Severity {
    if avg_temp >= CRITICAL_TEMP {
        Severity::Critical
    } else if avg_temp >= HIGH_TEMP {
        Severity::High
    } else if avg_temp >= MEDIUM_TEMP {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Risk score in [0, 100], `round(avg_temp * 1.2)` saturated at both ends.
pub fn derive_risk(avg_temp: f64) -> u8 {
    (avg_temp * RISK_PER_DEGREE).round().clamp(0.0, 100.0) as u8
}

pub fn band_of(temp: f64) -> TemperatureBand {
    match classify_severity(temp) {
        Severity::Low => TemperatureBand::Normal,
        Severity::Medium => TemperatureBand::Elevated,
        Severity::High => TemperatureBand::High,
        Severity::Critical => TemperatureBand::Critical,
    }
}

/// Raw per-zone reading before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneObservation {
    pub area: String,
    pub count: u32,
    pub avg_temp: f64,
}

impl ZoneObservation {
    pub fn new(area: &str, count: u32, avg_temp: f64) -> Self {
        Self {
            area: area.to_string(),
            count,
            avg_temp,
        }
    }
}

pub fn hotspot_record(observation: &ZoneObservation) -> ZoneHotspotRecord {
    ZoneHotspotRecord {
        area: observation.area.clone(),
        count: observation.count,
        avg_temp: observation.avg_temp,
        severity: classify_severity(observation.avg_temp),
        risk: derive_risk(observation.avg_temp),
    }
}

/// Classify every zone and order them hottest first (risk, then severity, then name).
pub fn rank_hotspots(observations: &[ZoneObservation]) -> Vec<ZoneHotspotRecord> {
    let mut records: Vec<ZoneHotspotRecord> = observations.iter().map(hotspot_record).collect();
    records.sort_by(|a, b| {
        b.risk
            .cmp(&a.risk)
            .then_with(|| b.severity.cmp(&a.severity))
            .then_with(|| a.area.cmp(&b.area))
    });
    records
}

/// Turn band weights into percentage shares that total exactly 100.
///
/// Negative or non-finite weights count as zero. With nothing to weigh, every
/// band gets an equal share. Rounding drift is absorbed by the largest band.
pub fn distribution_from_weights(weights: [f64; 4]) -> ThermalDistribution {
    let weights = weights.map(|w| if w.is_finite() && w > 0.0 { w } else { 0.0 });
    let total: f64 = weights.iter().sum();

    let mut shares = if total > 0.0 {
        weights.map(|w| w / total * 100.0)
    } else {
        [25.0; 4]
    };

    let drift = 100.0 - shares.iter().sum::<f64>();
    if drift != 0.0 {
        let largest = shares
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(Ordering::Equal))
            .map(|(idx, _)| idx)
            .unwrap_or(0);
        shares[largest] += drift;
    }

    let mut buckets = TemperatureBand::ALL.map(|band| BandShare { band, share: 0.0 });
    for (bucket, share) in buckets.iter_mut().zip(shares) {
        bucket.share = share;
    }
    ThermalDistribution { buckets }
}

/// Share of detected hotspots per temperature band, weighted by zone count.
pub fn hotspot_distribution(records: &[ZoneHotspotRecord]) -> ThermalDistribution {
    let mut weights = [0.0; 4];
    for record in records {
        let idx = band_index(band_of(record.avg_temp));
        weights[idx] += record.count as f64;
    }
    distribution_from_weights(weights)
}

fn band_index(band: TemperatureBand) -> usize {
    match band {
        TemperatureBand::Normal => 0,
        TemperatureBand::Elevated => 1,
        TemperatureBand::High => 2,
        TemperatureBand::Critical => 3,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub latest: f64,
}

/// Aggregate one numeric field across a window. `None` when the window is empty.
pub fn window_stats<'a, S: 'a>(
    samples: impl IntoIterator<Item = &'a Timestamped<S>>,
    field: impl Fn(&S) -> f64,
) -> Option<WindowStats> {
    let mut iter = samples.into_iter();
    let first = field(&iter.next()?.sample);
    let mut stats = WindowStats {
        min: first,
        max: first,
        avg: 0.0,
        latest: first,
    };
    let mut sum = first;
    let mut count = 1usize;

    for entry in iter {
        let value = field(&entry.sample);
        stats.min = stats.min.min(value);
        stats.max = stats.max.max(value);
        stats.latest = value;
        sum += value;
        count += 1;
    }
    stats.avg = sum / count as f64;
    Some(stats)
}

/// Temperature span used to colour the thermal image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalDisplayRange {
    pub sensor_min: f64,
    pub sensor_max: f64,
    pub manual_low: f64,
    pub manual_high: f64,
    pub auto: bool,
}

impl Default for ThermalDisplayRange {
    fn default() -> Self {
        Self {
            sensor_min: -20.0,
            sensor_max: 150.0,
            manual_low: 20.0,
            manual_high: 80.0,
            auto: false,
        }
    }
}

impl ThermalDisplayRange {
    /// Set the manual span; bounds are ordered and kept inside the sensor limits.
    pub fn set_manual(&mut self, low: f64, high: f64) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        self.manual_low = low.clamp(self.sensor_min, self.sensor_max);
        self.manual_high = high.clamp(self.sensor_min, self.sensor_max);
    }

    pub fn resolve(&self, snapshot: &ThermalSample) -> (f64, f64) {
        if self.auto {
            (
                snapshot.min_temp.clamp(self.sensor_min, self.sensor_max),
                snapshot.max_temp.clamp(self.sensor_min, self.sensor_max),
            )
        } else {
            (self.manual_low, self.manual_high)
        }
    }
}
