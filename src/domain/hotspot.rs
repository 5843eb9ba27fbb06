// Thermal hotspot domain models
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete classification of a zone's average temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneHotspotRecord {
    pub area: String,
    pub count: u32,
    pub avg_temp: f64,
    pub severity: Severity,
    pub risk: u8,
}

/// Temperature band of the thermal distribution histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureBand {
    Normal,
    Elevated,
    High,
    Critical,
}

impl TemperatureBand {
    pub const ALL: [TemperatureBand; 4] = [
        TemperatureBand::Normal,
        TemperatureBand::Elevated,
        TemperatureBand::High,
        TemperatureBand::Critical,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TemperatureBand::Normal => "Normal (0-30°C)",
            TemperatureBand::Elevated => "Elevated (30-50°C)",
            TemperatureBand::High => "High (50-70°C)",
            TemperatureBand::Critical => "Critical (>70°C)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandShare {
    pub band: TemperatureBand,
    pub share: f64,
}

/// Percentage share per temperature band; shares always total 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalDistribution {
    pub buckets: [BandShare; 4],
}

impl ThermalDistribution {
    pub fn share(&self, band: TemperatureBand) -> f64 {
        self.buckets
            .iter()
            .find(|b| b.band == band)
            .map(|b| b.share)
            .unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.buckets.iter().map(|b| b.share).sum()
    }
}
