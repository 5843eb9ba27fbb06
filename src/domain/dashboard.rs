// Dashboard view domain model
use super::hotspot::{ThermalDistribution, ZoneHotspotRecord};
use super::mission::MissionPerformance;
use super::telemetry::{ChartData, TileData};
use serde::Serialize;

/// Everything a renderer needs for one refresh, copied out of the engine.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub live: bool,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
    pub hotspots: Vec<ZoneHotspotRecord>,
    pub distribution: ThermalDistribution,
    /// Radar axes, each out of 100.
    pub performance: MissionPerformance,
    /// Colour scale bounds for the thermal image, `(low, high)` in °C.
    pub thermal_scale: (f64, f64),
    pub recording: Option<String>,
}

impl DashboardView {
    pub fn tile(&self, id: &str) -> Option<&TileData> {
        self.tiles.iter().find(|t| t.id == id)
    }
}
