// Dashboard service - Projects engine state into renderer-ready views
use crate::application::engine::TelemetryEngine;
use crate::domain::dashboard::DashboardView;
use crate::domain::sample::{EnvironmentalSample, Timestamped};
use crate::domain::telemetry::{ChartData, ChartKind, SeriesData, TileData, TimeSeriesPoint};

/// Bar charts only show the tail of the window.
const BAR_CHART_POINTS: usize = 6;

struct SeriesField {
    id: &'static str,
    name: &'static str,
    value: fn(&EnvironmentalSample) -> f64,
}

const TEMP: SeriesField = SeriesField {
    id: "temp",
    name: "Temperature (°C)",
    value: temp_of,
};
const HUMIDITY: SeriesField = SeriesField {
    id: "humidity",
    name: "Humidity (%)",
    value: humidity_of,
};
const WIND: SeriesField = SeriesField {
    id: "windSpeed",
    name: "Wind Speed (m/s)",
    value: wind_of,
};

fn temp_of(sample: &EnvironmentalSample) -> f64 {
    sample.temp
}

fn humidity_of(sample: &EnvironmentalSample) -> f64 {
    sample.humidity
}

fn wind_of(sample: &EnvironmentalSample) -> f64 {
    sample.wind_speed
}

#[derive(Clone, Default)]
pub struct DashboardService;

impl DashboardService {
    pub fn new() -> Self {
        Self
    }

    pub fn build_view(&self, engine: &TelemetryEngine) -> DashboardView {
        let tiles = self.build_tiles(engine);
        let charts = vec![self.build_environmental_chart(engine)];

        DashboardView {
            title: engine.title().to_string(),
            live: engine.is_live(),
            tiles,
            charts,
            hotspots: engine.hotspots(),
            distribution: engine.thermal_distribution(),
            performance: engine.mission_performance(),
            thermal_scale: engine.display_range(),
            recording: engine.recording_badge(),
        }
    }

    fn build_tiles(&self, engine: &TelemetryEngine) -> Vec<TileData> {
        let flight = engine.flight_telemetry();
        let thermal = engine.thermal_snapshot();
        let mission = engine.mission_stats();

        let mut tiles = vec![
            TileData::new("battery", "Battery Level", "%", flight.battery, 0),
            TileData::new("signal", "Signal", "%", flight.signal, 0),
            TileData::new("gps", "Satellites", "", flight.gps_sat_count as f64, 0),
            TileData::new("heading", "Heading", "°", flight.heading, 0),
            TileData::new("droneWind", "Wind", " m/s", flight.wind_speed, 1),
            TileData::new("droneFlightTime", "Flight Time", " s", flight.flight_time_sec as f64, 0),
            TileData::new("thermalMax", "Max", "°C", thermal.max_temp, 1),
            TileData::new("thermalMin", "Min", "°C", thermal.min_temp, 1),
            TileData::new("thermalAvg", "Avg", "°C", thermal.avg_temp, 1),
            TileData::new("areaCovered", "Area Covered", " km²", mission.area_covered_km2, 1),
            TileData::new("imagesCaptured", "Images Captured", "", mission.images_captured as f64, 0),
            TileData::new("hotspotsDetected", "Hotspots Detected", "", mission.hotspots_detected as f64, 0),
            TileData::new("missionSuccess", "Mission Success", "%", mission.mission_success_pct, 1),
            TileData::new("missionFlightTime", "Flight Time", " s", mission.flight_time_sec as f64, 0),
            TileData::new("dataProcessed", "Data Processed", " GB", mission.data_processed_gb, 1),
        ];

        if let Some(overall) = engine.mission_performance().overall() {
            tiles.push(TileData::new("performance", "Mission Performance", "/100", overall, 1));
        }

        // Window aggregates only exist once the buffer has data
        if let Some(temp) = engine.environmental_stats().temp {
            tiles.push(TileData::new("envTempAvg", "Avg Temperature", "°C", temp.avg, 1));
            tiles.push(TileData::new("envTempMax", "Peak Temperature", "°C", temp.max, 1));
        }

        tiles
    }

    fn build_environmental_chart(&self, engine: &TelemetryEngine) -> ChartData {
        let kind = engine.chart_type();
        let samples = engine.environmental_series();

        let (window, fields): (&[Timestamped<EnvironmentalSample>], Vec<SeriesField>) = match kind {
            ChartKind::Line => (samples.as_slice(), vec![TEMP, HUMIDITY, WIND]),
            ChartKind::Area => (samples.as_slice(), vec![TEMP, HUMIDITY]),
            ChartKind::Bar => {
                let start = samples.len().saturating_sub(BAR_CHART_POINTS);
                (&samples[start..], vec![TEMP])
            }
        };

        let series = fields
            .into_iter()
            .map(|field| {
                let points = window
                    .iter()
                    .map(|entry| TimeSeriesPoint::new(entry.time_ms(), (field.value)(&entry.sample)))
                    .collect();
                SeriesData::new(field.id, field.name, points)
            })
            .collect();

        ChartData::new(
            "environmental",
            "Environmental Data",
            kind,
            engine.time_range(),
            series,
        )
    }
}
