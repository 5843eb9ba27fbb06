use crate::application::mission_accumulator::MissionModel;
use crate::application::rolling_buffer::DEFAULT_CAPACITY;
use crate::application::sample_source::{EnvironmentalModel, FlightModel, ThermalModel};
use crate::application::scheduler::SchedulerConfig;
use crate::application::stats::{ThermalDisplayRange, ZoneObservation};
use crate::domain::mission::{default_performance_metrics, PerformanceMetric};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config/telemetry";
const ENV_PREFIX: &str = "DRONE_TELEMETRY";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub title: String,
    pub scheduler: SchedulerConfig,
    pub buffer: BufferConfig,
    pub noise: NoiseConfig,
    pub environmental: EnvironmentalModel,
    pub flight: FlightModel,
    pub thermal: ThermalModel,
    pub mission: MissionModel,
    pub display: ThermalDisplayRange,
    pub zones: Vec<ZoneObservation>,
    /// Axes of the mission performance radar, each scored out of 100.
    pub performance: Vec<PerformanceMetric>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BufferConfig {
    pub capacity: usize,
    /// Fill the environmental window on startup instead of starting empty.
    pub prefill: bool,
    /// JSON Lines file to seed the window from. Takes precedence over `prefill`.
    pub fixture: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NoiseConfig {
    /// Fixed seed for reproducible runs; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Drone Mission Dashboard".to_string(),
            scheduler: SchedulerConfig::default(),
            buffer: BufferConfig {
                capacity: DEFAULT_CAPACITY,
                prefill: true,
                fixture: None,
            },
            noise: NoiseConfig::default(),
            environmental: EnvironmentalModel::default(),
            flight: FlightModel::default(),
            thermal: ThermalModel::default(),
            mission: MissionModel::default(),
            display: ThermalDisplayRange::default(),
            zones: vec![
                ZoneObservation::new("Industrial Zone", 18, 65.2),
                ZoneObservation::new("Residential Area", 5, 28.7),
                ZoneObservation::new("Commercial District", 12, 45.1),
                ZoneObservation::new("Forest Sector", 3, 22.4),
                ZoneObservation::new("Power Plant", 25, 78.8),
                ZoneObservation::new("Warehouse Complex", 8, 38.9),
            ],
            performance: default_performance_metrics(),
        }
    }
}

/// Built-in defaults, then `config/telemetry.{toml,json,...}` if present, then
/// `DRONE_TELEMETRY__SECTION__KEY` environment overrides.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::Config::try_from(&AppConfig::default())?)
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
