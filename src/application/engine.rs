// Telemetry engine - Owns every panel and routes scheduler ticks to them
use crate::application::noise::NoiseSource;
use crate::application::panels::{EnvironmentalPanel, EnvironmentalStats, FlightPanel, ThermalPanel};
use crate::application::sample_source::SampleGenerationError;
use crate::application::scheduler::{RefreshScheduler, Subsystem};
use crate::domain::hotspot::{ThermalDistribution, ZoneHotspotRecord};
use crate::domain::mission::{MissionPerformance, MissionStats};
use crate::domain::sample::{EnvironmentalSample, FlightTelemetrySample, ThermalSample, Timestamped};
use crate::domain::telemetry::{ChartKind, TimeRange};
use crate::infrastructure::config::AppConfig;
use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Applied,
    /// Paused, or the subsystem is switched off.
    Idle,
    Rejected(SampleGenerationError),
}

impl TickOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, TickOutcome::Applied)
    }
}

/// Synchronous core. Nothing in here waits on a clock: callers hand in `now`
/// and decide when a subsystem ticks.
pub struct TelemetryEngine {
    title: String,
    scheduler: RefreshScheduler,
    environmental: EnvironmentalPanel,
    flight: FlightPanel,
    thermal: ThermalPanel,
    noise: Box<dyn NoiseSource>,
}

impl TelemetryEngine {
    pub fn new(config: &AppConfig, noise: Box<dyn NoiseSource>) -> Self {
        Self {
            title: config.title.clone(),
            scheduler: RefreshScheduler::new(&config.scheduler),
            environmental: EnvironmentalPanel::new(
                config.environmental.clone(),
                config.buffer.capacity,
                config.mission.clone(),
                &config.zones,
                &config.performance,
            ),
            flight: FlightPanel::new(config.flight.clone()),
            thermal: ThermalPanel::new(config.thermal.clone(), config.display.clone()),
            noise,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn scheduler(&self) -> &RefreshScheduler {
        &self.scheduler
    }

    /// Run one tick of `subsystem` if the scheduler lets it through.
    ///
    /// A tick either lands completely or not at all; a generation failure
    /// leaves the panel exactly as it was.
    pub fn tick(&mut self, subsystem: Subsystem, now: DateTime<Utc>) -> TickOutcome {
        if !self.scheduler.admit_tick(subsystem) {
            tracing::trace!("Skipping {} tick: idle", subsystem);
            return TickOutcome::Idle;
        }

        let noise = self.noise.as_mut();
        let result = match subsystem {
            Subsystem::Environmental => self.environmental.tick(now, noise),
            Subsystem::FlightTelemetry => self.flight.tick(noise),
            Subsystem::ThermalSnapshot => self.thermal.tick(noise),
            Subsystem::RecordingClock => {
                self.thermal.stopwatch_mut().tick();
                Ok(())
            }
        };

        match result {
            Ok(()) => {
                tracing::debug!(
                    "{} tick #{} applied",
                    subsystem,
                    self.scheduler.ticks(subsystem)
                );
                TickOutcome::Applied
            }
            Err(e) => {
                tracing::warn!("Rejected {} sample, keeping previous state: {}", subsystem, e);
                TickOutcome::Rejected(e)
            }
        }
    }

    /// Flip the shared gate. Returns whether anything changed.
    pub fn set_live(&mut self, live: bool) -> bool {
        let changed = if live {
            self.scheduler.start()
        } else {
            self.scheduler.stop()
        };
        if changed {
            tracing::info!("Live updates {}", if live { "resumed" } else { "paused" });
        }
        changed
    }

    pub fn is_live(&self) -> bool {
        self.scheduler.is_live()
    }

    pub fn set_chart_type(&mut self, kind: ChartKind) {
        self.environmental.chart_kind = kind;
    }

    pub fn chart_type(&self) -> ChartKind {
        self.environmental.chart_kind
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.environmental.time_range = range;
    }

    pub fn time_range(&self) -> TimeRange {
        self.environmental.time_range
    }

    /// Refill the environmental window with `capacity` fresh samples ending at `now`.
    pub fn regenerate_now(&mut self, now: DateTime<Utc>) -> Result<(), SampleGenerationError> {
        let count = self.environmental.capacity();
        self.regenerate(count, now)
    }

    pub fn regenerate(
        &mut self,
        count: usize,
        now: DateTime<Utc>,
    ) -> Result<(), SampleGenerationError> {
        let period = Duration::from_std(self.scheduler.period(Subsystem::Environmental))
            .unwrap_or_else(|_| Duration::seconds(5));

        match self
            .environmental
            .regenerate(count, now, period, self.noise.as_mut())
        {
            Ok(()) => {
                tracing::info!("Regenerated environmental series with {} samples", count);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Regenerate failed, keeping previous series: {}", e);
                Err(e)
            }
        }
    }

    /// Seed the environmental window from previously recorded samples.
    pub fn load_environmental_series(&mut self, series: Vec<Timestamped<EnvironmentalSample>>) {
        let count = series.len();
        self.environmental.load(series);
        tracing::info!("Loaded {} recorded environmental samples", count);
    }

    pub fn start_recording(&mut self) {
        self.thermal.stopwatch_mut().start();
        if self.scheduler.set_enabled(Subsystem::RecordingClock, true) {
            tracing::info!("Thermal recording started");
        }
    }

    pub fn stop_recording(&mut self) {
        self.thermal.stopwatch_mut().stop();
        if self.scheduler.set_enabled(Subsystem::RecordingClock, false) {
            tracing::info!("Thermal recording stopped");
        }
    }

    pub fn set_manual_display_range(&mut self, low: f64, high: f64) {
        self.thermal.display.set_manual(low, high);
    }

    pub fn set_auto_display_range(&mut self, auto: bool) {
        self.thermal.display.auto = auto;
    }

    pub fn display_range(&self) -> (f64, f64) {
        self.thermal.display_range()
    }

    pub fn set_mission_success(&mut self, pct: f64) {
        self.environmental.set_mission_success(pct);
    }

    pub fn environmental_series(&self) -> Vec<Timestamped<EnvironmentalSample>> {
        self.environmental.series()
    }

    pub fn environmental_stats(&self) -> EnvironmentalStats {
        self.environmental.stats()
    }

    pub fn flight_telemetry(&self) -> FlightTelemetrySample {
        self.flight.latest()
    }

    pub fn thermal_snapshot(&self) -> ThermalSample {
        self.thermal.latest()
    }

    pub fn mission_stats(&self) -> MissionStats {
        self.environmental.mission().clone()
    }

    pub fn hotspots(&self) -> Vec<ZoneHotspotRecord> {
        self.environmental.hotspots().to_vec()
    }

    pub fn mission_performance(&self) -> MissionPerformance {
        self.environmental.performance().clone()
    }

    pub fn thermal_distribution(&self) -> ThermalDistribution {
        self.environmental.distribution().clone()
    }

    pub fn recording_seconds(&self) -> u64 {
        self.thermal.stopwatch().elapsed_secs()
    }

    pub fn recording_badge(&self) -> Option<String> {
        self.thermal.stopwatch().badge()
    }
}
