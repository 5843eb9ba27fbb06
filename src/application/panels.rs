// Panel state: each panel owns its own buffer, accumulator and latest readings
use crate::application::mission_accumulator::{MissionAccumulator, MissionModel};
use crate::application::noise::NoiseSource;
use crate::application::rolling_buffer::RollingWindowBuffer;
use crate::application::sample_source::{
    EnvironmentalModel, FlightModel, SampleGenerationError, SampleSource, ThermalModel,
};
use crate::application::stats::{
    hotspot_distribution, rank_hotspots, window_stats, ThermalDisplayRange, WindowStats,
    ZoneObservation,
};
use crate::application::stopwatch::RecordingStopwatch;
use crate::domain::hotspot::{ThermalDistribution, ZoneHotspotRecord};
use crate::domain::mission::{MissionPerformance, MissionStats, PerformanceMetric};
use crate::domain::sample::{
    EnvironmentalSample, FlightTelemetrySample, ThermalSample, Timestamped,
};
use crate::domain::telemetry::{ChartKind, TimeRange};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Min/max/avg/latest for each environmental field over the current window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EnvironmentalStats {
    pub temp: Option<WindowStats>,
    pub humidity: Option<WindowStats>,
    pub wind_speed: Option<WindowStats>,
    pub pressure: Option<WindowStats>,
}

/// Environmental chart, mission summary and hotspot analysis.
#[derive(Debug)]
pub struct EnvironmentalPanel {
    model: EnvironmentalModel,
    buffer: RollingWindowBuffer<EnvironmentalSample>,
    phase: u64,
    mission: MissionAccumulator,
    hotspots: Vec<ZoneHotspotRecord>,
    distribution: ThermalDistribution,
    performance: MissionPerformance,
    pub chart_kind: ChartKind,
    pub time_range: TimeRange,
}

impl EnvironmentalPanel {
    pub fn new(
        model: EnvironmentalModel,
        capacity: usize,
        mission: MissionModel,
        zones: &[ZoneObservation],
        performance: &[PerformanceMetric],
    ) -> Self {
        let hotspots = rank_hotspots(zones);
        let distribution = hotspot_distribution(&hotspots);
        Self {
            model,
            buffer: RollingWindowBuffer::new(capacity),
            phase: 0,
            mission: MissionAccumulator::new(mission),
            hotspots,
            distribution,
            performance: MissionPerformance::new(performance),
            chart_kind: ChartKind::default(),
            time_range: TimeRange::default(),
        }
    }

    /// Push one sample and advance the mission counters, or change nothing.
    pub fn tick(
        &mut self,
        now: DateTime<Utc>,
        noise: &mut dyn NoiseSource,
    ) -> Result<(), SampleGenerationError> {
        let prev = self.buffer.latest().map(|entry| &entry.sample);
        let sample = self.model.next(prev, self.phase, noise)?;
        let mission = self.mission.prepare(noise)?;

        self.buffer.push(Timestamped::new(now, sample));
        self.phase = self.phase.wrapping_add(1);
        self.mission.commit(mission);
        Ok(())
    }

    /// Rebuild the whole window: `count` samples ending at `now`, `period` apart.
    ///
    /// Only the newest `capacity` samples are generated; the wave phase still
    /// advances by the full `count`.
    pub fn regenerate(
        &mut self,
        count: usize,
        now: DateTime<Utc>,
        period: Duration,
        noise: &mut dyn NoiseSource,
    ) -> Result<(), SampleGenerationError> {
        let kept = count.min(self.buffer.capacity());
        let first = count - kept;

        let mut series: Vec<Timestamped<EnvironmentalSample>> = Vec::with_capacity(kept);
        for i in first..count {
            let steps_back = count - 1 - i;
            let timestamp = i32::try_from(steps_back)
                .ok()
                .and_then(|steps| period.checked_mul(steps))
                .and_then(|offset| now.checked_sub_signed(offset))
                .ok_or(SampleGenerationError::TimestampOutOfRange { steps_back })?;
            let prev = series.last().map(|entry| &entry.sample);
            let phase = self.phase.wrapping_add(i as u64);
            let sample = self.model.next(prev, phase, noise)?;
            series.push(Timestamped::new(timestamp, sample));
        }

        self.buffer.replace(series);
        self.phase = self.phase.wrapping_add(count as u64);
        Ok(())
    }

    /// Replace the window with recorded samples, sorted oldest first.
    pub fn load(&mut self, mut series: Vec<Timestamped<EnvironmentalSample>>) {
        series.sort_by_key(|entry| entry.timestamp);
        self.phase = self.phase.wrapping_add(series.len() as u64);
        self.buffer.replace(series);
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    pub fn series(&self) -> Vec<Timestamped<EnvironmentalSample>> {
        self.buffer.snapshot()
    }

    pub fn stats(&self) -> EnvironmentalStats {
        if self.buffer.is_empty() {
            return EnvironmentalStats::default();
        }
        EnvironmentalStats {
            temp: window_stats(self.buffer.iter(), |s| s.temp),
            humidity: window_stats(self.buffer.iter(), |s| s.humidity),
            wind_speed: window_stats(self.buffer.iter(), |s| s.wind_speed),
            pressure: window_stats(self.buffer.iter(), |s| s.pressure),
        }
    }

    pub fn mission(&self) -> &MissionStats {
        self.mission.stats()
    }

    pub fn set_mission_success(&mut self, pct: f64) {
        self.mission.set_mission_success(pct);
    }

    pub fn hotspots(&self) -> &[ZoneHotspotRecord] {
        &self.hotspots
    }

    pub fn distribution(&self) -> &ThermalDistribution {
        &self.distribution
    }

    pub fn performance(&self) -> &MissionPerformance {
        &self.performance
    }
}

/// Drone connection panel: the latest flight telemetry reading.
#[derive(Debug)]
pub struct FlightPanel {
    model: FlightModel,
    latest: FlightTelemetrySample,
    phase: u64,
}

impl FlightPanel {
    pub fn new(model: FlightModel) -> Self {
        let latest = model.initial.clamped();
        Self {
            model,
            latest,
            phase: 0,
        }
    }

    pub fn tick(&mut self, noise: &mut dyn NoiseSource) -> Result<(), SampleGenerationError> {
        self.latest = self.model.next(Some(&self.latest), self.phase, noise)?;
        self.phase += 1;
        Ok(())
    }

    pub fn latest(&self) -> FlightTelemetrySample {
        self.latest
    }
}

/// Thermal camera panel: instantaneous readings plus the recording stopwatch.
#[derive(Debug)]
pub struct ThermalPanel {
    model: ThermalModel,
    latest: ThermalSample,
    phase: u64,
    stopwatch: RecordingStopwatch,
    pub display: ThermalDisplayRange,
}

impl ThermalPanel {
    pub fn new(model: ThermalModel, display: ThermalDisplayRange) -> Self {
        let latest = ThermalSample {
            max_temp: model.max_temp.base,
            min_temp: model.min_temp.base,
            avg_temp: model.avg_temp.base,
        }
        .normalized();
        Self {
            model,
            latest,
            phase: 0,
            stopwatch: RecordingStopwatch::new(),
            display,
        }
    }

    pub fn tick(&mut self, noise: &mut dyn NoiseSource) -> Result<(), SampleGenerationError> {
        self.latest = self.model.next(Some(&self.latest), self.phase, noise)?;
        self.phase += 1;
        Ok(())
    }

    pub fn latest(&self) -> ThermalSample {
        self.latest
    }

    pub fn stopwatch(&self) -> &RecordingStopwatch {
        &self.stopwatch
    }

    pub fn stopwatch_mut(&mut self) -> &mut RecordingStopwatch {
        &mut self.stopwatch
    }

    pub fn display_range(&self) -> (f64, f64) {
        self.display.resolve(&self.latest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::noise::{RngNoise, ScriptedNoise};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn environmental_panel() -> EnvironmentalPanel {
        EnvironmentalPanel::new(
            EnvironmentalModel::default(),
            20,
            MissionModel::default(),
            &[ZoneObservation::new("Power Plant", 25, 78.8)],
            &[PerformanceMetric::new("Coverage", 95.0)],
        )
    }

    #[test]
    fn test_environmental_tick_pushes_and_accumulates() {
        let mut panel = environmental_panel();
        let mut noise = RngNoise::seeded(1);

        panel.tick(now(), &mut noise).unwrap();
        assert_eq!(panel.series().len(), 1);
        assert_eq!(panel.mission().flight_time_sec, 2847 + 30);
    }

    #[test]
    fn test_rejected_tick_changes_nothing() {
        let mut panel = environmental_panel();
        // enough for the sample, not for the mission deltas
        let mut noise = ScriptedNoise::new(vec![0.5; 5]);

        assert!(panel.tick(now(), &mut noise).is_err());
        assert!(panel.series().is_empty());
        assert_eq!(panel.mission().flight_time_sec, 2847);
    }

    #[test]
    fn test_regenerate_spans_backwards_from_now() {
        let mut panel = environmental_panel();
        let mut noise = RngNoise::seeded(3);
        let period = Duration::seconds(5);

        panel.regenerate(20, now(), period, &mut noise).unwrap();
        let series = panel.series();
        assert_eq!(series.len(), 20);
        assert_eq!(series.last().unwrap().timestamp, now());
        assert_eq!(series[0].timestamp, now() - period * 19);
        for pair in series.windows(2) {
            assert!(pair[0].timestamp <= pair[1].timestamp);
            assert!(pair[1].timestamp - pair[0].timestamp <= period);
        }
    }

    #[test]
    fn test_regenerate_huge_count_builds_only_the_window() {
        let mut panel = environmental_panel();
        let mut noise = RngNoise::seeded(8);
        let period = Duration::seconds(5);

        panel.regenerate(usize::MAX, now(), period, &mut noise).unwrap();
        let series = panel.series();
        assert_eq!(series.len(), 20);
        assert_eq!(series.last().unwrap().timestamp, now());
        assert_eq!(series[0].timestamp, now() - period * 19);

        // phase wrapped; later ticks keep working
        panel.tick(now() + period, &mut noise).unwrap();
        assert_eq!(panel.series().len(), 20);
    }

    #[test]
    fn test_regenerate_rejects_offsets_chrono_cannot_hold() {
        let mut panel = environmental_panel();
        let mut noise = RngNoise::seeded(8);
        let before = panel.series();

        let result = panel.regenerate(3, now(), Duration::days(365 * 1_000_000), &mut noise);
        assert!(matches!(
            result,
            Err(SampleGenerationError::TimestampOutOfRange { .. })
        ));
        assert_eq!(panel.series(), before);
    }

    #[test]
    fn test_failed_regenerate_keeps_old_window() {
        let mut panel = environmental_panel();
        let mut noise = RngNoise::seeded(3);
        panel.tick(now(), &mut noise).unwrap();
        let before = panel.series();

        let mut short = ScriptedNoise::new(vec![0.5; 10]);
        let later = now() + Duration::seconds(60);
        assert!(panel.regenerate(20, later, Duration::seconds(5), &mut short).is_err());
        assert_eq!(panel.series(), before);
    }

    #[test]
    fn test_load_sorts_and_trims_to_capacity() {
        let mut panel = environmental_panel();
        let sample = EnvironmentalSample {
            temp: 20.0,
            humidity: 50.0,
            wind_speed: 5.0,
            pressure: 1010.0,
        };
        let series = (0..25i64)
            .rev()
            .map(|i| Timestamped::new(now() + Duration::seconds(i), sample))
            .collect();

        panel.load(series);
        let loaded = panel.series();
        assert_eq!(loaded.len(), 20);
        assert_eq!(loaded[0].timestamp, now() + Duration::seconds(5));
        assert_eq!(loaded[19].timestamp, now() + Duration::seconds(24));
    }

    #[test]
    fn test_environmental_stats_track_window() {
        let mut panel = environmental_panel();
        assert!(panel.stats().temp.is_none());

        let mut noise = ScriptedNoise::constant(0.0);
        panel.tick(now(), &mut noise).unwrap();
        let stats = panel.stats();
        let temp = stats.temp.unwrap();
        assert_eq!(temp.min, 25.0);
        assert_eq!(temp.latest, 25.0);
    }

    #[test]
    fn test_thermal_panel_starts_at_model_bases() {
        let panel = ThermalPanel::new(ThermalModel::default(), ThermalDisplayRange::default());
        let latest = panel.latest();
        assert_eq!(latest.max_temp, 45.2);
        assert_eq!(latest.min_temp, 18.7);
        assert_eq!(latest.avg_temp, 32.1);
        assert_eq!(panel.display_range(), (20.0, 80.0));
    }

    #[test]
    fn test_flight_panel_steps() {
        let mut panel = FlightPanel::new(FlightModel::default());
        let mut noise = ScriptedNoise::constant(0.5);
        panel.tick(&mut noise).unwrap();
        panel.tick(&mut noise).unwrap();
        assert_eq!(panel.latest().flight_time_sec, 1249);
    }
}
