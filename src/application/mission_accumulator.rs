// Monotone mission counters advanced on every mission tick
use crate::application::noise::NoiseSource;
use crate::application::sample_source::{FieldModel, SampleGenerationError};
use crate::domain::mission::MissionStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionModel {
    pub initial: MissionStats,
    pub area_delta_km2: f64,
    pub images_delta: u64,
    pub hotspots_delta: u64,
    pub flight_time_step_sec: u64,
    pub data_delta_gb: f64,
}

impl Default for MissionModel {
    fn default() -> Self {
        Self {
            initial: MissionStats {
                area_covered_km2: 3.7,
                images_captured: 2156,
                hotspots_detected: 71,
                flight_time_sec: 2847,
                data_processed_gb: 1.2,
                mission_success_pct: 94.2,
            },
            area_delta_km2: 0.1,
            images_delta: 10,
            hotspots_delta: 3,
            flight_time_step_sec: 30,
            data_delta_gb: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MissionAccumulator {
    model: MissionModel,
    stats: MissionStats,
    ticks: u64,
}

impl MissionAccumulator {
    pub fn new(model: MissionModel) -> Self {
        let mut stats = model.initial.clone();
        stats.area_covered_km2 = stats.area_covered_km2.max(0.0);
        stats.data_processed_gb = stats.data_processed_gb.max(0.0);
        stats.mission_success_pct = stats.mission_success_pct.clamp(0.0, 100.0);
        Self {
            model,
            stats,
            ticks: 0,
        }
    }

    pub fn stats(&self) -> &MissionStats {
        &self.stats
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn set_mission_success(&mut self, pct: f64) {
        if pct.is_finite() {
            self.stats.mission_success_pct = pct.clamp(0.0, 100.0);
        }
    }

    /// Work out the next stats without touching the current ones.
    ///
    /// Splitting this from [`commit`](Self::commit) lets a caller abandon the
    /// whole tick when a later step of the same tick fails.
    pub fn prepare(&self, noise: &mut dyn NoiseSource) -> Result<MissionStats, SampleGenerationError> {
        let area = unit_draw("areaCoveredKm2", noise)? * self.model.area_delta_km2.max(0.0);
        let images = (unit_draw("imagesCaptured", noise)? * self.model.images_delta as f64).floor();
        let hotspots =
            (unit_draw("hotspotsDetected", noise)? * self.model.hotspots_delta as f64).floor();
        let data = unit_draw("dataProcessedGb", noise)? * self.model.data_delta_gb.max(0.0);

        let current = &self.stats;
        Ok(MissionStats {
            area_covered_km2: current.area_covered_km2 + area,
            images_captured: current.images_captured + images as u64,
            hotspots_detected: current.hotspots_detected + hotspots as u64,
            flight_time_sec: current.flight_time_sec + self.model.flight_time_step_sec,
            data_processed_gb: current.data_processed_gb + data,
            mission_success_pct: current.mission_success_pct,
        })
    }

    pub fn commit(&mut self, next: MissionStats) {
        debug_assert!(next.dominates(&self.stats), "mission stats went backwards");
        if next.dominates(&self.stats) {
            self.stats = next;
            self.ticks += 1;
        }
    }

    pub fn tick(&mut self, noise: &mut dyn NoiseSource) -> Result<&MissionStats, SampleGenerationError> {
        let next = self.prepare(noise)?;
        self.commit(next);
        Ok(&self.stats)
    }
}

/// Draw in [0, 1]; anything outside that range would let a counter shrink.
fn unit_draw(field: &'static str, noise: &mut dyn NoiseSource) -> Result<f64, SampleGenerationError> {
    let u = FieldModel::noisy(0.0, 1.0).eval(field, 0, noise)?;
    Ok(u.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::noise::{RngNoise, ScriptedNoise};

    #[test]
    fn test_tick_applies_deltas() {
        let mut mission = MissionAccumulator::new(MissionModel::default());
        let mut noise = ScriptedNoise::new(vec![0.5, 0.99, 0.7, 0.2]);

        let stats = mission.tick(&mut noise).unwrap().clone();
        assert!((stats.area_covered_km2 - 3.75).abs() < 1e-9);
        assert_eq!(stats.images_captured, 2156 + 9);
        assert_eq!(stats.hotspots_detected, 71 + 2);
        assert_eq!(stats.flight_time_sec, 2847 + 30);
        assert!((stats.data_processed_gb - 1.21).abs() < 1e-9);
        assert_eq!(stats.mission_success_pct, 94.2);
        assert_eq!(mission.ticks(), 1);
    }

    #[test]
    fn test_counters_never_decrease() {
        let mut mission = MissionAccumulator::new(MissionModel::default());
        let mut noise = RngNoise::seeded(7);

        let mut previous = mission.stats().clone();
        for _ in 0..200 {
            let current = mission.tick(&mut noise).unwrap().clone();
            assert!(current.dominates(&previous));
            assert_eq!(current.flight_time_sec, previous.flight_time_sec + 30);
            previous = current;
        }
    }

    #[test]
    fn test_failed_tick_leaves_stats_untouched() {
        let mut mission = MissionAccumulator::new(MissionModel::default());
        let before = mission.stats().clone();
        let mut noise = ScriptedNoise::new(vec![0.5, 0.5]);

        assert!(mission.tick(&mut noise).is_err());
        assert_eq!(mission.stats(), &before);
        assert_eq!(mission.ticks(), 0);
    }

    #[test]
    fn test_out_of_range_draws_are_clamped() {
        let mut mission = MissionAccumulator::new(MissionModel::default());
        let before = mission.stats().clone();
        let mut noise = ScriptedNoise::constant(-4.0);

        let after = mission.tick(&mut noise).unwrap();
        assert!(after.dominates(&before));
        assert_eq!(after.images_captured, before.images_captured);
    }

    #[test]
    fn test_mission_success_is_external() {
        let mut mission = MissionAccumulator::new(MissionModel::default());
        mission.set_mission_success(120.0);
        assert_eq!(mission.stats().mission_success_pct, 100.0);
        mission.set_mission_success(f64::NAN);
        assert_eq!(mission.stats().mission_success_pct, 100.0);
    }
}
