// Mission statistics domain model
use super::sample::clamp_percent;
use serde::{Deserialize, Serialize};

/// Field names stay snake_case: this struct is also the `mission.initial`
/// config section, and environment overrides arrive lowercased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionStats {
    pub area_covered_km2: f64,
    pub images_captured: u64,
    pub hotspots_detected: u64,
    pub flight_time_sec: u64,
    pub data_processed_gb: f64,
    /// Set from outside; not advanced by mission ticks.
    pub mission_success_pct: f64,
}

impl MissionStats {
    /// True when every accumulating field of `self` is at least the value in `earlier`.
    pub fn dominates(&self, earlier: &MissionStats) -> bool {
        self.area_covered_km2 >= earlier.area_covered_km2
            && self.images_captured >= earlier.images_captured
            && self.hotspots_detected >= earlier.hotspots_detected
            && self.flight_time_sec >= earlier.flight_time_sec
            && self.data_processed_gb >= earlier.data_processed_gb
    }
}

/// One axis of the performance radar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetric {
    pub metric: String,
    /// Score out of 100.
    pub value: f64,
}

impl PerformanceMetric {
    pub fn new(metric: &str, value: f64) -> Self {
        Self {
            metric: metric.to_string(),
            value,
        }
    }
}

/// Radar summary of how the mission is going. Scores are held in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionPerformance {
    metrics: Vec<PerformanceMetric>,
}

impl MissionPerformance {
    /// Out-of-range scores are clamped; non-finite ones count as 0.
    pub fn new(metrics: &[PerformanceMetric]) -> Self {
        let metrics = metrics
            .iter()
            .map(|m| {
                let value = if m.value.is_finite() { clamp_percent(m.value) } else { 0.0 };
                PerformanceMetric::new(&m.metric, value)
            })
            .collect();
        Self { metrics }
    }

    pub fn metrics(&self) -> &[PerformanceMetric] {
        &self.metrics
    }

    pub fn score(&self, metric: &str) -> Option<f64> {
        self.metrics.iter().find(|m| m.metric == metric).map(|m| m.value)
    }

    /// Mean of all scores.
    pub fn overall(&self) -> Option<f64> {
        if self.metrics.is_empty() {
            return None;
        }
        let total: f64 = self.metrics.iter().map(|m| m.value).sum();
        Some(total / self.metrics.len() as f64)
    }

    /// Lowest score; the first one listed wins a tie.
    pub fn weakest(&self) -> Option<&PerformanceMetric> {
        self.metrics
            .iter()
            .reduce(|low, m| if m.value < low.value { m } else { low })
    }
}

pub fn default_performance_metrics() -> Vec<PerformanceMetric> {
    vec![
        PerformanceMetric::new("Coverage", 95.0),
        PerformanceMetric::new("Accuracy", 88.0),
        PerformanceMetric::new("Detection", 92.0),
        PerformanceMetric::new("Efficiency", 85.0),
        PerformanceMetric::new("Safety", 98.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(area: f64, images: u64) -> MissionStats {
        MissionStats {
            area_covered_km2: area,
            images_captured: images,
            hotspots_detected: 0,
            flight_time_sec: 0,
            data_processed_gb: 0.0,
            mission_success_pct: 50.0,
        }
    }

    #[test]
    fn test_dominates() {
        assert!(stats(1.0, 5).dominates(&stats(1.0, 5)));
        assert!(stats(1.5, 6).dominates(&stats(1.0, 5)));
        assert!(!stats(0.5, 6).dominates(&stats(1.0, 5)));
    }

    #[test]
    fn test_performance_scores_are_clamped() {
        let performance = MissionPerformance::new(&[
            PerformanceMetric::new("Coverage", 140.0),
            PerformanceMetric::new("Safety", -5.0),
            PerformanceMetric::new("Accuracy", f64::NAN),
            PerformanceMetric::new("Detection", 72.5),
        ]);

        assert_eq!(performance.score("Coverage"), Some(100.0));
        assert_eq!(performance.score("Safety"), Some(0.0));
        assert_eq!(performance.score("Accuracy"), Some(0.0));
        assert_eq!(performance.score("Detection"), Some(72.5));
        assert_eq!(performance.score("Range"), None);
        assert!(performance.metrics().iter().all(|m| (0.0..=100.0).contains(&m.value)));
    }

    #[test]
    fn test_performance_summary() {
        let performance = MissionPerformance::new(&default_performance_metrics());
        assert_eq!(performance.metrics().len(), 5);
        assert!((performance.overall().unwrap() - 91.6).abs() < 1e-9);
        assert_eq!(performance.weakest().unwrap().metric, "Efficiency");

        let empty = MissionPerformance::new(&[]);
        assert_eq!(empty.overall(), None);
        assert!(empty.weakest().is_none());
    }
}
