// Per-subsystem refresh timers behind a shared live/pause gate
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Subsystem {
    Environmental,
    FlightTelemetry,
    ThermalSnapshot,
    RecordingClock,
}

impl Subsystem {
    pub const ALL: [Subsystem; 4] = [
        Subsystem::Environmental,
        Subsystem::FlightTelemetry,
        Subsystem::ThermalSnapshot,
        Subsystem::RecordingClock,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Subsystem::Environmental => "environmental",
            Subsystem::FlightTelemetry => "flight_telemetry",
            Subsystem::ThermalSnapshot => "thermal_snapshot",
            Subsystem::RecordingClock => "recording_clock",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running,
}

/// Refresh periods in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub environmental_ms: u64,
    pub flight_telemetry_ms: u64,
    pub thermal_snapshot_ms: u64,
    pub recording_clock_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            environmental_ms: 5000,
            flight_telemetry_ms: 2000,
            thermal_snapshot_ms: 2000,
            recording_clock_ms: 1000,
        }
    }
}

impl SchedulerConfig {
    pub fn period(&self, subsystem: Subsystem) -> Duration {
        let ms = match subsystem {
            Subsystem::Environmental => self.environmental_ms,
            Subsystem::FlightTelemetry => self.flight_telemetry_ms,
            Subsystem::ThermalSnapshot => self.thermal_snapshot_ms,
            Subsystem::RecordingClock => self.recording_clock_ms,
        };
        Duration::from_millis(ms.max(1))
    }
}

#[derive(Debug, Clone)]
struct SubsystemTimer {
    period: Duration,
    enabled: bool,
    ticks: u64,
    /// Bumped each time the timer (re)starts, so a driver can realign its clock.
    epoch: u64,
}

/// Decides which subsystem ticks may run.
///
/// A subsystem is Running only while the gate is live and the subsystem itself
/// is enabled. The scheduler never fires anything on its own; a driver (or a
/// test) offers ticks through [`admit_tick`](Self::admit_tick).
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    live: bool,
    timers: BTreeMap<Subsystem, SubsystemTimer>,
}

impl RefreshScheduler {
    /// Starts live with every subsystem enabled except the recording clock.
    pub fn new(config: &SchedulerConfig) -> Self {
        let timers = Subsystem::ALL
            .iter()
            .map(|&subsystem| {
                let timer = SubsystemTimer {
                    period: config.period(subsystem),
                    enabled: subsystem != Subsystem::RecordingClock,
                    ticks: 0,
                    epoch: 0,
                };
                (subsystem, timer)
            })
            .collect();

        Self { live: true, timers }
    }

    pub fn start(&mut self) -> bool {
        self.set_live(true)
    }

    pub fn stop(&mut self) -> bool {
        self.set_live(false)
    }

    /// Returns whether the flag actually changed.
    pub fn set_live(&mut self, live: bool) -> bool {
        let changed = self.live != live;
        self.live = live;
        if changed && live {
            for timer in self.timers.values_mut() {
                timer.epoch += 1;
            }
        }
        changed
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn set_enabled(&mut self, subsystem: Subsystem, enabled: bool) -> bool {
        match self.timers.get_mut(&subsystem) {
            Some(timer) if timer.enabled != enabled => {
                timer.enabled = enabled;
                if enabled {
                    timer.epoch += 1;
                }
                true
            }
            _ => false,
        }
    }

    pub fn state(&self, subsystem: Subsystem) -> TimerState {
        match self.timers.get(&subsystem) {
            Some(timer) if self.live && timer.enabled => TimerState::Running,
            _ => TimerState::Idle,
        }
    }

    pub fn period(&self, subsystem: Subsystem) -> Duration {
        self.timers
            .get(&subsystem)
            .map(|t| t.period)
            .unwrap_or(Duration::from_millis(1))
    }

    /// Count the tick and return true when the subsystem is Running.
    pub fn admit_tick(&mut self, subsystem: Subsystem) -> bool {
        if self.state(subsystem) != TimerState::Running {
            return false;
        }
        match self.timers.get_mut(&subsystem) {
            Some(timer) => {
                timer.ticks += 1;
                true
            }
            None => false,
        }
    }

    /// Start generation of `subsystem`. Changes whenever its timer restarts,
    /// even if an observer never saw it stop.
    pub fn epoch(&self, subsystem: Subsystem) -> u64 {
        self.timers.get(&subsystem).map(|t| t.epoch).unwrap_or(0)
    }

    pub fn ticks(&self, subsystem: Subsystem) -> u64 {
        self.timers.get(&subsystem).map(|t| t.ticks).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_periods() {
        let scheduler = RefreshScheduler::new(&SchedulerConfig::default());
        assert_eq!(scheduler.period(Subsystem::Environmental), Duration::from_secs(5));
        assert_eq!(scheduler.period(Subsystem::FlightTelemetry), Duration::from_secs(2));
        assert_eq!(scheduler.period(Subsystem::ThermalSnapshot), Duration::from_secs(2));
        assert_eq!(scheduler.period(Subsystem::RecordingClock), Duration::from_secs(1));
    }

    #[test]
    fn test_pause_idles_everything() {
        let mut scheduler = RefreshScheduler::new(&SchedulerConfig::default());
        assert_eq!(scheduler.state(Subsystem::Environmental), TimerState::Running);
        assert_eq!(scheduler.state(Subsystem::RecordingClock), TimerState::Idle);

        assert!(scheduler.stop());
        assert!(!scheduler.stop());
        for subsystem in Subsystem::ALL {
            assert_eq!(scheduler.state(subsystem), TimerState::Idle);
            assert!(!scheduler.admit_tick(subsystem));
        }

        assert!(scheduler.start());
        assert!(scheduler.admit_tick(Subsystem::FlightTelemetry));
        assert_eq!(scheduler.ticks(Subsystem::FlightTelemetry), 1);
    }

    #[test]
    fn test_subsystems_count_independently() {
        let mut scheduler = RefreshScheduler::new(&SchedulerConfig::default());
        scheduler.admit_tick(Subsystem::Environmental);
        scheduler.admit_tick(Subsystem::ThermalSnapshot);
        scheduler.admit_tick(Subsystem::ThermalSnapshot);

        assert_eq!(scheduler.ticks(Subsystem::Environmental), 1);
        assert_eq!(scheduler.ticks(Subsystem::ThermalSnapshot), 2);
        assert_eq!(scheduler.ticks(Subsystem::FlightTelemetry), 0);
    }

    #[test]
    fn test_enable_recording_clock() {
        let mut scheduler = RefreshScheduler::new(&SchedulerConfig::default());
        assert!(scheduler.set_enabled(Subsystem::RecordingClock, true));
        assert!(!scheduler.set_enabled(Subsystem::RecordingClock, true));
        assert_eq!(scheduler.state(Subsystem::RecordingClock), TimerState::Running);
    }

    #[test]
    fn test_restart_bumps_epoch() {
        let mut scheduler = RefreshScheduler::new(&SchedulerConfig::default());
        let clock = Subsystem::RecordingClock;
        assert_eq!(scheduler.epoch(clock), 0);

        scheduler.set_enabled(clock, true);
        assert_eq!(scheduler.epoch(clock), 1);
        scheduler.set_enabled(clock, false);
        assert_eq!(scheduler.epoch(clock), 1);
        scheduler.set_enabled(clock, true);
        assert_eq!(scheduler.epoch(clock), 2);

        let flight = scheduler.epoch(Subsystem::FlightTelemetry);
        scheduler.stop();
        scheduler.start();
        assert_eq!(scheduler.epoch(Subsystem::FlightTelemetry), flight + 1);
        assert!(!scheduler.start());
        assert_eq!(scheduler.epoch(Subsystem::FlightTelemetry), flight + 1);
    }

    #[test]
    fn test_zero_period_is_bumped() {
        let config = SchedulerConfig {
            environmental_ms: 0,
            ..SchedulerConfig::default()
        };
        assert_eq!(config.period(Subsystem::Environmental), Duration::from_millis(1));
    }
}
