// Synthetic sample generation
use crate::application::noise::{NoiseError, NoiseSource};
use crate::domain::sample::{EnvironmentalSample, FlightTelemetrySample, ThermalSample};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SampleGenerationError {
    #[error("noise source failed while generating {field}: {source}")]
    Noise {
        field: &'static str,
        #[source]
        source: NoiseError,
    },
    #[error("non-finite value {value} generated for {field}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("timestamp {steps_back} periods before now is out of range")]
    TimestampOutOfRange { steps_back: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wave {
    #[default]
    None,
    Sin,
    Cos,
}

/// `base + amplitude * wave(tick * phase_step) + noise * u` for one field.
///
/// A centered field draws `u - 0.5`, so its noise swings around `base`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldModel {
    pub base: f64,
    pub amplitude: f64,
    pub wave: Wave,
    pub phase_step: f64,
    pub noise: f64,
    pub centered: bool,
}

impl FieldModel {
    pub const fn periodic(base: f64, amplitude: f64, wave: Wave, phase_step: f64, noise: f64) -> Self {
        Self {
            base,
            amplitude,
            wave,
            phase_step,
            noise,
            centered: false,
        }
    }

    pub const fn noisy(base: f64, noise: f64) -> Self {
        Self::periodic(base, 0.0, Wave::None, 0.0, noise)
    }

    pub const fn jitter(base: f64, noise: f64) -> Self {
        Self {
            centered: true,
            ..Self::noisy(base, noise)
        }
    }

    pub fn eval(
        &self,
        field: &'static str,
        tick: u64,
        noise: &mut dyn NoiseSource,
    ) -> Result<f64, SampleGenerationError> {
        let u = draw(field, noise)?;
        let phase = tick as f64 * self.phase_step;
        let wave = match self.wave {
            Wave::None => 0.0,
            Wave::Sin => phase.sin(),
            Wave::Cos => phase.cos(),
        };
        let offset = if self.centered { 0.5 } else { 0.0 };
        finite(field, self.base + self.amplitude * wave + self.noise * (u - offset))
    }
}

fn draw(field: &'static str, noise: &mut dyn NoiseSource) -> Result<f64, SampleGenerationError> {
    let u = noise
        .next_unit()
        .map_err(|source| SampleGenerationError::Noise { field, source })?;
    finite(field, u)
}

fn finite(field: &'static str, value: f64) -> Result<f64, SampleGenerationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SampleGenerationError::NonFinite { field, value })
    }
}

/// Produces the next reading of one sensor kind from the previous one.
pub trait SampleSource {
    type Sample;

    fn next(
        &self,
        prev: Option<&Self::Sample>,
        tick: u64,
        noise: &mut dyn NoiseSource,
    ) -> Result<Self::Sample, SampleGenerationError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalModel {
    pub temp: FieldModel,
    pub humidity: FieldModel,
    pub wind_speed: FieldModel,
    pub pressure: FieldModel,
}

impl Default for EnvironmentalModel {
    fn default() -> Self {
        Self {
            temp: FieldModel::periodic(25.0, 8.0, Wave::Sin, 0.3, 4.0),
            humidity: FieldModel::periodic(60.0, 15.0, Wave::Cos, 0.2, 5.0),
            wind_speed: FieldModel::noisy(2.0, 6.0),
            pressure: FieldModel::periodic(1013.0, 10.0, Wave::Sin, 0.1, 3.0),
        }
    }
}

impl SampleSource for EnvironmentalModel {
    type Sample = EnvironmentalSample;

    fn next(
        &self,
        _prev: Option<&EnvironmentalSample>,
        tick: u64,
        noise: &mut dyn NoiseSource,
    ) -> Result<EnvironmentalSample, SampleGenerationError> {
        Ok(EnvironmentalSample {
            temp: self.temp.eval("temp", tick, noise)?,
            humidity: self.humidity.eval("humidity", tick, noise)?,
            wind_speed: self.wind_speed.eval("windSpeed", tick, noise)?,
            pressure: self.pressure.eval("pressure", tick, noise)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThermalModel {
    pub max_temp: FieldModel,
    pub min_temp: FieldModel,
    pub avg_temp: FieldModel,
}

impl Default for ThermalModel {
    fn default() -> Self {
        Self {
            max_temp: FieldModel::jitter(45.2, 5.0),
            min_temp: FieldModel::jitter(18.7, 3.0),
            avg_temp: FieldModel::jitter(32.1, 4.0),
        }
    }
}

impl SampleSource for ThermalModel {
    type Sample = ThermalSample;

    fn next(
        &self,
        _prev: Option<&ThermalSample>,
        tick: u64,
        noise: &mut dyn NoiseSource,
    ) -> Result<ThermalSample, SampleGenerationError> {
        let sample = ThermalSample {
            max_temp: self.max_temp.eval("maxTemp", tick, noise)?,
            min_temp: self.min_temp.eval("minTemp", tick, noise)?,
            avg_temp: self.avg_temp.eval("avgTemp", tick, noise)?,
        };
        Ok(sample.normalized())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightModel {
    pub initial: FlightTelemetrySample,
    pub battery_drain_per_tick: f64,
    pub flight_time_step_sec: u64,
    pub signal: FieldModel,
    pub heading_delta: FieldModel,
    pub wind_speed: FieldModel,
}

impl Default for FlightModel {
    fn default() -> Self {
        Self {
            initial: FlightTelemetrySample {
                battery: 87.0,
                signal: 85.0,
                gps_sat_count: 12,
                heading: 245.0,
                wind_speed: 3.2,
                flight_time_sec: 1247,
            },
            battery_drain_per_tick: 0.1,
            flight_time_step_sec: 1,
            signal: FieldModel::noisy(80.0, 20.0),
            heading_delta: FieldModel::jitter(0.0, 10.0),
            wind_speed: FieldModel::jitter(3.2, 2.0),
        }
    }
}

impl SampleSource for FlightModel {
    type Sample = FlightTelemetrySample;

    fn next(
        &self,
        prev: Option<&FlightTelemetrySample>,
        tick: u64,
        noise: &mut dyn NoiseSource,
    ) -> Result<FlightTelemetrySample, SampleGenerationError> {
        let prev = prev.copied().unwrap_or(self.initial);
        let signal = self.signal.eval("signal", tick, noise)?;
        let heading_delta = self.heading_delta.eval("heading", tick, noise)?;
        let wind_speed = self.wind_speed.eval("windSpeed", tick, noise)?;

        Ok(FlightTelemetrySample {
            battery: prev.battery - self.battery_drain_per_tick,
            signal,
            gps_sat_count: prev.gps_sat_count,
            heading: prev.heading + heading_delta,
            wind_speed,
            flight_time_sec: prev.flight_time_sec + self.flight_time_step_sec,
        }
        .clamped())
    }
}
