// Noise sources feeding the sample generators
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NoiseError {
    #[error("noise source exhausted")]
    Exhausted,
}

/// Uniform draws in `[0, 1)`.
///
/// Implementations may fail or hand back garbage; callers validate every draw
/// before it reaches a sample.
pub trait NoiseSource: Send {
    fn next_unit(&mut self) -> Result<f64, NoiseError>;
}

/// `rand`-backed noise, seeded for reproducible runs or from the OS otherwise.
pub struct RngNoise {
    rng: StdRng,
}

impl RngNoise {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_os(),
        }
    }
}

impl NoiseSource for RngNoise {
    fn next_unit(&mut self) -> Result<f64, NoiseError> {
        Ok(self.rng.random::<f64>())
    }
}

/// Replays a fixed list of draws, then reports exhaustion.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct ScriptedNoise {
    values: Vec<f64>,
    cursor: usize,
    cycle: bool,
}

#[cfg(test)]
impl ScriptedNoise {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            cycle: false,
        }
    }

    /// Repeat the script forever instead of running dry.
    pub fn cycling(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: 0,
            cycle: true,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::cycling(vec![value])
    }

    pub fn remaining(&self) -> usize {
        if self.cycle {
            usize::MAX
        } else {
            self.values.len().saturating_sub(self.cursor)
        }
    }
}

#[cfg(test)]
impl NoiseSource for ScriptedNoise {
    fn next_unit(&mut self) -> Result<f64, NoiseError> {
        if self.values.is_empty() {
            return Err(NoiseError::Exhausted);
        }
        if self.cursor >= self.values.len() {
            if !self.cycle {
                return Err(NoiseError::Exhausted);
            }
            self.cursor = 0;
        }
        let value = self.values[self.cursor];
        self.cursor += 1;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_noise_is_reproducible() {
        let mut a = RngNoise::seeded(42);
        let mut b = RngNoise::seeded(42);
        for _ in 0..16 {
            let x = a.next_unit().unwrap();
            assert_eq!(x, b.next_unit().unwrap());
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_scripted_noise_runs_dry() {
        let mut noise = ScriptedNoise::new(vec![0.25, 0.75]);
        assert_eq!(noise.next_unit(), Ok(0.25));
        assert_eq!(noise.remaining(), 1);
        assert_eq!(noise.next_unit(), Ok(0.75));
        assert_eq!(noise.next_unit(), Err(NoiseError::Exhausted));
    }

    #[test]
    fn test_scripted_noise_cycles() {
        let mut noise = ScriptedNoise::cycling(vec![0.1, 0.2]);
        let draws: Vec<f64> = (0..5).map(|_| noise.next_unit().unwrap()).collect();
        assert_eq!(draws, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
    }
}
