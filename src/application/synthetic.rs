// Synthetic demo data used when no real history is available
use crate::domain::sample::{Metric, Sample};
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use std::f64::consts::TAU;

pub const SYNTHETIC_POINTS: usize = 60;
pub const SYNTHETIC_SPACING_SECS: i64 = 5;

/// Sinusoidal base plus uniform jitter, clamped to a plausible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waveform {
    pub base: f64,
    pub amplitude: f64,
    pub period_secs: f64,
    pub phase: f64,
    pub jitter: f64,
    pub min: f64,
    pub max: f64,
}

impl Waveform {
    const fn new(base: f64, amplitude: f64, period_secs: f64, phase: f64, jitter: f64, min: f64, max: f64) -> Self {
        Self {
            base,
            amplitude,
            period_secs,
            phase,
            jitter,
            min,
            max,
        }
    }

    /// Noise-free value `elapsed_secs` after the first point.
    pub fn base_at(&self, elapsed_secs: f64) -> f64 {
        self.base + self.amplitude * (TAU * elapsed_secs / self.period_secs + self.phase).sin()
    }

    fn sample<R: Rng + ?Sized>(&self, elapsed_secs: f64, rng: &mut R) -> f64 {
        let noise = if self.jitter > 0.0 {
            rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };
        (self.base_at(elapsed_secs) + noise).clamp(self.min, self.max)
    }
}

pub fn waveform(metric: Metric) -> Waveform {
    match metric {
        Metric::Altitude => Waveform::new(120.0, 15.0, 300.0, 0.0, 2.0, 0.0, 500.0),
        Metric::Speed => Waveform::new(12.0, 3.0, 180.0, 0.8, 0.6, 0.0, 40.0),
        Metric::Battery => Waveform::new(78.0, 6.0, 900.0, 1.6, 0.5, 0.0, 100.0),
        Metric::Temperature => Waveform::new(18.0, 2.5, 1200.0, 2.4, 0.3, -40.0, 60.0),
        Metric::Nitrogen => Waveform::new(42.0, 4.0, 600.0, 0.4, 0.8, 0.0, 500.0),
        Metric::Phosphorus => Waveform::new(28.0, 3.0, 720.0, 1.1, 0.6, 0.0, 500.0),
        Metric::Potassium => Waveform::new(180.0, 12.0, 840.0, 1.9, 2.5, 0.0, 1000.0),
        Metric::OrganicMatter => Waveform::new(4.2, 0.3, 1500.0, 2.7, 0.05, 0.0, 100.0),
        Metric::Ph => Waveform::new(6.5, 0.15, 1800.0, 0.2, 0.03, 0.0, 14.0),
        Metric::Moisture => Waveform::new(34.0, 5.0, 960.0, 3.1, 0.7, 0.0, 100.0),
        Metric::Conductivity => Waveform::new(1.2, 0.15, 1080.0, 1.3, 0.03, 0.0, 20.0),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticGenerator;

impl SyntheticGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Sixty samples, five seconds apart, the last one at `now`.
    pub fn generate<R: Rng + ?Sized>(&self, now: DateTime<Utc>, rng: &mut R) -> Vec<Sample> {
        let first = now - Duration::seconds(SYNTHETIC_SPACING_SECS * (SYNTHETIC_POINTS as i64 - 1));

        (0..SYNTHETIC_POINTS)
            .map(|i| {
                let offset = SYNTHETIC_SPACING_SECS * i as i64;
                let elapsed = offset as f64;
                Metric::ALL
                    .iter()
                    .fold(Sample::zeroed(first + Duration::seconds(offset)), |sample, &metric| {
                        sample.with_value(metric, waveform(metric).sample(elapsed, rng))
                    })
            })
            .collect()
    }
}
