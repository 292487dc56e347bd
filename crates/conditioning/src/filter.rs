//! Butterworth 低通滤波
//!
//! Even-order digital Butterworth low-pass built from cascaded second-order
//! sections. Each section is the bilinear transform of an analog pole pair
//! with the cutoff pre-warped, so the cascade has exactly -3 dB at the
//! cutoff. Filtering is causal with zero initial state.

use std::f64::consts::PI;

use contracts::{Sample, Stream, Vector3};

use crate::error::{ConditioningError, Result};

/// One second-order section, normalised so `a0 == 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b: [f64; 3],
    pub a: [f64; 2],
}

impl Biquad {
    /// Low-pass section with quality factor `q` at normalised angular
    /// frequency `w0` (rad/sample).
    fn lowpass(w0: f64, q: f64) -> Self {
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        let b1 = (1.0 - cos_w0) / a0;
        Self {
            b: [b1 / 2.0, b1, b1 / 2.0],
            a: [-2.0 * cos_w0 / a0, (1.0 - alpha) / a0],
        }
    }

    /// |H(e^jw)| of this section.
    fn magnitude(&self, w: f64) -> f64 {
        // numerator and denominator evaluated at z = e^{jw}
        let (c1, s1) = (w.cos(), w.sin());
        let (c2, s2) = ((2.0 * w).cos(), (2.0 * w).sin());
        let num_re = self.b[0] + self.b[1] * c1 + self.b[2] * c2;
        let num_im = -(self.b[1] * s1 + self.b[2] * s2);
        let den_re = 1.0 + self.a[0] * c1 + self.a[1] * c2;
        let den_im = -(self.a[0] * s1 + self.a[1] * s2);
        num_re.hypot(num_im) / den_re.hypot(den_im)
    }
}

/// Cascade of [`Biquad`] sections.
#[derive(Debug, Clone, PartialEq)]
pub struct ButterworthLowpass {
    sections: Vec<Biquad>,
    sample_rate_hz: f64,
}

impl ButterworthLowpass {
    /// Designs an `order`-th order low-pass at `cutoff_hz`.
    ///
    /// # Errors
    /// Odd or zero order, non-positive rates, cutoff at or above Nyquist.
    pub fn design(order: usize, cutoff_hz: f64, sample_rate_hz: f64) -> Result<Self> {
        if order == 0 || order % 2 != 0 {
            return Err(ConditioningError::InvalidFilter(format!(
                "order must be even and > 0, got {order}"
            )));
        }
        if !(sample_rate_hz > 0.0) {
            return Err(ConditioningError::InvalidFilter(format!(
                "sample rate must be > 0, got {sample_rate_hz}"
            )));
        }
        if !(cutoff_hz > 0.0 && cutoff_hz < sample_rate_hz / 2.0) {
            return Err(ConditioningError::InvalidFilter(format!(
                "cutoff {cutoff_hz} Hz outside (0, {}) Hz",
                sample_rate_hz / 2.0
            )));
        }

        let w0 = 2.0 * PI * cutoff_hz / sample_rate_hz;
        let sections = (1..=order / 2)
            .map(|k| {
                let theta = (2 * k - 1) as f64 * PI / (2 * order) as f64;
                Biquad::lowpass(w0, 1.0 / (2.0 * theta.cos()))
            })
            .collect();

        Ok(Self {
            sections,
            sample_rate_hz,
        })
    }

    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    /// Magnitude response at `freq_hz`.
    pub fn gain(&self, freq_hz: f64) -> f64 {
        let w = 2.0 * PI * freq_hz / self.sample_rate_hz;
        self.sections.iter().map(|s| s.magnitude(w)).product()
    }

    /// Filters `input` in one forward pass.
    pub fn apply(&self, input: &[f64]) -> Vec<f64> {
        let mut output = input.to_vec();
        for section in &self.sections {
            // transposed direct form II
            let (mut z1, mut z2) = (0.0, 0.0);
            for value in output.iter_mut() {
                let x = *value;
                let y = section.b[0] * x + z1;
                z1 = section.b[1] * x - section.a[0] * y + z2;
                z2 = section.b[2] * x - section.a[1] * y;
                *value = y;
            }
        }
        output
    }

    /// Filters every axis of `stream`, keeping its timestamps.
    pub fn filter_stream(&self, stream: &Stream) -> Stream {
        let samples = stream.samples();
        let x = self.apply(&samples.iter().map(|s| s.values.x).collect::<Vec<_>>());
        let y = self.apply(&samples.iter().map(|s| s.values.y).collect::<Vec<_>>());
        let z = self.apply(&samples.iter().map(|s| s.values.z).collect::<Vec<_>>());

        let filtered = samples
            .iter()
            .enumerate()
            .map(|(i, s)| Sample {
                timestamp: s.timestamp,
                values: Vector3::new(x[i], y[i], z[i]),
            })
            .collect();
        Stream::new(stream.channel(), filtered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use contracts::{Channel, Location, SensorKind};

    #[test]
    fn test_design_rejects_bad_parameters() {
        assert!(ButterworthLowpass::design(3, 100.0, 1600.0).is_err());
        assert!(ButterworthLowpass::design(0, 100.0, 1600.0).is_err());
        assert!(ButterworthLowpass::design(4, 800.0, 1600.0).is_err());
        assert!(ButterworthLowpass::design(4, 100.0, 0.0).is_err());
    }

    #[test]
    fn test_section_count_and_coefficients() {
        let filter = ButterworthLowpass::design(4, 100.0, 1600.0).unwrap();
        assert_eq!(filter.sections().len(), 2);

        let first = filter.sections()[0];
        assert_relative_eq!(first.b[0], 0.028_118_753_208, epsilon = 1e-9);
        assert_relative_eq!(first.a[0], -1.365_117_237_239, epsilon = 1e-9);
        assert_relative_eq!(first.a[1], 0.477_592_250_073, epsilon = 1e-9);

        let second = filter.sections()[1];
        assert_relative_eq!(second.a[0], -1.611_727_096_457, epsilon = 1e-9);
        assert_relative_eq!(second.a[1], 0.744_520_838_205, epsilon = 1e-9);
    }

    #[test]
    fn test_frequency_response() {
        let filter = ButterworthLowpass::design(4, 100.0, 1125.0).unwrap();
        assert_relative_eq!(filter.gain(0.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(filter.gain(100.0), std::f64::consts::FRAC_1_SQRT_2, epsilon = 1e-9);
        assert!(filter.gain(400.0) < 0.01);
    }

    #[test]
    fn test_step_response_settles_at_unity() {
        let filter = ButterworthLowpass::design(4, 100.0, 1600.0).unwrap();
        let output = filter.apply(&vec![1.0; 400]);
        // causal with zero state: starts at b0 of the cascade
        assert!(output[0] < 0.01);
        assert_relative_eq!(output[399], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_filter_stream_keeps_timestamps() {
        let filter = ButterworthLowpass::design(2, 50.0, 1000.0).unwrap();
        let stream = Stream::new(
            Channel::new(Location::LeftAnkle, SensorKind::Gyroscope),
            (0..10).map(|i| Sample::new(i * 3, 1.0, 0.0, -1.0)).collect(),
        );
        let out = filter.filter_stream(&stream);
        assert_eq!(out.len(), 10);
        assert_eq!(out.timestamp(9), Some(27));
        assert_eq!(out.samples()[4].values.y, 0.0);
        assert_relative_eq!(out.samples()[4].values.x, -out.samples()[4].values.z);
    }
}
