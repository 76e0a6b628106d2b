//! # Spectral Transform Module
//!
//! Real-input discrete Fourier transform of a uniformly sampled column.
//!
//! Only the non-negative half of the spectrum is kept: a signal of `n`
//! samples yields `n / 2 + 1` bins, and bin `k` sits at frequency
//! `k / (n * dt)`. This matches the usual `rfft` / `rfftfreq` pairing, so the
//! last bin of an even-length signal is the Nyquist frequency `1 / (2 * dt)`.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Errors raised while computing a spectrum
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpectrumError {
    /// Fewer than two samples, so no spacing can be derived
    #[error("at least two samples are required, got {0}")]
    TooFewSamples(usize),

    /// Sample spacing is zero, negative, or not finite
    #[error("sample spacing must be positive and finite, got {0}")]
    InvalidSpacing(f64),

    /// Axis and value columns differ in length
    #[error("axis has {axis} samples but values have {values}")]
    LengthMismatch {
        /// Length of the axis column
        axis: usize,
        /// Length of the value column
        values: usize,
    },

    /// Frequency weighting exponent is odd
    #[error("frequency exponent must be even, got {0}")]
    OddExponent(u32),
}

/// Power spectrum of one column together with its frequency axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    /// Frequency of each bin
    pub frequency: Vec<f64>,
    /// Squared magnitude of each bin
    pub power: Vec<f64>,
}

impl Spectrum {
    /// Transform `values` sampled at the points of `axis`.
    ///
    /// The spacing is `axis[1] - axis[0]`; the axis is assumed uniform.
    pub fn compute(axis: &[f64], values: &[f64]) -> Result<Self, SpectrumError> {
        if axis.len() != values.len() {
            return Err(SpectrumError::LengthMismatch {
                axis: axis.len(),
                values: values.len(),
            });
        }
        if values.len() < 2 {
            return Err(SpectrumError::TooFewSamples(values.len()));
        }
        let dt = axis[1] - axis[0];
        if !(dt.is_finite() && dt > 0.0) {
            return Err(SpectrumError::InvalidSpacing(dt));
        }

        Ok(Self {
            frequency: frequency_axis(values.len(), dt),
            power: power_spectrum(values),
        })
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.power.len()
    }

    /// True when there are no bins
    pub fn is_empty(&self) -> bool {
        self.power.is_empty()
    }

    /// Convert the frequency axis to angular frequency (multiply by 2π)
    pub fn to_angular(mut self) -> Self {
        let two_pi = 2.0 * std::f64::consts::PI;
        self.frequency.iter_mut().for_each(|f| *f *= two_pi);
        self
    }

    /// Express the frequency axis in units of `omega`
    pub fn normalized(mut self, omega: f64) -> Self {
        self.frequency.iter_mut().for_each(|f| *f /= omega);
        self
    }

    /// `(frequency, power * frequency^exponent)` pairs.
    ///
    /// Exponents 0, 2 and 4 give the dipole, velocity-form and
    /// acceleration-form spectra respectively.
    pub fn weighted(&self, exponent: u32) -> Result<Vec<(f64, f64)>, SpectrumError> {
        if exponent % 2 != 0 {
            return Err(SpectrumError::OddExponent(exponent));
        }
        let exponent = exponent as i32;
        Ok(self
            .frequency
            .iter()
            .zip(&self.power)
            .map(|(&f, &p)| (f, p * f.powi(exponent)))
            .collect())
    }
}

/// Non-negative frequency bins of the DFT of a real signal.
pub fn real_spectrum(values: &[f64]) -> Vec<Complex<f64>> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&re| Complex { re, im: 0.0 }).collect();
    fft.process(&mut buffer);
    buffer.truncate(n / 2 + 1);
    buffer
}

/// `|X[k]|^2` for every non-negative frequency bin.
pub fn power_spectrum(values: &[f64]) -> Vec<f64> {
    real_spectrum(values).iter().map(|c| c.norm_sqr()).collect()
}

/// Frequencies of the non-negative bins for `n` samples spaced by `dt`.
pub fn frequency_axis(n: usize, dt: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let span = n as f64 * dt;
    (0..=n / 2).map(|k| k as f64 / span).collect()
}
