use alloc::vec::Vec;

use crate::common::{is_supported_fft_size, WindowFunction};
use crate::tuner::TunerError;

/// The default number of samples per FFT. 5.86 Hz bin width at 48 kHz.
pub const DEFAULT_FFT_SIZE: usize = 8192;
/// The default number of slots in the block and spectral frame queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 30;
/// The harmonics checked for by default. These are the strongest non-octave
/// harmonics of typical plucked and bowed strings.
pub const DEFAULT_HARMONICS: [usize; 3] = [3, 5, 6];
/// A candidate peak is replaced by a lower sub-harmonic peak if their magnitude
/// ratio is less than this. 10 corresponds to 20 dB.
pub const DEFAULT_HARMONIC_GATE_RATIO: f32 = 10.0;
/// Sub-harmonic peaks below this frequency are considered inaudible and never selected.
pub const DEFAULT_MIN_FUNDAMENTAL_HZ: f32 = 20.0;
/// Peak magnitudes below this fraction of the FFT size are considered noise.
/// 0.001 is about -60 dB.
pub const DEFAULT_NOISE_THRESHOLD: f32 = 0.001;

/// Tuner settings. Use [`TunerConfig::builder`] to create a validated
/// configuration with non-default values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TunerConfig {
    /// The number of samples in each analysis window.
    pub fft_size: usize,
    /// The capacity of the block queue and the spectral frame queue.
    pub queue_capacity: usize,
    /// Harmonic numbers a spectral peak is checked against.
    pub harmonics: Vec<usize>,
    /// Maximum magnitude ratio between a peak and a sub-harmonic peak replacing it.
    pub harmonic_gate_ratio: f32,
    /// Lowest frequency, in Hz, a sub-harmonic peak may have.
    pub min_fundamental_hz: f32,
    /// Noise floor as a fraction of `fft_size`.
    pub noise_threshold: f32,
    /// The window function applied before each FFT.
    pub window_function: WindowFunction,
}

impl TunerConfig {
    pub fn builder() -> TunerConfigBuilder {
        TunerConfigBuilder::new()
    }

    /// Checks that all settings are usable.
    pub fn validate(&self) -> Result<(), TunerError> {
        if !is_supported_fft_size(self.fft_size) {
            return Err(TunerError::UnsupportedFftSize(self.fft_size));
        }
        if self.queue_capacity < 2 {
            return Err(TunerError::InvalidQueueCapacity(self.queue_capacity));
        }
        if let Some(harmonic) = self.harmonics.iter().find(|h| **h < 2) {
            return Err(TunerError::InvalidHarmonic(*harmonic));
        }
        if !(self.harmonic_gate_ratio > 1.0) || !self.harmonic_gate_ratio.is_finite() {
            return Err(TunerError::InvalidGateRatio(self.harmonic_gate_ratio));
        }
        if !(self.min_fundamental_hz >= 0.0) || !self.min_fundamental_hz.is_finite() {
            return Err(TunerError::InvalidMinFundamental(self.min_fundamental_hz));
        }
        if !(self.noise_threshold >= 0.0) || !self.noise_threshold.is_finite() {
            return Err(TunerError::InvalidNoiseThreshold(self.noise_threshold));
        }
        Ok(())
    }

    /// The peak magnitude below which no pitch is reported.
    pub fn noise_floor(&self) -> f32 {
        self.noise_threshold * (self.fft_size as f32)
    }
}

impl Default for TunerConfig {
    fn default() -> Self {
        TunerConfig {
            fft_size: DEFAULT_FFT_SIZE,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            harmonics: DEFAULT_HARMONICS.to_vec(),
            harmonic_gate_ratio: DEFAULT_HARMONIC_GATE_RATIO,
            min_fundamental_hz: DEFAULT_MIN_FUNDAMENTAL_HZ,
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
            window_function: WindowFunction::BlackmanHarris,
        }
    }
}

/// Builder for a [`TunerConfig`].
pub struct TunerConfigBuilder {
    config: TunerConfig,
}

impl TunerConfigBuilder {
    /// Starts from the default configuration.
    pub fn new() -> Self {
        TunerConfigBuilder {
            config: TunerConfig::default(),
        }
    }

    /// Sets the number of samples per FFT. Must be a power of two.
    pub fn fft_size(mut self, fft_size: usize) -> Self {
        self.config.fft_size = fft_size;
        self
    }

    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Sets the harmonic numbers to check spectral peaks against.
    /// An empty list disables harmonic correction.
    pub fn harmonics(mut self, harmonics: &[usize]) -> Self {
        self.config.harmonics = harmonics.to_vec();
        self
    }

    pub fn harmonic_gate_ratio(mut self, ratio: f32) -> Self {
        self.config.harmonic_gate_ratio = ratio;
        self
    }

    pub fn min_fundamental_hz(mut self, frequency: f32) -> Self {
        self.config.min_fundamental_hz = frequency;
        self
    }

    pub fn noise_threshold(mut self, threshold: f32) -> Self {
        self.config.noise_threshold = threshold;
        self
    }

    pub fn window_function(mut self, window_function: WindowFunction) -> Self {
        self.config.window_function = window_function;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<TunerConfig, TunerError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for TunerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = TunerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.fft_size, 8192);
        assert_eq!(config.queue_capacity, 30);
        assert_eq!(config.harmonics, [3, 5, 6]);
        assert!((config.noise_floor() - 8.192).abs() < 1e-4);
    }

    #[test]
    fn test_builder() {
        let config = TunerConfig::builder()
            .fft_size(4096)
            .harmonics(&[3])
            .window_function(WindowFunction::Hann)
            .build()
            .unwrap();
        assert_eq!(config.fft_size, 4096);
        assert_eq!(config.harmonics, [3]);
        assert_eq!(config.window_function, WindowFunction::Hann);
    }

    #[test]
    fn test_invalid_settings() {
        assert_eq!(
            TunerConfig::builder().fft_size(1000).build(),
            Err(TunerError::UnsupportedFftSize(1000))
        );
        assert_eq!(
            TunerConfig::builder().queue_capacity(1).build(),
            Err(TunerError::InvalidQueueCapacity(1))
        );
        assert_eq!(
            TunerConfig::builder().harmonics(&[3, 1]).build(),
            Err(TunerError::InvalidHarmonic(1))
        );
        assert_eq!(
            TunerConfig::builder().harmonic_gate_ratio(0.5).build(),
            Err(TunerError::InvalidGateRatio(0.5))
        );
        assert_eq!(
            TunerConfig::builder().noise_threshold(-1.0).build(),
            Err(TunerError::InvalidNoiseThreshold(-1.0))
        );
        assert!(TunerConfig::builder()
            .min_fundamental_hz(f32::INFINITY)
            .build()
            .is_err());
    }
}
