use thiserror::Error;

use crate::common::{MAX_FFT_SIZE, MIN_FFT_SIZE};

/// Errors returned when configuring or preparing a [`Tuner`](crate::Tuner).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TunerError {
    #[error("unsupported FFT size {0}, expected a power of two between {min} and {max}", min = MIN_FFT_SIZE, max = MAX_FFT_SIZE)]
    UnsupportedFftSize(usize),

    #[error("queue capacity must be at least 2, got {0}")]
    InvalidQueueCapacity(usize),

    #[error("block size must be between 1 and the FFT size {fft_size}, got {block_size}")]
    InvalidBlockSize { block_size: usize, fft_size: usize },

    #[error("sample rate must be a positive, finite number of Hz, got {0}")]
    InvalidSampleRate(f32),

    #[error("harmonic numbers must be at least 2, got {0}")]
    InvalidHarmonic(usize),

    #[error("harmonic gate ratio must be greater than 1, got {0}")]
    InvalidGateRatio(f32),

    #[error("noise threshold must be a non-negative, finite number, got {0}")]
    InvalidNoiseThreshold(f32),

    #[error("minimum fundamental frequency must be a non-negative, finite number of Hz, got {0}")]
    InvalidMinFundamental(f32),
}
