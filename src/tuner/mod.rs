//! The pitch estimation pipeline.
//!
//! Audio flows through the following stages, all driven from the audio thread by
//! [`Tuner::process_block`]:
//! * [`SampleAccumulator`] collects host callbacks of arbitrary size into fixed size
//! blocks on a [`BlockQueue`].
//! * [`AnalysisWindow`] holds the latest `fft_size` samples, shifted by one block at a time.
//! * [`SpectralAnalyzer`] windows and transforms the analysis window onto a [`SpectralFrameQueue`].
//! * [`PeakSelector`] picks the spectral peak most likely to be the fundamental.
//! * [`FrequencyRefiner`] refines the peak frequency from its phase advance between
//! consecutive spectra.
//!
//! The stages are public for low level use. Most users only need [`Tuner`] and a [`PitchReader`].
//!
//! # Examples
//!
//! ```
//! use micro_tuner::tuner::{Tuner, TunerConfig};
//! use micro_tuner::common::WindowFunction;
//!
//! let config = TunerConfig::builder()
//!     .fft_size(4096)
//!     .harmonics(&[3, 5])
//!     .window_function(WindowFunction::Hann)
//!     .build()
//!     .unwrap();
//! let mut tuner = Tuner::new(config);
//! tuner.prepare(44100.0, 256).unwrap();
//!
//! let reader = tuner.reader();
//! tuner.process_block(&[0.0; 1000]);
//! assert_eq!(reader.current_frequency(), 0.0);
//! ```

mod analysis_window;
mod analyzer;
mod block_queue;
mod config;
mod error;
mod estimate;
mod frame_queue;
mod peak_selector;
mod pipeline;
mod refiner;

pub use analysis_window::AnalysisWindow;
pub use analyzer::SpectralAnalyzer;
pub use block_queue::{BlockQueue, SampleAccumulator};
pub use config::{
    TunerConfig, TunerConfigBuilder, DEFAULT_FFT_SIZE, DEFAULT_HARMONICS,
    DEFAULT_HARMONIC_GATE_RATIO, DEFAULT_MIN_FUNDAMENTAL_HZ, DEFAULT_NOISE_THRESHOLD,
    DEFAULT_QUEUE_CAPACITY,
};
pub use error::TunerError;
pub use estimate::{PitchEstimate, PitchReader};
pub use frame_queue::SpectralFrameQueue;
pub use peak_selector::PeakSelector;
pub use pipeline::Tuner;
pub use refiner::{wrap_phase, FrequencyRefiner};
