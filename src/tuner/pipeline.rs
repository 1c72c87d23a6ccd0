use alloc::{boxed::Box, sync::Arc, vec};
use log::{debug, warn};

use crate::common::Complex32;
use crate::tuner::{
    AnalysisWindow, FrequencyRefiner, PeakSelector, PitchEstimate, PitchReader, SampleAccumulator,
    SpectralAnalyzer, SpectralFrameQueue, TunerConfig, TunerError,
};

/// Buffers and stages sized by [`Tuner::prepare`].
struct PreparedState {
    accumulator: SampleAccumulator,
    window: AnalysisWindow,
    analyzer: SpectralAnalyzer,
    frames: SpectralFrameQueue,
    selector: PeakSelector,
    refiner: FrequencyRefiner,
    previous_frame: Box<[Complex32]>,
    dropped_frames: usize,
    processed_frames: usize,
}

/// Estimates the fundamental frequency of a monophonic audio stream.
///
/// Incoming samples are collected into blocks of the prepared block size. Each block
/// is shifted into an FFT size analysis window, which is then windowed and transformed
/// into a spectrum. For every pair of consecutive spectra, a harmonic aware peak search
/// selects a bin in the newer spectrum and the phase difference of that bin refines
/// its frequency. The result is published as the current estimate.
///
/// [`Tuner::prepare`] allocates everything. [`Tuner::process_block`] never allocates,
/// locks or blocks.
pub struct Tuner {
    config: TunerConfig,
    estimate: Arc<PitchEstimate>,
    sample_rate: f32,
    block_size: usize,
    state: Option<PreparedState>,
}

impl Tuner {
    /// Creates an unprepared tuner. The configuration is validated by [`Tuner::prepare`].
    pub fn new(config: TunerConfig) -> Self {
        Tuner {
            config,
            estimate: Arc::new(PitchEstimate::new()),
            sample_rate: 0.0,
            block_size: 0,
            state: None,
        }
    }

    /// Sizes all internal buffers for a sample rate and a block size and discards
    /// any previous state, including the current estimate. Must be called before
    /// processing audio. If this fails, the tuner is left unprepared.
    pub fn prepare(&mut self, sample_rate: f32, block_size: usize) -> Result<(), TunerError> {
        self.state = None;
        self.sample_rate = 0.0;
        self.block_size = 0;
        self.estimate.store(0.0);
        if let Err(error) = self.validate(sample_rate, block_size) {
            warn!("Rejected tuner preparation: {}", error);
            return Err(error);
        }

        let config = &self.config;
        self.sample_rate = sample_rate;
        self.block_size = block_size;
        self.state = Some(PreparedState {
            accumulator: SampleAccumulator::new(block_size, config.queue_capacity),
            window: AnalysisWindow::new(config.fft_size),
            analyzer: SpectralAnalyzer::new(config.fft_size, config.window_function),
            frames: SpectralFrameQueue::new(config.queue_capacity, config.fft_size),
            selector: PeakSelector::new(config, sample_rate),
            refiner: FrequencyRefiner::new(
                sample_rate,
                config.fft_size,
                block_size,
                config.noise_floor(),
            ),
            previous_frame: vec![Complex32::new(0.0, 0.0); config.fft_size / 2].into_boxed_slice(),
            dropped_frames: 0,
            processed_frames: 0,
        });

        debug!(
            "Prepared tuner: sample rate {} Hz, block size {}, fft size {}, bin width {:.3} Hz, harmonics {:?}",
            sample_rate,
            block_size,
            config.fft_size,
            self.bin_width_hz(),
            config.harmonics
        );
        Ok(())
    }

    fn validate(&self, sample_rate: f32, block_size: usize) -> Result<(), TunerError> {
        self.config.validate()?;
        if !(sample_rate > 0.0) || !sample_rate.is_finite() {
            return Err(TunerError::InvalidSampleRate(sample_rate));
        }
        if block_size == 0 || block_size > self.config.fft_size {
            return Err(TunerError::InvalidBlockSize {
                block_size,
                fft_size: self.config.fft_size,
            });
        }
        Ok(())
    }

    /// Processes one host audio callback worth of mono samples. The number of samples
    /// does not have to match the block size and may vary between calls.
    pub fn process_block(&mut self, samples: &[f32]) {
        debug_assert!(self.state.is_some(), "process_block called before prepare");
        debug_assert!(!samples.is_empty(), "process_block called with no samples");
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return,
        };
        let PreparedState {
            accumulator,
            window,
            analyzer,
            frames,
            selector,
            refiner,
            dropped_frames,
            processed_frames,
            ..
        } = state;
        let estimate = &self.estimate;

        // At most one block completes per chunk, so neither queue can fill up
        // regardless of the callback size.
        for chunk in samples.chunks(self.block_size) {
            accumulator.update(chunk);

            while accumulator
                .queue()
                .pull_with(|block| window.shift_in(block))
                .is_some()
            {
                if !analyzer.produce_fft_data(window.samples(), frames) {
                    *dropped_frames += 1;
                }
            }

            while frames.num_available_for_reading() > 1 {
                frames.pull_top_view_next_with(|previous, current| {
                    let bin = selector.select_peak(current);
                    estimate.store(refiner.refine(previous, current, bin));
                });
                *processed_frames += 1;
            }
        }
    }

    /// Analyzes two consecutive analysis windows, `current` starting one block size
    /// after `previous`, and returns the refined frequency in Hz, or 0 if no pitch
    /// was found. Does not affect the current estimate or any queued audio.
    ///
    /// Panics if the windows are not `fft_size` samples long.
    pub fn analyze_window_pair(&mut self, previous: &[f32], current: &[f32]) -> f32 {
        debug_assert!(self.state.is_some(), "analyze_window_pair called before prepare");
        let state = match self.state.as_mut() {
            Some(state) => state,
            None => return 0.0,
        };
        let fft_size = self.config.fft_size;
        if previous.len() != fft_size || current.len() != fft_size {
            panic!("The window sizes must equal the fft size")
        }

        let previous_frame = &mut state.previous_frame;
        previous_frame.copy_from_slice(state.analyzer.transform(previous));
        let current_frame = state.analyzer.transform(current);
        let bin = state.selector.select_peak(current_frame);
        state.refiner.refine(previous_frame, current_frame, bin)
    }

    /// The latest frequency estimate in Hz, or 0 if no pitch was detected.
    pub fn current_frequency(&self) -> f32 {
        self.estimate.load()
    }

    /// Returns a handle for reading the estimate from other threads. Readers stay
    /// valid across calls to [`Tuner::prepare`].
    pub fn reader(&self) -> PitchReader {
        PitchReader::new(Arc::clone(&self.estimate))
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    pub fn is_prepared(&self) -> bool {
        self.state.is_some()
    }

    /// The prepared sample rate in Hz, or 0 if not prepared.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The prepared block size, which is also the hop size between consecutive spectra.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// The frequency spacing of spectral bins, or 0 if not prepared.
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate / (self.config.fft_size as f32)
    }

    /// The number of audio blocks dropped because the block queue was full.
    pub fn dropped_blocks(&self) -> usize {
        self.state
            .as_ref()
            .map_or(0, |state| state.accumulator.dropped_blocks())
    }

    /// The number of spectral frames dropped because the frame queue was full.
    pub fn dropped_frames(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.dropped_frames)
    }

    /// The number of spectrum pairs analyzed since the last call to [`Tuner::prepare`].
    pub fn processed_frames(&self) -> usize {
        self.state.as_ref().map_or(0, |state| state.processed_frames)
    }
}
