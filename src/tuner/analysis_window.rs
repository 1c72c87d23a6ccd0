use alloc::{boxed::Box, vec};

/// A sliding window holding the latest `fft_size` samples, oldest first.
/// Starts out as silence.
pub struct AnalysisWindow {
    samples: Box<[f32]>,
}

impl AnalysisWindow {
    pub fn new(fft_size: usize) -> Self {
        AnalysisWindow {
            samples: vec![0.0; fft_size].into_boxed_slice(),
        }
    }

    /// Discards the oldest `block.len()` samples and appends `block` at the end.
    pub fn shift_in(&mut self, block: &[f32]) {
        let window_size = self.samples.len();
        if block.len() >= window_size {
            self.samples
                .copy_from_slice(&block[(block.len() - window_size)..]);
            return;
        }
        let keep = window_size - block.len();
        self.samples.copy_within(block.len().., 0);
        self.samples[keep..].copy_from_slice(block);
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Fills the window with silence.
    pub fn clear(&mut self) {
        self.samples.fill(0.0);
    }
}
