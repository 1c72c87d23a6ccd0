use alloc::{boxed::Box, vec};

use crate::common::{
    apply_window_table, is_supported_fft_size, real_fft, Complex32, WindowFunction,
};
use crate::tuner::SpectralFrameQueue;

/// Turns analysis windows into complex spectra: windowing followed by a real-only FFT.
pub struct SpectralAnalyzer {
    window_table: Box<[f32]>,
    fft_buffer: Box<[f32]>,
}

impl SpectralAnalyzer {
    /// Panics if `fft_size` is not a supported FFT size.
    pub fn new(fft_size: usize, window_function: WindowFunction) -> Self {
        if !is_supported_fft_size(fft_size) {
            panic!("Unsupported fft size {}", fft_size)
        }
        SpectralAnalyzer {
            window_table: window_function.table(fft_size),
            fft_buffer: vec![0.0; fft_size].into_boxed_slice(),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_buffer.len()
    }

    /// Computes the `fft_size / 2` bins of the windowed spectrum of `window`.
    /// The DC bin has a zero imaginary part.
    pub fn transform(&mut self, window: &[f32]) -> &[Complex32] {
        self.fft_buffer.copy_from_slice(window);
        apply_window_table(&self.window_table, &mut self.fft_buffer);
        let fft = real_fft(&mut self.fft_buffer);
        // Clear the real-valued coefficient at the Nyquist frequency, which is packed
        // into the imaginary part of the DC bin.
        fft[0].im = 0.;
        fft
    }

    /// Transforms `window` and pushes the spectrum onto `frames`.
    /// Returns `false` if the frame queue was full and the spectrum was dropped.
    pub fn produce_fft_data(&mut self, window: &[f32], frames: &mut SpectralFrameQueue) -> bool {
        let spectrum = self.transform(window);
        frames.push(spectrum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use core::f32::consts::PI;

    fn sine(frequency: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * PI * frequency * (i as f32) / sample_rate).sin())
            .collect()
    }

    #[test]
    fn test_sine_peak() {
        let fft_size = 1024;
        let mut analyzer = SpectralAnalyzer::new(fft_size, WindowFunction::BlackmanHarris);
        // Exactly bin 32
        let window = sine(32.0 * 48000.0 / 1024.0, 48000.0, fft_size);
        let spectrum = analyzer.transform(&window);
        assert_eq!(spectrum.len(), 512);
        assert_eq!(spectrum[0].im, 0.);

        let peak = spectrum
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.norm_sqr().partial_cmp(&b.1.norm_sqr()).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak, 32);
        // The window table sums to fft_size, so a unit sinusoid peaks at about fft_size / 2.
        let magnitude = spectrum[32].norm_sqr().sqrt();
        assert!(magnitude > 0.4 * fft_size as f32 && magnitude < 0.55 * fft_size as f32);
        // Blackman-Harris leakage far from the peak is negligible.
        assert!(spectrum[64].norm_sqr().sqrt() < 1e-3 * magnitude);
    }

    #[test]
    fn test_silence() {
        let mut analyzer = SpectralAnalyzer::new(256, WindowFunction::Hann);
        let spectrum = analyzer.transform(&[0.0; 256]);
        assert!(spectrum.iter().all(|z| z.norm_sqr() == 0.0));
    }

    #[test]
    fn test_deterministic() {
        let mut analyzer = SpectralAnalyzer::new(512, WindowFunction::BlackmanHarris);
        let window = sine(1000.0, 44100.0, 512);
        let first: Vec<Complex32> = analyzer.transform(&window).to_vec();
        let second: Vec<Complex32> = analyzer.transform(&window).to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_produce_fft_data() {
        let mut analyzer = SpectralAnalyzer::new(256, WindowFunction::BlackmanHarris);
        let mut frames = SpectralFrameQueue::new(2, 256);
        let window = sine(3000.0, 48000.0, 256);
        assert!(analyzer.produce_fft_data(&window, &mut frames));
        assert!(analyzer.produce_fft_data(&window, &mut frames));
        assert!(!analyzer.produce_fft_data(&window, &mut frames));
        assert_eq!(frames.num_available_for_reading(), 2);

        let mut frame = vec![Complex32::new(0.0, 0.0); 128];
        assert!(frames.pull(&mut frame));
        assert_eq!(&frame[..], analyzer.transform(&window));
    }

    #[test]
    #[should_panic]
    fn test_unsupported_size() {
        SpectralAnalyzer::new(1000, WindowFunction::Hann);
    }
}
