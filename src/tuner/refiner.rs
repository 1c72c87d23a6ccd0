use core::f32::consts::{PI, TAU};
use libm::atan2f;
use micromath::F32Ext;

use crate::common::Complex32;

/// Wraps a phase angle into the range (-pi, pi].
pub fn wrap_phase(phase: f32) -> f32 {
    phase - TAU * F32Ext::ceil((phase - PI) / TAU)
}

/// Estimates the frequency of a spectral peak with sub-bin accuracy from
/// its phase advance between two spectra `hop_size` samples apart.
pub struct FrequencyRefiner {
    sample_rate: f32,
    fft_size: usize,
    hop_size: usize,
    noise_power: f32,
}

impl FrequencyRefiner {
    /// `noise_floor` is the bin magnitude below which a peak is considered noise.
    pub fn new(sample_rate: f32, fft_size: usize, hop_size: usize, noise_floor: f32) -> Self {
        FrequencyRefiner {
            sample_rate,
            fft_size,
            hop_size,
            noise_power: noise_floor * noise_floor,
        }
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Returns the refined frequency in Hz of the peak at `bin`, where `previous`
    /// and `current` are consecutive spectra. Returns 0 if the peak in `current`
    /// is below the noise floor.
    pub fn refine(&self, previous: &[Complex32], current: &[Complex32], bin: usize) -> f32 {
        let (peak, previous_peak) = match (current.get(bin), previous.get(bin)) {
            (Some(peak), Some(previous_peak)) => (*peak, *previous_peak),
            _ => return 0.0,
        };
        if peak.norm_sqr() < self.noise_power {
            return 0.0;
        }

        // The phase error is divided by the hop size, so small hops need an
        // exact atan2 rather than micromath's approximation.
        let phase = atan2f(peak.im, peak.re);
        let previous_phase = atan2f(previous_peak.im, previous_peak.re);

        // The phase advance of the bin's center frequency over one hop,
        // reduced modulo a full turn before converting to radians.
        let fft_size = self.fft_size as f32;
        let expected_advance = TAU * (((bin * self.hop_size) % self.fft_size) as f32) / fft_size;
        let deviation = wrap_phase(phase - previous_phase - expected_advance);

        let omega = deviation / (self.hop_size as f32) + TAU * (bin as f32) / fft_size;
        // Low bins with a large deviation can come out negative, which is not a pitch.
        (self.sample_rate * omega / TAU).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::WindowFunction;
    use crate::tuner::SpectralAnalyzer;
    use alloc::vec;
    use alloc::vec::Vec;

    fn sine(frequency: f64, sample_rate: f64, offset: usize, len: usize) -> Vec<f32> {
        (offset..offset + len)
            .map(|i| (2.0 * core::f64::consts::PI * frequency * (i as f64) / sample_rate).sin() as f32)
            .collect()
    }

    fn spectra(frequency: f64, fft_size: usize, hop_size: usize) -> (Vec<Complex32>, Vec<Complex32>) {
        let mut analyzer = SpectralAnalyzer::new(fft_size, WindowFunction::BlackmanHarris);
        let previous = analyzer
            .transform(&sine(frequency, 48000.0, 0, fft_size))
            .to_vec();
        let current = analyzer
            .transform(&sine(frequency, 48000.0, hop_size, fft_size))
            .to_vec();
        (previous, current)
    }

    #[test]
    fn test_wrap_phase() {
        assert!((wrap_phase(0.5) - 0.5).abs() < 1e-6);
        assert!((wrap_phase(PI) - PI).abs() < 1e-6);
        assert!((wrap_phase(-PI) - PI).abs() < 1e-6);
        assert!((wrap_phase(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert!((wrap_phase(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert!((wrap_phase(0.25 + 10.0 * TAU) - 0.25).abs() < 1e-4);
        for i in -100..100 {
            let wrapped = wrap_phase(i as f32 * 0.37);
            assert!(wrapped > -PI - 1e-5 && wrapped <= PI + 1e-5);
        }
    }

    #[test]
    fn test_sub_bin_accuracy() {
        let fft_size = 8192;
        let hop_size = 512;
        let refiner = FrequencyRefiner::new(48000.0, fft_size, hop_size, 8.192);
        // 440 Hz is bin 75.09, 445 Hz is bin 75.95
        for (frequency, bin) in [(440.0, 75), (445.0, 76), (1234.5, 211)] {
            let (previous, current) = spectra(frequency, fft_size, hop_size);
            let refined = refiner.refine(&previous, &current, bin);
            assert!(
                (refined - frequency as f32).abs() < 0.05,
                "{} Hz refined to {}",
                frequency,
                refined
            );
        }
    }

    #[test]
    fn test_small_hop_accuracy() {
        let fft_size = 8192;
        for hop_size in [16, 32, 64] {
            let refiner = FrequencyRefiner::new(48000.0, fft_size, hop_size, 8.192);
            for (frequency, bin) in [(440.0, 75), (441.3, 75), (82.41, 14)] {
                let (previous, current) = spectra(frequency, fft_size, hop_size);
                let refined = refiner.refine(&previous, &current, bin);
                assert!(
                    (refined - frequency as f32).abs() < 0.1,
                    "{} Hz refined to {} with hop {}",
                    frequency,
                    refined,
                    hop_size
                );
            }
        }
    }

    #[test]
    fn test_negative_frequency_is_clamped() {
        // Bin 1 expects a quarter turn per hop, but the phase moved back an eighth.
        let refiner = FrequencyRefiner::new(48000.0, 1024, 256, 0.0);
        let mut previous = vec![Complex32::new(0.0, 0.0); 512];
        let mut current = previous.clone();
        previous[1] = Complex32::new(100.0, 0.0);
        current[1] = Complex32::new(100.0, -100.0);
        assert_eq!(refiner.refine(&previous, &current, 1), 0.0);
    }

    #[test]
    fn test_off_peak_bin() {
        // 440 Hz is bin 37.55. Its lower neighbor still carries the phase of the sinusoid.
        let fft_size = 4096;
        let hop_size = 256;
        let refiner = FrequencyRefiner::new(48000.0, fft_size, hop_size, 4.096);
        let (previous, current) = spectra(440.0, fft_size, hop_size);
        let refined = refiner.refine(&previous, &current, 37);
        assert!((refined - 440.0).abs() < 0.5);
    }

    #[test]
    fn test_noise_floor() {
        let refiner = FrequencyRefiner::new(48000.0, 1024, 256, 1.024);
        let quiet = vec![Complex32::new(0.5, 0.5); 512];
        assert_eq!(refiner.refine(&quiet, &quiet, 10), 0.0);
        let silent = vec![Complex32::new(0.0, 0.0); 512];
        assert_eq!(refiner.refine(&silent, &silent, 0), 0.0);
    }

    #[test]
    fn test_identical_frames() {
        let refiner = FrequencyRefiner::new(48000.0, 1024, 1024, 0.0);
        let frame = vec![Complex32::new(100.0, 0.0); 512];
        let refined = refiner.refine(&frame, &frame, 10);
        // A hop of a full fft size advances every bin center by whole turns.
        assert!((refined - 10.0 * 48000.0 / 1024.0).abs() < 1e-2);
    }

    #[test]
    fn test_out_of_range_bin() {
        let refiner = FrequencyRefiner::new(48000.0, 1024, 256, 0.0);
        let frame = vec![Complex32::new(100.0, 0.0); 512];
        assert_eq!(refiner.refine(&frame, &frame, 512), 0.0);
    }
}
