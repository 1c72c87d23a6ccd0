use alloc::boxed::Box;

use crate::common::Complex32;
use crate::tuner::TunerConfig;

/// Finds the spectral peak most likely to be the fundamental.
///
/// A plain maximum magnitude search often locks onto a strong 3rd, 5th or 6th
/// harmonic instead of a weaker fundamental. Every time the scan finds a new
/// maximum, the bins at the candidate's index divided by each harmonic number
/// are checked, and a lower bin that is a local maximum within the gate ratio
/// of the candidate replaces it.
///
/// Magnitudes are compared as squared norms, so the gate ratio is squared too.
pub struct PeakSelector {
    harmonics: Box<[usize]>,
    gate_power_ratio: f32,
    min_fundamental_hz: f32,
    bin_width_hz: f32,
}

impl PeakSelector {
    pub fn new(config: &TunerConfig, sample_rate: f32) -> Self {
        PeakSelector {
            harmonics: config.harmonics.clone().into_boxed_slice(),
            gate_power_ratio: config.harmonic_gate_ratio * config.harmonic_gate_ratio,
            min_fundamental_hz: config.min_fundamental_hz,
            bin_width_hz: sample_rate / (config.fft_size as f32),
        }
    }

    /// Returns the index of the selected peak bin. The DC bin is never a candidate,
    /// so 0 is only returned if every other bin is zero.
    pub fn select_peak(&self, spectrum: &[Complex32]) -> usize {
        let mut peak_index = 0;
        let mut max_power = 0.0;
        for (index, bin) in spectrum.iter().enumerate().skip(1) {
            let power = bin.norm_sqr();
            if power > max_power {
                peak_index = self.correct_for_harmonics(spectrum, index, power);
                max_power = power;
            }
        }
        peak_index
    }

    /// Returns the lowest sub-harmonic peak of the candidate at `index`, or `index` itself.
    fn correct_for_harmonics(&self, spectrum: &[Complex32], index: usize, power: f32) -> usize {
        let mut corrected = index;
        for harmonic in self.harmonics.iter() {
            if let Some(root) = self.sub_harmonic_peak(spectrum, index, *harmonic, power) {
                if root < corrected {
                    corrected = root;
                }
            }
        }
        corrected
    }

    fn sub_harmonic_peak(
        &self,
        spectrum: &[Complex32],
        index: usize,
        harmonic: usize,
        power: f32,
    ) -> Option<usize> {
        let root = index / harmonic;
        if root == 0 {
            // The fundamental would be below the first bin. Only bin 1 is considered,
            // and only if it is stronger than the candidate.
            let first_power = bin_power(spectrum, 1)?;
            if 1 < index && first_power > power && self.is_audible(1) {
                return Some(1);
            }
            return None;
        }

        if index % harmonic == 0 {
            return self.accept(spectrum, root, index, power).map(|_| root);
        }

        // The fundamental lies between two bins. Take the stronger peak.
        let lower = self.accept(spectrum, root, index, power);
        let upper = self.accept(spectrum, root + 1, index, power);
        match (lower, upper) {
            (Some(lower_power), Some(upper_power)) => {
                if lower_power >= upper_power {
                    Some(root)
                } else {
                    Some(root + 1)
                }
            }
            (Some(_), None) => Some(root),
            (None, Some(_)) => Some(root + 1),
            (None, None) => None,
        }
    }

    /// Returns the power of bin `root` if it can replace the candidate at `index`
    /// with power `power`: it must be an audible local maximum below the candidate,
    /// within the gate ratio. Bins whose neighbors are outside the spectrum are never accepted.
    fn accept(&self, spectrum: &[Complex32], root: usize, index: usize, power: f32) -> Option<f32> {
        if root == 0 || root >= index || !self.is_audible(root) {
            return None;
        }
        let root_power = bin_power(spectrum, root)?;
        let below = bin_power(spectrum, root - 1)?;
        let above = bin_power(spectrum, root + 1)?;
        let is_local_max = root_power > below && root_power > above;
        if is_local_max && power < self.gate_power_ratio * root_power {
            Some(root_power)
        } else {
            None
        }
    }

    fn is_audible(&self, bin: usize) -> bool {
        (bin as f32) * self.bin_width_hz >= self.min_fundamental_hz
    }
}

fn bin_power(spectrum: &[Complex32], index: usize) -> Option<f32> {
    spectrum.get(index).map(|bin| bin.norm_sqr())
}
