//! [Window functions](https://en.wikipedia.org/wiki/Window_function).

use alloc::{boxed::Box, vec};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowFunction {
    /// <https://en.wikipedia.org/wiki/Window_function#Hann_and_Hamming_windows>
    Hann,
    /// Four term Blackman-Harris window, with sidelobes below -92 dB.
    /// <https://en.wikipedia.org/wiki/Window_function#Blackman%E2%80%93Harris_window>
    BlackmanHarris,
}

impl WindowFunction {
    /// Cosine series coefficients a0, a1, a2, a3 of the window.
    fn coefficients(&self) -> [f64; 4] {
        match self {
            WindowFunction::Hann => [0.5, 0.5, 0.0, 0.0],
            WindowFunction::BlackmanHarris => [0.35875, 0.48829, 0.14128, 0.01168],
        }
    }

    /// Computes a symmetric window table of length `len`, scaled so that
    /// its values sum to `len`. This makes the magnitude of a windowed
    /// sinusoid's spectral peak independent of the window function.
    pub fn table(&self, len: usize) -> Box<[f32]> {
        let mut table = vec![0.0_f32; len].into_boxed_slice();
        if len == 1 {
            table[0] = 1.0;
            return table;
        }
        if len == 0 {
            return table;
        }

        let [a0, a1, a2, a3] = self.coefficients();
        // Rotate a unit phasor by 2 pi / (len - 1) per sample instead of
        // evaluating cos for every sample.
        let step = 2.0 * core::f64::consts::PI / ((len - 1) as f64);
        let (step_sin, step_cos) = small_angle_sin_cos(step);
        let (mut c, mut s) = (1.0_f64, 0.0_f64);
        let mut sum = 0.0_f64;
        let mut values = vec![0.0_f64; len];
        for value in values.iter_mut() {
            let c2 = 2.0 * c * c - 1.0;
            let c3 = c * (2.0 * c2 - 1.0);
            *value = a0 - a1 * c + a2 * c2 - a3 * c3;
            sum += *value;
            let next_c = c * step_cos - s * step_sin;
            s = s * step_cos + c * step_sin;
            c = next_c;
        }

        let scale = (len as f64) / sum;
        for (entry, value) in table.iter_mut().zip(values.iter()) {
            *entry = (value * scale) as f32;
        }
        table
    }
}

/// Taylor series sin and cos, accurate to double precision for the
/// small angles used when stepping through a window table.
fn small_angle_sin_cos(x: f64) -> (f64, f64) {
    let x2 = x * x;
    let mut sin = 0.0;
    let mut cos = 0.0;
    let mut sin_term = x;
    let mut cos_term = 1.0;
    for n in 0..8 {
        sin += sin_term;
        cos += cos_term;
        let k = (2 * n + 2) as f64;
        cos_term *= -x2 / ((k - 1.0) * k);
        sin_term *= -x2 / (k * (k + 1.0));
    }
    (sin, cos)
}

/// Performs point-wise multiplication of a buffer and a precomputed window table.
pub fn apply_window_table(table: &[f32], buffer: &mut [f32]) {
    for (value, window_value) in buffer.iter_mut().zip(table.iter()) {
        *value *= *window_value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hann_window() {
        let table = WindowFunction::Hann.table(5);
        // Unscaled 0, 0.5, 1, 0.5, 0 sums to 2, so the table is scaled by 5 / 2.
        let expected = [0.0, 1.25, 2.5, 1.25, 0.0];
        for (value, expected) in table.iter().zip(expected.iter()) {
            assert!((value - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_blackman_harris_window() {
        let len = 8192;
        let table = WindowFunction::BlackmanHarris.table(len);
        let sum: f32 = table.iter().sum();
        assert!((sum - len as f32).abs() < 0.1);

        // Symmetric, nearly zero at the edges, peaked in the middle.
        for i in 0..len / 2 {
            assert!((table[i] - table[len - 1 - i]).abs() < 1e-4);
        }
        assert!(table[0].abs() < 1e-3);
        let peak = table.iter().cloned().fold(0.0_f32, f32::max);
        assert!((table[len / 2] - peak).abs() < 1e-4);
        // 1 / 0.35875
        assert!((peak - 2.7875).abs() < 1e-3);
    }

    #[test]
    fn test_small_angle_sin_cos() {
        let x = 0.01_f64;
        let (sin, cos) = small_angle_sin_cos(x);
        assert!((sin - x.sin()).abs() < 1e-15);
        assert!((cos - x.cos()).abs() < 1e-15);
    }

    #[test]
    fn test_apply_window_table() {
        let table = [0.0, 0.5, 2.0];
        let mut buffer = [4.0, 4.0, 4.0];
        apply_window_table(&table, &mut buffer);
        assert_eq!(buffer, [0.0, 2.0, 8.0]);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert_eq!(WindowFunction::Hann.table(0).len(), 0);
        assert_eq!(&WindowFunction::BlackmanHarris.table(1)[..], &[1.0]);
    }
}
