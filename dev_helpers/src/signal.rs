/// Host callback sizes seen in the wild, including sizes that don't divide
/// typical block sizes.
pub const HOST_CALLBACK_SIZES: [usize; 8] = [256, 441, 128, 1000, 64, 333, 512, 17];

/// A sine wave with the given frequency in Hz and peak amplitude.
pub fn sine(frequency: f32, amplitude: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    harmonic_tone(&[(frequency, amplitude)], sample_rate, len)
}

/// A sum of sine waves, given as (frequency in Hz, peak amplitude) pairs.
/// Phases are computed in double precision so long signals stay accurate.
pub fn harmonic_tone(partials: &[(f32, f32)], sample_rate: f32, len: usize) -> Vec<f32> {
    let two_pi = 2.0 * std::f64::consts::PI;
    (0..len)
        .map(|i| {
            let t = (i as f64) / (sample_rate as f64);
            partials
                .iter()
                .map(|(frequency, amplitude)| {
                    (*amplitude as f64) * (two_pi * (*frequency as f64) * t).sin()
                })
                .sum::<f64>() as f32
        })
        .collect()
}

/// Splits a signal into consecutive chunks whose sizes cycle through a list,
/// like the buffers of an audio host with an unpredictable callback size.
/// The last chunk may be shorter.
pub struct IrregularChunks<'a> {
    samples: &'a [f32],
    sizes: &'a [usize],
    size_index: usize,
}

impl<'a> IrregularChunks<'a> {
    pub fn new(samples: &'a [f32], sizes: &'a [usize]) -> Self {
        if sizes.is_empty() || sizes.iter().any(|size| *size == 0) {
            panic!("Chunk sizes must be non-empty and greater than 0")
        }
        IrregularChunks {
            samples,
            sizes,
            size_index: 0,
        }
    }
}

impl<'a> Iterator for IrregularChunks<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        if self.samples.is_empty() {
            return None;
        }
        let size = self.sizes[self.size_index].min(self.samples.len());
        self.size_index = (self.size_index + 1) % self.sizes.len();
        let (chunk, rest) = self.samples.split_at(size);
        self.samples = rest;
        Some(chunk)
    }
}
