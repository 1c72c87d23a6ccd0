use alloc::sync::Arc;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::note::{map_frequency_to_note, NoteData};

/// The latest fundamental frequency estimate in Hz, stored as the bits of an `f32`
/// so that it can be written and read with single atomic operations.
/// Zero means no pitch was detected.
#[derive(Debug)]
pub struct PitchEstimate {
    bits: AtomicU32,
}

impl PitchEstimate {
    pub fn new() -> Self {
        PitchEstimate {
            bits: AtomicU32::new(0.0_f32.to_bits()),
        }
    }

    pub fn store(&self, frequency: f32) {
        self.bits.store(frequency.to_bits(), Ordering::Release);
    }

    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }
}

impl Default for PitchEstimate {
    fn default() -> Self {
        Self::new()
    }
}

/// A handle for polling the latest estimate of a [`Tuner`](crate::Tuner) from another
/// thread, for example a UI timer. Reading never blocks the audio thread.
#[derive(Debug, Clone)]
pub struct PitchReader {
    estimate: Arc<PitchEstimate>,
}

impl PitchReader {
    pub(crate) fn new(estimate: Arc<PitchEstimate>) -> Self {
        PitchReader { estimate }
    }

    /// The latest frequency estimate in Hz, or 0 if no pitch was detected.
    pub fn current_frequency(&self) -> f32 {
        self.estimate.load()
    }

    /// The note nearest to the latest estimate, given the frequency of A4.
    pub fn note(&self, reference_frequency: f32) -> NoteData {
        map_frequency_to_note(self.current_frequency(), reference_frequency)
    }
}
