//! A real time [instrument tuner](https://en.wikipedia.org/wiki/Electronic_tuner) core for
//! monophonic audio, like a single plucked string or a sung note. It cannot be used to
//! detect multiple pitches at once, like in a musical chord.
//!
//! Features
//! * Accepts audio in chunks of arbitrary and varying size, as delivered by an audio host.
//! * Windowed real-only FFT peak picking with correction for strong 3rd, 5th and 6th harmonics.
//! * Sub-bin frequency accuracy from the phase difference of the peak bin across two
//! consecutive spectra (phase vocoder refinement).
//! * No allocations or locks after `prepare`, suitable for real time audio use.
//! * The latest estimate is published through a single atomic and can be polled from any thread.
//!
//! # Examples
//!
//! ```
//! use micro_tuner::{map_frequency_to_note, Tuner, TunerConfig};
//!
//! let sample_rate = 48000.0;
//! let block_size = 512;
//! let mut tuner = Tuner::new(TunerConfig::default());
//! tuner.prepare(sample_rate, block_size).unwrap();
//!
//! // A pure tone at 440 Hz, delivered in chunks that don't match the block size.
//! let signal: Vec<f32> = (0..48000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 440.0 * (i as f64) / 48000.0).sin() as f32)
//!     .collect();
//! for chunk in signal.chunks(333) {
//!     tuner.process_block(chunk);
//! }
//!
//! // Typically done from a UI thread, using a reader obtained with tuner.reader()
//! let frequency = tuner.current_frequency();
//! assert!((frequency - 440.0).abs() < 0.5);
//! let note = map_frequency_to_note(frequency, 440.0);
//! assert_eq!(note.label(), "A4");
//! ```

#![no_std]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod common;
pub mod note;
pub mod tuner;

pub use note::{map_frequency_to_note, NoteData, NoteName};
pub use tuner::{PitchReader, Tuner, TunerConfig, TunerError};
