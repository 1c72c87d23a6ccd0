//! Mapping of frequencies to musical notes in twelve tone equal temperament,
//! relative to an adjustable reference pitch for A4.

use alloc::string::{String, ToString};
use core::fmt;
use micromath::F32Ext;

/// The standard concert pitch of A4 in Hz.
pub const DEFAULT_REFERENCE_FREQUENCY: f32 = 440.0;

/// Deviations within this many cents are considered in tune.
pub const DEFAULT_IN_TUNE_TOLERANCE_CENTS: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteName {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl NoteName {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteName::A => "A",
            NoteName::B => "B",
            NoteName::C => "C",
            NoteName::D => "D",
            NoteName::E => "E",
            NoteName::F => "F",
            NoteName::G => "G",
        }
    }
}

/// Scale degrees in semitones above A, as note names and sharp flags.
const SCALE: [(NoteName, bool); 12] = [
    (NoteName::A, false),
    (NoteName::A, true),
    (NoteName::B, false),
    (NoteName::C, false),
    (NoteName::C, true),
    (NoteName::D, false),
    (NoteName::D, true),
    (NoteName::E, false),
    (NoteName::F, false),
    (NoteName::F, true),
    (NoteName::G, false),
    (NoteName::G, true),
];

/// The note nearest to a frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteData {
    /// The note name, or `None` if there was no pitch to map.
    pub name: Option<NoteName>,
    /// True if the note is the sharp of `name`, e.g A# for `NoteName::A`.
    pub sharp: bool,
    /// Deviation from the nearest note in cents, in the range (-50, 50].
    pub cents: f32,
    /// Octave number in scientific pitch notation, where the reference pitch is A4.
    /// Zero for the empty note.
    pub octave: i32,
}

impl NoteData {
    /// The note reported when no pitch was detected.
    pub fn empty() -> Self {
        NoteData {
            name: None,
            sharp: false,
            cents: 0.0,
            octave: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }

    /// The note name as a string, i.e one of "A" to "G" or "" for the empty note.
    pub fn name_str(&self) -> &'static str {
        self.name.map(|name| name.as_str()).unwrap_or("")
    }

    /// True if the note is not empty and deviates at most `tolerance_cents` from the nearest note.
    pub fn is_in_tune(&self, tolerance_cents: f32) -> bool {
        !self.is_empty() && F32Ext::abs(self.cents) <= tolerance_cents
    }

    /// The note with sharp and octave, e.g "A#4", or "" for the empty note.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl Default for NoteData {
    fn default() -> Self {
        NoteData::empty()
    }
}

impl fmt::Display for NoteData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            None => Ok(()),
            Some(name) => {
                let sharp = if self.sharp { "#" } else { "" };
                write!(f, "{}{}{}", name.as_str(), sharp, self.octave)
            }
        }
    }
}

/// Maps a frequency in Hz to the nearest note, given the frequency of A4.
/// A frequency of zero (or any non-positive or non-finite frequency)
/// maps to the empty note, as does a non-positive or non-finite reference.
pub fn map_frequency_to_note(frequency: f32, reference_frequency: f32) -> NoteData {
    if !is_positive_frequency(frequency) || !is_positive_frequency(reference_frequency) {
        return NoteData::empty();
    }

    let semitones = 12.0 * F32Ext::log2(frequency / reference_frequency);
    // Round half down, so that cents end up in (-50, 50].
    let nearest = F32Ext::ceil(semitones - 0.5);
    let cents = 100.0 * (semitones - nearest);
    let nearest = nearest as i32;
    let (name, sharp) = SCALE[nearest.rem_euclid(12) as usize];

    NoteData {
        name: Some(name),
        sharp,
        cents,
        // A4 is 9 semitones above C4, i.e 57 semitones above C0.
        octave: (nearest + 57).div_euclid(12),
    }
}

fn is_positive_frequency(frequency: f32) -> bool {
    frequency > 0.0 && frequency.is_finite()
}

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number
/// (with a fractional part), given the frequency of A4.
pub fn freq_to_midi_note(frequency: f32, reference_frequency: f32) -> f32 {
    69.0 + 12.0 * F32Ext::log2(frequency / reference_frequency)
}
