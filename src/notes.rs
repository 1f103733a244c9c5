/*
Note Table
==========

The piano speaks in note names, not MIDI numbers. Every key carries one of
the twelve pitch classes (sharps notation) and an octave; the sounding
frequency is looked up from a reference octave and scaled.

Reference octave: 4 (the octave holding middle C and A440).

  C     261.63 Hz      F#    369.99 Hz
  C#    277.18 Hz      G     392.00 Hz
  D     293.66 Hz      G#    415.30 Hz
  D#    311.13 Hz      A     440.00 Hz   <- tuning reference, exact
  E     329.63 Hz      A#    466.16 Hz
  F     349.23 Hz      B     493.88 Hz

Equal temperament makes octaves a pure doubling, so any other octave is

    frequency = reference(note) * 2^(octave - 4)

Example:
  resolve("A", 5)  -> 880.0
  resolve("C", 3)  -> 130.815
  resolve("H", 4)  -> None (not a pitch class)
*/

use std::fmt;

/// One of the twelve pitch classes of an equal-tempered octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

/// The octave the table frequencies are given in.
pub const REFERENCE_OCTAVE: i32 = 4;

/// Pitch classes in ascending order with their octave-4 frequencies (Hz).
pub const NOTE_TABLE: [(PitchClass, f64); 12] = [
    (PitchClass::C, 261.63),
    (PitchClass::Cs, 277.18),
    (PitchClass::D, 293.66),
    (PitchClass::Ds, 311.13),
    (PitchClass::E, 329.63),
    (PitchClass::F, 349.23),
    (PitchClass::Fs, 369.99),
    (PitchClass::G, 392.0),
    (PitchClass::Gs, 415.3),
    (PitchClass::A, 440.0),
    (PitchClass::As, 466.16),
    (PitchClass::B, 493.88),
];

impl PitchClass {
    /// Parse a note name in sharps notation ("C", "C#", ... "B").
    pub fn from_name(name: &str) -> Option<Self> {
        let pitch = match name {
            "C" => PitchClass::C,
            "C#" => PitchClass::Cs,
            "D" => PitchClass::D,
            "D#" => PitchClass::Ds,
            "E" => PitchClass::E,
            "F" => PitchClass::F,
            "F#" => PitchClass::Fs,
            "G" => PitchClass::G,
            "G#" => PitchClass::Gs,
            "A" => PitchClass::A,
            "A#" => PitchClass::As,
            "B" => PitchClass::B,
            _ => return None,
        };
        Some(pitch)
    }

    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Black key on a piano.
    pub fn is_sharp(self) -> bool {
        matches!(
            self,
            PitchClass::Cs | PitchClass::Ds | PitchClass::Fs | PitchClass::Gs | PitchClass::As
        )
    }

    /// Frequency at [`REFERENCE_OCTAVE`].
    pub fn reference_frequency(self) -> f64 {
        NOTE_TABLE[self as usize].1
    }

    /// Equal-tempered frequency in the given octave.
    ///
    /// Any octave is accepted; `None` only when the result leaves the range
    /// of representable positive frequencies.
    pub fn frequency(self, octave: i32) -> Option<f64> {
        let shift = octave.checked_sub(REFERENCE_OCTAVE)?;
        let frequency = self.reference_frequency() * 2.0_f64.powi(shift);
        (frequency.is_finite() && frequency > 0.0).then_some(frequency)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Resolve a note name and octave to a frequency in Hz.
///
/// Returns `None` ("no sound") for names outside the note table.
pub fn resolve(note: &str, octave: i32) -> Option<f64> {
    PitchClass::from_name(note)?.frequency(octave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn table_has_twelve_ascending_entries() {
        assert_eq!(NOTE_TABLE.len(), 12);
        for pair in NOTE_TABLE.windows(2) {
            assert!(pair[0].0 < pair[1].0);
            assert!(pair[0].1 < pair[1].1);
        }
    }

    #[test]
    fn table_index_matches_discriminant() {
        for (index, (pitch, _)) in NOTE_TABLE.iter().enumerate() {
            assert_eq!(*pitch as usize, index);
        }
    }

    #[test]
    fn a440_is_exact() {
        assert_eq!(resolve("A", 4), Some(440.0));
    }

    #[test]
    fn middle_c() {
        assert_relative_eq!(resolve("C", 4).unwrap(), 261.63, epsilon = 1e-9);
    }

    #[test]
    fn octave_above_doubles() {
        assert_relative_eq!(resolve("A", 5).unwrap(), 880.0, epsilon = 1e-9);
        assert_relative_eq!(resolve("A", 3).unwrap(), 220.0, epsilon = 1e-9);
    }

    #[test]
    fn every_note_scales_by_octave() {
        for (pitch, reference) in NOTE_TABLE {
            for octave in -20..=40 {
                let expected = reference * 2.0_f64.powi(octave - 4);
                let actual = resolve(pitch.name(), octave).unwrap();
                assert_relative_eq!(actual, expected, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn unknown_names_resolve_to_nothing() {
        assert_eq!(resolve("H", 4), None);
        assert_eq!(resolve("Db", 4), None);
        assert_eq!(resolve("", 4), None);
        assert_eq!(resolve("c", 4), None);
    }

    #[test]
    fn extreme_octaves_never_yield_invalid_frequencies() {
        assert!(resolve("C", 50).is_some());
        assert!(resolve("C", -50).is_some());
        assert_eq!(resolve("C", 5000), None);
        assert_eq!(resolve("C", i32::MIN), None);
    }

    #[test]
    fn names_round_trip() {
        for (pitch, _) in NOTE_TABLE {
            assert_eq!(PitchClass::from_name(pitch.name()), Some(pitch));
            assert_eq!(pitch.to_string(), pitch.name());
        }
    }
}
