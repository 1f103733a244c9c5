/*
Computer Keyboard Layout
========================

The home row plays the white keys, the row above plays the black keys,
like a piano lying on the keyboard:

     w   e       t   y   u
   a   s   d   f   g   h   j   k
   C C#D D#E   F F#G G#A A#B   C'

`k` closes the octave: it plays C one octave above the current default.
Every other key follows the default octave.
*/

use std::collections::HashMap;

use crate::notes::PitchClass;

/// What a physical key plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub note: PitchClass,
    /// Octaves above (or below) the default; `None` follows the default.
    pub octave_offset: Option<i32>,
}

impl Binding {
    pub const fn new(note: PitchClass) -> Self {
        Self {
            note,
            octave_offset: None,
        }
    }

    pub const fn shifted(note: PitchClass, octaves: i32) -> Self {
        Self {
            note,
            octave_offset: Some(octaves),
        }
    }

    pub fn octave(&self, default_octave: i32) -> i32 {
        default_octave.saturating_add(self.octave_offset.unwrap_or(0))
    }
}

/// The embedded piano's thirteen keys, in on-screen order.
pub const PIANO_LAYOUT: [(&str, Binding); 13] = [
    ("a", Binding::new(PitchClass::C)),
    ("w", Binding::new(PitchClass::Cs)),
    ("s", Binding::new(PitchClass::D)),
    ("e", Binding::new(PitchClass::Ds)),
    ("d", Binding::new(PitchClass::E)),
    ("f", Binding::new(PitchClass::F)),
    ("t", Binding::new(PitchClass::Fs)),
    ("g", Binding::new(PitchClass::G)),
    ("y", Binding::new(PitchClass::Gs)),
    ("h", Binding::new(PitchClass::A)),
    ("u", Binding::new(PitchClass::As)),
    ("j", Binding::new(PitchClass::B)),
    ("k", Binding::shifted(PitchClass::C, 1)),
];

/// Physical key name (lower case) to binding; one binding per key.
#[derive(Debug, Clone)]
pub struct KeyBinding {
    bindings: HashMap<String, Binding>,
}

impl KeyBinding {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn piano() -> Self {
        let mut keymap = Self::empty();
        for (key, binding) in PIANO_LAYOUT {
            keymap.bind(key, binding);
        }
        keymap
    }

    /// Bind `key`, replacing whatever it played before.
    pub fn bind(&mut self, key: &str, binding: Binding) {
        self.bindings.insert(key.to_lowercase(), binding);
    }

    pub fn lookup(&self, key: &str) -> Option<Binding> {
        self.bindings.get(&key.to_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyBinding {
    fn default() -> Self {
        Self::piano()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piano_covers_a_chromatic_octave_plus_one() {
        let keymap = KeyBinding::piano();
        assert_eq!(keymap.len(), 13);
        assert_eq!(keymap.lookup("a"), Some(Binding::new(PitchClass::C)));
        assert_eq!(keymap.lookup("h"), Some(Binding::new(PitchClass::A)));
        assert_eq!(keymap.lookup("q"), None);
    }

    #[test]
    fn lookup_ignores_case() {
        let keymap = KeyBinding::piano();
        assert_eq!(keymap.lookup("W"), Some(Binding::new(PitchClass::Cs)));
    }

    #[test]
    fn top_c_sounds_above_default() {
        let binding = KeyBinding::piano().lookup("k").unwrap();
        assert_eq!(binding.note, PitchClass::C);
        assert_eq!(binding.octave(4), 5);
        assert_eq!(binding.octave(2), 3);
        assert_eq!(KeyBinding::piano().lookup("a").unwrap().octave(2), 2);
    }

    #[test]
    fn rebinding_replaces() {
        let mut keymap = KeyBinding::piano();
        keymap.bind("a", Binding::new(PitchClass::B));
        assert_eq!(keymap.len(), 13);
        assert_eq!(keymap.lookup("a").unwrap().note, PitchClass::B);
    }
}
