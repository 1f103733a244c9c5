//! Display state the engine writes into

use std::collections::HashSet;

use keytone::io::Surface;

/// Pressed keys and the current-note label, drawn every frame.
#[derive(Debug, Default)]
pub struct PianoView {
    pressed: HashSet<String>,
    current_note: String,
}

impl PianoView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, key: &str) -> bool {
        self.pressed.contains(key)
    }

    pub fn current_note(&self) -> &str {
        &self.current_note
    }
}

impl Surface for PianoView {
    fn set_pressed(&mut self, key: &str, pressed: bool) {
        if pressed {
            self.pressed.insert(key.to_string());
        } else {
            self.pressed.remove(key);
        }
    }

    fn set_current_note(&mut self, label: &str) {
        self.current_note.clear();
        self.current_note.push_str(label);
    }
}
