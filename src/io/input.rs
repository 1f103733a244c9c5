use std::collections::HashSet;

use crate::io::keymap::KeyBinding;

/// A key on the on-screen piano, as the host reports it.
///
/// Elements carry their own note (and optionally an octave that overrides
/// the default); an element without a note is not playable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyElement {
    pub key: String,
    pub note: Option<String>,
    pub octave: Option<i32>,
}

impl KeyElement {
    pub fn new(key: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            note: Some(note.into()),
            octave: None,
        }
    }

    pub fn with_octave(mut self, octave: i32) -> Self {
        self.octave = Some(octave);
        self
    }

    /// An element the host knows about but that plays nothing.
    pub fn unplayable(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            note: None,
            octave: None,
        }
    }
}

/// Raw interaction from the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    PointerDown(KeyElement),
    PointerUp(KeyElement),
    TouchStart(KeyElement),
    TouchEnd(KeyElement),
    KeyDown { key: String, repeat: bool },
    KeyUp { key: String },
}

impl InputEvent {
    pub fn key_down(key: impl Into<String>) -> Self {
        Self::KeyDown {
            key: key.into(),
            repeat: false,
        }
    }

    pub fn key_repeat(key: impl Into<String>) -> Self {
        Self::KeyDown {
            key: key.into(),
            repeat: true,
        }
    }

    pub fn key_up(key: impl Into<String>) -> Self {
        Self::KeyUp { key: key.into() }
    }

    /// Whether this counts as a user gesture, which is what unlocks audio.
    pub fn is_interaction(&self) -> bool {
        !matches!(self, Self::PointerUp(_) | Self::TouchEnd(_) | Self::KeyUp { .. })
    }
}

/// What the engine should do in response to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Press {
        key: String,
        note: String,
        octave: i32,
    },
    Release {
        key: String,
    },
}

/// Turns raw events into press/release commands.
///
/// Tracks which computer keys are held so auto-repeat never retriggers a
/// note, even from hosts that do not flag repeats.
#[derive(Debug, Clone, Default)]
pub struct InputRouter {
    bindings: KeyBinding,
    held: HashSet<String>,
}

impl InputRouter {
    pub fn new(bindings: KeyBinding) -> Self {
        Self {
            bindings,
            held: HashSet::new(),
        }
    }

    pub fn bindings(&self) -> &KeyBinding {
        &self.bindings
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(&key.to_lowercase())
    }

    /// Forget that `key` is held without releasing it visually, for hosts
    /// that never report key-up. The press flash runs its full course.
    pub fn lift(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    pub fn route(&mut self, event: &InputEvent, default_octave: i32) -> Option<Command> {
        match event {
            InputEvent::PointerDown(element) | InputEvent::TouchStart(element) => {
                let note = element.note.clone()?;
                Some(Command::Press {
                    key: element.key.clone(),
                    note,
                    octave: element.octave.unwrap_or(default_octave),
                })
            }
            InputEvent::PointerUp(element) | InputEvent::TouchEnd(element) => {
                Some(Command::Release {
                    key: element.key.clone(),
                })
            }
            InputEvent::KeyDown { key, repeat } => {
                let key = key.to_lowercase();
                let binding = self.bindings.lookup(&key)?;
                if *repeat || !self.held.insert(key.clone()) {
                    return None;
                }
                Some(Command::Press {
                    note: binding.note.name().to_string(),
                    octave: binding.octave(default_octave),
                    key,
                })
            }
            InputEvent::KeyUp { key } => {
                let key = key.to_lowercase();
                self.held.remove(&key);
                Some(Command::Release { key })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(key: &str, note: &str, octave: i32) -> Option<Command> {
        Some(Command::Press {
            key: key.into(),
            note: note.into(),
            octave,
        })
    }

    #[test]
    fn pointer_uses_element_note_and_default_octave() {
        let mut router = InputRouter::default();
        let event = InputEvent::PointerDown(KeyElement::new("a", "C"));
        assert_eq!(router.route(&event, 3), press("a", "C", 3));
    }

    #[test]
    fn element_octave_overrides_default() {
        let mut router = InputRouter::default();
        let event = InputEvent::TouchStart(KeyElement::new("k", "C").with_octave(5));
        assert_eq!(router.route(&event, 2), press("k", "C", 5));
    }

    #[test]
    fn element_without_note_is_ignored() {
        let mut router = InputRouter::default();
        let event = InputEvent::PointerDown(KeyElement::unplayable("spacer"));
        assert_eq!(router.route(&event, 4), None);
    }

    #[test]
    fn keyboard_is_case_insensitive() {
        let mut router = InputRouter::default();
        assert_eq!(router.route(&InputEvent::key_down("W"), 4), press("w", "C#", 4));
        assert!(router.is_held("w"));
    }

    #[test]
    fn repeats_are_filtered() {
        let mut router = InputRouter::default();
        assert!(router.route(&InputEvent::key_down("a"), 4).is_some());
        assert_eq!(router.route(&InputEvent::key_repeat("a"), 4), None);
        // Unflagged repeat while still held.
        assert_eq!(router.route(&InputEvent::key_down("a"), 4), None);

        router.route(&InputEvent::key_up("a"), 4);
        assert!(router.route(&InputEvent::key_down("a"), 4).is_some());
    }

    #[test]
    fn lift_rearms_without_a_release() {
        let mut router = InputRouter::default();
        assert!(router.route(&InputEvent::key_down("a"), 4).is_some());
        router.lift("A");
        assert!(!router.is_held("a"));
        assert_eq!(router.route(&InputEvent::key_down("a"), 4), press("a", "C", 4));
    }

    #[test]
    fn unmapped_keys_do_nothing() {
        let mut router = InputRouter::default();
        assert_eq!(router.route(&InputEvent::key_down("z"), 4), None);
        assert!(!router.is_held("z"));
    }

    #[test]
    fn release_always_routes() {
        let mut router = InputRouter::default();
        assert_eq!(
            router.route(&InputEvent::key_up("Q"), 4),
            Some(Command::Release { key: "q".into() })
        );
    }

    #[test]
    fn only_down_events_are_interactions() {
        assert!(InputEvent::key_down("a").is_interaction());
        assert!(InputEvent::PointerDown(KeyElement::unplayable("x")).is_interaction());
        assert!(!InputEvent::key_up("a").is_interaction());
        assert!(!InputEvent::TouchEnd(KeyElement::unplayable("x")).is_interaction());
    }
}
