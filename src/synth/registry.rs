use std::collections::HashMap;

use crate::synth::voice::{Voice, VoiceId};

/// Owner of every voice between registration and disposal.
///
/// Holding a voice here is what keeps its synthesis nodes alive. There is
/// no lookup by note: retriggering a note adds an independent voice, and
/// nothing is ever stolen.
#[derive(Default)]
pub struct VoiceRegistry {
    voices: HashMap<VoiceId, Voice>,
}

impl VoiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `voice`. An id that is already registered is
    /// refused and the voice handed back, so its nodes can be released.
    pub fn register(&mut self, voice: Voice) -> Result<(), Voice> {
        if self.voices.contains_key(voice.id()) {
            return Err(voice);
        }
        self.voices.insert(voice.id().clone(), voice);
        Ok(())
    }

    pub fn unregister(&mut self, id: &VoiceId) -> Option<Voice> {
        self.voices.remove(id)
    }

    pub fn get(&self, id: &VoiceId) -> Option<&Voice> {
        self.voices.get(id)
    }

    pub fn contains(&self, id: &VoiceId) -> bool {
        self.voices.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dsp::envelope::EnvelopeProgram, graph::backend::NodeId, notes::PitchClass};

    fn voice(serial: u64) -> Voice {
        Voice::new(
            VoiceId::new(PitchClass::A, 4, 0, serial),
            440.0,
            0.0,
            NodeId(serial * 2),
            NodeId(serial * 2 + 1),
            EnvelopeProgram::pluck(0.49, 0.01, 1.0, 0.001).unwrap(),
        )
    }

    #[test]
    fn register_then_unregister() {
        let mut registry = VoiceRegistry::new();
        assert!(registry.register(voice(0)).is_ok());
        assert!(registry.register(voice(1)).is_ok());
        assert_eq!(registry.len(), 2);

        let id = VoiceId::new(PitchClass::A, 4, 0, 0);
        assert!(registry.unregister(&id).is_some());
        assert!(registry.unregister(&id).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let mut registry = VoiceRegistry::new();
        assert!(registry.register(voice(7)).is_ok());
        let refused = registry.register(voice(7));
        assert!(refused.is_err());
        assert_eq!(registry.len(), 1);
    }
}
