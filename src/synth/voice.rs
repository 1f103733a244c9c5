use std::fmt;

use crate::{
    dsp::envelope::EnvelopeProgram,
    error::Result,
    graph::backend::{AudioBackend, NodeId},
    notes::PitchClass,
};

/// Identity of one triggered voice.
///
/// Built from the note, octave and trigger timestamp like a human-readable
/// key, plus a per-engine serial number: two triggers of the same note in
/// the same millisecond still get different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoiceId {
    pitch: PitchClass,
    octave: i32,
    timestamp_ms: u64,
    serial: u64,
}

impl VoiceId {
    pub(crate) fn new(pitch: PitchClass, octave: i32, timestamp_ms: u64, serial: u64) -> Self {
        Self {
            pitch,
            octave,
            timestamp_ms,
            serial,
        }
    }

    pub fn serial(&self) -> u64 {
        self.serial
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}@{}#{}",
            self.pitch, self.octave, self.timestamp_ms, self.serial
        )
    }
}

/// Where a voice is in its fixed life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Attacking, // Ramping from silence to the peak
    Decaying,  // Exponential fall toward the floor, generator running
    Silent,    // Generator stopped, waiting for disposal
}

/// One triggered note: a generator and its amplitude node, owned until disposal.
pub struct Voice {
    id: VoiceId,
    frequency: f64,
    start_time: f64,
    oscillator: NodeId,
    amplitude: NodeId,
    envelope: EnvelopeProgram,
}

impl Voice {
    pub(crate) fn new(
        id: VoiceId,
        frequency: f64,
        start_time: f64,
        oscillator: NodeId,
        amplitude: NodeId,
        envelope: EnvelopeProgram,
    ) -> Self {
        Self {
            id,
            frequency,
            start_time,
            oscillator,
            amplitude,
            envelope,
        }
    }

    pub fn id(&self) -> &VoiceId {
        &self.id
    }

    pub fn pitch(&self) -> PitchClass {
        self.id.pitch
    }

    pub fn octave(&self) -> i32 {
        self.id.octave
    }

    /// Note name and octave as shown on the current-note label, e.g. `C#5`.
    pub fn label(&self) -> String {
        format!("{}{}", self.id.pitch, self.id.octave)
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Audio-clock time the generator started.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Audio-clock time the generator stops; the end of the envelope.
    pub fn stop_time(&self) -> f64 {
        self.start_time + self.envelope.duration()
    }

    pub fn oscillator(&self) -> NodeId {
        self.oscillator
    }

    pub fn amplitude(&self) -> NodeId {
        self.amplitude
    }

    pub fn envelope(&self) -> &EnvelopeProgram {
        &self.envelope
    }

    pub fn state_at(&self, time: f64) -> VoiceState {
        let attack_end = self
            .envelope
            .breakpoints()
            .first()
            .map_or(0.0, |b| b.offset);

        if time < self.start_time + attack_end {
            VoiceState::Attacking
        } else if time < self.stop_time() {
            VoiceState::Decaying
        } else {
            VoiceState::Silent
        }
    }

    /// Hand both synthesis nodes back to the backend.
    pub(crate) fn release<B: AudioBackend>(self, backend: &mut B) -> Result<()> {
        let oscillator = backend.release(self.oscillator);
        let amplitude = backend.release(self.amplitude);
        oscillator.and(amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice(serial: u64) -> Voice {
        let envelope = EnvelopeProgram::pluck(0.49, 0.01, 1.0, 0.001).unwrap();
        Voice::new(
            VoiceId::new(PitchClass::Cs, 5, 1_700, serial),
            554.36,
            2.0,
            NodeId(0),
            NodeId(1),
            envelope,
        )
    }

    #[test]
    fn label_and_id_formatting() {
        let voice = voice(3);
        assert_eq!(voice.label(), "C#5");
        assert_eq!(voice.id().to_string(), "C#5@1700#3");
    }

    #[test]
    fn same_note_same_millisecond_differs_by_serial() {
        assert_ne!(voice(0).id(), voice(1).id());
    }

    #[test]
    fn stop_time_is_end_of_envelope() {
        assert_eq!(voice(0).stop_time(), 3.0);
    }

    #[test]
    fn state_follows_audio_time() {
        let voice = voice(0);
        assert_eq!(voice.state_at(2.0), VoiceState::Attacking);
        assert_eq!(voice.state_at(2.005), VoiceState::Attacking);
        assert_eq!(voice.state_at(2.5), VoiceState::Decaying);
        assert_eq!(voice.state_at(3.0), VoiceState::Silent);
    }
}
