use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::{
    config::EngineConfig,
    dsp::{envelope::EnvelopeProgram, oscillator::Waveform},
    engine::{clock::Clock, scheduler::Scheduler},
    error::Result,
    graph::backend::{AudioBackend, Destination, NodeId},
    io::{
        input::{Command, InputEvent, InputRouter},
        keymap::KeyBinding,
        surface::Surface,
    },
    notes::PitchClass,
    synth::{
        control::ControlState,
        registry::VoiceRegistry,
        voice::{Voice, VoiceId},
    },
};

/*
Piano Engine
============

Every trigger builds a fresh, independent voice and arms two timers:

  audio clock:  start ──── 10ms attack ──── exponential decay ──── stop
                  t0                                              t0 + 1s
  wall clock:   now ── 200ms ─→ ClearPressed(key)
                now ────────────────── 1000ms ──────────────────→ Dispose(id)

The audio-clock side is programmed into the backend once and runs on its
own. The wall-clock side lives in `timers` and fires from `tick`, which
the host event loop calls whenever it wakes up.

The two clocks drift. A disposal that fires before the audio clock has
reached the voice's stop time is pushed back by the remaining audio time,
so nodes are never released while they can still be heard.
*/

/// Audio time slack when comparing against a voice's stop time.
const STOP_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Task {
    Dispose(VoiceId),
    ClearPressed(String),
}

/// A polyphonic one-shot piano over an [`AudioBackend`].
///
/// The engine owns the control state, the registry of live voices and the
/// wall-clock timers. It is driven entirely from one thread: input events
/// and control changes go in through `&mut self`, and [`tick`] runs any
/// timers that have come due.
///
/// [`tick`]: PianoEngine::tick
pub struct PianoEngine<B, C, S> {
    config: EngineConfig,
    backend: B,
    clock: C,
    surface: S,
    control: ControlState,
    registry: VoiceRegistry,
    router: InputRouter,
    timers: Scheduler<Task>,
    next_serial: u64,
}

impl<B, C, S> PianoEngine<B, C, S>
where
    B: AudioBackend,
    C: Clock,
    S: Surface,
{
    pub fn new(config: EngineConfig, backend: B, clock: C, surface: S) -> Result<Self> {
        Self::with_bindings(config, backend, clock, surface, KeyBinding::piano())
    }

    pub fn with_bindings(
        config: EngineConfig,
        backend: B,
        clock: C,
        mut surface: S,
        bindings: KeyBinding,
    ) -> Result<Self> {
        config.validate()?;
        let control = ControlState::new(&config);
        surface.set_current_note(&format!("{}{}", PitchClass::C, control.default_octave()));

        Ok(Self {
            config,
            backend,
            clock,
            surface,
            control,
            registry: VoiceRegistry::new(),
            router: InputRouter::new(bindings),
            timers: Scheduler::new(),
            next_serial: 0,
        })
    }

    /// Bring the backend up once. Later calls do nothing.
    pub fn ensure_initialized(&mut self) -> Result<()> {
        if self.control.backend_ready() {
            return Ok(());
        }
        self.backend.initialize(self.control.volume())?;
        self.control.mark_backend_ready();
        info!(volume = self.control.volume(), "audio backend ready");
        Ok(())
    }

    /// Play `note` at `octave` as a new voice.
    ///
    /// Returns `None` when the note name is unknown or the backend fails;
    /// failures are logged and leave no voice or nodes behind.
    pub fn trigger(&mut self, note: &str, octave: i32) -> Option<VoiceId> {
        let pitch = PitchClass::from_name(note)?;
        let Some(frequency) = pitch.frequency(octave) else {
            debug!(note, octave, "no playable frequency");
            return None;
        };

        if let Err(err) = self.ensure_initialized() {
            error!(%err, "cannot initialize audio backend");
            return None;
        }

        let start = self.backend.current_time();
        let voice = match self.build_voice(pitch, octave, frequency, start) {
            Ok(voice) => voice,
            Err(err) => {
                error!(%err, note, octave, "failed to build voice");
                return None;
            }
        };

        let id = voice.id().clone();
        let label = voice.label();
        if let Err(voice) = self.registry.register(voice) {
            error!(id = %voice.id(), "voice id already registered");
            if let Err(err) = voice.release(&mut self.backend) {
                warn!(%err, "failed to release refused voice");
            }
            return None;
        }

        let due = self.clock.now() + self.config.voice_duration;
        self.timers.schedule(due, Task::Dispose(id.clone()));
        self.surface.set_current_note(&label);
        debug!(%id, frequency, start, "voice triggered");
        Some(id)
    }

    fn build_voice(
        &mut self,
        pitch: PitchClass,
        octave: i32,
        frequency: f64,
        start: f64,
    ) -> Result<Voice> {
        let duration = self.config.voice_duration.as_secs_f64();
        let envelope = EnvelopeProgram::pluck(
            self.control.volume() * self.config.peak_scale,
            self.config.attack.as_secs_f64(),
            duration,
            self.config.decay_floor,
        )?;

        let oscillator = self
            .backend
            .create_oscillator(self.control.waveform(), frequency)?;
        let amplitude = match self.backend.create_gain() {
            Ok(amplitude) => amplitude,
            Err(err) => {
                self.discard(&[oscillator]);
                return Err(err);
            }
        };

        let wired = self.wire(oscillator, amplitude, &envelope, start, start + duration);
        if let Err(err) = wired {
            self.discard(&[oscillator, amplitude]);
            return Err(err);
        }

        let serial = self.next_serial;
        self.next_serial += 1;
        let timestamp_ms = self.clock.now().as_millis() as u64;
        let id = VoiceId::new(pitch, octave, timestamp_ms, serial);

        Ok(Voice::new(
            id, frequency, start, oscillator, amplitude, envelope,
        ))
    }

    fn wire(
        &mut self,
        oscillator: NodeId,
        amplitude: NodeId,
        envelope: &EnvelopeProgram,
        start: f64,
        stop: f64,
    ) -> Result<()> {
        self.backend
            .connect(oscillator, Destination::Node(amplitude))?;
        self.backend.connect(amplitude, Destination::Master)?;
        self.backend.schedule_envelope(amplitude, envelope, start)?;
        self.backend.start(oscillator, start)?;
        self.backend.stop(oscillator, stop)
    }

    fn discard(&mut self, nodes: &[NodeId]) {
        for node in nodes {
            if let Err(err) = self.backend.release(*node) {
                warn!(%err, ?node, "failed to release node");
            }
        }
    }

    fn dispose(&mut self, id: VoiceId) {
        let Some(voice) = self.registry.get(&id) else {
            return;
        };

        let now = self.backend.current_time();
        let remaining = voice.stop_time() - now;
        if remaining > STOP_TOLERANCE {
            warn!(%id, remaining, "audio clock behind, deferring disposal");
            let due = self.clock.now() + Duration::from_secs_f64(remaining);
            self.timers.schedule(due, Task::Dispose(id));
            return;
        }

        if let Some(voice) = self.registry.unregister(&id) {
            if let Err(err) = voice.release(&mut self.backend) {
                warn!(%err, %id, "failed to release voice nodes");
            }
            debug!(%id, "voice disposed");
        }
    }

    /// Feed one host input event through the router.
    pub fn handle_input(&mut self, event: &InputEvent) {
        if event.is_interaction() {
            if let Err(err) = self.ensure_initialized() {
                error!(%err, "cannot initialize audio backend");
            }
        }

        match self.router.route(event, self.control.default_octave()) {
            Some(Command::Press { key, note, octave }) => {
                self.surface.set_pressed(&key, true);
                let due = self.clock.now() + self.config.pressed_flash;
                self.timers.schedule(due, Task::ClearPressed(key));
                self.trigger(&note, octave);
            }
            Some(Command::Release { key }) => self.surface.set_pressed(&key, false),
            None => {}
        }
    }

    /// Let `key` trigger again without clearing its highlight. Hosts that
    /// cannot report key-up call this right after each key-down so the
    /// 200 ms flash still shows.
    pub fn lift_key(&mut self, key: &str) {
        self.router.lift(key);
    }

    /// Run every timer that is due on the wall clock. Returns how many ran.
    pub fn tick(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;
        while let Some(task) = self.timers.pop_due(now) {
            match task {
                Task::Dispose(id) => self.dispose(id),
                Task::ClearPressed(key) => self.surface.set_pressed(&key, false),
            }
            fired += 1;
        }
        fired
    }

    /// When the next timer becomes due, for hosts that sleep between ticks.
    pub fn next_timer(&self) -> Option<Duration> {
        self.timers.next_due()
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.control.set_volume(volume);
        self.push_master_gain();
    }

    /// Volume slider position, 0..=100.
    pub fn set_volume_percent(&mut self, percent: i32) {
        self.control.set_volume_percent(percent);
        self.push_master_gain();
    }

    fn push_master_gain(&mut self) {
        if self.backend.is_initialized() {
            self.backend.set_master_gain(self.control.volume());
        }
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.control.set_waveform(waveform);
    }

    /// Waveform selector by name; unknown names leave the selection as is.
    pub fn set_waveform_name(&mut self, name: &str) {
        match name.parse::<Waveform>() {
            Ok(waveform) => self.set_waveform(waveform),
            Err(err) => warn!(%err, "ignoring waveform selection"),
        }
    }

    pub fn set_default_octave(&mut self, octave: i32) {
        self.control.set_default_octave(octave);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    pub fn registry(&self) -> &VoiceRegistry {
        &self.registry
    }

    pub fn router(&self) -> &InputRouter {
        &self.router
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
