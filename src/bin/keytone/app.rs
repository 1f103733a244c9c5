//! App - wires the terminal, the piano engine and the output device together

use std::time::Duration;

use color_eyre::eyre::{eyre, Result as EyreResult};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::DefaultTerminal;
use rtrb::{Consumer, RingBuffer};
use tracing::info;

use keytone::{
    engine::SystemClock,
    graph::device::CpalBackend,
    io::{hit_test, InputEvent, KeyArea, KeyElement},
    EngineConfig, PianoEngine,
};

use crate::ui::{self, PianoView, Status};

// Tunables
const FRAME_INTERVAL: Duration = Duration::from_millis(16); // ~60fps
const METER_RING_LEN: usize = 256; // Block peaks between UI frames
const METER_FALLOFF: f32 = 0.85;
const VOLUME_STEP: i32 = 5;

type Engine = PianoEngine<CpalBackend, SystemClock, PianoView>;

pub struct App {
    engine: Engine,
    meter_rx: Consumer<f32>,
    level: f32,
    /// Terminal reports key release and repeat.
    enhanced: bool,
    keys: Vec<KeyArea>,
    /// Element the mouse button went down on.
    pointer: Option<KeyElement>,
    should_quit: bool,
}

impl App {
    pub fn new(config: EngineConfig, enhanced: bool) -> EyreResult<Self> {
        let (meter_tx, meter_rx) = RingBuffer::<f32>::new(METER_RING_LEN);
        let backend = CpalBackend::new(config.sample_rate).with_meter(meter_tx);
        let engine = PianoEngine::new(config, backend, SystemClock::new(), PianoView::new())
            .map_err(|e| eyre!("invalid engine configuration: {e}"))?;

        info!(enhanced, "keytone starting");
        Ok(Self {
            engine,
            meter_rx,
            level: 0.0,
            enhanced,
            keys: Vec::new(),
            pointer: None,
            should_quit: false,
        })
    }

    pub fn run(&mut self, mut terminal: DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.engine.tick();
            self.poll_meter();

            terminal.draw(|frame| {
                let status = Status {
                    current_note: self.engine.surface().current_note(),
                    control: self.engine.control(),
                    voices: self.engine.registry().len(),
                    level: self.level,
                };
                self.keys = ui::render(frame, self.engine.surface(), &status);
            })?;

            if event::poll(FRAME_INTERVAL)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    fn poll_meter(&mut self) {
        let mut peak = 0.0f32;
        while let Ok(block_peak) = self.meter_rx.pop() {
            peak = peak.max(block_peak);
        }
        self.level = peak.max(self.level * METER_FALLOFF);
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
        {
            self.should_quit = true;
            return;
        }

        match (key.code, key.kind) {
            (KeyCode::Char(c), kind) => self.handle_note_key(c, kind),
            (_, KeyEventKind::Release) => {}
            (KeyCode::Up, _) => self.nudge_volume(VOLUME_STEP),
            (KeyCode::Down, _) => self.nudge_volume(-VOLUME_STEP),
            (KeyCode::Right, _) => self.nudge_octave(1),
            (KeyCode::Left, _) => self.nudge_octave(-1),
            (KeyCode::Tab, KeyEventKind::Press) => {
                let next = self.engine.control().waveform().next();
                self.engine.set_waveform(next);
            }
            _ => {}
        }
    }

    fn handle_note_key(&mut self, c: char, kind: KeyEventKind) {
        let name = c.to_string();
        match kind {
            KeyEventKind::Press => {
                self.engine.handle_input(&InputEvent::key_down(name.as_str()));
                // Without release events every press is a full tap; the
                // highlight is left to the flash timer.
                if !self.enhanced {
                    self.engine.lift_key(&name);
                }
            }
            KeyEventKind::Repeat => self.engine.handle_input(&InputEvent::key_repeat(name)),
            KeyEventKind::Release => self.engine.handle_input(&InputEvent::key_up(name)),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let octave = self.engine.control().default_octave();
                let Some(element) =
                    hit_test(&self.keys, mouse.column, mouse.row).map(|k| k.element(octave))
                else {
                    return;
                };
                self.engine
                    .handle_input(&InputEvent::PointerDown(element.clone()));
                self.pointer = Some(element);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(element) = self.pointer.take() {
                    self.engine.handle_input(&InputEvent::PointerUp(element));
                }
            }
            _ => {}
        }
    }

    fn nudge_volume(&mut self, step: i32) {
        let percent = (self.engine.control().volume() * 100.0).round() as i32;
        self.engine.set_volume_percent(percent + step);
    }

    fn nudge_octave(&mut self, step: i32) {
        let octave = self.engine.control().default_octave();
        self.engine.set_default_octave(octave + step);
    }
}
