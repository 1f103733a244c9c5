use std::collections::HashMap;

use tracing::info;

use crate::{
    dsp::{envelope::EnvelopeProgram, oscillator::Waveform},
    error::{Error, Result},
    graph::{
        backend::{AudioBackend, Destination, NodeId},
        gain::GainNode,
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
    },
    MAX_BLOCK_SIZE,
};

/*
In-Process Synthesis Graph
==========================

The graph root for every voice the piano plays:

  [OscNode] ─→ [GainNode] ─┐
  [OscNode] ─→ [GainNode] ─┼─→ (+) ─→ [master gain] ─→ output
  [OscNode] ─→ [GainNode] ─┘

The audio clock is a frame counter: it only moves when `render_block` is
called. A device stream calls it from the audio callback; tests call it
directly, which makes the graph a deterministic mock of the host audio
clock.

Before `initialize` there is no root: rendering outputs silence and the
clock stays at 0.
*/

pub struct Graph {
    sample_rate: f32,
    frame: u64,
    initialized: bool,
    master_gain: f32,
    next_id: u64,
    oscillators: HashMap<NodeId, OscNode>,
    gains: HashMap<NodeId, GainNode>,
    /// Oscillator -> gain routing, kept for disconnect on release.
    routes: HashMap<NodeId, NodeId>,
    master_inputs: Vec<NodeId>,
    scratch: Vec<f32>,
    bus: Vec<f32>,
}

impl Graph {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frame: 0,
            initialized: false,
            master_gain: 1.0,
            next_id: 0,
            oscillators: HashMap::new(),
            gains: HashMap::new(),
            routes: HashMap::new(),
            master_inputs: Vec::new(),
            scratch: vec![0.0; MAX_BLOCK_SIZE],
            bus: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Only meaningful before the first render; the clock is frame based.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn oscillator(&self, id: NodeId) -> Option<&OscNode> {
        self.oscillators.get(&id)
    }

    pub fn gain(&self, id: NodeId) -> Option<&GainNode> {
        self.gains.get(&id)
    }

    /// Number of live nodes (oscillators and gains).
    pub fn node_count(&self) -> usize {
        self.oscillators.len() + self.gains.len()
    }

    /// Render the mixed output, advancing the audio clock by `out.len()` frames.
    pub fn render_block(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        if !self.initialized {
            return;
        }

        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk);
        }
    }

    /// Render `frames` samples into a fresh buffer.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.render_block(&mut out);
        out
    }

    /// Render (and discard) `seconds` of audio.
    pub fn advance(&mut self, seconds: f64) {
        let frames = (seconds * self.sample_rate as f64).round() as usize;
        let mut block = vec![0.0; MAX_BLOCK_SIZE];
        let mut remaining = frames;
        while remaining > 0 {
            let n = remaining.min(MAX_BLOCK_SIZE);
            self.render_block(&mut block[..n]);
            remaining -= n;
        }
    }

    fn render_chunk(&mut self, out: &mut [f32]) {
        let frames = out.len();
        let ctx = RenderCtx::new(self.sample_rate, self.current_time());

        let Self {
            oscillators,
            gains,
            master_inputs,
            scratch,
            bus,
            ..
        } = self;

        for gain_id in master_inputs.iter() {
            let Some(gain) = gains.get_mut(gain_id) else {
                continue;
            };

            let bus = &mut bus[..frames];
            bus.fill(0.0);
            for osc_id in gain.inputs() {
                if let Some(osc) = oscillators.get_mut(osc_id) {
                    if !osc.is_active(ctx.time) {
                        continue;
                    }
                    let scratch = &mut scratch[..frames];
                    osc.render_block(scratch, &ctx);
                    for (b, s) in bus.iter_mut().zip(scratch.iter()) {
                        *b += s;
                    }
                }
            }

            gain.render_block(bus, &ctx);
            for (o, b) in out.iter_mut().zip(bus.iter()) {
                *o += b;
            }
        }

        for sample in out.iter_mut() {
            *sample *= self.master_gain;
        }

        self.frame += frames as u64;
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn require_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::BackendUnavailable("graph root not initialized".into()))
        }
    }
}

impl AudioBackend for Graph {
    fn initialize(&mut self, master_gain: f32) -> Result<()> {
        if !self.initialized {
            self.initialized = true;
            self.master_gain = master_gain;
            info!(sample_rate = self.sample_rate, "synthesis graph initialized");
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn current_time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }

    fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain;
    }

    fn create_oscillator(&mut self, waveform: Waveform, frequency: f64) -> Result<NodeId> {
        self.require_initialized()?;
        let id = self.allocate_id();
        self.oscillators.insert(id, OscNode::new(waveform, frequency));
        Ok(id)
    }

    fn create_gain(&mut self) -> Result<NodeId> {
        self.require_initialized()?;
        let id = self.allocate_id();
        self.gains.insert(id, GainNode::new());
        Ok(id)
    }

    fn connect(&mut self, node: NodeId, destination: Destination) -> Result<()> {
        match destination {
            Destination::Node(target) => {
                if !self.oscillators.contains_key(&node) {
                    return Err(Error::InvalidConnection(format!(
                        "{node:?} is not an oscillator"
                    )));
                }
                let gain = self.gains.get_mut(&target).ok_or(Error::UnknownNode(target))?;
                gain.add_input(node);
                if let Some(previous) = self.routes.insert(node, target) {
                    if previous != target {
                        if let Some(old) = self.gains.get_mut(&previous) {
                            old.remove_input(node);
                        }
                    }
                }
                Ok(())
            }
            Destination::Master => {
                if !self.gains.contains_key(&node) {
                    return Err(Error::InvalidConnection(format!(
                        "only gain nodes feed the master stage, got {node:?}"
                    )));
                }
                if !self.master_inputs.contains(&node) {
                    self.master_inputs.push(node);
                }
                Ok(())
            }
        }
    }

    fn schedule_envelope(
        &mut self,
        gain: NodeId,
        program: &EnvelopeProgram,
        start: f64,
    ) -> Result<()> {
        let node = self.gains.get_mut(&gain).ok_or(Error::UnknownNode(gain))?;
        node.schedule(program.clone(), start);
        Ok(())
    }

    fn start(&mut self, oscillator: NodeId, at: f64) -> Result<()> {
        let node = self
            .oscillators
            .get_mut(&oscillator)
            .ok_or(Error::UnknownNode(oscillator))?;
        node.start_at(at);
        Ok(())
    }

    fn stop(&mut self, oscillator: NodeId, at: f64) -> Result<()> {
        let node = self
            .oscillators
            .get_mut(&oscillator)
            .ok_or(Error::UnknownNode(oscillator))?;
        node.stop_at(at);
        Ok(())
    }

    fn release(&mut self, node: NodeId) -> Result<()> {
        if self.oscillators.remove(&node).is_some() {
            if let Some(gain) = self.routes.remove(&node) {
                if let Some(gain) = self.gains.get_mut(&gain) {
                    gain.remove_input(node);
                }
            }
            return Ok(());
        }

        if let Some(gain) = self.gains.remove(&node) {
            for input in gain.inputs() {
                self.routes.remove(input);
            }
            self.master_inputs.retain(|id| *id != node);
            return Ok(());
        }

        Err(Error::UnknownNode(node))
    }
}
