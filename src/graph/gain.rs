use crate::dsp::envelope::EnvelopeProgram;
use crate::graph::node::{GraphNode, RenderCtx};
use crate::graph::backend::NodeId;

/*
Amplitude Control
=================

Scales whatever is routed into it by a level that changes over audio time.
Without a program the level is a constant (unity by default); once an
envelope program is scheduled, the level is the program evaluated relative
to the scheduled start time:

    output[i] = input[i] × program.value_at(time(i) - start)

Oscillators are routed into a gain node by id; the graph sums them into a
bus, then hands the bus to this node for in-place scaling.
*/

struct Scheduled {
    program: EnvelopeProgram,
    start: f64,
}

pub struct GainNode {
    level: f32,
    scheduled: Option<Scheduled>,
    inputs: Vec<NodeId>,
}

impl GainNode {
    pub fn new() -> Self {
        Self {
            level: 1.0,
            scheduled: None,
            inputs: Vec::new(),
        }
    }

    /// Replace any previous automation with `program`, anchored at `start`.
    pub fn schedule(&mut self, program: EnvelopeProgram, start: f64) {
        self.scheduled = Some(Scheduled { program, start });
    }

    pub fn program(&self) -> Option<&EnvelopeProgram> {
        self.scheduled.as_ref().map(|s| &s.program)
    }

    /// Level applied at audio time `time`.
    pub fn level_at(&self, time: f64) -> f32 {
        match &self.scheduled {
            Some(s) => s.program.value_at(time - s.start),
            None => self.level,
        }
    }

    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub(crate) fn add_input(&mut self, id: NodeId) {
        if !self.inputs.contains(&id) {
            self.inputs.push(id);
        }
    }

    pub(crate) fn remove_input(&mut self, id: NodeId) {
        self.inputs.retain(|input| *input != id);
    }
}

impl Default for GainNode {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphNode for GainNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            *sample *= self.level_at(ctx.time_at(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unity_without_program() {
        let mut gain = GainNode::new();
        let mut buffer = vec![0.5f32; 8];
        gain.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));
        assert!(buffer.iter().all(|&s| s == 0.5));
    }

    #[test]
    fn program_is_relative_to_start() {
        let mut gain = GainNode::new();
        let program = EnvelopeProgram::pluck(0.5, 0.01, 1.0, 0.001).unwrap();
        gain.schedule(program, 3.0);

        assert_eq!(gain.level_at(2.0), 0.0);
        assert_eq!(gain.level_at(3.0), 0.0);
        assert_relative_eq!(gain.level_at(3.01), 0.5, epsilon = 1e-5);
        assert_relative_eq!(gain.level_at(4.0), 0.001, epsilon = 1e-6);
    }

    #[test]
    fn inputs_are_deduplicated() {
        let mut gain = GainNode::new();
        gain.add_input(NodeId(1));
        gain.add_input(NodeId(1));
        gain.add_input(NodeId(2));
        assert_eq!(gain.inputs(), &[NodeId(1), NodeId(2)]);
        gain.remove_input(NodeId(1));
        assert_eq!(gain.inputs(), &[NodeId(2)]);
    }
}
