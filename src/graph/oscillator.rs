use crate::dsp::oscillator::{OscillatorBlock, Waveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Scheduled Oscillator
====================

A voice's signal generator. Shape and frequency are fixed when the node is
created; the node is silent until its start time on the audio clock and
silent again from its stop time onward.

  time  ──────┬───────────────────────┬──────→
              start                   stop
  output  0   │ ∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿ │   0

Start and stop are checked per sample, so the cut happens on the exact
sample the audio clock reaches the stop time, regardless of block size or
event-loop jitter. The phase starts at 0 on the first sounding sample.
*/

pub struct OscNode {
    osc: OscillatorBlock,
    start: Option<f64>,
    stop: Option<f64>,
}

impl OscNode {
    pub fn new(waveform: Waveform, frequency: f64) -> Self {
        Self {
            osc: OscillatorBlock::new(waveform, frequency),
            start: None,
            stop: None,
        }
    }

    pub fn start_at(&mut self, time: f64) {
        self.start = Some(time);
        self.osc.reset();
    }

    pub fn stop_at(&mut self, time: f64) {
        self.stop = Some(time);
    }

    pub fn waveform(&self) -> Waveform {
        self.osc.waveform()
    }

    pub fn frequency(&self) -> f64 {
        self.osc.frequency()
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start
    }

    pub fn stop_time(&self) -> Option<f64> {
        self.stop
    }

    /// True while the oscillator produces samples at `time`.
    pub fn is_sounding(&self, time: f64) -> bool {
        let started = self.start.is_some_and(|start| time >= start);
        let stopped = self.stop.is_some_and(|stop| time >= stop);
        started && !stopped
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = if self.is_sounding(ctx.time_at(i)) {
                self.osc.next_sample(ctx.sample_rate)
            } else {
                0.0
            };
        }
    }

    fn is_active(&self, time: f64) -> bool {
        !self.stop.is_some_and(|stop| time >= stop)
    }
}
