use crate::error::{Error, Result};

/*
Envelope Programs
=================

A piano key does not hold a gate open: every triggered note runs a fixed
amplitude program and then falls silent. The program is a list of
breakpoints, each saying "reach this level by this time, using this kind of
ramp", measured from the moment the voice starts.

Vocabulary
----------

  breakpoint  (time offset, target level, ramp kind). The ramp describes
              how the level travels from the previous breakpoint to this one.

  initial     Level at offset 0, before the first breakpoint's ramp begins.

  duration    Offset of the last breakpoint. After it, the level is held.


The Pluck Shape
---------------

  Level
   peak ┐ ╱╲
        │╱  ╲
        │    ╲__
        │       ╲___
  floor └──────────────╲___──→ Time
        0 10ms            1000ms
        attack   exponential decay

  1. Start at 0 (a step straight to the peak would click).
  2. Linear ramp to `peak` over the attack.
  3. Exponential ramp toward a small floor by the end of the note.
     Exponential curves never reach 0, hence the floor (0.001).


Ramp Math
---------

Between breakpoints (t0, v0) and (t1, v1), at time t:

  linear       v = v0 + (v1 - v0) * (t - t0) / (t1 - t0)

  exponential  v = v0 * (v1 / v0) ^ ((t - t0) / (t1 - t0))

Exponential ramps are undefined when v0 is 0 or has the opposite sign of
v1; the level then holds v0 until t1 (this is what Web Audio hosts do, and
it is what happens when the volume control is at 0).
*/

/// How the level travels to a breakpoint's target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ramp {
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    /// Seconds from voice start.
    pub offset: f64,
    pub target: f32,
    pub ramp: Ramp,
}

/// Ordered amplitude breakpoints relative to a voice's start time.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvelopeProgram {
    initial: f32,
    breakpoints: Vec<Breakpoint>,
}

impl EnvelopeProgram {
    pub fn new(initial: f32) -> Self {
        Self {
            initial,
            breakpoints: Vec::new(),
        }
    }

    /// Append a breakpoint. Offsets must be strictly increasing, and
    /// exponential targets must be strictly positive.
    pub fn ramp_to(mut self, target: f32, offset: f64, ramp: Ramp) -> Result<Self> {
        if !offset.is_finite() || offset <= self.duration() {
            return Err(Error::InvalidEnvelope(format!(
                "breakpoint at {offset}s does not follow {}s",
                self.duration()
            )));
        }
        if !target.is_finite() {
            return Err(Error::InvalidEnvelope(format!("target {target} is not finite")));
        }
        if ramp == Ramp::Exponential && target <= 0.0 {
            return Err(Error::InvalidEnvelope(format!(
                "exponential ramp cannot reach {target}"
            )));
        }

        self.breakpoints.push(Breakpoint {
            offset,
            target,
            ramp,
        });
        Ok(self)
    }

    /// Attack to `peak`, then decay exponentially toward `floor` by `duration`.
    pub fn pluck(peak: f32, attack: f64, duration: f64, floor: f32) -> Result<Self> {
        Self::new(0.0)
            .ramp_to(peak, attack, Ramp::Linear)?
            .ramp_to(floor, duration, Ramp::Exponential)
    }

    pub fn initial(&self) -> f32 {
        self.initial
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    /// Offset of the last breakpoint (0 for an empty program).
    pub fn duration(&self) -> f64 {
        self.breakpoints.last().map_or(0.0, |b| b.offset)
    }

    /// Level at `elapsed` seconds after the voice started.
    pub fn value_at(&self, elapsed: f64) -> f32 {
        if elapsed <= 0.0 {
            return self.initial;
        }

        let mut from_time = 0.0;
        let mut from_level = self.initial;

        for point in &self.breakpoints {
            if elapsed < point.offset {
                let progress = (elapsed - from_time) / (point.offset - from_time);
                return match point.ramp {
                    Ramp::Linear => {
                        from_level + (point.target - from_level) * progress as f32
                    }
                    Ramp::Exponential => {
                        if from_level == 0.0 || (from_level > 0.0) != (point.target > 0.0) {
                            from_level
                        } else {
                            let ratio = (point.target / from_level) as f64;
                            (from_level as f64 * ratio.powf(progress)) as f32
                        }
                    }
                };
            }
            from_time = point.offset;
            from_level = point.target;
        }

        from_level
    }

    /// Fill `out` with levels for consecutive samples, the first at `elapsed`.
    pub fn render(&self, out: &mut [f32], elapsed: f64, sample_rate: f32) {
        let step = 1.0 / sample_rate as f64;
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.value_at(elapsed + i as f64 * step);
        }
    }
}
