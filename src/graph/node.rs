/// Context passed to graph nodes during rendering
///
/// Contains information about what to render:
/// - sample_rate: Audio sample rate (e.g., 48000.0)
/// - time: Audio-clock time of the first sample in the block, in seconds
pub struct RenderCtx {
    pub sample_rate: f32,
    pub time: f64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32, time: f64) -> Self {
        Self { sample_rate, time }
    }

    /// Audio-clock time of sample `index` within the block.
    #[inline]
    pub fn time_at(&self, index: usize) -> f64 {
        self.time + index as f64 / self.sample_rate as f64
    }
}

/// Core trait for audio processing graph nodes
///
/// Sources (oscillators) overwrite `out`; processors (gain stages)
/// transform it in place.
pub trait GraphNode: Send {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx);

    /// Check if this node can still produce sound at audio time `time`
    ///
    /// Default implementation is always active (gain stages).
    fn is_active(&self, _time: f64) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_times_follow_sample_rate() {
        let ctx = RenderCtx::new(1_000.0, 2.0);
        assert_eq!(ctx.time_at(0), 2.0);
        assert!((ctx.time_at(500) - 2.5).abs() < 1e-12);
    }
}
