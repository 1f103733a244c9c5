//! Output-device backend: a [`Graph`] rendered from a cpal stream.

use std::sync::{Arc, Mutex, MutexGuard};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
#[cfg(feature = "rtrb")]
use rtrb::Producer;
use tracing::{error, info};

use crate::{
    dsp::{envelope::EnvelopeProgram, oscillator::Waveform},
    error::{Error, Result},
    graph::{
        backend::{AudioBackend, Destination, NodeId},
        offline::Graph,
    },
    MAX_BLOCK_SIZE,
};

/// Plays the synthesis graph on the host's default output device.
///
/// Nothing touches the device until [`AudioBackend::initialize`]: hosts that
/// forbid sound before a user gesture are satisfied by initializing on the
/// first interaction.
pub struct CpalBackend {
    graph: Arc<Mutex<Graph>>,
    stream: Option<cpal::Stream>,
    /// Shared with the stream callback so a failed open leaves it in place.
    #[cfg(feature = "rtrb")]
    meter: Arc<Mutex<Option<Producer<f32>>>>,
}

impl CpalBackend {
    /// `fallback_sample_rate` is used for the clock until the device reports its own.
    pub fn new(fallback_sample_rate: f32) -> Self {
        Self {
            graph: Arc::new(Mutex::new(Graph::new(fallback_sample_rate))),
            stream: None,
            #[cfg(feature = "rtrb")]
            meter: Arc::new(Mutex::new(None)),
        }
    }

    /// Push the peak of every rendered block into `meter` (dropped when full).
    #[cfg(feature = "rtrb")]
    pub fn with_meter(self, meter: Producer<f32>) -> Self {
        if let Ok(mut slot) = self.meter.lock() {
            *slot = Some(meter);
        }
        self
    }

    #[cfg(all(test, feature = "rtrb"))]
    fn has_meter(&self) -> bool {
        self.meter.lock().map(|m| m.is_some()).unwrap_or(false)
    }

    fn graph(&self) -> Result<MutexGuard<'_, Graph>> {
        self.graph
            .lock()
            .map_err(|_| Error::Stream("audio thread poisoned the graph lock".into()))
    }

    fn open_stream(&mut self) -> Result<cpal::Stream> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::BackendUnavailable("no default output device available".into()))?;
        let config = device
            .default_output_config()
            .map_err(|e| Error::BackendUnavailable(format!("failed to fetch output config: {e}")))?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;
        self.graph()?.set_sample_rate(sample_rate);
        info!(
            device = %device.name().unwrap_or_default(),
            sample_rate, channels, "opening output stream"
        );

        let graph = Arc::clone(&self.graph);
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        #[cfg(feature = "rtrb")]
        let meter = Arc::clone(&self.meter);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let Ok(mut graph) = graph.lock() else {
                        data.fill(0.0);
                        return;
                    };
                    #[cfg(feature = "rtrb")]
                    let mut meter = meter.try_lock().ok();
                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames_to_render];
                        graph.render_block(block);

                        // Duplicate mono to all channels
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        #[cfg(feature = "rtrb")]
                        if let Some(meter) = meter.as_mut().and_then(|slot| slot.as_mut()) {
                            let peak = block.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
                            let _ = meter.push(peak);
                        }

                        frames_written += frames_to_render;
                    }
                },
                move |err| error!("output stream error: {err}"),
                None,
            )
            .map_err(|e| Error::Stream(format!("failed to build output stream: {e}")))?;

        stream
            .play()
            .map_err(|e| Error::Stream(format!("failed to start output stream: {e}")))?;
        Ok(stream)
    }
}

impl AudioBackend for CpalBackend {
    fn initialize(&mut self, master_gain: f32) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        let stream = self.open_stream()?;
        self.graph()?.initialize(master_gain)?;
        self.stream = Some(stream);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.stream.is_some()
    }

    fn current_time(&self) -> f64 {
        self.graph().map(|g| g.current_time()).unwrap_or(0.0)
    }

    fn set_master_gain(&mut self, gain: f32) {
        if let Ok(mut graph) = self.graph() {
            graph.set_master_gain(gain);
        }
    }

    fn create_oscillator(&mut self, waveform: Waveform, frequency: f64) -> Result<NodeId> {
        self.graph()?.create_oscillator(waveform, frequency)
    }

    fn create_gain(&mut self) -> Result<NodeId> {
        self.graph()?.create_gain()
    }

    fn connect(&mut self, node: NodeId, destination: Destination) -> Result<()> {
        self.graph()?.connect(node, destination)
    }

    fn schedule_envelope(
        &mut self,
        gain: NodeId,
        program: &EnvelopeProgram,
        start: f64,
    ) -> Result<()> {
        self.graph()?.schedule_envelope(gain, program, start)
    }

    fn start(&mut self, oscillator: NodeId, at: f64) -> Result<()> {
        self.graph()?.start(oscillator, at)
    }

    fn stop(&mut self, oscillator: NodeId, at: f64) -> Result<()> {
        self.graph()?.stop(oscillator, at)
    }

    fn release(&mut self, node: NodeId) -> Result<()> {
        self.graph()?.release(node)
    }
}

#[cfg(all(test, feature = "rtrb"))]
mod tests {
    use rtrb::RingBuffer;

    use super::*;

    #[test]
    fn meter_survives_a_failed_initialize() {
        let (tx, _rx) = RingBuffer::<f32>::new(8);
        let mut backend = CpalBackend::new(48_000.0).with_meter(tx);
        assert!(backend.has_meter());

        // Fails on machines without an output device. The retry must still
        // find the meter attached.
        if backend.initialize(0.5).is_err() {
            assert!(!backend.is_initialized());
        }
        assert!(backend.has_meter());
    }
}
