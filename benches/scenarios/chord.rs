//! Benchmarks for rendering sounding voices through the graph root.

use std::hint::black_box;

use criterion::{BatchSize, BenchmarkId, Criterion};
use keytone::{
    engine::ManualClock,
    graph::Graph,
    io::NullSurface,
    EngineConfig, PianoEngine,
};

use crate::BLOCK_SIZES;

type ChordEngine = PianoEngine<Graph, ManualClock, NullSurface>;

/// A ten-finger chord, two octaves of C major.
const CHORD: &[(&str, i32)] = &[
    ("C", 3),
    ("E", 3),
    ("G", 3),
    ("B", 3),
    ("D", 4),
    ("C", 4),
    ("E", 4),
    ("G", 4),
    ("B", 4),
    ("D", 5),
];

/// Fresh engine with `voices` notes sounding, past the attack.
///
/// Rendering moves the audio clock, so each batch gets its own chord
/// instead of letting the voices run out over the measurement.
fn sounding_chord(voices: usize) -> Option<ChordEngine> {
    let mut engine = PianoEngine::new(
        EngineConfig::default(),
        Graph::new(48_000.0),
        ManualClock::new(),
        NullSurface,
    )
    .ok()?;
    for &(note, octave) in &CHORD[..voices] {
        engine.trigger(note, octave)?;
    }
    engine.backend_mut().advance(0.05);
    Some(engine)
}

pub fn bench_chord(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/chord");

    for &size in BLOCK_SIZES {
        for voices in [1, 3, 10] {
            if sounding_chord(voices).is_none() {
                continue;
            }

            group.bench_with_input(
                BenchmarkId::new(format!("voices_{voices}"), size),
                &size,
                |b, &size| {
                    b.iter_batched(
                        || (sounding_chord(voices), vec![0.0f32; size]),
                        |(mut engine, mut buffer)| {
                            if let Some(engine) = engine.as_mut() {
                                engine.backend_mut().render_block(black_box(&mut buffer));
                            }
                            // Dropped outside the measurement.
                            (engine, buffer)
                        },
                        BatchSize::SmallInput,
                    )
                },
            );
        }
    }

    group.finish();
}
