//! Benchmarks for the control side: building and disposing voices.

use std::{hint::black_box, time::Duration};

use criterion::Criterion;
use keytone::{
    engine::ManualClock,
    graph::Graph,
    io::{InputEvent, NullSurface},
    EngineConfig, PianoEngine,
};

pub fn bench_trigger(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/trigger");
    let clock = ManualClock::new();
    let Ok(mut engine) = PianoEngine::new(
        EngineConfig::default(),
        Graph::new(48_000.0),
        clock.clone(),
        NullSurface,
    ) else {
        return;
    };

    // Trigger, then let the voice run out and be disposed.
    group.bench_function("trigger_and_dispose", |b| {
        b.iter(|| {
            black_box(engine.trigger(black_box("A"), 4));
            engine.backend_mut().advance(1.0);
            clock.advance(Duration::from_secs(1));
            engine.tick();
        })
    });

    group.bench_function("key_press_release", |b| {
        b.iter(|| {
            engine.handle_input(black_box(&InputEvent::key_down("a")));
            engine.handle_input(black_box(&InputEvent::key_up("a")));
            engine.backend_mut().advance(1.0);
            clock.advance(Duration::from_secs(1));
            engine.tick();
        })
    });

    group.finish();
}
