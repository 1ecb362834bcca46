//! Criterion benchmarks for the simulation hot paths
//!
//! - Emitter update with and without a modifier pipeline
//! - Serial vs parallel modifier execution
//! - Ring buffer copies across the wrap point

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use flare_kernel::prelude::*;

// =============================================================================
// Fixtures
// =============================================================================

/// An emitter filled to `live` particles, with the live range wrapped.
fn filled_emitter(live: usize, with_modifiers: bool, strategy: ExecutionStrategy) -> Emitter {
    let mut builder = EmitterBuilder::new(live, 1_000.0)
        .profile(Profile::circle(50.0, false))
        .parameters(ReleaseParameters::default().with_quantity(live as u32))
        .execution(strategy);

    if with_modifiers {
        builder = builder
            .modifier(LinearGravityModifier::new(Axis::DOWN, 9.8), 60.0)
            .modifier(DragModifier::default(), 60.0)
            .modifier(VortexModifier::new(Coordinate::ORIGIN, 1.0), 60.0)
            .modifier(ColourInterpolator::new(Colour::WHITE, Colour::BLACK), 30.0)
            .modifier(ContainerModifier::new(Coordinate::ORIGIN, 200.0, 200.0), 60.0);
    }

    let mut emitter = builder.build().expect("valid emitter");
    emitter.trigger(Coordinate::ORIGIN);
    emitter
}

/// A buffer whose live range straddles the end of the allocation.
fn wrapped_buffer(capacity: usize) -> ParticleBuffer {
    let mut buffer = ParticleBuffer::new(capacity).expect("buffer");
    buffer.release(capacity / 2);
    buffer.reclaim(capacity / 2);
    buffer.release(capacity);
    buffer
}

// =============================================================================
// Emitter update
// =============================================================================

fn bench_emitter_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("emitter_update");

    for live in [1_000usize, 10_000, 100_000] {
        group.throughput(Throughput::Elements(live as u64));

        let mut bare = filled_emitter(live, false, ExecutionStrategy::Serial);
        group.bench_with_input(BenchmarkId::new("integrate_only", live), &live, |b, _| {
            b.iter(|| bare.update(black_box(1.0 / 60.0)));
        });

        let mut serial = filled_emitter(live, true, ExecutionStrategy::Serial);
        group.bench_with_input(BenchmarkId::new("modifiers_serial", live), &live, |b, _| {
            b.iter(|| serial.update(black_box(1.0 / 60.0)));
        });

        let mut parallel = filled_emitter(live, true, ExecutionStrategy::Parallel);
        group.bench_with_input(BenchmarkId::new("modifiers_parallel", live), &live, |b, _| {
            b.iter(|| parallel.update(black_box(1.0 / 60.0)));
        });
    }

    group.finish();
}

// =============================================================================
// Render boundary
// =============================================================================

fn bench_buffer_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_copy");

    for capacity in [1_000usize, 100_000] {
        let buffer = wrapped_buffer(capacity);
        let mut records = vec![Particle::default(); capacity];
        let mut bytes = vec![0u8; capacity * Particle::SIZE];
        let mut instances = Vec::with_capacity(capacity);

        group.throughput(Throughput::Elements(capacity as u64));
        group.bench_with_input(BenchmarkId::new("copy_to", capacity), &capacity, |b, _| {
            b.iter(|| buffer.copy_to(black_box(&mut records)));
        });
        group.bench_with_input(
            BenchmarkId::new("copy_to_reversed", capacity),
            &capacity,
            |b, _| b.iter(|| buffer.copy_to_reversed(black_box(&mut records))),
        );
        group.bench_with_input(BenchmarkId::new("copy_to_bytes", capacity), &capacity, |b, _| {
            b.iter(|| buffer.copy_to_bytes(black_box(&mut bytes)));
        });
        group.bench_with_input(BenchmarkId::new("pack_instances", capacity), &capacity, |b, _| {
            b.iter(|| {
                pack_instances(&buffer, RenderingOrder::BackToFront, black_box(&mut instances));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_emitter_update, bench_buffer_copy);
criterion_main!(benches);
