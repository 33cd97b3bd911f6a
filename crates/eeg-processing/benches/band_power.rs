//! Conditioning and band decomposition throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use eeg_core::FrequencyBand;
use eeg_processing::{condition, decompose, welch_psd, WelchConfig};
use eeg_simulation::{EegSimulator, SimulatorConfig};

fn recording(channels: usize, seconds: f64) -> eeg_core::EegSignal {
    let mut config = SimulatorConfig {
        duration_secs: seconds,
        ..SimulatorConfig::default()
    };
    config.channel_names.truncate(channels);
    EegSimulator::new(config)
        .and_then(|simulator| simulator.generate(1, 1))
        .expect("simulated recording")
}

fn bench_conditioning(c: &mut Criterion) {
    let mut group = c.benchmark_group("conditioning");

    for &channels in &[1usize, 8, 19] {
        let signal = recording(channels, 60.0);
        group.bench_with_input(BenchmarkId::new("condition", format!("{}ch_60s", channels)), &signal, |b, signal| {
            b.iter(|| black_box(condition(black_box(signal)).expect("condition")));
        });
    }

    group.finish();
}

fn bench_decomposition(c: &mut Criterion) {
    let mut group = c.benchmark_group("decomposition");
    let bands = FrequencyBand::canonical();

    for &seconds in &[10.0, 60.0] {
        let conditioned = condition(&recording(19, seconds)).expect("condition");
        group.bench_with_input(BenchmarkId::new("canonical_bands", format!("19ch_{}s", seconds)), &conditioned, |b, signal| {
            b.iter(|| black_box(decompose(black_box(signal), &bands).expect("decompose")));
        });
    }

    group.finish();
}

fn bench_welch(c: &mut Criterion) {
    let signal = recording(19, 60.0);
    let config = WelchConfig::default();
    c.bench_function("welch_psd_19ch_60s", |b| {
        b.iter(|| black_box(welch_psd(black_box(&signal), &config).expect("welch")));
    });
}

criterion_group!(benches, bench_conditioning, bench_decomposition, bench_welch);
criterion_main!(benches);
