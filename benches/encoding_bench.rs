use criterion::{
    criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion,
    PlotConfiguration, Throughput,
};
use std::hint::black_box;
use rand::Rng;
use std::env;
use std::time::Duration;

use base64_lanes::{Backend, STANDARD as LANES};

// Reference implementations
use base64::{prelude::BASE64_STANDARD as STD_ENGINE, Engine as _};
use base64_simd::STANDARD as SIMD_ENGINE;

fn generate_random_data(size: usize) -> Vec<u8> {
    let mut data = vec![0u8; size];
    rand::rng().fill(&mut data[..]);
    data
}

/// Selects benchmarks through `BENCH_TARGET`, a comma-separated list.
///
/// Targets: `lanes` (default), `scalar`, `std`, `simd`, `all`.
fn should_run(target_name: &str) -> bool {
    let var = env::var("BENCH_TARGET").unwrap_or_else(|_| "lanes".to_string());
    var.split(',')
        .map(|s| s.trim().to_lowercase())
        .any(|t| t == "all" || t == target_name)
}

fn bench_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Base64_Throughput");

    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));
    group.measurement_time(Duration::from_secs(10));
    group.warm_up_time(Duration::from_secs(3));
    group.noise_threshold(0.05);

    let detected = Backend::detect();
    let sizes = [
        24,               // one AVX2 encode block, still scalar
        48,               // first size with vector decode on AVX2
        64,               // first size with vector decode on NEON
        4 * 1024,
        64 * 1024,
        1024 * 1024,
    ];

    for &size in sizes.iter() {
        let input_data = generate_random_data(size);
        let encoded = STD_ENGINE.encode(&input_data);

        // ======================================================================
        // ENCODE
        // ======================================================================
        group.throughput(Throughput::Bytes(size as u64));

        let mut enc_buf = vec![0u8; LANES.encoded_len(size)];

        if should_run("lanes") {
            let id = format!("Encode/{detected}");
            group.bench_with_input(BenchmarkId::new(id, size), &input_data, |b, d| {
                b.iter(|| LANES.encode_with_backend(detected, black_box(d), black_box(&mut enc_buf)))
            });
        }

        if should_run("scalar") {
            group.bench_with_input(BenchmarkId::new("Encode/scalar", size), &input_data, |b, d| {
                b.iter(|| LANES.encode_with_backend(Backend::Scalar, black_box(d), black_box(&mut enc_buf)))
            });
        }

        if should_run("std") {
            group.bench_with_input(BenchmarkId::new("Encode/Std", size), &input_data, |b, d| {
                b.iter(|| STD_ENGINE.encode(black_box(d)))
            });
        }

        if should_run("simd") {
            group.bench_with_input(BenchmarkId::new("Encode/Simd", size), &input_data, |b, d| {
                b.iter(|| SIMD_ENGINE.encode_to_string(black_box(d)))
            });
        }

        // ======================================================================
        // DECODE
        // ======================================================================

        // Throughput of the text side
        group.throughput(Throughput::Bytes(encoded.len() as u64));

        let mut dec_buf = vec![0u8; LANES.estimate_decoded_len(encoded.len())];

        if should_run("lanes") {
            let id = format!("Decode/{detected}");
            group.bench_with_input(BenchmarkId::new(id, size), &encoded, |b, s| {
                b.iter(|| LANES.decode_with_backend(detected, black_box(s.as_bytes()), black_box(&mut dec_buf)))
            });
        }

        if should_run("scalar") {
            group.bench_with_input(BenchmarkId::new("Decode/scalar", size), &encoded, |b, s| {
                b.iter(|| LANES.decode_with_backend(Backend::Scalar, black_box(s.as_bytes()), black_box(&mut dec_buf)))
            });
        }

        if should_run("std") {
            group.bench_with_input(BenchmarkId::new("Decode/Std", size), &encoded, |b, s| {
                b.iter(|| STD_ENGINE.decode(black_box(s)))
            });
        }

        if should_run("simd") {
            group.bench_with_input(BenchmarkId::new("Decode/Simd", size), &encoded, |b, s| {
                b.iter(|| SIMD_ENGINE.decode_to_vec(black_box(s)))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_comparison);
criterion_main!(benches);
