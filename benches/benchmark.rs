//! Benchmarks for Stepper cipher operations.
//!
//! Measures key matrix construction, closed-form rotor positions, and
//! whole-text encrypt/decrypt throughput across text sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stepper::config::StepperConfig;
use stepper::key_matrix::KeyMatrix;
use stepper::normalize::PunctuationMode;
use stepper::rotor::RotorScheduler;
use stepper::Stepper;

/// Text sizes in characters.
const TEXT_SIZES: &[usize] = &[64, 1024, 16 * 1024];

/// Key used consistently across all benchmarks.
fn bench_key() -> String {
    (0..133)
        .map(|i| (b'a' + ((i * 7 + 3) % 26) as u8) as char)
        .collect()
}

/// Plain English-like text of `len` characters with spaces and digits.
fn bench_text(len: usize) -> String {
    const SAMPLE: &str = "the 7 rotors step at prime rates, 19 letters per row. ";
    SAMPLE.chars().cycle().take(len).collect()
}

/// Benchmarks `KeyMatrix::from_key_str()` with the production geometry.
fn bench_key_matrix_build(c: &mut Criterion) {
    let key = bench_key();
    let config = StepperConfig::default();
    c.bench_function("key_matrix_build", |b| {
        b.iter(|| KeyMatrix::from_key_str(black_box(&key), &config).unwrap());
    });
}

/// Benchmarks `positions_at_block()` near and far from the origin.
fn bench_positions_at_block(c: &mut Criterion) {
    let scheduler = RotorScheduler::new(&StepperConfig::default());

    let mut group = c.benchmark_group("positions_at_block");
    for &block in &[1u64, 1_000, 1_000_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(block), &block, |b, &block| {
            b.iter(|| scheduler.positions_at_block(black_box(block)));
        });
    }
    group.finish();
}

/// Benchmarks `encrypt_str()` throughput across text sizes.
fn bench_encrypt(c: &mut Criterion) {
    let stepper = Stepper::new(&bench_key()).unwrap();

    let mut group = c.benchmark_group("encrypt_str");
    for &size in TEXT_SIZES {
        let text = bench_text(size);
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| {
                stepper
                    .encrypt_str(black_box(text), PunctuationMode::Keep)
                    .unwrap()
            });
        });
    }
    group.finish();
}

/// Benchmarks `decrypt_str()` throughput across text sizes.
///
/// Decryption starts from the closed-form end state, so its cost should
/// track encryption closely.
fn bench_decrypt(c: &mut Criterion) {
    let stepper = Stepper::new(&bench_key()).unwrap();

    let mut group = c.benchmark_group("decrypt_str");
    for &size in TEXT_SIZES {
        let ct = stepper
            .encrypt_str(&bench_text(size), PunctuationMode::Keep)
            .unwrap();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ct, |b, ct| {
            b.iter(|| stepper.decrypt_str(black_box(ct)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_key_matrix_build,
    bench_positions_at_block,
    bench_encrypt,
    bench_decrypt,
);
criterion_main!(benches);
