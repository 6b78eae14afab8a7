use audioguard_logmel::reference::DirectExtractor;
use audioguard_logmel::{Config, Extractor, FeaturePipeline, MelFilterbank, waveform};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn bench_extract_1s(c: &mut Criterion) {
    let extractor = Extractor::shared();
    let audio = waveform::sine(440.0, 0.5, 16000, 16000);

    c.bench_function("logmel_extract_1s", |b| {
        b.iter(|| {
            let _ = black_box(extractor.extract(black_box(&audio)));
        });
    });
}

fn bench_extract_batch(c: &mut Criterion) {
    let extractor = Extractor::shared();
    let clips: Vec<Vec<f32>> = (0..16)
        .map(|i| waveform::sine(200.0 + 100.0 * i as f64, 0.5, 16000, 16000))
        .collect();

    c.bench_function("logmel_extract_batch_16", |b| {
        b.iter(|| {
            let _ = black_box(extractor.extract_batch(black_box(&clips)));
        });
    });
}

fn bench_direct_dft_1s(c: &mut Criterion) {
    let direct = DirectExtractor::new(Config::default()).unwrap();
    let audio = waveform::sine(440.0, 0.5, 16000, 16000);

    c.bench_function("logmel_direct_dft_1s", |b| {
        b.iter(|| {
            let _ = black_box(direct.extract(black_box(&audio)));
        });
    });
}

fn bench_filterbank(c: &mut Criterion) {
    let cfg = Config::default();

    c.bench_function("logmel_filterbank_build", |b| {
        b.iter(|| {
            let _ = black_box(MelFilterbank::new(black_box(&cfg)));
        });
    });
}

criterion_group!(
    benches,
    bench_extract_1s,
    bench_extract_batch,
    bench_direct_dft_1s,
    bench_filterbank,
);
criterion_main!(benches);
