use audioguard_logmel::reference::DirectExtractor;
use audioguard_logmel::verify::{self, Comparison, DEFAULT_TOLERANCE};
use audioguard_logmel::{
    CLIP_LENGTH_SAMPLES, Config, Extractor, FeaturePipeline, MelFilterbank, N_MELS, SAMPLE_RATE,
    log_mel_spectrogram, waveform,
};

fn tone() -> Vec<f32> {
    waveform::sine(440.0, 0.5, SAMPLE_RATE, CLIP_LENGTH_SAMPLES)
}

/// Deterministic pseudo-noise in [-1, 1).
fn noise(n: usize, seed: u64) -> Vec<f32> {
    let mut state = seed;
    (0..n)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
        })
        .collect()
}

#[test]
fn output_shape_is_fixed() {
    let cfg = Config::default();
    for len in [0, 1, 8000, CLIP_LENGTH_SAMPLES, 24000] {
        let features = log_mel_spectrogram(&noise(len, 7));
        assert_eq!(features.shape(), (101, N_MELS), "input length {len}");
        assert_eq!(features.n_frames(), cfg.n_frames());
    }
}

#[test]
fn extraction_is_idempotent() {
    let input = noise(CLIP_LENGTH_SAMPLES, 42);
    let first = log_mel_spectrogram(&input);
    let second = log_mel_spectrogram(&input);
    let a: Vec<u32> = first.as_slice().iter().map(|v| v.to_bits()).collect();
    let b: Vec<u32> = second.as_slice().iter().map(|v| v.to_bits()).collect();
    assert_eq!(a, b);
}

#[test]
fn zero_input_is_finite() {
    let features = log_mel_spectrogram(&vec![0.0; CLIP_LENGTH_SAMPLES]);
    assert!(features.as_slice().iter().all(|v| v.is_finite()));
}

#[test]
fn trailing_samples_are_ignored() {
    let base = noise(CLIP_LENGTH_SAMPLES, 3);
    let mut longer = base.clone();
    longer.extend(noise(1234, 99));
    assert_eq!(log_mel_spectrogram(&base), log_mel_spectrogram(&longer));
}

#[test]
fn short_input_equals_zero_padded() {
    let short = noise(9000, 5);
    let padded = waveform::normalize(&short, CLIP_LENGTH_SAMPLES);
    assert_eq!(log_mel_spectrogram(&short), log_mel_spectrogram(&padded));
}

#[test]
fn values_stay_within_top_db() {
    for input in [tone(), noise(CLIP_LENGTH_SAMPLES, 11), noise(300, 12)] {
        let features = log_mel_spectrogram(&input);
        let max = features.max().unwrap();
        for &v in features.as_slice() {
            assert!(v >= max - 80.0, "{v} is more than 80 dB below {max}");
        }
    }
}

#[test]
fn tone_matches_direct_dft_implementation() {
    let fast = Extractor::shared();
    let direct = DirectExtractor::new(Config::default()).unwrap();

    let result = verify::verify(fast, &direct, &tone(), DEFAULT_TOLERANCE);
    match result {
        Comparison::Match { shape, mse } => {
            assert_eq!(shape, (101, 40));
            assert!(mse < 1e-6, "mse {mse}");
        }
        other => panic!("implementations disagree:\n{other}"),
    }
}

#[test]
fn noise_matches_direct_dft_implementation() {
    let direct = DirectExtractor::new(Config::default()).unwrap();
    let input = noise(CLIP_LENGTH_SAMPLES, 2024);
    let result = verify::compare(
        &Extractor::shared().extract(&input),
        &direct.extract(&input),
        DEFAULT_TOLERANCE,
    );
    assert!(result.is_match(), "{result}");
}

#[test]
fn drift_is_detected() {
    // A constant dB offset stands in for a drifting port.
    struct Offset(Extractor);

    impl FeaturePipeline for Offset {
        fn name(&self) -> &str {
            "offset"
        }

        fn extract(&self, samples: &[f32]) -> audioguard_logmel::FeatureMatrix {
            let rows: Vec<Vec<f32>> = self
                .0
                .extract(samples)
                .rows()
                .map(|r| r.iter().map(|v| v + 0.01).collect())
                .collect();
            audioguard_logmel::FeatureMatrix::from_rows(&rows).unwrap()
        }
    }

    let broken = Offset(Extractor::new(Config::default()).unwrap());
    let result = verify::verify(Extractor::shared(), &broken, &tone(), DEFAULT_TOLERANCE);
    match result {
        Comparison::ValueMismatch {
            mismatched,
            max_abs_diff,
            ..
        } => {
            assert_eq!(mismatched, 101 * 40);
            assert!((max_abs_diff - 0.01).abs() < 1e-4);
        }
        other => panic!("expected value mismatch, got {other:?}"),
    }
}

#[test]
fn different_frame_counts_are_a_shape_mismatch() {
    let uncentered = Extractor::new(Config {
        clip_length: CLIP_LENGTH_SAMPLES - 480,
        ..Config::default()
    })
    .unwrap();
    let result = verify::verify(Extractor::shared(), &uncentered, &tone(), DEFAULT_TOLERANCE);
    assert_eq!(
        result,
        Comparison::ShapeMismatch {
            left: (101, 40),
            right: (98, 40)
        }
    );
}

#[test]
fn filterbank_rows_are_area_normalized_and_ordered() {
    let cfg = Config::default();
    let fb = MelFilterbank::new(&cfg);
    assert_eq!(fb.n_mels(), 40);
    assert_eq!(fb.n_bins(), 257);
    for m in 0..fb.n_mels() {
        let sum = fb.row_sum(m);
        assert!(sum > 0.0 && (sum - 1.0).abs() > 0.5, "row {m} sum {sum}");
    }
    assert!(fb.centers().windows(2).all(|w| w[0] < w[1]));
}
