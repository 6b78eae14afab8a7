//! Log-mel spectrogram feature extraction for one-second audio clips.
//!
//! # Pipeline
//!
//! The extractor turns a mono 16 kHz waveform into a `[n_frames, n_mels]`
//! f32 matrix in strictly linear stages:
//!
//! 1. [`waveform::normalize`]: pad or truncate to exactly one clip
//! 2. [`window`]: reflect-pad by `n_fft / 2`, slice into hops, periodic Hann
//! 3. [`fft::Fft`]: unnormalized power spectrum, `n_fft / 2 + 1` bins
//! 4. [`MelFilterbank`]: area-normalized triangular filters on the mel scale
//! 5. [`db::power_to_db`]: dB relative to the clip maximum, clipped at `top_db`
//! 6. [`FeatureMatrix`]: time-major output
//!
//! With the default constants the output shape is `[101, 40]`.
//!
//! # Verification
//!
//! [`reference::DirectExtractor`] is an independent implementation of the same
//! stages built on a direct DFT. [`verify::compare`] checks two feature
//! matrices by shape and then element-wise within an absolute tolerance
//! (`1e-4` by default), reporting MSE on success.
//!
//! ```rust
//! use audioguard_logmel::{log_mel_spectrogram, waveform};
//!
//! let tone = waveform::sine(440.0, 0.5, 16000, 16000);
//! let features = log_mel_spectrogram(&tone);
//! assert_eq!(features.shape(), (101, 40));
//! ```

mod config;
pub mod db;
mod error;
mod extractor;
pub mod fft;
mod matrix;
pub mod mel;
pub mod reference;
pub mod verify;
pub mod waveform;
pub mod window;

pub use config::{
    AMIN, CLIP_LENGTH_SAMPLES, Config, FMAX, FMIN, HOP_LENGTH, N_FFT, N_MELS, SAMPLE_RATE,
    TOP_DB,
};
pub use error::{Error, Result};
pub use extractor::{Extractor, log_mel_spectrogram};
pub use matrix::FeatureMatrix;
pub use mel::MelFilterbank;
pub use verify::{Comparison, FeaturePipeline, compare};
