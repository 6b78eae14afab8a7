//! Pipeline constants and configuration.
//!
//! Every implementation that claims parity must run with the same constants;
//! changing any of them changes the output shape or values.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Input sample rate in Hz.
pub const SAMPLE_RATE: usize = 16000;
/// Samples per clip (one second).
pub const CLIP_LENGTH_SAMPLES: usize = SAMPLE_RATE;
/// Transform window length in samples.
pub const N_FFT: usize = 512;
/// Frame advance in samples (10ms).
pub const HOP_LENGTH: usize = 160;
/// Number of mel bands.
pub const N_MELS: usize = 40;
/// Lower filterbank bound in Hz.
pub const FMIN: f64 = 0.0;
/// Upper filterbank bound in Hz.
pub const FMAX: f64 = 8000.0;
/// Power floor applied before the logarithm.
pub const AMIN: f64 = 1e-10;
/// Dynamic range kept below the clip maximum, in dB.
pub const TOP_DB: f64 = 80.0;

/// Configures log-mel feature extraction.
///
/// Fields missing from a serialized config fall back to the defaults, so a
/// config file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input sample rate in Hz (default: 16000).
    pub sample_rate: usize,
    /// Normalized waveform length in samples (default: 16000).
    pub clip_length: usize,
    /// FFT size, must be a power of two (default: 512).
    pub n_fft: usize,
    /// Hop between frames in samples (default: 160).
    pub hop_length: usize,
    /// Number of mel bands (default: 40).
    pub n_mels: usize,
    /// Lowest filterbank frequency in Hz (default: 0).
    pub fmin: f64,
    /// Highest filterbank frequency in Hz (default: 8000).
    pub fmax: f64,
    /// Power floor before the logarithm (default: 1e-10).
    pub amin: f64,
    /// Clip floor below the maximum in dB, `None` disables (default: 80).
    pub top_db: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate: SAMPLE_RATE,
            clip_length: CLIP_LENGTH_SAMPLES,
            n_fft: N_FFT,
            hop_length: HOP_LENGTH,
            n_mels: N_MELS,
            fmin: FMIN,
            fmax: FMAX,
            amin: AMIN,
            top_db: Some(TOP_DB),
        }
    }
}

impl Config {
    /// Checks that the config describes a computable pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(invalid("sample_rate", "must be positive"));
        }
        if self.clip_length == 0 {
            return Err(invalid("clip_length", "must be positive"));
        }
        if self.n_fft < 2 || !self.n_fft.is_power_of_two() {
            return Err(invalid(
                "n_fft",
                format!("must be a power of two >= 2, got {}", self.n_fft),
            ));
        }
        if self.hop_length == 0 {
            return Err(invalid("hop_length", "must be positive"));
        }
        if self.n_mels == 0 {
            return Err(invalid("n_mels", "must be positive"));
        }
        if self.fmin.is_nan() || self.fmin < 0.0 {
            return Err(invalid("fmin", format!("must be >= 0, got {}", self.fmin)));
        }
        if self.fmax.is_nan() || self.fmax <= self.fmin {
            return Err(invalid(
                "fmax",
                format!("must exceed fmin ({}), got {}", self.fmin, self.fmax),
            ));
        }
        let nyquist = self.sample_rate as f64 / 2.0;
        if self.fmax > nyquist {
            return Err(invalid(
                "fmax",
                format!("must not exceed nyquist ({nyquist}), got {}", self.fmax),
            ));
        }
        if self.amin.is_nan() || self.amin <= 0.0 {
            return Err(invalid("amin", format!("must be positive, got {}", self.amin)));
        }
        if let Some(top_db) = self.top_db {
            if top_db.is_nan() || top_db < 0.0 {
                return Err(invalid("top_db", format!("must be >= 0, got {top_db}")));
            }
        }
        Ok(())
    }

    /// Number of non-redundant spectrum bins.
    pub fn n_bins(&self) -> usize {
        self.n_fft / 2 + 1
    }

    /// Reflect padding applied to each side of the waveform.
    pub fn pad(&self) -> usize {
        self.n_fft / 2
    }

    /// Number of output frames for one clip.
    pub fn n_frames(&self) -> usize {
        crate::window::frame_count(self.clip_length + 2 * self.pad(), self.n_fft, self.hop_length)
    }

    /// Frequency spacing of spectrum bins in Hz.
    pub fn bin_hz(&self) -> f64 {
        self.sample_rate as f64 / self.n_fft as f64
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> Error {
    Error::InvalidConfig {
        field,
        reason: reason.into(),
    }
}
