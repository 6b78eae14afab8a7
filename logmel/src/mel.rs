//! Mel-scale utilities and filterbank generation.

use crate::config::Config;

/// Converts frequency in Hz to mel scale.
pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Converts mel scale frequency back to Hz.
pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

/// Triangular mel filterbank, area-normalized.
///
/// Weights are stored row-major as `[n_mels][n_bins]`. Filter `m` spans
/// `edges[m]..edges[m + 2]` Hz with its peak at `edges[m + 1]`, then is scaled
/// by `2 / (edges[m + 2] - edges[m])` so every triangle has unit area in Hz.
#[derive(Debug, Clone)]
pub struct MelFilterbank {
    n_mels: usize,
    n_bins: usize,
    edges: Vec<f64>,
    weights: Vec<f64>,
}

impl MelFilterbank {
    /// Builds the filterbank for `cfg`. The config is assumed valid.
    pub fn new(cfg: &Config) -> Self {
        let n_bins = cfg.n_bins();
        let n_mels = cfg.n_mels;
        let bin_hz = cfg.bin_hz();

        // n_mels + 2 equally spaced mel points
        let mel_lo = hz_to_mel(cfg.fmin);
        let mel_hi = hz_to_mel(cfg.fmax);
        let step = (mel_hi - mel_lo) / (n_mels + 1) as f64;
        let edges: Vec<f64> = (0..n_mels + 2)
            .map(|i| mel_to_hz(mel_lo + i as f64 * step))
            .collect();

        let mut weights = vec![0.0f64; n_mels * n_bins];
        for m in 0..n_mels {
            let (left, center, right) = (edges[m], edges[m + 1], edges[m + 2]);
            let enorm = 2.0 / (right - left);
            let row = &mut weights[m * n_bins..(m + 1) * n_bins];
            for (k, w) in row.iter_mut().enumerate() {
                let f = k as f64 * bin_hz;
                let rise = (f - left) / (center - left);
                let fall = (right - f) / (right - center);
                *w = rise.min(fall).max(0.0) * enorm;
            }
        }

        Self { n_mels, n_bins, edges, weights }
    }

    /// Number of filters.
    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    /// Number of spectrum bins each filter covers.
    pub fn n_bins(&self) -> usize {
        self.n_bins
    }

    /// The `n_mels + 2` filter edge frequencies in Hz.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Peak frequency of each filter in Hz.
    pub fn centers(&self) -> &[f64] {
        &self.edges[1..self.n_mels + 1]
    }

    /// Weights of filter `m`.
    pub fn row(&self, m: usize) -> &[f64] {
        &self.weights[m * self.n_bins..(m + 1) * self.n_bins]
    }

    /// Sum of the weights of filter `m`.
    pub fn row_sum(&self, m: usize) -> f64 {
        self.row(m).iter().sum()
    }

    /// Row-major weight matrix.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Projects one power spectrum onto the filters.
    pub fn apply(&self, power: &[f64], out: &mut [f64]) {
        for (m, e) in out.iter_mut().enumerate().take(self.n_mels) {
            *e = self.row(m).iter().zip(power).map(|(w, p)| w * p).sum();
        }
    }
}
