//! Direct-DFT log-mel implementation.
//!
//! Shares nothing with [`crate::Extractor`] beyond [`Config`]: window,
//! padding, filterbank and compression are written out element by element and
//! the spectrum is a plain O(N^2) DFT over precomputed cos/sin tables. It is
//! slow on purpose; its job is to give the verifier a second opinion.

use std::f64::consts::PI;

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::matrix::FeatureMatrix;
use crate::verify::FeaturePipeline;

/// Straight-line implementation of the log-mel pipeline.
#[derive(Debug, Clone)]
pub struct DirectExtractor {
    cfg: Config,
    window: Vec<f64>,
    /// `[n_bins][n_fft]`
    cos_table: Vec<f64>,
    sin_table: Vec<f64>,
    /// `[n_mels][n_bins]`
    filters: Vec<Vec<f64>>,
}

impl DirectExtractor {
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        let n = cfg.n_fft;
        let n_bins = n / 2 + 1;

        let window = (0..n)
            .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos()))
            .collect();

        let mut cos_table = vec![0.0f64; n_bins * n];
        let mut sin_table = vec![0.0f64; n_bins * n];
        for k in 0..n_bins {
            for t in 0..n {
                let angle = 2.0 * PI * ((k * t) % n) as f64 / n as f64;
                cos_table[k * n + t] = angle.cos();
                sin_table[k * n + t] = angle.sin();
            }
        }

        let filters = triangular_filters(&cfg);
        debug!(n_fft = n, n_mels = cfg.n_mels, "direct-dft extractor initialized");

        Ok(Self {
            cfg,
            window,
            cos_table,
            sin_table,
            filters,
        })
    }

    fn spectrum(&self, frame: &[f64]) -> Vec<f64> {
        let n = self.cfg.n_fft;
        (0..n / 2 + 1)
            .map(|k| {
                let row_c = &self.cos_table[k * n..(k + 1) * n];
                let row_s = &self.sin_table[k * n..(k + 1) * n];
                let mut re = 0.0;
                let mut im = 0.0;
                for t in 0..n {
                    re += frame[t] * row_c[t];
                    im -= frame[t] * row_s[t];
                }
                re * re + im * im
            })
            .collect()
    }
}

impl FeaturePipeline for DirectExtractor {
    fn name(&self) -> &str {
        "direct-dft"
    }

    fn extract(&self, samples: &[f32]) -> FeatureMatrix {
        let cfg = &self.cfg;
        let n = cfg.n_fft;
        let half = n / 2;

        let mut clip = vec![0.0f32; cfg.clip_length];
        for (dst, src) in clip.iter_mut().zip(samples) {
            *dst = *src;
        }

        // Mirror about the first and last sample, bouncing for short clips.
        let len = clip.len() as isize;
        let mut padded = Vec::with_capacity(clip.len() + n);
        for i in -(half as isize)..len + half as isize {
            let mut j = i;
            while j < 0 || j >= len {
                if len == 1 {
                    j = 0;
                    break;
                }
                if j < 0 {
                    j = -j;
                }
                if j >= len {
                    j = 2 * (len - 1) - j;
                }
            }
            padded.push(clip[j as usize]);
        }

        let mut energies = Vec::new();
        let mut start = 0;
        while start + n <= padded.len() {
            let frame: Vec<f64> = (0..n)
                .map(|i| padded[start + i] as f64 * self.window[i])
                .collect();
            let power = self.spectrum(&frame);
            for filter in &self.filters {
                let mut e = 0.0;
                for (w, p) in filter.iter().zip(&power) {
                    e += w * p;
                }
                energies.push(e);
            }
            start += cfg.hop_length;
        }

        let mut peak = 0.0f64;
        for &e in &energies {
            if e > peak {
                peak = e;
            }
        }
        let ref_db = 10.0 * peak.max(cfg.amin).log10();
        let mut db: Vec<f64> = energies
            .iter()
            .map(|&e| 10.0 * e.max(cfg.amin).log10() - ref_db)
            .collect();
        if let Some(top_db) = cfg.top_db {
            let mut db_max = f64::NEG_INFINITY;
            for &v in &db {
                if v > db_max {
                    db_max = v;
                }
            }
            for v in db.iter_mut() {
                *v = v.max(db_max - top_db);
            }
        }

        let n_frames = energies.len() / cfg.n_mels;
        FeatureMatrix::from_flat(n_frames, cfg.n_mels, db.into_iter().map(|v| v as f32).collect())
    }
}

fn triangular_filters(cfg: &Config) -> Vec<Vec<f64>> {
    let to_mel = |hz: f64| 2595.0 * (1.0 + hz / 700.0).log10();
    let to_hz = |mel: f64| 700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0);

    let n_bins = cfg.n_fft / 2 + 1;
    let lo = to_mel(cfg.fmin);
    let hi = to_mel(cfg.fmax);
    let points: Vec<f64> = (0..cfg.n_mels + 2)
        .map(|i| to_hz(lo + (hi - lo) * i as f64 / (cfg.n_mels + 1) as f64))
        .collect();

    let mut filters = vec![vec![0.0f64; n_bins]; cfg.n_mels];
    for (m, filter) in filters.iter_mut().enumerate() {
        let (f_lo, f_mid, f_hi) = (points[m], points[m + 1], points[m + 2]);
        let area = 2.0 / (f_hi - f_lo);
        for (k, w) in filter.iter_mut().enumerate() {
            let f = k as f64 * cfg.sample_rate as f64 / cfg.n_fft as f64;
            if f > f_lo && f <= f_mid {
                *w = area * (f - f_lo) / (f_mid - f_lo);
            } else if f > f_mid && f < f_hi {
                *w = area * (f_hi - f) / (f_hi - f_mid);
            }
        }
    }
    filters
}
