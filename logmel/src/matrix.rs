use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Time-major log-mel feature matrix: one row per frame, one column per band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    n_frames: usize,
    n_mels: usize,
    data: Vec<f32>,
}

impl FeatureMatrix {
    /// Wraps row-major `data` of `n_frames * n_mels` values.
    pub(crate) fn from_flat(n_frames: usize, n_mels: usize, data: Vec<f32>) -> Self {
        debug_assert_eq!(data.len(), n_frames * n_mels);
        Self { n_frames, n_mels, data }
    }

    /// Builds a matrix from rows, rejecting ragged input.
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self> {
        let n_mels = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * n_mels);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != n_mels {
                return Err(Error::RaggedMatrix {
                    row,
                    expected: n_mels,
                    got: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            n_frames: rows.len(),
            n_mels,
            data,
        })
    }

    /// `(n_frames, n_mels)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_frames, self.n_mels)
    }

    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    pub fn n_mels(&self) -> usize {
        self.n_mels
    }

    /// Features of frame `t`.
    pub fn row(&self, t: usize) -> &[f32] {
        &self.data[t * self.n_mels..(t + 1) * self.n_mels]
    }

    /// Iterates over frames in chronological order.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on zero
        self.data.chunks_exact(self.n_mels.max(1)).take(self.n_frames)
    }

    pub fn get(&self, t: usize, m: usize) -> f32 {
        self.data[t * self.n_mels + m]
    }

    /// Largest value, or `None` for an empty matrix.
    pub fn max(&self) -> Option<f32> {
        self.data.iter().cloned().reduce(f32::max)
    }

    /// Row-major values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Converts to `[n_frames][n_mels]` nested rows.
    pub fn into_rows(self) -> Vec<Vec<f32>> {
        self.rows().map(<[f32]>::to_vec).collect()
    }
}
