//! Cross-implementation equivalence checks.
//!
//! Two implementations agree when their outputs have the same shape and
//! every pair of elements is finite and within an absolute tolerance.

use std::fmt;

use serde::Serialize;
use tracing::{info, warn};

use crate::matrix::FeatureMatrix;

/// Absolute per-element tolerance between implementations.
pub const DEFAULT_TOLERANCE: f32 = 1e-4;

/// How many mismatching elements a report carries.
const MAX_SAMPLES: usize = 5;

/// An implementation of the log-mel pipeline.
pub trait FeaturePipeline {
    /// Short label used in reports.
    fn name(&self) -> &str;

    /// Extracts features from samples of any length.
    fn extract(&self, samples: &[f32]) -> FeatureMatrix;
}

/// One element where two matrices disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mismatch {
    pub frame: usize,
    pub mel: usize,
    pub left: f32,
    pub right: f32,
}

/// Outcome of comparing two feature matrices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Comparison {
    /// Same shape, all elements within tolerance.
    Match { shape: (usize, usize), mse: f64 },
    /// Shapes differ; values were not compared.
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },
    /// Same shape, at least one element out of tolerance or non-finite.
    ValueMismatch {
        shape: (usize, usize),
        tolerance: f32,
        max_abs_diff: f64,
        mean_abs_diff: f64,
        mismatched: usize,
        samples: Vec<Mismatch>,
        /// First values of frame 0 from each side.
        left_head: Vec<f32>,
        right_head: Vec<f32>,
    },
}

impl Comparison {
    pub fn is_match(&self) -> bool {
        matches!(self, Comparison::Match { .. })
    }
}

/// Compares `left` and `right` by shape, then element-wise within `tolerance`.
pub fn compare(left: &FeatureMatrix, right: &FeatureMatrix, tolerance: f32) -> Comparison {
    if left.shape() != right.shape() {
        return Comparison::ShapeMismatch {
            left: left.shape(),
            right: right.shape(),
        };
    }

    let n_mels = left.n_mels();
    let total = left.as_slice().len();
    let mut sum_sq = 0.0f64;
    let mut sum_abs = 0.0f64;
    let mut max_abs = 0.0f64;
    let mut mismatched = 0usize;
    let mut samples = Vec::new();

    for (i, (&a, &b)) in left.as_slice().iter().zip(right.as_slice()).enumerate() {
        let diff = (a as f64 - b as f64).abs();
        let ok = a.is_finite() && b.is_finite() && diff <= tolerance as f64;
        if diff.is_finite() {
            sum_sq += diff * diff;
            sum_abs += diff;
            max_abs = max_abs.max(diff);
        } else {
            max_abs = f64::INFINITY;
        }
        if !ok {
            mismatched += 1;
            if samples.len() < MAX_SAMPLES {
                samples.push(Mismatch {
                    frame: i / n_mels,
                    mel: i % n_mels,
                    left: a,
                    right: b,
                });
            }
        }
    }

    let denom = total.max(1) as f64;
    if mismatched == 0 {
        return Comparison::Match {
            shape: left.shape(),
            mse: sum_sq / denom,
        };
    }

    let head = |m: &FeatureMatrix| -> Vec<f32> {
        if m.n_frames() == 0 {
            return Vec::new();
        }
        m.row(0).iter().take(MAX_SAMPLES).cloned().collect()
    };
    Comparison::ValueMismatch {
        shape: left.shape(),
        tolerance,
        max_abs_diff: max_abs,
        mean_abs_diff: sum_abs / denom,
        mismatched,
        samples,
        left_head: head(left),
        right_head: head(right),
    }
}

/// Runs both pipelines on `input` and compares their output.
pub fn verify(
    left: &dyn FeaturePipeline,
    right: &dyn FeaturePipeline,
    input: &[f32],
    tolerance: f32,
) -> Comparison {
    let a = left.extract(input);
    let b = right.extract(input);
    let result = compare(&a, &b, tolerance);
    match &result {
        Comparison::Match { shape, mse } => {
            info!(left = left.name(), right = right.name(), ?shape, mse, "implementations match");
        }
        Comparison::ShapeMismatch { left: l, right: r } => {
            warn!(left = left.name(), right = right.name(), ?l, ?r, "shape mismatch");
        }
        Comparison::ValueMismatch {
            max_abs_diff,
            mismatched,
            ..
        } => {
            warn!(
                left = left.name(),
                right = right.name(),
                max_abs_diff,
                mismatched,
                "value mismatch"
            );
        }
    }
    result
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Comparison::Match { shape, mse } => {
                writeln!(f, "MATCH: shape {shape:?}")?;
                write!(f, "  mean squared error: {mse:.8}")
            }
            Comparison::ShapeMismatch { left, right } => {
                write!(f, "SHAPE MISMATCH: left {left:?} vs right {right:?}")
            }
            Comparison::ValueMismatch {
                shape,
                tolerance,
                max_abs_diff,
                mean_abs_diff,
                mismatched,
                samples,
                left_head,
                right_head,
            } => {
                writeln!(
                    f,
                    "VALUE MISMATCH: {mismatched} of {} values differ by more than {tolerance}",
                    shape.0 * shape.1
                )?;
                writeln!(f, "  max abs diff:  {max_abs_diff}")?;
                writeln!(f, "  mean abs diff: {mean_abs_diff}")?;
                for s in samples {
                    writeln!(
                        f,
                        "  [{}][{}] left={} right={}",
                        s.frame, s.mel, s.left, s.right
                    )?;
                }
                writeln!(f, "  left  frame 0: {left_head:?}")?;
                write!(f, "  right frame 0: {right_head:?}")
            }
        }
    }
}
