//! Framing and windowing.
//!
//! Frames are centered on their hop position: the waveform is reflect-padded
//! by `n_fft / 2` on both sides before slicing, so frame `t` covers original
//! samples `t * hop - n_fft / 2 .. t * hop + n_fft / 2`.

use std::f64::consts::PI;

/// Generates a periodic Hann window: `0.5 - 0.5 * cos(2*pi*n / N)`.
///
/// The periodic form divides by `N`, not `N - 1`, so `w[0] == 0` and the
/// window does not end on zero.
pub fn hann_periodic(n: usize) -> Vec<f64> {
    if n <= 1 {
        return vec![1.0; n];
    }
    (0..n)
        .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / n as f64).cos())
        .collect()
}

/// Reflect-pads `samples` by `pad` on each side without repeating the edge.
///
/// `[1, 2, 3, 4]` padded by 2 becomes `[3, 2, 1, 2, 3, 4, 3, 2]`. When the
/// signal is shorter than the pad the mirroring repeats.
pub fn reflect_pad(samples: &[f32], pad: usize) -> Vec<f32> {
    let n = samples.len();
    if n == 0 {
        return vec![0.0; 2 * pad];
    }
    (0..n + 2 * pad)
        .map(|i| samples[reflect_index(i as isize - pad as isize, n)])
        .collect()
}

fn reflect_index(j: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let m = j.rem_euclid(period);
    if m >= n as isize {
        (period - m) as usize
    } else {
        m as usize
    }
}

/// Number of whole `n_fft` frames advancing by `hop` that fit in `len` samples.
pub fn frame_count(len: usize, n_fft: usize, hop: usize) -> usize {
    if len < n_fft || hop == 0 {
        return 0;
    }
    1 + (len - n_fft) / hop
}

/// Iterates over the `n_fft`-sample frames of an already padded buffer.
pub fn frames(padded: &[f32], n_fft: usize, hop: usize) -> impl Iterator<Item = &[f32]> {
    (0..frame_count(padded.len(), n_fft, hop)).map(move |t| &padded[t * hop..t * hop + n_fft])
}

/// Multiplies `frame` by `window` into `out`, widening to f64.
pub fn apply(frame: &[f32], window: &[f64], out: &mut [f64]) {
    for ((o, &s), &w) in out.iter_mut().zip(frame).zip(window) {
        *o = s as f64 * w;
    }
}
