//! Waveform normalization and sample conversion.

use std::f64::consts::PI;

/// Pads or truncates `samples` to exactly `target_len` samples.
///
/// Longer input keeps its first `target_len` samples; shorter input is
/// right-padded with zeros. Never fails.
pub fn normalize(samples: &[f32], target_len: usize) -> Vec<f32> {
    let mut out = Vec::with_capacity(target_len);
    let keep = samples.len().min(target_len);
    out.extend_from_slice(&samples[..keep]);
    out.resize(target_len, 0.0);
    out
}

/// Converts signed 16-bit little-endian PCM to f32 samples in `[-1, 1)`.
///
/// A trailing odd byte is ignored.
pub fn pcm16_to_f32(pcm_bytes: &[u8]) -> Vec<f32> {
    pcm_bytes
        .chunks_exact(2)
        .map(|b| i16::from_le_bytes([b[0], b[1]]) as f32 / 32768.0)
        .collect()
}

/// Converts f32 samples to signed 16-bit little-endian PCM, clamping to range.
pub fn f32_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        let v = (s as f64 * 32768.0).round().clamp(i16::MIN as f64, i16::MAX as f64) as i16;
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// Decodes raw f32 little-endian samples. A partial trailing sample is ignored.
pub fn f32_from_le_bytes(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

/// Generates `n` samples of `amplitude * sin(2*pi*freq*i/sample_rate)`.
pub fn sine(freq_hz: f64, amplitude: f64, sample_rate: usize, n: usize) -> Vec<f32> {
    let sr = sample_rate as f64;
    (0..n)
        .map(|i| (amplitude * (2.0 * PI * freq_hz * i as f64 / sr).sin()) as f32)
        .collect()
}
