//! In-place radix-2 Cooley-Tukey FFT and power spectra.

use std::f64::consts::PI;

/// A precomputed FFT plan for one power-of-two size.
///
/// Twiddles are evaluated directly with `cos`/`sin` rather than by repeated
/// complex multiplication, so their error does not accumulate across a stage.
#[derive(Debug, Clone)]
pub struct Fft {
    n: usize,
    /// `e^{-2*pi*i*k/n}` for `k < n / 2`.
    tw_re: Vec<f64>,
    tw_im: Vec<f64>,
    /// Bit-reversal swap pairs with `i < j`.
    swaps: Vec<(usize, usize)>,
}

impl Fft {
    /// Plans a transform of length `n`. `n` must be a power of two.
    pub fn new(n: usize) -> Self {
        assert!(n.is_power_of_two(), "fft size must be a power of two, got {n}");
        let half = n / 2;
        let mut tw_re = Vec::with_capacity(half);
        let mut tw_im = Vec::with_capacity(half);
        for k in 0..half {
            let angle = -2.0 * PI * k as f64 / n as f64;
            tw_re.push(angle.cos());
            tw_im.push(angle.sin());
        }

        let mut swaps = Vec::new();
        let mut j = 0usize;
        for i in 1..n {
            let mut bit = n >> 1;
            while j & bit != 0 {
                j ^= bit;
                bit >>= 1;
            }
            j ^= bit;
            if i < j {
                swaps.push((i, j));
            }
        }

        Self { n, tw_re, tw_im, swaps }
    }

    /// Transform length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Number of non-redundant bins of a real-input transform.
    pub fn n_bins(&self) -> usize {
        self.n / 2 + 1
    }

    /// Forward transform in place. `real` and `imag` must have length `size()`.
    pub fn forward(&self, real: &mut [f64], imag: &mut [f64]) {
        debug_assert_eq!(real.len(), self.n);
        debug_assert_eq!(imag.len(), self.n);
        if self.n <= 1 {
            return;
        }

        for &(i, j) in &self.swaps {
            real.swap(i, j);
            imag.swap(i, j);
        }

        let mut size = 2;
        while size <= self.n {
            let half = size >> 1;
            let stride = self.n / size;
            let mut start = 0;
            while start < self.n {
                for k in 0..half {
                    let u = start + k;
                    let v = u + half;
                    let w_r = self.tw_re[k * stride];
                    let w_i = self.tw_im[k * stride];

                    let t_r = w_r * real[v] - w_i * imag[v];
                    let t_i = w_r * imag[v] + w_i * real[v];

                    real[v] = real[u] - t_r;
                    imag[v] = imag[u] - t_i;
                    real[u] += t_r;
                    imag[u] += t_i;
                }
                start += size;
            }
            size <<= 1;
        }
    }

    /// Inverse transform in place, scaled by `1/n`.
    pub fn inverse(&self, real: &mut [f64], imag: &mut [f64]) {
        for v in imag.iter_mut() {
            *v = -*v;
        }
        self.forward(real, imag);
        let scale = 1.0 / self.n as f64;
        for v in real.iter_mut() {
            *v *= scale;
        }
        for v in imag.iter_mut() {
            *v *= -scale;
        }
    }

    /// Writes the unnormalized power spectrum `re^2 + im^2` of a real frame.
    ///
    /// `real` holds the frame on entry and is overwritten; `imag` is scratch.
    /// Both have length `size()`. `out` receives `n_bins()` values.
    pub fn power_spectrum(&self, real: &mut [f64], imag: &mut [f64], out: &mut [f64]) {
        imag.iter_mut().for_each(|v| *v = 0.0);
        self.forward(real, imag);
        for (k, p) in out.iter_mut().enumerate().take(self.n_bins()) {
            *p = real[k] * real[k] + imag[k] * imag[k];
        }
    }
}

/// Direct O(N^2) DFT power spectrum of a real frame.
///
/// Angles are reduced modulo `n` before evaluation so large `k * t` products
/// do not lose precision. Used as an independent check on [`Fft`].
pub fn dft_power(frame: &[f64], out: &mut [f64]) {
    let n = frame.len();
    for (k, p) in out.iter_mut().enumerate().take(n / 2 + 1) {
        let mut re = 0.0f64;
        let mut im = 0.0f64;
        for (t, &x) in frame.iter().enumerate() {
            let angle = 2.0 * PI * ((k * t) % n) as f64 / n as f64;
            re += x * angle.cos();
            im -= x * angle.sin();
        }
        *p = re * re + im * im;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fft_impulse() {
        // FFT of unit impulse should be all 1s
        let plan = Fft::new(8);
        let mut real = vec![0.0; 8];
        let mut imag = vec![0.0; 8];
        real[0] = 1.0;

        plan.forward(&mut real, &mut imag);

        for &v in &real {
            assert!((v - 1.0).abs() < 1e-12);
        }
        for &v in &imag {
            assert!(v.abs() < 1e-12);
        }
    }

    #[test]
    fn fft_ifft_roundtrip() {
        let plan = Fft::new(8);
        let original = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let mut real = original.clone();
        let mut imag = vec![0.0; 8];

        plan.forward(&mut real, &mut imag);
        plan.inverse(&mut real, &mut imag);

        for (a, b) in real.iter().zip(original.iter()) {
            assert!((a - b).abs() < 1e-12, "roundtrip failed: {a} != {b}");
        }
        for v in imag {
            assert!(v.abs() < 1e-12);
        }
    }

    #[test]
    fn fft_parseval() {
        // sum |x[n]|^2 * N = sum |X[k]|^2
        let n = 64;
        let plan = Fft::new(n);
        let mut real: Vec<f64> = (0..n).map(|i| ((i * 7 % 13) as f64 - 6.0) / 6.0).collect();
        let mut imag = vec![0.0; n];
        let time_energy: f64 = real.iter().map(|x| x * x).sum();

        plan.forward(&mut real, &mut imag);
        let freq_energy: f64 = real.iter().zip(&imag).map(|(r, i)| r * r + i * i).sum();

        assert!(
            (time_energy * n as f64 - freq_energy).abs() < 1e-9,
            "Parseval violated: {} vs {}",
            time_energy * n as f64,
            freq_energy
        );
    }

    #[test]
    fn power_spectrum_matches_direct_dft() {
        let n = 512;
        let plan = Fft::new(n);
        let frame: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * 440.0 * i as f64 / 16000.0).sin() * 0.5 + 0.01 * (i % 5) as f64)
            .collect();

        let mut real = frame.clone();
        let mut imag = vec![0.0; n];
        let mut fast = vec![0.0; plan.n_bins()];
        let mut slow = vec![0.0; plan.n_bins()];
        plan.power_spectrum(&mut real, &mut imag, &mut fast);
        dft_power(&frame, &mut slow);

        let peak = slow.iter().cloned().fold(0.0f64, f64::max);
        for (k, (a, b)) in fast.iter().zip(&slow).enumerate() {
            assert!((a - b).abs() <= 1e-9 * peak.max(1.0), "bin {k}: fft={a} dft={b}");
        }
    }

    #[test]
    fn power_spectrum_is_unnormalized() {
        // A constant frame of ones puts all energy in bin 0: |N|^2.
        let plan = Fft::new(16);
        let mut real = vec![1.0; 16];
        let mut imag = vec![0.0; 16];
        let mut out = vec![0.0; 9];
        plan.power_spectrum(&mut real, &mut imag, &mut out);
        assert!((out[0] - 256.0).abs() < 1e-9);
        for &p in &out[1..] {
            assert!(p.abs() < 1e-18);
        }
    }

    #[test]
    #[should_panic]
    fn fft_rejects_non_power_of_two() {
        let _ = Fft::new(12);
    }
}
