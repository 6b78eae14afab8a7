//! The log-mel pipeline: normalize, frame, transform, filter, compress.

use once_cell::sync::Lazy;
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::fft::Fft;
use crate::matrix::FeatureMatrix;
use crate::mel::MelFilterbank;
use crate::verify::FeaturePipeline;
use crate::waveform;
use crate::window;

static SHARED: Lazy<Extractor> = Lazy::new(|| Extractor::build(Config::default()));

/// Computes the log-mel features of `samples` with the default constants.
///
/// Uses the process-wide [`Extractor::shared`] instance, so the filterbank is
/// built once on first use.
pub fn log_mel_spectrogram(samples: &[f32]) -> FeatureMatrix {
    Extractor::shared().extract(samples)
}

/// Log-mel feature extractor.
///
/// Holds the window, FFT plan and filterbank for one config; all of them are
/// immutable after construction, so one extractor can serve any number of
/// threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    cfg: Config,
    window: Vec<f64>,
    fft: Fft,
    filterbank: MelFilterbank,
}

impl Extractor {
    /// Creates an extractor, validating the config first.
    pub fn new(cfg: Config) -> Result<Self> {
        cfg.validate()?;
        Ok(Self::build(cfg))
    }

    /// The extractor for the default constants, built on first access.
    pub fn shared() -> &'static Extractor {
        &SHARED
    }

    fn build(cfg: Config) -> Self {
        let window = window::hann_periodic(cfg.n_fft);
        let fft = Fft::new(cfg.n_fft);
        let filterbank = MelFilterbank::new(&cfg);
        debug!(
            n_mels = cfg.n_mels,
            n_fft = cfg.n_fft,
            hop_length = cfg.hop_length,
            n_frames = cfg.n_frames(),
            "log-mel extractor initialized"
        );
        Self { cfg, window, fft, filterbank }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn filterbank(&self) -> &MelFilterbank {
        &self.filterbank
    }

    pub fn window(&self) -> &[f64] {
        &self.window
    }

    fn padded(&self, samples: &[f32]) -> Vec<f32> {
        let clip = waveform::normalize(samples, self.cfg.clip_length);
        window::reflect_pad(&clip, self.cfg.pad())
    }

    /// Windowed analysis frames, `[n_frames][n_fft]`.
    pub fn windowed_frames(&self, samples: &[f32]) -> Vec<Vec<f64>> {
        let padded = self.padded(samples);
        window::frames(&padded, self.cfg.n_fft, self.cfg.hop_length)
            .map(|frame| {
                let mut out = vec![0.0f64; self.cfg.n_fft];
                window::apply(frame, &self.window, &mut out);
                out
            })
            .collect()
    }

    /// Power spectra, `[n_frames][n_bins]`.
    pub fn power_spectrogram(&self, samples: &[f32]) -> Vec<Vec<f64>> {
        let n = self.cfg.n_fft;
        self.windowed_frames(samples)
            .into_par_iter()
            .map_init(
                || vec![0.0f64; n],
                |imag, mut real| {
                    let mut power = vec![0.0f64; self.cfg.n_bins()];
                    self.fft.power_spectrum(&mut real, imag, &mut power);
                    power
                },
            )
            .collect()
    }

    /// Mel energies before compression, `[n_frames][n_mels]`.
    ///
    /// Frames are processed in parallel; the result is in frame order.
    pub fn mel_energies(&self, samples: &[f32]) -> Vec<Vec<f64>> {
        let padded = self.padded(samples);
        let n = self.cfg.n_fft;
        let hop = self.cfg.hop_length;
        let n_frames = window::frame_count(padded.len(), n, hop);

        (0..n_frames)
            .into_par_iter()
            .map_init(
                || {
                    (
                        vec![0.0f64; n],
                        vec![0.0f64; n],
                        vec![0.0f64; self.cfg.n_bins()],
                    )
                },
                |(real, imag, power), t| {
                    let frame = &padded[t * hop..t * hop + n];
                    window::apply(frame, &self.window, real);
                    self.fft.power_spectrum(real, imag, power);
                    let mut energies = vec![0.0f64; self.cfg.n_mels];
                    self.filterbank.apply(power, &mut energies);
                    energies
                },
            )
            .collect()
    }

    /// Extracts `[n_frames, n_mels]` log-mel features from f32 samples.
    ///
    /// Input of any length is padded or truncated to one clip first.
    pub fn extract(&self, samples: &[f32]) -> FeatureMatrix {
        let energies = self.mel_energies(samples);
        let n_frames = energies.len();
        let flat: Vec<f64> = energies.concat();
        let data = db::power_to_db(&flat, self.cfg.amin, self.cfg.top_db);
        trace!(input_len = samples.len(), n_frames, "extracted log-mel features");
        FeatureMatrix::from_flat(n_frames, self.cfg.n_mels, data)
    }

    /// Extracts features from signed 16-bit little-endian PCM bytes.
    pub fn extract_pcm16(&self, pcm_bytes: &[u8]) -> FeatureMatrix {
        self.extract(&waveform::pcm16_to_f32(pcm_bytes))
    }

    /// Extracts features for independent clips in parallel, preserving order.
    pub fn extract_batch<S: AsRef<[f32]> + Sync>(&self, clips: &[S]) -> Vec<FeatureMatrix> {
        clips.par_iter().map(|clip| self.extract(clip.as_ref())).collect()
    }
}

impl FeaturePipeline for Extractor {
    fn name(&self) -> &str {
        "fft"
    }

    fn extract(&self, samples: &[f32]) -> FeatureMatrix {
        Extractor::extract(self, samples)
    }
}
