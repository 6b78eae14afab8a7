//! Test tone generation command.

use audioguard_logmel::waveform;
use clap::Args;

use super::{SampleFormat, encode_samples, get_config, print_success};
use crate::Cli;

/// Write a sine tone as raw samples, for feeding another implementation.
#[derive(Args)]
pub struct ToneCommand {
    /// Tone frequency in Hz
    #[arg(long, default_value_t = 440.0)]
    freq: f64,

    /// Tone amplitude
    #[arg(long, default_value_t = 0.5)]
    amplitude: f64,

    /// Number of samples (default: one clip)
    #[arg(long)]
    samples: Option<usize>,

    /// Sample encoding of the output file
    #[arg(long, value_enum, default_value_t = SampleFormat::F32)]
    format: SampleFormat,
}

impl ToneCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let output = cli
            .output
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("output file is required, use -o flag"))?;
        let cfg = get_config(cli)?;
        let n = self.samples.unwrap_or(cfg.clip_length);

        let tone = waveform::sine(self.freq, self.amplitude, cfg.sample_rate, n);
        std::fs::write(output, encode_samples(&tone, self.format))?;
        print_success(&format!("wrote {n} samples of {} Hz to {output}", self.freq));
        Ok(())
    }
}
