//! Feature extraction command.

use audioguard_logmel::Extractor;
use clap::Args;
use serde::Serialize;

use super::{SampleFormat, get_config, output_result, print_verbose, read_samples};
use crate::Cli;

/// Extract log-mel features from raw little-endian samples.
#[derive(Args)]
pub struct ExtractCommand {
    /// Raw audio file (mono, at the configured sample rate)
    file: String,

    /// Sample encoding of the input file
    #[arg(long, value_enum, default_value_t = SampleFormat::Pcm16)]
    format: SampleFormat,

    /// Include the full feature matrix in the output
    #[arg(long)]
    features: bool,
}

#[derive(Serialize)]
struct ExtractReport {
    input: String,
    input_samples: usize,
    sample_rate: usize,
    shape: (usize, usize),
    max: f32,
    min: f32,
    /// First values of frame 0, for eyeballing against another implementation.
    head: Vec<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<Vec<Vec<f32>>>,
}

impl ExtractCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let sample_rate = cfg.sample_rate;
        let extractor = Extractor::new(cfg)?;

        let samples = read_samples(&self.file, self.format)?;
        print_verbose(cli, &format!("read {} samples from {}", samples.len(), self.file));
        if samples.len() != extractor.config().clip_length {
            tracing::debug!(
                got = samples.len(),
                want = extractor.config().clip_length,
                "input will be padded or truncated"
            );
        }

        let features = extractor.extract(&samples);
        let min = features
            .as_slice()
            .iter()
            .cloned()
            .reduce(f32::min)
            .unwrap_or(0.0);
        let report = ExtractReport {
            input: self.file.clone(),
            input_samples: samples.len(),
            sample_rate,
            shape: features.shape(),
            max: features.max().unwrap_or(0.0),
            min,
            head: features.row(0).iter().take(5).cloned().collect(),
            features: self.features.then(|| features.clone().into_rows()),
        };

        output_result(&report, cli.output.as_deref(), cli.json)
    }
}
