//! Cross-implementation verification command.

use audioguard_logmel::reference::DirectExtractor;
use audioguard_logmel::verify::{self, Comparison, DEFAULT_TOLERANCE};
use audioguard_logmel::{Extractor, FeaturePipeline, waveform};
use clap::Args;

use super::{
    SampleFormat, get_config, load_reference, output_result, print_error, print_success,
    print_verbose, read_samples,
};
use crate::Cli;

/// Compare this implementation with another on identical input.
///
/// Without `--reference` the built-in direct-DFT implementation is the other
/// side. With it, the file holds the features another implementation
/// produced for the same input.
#[derive(Args)]
pub struct VerifyCommand {
    /// Raw audio input (default: generated sine tone)
    #[arg(long)]
    input: Option<String>,

    /// Sample encoding of the input file
    #[arg(long, value_enum, default_value_t = SampleFormat::Pcm16)]
    format: SampleFormat,

    /// Tone frequency in Hz when no input file is given
    #[arg(long, default_value_t = 440.0)]
    freq: f64,

    /// Tone amplitude when no input file is given
    #[arg(long, default_value_t = 0.5)]
    amplitude: f64,

    /// Feature matrix from another implementation (JSON)
    #[arg(long)]
    reference: Option<String>,

    /// Absolute per-element tolerance
    #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f32,
}

impl VerifyCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;

        let input = match &self.input {
            Some(path) => read_samples(path, self.format)?,
            None => {
                print_verbose(
                    cli,
                    &format!("generating {} Hz tone, amplitude {}", self.freq, self.amplitude),
                );
                waveform::sine(self.freq, self.amplitude, cfg.sample_rate, cfg.clip_length)
            }
        };

        let fast = Extractor::new(cfg.clone())?;
        let result = match &self.reference {
            Some(path) => {
                let expected = load_reference(path)?;
                print_verbose(cli, &format!("loaded reference {path}, shape {:?}", expected.shape()));
                verify::compare(&fast.extract(&input), &expected, self.tolerance)
            }
            None => {
                let direct = DirectExtractor::new(cfg)?;
                print_verbose(cli, &format!("comparing {} with {}", fast.name(), direct.name()));
                verify::verify(&fast, &direct, &input, self.tolerance)
            }
        };

        if cli.json || cli.output.is_some() {
            output_result(&result, cli.output.as_deref(), cli.json)?;
        } else {
            println!("{result}");
        }

        match result {
            Comparison::Match { .. } => {
                print_success(&format!("outputs match within {}", self.tolerance));
                Ok(())
            }
            _ => {
                print_error("outputs differ");
                anyhow::bail!("verification failed")
            }
        }
    }
}
