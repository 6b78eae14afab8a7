//! logmel CLI - log-mel feature extraction and implementation parity checks.

use clap::{Parser, Subcommand};

mod commands;

use commands::{ExtractCommand, FilterbankCommand, ToneCommand, VerifyCommand};

/// logmel CLI - log-mel spectrogram features for one-second 16 kHz clips.
///
/// Input audio is raw little-endian mono samples at the configured sample
/// rate; decoding and resampling happen before this tool. Use `verify` to
/// check this implementation against the built-in direct-DFT pipeline or
/// against a feature matrix dumped by another implementation.
#[derive(Parser)]
#[command(name = "logmel")]
#[command(about = "Log-mel spectrogram feature extraction tool")]
#[command(version)]
pub struct Cli {
    /// Pipeline config file, YAML or JSON (default: built-in constants)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON (for piping)
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract log-mel features from a raw audio file
    Extract(ExtractCommand),
    /// Compare two implementations on the same input
    Verify(VerifyCommand),
    /// Inspect the mel filterbank
    Filterbank(FilterbankCommand),
    /// Write the verification test tone as raw samples
    Tone(ToneCommand),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    match &cli.command {
        Commands::Extract(cmd) => cmd.run(&cli),
        Commands::Verify(cmd) => cmd.run(&cli),
        Commands::Filterbank(cmd) => cmd.run(&cli),
        Commands::Tone(cmd) => cmd.run(&cli),
    }
}
