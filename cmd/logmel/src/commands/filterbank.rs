//! Filterbank inspection command.

use audioguard_logmel::MelFilterbank;
use clap::Args;
use serde::Serialize;

use super::{get_config, output_result};
use crate::Cli;

/// Dump the mel filterbank built from the current config.
#[derive(Args)]
pub struct FilterbankCommand {
    /// Include the full weight matrix
    #[arg(long)]
    weights: bool,
}

#[derive(Serialize)]
struct FilterbankReport {
    n_mels: usize,
    n_bins: usize,
    edges_hz: Vec<f64>,
    centers_hz: Vec<f64>,
    row_sums: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    weights: Option<Vec<Vec<f64>>>,
}

impl FilterbankCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let fb = MelFilterbank::new(&cfg);

        let report = FilterbankReport {
            n_mels: fb.n_mels(),
            n_bins: fb.n_bins(),
            edges_hz: fb.edges().to_vec(),
            centers_hz: fb.centers().to_vec(),
            row_sums: (0..fb.n_mels()).map(|m| fb.row_sum(m)).collect(),
            weights: self
                .weights
                .then(|| (0..fb.n_mels()).map(|m| fb.row(m).to_vec()).collect()),
        };

        output_result(&report, cli.output.as_deref(), cli.json)
    }
}
