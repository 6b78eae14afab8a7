//! Utility functions for CLI commands.

use std::path::Path;

use anyhow::Context as _;
use audioguard_logmel::{Config, FeatureMatrix, waveform};
use clap::ValueEnum;
use serde::Deserialize;

use crate::Cli;

/// Raw sample encodings accepted on input and written by `tone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SampleFormat {
    /// Signed 16-bit little-endian PCM
    Pcm16,
    /// 32-bit little-endian float
    F32,
}

/// Loads a YAML or JSON file, picking the parser by extension.
pub fn load_file<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let result = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content)?,
        _ => serde_yaml::from_str(&content)?,
    };

    Ok(result)
}

/// Gets the pipeline config: the `--config` file if given, else the defaults.
pub fn get_config(cli: &Cli) -> anyhow::Result<Config> {
    let cfg = match cli.config.as_deref() {
        Some(path) => load_file(path)?,
        None => Config::default(),
    };
    cfg.validate()?;
    Ok(cfg)
}

/// Reads raw samples from `path`.
///
/// An unreadable or empty file is an error; a missing clip is never replaced
/// with silence.
pub fn read_samples(path: &str, format: SampleFormat) -> anyhow::Result<Vec<f32>> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read audio {path}"))?;
    let samples = match format {
        SampleFormat::Pcm16 => waveform::pcm16_to_f32(&bytes),
        SampleFormat::F32 => waveform::f32_from_le_bytes(&bytes),
    };
    if samples.is_empty() {
        anyhow::bail!("audio file {path} contains no samples");
    }
    Ok(samples)
}

/// Encodes samples in `format`.
pub fn encode_samples(samples: &[f32], format: SampleFormat) -> Vec<u8> {
    match format {
        SampleFormat::Pcm16 => waveform::f32_to_pcm16(samples),
        SampleFormat::F32 => samples.iter().flat_map(|s| s.to_le_bytes()).collect(),
    }
}

/// A feature matrix dumped by another implementation.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReferenceFile {
    Rows(Vec<Vec<f32>>),
    Wrapped { features: Vec<Vec<f32>> },
}

/// Loads a reference feature matrix: a JSON 2-D array or `{"features": [[..]]}`.
pub fn load_reference(path: &str) -> anyhow::Result<FeatureMatrix> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
    let rows = match serde_json::from_str::<ReferenceFile>(&content)
        .with_context(|| format!("{path} is not a feature matrix"))?
    {
        ReferenceFile::Rows(rows) => rows,
        ReferenceFile::Wrapped { features } => features,
    };
    Ok(FeatureMatrix::from_rows(&rows)?)
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(
    result: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)?
    } else {
        serde_yaml::to_string(result)?
    };

    match output_path {
        Some(path) => std::fs::write(path, output)?,
        None => print!("{}", output),
    }

    Ok(())
}

/// Prints verbose output if enabled.
pub fn print_verbose(cli: &Cli, msg: &str) {
    if cli.verbose {
        eprintln!("[verbose] {}", msg);
    }
}

/// Prints success message.
pub fn print_success(msg: &str) {
    eprintln!("\x1b[32m✓\x1b[0m {}", msg);
}

/// Prints error message.
pub fn print_error(msg: &str) {
    eprintln!("\x1b[31m✗\x1b[0m {}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("logmel-cli-{}-{name}", std::process::id()))
    }

    #[test]
    fn load_config_yaml_overrides() {
        let path = temp_path("config.yaml");
        std::fs::write(&path, "n_mels: 64\ntop_db: null\n").unwrap();
        let cfg: Config = load_file(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.n_mels, 64);
        assert_eq!(cfg.top_db, None);
        assert_eq!(cfg.n_fft, 512);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn reference_accepts_both_layouts() {
        let plain = temp_path("plain.json");
        std::fs::write(&plain, "[[0.0, -1.0], [-2.0, -3.0]]").unwrap();
        let m = load_reference(plain.to_str().unwrap()).unwrap();
        assert_eq!(m.shape(), (2, 2));

        let wrapped = temp_path("wrapped.json");
        std::fs::write(&wrapped, r#"{"features": [[1.0, 2.0, 3.0]]}"#).unwrap();
        let m = load_reference(wrapped.to_str().unwrap()).unwrap();
        assert_eq!(m.shape(), (1, 3));

        std::fs::remove_file(plain).ok();
        std::fs::remove_file(wrapped).ok();
    }

    #[test]
    fn empty_audio_fails_loudly() {
        let path = temp_path("empty.pcm");
        std::fs::write(&path, b"").unwrap();
        assert!(read_samples(path.to_str().unwrap(), SampleFormat::Pcm16).is_err());
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn encode_then_read_f32() {
        let path = temp_path("tone.f32");
        let samples = vec![0.5f32, -0.25, 0.125];
        std::fs::write(&path, encode_samples(&samples, SampleFormat::F32)).unwrap();
        assert_eq!(read_samples(path.to_str().unwrap(), SampleFormat::F32).unwrap(), samples);
        std::fs::remove_file(path).ok();
    }
}
