//! Configuration loading: config file < command line.

use std::path::Path;

use anyhow::{Context, Result};
use handoff_core::RunConfig;

use crate::cli::Cli;

/// Build the run configuration from an optional TOML file plus CLI overrides.
pub fn load(cli: &Cli) -> Result<RunConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            from_file(path)?
        }
        None => RunConfig::default(),
    };
    apply_overrides(&mut config, cli);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn from_file(path: &Path) -> Result<RunConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn parse(text: &str) -> Result<RunConfig> {
    Ok(toml::from_str(text)?)
}

fn apply_overrides(config: &mut RunConfig, cli: &Cli) {
    if let Some(mb) = cli.buffer_mb {
        config.buffer_size_mb = mb;
    }
    if cli.transfer {
        config.transfer = true;
    }
    if let Some(ms) = cli.render_delay_ms {
        config.render_delay_ms = ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parses_partial_toml() {
        let config = parse("buffer_size_mb = 256\ntransfer = true\n").unwrap();
        assert_eq!(config.buffer_size_mb, 256);
        assert!(config.transfer);
        assert_eq!(config.render_delay_ms, RunConfig::default().render_delay_ms);
    }

    #[test]
    fn rejects_bad_toml() {
        assert!(parse("buffer_size_mb = \"lots\"").is_err());
    }

    #[test]
    fn cli_overrides_file_values() {
        let mut config = parse("buffer_size_mb = 256\nrender_delay_ms = 5\n").unwrap();
        let cli = Cli::try_parse_from(["handoff", "-b", "8", "-t"]).unwrap();
        apply_overrides(&mut config, &cli);
        assert_eq!(config.buffer_size_mb, 8);
        assert!(config.transfer);
        assert_eq!(config.render_delay_ms, 5);
    }

    #[test]
    fn load_without_file_uses_defaults() {
        let cli = Cli::try_parse_from(["handoff"]).unwrap();
        assert_eq!(load(&cli).unwrap(), RunConfig::default());
    }

    #[test]
    fn missing_file_is_an_error() {
        let cli = Cli::try_parse_from(["handoff", "-c", "/nonexistent/handoff.toml"]).unwrap();
        let err = load(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
