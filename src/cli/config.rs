//! TOML configuration file support.
//!
//! Instead of passing many CLI flags, a run can be described in a config
//! file. Values here override the preset; explicit flags override both.
//!
//! ```toml
//! # gaugeplot.toml
//! [plot]
//! preset = "spectral"
//! header_rows = 17
//! dpi = 400
//! output_dir = "plots"
//! normalize_omega = true
//! export_data = true
//!
//! [inputs]
//! length = "runs/h2/res_length.out"
//! velocity = "runs/h2/res_velocity.out"
//! velocity_a2 = "runs/h2/res_velocity_A2.out"
//!
//! [spectral]
//! column = 3
//! exponents = [0, 2]
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use gaugeplot::series::SeriesLabel;
use gaugeplot::table::HeaderRows;

use super::Preset;

/// Root configuration structure for gaugeplot.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Settings of the plot command.
    #[serde(default)]
    pub plot: PlotSection,

    /// Result files per gauge variant.
    #[serde(default)]
    pub inputs: InputsSection,

    /// Spectral plot settings.
    #[serde(default)]
    pub spectral: SpectralSection,
}

/// Configuration for the plot command.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlotSection {
    /// Preset providing the plot jobs and defaults.
    pub preset: Option<Preset>,

    /// Header lines to skip, or "auto".
    pub header_rows: Option<HeaderRows>,

    /// Output resolution.
    pub dpi: Option<u32>,

    /// Directory receiving the images.
    pub output_dir: Option<PathBuf>,

    /// Divide spectral frequency axes by each series' omega.
    pub normalize_omega: Option<bool>,

    /// Use angular frequency on spectral axes.
    pub angular: Option<bool>,

    /// Write a TSV file with the curve data next to each image.
    pub export_data: Option<bool>,

    /// Write summary.json.
    pub summary: Option<bool>,
}

/// Input file paths.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputsSection {
    /// Length-gauge result file.
    pub length: Option<PathBuf>,

    /// Velocity-gauge result file.
    pub velocity: Option<PathBuf>,

    /// Velocity-gauge result file including the A² term.
    pub velocity_a2: Option<PathBuf>,
}

impl InputsSection {
    /// Configured path for a gauge variant.
    pub fn get(&self, label: SeriesLabel) -> Option<&PathBuf> {
        match label {
            SeriesLabel::Length => self.length.as_ref(),
            SeriesLabel::Velocity => self.velocity.as_ref(),
            SeriesLabel::VelocityA2 => self.velocity_a2.as_ref(),
        }
    }
}

/// Spectral plot configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpectralSection {
    /// Column to transform.
    pub column: Option<usize>,

    /// Frequency exponents, one image each.
    pub exponents: Option<Vec<u32>>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [plot]
            preset = "spectral"
            header_rows = 21
            dpi = 200
            output_dir = "plots"
            normalize_omega = false
            export_data = true

            [inputs]
            length = "a/res_length.out"
            velocity_a2 = "a/res_velocity_A2.out"

            [spectral]
            column = 4
            exponents = [0, 2]
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.plot.preset, Some(Preset::Spectral));
        assert_eq!(config.plot.header_rows, Some(HeaderRows::Fixed(21)));
        assert_eq!(config.plot.dpi, Some(200));
        assert_eq!(config.plot.output_dir, Some(PathBuf::from("plots")));
        assert_eq!(config.plot.normalize_omega, Some(false));
        assert_eq!(config.plot.export_data, Some(true));
        assert_eq!(config.plot.summary, None);
        assert_eq!(
            config.inputs.get(SeriesLabel::Length),
            Some(&PathBuf::from("a/res_length.out"))
        );
        assert_eq!(config.inputs.get(SeriesLabel::Velocity), None);
        assert_eq!(config.spectral.column, Some(4));
        assert_eq!(config.spectral.exponents, Some(vec![0, 2]));
    }

    #[test]
    fn test_header_rows_auto() {
        let config = Config::from_str("[plot]\nheader_rows = \"auto\"\n").unwrap();
        assert_eq!(config.plot.header_rows, Some(HeaderRows::Auto));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::from_str("[plot]\ncompression = 3\n").is_err());
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.plot.preset, None);
        assert_eq!(config.spectral.exponents, None);
    }
}
