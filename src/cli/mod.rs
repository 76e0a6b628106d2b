use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gaugeplot::table::HeaderRows;

mod info;
mod plot;
mod validate;

mod config;
mod preset;

pub use preset::Preset;

/// gaugeplot - Compare gauge variants of a propagation run
#[derive(Parser)]
#[command(name = "gaugeplot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Plot preset selection.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PresetArg {
    /// Dipole moment only (res.png)
    Dipole,
    /// All observable columns
    Observables,
    /// Observables plus weighted dipole spectra
    Spectral,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Dipole => Preset::Dipole,
            PresetArg::Observables => Preset::Observables,
            PresetArg::Spectral => Preset::Spectral,
        }
    }
}

/// Arguments of the plot command.
#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Run name, used as the plot title
    #[arg(value_name = "RUN_NAME")]
    run_name: String,

    /// Plot preset (dipole, observables, spectral; default: observables)
    #[arg(short = 'p', long, value_enum)]
    preset: Option<PresetArg>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Length-gauge result file (default: res_length.out)
    #[arg(long, value_name = "FILE")]
    length: Option<PathBuf>,

    /// Velocity-gauge result file (default: res_velocity.out)
    #[arg(long, value_name = "FILE")]
    velocity: Option<PathBuf>,

    /// Velocity-gauge A² result file (default: res_velocity_A2.out)
    #[arg(long = "velocity-a2", value_name = "FILE")]
    velocity_a2: Option<PathBuf>,

    /// Header lines to skip, or "auto" (default: preset-dependent)
    #[arg(long, value_name = "N|auto")]
    header_rows: Option<HeaderRows>,

    /// Output resolution in dots per inch (default: preset-dependent)
    #[arg(long)]
    dpi: Option<u32>,

    /// Output directory (default: current directory)
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Divide spectral frequency axes by each series' omega
    #[arg(long)]
    normalize_omega: bool,

    /// Keep raw frequency axes even when the preset normalizes
    #[arg(long, conflicts_with = "normalize_omega")]
    no_normalize_omega: bool,

    /// Use angular frequency on spectral axes
    #[arg(long)]
    angular: bool,

    /// Write a TSV file with the curve data next to each image
    #[arg(long)]
    export_data: bool,

    /// Write summary.json into the output directory
    #[arg(long)]
    summary: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render comparison plots for a run
    Plot(PlotArgs),

    /// Display information about a result file
    Info {
        /// Result file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Header lines to skip, or "auto"
        #[arg(long, value_name = "N|auto", default_value = "auto")]
        header_rows: HeaderRows,
    },

    /// Check that result files can be compared in one plot
    Validate {
        /// Result file paths
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Header lines to skip, or "auto"
        #[arg(long, value_name = "N|auto", default_value = "auto")]
        header_rows: HeaderRows,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Plot(args) => plot::run(args),
        Commands::Info { file, header_rows } => info::run(file, header_rows),
        Commands::Validate { files, header_rows } => validate::run(files, header_rows),
    }
}
