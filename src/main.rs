//! # gaugeplot
//!
//! Command-line front end rendering gauge-comparison plots of propagation
//! results.
//!
//! ## Usage
//!
//! ```bash
//! # Observable overlays from res_length.out, res_velocity.out, res_velocity_A2.out
//! gaugeplot plot "h2 sto-3g"
//!
//! # Observables plus omega-normalized spectra into plots/
//! gaugeplot plot "h2 sto-3g" --preset spectral --output-dir plots --summary
//!
//! # Inspect or check result files
//! gaugeplot info res_length.out
//! gaugeplot validate res_length.out res_velocity.out res_velocity_A2.out
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
