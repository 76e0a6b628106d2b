//! # gaugeplot - Gauge Comparison Plots for Propagation Results
//!
//! `gaugeplot` reads the whitespace-delimited result tables written by a
//! time-dependent propagation code and renders overlay plots comparing the
//! same observable computed in different gauges (length, velocity, velocity
//! with the A² term).
//!
//! ## Key Features
//!
//! - **One parameterized pipeline**: a [`RenderPlan`](pipeline::RenderPlan)
//!   lists the overlays and spectra of a run instead of one script per plot.
//!
//! - **Explicit configuration**: input paths, header layout, output directory
//!   and resolution live in [`PlotterConfig`](config::PlotterConfig).
//!
//! - **Spectra**: real-input DFT power spectra, optionally weighted by a power
//!   of the frequency and normalized by each series' own laser frequency read
//!   from the file header.
//!
//! - **All-or-nothing runs**: every plot is built before the first image is
//!   written, and images are persisted atomically.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gaugeplot::config::{Observable, PlotterConfig};
//! use gaugeplot::pipeline::{RenderPlan, SeriesComparisonPlotter, SpectralOptions};
//!
//! let config = PlotterConfig::new("h2 sto-3g")
//!     .with_default_inputs()
//!     .output_dir("plots")
//!     .dpi(400);
//!
//! let plotter = SeriesComparisonPlotter::load(config)?;
//!
//! // dip.png, norm.png, energy.png, Hint.png, fft.png, fft_w2.png, fft_w4.png
//! let plan = RenderPlan::new()
//!     .observables(&Observable::ALL)
//!     .spectra(Observable::Dipole.column(), &[0, 2, 4], SpectralOptions::normalized());
//! let summary = plotter.run(&plan)?;
//! println!("{}", summary.to_json()?);
//! # Ok::<(), gaugeplot::pipeline::PlotterError>(())
//! ```
//!
//! ## Input Format
//!
//! ```text
//! JOB_NAME          h2_sto3g          <- optional header block
//! OPT_OMEGA_EV      1.55000e+00       <- characteristic frequency (eV)
//! ...
//! 0.00  0.0 0.0  0.000e+00  1.0  -1.13  0.0
//! 0.05  0.0 0.0  1.204e-05  1.0  -1.13  3.1e-07
//! ```
//!
//! | Column | Content |
//! |--------|---------|
//! | 0 | time (a.u.) |
//! | 3 | dipole |
//! | 4 | norm |
//! | 5 | energy |
//! | 6 | field interaction |
//!
//! ## Architecture
//!
//! - [`table`]: result table parsing and header-row handling
//! - [`metadata`]: header key/value extraction and run parameters
//! - [`series`]: gauge labels, colors and loaded series
//! - [`spectrum`]: power spectra and frequency axes
//! - [`plot`]: plot descriptions and PNG rendering
//! - [`export`]: TSV export of plotted curves
//! - [`config`]: run configuration
//! - [`pipeline`]: the comparison plotter
//! - [`validator`]: alignment diagnostics for result files

// Documentation lints - enforce complete documentation for publication
#![warn(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod export;
pub mod metadata;
pub mod pipeline;
pub mod plot;
pub mod series;
pub mod spectrum;
pub mod table;
pub mod validator;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::config::{InputFile, Observable, PlotterConfig};
    pub use crate::metadata::{HeaderMetadata, RunParameters, EV_TO_AU, OMEGA_MARKER};
    pub use crate::pipeline::{
        OverlayJob, PlotterError, RenderPlan, RunSummary, SeriesComparisonPlotter, SpectralJob,
        SpectralOptions,
    };
    pub use crate::plot::{AxisScale, Curve, PlotError, PlotSpec, Resolution};
    pub use crate::series::{Series, SeriesLabel};
    pub use crate::spectrum::{Spectrum, SpectrumError};
    pub use crate::table::{DataFormatError, HeaderRows, ResultTable, TableError};
    pub use crate::validator::{validate_result_files, ValidationReport};
}
