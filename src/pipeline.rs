//! # Comparison Pipeline
//!
//! [`SeriesComparisonPlotter`] loads one result table per gauge variant and
//! renders overlay plots of their columns and of their power spectra.
//!
//! The pipeline is a straight line:
//!
//! ```text
//! Load -> PlotOverlay* -> (SpectralTransform -> PlotSpectralOverlay)*
//! ```
//!
//! [`SeriesComparisonPlotter::run`] executes a whole [`RenderPlan`]. It builds
//! and checks every [`PlotSpec`] first, renders all of them into temporary
//! files, and only then moves the images into place. Malformed data or an
//! undrawable plot aborts the run before anything lands on disk.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gaugeplot::config::{Observable, PlotterConfig};
//! use gaugeplot::pipeline::{RenderPlan, SeriesComparisonPlotter, SpectralOptions};
//! use gaugeplot::table::HeaderRows;
//!
//! let config = PlotterConfig::new("h2 sto-3g")
//!     .with_default_inputs()
//!     .header_rows(HeaderRows::Fixed(17))
//!     .dpi(400);
//!
//! let plotter = SeriesComparisonPlotter::load(config)?;
//! let plan = RenderPlan::new()
//!     .observables(&Observable::ALL)
//!     .spectra(Observable::Dipole.column(), &[0, 2, 4], SpectralOptions::normalized());
//! let summary = plotter.run(&plan)?;
//! println!("Wrote {} images", summary.outputs.len());
//! # Ok::<(), gaugeplot::pipeline::PlotterError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::config::{Observable, PlotterConfig};
use crate::export::{self, ExportError};
use crate::plot::{AxisScale, Curve, PlotError, PlotSpec};
use crate::series::{Series, SeriesLabel};
use crate::spectrum::{Spectrum, SpectrumError};
use crate::table::{DataFormatError, HeaderRows, TableError};

/// File name of the run summary written next to the images
pub const SUMMARY_FILE_NAME: &str = "summary.json";

/// Errors that can occur while running the pipeline
#[derive(Debug, thiserror::Error)]
pub enum PlotterError {
    /// An input table could not be loaded
    #[error(transparent)]
    Table(#[from] TableError),

    /// A loaded table does not have the requested data
    #[error(transparent)]
    DataFormat(#[from] DataFormatError),

    /// Spectrum computation failed for one series
    #[error("{label} series: {source}")]
    Spectrum {
        /// Series that failed
        label: SeriesLabel,
        /// Underlying error
        #[source]
        source: SpectrumError,
    },

    /// Rendering failed
    #[error(transparent)]
    Plot(#[from] PlotError),

    /// Curve data export failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The configuration names no input files
    #[error("No input series configured")]
    NoInputs,

    /// Output directory or summary file could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Options applied to every series' spectrum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SpectralOptions {
    /// Divide the frequency axis by the series' own characteristic frequency
    pub normalize_by_omega: bool,
    /// Use angular frequency (2π f) instead of ordinary frequency
    pub angular: bool,
}

impl SpectralOptions {
    /// Ordinary frequency divided by omega
    pub fn normalized() -> Self {
        Self {
            normalize_by_omega: true,
            angular: false,
        }
    }
}

/// One overlay of a table column across all series.
#[derive(Clone, Debug, PartialEq)]
pub struct OverlayJob {
    /// Column to plot against column 0
    pub column: usize,
    /// Image file name inside the output directory
    pub output_name: String,
    /// Y-axis scale
    pub scale: AxisScale,
    /// Y-axis description
    pub y_desc: String,
}

/// One overlay of weighted power spectra across all series.
#[derive(Clone, Debug, PartialEq)]
pub struct SpectralJob {
    /// Column to transform
    pub column: usize,
    /// Power of the frequency axis multiplied into the spectrum
    pub exponent: u32,
    /// Frequency axis options
    pub options: SpectralOptions,
    /// Image file name inside the output directory
    pub output_name: String,
}

impl SpectralJob {
    /// Job with the conventional file name for `exponent`
    pub fn new(column: usize, exponent: u32, options: SpectralOptions) -> Self {
        Self {
            column,
            exponent,
            options,
            output_name: spectral_file_name(exponent),
        }
    }
}

/// `fft.png` for the bare power spectrum, `fft_w<exponent>.png` otherwise
pub fn spectral_file_name(exponent: u32) -> String {
    if exponent == 0 {
        "fft.png".to_string()
    } else {
        format!("fft_w{}.png", exponent)
    }
}

/// Ordered list of plots to produce in one run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderPlan {
    /// Column overlays, rendered first
    pub overlays: Vec<OverlayJob>,
    /// Spectral overlays, rendered after the column overlays
    pub spectra: Vec<SpectralJob>,
}

impl RenderPlan {
    /// Empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a linear overlay of an arbitrary column
    pub fn overlay(mut self, column: usize, output_name: impl Into<String>) -> Self {
        self.overlays.push(OverlayJob {
            column,
            output_name: output_name.into(),
            scale: AxisScale::Linear,
            y_desc: String::new(),
        });
        self
    }

    /// Add one linear overlay per observable using its conventional name
    pub fn observables(mut self, observables: &[Observable]) -> Self {
        for observable in observables {
            self.overlays.push(OverlayJob {
                column: observable.column(),
                output_name: observable.file_name().to_string(),
                scale: AxisScale::Linear,
                y_desc: observable.description().to_string(),
            });
        }
        self
    }

    /// Add one spectral overlay per exponent
    pub fn spectra(mut self, column: usize, exponents: &[u32], options: SpectralOptions) -> Self {
        self.spectra.extend(
            exponents
                .iter()
                .map(|&exponent| SpectralJob::new(column, exponent, options)),
        );
        self
    }

    /// Total number of images
    pub fn len(&self) -> usize {
        self.overlays.len() + self.spectra.len()
    }

    /// True when the plan produces no images
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Kind of image produced
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// Column overlay
    Overlay,
    /// Spectral overlay
    Spectral,
}

/// Provenance of one loaded input
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InputSummary {
    /// Gauge variant
    pub label: SeriesLabel,
    /// Source file
    pub path: PathBuf,
    /// Data rows
    pub rows: usize,
    /// Columns per row
    pub columns: usize,
    /// Sample spacing
    pub step: Option<f64>,
    /// Characteristic frequency in eV from the header
    pub omega_ev: Option<f64>,
}

/// One image written by the run
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutputSummary {
    /// Image path
    pub path: PathBuf,
    /// Overlay or spectral
    pub kind: OutputKind,
    /// Source column
    pub column: usize,
    /// Frequency exponent for spectral plots
    pub exponent: Option<u32>,
    /// Number of curves
    pub curves: usize,
    /// Number of drawn points
    pub points: usize,
    /// Side-car TSV, when exported
    pub data: Option<PathBuf>,
}

/// Description of a completed run, serialized as `summary.json`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RunSummary {
    /// Run name
    pub run_name: String,
    /// RFC 3339 creation time
    pub generated_at: String,
    /// Header row policy used for every input
    pub header_rows: HeaderRows,
    /// Image resolution
    pub dpi: u32,
    /// Loaded inputs
    pub inputs: Vec<InputSummary>,
    /// Written images
    pub outputs: Vec<OutputSummary>,
}

impl RunSummary {
    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Loads gauge-variant result tables and renders comparison plots.
#[derive(Debug, Clone)]
pub struct SeriesComparisonPlotter {
    config: PlotterConfig,
    series: Vec<Series>,
}

impl SeriesComparisonPlotter {
    /// Load every input named in `config`.
    pub fn load(config: PlotterConfig) -> Result<Self, PlotterError> {
        if config.inputs.is_empty() {
            return Err(PlotterError::NoInputs);
        }

        let mut series = Vec::with_capacity(config.inputs.len());
        for input in &config.inputs {
            info!("Loading {} series from {}", input.label, input.path.display());
            let loaded = Series::load(input.label, &input.path, config.header_rows)?;
            debug!(
                "  {} rows x {} columns, step {:?}",
                loaded.table.rows(),
                loaded.table.width(),
                loaded.table.step()
            );
            series.push(loaded);
        }

        Ok(Self::from_series(config, series))
    }

    /// Use already loaded series. `config.inputs` is not consulted.
    pub fn from_series(config: PlotterConfig, series: Vec<Series>) -> Self {
        let plotter = Self { config, series };
        plotter.warn_on_misalignment();
        plotter
    }

    /// Run configuration
    pub fn config(&self) -> &PlotterConfig {
        &self.config
    }

    /// Loaded series in legend order
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    fn warn_on_misalignment(&self) {
        let Some(first) = self.series.first() else {
            return;
        };
        for other in &self.series[1..] {
            if other.table.rows() != first.table.rows() {
                warn!(
                    "{} series has {} rows but {} series has {}; spectra will not share a frequency grid",
                    other.label,
                    other.table.rows(),
                    first.label,
                    first.table.rows()
                );
            }
            if other.table.step() != first.table.step() {
                warn!(
                    "{} series step {:?} differs from {} series step {:?}",
                    other.label,
                    other.table.step(),
                    first.label,
                    first.table.step()
                );
            }
        }
    }

    fn output_path(&self, output_name: &str) -> PathBuf {
        self.config.output_dir.join(output_name)
    }

    /// Describe the overlay of `column` against column 0 for every series.
    pub fn overlay_spec(
        &self,
        column: usize,
        output_name: &str,
        scale: AxisScale,
    ) -> Result<PlotSpec, PlotterError> {
        let mut spec = PlotSpec::new(&self.config.run_name, self.output_path(output_name))
            .y_scale(scale)
            .grid(true)
            .axis_labels("time (a.u.)", format!("column {}", column))
            .resolution(self.config.resolution);

        for series in &self.series {
            let values = series.table.column(column)?;
            spec = spec.with_curve(Curve::from_columns(
                series.label.label(),
                series.label.color(),
                series.table.axis(),
                values,
            ));
        }
        Ok(spec)
    }

    /// Render the overlay of `column`. Returns the image path.
    pub fn plot_overlay(
        &self,
        column: usize,
        output_name: &str,
        scale: AxisScale,
    ) -> Result<PathBuf, PlotterError> {
        let spec = self.overlay_spec(column, output_name, scale)?;
        spec.check()?;
        self.prepare_output_dir()?;
        self.render(&spec)?;
        Ok(spec.output)
    }

    /// Power spectrum of `column` for every series.
    ///
    /// With `normalize_by_omega`, each series' axis is divided by that
    /// series' own characteristic frequency. A series without one keeps its
    /// unscaled axis and a warning is logged.
    pub fn spectral_transform(
        &self,
        column: usize,
        options: SpectralOptions,
    ) -> Result<Vec<(SeriesLabel, Spectrum)>, PlotterError> {
        let mut spectra = Vec::with_capacity(self.series.len());
        for series in &self.series {
            let values = series.table.column(column)?;
            let mut spectrum = Spectrum::compute(series.table.axis(), values).map_err(|source| {
                PlotterError::Spectrum {
                    label: series.label,
                    source,
                }
            })?;

            if options.angular {
                spectrum = spectrum.to_angular();
            }
            if options.normalize_by_omega {
                match series.characteristic_omega() {
                    Some(omega) if omega.is_finite() && omega > 0.0 => {
                        spectrum = spectrum.normalized(omega);
                    }
                    _ => warn!(
                        "{} series ({}) has no usable OPT_OMEGA_EV header value; frequency axis left unscaled",
                        series.label,
                        series.table.path().display()
                    ),
                }
            }
            spectra.push((series.label, spectrum));
        }
        Ok(spectra)
    }

    /// Describe the log-scale overlay of weighted power spectra.
    pub fn spectral_overlay_spec(&self, job: &SpectralJob) -> Result<PlotSpec, PlotterError> {
        let spectra = self.spectral_transform(job.column, job.options)?;

        let x_desc = match (job.options.normalize_by_omega, job.options.angular) {
            (true, true) => "omega / omega_0",
            (true, false) => "frequency / omega_0",
            (false, true) => "angular frequency (1/a.u.)",
            (false, false) => "frequency (1/a.u.)",
        };
        let y_desc = match job.exponent {
            0 => "power".to_string(),
            n => format!("power * frequency^{}", n),
        };

        let mut spec = PlotSpec::new(&self.config.run_name, self.output_path(&job.output_name))
            .y_scale(AxisScale::Log)
            .grid(true)
            .axis_labels(x_desc, y_desc)
            .resolution(self.config.resolution);

        for (label, spectrum) in &spectra {
            let points = spectrum
                .weighted(job.exponent)
                .map_err(|source| PlotterError::Spectrum {
                    label: *label,
                    source,
                })?;
            spec = spec.with_curve(Curve {
                label: label.label().to_string(),
                color: label.color(),
                points,
            });
        }
        Ok(spec)
    }

    /// Render a spectral overlay. Returns the image path.
    pub fn plot_spectral_overlay(&self, job: &SpectralJob) -> Result<PathBuf, PlotterError> {
        let spec = self.spectral_overlay_spec(job)?;
        spec.check()?;
        self.prepare_output_dir()?;
        self.render(&spec)?;
        Ok(spec.output)
    }

    /// Build and check every plot of `plan`, then render them in order.
    ///
    /// Images are staged in temporary files and only moved into place once
    /// every one of them rendered, so a failing plot leaves no images behind.
    pub fn run(&self, plan: &RenderPlan) -> Result<RunSummary, PlotterError> {
        let mut pending = Vec::with_capacity(plan.len());
        for job in &plan.overlays {
            let mut spec = self.overlay_spec(job.column, &job.output_name, job.scale)?;
            if !job.y_desc.is_empty() {
                spec.y_desc = job.y_desc.clone();
            }
            spec.check()?;
            pending.push((spec, OutputKind::Overlay, job.column, None));
        }
        for job in &plan.spectra {
            let spec = self.spectral_overlay_spec(job)?;
            spec.check()?;
            pending.push((spec, OutputKind::Spectral, job.column, Some(job.exponent)));
        }

        self.prepare_output_dir()?;

        let staged = pending
            .iter()
            .map(|(spec, ..)| spec.stage())
            .collect::<Result<Vec<_>, _>>()?;
        for image in staged {
            image.commit()?;
        }

        let mut outputs = Vec::with_capacity(pending.len());
        for (spec, kind, column, exponent) in pending {
            info!("Wrote {}", spec.output.display());
            let data = self.export(&spec)?;
            outputs.push(OutputSummary {
                points: spec.drawable_point_count(),
                curves: spec.curves.len(),
                path: spec.output,
                kind,
                column,
                exponent,
                data,
            });
        }

        let summary = RunSummary {
            run_name: self.config.run_name.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            header_rows: self.config.header_rows,
            dpi: self.config.resolution.dpi,
            inputs: self.input_summaries(),
            outputs,
        };

        if self.config.write_summary {
            let path = self.output_path(SUMMARY_FILE_NAME);
            fs::write(&path, summary.to_json()?).map_err(|source| PlotterError::Io {
                path: path.clone(),
                source,
            })?;
            info!("Wrote {}", path.display());
        }

        Ok(summary)
    }

    fn input_summaries(&self) -> Vec<InputSummary> {
        self.series
            .iter()
            .map(|s| InputSummary {
                label: s.label,
                path: s.table.path().to_path_buf(),
                rows: s.table.rows(),
                columns: s.table.width(),
                step: s.table.step(),
                omega_ev: s.metadata.omega_ev(),
            })
            .collect()
    }

    fn prepare_output_dir(&self) -> Result<(), PlotterError> {
        let dir: &Path = &self.config.output_dir;
        fs::create_dir_all(dir).map_err(|source| PlotterError::Io {
            path: dir.to_path_buf(),
            source,
        })
    }

    fn render(&self, spec: &PlotSpec) -> Result<Option<PathBuf>, PlotterError> {
        spec.render()?;
        self.export(spec)
    }

    fn export(&self, spec: &PlotSpec) -> Result<Option<PathBuf>, PlotterError> {
        if self.config.export_data {
            return Ok(Some(export::export_plot_data(spec)?));
        }
        Ok(None)
    }
}
