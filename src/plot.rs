//! # Plot Module
//!
//! In-memory description of one output image ([`PlotSpec`]) and its
//! rasterization to PNG.
//!
//! A `PlotSpec` is plain data: curves, axis scale, labels, output path and
//! resolution. Building it never touches the filesystem, which lets the
//! pipeline validate every plot of a run before the first image is written.
//! Rendering happens in [`render`] and always works on a freshly cleared
//! surface. [`PlotSpec::stage`] encodes the image into a hidden temporary
//! file beside the destination; [`StagedImage::commit`] moves it into place.

use std::ops::Range;
use std::path::{Path, PathBuf};

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

mod render;

/// Errors that can occur while rendering a plot
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Output file or directory could not be written
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Path that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The drawing backend reported an error
    #[error("Failed to render {}: {message}", path.display())]
    Render {
        /// Output path of the plot
        path: PathBuf,
        /// Backend error text
        message: String,
    },

    /// PNG encoding failed
    #[error("Failed to encode {}: {source}", path.display())]
    Encode {
        /// Output path of the plot
        path: PathBuf,
        /// Encoder error
        #[source]
        source: image::ImageError,
    },

    /// No curve has a drawable point
    #[error("Nothing to draw for {}", path.display())]
    NoData {
        /// Output path of the plot
        path: PathBuf,
    },

    /// Resolution is unusable
    #[error("Invalid resolution: {0} dpi")]
    InvalidResolution(u32),
}

impl PlotError {
    pub(crate) fn render(path: &Path, message: impl std::fmt::Display) -> Self {
        PlotError::Render {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }
}

/// Y-axis scale
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisScale {
    /// Linear axis
    #[default]
    Linear,
    /// Base-10 logarithmic axis; non-positive values are not drawn
    Log,
}

/// Output resolution over a fixed figure size.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Dots per inch
    pub dpi: u32,
    /// Figure width in inches
    pub width_in: f64,
    /// Figure height in inches
    pub height_in: f64,
}

impl Default for Resolution {
    fn default() -> Self {
        Self::with_dpi(Self::DEFAULT_DPI)
    }
}

impl Resolution {
    /// Resolution used when none is configured
    pub const DEFAULT_DPI: u32 = 100;

    /// Default 6.4 x 4.8 inch figure at the given dpi
    pub fn with_dpi(dpi: u32) -> Self {
        Self {
            dpi,
            width_in: 6.4,
            height_in: 4.8,
        }
    }

    /// Image size in pixels
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = self.dpi as f64;
        (
            (self.width_in * dpi).round() as u32,
            (self.height_in * dpi).round() as u32,
        )
    }

    /// Factor applied to font sizes and line widths relative to 100 dpi
    pub fn scale(&self) -> f64 {
        self.dpi as f64 / 100.0
    }
}

/// One labeled line.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Legend text
    pub label: String,
    /// Line color
    pub color: RGBColor,
    /// `(x, y)` samples
    pub points: Vec<(f64, f64)>,
}

impl Curve {
    /// Create a curve from parallel x and y columns
    pub fn from_columns(label: impl Into<String>, color: RGBColor, x: &[f64], y: &[f64]) -> Self {
        Self {
            label: label.into(),
            color,
            points: x.iter().copied().zip(y.iter().copied()).collect(),
        }
    }

    /// Points that can be drawn on an axis of the given scale
    pub fn drawable_points(&self, scale: AxisScale) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .copied()
            .filter(move |&(x, y)| is_drawable(x, y, scale))
    }
}

fn is_drawable(x: f64, y: f64, scale: AxisScale) -> bool {
    x.is_finite() && y.is_finite() && (scale == AxisScale::Linear || y > 0.0)
}

/// Description of one output image.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSpec {
    /// Chart caption
    pub title: String,
    /// Curves in legend order
    pub curves: Vec<Curve>,
    /// Y-axis scale
    pub y_scale: AxisScale,
    /// Draw grid lines
    pub grid: bool,
    /// X-axis description
    pub x_desc: String,
    /// Y-axis description
    pub y_desc: String,
    /// Output file
    pub output: PathBuf,
    /// Output resolution
    pub resolution: Resolution,
}

impl PlotSpec {
    /// Empty linear plot with grid enabled
    pub fn new(title: impl Into<String>, output: impl Into<PathBuf>) -> Self {
        Self {
            title: title.into(),
            curves: Vec::new(),
            y_scale: AxisScale::Linear,
            grid: true,
            x_desc: String::new(),
            y_desc: String::new(),
            output: output.into(),
            resolution: Resolution::default(),
        }
    }

    /// Add a curve
    pub fn with_curve(mut self, curve: Curve) -> Self {
        self.curves.push(curve);
        self
    }

    /// Set the y-axis scale
    pub fn y_scale(mut self, scale: AxisScale) -> Self {
        self.y_scale = scale;
        self
    }

    /// Enable or disable grid lines
    pub fn grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }

    /// Set axis descriptions
    pub fn axis_labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_desc = x.into();
        self.y_desc = y.into();
        self
    }

    /// Set the output resolution
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Number of points that will actually be drawn
    pub fn drawable_point_count(&self) -> usize {
        self.curves
            .iter()
            .map(|c| c.drawable_points(self.y_scale).count())
            .sum()
    }

    /// X range spanning all drawable points
    pub fn x_range(&self) -> Option<Range<f64>> {
        let (min, max) = self.bounds(|(x, _)| x)?;
        Some(pad_linear(min, max, 0.0))
    }

    /// Y range spanning all drawable points, padded for the axis scale
    pub fn y_range(&self) -> Option<Range<f64>> {
        let (min, max) = self.bounds(|(_, y)| y)?;
        Some(match self.y_scale {
            AxisScale::Linear => pad_linear(min, max, 0.05),
            AxisScale::Log => pad_log(min, max),
        })
    }

    fn bounds(&self, pick: impl Fn((f64, f64)) -> f64) -> Option<(f64, f64)> {
        self.curves
            .iter()
            .flat_map(|c| c.drawable_points(self.y_scale))
            .map(pick)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
            })
    }

    /// Fail if this plot cannot be drawn: zero dpi, or no curve with a
    /// point that fits the y-axis scale.
    pub fn check(&self) -> Result<(), PlotError> {
        if self.resolution.dpi == 0 {
            return Err(PlotError::InvalidResolution(self.resolution.dpi));
        }
        if self.drawable_point_count() == 0 {
            return Err(PlotError::NoData {
                path: self.output.clone(),
            });
        }
        Ok(())
    }

    /// Rasterize into a temporary file next to `self.output`.
    ///
    /// Nothing is visible at the destination until the returned image is
    /// committed. Dropping it removes the temporary file.
    pub fn stage(&self) -> Result<StagedImage, PlotError> {
        self.check()?;
        render::render_png(self)
    }

    /// Rasterize to `self.output` as PNG.
    pub fn render(&self) -> Result<(), PlotError> {
        self.stage()?.commit()
    }
}

/// A rendered PNG waiting in a temporary file.
#[derive(Debug)]
pub struct StagedImage {
    file: tempfile::NamedTempFile,
    destination: PathBuf,
    size: (u32, u32),
}

impl StagedImage {
    /// Final image path
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Image size in pixels
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Atomically rename the image to its destination.
    pub fn commit(self) -> Result<(), PlotError> {
        let Self {
            file,
            destination,
            size,
        } = self;
        file.persist(&destination).map_err(|e| PlotError::Io {
            path: destination.clone(),
            source: e.error,
        })?;
        log::debug!("Wrote {} ({}x{})", destination.display(), size.0, size.1);
        Ok(())
    }
}

fn pad_linear(min: f64, max: f64, fraction: f64) -> Range<f64> {
    let span = max - min;
    if span.abs() < f64::EPSILON * max.abs().max(1.0) {
        return (min - 0.5)..(max + 0.5);
    }
    let pad = span * fraction;
    (min - pad)..(max + pad)
}

fn pad_log(min: f64, max: f64) -> Range<f64> {
    if max / min < 10.0 {
        return (min / 10.0)..(max * 10.0);
    }
    (min / 2.0)..(max * 2.0)
}
