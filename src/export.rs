//! Tab-separated export of plotted curve data.
//!
//! Image bytes vary with the renderer, the numbers behind them do not. Each
//! exported file has one row per point with the columns `series`, `x`, `y`.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::plot::PlotSpec;

/// Errors that can occur while exporting curve data
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Export file could not be created
    #[error("Failed to create {}: {source}", path.display())]
    Io {
        /// Export path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// CSV/TSV writing error
    #[error("TSV writing error: {0}")]
    Csv(#[from] csv::Error),
}

/// Side-car path for a plot: the image path with a `.tsv` extension
pub fn data_path(image: &Path) -> PathBuf {
    image.with_extension("tsv")
}

/// Write every curve of `spec` as TSV rows.
pub fn write_curves<W: Write>(writer: W, spec: &PlotSpec) -> Result<(), ExportError> {
    let mut tsv = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(writer);

    tsv.write_record(["series", "x", "y"])?;
    for curve in &spec.curves {
        for (x, y) in &curve.points {
            tsv.write_record(&[curve.label.clone(), x.to_string(), y.to_string()])?;
        }
    }
    tsv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Export the curves of `spec` next to its image. Returns the written path.
pub fn export_plot_data(spec: &PlotSpec) -> Result<PathBuf, ExportError> {
    let path = data_path(&spec.output);
    let file = File::create(&path).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    write_curves(file, spec)?;
    log::debug!("Exported curve data to {}", path.display());
    Ok(path)
}
