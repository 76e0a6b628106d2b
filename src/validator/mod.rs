//! # Result File Validation
//!
//! Diagnostics for result files before they are compared in one plot.
//! Plotting never runs these checks itself; they are an opt-in report.
//!
//! ## Checks
//!
//! 1. **Per file**: the numeric block parses, has enough columns for the
//!    observable plots, is uniformly sampled and records a characteristic
//!    frequency in its header.
//! 2. **Across files**: every file has the same row count and step size, so
//!    overlays and spectra share one grid.
//!
//! The report lists each file's checks under the file name, followed by an
//! "Across files" section.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use gaugeplot::table::HeaderRows;
//! use gaugeplot::validator::validate_result_files;
//!
//! let report = validate_result_files(
//!     &["res_length.out", "res_velocity.out"],
//!     HeaderRows::Auto,
//! );
//! println!("{}", report);
//! ```

use std::path::Path;

use crate::metadata::HeaderMetadata;
use crate::table::{HeaderRows, ResultTable};

pub use report::{CheckScope, CheckStatus, ValidationCheck, ValidationReport};

mod alignment;
mod file;
mod report;

/// Columns needed for a dipole plot (time plus columns 1..=3)
pub const DIPOLE_COLUMNS: usize = 4;

/// Columns needed for energy and interaction plots
pub const OBSERVABLE_COLUMNS: usize = 7;

/// Relative spacing deviation still treated as uniform sampling
pub const SPACING_TOLERANCE: f64 = 1e-6;

/// A file that parsed, with its metadata
#[derive(Debug)]
pub(crate) struct LoadedFile {
    pub(crate) name: String,
    pub(crate) table: ResultTable,
    pub(crate) metadata: HeaderMetadata,
}

/// Run every check over `paths` and collect the results.
///
/// Unreadable or malformed files are reported as failed checks; they do not
/// abort validation of the remaining files.
pub fn validate_result_files<P: AsRef<Path>>(paths: &[P], header_rows: HeaderRows) -> ValidationReport {
    let mut report = ValidationReport::new(paths.iter().map(|p| p.as_ref().display().to_string()));

    let loaded: Vec<LoadedFile> = paths
        .iter()
        .filter_map(|path| file::check_file(path.as_ref(), header_rows, &mut report))
        .collect();

    if loaded.len() == paths.len() {
        alignment::check_alignment(&loaded, &mut report);
    } else {
        log::debug!("Skipping alignment checks: not every file parsed");
    }

    report
}
