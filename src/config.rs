//! Run configuration for the comparison plotter.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::plot::Resolution;
use crate::series::SeriesLabel;
use crate::table::HeaderRows;

/// Derived quantities written by the propagation code, by column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Observable {
    /// Dipole moment along the field direction (column 3)
    Dipole,
    /// Norm of the propagated state (column 4)
    Norm,
    /// Energy expectation value (column 5)
    Energy,
    /// Field interaction term (column 6)
    Interaction,
}

impl Observable {
    /// All observables in column order
    pub const ALL: [Observable; 4] = [
        Observable::Dipole,
        Observable::Norm,
        Observable::Energy,
        Observable::Interaction,
    ];

    /// Column index in a result table
    pub fn column(&self) -> usize {
        match self {
            Observable::Dipole => 3,
            Observable::Norm => 4,
            Observable::Energy => 5,
            Observable::Interaction => 6,
        }
    }

    /// Image file name used for this observable
    pub fn file_name(&self) -> &'static str {
        match self {
            Observable::Dipole => "dip.png",
            Observable::Norm => "norm.png",
            Observable::Energy => "energy.png",
            Observable::Interaction => "Hint.png",
        }
    }

    /// Y-axis description
    pub fn description(&self) -> &'static str {
        match self {
            Observable::Dipole => "dipole (a.u.)",
            Observable::Norm => "norm",
            Observable::Energy => "energy (a.u.)",
            Observable::Interaction => "H_int (a.u.)",
        }
    }
}

impl fmt::Display for Observable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Observable::Dipole => write!(f, "dipole"),
            Observable::Norm => write!(f, "norm"),
            Observable::Energy => write!(f, "energy"),
            Observable::Interaction => write!(f, "interaction"),
        }
    }
}

impl FromStr for Observable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dipole" | "dip" => Ok(Observable::Dipole),
            "norm" => Ok(Observable::Norm),
            "energy" => Ok(Observable::Energy),
            "interaction" | "hint" => Ok(Observable::Interaction),
            _ => Err(format!(
                "Unknown observable '{}'. Valid options: dipole, norm, energy, interaction",
                s
            )),
        }
    }
}

/// A result file and the gauge variant it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFile {
    /// Gauge variant
    pub label: SeriesLabel,
    /// Path to the result file
    pub path: PathBuf,
}

impl InputFile {
    /// Create a new input entry
    pub fn new(label: SeriesLabel, path: impl Into<PathBuf>) -> Self {
        Self {
            label,
            path: path.into(),
        }
    }
}

/// Everything the plotter needs to know about a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotterConfig {
    /// Run name, used as the plot title
    pub run_name: String,

    /// Input files in legend order
    pub inputs: Vec<InputFile>,

    /// Header block handling for every input
    pub header_rows: HeaderRows,

    /// Directory receiving images and side-car files
    pub output_dir: PathBuf,

    /// Image resolution
    pub resolution: Resolution,

    /// Write a `.tsv` file with the curve data next to each image
    pub export_data: bool,

    /// Write `summary.json` describing the run
    pub write_summary: bool,
}

impl PlotterConfig {
    /// Configuration with no inputs, autodetected headers, output to the
    /// working directory at the default resolution
    pub fn new(run_name: impl Into<String>) -> Self {
        Self {
            run_name: run_name.into(),
            inputs: Vec::new(),
            header_rows: HeaderRows::Auto,
            output_dir: PathBuf::from("."),
            resolution: Resolution::default(),
            export_data: false,
            write_summary: false,
        }
    }

    /// Add an input file
    pub fn with_input(mut self, label: SeriesLabel, path: impl Into<PathBuf>) -> Self {
        self.inputs.push(InputFile::new(label, path));
        self
    }

    /// Set the header row policy
    pub fn header_rows(mut self, header_rows: HeaderRows) -> Self {
        self.header_rows = header_rows;
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the output resolution in dpi
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.resolution = Resolution::with_dpi(dpi);
        self
    }

    /// Inputs using the historical file names for all three gauge variants
    pub fn with_default_inputs(mut self) -> Self {
        for label in SeriesLabel::ALL {
            self.inputs.push(InputFile::new(label, label.default_file_name()));
        }
        self
    }
}
