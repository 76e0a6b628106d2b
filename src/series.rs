//! Gauge-variant series: a labeled result table together with its header
//! metadata.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

use crate::metadata::HeaderMetadata;
use crate::table::{HeaderRows, ResultTable, TableError};

/// Which gauge/method variant a result table belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SeriesLabel {
    /// Length gauge
    #[serde(rename = "length")]
    Length,
    /// Velocity gauge
    #[serde(rename = "velocity")]
    Velocity,
    /// Velocity gauge including the A² term
    #[serde(rename = "velocity_A^2", alias = "velocity_a2")]
    VelocityA2,
}

impl SeriesLabel {
    /// All labels in legend order
    pub const ALL: [SeriesLabel; 3] = [
        SeriesLabel::Length,
        SeriesLabel::Velocity,
        SeriesLabel::VelocityA2,
    ];

    /// Legend text
    pub fn label(&self) -> &'static str {
        match self {
            SeriesLabel::Length => "length",
            SeriesLabel::Velocity => "velocity",
            SeriesLabel::VelocityA2 => "velocity_A^2",
        }
    }

    /// Fixed curve color
    pub fn color(&self) -> RGBColor {
        match self {
            SeriesLabel::Length => RGBColor(31, 119, 180),
            SeriesLabel::Velocity => RGBColor(255, 127, 14),
            SeriesLabel::VelocityA2 => RGBColor(44, 160, 44),
        }
    }

    /// Result file name written by the propagation code for this variant
    pub fn default_file_name(&self) -> &'static str {
        match self {
            SeriesLabel::Length => "res_length.out",
            SeriesLabel::Velocity => "res_velocity.out",
            SeriesLabel::VelocityA2 => "res_velocity_A2.out",
        }
    }
}

impl fmt::Display for SeriesLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SeriesLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "length" | "len" => Ok(SeriesLabel::Length),
            "velocity" | "vel" => Ok(SeriesLabel::Velocity),
            "velocity_a^2" | "velocity_a2" | "velocity-a2" => Ok(SeriesLabel::VelocityA2),
            _ => Err(format!(
                "Unknown series label '{}'. Valid options: length, velocity, velocity_A^2",
                s
            )),
        }
    }
}

/// A loaded result table for one gauge variant.
#[derive(Debug, Clone)]
pub struct Series {
    /// Gauge variant
    pub label: SeriesLabel,
    /// Numeric data
    pub table: ResultTable,
    /// Header key/value pairs
    pub metadata: HeaderMetadata,
}

impl Series {
    /// Wrap an already parsed table
    pub fn new(label: SeriesLabel, table: ResultTable) -> Self {
        let metadata = HeaderMetadata::from_table(&table);
        Self {
            label,
            table,
            metadata,
        }
    }

    /// Load a result file
    pub fn load<P: AsRef<Path>>(
        label: SeriesLabel,
        path: P,
        header_rows: HeaderRows,
    ) -> Result<Self, TableError> {
        let table = ResultTable::from_file(path, header_rows)?;
        Ok(Self::new(label, table))
    }

    /// This series' characteristic frequency in atomic units, if recorded
    pub fn characteristic_omega(&self) -> Option<f64> {
        self.metadata.characteristic_omega()
    }
}
