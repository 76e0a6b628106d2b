//! # Result Table Module
//!
//! Loading of whitespace-delimited numeric result tables written by the
//! propagation code. A file consists of an optional block of header lines
//! (the control block echoed by the simulation plus a column caption)
//! followed by a rectangular block of floating-point values.
//!
//! Column 0 holds the independent variable (time). The remaining columns are
//! observables; see [`crate::config::Observable`] for the conventional layout.
//!
//! Tables are stored column-major so that a single observable can be handed
//! out as a contiguous slice.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the header block preceding the numeric data is located.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "HeaderRowsRepr", into = "HeaderRowsRepr")]
pub enum HeaderRows {
    /// Skip exactly this many lines before parsing
    Fixed(usize),
    /// Skip leading lines until the first fully numeric line
    #[default]
    Auto,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum HeaderRowsRepr {
    Count(usize),
    Word(String),
}

impl TryFrom<HeaderRowsRepr> for HeaderRows {
    type Error = String;

    fn try_from(repr: HeaderRowsRepr) -> Result<Self, Self::Error> {
        match repr {
            HeaderRowsRepr::Count(n) => Ok(HeaderRows::Fixed(n)),
            HeaderRowsRepr::Word(word) => word.parse(),
        }
    }
}

impl From<HeaderRows> for HeaderRowsRepr {
    fn from(rows: HeaderRows) -> Self {
        match rows {
            HeaderRows::Fixed(n) => HeaderRowsRepr::Count(n),
            HeaderRows::Auto => HeaderRowsRepr::Word("auto".to_string()),
        }
    }
}

impl fmt::Display for HeaderRows {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderRows::Fixed(n) => write!(f, "{}", n),
            HeaderRows::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for HeaderRows {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(HeaderRows::Auto);
        }
        s.parse::<usize>().map(HeaderRows::Fixed).map_err(|_| {
            format!(
                "Invalid header row count '{}'. Expected a non-negative integer or 'auto'",
                s
            )
        })
    }
}

/// What is wrong with a numeric block
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatIssue {
    /// A token in the numeric block is not a floating-point number
    #[error("token '{token}' is not a floating-point number")]
    NonNumeric {
        /// The offending token
        token: String,
    },

    /// A row has a different number of columns than the first row
    #[error("row has {found} columns, expected {expected}")]
    Ragged {
        /// Column count of the first numeric row
        expected: usize,
        /// Column count of this row
        found: usize,
    },

    /// No numeric rows remain after the header
    #[error("no numeric rows found")]
    Empty,

    /// A requested column does not exist
    #[error("column {column} requested but the table has {width} columns")]
    ColumnOutOfRange {
        /// Requested column index
        column: usize,
        /// Number of columns in the table
        width: usize,
    },
}

/// Malformed or non-rectangular numeric data. Always fatal for a run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}{}: {issue}", path.display(), line_suffix(*line))]
pub struct DataFormatError {
    /// Source of the data
    pub path: PathBuf,
    /// 1-based line number, when the problem is tied to one line
    pub line: Option<usize>,
    /// Description of the problem
    pub issue: FormatIssue,
}

fn line_suffix(line: Option<usize>) -> String {
    line.map(|l| format!(" (line {})", l)).unwrap_or_default()
}

impl DataFormatError {
    fn at(path: &Path, line: usize, issue: FormatIssue) -> Self {
        Self {
            path: path.to_path_buf(),
            line: Some(line),
            issue,
        }
    }

    fn whole(path: &Path, issue: FormatIssue) -> Self {
        Self {
            path: path.to_path_buf(),
            line: None,
            issue,
        }
    }
}

/// Errors that can occur while loading a result table
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a valid numeric table
    #[error("Data format error in {0}")]
    DataFormat(#[from] DataFormatError),
}

/// A rectangular table of simulation results.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    path: PathBuf,
    header: Vec<String>,
    comments: Vec<String>,
    columns: Vec<Vec<f64>>,
    rows: usize,
}

impl ResultTable {
    /// Read and parse a result file.
    pub fn from_file<P: AsRef<Path>>(path: P, header_rows: HeaderRows) -> Result<Self, TableError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(path, &text, header_rows)?)
    }

    /// Parse a result table from text. `path` is only used for provenance and
    /// error messages.
    pub fn parse<P: AsRef<Path>>(
        path: P,
        text: &str,
        header_rows: HeaderRows,
    ) -> Result<Self, DataFormatError> {
        let path = path.as_ref();
        let mut header = Vec::new();
        let mut comments = Vec::new();
        let mut columns: Vec<Vec<f64>> = Vec::new();
        let mut rows = 0usize;
        let mut in_header = true;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;

            if in_header {
                let still_header = match header_rows {
                    HeaderRows::Fixed(n) => idx < n,
                    HeaderRows::Auto => !is_numeric_row(line),
                };
                if still_header {
                    header.push(line.to_string());
                    continue;
                }
                in_header = false;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with('#') {
                comments.push(line.to_string());
                continue;
            }

            let mut found = 0usize;
            for (col, token) in trimmed.split_whitespace().enumerate() {
                let value = token.parse::<f64>().map_err(|_| {
                    DataFormatError::at(
                        path,
                        line_no,
                        FormatIssue::NonNumeric {
                            token: token.to_string(),
                        },
                    )
                })?;

                if rows == 0 {
                    columns.push(Vec::new());
                } else if col >= columns.len() {
                    return Err(DataFormatError::at(
                        path,
                        line_no,
                        FormatIssue::Ragged {
                            expected: columns.len(),
                            found: trimmed.split_whitespace().count(),
                        },
                    ));
                }
                columns[col].push(value);
                found += 1;
            }

            if found != columns.len() {
                return Err(DataFormatError::at(
                    path,
                    line_no,
                    FormatIssue::Ragged {
                        expected: columns.len(),
                        found,
                    },
                ));
            }
            rows += 1;
        }

        if rows == 0 {
            return Err(DataFormatError::whole(path, FormatIssue::Empty));
        }

        log::debug!(
            "Parsed {}: {} header lines, {} rows x {} columns",
            path.display(),
            header.len(),
            rows,
            columns.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            header,
            comments,
            columns,
            rows,
        })
    }

    /// Source path of the table
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lines preceding the numeric block
    pub fn header_lines(&self) -> &[String] {
        &self.header
    }

    /// `#` comment lines found after the header
    pub fn comment_lines(&self) -> &[String] {
        &self.comments
    }

    /// Every non-data line of the file in file order: header, then comments
    pub fn text_lines(&self) -> impl Iterator<Item = &str> {
        self.header
            .iter()
            .chain(&self.comments)
            .map(String::as_str)
    }

    /// Number of data rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// The independent-variable column (column 0)
    pub fn axis(&self) -> &[f64] {
        &self.columns[0]
    }

    /// A column by index
    pub fn column(&self, index: usize) -> Result<&[f64], DataFormatError> {
        self.columns.get(index).map(Vec::as_slice).ok_or_else(|| {
            DataFormatError::whole(
                &self.path,
                FormatIssue::ColumnOutOfRange {
                    column: index,
                    width: self.columns.len(),
                },
            )
        })
    }

    /// Sample spacing taken from the first two rows. The table is assumed to
    /// be uniformly sampled.
    pub fn step(&self) -> Option<f64> {
        let axis = self.axis();
        if axis.len() < 2 {
            return None;
        }
        Some(axis[1] - axis[0])
    }

    /// Largest relative deviation of any row-to-row spacing from [`step`](Self::step).
    pub fn spacing_deviation(&self) -> Option<f64> {
        let step = self.step()?;
        if step == 0.0 {
            return None;
        }
        let deviation = self
            .axis()
            .windows(2)
            .map(|w| ((w[1] - w[0]) - step).abs() / step.abs())
            .fold(0.0, f64::max);
        Some(deviation)
    }
}

fn is_numeric_row(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    trimmed
        .split_whitespace()
        .all(|token| token.parse::<f64>().is_ok())
}
