//! # Header Metadata Module
//!
//! The propagation code echoes its control block at the top of every result
//! file:
//!
//! ```text
//! ============================================================================
//! JOB_NAME                        h2_sto3g
//! ============================================================================
//! GAUGE                           length
//! ...
//! OPT_OMEGA_EV                    1.55000e+00
//! ...
//! ```
//!
//! This module turns those lines into a key/value mapping. The only value the
//! plotting pipeline depends on is the characteristic laser frequency
//! (`OPT_OMEGA_EV`), which rescales spectral frequency axes. The remaining
//! keys are exposed through [`RunParameters`] for reporting.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::table::ResultTable;

/// Conversion factor from electron-volts to Hartree atomic units.
pub const EV_TO_AU: f64 = 0.03674930495;

/// Header token carrying the characteristic angular frequency in eV.
pub const OMEGA_MARKER: &str = "OPT_OMEGA_EV";

/// Key/value pairs embedded in the header block of a result file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderMetadata {
    lines: Vec<String>,
    entries: BTreeMap<String, String>,
}

impl HeaderMetadata {
    /// Build from raw header lines.
    ///
    /// Lines of the form `KEY value...` (optionally prefixed by `#`) become
    /// entries; anything else is retained only for marker scans.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut metadata = Self::default();
        for line in lines {
            let line = line.as_ref();
            metadata.lines.push(line.to_string());

            let body = line.trim_start().trim_start_matches('#').trim();
            let mut tokens = body.split_whitespace();
            let Some(key) = tokens.next() else {
                continue;
            };
            let value: Vec<&str> = tokens.collect();
            if is_key(key) && !value.is_empty() {
                metadata
                    .entries
                    .insert(key.to_string(), value.join(" "));
            }
        }
        metadata
    }

    /// Metadata from every non-data line of a loaded table, including `#`
    /// comments inside the numeric block
    pub fn from_table(table: &ResultTable) -> Self {
        Self::from_lines(table.text_lines())
    }

    /// Raw value text for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Numeric value for a key (the last token of its value)
    pub fn scalar(&self, key: &str) -> Option<f64> {
        self.get(key)?.split_whitespace().last()?.parse().ok()
    }

    /// Iterate over all entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of key/value entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no key/value entries were found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Scan the header lines for one containing `marker` as a token and
    /// parse the last token of that line.
    pub fn marker_value(&self, marker: &str) -> Option<f64> {
        let line = self
            .lines
            .iter()
            .find(|line| line.split_whitespace().any(|token| token == marker))?;
        let last = line.split_whitespace().last()?;
        match last.parse::<f64>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("{} header value '{}' is not a number", marker, last);
                None
            }
        }
    }

    /// Characteristic frequency in eV, if present
    pub fn omega_ev(&self) -> Option<f64> {
        self.marker_value(OMEGA_MARKER)
    }

    /// Characteristic frequency in atomic units, if present
    pub fn characteristic_omega(&self) -> Option<f64> {
        self.omega_ev().map(|ev| ev * EV_TO_AU)
    }

    /// Typed view of the known control keys
    pub fn run_parameters(&self) -> RunParameters {
        RunParameters {
            job_name: self.get("JOB_NAME").map(str::to_string),
            gauge: self.get("GAUGE").map(str::to_string),
            representation: self.get("REPRESENTATION").map(str::to_string),
            intensity: self.scalar("OPT_INTENSITY"),
            field_direction: self.get("OPT_FIELD_DIRECTION").and_then(parse_vector),
            omega_ev: self.omega_ev(),
            carrier_envelope_phase: self.scalar("OPT_CARRIER_ENVELOPE"),
            cycles: self.scalar("OPT_CYCLES"),
            dt: self.scalar("DT"),
            max_t: self.scalar("MAX_T"),
            register_dt: self.scalar("REGISTER_DIPOLE_DT"),
        }
    }
}

/// Control parameters of the simulation that produced a result file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunParameters {
    /// Job name
    pub job_name: Option<String>,
    /// Gauge used for the light-matter coupling
    pub gauge: Option<String>,
    /// Basis representation (cartesian/spherical)
    pub representation: Option<String>,
    /// Field intensity in W/cm^2
    pub intensity: Option<f64>,
    /// Field polarization direction
    pub field_direction: Option<[f64; 3]>,
    /// Photon energy in eV
    pub omega_ev: Option<f64>,
    /// Carrier-envelope phase
    pub carrier_envelope_phase: Option<f64>,
    /// Number of optical cycles in the pulse
    pub cycles: Option<f64>,
    /// Propagation time step (a.u.)
    pub dt: Option<f64>,
    /// Total propagation time (a.u.)
    pub max_t: Option<f64>,
    /// Interval between registered samples (a.u.)
    pub register_dt: Option<f64>,
}

impl RunParameters {
    /// Photon energy converted to atomic units
    pub fn omega_au(&self) -> Option<f64> {
        self.omega_ev.map(|ev| ev * EV_TO_AU)
    }

    /// Pulse duration `cycles * 2π / ω` in atomic units
    pub fn pulse_duration(&self) -> Option<f64> {
        let omega = self.omega_au()?;
        if omega <= 0.0 {
            return None;
        }
        Some(self.cycles? * 2.0 * std::f64::consts::PI / omega)
    }
}

fn is_key(token: &str) -> bool {
    token.chars().any(|c| c.is_ascii_uppercase())
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn parse_vector(text: &str) -> Option<[f64; 3]> {
    let values: Vec<f64> = text
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .ok()?;
    match values.as_slice() {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::HeaderRows;

    const CONTROL_BLOCK: &[&str] = &[
        "============================================================================",
        "JOB_NAME                        h2_sto3g",
        "============================================================================",
        "GAUGE                           velocity",
        "REPRESENTATION                  cartesian",
        "============================================================================",
        "OPT_INTENSITY                   1.00000e+14",
        "OPT_FIELD_DIRECTION             0.00000e+00 0.00000e+00 1.00000e+00",
        "OPT_OMEGA_EV                    1.55000e+00",
        "OPT_CARRIER_ENVELOPE            0.00000e+00",
        "OPT_CYCLES                      4.00000e+00",
        "============================================================================",
        "DT                              1.00000e-02",
        "MAX_T                           1.00000e+03",
        "REGISTER_DIPOLE_DT              1.00000e+00",
        "============================================================================",
        "         time             dipx          dipy          dipz          norm",
    ];

    #[test]
    fn test_omega_marker_comment_line() {
        let metadata = HeaderMetadata::from_lines(["# OPT_OMEGA_EV 1.5"]);
        assert_eq!(metadata.omega_ev(), Some(1.5));
        assert_eq!(metadata.characteristic_omega(), Some(1.5 * 0.03674930495));
    }

    #[test]
    fn test_marker_found_without_header_block() {
        let text = "# OPT_OMEGA_EV 1.5\n0 0 0 1\n1 0 0 2\n";
        for rows in [HeaderRows::Fixed(0), HeaderRows::Auto] {
            let table = ResultTable::parse("r", text, rows).unwrap();
            let metadata = HeaderMetadata::from_table(&table);
            assert_eq!(metadata.omega_ev(), Some(1.5), "{rows}");
            assert_eq!(metadata.characteristic_omega(), Some(1.5 * EV_TO_AU));
        }
    }

    #[test]
    fn test_missing_marker_is_none() {
        let metadata = HeaderMetadata::from_lines(["JOB_NAME test", "time dipx"]);
        assert_eq!(metadata.omega_ev(), None);
        assert_eq!(metadata.characteristic_omega(), None);
    }

    #[test]
    fn test_unparseable_marker_is_none() {
        let metadata = HeaderMetadata::from_lines(["OPT_OMEGA_EV unknown"]);
        assert_eq!(metadata.omega_ev(), None);
    }

    #[test]
    fn test_marker_must_be_whole_token() {
        let metadata = HeaderMetadata::from_lines(["XOPT_OMEGA_EV 2.0"]);
        assert_eq!(metadata.omega_ev(), None);
    }

    #[test]
    fn test_control_block_entries() {
        let metadata = HeaderMetadata::from_lines(CONTROL_BLOCK.iter());
        assert_eq!(metadata.get("JOB_NAME"), Some("h2_sto3g"));
        assert_eq!(metadata.scalar("DT"), Some(0.01));
        // separator and caption lines are not entries
        assert_eq!(metadata.len(), 11);

        let params = metadata.run_parameters();
        assert_eq!(params.gauge.as_deref(), Some("velocity"));
        assert_eq!(params.field_direction, Some([0.0, 0.0, 1.0]));
        assert_eq!(params.omega_ev, Some(1.55));
        assert_eq!(params.cycles, Some(4.0));
        assert_eq!(params.register_dt, Some(1.0));
    }

    #[test]
    fn test_pulse_duration() {
        let params = HeaderMetadata::from_lines(CONTROL_BLOCK.iter()).run_parameters();
        let omega = 1.55 * EV_TO_AU;
        let expected = 4.0 * 2.0 * std::f64::consts::PI / omega;
        assert!((params.pulse_duration().unwrap() - expected).abs() < 1e-9);
    }
}
