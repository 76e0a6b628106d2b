//! Plot presets reproducing the historical plotting variants.
//!
//! A preset fixes the jobs of a run together with sensible defaults for the
//! header layout and resolution. Every default can still be overridden from
//! the config file or the command line.

use std::fmt;

use serde::Deserialize;

use gaugeplot::config::Observable;
use gaugeplot::pipeline::{OverlayJob, RenderPlan, SpectralOptions};
use gaugeplot::plot::{AxisScale, Resolution};
use gaugeplot::table::HeaderRows;

/// Named sets of plots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Dipole moment only.
    ///
    /// - Output: `res.png`
    /// - Header rows: 17
    /// - Resolution: 100 dpi
    Dipole,

    /// Every observable column (default).
    ///
    /// - Output: `dip.png`, `norm.png`, `energy.png`, `Hint.png`
    /// - Header rows: autodetected
    /// - Resolution: 400 dpi
    #[default]
    Observables,

    /// Observables plus weighted dipole spectra.
    ///
    /// - Output: observables plus `fft.png`, `fft_w2.png`, `fft_w4.png`
    /// - Header rows: autodetected
    /// - Resolution: 400 dpi
    /// - Frequency axis normalized by omega
    Spectral,
}

impl Preset {
    /// Header row policy for this preset.
    pub fn header_rows(&self) -> HeaderRows {
        match self {
            Preset::Dipole => HeaderRows::Fixed(17),
            Preset::Observables | Preset::Spectral => HeaderRows::Auto,
        }
    }

    /// Output resolution for this preset.
    pub fn dpi(&self) -> u32 {
        match self {
            Preset::Dipole => Resolution::DEFAULT_DPI,
            Preset::Observables | Preset::Spectral => 400,
        }
    }

    /// Whether spectra are normalized by omega unless overridden.
    pub fn normalize_omega(&self) -> bool {
        matches!(self, Preset::Spectral)
    }

    /// Frequency exponents of the spectral plots.
    pub fn exponents(&self) -> &'static [u32] {
        match self {
            Preset::Spectral => &[0, 2, 4],
            Preset::Dipole | Preset::Observables => &[],
        }
    }

    /// Column overlays of this preset.
    pub fn plan(&self) -> RenderPlan {
        match self {
            Preset::Dipole => RenderPlan {
                overlays: vec![OverlayJob {
                    column: Observable::Dipole.column(),
                    output_name: "res.png".to_string(),
                    scale: AxisScale::Linear,
                    y_desc: Observable::Dipole.description().to_string(),
                }],
                spectra: Vec::new(),
            },
            Preset::Observables | Preset::Spectral => RenderPlan::new().observables(&Observable::ALL),
        }
    }

    /// Full plan with spectra of `column` at the given exponents.
    pub fn plan_with_spectra(&self, column: usize, exponents: &[u32], options: SpectralOptions) -> RenderPlan {
        self.plan().spectra(column, exponents, options)
    }

}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Dipole => write!(f, "dipole"),
            Preset::Observables => write!(f, "observables"),
            Preset::Spectral => write!(f, "spectral"),
        }
    }
}
