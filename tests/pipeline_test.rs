//! Integration tests for the comparison pipeline
//!
//! These tests load result files from disk and check the data that would be
//! drawn. Rasterization needs a system font; the render tests skip without one.

use gaugeplot::config::{Observable, PlotterConfig};
use gaugeplot::metadata::EV_TO_AU;
use gaugeplot::pipeline::{
    PlotterError, RenderPlan, SeriesComparisonPlotter, SpectralJob, SpectralOptions,
};
use gaugeplot::plot::{AxisScale, PlotError};
use gaugeplot::series::SeriesLabel;
use gaugeplot::table::{FormatIssue, HeaderRows, TableError};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const ROWS: usize = 64;
const DT: f64 = 0.2;

/// Write a result file with the 17-line control block the simulation emits.
fn write_result(dir: &Path, name: &str, omega_ev: Option<f64>, amplitude: f64) -> PathBuf {
    let mut text = String::new();
    text.push_str("============================================================\n");
    text.push_str("JOB_NAME                        h2_sto3g\n");
    text.push_str("============================================================\n");
    text.push_str("GAUGE                           length\n");
    text.push_str("REPRESENTATION                  spherical\n");
    text.push_str("OPT_INTENSITY                   1.00000e+12\n");
    text.push_str("OPT_FIELD_DIRECTION             0.0 0.0 1.0\n");
    match omega_ev {
        Some(ev) => text.push_str(&format!("OPT_OMEGA_EV                    {}\n", ev)),
        None => text.push_str("OPT_PHASE                       0.0\n"),
    }
    text.push_str("OPT_CARRIER_ENVELOPE            0.0\n");
    text.push_str("OPT_CYCLES                      4\n");
    text.push_str(&format!("DT                              {}\n", DT / 10.0));
    text.push_str("MAX_T                           12.8\n");
    text.push_str(&format!("REGISTER_DIPOLE_DT              {}\n", DT));
    text.push_str("============================================================\n");
    text.push_str("\n");
    text.push_str("  time   dx   dy   dz   norm   energy   hint\n");
    text.push_str("============================================================\n");

    for i in 0..ROWS {
        let t = i as f64 * DT;
        let dipole = amplitude * (0.9 * t).sin();
        text.push_str(&format!(
            "{:.6} 0.0 0.0 {:.10e} 1.0 {:.8} {:.8e}\n",
            t,
            dipole,
            -1.137 + 1e-3 * t,
            1e-4 * t
        ));
    }

    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

fn config_in(dir: &Path, omegas: [Option<f64>; 3]) -> PlotterConfig {
    let mut config = PlotterConfig::new("h2 sto-3g")
        .header_rows(HeaderRows::Fixed(17))
        .output_dir(dir.join("plots"));
    for (i, label) in SeriesLabel::ALL.into_iter().enumerate() {
        let path = write_result(dir, label.default_file_name(), omegas[i], 1.0 + i as f64);
        config = config.with_input(label, path);
    }
    config
}

#[test]
fn test_load_fixed_and_auto_headers_agree() {
    let dir = tempdir().unwrap();
    let config = config_in(dir.path(), [Some(1.5); 3]);
    let fixed = SeriesComparisonPlotter::load(config.clone()).unwrap();
    let auto = SeriesComparisonPlotter::load(config.header_rows(HeaderRows::Auto)).unwrap();

    for (a, b) in fixed.series().iter().zip(auto.series()) {
        assert_eq!(a.table.rows(), ROWS);
        assert_eq!(a.table.width(), 7);
        assert_eq!(a.table.axis(), b.table.axis());
        assert_eq!(a.table.column(3).unwrap(), b.table.column(3).unwrap());
    }
    assert_eq!(fixed.series()[0].metadata.run_parameters().cycles, Some(4.0));
}

#[test]
fn test_overlay_is_deterministic() {
    let dir = tempdir().unwrap();
    let plotter = SeriesComparisonPlotter::load(config_in(dir.path(), [Some(1.5); 3])).unwrap();

    let first = plotter.overlay_spec(3, "dip.png", AxisScale::Linear).unwrap();
    let second = plotter.overlay_spec(3, "dip.png", AxisScale::Linear).unwrap();
    assert_eq!(first, second);

    let labels: Vec<&str> = first.curves.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["length", "velocity", "velocity_A^2"]);
    assert_eq!(first.curves[0].color, SeriesLabel::Length.color());
    assert_eq!(first.output, dir.path().join("plots").join("dip.png"));
}

#[test]
fn test_normalization_uses_each_series_omega() {
    let dir = tempdir().unwrap();
    let plotter =
        SeriesComparisonPlotter::load(config_in(dir.path(), [Some(1.0), Some(2.0), None])).unwrap();

    let raw = plotter.spectral_transform(3, SpectralOptions::default()).unwrap();
    let normalized = plotter
        .spectral_transform(3, SpectralOptions::normalized())
        .unwrap();

    let bin = 5;
    let f = raw[0].1.frequency[bin];
    assert!((normalized[0].1.frequency[bin] - f / (1.0 * EV_TO_AU)).abs() < 1e-9);
    assert!((normalized[1].1.frequency[bin] - f / (2.0 * EV_TO_AU)).abs() < 1e-9);
    // missing omega keeps the unscaled axis
    assert_eq!(normalized[2].1.frequency, raw[2].1.frequency);
}

#[test]
fn test_frequency_axis_spans_to_nyquist() {
    let dir = tempdir().unwrap();
    let plotter = SeriesComparisonPlotter::load(config_in(dir.path(), [Some(1.5); 3])).unwrap();
    let spectra = plotter.spectral_transform(3, SpectralOptions::default()).unwrap();

    for (_, spectrum) in &spectra {
        assert_eq!(spectrum.len(), ROWS / 2 + 1);
        assert_eq!(spectrum.frequency[0], 0.0);
        let nyquist = 1.0 / (2.0 * DT);
        assert!((spectrum.frequency[ROWS / 2] - nyquist).abs() < 1e-9);
    }
}

#[test]
fn test_malformed_input_writes_nothing() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path(), [Some(1.5); 3]).header_rows(HeaderRows::Auto);
    let broken = dir.path().join("broken.out");
    fs::write(&broken, "0.0 0 0 1.0\n0.2 0 0 abc\n").unwrap();
    config.inputs[1].path = broken;
    let out = config.output_dir.clone();

    let err = SeriesComparisonPlotter::load(config).unwrap_err();
    match err {
        PlotterError::Table(TableError::DataFormat(e)) => {
            assert_eq!(e.line, Some(2));
            assert!(matches!(e.issue, FormatIssue::NonNumeric { .. }));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.exists());
}

#[test]
fn test_invalid_job_aborts_before_rendering() {
    let dir = tempdir().unwrap();
    let plotter = SeriesComparisonPlotter::load(config_in(dir.path(), [Some(1.5); 3])).unwrap();
    let plan = RenderPlan::new()
        .observables(&Observable::ALL)
        .overlay(12, "missing.png");

    let err = plotter.run(&plan).unwrap_err();
    assert!(matches!(err, PlotterError::DataFormat(_)));
    assert!(!plotter.config().output_dir.exists());

    let odd = RenderPlan {
        overlays: Vec::new(),
        spectra: vec![SpectralJob::new(3, 3, SpectralOptions::default())],
    };
    assert!(matches!(
        plotter.run(&odd).unwrap_err(),
        PlotterError::Spectrum { label: SeriesLabel::Length, .. }
    ));
}

#[test]
fn test_missing_input_names_path() {
    let dir = tempdir().unwrap();
    let config = PlotterConfig::new("run").with_input(SeriesLabel::Length, dir.path().join("nope.out"));
    let err = SeriesComparisonPlotter::load(config).unwrap_err();
    assert!(err.to_string().contains("nope.out"));
}

#[test]
fn test_summary_for_empty_plan() {
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path(), [Some(1.5), None, Some(1.5)]);
    config.write_summary = true;
    let plotter = SeriesComparisonPlotter::load(config).unwrap();

    let summary = plotter.run(&RenderPlan::new()).unwrap();
    assert!(summary.outputs.is_empty());
    assert_eq!(summary.inputs.len(), 3);
    assert_eq!(summary.inputs[0].rows, ROWS);
    assert_eq!(summary.inputs[1].omega_ev, None);

    let written = fs::read_to_string(dir.path().join("plots").join("summary.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["run_name"], "h2 sto-3g");
    assert_eq!(json["header_rows"], 17);
    assert_eq!(json["inputs"][2]["label"], "velocity_A^2");
    assert_eq!(json["inputs"][0]["omega_ev"], 1.5);
}

#[test]
fn test_export_spectral_data() {
    let dir = tempdir().unwrap();
    let plotter = SeriesComparisonPlotter::load(config_in(dir.path(), [Some(1.5); 3])).unwrap();
    let spec = plotter
        .spectral_overlay_spec(&SpectralJob::new(3, 2, SpectralOptions::normalized()))
        .unwrap();
    fs::create_dir_all(&plotter.config().output_dir).unwrap();

    let path = gaugeplot::export::export_plot_data(&spec).unwrap();
    assert_eq!(path.file_name().unwrap(), "fft_w2.tsv");

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(&path)
        .unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, vec!["series", "x", "y"]);
    let rows = reader.records().count();
    assert_eq!(rows, 3 * (ROWS / 2 + 1));
}

#[test]
fn test_undrawable_spectrum_writes_nothing() {
    let dir = tempdir().unwrap();
    let plotter = SeriesComparisonPlotter::load(config_in(dir.path(), [Some(1.5); 3])).unwrap();
    // column 1 is identically zero, so its power spectrum has no point on a log axis
    let plan = RenderPlan {
        overlays: RenderPlan::new().overlay(3, "dip.png").overlays,
        spectra: vec![SpectralJob::new(1, 0, SpectralOptions::default())],
    };

    let err = plotter.run(&plan).unwrap_err();
    match err {
        PlotterError::Plot(PlotError::NoData { path }) => {
            assert_eq!(path.file_name().unwrap(), "fft.png")
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!plotter.config().output_dir.exists());
}

/// The renderer needs a sans-serif system font; hosts without one skip.
fn fonts_available() -> bool {
    use plotters::style::IntoFont;
    ("sans-serif", 12.0).into_font().box_size("0").is_ok()
}

#[test]
fn test_render_spectral_run() {
    if !fonts_available() {
        eprintln!("skipping: no sans-serif font available");
        return;
    }
    let dir = tempdir().unwrap();
    let mut config = config_in(dir.path(), [Some(1.5); 3]);
    config.export_data = true;
    let plotter = SeriesComparisonPlotter::load(config.dpi(100)).unwrap();
    let plan = RenderPlan::new()
        .observables(&Observable::ALL)
        .spectra(3, &[0, 2, 4], SpectralOptions::normalized());

    let summary = plotter.run(&plan).unwrap();
    assert_eq!(summary.outputs.len(), 7);
    for output in &summary.outputs {
        let image = image::open(&output.path).unwrap().to_rgb8();
        assert_eq!(image.dimensions(), (640, 480));
        // fresh white surface: the corner is background
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
        assert!(output.data.as_ref().unwrap().exists());
    }

    // only images and their data files, no staged leftovers
    let names: Vec<String> = fs::read_dir(&plotter.config().output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 14);
    assert!(names.iter().all(|n| !n.starts_with(".gaugeplot-")));
}

#[test]
fn test_single_overlay_render() {
    if !fonts_available() {
        eprintln!("skipping: no sans-serif font available");
        return;
    }
    let dir = tempdir().unwrap();
    let plotter = SeriesComparisonPlotter::load(config_in(dir.path(), [Some(1.5); 3])).unwrap();

    let dip = plotter.plot_overlay(3, "dip.png", AxisScale::Linear).unwrap();
    let fft = plotter
        .plot_spectral_overlay(&SpectralJob::new(3, 2, SpectralOptions::normalized()))
        .unwrap();
    assert!(dip.exists());
    assert_eq!(fft.file_name().unwrap(), "fft_w2.png");
    assert_eq!(image::open(&fft).unwrap().width(), 640);
}
