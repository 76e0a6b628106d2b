use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use gaugeplot::config::{Observable, PlotterConfig};
use gaugeplot::pipeline::{RenderPlan, SeriesComparisonPlotter, SpectralOptions};
use gaugeplot::series::SeriesLabel;

use super::config::Config;
use super::{PlotArgs, Preset};

/// Settings after merging preset, config file and flags.
#[derive(Debug)]
struct Resolved {
    preset: Preset,
    config: PlotterConfig,
    plan: RenderPlan,
}

fn resolve(args: PlotArgs, file: Config) -> Resolved {
    let preset = args
        .preset
        .map(Preset::from)
        .or(file.plot.preset)
        .unwrap_or_default();

    let header_rows = args
        .header_rows
        .or(file.plot.header_rows)
        .unwrap_or_else(|| preset.header_rows());
    let dpi = args.dpi.or(file.plot.dpi).unwrap_or_else(|| preset.dpi());
    let output_dir = args
        .output_dir
        .or(file.plot.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));

    let mut config = PlotterConfig::new(args.run_name)
        .header_rows(header_rows)
        .output_dir(output_dir)
        .dpi(dpi);
    config.export_data = args.export_data || file.plot.export_data.unwrap_or(false);
    config.write_summary = args.summary || file.plot.summary.unwrap_or(false);

    let flags = [args.length, args.velocity, args.velocity_a2];
    for (label, flag) in SeriesLabel::ALL.into_iter().zip(flags) {
        let path = flag
            .or_else(|| file.inputs.get(label).cloned())
            .unwrap_or_else(|| PathBuf::from(label.default_file_name()));
        config = config.with_input(label, path);
    }

    let normalize_flag = match (args.normalize_omega, args.no_normalize_omega) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    };
    let options = SpectralOptions {
        normalize_by_omega: normalize_flag
            .or(file.plot.normalize_omega)
            .unwrap_or_else(|| preset.normalize_omega()),
        angular: args.angular || file.plot.angular.unwrap_or(false),
    };
    let column = file.spectral.column.unwrap_or_else(|| Observable::Dipole.column());
    let exponents = file
        .spectral
        .exponents
        .unwrap_or_else(|| preset.exponents().to_vec());
    let plan = preset.plan_with_spectra(column, &exponents, options);

    Resolved {
        preset,
        config,
        plan,
    }
}

/// Render the plots of one run
pub fn run(args: PlotArgs) -> Result<()> {
    let file = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let Resolved {
        preset,
        config,
        plan,
    } = resolve(args, file);

    info!("gaugeplot - {}", config.run_name);
    info!("Preset: {}", preset);
    for input in &config.inputs {
        info!("  {:<13} {}", input.label.label(), input.path.display());
    }
    info!("Header rows: {}", config.header_rows);
    info!("Resolution: {} dpi", config.resolution.dpi);
    info!("Output directory: {}", config.output_dir.display());

    let plotter = SeriesComparisonPlotter::load(config).context("Failed to load result files")?;
    let summary = plotter
        .run(&plan)
        .with_context(|| format!("Failed to render plots for '{}'", plotter.config().run_name))?;

    info!("Rendered {} images", summary.outputs.len());
    for output in &summary.outputs {
        println!("{}", output.path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use gaugeplot::table::HeaderRows;

    fn args(extra: &[&str]) -> PlotArgs {
        let mut argv = vec!["gaugeplot", "plot", "h2"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Plot(args) => args,
            _ => panic!("expected plot command"),
        }
    }

    #[test]
    fn test_defaults_come_from_preset() {
        let resolved = resolve(args(&["--preset", "dipole"]), Config::default());
        assert_eq!(resolved.config.header_rows, HeaderRows::Fixed(17));
        assert_eq!(resolved.config.resolution.dpi, 100);
        assert_eq!(resolved.config.inputs[1].path, PathBuf::from("res_velocity.out"));
        assert_eq!(resolved.plan.overlays[0].output_name, "res.png");
        assert!(resolved.plan.spectra.is_empty());
    }

    #[test]
    fn test_file_overrides_preset_and_flags_override_file() {
        let file = Config::from_str(
            r#"
            [plot]
            preset = "spectral"
            dpi = 150
            header_rows = 21

            [inputs]
            velocity = "from_file.out"

            [spectral]
            exponents = [2]
            "#,
        )
        .unwrap();
        let resolved = resolve(args(&["--dpi", "300", "--velocity", "flag.out"]), file);

        assert_eq!(resolved.preset, Preset::Spectral);
        assert_eq!(resolved.config.resolution.dpi, 300);
        assert_eq!(resolved.config.header_rows, HeaderRows::Fixed(21));
        assert_eq!(resolved.config.inputs[1].path, PathBuf::from("flag.out"));
        assert_eq!(resolved.plan.spectra.len(), 1);
        assert_eq!(resolved.plan.spectra[0].output_name, "fft_w2.png");
        assert!(resolved.plan.spectra[0].options.normalize_by_omega);
    }

    #[test]
    fn test_normalization_flags() {
        let spectral = || Config::from_str("[plot]\npreset = \"spectral\"\n").unwrap();
        let off = resolve(args(&["--no-normalize-omega"]), spectral());
        assert!(off.plan.spectra.iter().all(|j| !j.options.normalize_by_omega));

        let file_off = Config::from_str("[plot]\nnormalize_omega = false\n").unwrap();
        let on = resolve(args(&["--preset", "spectral", "--normalize-omega"]), file_off);
        assert!(on.plan.spectra.iter().all(|j| j.options.normalize_by_omega));

        let argv = ["gaugeplot", "plot", "h2", "--normalize-omega", "--no-normalize-omega"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
