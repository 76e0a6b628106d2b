use anyhow::{Context, Result};
use std::path::PathBuf;

use gaugeplot::metadata::HeaderMetadata;
use gaugeplot::table::{HeaderRows, ResultTable};

const PREVIEW_LEN: usize = 60;

/// Display information about a result file
pub fn run(file: PathBuf, header_rows: HeaderRows) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let table = ResultTable::from_file(&file, header_rows).context("Failed to read result file")?;
    let metadata = HeaderMetadata::from_table(&table);

    println!("Result File Information");
    println!("=======================");
    println!("File: {}", file.display());
    println!();

    println!("Table:");
    println!("  Header lines: {}", table.header_lines().len());
    println!("  Rows: {}", table.rows());
    println!("  Columns: {}", table.width());
    match table.step() {
        Some(step) => println!("  Time step: {}", step),
        None => println!("  Time step: <undefined>"),
    }
    if let Some(deviation) = table.spacing_deviation() {
        println!("  Max spacing deviation: {:.3e}", deviation);
    }
    if let (Some(first), Some(last)) = (table.axis().first(), table.axis().last()) {
        println!("  Time range: {} .. {}", first, last);
    }
    println!();

    if !metadata.is_empty() {
        println!("Header Keys:");
        for (key, value) in metadata.iter() {
            let preview = if value.chars().count() > PREVIEW_LEN {
                let head: String = value.chars().take(PREVIEW_LEN).collect();
                format!("{}... ({} chars)", head, value.chars().count())
            } else {
                value.to_string()
            };
            println!("  {}: {}", key, preview);
        }
        println!();
    }

    let params = metadata.run_parameters();
    println!("Run Parameters:");
    print_field("Job name", params.job_name.as_deref());
    print_field("Gauge", params.gauge.as_deref());
    print_field("Representation", params.representation.as_deref());
    print_number("Intensity (W/cm^2)", params.intensity);
    match params.field_direction {
        Some([x, y, z]) => println!("  Field direction: ({}, {}, {})", x, y, z),
        None => println!("  Field direction: <not set>"),
    }
    print_number("Omega (eV)", params.omega_ev);
    print_number("Omega (a.u.)", params.omega_au());
    print_number("Carrier-envelope phase", params.carrier_envelope_phase);
    print_number("Cycles", params.cycles);
    print_number("Pulse duration (a.u.)", params.pulse_duration());
    print_number("Propagation dt (a.u.)", params.dt);
    print_number("Max time (a.u.)", params.max_t);
    print_number("Register dt (a.u.)", params.register_dt);

    Ok(())
}

fn print_field(name: &str, value: Option<&str>) {
    println!("  {}: {}", name, value.unwrap_or("<not set>"));
}

fn print_number(name: &str, value: Option<f64>) {
    match value {
        Some(v) => println!("  {}: {}", name, v),
        None => println!("  {}: <not set>", name),
    }
}
