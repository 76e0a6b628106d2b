use anyhow::Result;
use log::info;
use std::path::PathBuf;

use gaugeplot::table::HeaderRows;
use gaugeplot::validator::validate_result_files;

/// Validate that result files can be compared in one plot
pub fn run(files: Vec<PathBuf>, header_rows: HeaderRows) -> Result<()> {
    info!("gaugeplot Validator");
    info!("===================");
    for file in &files {
        info!("File: {}", file.display());
    }
    info!("Header rows: {}", header_rows);
    info!("");

    let report = validate_result_files(&files, header_rows);

    println!("{}", report.format_colored());

    // Exit with error code if validation failed
    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
