use std::path::Path;

use super::{LoadedFile, ValidationCheck, ValidationReport};
use super::{DIPOLE_COLUMNS, OBSERVABLE_COLUMNS, SPACING_TOLERANCE};
use crate::metadata::{HeaderMetadata, OMEGA_MARKER};
use crate::table::{HeaderRows, ResultTable};

/// Checks that only need one file. Returns the parsed file when it loaded.
pub(super) fn check_file(
    path: &Path,
    header_rows: HeaderRows,
    report: &mut ValidationReport,
) -> Option<LoadedFile> {
    let name = path.display().to_string();

    let table = match ResultTable::from_file(path, header_rows) {
        Ok(table) => {
            report.add_check(
                ValidationCheck::ok(format!(
                    "numeric block parses ({} rows x {} columns)",
                    table.rows(),
                    table.width()
                ))
                .in_file(&name),
            );
            table
        }
        Err(e) => {
            report.add_check(ValidationCheck::failed("numeric block parses", e.to_string()).in_file(name));
            return None;
        }
    };

    check_columns(&name, &table, report);
    check_spacing(&name, &table, report);

    let metadata = HeaderMetadata::from_table(&table);
    check_omega(&name, &metadata, report);

    Some(LoadedFile {
        name,
        table,
        metadata,
    })
}

fn check_columns(name: &str, table: &ResultTable, report: &mut ValidationReport) {
    let check = "column count";
    let width = table.width();
    let result = if width < DIPOLE_COLUMNS {
        ValidationCheck::failed(
            check,
            format!("{} columns, dipole plots need at least {}", width, DIPOLE_COLUMNS),
        )
    } else if width < OBSERVABLE_COLUMNS {
        ValidationCheck::warning(
            check,
            format!(
                "{} columns, energy and interaction plots need at least {}",
                width, OBSERVABLE_COLUMNS
            ),
        )
    } else {
        ValidationCheck::ok(check)
    };
    report.add_check(result.in_file(name));
}

fn check_spacing(name: &str, table: &ResultTable, report: &mut ValidationReport) {
    let check = "uniform time step";
    let result = match (table.step(), table.spacing_deviation()) {
        (None, _) => ValidationCheck::failed(check, "fewer than two rows, no step can be derived"),
        (Some(step), _) if !(step.is_finite() && step > 0.0) => {
            ValidationCheck::failed(check, format!("time step {} is not positive", step))
        }
        (Some(_), Some(deviation)) if deviation > SPACING_TOLERANCE => ValidationCheck::warning(
            check,
            format!("spacing deviates by up to {:.2e} (relative)", deviation),
        ),
        (Some(_), _) => ValidationCheck::ok(check),
    };
    report.add_check(result.in_file(name));
}

fn check_omega(name: &str, metadata: &HeaderMetadata, report: &mut ValidationReport) {
    let check = "characteristic frequency";
    let result = match metadata.omega_ev() {
        Some(ev) if ev.is_finite() && ev > 0.0 => ValidationCheck::ok(check),
        Some(ev) => ValidationCheck::warning(
            check,
            format!("{} is {} eV, normalized spectra keep the raw axis", OMEGA_MARKER, ev),
        ),
        None => ValidationCheck::warning(
            check,
            format!("no {} header line, normalized spectra keep the raw axis", OMEGA_MARKER),
        ),
    };
    report.add_check(result.in_file(name));
}
