use super::{LoadedFile, ValidationCheck, ValidationReport, SPACING_TOLERANCE};

/// Checks that every file shares the first file's sampling grid.
pub(super) fn check_alignment(files: &[LoadedFile], report: &mut ValidationReport) {
    let Some((first, rest)) = files.split_first() else {
        return;
    };
    if rest.is_empty() {
        return;
    }

    let row_mismatches: Vec<String> = rest
        .iter()
        .filter(|f| f.table.rows() != first.table.rows())
        .map(|f| format!("{} has {} rows", f.name, f.table.rows()))
        .collect();
    if row_mismatches.is_empty() {
        report.add_check(ValidationCheck::ok("Row counts agree"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Row counts agree",
            format!(
                "{} has {} rows; {}",
                first.name,
                first.table.rows(),
                row_mismatches.join(", ")
            ),
        ));
    }

    let step_mismatches: Vec<String> = rest
        .iter()
        .filter(|f| !steps_match(first.table.step(), f.table.step()))
        .map(|f| format!("{} has step {:?}", f.name, f.table.step()))
        .collect();
    if step_mismatches.is_empty() {
        report.add_check(ValidationCheck::ok("Time steps agree"));
    } else {
        report.add_check(ValidationCheck::failed(
            "Time steps agree",
            format!(
                "{} has step {:?}; {}",
                first.name,
                first.table.step(),
                step_mismatches.join(", ")
            ),
        ));
    }

    let omegas: Vec<Option<f64>> = files.iter().map(|f| f.metadata.omega_ev()).collect();
    if omegas.windows(2).all(|w| w[0] == w[1]) {
        report.add_check(ValidationCheck::ok("Characteristic frequencies agree"));
    } else {
        // Each series is normalized by its own omega, so this is not fatal.
        report.add_check(ValidationCheck::warning(
            "Characteristic frequencies agree",
            format!("header values differ: {:?}", omegas),
        ));
    }
}

fn steps_match(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => (a - b).abs() <= SPACING_TOLERANCE * a.abs().max(b.abs()),
        (None, None) => true,
        _ => false,
    }
}
