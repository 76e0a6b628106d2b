//! Integration tests for result file validation

use gaugeplot::table::HeaderRows;
use gaugeplot::validator::{validate_result_files, CheckScope, CheckStatus};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write(dir: &Path, name: &str, header: &str, rows: usize, dt: f64) -> PathBuf {
    let mut text = String::from(header);
    for i in 0..rows {
        text.push_str(&format!("{} 0 0 {} 1 -1.1 0\n", i as f64 * dt, (i as f64).sin()));
    }
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn test_aligned_files_pass() {
    let dir = tempdir().unwrap();
    let header = "JOB_NAME h2\nOPT_OMEGA_EV 1.55\n";
    let files = vec![
        write(dir.path(), "res_length.out", header, 32, 0.1),
        write(dir.path(), "res_velocity.out", header, 32, 0.1),
        write(dir.path(), "res_velocity_A2.out", header, 32, 0.1),
    ];

    let report = validate_result_files(&files, HeaderRows::Auto);
    assert!(!report.has_failures(), "{}", report);
    assert!(!report.has_warnings(), "{}", report);
    // 4 per file plus 3 alignment checks
    assert_eq!(report.checks.len(), 15);
    assert_eq!(report.files.len(), 3);
    for file in &report.files {
        assert_eq!(report.file_checks(file).count(), 4);
    }
    assert_eq!(report.cross_file_checks().count(), 3);
}

#[test]
fn test_misaligned_files_fail() {
    let dir = tempdir().unwrap();
    let header = "OPT_OMEGA_EV 1.55\n";
    let files = vec![
        write(dir.path(), "a.out", header, 32, 0.1),
        write(dir.path(), "b.out", header, 16, 0.2),
    ];

    let report = validate_result_files(&files, HeaderRows::Auto);
    assert_eq!(report.failure_count(), 2);
    let output = report.to_string();
    assert!(output.contains("Row counts agree - FAILED"));
    assert!(output.contains("Validation FAILED"));
}

#[test]
fn test_malformed_file_skips_alignment() {
    let dir = tempdir().unwrap();
    let good = write(dir.path(), "good.out", "OPT_OMEGA_EV 1.55\n", 8, 0.1);
    let bad = dir.path().join("bad.out");
    fs::write(&bad, "0 1 2 3\n0.1 1 2\n").unwrap();

    let report = validate_result_files(&[good, bad.clone()], HeaderRows::Auto);
    assert_eq!(report.failure_count(), 1);
    assert!(report
        .checks
        .iter()
        .all(|c| !c.name.starts_with("Row counts")));
    let failed = report
        .checks
        .iter()
        .find(|c| matches!(c.status, CheckStatus::Failed(_)))
        .unwrap();
    assert_eq!(failed.scope, CheckScope::File(bad.display().to_string()));
    assert_eq!(failed.name, "numeric block parses");
}

#[test]
fn test_missing_omega_only_warns() {
    let dir = tempdir().unwrap();
    let file = write(dir.path(), "res.out", "JOB_NAME h2\n", 8, 0.1);
    let report = validate_result_files(&[file], HeaderRows::Fixed(1));
    assert!(!report.has_failures());
    assert_eq!(report.warning_count(), 1);
}
