//! Test-case report export.
//!
//! Writes generated test cases as a timestamped JSON report with a
//! pass/fail summary, and prints them as a plain listing for the terminal.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::models::TestCase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub not_tested: usize,
}

impl Summary {
    /// A case counts as passed (failed) when any platform column says so.
    pub fn of(testcases: &[TestCase]) -> Self {
        let total = testcases.len();
        let pass = testcases
            .iter()
            .filter(|tc| tc.platform_results.any_is("PASS"))
            .count();
        let fail = testcases
            .iter()
            .filter(|tc| tc.platform_results.any_is("FAIL"))
            .count();
        Self {
            total,
            pass,
            fail,
            not_tested: total.saturating_sub(pass + fail),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub summary: Summary,
    pub testcases: Vec<TestCase>,
}

/// Write `testcases_<YYYYmmdd_HHMMSS>.json` into `dir` and return its path.
pub fn write_report(testcases: &[TestCase], dir: &Path) -> Result<PathBuf> {
    let now = Local::now();
    let report = Report {
        generated_at: now,
        summary: Summary::of(testcases),
        testcases: testcases.to_vec(),
    };

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    let path = dir.join(format!("testcases_{}.json", now.format("%Y%m%d_%H%M%S")));
    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write report: {}", path.display()))?;

    tracing::info!(
        path = %path.display(),
        total = report.summary.total,
        "report written"
    );
    Ok(path)
}

pub fn read_report(path: &Path) -> Result<Report> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse report: {}", path.display()))
}

/// Print a numbered listing of `testcases` to stdout.
pub fn print_table(testcases: &[TestCase]) {
    if testcases.is_empty() {
        println!("No test cases.");
        return;
    }
    for (i, tc) in testcases.iter().enumerate() {
        println!("{}. {} > {} > {}", i + 1, tc.major, tc.medium, tc.minor);
        println!("    check: {}", tc.content);
        if !tc.note.is_empty() {
            println!("    note: {}", tc.note);
        }
    }
    println!();
    println!("{} test case(s)", testcases.len());
}
