//! CLI output formatting for the clean and compile commands.
//!
//! # Output Format
//!
//! ## Clean
//!
//! ```text
//! 2 frame(s) rejected of 3 processed
//! ```
//!
//! In test mode nothing is moved, so the rejected paths are listed first:
//!
//! ```text
//! frames/000002.png
//! frames/000003.png
//! 2 frame(s) rejected of 3 processed
//! ```
//!
//! ## Compile
//!
//! ```text
//! clips/01.mp4
//! clips/02.mp4 (failed)
//! clips/02_pad.mp4
//! Compiled 2 clip(s), 1 failed
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::clean::RunReport;
use crate::compile::CompileReport;
use crate::specification::Specification;

// ============================================================================
// Clean
// ============================================================================

/// Format the clean summary, optionally preceded by every rejected path.
pub fn format_clean_report(report: &RunReport, list_rejected: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if list_rejected {
        lines.extend(report.rejected.iter().map(|p| p.display().to_string()));
    }
    lines.push(format!(
        "{} frame(s) rejected of {} processed",
        report.rejected.len(),
        report.processed
    ));
    lines
}

/// Print clean output to stdout.
pub fn print_clean_report(report: &RunReport, list_rejected: bool) {
    for line in format_clean_report(report, list_rejected) {
        println!("{}", line);
    }
}

/// One line per loaded specification, for the debug log.
pub fn format_specifications(specifications: &[Specification]) -> Vec<String> {
    specifications
        .iter()
        .map(|spec| {
            let names: Vec<&str> = spec
                .rules
                .iter()
                .map(|rule| rule.name().unwrap_or("unnamed"))
                .collect();
            format!(
                "Specification \"{}\" ({} rule(s): {})",
                spec.name,
                spec.rules.len(),
                names.join(", ")
            )
        })
        .collect()
}

// ============================================================================
// Compile
// ============================================================================

/// Format the compile result: one line per clip, failed clips marked, then a
/// summary.
pub fn format_compile_report(report: &CompileReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .clips
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    lines.extend(
        report
            .failed
            .iter()
            .map(|p| format!("{} (failed)", p.display())),
    );
    lines.push(if report.failed.is_empty() {
        format!("Compiled {} clip(s)", report.clips.len())
    } else {
        format!(
            "Compiled {} clip(s), {} failed",
            report.clips.len(),
            report.failed.len()
        )
    });
    lines
}

/// Print compile output to stdout.
pub fn print_compile_report(report: &CompileReport) {
    for line in format_compile_report(report) {
        println!("{}", line);
    }
}
