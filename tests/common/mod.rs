// ==============================================================================
// Shared Test Helpers
// ==============================================================================
//
// Common utility functions used across multiple integration test files.
//
// Each test file that imports this module compiles its own copy, so not every
// function is used in every binary. Suppress the resulting dead_code warnings.
#![allow(dead_code)]
// Import this module in each test file with:
//
//     mod common;
//     use common::{render_diagnostic, render_diagnostics};

use std::fmt::Write;

use miette::{GraphicalReportHandler, GraphicalTheme};

/// Render a single diagnostic to a deterministic string. Uses the non-unicode
/// theme at 80 columns so assertions do not depend on terminal capabilities.
pub fn render_diagnostic(report: &miette::Report) -> String {
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::none()).with_width(80);
    let mut buf = String::new();
    handler
        .render_report(&mut buf, report.as_ref())
        .expect("render to String is infallible");
    buf
}

/// Render multiple diagnostics, separated by blank lines.
pub fn render_diagnostics(reports: &[miette::Report]) -> String {
    let mut buf = String::new();
    for (i, r) in reports.iter().enumerate() {
        if i > 0 {
            writeln!(buf).expect("write to String is infallible");
        }
        buf.push_str(&render_diagnostic(r));
    }
    buf
}
