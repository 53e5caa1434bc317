//! CLI output: error mapping and report rendering for the terminal.

use crate::cli::parse::OutputFormat;
use crate::diagnostics::Diagnostic;
use crate::diff::{render_json, render_text, DiffReport, TextStyle};
use crate::error::CompareError;

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &CompareError) -> String {
    e.to_string()
}

/// Render the report for stdout
pub fn format_report(
    report: &DiffReport,
    format: OutputFormat,
    style: TextStyle,
) -> Result<String, CompareError> {
    match format {
        OutputFormat::Text => Ok(render_text(report, style)),
        OutputFormat::Json => render_json(report)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|e| CompareError::Output(e.to_string())),
    }
}

/// One stderr line per diagnostic
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}
