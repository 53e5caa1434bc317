//! Report rendering: marker-prefixed text or JSON

use crate::diff::{DiffReport, FileChange, PackageChange};
use owo_colors::OwoColorize;
use std::fmt::Write;

const ADDED: &str = "+ ADDED";
const CHANGED: &str = "~ CHANGED";
const REMOVED: &str = "- REMOVED";
const DESCRIPTION_INDENT: &str = "           ";

/// Text rendering options
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStyle {
    /// Colour the change markers with ANSI escapes
    pub color: bool,
}

fn marker(label: &'static str, style: TextStyle) -> String {
    if !style.color {
        return label.to_string();
    }
    match label {
        ADDED => label.green().to_string(),
        CHANGED => label.yellow().to_string(),
        _ => label.red().to_string(),
    }
}

pub fn header(report: &DiffReport) -> String {
    format!(
        "Looking for changes between {} {} and {} (Package installed size changes are {})...",
        report.board_id,
        report.previous_version,
        report.current_version,
        if report.include_size_changes {
            "included"
        } else {
            "excluded"
        }
    )
}

/// One report line per change (without description lines)
pub fn package_line(change: &PackageChange, style: TextStyle) -> String {
    match change {
        PackageChange::Added { name, version, .. } => {
            format!("{} Package {} {}", marker(ADDED, style), name, version)
        }
        PackageChange::VersionChanged {
            name,
            previous_version,
            current_version,
            ..
        } => format!(
            "{} Package {} {} to Version {}",
            marker(CHANGED, style),
            name,
            previous_version,
            current_version
        ),
        PackageChange::SizeChanged {
            name,
            version,
            previous_size,
            current_size,
            ..
        } => format!(
            "{} Package {} {} (Note: Version unchanged, but Installed Size changed from {} to {})",
            marker(CHANGED, style),
            name,
            version,
            previous_size,
            current_size
        ),
        PackageChange::Removed { name, version, .. } => {
            format!("{} Package {} {}", marker(REMOVED, style), name, version)
        }
    }
}

pub fn file_line(change: &FileChange, style: TextStyle) -> String {
    match change {
        FileChange::Added { path } => format!("{} Unpackaged File {}", marker(ADDED, style), path),
        FileChange::Changed { path } => {
            format!("{} Unpackaged File {}", marker(CHANGED, style), path)
        }
        FileChange::SymlinkChanged { path } => format!(
            "{} Unpackaged Symbolic Link {}",
            marker(CHANGED, style),
            path
        ),
        FileChange::Removed { path } => {
            format!("{} Unpackaged File {}", marker(REMOVED, style), path)
        }
    }
}

/// Render the full text report, newline terminated
pub fn render_text(report: &DiffReport, style: TextStyle) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", header(report));
    for change in &report.packages {
        let _ = writeln!(out, "{}", package_line(change, style));
        for line in change.description() {
            let _ = writeln!(out, "{}{}", DESCRIPTION_INDENT, line);
        }
    }
    for change in &report.files {
        let _ = writeln!(out, "{}", file_line(change, style));
    }
    out
}

pub fn render_json(report: &DiffReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
