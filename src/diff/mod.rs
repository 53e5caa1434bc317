//! Snapshot Comparison
//!
//! Compares two snapshots of the same board. The snapshot with the
//! lexicographically greater version is treated as current.
//!
//! Reported, in order: package additions, package changes, package removals,
//! unpackaged file additions and changes, then unpackaged file removals. Only
//! removals below the board's own overlay directory are reported; every other
//! unpackaged removal is dropped.

pub mod render;

use crate::diagnostics::Diagnostic;
use crate::error::DiffError;
use crate::index::{EntryKind, FileEntry};
use crate::layout::{BOARDS_PREFIX, OPKG_DIR_PREFIX, VERSION_CONFIG_PREFIX};
use crate::package::PackageEntry;
use crate::snapshot::Snapshot;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

pub use render::{render_json, render_text, TextStyle};

/// Comparison options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffOptions {
    /// Report packages whose version is unchanged but whose installed size differs
    #[serde(default)]
    pub include_size_changes: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum PackageChange {
    Added {
        name: String,
        version: String,
        description: Vec<String>,
    },
    VersionChanged {
        name: String,
        previous_version: String,
        current_version: String,
        description: Vec<String>,
    },
    SizeChanged {
        name: String,
        version: String,
        previous_size: u64,
        current_size: u64,
        description: Vec<String>,
    },
    Removed {
        name: String,
        version: String,
        description: Vec<String>,
    },
}

impl PackageChange {
    pub fn name(&self) -> &str {
        match self {
            PackageChange::Added { name, .. }
            | PackageChange::VersionChanged { name, .. }
            | PackageChange::SizeChanged { name, .. }
            | PackageChange::Removed { name, .. } => name,
        }
    }

    pub fn description(&self) -> &[String] {
        match self {
            PackageChange::Added { description, .. }
            | PackageChange::VersionChanged { description, .. }
            | PackageChange::SizeChanged { description, .. }
            | PackageChange::Removed { description, .. } => description,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum FileChange {
    Added { path: String },
    Changed { path: String },
    SymlinkChanged { path: String },
    Removed { path: String },
}

impl FileChange {
    pub fn path(&self) -> &str {
        match self {
            FileChange::Added { path }
            | FileChange::Changed { path }
            | FileChange::SymlinkChanged { path }
            | FileChange::Removed { path } => path,
        }
    }
}

/// Ordered result of comparing two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffReport {
    pub board_id: String,
    pub previous_version: String,
    pub current_version: String,
    pub include_size_changes: bool,
    pub packages: Vec<PackageChange>,
    pub files: Vec<FileChange>,
    pub diagnostics: Vec<Diagnostic>,
}

impl DiffReport {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.files.is_empty()
    }
}

pub struct DiffEngine {
    options: DiffOptions,
}

impl DiffEngine {
    pub fn new(options: DiffOptions) -> Self {
        Self { options }
    }

    /// Compare two snapshots; argument order does not matter
    pub fn compare(&self, a: &Snapshot, b: &Snapshot) -> Result<DiffReport, DiffError> {
        if a.board_id() != b.board_id() {
            return Err(DiffError::BoardMismatch {
                left: a.board_id().to_string(),
                right: b.board_id().to_string(),
            });
        }

        let (previous, current) = match a.version().cmp(b.version()) {
            Ordering::Equal => {
                return Err(DiffError::IdenticalVersions {
                    left: a.version().to_string(),
                    right: b.version().to_string(),
                })
            }
            Ordering::Less => (a, b),
            Ordering::Greater => (b, a),
        };

        let mut report = DiffReport {
            board_id: current.board_id().to_string(),
            previous_version: previous.version().to_string(),
            current_version: current.version().to_string(),
            include_size_changes: self.options.include_size_changes,
            packages: Vec::new(),
            files: Vec::new(),
            diagnostics: Vec::new(),
        };

        self.compare_packages(previous, current, &mut report);
        compare_files(previous, current, &mut report);

        debug!(
            packages = report.packages.len(),
            files = report.files.len(),
            diagnostics = report.diagnostics.len(),
            "Comparison complete"
        );

        Ok(report)
    }

    fn compare_packages(&self, previous: &Snapshot, current: &Snapshot, report: &mut DiffReport) {
        let mut added = Vec::new();
        let mut changed = Vec::new();

        for (key, crnt) in current.packages() {
            match previous.package(key) {
                None => added.push(PackageChange::Added {
                    name: crnt.name.clone(),
                    version: crnt.version.clone(),
                    description: crnt.description.clone(),
                }),
                Some(prev) => {
                    if let Some(change) = self.package_change(prev, crnt) {
                        changed.push(change);
                    }
                }
            }
        }

        let removed = previous
            .packages()
            .iter()
            .filter(|(key, _)| current.package(key).is_none())
            .map(|(_, prev)| PackageChange::Removed {
                name: prev.name.clone(),
                version: prev.version.clone(),
                description: prev.description.clone(),
            });

        report.packages.extend(added);
        report.packages.extend(changed);
        report.packages.extend(removed);
    }

    fn package_change(&self, prev: &PackageEntry, crnt: &PackageEntry) -> Option<PackageChange> {
        if crnt.version != prev.version {
            Some(PackageChange::VersionChanged {
                name: crnt.name.clone(),
                previous_version: prev.version.clone(),
                current_version: crnt.version.clone(),
                description: crnt.description.clone(),
            })
        } else if self.options.include_size_changes && crnt.installed_size != prev.installed_size
        {
            Some(PackageChange::SizeChanged {
                name: crnt.name.clone(),
                version: crnt.version.clone(),
                previous_size: prev.installed_size,
                current_size: crnt.installed_size,
                description: crnt.description.clone(),
            })
        } else {
            None
        }
    }
}

/// Paths never reported as unpackaged changes
fn is_excluded(path: &str) -> bool {
    path.starts_with(OPKG_DIR_PREFIX) || path.starts_with(VERSION_CONFIG_PREFIX)
}

fn compare_files(previous: &Snapshot, current: &Snapshot, report: &mut DiffReport) {
    for crnt in current.unpackaged() {
        if crnt.is_directory() || is_excluded(&crnt.path) {
            continue;
        }
        match previous.file(&crnt.path) {
            None => report.files.push(FileChange::Added {
                path: crnt.path.clone(),
            }),
            Some(prev) => compare_entry(prev, crnt, report),
        }
    }

    let board = current.board_id();
    for prev in previous.unpackaged() {
        if prev.is_directory() || current.file(&prev.path).is_some() {
            continue;
        }
        if prev.path.starts_with(BOARDS_PREFIX) && prev.path.contains(board) {
            report.files.push(FileChange::Removed {
                path: prev.path.clone(),
            });
        }
    }
}

fn compare_entry(prev: &FileEntry, crnt: &FileEntry, report: &mut DiffReport) {
    if let (EntryKind::Symlink { target: a }, EntryKind::Symlink { target: b }) =
        (&prev.kind, &crnt.kind)
    {
        if a != b {
            report.files.push(FileChange::SymlinkChanged {
                path: crnt.path.clone(),
            });
        }
        return;
    }

    match (prev.content_digest(), crnt.content_digest()) {
        (Some(a), Some(b)) => {
            if a != b {
                report.files.push(FileChange::Changed {
                    path: crnt.path.clone(),
                });
            }
        }
        _ => report.diagnostics.push(Diagnostic::MissingDigest {
            path: crnt.path.clone(),
        }),
    }
}
