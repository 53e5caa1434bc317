//! Installed opkg packages

pub mod control;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use control::{parse_control, parse_package, ControlFields};

/// Packages keyed by opkg package name (the control file stem)
pub type PackageRegistry = BTreeMap<String, PackageEntry>;

/// One installed package as described by its control and list files
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub name: String,
    pub version: String,
    pub depends: String,
    pub source: String,
    pub license: String,
    pub section: String,
    pub maintainer: String,
    pub architecture: String,
    pub installed_size: u64,
    pub description: Vec<String>,
    /// Paths as declared in the list file; may not exist in the tree
    pub files: Vec<String>,
}
