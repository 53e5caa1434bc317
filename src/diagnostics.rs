//! Non-fatal findings collected while building and comparing snapshots.
//!
//! The core never prints; callers decide how diagnostics are rendered.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostic {
    /// A package lists a path that could not be matched to any indexed entry
    UnresolvedPackageFile { package: String, path: String },
    /// A path already owned by one package was claimed by another
    OwnershipReassigned {
        path: String,
        previous: String,
        package: String,
    },
    /// A compared path had no content digest on one side
    MissingDigest { path: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedPackageFile { package, path } => {
                write!(f, "File {} from package {} not found!", path, package)
            }
            Diagnostic::OwnershipReassigned {
                path,
                previous,
                package,
            } => write!(
                f,
                "File {} reassigned from package {} to {}",
                path, previous, package
            ),
            Diagnostic::MissingDigest { path } => write!(f, "DIGEST is NULL for {}", path),
        }
    }
}
