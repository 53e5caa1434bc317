//! Package Attribution
//!
//! Maps every path a package declares onto the file index. The result is a
//! separate path -> package map; the index itself is never mutated here.

pub mod strategy;

use crate::diagnostics::Diagnostic;
use crate::index::FileIndex;
use crate::package::PackageRegistry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

pub use strategy::{resolve, ResolveContext, Strategy, Verdict, STRATEGIES};

/// Owning package name per index key
pub type AttributionMap = BTreeMap<String, String>;

/// What happens when a second package claims an already-owned path
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipPolicy {
    /// Later package (in registry order) silently takes ownership
    #[default]
    LastWriterWins,
    /// Later package still takes ownership, but a diagnostic is recorded
    WarnOnReassign,
}

/// Attribution output
#[derive(Debug, Clone, Default)]
pub struct Attribution {
    pub owners: AttributionMap,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct AttributionResolver<'a> {
    ctx: ResolveContext<'a>,
    policy: OwnershipPolicy,
}

impl<'a> AttributionResolver<'a> {
    pub fn new(board_id: &'a str, index: &'a FileIndex) -> Self {
        Self {
            ctx: ResolveContext { board_id, index },
            policy: OwnershipPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: OwnershipPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve every declared path of every package, in registry order
    pub fn resolve(&self, packages: &PackageRegistry) -> Attribution {
        let mut result = Attribution::default();
        let mut skipped = 0usize;

        for package in packages.values() {
            for declared in &package.files {
                let (verdict, strategy) = resolve(declared, &self.ctx);
                match verdict {
                    Verdict::Resolved(key) => {
                        trace!(path = %declared, key = %key, strategy = ?strategy, "Resolved");
                        self.assign(&mut result, key, &package.name);
                    }
                    Verdict::Skip => skipped += 1,
                    Verdict::Unresolved => {
                        result.diagnostics.push(Diagnostic::UnresolvedPackageFile {
                            package: package.name.clone(),
                            path: declared.clone(),
                        })
                    }
                }
            }
        }

        debug!(
            owned = result.owners.len(),
            skipped,
            unresolved = result.diagnostics.len(),
            "Attribution complete"
        );

        result
    }

    fn assign(&self, result: &mut Attribution, key: String, package: &str) {
        let previous = result.owners.insert(key.clone(), package.to_string());
        if self.policy == OwnershipPolicy::WarnOnReassign {
            if let Some(previous) = previous.filter(|p| p != package) {
                result.diagnostics.push(Diagnostic::OwnershipReassigned {
                    path: key,
                    previous,
                    package: package.to_string(),
                });
            }
        }
    }
}
