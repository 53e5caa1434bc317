//! Firmware Snapshots
//!
//! A snapshot is the indexed and attributed state of one extracted firmware tree.
//! It is built once, optionally from cache, and is read-only afterwards.

pub mod cache;

use crate::attribution::{AttributionMap, AttributionResolver, OwnershipPolicy};
use crate::board;
use crate::diagnostics::Diagnostic;
use crate::error::{IndexError, SnapshotError};
use crate::index::{FileEntry, FileIndex, FileIndexer};
use crate::package::{parse_package, PackageEntry, PackageRegistry};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

pub use cache::{CachedSnapshot, FileSnapshotCache, Fingerprint, SnapshotCache};

/// Immutable, attributed inventory of one firmware tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    board_id: String,
    version: String,
    files: FileIndex,
    packages: PackageRegistry,
}

impl Snapshot {
    /// Finalize a snapshot by merging attribution results into the index
    ///
    /// Owners for keys not present in `files` are ignored.
    pub fn finalize(
        board_id: String,
        version: String,
        mut files: FileIndex,
        packages: PackageRegistry,
        owners: &AttributionMap,
    ) -> Self {
        for (path, package) in owners {
            if let Some(entry) = files.get_mut(path) {
                entry.owner = Some(package.clone());
            }
        }
        Self::from_parts(board_id, version, files, packages)
    }

    /// Assemble a snapshot from an already-attributed index
    pub fn from_parts(
        board_id: String,
        version: String,
        files: FileIndex,
        packages: PackageRegistry,
    ) -> Self {
        Self {
            board_id,
            version,
            files,
            packages,
        }
    }

    pub fn board_id(&self) -> &str {
        &self.board_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn files(&self) -> &FileIndex {
        &self.files
    }

    pub fn packages(&self) -> &PackageRegistry {
        &self.packages
    }

    pub fn file(&self, path: &str) -> Option<&FileEntry> {
        self.files.get(path)
    }

    pub fn package(&self, name: &str) -> Option<&PackageEntry> {
        self.packages.get(name)
    }

    /// Indexed entries with no owning package
    pub fn unpackaged(&self) -> impl Iterator<Item = &FileEntry> {
        self.files.values().filter(|entry| entry.owner.is_none())
    }
}

/// Snapshot build options
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Return a cached snapshot when a complete, current one exists
    pub use_cache: bool,
    /// Write the freshly built snapshot to the cache
    pub persist_cache: bool,
    pub ownership_policy: OwnershipPolicy,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            use_cache: false,
            persist_cache: true,
            ownership_policy: OwnershipPolicy::default(),
        }
    }
}

/// A built snapshot plus everything non-fatal noticed along the way
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub snapshot: Snapshot,
    /// Always empty for cache hits
    pub diagnostics: Vec<Diagnostic>,
    pub from_cache: bool,
}

/// Builds a snapshot from a firmware root directory
pub struct SnapshotBuilder<'c> {
    root: PathBuf,
    options: BuildOptions,
    cache: Option<&'c dyn SnapshotCache>,
}

impl<'c> SnapshotBuilder<'c> {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            options: BuildOptions::default(),
            cache: None,
        }
    }

    pub fn with_options(mut self, options: BuildOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_cache(mut self, cache: &'c dyn SnapshotCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the snapshot
    ///
    /// Any fatal condition aborts the build; no partial snapshot is returned.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn build(&self) -> Result<BuildOutcome, SnapshotError> {
        let start = Instant::now();
        let root = absolute_root(&self.root)?;
        let identity = board::extract(&root)?;
        info!(board = %identity.board_id, version = %identity.version, "Building snapshot");

        let fingerprint = match self.cache {
            Some(_) => Some(fingerprint(&root)?),
            None => None,
        };

        if let (true, Some(cache), Some(fingerprint)) =
            (self.options.use_cache, self.cache, fingerprint.as_ref())
        {
            match cache.load(&root, fingerprint) {
                Ok(Some(cached)) => {
                    info!(entries = cached.files.len(), "Loaded snapshot from cache");
                    return Ok(BuildOutcome {
                        snapshot: Snapshot::from_parts(
                            identity.board_id,
                            identity.version,
                            cached.files,
                            cached.packages,
                        ),
                        diagnostics: cached.diagnostics,
                        from_cache: true,
                    });
                }
                Ok(None) => debug!("Cache miss"),
                Err(e) => warn!("Ignoring unreadable cache: {}", e),
            }
        }

        let indexed = FileIndexer::new(root.clone()).index()?;

        let mut packages = PackageRegistry::new();
        for source in &indexed.packages {
            let package = parse_package(&source.control, &source.list)?;
            packages.insert(source.name.clone(), package);
        }

        let attribution = AttributionResolver::new(&identity.board_id, &indexed.files)
            .with_policy(self.options.ownership_policy)
            .resolve(&packages);

        let snapshot = Snapshot::finalize(
            identity.board_id,
            identity.version,
            indexed.files,
            packages,
            &attribution.owners,
        );

        if let (true, Some(cache), Some(fingerprint)) =
            (self.options.persist_cache, self.cache, fingerprint.as_ref())
        {
            if let Err(e) = cache.store(
                &root,
                fingerprint,
                snapshot.files(),
                snapshot.packages(),
                &attribution.diagnostics,
            ) {
                warn!("Failed to write snapshot cache: {}", e);
            }
        }

        info!(
            entries = snapshot.files().len(),
            packages = snapshot.packages().len(),
            diagnostics = attribution.diagnostics.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Snapshot built"
        );

        Ok(BuildOutcome {
            snapshot,
            diagnostics: attribution.diagnostics,
            from_cache: false,
        })
    }
}

/// Absolute form of `root` with symlinks left unresolved
///
/// The board code and the cache key are taken from this path.
fn absolute_root(root: &Path) -> Result<PathBuf, SnapshotError> {
    if !root.is_dir() {
        return Err(IndexError::NotADirectory(root.to_path_buf()).into());
    }
    let absolute = std::path::absolute(root).map_err(|source| {
        SnapshotError::from(IndexError::Io {
            path: root.to_path_buf(),
            source,
        })
    })?;
    Ok(dunce::simplified(&absolute).to_path_buf())
}

/// Fingerprint a firmware root without reading file content
pub fn fingerprint(root: &Path) -> Result<Fingerprint, SnapshotError> {
    let (entry_count, total_bytes) = FileIndexer::new(root.to_path_buf()).measure()?;
    Ok(Fingerprint {
        root: root.to_string_lossy().into_owned(),
        entry_count,
        total_bytes,
    })
}
