//! Snapshot cache
//!
//! Stores the attributed file index, package registry and attribution diagnostics
//! of a firmware root so a later run can skip indexing. Each half is a versioned bincode envelope tagged
//! with a fingerprint of the tree; a stale, partial or undecodable cache is a miss.

use crate::diagnostics::Diagnostic;
use crate::error::CacheError;
use crate::index::FileIndex;
use crate::package::PackageRegistry;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Bumped whenever the cached structures change shape
pub const CACHE_FORMAT_VERSION: u32 = 2;

/// Cheap summary of a firmware tree used to detect stale cache entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub root: String,
    pub entry_count: u64,
    pub total_bytes: u64,
}

/// Cached halves of a snapshot
#[derive(Debug, Clone)]
pub struct CachedSnapshot {
    pub files: FileIndex,
    pub packages: PackageRegistry,
    /// Attribution diagnostics of the build that produced the entry
    pub diagnostics: Vec<Diagnostic>,
}

/// Packages half as written
#[derive(Serialize)]
struct PackagesPayloadRef<'a> {
    packages: &'a PackageRegistry,
    diagnostics: &'a [Diagnostic],
}

/// Packages half as read back; field order matches `PackagesPayloadRef`
#[derive(Deserialize)]
struct PackagesPayload {
    packages: PackageRegistry,
    diagnostics: Vec<Diagnostic>,
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    format_version: u32,
    fingerprint: Fingerprint,
    /// Unix seconds at write time
    written_at: i64,
    payload: T,
}

/// Snapshot cache interface
pub trait SnapshotCache {
    /// Return both halves for `root`, or `None` unless both are present and current
    fn load(&self, root: &Path, fingerprint: &Fingerprint)
        -> Result<Option<CachedSnapshot>, CacheError>;

    fn store(
        &self,
        root: &Path,
        fingerprint: &Fingerprint,
        files: &FileIndex,
        packages: &PackageRegistry,
        diagnostics: &[Diagnostic],
    ) -> Result<(), CacheError>;
}

/// Cache kept as two bincode files per firmware root in one directory
pub struct FileSnapshotCache {
    dir: PathBuf,
}

impl FileSnapshotCache {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache in the platform cache directory
    pub fn default_location() -> Result<Self, CacheError> {
        default_cache_dir()
            .map(Self::new)
            .ok_or(CacheError::NoCacheDir)
    }

    /// Cache key for a root: hex BLAKE3 of its absolute path
    pub fn key_for(root: &Path) -> String {
        hex::encode(blake3::hash(root.to_string_lossy().as_bytes()).as_bytes())
    }

    pub fn files_path(&self, root: &Path) -> PathBuf {
        self.dir.join(format!("{}-files.bin", Self::key_for(root)))
    }

    pub fn packages_path(&self, root: &Path) -> PathBuf {
        self.dir.join(format!("{}-packages.bin", Self::key_for(root)))
    }

    fn read_envelope<T: DeserializeOwned>(
        path: &Path,
        fingerprint: &Fingerprint,
    ) -> Result<Option<T>, CacheError> {
        if !path.is_file() {
            return Ok(None);
        }
        let bytes = std::fs::read(path).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let envelope: Envelope<T> = match decode(path, &bytes) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(error = %e, "Discarding undecodable cache entry");
                return Ok(None);
            }
        };
        if envelope.format_version != CACHE_FORMAT_VERSION {
            debug!(path = %path.display(), "Discarding cache entry with old format");
            return Ok(None);
        }
        if &envelope.fingerprint != fingerprint {
            debug!(path = %path.display(), "Discarding stale cache entry");
            return Ok(None);
        }
        debug!(
            path = %path.display(),
            written_at = %format_timestamp(envelope.written_at),
            "Cache entry is current"
        );
        Ok(Some(envelope.payload))
    }

    fn write_envelope<T: Serialize>(
        path: &Path,
        fingerprint: &Fingerprint,
        payload: &T,
    ) -> Result<(), CacheError> {
        let envelope = Envelope {
            format_version: CACHE_FORMAT_VERSION,
            fingerprint: fingerprint.clone(),
            written_at: chrono::Utc::now().timestamp(),
            payload,
        };
        let bytes =
            bincode::serialize(&envelope).map_err(|e| CacheError::Encode(e.to_string()))?;
        std::fs::write(path, bytes).map_err(|source| CacheError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl SnapshotCache for FileSnapshotCache {
    fn load(
        &self,
        root: &Path,
        fingerprint: &Fingerprint,
    ) -> Result<Option<CachedSnapshot>, CacheError> {
        let files = Self::read_envelope::<FileIndex>(&self.files_path(root), fingerprint)?;
        let packages =
            Self::read_envelope::<PackagesPayload>(&self.packages_path(root), fingerprint)?;

        match (files, packages) {
            (Some(files), Some(payload)) => Ok(Some(CachedSnapshot {
                files,
                packages: payload.packages,
                diagnostics: payload.diagnostics,
            })),
            _ => Ok(None),
        }
    }

    fn store(
        &self,
        root: &Path,
        fingerprint: &Fingerprint,
        files: &FileIndex,
        packages: &PackageRegistry,
        diagnostics: &[Diagnostic],
    ) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;
        Self::write_envelope(&self.files_path(root), fingerprint, files)?;
        Self::write_envelope(
            &self.packages_path(root),
            fingerprint,
            &PackagesPayloadRef {
                packages,
                diagnostics,
            },
        )
    }
}

fn decode<T: DeserializeOwned>(path: &Path, bytes: &[u8]) -> Result<Envelope<T>, CacheError> {
    bincode::deserialize(bytes).map_err(|e| CacheError::Decode {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn format_timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

/// Platform cache directory for tch-compare
pub fn default_cache_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.github", "seud0nym", "tch-compare")
        .map(|dirs| dirs.cache_dir().to_path_buf())
}
