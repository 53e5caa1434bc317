//! Filesystem walker that builds the firmware index

use crate::error::IndexError;
use crate::index::hasher;
use crate::index::path::normalize_relative;
use crate::index::{FileEntry, FileIndex};
use crate::layout::{CONTROL_SUFFIX, LIST_SUFFIX, OPKG_INFO_DIR};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Control/list file pair discovered in the opkg info directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSource {
    /// Control file stem
    pub name: String,
    pub control: PathBuf,
    pub list: PathBuf,
}

/// Result of a full walk
#[derive(Debug, Clone, Default)]
pub struct IndexOutput {
    pub files: FileIndex,
    /// In traversal order
    pub packages: Vec<PackageSource>,
}

/// Recursive indexer for one firmware root
pub struct FileIndexer {
    root: PathBuf,
}

impl FileIndexer {
    /// Create an indexer for an absolute root directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Walk the whole tree, hashing every regular file
    ///
    /// Symlinks are never followed. Any unreadable entry aborts the walk.
    pub fn index(&self) -> Result<IndexOutput, IndexError> {
        if !self.root.is_dir() {
            return Err(IndexError::NotADirectory(self.root.clone()));
        }

        let mut output = IndexOutput::default();

        for entry in self.walker() {
            let entry = entry.map_err(|e| IndexError::Walk(e.to_string()))?;
            let key = self.key_for(entry.path())?;
            let file_type = entry.file_type();

            let record = if file_type.is_symlink() {
                let target = std::fs::read_link(entry.path()).map_err(|source| IndexError::Io {
                    path: entry.path().to_path_buf(),
                    source,
                })?;
                FileEntry::symlink(key.clone(), target.to_string_lossy())
            } else if file_type.is_dir() {
                FileEntry::directory(key.clone())
            } else if file_type.is_file() {
                let size = entry
                    .metadata()
                    .map_err(|e| IndexError::Walk(e.to_string()))?
                    .len();
                let digest = hasher::hash_file(entry.path())?;
                FileEntry::file(key.clone(), digest, size)
            } else {
                // Device nodes and fifos cannot be hashed without blocking
                debug!(path = %key, "Skipping special file");
                continue;
            };

            if !file_type.is_dir() {
                if let Some(source) = self.package_source(&entry, &key) {
                    trace!(package = %source.name, "Found package control file");
                    output.packages.push(source);
                }
            }

            output.files.insert(key, record);
        }

        debug!(
            entry_count = output.files.len(),
            package_count = output.packages.len(),
            "Indexed firmware tree"
        );

        Ok(output)
    }

    /// Count entries and regular-file bytes without reading any content
    pub fn measure(&self) -> Result<(u64, u64), IndexError> {
        if !self.root.is_dir() {
            return Err(IndexError::NotADirectory(self.root.clone()));
        }

        let mut entries = 0u64;
        let mut bytes = 0u64;
        for entry in self.walker() {
            let entry = entry.map_err(|e| IndexError::Walk(e.to_string()))?;
            entries += 1;
            if entry.file_type().is_file() {
                bytes += entry
                    .metadata()
                    .map_err(|e| IndexError::Walk(e.to_string()))?
                    .len();
            }
        }
        Ok((entries, bytes))
    }

    fn walker(&self) -> walkdir::IntoIter {
        WalkDir::new(&self.root)
            .follow_links(false)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
    }

    fn key_for(&self, path: &Path) -> Result<String, IndexError> {
        normalize_relative(&self.root, path).ok_or_else(|| {
            IndexError::Walk(format!(
                "{} is outside of {}",
                path.display(),
                self.root.display()
            ))
        })
    }

    fn package_source(&self, entry: &DirEntry, key: &str) -> Option<PackageSource> {
        let (parent, file_name) = key.rsplit_once('/')?;
        if parent != OPKG_INFO_DIR {
            return None;
        }
        let name = file_name.strip_suffix(CONTROL_SUFFIX)?;
        let dir = entry.path().parent()?;
        Some(PackageSource {
            name: name.to_string(),
            control: entry.path().to_path_buf(),
            list: dir.join(format!("{}{}", name, LIST_SUFFIX)),
        })
    }
}
