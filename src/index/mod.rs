//! Firmware Filesystem Index
//!
//! Every directory, symlink and regular file below a firmware root, keyed by its
//! normalized path. Regular files carry a BLAKE3 content digest.

pub mod hasher;
pub mod path;
pub mod walker;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use walker::{FileIndexer, IndexOutput, PackageSource};

/// Path-ordered index of a firmware tree
pub type FileIndex = BTreeMap<String, FileEntry>;

/// What kind of filesystem object an entry is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    Directory,
    /// Raw, undereferenced link target
    Symlink { target: String },
    /// Hex content digest
    File { digest: String },
}

/// One indexed filesystem object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: String,
    pub kind: EntryKind,
    /// Byte length; 0 for directories and symlinks
    pub size: u64,
    /// Owning package, set when the snapshot is finalized
    pub owner: Option<String>,
}

impl FileEntry {
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
            size: 0,
            owner: None,
        }
    }

    pub fn symlink(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Symlink {
                target: target.into(),
            },
            size: 0,
            owner: None,
        }
    }

    pub fn file(path: impl Into<String>, digest: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File {
                digest: digest.into(),
            },
            size,
            owner: None,
        }
    }

    pub fn is_directory(&self) -> bool {
        matches!(self.kind, EntryKind::Directory)
    }

    pub fn is_symlink(&self) -> bool {
        matches!(self.kind, EntryKind::Symlink { .. })
    }

    /// Digest, present only for regular files
    pub fn content_digest(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::File { digest } => Some(digest),
            _ => None,
        }
    }

    /// Link target, present only for symlinks
    pub fn symlink_target(&self) -> Option<&str> {
        match &self.kind {
            EntryKind::Symlink { target } => Some(target),
            _ => None,
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }
}
