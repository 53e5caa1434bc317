//! Content hashing for regular files using BLAKE3

use crate::error::IndexError;
use blake3::Hasher;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Hash everything readable from `reader` into a lowercase hex digest
///
/// Reads through a fixed-size buffer so memory use does not depend on input size.
pub fn hash_reader<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize().as_bytes()))
}

/// Hash the full content of the file at `path`
pub fn hash_file(path: &Path) -> Result<String, IndexError> {
    let file = File::open(path).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    hash_reader(file).map_err(|source| IndexError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Hash an in-memory byte slice
pub fn compute_content_hash(content: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(content);
    hex::encode(hasher.finalize().as_bytes())
}
