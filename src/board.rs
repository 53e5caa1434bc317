//! Board identifier and firmware version extraction
//!
//! The board comes from the firmware directory name; the version is assembled from
//! `/etc/config/version` and `/etc/config/versioncusto` (or the board overlay copy).

use crate::error::BoardError;
use crate::layout::BOARD_PATTERN;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const VERSION_OPTION: &str = "option version";
const VERSION_CAPTURE: &str = r"option version '(.*?)-";
const SUFFIX_OPTION: &str = "option fwversion_suffix";
const SUFFIX_CAPTURE: &str = r"option fwversion_suffix '(.*)'";

type CompiledPattern = OnceLock<Result<Regex, regex::Error>>;

static BOARD_REGEX: CompiledPattern = OnceLock::new();
static VERSION_REGEX: CompiledPattern = OnceLock::new();
static SUFFIX_REGEX: CompiledPattern = OnceLock::new();

/// Board and version of one firmware tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardVersion {
    pub board_id: String,
    pub version: String,
}

/// Extract the upper-case board identifier from an absolute root path
pub fn extract_board(root: &Path) -> Result<String, BoardError> {
    let regex = compiled(&BOARD_REGEX, BOARD_PATTERN)?;
    let path = root.to_string_lossy();
    capture(regex, &path)
        .map(|board| board.to_uppercase())
        .ok_or_else(|| BoardError::BoardNotFound(path.to_string()))
}

/// Extract the primary version token from `<root>/etc/config/version`
pub fn extract_version(root: &Path) -> Result<String, BoardError> {
    let path = root.join("etc").join("config").join("version");
    let line = first_line_containing(&path, VERSION_OPTION)?
        .ok_or_else(|| BoardError::VersionLineMissing(path.clone()))?;
    let regex = compiled(&VERSION_REGEX, VERSION_CAPTURE)?;
    capture(regex, &line).ok_or(BoardError::VersionUnparseable(line))
}

/// Location of `versioncusto`, falling back to the board overlay copy
pub fn version_suffix_path(root: &Path, board_id: &str) -> PathBuf {
    let primary = root.join("etc").join("config").join("versioncusto");
    if primary.exists() {
        return primary;
    }
    root.join("etc")
        .join("boards")
        .join(board_id)
        .join("config")
        .join("etc")
        .join("config")
        .join("versioncusto")
}

/// Extract the version suffix token
pub fn extract_version_suffix(root: &Path, board_id: &str) -> Result<String, BoardError> {
    let path = version_suffix_path(root, board_id);
    let line = first_line_containing(&path, SUFFIX_OPTION)?
        .ok_or_else(|| BoardError::SuffixLineMissing(path.clone()))?;
    let regex = compiled(&SUFFIX_REGEX, SUFFIX_CAPTURE)?;
    capture(regex, &line).ok_or(BoardError::SuffixUnparseable(line))
}

/// Extract board and full version (primary token immediately followed by suffix)
pub fn extract(root: &Path) -> Result<BoardVersion, BoardError> {
    let board_id = extract_board(root)?;
    let mut version = extract_version(root)?;
    version.push_str(&extract_version_suffix(root, &board_id)?);
    Ok(BoardVersion { board_id, version })
}

fn first_line_containing(path: &Path, needle: &str) -> Result<Option<String>, BoardError> {
    let text = std::fs::read(path).map_err(|source| BoardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&text)
        .lines()
        .find(|line| line.contains(needle))
        .map(str::to_string))
}

/// Compile `pattern` on first use; later calls share the result
fn compiled(cell: &'static CompiledPattern, pattern: &str) -> Result<&'static Regex, BoardError> {
    cell.get_or_init(|| Regex::new(pattern))
        .as_ref()
        .map_err(|e| BoardError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

fn capture(regex: &Regex, line: &str) -> Option<String> {
    regex
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}
