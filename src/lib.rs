//! tch-compare: firmware image comparison
//!
//! Snapshots an extracted Technicolor firmware tree (file index, opkg package
//! registry, board and version) and reports what changed between two snapshots.

pub mod attribution;
pub mod board;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod diff;
pub mod error;
pub mod index;
pub mod layout;
pub mod logging;
pub mod package;
pub mod snapshot;
