//! Integration tests for snapshotting and comparing firmware trees

mod cache_roundtrip;
mod diff_scenarios;
mod snapshot_build;
