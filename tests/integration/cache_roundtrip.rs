use crate::integration::test_utils::{FirmwareFixture, BOARD};
use std::path::Path;
use tch_compare::snapshot::{BuildOptions, BuildOutcome, FileSnapshotCache, SnapshotBuilder};
use tempfile::TempDir;

fn build_cached(root: &Path, cache: &FileSnapshotCache, use_cache: bool) -> BuildOutcome {
    SnapshotBuilder::new(root.to_path_buf())
        .with_options(BuildOptions {
            use_cache,
            ..Default::default()
        })
        .with_cache(cache)
        .build()
        .unwrap()
}

fn fixture(temp: &TempDir) -> FirmwareFixture {
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    fw.package("busybox", "1.23.2-1", 300, &["/bin/busybox"])
        .file("etc/rc.local", "exit 0\n");
    fw
}

fn cache_files(dir: &Path, suffix: &str) -> Vec<std::path::PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.to_string_lossy().ends_with(suffix))
        .collect()
}

#[test]
fn test_cache_hit_matches_fresh_build() {
    let temp = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileSnapshotCache::new(cache_dir.path());
    let fw = fixture(&temp);

    let fresh = build_cached(fw.root(), &cache, false);
    assert!(!fresh.from_cache);
    assert_eq!(cache_files(cache_dir.path(), "-files.bin").len(), 1);
    assert_eq!(cache_files(cache_dir.path(), "-packages.bin").len(), 1);

    let cached = build_cached(fw.root(), &cache, true);
    assert!(cached.from_cache);
    assert_eq!(cached.snapshot, fresh.snapshot);
}

#[test]
fn test_cache_hit_replays_attribution_diagnostics() {
    let temp = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileSnapshotCache::new(cache_dir.path());
    let fw = fixture(&temp);
    fw.package_listing("ghost", "1", 0, &["/usr/bin/ghost"]);

    let fresh = build_cached(fw.root(), &cache, false);
    let cached = build_cached(fw.root(), &cache, true);

    assert!(cached.from_cache);
    assert_eq!(fresh.diagnostics.len(), 1);
    assert_eq!(cached.diagnostics, fresh.diagnostics);
}

#[test]
fn test_cache_ignored_without_use_cache() {
    let temp = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileSnapshotCache::new(cache_dir.path());
    let fw = fixture(&temp);

    build_cached(fw.root(), &cache, false);
    let again = build_cached(fw.root(), &cache, false);

    assert!(!again.from_cache);
}

#[test]
fn test_changed_tree_invalidates_cache() {
    let temp = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileSnapshotCache::new(cache_dir.path());
    let fw = fixture(&temp);

    build_cached(fw.root(), &cache, false);
    fw.file("etc/added-later.conf", "new\n");
    let rebuilt = build_cached(fw.root(), &cache, true);

    assert!(!rebuilt.from_cache);
    assert!(rebuilt.snapshot.file("/etc/added-later.conf").is_some());
}

#[test]
fn test_partial_cache_triggers_rebuild() {
    let temp = TempDir::new().unwrap();
    let cache_dir = TempDir::new().unwrap();
    let cache = FileSnapshotCache::new(cache_dir.path());
    let fw = fixture(&temp);

    let fresh = build_cached(fw.root(), &cache, false);
    for path in cache_files(cache_dir.path(), "-packages.bin") {
        std::fs::remove_file(path).unwrap();
    }

    let rebuilt = build_cached(fw.root(), &cache, true);
    assert!(!rebuilt.from_cache);
    assert_eq!(rebuilt.snapshot, fresh.snapshot);
    assert_eq!(cache_files(cache_dir.path(), "-packages.bin").len(), 1);
}

#[test]
fn test_unwritable_cache_does_not_fail_build() {
    let temp = TempDir::new().unwrap();
    let blocker = TempDir::new().unwrap();
    let not_a_dir = blocker.path().join("cache-file");
    std::fs::write(&not_a_dir, "occupied").unwrap();
    let cache = FileSnapshotCache::new(&not_a_dir);
    let fw = fixture(&temp);

    let outcome = build_cached(fw.root(), &cache, true);

    assert!(!outcome.from_cache);
    assert_eq!(outcome.snapshot.board_id(), "VANT-6");
}
