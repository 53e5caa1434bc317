use crate::integration::test_utils::{build, FirmwareFixture, BOARD};
use tch_compare::diff::{render_text, DiffEngine, DiffOptions, FileChange, PackageChange, TextStyle};
use tch_compare::error::DiffError;
use tempfile::TempDir;

/// Two releases of the same board with one change of each kind
fn release_pair(temp: &TempDir) -> (FirmwareFixture, FirmwareFixture) {
    let prev = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    prev.package("bar", "1.0", 10, &["/usr/bin/bar"])
        .package("gone", "0.9", 5, &["/usr/bin/gone"])
        .package("steady", "2.0", 100, &["/usr/bin/steady"])
        .file("etc/foo.conf", "a\n")
        .file("etc/stale.txt", "not reported\n")
        .file("etc/boards/VANT-6/config/etc/old.conf", "board\n")
        .file("etc/boards/VANT-F/config/etc/other.conf", "other board\n");

    let crnt = FirmwareFixture::new(temp.path(), BOARD, "17.2.0261", "-elt");
    crnt.package("bar", "1.1", 12, &["/usr/bin/bar"])
        .package("foo", "3.1", 20, &["/usr/bin/foo"])
        .package("steady", "2.0", 140, &["/usr/bin/steady"])
        .file("etc/foo.conf", "b\n")
        .file("etc/new.conf", "fresh\n");

    (prev, crnt)
}

#[test]
fn test_release_pair_report() {
    let temp = TempDir::new().unwrap();
    let (prev, crnt) = release_pair(&temp);
    let a = build(prev.root()).snapshot;
    let b = build(crnt.root()).snapshot;

    let report = DiffEngine::new(DiffOptions::default()).compare(&a, &b).unwrap();

    assert_eq!(report.board_id, "VANT-6");
    assert_eq!(report.previous_version, "17.2.0188-elt");
    assert_eq!(report.current_version, "17.2.0261-elt");

    let packages: Vec<(&str, &str)> = report
        .packages
        .iter()
        .map(|change| {
            let kind = match change {
                PackageChange::Added { .. } => "added",
                PackageChange::VersionChanged { .. } => "changed",
                PackageChange::SizeChanged { .. } => "resized",
                PackageChange::Removed { .. } => "removed",
            };
            (kind, change.name())
        })
        .collect();
    assert_eq!(
        packages,
        vec![("added", "foo"), ("changed", "bar"), ("removed", "gone")]
    );

    assert_eq!(
        report.files,
        vec![
            FileChange::Changed {
                path: "/etc/foo.conf".into()
            },
            FileChange::Added {
                path: "/etc/new.conf".into()
            },
            FileChange::Removed {
                path: "/etc/boards/VANT-6/config/etc/old.conf".into()
            },
        ]
    );
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_argument_order_does_not_matter() {
    let temp = TempDir::new().unwrap();
    let (prev, crnt) = release_pair(&temp);
    let a = build(prev.root()).snapshot;
    let b = build(crnt.root()).snapshot;
    let engine = DiffEngine::new(DiffOptions::default());

    assert_eq!(engine.compare(&a, &b).unwrap(), engine.compare(&b, &a).unwrap());
}

#[test]
fn test_size_changes_reported_only_when_enabled() {
    let temp = TempDir::new().unwrap();
    let (prev, crnt) = release_pair(&temp);
    let a = build(prev.root()).snapshot;
    let b = build(crnt.root()).snapshot;

    let without = DiffEngine::new(DiffOptions::default()).compare(&a, &b).unwrap();
    assert!(without.packages.iter().all(|c| c.name() != "steady"));

    let with = DiffEngine::new(DiffOptions {
        include_size_changes: true,
    })
    .compare(&a, &b)
    .unwrap();
    assert!(with.packages.contains(&PackageChange::SizeChanged {
        name: "steady".into(),
        version: "2.0".into(),
        previous_size: 100,
        current_size: 140,
        description: vec!["steady for tests".into(), " second line of steady".into()],
    }));
}

#[test]
fn test_text_report_lines() {
    let temp = TempDir::new().unwrap();
    let (prev, crnt) = release_pair(&temp);
    let a = build(prev.root()).snapshot;
    let b = build(crnt.root()).snapshot;
    let report = DiffEngine::new(DiffOptions::default()).compare(&a, &b).unwrap();

    let text = render_text(&report, TextStyle::default());
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(
        lines[0],
        "Looking for changes between VANT-6 17.2.0188-elt and 17.2.0261-elt (Package installed size changes are excluded)..."
    );
    assert_eq!(lines[1], "+ ADDED Package foo 3.1");
    assert_eq!(lines[2], "           foo for tests");
    assert!(lines.contains(&"~ CHANGED Package bar 1.0 to Version 1.1"));
    assert!(lines.contains(&"- REMOVED Package gone 0.9"));
    assert!(lines.contains(&"~ CHANGED Unpackaged File /etc/foo.conf"));
    assert!(lines.contains(&"+ ADDED Unpackaged File /etc/new.conf"));
    assert_eq!(
        lines.last(),
        Some(&"- REMOVED Unpackaged File /etc/boards/VANT-6/config/etc/old.conf")
    );
    assert!(!text.contains("/etc/config/version"));
    assert!(!text.contains("/usr/lib/opkg"));
}

#[cfg(unix)]
#[test]
fn test_symlink_retarget_and_kind_change() {
    let temp = TempDir::new().unwrap();
    let prev = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    prev.symlink("etc/localtime", "/usr/share/zoneinfo/UTC")
        .file("etc/resolv.conf", "nameserver 1.1.1.1\n");
    let crnt = FirmwareFixture::new(temp.path(), BOARD, "17.2.0261", "-elt");
    crnt.symlink("etc/localtime", "/usr/share/zoneinfo/Europe/Paris")
        .symlink("etc/resolv.conf", "/tmp/resolv.conf");

    let a = build(prev.root()).snapshot;
    let b = build(crnt.root()).snapshot;
    let report = DiffEngine::new(DiffOptions::default()).compare(&a, &b).unwrap();

    assert_eq!(
        report.files,
        vec![FileChange::SymlinkChanged {
            path: "/etc/localtime".into()
        }]
    );
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].to_string(), "DIGEST is NULL for /etc/resolv.conf");
}

#[test]
fn test_identical_versions_refused() {
    let temp = TempDir::new().unwrap();
    let a = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    let other = TempDir::new().unwrap();
    let b = FirmwareFixture::new(other.path(), BOARD, "17.2.0188", "-elt");

    let result = DiffEngine::new(DiffOptions::default())
        .compare(&build(a.root()).snapshot, &build(b.root()).snapshot);

    match result {
        Err(e @ DiffError::IdenticalVersions { .. }) => assert_eq!(
            e.to_string(),
            "Firmware versions are identical! (17.2.0188-elt == 17.2.0188-elt)"
        ),
        unexpected => panic!("expected identical versions, got {:?}", unexpected),
    }
}

#[test]
fn test_different_boards_refused() {
    let temp = TempDir::new().unwrap();
    let a = FirmwareFixture::new(temp.path(), "VANT-6", "17.2.0188", "-elt");
    let b = FirmwareFixture::new(temp.path(), "VANT-F", "17.2.0261", "-elt");

    let result = DiffEngine::new(DiffOptions::default())
        .compare(&build(a.root()).snapshot, &build(b.root()).snapshot);

    assert!(matches!(result, Err(DiffError::BoardMismatch { .. })));
}
