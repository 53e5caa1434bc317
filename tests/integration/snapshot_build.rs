use crate::integration::test_utils::{build, FirmwareFixture, BOARD};
use tch_compare::attribution::OwnershipPolicy;
use tch_compare::diagnostics::Diagnostic;
use tch_compare::error::{BoardError, IndexError, PackageError, SnapshotError};
use tch_compare::snapshot::{BuildOptions, SnapshotBuilder};
use tempfile::TempDir;

#[test]
fn test_board_and_version_from_tree() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");

    let outcome = build(fw.root());

    assert_eq!(outcome.snapshot.board_id(), "VANT-6");
    assert_eq!(outcome.snapshot.version(), "17.2.0188-elt");
    assert!(!outcome.from_cache);
}

#[test]
fn test_lower_case_board_is_upper_cased() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), "vbnt-s", "18.1.c.0514", "-1.0.3");

    let outcome = build(fw.root());

    assert_eq!(outcome.snapshot.board_id(), "VBNT-S");
    assert_eq!(outcome.snapshot.version(), "18.1.c.0514-1.0.3");
}

#[test]
fn test_suffix_falls_back_to_board_overlay_copy() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    std::fs::remove_file(fw.root().join("etc/config/versioncusto")).unwrap();
    fw.file(
        "etc/boards/VANT-6/config/etc/config/versioncusto",
        "config core 'override'\n\toption fwversion_suffix '-overlay'\n",
    );

    let outcome = build(fw.root());

    assert_eq!(outcome.snapshot.version(), "17.2.0188-overlay");
}

#[test]
fn test_packaged_files_carry_owner() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    fw.package("dropbear", "2017.75-7.1", 194, &["/usr/sbin/dropbear", "/etc/init.d/dropbear"])
        .file("etc/rc.local", "exit 0\n");

    let outcome = build(fw.root());
    let snapshot = &outcome.snapshot;

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(snapshot.file("/usr/sbin/dropbear").unwrap().owner(), Some("dropbear"));
    assert_eq!(snapshot.file("/etc/rc.local").unwrap().owner(), None);

    let dropbear = snapshot.package("dropbear").unwrap();
    assert_eq!(dropbear.version, "2017.75-7.1");
    assert_eq!(dropbear.installed_size, 194);
    assert_eq!(dropbear.description[0], "dropbear for tests");
    assert_eq!(dropbear.files.len(), 2);

    let unpackaged: Vec<&str> = snapshot.unpackaged().map(|e| e.path.as_str()).collect();
    assert!(unpackaged.contains(&"/etc/rc.local"));
    assert!(!unpackaged.contains(&"/usr/sbin/dropbear"));
}

#[test]
fn test_overlay_and_case_insensitive_resolution() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    fw.package_listing(
        "conf-overlay",
        "1.0",
        1,
        &[
            "/etc/custo/dropbear.conf",
            "/etc/boards/VANT-6/config/etc/wireless",
            "/etc/boards/VANT-F/config/etc/wireless",
            "/usr/share/README",
            "/init",
        ],
    )
    .file("etc/dropbear.conf", "port 22\n")
    .file("etc/wireless", "radio0\n")
    .file("usr/share/readme", "docs\n");

    let outcome = build(fw.root());
    let snapshot = &outcome.snapshot;

    assert!(outcome.diagnostics.is_empty(), "{:?}", outcome.diagnostics);
    for path in ["/etc/dropbear.conf", "/etc/wireless", "/usr/share/readme"] {
        assert_eq!(snapshot.file(path).unwrap().owner(), Some("conf-overlay"), "{}", path);
    }
}

#[test]
fn test_unresolved_package_file_is_diagnosed() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    fw.package_listing("ghost", "1", 0, &["/usr/bin/ghost"]);

    let outcome = build(fw.root());

    assert_eq!(
        outcome.diagnostics,
        vec![Diagnostic::UnresolvedPackageFile {
            package: "ghost".into(),
            path: "/usr/bin/ghost".into(),
        }]
    );
    assert_eq!(
        outcome.diagnostics[0].to_string(),
        "File /usr/bin/ghost from package ghost not found!"
    );
}

#[test]
fn test_reassignment_policy() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    fw.package("aaa", "1", 0, &["/usr/bin/shared"])
        .package_listing("zzz", "1", 0, &["/usr/bin/shared"]);

    let quiet = build(fw.root());
    assert!(quiet.diagnostics.is_empty());
    assert_eq!(quiet.snapshot.file("/usr/bin/shared").unwrap().owner(), Some("zzz"));

    let warned = SnapshotBuilder::new(fw.root().to_path_buf())
        .with_options(BuildOptions {
            persist_cache: false,
            ownership_policy: OwnershipPolicy::WarnOnReassign,
            ..Default::default()
        })
        .build()
        .unwrap();
    assert_eq!(
        warned.diagnostics,
        vec![Diagnostic::OwnershipReassigned {
            path: "/usr/bin/shared".into(),
            previous: "aaa".into(),
            package: "zzz".into(),
        }]
    );
    assert_eq!(warned.snapshot.file("/usr/bin/shared").unwrap().owner(), Some("zzz"));
}

#[test]
fn test_encoded_colon_is_decoded_in_keys() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    fw.file("etc/ssl/certs/host\u{F03A}443.pem", "cert\n");

    let outcome = build(fw.root());

    assert!(outcome.snapshot.file("/etc/ssl/certs/host:443.pem").is_some());
}

#[cfg(unix)]
#[test]
fn test_symlink_is_recorded_not_followed() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    fw.file("bin/busybox", "busybox\n").symlink("bin/sh", "busybox");

    let outcome = build(fw.root());
    let sh = outcome.snapshot.file("/bin/sh").unwrap();

    assert!(sh.is_symlink());
    assert_eq!(sh.symlink_target(), Some("busybox"));
    assert!(sh.content_digest().is_none());
}

#[test]
fn test_missing_board_in_name_is_fatal() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("firmware_17.2.0188");
    std::fs::create_dir_all(root.join("etc/config")).unwrap();

    let result = SnapshotBuilder::new(root).build();

    assert!(matches!(
        result,
        Err(SnapshotError::Board(BoardError::BoardNotFound(_)))
    ));
}

#[test]
fn test_missing_version_file_is_fatal() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    std::fs::remove_file(fw.root().join("etc/config/version")).unwrap();

    let result = SnapshotBuilder::new(fw.root().to_path_buf()).build();

    assert!(matches!(result, Err(SnapshotError::Board(BoardError::Io { .. }))));
}

#[test]
fn test_missing_list_file_is_fatal() {
    let temp = TempDir::new().unwrap();
    let fw = FirmwareFixture::new(temp.path(), BOARD, "17.2.0188", "-elt");
    fw.file(
        "usr/lib/opkg/info/orphan.control",
        "Package: orphan\nVersion: 1\n",
    );

    let result = SnapshotBuilder::new(fw.root().to_path_buf()).build();

    assert!(matches!(
        result,
        Err(SnapshotError::Package(PackageError::MissingList(_)))
    ));
}

#[test]
fn test_root_must_be_directory() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("VANT-6_17.2.0188.rbi");
    std::fs::write(&file, "not a tree").unwrap();

    let result = SnapshotBuilder::new(file).build();

    assert!(matches!(
        result,
        Err(SnapshotError::Index(IndexError::NotADirectory(_)))
    ));
}

#[cfg(unix)]
#[test]
fn test_symlinked_root_keeps_link_name() {
    let temp = TempDir::new().unwrap();
    let image = temp.path().join("store/image-0001");
    std::fs::create_dir_all(image.join("etc/config")).unwrap();
    std::fs::write(
        image.join("etc/config/version"),
        "\toption version '17.2.0188-2370004-20190409103520'\n",
    )
    .unwrap();
    std::fs::write(
        image.join("etc/config/versioncusto"),
        "\toption fwversion_suffix '-elt'\n",
    )
    .unwrap();
    std::fs::write(image.join("etc/rc.local"), "exit 0\n").unwrap();
    let link = temp.path().join("VANT-6_17.2.0188-elt");
    std::os::unix::fs::symlink(&image, &link).unwrap();

    let outcome = build(&link);

    assert_eq!(outcome.snapshot.board_id(), "VANT-6");
    assert_eq!(outcome.snapshot.version(), "17.2.0188-elt");
    assert!(outcome.snapshot.file("/etc/rc.local").is_some());
}
