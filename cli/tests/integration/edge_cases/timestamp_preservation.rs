//! Metadata preservation integration tests for ocp CLI.
//!
//! These tests verify that copied entries carry their source metadata:
//! - Modification time (mtime) of files, at any depth
//! - Permission bits of files and directories (Unix)
//! - `--no-times` / `--no-perms` opt-outs
//!
//! Timestamps are pinned to a fixed point in the past so that a copy which
//! drops them is detected without relying on sleeps.

use crate::common::TestFixture;
use assert_cmd::cargo::cargo_bin_cmd;
use filetime::FileTime;
use std::fs;
use std::path::Path;

const PAST: i64 = 1_000_000_000;

fn pin_mtime(path: &Path) {
    filetime::set_file_mtime(path, FileTime::from_unix_time(PAST, 0))
        .expect("Failed to set mtime");
}

fn mtime_secs(path: &Path) -> i64 {
    let meta = fs::metadata(path).expect("Failed to get metadata");
    FileTime::from_last_modification_time(&meta).unix_seconds()
}

#[test]
fn test_top_level_file_mtime_preserved() {
    let fx = TestFixture::new();
    fx.src_file("a.txt", "a");
    pin_mtime(&fx.src.path().join("a.txt"));

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert_eq!(mtime_secs(&fx.dst.path().join("a.txt")), PAST);
}

#[test]
fn test_nested_file_mtime_preserved() {
    let fx = TestFixture::new();
    fx.src_file("d/e/deep.txt", "deep");
    pin_mtime(&fx.src.path().join("d/e/deep.txt"));

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert_eq!(mtime_secs(&fx.dst.path().join("d/e/deep.txt")), PAST);
}

#[test]
fn test_directory_mtime_preserved() {
    let fx = TestFixture::new();
    fx.src_file("d/f.txt", "f");
    pin_mtime(&fx.src.path().join("d"));

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert_eq!(mtime_secs(&fx.dst.path().join("d")), PAST);
}

#[test]
fn test_no_times_uses_current_time() {
    let fx = TestFixture::new();
    fx.src_file("a.txt", "a");
    pin_mtime(&fx.src.path().join("a.txt"));

    cargo_bin_cmd!("ocp")
        .arg("--no-times")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert!(mtime_secs(&fx.dst.path().join("a.txt")) > PAST);
}

#[cfg(unix)]
#[test]
fn test_permissions_preserved() {
    use std::os::unix::fs::PermissionsExt;

    let fx = TestFixture::new();
    fx.src_file("run.sh", "#!/bin/sh\n");
    fx.src_file("private/notes.txt", "n");
    fs::set_permissions(
        fx.src.path().join("run.sh"),
        fs::Permissions::from_mode(0o751),
    )
    .unwrap();
    fs::set_permissions(
        fx.src.path().join("private"),
        fs::Permissions::from_mode(0o700),
    )
    .unwrap();

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode(&fx.dst.path().join("run.sh")), 0o751);
    assert_eq!(mode(&fx.dst.path().join("private")), 0o700);
}

#[cfg(unix)]
#[test]
fn test_no_perms_drops_execute_bits() {
    use std::os::unix::fs::PermissionsExt;

    let fx = TestFixture::new();
    fx.src_file("run.sh", "#!/bin/sh\n");
    fs::set_permissions(
        fx.src.path().join("run.sh"),
        fs::Permissions::from_mode(0o755),
    )
    .unwrap();

    cargo_bin_cmd!("ocp")
        .arg("--no-perms")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    let mode = fs::metadata(fx.dst.path().join("run.sh"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0, "Execute bits should not be copied");
}
