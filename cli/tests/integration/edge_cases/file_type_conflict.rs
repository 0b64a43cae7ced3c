//! File type conflict integration tests for ocp CLI.
//!
//! When a source entry and a destination entry share a name but differ in
//! type, the destination entry is removed and replaced. No error is raised.

use crate::common::TestFixture;
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;

/// Destination has a file where the source has a directory.
#[test]
fn test_file_replaced_by_directory() {
    let fx = TestFixture::new();
    fx.src_file("x/inside.txt", "inside");
    fx.src_file("x/nested/deep.txt", "deep");
    fx.dst_file("x", "i was a file");

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    let x = fx.dst.path().join("x");
    assert!(x.is_dir(), "File should be replaced by a directory");
    fx.assert_file_content(&x.join("inside.txt"), "inside");
    fx.assert_file_content(&x.join("nested/deep.txt"), "deep");
}

/// Destination has a non-empty directory where the source has a file.
#[test]
fn test_directory_replaced_by_file() {
    let fx = TestFixture::new();
    fx.src_file("x", "now a file");
    fx.dst_file("x/old/a.txt", "a");
    fx.dst_file("x/b.txt", "b");

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    let x = fx.dst.path().join("x");
    assert!(x.is_file(), "Directory should be replaced by a file");
    fx.assert_file_content(&x, "now a file");
}

/// Directory over directory replaces rather than merges.
#[test]
fn test_directory_replaced_not_merged() {
    let fx = TestFixture::new();
    fx.src_file("d/keep.txt", "from source");
    fx.dst_file("d/keep.txt", "stale");
    fx.dst_file("d/stale_only.txt", "stale");
    fx.dst_file("d/sub/stale.txt", "stale");

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    let d = fx.dst.path().join("d");
    fx.assert_file_content(&d.join("keep.txt"), "from source");
    assert!(!d.join("stale_only.txt").exists());
    assert!(!d.join("sub").exists());
    assert_eq!(fs::read_dir(&d).unwrap().count(), 1);
}

/// Several collisions of mixed types in one run.
#[test]
fn test_mixed_collisions() {
    let fx = TestFixture::new();
    fx.src_file("f_to_f", "1");
    fx.src_file("d_to_f", "2");
    fx.src_file("f_to_d/x.txt", "3");
    fx.dst_file("f_to_f", "old");
    fx.dst_file("d_to_f/inner.txt", "old");
    fx.dst_file("f_to_d", "old");
    fx.dst_file("untouched", "keep");

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    let dst = fx.dst.path();
    fx.assert_file_content(&dst.join("f_to_f"), "1");
    fx.assert_file_content(&dst.join("d_to_f"), "2");
    fx.assert_file_content(&dst.join("f_to_d/x.txt"), "3");
    fx.assert_file_content(&dst.join("untouched"), "keep");
}
