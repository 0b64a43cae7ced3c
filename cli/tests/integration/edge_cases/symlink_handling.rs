//! Symlink handling integration tests for ocp CLI.
//!
//! Default: links are followed and their targets materialized.
//! With `--preserve-symlinks`: links are recreated with the same target.
//! Links already at the destination are removed as links.

#![cfg(unix)]

use crate::common::TestFixture;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use tempfile::TempDir;

fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

#[test]
fn test_links_followed_by_default() {
    let fx = TestFixture::new();
    let outside = TempDir::new().unwrap();
    fs::write(outside.path().join("target.txt"), "target").unwrap();
    fs::create_dir(outside.path().join("tdir")).unwrap();
    fs::write(outside.path().join("tdir/inner.txt"), "inner").unwrap();

    symlink(outside.path().join("target.txt"), fx.src.path().join("file_link")).unwrap();
    symlink(outside.path().join("tdir"), fx.src.path().join("dir_link")).unwrap();

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    let dst = fx.dst.path();
    assert!(!is_symlink(&dst.join("file_link")));
    assert!(!is_symlink(&dst.join("dir_link")));
    fx.assert_file_content(&dst.join("file_link"), "target");
    fx.assert_file_content(&dst.join("dir_link/inner.txt"), "inner");
}

#[test]
fn test_links_preserved_with_flag() {
    let fx = TestFixture::new();
    fx.src_file("real.txt", "real");
    fx.src_file("sub/file.txt", "f");
    symlink("real.txt", fx.src.path().join("alias")).unwrap();
    symlink("../real.txt", fx.src.path().join("sub/up")).unwrap();
    symlink("does-not-exist", fx.src.path().join("dangling")).unwrap();

    cargo_bin_cmd!("ocp")
        .arg("--preserve-symlinks")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    let dst = fx.dst.path();
    assert_eq!(fs::read_link(dst.join("alias")).unwrap(), Path::new("real.txt"));
    assert_eq!(
        fs::read_link(dst.join("sub/up")).unwrap(),
        Path::new("../real.txt")
    );
    assert_eq!(
        fs::read_link(dst.join("dangling")).unwrap(),
        Path::new("does-not-exist")
    );
    fx.assert_file_content(&dst.join("alias"), "real");
}

#[test]
fn test_preserved_link_replaces_existing_file() {
    let fx = TestFixture::new();
    fx.src_file("real.txt", "real");
    symlink("real.txt", fx.src.path().join("alias")).unwrap();
    fx.dst_file("alias", "plain file");

    cargo_bin_cmd!("ocp")
        .arg("-P")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert!(is_symlink(&fx.dst.path().join("alias")));
}

#[test]
fn test_symlink_loop_reported() {
    let fx = TestFixture::new();
    fx.src_file("tree/a.txt", "a");
    symlink(fx.src.path().join("tree"), fx.src.path().join("tree/again")).unwrap();

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Symlink loop detected"));
}

#[test]
fn test_symlink_loop_preserved_without_error() {
    let fx = TestFixture::new();
    fx.src_file("tree/a.txt", "a");
    symlink("..", fx.src.path().join("tree/parent")).unwrap();

    cargo_bin_cmd!("ocp")
        .arg("-P")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert!(is_symlink(&fx.dst.path().join("tree/parent")));
}

#[test]
fn test_destination_link_removed_not_followed() {
    let fx = TestFixture::new();
    let elsewhere = TempDir::new().unwrap();
    fs::write(elsewhere.path().join("precious.txt"), "precious").unwrap();

    fx.src_file("d/new.txt", "new");
    symlink(elsewhere.path(), fx.dst.path().join("d")).unwrap();

    cargo_bin_cmd!("ocp")
        .arg(fx.src.path())
        .arg(fx.dst.path())
        .assert()
        .success();

    assert!(!is_symlink(&fx.dst.path().join("d")));
    fx.assert_file_content(&fx.dst.path().join("d/new.txt"), "new");
    fx.assert_file_content(&elsewhere.path().join("precious.txt"), "precious");
    assert!(!elsewhere.path().join("new.txt").exists());
}
