//! Integration tests for symlink resolution on the host filesystem.
#![cfg(unix)]

mod common;

use std::sync::Arc;

use common::OsFixture;
use pathlib::{BoundPath, Error, MemFs, PathDefaults};

// Builds <root>/mnt/nfs/data/users/home/LandonTClipp and
// <root>/mnt/nfs/symlinks/, returning the final directory.
fn nfs_layout(fx: &OsFixture) -> BoundPath {
    let home = fx.path("mnt/nfs/data/users/home/LandonTClipp");
    home.mkdir_all(None).unwrap();
    fx.path("mnt/nfs/symlinks").mkdir_all(None).unwrap();
    home
}

#[test]
fn test_relative_link_chain() {
    let fx = OsFixture::new();
    let home = nfs_layout(&fx);
    fx.path("mnt/nfs/symlinks/home")
        .symlink_str("../data/users/home")
        .unwrap();
    fx.path("home").symlink_str("./mnt/nfs/symlinks/home").unwrap();

    let resolved = fx.path("home/LandonTClipp").resolve_all().unwrap();
    let expected = home.resolve_all().unwrap();
    assert_eq!(resolved.clean(), expected.clean());
    assert!(resolved.is_dir().unwrap());
}

#[test]
fn test_absolute_link_target() {
    let fx = OsFixture::new();
    nfs_layout(&fx);
    let data_home = fx.path("mnt/nfs/data/users/home");
    fx.path("mnt/nfs/symlinks/home").symlink(&data_home).unwrap();
    fx.path("home").symlink_str("./mnt/nfs/symlinks/home").unwrap();

    let resolved = fx.path("home/LandonTClipp").resolve_all().unwrap();
    assert_eq!(resolved.name(), "LandonTClipp");
    assert!(resolved.deep_equals(&data_home.join(["LandonTClipp"])).unwrap());
    assert!(!resolved.clean().to_string().contains("symlinks"));
}

#[test]
fn test_resolving_twice_is_stable() {
    let fx = OsFixture::new();
    nfs_layout(&fx);
    fx.path("home").symlink_str("mnt/nfs/data/users/home").unwrap();

    let once = fx.path("home/LandonTClipp").resolve_all().unwrap();
    let twice = once.resolve_all().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_link_cycle_reports_too_many_levels() {
    let fx = OsFixture::new();
    fx.path("ping").symlink_str("pong").unwrap();
    fx.path("pong").symlink_str("ping").unwrap();

    let start = fx.path("ping/x").with_defaults(PathDefaults {
        max_symlink_hops: Some(8),
        ..PathDefaults::default()
    });
    let err = start.resolve_all().unwrap_err();
    assert!(matches!(err.error(), Error::TooManyLevels { limit: 8, .. }));
    assert_eq!(err.path(), &start);
}

#[test]
fn test_missing_component_keeps_original_path() {
    let fx = OsFixture::new();
    let missing = fx.path("not/here");

    let err = missing.resolve_all().unwrap_err();
    assert!(err.error().is_not_found());
    let (path, _) = err.into_parts();
    assert_eq!(path, missing);
}

#[test]
fn test_resolving_without_link_support() {
    let path = BoundPath::new(Arc::new(MemFs::new()), ["/anything"]);
    let err: Error = path.resolve_all().unwrap_err().into();
    assert!(err.is_capability_unsupported());
}
