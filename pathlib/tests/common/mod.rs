//! Common test utilities for integration tests.
//!
//! This module provides fixture builders for trees on the host filesystem
//! (inside a `TempDir`) and on an in-memory filesystem.

use std::sync::Arc;

use pathlib::{BoundPath, MemFs, OsFs};
use tempfile::TempDir;

/// A temporary directory bound to the host filesystem.
///
/// The directory is removed when the fixture is dropped.
#[allow(dead_code)]
pub struct OsFixture {
    // Held for its Drop.
    _dir: TempDir,
    /// The fixture root.
    pub root: BoundPath,
}

#[allow(dead_code)]
impl OsFixture {
    /// Creates an empty fixture.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root_str = dir.path().to_str().unwrap().to_string();
        Self {
            root: BoundPath::new(Arc::new(OsFs::new()), [root_str]),
            _dir: dir,
        }
    }

    /// The path `rel` below the root.
    pub fn path(&self, rel: &str) -> BoundPath {
        self.root.join([rel])
    }
}

/// An empty in-memory filesystem with `/root` created.
#[allow(dead_code)]
pub fn mem_root() -> BoundPath {
    let root = BoundPath::new(Arc::new(MemFs::new()), ["/root"]);
    root.mkdir_all(None).unwrap();
    root
}

/// Writes `contents` to `rel` below `root`, creating parents.
#[allow(dead_code)]
pub fn write(root: &BoundPath, rel: &str, contents: &[u8]) -> BoundPath {
    let path = root.join([rel]);
    path.parent().mkdir_all(None).unwrap();
    path.write_file(contents).unwrap();
    path
}

/// Builds `file1.txt`, `file2.txt` and `subdir/{file3.txt,file4.txt}` under
/// `root`. Sizes are 1, 2, 3 and 4 bytes respectively.
#[allow(dead_code)]
pub fn two_files_at_root_two_in_subdir(root: &BoundPath) {
    write(root, "file1.txt", b"1");
    write(root, "file2.txt", b"22");
    write(root, "subdir/file3.txt", b"333");
    write(root, "subdir/file4.txt", b"4444");
}

/// Builds a three-level tree: `a/b/c/deep.txt` plus `a/top.txt`.
#[allow(dead_code)]
pub fn nested_tree(root: &BoundPath) {
    write(root, "a/top.txt", b"top");
    write(root, "a/b/c/deep.txt", b"deep");
}

/// Paths of `visited` relative to `root`, in POSIX form.
#[allow(dead_code)]
pub fn relative_names(root: &BoundPath, visited: &[BoundPath]) -> Vec<String> {
    visited
        .iter()
        .map(|p| p.relative_to(root).unwrap().as_posix())
        .collect()
}
