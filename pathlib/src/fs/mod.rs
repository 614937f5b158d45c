//! Filesystem collaborators.
//!
//! Bound paths never touch storage directly. Every I/O operation goes through
//! a [`FileSystem`] implementation, which provides a fixed set of required
//! primitives and may opt into the optional link capabilities by returning
//! `Some` from [`FileSystem::as_lstat`], [`FileSystem::as_read_link`] or
//! [`FileSystem::as_symlink`].
//!
//! Two implementations ship with the crate:
//!
//! - [`OsFs`]: the host filesystem via `std::fs`, with every capability.
//! - [`MemFs`]: an in-memory tree with the required primitives only.
//!
//! # Examples
//!
//! ```
//! use pathlib::fs::{FileSystem, MemFs};
//!
//! let fs = MemFs::new();
//! fs.mkdir_all("/a/b", 0o755).unwrap();
//! assert!(fs.stat("/a/b").unwrap().is_dir());
//! assert!(fs.as_read_link().is_none());
//! ```

pub mod mem;
pub mod os;

use std::fmt;
use std::io::{self, Read, Seek, Write};
use std::time::SystemTime;

use crate::error::{Capability, Error, Result};

pub use mem::MemFs;
pub use os::OsFs;

/// The kind of a filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// A regular file.
    File,
    /// A directory.
    Dir,
    /// A symbolic link (only reported by lstat).
    Symlink,
    /// Anything else: sockets, devices, pipes.
    Other,
}

/// The subset of entry metadata the crate relies on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    kind: FileKind,
    size: u64,
    mode: u32,
    modified: SystemTime,
}

impl Metadata {
    /// Creates metadata from its parts.
    #[must_use]
    pub const fn new(kind: FileKind, size: u64, mode: u32, modified: SystemTime) -> Self {
        Self {
            kind,
            size,
            mode,
            modified,
        }
    }

    /// The entry kind.
    #[must_use]
    pub const fn kind(&self) -> FileKind {
        self.kind
    }

    /// Size in bytes.
    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Permission bits.
    #[must_use]
    pub const fn mode(&self) -> u32 {
        self.mode
    }

    /// Last modification time.
    #[must_use]
    pub const fn modified(&self) -> SystemTime {
        self.modified
    }

    /// Whether the entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == FileKind::File
    }

    /// Whether the entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == FileKind::Dir
    }

    /// Whether the entry is a symbolic link.
    #[must_use]
    pub fn is_symlink(&self) -> bool {
        self.kind == FileKind::Symlink
    }
}

/// How a file should be opened.
///
/// # Examples
///
/// ```
/// use pathlib::fs::OpenOptions;
///
/// let opts = OpenOptions::new().read(true).write(true).create(true);
/// assert!(opts.is_write());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct OpenOptions {
    read: bool,
    write: bool,
    append: bool,
    truncate: bool,
    create: bool,
    create_new: bool,
}

impl OpenOptions {
    /// All flags off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            read: false,
            write: false,
            append: false,
            truncate: false,
            create: false,
            create_new: false,
        }
    }

    /// Read-only access.
    #[must_use]
    pub const fn read_only() -> Self {
        Self::new().read(true)
    }

    /// Write access, creating or truncating the file.
    #[must_use]
    pub const fn write_truncate() -> Self {
        Self::new().write(true).create(true).truncate(true)
    }

    /// Sets read access.
    #[must_use]
    pub const fn read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    /// Sets write access.
    #[must_use]
    pub const fn write(mut self, write: bool) -> Self {
        self.write = write;
        self
    }

    /// Sets append mode; implies write access.
    #[must_use]
    pub const fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// Truncates an existing file on open.
    #[must_use]
    pub const fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    /// Creates the file if missing.
    #[must_use]
    pub const fn create(mut self, create: bool) -> Self {
        self.create = create;
        self
    }

    /// Creates the file, failing if it already exists.
    #[must_use]
    pub const fn create_new(mut self, create_new: bool) -> Self {
        self.create_new = create_new;
        self
    }

    /// Whether read access was requested.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.read
    }

    /// Whether any form of write access was requested.
    #[must_use]
    pub const fn is_write(&self) -> bool {
        self.write || self.append
    }

    /// Whether append mode was requested.
    #[must_use]
    pub const fn is_append(&self) -> bool {
        self.append
    }

    /// Whether truncation was requested.
    #[must_use]
    pub const fn is_truncate(&self) -> bool {
        self.truncate
    }

    /// Whether creation of a missing file was requested.
    #[must_use]
    pub const fn is_create(&self) -> bool {
        self.create
    }

    /// Whether exclusive creation was requested.
    #[must_use]
    pub const fn is_create_new(&self) -> bool {
        self.create_new
    }
}

/// An open file returned by [`FileSystem::open`].
pub trait FileHandle: Read + Write + Seek + fmt::Debug + Send {}

impl<T: Read + Write + Seek + fmt::Debug + Send> FileHandle for T {}

/// The required filesystem primitives.
///
/// Paths are passed as strings in the flavor of the bound path making the
/// call. Errors are plain [`io::Error`]s and are surfaced unchanged.
pub trait FileSystem: fmt::Debug + Send + Sync {
    /// A short name identifying the implementation in error messages.
    fn name(&self) -> &str;

    /// Metadata for `path`, following symlinks.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist or cannot be inspected.
    fn stat(&self, path: &str) -> io::Result<Metadata>;

    /// Opens `path`; `mode` applies when the file is created.
    ///
    /// # Errors
    ///
    /// Fails per `options` (missing file without create, existing file with
    /// create-new) or on any underlying I/O error.
    fn open(&self, path: &str, options: &OpenOptions, mode: u32) -> io::Result<Box<dyn FileHandle>>;

    /// Names of the entries of directory `path`, sorted, without stats.
    ///
    /// # Errors
    ///
    /// Fails if `path` is not a readable directory.
    fn read_dir_names(&self, path: &str) -> io::Result<Vec<String>>;

    /// Removes a file or empty directory.
    ///
    /// # Errors
    ///
    /// Fails if `path` is missing or is a non-empty directory.
    fn remove(&self, path: &str) -> io::Result<()>;

    /// Removes `path` and everything below it. A missing path is not an error.
    ///
    /// # Errors
    ///
    /// Fails on any underlying I/O error.
    fn remove_all(&self, path: &str) -> io::Result<()>;

    /// Moves `from` to `to`.
    ///
    /// # Errors
    ///
    /// Fails if `from` is missing or `to` cannot be replaced.
    fn rename(&self, from: &str, to: &str) -> io::Result<()>;

    /// Sets permission bits.
    ///
    /// # Errors
    ///
    /// Fails if `path` is missing.
    fn chmod(&self, path: &str, mode: u32) -> io::Result<()>;

    /// Sets access and modification times.
    ///
    /// # Errors
    ///
    /// Fails if `path` is missing.
    fn chtimes(&self, path: &str, accessed: SystemTime, modified: SystemTime) -> io::Result<()>;

    /// Creates a single directory.
    ///
    /// # Errors
    ///
    /// Fails if the parent is missing or `path` already exists.
    fn mkdir(&self, path: &str, mode: u32) -> io::Result<()>;

    /// Creates a directory and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Fails if an ancestor exists and is not a directory.
    fn mkdir_all(&self, path: &str, mode: u32) -> io::Result<()>;

    /// The lstat capability, if supported.
    fn as_lstat(&self) -> Option<&dyn Lstat> {
        None
    }

    /// The readlink capability, if supported.
    fn as_read_link(&self) -> Option<&dyn ReadLink> {
        None
    }

    /// The symlink-creation capability, if supported.
    fn as_symlink(&self) -> Option<&dyn Symlink> {
        None
    }
}

/// Stat without following a final symlink.
pub trait Lstat {
    /// Metadata for `path` itself.
    ///
    /// # Errors
    ///
    /// Fails if `path` does not exist.
    fn lstat(&self, path: &str) -> io::Result<Metadata>;
}

/// Reading symlink targets.
pub trait ReadLink {
    /// The target stored in link `path`, verbatim.
    ///
    /// # Errors
    ///
    /// Fails if `path` is missing or not a symlink.
    fn read_link(&self, path: &str) -> io::Result<String>;
}

/// Creating symlinks.
pub trait Symlink {
    /// Creates `link` pointing at `target`.
    ///
    /// # Errors
    ///
    /// Fails if `link` already exists or its parent is missing.
    fn symlink(&self, target: &str, link: &str) -> io::Result<()>;
}

pub(crate) fn require_lstat(fs: &dyn FileSystem) -> Result<&dyn Lstat> {
    fs.as_lstat().ok_or_else(|| unsupported(fs, Capability::Lstat))
}

pub(crate) fn require_read_link(fs: &dyn FileSystem) -> Result<&dyn ReadLink> {
    fs.as_read_link().ok_or_else(|| unsupported(fs, Capability::ReadLink))
}

pub(crate) fn require_symlink(fs: &dyn FileSystem) -> Result<&dyn Symlink> {
    fs.as_symlink().ok_or_else(|| unsupported(fs, Capability::Symlink))
}

fn unsupported(fs: &dyn FileSystem, capability: Capability) -> Error {
    Error::CapabilityUnsupported {
        capability,
        filesystem: fs.name().to_string(),
    }
}
