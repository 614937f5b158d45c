#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # pathlib
//!
//! Flavor-aware path manipulation over pluggable filesystems.
//!
//! Paths are parsed under a POSIX or Windows [`Flavor`] into a normalized
//! `(drive, root, parts)` form. The pure algebra on that form never touches
//! a disk; binding a path to a [`FileSystem`] adds I/O, symlink resolution
//! and directory walking on top.
//!
//! ## Core Types
//!
//! - [`Flavor`]: separator, drive and case-folding rules
//! - [`PurePath`]: lexical path algebra
//! - [`BoundPath`] and [`PathDefaults`]: a path plus its filesystem
//! - [`FileSystem`], [`OsFs`] and [`MemFs`]: filesystem collaborators
//! - [`Walk`], [`WalkOptions`] and [`WalkOrder`]: directory traversal
//! - [`ConfigBuilder`] and [`Settings`]: layered configuration
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use pathlib::PurePath;
//!
//! let p = PurePath::posix(["/usr/lib", "python3.11/site.tar.gz"]);
//! assert_eq!(p.name(), "site.tar.gz");
//! assert_eq!(p.suffixes(), [".tar", ".gz"]);
//! assert_eq!(p.parent().to_string(), "/usr/lib/python3.11");
//! assert!(p.matches("lib/*/*.gz"));
//! ```
//!
//! Bound to an in-memory filesystem:
//!
//! ```
//! use std::sync::Arc;
//! use pathlib::{BoundPath, MemFs};
//!
//! let dir = BoundPath::new(Arc::new(MemFs::new()), ["/tmp/work"]);
//! dir.mkdir_all(None).unwrap();
//! dir.join(["a.txt"]).write_file(b"hello").unwrap();
//! assert!(dir.join(["a.txt"]).file_contains_bytes(b"ell").unwrap());
//! ```

pub mod config;
pub mod error;
pub mod flavor;
pub mod fs;
pub mod logging;
pub mod path;
pub mod resolve;
pub mod walk;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder, Settings};
pub use error::{Capability, Error, Result};
pub use flavor::Flavor;
pub use fs::{FileKind, FileSystem, MemFs, Metadata, OpenOptions, OsFs};
pub use logging::{init_logger, LogLevel, Logger};
pub use path::{BoundPath, PathDefaults, PurePath};
pub use resolve::ResolveError;
pub use walk::{Walk, WalkControl, WalkOptions, WalkOrder};
