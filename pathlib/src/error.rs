//! Error types for the pathlib library.
//!
//! This module provides the error hierarchy shared by the pure path algebra,
//! the filesystem-bound operations, the resolver, the walker and the
//! configuration layer, using `thiserror` for ergonomic error handling.

use std::fmt;
use std::io;

use thiserror::Error;

/// Result type alias for operations that may fail with a pathlib error.
///
/// # Examples
///
/// ```
/// use pathlib::{Error, Result};
///
/// fn example_operation() -> Result<usize> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// An optional filesystem capability.
///
/// Filesystem collaborators are only required to provide the basic
/// stat/open/list/mutate surface. These capabilities are negotiated at call
/// time and their absence is reported as [`Error::CapabilityUnsupported`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Symlink-aware stat that does not follow the final component.
    Lstat,
    /// Reading the target of a symlink.
    ReadLink,
    /// Creating a symlink.
    Symlink,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lstat => write!(f, "lstat"),
            Self::ReadLink => write!(f, "readlink"),
            Self::Symlink => write!(f, "symlink"),
        }
    }
}

/// The main error type for the pathlib library.
#[derive(Debug, Error)]
pub enum Error {
    /// A malformed argument was passed to a pure path operation.
    #[error("invalid operand for {operation}: {reason}")]
    InvalidOperand {
        /// The operation that rejected the argument.
        operation: &'static str,
        /// Why the argument was rejected.
        reason: String,
    },

    /// A path is not relative to the given base.
    #[error("{path:?} is not relative to {other:?}")]
    NotRelative {
        /// The path being made relative.
        path: String,
        /// The base it was compared against.
        other: String,
    },

    /// The filesystem collaborator lacks an optional capability.
    #[error("filesystem {filesystem} does not support {capability}")]
    CapabilityUnsupported {
        /// The missing capability.
        capability: Capability,
        /// Name of the filesystem implementation.
        filesystem: String,
    },

    /// An operation needed a non-empty directory listing.
    #[error("directory is empty: {path}")]
    EmptyCollection {
        /// The directory that was listed.
        path: String,
    },

    /// Symlink resolution followed more links than allowed.
    #[error("too many levels of symbolic links resolving {path} (limit {limit})")]
    TooManyLevels {
        /// The path being resolved.
        path: String,
        /// The configured hop limit.
        limit: usize,
    },

    /// A directory was required but something else was found.
    #[error("not a directory: {path}")]
    NotADirectory {
        /// The offending path.
        path: String,
    },

    /// A traversal order name was not recognized.
    #[error("unknown walk order '{name}' (expected preorder-flat or depth-first)")]
    InvalidWalkOrder {
        /// The unrecognized name.
        name: String,
    },

    /// A configuration value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A configuration file could not be parsed.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error reported by the filesystem collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A walk visitor failed with an error of its own.
    #[error("visitor failed: {source}")]
    Visitor {
        /// The visitor's error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Wraps an arbitrary error returned by a walk visitor.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathlib::Error;
    ///
    /// let err = Error::visitor(std::fmt::Error);
    /// assert!(err.to_string().contains("visitor failed"));
    /// ```
    pub fn visitor<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Visitor {
            source: Box::new(source),
        }
    }

    /// Check if error indicates a path does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathlib::Error;
    /// use std::io;
    ///
    /// let err = Error::Io(io::Error::new(io::ErrorKind::NotFound, "gone"));
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }

    /// Check if error reports a missing filesystem capability.
    #[must_use]
    pub fn is_capability_unsupported(&self) -> bool {
        matches!(self, Self::CapabilityUnsupported { .. })
    }

    pub(crate) fn invalid_operand(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOperand {
            operation,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_operand_error() {
        let err = Error::invalid_operand("with_suffix", "invalid suffix \"gz\"");
        let display = format!("{err}");
        assert!(display.contains("invalid operand"));
        assert!(display.contains("with_suffix"));
        assert!(display.contains("gz"));
    }

    #[test]
    fn test_not_relative_error() {
        let err = Error::NotRelative {
            path: "/a/b".to_string(),
            other: "/c".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("not relative"));
        assert!(display.contains("/a/b"));
        assert!(display.contains("/c"));
    }

    #[test]
    fn test_capability_unsupported_names_both_sides() {
        let err = Error::CapabilityUnsupported {
            capability: Capability::ReadLink,
            filesystem: "memfs".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("readlink"));
        assert!(display.contains("memfs"));
        assert!(err.is_capability_unsupported());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_empty_collection_error() {
        let err = Error::EmptyCollection {
            path: "/tmp/empty".to_string(),
        };
        assert!(format!("{err}").contains("/tmp/empty"));
    }

    #[test]
    fn test_too_many_levels_error() {
        let err = Error::TooManyLevels {
            path: "/loop".to_string(),
            limit: 40,
        };
        let display = format!("{err}");
        assert!(display.contains("too many levels"));
        assert!(display.contains("40"));
    }

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "PATHLIB_WALK_MAX_DEPTH".to_string(),
            message: "must be an integer".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("PATHLIB_WALK_MAX_DEPTH"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_visitor_error_keeps_source() {
        let err = Error::visitor(io::Error::new(io::ErrorKind::Other, "oh no"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "oh no");
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(Capability::Lstat.to_string(), "lstat");
        assert_eq!(Capability::ReadLink.to_string(), "readlink");
        assert_eq!(Capability::Symlink.to_string(), "symlink");
    }
}
