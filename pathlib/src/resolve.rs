//! Symlink resolution through the filesystem collaborator.
//!
//! The collaborator is not assumed to offer an atomic canonicalization call,
//! so every link is found and followed one component at a time:
//!
//! 1. Scan the path's prefixes left to right, lstat-ing each one.
//! 2. At the first symlink, read its target. An absolute target replaces the
//!    prefix; a relative one is joined onto the prefix's parent. The rest of
//!    the path is appended and the scan restarts.
//! 3. A full scan without a symlink is the fixed point.
//!
//! Each followed link counts as one hop. With a hop limit, a cyclic link
//! graph fails with [`Error::TooManyLevels`] instead of looping forever.

use crate::error::Error;
use crate::fs::{require_lstat, require_read_link};
use crate::path::{BoundPath, PurePath};

/// A failed resolution, carrying the unresolved input path.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pathlib::{BoundPath, MemFs};
///
/// let path = BoundPath::new(Arc::new(MemFs::new()), ["/a/b"]);
/// let err = path.resolve_all().unwrap_err();
/// assert_eq!(err.path(), &path);
/// assert!(err.error().is_capability_unsupported());
/// ```
#[derive(Debug, thiserror::Error)]
#[error("failed to resolve {path}: {source}")]
pub struct ResolveError {
    path: BoundPath,
    #[source]
    source: Error,
}

impl ResolveError {
    /// The path as it was before resolution started.
    #[must_use]
    pub fn path(&self) -> &BoundPath {
        &self.path
    }

    /// The cause.
    #[must_use]
    pub fn error(&self) -> &Error {
        &self.source
    }

    /// Splits into the unresolved path and the cause.
    #[must_use]
    pub fn into_parts(self) -> (BoundPath, Error) {
        (self.path, self.source)
    }
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        err.source
    }
}

/// Replaces every symlink component of `path` with its target.
///
/// `max_hops` caps the number of links followed; `None` removes the cap.
///
/// # Errors
///
/// Fails with [`Error::CapabilityUnsupported`] if the collaborator lacks
/// lstat or readlink, [`Error::TooManyLevels`] past the hop cap, or the first
/// I/O error met along the way. The error carries `path` unchanged.
pub fn resolve_all(path: &BoundPath, max_hops: Option<usize>) -> Result<BoundPath, ResolveError> {
    let fail = |source: Error| ResolveError {
        path: path.clone(),
        source,
    };
    let fs = path.fs().as_ref();
    let lstat = require_lstat(fs).map_err(fail)?;
    let reader = require_read_link(fs).map_err(fail)?;
    let flavor = path.flavor();

    let mut current = path.pure().clone();
    let mut hops = 0usize;

    'scan: loop {
        let parts = current.parts().to_vec();
        for i in 0..parts.len() {
            let component = PurePath::with_flavor(flavor, &parts[..=i]);
            let component_str = component.to_string();
            let meta = lstat
                .lstat(&component_str)
                .map_err(|e| fail(e.into()))?;
            if !meta.is_symlink() {
                continue;
            }

            if let Some(limit) = max_hops {
                if hops >= limit {
                    return Err(fail(Error::TooManyLevels {
                        path: path.to_string(),
                        limit,
                    }));
                }
            }
            hops += 1;

            let target = reader
                .read_link(&component_str)
                .map_err(|e| fail(e.into()))?;
            let target = PurePath::with_flavor(flavor, [target]);
            let rest = &parts[i + 1..];
            let next = if target.is_absolute() {
                target.join(rest)
            } else {
                component.parent().join_path([&target]).join(rest)
            };
            log::debug!("resolved link {component_str} -> {target}, continuing with {next}");

            current = next;
            continue 'scan;
        }
        return Ok(path.rebind(current));
    }
}
