//! Directory traversal.
//!
//! A [`Walk`] visits every entry below a root directory, in one of two
//! orders, passing each entry through the query gate of [`WalkOptions`]
//! before handing it to a visitor.
//!
//! The visitor steers the traversal through its return value:
//!
//! - `Ok(WalkControl::Continue)` keeps going.
//! - `Ok(WalkControl::Stop)` ends the walk early; `walk` still returns `Ok`.
//! - `Err(e)` ends the walk and `walk` returns `e` unchanged.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use pathlib::{BoundPath, MemFs, Walk, WalkControl};
//!
//! let root = BoundPath::new(Arc::new(MemFs::new()), ["/project"]);
//! root.join(["src"]).mkdir_all(None).unwrap();
//! root.join(["src", "main.rs"]).write_file(b"fn main() {}").unwrap();
//!
//! let mut seen = Vec::new();
//! Walk::new(root).walk(|entry, _meta| {
//!     seen.push(entry.name().to_string());
//!     Ok(WalkControl::Continue)
//! }).unwrap();
//! assert_eq!(seen, ["src", "main.rs"]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::fs::{Lstat, Metadata};
use crate::path::BoundPath;

/// The order in which entries are visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WalkOrder {
    /// All entries of a directory, then each subdirectory in turn.
    #[default]
    PreorderFlat,
    /// Each subdirectory's contents are visited before the subdirectory
    /// itself and before the next sibling.
    DepthFirst,
}

impl fmt::Display for WalkOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreorderFlat => write!(f, "preorder-flat"),
            Self::DepthFirst => write!(f, "depth-first"),
        }
    }
}

impl FromStr for WalkOrder {
    type Err = Error;

    /// Parses `preorder-flat` or `depth-first`, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "preorder-flat" => Ok(Self::PreorderFlat),
            "depth-first" => Ok(Self::DepthFirst),
            _ => Err(Error::InvalidWalkOrder {
                name: s.to_string(),
            }),
        }
    }
}

/// What the visitor wants the walk to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkControl {
    /// Keep walking.
    Continue,
    /// End the walk successfully.
    Stop,
}

/// Traversal limits and the query gate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct WalkOptions {
    /// How deep to descend; `Some(0)` lists the root's children only.
    pub max_depth: Option<usize>,
    /// Visiting order.
    pub order: WalkOrder,
    /// Descend into symlinks that point at directories.
    pub follow_symlinks: bool,
    /// Smallest file size visited, inclusive.
    pub min_size: Option<u64>,
    /// Largest file size visited, inclusive.
    pub max_size: Option<u64>,
    /// Visit regular files.
    pub visit_files: bool,
    /// Visit directories.
    pub visit_dirs: bool,
    /// Visit symlinks.
    pub visit_symlinks: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            order: WalkOrder::PreorderFlat,
            follow_symlinks: false,
            min_size: None,
            max_size: None,
            visit_files: true,
            visit_dirs: true,
            visit_symlinks: true,
        }
    }
}

impl WalkOptions {
    /// Whether an entry with `meta` passes the query gate.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::SystemTime;
    /// use pathlib::{FileKind, Metadata, WalkOptions};
    ///
    /// let big = Metadata::new(FileKind::File, 4096, 0o644, SystemTime::UNIX_EPOCH);
    /// let opts = WalkOptions { max_size: Some(1024), ..WalkOptions::default() };
    /// assert!(!opts.admits(&big));
    /// ```
    #[must_use]
    pub fn admits(&self, meta: &Metadata) -> bool {
        if meta.is_file() {
            self.visit_files
                && self.min_size.map_or(true, |min| meta.size() >= min)
                && self.max_size.map_or(true, |max| meta.size() <= max)
        } else if meta.is_dir() {
            self.visit_dirs
        } else if meta.is_symlink() {
            self.visit_symlinks
        } else {
            true
        }
    }

    /// Checks the options for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `min_size` exceeds `max_size`.
    pub fn validate(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(Error::Validation {
                    field: "min_size".into(),
                    message: format!("minimum size {min} exceeds maximum size {max}"),
                });
            }
        }
        Ok(())
    }

    fn may_descend_from(&self, depth: usize) -> bool {
        self.max_depth.map_or(true, |max| depth < max)
    }
}

/// A configured traversal rooted at a directory.
#[derive(Debug, Clone)]
pub struct Walk {
    root: BoundPath,
    options: WalkOptions,
}

impl Walk {
    /// A walk over `root` with default options.
    #[must_use]
    pub fn new(root: BoundPath) -> Self {
        Self::with_options(root, WalkOptions::default())
    }

    /// A walk over `root` with explicit options.
    #[must_use]
    pub fn with_options(root: BoundPath, options: WalkOptions) -> Self {
        Self { root, options }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &BoundPath {
        &self.root
    }

    /// The options in effect.
    #[must_use]
    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Mutable access to the options, for adjusting before a walk.
    pub fn options_mut(&mut self) -> &mut WalkOptions {
        &mut self.options
    }

    /// Visits every admitted entry below the root. The root itself is not
    /// visited.
    ///
    /// # Errors
    ///
    /// Fails before any visit if the options are invalid or the root is not
    /// a directory. Afterwards, the first listing or stat error or visitor
    /// error ends the walk and is returned.
    pub fn walk<F>(&self, mut visitor: F) -> Result<()>
    where
        F: FnMut(&BoundPath, &Metadata) -> Result<WalkControl>,
    {
        self.options.validate()?;
        if !self.root.stat()?.is_dir() {
            return Err(Error::NotADirectory {
                path: self.root.to_string(),
            });
        }

        let mut walker = Walker {
            options: &self.options,
            visitor: &mut visitor,
            lstat: self.root.fs().as_lstat(),
            ancestors: Vec::new(),
        };
        log::debug!("walking {} ({})", self.root, self.options.order);
        walker.descend(&self.root, 0)?;
        Ok(())
    }
}

struct Walker<'w, F> {
    options: &'w WalkOptions,
    visitor: &'w mut F,
    lstat: Option<&'w dyn Lstat>,
    // Resolved directories on the current descent, tracked only while
    // following symlinks.
    ancestors: Vec<String>,
}

impl<F> Walker<'_, F>
where
    F: FnMut(&BoundPath, &Metadata) -> Result<WalkControl>,
{
    fn descend(&mut self, dir: &BoundPath, depth: usize) -> Result<WalkControl> {
        let key = if self.options.follow_symlinks {
            match dir.resolve_all() {
                Ok(resolved) => {
                    let key = resolved.clean().to_string();
                    if self.ancestors.contains(&key) {
                        log::debug!("not descending into {dir}: it loops back to {key}");
                        return Ok(WalkControl::Continue);
                    }
                    Some(key)
                }
                Err(err) => {
                    log::debug!("loop guard off below {dir}: {err}");
                    None
                }
            }
        } else {
            None
        };

        let pushed = key.is_some();
        if let Some(key) = key {
            self.ancestors.push(key);
        }
        let flow = match self.options.order {
            WalkOrder::PreorderFlat => self.preorder_flat(dir, depth),
            WalkOrder::DepthFirst => self.depth_first(dir, depth),
        };
        if pushed {
            self.ancestors.pop();
        }
        flow
    }

    fn preorder_flat(&mut self, dir: &BoundPath, depth: usize) -> Result<WalkControl> {
        let mut subdirs = Vec::new();
        for (entry, meta) in self.entries(dir)? {
            if self.options.admits(&meta) && (self.visitor)(&entry, &meta)? == WalkControl::Stop {
                return Ok(WalkControl::Stop);
            }
            if self.options.may_descend_from(depth) && self.is_traversable(&entry, &meta) {
                subdirs.push(entry);
            }
        }
        for subdir in subdirs {
            if self.descend(&subdir, depth + 1)? == WalkControl::Stop {
                return Ok(WalkControl::Stop);
            }
        }
        Ok(WalkControl::Continue)
    }

    fn depth_first(&mut self, dir: &BoundPath, depth: usize) -> Result<WalkControl> {
        for (entry, meta) in self.entries(dir)? {
            if self.options.may_descend_from(depth)
                && self.is_traversable(&entry, &meta)
                && self.descend(&entry, depth + 1)? == WalkControl::Stop
            {
                return Ok(WalkControl::Stop);
            }
            if self.options.admits(&meta) && (self.visitor)(&entry, &meta)? == WalkControl::Stop {
                return Ok(WalkControl::Stop);
            }
        }
        Ok(WalkControl::Continue)
    }

    // Lists `dir` and classifies each entry, dropping entries that vanish
    // between the listing and the stat.
    fn entries(&self, dir: &BoundPath) -> Result<Vec<(BoundPath, Metadata)>> {
        let listing = match dir.read_dir() {
            Ok(listing) => listing,
            Err(e) if e.is_not_found() => {
                log::debug!("{dir} vanished before it could be listed");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let mut entries = Vec::with_capacity(listing.len());
        for entry in listing {
            let path = entry.to_string();
            let meta = match self.lstat {
                Some(lstat) => lstat.lstat(&path),
                None => entry.fs().stat(&path),
            };
            match meta {
                Ok(meta) => entries.push((entry, meta)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    log::debug!("skipping {path}: vanished during the walk");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(entries)
    }

    fn is_traversable(&self, entry: &BoundPath, meta: &Metadata) -> bool {
        if meta.is_dir() {
            return true;
        }
        self.options.follow_symlinks
            && meta.is_symlink()
            && entry.stat().is_ok_and(|target| target.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileKind;
    use std::time::SystemTime;

    fn meta(kind: FileKind, size: u64) -> Metadata {
        Metadata::new(kind, size, 0o644, SystemTime::UNIX_EPOCH)
    }

    #[test]
    fn test_default_walk_options() {
        let opts = WalkOptions::default();
        assert_eq!(opts.max_depth, None);
        assert_eq!(opts.order, WalkOrder::PreorderFlat);
        assert!(!opts.follow_symlinks);
        assert_eq!(opts.min_size, None);
        assert_eq!(opts.max_size, None);
        assert!(opts.visit_files);
        assert!(opts.visit_dirs);
        assert!(opts.visit_symlinks);
    }

    #[test]
    fn test_query_gate_files() {
        let file = meta(FileKind::File, 5);
        let mut opts = WalkOptions {
            visit_files: false,
            ..WalkOptions::default()
        };
        assert!(!opts.admits(&file));

        opts.visit_files = true;
        assert!(opts.admits(&file));

        opts.min_size = Some(100);
        assert!(!opts.admits(&file));

        opts.min_size = Some(0);
        assert!(opts.admits(&file));

        opts.max_size = Some(5);
        assert!(opts.admits(&file));

        opts.max_size = Some(4);
        assert!(!opts.admits(&file));
    }

    #[test]
    fn test_query_gate_dirs_and_symlinks() {
        let dir = meta(FileKind::Dir, 4096);
        let link = meta(FileKind::Symlink, 10);
        let mut opts = WalkOptions {
            min_size: Some(1_000_000),
            ..WalkOptions::default()
        };
        // size bounds only apply to files
        assert!(opts.admits(&dir));
        assert!(opts.admits(&link));

        opts.visit_dirs = false;
        opts.visit_symlinks = false;
        assert!(!opts.admits(&dir));
        assert!(!opts.admits(&link));
        assert!(opts.admits(&meta(FileKind::Other, 0)));
    }

    #[test]
    fn test_walk_order_parse() {
        assert_eq!("preorder-flat".parse::<WalkOrder>().unwrap(), WalkOrder::PreorderFlat);
        assert_eq!("Depth-First".parse::<WalkOrder>().unwrap(), WalkOrder::DepthFirst);
        let err = "confused-wandering".parse::<WalkOrder>().unwrap_err();
        assert!(matches!(err, Error::InvalidWalkOrder { ref name } if name == "confused-wandering"));
        assert_eq!(WalkOrder::DepthFirst.to_string(), "depth-first");
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let opts = WalkOptions {
            min_size: Some(10),
            max_size: Some(1),
            ..WalkOptions::default()
        };
        assert!(matches!(opts.validate(), Err(Error::Validation { .. })));
        assert!(WalkOptions::default().validate().is_ok());
    }

    #[test]
    fn test_depth_limit() {
        let opts = WalkOptions {
            max_depth: Some(0),
            ..WalkOptions::default()
        };
        assert!(!opts.may_descend_from(0));
        assert!(WalkOptions::default().may_descend_from(1000));
    }
}
