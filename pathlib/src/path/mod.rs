//! Flavor-aware paths.
//!
//! # Key Concepts
//!
//! ## Normalized form
//!
//! Every path is stored as a `(drive, root, parts)` triple produced by
//! [`parse::parse_parts`]. If the path is anchored, `parts[0]` is the anchor
//! (`drive + root`) and the remaining parts are plain segments; empty and
//! `.` segments never survive parsing.
//!
//! ## Pure and bound paths
//!
//! - [`PurePath`]: lexical algebra only, never performs I/O.
//! - [`BoundPath`]: a pure path plus a shared filesystem handle, exposing
//!   the same algebra by delegation and an I/O surface on top.
//!
//! # Examples
//!
//! ```
//! use pathlib::PurePath;
//!
//! let p = PurePath::windows([r"C:\Users", "bob", "notes.txt"]);
//! assert_eq!(p.drive(), "C:");
//! assert_eq!(p.to_string(), r"C:\Users\bob\notes.txt");
//! assert_eq!(p.relative_to(&PurePath::windows(["c:/users"])).unwrap().to_string(), r"bob\notes.txt");
//! ```

pub mod bound;
pub mod normalize;
pub mod parse;
mod pure;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

pub use bound::{BoundPath, PathDefaults};
pub use pure::PurePath;
