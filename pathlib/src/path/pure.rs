//! Pure paths: lexical manipulation without I/O.

use std::borrow::Cow;
use std::fmt;

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};
use crate::flavor::Flavor;
use crate::path::normalize::resolve_components;
use crate::path::parse::{parse_parts, ParsedParts};

const SEGMENT_MATCH: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A path decomposed into drive, root and segments under a [`Flavor`].
///
/// Every operation returns a new value; a `PurePath` is never modified in
/// place.
///
/// # Examples
///
/// ```
/// use pathlib::PurePath;
///
/// let p = PurePath::posix(["/usr", "lib//", "./libc.so.6"]);
/// assert_eq!(p.to_string(), "/usr/lib/libc.so.6");
/// assert_eq!(p.name(), "libc.so.6");
/// assert_eq!(p.suffixes(), [".so", ".6"]);
/// assert_eq!(p.parent().to_string(), "/usr/lib");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PurePath {
    drive: String,
    root: String,
    parts: Vec<String>,
    flavor: Flavor,
}

impl PurePath {
    /// Builds a path of the platform's native flavor.
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_flavor(Flavor::native(), inputs)
    }

    /// Builds a POSIX-flavored path.
    pub fn posix<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_flavor(Flavor::Posix, inputs)
    }

    /// Builds a Windows-flavored path.
    pub fn windows<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_flavor(Flavor::Windows, inputs)
    }

    /// Builds a path of the given flavor.
    pub fn with_flavor<I, S>(flavor: Flavor, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_parsed(flavor, parse_parts(inputs, flavor))
    }

    /// The empty path, which displays as `.`.
    #[must_use]
    pub fn empty(flavor: Flavor) -> Self {
        Self::from_parts(flavor, String::new(), String::new(), Vec::new())
    }

    pub(crate) fn from_parsed(flavor: Flavor, parsed: ParsedParts) -> Self {
        Self::from_parts(flavor, parsed.drive, parsed.root, parsed.parts)
    }

    pub(crate) fn from_parts(flavor: Flavor, drive: String, root: String, parts: Vec<String>) -> Self {
        Self {
            drive,
            root,
            parts,
            flavor,
        }
    }

    /// The flavor governing this path.
    #[must_use]
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// The drive prefix (letter, UNC share or extended prefix), or `""`.
    #[must_use]
    pub fn drive(&self) -> &str {
        &self.drive
    }

    /// The root, or `""`.
    #[must_use]
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Drive and root concatenated.
    #[must_use]
    pub fn anchor(&self) -> String {
        format!("{}{}", self.drive, self.root)
    }

    /// The anchor (if any) followed by each plain segment.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Whether the path has a drive or a root.
    #[must_use]
    pub fn is_anchored(&self) -> bool {
        !self.drive.is_empty() || !self.root.is_empty()
    }

    /// Whether the path is absolute: it has a root and, for flavors with
    /// drives, a drive as well.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        !self.root.is_empty() && (!self.flavor.has_drive() || !self.drive.is_empty())
    }

    /// The string form with every separator replaced by `/`.
    #[must_use]
    pub fn as_posix(&self) -> String {
        self.to_string().replace(self.flavor.separator(), "/")
    }

    /// The final segment, or `""` for empty and anchor-only paths.
    #[must_use]
    pub fn name(&self) -> &str {
        if self.parts.is_empty() || (self.is_anchored() && self.parts.len() == 1) {
            return "";
        }
        self.parts.last().map_or("", String::as_str)
    }

    /// The final suffix of the name including its dot, or `""`.
    ///
    /// Leading dots (dotfiles) and trailing dots do not start a suffix.
    #[must_use]
    pub fn suffix(&self) -> &str {
        let name = self.name();
        match suffix_start(name) {
            Some(i) => &name[i..],
            None => "",
        }
    }

    /// Every suffix of the name, in order.
    #[must_use]
    pub fn suffixes(&self) -> Vec<String> {
        let name = self.name();
        if name.ends_with('.') {
            return Vec::new();
        }
        let name = name.strip_prefix('.').unwrap_or(name);
        name.split('.').skip(1).map(|s| format!(".{s}")).collect()
    }

    /// The name without its final suffix.
    #[must_use]
    pub fn stem(&self) -> &str {
        let name = self.name();
        match suffix_start(name) {
            Some(i) => &name[..i],
            None => name,
        }
    }

    /// Returns a path with the final segment replaced by `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperand`] if this path has no name, or if
    /// `name` is empty, ends in a separator, carries a drive or root, or
    /// spans more than one segment.
    pub fn with_name(&self, name: &str) -> Result<Self> {
        if self.name().is_empty() {
            return Err(Error::invalid_operand(
                "with_name",
                format!("'{self}' has an empty name"),
            ));
        }
        let parsed = parse_parts([name], self.flavor);
        let ends_with_sep = name.chars().last().is_some_and(|c| self.flavor.is_separator(c));
        if name.is_empty()
            || ends_with_sep
            || !parsed.drive.is_empty()
            || !parsed.root.is_empty()
            || parsed.parts.len() != 1
        {
            return Err(Error::invalid_operand(
                "with_name",
                format!("invalid name {name:?}"),
            ));
        }
        let mut parts = self.parts.clone();
        if let (Some(last), Some(segment)) = (parts.last_mut(), parsed.parts.into_iter().next()) {
            *last = segment;
        }
        Ok(self.with_same_anchor(parts))
    }

    /// Returns a path with the stem replaced, keeping the suffix.
    ///
    /// # Errors
    ///
    /// Fails like [`PurePath::with_name`].
    pub fn with_stem(&self, stem: &str) -> Result<Self> {
        self.with_name(&format!("{stem}{}", self.suffix()))
    }

    /// Returns a path with the suffix replaced, added, or (for `""`) removed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperand`] if `suffix` is non-empty and does
    /// not start with a dot, is a lone dot, contains a separator, or if this
    /// path has no name.
    pub fn with_suffix(&self, suffix: &str) -> Result<Self> {
        let malformed = !suffix.is_empty() && (!suffix.starts_with('.') || suffix == ".");
        if malformed || suffix.chars().any(|c| self.flavor.is_separator(c)) {
            return Err(Error::invalid_operand(
                "with_suffix",
                format!("invalid suffix {suffix:?}"),
            ));
        }
        let name = self.name();
        if name.is_empty() {
            return Err(Error::invalid_operand(
                "with_suffix",
                format!("'{self}' has an empty name"),
            ));
        }
        let old = self.suffix();
        let name = format!("{}{suffix}", &name[..name.len() - old.len()]);
        let mut parts = self.parts.clone();
        if let Some(last) = parts.last_mut() {
            *last = name;
        }
        Ok(self.with_same_anchor(parts))
    }

    /// Re-parses this path followed by `others`; any anchored argument
    /// re-anchors the result.
    #[must_use]
    pub fn join<I, S>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let head = self.to_string();
        let inputs = std::iter::once(Cow::Borrowed(head.as_str()))
            .chain(others.into_iter().map(|s| Cow::Owned(s.as_ref().to_string())));
        Self::with_flavor(self.flavor, inputs)
    }

    /// Like [`PurePath::join`] with path arguments.
    #[must_use]
    pub fn join_path<'a, I>(&self, others: I) -> Self
    where
        I: IntoIterator<Item = &'a PurePath>,
    {
        self.join(others.into_iter().map(ToString::to_string))
    }

    /// The logical parent. Anchor-only and empty paths are their own parent.
    #[must_use]
    pub fn parent(&self) -> Self {
        match self.parts.len() {
            0 => Self::empty(self.flavor),
            1 if self.is_anchored() => self.clone(),
            n => self.with_same_anchor(self.parts[..n - 1].to_vec()),
        }
    }

    /// Every strict ancestor, nearest first.
    #[must_use]
    pub fn parents(&self) -> Vec<Self> {
        let len = self.parts.len();
        let floor = usize::from(self.is_anchored());
        (floor..len)
            .rev()
            .map(|i| self.with_same_anchor(self.parts[..i].to_vec()))
            .collect()
    }

    /// The part of this path below `other`.
    ///
    /// Segments are compared under the flavor's case rules. The result
    /// carries no drive and no root.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRelative`] unless `other`'s anchor and segments
    /// are a prefix of this path's.
    pub fn relative_to(&self, other: &PurePath) -> Result<Self> {
        let other = if other.flavor == self.flavor {
            Cow::Borrowed(other)
        } else {
            Cow::Owned(Self::with_flavor(self.flavor, [other.to_string()]))
        };
        let ours = self.anchored_segments();
        let theirs = other.anchored_segments();
        let n = theirs.len();

        let related = if n == 0 {
            !self.is_anchored()
        } else {
            n <= ours.len()
                && ours
                    .iter()
                    .zip(&theirs)
                    .all(|(a, b)| self.flavor.segments_equal(a, b))
        };
        if !related {
            return Err(Error::NotRelative {
                path: self.to_string(),
                other: other.to_string(),
            });
        }

        let rest = ours[n..].iter().map(|s| (*s).to_string());
        // a bare drive base leaves the root as the anchor of the rest
        if n == 1 && !self.root.is_empty() {
            return Ok(Self::from_parts(
                self.flavor,
                String::new(),
                self.root.clone(),
                rest.collect(),
            ));
        }
        Ok(Self::from_parts(
            self.flavor,
            String::new(),
            String::new(),
            rest.collect(),
        ))
    }

    /// [`PurePath::relative_to`] against the path formed by `others`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperand`] when `others` is empty, otherwise
    /// fails like [`PurePath::relative_to`].
    pub fn relative_to_str<I, S>(&self, others: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let others: Vec<S> = others.into_iter().collect();
        if others.is_empty() {
            return Err(Error::invalid_operand(
                "relative_to",
                "at least one other path must be provided",
            ));
        }
        self.relative_to(&Self::with_flavor(self.flavor, others))
    }

    /// Whether [`PurePath::relative_to`] would succeed.
    #[must_use]
    pub fn is_relative_to(&self, other: &PurePath) -> bool {
        self.relative_to(other).is_ok()
    }

    /// Glob-matches `pattern` against the path, aligned from the right.
    ///
    /// Each pattern segment matches exactly one path segment with `*`, `?`
    /// and `[...]`. An anchored pattern must match the whole path. A run of
    /// `*` never crosses a separator, so `a**` behaves like `a*`, and a
    /// class may be negated with either `[^...]` or `[!...]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathlib::PurePath;
    ///
    /// let p = PurePath::posix(["/a/b/c.py"]);
    /// assert!(p.matches("*.py"));
    /// assert!(p.matches("/a/*/*.py"));
    /// assert!(!p.matches("/*/*.py"));
    /// ```
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        let flavor = self.flavor;
        let pattern = parse_parts([flavor.casefold(pattern)], flavor);
        if pattern.parts.is_empty() {
            return false;
        }
        if !pattern.drive.is_empty() && pattern.drive != flavor.casefold(&self.drive) {
            return false;
        }
        if !pattern.root.is_empty() && pattern.root != flavor.casefold(&self.root) {
            return false;
        }

        let parts = flavor.casefold_parts(&self.parts);
        let pattern_parts = if pattern.drive.is_empty() && pattern.root.is_empty() {
            if pattern.parts.len() > parts.len() {
                return false;
            }
            &pattern.parts[..]
        } else {
            if pattern.parts.len() != parts.len() {
                return false;
            }
            &pattern.parts[1..]
        };

        pattern_parts
            .iter()
            .rev()
            .zip(parts.iter().rev())
            .all(|(pat, part)| segment_matches(pat, part))
    }

    /// Whether both paths render to the same string.
    #[must_use]
    pub fn equals(&self, other: &PurePath) -> bool {
        self.to_string() == other.to_string()
    }

    /// Drops `.` and resolves `..` lexically.
    ///
    /// # Examples
    ///
    /// ```
    /// use pathlib::PurePath;
    ///
    /// assert_eq!(PurePath::posix(["/a/b/../c"]).clean().to_string(), "/a/c");
    /// assert_eq!(PurePath::posix(["a/../../b"]).clean().to_string(), "../b");
    /// assert_eq!(PurePath::posix(["/.."]).clean().to_string(), "/");
    /// ```
    #[must_use]
    pub fn clean(&self) -> Self {
        let segments = if self.is_anchored() {
            &self.parts[1..]
        } else {
            &self.parts[..]
        };
        let cleaned = resolve_components(segments, !self.root.is_empty());
        let parts = if self.is_anchored() {
            std::iter::once(self.anchor()).chain(cleaned).collect()
        } else {
            cleaned
        };
        self.with_same_anchor(parts)
    }

    fn with_same_anchor(&self, parts: Vec<String>) -> Self {
        Self::from_parts(self.flavor, self.drive.clone(), self.root.clone(), parts)
    }

    // Drive and root as separate leading entries, so that `/a` and `c:a`
    // never compare equal segment-wise.
    fn anchored_segments(&self) -> Vec<&str> {
        if self.root.is_empty() {
            return self.parts.iter().map(String::as_str).collect();
        }
        let mut segments = Vec::with_capacity(self.parts.len() + 1);
        segments.push(self.drive.as_str());
        segments.push(self.root.as_str());
        segments.extend(self.parts.iter().skip(1).map(String::as_str));
        segments
    }
}

impl Default for PurePath {
    fn default() -> Self {
        Self::empty(Flavor::native())
    }
}

impl fmt::Display for PurePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = self.flavor.separator();
        if self.is_anchored() {
            write!(f, "{}{}", self.drive, self.root)?;
            for (i, part) in self.parts.iter().skip(1).enumerate() {
                if i > 0 {
                    write!(f, "{sep}")?;
                }
                write!(f, "{part}")?;
            }
            return Ok(());
        }
        if self.parts.is_empty() {
            return write!(f, ".");
        }
        write!(f, "{}", self.parts.join(&sep.to_string()))
    }
}

impl From<&str> for PurePath {
    fn from(path: &str) -> Self {
        Self::new([path])
    }
}

// Index of the dot that starts the final suffix, if the name has one.
fn suffix_start(name: &str) -> Option<usize> {
    let i = name.rfind('.')?;
    (0 < i && i < name.len() - 1).then_some(i)
}

fn segment_matches(pattern: &str, segment: &str) -> bool {
    Pattern::new(&segment_pattern(pattern)).is_ok_and(|p| p.matches_with(segment, SEGMENT_MATCH))
}

// Rewrites a segment pattern into `glob` syntax: runs of `*` collapse to
// one and `[^` negation becomes `[!`.
fn segment_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' => {
                while chars.peek() == Some(&'*') {
                    chars.next();
                }
                out.push('*');
            }
            '[' => {
                out.push('[');
                if chars.peek() == Some(&'^') {
                    chars.next();
                    out.push('!');
                }
            }
            _ => out.push(c),
        }
    }
    out
}
