//! Lexical path rules for POSIX and Windows.
//!
//! A [`Flavor`] decides how a raw path string decomposes into a drive, a
//! root and a relative remainder, which characters separate segments, and
//! how segments compare when the flavor is case-insensitive.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

const EXTENDED_PREFIX: &str = r"\\?\";
const EXTENDED_UNC: &str = r"UNC\";

/// The lexical rules governing a path.
///
/// # Examples
///
/// ```
/// use pathlib::Flavor;
///
/// assert_eq!(
///     Flavor::Posix.split_root("//a/b"),
///     ("".to_string(), "//".to_string(), "a/b".to_string()),
/// );
/// assert_eq!(
///     Flavor::Windows.split_root(r"c:\a\b"),
///     ("c:".to_string(), r"\".to_string(), r"a\b".to_string()),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flavor {
    /// `/`-separated, no drives, case-sensitive.
    Posix,
    /// `\`-separated with `/` accepted, drive letters and UNC shares,
    /// case-insensitive.
    Windows,
}

impl Flavor {
    /// The flavor of the platform this crate was compiled for.
    #[must_use]
    pub const fn native() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else {
            Self::Posix
        }
    }

    /// The primary separator.
    #[must_use]
    pub const fn separator(self) -> char {
        match self {
            Self::Posix => '/',
            Self::Windows => '\\',
        }
    }

    /// The alternative separator accepted on input, if any.
    #[must_use]
    pub const fn alt_separator(self) -> Option<char> {
        match self {
            Self::Posix => None,
            Self::Windows => Some('/'),
        }
    }

    /// Whether paths of this flavor may carry a drive.
    #[must_use]
    pub const fn has_drive(self) -> bool {
        matches!(self, Self::Windows)
    }

    /// Whether `c` separates segments under this flavor.
    #[must_use]
    pub fn is_separator(self, c: char) -> bool {
        c == self.separator() || Some(c) == self.alt_separator()
    }

    /// Splits `path` into `(drive, root, rest)`.
    ///
    /// Never fails: input that matches no anchored form comes back whole as
    /// the relative remainder. Windows input is expected to already use the
    /// primary separator.
    #[must_use]
    pub fn split_root(self, path: &str) -> (String, String, String) {
        match self {
            Self::Posix => {
                let (drive, root, rest) = split_posix(path);
                (drive.to_string(), root.to_string(), rest.to_string())
            }
            Self::Windows => split_windows(path),
        }
    }

    /// Returns `s` in the form used for comparisons.
    #[must_use]
    pub fn casefold(self, s: &str) -> String {
        match self {
            Self::Posix => s.to_string(),
            Self::Windows => s.to_lowercase(),
        }
    }

    /// Casefolds every element of `parts`.
    #[must_use]
    pub fn casefold_parts<S: AsRef<str>>(self, parts: &[S]) -> Vec<String> {
        parts.iter().map(|p| self.casefold(p.as_ref())).collect()
    }

    /// Compares two segments under this flavor's case rules.
    #[must_use]
    pub fn segments_equal(self, a: &str, b: &str) -> bool {
        match self {
            Self::Posix => a == b,
            Self::Windows => a == b || a.to_lowercase() == b.to_lowercase(),
        }
    }
}

impl Default for Flavor {
    fn default() -> Self {
        Self::native()
    }
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Posix => write!(f, "posix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

// Exactly two leading slashes are kept: POSIX leaves `//` implementation
// defined. Three or more collapse to one.
fn split_posix(path: &str) -> (&str, &str, &str) {
    if !path.starts_with('/') {
        return ("", "", path);
    }
    let stripped = path.trim_start_matches('/');
    if path.len() - stripped.len() == 2 {
        ("", "//", stripped)
    } else {
        ("", "/", stripped)
    }
}

fn split_windows(input: &str) -> (String, String, String) {
    const SEP: u8 = b'\\';

    let (prefix, path) = match input.strip_prefix(EXTENDED_PREFIX) {
        // `\\?\UNC\server\share` keeps `\\?\UNC` as the prefix and hands
        // `\\server\share...` to the UNC rule below.
        Some(after) if after.starts_with(EXTENDED_UNC) => (
            &input[..EXTENDED_PREFIX.len() + 3],
            Cow::Owned(format!("\\{}", &after[3..])),
        ),
        Some(after) => (EXTENDED_PREFIX, Cow::Borrowed(after)),
        None => ("", Cow::Borrowed(input)),
    };
    let path: &str = &path;

    let bytes = path.as_bytes();
    let first = bytes.first().copied();
    let second = bytes.get(1).copied();
    let third = bytes.get(2).copied();

    if first == Some(SEP) && second == Some(SEP) && third != Some(SEP) {
        // \\server\share\rest: the drive spans through the share name.
        if let Some(server_end) = find_byte(bytes, SEP, 2) {
            let share_end = find_byte(bytes, SEP, server_end + 1).unwrap_or(bytes.len());
            // An empty share segment disqualifies the UNC form.
            if share_end > server_end + 1 {
                let rest = path.get(share_end + 1..).unwrap_or("");
                let drive = if prefix.is_empty() {
                    path[..share_end].to_string()
                } else {
                    format!("{prefix}{}", &path[1..share_end])
                };
                return (drive, "\\".to_string(), rest.to_string());
            }
        }
    }

    let mut drive = String::new();
    let mut rest = path;
    if second == Some(b':') && first.is_some_and(|c| c.is_ascii_alphabetic()) {
        drive.push_str(&path[..2]);
        rest = &path[2..];
    }
    let mut root = String::new();
    if rest.starts_with('\\') {
        root.push('\\');
        rest = rest.trim_start_matches('\\');
    }
    (format!("{prefix}{drive}"), root, rest.to_string())
}

fn find_byte(bytes: &[u8], needle: u8, from: usize) -> Option<usize> {
    bytes
        .get(from..)?
        .iter()
        .position(|&b| b == needle)
        .map(|i| i + from)
}
