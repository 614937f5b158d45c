//! Decomposition of raw path strings into `(drive, root, parts)`.

use crate::flavor::Flavor;

/// The normalized triple produced by [`parse_parts`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedParts {
    /// Drive letter, UNC share or extended prefix. Empty on POSIX.
    pub drive: String,
    /// `""`, the separator, or (POSIX only) the doubled separator.
    pub root: String,
    /// The anchor (if any) followed by plain segments.
    pub parts: Vec<String>,
}

/// Parses a sequence of path strings into a single normalized path.
///
/// Inputs are processed left to right. An input carrying a drive replaces
/// everything accumulated so far; an input carrying only a root keeps the
/// current drive but replaces the root and all parts. Empty segments and
/// `.` segments are dropped.
///
/// # Examples
///
/// ```
/// use pathlib::path::parse::parse_parts;
/// use pathlib::Flavor;
///
/// let parsed = parse_parts(["a", "b//c", "d"], Flavor::Posix);
/// assert_eq!(parsed.parts, ["a", "b", "c", "d"]);
///
/// let parsed = parse_parts(["a", "/b", "c"], Flavor::Posix);
/// assert_eq!(parsed.root, "/");
/// assert_eq!(parsed.parts, ["/", "b", "c"]);
/// ```
pub fn parse_parts<I, S>(inputs: I, flavor: Flavor) -> ParsedParts
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let sep = flavor.separator();
    let mut out = ParsedParts::default();

    for input in inputs {
        let input = input.as_ref();
        if input.is_empty() {
            continue;
        }
        let replaced;
        let input = match flavor.alt_separator() {
            Some(alt) if input.contains(alt) => {
                replaced = input.replace(alt, &sep.to_string());
                replaced.as_str()
            }
            _ => input,
        };

        let (drive, root, rest) = flavor.split_root(input);
        if !drive.is_empty() {
            out.drive = drive;
            out.root = root;
            reset_to_anchor(&mut out);
        } else if !root.is_empty() {
            out.root = root;
            reset_to_anchor(&mut out);
        }

        push_segments(&mut out.parts, &rest, sep);
    }
    out
}

fn reset_to_anchor(out: &mut ParsedParts) {
    out.parts.clear();
    out.parts.push(format!("{}{}", out.drive, out.root));
}

// Single forward scan over `rest`, keeping only plain segments.
fn push_segments(parts: &mut Vec<String>, rest: &str, sep: char) {
    let mut remaining = rest;
    loop {
        let (segment, tail) = match remaining.find(sep) {
            Some(i) => (&remaining[..i], Some(&remaining[i + sep.len_utf8()..])),
            None => (remaining, None),
        };
        if !segment.is_empty() && segment != "." {
            parts.push(segment.to_string());
        }
        match tail {
            Some(tail) if !tail.is_empty() => remaining = tail,
            _ => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(inputs: &[&str], flavor: Flavor) -> Vec<String> {
        let parsed = parse_parts(inputs, flavor);
        let mut res = vec![parsed.drive, parsed.root];
        res.extend(parsed.parts);
        res
    }

    fn expect(expected: &[&str]) -> Vec<String> {
        expected.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_parts_common() {
        let cases: &[(&[&str], &[&str])] = &[
            (&[], &["", ""]),
            (&["a"], &["", "", "a"]),
            (&["a/"], &["", "", "a"]),
            (&["a", "b"], &["", "", "a", "b"]),
            (&["a/b"], &["", "", "a", "b"]),
            (&["a/b/"], &["", "", "a", "b"]),
            (&["a", "b/c", "d"], &["", "", "a", "b", "c", "d"]),
            (&["a", "b//c", "d"], &["", "", "a", "b", "c", "d"]),
            (&["a", "b/c/", "d"], &["", "", "a", "b", "c", "d"]),
            (&["."], &["", ""]),
            (&[".", ".", "b"], &["", "", "b"]),
            (&["a", ".", "b"], &["", "", "a", "b"]),
            (&["a", ".", "."], &["", "", "a"]),
            (&["", "a", ""], &["", "", "a"]),
            (&["/a/b"], &["", "/", "/", "a", "b"]),
            (&["/a", "b"], &["", "/", "/", "a", "b"]),
            (&["/a/", "b"], &["", "/", "/", "a", "b"]),
        ];
        for (inputs, expected) in cases {
            assert_eq!(flat(inputs, Flavor::Posix), expect(expected), "{inputs:?}");
        }
    }

    #[test]
    fn test_parse_parts_posix() {
        let cases: &[(&[&str], &[&str])] = &[
            (&["//a", "b"], &["", "//", "//", "a", "b"]),
            (&["///a", "b"], &["", "/", "/", "a", "b"]),
            (&["////a", "b"], &["", "/", "/", "a", "b"]),
            (&["c:a"], &["", "", "c:a"]),
            (&["c:\\a"], &["", "", "c:\\a"]),
            (&["\\a"], &["", "", "\\a"]),
            (&["a", "/b", "c"], &["", "/", "/", "b", "c"]),
            (&["/a", "/b", "/c"], &["", "/", "/", "c"]),
        ];
        for (inputs, expected) in cases {
            assert_eq!(flat(inputs, Flavor::Posix), expect(expected), "{inputs:?}");
        }
    }

    #[test]
    fn test_parse_parts_windows() {
        let cases: &[(&[&str], &[&str])] = &[
            (&["c:"], &["c:", "", "c:"]),
            (&["c:/"], &["c:", "\\", "c:\\"]),
            (&["/"], &["", "\\", "\\"]),
            (&["c:a"], &["c:", "", "c:", "a"]),
            (&["c:/a"], &["c:", "\\", "c:\\", "a"]),
            (&["/a"], &["", "\\", "\\", "a"]),
            (&["//a/b"], &["\\\\a\\b", "\\", "\\\\a\\b\\"]),
            (&["//a/b/"], &["\\\\a\\b", "\\", "\\\\a\\b\\"]),
            (&["//a/b/c"], &["\\\\a\\b", "\\", "\\\\a\\b\\", "c"]),
            (&["a", "Z:b", "c"], &["Z:", "", "Z:", "b", "c"]),
            (&["a", "Z:/b", "c"], &["Z:", "\\", "Z:\\", "b", "c"]),
            (&["a", "//b/c", "d"], &["\\\\b\\c", "\\", "\\\\b\\c\\", "d"]),
            (&["a", "Z://b//c/", "d/"], &["Z:", "\\", "Z:\\", "b", "c", "d"]),
            (&["a", "//b/c//", "d"], &["\\\\b\\c", "\\", "\\\\b\\c\\", "d"]),
            (&["//?/c:/"], &["\\\\?\\c:", "\\", "\\\\?\\c:\\"]),
            (&["//?/c:/a"], &["\\\\?\\c:", "\\", "\\\\?\\c:\\", "a"]),
            (&["//?/c:/a", "/b"], &["\\\\?\\c:", "\\", "\\\\?\\c:\\", "b"]),
            (&["//?/UNC/b/c"], &["\\\\?\\UNC\\b\\c", "\\", "\\\\?\\UNC\\b\\c\\"]),
            (
                &["//?/UNC/b/c/d"],
                &["\\\\?\\UNC\\b\\c", "\\", "\\\\?\\UNC\\b\\c\\", "d"],
            ),
            (&["a", "/b", "c"], &["", "\\", "\\", "b", "c"]),
            (&["Z:/a", "/b", "c"], &["Z:", "\\", "Z:\\", "b", "c"]),
            (&["//?/Z:/a", "/b", "c"], &["\\\\?\\Z:", "\\", "\\\\?\\Z:\\", "b", "c"]),
        ];
        for (inputs, expected) in cases {
            assert_eq!(flat(inputs, Flavor::Windows), expect(expected), "{inputs:?}");
        }
    }

    #[test]
    fn test_later_anchor_is_not_backfilled_with_drive() {
        let parsed = parse_parts(["c:/a", "//srv/share/x"], Flavor::Windows);
        assert_eq!(parsed.drive, "\\\\srv\\share");
        assert_eq!(parsed.parts, ["\\\\srv\\share\\", "x"]);
    }

    #[test]
    fn test_multibyte_segments() {
        let parsed = parse_parts(["über/straße", "日本"], Flavor::Posix);
        assert_eq!(parsed.parts, ["über", "straße", "日本"]);
    }
}
