//! Lexical normalization of path segments.
//!
//! Resolves `.` and `..` components without consulting a filesystem. The
//! result is only equivalent to the input when no resolved-away segment is a
//! symlink; callers that need that guarantee resolve links first.

/// Resolve `.` and `..` among `segments`.
///
/// With `rooted` set, `..` at the top is dropped since nothing sits above a
/// root. Otherwise leading `..` segments are kept.
///
/// # Examples
///
/// ```
/// use pathlib::path::normalize::resolve_components;
///
/// assert_eq!(resolve_components(&["a", ".", "b", "..", "c"], true), ["a", "c"]);
/// assert_eq!(resolve_components(&["..", "a", "..", ".."], false), ["..", ".."]);
/// assert_eq!(resolve_components(&["..", "a"], true), ["a"]);
/// ```
pub fn resolve_components<S: AsRef<str>>(segments: &[S], rooted: bool) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(segments.len());

    for segment in segments {
        match segment.as_ref() {
            "" | "." => {}
            ".." => match result.last() {
                Some(last) if last != ".." => {
                    result.pop();
                }
                // Already at root - can't go up further
                _ if rooted => {}
                _ => result.push("..".to_string()),
            },
            normal => result.push(normal.to_string()),
        }
    }

    result
}
