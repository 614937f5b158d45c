//! Configuration schema definitions.
//!
//! This module defines the on-disk configuration structure for pathlib: the
//! creation defaults of bound paths, the resolver's hop cap and the options
//! of the directory walker.
//!
//! Integers that may be "unset" in a running walk use `-1` in the file and
//! in environment variables, so that a higher-precedence source can
//! explicitly lift a limit set by a lower one.

use serde::{Deserialize, Deserializer, Serialize};

/// Sentinel meaning "no limit" for integer settings.
pub const UNLIMITED: i64 = -1;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use pathlib::config::{Config, WalkConfig};
///
/// let config: Config = serde_yaml::from_str(
///     "default_dir_mode: \"0700\"\nwalk:\n  max_depth: 2\n  order: depth-first\n",
/// ).unwrap();
/// assert_eq!(config.default_dir_mode, Some(0o700));
/// assert_eq!(config.walk.unwrap().max_depth, Some(2));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Permission bits for files created without an explicit mode.
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub default_file_mode: Option<u32>,

    /// Permission bits for directories created without an explicit mode.
    #[serde(default, deserialize_with = "deserialize_mode")]
    pub default_dir_mode: Option<u32>,

    /// Maximum symlinks followed per resolution; `-1` for unbounded.
    pub max_symlink_hops: Option<i64>,

    /// Directory walk settings.
    pub walk: Option<WalkConfig>,
}

/// Walk settings as written in a configuration source.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct WalkConfig {
    /// Maximum descent depth; `-1` for unlimited.
    pub max_depth: Option<i64>,

    /// `preorder-flat` or `depth-first`. Checked when settings are built.
    pub order: Option<String>,

    /// Descend into symlinks that point at directories.
    pub follow_symlinks: Option<bool>,

    /// Smallest visited file size in bytes; `-1` for no bound.
    pub min_size: Option<i64>,

    /// Largest visited file size in bytes; `-1` for no bound.
    pub max_size: Option<i64>,

    /// Visit regular files.
    pub visit_files: Option<bool>,

    /// Visit directories.
    pub visit_dirs: Option<bool>,

    /// Visit symlinks.
    pub visit_symlinks: Option<bool>,
}

/// Parses permission bits written as octal text (`"0644"`, `"0o644"`).
///
/// Returns `None` for anything that is not octal or exceeds `0o7777`.
///
/// # Examples
///
/// ```
/// use pathlib::config::schema::parse_mode;
///
/// assert_eq!(parse_mode("0o750"), Some(0o750));
/// assert_eq!(parse_mode("644"), Some(0o644));
/// assert_eq!(parse_mode("999"), None);
/// ```
#[must_use]
pub fn parse_mode(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s.strip_prefix("0o").unwrap_or(s);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 8).ok().filter(|m| *m <= 0o7777)
}

// Modes are accepted either as octal strings or as plain integers taken at
// face value (so `420` means `0o644`).
fn deserialize_mode<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawMode {
        Int(u32),
        Text(String),
    }

    match Option::<RawMode>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawMode::Int(m)) if m <= 0o7777 => Ok(Some(m)),
        Some(RawMode::Int(m)) => Err(serde::de::Error::custom(format!(
            "mode {m:#o} has bits outside 0o7777"
        ))),
        Some(RawMode::Text(s)) => parse_mode(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid octal mode {s:?}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_full_config() {
        let yaml = r#"
default_file_mode: "0600"
default_dir_mode: 493
max_symlink_hops: -1
walk:
  max_depth: 3
  order: preorder-flat
  follow_symlinks: true
  min_size: 10
  max_size: -1
  visit_files: true
  visit_dirs: false
  visit_symlinks: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.default_file_mode, Some(0o600));
        assert_eq!(config.default_dir_mode, Some(0o755));
        assert_eq!(config.max_symlink_hops, Some(UNLIMITED));

        let walk = config.walk.unwrap();
        assert_eq!(walk.max_depth, Some(3));
        assert_eq!(walk.order.as_deref(), Some("preorder-flat"));
        assert_eq!(walk.follow_symlinks, Some(true));
        assert_eq!(walk.min_size, Some(10));
        assert_eq!(walk.max_size, Some(UNLIMITED));
        assert_eq!(walk.visit_dirs, Some(false));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("max_hops: 3");
        assert!(result.is_err());

        let result: Result<Config, _> = serde_yaml::from_str("walk:\n  depth: 3");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let result: Result<Config, _> = serde_yaml::from_str("default_file_mode: \"rw-r--r--\"");
        assert!(result.is_err());

        let result: Result<Config, _> = serde_yaml::from_str("default_file_mode: 70000");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("0755"), Some(0o755));
        assert_eq!(parse_mode(" 0o600 "), Some(0o600));
        assert_eq!(parse_mode("7777"), Some(0o7777));
        assert_eq!(parse_mode("17777"), None);
        assert_eq!(parse_mode("0o"), None);
        assert_eq!(parse_mode("abc"), None);
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = Config {
            max_symlink_hops: Some(8),
            walk: Some(WalkConfig {
                order: Some("depth-first".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let back: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }
}
