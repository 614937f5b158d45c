//! Environment variable handling for configuration overrides.
//!
//! This module provides support for `PATHLIB_*` environment variables that
//! override configuration file values.

use crate::config::schema::{parse_mode, Config};
use crate::error::{Error, Result};
use std::env;

/// Every environment variable consulted by [`EnvironmentConfig`].
pub const ENV_VARS: &[&str] = &[
    "PATHLIB_DEFAULT_FILE_MODE",
    "PATHLIB_DEFAULT_DIR_MODE",
    "PATHLIB_MAX_SYMLINK_HOPS",
    "PATHLIB_WALK_MAX_DEPTH",
    "PATHLIB_WALK_ORDER",
    "PATHLIB_WALK_FOLLOW_SYMLINKS",
    "PATHLIB_WALK_MIN_SIZE",
    "PATHLIB_WALK_MAX_SIZE",
    "PATHLIB_WALK_VISIT_FILES",
    "PATHLIB_WALK_VISIT_DIRS",
    "PATHLIB_WALK_VISIT_SYMLINKS",
];

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use pathlib::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// Modes are read as octal (`0644`), limits as integers where `-1`
    /// lifts the limit, and flags with [`parse_bool`](Self::parse_bool).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the variable if any value is
    /// malformed.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(val) = env::var("PATHLIB_DEFAULT_FILE_MODE") {
            config.default_file_mode = Some(Self::parse_mode("PATHLIB_DEFAULT_FILE_MODE", &val)?);
        }

        if let Ok(val) = env::var("PATHLIB_DEFAULT_DIR_MODE") {
            config.default_dir_mode = Some(Self::parse_mode("PATHLIB_DEFAULT_DIR_MODE", &val)?);
        }

        if let Ok(val) = env::var("PATHLIB_MAX_SYMLINK_HOPS") {
            config.max_symlink_hops = Some(Self::parse_limit("PATHLIB_MAX_SYMLINK_HOPS", &val)?);
        }

        Self::apply_walk_overrides(config)
    }

    fn apply_walk_overrides(config: &mut Config) -> Result<()> {
        let mut walk = config.walk.clone().unwrap_or_default();
        let mut modified = false;

        if let Ok(val) = env::var("PATHLIB_WALK_MAX_DEPTH") {
            walk.max_depth = Some(Self::parse_limit("PATHLIB_WALK_MAX_DEPTH", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("PATHLIB_WALK_ORDER") {
            walk.order = Some(val);
            modified = true;
        }

        if let Ok(val) = env::var("PATHLIB_WALK_FOLLOW_SYMLINKS") {
            walk.follow_symlinks = Some(Self::parse_bool("PATHLIB_WALK_FOLLOW_SYMLINKS", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("PATHLIB_WALK_MIN_SIZE") {
            walk.min_size = Some(Self::parse_limit("PATHLIB_WALK_MIN_SIZE", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("PATHLIB_WALK_MAX_SIZE") {
            walk.max_size = Some(Self::parse_limit("PATHLIB_WALK_MAX_SIZE", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("PATHLIB_WALK_VISIT_FILES") {
            walk.visit_files = Some(Self::parse_bool("PATHLIB_WALK_VISIT_FILES", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("PATHLIB_WALK_VISIT_DIRS") {
            walk.visit_dirs = Some(Self::parse_bool("PATHLIB_WALK_VISIT_DIRS", &val)?);
            modified = true;
        }

        if let Ok(val) = env::var("PATHLIB_WALK_VISIT_SYMLINKS") {
            walk.visit_symlinks = Some(Self::parse_bool("PATHLIB_WALK_VISIT_SYMLINKS", &val)?);
            modified = true;
        }

        if modified {
            config.walk = Some(walk);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for anything else.
    pub fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_mode(field: &str, s: &str) -> Result<u32> {
        parse_mode(s).ok_or_else(|| Error::Validation {
            field: field.into(),
            message: format!("Invalid octal mode: '{s}'"),
        })
    }

    // Non-negative integer or -1.
    fn parse_limit(field: &str, s: &str) -> Result<i64> {
        match s.trim().parse::<i64>() {
            Ok(n) if n >= -1 => Ok(n),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!("Must be a non-negative integer or -1, got '{s}'"),
            }),
        }
    }
}
