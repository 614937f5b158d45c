//! Configuration file discovery and loading.
//!
//! This module handles locating and loading pathlib configuration files
//! with proper precedence.

use crate::config::schema::Config;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory below the home directory holding the user configuration.
pub const USER_CONFIG_DIR: &str = ".pathlib";

/// File name of the user configuration.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Configuration source with its precedence level.
///
/// Lower precedence values are overridden by higher ones.
///
/// # Examples
///
/// ```
/// use pathlib::config::ConfigSource;
/// use std::path::PathBuf;
///
/// let user_config = ConfigSource {
///     path: PathBuf::from("~/.pathlib/config.yaml"),
///     precedence: 1,
///     config: Default::default(),
/// };
/// ```
#[derive(Debug, Clone)]
pub struct ConfigSource {
    /// Path to the configuration file.
    pub path: PathBuf,
    /// Precedence level (higher values take priority).
    pub precedence: u8,
    /// Parsed configuration.
    pub config: Config,
}

/// Loads configuration from files.
///
/// # Examples
///
/// ```no_run
/// use pathlib::config::ConfigLoader;
///
/// if let Some(source) = ConfigLoader::load_user_config(None).unwrap() {
///     println!("loaded {}", source.path.display());
/// }
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Precedence of the user configuration file.
    pub const USER_PRECEDENCE: u8 = 1;

    /// Precedence of explicitly named configuration files.
    pub const EXPLICIT_PRECEDENCE: u8 = 2;

    /// Load the user configuration file.
    ///
    /// If `config_dir` is provided, loads `{config_dir}/config.yaml`;
    /// otherwise `~/.pathlib/config.yaml`. A missing file, or an
    /// undeterminable home directory, yields `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_user_config(config_dir: Option<&Path>) -> Result<Option<ConfigSource>> {
        let config_path = match config_dir {
            Some(dir) => dir.join(CONFIG_FILE_NAME),
            None => match Self::user_config_path() {
                Some(path) => path,
                None => {
                    log::debug!("no home directory, skipping user configuration");
                    return Ok(None);
                }
            },
        };

        if !config_path.exists() {
            return Ok(None);
        }

        let config = Self::load_file(&config_path)?;
        Ok(Some(ConfigSource {
            path: config_path,
            precedence: Self::USER_PRECEDENCE,
            config,
        }))
    }

    /// Load an explicitly named configuration file, which must exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_explicit(path: &Path) -> Result<ConfigSource> {
        Ok(ConfigSource {
            path: path.to_path_buf(),
            precedence: Self::EXPLICIT_PRECEDENCE,
            config: Self::load_file(path)?,
        })
    }

    /// Load and parse a YAML configuration file.
    ///
    /// A file containing only whitespace or comments is an empty
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the file cannot be read and
    /// [`Error::Configuration`](crate::Error::Configuration) if the YAML is
    /// invalid.
    pub fn load_file(path: &Path) -> Result<Config> {
        let contents = fs::read_to_string(path)?;
        log::debug!("loading configuration from {}", path.display());
        Self::parse(&contents)
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`](crate::Error::Configuration) if the
    /// YAML is invalid.
    pub fn parse(contents: &str) -> Result<Config> {
        let has_content = contents
            .lines()
            .map(str::trim)
            .any(|line| !line.is_empty() && !line.starts_with('#'));
        if !has_content {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Path of the user configuration file, if the home directory is known.
    #[must_use]
    pub fn user_config_path() -> Option<PathBuf> {
        home::home_dir().map(|home| home.join(USER_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }
}
