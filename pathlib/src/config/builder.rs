//! Layered configuration assembly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::{Config, WalkConfig, UNLIMITED};
use crate::error::{Error, Result};
use crate::fs::FileSystem;
use crate::path::{BoundPath, PathDefaults};
use crate::walk::{Walk, WalkOptions, WalkOrder};

/// Builds a [`Config`] from every source in precedence order.
///
/// # Examples
///
/// ```
/// use pathlib::config::{Config, ConfigBuilder};
///
/// let settings = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config { max_symlink_hops: Some(-1), ..Default::default() })
///     .build_settings()
///     .unwrap();
/// assert_eq!(settings.defaults.max_symlink_hops, None);
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_dir: Option<PathBuf>,
    files: Vec<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Option<Config>,
}

impl ConfigBuilder {
    /// A builder reading the user file and the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the user file from `dir` instead of `~/.pathlib`.
    #[must_use]
    pub fn with_config_dir(mut self, dir: &Path) -> Self {
        self.config_dir = Some(dir.to_path_buf());
        self
    }

    /// Add an explicit configuration file, applied above the user file.
    /// Later files win over earlier ones.
    #[must_use]
    pub fn with_file(mut self, path: &Path) -> Self {
        self.files.push(path.to_path_buf());
        self
    }

    /// Skip the user configuration file. Explicit files are still read.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Skip `PATHLIB_*` environment overrides.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Apply `config` above every other source.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Merge all sources into one [`Config`].
    ///
    /// # Errors
    ///
    /// Fails if a file cannot be read or parsed, or an environment variable
    /// is malformed.
    pub fn build(&self) -> Result<Config> {
        let mut sources = Vec::new();
        if !self.skip_files {
            if let Some(user) = ConfigLoader::load_user_config(self.config_dir.as_deref())? {
                sources.push(user);
            }
        }
        for path in &self.files {
            sources.push(ConfigLoader::load_explicit(path)?);
        }

        let mut config = ConfigMerger::merge(sources);
        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }
        if let Some(ref overrides) = self.overrides {
            ConfigMerger::merge_into(&mut config, overrides);
        }
        Ok(config)
    }

    /// Merge all sources and convert the result into runtime [`Settings`].
    ///
    /// # Errors
    ///
    /// As [`build`](Self::build), plus the validation of
    /// [`Settings::from_config`].
    pub fn build_settings(&self) -> Result<Settings> {
        Settings::from_config(&self.build()?)
    }
}

/// Validated runtime settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Creation modes and the resolver hop cap for bound paths.
    pub defaults: PathDefaults,
    /// Options for walks.
    pub walk: WalkOptions,
}

impl Settings {
    /// Converts a merged config, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidWalkOrder`] for an unknown order name and
    /// [`Error::Validation`] for integers below `-1` or contradictory size
    /// bounds.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut defaults = PathDefaults::default();
        if let Some(mode) = config.default_file_mode {
            defaults.file_mode = mode;
        }
        if let Some(mode) = config.default_dir_mode {
            defaults.dir_mode = mode;
        }
        if let Some(hops) = config.max_symlink_hops {
            defaults.max_symlink_hops = limit("max_symlink_hops", hops)?;
        }

        let walk = match config.walk {
            Some(ref walk) => walk_options(walk)?,
            None => WalkOptions::default(),
        };
        walk.validate()?;

        Ok(Self { defaults, walk })
    }

    /// Binds a native-flavor path to `fs` using these defaults.
    pub fn bind<I, S>(&self, fs: Arc<dyn FileSystem>, inputs: I) -> BoundPath
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        BoundPath::new(fs, inputs).with_defaults(self.defaults)
    }

    /// A walk over `root` using these walk options.
    #[must_use]
    pub fn walk(&self, root: BoundPath) -> Walk {
        Walk::with_options(root, self.walk.clone())
    }
}

fn walk_options(walk: &WalkConfig) -> Result<WalkOptions> {
    let defaults = WalkOptions::default();
    Ok(WalkOptions {
        max_depth: match walk.max_depth {
            Some(depth) => limit("walk.max_depth", depth)?,
            None => defaults.max_depth,
        },
        order: match walk.order {
            Some(ref name) => name.parse::<WalkOrder>()?,
            None => defaults.order,
        },
        follow_symlinks: walk.follow_symlinks.unwrap_or(defaults.follow_symlinks),
        min_size: size("walk.min_size", walk.min_size)?,
        max_size: size("walk.max_size", walk.max_size)?,
        visit_files: walk.visit_files.unwrap_or(defaults.visit_files),
        visit_dirs: walk.visit_dirs.unwrap_or(defaults.visit_dirs),
        visit_symlinks: walk.visit_symlinks.unwrap_or(defaults.visit_symlinks),
    })
}

fn limit(field: &str, value: i64) -> Result<Option<usize>> {
    if value == UNLIMITED {
        return Ok(None);
    }
    usize::try_from(value).map(Some).map_err(|_| Error::Validation {
        field: field.into(),
        message: format!("must be a non-negative integer or -1, got {value}"),
    })
}

fn size(field: &str, value: Option<i64>) -> Result<Option<u64>> {
    match value {
        None | Some(UNLIMITED) => Ok(None),
        Some(n) => u64::try_from(n).map(Some).map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("must be a non-negative integer or -1, got {n}"),
        }),
    }
}
