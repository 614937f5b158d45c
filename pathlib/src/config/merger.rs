//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{Config, WalkConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use pathlib::config::{Config, ConfigMerger};
///
/// let low = Config { max_symlink_hops: Some(10), ..Default::default() };
/// let high = Config { max_symlink_hops: Some(-1), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.max_symlink_hops, Some(-1));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into a final config.
    ///
    /// Sources are applied in ascending precedence regardless of the order
    /// they are given in.
    #[must_use]
    pub fn merge(mut sources: Vec<ConfigSource>) -> Config {
        sources.sort_by_key(|s| s.precedence);

        let mut result = Config::default();
        for source in sources {
            log::debug!(
                "merging configuration from {} (precedence {})",
                source.path.display(),
                source.precedence
            );
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// Every field is taken from `source` when it is `Some`. The walk
    /// section is merged field by field.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.default_file_mode.is_some() {
            target.default_file_mode = source.default_file_mode;
        }

        if source.default_dir_mode.is_some() {
            target.default_dir_mode = source.default_dir_mode;
        }

        if source.max_symlink_hops.is_some() {
            target.max_symlink_hops = source.max_symlink_hops;
        }

        if let Some(ref source_walk) = source.walk {
            target.walk = Some(match &target.walk {
                Some(target_walk) => Self::merge_walk(target_walk, source_walk),
                None => source_walk.clone(),
            });
        }
    }

    fn merge_walk(target: &WalkConfig, source: &WalkConfig) -> WalkConfig {
        WalkConfig {
            max_depth: source.max_depth.or(target.max_depth),
            order: source.order.clone().or_else(|| target.order.clone()),
            follow_symlinks: source.follow_symlinks.or(target.follow_symlinks),
            min_size: source.min_size.or(target.min_size),
            max_size: source.max_size.or(target.max_size),
            visit_files: source.visit_files.or(target.visit_files),
            visit_dirs: source.visit_dirs.or(target.visit_dirs),
            visit_symlinks: source.visit_symlinks.or(target.visit_symlinks),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn source(precedence: u8, config: Config) -> ConfigSource {
        ConfigSource {
            path: PathBuf::from(format!("/config/{precedence}.yaml")),
            precedence,
            config,
        }
    }

    #[test]
    fn test_merge_simple_fields() {
        let mut target = Config {
            default_file_mode: Some(0o600),
            default_dir_mode: Some(0o700),
            ..Default::default()
        };
        let source = Config {
            default_file_mode: Some(0o644),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        assert_eq!(target.default_file_mode, Some(0o644));
        assert_eq!(target.default_dir_mode, Some(0o700));
    }

    #[test]
    fn test_merge_walk_field_by_field() {
        let mut target = Config {
            walk: Some(WalkConfig {
                max_depth: Some(2),
                order: Some("depth-first".into()),
                visit_dirs: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };
        let source = Config {
            walk: Some(WalkConfig {
                max_depth: Some(-1),
                min_size: Some(100),
                ..Default::default()
            }),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        let walk = target.walk.unwrap();
        assert_eq!(walk.max_depth, Some(-1));
        assert_eq!(walk.order.as_deref(), Some("depth-first"));
        assert_eq!(walk.visit_dirs, Some(false));
        assert_eq!(walk.min_size, Some(100));
    }

    #[test]
    fn test_merge_walk_into_empty() {
        let mut target = Config::default();
        let source = Config {
            walk: Some(WalkConfig {
                follow_symlinks: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        assert_eq!(target.walk, source.walk);
    }

    #[test]
    fn test_merge_sources_by_precedence() {
        let user = source(
            1,
            Config {
                max_symlink_hops: Some(5),
                default_dir_mode: Some(0o700),
                ..Default::default()
            },
        );
        let explicit = source(
            2,
            Config {
                max_symlink_hops: Some(20),
                ..Default::default()
            },
        );

        // out of order on purpose
        let merged = ConfigMerger::merge(vec![explicit, user]);
        assert_eq!(merged.max_symlink_hops, Some(20));
        assert_eq!(merged.default_dir_mode, Some(0o700));
    }

    #[test]
    fn test_merge_nothing() {
        assert_eq!(ConfigMerger::merge(Vec::new()), Config::default());
    }
}
