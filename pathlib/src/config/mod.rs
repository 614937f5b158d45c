//! Configuration system for pathlib.
//!
//! This module provides hierarchical configuration with support for:
//! - YAML configuration files (user config and explicitly named files)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`PATHLIB_*`)
//! 3. Explicit files (via `ConfigBuilder::with_file`)
//! 4. User config (`~/.pathlib/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! Loading from the usual places:
//!
//! ```no_run
//! use pathlib::config::ConfigBuilder;
//!
//! let settings = ConfigBuilder::new().build_settings().unwrap();
//! println!("walking in {} order", settings.walk.order);
//! ```
//!
//! Programmatic configuration:
//!
//! ```
//! use pathlib::config::{Config, ConfigBuilder, WalkConfig};
//! use pathlib::WalkOrder;
//!
//! let custom = Config {
//!     walk: Some(WalkConfig {
//!         order: Some("depth-first".to_string()),
//!         max_depth: Some(3),
//!         ..Default::default()
//!     }),
//!     ..Default::default()
//! };
//!
//! let settings = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build_settings()
//!     .unwrap();
//!
//! assert_eq!(settings.walk.order, WalkOrder::DepthFirst);
//! assert_eq!(settings.walk.max_depth, Some(3));
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;

// Re-export key types at module root
pub use builder::{ConfigBuilder, Settings};
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{Config, WalkConfig};
