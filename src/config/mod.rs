//! Configuration management module for lovequote-rs
//!
//! Layered loading with support for:
//! - Built-in defaults for every field
//! - Optional TOML configuration files
//! - `LQT_*` environment variable overrides
//!
//! # Configuration Priority (lowest to highest)
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml` (not committed to version control)
//! 4. `LQT_*` environment variables
//! 5. CLI flags (applied by `cli::ConfigurationMerger`)

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::Settings;
