//! Configuration loader for lovequote-rs
//!
//! This module provides the `ConfigLoader` struct that merges built-in
//! defaults, TOML files and `LQT_*` environment variables.

use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Environment as AppEnvironment;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for configuration directory
pub const CONFIG_DIR_ENV: &str = "LQT_CONFIG_DIR";

/// Environment variable for a single configuration file
pub const CONFIG_FILE_ENV: &str = "LQT_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "LQT";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Loads [`Settings`] from layered sources.
///
/// Sources in order of priority (lowest first):
/// 1. Built-in defaults
/// 2. `default.toml`
/// 3. `{environment}.toml`
/// 4. `local.toml`
/// 5. `LQT_*` environment variables
///
/// Every file is optional: the binary runs with no configuration directory
/// at all. When a single file is selected it must exist.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    /// Specific configuration file (if set, skips layered loading)
    config_file: Option<PathBuf>,
    environment: AppEnvironment,
}

impl ConfigLoader {
    /// Create a loader from `LQT_CONFIG_DIR`, `LQT_CONFIG_FILE` and `LQT_APP_ENV`
    ///
    /// # Errors
    ///
    /// Returns an error if both `LQT_CONFIG_DIR` and `LQT_CONFIG_FILE` are set.
    pub fn new() -> Result<Self, ConfigError> {
        let config_dir_var = std::env::var(CONFIG_DIR_ENV).ok();
        let config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);

        if config_file.is_some() && config_dir_var.is_some() {
            return Err(ConfigError::mutual_exclusivity(
                "LQT_CONFIG_DIR and LQT_CONFIG_FILE cannot both be set. \
                 Use LQT_CONFIG_DIR for layered configuration or \
                 LQT_CONFIG_FILE for a single configuration file.",
            ));
        }

        Ok(Self {
            config_dir: config_dir_var
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_DIR)),
            config_file,
            environment: AppEnvironment::from_env(),
        })
    }

    /// Create a loader that reads exactly one file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: Some(path.into()),
            environment: AppEnvironment::from_env(),
        }
    }

    /// Override the environment used to pick `{environment}.toml`
    pub fn with_environment(mut self, environment: AppEnvironment) -> Self {
        self.environment = environment;
        self
    }

    pub fn environment(&self) -> AppEnvironment {
        self.environment
    }

    /// Load and validate configuration from all sources
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        // LQT_TELEGRAM__API_BASE -> telegram.api_base
        let builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true),
        );

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let env_path = self
            .config_dir
            .join(format!("{}.toml", self.environment.as_str()));
        let local_path = self.config_dir.join("local.toml");

        let builder = Self::add_file_source(builder, &default_path, false)?;
        let builder = Self::add_file_source(builder, &env_path, false)?;
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(format!(
                "Required configuration file not found: {}",
                path.display()
            )));
        }

        let name = path.to_str().ok_or_else(|| {
            ConfigError::ParseError(format!("Non UTF-8 configuration path: {}", path.display()))
        })?;

        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ENV_MUTEX, EnvGuard};
    use std::fs;
    use tempfile::TempDir;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    #[test]
    fn test_config_loader_new_default() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        env.remove(CONFIG_DIR_ENV);
        env.remove(CONFIG_FILE_ENV);
        env.remove(AppEnvironment::ENV_VAR);

        let loader = ConfigLoader::new().expect("Should create loader");
        assert_eq!(loader.config_dir, PathBuf::from("config"));
        assert!(loader.config_file.is_none());
        assert_eq!(loader.environment(), AppEnvironment::Development);
    }

    #[test]
    fn test_config_loader_mutual_exclusivity_error() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        env.set(CONFIG_DIR_ENV, "/custom/config");
        env.set(CONFIG_FILE_ENV, "/path/to/config.toml");

        match ConfigLoader::new() {
            Err(ConfigError::MutualExclusivityError(msg)) => {
                assert!(msg.contains(CONFIG_DIR_ENV));
                assert!(msg.contains(CONFIG_FILE_ENV));
            }
            other => panic!("Expected MutualExclusivityError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_without_any_file_uses_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.remove(CONFIG_FILE_ENV);
        env.remove(AppEnvironment::ENV_VAR);

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_layered_files_override_in_order() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[
            (
                "default.toml",
                "[translation]\ntarget_language = \"es\"\n[desktop]\nsummary = \"Default\"\n",
            ),
            ("production.toml", "[desktop]\nsummary = \"Prod\"\n"),
            ("local.toml", "[http]\ntimeout = 60\n"),
        ]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.remove(CONFIG_FILE_ENV);
        env.set(AppEnvironment::ENV_VAR, "production");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.translation.target_language, "es");
        assert_eq!(settings.desktop.summary, "Prod");
        assert_eq!(settings.http.timeout, 60);
    }

    #[test]
    fn test_env_vars_have_highest_priority() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let mut env = EnvGuard::new();
        let temp_dir = setup_config_dir(&[(
            "default.toml",
            "[telegram]\napi_base = \"https://file.example.com\"\n",
        )]);
        env.set(CONFIG_DIR_ENV, temp_dir.path().to_str().unwrap());
        env.remove(CONFIG_FILE_ENV);
        env.remove(AppEnvironment::ENV_VAR);
        env.set("LQT_TELEGRAM__API_BASE", "https://env.example.com");

        let settings = ConfigLoader::new().unwrap().load().unwrap();
        assert_eq!(settings.telegram.api_base, "https://env.example.com");
    }

    #[test]
    fn test_missing_single_file_is_an_error() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = setup_config_dir(&[]);
        let loader = ConfigLoader::from_file(temp_dir.path().join("missing.toml"));

        match loader.load() {
            Err(ConfigError::FileNotFound(msg)) => assert!(msg.contains("missing.toml")),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        let temp_dir = setup_config_dir(&[("lqt.toml", "[http]\ntimeout = 0\n")]);
        let loader = ConfigLoader::from_file(temp_dir.path().join("lqt.toml"));

        assert!(matches!(
            loader.load(),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
