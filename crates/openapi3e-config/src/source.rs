//! Configuration source loading and composition

use crate::validation::Validate;
use crate::{ConfigError, ConfigResult, DocsConfig};
use openapi3e_common::ErrorContext;
use std::path::{Path, PathBuf};

/// Trait for loading configuration from different sources
pub trait ConfigurationSource {
    /// Apply this source's values on top of `config`
    ///
    /// # Errors
    /// Returns configuration loading errors
    fn apply(&self, config: &mut DocsConfig) -> ConfigResult<()>;

    /// Get the name of this configuration source
    fn name(&self) -> &str;

    /// Get the priority of this source (higher number = higher priority)
    fn priority(&self) -> u8;
}

/// Load configuration from environment variables
pub struct EnvironmentSource;

impl ConfigurationSource for EnvironmentSource {
    fn apply(&self, config: &mut DocsConfig) -> ConfigResult<()> {
        config.apply_overrides(&|key: &str| std::env::var(key).ok());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "environment"
    }

    fn priority(&self) -> u8 {
        100 // Environment variables override everything
    }
}

/// Load configuration from TOML file
pub struct TomlFileSource {
    path: PathBuf,
}

impl TomlFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigurationSource for TomlFileSource {
    fn apply(&self, config: &mut DocsConfig) -> ConfigResult<()> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))
            .map_err(|message| ConfigError::Unreadable { message })?;

        // Missing keys fall back to defaults, so the file replaces the base
        *config = toml::from_str(&content)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "toml_file"
    }

    fn priority(&self) -> u8 {
        50 // Below env vars, above defaults
    }
}

/// Type alias for configuration sources
type ConfigSources = Vec<Box<dyn ConfigurationSource>>;

/// Configuration loader that combines multiple sources
pub struct ConfigurationLoader {
    sources: ConfigSources,
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_source(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Load configuration from all sources with priority ordering
    ///
    /// A source that fails to load is logged and skipped.
    ///
    /// # Errors
    /// Returns validation errors for the combined configuration
    pub fn load(&self) -> ConfigResult<DocsConfig> {
        let mut config = DocsConfig::default();

        // Lowest priority first, so higher priorities overwrite
        let mut sorted_sources = self.sources.iter().collect::<Vec<_>>();
        sorted_sources.sort_by_key(|source| source.priority());

        for source in sorted_sources {
            match source.apply(&mut config) {
                Ok(()) => {
                    tracing::debug!("Loaded configuration from source: {}", source.name());
                }
                Err(e) => {
                    tracing::warn!("Failed to load from source {}: {}", source.name(), e);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct FixedSource {
        title: &'static str,
        priority: u8,
    }

    impl ConfigurationSource for FixedSource {
        fn apply(&self, config: &mut DocsConfig) -> ConfigResult<()> {
            config.info.title = self.title.to_string();
            Ok(())
        }

        fn name(&self) -> &'static str {
            "fixed"
        }

        fn priority(&self) -> u8 {
            self.priority
        }
    }

    #[test]
    fn test_toml_source_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[info]\ntitle = \"Inventory\"\nlicense_name = \"MIT\"\n\n[build]\nshow_excluded = true"
        )
        .unwrap();

        let config = ConfigurationLoader::new()
            .add_source(Box::new(TomlFileSource::new(file.path())))
            .load()
            .unwrap();

        assert_eq!(config.info.title, "Inventory");
        assert_eq!(config.info.license_name.as_deref(), Some("MIT"));
        assert!(config.build.show_excluded);
        assert!(config.build.hide_self);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config = ConfigurationLoader::new()
            .add_source(Box::new(TomlFileSource::new("/nonexistent/docs.toml")))
            .load()
            .unwrap();

        assert_eq!(config, DocsConfig::default());
    }

    #[test]
    fn test_higher_priority_wins_regardless_of_order() {
        let config = ConfigurationLoader::new()
            .add_source(Box::new(FixedSource {
                title: "High",
                priority: 90,
            }))
            .add_source(Box::new(FixedSource {
                title: "Low",
                priority: 10,
            }))
            .load()
            .unwrap();

        assert_eq!(config.info.title, "High");
    }

    #[test]
    fn test_invalid_combined_config_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = 0").unwrap();

        let result = ConfigurationLoader::new()
            .add_source(Box::new(TomlFileSource::new(file.path())))
            .load();

        assert!(matches!(result, Err(ConfigError::InvalidPort { port: 0 })));
    }
}
