//! Configuration for the OpenAPI document generator
//!
//! Every setting has a safe default and can be overridden by environment
//! variables or a TOML file. Configuration follows a simple hierarchy:
//! 1. Safe defaults (defined as constants)
//! 2. TOML file values
//! 3. Environment variable overrides
//! 4. Runtime validation

pub mod error;
pub mod source;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use source::{ConfigurationLoader, ConfigurationSource, EnvironmentSource, TomlFileSource};
pub use validation::Validate;

use std::str::FromStr;

// =============================================================================
// SAFE DEFAULTS
// =============================================================================

// Document Info
const DEFAULT_API_TITLE: &str = "API";
const DEFAULT_API_DESCRIPTION: &str = "Description";
const DEFAULT_API_VERSION: &str = "v1.0.0";

// Build Flags
const DEFAULT_SHOW_EXCLUDED: bool = false;
const DEFAULT_SHOW_UNUSED_TAGS: bool = false;
const DEFAULT_HIDE_SELF: bool = true;
const DEFAULT_HIDE_STATIC: bool = true;

// Document Server
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_YAML_CONTENT_TYPE: &str = "application/x-yaml";

// Telemetry
const DEFAULT_TRACING_LEVEL: &str = "info";
const DEFAULT_LOG_JSON: bool = false;

/// Key lookup used to read overrides (the process environment in production)
pub type Lookup<'a> = dyn Fn(&str) -> Option<String> + 'a;

/// Complete configuration for building and serving documents
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Values for the document's `info` object
    pub info: InfoConfig,

    /// Which routes and tags make it into each document variant
    pub build: BuildConfig,

    /// HTTP listener for the document endpoints
    pub server: ServerConfig,

    /// Logging configuration
    pub telemetry: TelemetryConfig,
}

/// Document `info` values
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InfoConfig {
    pub title: String,
    pub description: String,
    pub version: String,
    pub terms_of_service_url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_url: Option<String>,
    pub contact_email: Option<String>,
    pub license_name: Option<String>,
    pub license_url: Option<String>,
}

impl Default for InfoConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_API_TITLE.to_string(),
            description: DEFAULT_API_DESCRIPTION.to_string(),
            version: DEFAULT_API_VERSION.to_string(),
            terms_of_service_url: None,
            contact_name: None,
            contact_url: None,
            contact_email: None,
            license_name: None,
            license_url: None,
        }
    }
}

impl InfoConfig {
    /// Load info values from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(&env_lookup);
        config
    }

    /// Override fields for every key `lookup` knows about
    pub fn apply_overrides(&mut self, lookup: &Lookup<'_>) {
        override_string(&mut self.title, lookup, "API_TITLE");
        override_string(&mut self.description, lookup, "API_DESCRIPTION");
        override_string(&mut self.version, lookup, "API_VERSION");
        override_optional(&mut self.terms_of_service_url, lookup, "API_TERMS_OF_SERVICE_URL");
        override_optional(&mut self.contact_name, lookup, "API_CONTACT_NAME");
        override_optional(&mut self.contact_url, lookup, "API_CONTACT_URL");
        override_optional(&mut self.contact_email, lookup, "API_CONTACT_EMAIL");
        override_optional(&mut self.license_name, lookup, "API_LICENSE_NAME");
        override_optional(&mut self.license_url, lookup, "API_LICENSE_URL");
    }

    /// Whether any contact sub-field is configured
    pub const fn has_contact(&self) -> bool {
        self.contact_name.is_some() || self.contact_url.is_some() || self.contact_email.is_some()
    }

    /// Whether any license sub-field is configured
    pub const fn has_license(&self) -> bool {
        self.license_name.is_some() || self.license_url.is_some()
    }
}

impl validation::Validate for InfoConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(&self.title, "title")?;
        validation::validate_non_empty(&self.version, "version")?;

        if let Some(ref url) = self.terms_of_service_url {
            validation::validate_url(url, "terms_of_service_url")?;
        }
        if let Some(ref url) = self.contact_url {
            validation::validate_url(url, "contact_url")?;
        }
        if let Some(ref email) = self.contact_email {
            validation::validate_email(email, "contact_email")?;
        }
        if let Some(ref url) = self.license_url {
            validation::validate_url(url, "license_url")?;
        }

        // A license object is only valid with a name
        if self.has_license() && self.license_name.is_none() {
            return Err(ConfigError::MissingField {
                field: "license_name".to_string(),
            });
        }

        Ok(())
    }
}

/// Flags deciding what each document variant contains
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Build the all-inclusive variant (excluded routes shown)
    pub show_excluded: bool,

    /// Keep registered tags no surviving operation uses
    pub show_unused_tags: bool,

    /// Hide the document endpoints themselves
    pub hide_self: bool,

    /// Hide static-file routes
    pub hide_static: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            show_excluded: DEFAULT_SHOW_EXCLUDED,
            show_unused_tags: DEFAULT_SHOW_UNUSED_TAGS,
            hide_self: DEFAULT_HIDE_SELF,
            hide_static: DEFAULT_HIDE_STATIC,
        }
    }
}

impl BuildConfig {
    /// Load build flags from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(&env_lookup);
        config
    }

    /// Override fields for every key `lookup` knows about
    pub fn apply_overrides(&mut self, lookup: &Lookup<'_>) {
        override_flag(&mut self.show_excluded, lookup, "SHOW_OPENAPI_EXCLUDED");
        override_flag(&mut self.show_unused_tags, lookup, "SHOW_OPENAPI_UNUSED_TAGS");
        override_flag(&mut self.hide_self, lookup, "HIDE_OPENAPI_SELF");
        override_flag(&mut self.hide_static, lookup, "HIDE_OPENAPI_STATIC");
        override_flag(&mut self.hide_static, lookup, "HIDE_SANIC_STATIC");
    }
}

/// Listener for the document endpoints
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,

    /// Content type sent with the `.yml` documents
    pub yaml_content_type: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            yaml_content_type: DEFAULT_YAML_CONTENT_TYPE.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load listener settings from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(&env_lookup);
        config
    }

    /// Override fields for every key `lookup` knows about
    pub fn apply_overrides(&mut self, lookup: &Lookup<'_>) {
        override_string(&mut self.host, lookup, "OPENAPI_HOST");
        override_parsed(&mut self.port, lookup, "OPENAPI_PORT");
        override_string(&mut self.yaml_content_type, lookup, "OPENAPI_YAML_CONTENTTYPE");
    }
}

impl validation::Validate for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validation::validate_non_empty(&self.host, "host")?;
        validation::validate_port(self.port)?;
        validation::validate_non_empty(&self.yaml_content_type, "yaml_content_type")?;
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default tracing level when `RUST_LOG` is unset
    pub tracing_level: String,

    /// Emit JSON log lines
    pub log_json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            tracing_level: DEFAULT_TRACING_LEVEL.to_string(),
            log_json: DEFAULT_LOG_JSON,
        }
    }
}

impl TelemetryConfig {
    /// Load telemetry settings from environment variables with safe defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(&env_lookup);
        config
    }

    /// Override fields for every key `lookup` knows about
    pub fn apply_overrides(&mut self, lookup: &Lookup<'_>) {
        override_string(&mut self.tracing_level, lookup, "OPENAPI_TRACING_LEVEL");
        override_flag(&mut self.log_json, lookup, "OPENAPI_LOG_JSON");
    }
}

impl validation::Validate for TelemetryConfig {
    fn validate(&self) -> ConfigResult<()> {
        match self.tracing_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            _ => Err(ConfigError::InvalidTracingLevel {
                level: self.tracing_level.clone(),
            }),
        }
    }
}

impl DocsConfig {
    /// Load configuration from environment variables with safe defaults
    pub fn from_env() -> Self {
        Self::from_lookup(&env_lookup)
    }

    /// Defaults overlaid with every key `lookup` resolves
    pub fn from_lookup(lookup: &Lookup<'_>) -> Self {
        let mut config = Self::default();
        config.apply_overrides(lookup);
        config
    }

    /// Override fields for every key `lookup` knows about
    pub fn apply_overrides(&mut self, lookup: &Lookup<'_>) {
        self.info.apply_overrides(lookup);
        self.build.apply_overrides(lookup);
        self.server.apply_overrides(lookup);
        self.telemetry.apply_overrides(lookup);
    }
}

impl validation::Validate for DocsConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.info.validate()?;
        self.server.validate()?;
        self.telemetry.validate()?;
        Ok(())
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn override_string(target: &mut String, lookup: &Lookup<'_>, key: &str) {
    if let Some(value) = lookup(key) {
        *target = value;
    }
}

fn override_optional(target: &mut Option<String>, lookup: &Lookup<'_>, key: &str) {
    if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
        *target = Some(value);
    }
}

fn override_parsed<T: FromStr>(target: &mut T, lookup: &Lookup<'_>, key: &str) {
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!("Ignoring unparseable value for {key}: {raw:?}"),
        }
    }
}

fn override_flag(target: &mut bool, lookup: &Lookup<'_>, key: &str) {
    if let Some(raw) = lookup(key) {
        match parse_flag(&raw) {
            Some(value) => *target = value,
            None => tracing::warn!("Ignoring non-boolean value for {key}: {raw:?}"),
        }
    }
}

/// Parse the boolean spellings accepted in environment files
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_uses_safe_defaults() {
        let config = DocsConfig::default();

        assert_eq!(config.info.title, DEFAULT_API_TITLE);
        assert_eq!(config.info.description, DEFAULT_API_DESCRIPTION);
        assert_eq!(config.info.version, DEFAULT_API_VERSION);
        assert!(!config.info.has_contact());
        assert!(!config.info.has_license());
        assert!(!config.build.show_excluded);
        assert!(!config.build.show_unused_tags);
        assert!(config.build.hide_self);
        assert!(config.build.hide_static);
        assert_eq!(config.server.yaml_content_type, "application/x-yaml");
    }

    #[test]
    fn test_lookup_overrides() {
        let lookup = lookup_from(&[
            ("API_TITLE", "Pet Store"),
            ("API_VERSION", "2.1.0"),
            ("API_CONTACT_EMAIL", "team@example.com"),
            ("SHOW_OPENAPI_EXCLUDED", "true"),
            ("HIDE_SANIC_STATIC", "0"),
            ("OPENAPI_PORT", "9000"),
        ]);

        let config = DocsConfig::from_lookup(&lookup);

        assert_eq!(config.info.title, "Pet Store");
        assert_eq!(config.info.version, "2.1.0");
        assert_eq!(config.info.contact_email.as_deref(), Some("team@example.com"));
        assert!(config.info.has_contact());
        assert!(config.build.show_excluded);
        assert!(!config.build.hide_static);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_unparseable_overrides_keep_defaults() {
        let lookup = lookup_from(&[("OPENAPI_PORT", "eighty"), ("HIDE_OPENAPI_SELF", "maybe")]);

        let config = DocsConfig::from_lookup(&lookup);

        assert_eq!(config.server.port, DEFAULT_PORT);
        assert!(config.build.hide_self);
    }

    #[test]
    fn test_from_defaults_creates_valid_config() {
        let config = DocsConfig::default();
        let validation_result = config.validate();
        assert!(
            validation_result.is_ok(),
            "defaults should be valid: {validation_result:?}"
        );
    }

    #[test]
    fn test_config_validation_rejects_invalid_urls() {
        let mut config = DocsConfig::default();
        config.info.terms_of_service_url = Some("not-a-valid-url".to_string());

        let validation_result = config.validate();
        assert!(matches!(
            validation_result,
            Err(ConfigError::InvalidUrl { ref field, .. }) if field == "terms_of_service_url"
        ));
    }

    #[test]
    fn test_license_url_requires_name() {
        let mut config = DocsConfig::default();
        config.info.license_url = Some("https://opensource.org/licenses/MIT".to_string());
        assert!(config.validate().is_err());

        config.info.license_name = Some("MIT".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_telemetry_config_validation() {
        let mut config = DocsConfig::default();
        config.telemetry.tracing_level = "invalid-level".to_string();

        let validation_result = config.validate();
        assert!(validation_result.is_err());

        if let Err(error) = validation_result {
            assert!(error.to_string().contains("Invalid tracing level"));
        }
    }

    #[test]
    fn test_parse_flag_spellings() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" yes "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("2"), None);
    }

    #[test]
    fn test_configuration_serialization_roundtrip() {
        let mut original = DocsConfig::default();
        original.info.license_name = Some("MIT".to_string());
        original.build.show_unused_tags = true;

        let toml_string = toml::to_string(&original).unwrap();
        assert!(toml_string.contains("[info]"));

        let parsed: DocsConfig = toml::from_str(&toml_string).unwrap();
        assert_eq!(parsed, original);
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: DocsConfig = toml::from_str("[info]\ntitle = \"Widgets\"\n").unwrap();

        assert_eq!(parsed.info.title, "Widgets");
        assert_eq!(parsed.info.version, DEFAULT_API_VERSION);
        assert_eq!(parsed.server.port, DEFAULT_PORT);
    }
}
