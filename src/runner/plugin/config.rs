//! Helper configuration file parsing.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Which default libraries get installed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// `list`, `set` and `map`.
    pub extension_functions: bool,
    /// `distinct`, `sorted`, `reversed`, `take` and `drop` on lists.
    pub implicit_methods: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            extension_functions: true,
            implicit_methods: true,
        }
    }
}

/// Which implicit resolvers join the resolver chains.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    pub implicit_properties: bool,
    pub implicit_constructors: bool,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        ResolutionConfig {
            implicit_properties: true,
            implicit_constructors: true,
        }
    }
}

/// Complete helper configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HelperConfig {
    pub defaults: DefaultsConfig,
    pub resolution: ResolutionConfig,
}

impl HelperConfig {
    /// Load configuration from a TOML file.
    ///
    /// Expected format:
    /// ```toml
    /// [defaults]
    /// extension_functions = true
    /// implicit_methods = false
    ///
    /// [resolution]
    /// implicit_properties = true
    /// implicit_constructors = true
    /// ```
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing keys keep their
    /// defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = HelperConfig::parse("").unwrap();
        assert_eq!(config, HelperConfig::default());
        assert!(config.defaults.implicit_methods);
        assert!(config.resolution.implicit_constructors);
    }

    #[test]
    fn test_parse_partial_config() {
        let config = HelperConfig::parse(
            r#"
            [defaults]
            implicit_methods = false

            [resolution]
            implicit_properties = false
            "#,
        )
        .unwrap();
        assert!(config.defaults.extension_functions);
        assert!(!config.defaults.implicit_methods);
        assert!(!config.resolution.implicit_properties);
        assert!(config.resolution.implicit_constructors);
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let err = HelperConfig::parse("[defaults]\nimplicit_methods = \"yes\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
