//! Configuration for the lexer
//!
//! Fixed limits live in [`constants`]; user preferences in [`runtime`] are
//! read from the environment or from a TOML file.

pub mod constants;
pub mod runtime;

pub use runtime::{
    AnnotationDefinitionOptions, ContextSelector, LexerOptions, LoggingPreferences,
    QuasiDefinitionOptions, RuntimeConfig,
};

use crate::logging::codes::{self, Code};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid fragment syntax '{syntax}': {reason}")]
    InvalidSyntax { syntax: String, reason: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Failed to read configuration '{path}': {message}")]
    IoError { path: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        match self {
            ConfigError::InvalidSyntax { .. } => codes::config::INVALID_FRAGMENT_SYNTAX,
            ConfigError::ParseError { .. } => codes::config::CONFIG_PARSE_ERROR,
            ConfigError::IoError { .. } => codes::config::CONFIG_IO_ERROR,
        }
    }

    pub(crate) fn invalid_syntax(syntax: &str, reason: &str) -> Self {
        ConfigError::InvalidSyntax {
            syntax: syntax.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::ParseError {
            message: error.to_string(),
        }
    }
}

impl RuntimeConfig {
    /// Parse a TOML document; omitted keys take their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|e| {
            let error = ConfigError::IoError {
                path: path.display().to_string(),
                message: e.to_string(),
            };
            crate::log_error!(error.error_code(), "Failed to read configuration file",
                "path" => path.display());
            error
        })?;

        let config = Self::from_toml_str(&source).map_err(|error| {
            crate::log_error!(error.error_code(), "Failed to parse configuration file",
                "path" => path.display());
            error
        })?;

        crate::log_debug!("Configuration loaded",
            "path" => path.display(),
            "quasi_definitions" => config.lexer.quasi_definitions.len(),
            "annotation_definitions" => config.lexer.annotation_definitions.len());

        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }
}

impl LexerOptions {
    /// Parse lexer options from a TOML document holding them at top level
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Placement;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_parse_lexer_section() {
        let config = RuntimeConfig::from_toml_str(
            r##"
            [lexer]
            extended-numbers = true
            extended-comments = true
            standard-cdx = false

            [[lexer.quasi-definitions]]
            contexts = ["group", "quoted"]
            syntaxes = ["#{}", "${}"]

            [[lexer.annotation-definitions]]
            placement = "inner"
            syntax = "@[]"
            "##,
        )
        .unwrap();

        assert!(config.lexer.extended_numbers);
        assert!(config.lexer.extended_comments);
        assert!(!config.lexer.standard_cdx);
        assert_eq!(
            config.lexer.quasi_definitions[0].contexts,
            vec![ContextSelector::Group, ContextSelector::Quoted]
        );
        assert_eq!(config.lexer.annotation_definitions[0].placement, Placement::Inner);
        assert_eq!(config.lexer.annotation_definitions[0].syntax, "@[]");
    }

    #[test]
    fn test_definition_defaults() {
        let options = LexerOptions::from_toml_str(
            r#"
            [[quasi-definitions]]

            [[annotation-definitions]]
            "#,
        )
        .unwrap();

        assert_eq!(options.quasi_definitions[0].syntaxes, vec!["#{}"]);
        assert_eq!(options.quasi_definitions[0].contexts, vec![ContextSelector::Any]);
        assert_eq!(options.annotation_definitions[0].syntax, "#[]");
        assert_eq!(options.annotation_definitions[0].placement, Placement::Outer);
    }

    #[test]
    fn test_parse_error() {
        let result = LexerOptions::from_toml_str("extended-numbers = \"yes\"");
        assert_matches!(result, Err(ConfigError::ParseError { .. }));

        let error = result.unwrap_err();
        assert_eq!(error.error_code(), codes::config::CONFIG_PARSE_ERROR);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[lexer]\nextended-strings = true").unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert!(config.lexer.extended_strings);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = RuntimeConfig::load(&dir.path().join("missing.toml"));
        assert_matches!(result, Err(ConfigError::IoError { .. }));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = RuntimeConfig::default();
        config.lexer = LexerOptions::extended().with_quasi(vec![ContextSelector::Any], vec!["#{}"]);

        let text = config.to_toml_string().unwrap();
        let parsed = RuntimeConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed.lexer, config.lexer);
    }
}
