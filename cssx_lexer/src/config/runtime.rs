// RUNTIME PREFERENCES (dialect selection and logging)

use crate::lexical::Context;
use crate::logging::LogLevel;
use crate::tree::Placement;
use serde::{Deserialize, Serialize};
use std::env;

/// Dialect configuration of the lexer.
///
/// Field names follow the kebab-case option names used in configuration
/// files. Defaults describe plain CSS and can be overridden through the
/// `CSSX_*` environment variables listed in [`env_vars`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LexerOptions {
    /// Binary/octal/hex integers, `_` digit separators and a trailing dot
    pub extended_numbers: bool,

    /// Named escapes, `\xHH`, `\uHHHH`, `\u{H+}` and `\dD`
    pub extended_escapes: bool,

    /// CSS hex escapes: 1 to 6 hex digits and one optional trailing blank
    pub standard_escapes: bool,

    /// Backtick-quoted strings; newlines no longer end a string
    pub extended_strings: bool,

    /// `//` line comments and nested block comments
    pub extended_comments: bool,

    /// `url(...)` literals
    pub standard_urls: bool,

    /// `<!--` and `-->` markers
    pub standard_cdx: bool,

    pub quasi_definitions: Vec<QuasiDefinitionOptions>,

    pub annotation_definitions: Vec<AnnotationDefinitionOptions>,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            extended_numbers: env_flag(env_vars::EXTENDED_NUMBERS, false),
            extended_escapes: env_flag(env_vars::EXTENDED_ESCAPES, false),
            standard_escapes: env_flag(env_vars::STANDARD_ESCAPES, true),
            extended_strings: env_flag(env_vars::EXTENDED_STRINGS, false),
            extended_comments: env_flag(env_vars::EXTENDED_COMMENTS, false),
            standard_urls: env_flag(env_vars::STANDARD_URLS, true),
            standard_cdx: env_flag(env_vars::STANDARD_CDX, true),
            quasi_definitions: Vec::new(),
            annotation_definitions: Vec::new(),
        }
    }
}

impl LexerOptions {
    /// Plain CSS, ignoring the environment
    pub fn standard() -> Self {
        Self {
            extended_numbers: false,
            extended_escapes: false,
            standard_escapes: true,
            extended_strings: false,
            extended_comments: false,
            standard_urls: true,
            standard_cdx: true,
            quasi_definitions: Vec::new(),
            annotation_definitions: Vec::new(),
        }
    }

    /// Every dialect extension switched on, ignoring the environment
    pub fn extended() -> Self {
        Self {
            extended_numbers: true,
            extended_escapes: true,
            extended_strings: true,
            extended_comments: true,
            ..Self::standard()
        }
    }

    pub fn with_quasi(mut self, contexts: Vec<ContextSelector>, syntaxes: Vec<&str>) -> Self {
        self.quasi_definitions.push(QuasiDefinitionOptions {
            contexts,
            syntaxes: syntaxes.into_iter().map(str::to_string).collect(),
        });
        self
    }

    pub fn with_annotation(mut self, placement: Placement, syntax: &str) -> Self {
        self.annotation_definitions
            .push(AnnotationDefinitionOptions {
                placement,
                syntax: syntax.to_string(),
            });
        self
    }
}

/// Interpolation syntaxes recognized inside the selected contexts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct QuasiDefinitionOptions {
    #[serde(default = "default_quasi_contexts")]
    pub contexts: Vec<ContextSelector>,

    #[serde(default = "default_quasi_syntaxes")]
    pub syntaxes: Vec<String>,
}

fn default_quasi_contexts() -> Vec<ContextSelector> {
    vec![ContextSelector::Any]
}

fn default_quasi_syntaxes() -> Vec<String> {
    vec![crate::config::constants::DEFAULT_QUASI_SYNTAX.to_string()]
}

impl Default for QuasiDefinitionOptions {
    fn default() -> Self {
        Self {
            contexts: default_quasi_contexts(),
            syntaxes: default_quasi_syntaxes(),
        }
    }
}

/// An annotation syntax, recognized wherever groups are lexed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AnnotationDefinitionOptions {
    #[serde(default)]
    pub placement: Placement,

    #[serde(default = "default_annotation_syntax")]
    pub syntax: String,
}

fn default_annotation_syntax() -> String {
    crate::config::constants::DEFAULT_ANNOTATION_SYNTAX.to_string()
}

impl Default for AnnotationDefinitionOptions {
    fn default() -> Self {
        Self {
            placement: Placement::default(),
            syntax: default_annotation_syntax(),
        }
    }
}

/// A single lexical context or one of the named context masks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextSelector {
    Root,
    Parentheses,
    Brackets,
    Braces,
    Double,
    Single,
    Backtick,
    Url,
    Block,
    Line,
    Quasi,
    Annotation,
    Identifier,
    Hash,
    Group,
    Quoted,
    Comment,
    Fragment,
    Name,
    Any,
}

impl ContextSelector {
    pub fn mask(self) -> Context {
        match self {
            ContextSelector::Root => Context::ROOT,
            ContextSelector::Parentheses => Context::PARENTHESES,
            ContextSelector::Brackets => Context::BRACKETS,
            ContextSelector::Braces => Context::BRACES,
            ContextSelector::Double => Context::DOUBLE,
            ContextSelector::Single => Context::SINGLE,
            ContextSelector::Backtick => Context::BACKTICK,
            ContextSelector::Url => Context::URL,
            ContextSelector::Block => Context::BLOCK,
            ContextSelector::Line => Context::LINE,
            ContextSelector::Quasi => Context::QUASI,
            ContextSelector::Annotation => Context::ANNOTATION,
            ContextSelector::Identifier => Context::IDENTIFIER,
            ContextSelector::Hash => Context::HASH,
            ContextSelector::Group => Context::GROUP,
            ContextSelector::Quoted => Context::QUOTED,
            ContextSelector::Comment => Context::COMMENT,
            ContextSelector::Fragment => Context::FRAGMENT,
            ContextSelector::Name => Context::NAME,
            ContextSelector::Any => Context::ANY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Emit JSON lines instead of plain text
    pub use_structured_logging: bool,

    /// Whether console output is enabled at all
    pub enable_console_logging: bool,

    /// Least severe level that gets logged
    pub min_log_level: LogLevel,

    /// Report every recovered construct as a warning
    pub log_recoveries: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_flag(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_flag(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            log_recoveries: env_flag(env_vars::LOGGING_LOG_RECOVERIES, true),
        }
    }
}

/// Parse log level from string (used for environment variables and the CLI)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Complete runtime configuration, as read from a TOML file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexer: LexerOptions,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexer
    pub const EXTENDED_NUMBERS: &str = "CSSX_EXTENDED_NUMBERS";
    pub const EXTENDED_ESCAPES: &str = "CSSX_EXTENDED_ESCAPES";
    pub const STANDARD_ESCAPES: &str = "CSSX_STANDARD_ESCAPES";
    pub const EXTENDED_STRINGS: &str = "CSSX_EXTENDED_STRINGS";
    pub const EXTENDED_COMMENTS: &str = "CSSX_EXTENDED_COMMENTS";
    pub const STANDARD_URLS: &str = "CSSX_STANDARD_URLS";
    pub const STANDARD_CDX: &str = "CSSX_STANDARD_CDX";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CSSX_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "CSSX_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "CSSX_LOGGING_MIN_LEVEL";
    pub const LOGGING_LOG_RECOVERIES: &str = "CSSX_LOGGING_LOG_RECOVERIES";
}
