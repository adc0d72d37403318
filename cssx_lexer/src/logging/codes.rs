//! Error, warning and success codes with their classification metadata
//!
//! Single source of truth for every code the crate logs.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Configuration error codes
pub mod config {
    use super::Code;

    pub const INVALID_FRAGMENT_SYNTAX: Code = Code::new("E001");
    pub const CONFIG_PARSE_ERROR: Code = Code::new("E002");
    pub const CONFIG_IO_ERROR: Code = Code::new("E003");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Recovered lexical constructs. Lexing never fails, so these are warnings.
pub mod lexical {
    use super::Code;

    pub const UNTERMINATED_QUOTED: Code = Code::new("W020");
    pub const UNTERMINATED_GROUP: Code = Code::new("W021");
    pub const UNTERMINATED_COMMENT: Code = Code::new("W022");
    pub const UNTERMINATED_URL: Code = Code::new("W023");
    pub const UNTERMINATED_FRAGMENT: Code = Code::new("W024");
    pub const DANGLING_CLOSER: Code = Code::new("W025");
    pub const INVALID_HASH_COLOR: Code = Code::new("W026");
    pub const UNTERMINATED_ESCAPE: Code = Code::new("W027");
    pub const UNEXPECTED_CHARACTER: Code = Code::new("W028");

    pub const INVALID_RESUME_TARGET: Code = Code::new("E020");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const CONFIGURATION_LOADED: Code = Code::new("I010");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const PIPELINE_COMPLETE: Code = Code::new("I030");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static METADATA: &[ErrorMetadata] = &[
    // System
    ErrorMetadata::new(
        "ERR001",
        "System",
        Severity::Critical,
        false,
        "Critical internal system error",
        "File a bug report with the input that triggered it",
    ),
    ErrorMetadata::new(
        "ERR002",
        "System",
        Severity::Critical,
        false,
        "System initialization failure",
        "Check logging configuration and environment variables",
    ),
    // Configuration
    ErrorMetadata::new(
        "E001",
        "Configuration",
        Severity::High,
        false,
        "Quasi or annotation syntax is malformed",
        "Use up to two operator characters followed by {}, [] or ()",
    ),
    ErrorMetadata::new(
        "E002",
        "Configuration",
        Severity::High,
        false,
        "Configuration file could not be parsed",
        "Check the TOML syntax and option names",
    ),
    ErrorMetadata::new(
        "E003",
        "Configuration",
        Severity::High,
        false,
        "Configuration file could not be read",
        "Check that the path exists and is readable",
    ),
    // File processing
    ErrorMetadata::new(
        "E005",
        "FileProcessing",
        Severity::High,
        false,
        "Source file not found",
        "Check the file path",
    ),
    ErrorMetadata::new(
        "E007",
        "FileProcessing",
        Severity::High,
        false,
        "Source file exceeds the maximum size",
        "Split the stylesheet or lex it in ranges",
    ),
    ErrorMetadata::new(
        "E009",
        "FileProcessing",
        Severity::High,
        false,
        "Permission denied reading the source file",
        "Check file permissions",
    ),
    ErrorMetadata::new(
        "E011",
        "FileProcessing",
        Severity::High,
        false,
        "I/O error while reading the source file",
        "Retry or check the underlying device",
    ),
    ErrorMetadata::new(
        "E012",
        "FileProcessing",
        Severity::Medium,
        false,
        "Path is empty or not a regular file",
        "Pass the path of a stylesheet file",
    ),
    // Lexical recoveries
    ErrorMetadata::new(
        "W020",
        "Lexical",
        Severity::Medium,
        true,
        "String closed by a newline or the end of input",
        "Add the closing quote or escape the line break",
    ),
    ErrorMetadata::new(
        "W021",
        "Lexical",
        Severity::Medium,
        true,
        "Group still open at the end of input",
        "Add the missing closing delimiter",
    ),
    ErrorMetadata::new(
        "W022",
        "Lexical",
        Severity::Medium,
        true,
        "Comment still open at the end of input",
        "Close the comment with */",
    ),
    ErrorMetadata::new(
        "W023",
        "Lexical",
        Severity::Medium,
        true,
        "url( literal still open at the end of input",
        "Add the closing parenthesis",
    ),
    ErrorMetadata::new(
        "W024",
        "Lexical",
        Severity::Medium,
        true,
        "Quasi or annotation still open at the end of input",
        "Close the fragment body",
    ),
    ErrorMetadata::new(
        "W025",
        "Lexical",
        Severity::Low,
        true,
        "Closing delimiter does not match the innermost open group",
        "Remove the delimiter or fix the opening one",
    ),
    ErrorMetadata::new(
        "W026",
        "Lexical",
        Severity::Low,
        true,
        "Hash is neither a name nor a 3, 4, 6 or 8 digit color",
        "Fix the color digits",
    ),
    ErrorMetadata::new(
        "W027",
        "Lexical",
        Severity::Low,
        true,
        "\\u{ escape without a closing brace",
        "Close the escape with }",
    ),
    ErrorMetadata::new(
        "W028",
        "Lexical",
        Severity::Low,
        true,
        "Bytes that start no token",
        "Remove or escape the characters",
    ),
    ErrorMetadata::new(
        "E020",
        "Lexical",
        Severity::High,
        false,
        "Resume target is not a branch of the tree",
        "Resume into the root or an existing branch node",
    ),
    // Success
    ErrorMetadata::new(
        "I004",
        "System",
        Severity::Low,
        true,
        "Logging system initialized",
        "None",
    ),
    ErrorMetadata::new(
        "I006",
        "FileProcessing",
        Severity::Low,
        true,
        "Source file read successfully",
        "Continue to lexical analysis",
    ),
    ErrorMetadata::new(
        "I010",
        "Configuration",
        Severity::Low,
        true,
        "Configuration loaded",
        "None",
    ),
    ErrorMetadata::new(
        "I020",
        "Lexical",
        Severity::Low,
        true,
        "Tokenization completed",
        "Inspect invalid nodes if any were reported",
    ),
    ErrorMetadata::new(
        "I030",
        "Pipeline",
        Severity::Low,
        true,
        "File lexed end to end",
        "None",
    ),
];

static REGISTRY: OnceLock<HashMap<&'static str, &'static ErrorMetadata>> = OnceLock::new();

fn get_registry() -> &'static HashMap<&'static str, &'static ErrorMetadata> {
    REGISTRY.get_or_init(|| METADATA.iter().map(|meta| (meta.code, meta)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_registry().get(code).copied()
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
