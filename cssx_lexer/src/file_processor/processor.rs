//! File processor implementation with size limits and global logging integration

use crate::config::constants::file_processing::{
    LARGE_FILE_THRESHOLD, MAX_FILE_SIZE, SOURCE_EXTENSIONS,
};
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// File processor specific errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    pub fn severity(&self) -> &'static str {
        codes::get_severity(self.error_code().as_str()).as_str()
    }

    pub fn category(&self) -> &'static str {
        codes::get_category(self.error_code().as_str())
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }

    /// Build the error for a failed filesystem call, logging it
    fn from_io(error: std::io::Error, path: &Path, operation: &str) -> Self {
        let path_str = path.display().to_string();
        let processor_error = match error.kind() {
            std::io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path_str.clone(),
            },
            std::io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path_str.clone(),
            },
            _ => FileProcessorError::IoError {
                message: format!("Failed to {} '{}': {}", operation, path_str, error),
            },
        };

        log_error!(processor_error.error_code(), "File system operation failed",
            "path" => path_str,
            "operation" => operation,
            "io_error" => error);

        processor_error
    }
}

/// File metadata collected during processing
#[derive(Debug, Clone)]
pub struct FileMetadata {
    /// Canonical file path
    pub path: PathBuf,
    pub size: u64,
    /// Lowercased extension, if any
    pub extension: Option<String>,
    /// Number of lines, counted the way the lexer counts them
    pub line_count: usize,
    /// Whether the extension is a known stylesheet extension
    pub is_stylesheet: bool,
    pub modified: Option<SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    pub fn is_large_file(&self) -> bool {
        self.size > LARGE_FILE_THRESHOLD
    }

    /// Modification time as an RFC 3339 timestamp
    pub fn modified_rfc3339(&self) -> Option<String> {
        self.modified
            .map(|time| chrono::DateTime::<chrono::Utc>::from(time).to_rfc3339())
    }
}

/// File contents with metadata. The source is kept as raw bytes; the lexer
/// does not require valid UTF-8.
#[derive(Debug, Clone)]
pub struct FileProcessingResult {
    pub source: Vec<u8>,
    pub metadata: FileMetadata,
    pub processing_duration: Duration,
}

impl FileProcessingResult {
    /// Codepoint count, counting every non-continuation byte
    pub fn codepoint_count(&self) -> usize {
        self.source
            .iter()
            .filter(|&&byte| !crate::utils::utf8::is_continuation(byte))
            .count()
    }

    /// Whether the source holds nothing but blanks
    pub fn is_effectively_empty(&self) -> bool {
        self.source
            .iter()
            .all(|&byte| crate::utils::ascii::is_blank(byte))
    }

    /// Bytes read per millisecond
    pub fn processing_rate(&self) -> f64 {
        let duration_ms = self.processing_duration.as_secs_f64() * 1000.0;
        if duration_ms > 0.0 {
            self.source.len() as f64 / duration_ms
        } else {
            0.0
        }
    }
}

pub struct FileProcessor {
    /// Log size and rate details on success
    pub enable_performance_logging: bool,
    /// Log a debug event for files without a stylesheet extension
    pub log_foreign_extensions: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self {
            enable_performance_logging: true,
            log_foreign_extensions: true,
        }
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn with_foreign_extension_logging(mut self, enabled: bool) -> Self {
        self.log_foreign_extensions = enabled;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Read a source file and collect its metadata
    pub fn process_file(
        &self,
        file_path: &str,
    ) -> Result<FileProcessingResult, FileProcessorError> {
        let start_time = Instant::now();

        log_debug!("Starting file processing", "file" => file_path);

        let path = self.validate_path(file_path)?;
        let mut metadata = self.get_metadata(&path)?;
        self.validate_size(&metadata, file_path)?;

        let source = fs::read(&path).map_err(|e| FileProcessorError::from_io(e, &path, "read"))?;
        metadata.line_count = crate::utils::SourceMap::new(source.clone()).line_count();

        let result = FileProcessingResult {
            source,
            metadata,
            processing_duration: start_time.elapsed(),
        };

        self.log_processing_success(&result, file_path);

        if !result.metadata.is_stylesheet && self.log_foreign_extensions {
            log_debug!("Processing file without a stylesheet extension",
                "extension" => result.metadata.extension.as_deref().unwrap_or("none"),
                "file" => file_path);
        }

        Ok(result)
    }

    fn log_processing_success(&self, result: &FileProcessingResult, file_path: &str) {
        let duration_ms = format!("{:.2}", result.processing_duration.as_secs_f64() * 1000.0);

        if self.enable_performance_logging {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully with performance metrics",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "size_human" => result.metadata.human_readable_size(),
                "lines" => result.metadata.line_count,
                "codepoints" => result.codepoint_count(),
                "duration_ms" => duration_ms,
                "bytes_per_ms" => format!("{:.2}", result.processing_rate()),
                "is_large_file" => result.metadata.is_large_file()
            );
        } else {
            log_success!(
                codes::success::FILE_PROCESSING_SUCCESS,
                "File processed successfully",
                "file" => file_path,
                "size_bytes" => result.metadata.size,
                "lines" => result.metadata.line_count,
                "duration_ms" => duration_ms
            );
        }
    }

    fn validate_path(&self, file_path: &str) -> Result<PathBuf, FileProcessorError> {
        if file_path.is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        let path = Path::new(file_path);

        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => file_path);
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: file_path.to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => file_path);
            return Err(error);
        }

        let canonical_path = path
            .canonicalize()
            .map_err(|e| FileProcessorError::from_io(e, path, "resolve"))?;
        log_debug!("Path validation successful",
            "canonical_path" => canonical_path.display());
        Ok(canonical_path)
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata =
            fs::metadata(path).map_err(|e| FileProcessorError::from_io(e, path, "stat"))?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());
        let is_stylesheet = extension
            .as_deref()
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));

        let file_metadata = FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            line_count: 0,
            is_stylesheet,
            modified: metadata.modified().ok(),
        };

        log_debug!("File metadata collected",
            "size_bytes" => file_metadata.size,
            "size_human" => file_metadata.human_readable_size(),
            "extension" => file_metadata.extension.as_deref().unwrap_or("none"),
            "is_stylesheet" => file_metadata.is_stylesheet,
            "modified" => file_metadata.modified_rfc3339().unwrap_or_default());

        Ok(file_metadata)
    }

    fn validate_size(
        &self,
        metadata: &FileMetadata,
        file_path: &str,
    ) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds the maximum size limit",
                "file" => file_path,
                "size_bytes" => metadata.size,
                "size_human" => metadata.human_readable_size(),
                "limit_bytes" => MAX_FILE_SIZE);
            return Err(error);
        }
        Ok(())
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}
