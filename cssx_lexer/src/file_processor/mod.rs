//! Source file reading with size limits and global logging integration

mod processor;

use crate::config::constants::file_processing::{LARGE_FILE_THRESHOLD, MAX_FILE_SIZE};
use crate::log_debug;
pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

/// Process a file with default settings
pub fn process_file(file_path: &str) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

pub fn create_processor() -> FileProcessor {
    FileProcessor::new()
}

pub fn get_max_file_size() -> u64 {
    MAX_FILE_SIZE
}

pub fn get_large_file_threshold() -> u64 {
    LARGE_FILE_THRESHOLD
}

/// Check that every file processing code is registered (for system startup)
pub fn init_file_processor_logging() -> Result<(), String> {
    use crate::logging::codes;

    let file_codes = [
        codes::file_processing::FILE_NOT_FOUND,
        codes::file_processing::FILE_TOO_LARGE,
        codes::file_processing::PERMISSION_DENIED,
        codes::file_processing::IO_ERROR,
        codes::file_processing::INVALID_PATH,
        codes::success::FILE_PROCESSING_SUCCESS,
    ];

    for code in &file_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processor code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }

    log_debug!("File processor configuration loaded",
        "max_file_size" => MAX_FILE_SIZE,
        "large_file_threshold" => LARGE_FILE_THRESHOLD);

    Ok(())
}
