use crate::config::ConfigError;
use crate::file_processor::FileProcessorError;

/// Pipeline processing errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Configuration rejected: {0}")]
    Config(#[from] ConfigError),

    #[error("File processing failed: {0}")]
    FileProcessing(#[from] FileProcessorError),

    #[error("Output serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            PipelineError::Config(error) => error.error_code(),
            PipelineError::FileProcessing(error) => error.error_code(),
            PipelineError::Serialization(_) => crate::logging::codes::system::INTERNAL_ERROR,
        }
    }
}
