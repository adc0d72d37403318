//! File-to-tree pipeline: read a stylesheet, lex it, gather counts

mod error;
pub mod output;
mod result;
mod validation;

pub use error::PipelineError;
pub use output::PipelineOutput;
pub use result::PipelineResult;
pub use validation::validate_pipeline;

use crate::config::LexerOptions;
use crate::lexical::{get_node_counts, Lexer, LexerInput};
use crate::logging;
use std::path::PathBuf;
use std::time::Instant;

/// Read `file_path` and lex it with `options`
pub fn process_file(
    file_path: &str,
    options: &LexerOptions,
) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();

    logging::with_file_context(PathBuf::from(file_path), || {
        crate::log_info!("Starting lexing pipeline", "file" => file_path);

        let mut lexer = Lexer::with_options(options.clone())?;
        let file_result = crate::file_processor::process_file(file_path)?;

        let tree = lexer.tokenize_input(
            LexerInput::new(&file_result.source).with_filename(file_path),
        );
        let node_counts = get_node_counts(&tree);

        let result = PipelineResult::new(
            tree,
            file_result.source,
            file_result.metadata,
            lexer.metrics().clone(),
            node_counts,
            start_time.elapsed(),
        );

        result.log_success(file_path);

        Ok(result)
    })
}
