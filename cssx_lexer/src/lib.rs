//! Byte-level lexer for a CSS-superset language
//!
//! [`lexical::Lexer`] turns a byte buffer into a [`tree::LexicalTree`] that
//! covers every input byte. Dialect extensions and quasi/annotation syntaxes
//! are configured through [`config::LexerOptions`].

// Internal modules
pub mod config;
pub mod file_processor;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod tree;
pub mod utils;

// Re-export key types for library consumers
pub use config::{ConfigError, LexerOptions, RuntimeConfig};
pub use lexical::{get_node_counts, tokenize, Lexer, LexerError, LexerInput, NodeCounts};
pub use pipeline::{PipelineError, PipelineResult};
pub use tree::{LexicalTree, Node, NodeId, NodeKind};
pub use utils::{Span, Stop};

pub use pipeline::output::PipelineOutput;
