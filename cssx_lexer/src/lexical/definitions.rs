//! Pre-validated quasi and annotation syntax tables
//!
//! A syntax is a run of operator prefix bytes followed by a bracket pair, for
//! example `#{}` or `@[]`. Matching uses the syntax without its closing byte; the
//! opening bracket then starts a group inside the fragment.

use super::Context;
use crate::config::{AnnotationDefinitionOptions, ConfigError, QuasiDefinitionOptions};
use crate::tree::Placement;
use crate::utils::ascii;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuasiDefinition {
    pub syntax: String,
    pub(crate) pattern: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationDefinition {
    pub syntax: String,
    pub placement: Placement,
    pub(crate) pattern: Vec<u8>,
}

/// Read-only lookup tables built once per lexer
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    quasi: [Vec<QuasiDefinition>; 14],
    annotations: Vec<AnnotationDefinition>,
}

impl Definitions {
    pub fn build(
        quasi: &[QuasiDefinitionOptions],
        annotations: &[AnnotationDefinitionOptions],
    ) -> Result<Self, ConfigError> {
        let mut definitions = Self::default();

        for options in quasi {
            let mask = options
                .contexts
                .iter()
                .fold(Context::from_bits(0), |mask, selector| mask | selector.mask());

            for syntax in &options.syntaxes {
                let pattern = validate_syntax(syntax)?;
                for context in mask.iter() {
                    let table = &mut definitions.quasi[context.index()];
                    if !table.iter().any(|known| &known.syntax == syntax) {
                        table.push(QuasiDefinition {
                            syntax: syntax.clone(),
                            pattern: pattern.clone(),
                        });
                    }
                }
            }
        }

        for options in annotations {
            let pattern = validate_syntax(&options.syntax)?;
            let duplicate = definitions.annotations.iter().any(|known| {
                known.syntax == options.syntax && known.placement == options.placement
            });
            if !duplicate {
                definitions.annotations.push(AnnotationDefinition {
                    syntax: options.syntax.clone(),
                    placement: options.placement,
                    pattern,
                });
            }
        }

        Ok(definitions)
    }

    /// Quasi syntaxes recognized in a single context
    pub fn quasi_for(&self, context: Context) -> &[QuasiDefinition] {
        &self.quasi[context.index()]
    }

    pub fn annotations(&self) -> &[AnnotationDefinition] {
        &self.annotations
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty() && self.quasi.iter().all(Vec::is_empty)
    }
}

/// Check a syntax and return its matching pattern
pub fn validate_syntax(syntax: &str) -> Result<Vec<u8>, ConfigError> {
    let bytes = syntax.as_bytes();
    if bytes.len() < 2 {
        return Err(ConfigError::invalid_syntax(
            syntax,
            "expected a bracket pair such as {}",
        ));
    }

    let (prefix, pair) = bytes.split_at(bytes.len() - 2);
    if let Some(&bad) = prefix.iter().find(|&&b| !ascii::is_fragment_prefix(b)) {
        return Err(ConfigError::invalid_syntax(
            syntax,
            &format!("'{}' is not an operator character", bad as char),
        ));
    }
    if !ascii::is_complement(pair[0], pair[1]) {
        return Err(ConfigError::invalid_syntax(
            syntax,
            "must end with {}, [] or ()",
        ));
    }

    Ok(bytes[..bytes.len() - 1].to_vec())
}
