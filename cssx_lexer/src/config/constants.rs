//! Fixed limits and literals shared across the crate

pub mod file_processing {
    /// Maximum source file size accepted by the file processor (16MB)
    pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

    /// Threshold above which a file counts as large (1MB)
    pub const LARGE_FILE_THRESHOLD: u64 = 1024 * 1024;

    /// Extensions recognized as stylesheet sources
    pub const SOURCE_EXTENSIONS: &[&str] = &["css", "cssx", "scss", "less"];
}

pub mod lexical {
    /// Hex digits accepted by a CSS escape
    pub const MAX_STANDARD_ESCAPE_DIGITS: usize = 6;

    /// Label used for sources without a filename
    pub const DEFAULT_FILENAME: &str = "[input]";

    /// Initial capacity of the frame stack
    pub const INITIAL_STACK_CAPACITY: usize = 16;
}

/// Hex digit counts that make a hash a valid color
pub const VALID_COLOR_DIGIT_COUNTS: [usize; 4] = [3, 4, 6, 8];

pub const DEFAULT_QUASI_SYNTAX: &str = "#{}";

pub const DEFAULT_ANNOTATION_SYNTAX: &str = "#[]";
