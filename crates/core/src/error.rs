//! Error types for script slide conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading notes, packing them, or writing slides.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The file format is not supported or could not be detected.
    #[error("Unsupported or unrecognized file format: {0}")]
    UnsupportedFormat(String),

    /// Failed to parse the PPTX file structure.
    #[error("PPTX parsing error: {0}")]
    PptxParseError(String),

    /// Invalid or corrupted file.
    #[error("Invalid or corrupted file: {0}")]
    CorruptedFile(String),

    /// ZIP archive error.
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    XmlError(String),

    /// The input is larger than the configured limit.
    #[error("Input too large: {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: u64, limit: u64 },

    /// The character budget per slide must be positive.
    #[error("Invalid character budget: {0} (must be at least 1)")]
    InvalidBudget(usize),

    /// A color string was not in `#RRGGBB` form.
    #[error("Invalid color '{0}': expected #RRGGBB")]
    InvalidColor(String),

    /// A speaker palette could not be used.
    #[error("Invalid palette: {0}")]
    InvalidPalette(String),
}
