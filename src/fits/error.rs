use std::path::PathBuf;

/// Errors raised while opening or reading a FITS file
#[derive(Debug, thiserror::Error)]
pub enum FitsError {
    /// The file does not exist
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// I/O error while reading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a structurally valid FITS file
    #[error("Invalid FITS format: {0}")]
    InvalidFormat(String),
}
