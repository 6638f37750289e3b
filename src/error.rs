use std::path::PathBuf;

/// Result type shared by all curation stages
pub type CurationResult<T> = Result<T, CurationError>;

/// Error types for the curation pipeline
#[derive(Debug)]
pub enum CurationError {
    /// Image file could not be read or decoded
    Decode(PathBuf, String),
    /// A required directory (dataset root, partition root) is missing
    NotFound(PathBuf),
    /// Filesystem operation failed (move/delete/permission)
    Io(std::io::Error),
    /// A split move would overwrite an existing file in the target partition
    MoveCollision(PathBuf),
    /// Color-space selector outside the supported set
    UnsupportedMode(String),
}

impl std::fmt::Display for CurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CurationError::Decode(path, msg) => {
                write!(f, "Failed to decode image {:?}: {}", path, msg)
            }
            CurationError::NotFound(path) => write!(f, "Directory not found: {:?}", path),
            CurationError::Io(e) => write!(f, "I/O error: {}", e),
            CurationError::MoveCollision(path) => {
                write!(f, "Refusing to overwrite existing file: {:?}", path)
            }
            CurationError::UnsupportedMode(mode) => {
                write!(f, "Unsupported colour space mode: {:?}", mode)
            }
        }
    }
}

impl std::error::Error for CurationError {}

impl From<std::io::Error> for CurationError {
    fn from(error: std::io::Error) -> Self {
        CurationError::Io(error)
    }
}
