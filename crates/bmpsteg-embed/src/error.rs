use bmpsteg_carrier::CarrierError;
use bmpsteg_frame::FrameError;

/// Errors that can occur while hiding or extracting a file.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// Carrier, secret or output file error.
    #[error("carrier error: {0}")]
    Carrier(#[from] CarrierError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// The carrier cannot hold the secret.
    #[error("insufficient capacity: {required} carrier bytes required, {available} available")]
    InsufficientCapacity { required: u64, available: u64 },

    /// A decoded extension cannot be used in a file name.
    #[error("invalid extension {0:?}")]
    InvalidExtension(String),

    /// I/O error outside the frame walkers.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EmbedError>;
