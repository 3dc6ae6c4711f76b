use std::path::PathBuf;

/// Errors that can occur while opening carriers, secrets, and outputs.
#[derive(Debug, thiserror::Error)]
pub enum CarrierError {
    /// Failed to open an input file.
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to create an output file.
    #[error("failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file ended before a complete bitmap header was read.
    #[error("bitmap header too short ({len} bytes, need {expected})")]
    HeaderTooShort { len: usize, expected: usize },

    /// The secret file extension does not fit the extension frame.
    #[error("file extension {extension:?} too long ({len} bytes, max {max})")]
    ExtensionTooLong {
        extension: String,
        len: usize,
        max: usize,
    },

    /// The secret file does not fit a 32-bit length field.
    #[error("secret file too large ({size} bytes, max {max})")]
    SecretTooLarge { size: u64, max: u64 },

    /// An I/O error occurred on an already opened file.
    #[error("carrier I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CarrierError>;
