use crate::codec::FrameKind;
use crate::stage::Stage;

/// Errors that can occur while walking the frame sequence.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The decoded signature differs from the expected literal.
    #[error("signature mismatch at byte {index} (expected 0x{expected:02x}, found 0x{found:02x})")]
    SignatureMismatch { index: usize, expected: u8, found: u8 },

    /// The carrier ended before a run was complete.
    #[error("carrier exhausted in {section} at carrier byte {offset}")]
    CarrierExhausted { section: &'static str, offset: u64 },

    /// Input and output cursors disagree after the header copy.
    #[error("header copy misaligned (read {read} bytes, wrote {written})")]
    HeaderMisaligned { read: u64, written: u64 },

    /// An operation was issued in a stage that does not accept it.
    #[error("cannot {operation} in stage {stage}")]
    OutOfOrder {
        operation: &'static str,
        stage: Stage,
    },

    /// The bytes supplied for a frame differ from its declared length.
    #[error("{frame} frame declared {declared} bytes but {actual} were supplied")]
    LengthMismatch {
        frame: FrameKind,
        declared: u64,
        actual: u64,
    },

    /// The extension length exceeds the configured bound.
    #[error("extension too long ({len} bytes, max {max})")]
    ExtensionTooLong { len: u64, max: usize },

    /// The payload length claims more bytes than the carrier has left.
    #[error("payload length {len} exceeds remaining carrier capacity ({available} bytes)")]
    PayloadOutOfBounds { len: u64, available: u64 },

    /// The configured signature is empty.
    #[error("signature must not be empty")]
    EmptySignature,

    /// An I/O error occurred on the carrier or output stream.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
