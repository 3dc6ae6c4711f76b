use std::fmt;
use std::io;

use bmpsteg_carrier::CarrierError;
use bmpsteg_embed::EmbedError;
use bmpsteg_frame::FrameError;

// Exit code constants aligned with rsfulmen/DDR-0002 semantics.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const INSUFFICIENT_CAPACITY: i32 = 61;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::AlreadyExists => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn carrier_error(context: &str, err: CarrierError) -> CliError {
    match err {
        CarrierError::Open { path, source } | CarrierError::Create { path, source } => {
            io_error(&format!("{context}: {}", path.display()), source)
        }
        CarrierError::Io(source) => io_error(context, source),
        CarrierError::HeaderTooShort { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        CarrierError::ExtensionTooLong { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        CarrierError::SecretTooLarge { .. } => {
            CliError::new(INSUFFICIENT_CAPACITY, format!("{context}: {err}"))
        }
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::SignatureMismatch { .. } => CliError::new(
            DATA_INVALID,
            format!("{context}: no hidden file found ({err})"),
        ),
        FrameError::CarrierExhausted { .. }
        | FrameError::ExtensionTooLong { .. }
        | FrameError::PayloadOutOfBounds { .. }
        | FrameError::LengthMismatch { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::EmptySignature => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn embed_error(context: &str, err: EmbedError) -> CliError {
    match err {
        EmbedError::Carrier(err) => carrier_error(context, err),
        EmbedError::Frame(err) => frame_error(context, err),
        EmbedError::InsufficientCapacity { .. } => {
            CliError::new(INSUFFICIENT_CAPACITY, format!("{context}: {err}"))
        }
        EmbedError::InvalidExtension(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        EmbedError::Io(source) => io_error(context, source),
    }
}
