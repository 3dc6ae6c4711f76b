use bmpsteg_carrier::SecretFile;
use bmpsteg_frame::{CapacityPlan, FrameConfig, FrameLayout};
use serde::Serialize;

use crate::error::{EmbedError, Result};

/// What the frames say about a hidden file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SecretDescriptor {
    /// Extension with its leading dot, or empty.
    pub extension: String,
    /// Payload length in bytes.
    pub payload_len: u32,
}

impl SecretDescriptor {
    pub fn new(extension: impl Into<String>, payload_len: u32) -> Self {
        Self {
            extension: extension.into(),
            payload_len,
        }
    }

    pub fn from_secret(secret: &SecretFile) -> Self {
        Self::new(secret.extension(), secret.payload_len())
    }

    /// Capacity needed for this payload.
    pub fn capacity_plan(&self, config: &FrameConfig) -> CapacityPlan {
        CapacityPlan::for_payload(config, u64::from(self.payload_len))
    }

    /// Where each frame lands for this secret.
    pub fn layout(&self, config: &FrameConfig) -> FrameLayout {
        FrameLayout::new(
            config,
            self.extension.len() as u64,
            u64::from(self.payload_len),
        )
    }
}

/// Check an extension before it becomes part of a file name.
///
/// Accepts the empty string or a UTF-8 string of at most `max_len` bytes that
/// starts with `.` and contains no path separator or NUL.
pub fn validate_extension(raw: &[u8], max_len: usize) -> Result<String> {
    let invalid = || EmbedError::InvalidExtension(String::from_utf8_lossy(raw).into_owned());

    if raw.len() > max_len {
        return Err(invalid());
    }
    let extension = std::str::from_utf8(raw).map_err(|_| invalid())?;
    if extension.is_empty() {
        return Ok(String::new());
    }
    if !extension.starts_with('.') || extension.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }
    Ok(extension.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_extensions() {
        assert_eq!(validate_extension(b".txt", 4).unwrap(), ".txt");
        assert_eq!(validate_extension(b".c", 4).unwrap(), ".c");
        assert_eq!(validate_extension(b"", 4).unwrap(), "");
    }

    #[test]
    fn rejects_path_tricks() {
        assert!(matches!(
            validate_extension(b"./x", 4),
            Err(EmbedError::InvalidExtension(_))
        ));
        assert!(validate_extension(b".\\a", 4).is_err());
        assert!(validate_extension(b".a\0", 4).is_err());
        assert!(validate_extension(b"abc", 4).is_err());
    }

    #[test]
    fn rejects_non_utf8_and_long() {
        assert!(validate_extension(&[b'.', 0xFF], 4).is_err());
        assert!(validate_extension(b".jpeg", 4).is_err());
    }

    #[test]
    fn layout_uses_real_extension_length() {
        let config = FrameConfig::default();
        let descriptor = SecretDescriptor::new(".c", 5);
        let layout = descriptor.layout(&config);
        assert_eq!(layout.end(), 54 + 8 * (2 + 4 + 2 + 4 + 5));
        assert_eq!(descriptor.capacity_plan(&config).required_bytes(), 206);
    }
}
