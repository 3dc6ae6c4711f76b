use std::fmt;

use bytes::Bytes;

use crate::bits::BYTE_RUN;

/// Default signature: "#*" (0x23 0x2A).
pub const DEFAULT_SIGNATURE: &[u8] = b"#*";

/// Longest signature accepted from configuration.
pub const MAX_SIGNATURE_LEN: usize = 16;

/// Maximum extension length in bytes, leading dot included (".txt").
pub const MAX_EXTENSION_LEN: usize = 4;

/// Size of each length field in bytes.
pub const LENGTH_FIELD_SIZE: usize = 4;

/// The frames of an embedding, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameKind {
    Signature,
    ExtensionLength,
    Extension,
    PayloadLength,
    Payload,
}

/// Wire order of all frames. Identical for encoding and decoding.
pub const FRAME_ORDER: [FrameKind; 5] = [
    FrameKind::Signature,
    FrameKind::ExtensionLength,
    FrameKind::Extension,
    FrameKind::PayloadLength,
    FrameKind::Payload,
];

impl FrameKind {
    /// Human-readable frame name.
    pub fn name(self) -> &'static str {
        match self {
            FrameKind::Signature => "signature",
            FrameKind::ExtensionLength => "extension length",
            FrameKind::Extension => "extension",
            FrameKind::PayloadLength => "payload length",
            FrameKind::Payload => "payload",
        }
    }

    /// Whether this frame holds a 32-bit length.
    pub fn is_length(self) -> bool {
        matches!(self, FrameKind::ExtensionLength | FrameKind::PayloadLength)
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Carrier bytes needed to hide `bytes` bytes.
pub fn run_len(bytes: u64) -> u64 {
    bytes.saturating_mul(BYTE_RUN as u64)
}

/// Configuration shared by the encoder and decoder.
///
/// Both sides must agree on every field or decoding fails at the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameConfig {
    /// Literal written before anything else. Must not be empty.
    pub signature: Bytes,
    /// Leading carrier bytes copied or skipped untouched. Default: 54.
    pub header_size: usize,
    /// Upper bound on the extension frame. Default: 4.
    pub max_extension_len: usize,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            signature: Bytes::from_static(DEFAULT_SIGNATURE),
            header_size: bmpsteg_carrier::HEADER_SIZE,
            max_extension_len: MAX_EXTENSION_LEN,
        }
    }
}

impl FrameConfig {
    /// Default configuration with a custom signature.
    pub fn with_signature(signature: impl Into<Bytes>) -> Self {
        Self {
            signature: signature.into(),
            ..Self::default()
        }
    }
}

/// Byte offsets of each frame inside a carrier for one concrete secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    header_size: u64,
    signature_len: u64,
    extension_len: u64,
    payload_len: u64,
}

impl FrameLayout {
    /// Layout for a secret with the given extension and payload lengths.
    pub fn new(config: &FrameConfig, extension_len: u64, payload_len: u64) -> Self {
        Self {
            header_size: config.header_size as u64,
            signature_len: config.signature.len() as u64,
            extension_len,
            payload_len,
        }
    }

    /// Size of the value carried by `kind`, in bytes (not carrier bytes).
    pub fn frame_size(&self, kind: FrameKind) -> u64 {
        match kind {
            FrameKind::Signature => self.signature_len,
            FrameKind::ExtensionLength | FrameKind::PayloadLength => LENGTH_FIELD_SIZE as u64,
            FrameKind::Extension => self.extension_len,
            FrameKind::Payload => self.payload_len,
        }
    }

    /// Carrier offset of the first byte of `kind`'s run.
    pub fn offset_of(&self, kind: FrameKind) -> u64 {
        FRAME_ORDER
            .iter()
            .take_while(|&&frame| frame != kind)
            .fold(self.header_size, |offset, &frame| {
                offset.saturating_add(run_len(self.frame_size(frame)))
            })
    }

    /// First carrier offset after the payload run. Everything from here on
    /// is copied verbatim.
    pub fn end(&self) -> u64 {
        self.offset_of(FrameKind::Payload)
            .saturating_add(run_len(self.payload_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_bitmap_layout() {
        let config = FrameConfig::default();
        assert_eq!(config.signature.as_ref(), b"#*");
        assert_eq!(config.header_size, 54);
        assert_eq!(config.max_extension_len, 4);
    }

    #[test]
    fn with_signature_keeps_other_defaults() {
        let config = FrameConfig::with_signature(b"STEG".to_vec());
        assert_eq!(config.signature.as_ref(), b"STEG");
        assert_eq!(config.header_size, 54);
    }

    #[test]
    fn layout_offsets_follow_frame_order() {
        let layout = FrameLayout::new(&FrameConfig::default(), 2, 5);

        assert_eq!(layout.offset_of(FrameKind::Signature), 54);
        assert_eq!(layout.offset_of(FrameKind::ExtensionLength), 54 + 16);
        assert_eq!(layout.offset_of(FrameKind::Extension), 54 + 16 + 32);
        assert_eq!(layout.offset_of(FrameKind::PayloadLength), 54 + 16 + 32 + 16);
        assert_eq!(layout.offset_of(FrameKind::Payload), 54 + 16 + 32 + 16 + 32);
        assert_eq!(layout.end(), 54 + 16 + 32 + 16 + 32 + 40);
    }

    #[test]
    fn frame_names() {
        assert_eq!(FrameKind::PayloadLength.to_string(), "payload length");
        assert!(FrameKind::ExtensionLength.is_length());
        assert!(!FrameKind::Payload.is_length());
    }

    #[test]
    fn run_len_saturates() {
        assert_eq!(run_len(3), 24);
        assert_eq!(run_len(u64::MAX), u64::MAX);
    }
}
