//! Hide files in the least significant bits of BMP images.
//!
//! bmpsteg copies a 24-bit bitmap and overwrites bit 0 of its pixel bytes
//! with a signature, the hidden file's extension and length, and the file
//! itself. Decoding reverses the process and restores the file under its
//! original extension.
//!
//! # Crate Structure
//!
//! - [`carrier`]: BMP header parsing, carrier and secret files, staged output
//! - [`frame`]: bit packing, capacity arithmetic, frame encoder and decoder
//! - [`embed`]: file-level `embed_file`, `extract_file` and `capacity_report`

/// Re-export carrier types.
pub mod carrier {
    pub use bmpsteg_carrier::*;
}

/// Re-export frame types.
pub mod frame {
    pub use bmpsteg_frame::*;
}

/// Re-export embed types.
pub mod embed {
    pub use bmpsteg_embed::*;
}
