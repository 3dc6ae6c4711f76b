//! Hide a file inside a bitmap, or pull it back out.
//!
//! This is the "just works" layer. It ties carrier files, secret files and
//! staged outputs from `bmpsteg-carrier` to the frame walkers in
//! `bmpsteg-frame`:
//! - [`embed_file`] checks capacity, then writes a stego bitmap
//! - [`extract_file`] verifies the signature, then writes the hidden file
//! - [`capacity_report`] answers "will it fit?" without writing anything
//!
//! Outputs are staged next to their destination and only appear once the
//! whole pass has succeeded.

pub mod decode;
pub mod descriptor;
pub mod encode;
pub mod error;
pub mod naming;
pub mod plan;

pub use decode::{decode_stream, extract_file, ExtractReport};
pub use descriptor::{validate_extension, SecretDescriptor};
pub use encode::{embed_file, encode_stream, EmbedReport};
pub use error::{EmbedError, Result};
pub use naming::{is_bitmap_name, output_path_for, DEFAULT_OUTPUT_BASE, DEFAULT_STEGO_NAME};
pub use plan::{capacity_report, CapacityReport, SecretFit};
