//! LSB framing of hidden data inside a carrier byte stream.
//!
//! This is the core of bmpsteg. Every value is spread over a run of carrier
//! bytes, one bit per byte in bit 0, most significant bit first:
//! - 8 carrier bytes per character or payload byte
//! - 32 carrier bytes per 32-bit length field
//!
//! Frames are always written and read in the same order:
//!
//! ```text
//! ┌───────────┬─────────────┬───────────┬─────────────┬──────────────┬───────────┐
//! │ Signature │ Ext length  │ Extension │ Payload len │ Payload      │ Remainder │
//! │ "#*"      │ (u32)       │ (≤ 4 B)   │ (u32)       │ (len bytes)  │ verbatim  │
//! └───────────┴─────────────┴───────────┴─────────────┴──────────────┴───────────┘
//! ```
//!
//! [`FrameEncoder`] and [`FrameDecoder`] walk that sequence over any
//! `Read`/`Write` pair and refuse operations issued out of order.

pub mod bits;
pub mod capacity;
pub mod codec;
pub mod error;
pub mod reader;
pub mod stage;
pub mod writer;

pub use bits::{pack_byte, pack_u32, unpack_byte, unpack_u32, BYTE_RUN, WORD_RUN};
pub use capacity::{has_capacity, CapacityPlan};
pub use codec::{
    run_len, FrameConfig, FrameKind, FrameLayout, DEFAULT_SIGNATURE, FRAME_ORDER,
    LENGTH_FIELD_SIZE, MAX_EXTENSION_LEN, MAX_SIGNATURE_LEN,
};
pub use error::{FrameError, Result};
pub use reader::FrameDecoder;
pub use stage::Stage;
pub use writer::FrameEncoder;
