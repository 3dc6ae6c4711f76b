//! Carrier-side file handling for bmpsteg.
//!
//! This is the lowest layer of bmpsteg. It knows just enough about the BMP
//! format to find the pixel area and estimate how much it can hold:
//! - [`BmpHeader`] reads width and height from the fixed 54-byte header
//! - [`CarrierFile`] opens a cover image and reports its usable capacity
//! - [`SecretFile`] describes the file being hidden (extension, length)
//! - [`StagedOutput`] writes results next to their destination and only
//!   moves them into place on [`StagedOutput::commit`]
//!
//! Nothing here touches individual bits. See `bmpsteg-frame` for that.

pub mod bmp;
pub mod carrier;
pub mod error;
pub mod output;
pub mod secret;

pub use bmp::{BmpHeader, BYTES_PER_PIXEL, HEADER_SIZE, HEIGHT_OFFSET, WIDTH_OFFSET};
pub use carrier::CarrierFile;
pub use error::{CarrierError, Result};
pub use output::StagedOutput;
pub use secret::{extension_of, SecretFile};
