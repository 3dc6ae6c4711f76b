use std::io::{ErrorKind, Read};

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{CarrierError, Result};

/// Size of the BMP file header plus the BITMAPINFOHEADER that follows it.
pub const HEADER_SIZE: usize = 54;

/// Byte offset of the little-endian `i32` image width.
pub const WIDTH_OFFSET: usize = 18;

/// Byte offset of the little-endian `i32` image height.
pub const HEIGHT_OFFSET: usize = 22;

/// Magic bytes: "BM" (0x42 0x4D).
pub const MAGIC: [u8; 2] = *b"BM";

/// Pixel bytes assumed per pixel when estimating capacity (24-bit BGR).
pub const BYTES_PER_PIXEL: u64 = 3;

const DIB_HEADER_SIZE: u32 = 40;

/// The fields of a bitmap header that bmpsteg relies on.
///
/// Only the dimensions are read. Compression, color depth, and the pixel
/// data offset are never checked, so anything shaped like a BMP header is
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    /// The first two header bytes, normally `BM`.
    pub magic: [u8; 2],
    /// Image width in pixels.
    pub width: i32,
    /// Image height in pixels. Negative for top-down bitmaps.
    pub height: i32,
}

impl BmpHeader {
    /// Create a header for a 24-bit image of the given dimensions.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            magic: MAGIC,
            width,
            height,
        }
    }

    /// Parse the fixed-size header at the start of `header`.
    pub fn parse(header: &[u8]) -> Result<Self> {
        if header.len() < HEADER_SIZE {
            return Err(CarrierError::HeaderTooShort {
                len: header.len(),
                expected: HEADER_SIZE,
            });
        }

        let mut width = &header[WIDTH_OFFSET..WIDTH_OFFSET + 4];
        let mut height = &header[HEIGHT_OFFSET..HEIGHT_OFFSET + 4];

        Ok(Self {
            magic: [header[0], header[1]],
            width: width.get_i32_le(),
            height: height.get_i32_le(),
        })
    }

    /// Read and parse the header from the current position of `reader`.
    ///
    /// Consumes at most [`HEADER_SIZE`] bytes.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut header = [0u8; HEADER_SIZE];
        let mut filled = 0usize;
        while filled < HEADER_SIZE {
            match reader.read(&mut header[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(CarrierError::Io(err)),
            }
        }
        Self::parse(&header[..filled])
    }

    /// Whether the header starts with the `BM` magic.
    pub fn has_bmp_magic(&self) -> bool {
        self.magic == MAGIC
    }

    /// Number of pixel bytes implied by the dimensions (`|w| * |h| * 3`).
    ///
    /// Row padding is ignored. Saturates instead of overflowing.
    pub fn pixel_capacity(&self) -> u64 {
        u64::from(self.width.unsigned_abs())
            .saturating_mul(u64::from(self.height.unsigned_abs()))
            .saturating_mul(BYTES_PER_PIXEL)
    }

    /// Serialize a minimal 24-bit uncompressed BMP header.
    ///
    /// Used to build synthetic cover images.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let row = (u64::from(self.width.unsigned_abs()) * BYTES_PER_PIXEL + 3) & !3;
        let image_size = row.saturating_mul(u64::from(self.height.unsigned_abs()));
        let image_size = u32::try_from(image_size).unwrap_or(u32::MAX);

        let mut buf = BytesMut::with_capacity(HEADER_SIZE);
        buf.put_slice(&self.magic);
        buf.put_u32_le(image_size.saturating_add(HEADER_SIZE as u32));
        buf.put_u32_le(0); // reserved
        buf.put_u32_le(HEADER_SIZE as u32);
        buf.put_u32_le(DIB_HEADER_SIZE);
        buf.put_i32_le(self.width);
        buf.put_i32_le(self.height);
        buf.put_u16_le(1); // planes
        buf.put_u16_le(24); // bits per pixel
        buf.put_u32_le(0); // BI_RGB
        buf.put_u32_le(image_size);
        buf.put_i32_le(2835); // 72 DPI
        buf.put_i32_le(2835);
        buf.put_u32_le(0);
        buf.put_u32_le(0);

        let mut out = [0u8; HEADER_SIZE];
        out.copy_from_slice(&buf);
        out
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn parse_reads_dimensions_at_fixed_offsets() {
        let mut raw = [0u8; HEADER_SIZE];
        raw[0..2].copy_from_slice(b"BM");
        raw[WIDTH_OFFSET..WIDTH_OFFSET + 4].copy_from_slice(&100i32.to_le_bytes());
        raw[HEIGHT_OFFSET..HEIGHT_OFFSET + 4].copy_from_slice(&30i32.to_le_bytes());

        let header = BmpHeader::parse(&raw).unwrap();
        assert_eq!(header.width, 100);
        assert_eq!(header.height, 30);
        assert!(header.has_bmp_magic());
        assert_eq!(header.pixel_capacity(), 9000);
    }

    #[test]
    fn to_bytes_roundtrips_through_parse() {
        let header = BmpHeader::new(640, -480);
        let raw = header.to_bytes();

        assert_eq!(&raw[0..2], b"BM");
        assert_eq!(BmpHeader::parse(&raw).unwrap(), header);
    }

    #[test]
    fn top_down_height_counts_as_positive() {
        let header = BmpHeader::new(10, -10);
        assert_eq!(header.pixel_capacity(), 300);
    }

    #[test]
    fn pixel_capacity_saturates() {
        let header = BmpHeader::new(i32::MIN, i32::MIN);
        assert!(header.pixel_capacity() > u64::from(u32::MAX));
    }

    #[test]
    fn short_header_rejected() {
        let err = BmpHeader::parse(&[0x42, 0x4D, 0x00]).unwrap_err();
        assert!(matches!(
            err,
            CarrierError::HeaderTooShort {
                len: 3,
                expected: HEADER_SIZE
            }
        ));
    }

    #[test]
    fn missing_magic_is_not_rejected() {
        let mut raw = BmpHeader::new(4, 4).to_bytes();
        raw[0] = b'X';

        let header = BmpHeader::parse(&raw).unwrap();
        assert!(!header.has_bmp_magic());
        assert_eq!(header.width, 4);
    }

    #[test]
    fn read_from_consumes_only_the_header() {
        let mut raw = BmpHeader::new(2, 2).to_bytes().to_vec();
        raw.extend_from_slice(&[0xAA; 12]);

        let mut cursor = Cursor::new(raw);
        let header = BmpHeader::read_from(&mut cursor).unwrap();

        assert_eq!(header.width, 2);
        assert_eq!(cursor.position(), HEADER_SIZE as u64);
    }

    #[test]
    fn read_from_truncated_stream() {
        let mut cursor = Cursor::new(vec![0u8; 20]);
        let err = BmpHeader::read_from(&mut cursor).unwrap_err();
        assert!(matches!(err, CarrierError::HeaderTooShort { len: 20, .. }));
    }
}
