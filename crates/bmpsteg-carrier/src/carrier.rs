use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::bmp::BmpHeader;
use crate::error::{CarrierError, Result};

/// An opened cover image.
///
/// The header is parsed once on open. The file handle is closed when the
/// value (or the reader returned by [`CarrierFile::into_reader`]) is dropped.
#[derive(Debug)]
pub struct CarrierFile {
    path: PathBuf,
    file: File,
    header: BmpHeader,
    len: u64,
}

impl CarrierFile {
    /// Open a carrier image and parse its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = File::open(&path).map_err(|source| CarrierError::Open {
            path: path.clone(),
            source,
        })?;
        let len = file.metadata()?.len();
        let header = BmpHeader::read_from(&mut file)?;

        if !header.has_bmp_magic() {
            warn!(
                path = %path.display(),
                magic = ?header.magic,
                "carrier does not start with BM magic, treating it as a bitmap anyway"
            );
        }
        debug!(
            path = %path.display(),
            width = header.width,
            height = header.height,
            len,
            "opened carrier"
        );

        Ok(Self {
            path,
            file,
            header,
            len,
        })
    }

    /// Path the carrier was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parsed bitmap header.
    pub fn header(&self) -> &BmpHeader {
        &self.header
    }

    /// Total file length in bytes, header included.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// Whether the file is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Carrier bytes available to the codec.
    ///
    /// The pixel capacity claimed by the header, capped by the real file
    /// length so a lying header cannot promise bytes that are not there.
    pub fn capacity_bytes(&self) -> u64 {
        self.header.pixel_capacity().min(self.len)
    }

    /// Rewind to byte 0 and hand out a buffered reader over the whole file.
    pub fn into_reader(mut self) -> Result<BufReader<File>> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(BufReader::new(self.file))
    }
}
