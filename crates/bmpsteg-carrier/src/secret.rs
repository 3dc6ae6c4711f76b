use std::fs::File;
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{CarrierError, Result};

/// The file being hidden: its extension, its length, and a byte source.
#[derive(Debug)]
pub struct SecretFile {
    path: PathBuf,
    file: File,
    extension: String,
    payload_len: u32,
}

impl SecretFile {
    /// Open a secret file, checking that its extension fits in
    /// `max_extension_len` bytes and its length fits in a `u32`.
    pub fn open(path: impl AsRef<Path>, max_extension_len: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let extension = extension_of(&path);
        if extension.len() > max_extension_len {
            return Err(CarrierError::ExtensionTooLong {
                len: extension.len(),
                extension,
                max: max_extension_len,
            });
        }

        let file = File::open(&path).map_err(|source| CarrierError::Open {
            path: path.clone(),
            source,
        })?;
        let size = file.metadata()?.len();
        let payload_len = u32::try_from(size).map_err(|_| CarrierError::SecretTooLarge {
            size,
            max: u64::from(u32::MAX),
        })?;

        debug!(path = %path.display(), %extension, payload_len, "opened secret");

        Ok(Self {
            path,
            file,
            extension,
            payload_len,
        })
    }

    /// Path the secret was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extension including the leading dot, or empty when there is none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Secret length in bytes.
    pub fn payload_len(&self) -> u32 {
        self.payload_len
    }

    /// Rewind to the first byte and borrow the file for reading.
    pub fn payload_reader(&mut self) -> Result<&mut File> {
        self.file.seek(SeekFrom::Start(0))?;
        Ok(&mut self.file)
    }
}

/// Extension of `path` with its leading dot (`"notes.txt"` → `".txt"`).
///
/// Returns an empty string for paths without one, including dotfiles such
/// as `.profile`.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}
