use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{CarrierError, Result};

/// A file written beside its destination and moved into place on commit.
///
/// Until [`StagedOutput::commit`] succeeds the destination is never touched.
/// Dropping an uncommitted value removes the staging file, so a failed run
/// leaves no partial output behind.
#[derive(Debug)]
pub struct StagedOutput {
    target: PathBuf,
    staging: PathBuf,
    writer: Option<BufWriter<File>>,
    written: u64,
    committed: bool,
}

impl StagedOutput {
    /// Create the staging file for `target`.
    pub fn create(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let staging = staging_path(&target);
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&staging)
            .map_err(|source| CarrierError::Create {
                path: staging.clone(),
                source,
            })?;

        debug!(target = %target.display(), staging = %staging.display(), "staging output");

        Ok(Self {
            target,
            staging,
            writer: Some(BufWriter::new(file)),
            written: 0,
            committed: false,
        })
    }

    /// Final destination path.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Path of the temporary staging file.
    pub fn staging_path(&self) -> &Path {
        &self.staging
    }

    /// Bytes written so far.
    pub fn bytes_written(&self) -> u64 {
        self.written
    }

    /// Flush, sync, and rename the staging file onto the target.
    pub fn commit(mut self) -> Result<PathBuf> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
            let file = writer.into_inner().map_err(|err| err.into_error())?;
            file.sync_all()?;
        }
        fs::rename(&self.staging, &self.target)?;
        self.committed = true;

        debug!(target = %self.target.display(), bytes = self.written, "output committed");
        Ok(self.target.clone())
    }
}

impl Write for StagedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| io::Error::other("staged output already closed"))?;
        let n = writer.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for StagedOutput {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Close the handle before unlinking.
        drop(self.writer.take());
        match fs::remove_file(&self.staging) {
            Ok(()) => debug!(staging = %self.staging.display(), "discarded partial output"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(
                staging = %self.staging.display(),
                error = %err,
                "failed to remove partial output"
            ),
        }
    }
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    target.with_file_name(format!(".{name}.{}.partial", std::process::id()))
}
