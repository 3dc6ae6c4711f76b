use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bmpsteg_carrier::{CarrierFile, SecretFile, StagedOutput};
use bmpsteg_frame::{FrameConfig, FrameEncoder};
use serde::Serialize;
use tracing::{debug, info};

use crate::descriptor::{validate_extension, SecretDescriptor};
use crate::error::{EmbedError, Result};

/// Outcome of a successful [`embed_file`].
#[derive(Debug, Clone, Serialize)]
pub struct EmbedReport {
    pub carrier: PathBuf,
    pub secret: PathBuf,
    pub output: PathBuf,
    pub extension: String,
    pub payload_len: u32,
    pub required_bytes: u64,
    pub capacity_bytes: u64,
    pub bytes_written: u64,
}

/// Hide `secret` in a copy of `carrier`, written to `sink`.
///
/// `secret` must yield at least `descriptor.payload_len` bytes. Returns the
/// number of bytes written to `sink`, which equals the carrier length.
pub fn encode_stream<R, S, W>(
    carrier: R,
    descriptor: &SecretDescriptor,
    secret: S,
    sink: W,
    config: &FrameConfig,
) -> Result<u64>
where
    R: Read,
    S: Read,
    W: Write,
{
    let extension = descriptor.extension.as_bytes();
    let extension_len = u32::try_from(extension.len())
        .map_err(|_| EmbedError::InvalidExtension(descriptor.extension.clone()))?;

    let mut encoder = FrameEncoder::with_config(carrier, sink, config.clone());
    encoder.begin()?;
    encoder.write_signature(&config.signature)?;
    encoder.write_length(extension_len)?;
    encoder.write_bytes(extension)?;
    encoder.write_length(descriptor.payload_len)?;
    encoder.write_from(secret)?;
    Ok(encoder.finish()?)
}

/// Hide the file at `secret` inside the bitmap at `carrier`, writing the
/// result to `output`.
///
/// Capacity is checked before anything is created, so a secret that does
/// not fit leaves no output behind. `output` may be the carrier itself.
pub fn embed_file(
    carrier: impl AsRef<Path>,
    secret: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &FrameConfig,
) -> Result<EmbedReport> {
    let carrier = CarrierFile::open(carrier)?;
    let mut secret = SecretFile::open(secret, config.max_extension_len)?;
    let descriptor = SecretDescriptor::from_secret(&secret);
    validate_extension(descriptor.extension.as_bytes(), config.max_extension_len)?;

    let required_bytes = descriptor.capacity_plan(config).required_bytes();
    let capacity_bytes = carrier.capacity_bytes();
    if capacity_bytes <= required_bytes {
        return Err(EmbedError::InsufficientCapacity {
            required: required_bytes,
            available: capacity_bytes,
        });
    }
    debug!(
        required = required_bytes,
        available = capacity_bytes,
        "capacity check passed"
    );

    let carrier_path = carrier.path().to_path_buf();
    let secret_path = secret.path().to_path_buf();
    let reader = carrier.into_reader()?;

    let mut staged = StagedOutput::create(output)?;
    let bytes_written = encode_stream(
        reader,
        &descriptor,
        secret.payload_reader()?,
        &mut staged,
        config,
    )?;
    let output = staged.commit()?;

    info!(
        carrier = %carrier_path.display(),
        output = %output.display(),
        extension = %descriptor.extension,
        payload_len = descriptor.payload_len,
        "secret embedded"
    );

    Ok(EmbedReport {
        carrier: carrier_path,
        secret: secret_path,
        output,
        extension: descriptor.extension,
        payload_len: descriptor.payload_len,
        required_bytes,
        capacity_bytes,
        bytes_written,
    })
}
