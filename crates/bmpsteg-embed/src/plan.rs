use std::path::{Path, PathBuf};

use bmpsteg_carrier::{CarrierFile, SecretFile};
use bmpsteg_frame::{CapacityPlan, FrameConfig};
use serde::Serialize;

use crate::descriptor::SecretDescriptor;
use crate::error::Result;

/// How much a carrier can hold.
#[derive(Debug, Clone, Serialize)]
pub struct CapacityReport {
    pub carrier: PathBuf,
    pub width: i32,
    pub height: i32,
    pub file_len: u64,
    /// Usable carrier bytes: `|w| * |h| * 3`, capped by the file length.
    pub capacity_bytes: u64,
    /// Largest payload that fits, or `None` when nothing does.
    pub max_payload_len: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<SecretFit>,
}

/// Whether one particular secret fits.
#[derive(Debug, Clone, Serialize)]
pub struct SecretFit {
    pub path: PathBuf,
    pub extension: String,
    pub payload_len: u32,
    pub required_bytes: u64,
    pub fits: bool,
}

/// Measure `carrier` and, optionally, check `secret` against it.
///
/// Never writes anything.
pub fn capacity_report(
    carrier: impl AsRef<Path>,
    secret: Option<&Path>,
    config: &FrameConfig,
) -> Result<CapacityReport> {
    let carrier = CarrierFile::open(carrier)?;
    let capacity_bytes = carrier.capacity_bytes();

    let secret = match secret {
        Some(path) => {
            let secret = SecretFile::open(path, config.max_extension_len)?;
            let descriptor = SecretDescriptor::from_secret(&secret);
            let plan = descriptor.capacity_plan(config);
            Some(SecretFit {
                path: secret.path().to_path_buf(),
                extension: descriptor.extension,
                payload_len: descriptor.payload_len,
                required_bytes: plan.required_bytes(),
                fits: plan.has_capacity(capacity_bytes),
            })
        }
        None => None,
    };

    Ok(CapacityReport {
        carrier: carrier.path().to_path_buf(),
        width: carrier.header().width,
        height: carrier.header().height,
        file_len: carrier.len(),
        capacity_bytes,
        max_payload_len: CapacityPlan::max_payload_len(config, capacity_bytes),
        secret,
    })
}
