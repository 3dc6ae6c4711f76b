use clap::{Args, Subcommand};
use std::path::{Path, PathBuf};

use bmpsteg_embed::is_bitmap_name;
use bmpsteg_frame::{FrameConfig, MAX_SIGNATURE_LEN};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod capacity;
pub mod decode;
pub mod encode;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Hide a file inside a bitmap.
    Encode(EncodeArgs),
    /// Recover a hidden file from a bitmap.
    Decode(DecodeArgs),
    /// Report how much a bitmap can hold.
    Capacity(CapacityArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, config: &FrameConfig, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Encode(args) => encode::run(args, config, format),
        Command::Decode(args) => decode::run(args, config, format),
        Command::Capacity(args) => capacity::run(args, config, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Cover bitmap (.bmp).
    pub carrier: PathBuf,
    /// File to hide. Its extension (at most 4 bytes, dot included) is stored too.
    pub secret: PathBuf,
    /// Stego bitmap to write (.bmp). May be the carrier itself. Default: default.bmp.
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Stego bitmap (.bmp).
    pub stego: PathBuf,
    /// Base name for the recovered file; the hidden extension is appended.
    /// Default: output.
    pub output_base: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// Cover bitmap (.bmp).
    pub carrier: PathBuf,
    /// Check whether this file would fit.
    #[arg(long, value_name = "FILE")]
    pub secret: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Build the frame configuration from the `--signature` flag.
pub fn frame_config(signature: &str) -> CliResult<FrameConfig> {
    if signature.is_empty() {
        return Err(CliError::new(USAGE, "signature must not be empty"));
    }
    if signature.len() > MAX_SIGNATURE_LEN {
        return Err(CliError::new(
            USAGE,
            format!(
                "signature too long ({} bytes, max {MAX_SIGNATURE_LEN})",
                signature.len()
            ),
        ));
    }
    Ok(FrameConfig::with_signature(signature.as_bytes().to_vec()))
}

fn require_bitmap(role: &str, path: &Path) -> CliResult<()> {
    if is_bitmap_name(path) {
        return Ok(());
    }
    Err(CliError::new(
        USAGE,
        format!(
            "{role} must be a visible .bmp file, got {}",
            path.display()
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_signature_config() {
        let config = frame_config("#*").unwrap();
        assert_eq!(config, FrameConfig::default());
    }

    #[test]
    fn signature_bounds() {
        assert_eq!(frame_config("").unwrap_err().code, USAGE);
        assert_eq!(frame_config(&"x".repeat(17)).unwrap_err().code, USAGE);
        assert!(frame_config(&"x".repeat(16)).is_ok());
    }

    #[test]
    fn bitmap_names_enforced() {
        assert!(require_bitmap("carrier", Path::new("cover.bmp")).is_ok());
        let err = require_bitmap("output", Path::new("cover.png")).unwrap_err();
        assert_eq!(err.code, USAGE);
        assert!(err.message.starts_with("output must be"));
        assert!(require_bitmap("carrier", Path::new(".hidden.bmp")).is_err());
    }
}
