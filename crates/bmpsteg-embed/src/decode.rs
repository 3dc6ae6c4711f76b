use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bmpsteg_carrier::{CarrierFile, StagedOutput};
use bmpsteg_frame::{FrameConfig, FrameDecoder};
use serde::Serialize;
use tracing::{debug, info};

use crate::descriptor::{validate_extension, SecretDescriptor};
use crate::error::Result;
use crate::naming::output_path_for;

/// Outcome of a successful [`extract_file`].
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub stego: PathBuf,
    pub output: PathBuf,
    pub extension: String,
    pub payload_len: u32,
}

/// Read a hidden file out of `carrier`.
///
/// `open_sink` is called once the signature, extension and payload length
/// have been decoded and checked, so a carrier without a hidden file never
/// opens a sink. Returns the descriptor and the sink the payload went to.
///
/// With `carrier_len` set, payload lengths larger than the rest of the
/// carrier are rejected before any payload byte is read.
pub fn decode_stream<R, W, F>(
    carrier: R,
    carrier_len: Option<u64>,
    config: &FrameConfig,
    open_sink: F,
) -> Result<(SecretDescriptor, W)>
where
    R: Read,
    W: Write,
    F: FnOnce(&SecretDescriptor) -> Result<W>,
{
    let mut decoder = FrameDecoder::with_config(carrier, config.clone());
    decoder.set_carrier_len(carrier_len);
    decoder.begin()?;
    decoder.read_signature(&config.signature)?;

    decoder.read_length()?;
    let raw_extension = decoder.read_bytes()?;
    let extension = validate_extension(&raw_extension, config.max_extension_len)?;
    let payload_len = decoder.read_length()?;

    let descriptor = SecretDescriptor::new(extension, payload_len);
    debug!(
        extension = %descriptor.extension,
        payload_len,
        "hidden file found"
    );

    let mut sink = open_sink(&descriptor)?;
    decoder.read_into(&mut sink)?;
    decoder.finish()?;
    Ok((descriptor, sink))
}

/// Extract the file hidden in the bitmap at `stego`.
///
/// The output is named from `output_base` and the decoded extension (see
/// [`output_path_for`]). Nothing is created unless the signature matches.
pub fn extract_file(
    stego: impl AsRef<Path>,
    output_base: impl AsRef<Path>,
    config: &FrameConfig,
) -> Result<ExtractReport> {
    let carrier = CarrierFile::open(stego)?;
    let stego = carrier.path().to_path_buf();
    let carrier_len = carrier.len();
    let reader = carrier.into_reader()?;
    let output_base = output_base.as_ref();

    let (descriptor, staged) = decode_stream(reader, Some(carrier_len), config, |descriptor| {
        let target = output_path_for(output_base, &descriptor.extension);
        Ok(StagedOutput::create(target)?)
    })?;
    let output = staged.commit()?;

    info!(
        stego = %stego.display(),
        output = %output.display(),
        payload_len = descriptor.payload_len,
        "secret extracted"
    );

    Ok(ExtractReport {
        stego,
        output,
        extension: descriptor.extension,
        payload_len: descriptor.payload_len,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bmpsteg_carrier::BmpHeader;
    use bmpsteg_frame::FrameError;

    use super::*;
    use crate::encode::{embed_file, encode_stream};
    use crate::error::EmbedError;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "bmpsteg-extract-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn bitmap_bytes(width: i32, height: i32, total_len: usize) -> Vec<u8> {
        let mut bytes = BmpHeader::new(width, height).to_bytes().to_vec();
        bytes.extend((0..total_len.saturating_sub(bytes.len())).map(|i| (i % 200) as u8));
        bytes
    }

    fn stego_bytes(cover: &[u8], extension: &str, payload: &[u8]) -> Vec<u8> {
        let descriptor = SecretDescriptor::new(extension, payload.len() as u32);
        let mut out = Vec::new();
        encode_stream(
            Cursor::new(cover.to_vec()),
            &descriptor,
            payload,
            &mut out,
            &FrameConfig::default(),
        )
        .unwrap();
        out
    }

    fn decode_to_vec(data: Vec<u8>) -> Result<(SecretDescriptor, Vec<u8>)> {
        let len = data.len() as u64;
        decode_stream(Cursor::new(data), Some(len), &FrameConfig::default(), |_| {
            Ok(Vec::new())
        })
    }

    #[test]
    fn stream_roundtrip() {
        let payload: Vec<u8> = (0..1500u32).map(|i| (i * 13 % 256) as u8).collect();
        let data = stego_bytes(&bitmap_bytes(80, 60, 14_454), ".txt", &payload);

        let (descriptor, out) = decode_to_vec(data).unwrap();
        assert_eq!(descriptor.extension, ".txt");
        assert_eq!(descriptor.payload_len, 1500);
        assert_eq!(out, payload);
    }

    #[test]
    fn empty_payload_roundtrip() {
        let data = stego_bytes(&bitmap_bytes(16, 16, 822), ".h", b"");

        let (descriptor, out) = decode_to_vec(data).unwrap();
        assert_eq!(descriptor, SecretDescriptor::new(".h", 0));
        assert!(out.is_empty());
    }

    #[test]
    fn plain_bitmap_never_opens_sink() {
        let cover = vec![0u8; 2048];
        let mut opened = false;
        let err = decode_stream(Cursor::new(cover), None, &FrameConfig::default(), |_| {
            opened = true;
            Ok(Vec::new())
        })
        .unwrap_err();

        assert!(matches!(
            err,
            EmbedError::Frame(FrameError::SignatureMismatch { index: 0, .. })
        ));
        assert!(!opened);
    }

    #[test]
    fn custom_signature_must_match() {
        let data = stego_bytes(&bitmap_bytes(32, 32, 3126), ".c", b"x");
        let config = FrameConfig::with_signature(b"ST".to_vec());
        let err = decode_stream(Cursor::new(data), None, &config, |_| Ok(Vec::new())).unwrap_err();
        assert!(matches!(
            err,
            EmbedError::Frame(FrameError::SignatureMismatch { .. })
        ));
    }

    #[test]
    fn bad_extension_never_opens_sink() {
        let data = stego_bytes(&bitmap_bytes(32, 32, 3126), "a/b", b"x");
        let mut opened = false;
        let err = decode_stream(Cursor::new(data), None, &FrameConfig::default(), |_| {
            opened = true;
            Ok(Vec::new())
        })
        .unwrap_err();
        assert!(matches!(err, EmbedError::InvalidExtension(_)));
        assert!(!opened);
    }

    #[test]
    fn extract_file_scenario() {
        let dir = unique_temp_dir("scenario");
        let cover = dir.join("cover.bmp");
        let secret = dir.join("hello.c");
        let stego = dir.join("stego.bmp");
        std::fs::write(&cover, bitmap_bytes(100, 30, 10_000)).unwrap();
        std::fs::write(&secret, b"Hi!\r\n").unwrap();
        embed_file(&cover, &secret, &stego, &FrameConfig::default()).unwrap();

        let report = extract_file(&stego, dir.join("output"), &FrameConfig::default()).unwrap();
        assert_eq!(report.output, dir.join("output.c"));
        assert_eq!(report.extension, ".c");
        assert_eq!(report.payload_len, 5);
        assert_eq!(std::fs::read(dir.join("output.c")).unwrap(), b"Hi!\r\n");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn extract_truncates_base_name() {
        let dir = unique_temp_dir("base");
        let cover = dir.join("cover.bmp");
        let secret = dir.join("run.sh");
        let stego = dir.join("stego.bmp");
        std::fs::write(&cover, bitmap_bytes(40, 40, 4854)).unwrap();
        std::fs::write(&secret, b"#!/bin/sh\necho hi\n").unwrap();
        embed_file(&cover, &secret, &stego, &FrameConfig::default()).unwrap();

        let report =
            extract_file(&stego, dir.join("restored.txt"), &FrameConfig::default()).unwrap();
        assert_eq!(report.output, dir.join("restored.sh"));
        assert_eq!(
            std::fs::read(&report.output).unwrap(),
            b"#!/bin/sh\necho hi\n"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn plain_bitmap_extracts_nothing() {
        let dir = unique_temp_dir("plain");
        let plain = dir.join("plain.bmp");
        std::fs::write(&plain, bitmap_bytes(20, 20, 1254).iter().map(|b| b & !1).collect::<Vec<_>>())
            .unwrap();

        let err = extract_file(&plain, dir.join("output"), &FrameConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            EmbedError::Frame(FrameError::SignatureMismatch { index: 0, .. })
        ));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn forged_payload_length_rejected_before_output() {
        let dir = unique_temp_dir("forged");
        let stego = dir.join("stego.bmp");
        let mut data = stego_bytes(&bitmap_bytes(40, 40, 4854), ".c", b"abc");
        // Grow the declared payload past the end of the carrier.
        let length_start = 54 + 16 + 32 + 16;
        data[length_start + 20] |= 1;
        std::fs::write(&stego, data).unwrap();

        let err = extract_file(&stego, dir.join("output"), &FrameConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            EmbedError::Frame(FrameError::PayloadOutOfBounds { .. })
        ));
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 1);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
