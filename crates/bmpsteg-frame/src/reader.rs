use std::io::{self, ErrorKind, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};
use tracing::debug;

use crate::bits::{unpack_byte, unpack_u32, BYTE_RUN, WORD_RUN};
use crate::codec::{run_len, FrameConfig, FrameKind};
use crate::error::{FrameError, Result};
use crate::stage::Stage;

/// Reads the frame sequence back out of a carrier stream.
///
/// The decoder only reads. Bytes after the payload run are never touched.
pub struct FrameDecoder<R> {
    carrier: R,
    config: FrameConfig,
    stage: Stage,
    declared: u32,
    consumed: u64,
    carrier_len: Option<u64>,
}

impl<R: Read> FrameDecoder<R> {
    /// Create a new decoder with default configuration.
    pub fn new(carrier: R) -> Self {
        Self::with_config(carrier, FrameConfig::default())
    }

    /// Create a new decoder with explicit configuration.
    pub fn with_config(carrier: R, config: FrameConfig) -> Self {
        Self {
            carrier,
            config,
            stage: Stage::Init,
            declared: 0,
            consumed: 0,
            carrier_len: None,
        }
    }

    /// Total carrier length, when known.
    ///
    /// Enables an early [`FrameError::PayloadOutOfBounds`] for payload
    /// lengths that cannot fit in what is left of the carrier.
    pub fn set_carrier_len(&mut self, len: Option<u64>) {
        self.carrier_len = len;
    }

    /// Skip the format header.
    pub fn begin(&mut self) -> Result<()> {
        self.step(|this| {
            if this.stage != Stage::Init {
                return Err(FrameError::OutOfOrder {
                    operation: "begin",
                    stage: this.stage,
                });
            }

            let wanted = this.config.header_size as u64;
            let skipped = io::copy(&mut (&mut this.carrier).take(wanted), &mut io::sink())?;
            if skipped < wanted {
                return Err(FrameError::CarrierExhausted {
                    section: "header",
                    offset: skipped,
                });
            }
            this.consumed += skipped;

            this.stage = Stage::HeaderHandled;
            debug!(header_size = wanted, "header skipped");
            Ok(())
        })
    }

    /// Decode `expected.len()` characters and compare them with `expected`.
    ///
    /// Stops at the first character that differs.
    pub fn read_signature(&mut self, expected: &[u8]) -> Result<()> {
        self.step(|this| {
            let kind = this.enter("read signature", &[FrameKind::Signature])?;
            if expected.is_empty() {
                return Err(FrameError::EmptySignature);
            }
            for (index, &want) in expected.iter().enumerate() {
                let found = this.take_byte(kind)?;
                if found != want {
                    return Err(FrameError::SignatureMismatch {
                        index,
                        expected: want,
                        found,
                    });
                }
            }
            this.complete(kind);
            Ok(())
        })
    }

    /// Decode a 32-bit length from one 32-byte run.
    ///
    /// Valid for the extension length and the payload length frames.
    pub fn read_length(&mut self) -> Result<u32> {
        self.step(|this| {
            let kind = this.enter(
                "read length",
                &[FrameKind::ExtensionLength, FrameKind::PayloadLength],
            )?;
            let value = this.take_word(kind)?;

            match kind {
                FrameKind::ExtensionLength if value as usize > this.config.max_extension_len => {
                    return Err(FrameError::ExtensionTooLong {
                        len: u64::from(value),
                        max: this.config.max_extension_len,
                    });
                }
                FrameKind::PayloadLength => {
                    if let Some(total) = this.carrier_len {
                        let needed = run_len(u64::from(value));
                        let available = total.saturating_sub(this.consumed);
                        if needed > available {
                            return Err(FrameError::PayloadOutOfBounds {
                                len: u64::from(value),
                                available: available / BYTE_RUN as u64,
                            });
                        }
                    }
                }
                _ => {}
            }

            this.declared = value;
            this.complete(kind);
            Ok(value)
        })
    }

    /// Decode exactly as many bytes as the preceding length frame declared.
    pub fn read_bytes(&mut self) -> Result<Bytes> {
        self.step(|this| {
            let kind = this.enter("read bytes", &[FrameKind::Extension, FrameKind::Payload])?;
            let mut buf = BytesMut::with_capacity(this.declared as usize);
            for _ in 0..this.declared {
                let byte = this.take_byte(kind)?;
                buf.put_u8(byte);
            }
            this.complete(kind);
            Ok(buf.freeze())
        })
    }

    /// Decode the declared number of bytes straight into `sink`.
    ///
    /// Returns the number of bytes written.
    pub fn read_into<W: Write>(&mut self, mut sink: W) -> Result<u64> {
        self.step(|this| {
            let kind = this.enter("read bytes", &[FrameKind::Extension, FrameKind::Payload])?;
            let mut out = io::BufWriter::new(&mut sink);
            for _ in 0..this.declared {
                let byte = this.take_byte(kind)?;
                out.write_all(&[byte])?;
            }
            out.flush()?;
            this.complete(kind);
            Ok(u64::from(this.declared))
        })
    }

    /// Mark the pass complete. The rest of the carrier is left unread.
    pub fn finish(&mut self) -> Result<()> {
        self.step(|this| {
            if this.stage != Stage::PayloadDone {
                return Err(FrameError::OutOfOrder {
                    operation: "finish",
                    stage: this.stage,
                });
            }
            this.stage = Stage::Complete;
            debug!(consumed = this.consumed, "decode complete");
            Ok(())
        })
    }

    /// Current stage of the pass.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Carrier bytes read so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Current decoder configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Borrow the carrier.
    pub fn get_ref(&self) -> &R {
        &self.carrier
    }

    /// Consume the decoder and return the carrier.
    pub fn into_inner(self) -> R {
        self.carrier
    }

    fn step<T>(&mut self, op: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let result = op(self);
        if result.is_err() {
            self.stage = Stage::Failed;
        }
        result
    }

    fn enter(&self, operation: &'static str, accepts: &[FrameKind]) -> Result<FrameKind> {
        match self.stage.next_frame() {
            Some(kind) if accepts.contains(&kind) => Ok(kind),
            _ => Err(FrameError::OutOfOrder {
                operation,
                stage: self.stage,
            }),
        }
    }

    fn complete(&mut self, kind: FrameKind) {
        self.stage = Stage::after(kind);
        debug!(frame = %kind, consumed = self.consumed, "frame read");
    }

    fn take_byte(&mut self, kind: FrameKind) -> Result<u8> {
        let mut run = [0u8; BYTE_RUN];
        self.read_carrier(&mut run, kind.name())?;
        Ok(unpack_byte(&run))
    }

    fn take_word(&mut self, kind: FrameKind) -> Result<u32> {
        let mut run = [0u8; WORD_RUN];
        self.read_carrier(&mut run, kind.name())?;
        Ok(unpack_u32(&run))
    }

    fn read_carrier(&mut self, buf: &mut [u8], section: &'static str) -> Result<()> {
        match self.carrier.read_exact(buf) {
            Ok(()) => {
                self.consumed += buf.len() as u64;
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
                Err(FrameError::CarrierExhausted {
                    section,
                    offset: self.consumed,
                })
            }
            Err(err) => Err(FrameError::Io(err)),
        }
    }
}
