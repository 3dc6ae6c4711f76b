use std::io::{self, ErrorKind, Read, Write};

use tracing::debug;

use crate::bits::{pack_byte, pack_u32, BYTE_RUN, WORD_RUN};
use crate::codec::{FrameConfig, FrameKind};
use crate::error::{FrameError, Result};
use crate::stage::Stage;

const COPY_CHUNK_SIZE: usize = 8 * 1024;

/// Writes the frame sequence into a copy of a carrier stream.
///
/// Every frame reads its run from `carrier`, substitutes bit 0 of each byte,
/// and writes the run to `sink`. Bytes outside the runs pass through
/// unchanged, so the output is exactly as long as the carrier.
pub struct FrameEncoder<R, W> {
    carrier: R,
    sink: W,
    config: FrameConfig,
    stage: Stage,
    declared: u32,
    consumed: u64,
    emitted: u64,
}

impl<R: Read, W: Write> FrameEncoder<R, W> {
    /// Create a new encoder with default configuration.
    pub fn new(carrier: R, sink: W) -> Self {
        Self::with_config(carrier, sink, FrameConfig::default())
    }

    /// Create a new encoder with explicit configuration.
    pub fn with_config(carrier: R, sink: W, config: FrameConfig) -> Self {
        Self {
            carrier,
            sink,
            config,
            stage: Stage::Init,
            declared: 0,
            consumed: 0,
            emitted: 0,
        }
    }

    /// Copy the format header verbatim.
    pub fn begin(&mut self) -> Result<()> {
        self.step(|this| {
            if this.stage != Stage::Init {
                return Err(FrameError::OutOfOrder {
                    operation: "begin",
                    stage: this.stage,
                });
            }

            let mut header = vec![0u8; this.config.header_size];
            this.read_carrier(&mut header, "header")?;
            this.write_sink(&header)?;

            if this.consumed != this.emitted {
                return Err(FrameError::HeaderMisaligned {
                    read: this.consumed,
                    written: this.emitted,
                });
            }

            this.stage = Stage::HeaderHandled;
            debug!(header_size = this.config.header_size, "header copied");
            Ok(())
        })
    }

    /// Hide `literal` one character per 8-byte run.
    pub fn write_signature(&mut self, literal: &[u8]) -> Result<()> {
        self.step(|this| {
            let kind = this.enter("write signature", &[FrameKind::Signature])?;
            if literal.is_empty() {
                return Err(FrameError::EmptySignature);
            }
            for &ch in literal {
                this.put_byte(ch, kind)?;
            }
            this.complete(kind);
            Ok(())
        })
    }

    /// Hide a 32-bit length in one 32-byte run.
    ///
    /// Valid for the extension length and the payload length frames. The
    /// value becomes the exact byte count of the frame that follows.
    pub fn write_length(&mut self, value: u32) -> Result<()> {
        self.step(|this| {
            let kind = this.enter(
                "write length",
                &[FrameKind::ExtensionLength, FrameKind::PayloadLength],
            )?;
            if kind == FrameKind::ExtensionLength && value as usize > this.config.max_extension_len
            {
                return Err(FrameError::ExtensionTooLong {
                    len: u64::from(value),
                    max: this.config.max_extension_len,
                });
            }
            this.put_word(value, kind)?;
            this.declared = value;
            this.complete(kind);
            Ok(())
        })
    }

    /// Hide `buf` one byte per 8-byte run.
    ///
    /// `buf` must be exactly as long as the preceding length frame declared.
    pub fn write_bytes(&mut self, buf: &[u8]) -> Result<()> {
        self.step(|this| {
            let kind = this.enter("write bytes", &[FrameKind::Extension, FrameKind::Payload])?;
            let declared = u64::from(this.declared);
            if buf.len() as u64 != declared {
                return Err(FrameError::LengthMismatch {
                    frame: kind,
                    declared,
                    actual: buf.len() as u64,
                });
            }
            for &byte in buf {
                this.put_byte(byte, kind)?;
            }
            this.complete(kind);
            Ok(())
        })
    }

    /// Hide exactly the declared number of bytes read from `source`.
    ///
    /// Returns the number of bytes hidden. A source that ends early is a
    /// [`FrameError::LengthMismatch`]; extra source bytes are left unread.
    pub fn write_from<S: Read>(&mut self, mut source: S) -> Result<u64> {
        self.step(|this| {
            let kind = this.enter("write bytes", &[FrameKind::Extension, FrameKind::Payload])?;
            let declared = u64::from(this.declared);

            let mut chunk = [0u8; COPY_CHUNK_SIZE];
            let mut remaining = declared;
            while remaining > 0 {
                let want = remaining.min(COPY_CHUNK_SIZE as u64) as usize;
                let read = match source.read(&mut chunk[..want]) {
                    Ok(0) => {
                        return Err(FrameError::LengthMismatch {
                            frame: kind,
                            declared,
                            actual: declared - remaining,
                        })
                    }
                    Ok(n) => n,
                    Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                    Err(err) => return Err(FrameError::Io(err)),
                };
                for &byte in &chunk[..read] {
                    this.put_byte(byte, kind)?;
                }
                remaining -= read as u64;
            }

            this.complete(kind);
            Ok(declared)
        })
    }

    /// Copy the untouched rest of the carrier and flush.
    ///
    /// Returns the total number of bytes written to the sink.
    pub fn finish(&mut self) -> Result<u64> {
        self.step(|this| {
            if this.stage != Stage::PayloadDone {
                return Err(FrameError::OutOfOrder {
                    operation: "finish",
                    stage: this.stage,
                });
            }

            let copied = io::copy(&mut this.carrier, &mut this.sink)?;
            this.consumed += copied;
            this.emitted += copied;
            this.flush()?;

            this.stage = Stage::Complete;
            debug!(remainder = copied, total = this.emitted, "carrier remainder copied");
            Ok(this.emitted)
        })
    }

    /// Flush the sink.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.sink.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Current stage of the pass.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Carrier bytes read so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Sink bytes written so far.
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Current encoder configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Borrow the sink.
    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.sink
    }

    /// Consume the encoder and return the sink.
    pub fn into_inner(self) -> W {
        self.sink
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
        debug!(frame = %kind, consumed = self.consumed, "frame written");
    }

    fn put_byte(&mut self, value: u8, kind: FrameKind) -> Result<()> {
        let mut run = [0u8; BYTE_RUN];
        self.read_carrier(&mut run, kind.name())?;
        pack_byte(value, &mut run);
        self.write_sink(&run)
    }

    fn put_word(&mut self, value: u32, kind: FrameKind) -> Result<()> {
        let mut run = [0u8; WORD_RUN];
        self.read_carrier(&mut run, kind.name())?;
        pack_u32(value, &mut run);
        self.write_sink(&run)
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

    fn write_sink(&mut self, buf: &[u8]) -> Result<()> {
        self.sink.write_all(buf)?;
        self.emitted += buf.len() as u64;
        Ok(())
    }
}
