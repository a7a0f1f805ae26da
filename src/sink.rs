//! Byte sinks the driver writes its command stream into.
//!
//! The printer is treated as write-only: a sink accepts bytes in order and
//! can block the caller for a given duration. Nothing is ever read back.

use std::io::Write;
use std::time::Duration;

use crate::error::Result;

/// Ordered, blocking byte output with a delay primitive.
pub trait ByteSink {
    /// Send one byte, blocking until the transport has accepted it.
    fn emit(&mut self, byte: u8) -> Result<()>;

    /// Block the caller for `duration`.
    ///
    /// A delay cannot fail. Implementations push out held bytes first, but
    /// a failure there is only logged. Call [`flush`](ByteSink::flush)
    /// before delaying when the error matters; [`Printer`](crate::Printer)
    /// always does.
    fn delay(&mut self, duration: Duration);

    fn emit_all(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.emit(byte)?;
        }
        Ok(())
    }

    /// Push out anything the transport is holding back.
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn emit(&mut self, byte: u8) -> Result<()> {
        (**self).emit(byte)
    }

    fn delay(&mut self, duration: Duration) {
        (**self).delay(duration)
    }

    fn emit_all(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).emit_all(bytes)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }
}

/// Sink over any [`std::io::Write`], sleeping the current thread on delay.
#[derive(Debug)]
pub struct IoSink<W: Write> {
    writer: W,
}

impl<W: Write> IoSink<W> {
    pub fn new(writer: W) -> Self {
        IoSink { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    fn emit(&mut self, byte: u8) -> Result<()> {
        self.writer.write_all(&[byte])?;
        Ok(())
    }

    fn delay(&mut self, duration: Duration) {
        // Bytes still sitting in a buffer would be sent after the pause.
        if let Err(err) = self.writer.flush() {
            log::warn!("flush before delay failed: {}", err);
        }
        std::thread::sleep(duration);
    }

    fn emit_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Sink that records the command stream instead of sending it.
///
/// Delays are recorded together with the number of bytes emitted before
/// them, so the position of a pause within the stream can be checked.
/// No time passes on `delay`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MemorySink {
    bytes: Vec<u8>,
    delays: Vec<(usize, Duration)>,
    flushes: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Recorded delays as `(byte offset, duration)` pairs.
    pub fn delays(&self) -> &[(usize, Duration)] {
        &self.delays
    }

    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Forget everything recorded so far.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.delays.clear();
        self.flushes = 0;
    }

    /// Take the recorded bytes, leaving the sink empty.
    pub fn take(&mut self) -> Vec<u8> {
        self.delays.clear();
        self.flushes = 0;
        std::mem::take(&mut self.bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl ByteSink for MemorySink {
    fn emit(&mut self, byte: u8) -> Result<()> {
        self.bytes.push(byte);
        Ok(())
    }

    fn delay(&mut self, duration: Duration) {
        self.delays.push((self.bytes.len(), duration));
    }

    fn flush(&mut self) -> Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
