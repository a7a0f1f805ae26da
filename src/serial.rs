//! Serial transport using the `serialport` crate.
//!
//! Most receipt printers of this class hang off a TTL or RS-232 serial line,
//! often behind a USB-serial bridge.

use log::debug;
use std::io::Write;
use std::time::Duration;

use crate::{error::Result, sink::ByteSink};

/// Factory baud rate of most serial thermal printers.
pub const DEFAULT_BAUD: u32 = 19200;

/// How long a write may block before the port reports a timeout.
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// A printer connected over a serial port (8N1, no flow control).
pub struct SerialSink {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialSink {
    /// Open a serial port at the given path and baud rate.
    ///
    /// * `path` - Serial port path, e.g. `/dev/ttyUSB0`, `/dev/serial0`, `COM3`.
    /// * `baud` - Baud rate the printer is configured for.
    pub fn open(path: &str, baud: u32) -> Result<Self> {
        Self::open_with_timeout(path, baud, DEFAULT_WRITE_TIMEOUT)
    }

    pub fn open_with_timeout(path: &str, baud: u32, timeout: Duration) -> Result<Self> {
        debug!("opening {} at {} baud", path, baud);
        let port = serialport::new(path, baud)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(timeout)
            .open()?;
        Ok(SerialSink { port })
    }

    /// List available serial port names on the system.
    pub fn list_ports() -> Vec<String> {
        serialport::available_ports()
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.port_name)
            .collect()
    }

    pub fn name(&self) -> Option<String> {
        self.port.name()
    }
}

impl ByteSink for SerialSink {
    fn emit(&mut self, byte: u8) -> Result<()> {
        self.port.write_all(&[byte])?;
        Ok(())
    }

    fn delay(&mut self, duration: Duration) {
        if let Err(err) = self.port.flush() {
            log::warn!("flush before delay failed: {}", err);
        }
        std::thread::sleep(duration);
    }

    fn emit_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.port.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }
}
