//! Error types for thermal printer operations.
//!
//! This module defines all possible errors that can occur while encoding
//! commands, validating caller input, and writing bytes to the transport.

use thiserror::Error;

/// Main error type for thermal printer operations.
///
/// The printer never answers back, so every variant originates either on the
/// host side of the link (transport failures) or in argument validation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error from a generic writer used as a byte sink.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serial port error.
    ///
    /// Raised when the port cannot be opened or configured.
    #[error(transparent)]
    Serial(#[from] serialport::Error),

    /// USB communication error.
    ///
    /// Wraps underlying rusb errors for device communication issues,
    /// timeouts, or permission problems.
    #[error(transparent)]
    Usb(#[from] rusb::Error),

    /// No printer matching the requested ids was found on the bus.
    #[error("Device is offline")]
    DeviceOffline,

    #[error("Can't read device list, permission issue ?")]
    DeviceListNotReadable,

    #[error("Device is missing endpoint")]
    MissingEndpoint,

    /// The transport accepted fewer bytes than it was handed.
    #[error("Short write: {written} of {expected} bytes accepted")]
    ShortWrite { written: usize, expected: usize },

    #[error("Invalid justification selector {0:?}, expected one of l/c/r")]
    InvalidJustification(char),

    #[error("Invalid size selector {0:?}, expected one of s/m/l")]
    InvalidSize(char),

    /// A value does not fit the register field it is packed into.
    ///
    /// Print density and print break time share one byte as two nibbles,
    /// so each of them must stay within `0..=15`.
    #[error("{name} = {value} is out of range (max {max})")]
    OutOfRange {
        name: &'static str,
        value: u8,
        max: u8,
    },

    #[error("Bitmap data too short: expected {expected} bytes, got {actual}")]
    BitmapTooShort { expected: usize, actual: usize },

    #[error("Bitmap has zero width")]
    EmptyBitmap,

    /// Barcode data may not contain NUL, the byte terminating the command.
    #[error("Barcode data contains a NUL byte at offset {0}")]
    BarcodeContainsNul(usize),

    /// Invalid configuration parameter provided.
    ///
    /// This error occurs when configuration values are out of range.
    #[error("Invalid configuration parameter: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = Error::OutOfRange {
            name: "print density",
            value: 16,
            max: 15,
        };
        assert_eq!(err.to_string(), "print density = 16 is out of range (max 15)");
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
