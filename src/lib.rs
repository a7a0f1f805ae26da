//! ESC/POS Thermal Printer Driver
//!
//! This crate drives small ESC/POS compatible thermal receipt printers over a
//! write-only byte link: text styles, barcodes, raster bitmaps and power
//! state are turned into the exact byte sequences the printer understands.
//!
//! # Example
//!
//! ```rust,no_run
//! use thermal_printer::{Justification, Printer, SerialSink, DEFAULT_BAUD};
//!
//! let sink = SerialSink::open("/dev/ttyUSB0", DEFAULT_BAUD).unwrap();
//! let mut printer = Printer::new(sink).unwrap();
//! printer.justify(Justification::Center).unwrap();
//! printer.println("Hello World!").unwrap();
//! printer.print_barcode(b"123456789").unwrap();
//! ```

pub mod bitmap;
pub mod command;
mod error;
mod printer;
mod serial;
mod sink;
mod state;
mod usb;
mod utils;

pub use crate::{
    bitmap::{Bitmap, Chunk, ChunkPlan, MAX_PRINT_WIDTH, MAX_ROW_BYTES, PRINTER_BUFFER_SIZE},
    command::{Barcode, BarcodeVariant, Justification, Size},
    error::{Error, Result},
    printer::{
        Config, Printer, DEFAULT_BARCODE_HEIGHT, DEFAULT_BARCODE_SETTLE, DEFAULT_LINE_HEIGHT,
    },
    serial::{SerialSink, DEFAULT_BAUD, DEFAULT_WRITE_TIMEOUT},
    sink::{ByteSink, IoSink, MemorySink},
    state::DeviceState,
    usb::UsbSink,
    utils::threshold_luma,
};
