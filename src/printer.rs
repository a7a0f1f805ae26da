use log::{debug, info, warn};
use std::time::Duration;

use crate::{
    bitmap::Bitmap,
    command::{self, Barcode, BarcodeVariant, Justification, Size},
    error::{Error, Result},
    sink::ByteSink,
    state::{self, DeviceState},
};

/// Line spacing sent by the default configuration, in dots.
pub const DEFAULT_LINE_HEIGHT: u8 = 32;

/// Barcode height sent by the default configuration, in dots.
pub const DEFAULT_BARCODE_HEIGHT: u8 = 50;

/// How long the printer needs after a barcode before it accepts line feeds.
pub const DEFAULT_BARCODE_SETTLE: Duration = Duration::from_secs(3);

/// ESC/POS thermal printer driver.
///
/// The driver owns a [`ByteSink`] and writes every command into it in order.
/// Nothing is read back from the device: an `Ok` only means the transport
/// took the bytes.
pub struct Printer<S: ByteSink> {
    sink: S,
    state: DeviceState,
    config: Config,
}

impl<S: ByteSink> Printer<S> {
    /// Create a driver with the default configuration and initialize the device.
    pub fn new(sink: S) -> Result<Self> {
        Self::with_config(sink, Config::default())
    }

    /// Create a driver and initialize the device.
    ///
    /// Sends the heat timing and print density registers, then the default
    /// configuration sequence (see [`Printer::set_default`]).
    pub fn with_config(sink: S, config: Config) -> Result<Self> {
        config.validate()?;

        let mut state = DeviceState::default();
        state.set_heat_time(config.heat_time);
        state.set_heat_interval(config.heat_interval);
        state.set_print_density(config.print_density)?;
        state.set_print_break_time(config.print_break_time)?;

        let mut printer = Printer {
            sink,
            state,
            config,
        };
        info!("initializing printer {:?}", printer.config);

        printer.send_heat_config()?;
        printer.send_density()?;
        printer.set_default()?;
        Ok(printer)
    }

    /// Put the printer into its baseline state.
    ///
    /// wake, justify left, inverse off, double height off, line height,
    /// bold off, underline off, barcode height, size small. The order
    /// matters: inverse off and underline off carry trailing line feeds.
    pub fn set_default(&mut self) -> Result<()> {
        debug!("apply default configuration");
        self.wake()?;
        self.justify(Justification::Left)?;
        self.inverse_off()?;
        self.double_height_off()?;
        self.set_line_height(self.config.line_height)?;
        self.bold_off()?;
        self.underline_off()?;
        self.set_barcode_height(self.config.barcode_height)?;
        self.set_size(Size::Small)
    }

    /// Print a short test line followed by two blank lines.
    pub fn print_test_page(&mut self) -> Result<()> {
        self.println("Hello World!")?;
        self.feed(2)
    }

    // Heat and density

    pub fn set_heat_time(&mut self, heat_time: u8) -> Result<()> {
        self.state.set_heat_time(heat_time);
        self.send_heat_config()
    }

    pub fn set_heat_interval(&mut self, heat_interval: u8) -> Result<()> {
        self.state.set_heat_interval(heat_interval);
        self.send_heat_config()
    }

    /// Set print density, `0..=15`.
    pub fn set_print_density(&mut self, print_density: u8) -> Result<()> {
        self.state.set_print_density(print_density)?;
        self.send_density()
    }

    /// Set print break time, `0..=15`.
    pub fn set_print_break_time(&mut self, print_break_time: u8) -> Result<()> {
        self.state.set_print_break_time(print_break_time)?;
        self.send_density()
    }

    fn send_heat_config(&mut self) -> Result<()> {
        let bytes = command::heat_config(self.state.heat_time(), self.state.heat_interval());
        self.command("heat config", &bytes)
    }

    fn send_density(&mut self) -> Result<()> {
        let bytes = command::print_density(self.state.density_register());
        self.command("print density", &bytes)
    }

    // Text formatting

    pub fn inverse_on(&mut self) -> Result<()> {
        self.command("inverse on", &command::inverse_on())
    }

    pub fn inverse_off(&mut self) -> Result<()> {
        self.command("inverse off", &command::inverse_off())
    }

    pub fn double_height_on(&mut self) -> Result<()> {
        self.command("double height on", &command::double_height_on())
    }

    pub fn double_height_off(&mut self) -> Result<()> {
        self.command("double height off", &command::double_height_off())
    }

    pub fn bold_on(&mut self) -> Result<()> {
        self.command("bold on", &command::bold_on())
    }

    /// Turn bold off, then feed one line if a linefeed is pending.
    ///
    /// The pending flag is cleared either way.
    pub fn bold_off(&mut self) -> Result<()> {
        self.send("bold off", &command::bold_off())?;
        if self.state.take_pending_linefeed() {
            self.send("pending feed", &command::feed(1))?;
        }
        self.sink.flush()
    }

    pub fn underline_on(&mut self) -> Result<()> {
        self.command("underline on", &command::underline_on())
    }

    pub fn underline_off(&mut self) -> Result<()> {
        self.command("underline off", &command::underline_off())
    }

    pub fn justify(&mut self, justification: Justification) -> Result<()> {
        self.command("justify", &command::justify(justification))
    }

    pub fn set_size(&mut self, size: Size) -> Result<()> {
        self.command("size", &command::size(size))
    }

    /// Line spacing in dots.
    pub fn set_line_height(&mut self, dots: u8) -> Result<()> {
        self.command("line height", &command::line_height(dots))
    }

    /// Restore the configured line spacing (32 dots unless overridden).
    pub fn reset_line_height(&mut self) -> Result<()> {
        self.set_line_height(self.config.line_height)
    }

    /// Send the character spacing command.
    ///
    /// The command always carries a zero spacing byte; `spacing` is accepted
    /// for interface compatibility and is not transmitted.
    pub fn set_char_spacing(&mut self, spacing: u8) -> Result<()> {
        debug!("char spacing {} not encoded, sending 0", spacing);
        self.command("char spacing", &command::char_spacing())
    }

    /// Whether the next [`bold_off`](Printer::bold_off) will add a line feed.
    pub fn pending_linefeed(&self) -> bool {
        self.state.pending_linefeed()
    }

    /// Arm or disarm the line feed sent by the next bold-off.
    ///
    /// No command sets this flag on its own.
    pub fn set_pending_linefeed(&mut self, pending: bool) {
        self.state.set_pending_linefeed(pending);
    }

    // Commands

    /// Feed `lines` blank lines. `feed(0)` sends nothing.
    pub fn feed(&mut self, lines: u8) -> Result<()> {
        self.command("feed", &command::feed(lines))
    }

    pub fn tab(&mut self) -> Result<()> {
        self.command("tab", &command::tab())
    }

    pub fn wake(&mut self) -> Result<()> {
        self.command("wake", &command::wake())
    }

    pub fn sleep(&mut self) -> Result<()> {
        self.command("sleep", &command::sleep())
    }

    /// Send raw text. No line break is added.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.command("text", text.as_bytes())
    }

    /// Send text followed by CR LF.
    pub fn println(&mut self, text: &str) -> Result<()> {
        self.send("text", text.as_bytes())?;
        self.send("newline", b"\r\n")?;
        self.sink.flush()
    }

    // Barcodes

    pub fn set_barcode_height(&mut self, dots: u8) -> Result<()> {
        self.command("barcode height", &command::barcode_height(dots))
    }

    pub fn print_barcode(&mut self, text: &[u8]) -> Result<()> {
        self.print_barcode_data(&Barcode::new(text))
    }

    pub fn print_fancy_barcode(&mut self, text: &[u8]) -> Result<()> {
        self.print_barcode_data(&Barcode::fancy(text))
    }

    /// Print a barcode, wait for the printer to settle, then feed two lines.
    ///
    /// Blocks for the configured settle time (3 seconds by default).
    pub fn print_barcode_data(&mut self, barcode: &Barcode) -> Result<()> {
        barcode.check()?;
        let name = match barcode.variant {
            BarcodeVariant::Standard => "barcode",
            BarcodeVariant::Fancy => "fancy barcode",
        };

        self.send(name, &command::barcode_start(barcode.variant))?;
        self.send("barcode data", barcode.text)?;
        self.send("barcode end", &[command::NUL])?;
        self.sink.flush()?;

        debug!("waiting {:?} for barcode", self.config.barcode_settle);
        self.sink.delay(self.config.barcode_settle);

        self.command("feed", &command::feed(2))
    }

    // Images

    /// Print a bitmap as a series of raster commands.
    ///
    /// Rows wider than 384 dots are clipped on the right.
    pub fn print_bitmap(&mut self, bitmap: &Bitmap) -> Result<()> {
        let plan = bitmap.plan();
        if bitmap.is_clipped() {
            warn!(
                "bitmap is {} dots wide, clipping {} bytes per row",
                bitmap.width(),
                plan.skipped_per_row()
            );
        }
        debug!("bitmap {}x{}, {:?}", bitmap.width(), bitmap.height(), plan);

        for chunk in plan.chunks(bitmap.height()) {
            // Both fit a byte: chunk height <= 255, clipped row <= 48.
            let header =
                command::raster_header(chunk.height as u8, plan.row_bytes_clipped as u8);
            self.send("raster", &header)?;
            let rows = chunk.row_start..chunk.row_start + chunk.height;
            for row in rows.filter_map(|y| bitmap.row(y as u32)) {
                self.sink.emit_all(row)?;
            }
            self.sink.flush()?;
        }
        Ok(())
    }

    // Access

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Give back the transport.
    pub fn into_inner(self) -> S {
        self.sink
    }

    fn send(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        debug!("{}: {:?}", name, bytes);
        self.sink.emit_all(bytes)
    }

    fn command(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.send(name, bytes)?;
        self.sink.flush()
    }
}

/// Config
///
/// Initial register values and timing for a [`Printer`].
#[derive(Debug, Clone)]
pub struct Config {
    heat_time: u8,
    heat_interval: u8,
    print_density: u8,
    print_break_time: u8,
    line_height: u8,
    barcode_height: u8,
    barcode_settle: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            heat_time: state::DEFAULT_HEAT_TIME,
            heat_interval: state::DEFAULT_HEAT_INTERVAL,
            print_density: state::DEFAULT_PRINT_DENSITY,
            print_break_time: state::DEFAULT_PRINT_BREAK_TIME,
            line_height: DEFAULT_LINE_HEIGHT,
            barcode_height: DEFAULT_BARCODE_HEIGHT,
            barcode_settle: DEFAULT_BARCODE_SETTLE,
        }
    }
}

impl Config {
    /// Initialize configuration data with default values.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use thermal_printer::Config;
    ///
    /// let config = Config::new()
    ///     .heat_time(120)
    ///     .print_density(10)
    ///     .barcode_settle(Duration::from_millis(0));
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn new() -> Config {
        Self::default()
    }

    /// Heating time in units of 10us. Longer is darker and slower.
    pub fn heat_time(self, heat_time: u8) -> Self {
        Config { heat_time, ..self }
    }

    /// Heating interval in units of 10us.
    pub fn heat_interval(self, heat_interval: u8) -> Self {
        Config {
            heat_interval,
            ..self
        }
    }

    pub fn print_density(self, print_density: u8) -> Self {
        Config {
            print_density,
            ..self
        }
    }

    pub fn print_break_time(self, print_break_time: u8) -> Self {
        Config {
            print_break_time,
            ..self
        }
    }

    pub fn line_height(self, line_height: u8) -> Self {
        Config {
            line_height,
            ..self
        }
    }

    pub fn barcode_height(self, barcode_height: u8) -> Self {
        Config {
            barcode_height,
            ..self
        }
    }

    /// Pause between a barcode and the line feeds after it.
    pub fn barcode_settle(self, barcode_settle: Duration) -> Self {
        Config {
            barcode_settle,
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        state::check_nibble("print density", self.print_density)
            .and_then(|_| state::check_nibble("print break time", self.print_break_time))
            .map(|_| ())
            .map_err(|err| Error::InvalidConfig(err.to_string()))
    }
}
