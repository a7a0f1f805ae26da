//! Settings the driver has to remember between commands.

use crate::{
    command,
    error::{Error, Result},
};

/// Largest value a four bit register field can hold.
pub const NIBBLE_MAX: u8 = 0x0F;

pub const DEFAULT_HEAT_TIME: u8 = 80;
pub const DEFAULT_HEAT_INTERVAL: u8 = 2;
pub const DEFAULT_PRINT_DENSITY: u8 = 15;
pub const DEFAULT_PRINT_BREAK_TIME: u8 = 15;

/// Mutable device configuration owned by one [`Printer`](crate::Printer).
///
/// Heat time and heat interval are sent as one command, and print density
/// and print break time share one register byte, so changing either half of
/// a pair means sending the pair again. The setters here only validate and
/// store; emitting is left to the printer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    heat_time: u8,
    heat_interval: u8,
    print_density: u8,
    print_break_time: u8,
    pending_linefeed: bool,
}

impl Default for DeviceState {
    fn default() -> Self {
        DeviceState {
            heat_time: DEFAULT_HEAT_TIME,
            heat_interval: DEFAULT_HEAT_INTERVAL,
            print_density: DEFAULT_PRINT_DENSITY,
            print_break_time: DEFAULT_PRINT_BREAK_TIME,
            pending_linefeed: false,
        }
    }
}

impl DeviceState {
    pub fn heat_time(&self) -> u8 {
        self.heat_time
    }

    pub fn heat_interval(&self) -> u8 {
        self.heat_interval
    }

    pub fn print_density(&self) -> u8 {
        self.print_density
    }

    pub fn print_break_time(&self) -> u8 {
        self.print_break_time
    }

    /// Whether the next bold-off should be followed by a line feed.
    pub fn pending_linefeed(&self) -> bool {
        self.pending_linefeed
    }

    pub fn set_heat_time(&mut self, heat_time: u8) {
        self.heat_time = heat_time;
    }

    pub fn set_heat_interval(&mut self, heat_interval: u8) {
        self.heat_interval = heat_interval;
    }

    pub fn set_print_density(&mut self, print_density: u8) -> Result<()> {
        self.print_density = check_nibble("print density", print_density)?;
        Ok(())
    }

    pub fn set_print_break_time(&mut self, print_break_time: u8) -> Result<()> {
        self.print_break_time = check_nibble("print break time", print_break_time)?;
        Ok(())
    }

    pub fn set_pending_linefeed(&mut self, pending: bool) {
        self.pending_linefeed = pending;
    }

    /// Clear the pending linefeed flag, returning its previous value.
    pub fn take_pending_linefeed(&mut self) -> bool {
        std::mem::replace(&mut self.pending_linefeed, false)
    }

    /// The packed density/break time register byte.
    pub fn density_register(&self) -> u8 {
        command::density_register(self.print_density, self.print_break_time)
    }
}

pub(crate) fn check_nibble(name: &'static str, value: u8) -> Result<u8> {
    if value > NIBBLE_MAX {
        Err(Error::OutOfRange {
            name,
            value,
            max: NIBBLE_MAX,
        })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = DeviceState::default();
        assert_eq!(state.heat_time(), 80);
        assert_eq!(state.heat_interval(), 2);
        assert_eq!(state.print_density(), 15);
        assert_eq!(state.print_break_time(), 15);
        assert!(!state.pending_linefeed());
        assert_eq!(state.density_register(), 0xFF);
    }

    #[test]
    fn test_out_of_range_leaves_state_untouched() {
        let mut state = DeviceState::default();
        state.set_print_density(3).unwrap();

        let err = state.set_print_density(16).unwrap_err();
        assert!(matches!(
            err,
            Error::OutOfRange {
                name: "print density",
                value: 16,
                max: 15
            }
        ));
        assert!(state.set_print_break_time(200).is_err());
        assert_eq!(state.print_density(), 3);
        assert_eq!(state.print_break_time(), 15);
    }

    #[test]
    fn test_take_pending_linefeed() {
        let mut state = DeviceState::default();
        state.set_pending_linefeed(true);
        assert!(state.take_pending_linefeed());
        assert!(!state.take_pending_linefeed());
    }
}
