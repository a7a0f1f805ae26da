//! Raw ESC/POS command encoders.
//!
//! Every function here is a pure translation from one printer operation to
//! the bytes that go over the wire. [`Printer`](crate::Printer) strings them
//! together and keeps whatever state the commands depend on.

use std::{fmt, str::FromStr};

use crate::error::Error;

/// ESC - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS - Extended command prefix
pub const GS: u8 = 0x1D;

/// DC2 - Prefix for printer specific settings (density, raster images)
pub const DC2: u8 = 0x12;

/// LF - Print the line buffer and advance one line
pub const LF: u8 = 0x0A;

/// HT - Advance to next tab position
pub const HT: u8 = 0x09;

/// NUL - Terminates barcode data
pub const NUL: u8 = 0x00;

/// Fixed "max heating dots" parameter of the heat command, 64 dots = 8 * (7 + 1).
pub const HEATING_DOTS: u8 = 7;

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justification {
    #[default]
    Left,
    Center,
    Right,
}

impl Justification {
    pub fn code(&self) -> u8 {
        match self {
            Self::Left => 0,
            Self::Center => 1,
            Self::Right => 2,
        }
    }
}

/// Accepts the single letter selectors `l`, `c`, `r` in either case.
impl TryFrom<char> for Justification {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            'l' | 'L' => Ok(Self::Left),
            'c' | 'C' => Ok(Self::Center),
            'r' | 'R' => Ok(Self::Right),
            other => Err(Error::InvalidJustification(other)),
        }
    }
}

impl FromStr for Justification {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" | "centre" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => single_char(s)
                .ok_or_else(|| Error::InvalidJustification(first_char(s)))
                .and_then(Self::try_from),
        }
    }
}

impl fmt::Display for Justification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Character size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Size {
    #[default]
    Small,
    Medium,
    Large,
}

impl Size {
    pub fn code(&self) -> u8 {
        match self {
            Self::Small => 0,
            Self::Medium => 10,
            Self::Large => 25,
        }
    }
}

/// Accepts the single letter selectors `s`, `m`, `l` in either case.
impl TryFrom<char> for Size {
    type Error = Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            's' | 'S' => Ok(Self::Small),
            'm' | 'M' => Ok(Self::Medium),
            'l' | 'L' => Ok(Self::Large),
            other => Err(Error::InvalidSize(other)),
        }
    }
}

impl FromStr for Size {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => single_char(s)
                .ok_or_else(|| Error::InvalidSize(first_char(s)))
                .and_then(Self::try_from),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        };
        f.write_str(name)
    }
}

/// Barcode flavour, selected by the mode byte of `GS k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarcodeVariant {
    Standard,
    Fancy,
}

impl BarcodeVariant {
    pub fn mode(&self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Fancy => 4,
        }
    }
}

/// Barcode data together with the flavour to print it in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Barcode<'a> {
    pub text: &'a [u8],
    pub variant: BarcodeVariant,
}

impl<'a> Barcode<'a> {
    pub fn new(text: &'a [u8]) -> Self {
        Barcode {
            text,
            variant: BarcodeVariant::Standard,
        }
    }

    pub fn fancy(text: &'a [u8]) -> Self {
        Barcode {
            text,
            variant: BarcodeVariant::Fancy,
        }
    }

    /// Data may not contain the NUL terminator.
    pub fn check(&self) -> Result<(), Error> {
        match self.text.iter().position(|&b| b == NUL) {
            Some(offset) => Err(Error::BarcodeContainsNul(offset)),
            None => Ok(()),
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn first_char(s: &str) -> char {
    s.chars().next().unwrap_or('\0')
}

// Text style

pub fn inverse_on() -> Vec<u8> {
    vec![GS, b'B', 1]
}

/// Trailing LF is part of the baseline sequence real hardware expects.
pub fn inverse_off() -> Vec<u8> {
    vec![GS, b'B', 0, LF]
}

pub fn double_height_on() -> Vec<u8> {
    vec![ESC, 14]
}

pub fn double_height_off() -> Vec<u8> {
    vec![ESC, 20]
}

pub fn bold_on() -> Vec<u8> {
    vec![ESC, b'E', 1]
}

pub fn bold_off() -> Vec<u8> {
    vec![ESC, b'E', 0]
}

pub fn underline_on() -> Vec<u8> {
    vec![ESC, b'-', 1]
}

pub fn underline_off() -> Vec<u8> {
    vec![ESC, b'-', 0, LF]
}

/// ESC a n
pub fn justify(justification: Justification) -> Vec<u8> {
    vec![ESC, b'a', justification.code()]
}

/// GS ! n, followed by LF
pub fn size(size: Size) -> Vec<u8> {
    vec![GS, b'!', size.code(), LF]
}

/// ESC 3 n, line spacing in dots
pub fn line_height(dots: u8) -> Vec<u8> {
    vec![ESC, b'3', dots]
}

/// ESC SP with a fixed zero spacing byte, followed by LF.
pub fn char_spacing() -> Vec<u8> {
    vec![ESC, b' ', 0, LF]
}

pub fn feed(lines: u8) -> Vec<u8> {
    vec![LF; lines as usize]
}

pub fn tab() -> Vec<u8> {
    vec![HT]
}

// Power

pub fn wake() -> Vec<u8> {
    vec![ESC, b'=', 1]
}

pub fn sleep() -> Vec<u8> {
    vec![ESC, b'=', 0]
}

// Heating and density

/// ESC 7 n1 n2 n3: heating dots, heat time, heat interval.
///
/// Heat time and heat interval live in the same command, so both values are
/// always sent together.
pub fn heat_config(heat_time: u8, heat_interval: u8) -> Vec<u8> {
    vec![ESC, b'7', HEATING_DOTS, heat_time, heat_interval]
}

/// Pack print density (high nibble) and print break time (low nibble).
///
/// Callers are responsible for keeping both inputs within four bits; a wider
/// value spills into the neighbouring nibble.
pub fn density_register(print_density: u8, print_break_time: u8) -> u8 {
    (print_density << 4) | print_break_time
}

/// DC2 # n
pub fn print_density(register: u8) -> Vec<u8> {
    vec![DC2, b'#', register]
}

// Barcodes

/// GS h n
pub fn barcode_height(dots: u8) -> Vec<u8> {
    vec![GS, b'h', dots]
}

/// GS k m, to be followed by the data and a NUL terminator.
pub fn barcode_start(variant: BarcodeVariant) -> Vec<u8> {
    vec![GS, b'k', variant.mode()]
}

// Raster images

/// DC2 * r n: `rows` rows of `row_bytes` bytes each follow.
pub fn raster_header(rows: u8, row_bytes: u8) -> Vec<u8> {
    vec![DC2, b'*', rows, row_bytes]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_justify_selectors() {
        let cases = [
            ('l', 0),
            ('L', 0),
            ('c', 1),
            ('C', 1),
            ('r', 2),
            ('R', 2),
        ];
        for (selector, pos) in cases.iter() {
            let j = Justification::try_from(*selector).unwrap();
            assert_eq!(justify(j), vec![0x1B, 0x61, *pos]);
        }
    }

    #[test]
    fn test_justify_rejects_unknown() {
        assert!(matches!(
            Justification::try_from('x'),
            Err(Error::InvalidJustification('x'))
        ));
    }

    #[test]
    fn test_size_selectors() {
        let cases = [
            ('s', 0),
            ('S', 0),
            ('m', 10),
            ('M', 10),
            ('l', 25),
            ('L', 25),
        ];
        for (selector, code) in cases.iter() {
            let s = Size::try_from(*selector).unwrap();
            assert_eq!(size(s), vec![29, 33, *code, 10]);
        }
    }

    #[test]
    fn test_size_rejects_unknown() {
        assert!(matches!(Size::try_from('q'), Err(Error::InvalidSize('q'))));
    }

    #[test]
    fn test_selector_defaults() {
        assert_eq!(Justification::default(), Justification::Left);
        assert_eq!(Size::default(), Size::Small);
    }

    #[test]
    fn test_from_str_names_and_letters() {
        assert_eq!("Center".parse::<Justification>().unwrap(), Justification::Center);
        assert_eq!("r".parse::<Justification>().unwrap(), Justification::Right);
        assert_eq!("medium".parse::<Size>().unwrap(), Size::Medium);
        assert_eq!("L".parse::<Size>().unwrap(), Size::Large);
        assert!("middle".parse::<Justification>().is_err());
        assert!("".parse::<Size>().is_err());
    }

    #[test]
    fn test_style_commands() {
        assert_eq!(inverse_on(), vec![29, b'B', 1]);
        assert_eq!(inverse_off(), vec![29, b'B', 0, 10]);
        assert_eq!(double_height_on(), vec![27, 14]);
        assert_eq!(double_height_off(), vec![27, 20]);
        assert_eq!(bold_on(), vec![27, 69, 1]);
        assert_eq!(bold_off(), vec![27, 69, 0]);
        assert_eq!(underline_on(), vec![27, 45, 1]);
        assert_eq!(underline_off(), vec![27, 45, 0, 10]);
        assert_eq!(line_height(32), vec![27, 51, 32]);
        assert_eq!(char_spacing(), vec![27, 32, 0, 10]);
        assert_eq!(tab(), vec![9]);
    }

    #[test]
    fn test_feed() {
        assert_eq!(feed(0), Vec::<u8>::new());
        assert_eq!(feed(3), vec![10, 10, 10]);
    }

    #[test]
    fn test_power() {
        assert_eq!(wake(), vec![27, 61, 1]);
        assert_eq!(sleep(), vec![27, 61, 0]);
    }

    #[test]
    fn test_heat_config() {
        assert_eq!(heat_config(80, 2), vec![27, 55, 7, 80, 2]);
    }

    #[test]
    fn test_density_register() {
        assert_eq!(density_register(15, 15), 0xFF);
        assert_eq!(density_register(0, 0), 0x00);
        for density in 0..16u8 {
            for break_time in 0..16u8 {
                let register = density_register(density, break_time);
                assert_eq!(register >> 4, density);
                assert_eq!(register & 0x0F, break_time);
            }
        }
        assert_eq!(print_density(0xA3), vec![18, 35, 0xA3]);
    }

    #[test]
    fn test_barcode_commands() {
        assert_eq!(barcode_height(50), vec![29, 104, 50]);
        assert_eq!(barcode_start(BarcodeVariant::Standard), vec![29, 107, 0]);
        assert_eq!(barcode_start(BarcodeVariant::Fancy), vec![29, 107, 4]);
    }

    #[test]
    fn test_barcode_check() {
        assert!(Barcode::new(b"ABC").check().is_ok());
        assert!(Barcode::fancy(b"").check().is_ok());
        assert!(matches!(
            Barcode::new(b"A\0").check(),
            Err(Error::BarcodeContainsNul(1))
        ));
    }

    #[test]
    fn test_raster_header() {
        assert_eq!(raster_header(5, 48), vec![18, b'*', 5, 48]);
    }
}
