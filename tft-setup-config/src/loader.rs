//! Setup loading
//!
//! Loads a setup from raw bytes in any of the supported formats and logs a
//! summary of what was found.

use core::str;

use tft_setup_core::Target;

use crate::binary::{decode, BinaryError};
use crate::header::parse_header;
use crate::toml::parse_setup;
use crate::{ParseError, Setup};

/// Setup data formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Format {
    Toml,
    Header,
    Binary,
}

impl Format {
    /// Guess the format of raw setup data
    ///
    /// Binary descriptors start with their version byte, which is never
    /// printable. Text with a line starting with `#define` is a header, other
    /// text is TOML.
    pub fn detect(data: &[u8]) -> Self {
        if data
            .first()
            .is_some_and(|b| b.is_ascii_control() && !b.is_ascii_whitespace())
        {
            return Format::Binary;
        }

        match str::from_utf8(data) {
            Ok(text) if text.lines().any(|l| l.trim_start().starts_with("#define")) => {
                Format::Header
            }
            Ok(_) => Format::Toml,
            Err(_) => Format::Binary,
        }
    }
}

/// Setup loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LoadError {
    /// Text setup could not be parsed
    Parse(ParseError),
    /// Binary descriptor could not be decoded
    Binary(BinaryError),
}

impl From<ParseError> for LoadError {
    fn from(e: ParseError) -> Self {
        LoadError::Parse(e)
    }
}

impl From<BinaryError> for LoadError {
    fn from(e: BinaryError) -> Self {
        LoadError::Binary(e)
    }
}

/// Load a setup in whatever format `data` is in
///
/// `target` applies to headers, which do not name their microcontroller.
/// Headers and binary descriptors carry no bus description, so the display
/// is assumed to own the bus.
pub fn load(data: &[u8], target: Target) -> Result<Setup, LoadError> {
    let format = Format::detect(data);
    debug!("Loading {} bytes of setup data as {}", data.len(), format);

    let setup = match (format, str::from_utf8(data)) {
        (Format::Toml, Ok(text)) => parse_setup(text)?,
        (Format::Header, Ok(text)) => Setup::exclusive(parse_header(text, target)?),
        _ => Setup::exclusive(decode(data)?),
    };

    log_setup_summary(&setup);
    Ok(setup)
}

/// Log a summary of the loaded setup
fn log_setup_summary(setup: &Setup) {
    let display = &setup.display;
    info!("Setup loaded successfully");
    debug!("  driver {}", display.driver);
    debug!("  panel {}x{}", display.panel.width, display.panel.height);
    debug!("  {} pins wired", display.pins().count());
    debug!(
        "  {} fonts, ~{} bytes",
        display.fonts.len(),
        display.flash_footprint()
    );
    debug!("  {} Hz write clock", display.spi.write_hz);
    debug!("  {} bus peripherals", setup.bus.peripherals.len());
}
