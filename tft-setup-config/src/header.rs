//! C setup header parser and writer
//!
//! Setup headers are the `#define` lists the display library includes at
//! build time:
//!
//! ```c
//! #define ST7735_DRIVER
//!
//! #define TFT_MISO -1
//! #define TFT_MOSI 23  // SDA
//! #define TFT_WIDTH  128
//! #define LOAD_GLCD
//! #define SPI_FREQUENCY  27000000
//! // #define SUPPORT_TRANSACTIONS
//! ```
//!
//! `-1` marks an unwired pin. Defines this crate does not model are ignored,
//! commented-out defines count as absent. The target microcontroller is not
//! part of a header and is passed to the parser.

use core::fmt::{self, Write};

use tft_setup_core::{
    ConfigError, DisplayConfig, DriverVariant, FontId, Panel, Signal, SpiClock, Target,
};

use crate::values::{parse_int, parse_pin};
use crate::ParseError;

const BACKLIGHT_ON: &str = "TFT_BACKLIGHT_ON";

/// Parse a setup header
pub fn parse_header(input: &str, target: Target) -> Result<DisplayConfig, ParseError> {
    // Placeholder driver, replaced by the `*_DRIVER` define below
    let mut config = DisplayConfig::new(DriverVariant::St7735, Panel::new(0, 0))
        .with_target(target)
        .with_spi(SpiClock::CONSERVATIVE);
    let mut driver: Option<DriverVariant> = None;
    let mut backlight_low = false;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        let Some(directive) = line.strip_prefix('#') else {
            return Err(ParseError::Syntax { line: line_no });
        };
        let mut parts = directive.trim_start().splitn(2, char::is_whitespace);
        if parts.next() != Some("define") {
            // #if, #include and friends carry no setup data
            continue;
        }

        let rest = parts.next().unwrap_or("").trim();
        let (name, value) = match rest.split_once(char::is_whitespace) {
            Some((name, value)) => (name, value.trim()),
            None => (rest, ""),
        };
        if name.is_empty() {
            return Err(ParseError::Syntax { line: line_no });
        }

        apply_define(
            name,
            value,
            line_no,
            &mut config,
            &mut driver,
            &mut backlight_low,
        )?;
    }

    config.driver = driver.ok_or(ConfigError::MissingDriver)?;

    if backlight_low {
        if let Some(bl) = config.pins.bl.as_mut() {
            bl.inverted = true;
        }
    }

    debug!(
        "Parsed setup header: {}, {} pins",
        config.driver,
        config.pins().count()
    );
    Ok(config)
}

/// Remove `//` and single-line `/* */` comments
fn strip_comment(line: &str) -> &str {
    let end = [line.find("//"), line.find("/*")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

/// Apply one `#define NAME VALUE`
fn apply_define(
    name: &str,
    value: &str,
    line: usize,
    config: &mut DisplayConfig,
    driver: &mut Option<DriverVariant>,
    backlight_low: &mut bool,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue { line };

    if name.ends_with("_DRIVER") {
        let selected = DriverVariant::from_define(name).ok_or(ConfigError::UnknownDriver)?;
        if driver.is_some() {
            return Err(ConfigError::MultipleDrivers.into());
        }
        *driver = Some(selected);
        return Ok(());
    }

    if let Some(signal) = Signal::from_define(name) {
        let pin = parse_pin(value).ok_or(ParseError::InvalidPin { line })?;
        config.pins.set(signal, pin);
        return Ok(());
    }

    if let Some(font) = FontId::from_define(name) {
        config.fonts.insert(font);
        return Ok(());
    }

    match name {
        BACKLIGHT_ON => {
            *backlight_low = match value {
                "LOW" | "0" => true,
                "HIGH" | "1" => false,
                _ => return Err(invalid),
            };
        }
        "TFT_WIDTH" => config.panel.width = parse_int(value).ok_or(invalid)?,
        "TFT_HEIGHT" => config.panel.height = parse_int(value).ok_or(invalid)?,
        "SMOOTH_FONT" => config.smooth_font = true,
        "SPI_FREQUENCY" => config.spi.write_hz = parse_int(value).ok_or(invalid)?,
        "SPI_READ_FREQUENCY" => config.spi.read_hz = parse_int(value).ok_or(invalid)?,
        "SPI_TOUCH_FREQUENCY" => config.spi.touch_hz = parse_int(value).ok_or(invalid)?,
        "SUPPORT_TRANSACTIONS" => config.transactions = true,
        _ => {} // Defines the descriptor does not model
    }

    Ok(())
}

/// Write a descriptor as a setup header
///
/// Only the backlight polarity is written, so a valid descriptor parses
/// back into an identical one for the same target.
pub fn write_header<W: Write>(config: &DisplayConfig, out: &mut W) -> fmt::Result {
    writeln!(
        out,
        "// Display setup for {} ({}x{}) on {}",
        config.driver, config.panel.width, config.panel.height, config.target
    )?;
    writeln!(out)?;
    writeln!(out, "#define {}", config.driver.define())?;
    writeln!(out)?;

    for signal in Signal::ALL {
        match config.pins.get(signal) {
            Some(pin) => writeln!(out, "#define {:<8} {}", signal.define(), pin.pin)?,
            // A defined TOUCH_CS enables touch support, leave it out instead
            None if signal == Signal::TouchCs => {}
            None => writeln!(out, "#define {:<8} -1", signal.define())?,
        }
    }
    if let Some(bl) = config.pins.bl {
        let level = if bl.inverted { "LOW" } else { "HIGH" };
        writeln!(out, "#define {} {}", BACKLIGHT_ON, level)?;
    }
    writeln!(out)?;

    writeln!(out, "#define TFT_WIDTH  {}", config.panel.width)?;
    writeln!(out, "#define TFT_HEIGHT {}", config.panel.height)?;
    writeln!(out)?;

    for font in FontId::ALL {
        let prefix = if config.fonts.contains(font) { "" } else { "// " };
        write!(
            out,
            "{}#define {:<11} // {}",
            prefix,
            font.define(),
            font.description()
        )?;
        match font.flash_bytes() {
            0 => writeln!(out)?,
            bytes => writeln!(out, ", needs ~{} bytes in FLASH", bytes)?,
        }
    }
    writeln!(out)?;

    if config.smooth_font {
        writeln!(out, "#define SMOOTH_FONT")?;
    } else {
        writeln!(out, "// #define SMOOTH_FONT")?;
    }
    writeln!(out)?;

    writeln!(out, "#define SPI_FREQUENCY  {}", config.spi.write_hz)?;
    writeln!(out, "#define SPI_READ_FREQUENCY  {}", config.spi.read_hz)?;
    writeln!(out, "#define SPI_TOUCH_FREQUENCY  {}", config.spi.touch_hz)?;
    writeln!(out)?;

    if config.transactions {
        writeln!(out, "#define SUPPORT_TRANSACTIONS")?;
    } else {
        writeln!(out, "// #define SUPPORT_TRANSACTIONS")?;
    }

    Ok(())
}
