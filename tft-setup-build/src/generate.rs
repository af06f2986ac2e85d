//! Firmware constant generation
//!
//! The generated Rust file is meant to be pulled in with
//! `include!(concat!(env!("OUT_DIR"), "/tft_setup.rs"))`. It holds one
//! constant per header define plus the postcard-encoded descriptor, which
//! `tft_setup_config::decode` turns back into a `DisplayConfig`.

use std::fmt::{self, Write as _};
use std::fs;
use std::io;
use std::path::Path;

use tft_setup_config::{encode, write_header, MAX_BINARY_SIZE};
use tft_setup_core::{DisplayConfig, FontId, Signal};

/// Generated Rust constants
pub const CONSTANTS_FILE: &str = "tft_setup.rs";

/// Generated C setup header
pub const HEADER_FILE: &str = "User_Setup.h";

/// Render a descriptor as Rust constants
pub fn render_constants(config: &DisplayConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "// Generated from the display setup, do not edit")?;
    writeln!(out)?;
    writeln!(
        out,
        "pub const TFT_DRIVER: &str = \"{}\";",
        config.driver.name()
    )?;
    writeln!(
        out,
        "pub const TFT_TARGET: &str = \"{}\";",
        config.target.name()
    )?;
    writeln!(out, "pub const TFT_WIDTH: u16 = {};", config.panel.width)?;
    writeln!(out, "pub const TFT_HEIGHT: u16 = {};", config.panel.height)?;
    writeln!(out)?;

    for signal in Signal::ALL {
        let pin = match config.pins.get(signal) {
            Some(pin) => format!("Some({})", pin.pin),
            None => "None".to_string(),
        };
        writeln!(out, "pub const {}: Option<u8> = {};", signal.define(), pin)?;
    }
    let backlight_high = config.pins.bl.map_or(true, |bl| !bl.inverted);
    writeln!(
        out,
        "pub const TFT_BACKLIGHT_ON_HIGH: bool = {};",
        backlight_high
    )?;
    writeln!(out)?;

    for font in FontId::ALL {
        writeln!(
            out,
            "pub const {}: bool = {};",
            font.define(),
            config.fonts.contains(font)
        )?;
    }
    writeln!(
        out,
        "pub const SMOOTH_FONT: bool = {};",
        config.smooth_font
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "pub const SPI_FREQUENCY: u32 = {};",
        config.spi.write_hz
    )?;
    writeln!(
        out,
        "pub const SPI_READ_FREQUENCY: u32 = {};",
        config.spi.read_hz
    )?;
    writeln!(
        out,
        "pub const SPI_TOUCH_FREQUENCY: u32 = {};",
        config.spi.touch_hz
    )?;
    writeln!(
        out,
        "pub const SUPPORT_TRANSACTIONS: bool = {};",
        config.transactions
    )?;
    writeln!(out)?;

    let mut buf = [0u8; MAX_BINARY_SIZE];
    let blob = encode(config, &mut buf).map_err(|_| fmt::Error)?;
    write!(out, "pub static TFT_SETUP: [u8; {}] = [", blob.len())?;
    for (i, byte) in blob.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "{:#04x}", byte)?;
    }
    writeln!(out, "];")?;

    Ok(out)
}

/// Write the Rust constants and a setup header into `out_dir`
pub fn write_constants(config: &DisplayConfig, out_dir: &Path) -> io::Result<()> {
    let constants = render_constants(config).map_err(io::Error::other)?;
    fs::write(out_dir.join(CONSTANTS_FILE), constants)?;

    let mut header = String::new();
    write_header(config, &mut header).map_err(io::Error::other)?;
    fs::write(out_dir.join(HEADER_FILE), header)?;

    Ok(())
}
