//! Display controller variants and their capabilities

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::Signal;

/// Supported display controller families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DriverVariant {
    St7735,
    Ili9163,
    S6d02a1,
    St7789,
    St7796,
    Ili9341,
    Ili9481,
    Ili9486,
    Ili9488,
    Hx8357d,
    Gc9a01,
    Ssd1351,
}

/// Static capabilities of a controller family
///
/// Clock ceilings are the highest rates the controller is known to accept
/// with short, direct wiring. Longer leads lower the real ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DriverCaps {
    /// Widest addressable frame memory (portrait)
    pub max_width: u16,
    /// Tallest addressable frame memory (portrait)
    pub max_height: u16,
    /// Write clock ceiling in Hz
    pub max_write_hz: u32,
    /// Read clock ceiling in Hz, `None` if the controller cannot be read over SPI
    pub max_read_hz: Option<u32>,
    /// Controller needs a hardware reset line to start reliably
    pub requires_reset: bool,
}

/// Signals every controller needs
const BASE_SIGNALS: [Signal; 3] = [Signal::Mosi, Signal::Sclk, Signal::Dc];

impl DriverVariant {
    /// All supported controllers
    pub const ALL: [DriverVariant; 12] = [
        DriverVariant::St7735,
        DriverVariant::Ili9163,
        DriverVariant::S6d02a1,
        DriverVariant::St7789,
        DriverVariant::St7796,
        DriverVariant::Ili9341,
        DriverVariant::Ili9481,
        DriverVariant::Ili9486,
        DriverVariant::Ili9488,
        DriverVariant::Hx8357d,
        DriverVariant::Gc9a01,
        DriverVariant::Ssd1351,
    ];

    /// Short lowercase name used in TOML setup files
    pub const fn name(self) -> &'static str {
        match self {
            DriverVariant::St7735 => "st7735",
            DriverVariant::Ili9163 => "ili9163",
            DriverVariant::S6d02a1 => "s6d02a1",
            DriverVariant::St7789 => "st7789",
            DriverVariant::St7796 => "st7796",
            DriverVariant::Ili9341 => "ili9341",
            DriverVariant::Ili9481 => "ili9481",
            DriverVariant::Ili9486 => "ili9486",
            DriverVariant::Ili9488 => "ili9488",
            DriverVariant::Hx8357d => "hx8357d",
            DriverVariant::Gc9a01 => "gc9a01",
            DriverVariant::Ssd1351 => "ssd1351",
        }
    }

    /// Preprocessor define selecting this driver in setup headers
    pub const fn define(self) -> &'static str {
        match self {
            DriverVariant::St7735 => "ST7735_DRIVER",
            DriverVariant::Ili9163 => "ILI9163_DRIVER",
            DriverVariant::S6d02a1 => "S6D02A1_DRIVER",
            DriverVariant::St7789 => "ST7789_DRIVER",
            DriverVariant::St7796 => "ST7796_DRIVER",
            DriverVariant::Ili9341 => "ILI9341_DRIVER",
            DriverVariant::Ili9481 => "ILI9481_DRIVER",
            DriverVariant::Ili9486 => "ILI9486_DRIVER",
            DriverVariant::Ili9488 => "ILI9488_DRIVER",
            DriverVariant::Hx8357d => "HX8357D_DRIVER",
            DriverVariant::Gc9a01 => "GC9A01_DRIVER",
            DriverVariant::Ssd1351 => "SSD1351_DRIVER",
        }
    }

    /// Parse a TOML driver name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    /// Parse a header driver define
    pub fn from_define(define: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|d| d.define() == define)
    }

    /// Capability table entry for this controller
    pub const fn capabilities(self) -> DriverCaps {
        match self {
            DriverVariant::St7735 => caps(132, 162, 33_000_000, Some(25_000_000), true),
            DriverVariant::Ili9163 => caps(128, 160, 40_000_000, Some(20_000_000), true),
            DriverVariant::S6d02a1 => caps(128, 160, 27_000_000, Some(20_000_000), true),
            DriverVariant::St7789 => caps(240, 320, 80_000_000, Some(20_000_000), false),
            DriverVariant::St7796 => caps(320, 480, 80_000_000, Some(20_000_000), false),
            DriverVariant::Ili9341 => caps(240, 320, 80_000_000, Some(20_000_000), false),
            DriverVariant::Ili9481 => caps(320, 480, 40_000_000, Some(20_000_000), false),
            DriverVariant::Ili9486 => caps(320, 480, 40_000_000, None, false),
            DriverVariant::Ili9488 => caps(320, 480, 40_000_000, Some(20_000_000), false),
            DriverVariant::Hx8357d => caps(320, 480, 27_000_000, Some(20_000_000), false),
            DriverVariant::Gc9a01 => caps(240, 240, 80_000_000, None, true),
            DriverVariant::Ssd1351 => caps(128, 128, 20_000_000, None, true),
        }
    }

    /// Whether a signal must be wired for this controller
    pub fn requires(self, signal: Signal) -> bool {
        BASE_SIGNALS.contains(&signal)
            || (signal == Signal::Rst && self.capabilities().requires_reset)
    }

    /// Signals that must be wired for this controller
    pub fn required_signals(self) -> impl Iterator<Item = Signal> {
        Signal::ALL.into_iter().filter(move |&s| self.requires(s))
    }
}

const fn caps(
    max_width: u16,
    max_height: u16,
    max_write_hz: u32,
    max_read_hz: Option<u32>,
    requires_reset: bool,
) -> DriverCaps {
    DriverCaps {
        max_width,
        max_height,
        max_write_hz,
        max_read_hz,
        requires_reset,
    }
}

impl fmt::Display for DriverVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.define())
    }
}
