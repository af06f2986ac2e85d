//! Display descriptor type definitions
//!
//! These types describe one physical display setup: which controller is on
//! the bus, how it is wired, how large the panel is, which fonts are linked
//! and how fast the SPI bus is clocked. A descriptor is authored once per
//! hardware configuration and never mutated at runtime.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::driver::DriverVariant;
use super::fonts::FontSet;
use super::target::Target;

/// Current descriptor format version
pub const CONFIG_VERSION: u8 = 1;

/// Logical signal lines between the microcontroller and the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Signal {
    /// SPI data in (display to MCU), only needed for reads
    Miso,
    /// SPI data out (MCU to display)
    Mosi,
    /// SPI clock
    Sclk,
    /// Display chip select
    Cs,
    /// Data/command select
    Dc,
    /// Hardware reset
    Rst,
    /// Backlight enable
    Bl,
    /// Touch controller chip select
    TouchCs,
}

impl Signal {
    /// All signals in wiring order
    pub const ALL: [Signal; 8] = [
        Signal::Miso,
        Signal::Mosi,
        Signal::Sclk,
        Signal::Cs,
        Signal::Dc,
        Signal::Rst,
        Signal::Bl,
        Signal::TouchCs,
    ];

    /// Key used in TOML setup files
    pub const fn key(self) -> &'static str {
        match self {
            Signal::Miso => "miso",
            Signal::Mosi => "mosi",
            Signal::Sclk => "sclk",
            Signal::Cs => "cs",
            Signal::Dc => "dc",
            Signal::Rst => "rst",
            Signal::Bl => "bl",
            Signal::TouchCs => "touch_cs",
        }
    }

    /// Preprocessor define used in setup headers
    pub const fn define(self) -> &'static str {
        match self {
            Signal::Miso => "TFT_MISO",
            Signal::Mosi => "TFT_MOSI",
            Signal::Sclk => "TFT_SCLK",
            Signal::Cs => "TFT_CS",
            Signal::Dc => "TFT_DC",
            Signal::Rst => "TFT_RST",
            Signal::Bl => "TFT_BL",
            Signal::TouchCs => "TOUCH_CS",
        }
    }

    /// Look up a signal by its TOML key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.key() == key)
    }

    /// Look up a signal by its header define
    pub fn from_define(define: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.define() == define)
    }

    /// Whether the MCU drives this line (as opposed to reading it)
    pub const fn is_output(self) -> bool {
        !matches!(self, Signal::Miso)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.define())
    }
}

/// Pin assignment with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Signal is active-low
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

impl fmt::Display for PinConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inverted {
            f.write_str("!")?;
        }
        write!(f, "gpio{}", self.pin)
    }
}

/// Mapping from signal to physical pin
///
/// `None` marks a signal that is not wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinMap {
    pub miso: Option<PinConfig>,
    pub mosi: Option<PinConfig>,
    pub sclk: Option<PinConfig>,
    pub cs: Option<PinConfig>,
    pub dc: Option<PinConfig>,
    pub rst: Option<PinConfig>,
    pub bl: Option<PinConfig>,
    pub touch_cs: Option<PinConfig>,
}

impl PinMap {
    /// A map with no signal wired
    pub const fn unwired() -> Self {
        Self {
            miso: None,
            mosi: None,
            sclk: None,
            cs: None,
            dc: None,
            rst: None,
            bl: None,
            touch_cs: None,
        }
    }

    /// Get the pin assigned to a signal
    pub const fn get(&self, signal: Signal) -> Option<PinConfig> {
        match signal {
            Signal::Miso => self.miso,
            Signal::Mosi => self.mosi,
            Signal::Sclk => self.sclk,
            Signal::Cs => self.cs,
            Signal::Dc => self.dc,
            Signal::Rst => self.rst,
            Signal::Bl => self.bl,
            Signal::TouchCs => self.touch_cs,
        }
    }

    /// Assign (or clear) the pin for a signal
    pub fn set(&mut self, signal: Signal, pin: Option<PinConfig>) {
        let slot = match signal {
            Signal::Miso => &mut self.miso,
            Signal::Mosi => &mut self.mosi,
            Signal::Sclk => &mut self.sclk,
            Signal::Cs => &mut self.cs,
            Signal::Dc => &mut self.dc,
            Signal::Rst => &mut self.rst,
            Signal::Bl => &mut self.bl,
            Signal::TouchCs => &mut self.touch_cs,
        };
        *slot = pin;
    }

    /// Iterate over wired signals
    pub fn iter(&self) -> impl Iterator<Item = (Signal, PinConfig)> + '_ {
        Signal::ALL
            .iter()
            .filter_map(move |&signal| self.get(signal).map(|pin| (signal, pin)))
    }

    /// Find the signal using a physical pin
    pub fn signal_for_pin(&self, pin: u8) -> Option<Signal> {
        self.iter().find(|(_, p)| p.pin == pin).map(|(s, _)| s)
    }
}

/// Logical panel resolution in pixels (portrait orientation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Panel {
    pub width: u16,
    pub height: u16,
}

impl Panel {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Number of pixels on the panel
    pub const fn pixel_count(&self) -> u32 {
        self.width as u32 * self.height as u32
    }
}

/// Which SPI clock a frequency applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ClockKind {
    /// Pixel and command writes
    Write,
    /// Register and frame memory reads
    Read,
    /// Touch controller queries
    Touch,
}

impl fmt::Display for ClockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClockKind::Write => "SPI_FREQUENCY",
            ClockKind::Read => "SPI_READ_FREQUENCY",
            ClockKind::Touch => "SPI_TOUCH_FREQUENCY",
        })
    }
}

/// SPI clock frequencies in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpiClock {
    pub write_hz: u32,
    pub read_hz: u32,
    pub touch_hz: u32,
}

impl SpiClock {
    /// Conservative clocks that every supported controller handles
    ///
    /// Setups are expected to raise these once the wiring is proven.
    pub const CONSERVATIVE: Self = Self {
        write_hz: 10_000_000,
        read_hz: 5_000_000,
        touch_hz: 1_000_000,
    };

    pub const fn new(write_hz: u32, read_hz: u32, touch_hz: u32) -> Self {
        Self {
            write_hz,
            read_hz,
            touch_hz,
        }
    }

    /// Get the frequency for a clock
    pub const fn get(&self, kind: ClockKind) -> u32 {
        match kind {
            ClockKind::Write => self.write_hz,
            ClockKind::Read => self.read_hz,
            ClockKind::Touch => self.touch_hz,
        }
    }
}

impl Default for SpiClock {
    fn default() -> Self {
        Self::CONSERVATIVE
    }
}

/// Complete display configuration descriptor
///
/// This is the value handed to the display library at initialization.
/// Construct it with [`DisplayConfig::new`] and the `with_*` methods, or
/// parse it from a setup file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Descriptor version for compatibility checks
    pub version: u8,
    /// Display controller
    pub driver: DriverVariant,
    /// Microcontroller whose pin space the pins live in
    pub target: Target,
    /// Signal wiring
    pub pins: PinMap,
    /// Panel resolution
    pub panel: Panel,
    /// Glyph tables to link
    pub fonts: FontSet,
    /// Enable the anti-aliased font path
    pub smooth_font: bool,
    /// SPI clocks
    pub spi: SpiClock,
    /// Wrap SPI access in bus transactions
    ///
    /// Required when other peripherals share the display's SPI bus.
    pub transactions: bool,
}

impl DisplayConfig {
    /// Create a descriptor with nothing wired and conservative clocks
    pub const fn new(driver: DriverVariant, panel: Panel) -> Self {
        Self {
            version: CONFIG_VERSION,
            driver,
            target: Target::Esp32,
            pins: PinMap::unwired(),
            panel,
            fonts: FontSet::EMPTY,
            smooth_font: false,
            spi: SpiClock::CONSERVATIVE,
            transactions: false,
        }
    }

    pub const fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub const fn with_pins(mut self, pins: PinMap) -> Self {
        self.pins = pins;
        self
    }

    pub const fn with_fonts(mut self, fonts: FontSet) -> Self {
        self.fonts = fonts;
        self
    }

    pub const fn with_smooth_font(mut self, enabled: bool) -> Self {
        self.smooth_font = enabled;
        self
    }

    pub const fn with_spi(mut self, spi: SpiClock) -> Self {
        self.spi = spi;
        self
    }

    pub const fn with_transactions(mut self, enabled: bool) -> Self {
        self.transactions = enabled;
        self
    }

    /// Iterate over wired signals
    pub fn pins(&self) -> impl Iterator<Item = (Signal, PinConfig)> + '_ {
        self.pins.iter()
    }

    /// Whether a touch controller shares the display bus
    pub const fn has_touch(&self) -> bool {
        self.pins.touch_cs.is_some()
    }

    /// Whether frame memory can be read back (MISO wired)
    pub const fn can_read(&self) -> bool {
        self.pins.miso.is_some()
    }

    /// Estimated FLASH bytes taken by the selected glyph tables
    pub fn flash_footprint(&self) -> u32 {
        self.fonts.flash_footprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_config() {
        let pin = PinConfig::new(10);
        assert_eq!(pin.pin, 10);
        assert!(!pin.inverted);

        let inverted = PinConfig::inverted(12);
        assert!(inverted.inverted);
    }

    #[test]
    fn test_signal_lookup() {
        for signal in Signal::ALL {
            assert_eq!(Signal::from_key(signal.key()), Some(signal));
            assert_eq!(Signal::from_define(signal.define()), Some(signal));
        }
        assert_eq!(Signal::from_key("busy"), None);
        assert!(!Signal::Miso.is_output());
        assert!(Signal::Bl.is_output());
    }

    #[test]
    fn test_pin_map_set_get() {
        let mut pins = PinMap::unwired();
        assert_eq!(pins.iter().count(), 0);

        pins.set(Signal::Dc, Some(PinConfig::new(5)));
        pins.set(Signal::Bl, Some(PinConfig::inverted(4)));
        assert_eq!(pins.get(Signal::Dc), Some(PinConfig::new(5)));
        assert_eq!(pins.signal_for_pin(4), Some(Signal::Bl));
        assert_eq!(pins.signal_for_pin(6), None);
        assert_eq!(pins.iter().count(), 2);

        pins.set(Signal::Dc, None);
        assert_eq!(pins.get(Signal::Dc), None);
    }

    #[test]
    fn test_empty_config() {
        let config = DisplayConfig::new(DriverVariant::Ili9341, Panel::new(240, 320));
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.pins().count(), 0);
        assert_eq!(config.spi, SpiClock::CONSERVATIVE);
        assert!(!config.has_touch());
        assert!(!config.can_read());
        assert!(!config.transactions);
        assert_eq!(config.flash_footprint(), 0);
        assert_eq!(config.panel.pixel_count(), 76_800);
    }
}
