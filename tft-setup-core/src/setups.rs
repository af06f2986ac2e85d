//! Preset setups for known boards
//!
//! Each preset is a `const` descriptor that can be used as is or as a
//! starting point for a custom setup.

use crate::config::{
    DisplayConfig, DriverVariant, FontId, FontSet, Panel, PinConfig, PinMap, SpiClock, Target,
};

/// Fonts linked by the stock setups
pub const STOCK_FONTS: FontSet = FontSet::EMPTY
    .with(FontId::Glcd)
    .with(FontId::Font2)
    .with(FontId::Font4)
    .with(FontId::Font6)
    .with(FontId::Font7)
    .with(FontId::Font8)
    .with(FontId::Gfxff);

/// ESP32 with a 1.77" 128x160 ST7735 panel
///
/// ```text
/// GPIO | Signal
/// -----+--------------------
///  23  | MOSI (SDA)
///  18  | SCLK (SCK)
///  17  | CS
///   5  | DC
///  16  | RST
///   4  | BL (LED back-light)
/// ```
///
/// MISO is not wired, so the panel cannot be read back.
pub const SETUP_11_ESP: DisplayConfig =
    DisplayConfig::new(DriverVariant::St7735, Panel::new(128, 160))
        .with_target(Target::Esp32)
        .with_pins(PinMap {
            miso: None,
            mosi: Some(PinConfig::new(23)),
            sclk: Some(PinConfig::new(18)),
            cs: Some(PinConfig::new(17)),
            dc: Some(PinConfig::new(5)),
            rst: Some(PinConfig::new(16)),
            bl: Some(PinConfig::new(4)),
            touch_cs: None,
        })
        .with_fonts(STOCK_FONTS)
        .with_smooth_font(true)
        .with_spi(SpiClock::new(27_000_000, 20_000_000, 2_500_000))
        .with_transactions(false);

/// ESP32 with a 240x320 ILI9341 panel and XPT2046 touch on the same bus
pub const ILI9341_TOUCH_ESP: DisplayConfig =
    DisplayConfig::new(DriverVariant::Ili9341, Panel::new(240, 320))
        .with_target(Target::Esp32)
        .with_pins(PinMap {
            miso: Some(PinConfig::new(19)),
            mosi: Some(PinConfig::new(23)),
            sclk: Some(PinConfig::new(18)),
            cs: Some(PinConfig::new(15)),
            dc: Some(PinConfig::new(2)),
            rst: Some(PinConfig::new(4)),
            bl: None,
            touch_cs: Some(PinConfig::new(21)),
        })
        .with_fonts(STOCK_FONTS)
        .with_smooth_font(true)
        .with_spi(SpiClock::new(40_000_000, 16_000_000, 2_000_000))
        .with_transactions(true);

/// Look up a preset by name
pub fn by_name(name: &str) -> Option<DisplayConfig> {
    match name {
        "setup_11_esp" => Some(SETUP_11_ESP),
        "ili9341_touch_esp" => Some(ILI9341_TOUCH_ESP),
        _ => None,
    }
}

/// The Setup 11 ESP preset
pub fn setup_11_esp() -> DisplayConfig {
    SETUP_11_ESP
}
