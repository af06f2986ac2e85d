//! Simple TOML parser and writer for display setup files
//!
//! This is a minimal TOML parser that handles only the subset needed for
//! setup files. It does NOT support the full TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - Integer digit separators (`27_000_000`)
//! - [section] headers
//! - [section.name] and [section name] headers, names are bare keys
//!   (letters, digits, `_`, `-`)
//! - Single-line arrays of strings: load = ["glcd", "font2"]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Inline tables
//! - Dotted keys outside section headers
//!
//! ```toml
//! [display]
//! driver = "st7735"
//! target = "esp32"
//! width = 128
//! height = 160
//!
//! [pins]
//! mosi = "gpio23"
//! bl = "!gpio4"      # active-low backlight
//!
//! [fonts]
//! load = ["glcd", "font2"]
//! smooth = true
//!
//! [spi]
//! frequency = 27_000_000
//! transactions = false
//!
//! [peripheral.sdcard]
//! cs_pin = "gpio13"
//! ```

use core::fmt::{self, Write};

use heapless::String as HString;

use tft_setup_core::{
    ConfigError, DisplayConfig, DriverVariant, FontId, FontSet, Panel, Peripheral, Signal,
    Target, MAX_LABEL_LEN,
};

use crate::values::{parse_bool, parse_int, parse_pin, parse_string};
use crate::{ParseError, Setup};

/// Current parsing context
#[derive(Debug, Clone)]
enum Section {
    Root,
    Display,
    Pins,
    Fonts,
    Spi,
    Peripheral(HString<MAX_LABEL_LEN>),
}

/// A `[peripheral.<name>]` section being filled in
#[derive(Debug)]
struct PendingPeripheral {
    name: HString<MAX_LABEL_LEN>,
    /// Line of the section header
    line: usize,
    cs_pin: Option<u8>,
    active: bool,
}

/// Parse a TOML setup file
///
/// Only syntax and value types are checked here; run
/// [`tft_setup_core::check`] on the result for the full validation.
pub fn parse_setup(input: &str) -> Result<Setup, ParseError> {
    // Placeholder driver, replaced by the `driver` key below
    let placeholder = DisplayConfig::new(DriverVariant::St7735, Panel::new(0, 0));
    let mut setup = Setup::exclusive(placeholder);
    let mut driver: Option<DriverVariant> = None;
    let mut section = Section::Root;
    let mut current_peripheral: Option<PendingPeripheral> = None;

    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Check for section header
        if line.starts_with('[') && line.ends_with(']') {
            // Save previous section
            save_section(&mut setup, &mut current_peripheral)?;

            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ParseError::InvalidSection { line: line_no })?;

            if let Section::Peripheral(name) = &section {
                current_peripheral = Some(PendingPeripheral {
                    name: name.clone(),
                    line: line_no,
                    cs_pin: None,
                    active: true,
                });
            }
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::Syntax { line: line_no })?;
        apply_value(
            &section,
            key,
            value,
            line_no,
            &mut setup,
            &mut driver,
            &mut current_peripheral,
        )?;
    }

    // Save final section
    save_section(&mut setup, &mut current_peripheral)?;

    setup.display.driver = driver.ok_or(ConfigError::MissingDriver)?;

    debug!(
        "Parsed TOML setup: {} pins, {} peripherals",
        setup.display.pins().count(),
        setup.bus.peripherals.len()
    );
    Ok(setup)
}

/// Parse section header like "display", "peripheral.sdcard" or "peripheral sdcard"
fn parse_section_header(header: &str) -> Option<Section> {
    let header = header.trim();

    let (section_type, name) = match header.split_once('.') {
        Some((section_type, name)) => (section_type.trim(), Some(name.trim())),
        None => {
            let mut parts = header.split_whitespace();
            (parts.next()?, parts.next())
        }
    };

    match (section_type, name) {
        ("display", None) => Some(Section::Display),
        ("pins", None) => Some(Section::Pins),
        ("fonts", None) => Some(Section::Fonts),
        ("spi", None) => Some(Section::Spi),
        ("peripheral", Some(name)) => {
            let name = parse_string(name);
            if !Peripheral::is_valid_name(name) {
                return None;
            }
            HString::try_from(name).ok().map(Section::Peripheral)
        }
        _ => None,
    }
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = if let Some(hash_pos) = value.find('#') {
        // Make sure # is not inside a string
        let quote_count = value[..hash_pos].matches('"').count();
        if quote_count % 2 == 0 {
            value[..hash_pos].trim()
        } else {
            value
        }
    } else {
        value
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a single-line array of font keys
fn parse_fonts(value: &str) -> Option<FontSet> {
    let inner = value.strip_prefix('[')?.strip_suffix(']')?;

    let mut fonts = FontSet::EMPTY;
    for item in inner.split(',') {
        let item = item.trim();
        // Trailing comma
        if item.is_empty() {
            continue;
        }
        fonts.insert(FontId::from_key(parse_string(item))?);
    }
    Some(fonts)
}

/// Apply a parsed value to the appropriate setup field
fn apply_value(
    section: &Section,
    key: &str,
    value: &str,
    line: usize,
    setup: &mut Setup,
    driver: &mut Option<DriverVariant>,
    current_peripheral: &mut Option<PendingPeripheral>,
) -> Result<(), ParseError> {
    let invalid = ParseError::InvalidValue { line };
    let display = &mut setup.display;

    match section {
        Section::Display => match key {
            "driver" => {
                if driver.is_some() {
                    return Err(ConfigError::MultipleDrivers.into());
                }
                let selected = DriverVariant::from_name(parse_string(value))
                    .ok_or(ConfigError::UnknownDriver)?;
                *driver = Some(selected);
            }
            "target" => {
                display.target = Target::from_name(parse_string(value)).ok_or(invalid)?;
            }
            "width" => display.panel.width = parse_int(value).ok_or(invalid)?,
            "height" => display.panel.height = parse_int(value).ok_or(invalid)?,
            _ => {} // Ignore unknown keys
        },
        Section::Pins => {
            if let Some(signal) = Signal::from_key(key) {
                let pin = parse_pin(value).ok_or(ParseError::InvalidPin { line })?;
                display.pins.set(signal, pin);
            }
        }
        Section::Fonts => match key {
            "load" => display.fonts = parse_fonts(value).ok_or(invalid)?,
            "smooth" => display.smooth_font = parse_bool(value).ok_or(invalid)?,
            _ => {}
        },
        Section::Spi => match key {
            "frequency" => display.spi.write_hz = parse_int(value).ok_or(invalid)?,
            "read_frequency" => display.spi.read_hz = parse_int(value).ok_or(invalid)?,
            "touch_frequency" => display.spi.touch_hz = parse_int(value).ok_or(invalid)?,
            "transactions" => display.transactions = parse_bool(value).ok_or(invalid)?,
            _ => {}
        },
        Section::Peripheral(_) => {
            let p = current_peripheral
                .as_mut()
                .ok_or(ParseError::InvalidSection { line })?;
            match key {
                "cs_pin" => {
                    let pin = parse_pin(value)
                        .flatten()
                        .ok_or(ParseError::InvalidPin { line })?;
                    p.cs_pin = Some(pin.pin);
                }
                "active" => p.active = parse_bool(value).ok_or(invalid)?,
                _ => {}
            }
        }
        Section::Root => {
            // No root-level keys
        }
    }

    Ok(())
}

/// Save the current peripheral section to the setup
fn save_section(
    setup: &mut Setup,
    current_peripheral: &mut Option<PendingPeripheral>,
) -> Result<(), ParseError> {
    if let Some(p) = current_peripheral.take() {
        let cs_pin = p.cs_pin.ok_or(ParseError::MissingKey { line: p.line })?;
        let peripheral = Peripheral {
            name: p.name,
            cs_pin,
            active: p.active,
        };
        setup
            .bus
            .attach(peripheral)
            .map_err(|_| ConfigError::TooManyPeripherals)?;
    }
    Ok(())
}

/// Write a setup as TOML
///
/// Unwired pins are left out. The output parses back into an identical
/// setup. Fails if a peripheral name was set to something
/// [`Peripheral::is_valid_name`] rejects.
pub fn write_setup<W: Write>(setup: &Setup, out: &mut W) -> fmt::Result {
    let display = &setup.display;

    writeln!(
        out,
        "# TFT setup: {} {}x{}",
        display.driver.name(),
        display.panel.width,
        display.panel.height
    )?;
    writeln!(out)?;

    writeln!(out, "[display]")?;
    writeln!(out, "driver = \"{}\"", display.driver.name())?;
    writeln!(out, "target = \"{}\"", display.target.name())?;
    writeln!(out, "width = {}", display.panel.width)?;
    writeln!(out, "height = {}", display.panel.height)?;
    writeln!(out)?;

    writeln!(out, "[pins]")?;
    for (signal, pin) in display.pins() {
        writeln!(out, "{} = \"{}\"", signal.key(), pin)?;
    }
    writeln!(out)?;

    writeln!(out, "[fonts]")?;
    write!(out, "load = [")?;
    for (i, font) in display.fonts.iter().enumerate() {
        if i > 0 {
            write!(out, ", ")?;
        }
        write!(out, "\"{}\"", font.key())?;
    }
    writeln!(out, "]")?;
    writeln!(out, "smooth = {}", display.smooth_font)?;
    writeln!(out)?;

    writeln!(out, "[spi]")?;
    writeln!(out, "frequency = {}", display.spi.write_hz)?;
    writeln!(out, "read_frequency = {}", display.spi.read_hz)?;
    writeln!(out, "touch_frequency = {}", display.spi.touch_hz)?;
    writeln!(out, "transactions = {}", display.transactions)?;

    for p in setup.bus.peripherals.iter() {
        // Names are written as bare keys
        if !Peripheral::is_valid_name(&p.name) {
            return Err(fmt::Error);
        }
        writeln!(out)?;
        writeln!(out, "[peripheral.{}]", p.name)?;
        writeln!(out, "cs_pin = \"gpio{}\"", p.cs_pin)?;
        writeln!(out, "active = {}", p.active)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tft_setup_core::setups::SETUP_11_ESP;
    use tft_setup_core::PinConfig;

    #[test]
    fn test_parse_section_header() {
        assert!(matches!(parse_section_header("display"), Some(Section::Display)));
        assert!(matches!(parse_section_header(" pins "), Some(Section::Pins)));

        match parse_section_header("peripheral.sdcard") {
            Some(Section::Peripheral(name)) => assert_eq!(name.as_str(), "sdcard"),
            _ => panic!("Wrong section type"),
        }

        match parse_section_header("peripheral flash") {
            Some(Section::Peripheral(name)) => assert_eq!(name.as_str(), "flash"),
            _ => panic!("Wrong section type"),
        }

        assert!(parse_section_header("peripheral").is_none());
        assert!(parse_section_header("stepper.spin").is_none());
        assert!(parse_section_header("display.extra").is_none());
    }

    #[test]
    fn test_parse_fonts() {
        let fonts = parse_fonts(r#"["glcd", "font4",]"#).unwrap();
        assert!(fonts.contains(FontId::Glcd));
        assert!(fonts.contains(FontId::Font4));
        assert_eq!(fonts.len(), 2);

        assert_eq!(parse_fonts("[]"), Some(FontSet::EMPTY));
        assert_eq!(parse_fonts(r#"["font3"]"#), None);
        assert_eq!(parse_fonts(r#""glcd""#), None);
    }

    #[test]
    fn test_parse_minimal_setup() {
        let input = r#"
# 1.77" ST7735 panel
[display]
driver = "st7735"
width = 128
height = 160

[pins]
mosi = "gpio23"
sclk = 18          # SCK
cs = "gpio17"
dc = "gpio5"
rst = "gpio16"
bl = "!gpio4"
miso = -1

[spi]
frequency = 27_000_000
"#;

        let setup = parse_setup(input).unwrap();
        let display = &setup.display;
        assert_eq!(display.driver, DriverVariant::St7735);
        assert_eq!(display.target, Target::Esp32);
        assert_eq!(display.panel, Panel::new(128, 160));
        assert_eq!(display.pins.sclk, Some(PinConfig::new(18)));
        assert_eq!(display.pins.bl, Some(PinConfig::inverted(4)));
        assert_eq!(display.pins.miso, None);
        assert_eq!(display.spi.write_hz, 27_000_000);
        assert!(setup.bus.is_exclusive());
    }

    #[test]
    fn test_parse_peripherals() {
        let input = r#"
[display]
driver = "ili9341"

[peripheral.sdcard]
cs_pin = "gpio13"

[peripheral.flash]
cs_pin = 14
active = false
"#;
        let setup = parse_setup(input).unwrap();
        assert_eq!(setup.bus.peripherals.len(), 2);
        assert_eq!(setup.bus.find("sdcard").map(|p| p.cs_pin), Some(13));
        assert_eq!(setup.bus.find("flash").map(|p| p.active), Some(false));
    }

    #[test]
    fn test_peripheral_without_cs_pin() {
        let input = "[display]\ndriver = \"ili9341\"\n\n[peripheral.sdcard]\nactive = true\n";
        assert_eq!(parse_setup(input), Err(ParseError::MissingKey { line: 4 }));

        // Also caught when another section follows
        let input = "[display]\ndriver = \"ili9341\"\n[peripheral.sdcard]\n[spi]\n";
        assert_eq!(parse_setup(input), Err(ParseError::MissingKey { line: 3 }));
    }

    #[test]
    fn test_peripheral_names() {
        let input = "[display]\ndriver = \"ili9341\"\n[peripheral.sd.card]\ncs_pin = 13\n";
        assert_eq!(parse_setup(input), Err(ParseError::InvalidSection { line: 3 }));

        let input = "[display]\ndriver = \"ili9341\"\n[peripheral.\"\"]\ncs_pin = 13\n";
        assert_eq!(parse_setup(input), Err(ParseError::InvalidSection { line: 3 }));

        let input = "[display]\ndriver = \"ili9341\"\n[peripheral \"sd-card\"]\ncs_pin = 13\n";
        let setup = parse_setup(input).unwrap();
        assert_eq!(setup.bus.find("sd-card").map(|p| p.cs_pin), Some(13));
    }

    #[test]
    fn test_write_rejects_unkeyable_name() {
        let mut setup = Setup::exclusive(SETUP_11_ESP);
        let mut p = Peripheral::new("sdcard", 13).unwrap();
        p.name = HString::try_from("sd card ").unwrap();
        setup.bus.attach(p).unwrap();

        let mut out: HString<1024> = HString::new();
        assert_eq!(write_setup(&setup, &mut out), Err(fmt::Error));
    }

    #[test]
    fn test_driver_errors() {
        assert_eq!(
            parse_setup("[display]\nwidth = 10\n"),
            Err(ParseError::Config(ConfigError::MissingDriver))
        );
        assert_eq!(
            parse_setup("[display]\ndriver = \"ra8875\"\n"),
            Err(ParseError::Config(ConfigError::UnknownDriver))
        );
        assert_eq!(
            parse_setup("[display]\ndriver = \"st7735\"\ndriver = \"st7789\"\n"),
            Err(ParseError::Config(ConfigError::MultipleDrivers))
        );
    }

    #[test]
    fn test_line_numbers() {
        let input = "[display]\ndriver = \"st7735\"\nwidth = wide\n";
        assert_eq!(parse_setup(input), Err(ParseError::InvalidValue { line: 3 }));

        let input = "[display]\ndriver = \"st7735\"\n[pins]\ndc = \"pa5\"\n";
        assert_eq!(parse_setup(input), Err(ParseError::InvalidPin { line: 4 }));

        let input = "[display]\ndriver = \"st7735\"\njust some words\n";
        assert_eq!(parse_setup(input), Err(ParseError::Syntax { line: 3 }));

        let input = "[heater.main]\n";
        assert_eq!(parse_setup(input), Err(ParseError::InvalidSection { line: 1 }));
    }

    #[test]
    fn test_write_then_parse() {
        let setup = Setup::exclusive(SETUP_11_ESP);
        let mut out: HString<1024> = HString::new();
        write_setup(&setup, &mut out).unwrap();

        assert!(out.contains("driver = \"st7735\""));
        assert!(out.contains("mosi = \"gpio23\""));
        assert!(!out.contains("miso"));

        assert_eq!(parse_setup(&out), Ok(setup));
    }
}
