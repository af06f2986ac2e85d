//! Scalar value parsing shared by the text formats

use core::str::FromStr;

use heapless::String;
use tft_setup_core::PinConfig;

/// Parse a string value (removes quotes)
pub(crate) fn parse_string(value: &str) -> &str {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        &value[1..value.len() - 1]
    } else {
        // Allow unquoted strings for simple values
        value
    }
}

/// Parse an integer value, allowing `_` digit separators
pub(crate) fn parse_int<T: FromStr>(value: &str) -> Option<T> {
    if !value.contains('_') {
        return value.parse().ok();
    }

    let mut digits: String<24> = String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).ok()?;
    }
    digits.parse().ok()
}

/// Parse a boolean value
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Parse a pin like "gpio23", "!gpio4", 23, -1 or "none"
///
/// The outer `Option` is the parse result, the inner one is `None` for an
/// unwired signal.
pub(crate) fn parse_pin(value: &str) -> Option<Option<PinConfig>> {
    let mut s = parse_string(value.trim());

    if s.eq_ignore_ascii_case("none") || s.eq_ignore_ascii_case("unused") {
        return Some(None);
    }

    if let Some(n) = parse_int::<i32>(s) {
        return match n {
            -1 => Some(None),
            0..=255 => Some(Some(PinConfig::new(n as u8))),
            _ => None,
        };
    }

    let mut inverted = false;
    while let Some(rest) = s.strip_prefix('!') {
        inverted = true;
        s = rest;
    }

    let pin: u8 = s.strip_prefix("gpio")?.parse().ok()?;
    Some(Some(PinConfig { pin, inverted }))
}
