//! Microcontroller pin spaces

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Microcontroller families a setup can target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Target {
    #[default]
    Esp32,
    Esp32S3,
    Esp8266,
    Rp2040,
}

/// What a GPIO number can be used for on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinClass {
    /// No such GPIO on this chip
    Unavailable,
    /// Wired to the on-module SPI flash
    Reserved,
    /// Can only be read
    InputOnly,
    /// General purpose input/output
    Bidirectional,
}

impl Target {
    pub const ALL: [Target; 4] = [
        Target::Esp32,
        Target::Esp32S3,
        Target::Esp8266,
        Target::Rp2040,
    ];

    /// Key used in TOML setup files
    pub const fn name(self) -> &'static str {
        match self {
            Target::Esp32 => "esp32",
            Target::Esp32S3 => "esp32s3",
            Target::Esp8266 => "esp8266",
            Target::Rp2040 => "rp2040",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Highest GPIO number on the chip
    pub const fn max_gpio(self) -> u8 {
        match self {
            Target::Esp32 => 39,
            Target::Esp32S3 => 48,
            Target::Esp8266 => 16,
            Target::Rp2040 => 29,
        }
    }

    /// Classify a GPIO number
    pub const fn classify(self, pin: u8) -> PinClass {
        if pin > self.max_gpio() {
            return PinClass::Unavailable;
        }
        match self {
            Target::Esp32 => match pin {
                20 | 24 | 28..=31 => PinClass::Unavailable,
                6..=11 => PinClass::Reserved,
                34..=39 => PinClass::InputOnly,
                _ => PinClass::Bidirectional,
            },
            Target::Esp32S3 => match pin {
                22..=25 => PinClass::Unavailable,
                26..=32 => PinClass::Reserved,
                _ => PinClass::Bidirectional,
            },
            Target::Esp8266 => match pin {
                6..=11 => PinClass::Reserved,
                _ => PinClass::Bidirectional,
            },
            Target::Rp2040 => PinClass::Bidirectional,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esp32_pin_space() {
        let t = Target::Esp32;
        assert_eq!(t.classify(23), PinClass::Bidirectional);
        assert_eq!(t.classify(0), PinClass::Bidirectional);
        assert_eq!(t.classify(6), PinClass::Reserved);
        assert_eq!(t.classify(20), PinClass::Unavailable);
        assert_eq!(t.classify(36), PinClass::InputOnly);
        assert_eq!(t.classify(40), PinClass::Unavailable);
    }

    #[test]
    fn test_other_targets() {
        assert_eq!(Target::Rp2040.classify(29), PinClass::Bidirectional);
        assert_eq!(Target::Rp2040.classify(30), PinClass::Unavailable);
        assert_eq!(Target::Esp32S3.classify(48), PinClass::Bidirectional);
        assert_eq!(Target::Esp32S3.classify(27), PinClass::Reserved);
        assert_eq!(Target::Esp8266.classify(16), PinClass::Bidirectional);
        assert_eq!(Target::Esp8266.classify(17), PinClass::Unavailable);
    }

    #[test]
    fn test_name_lookup() {
        for target in Target::ALL {
            assert_eq!(Target::from_name(target.name()), Some(target));
        }
        assert_eq!(Target::from_name("ESP32"), Some(Target::Esp32));
        assert_eq!(Target::from_name("stm32"), None);
    }
}
