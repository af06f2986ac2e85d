//! Shared SPI bus description
//!
//! The display descriptor itself says nothing about what else is on the
//! bus. A [`SharedBus`] lists the other devices so the checker can tell
//! whether disabling SPI transactions is safe.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum other peripherals on the display bus
pub const MAX_PERIPHERALS: usize = 4;

/// Another device on the display's SPI bus
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peripheral {
    /// Peripheral name (e.g., "sdcard", "flash")
    pub name: String<MAX_LABEL_LEN>,
    /// Chip select pin
    pub cs_pin: u8,
    /// Peripheral is driven by firmware (a fitted but idle device never
    /// contends for the bus)
    pub active: bool,
}

impl Peripheral {
    /// Create an active peripheral
    ///
    /// Returns `None` unless [`Peripheral::is_valid_name`] accepts `name`.
    pub fn new(name: &str, cs_pin: u8) -> Option<Self> {
        if !Self::is_valid_name(name) {
            return None;
        }
        Some(Self {
            name: String::try_from(name).ok()?,
            cs_pin,
            active: true,
        })
    }

    /// 1 to [`MAX_LABEL_LEN`] ASCII letters, digits, `_` or `-`
    ///
    /// These are the names that can be written as a bare TOML key.
    pub fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && name.len() <= MAX_LABEL_LEN
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
    }
}

/// Other devices sharing the display's SPI bus
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SharedBus {
    pub peripherals: Vec<Peripheral, MAX_PERIPHERALS>,
}

impl SharedBus {
    /// A bus owned exclusively by the display
    pub fn exclusive() -> Self {
        Self::default()
    }

    /// Add a peripheral, handing it back if the bus is full
    pub fn attach(&mut self, peripheral: Peripheral) -> Result<(), Peripheral> {
        self.peripherals.push(peripheral)
    }

    /// Find a peripheral by name
    pub fn find(&self, name: &str) -> Option<&Peripheral> {
        self.peripherals.iter().find(|p| p.name.as_str() == name)
    }

    /// Peripherals that actively use the bus
    pub fn active(&self) -> impl Iterator<Item = &Peripheral> {
        self.peripherals.iter().filter(|p| p.active)
    }

    /// Whether the display is the only active device
    pub fn is_exclusive(&self) -> bool {
        self.active().next().is_none()
    }
}
