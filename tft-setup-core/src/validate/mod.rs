//! Descriptor validation
//!
//! Checks a [`DisplayConfig`](crate::DisplayConfig) against the controller
//! and microcontroller capability tables, and against the other devices on
//! its SPI bus.
//!
//! Findings fall into three groups:
//!
//! - [`ConfigError`]: fatal, the setup must not be built or started
//! - [`HardwareLimitWarning`]: a clock at or near the controller ceiling
//! - [`BusRisk`]: a latent conflict that only shows up under bus contention

pub mod checker;

pub use checker::*;

use core::fmt;

use crate::config::{ClockKind, FontId, Signal};

/// Who a physical pin is assigned to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinOwner {
    /// A display signal
    Display(Signal),
    /// Chip select of the peripheral at this index on the shared bus
    Peripheral(usize),
}

impl fmt::Display for PinOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinOwner::Display(signal) => write!(f, "{}", signal),
            PinOwner::Peripheral(index) => write!(f, "peripheral #{} chip select", index),
        }
    }
}

/// Fatal configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Driver name or define not in the supported set
    UnknownDriver,
    /// No driver selected
    MissingDriver,
    /// More than one driver selected
    MultipleDrivers,
    /// The controller needs a signal that is not wired
    MissingPin(Signal),
    /// Two owners share one physical pin
    PinConflict {
        pin: u8,
        first: PinOwner,
        second: PinOwner,
    },
    /// GPIO does not exist on the target
    PinUnavailable { owner: PinOwner, pin: u8 },
    /// GPIO is wired to the module's SPI flash
    PinReserved { owner: PinOwner, pin: u8 },
    /// An output signal was put on an input-only GPIO
    PinInputOnly { owner: PinOwner, pin: u8 },
    /// Only the backlight may be active-low
    InvertedSignal(Signal),
    /// Width or height is zero
    ZeroDimension,
    /// Panel is larger than the controller's frame memory
    PanelTooLarge { width: u16, height: u16 },
    /// A clock frequency is zero
    ZeroClock(ClockKind),
    /// Font selected but its glyph table was not compiled in
    FontNotCompiled(FontId),
    /// Smooth fonts selected but the smooth font path was not compiled in
    SmoothFontNotCompiled,
    /// Other peripherals share the bus but the display has no chip select
    SharedBusWithoutChipSelect,
    /// More peripherals than the bus description can hold
    TooManyPeripherals,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownDriver => f.write_str("unknown display driver"),
            ConfigError::MissingDriver => f.write_str("no display driver selected"),
            ConfigError::MultipleDrivers => f.write_str("more than one display driver selected"),
            ConfigError::MissingPin(signal) => {
                write!(f, "{} is required by the selected driver", signal)
            }
            ConfigError::PinConflict { pin, first, second } => {
                write!(f, "gpio{} is used by both {} and {}", pin, first, second)
            }
            ConfigError::PinUnavailable { owner, pin } => {
                write!(f, "{}: gpio{} does not exist on this target", owner, pin)
            }
            ConfigError::PinReserved { owner, pin } => {
                write!(f, "{}: gpio{} is reserved for SPI flash", owner, pin)
            }
            ConfigError::PinInputOnly { owner, pin } => {
                write!(f, "{}: gpio{} is input-only", owner, pin)
            }
            ConfigError::InvertedSignal(signal) => {
                write!(f, "{} cannot be inverted, only TFT_BL can", signal)
            }
            ConfigError::ZeroDimension => f.write_str("panel width and height must be > 0"),
            ConfigError::PanelTooLarge { width, height } => write!(
                f,
                "{}x{} panel exceeds the controller frame memory",
                width, height
            ),
            ConfigError::ZeroClock(kind) => write!(f, "{} must be > 0", kind),
            ConfigError::FontNotCompiled(font) => {
                write!(f, "{} selected but its glyph table is not compiled in", font)
            }
            ConfigError::SmoothFontNotCompiled => {
                f.write_str("SMOOTH_FONT selected but the smooth-font feature is off")
            }
            ConfigError::SharedBusWithoutChipSelect => {
                f.write_str("TFT_CS must be wired when the SPI bus is shared")
            }
            ConfigError::TooManyPeripherals => f.write_str("too many peripherals on the bus"),
        }
    }
}

/// How close a clock is to its ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LimitLevel {
    /// Within 10% of the ceiling
    Near,
    /// Exactly at the ceiling
    At,
    /// Above the ceiling, expect a garbled or blank display
    Above,
}

/// Non-fatal clock warning
///
/// The requested clock is kept as is; consumers log the warning and the
/// setup author decides whether to lower it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HardwareLimitWarning {
    pub clock: ClockKind,
    pub requested_hz: u32,
    pub ceiling_hz: u32,
    pub level: LimitLevel,
}

impl fmt::Display for HardwareLimitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let relation = match self.level {
            LimitLevel::Near => "is close to",
            LimitLevel::At => "is at",
            LimitLevel::Above => "exceeds",
        };
        write!(
            f,
            "{} of {} Hz {} the {} Hz ceiling",
            self.clock, self.requested_hz, relation, self.ceiling_hz
        )
    }
}

/// Latent bus problems
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusRisk {
    /// Transactions are disabled while the peripheral at this index also
    /// uses the bus
    LatentConflict { peripheral: usize },
}

impl fmt::Display for BusRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusRisk::LatentConflict { peripheral } => write!(
                f,
                "SUPPORT_TRANSACTIONS is off but peripheral #{} shares the SPI bus",
                peripheral
            ),
        }
    }
}
