//! Board-agnostic TFT display configuration descriptor
//!
//! This crate contains everything about a display setup that does not depend
//! on a file format or a build environment:
//!
//! - Descriptor types (driver, pin map, panel, fonts, SPI clocks)
//! - Controller and microcontroller capability tables
//! - Validation producing configuration errors and hardware-limit warnings
//! - Shared SPI bus checking
//! - Preset setups for known boards

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod setups;
pub mod validate;

pub use config::*;
pub use validate::{
    check, BusRisk, ConfigError, Diagnostics, HardwareLimitWarning, LimitLevel, PinOwner,
};
