//! Setup file formats for TFT display descriptors
//!
//! A display setup can be written down in three ways:
//!
//! - a TOML setup file (`[display]`, `[pins]`, `[fonts]`, `[spi]` and
//!   `[peripheral.<name>]` sections), see [`toml`]
//! - a C setup header of `#define` lines as read by the display library,
//!   see [`header`]
//! - a postcard binary blob for storing a descriptor in flash, see [`binary`]
//!
//! Every writer produces text (or bytes) that its parser turns back into an
//! identical descriptor.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod binary;
pub mod header;
pub mod loader;
pub mod toml;
mod values;

use core::fmt as core_fmt;

use tft_setup_core::{ConfigError, DisplayConfig, SharedBus};

pub use binary::{decode, encode, BinaryError, MAX_BINARY_SIZE};
pub use header::{parse_header, write_header};
pub use loader::{load, Format, LoadError};
pub use toml::{parse_setup, write_setup};

/// A display descriptor together with the bus it sits on
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Setup {
    pub display: DisplayConfig,
    pub bus: SharedBus,
}

impl Setup {
    /// A setup whose display owns the SPI bus
    pub fn exclusive(display: DisplayConfig) -> Self {
        Self {
            display,
            bus: SharedBus::exclusive(),
        }
    }
}

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Line is neither a section, a key/value pair, a directive nor a comment
    Syntax { line: usize },
    /// Invalid section header
    InvalidSection { line: usize },
    /// Invalid value type or range
    InvalidValue { line: usize },
    /// Invalid pin string or number
    InvalidPin { line: usize },
    /// Section at this line lacks a required key
    MissingKey { line: usize },
    /// Setup is structurally wrong
    Config(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Config(e)
    }
}

impl core_fmt::Display for ParseError {
    fn fmt(&self, f: &mut core_fmt::Formatter<'_>) -> core_fmt::Result {
        match self {
            ParseError::Syntax { line } => write!(f, "line {}: syntax error", line),
            ParseError::InvalidSection { line } => write!(f, "line {}: invalid section", line),
            ParseError::InvalidValue { line } => write!(f, "line {}: invalid value", line),
            ParseError::InvalidPin { line } => write!(f, "line {}: invalid pin", line),
            ParseError::MissingKey { line } => {
                write!(f, "line {}: section is missing a required key", line)
            }
            ParseError::Config(e) => write!(f, "{}", e),
        }
    }
}
