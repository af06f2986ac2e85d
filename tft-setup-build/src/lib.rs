//! Build script helper for firmware that drives a TFT display
//!
//! - Validates the display setup file at compile time
//! - Reports clock and bus findings as cargo warnings
//! - Generates Rust constants and a matching C setup header into `OUT_DIR`
//!
//! ```no_run
//! // build.rs
//! use std::{env, path::PathBuf};
//!
//! let setup = tft_setup_build::validate_setup("display.toml");
//! let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
//! tft_setup_build::write_constants(&setup.display, &out_dir).unwrap();
//! ```
//!
//! Any error aborts the build with a boxed message listing every problem.

mod generate;
mod report;

use std::fs;
use std::path::Path;

use tft_setup_config::{parse_header, parse_setup, ParseError, Setup};
use tft_setup_core::{check, ConfigError, Diagnostics, Target};

pub use generate::{render_constants, write_constants, CONSTANTS_FILE, HEADER_FILE};
pub use report::{format_error_lines, render_error, warning_lines};

/// Why a setup file was rejected
#[derive(Debug, Clone, PartialEq)]
pub enum SetupError {
    /// File could not be read
    Read(String),
    /// Not valid TOML
    Syntax(String),
    /// A required section or key is missing
    MissingSections(Vec<&'static str>),
    /// Parsed as TOML but the values are wrong
    Parse(ParseError),
    /// The setup does not pass validation
    Invalid(Vec<ConfigError>),
}

/// A setup that passed validation, with its non-fatal findings
#[derive(Debug, Clone)]
pub struct Checked {
    pub setup: Setup,
    pub diagnostics: Diagnostics,
}

/// Check a TOML setup
pub fn check_setup_str(content: &str) -> Result<Checked, SetupError> {
    // Full TOML syntax check first, the setup parser only knows a subset
    let value: toml::Value =
        toml::from_str(content).map_err(|e| SetupError::Syntax(e.to_string()))?;
    check_required_sections(&value)?;

    let setup = parse_setup(content).map_err(SetupError::Parse)?;
    finish(setup)
}

/// Check a C setup header for `target`
pub fn check_header_str(content: &str, target: Target) -> Result<Checked, SetupError> {
    let display = parse_header(content, target).map_err(SetupError::Parse)?;
    finish(Setup::exclusive(display))
}

fn finish(setup: Setup) -> Result<Checked, SetupError> {
    let diagnostics = check(&setup.display, &setup.bus);
    if !diagnostics.is_ok() {
        return Err(SetupError::Invalid(diagnostics.errors.to_vec()));
    }
    Ok(Checked { setup, diagnostics })
}

/// Check that the sections the display cannot work without exist
fn check_required_sections(config: &toml::Value) -> Result<(), SetupError> {
    let mut missing = Vec::new();

    match config.get("display") {
        Some(toml::Value::Table(display)) => {
            if !matches!(display.get("driver"), Some(toml::Value::String(_))) {
                missing.push("[display] driver - the display controller, e.g. \"st7735\"");
            }
        }
        _ => missing.push("[display] section - driver and panel size are required"),
    }

    if !matches!(config.get("pins"), Some(toml::Value::Table(_))) {
        missing.push("[pins] section - the display needs at least MOSI, SCLK and DC");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SetupError::MissingSections(missing))
    }
}

/// Validate a TOML setup file from a build script
///
/// Panics with a readable report when the setup is unusable, which aborts
/// the build. Warnings and bus risks are printed as cargo warnings.
pub fn validate_setup(path: impl AsRef<Path>) -> Setup {
    let path = path.as_ref();
    validate_with(path, check_setup_str)
}

/// Validate a C setup header for `target` from a build script
pub fn validate_header(path: impl AsRef<Path>, target: Target) -> Setup {
    let path = path.as_ref();
    validate_with(path, |content| check_header_str(content, target))
}

fn validate_with(path: &Path, run: impl FnOnce(&str) -> Result<Checked, SetupError>) -> Setup {
    // Re-run if the setup changes
    println!("cargo:rerun-if-changed={}", path.display());

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let result = fs::read_to_string(path)
        .map_err(|e| SetupError::Read(e.to_string()))
        .and_then(|content| run(&content));

    match result {
        Ok(checked) => {
            for line in warning_lines(&checked.diagnostics) {
                println!("cargo:warning={}: {}", name, line);
            }
            println!("cargo:warning={} validated successfully", name);
            checked.setup
        }
        Err(e) => panic!("{}", render_error(&name, &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tft_setup_core::setups::SETUP_11_ESP;
    use tft_setup_core::{BusRisk, PinOwner, Signal};

    const SETUP_11_ESP_TOML: &str = include_str!("../../setups/setup_11_esp.toml");
    const SETUP_11_ESP_H: &str = include_str!("../../setups/Setup_11_ESP.h");

    #[test]
    fn test_stock_setups_pass() {
        let checked = check_setup_str(SETUP_11_ESP_TOML).unwrap();
        assert_eq!(checked.setup, Setup::exclusive(SETUP_11_ESP));
        assert!(checked.diagnostics.is_clean());

        let checked = check_header_str(SETUP_11_ESP_H, Target::Esp32).unwrap();
        assert_eq!(checked.setup.display, SETUP_11_ESP);
    }

    #[test]
    fn test_syntax_error() {
        let err = check_setup_str("[display\ndriver = \"st7735\"\n").unwrap_err();
        assert!(matches!(err, SetupError::Syntax(_)));
    }

    #[test]
    fn test_missing_sections() {
        let err = check_setup_str("[spi]\nfrequency = 1\n").unwrap_err();
        match err {
            SetupError::MissingSections(missing) => assert_eq!(missing.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = check_setup_str("[display]\nwidth = 128\n[pins]\n").unwrap_err();
        match err {
            SetupError::MissingSections(missing) => {
                assert_eq!(missing.len(), 1);
                assert!(missing[0].starts_with("[display] driver"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_passes_through() {
        let input = "[display]\ndriver = \"st7735\"\nwidth = \"wide\"\n[pins]\n";
        assert_eq!(
            check_setup_str(input).unwrap_err(),
            SetupError::Parse(ParseError::InvalidValue { line: 3 })
        );
    }

    #[test]
    fn test_peripheral_without_cs_pin() {
        let mut input = String::from(SETUP_11_ESP_TOML);
        let line = input.lines().count() + 2;
        input.push_str("\n[peripheral.sdcard]\nactive = true\n");
        assert_eq!(
            check_setup_str(&input).unwrap_err(),
            SetupError::Parse(ParseError::MissingKey { line })
        );
    }

    #[test]
    fn test_every_error_is_collected() {
        let input = r#"
[display]
driver = "st7735"
width = 0
height = 160

[pins]
mosi = "gpio23"
sclk = "gpio23"
dc = "gpio5"
"#;
        match check_setup_str(input).unwrap_err() {
            SetupError::Invalid(errors) => {
                assert!(errors.contains(&ConfigError::MissingPin(Signal::Rst)));
                assert!(errors.contains(&ConfigError::ZeroDimension));
                assert!(errors.contains(&ConfigError::PinConflict {
                    pin: 23,
                    first: PinOwner::Display(Signal::Mosi),
                    second: PinOwner::Display(Signal::Sclk),
                }));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_shared_bus_is_a_finding_not_an_error() {
        let mut input = String::from(SETUP_11_ESP_TOML);
        input.push_str("\n[peripheral.sdcard]\ncs_pin = \"gpio13\"\n");

        let checked = check_setup_str(&input).unwrap();
        assert_eq!(
            checked.diagnostics.risks.as_slice(),
            &[BusRisk::LatentConflict { peripheral: 0 }]
        );
    }
}
