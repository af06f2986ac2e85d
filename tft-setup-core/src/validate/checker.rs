//! Validation checks
//!
//! [`check`] runs every check and collects all findings, so a setup author
//! sees every problem at once. [`DisplayConfig::validate`] is the short form
//! for a display that owns its bus.

use heapless::Vec;

use super::{BusRisk, ConfigError, HardwareLimitWarning, LimitLevel, PinOwner};
use crate::config::{
    ClockKind, DisplayConfig, FontSet, PinClass, SharedBus, Signal, MAX_PERIPHERALS,
};

/// Maximum collected errors, further errors are dropped
pub const MAX_ERRORS: usize = 16;

/// XPT2046-class touch controllers are rated for 2.5 MHz
pub const TOUCH_MAX_HZ: u32 = 2_500_000;

/// Pins that can be claimed on one bus
const MAX_CLAIMS: usize = Signal::ALL.len() + MAX_PERIPHERALS;

/// Everything a check found
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Diagnostics {
    pub errors: Vec<ConfigError, MAX_ERRORS>,
    pub warnings: Vec<HardwareLimitWarning, 3>,
    pub risks: Vec<BusRisk, MAX_PERIPHERALS>,
}

impl Diagnostics {
    /// No fatal errors
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Nothing to report at all
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty() && self.risks.is_empty()
    }

    /// Fail with the first error, or hand back the non-fatal findings
    pub fn into_result(self) -> Result<Self, ConfigError> {
        match self.errors.first() {
            Some(&err) => Err(err),
            None => Ok(self),
        }
    }

    fn error(&mut self, err: ConfigError) {
        // Overflow only loses detail, the first error is always kept
        let _ = self.errors.push(err);
    }
}

impl DisplayConfig {
    /// Validate a display that owns its SPI bus
    pub fn validate(&self) -> Result<Diagnostics, ConfigError> {
        check(self, &SharedBus::exclusive()).into_result()
    }
}

/// Run every check on a descriptor and the bus it sits on
pub fn check(config: &DisplayConfig, bus: &SharedBus) -> Diagnostics {
    let mut diag = Diagnostics::default();

    check_required_pins(config, &mut diag);
    check_pin_space(config, bus, &mut diag);
    check_pin_conflicts(config, bus, &mut diag);
    check_panel(config, &mut diag);
    check_clocks(config, &mut diag);
    check_fonts(config, &mut diag);
    check_bus(config, bus, &mut diag);

    diag
}

/// Compare a requested clock against a ceiling
pub fn assess_clock(
    clock: ClockKind,
    requested_hz: u32,
    ceiling_hz: u32,
) -> Option<HardwareLimitWarning> {
    let level = if requested_hz > ceiling_hz {
        LimitLevel::Above
    } else if requested_hz == ceiling_hz {
        LimitLevel::At
    } else if requested_hz as u64 * 10 >= ceiling_hz as u64 * 9 {
        LimitLevel::Near
    } else {
        return None;
    };

    Some(HardwareLimitWarning {
        clock,
        requested_hz,
        ceiling_hz,
        level,
    })
}

fn check_required_pins(config: &DisplayConfig, diag: &mut Diagnostics) {
    for signal in config.driver.required_signals() {
        if config.pins.get(signal).is_none() {
            diag.error(ConfigError::MissingPin(signal));
        }
    }

    for (signal, pin) in config.pins() {
        if pin.inverted && signal != Signal::Bl {
            diag.error(ConfigError::InvertedSignal(signal));
        }
    }
}

fn check_pin_space(config: &DisplayConfig, bus: &SharedBus, diag: &mut Diagnostics) {
    let display = config
        .pins()
        .map(|(signal, pin)| (PinOwner::Display(signal), pin.pin, signal.is_output()));
    let peripherals = bus
        .peripherals
        .iter()
        .enumerate()
        .map(|(i, p)| (PinOwner::Peripheral(i), p.cs_pin, true));

    for (owner, pin, is_output) in display.chain(peripherals) {
        match config.target.classify(pin) {
            PinClass::Unavailable => diag.error(ConfigError::PinUnavailable { owner, pin }),
            PinClass::Reserved => diag.error(ConfigError::PinReserved { owner, pin }),
            PinClass::InputOnly if is_output => {
                diag.error(ConfigError::PinInputOnly { owner, pin })
            }
            PinClass::InputOnly | PinClass::Bidirectional => {}
        }
    }
}

fn check_pin_conflicts(config: &DisplayConfig, bus: &SharedBus, diag: &mut Diagnostics) {
    let mut claims: Vec<(u8, PinOwner), MAX_CLAIMS> = Vec::new();

    let display = config
        .pins()
        .map(|(signal, pin)| (pin.pin, PinOwner::Display(signal)));
    let peripherals = bus
        .peripherals
        .iter()
        .enumerate()
        .map(|(i, p)| (p.cs_pin, PinOwner::Peripheral(i)));

    for (pin, owner) in display.chain(peripherals) {
        // Report each pin against its first owner only
        if let Some(&(_, first)) = claims.iter().find(|(claimed, _)| *claimed == pin) {
            diag.error(ConfigError::PinConflict {
                pin,
                first,
                second: owner,
            });
        } else {
            // Capacity covers every display signal and a full bus
            let _ = claims.push((pin, owner));
        }
    }
}

fn check_panel(config: &DisplayConfig, diag: &mut Diagnostics) {
    let panel = config.panel;
    if panel.width == 0 || panel.height == 0 {
        diag.error(ConfigError::ZeroDimension);
        return;
    }

    let caps = config.driver.capabilities();
    if panel.width > caps.max_width || panel.height > caps.max_height {
        diag.error(ConfigError::PanelTooLarge {
            width: panel.width,
            height: panel.height,
        });
    }
}

fn check_clocks(config: &DisplayConfig, diag: &mut Diagnostics) {
    let caps = config.driver.capabilities();

    for kind in [ClockKind::Write, ClockKind::Read, ClockKind::Touch] {
        if config.spi.get(kind) == 0 {
            diag.error(ConfigError::ZeroClock(kind));
        }
    }

    let mut limits: Vec<(ClockKind, u32), 3> = Vec::new();
    let _ = limits.push((ClockKind::Write, caps.max_write_hz));
    if let (true, Some(ceiling)) = (config.can_read(), caps.max_read_hz) {
        let _ = limits.push((ClockKind::Read, ceiling));
    }
    if config.has_touch() {
        let _ = limits.push((ClockKind::Touch, TOUCH_MAX_HZ));
    }

    for (kind, ceiling) in limits {
        if let Some(warning) = assess_clock(kind, config.spi.get(kind), ceiling) {
            let _ = diag.warnings.push(warning);
        }
    }
}

fn check_fonts(config: &DisplayConfig, diag: &mut Diagnostics) {
    for font in config.fonts.difference(FontSet::COMPILED).iter() {
        diag.error(ConfigError::FontNotCompiled(font));
    }

    if config.smooth_font && !FontSet::SMOOTH_COMPILED {
        diag.error(ConfigError::SmoothFontNotCompiled);
    }
}

fn check_bus(config: &DisplayConfig, bus: &SharedBus, diag: &mut Diagnostics) {
    if bus.is_exclusive() {
        return;
    }

    if config.pins.cs.is_none() {
        diag.error(ConfigError::SharedBusWithoutChipSelect);
    }

    if !config.transactions {
        for (index, _) in bus.peripherals.iter().enumerate().filter(|(_, p)| p.active) {
            let _ = diag.risks.push(BusRisk::LatentConflict { peripheral: index });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DriverVariant, Panel, Peripheral, PinConfig, PinMap, SpiClock, Target};

    fn ili9341() -> DisplayConfig {
        let mut pins = PinMap::unwired();
        pins.mosi = Some(PinConfig::new(23));
        pins.sclk = Some(PinConfig::new(18));
        pins.cs = Some(PinConfig::new(15));
        pins.dc = Some(PinConfig::new(2));
        DisplayConfig::new(DriverVariant::Ili9341, Panel::new(240, 320)).with_pins(pins)
    }

    #[test]
    fn test_minimal_config_is_clean() {
        let diag = check(&ili9341(), &SharedBus::exclusive());
        assert!(diag.is_clean());
        assert!(ili9341().validate().is_ok());
    }

    #[test]
    fn test_missing_reset_on_st7735() {
        let mut config = ili9341();
        config.driver = DriverVariant::St7735;
        config.panel = Panel::new(128, 160);

        assert_eq!(
            config.validate(),
            Err(ConfigError::MissingPin(Signal::Rst))
        );

        config.pins.rst = Some(PinConfig::new(4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_base_signals() {
        let config = DisplayConfig::new(DriverVariant::St7789, Panel::new(240, 240));
        let diag = check(&config, &SharedBus::exclusive());
        assert_eq!(diag.errors.len(), 3);
        assert!(diag.errors.contains(&ConfigError::MissingPin(Signal::Mosi)));
        assert!(diag.errors.contains(&ConfigError::MissingPin(Signal::Sclk)));
        assert!(diag.errors.contains(&ConfigError::MissingPin(Signal::Dc)));
    }

    #[test]
    fn test_pin_conflict() {
        let mut config = ili9341();
        config.pins.bl = Some(PinConfig::new(2));
        assert_eq!(
            config.validate(),
            Err(ConfigError::PinConflict {
                pin: 2,
                first: PinOwner::Display(Signal::Dc),
                second: PinOwner::Display(Signal::Bl),
            })
        );
    }

    #[test]
    fn test_peripheral_pin_conflict() {
        let mut bus = SharedBus::exclusive();
        bus.attach(Peripheral::new("sdcard", 15).unwrap()).unwrap();
        let diag = check(&ili9341().with_transactions(true), &bus);
        assert_eq!(
            diag.errors.first(),
            Some(&ConfigError::PinConflict {
                pin: 15,
                first: PinOwner::Display(Signal::Cs),
                second: PinOwner::Peripheral(0),
            })
        );
    }

    #[test]
    fn test_fully_wired_full_bus() {
        let mut config = ili9341().with_transactions(true);
        config.pins.miso = Some(PinConfig::new(19));
        config.pins.rst = Some(PinConfig::new(4));
        config.pins.bl = Some(PinConfig::new(32));
        config.pins.touch_cs = Some(PinConfig::new(21));

        let mut bus = SharedBus::exclusive();
        for (name, cs_pin) in [("sdcard", 13), ("flash", 14), ("touch", 25), ("dac", 26)] {
            bus.attach(Peripheral::new(name, cs_pin).unwrap()).unwrap();
        }
        assert_eq!(bus.peripherals.len(), MAX_PERIPHERALS);

        let diag = check(&config, &bus);
        assert!(diag.is_ok(), "{:?}", diag.errors);
        assert!(diag.risks.is_empty());
    }

    #[test]
    fn test_pin_space() {
        let mut config = ili9341();
        config.pins.dc = Some(PinConfig::new(36));
        config.pins.miso = Some(PinConfig::new(39));
        config.pins.bl = Some(PinConfig::new(7));
        config.pins.rst = Some(PinConfig::new(24));

        let diag = check(&config, &SharedBus::exclusive());
        assert_eq!(diag.errors.len(), 3);
        assert!(diag.errors.contains(&ConfigError::PinInputOnly {
            owner: PinOwner::Display(Signal::Dc),
            pin: 36
        }));
        assert!(diag.errors.contains(&ConfigError::PinReserved {
            owner: PinOwner::Display(Signal::Bl),
            pin: 7
        }));
        assert!(diag.errors.contains(&ConfigError::PinUnavailable {
            owner: PinOwner::Display(Signal::Rst),
            pin: 24
        }));

        // Same wiring is fine on an RP2040 apart from the GPIO range
        let config = config.with_target(Target::Rp2040);
        let diag = check(&config, &SharedBus::exclusive());
        assert_eq!(diag.errors.len(), 2);
    }

    #[test]
    fn test_inverted_signal() {
        let mut config = ili9341();
        config.pins.bl = Some(PinConfig::inverted(4));
        assert!(config.validate().is_ok());

        config.pins.dc = Some(PinConfig::inverted(2));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedSignal(Signal::Dc))
        );
    }

    #[test]
    fn test_panel_checks() {
        let mut config = ili9341();
        config.panel = Panel::new(0, 320);
        assert_eq!(config.validate(), Err(ConfigError::ZeroDimension));

        config.panel = Panel::new(320, 480);
        assert_eq!(
            config.validate(),
            Err(ConfigError::PanelTooLarge {
                width: 320,
                height: 480
            })
        );
    }

    #[test]
    fn test_zero_clock() {
        let config = ili9341().with_spi(SpiClock::new(27_000_000, 0, 2_500_000));
        assert_eq!(config.validate(), Err(ConfigError::ZeroClock(ClockKind::Read)));
    }

    #[test]
    fn test_assess_clock() {
        assert_eq!(assess_clock(ClockKind::Write, 20, 100), None);
        assert_eq!(
            assess_clock(ClockKind::Write, 90, 100).map(|w| w.level),
            Some(LimitLevel::Near)
        );
        assert_eq!(
            assess_clock(ClockKind::Write, 100, 100).map(|w| w.level),
            Some(LimitLevel::At)
        );
        assert_eq!(
            assess_clock(ClockKind::Write, 101, 100).map(|w| w.level),
            Some(LimitLevel::Above)
        );
    }

    #[test]
    fn test_clock_warnings_are_not_fatal() {
        let config = ili9341().with_spi(SpiClock::new(100_000_000, 40_000_000, 4_000_000));
        let diag = config.validate().unwrap();
        // Write only: no MISO, no touch controller
        assert_eq!(diag.warnings.len(), 1);
        assert_eq!(diag.warnings[0].level, LimitLevel::Above);
        assert_eq!(diag.warnings[0].requested_hz, 100_000_000);
        // Clock is reported, never clamped
        assert_eq!(config.spi.write_hz, 100_000_000);

        let mut config = config;
        config.pins.miso = Some(PinConfig::new(19));
        config.pins.touch_cs = Some(PinConfig::new(21));
        let diag = config.validate().unwrap();
        assert_eq!(diag.warnings.len(), 3);
        assert!(diag.warnings.iter().any(|w| w.clock == ClockKind::Touch));
    }

    #[test]
    fn test_unreadable_controller_skips_read_clock() {
        let mut config = ili9341().with_spi(SpiClock::new(20_000_000, 90_000_000, 1_000_000));
        config.driver = DriverVariant::Ili9486;
        config.panel = Panel::new(320, 480);
        config.pins.miso = Some(PinConfig::new(19));
        assert!(config.validate().unwrap().warnings.is_empty());
    }

    #[test]
    fn test_latent_bus_conflict() {
        let mut bus = SharedBus::exclusive();
        bus.attach(Peripheral::new("sdcard", 13).unwrap()).unwrap();

        let diag = check(&ili9341(), &bus);
        assert!(diag.is_ok());
        assert_eq!(
            diag.risks.as_slice(),
            &[BusRisk::LatentConflict { peripheral: 0 }]
        );

        let diag = check(&ili9341().with_transactions(true), &bus);
        assert!(diag.is_clean());
    }

    #[test]
    fn test_shared_bus_needs_chip_select() {
        let mut bus = SharedBus::exclusive();
        bus.attach(Peripheral::new("flash", 13).unwrap()).unwrap();

        let mut config = ili9341().with_transactions(true);
        config.pins.cs = None;
        assert_eq!(
            check(&config, &bus).into_result(),
            Err(ConfigError::SharedBusWithoutChipSelect)
        );

        // Exclusive bus: a chip select tied low is fine
        assert!(config.validate().is_ok());
    }
}
