//! Board.
//!
//! A board source module returns its sections as literal records that keep
//! the spelling of the board files: vocabulary fields are plain strings and
//! optional keys are options. The loader turns them into the typed schema.

use crate::{chip::FlashReservation, pins::PinError, PinTable};

/// Board-specific descriptor data.
pub trait Board {
    /// Identity and build configuration.
    fn info() -> InfoSource;

    /// Silicon characteristics and flash layout.
    fn chip() -> ChipSource;

    /// Peripherals wired to the chip, keyed by role name.
    fn devices() -> Vec<(&'static str, DeviceSource)>;

    /// Physical layout for generated diagrams.
    fn layout() -> LayoutSource {
        LayoutSource::default()
    }

    /// Derives the pin table.
    fn pins() -> Result<PinTable, PinError>;
}

/// Literal `info` section.
#[derive(Debug, Clone, Default)]
pub struct InfoSource {
    /// Human readable board name.
    pub name: &'static str,
    /// Documentation links.
    pub link: &'static [&'static str],
    /// Page name on the documentation site.
    pub espruino_page_link: Option<&'static str>,
    /// Board name visible to scripts; defaults to the board id.
    pub boardname: Option<&'static str>,
    /// Default console, e.g. `EV_SERIAL1`.
    pub default_console: Option<&'static str>,
    /// Console TX pin.
    pub default_console_tx: Option<&'static str>,
    /// Console RX pin.
    pub default_console_rx: Option<&'static str>,
    /// Console baud rate, as decimal string.
    pub default_console_baudrate: Option<&'static str>,
    /// Number of interpreter variables.
    pub variables: Option<u32>,
    /// Whether a bootloader is present.
    pub bootloader: bool,
    /// Output file name with `%v` version placeholder.
    pub binary_name: Option<&'static str>,
    /// Build configuration.
    pub build: BuildSource,
}

/// Literal `info.build` section.
#[derive(Debug, Clone, Default)]
pub struct BuildSource {
    /// Compiler optimization flags.
    pub optimizeflags: &'static str,
    /// Enabled feature libraries.
    pub libraries: &'static [&'static str],
    /// Raw build-system directives.
    pub makefile: &'static [&'static str],
}

/// Literal `chip` section.
#[derive(Debug, Clone, Default)]
pub struct ChipSource {
    pub part: &'static str,
    pub family: &'static str,
    pub package: &'static str,
    /// RAM in KB.
    pub ram: u32,
    /// Flash in KB.
    pub flash: u32,
    /// Clock in MHz.
    pub speed: u32,
    pub usart: u8,
    pub spi: u8,
    pub i2c: u8,
    pub adc: u8,
    pub dac: u8,
    pub saved_code: Option<SavedCodeSource>,
}

/// Literal `chip.saved_code` section.
#[derive(Debug, Clone, Default)]
pub struct SavedCodeSource {
    /// Byte address of code storage.
    pub address: u32,
    /// Erase page size in bytes.
    pub page_size: u32,
    /// Number of storage pages.
    pub pages: u32,
    /// Flash left to user code in KB, as stated by the board.
    pub flash_available: i64,
    /// Pages of internal flash that are not available to user code.
    pub reserved: FlashReservation,
}

/// Literal device entry.
#[derive(Debug, Clone, Default)]
pub struct DeviceSource {
    /// Pin bindings, e.g. `("pin_sck", "D2")`.
    pub pins: Vec<(&'static str, &'static str)>,
    pub pinstate: Option<&'static str>,
    pub device: Option<&'static str>,
    pub controller: Option<&'static str>,
    pub addr: Option<u8>,
    pub size: Option<u32>,
    pub memmap_base: Option<u32>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub bpp: Option<u8>,
}

impl DeviceSource {
    /// Device with a single `pin` binding.
    pub fn pin(pin: &'static str) -> Self {
        Self { pins: vec![("pin", pin)], ..Default::default() }
    }

    /// Sets the pin state.
    pub fn pinstate(mut self, pinstate: &'static str) -> Self {
        self.pinstate = Some(pinstate);
        self
    }
}

/// Literal `board` section.
#[derive(Debug, Clone, Default)]
pub struct LayoutSource {
    pub top: &'static [&'static str],
    pub bottom: &'static [&'static str],
    pub left: &'static [&'static str],
    pub right: &'static [&'static str],
    /// Notes keyed by pin label.
    pub notes: &'static [(&'static str, &'static str)],
    /// Style fragment for the diagram renderer.
    pub css: &'static str,
}
