//! Silicon characteristics and flash layout.

use serde::Serialize;

use crate::{
    board::{ChipSource, SavedCodeSource},
    error::{Fault, Problem},
};

/// Pages of internal flash that are not available to user code.
///
/// The softdevice sits at the start of flash, bootloader and filesystem at
/// the end. `code` counts the pages of saved-code storage kept in internal
/// flash; it is zero when storage lives in external flash.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FlashReservation {
    pub softdevice: u32,
    pub bootloader: u32,
    pub filesystem: u32,
    pub code: u32,
}

impl FlashReservation {
    /// Total reserved pages.
    pub fn total(&self) -> u64 {
        u64::from(self.softdevice) + u64::from(self.bootloader) + u64::from(self.filesystem) + u64::from(self.code)
    }
}

/// Saved-code storage and flash budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedCode {
    /// Byte address of the storage.
    pub address: u32,
    /// Erase page size in bytes.
    pub page_size: u32,
    /// Number of storage pages.
    pub pages: u32,
    /// Flash left to user code in KB.
    pub flash_available: u32,
    pub reserved: FlashReservation,
}

impl SavedCode {
    /// Storage size in bytes.
    pub fn size(&self) -> u64 {
        u64::from(self.pages) * u64::from(self.page_size)
    }

    /// End address (exclusive) of the storage.
    pub fn end(&self) -> u64 {
        u64::from(self.address) + self.size()
    }

    fn from_source(src: &SavedCodeSource, flash_kb: u32) -> Result<Self, Fault> {
        let page_size = src.page_size;
        if page_size < 1024 || !page_size.is_power_of_two() {
            return Err(Problem::InvalidPageSize(page_size).into());
        }

        let stated = src.flash_available;
        if stated < 0 {
            return Err(Problem::NegativeFlashAvailable(stated).into());
        }
        if stated > i64::from(flash_kb) {
            return Err(Problem::FlashAvailableOverflow { available: stated, flash: flash_kb }.into());
        }
        let reserved_kb = src.reserved.total() * u64::from(page_size / 1024);
        let expected = i64::from(flash_kb) - reserved_kb as i64;
        if stated != expected {
            return Err(Problem::FlashAvailableMismatch { stated, expected }.into());
        }

        let this = Self {
            address: src.address,
            page_size,
            pages: src.pages,
            flash_available: stated as u32,
            reserved: src.reserved,
        };

        if this.address % page_size != 0 {
            return Err(Problem::UnalignedStorage(this.address).into());
        }

        let flash_bytes = u64::from(flash_kb) * 1024;
        if u64::from(this.address) < flash_bytes {
            if this.pages != this.reserved.code {
                return Err(Problem::StoragePagesMismatch { pages: this.pages, reserved: this.reserved.code }.into());
            }
            let ps = u64::from(page_size);
            let low = u64::from(this.reserved.softdevice) * ps;
            let high = flash_bytes
                .saturating_sub((u64::from(this.reserved.bootloader) + u64::from(this.reserved.filesystem)) * ps);
            if u64::from(this.address) < low || this.end() > high {
                return Err(Problem::StorageOverlap { start: this.address.into(), end: this.end() }.into());
            }
        } else if this.reserved.code != 0 {
            return Err(Problem::StoragePagesMismatch { pages: 0, reserved: this.reserved.code }.into());
        }

        Ok(this)
    }
}

/// Peripheral counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Peripherals {
    pub usart: u8,
    pub spi: u8,
    pub i2c: u8,
    pub adc: u8,
    pub dac: u8,
}

/// Microcontroller of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chip {
    /// Part number, e.g. `NRF52840`.
    pub part: String,
    pub family: String,
    pub package: String,
    /// RAM in KB.
    pub ram: u32,
    /// Flash in KB.
    pub flash: u32,
    /// Clock in MHz.
    pub speed: u32,
    #[serde(flatten)]
    pub peripherals: Peripherals,
    pub saved_code: SavedCode,
}

impl Chip {
    pub(crate) fn from_source(src: &ChipSource) -> Result<Self, Fault> {
        if src.part.trim().is_empty() {
            return Err(Fault::Missing("chip.part"));
        }
        let saved_code = src.saved_code.as_ref().ok_or(Fault::Missing("chip.saved_code"))?;

        Ok(Self {
            part: src.part.to_string(),
            family: src.family.to_string(),
            package: src.package.to_string(),
            ram: src.ram,
            flash: src.flash,
            speed: src.speed,
            peripherals: Peripherals { usart: src.usart, spi: src.spi, i2c: src.i2c, adc: src.adc, dac: src.dac },
            saved_code: SavedCode::from_source(saved_code, src.flash)?,
        })
    }

    /// Internal flash size in bytes.
    pub fn flash_bytes(&self) -> u64 {
        u64::from(self.flash) * 1024
    }

    /// Whether saved code lives outside internal flash.
    pub fn has_external_storage(&self) -> bool {
        u64::from(self.saved_code.address) >= self.flash_bytes()
    }

    /// Number of GPIOs of the part, if known.
    pub fn gpio_count(&self) -> Option<u8> {
        match self.part.as_str() {
            "NRF52832" => Some(32),
            "NRF52833" => Some(42),
            "NRF52840" => Some(48),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xenon() -> ChipSource {
        ChipSource {
            part: "NRF52840",
            family: "NRF52",
            package: "QFN48",
            ram: 256,
            flash: 1024,
            speed: 64,
            usart: 2,
            spi: 1,
            i2c: 1,
            adc: 1,
            dac: 0,
            saved_code: Some(SavedCodeSource {
                address: (246 - 20) * 4096,
                page_size: 4096,
                pages: 20,
                flash_available: 1024 - ((38 + 8 + 2 + 20) * 4),
                reserved: FlashReservation { softdevice: 38, bootloader: 8, filesystem: 2, code: 20 },
            }),
        }
    }

    fn with_saved_code(f: impl FnOnce(&mut SavedCodeSource)) -> ChipSource {
        let mut src = xenon();
        f(src.saved_code.as_mut().unwrap());
        src
    }

    fn problem(src: ChipSource) -> Problem {
        match Chip::from_source(&src) {
            Err(Fault::Invalid(problem)) => problem,
            other => panic!("expected validation problem, got {other:?}"),
        }
    }

    #[test]
    fn internal_storage_is_accepted() {
        let chip = Chip::from_source(&xenon()).unwrap();
        assert_eq!(chip.saved_code.flash_available, 752);
        assert_eq!(chip.saved_code.end(), 246 * 4096);
        assert!(!chip.has_external_storage());
        assert_eq!(chip.gpio_count(), Some(48));
    }

    #[test]
    fn flash_arithmetic_must_match_reservations() {
        let src = with_saved_code(|sc| sc.flash_available = 700);
        assert_eq!(problem(src), Problem::FlashAvailableMismatch { stated: 700, expected: 752 });

        let src = with_saved_code(|sc| sc.flash_available = -4);
        assert_eq!(problem(src), Problem::NegativeFlashAvailable(-4));

        let src = with_saved_code(|sc| sc.flash_available = 2048);
        assert_eq!(problem(src), Problem::FlashAvailableOverflow { available: 2048, flash: 1024 });
    }

    #[test]
    fn storage_must_not_overlap_reserved_regions() {
        let src = with_saved_code(|sc| sc.address = 248 * 4096 - 20 * 4096 + 4096);
        assert!(matches!(problem(src), Problem::StorageOverlap { .. }));

        let src = with_saved_code(|sc| sc.address = 10 * 4096);
        assert!(matches!(problem(src), Problem::StorageOverlap { .. }));

        let src = with_saved_code(|sc| sc.address += 16);
        assert_eq!(problem(src), Problem::UnalignedStorage((246 - 20) * 4096 + 16));

        let src = with_saved_code(|sc| sc.pages = 10);
        assert_eq!(problem(src), Problem::StoragePagesMismatch { pages: 10, reserved: 20 });
    }

    #[test]
    fn external_storage_reserves_no_code_pages() {
        let src = with_saved_code(|sc| {
            sc.address = 0x6000_0000;
            sc.pages = 1024;
        });
        assert_eq!(problem(src), Problem::StoragePagesMismatch { pages: 0, reserved: 20 });

        let src = with_saved_code(|sc| {
            sc.address = 0x6000_0000;
            sc.pages = 1024;
            sc.reserved.code = 0;
            sc.flash_available = 1024 - 48 * 4;
        });
        let chip = Chip::from_source(&src).unwrap();
        assert!(chip.has_external_storage());
    }

    #[test]
    fn missing_sections_are_malformed() {
        let src = ChipSource { saved_code: None, ..xenon() };
        assert!(matches!(Chip::from_source(&src), Err(Fault::Missing("chip.saved_code"))));

        let src = ChipSource { part: "", ..xenon() };
        assert!(matches!(Chip::from_source(&src), Err(Fault::Missing("chip.part"))));

        let src = with_saved_code(|sc| sc.page_size = 3000);
        assert_eq!(problem(src), Problem::InvalidPageSize(3000));
    }
}
