//
// nrfboards: board descriptors for nRF52 based boards
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//

//! Board descriptors for nRF52 based boards.
//!
//! Every supported board is a source module under `src/boards` implementing
//! [`Board`]. The build script collects these modules, so adding a board
//! means adding a file. [`load`] assembles and validates the descriptor of
//! a board; the result is consumed by the firmware build to generate pin
//! headers, linker settings and documentation.

use serde::Serialize;

mod board;
mod boards;
mod chip;
mod device;
mod error;
mod info;
mod layout;
mod pins;

pub use board::{Board, BuildSource, ChipSource, DeviceSource, InfoSource, LayoutSource, SavedCodeSource};
pub use chip::{Chip, FlashReservation, Peripherals, SavedCode};
pub use device::{Device, DeviceMap, PinState};
pub use error::{Error, Problem};
pub use info::{BoardInfo, BuildConfig, Console, ConsoleKind, Library, DEFAULT_BAUDRATE, VERSION_PLACEHOLDER};
pub use layout::BoardLayout;
pub use pins::{Function, Pin, PinBuilder, PinError, PinMut, PinTable, PORT};

use error::Fault;

/// Complete, validated description of one board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Descriptor {
    /// Canonical board identifier, e.g. `DONGLE`.
    pub id: String,
    pub info: BoardInfo,
    pub chip: Chip,
    pub devices: DeviceMap,
    #[serde(rename = "board")]
    pub layout: BoardLayout,
    pub pins: PinTable,
}

impl Descriptor {
    /// Assembles and validates the descriptor of board source `B`.
    pub fn from_board<B: Board>(id: &str) -> Result<Self, Error> {
        log::debug!("assembling board {id}");
        Self::assemble::<B>(id).map_err(|fault| fault.into_error(id))
    }

    fn assemble<B: Board>(id: &str) -> Result<Self, Fault> {
        let pins = B::pins()?;
        let chip = Chip::from_source(&B::chip())?;

        if let Some(count) = chip.gpio_count() {
            if let Some(pin) = pins.iter().find(|p| p.num() >= count) {
                return Err(Problem::PinOutOfRange { pin: pin.name(), part: chip.part.clone(), count }.into());
            }
        }

        let info = BoardInfo::from_source(&B::info(), id, &pins)?;
        let devices = device::from_source(B::devices(), &pins)?;
        let layout = BoardLayout::from_source(&B::layout(), &pins)?;

        let saved = &chip.saved_code;
        if chip.has_external_storage() && !devices.values().any(|d| d.maps(saved.address, saved.size())) {
            return Err(Problem::UnbackedStorage(saved.address).into());
        }

        log::trace!("board {id}: {} pins, {} devices", pins.len(), devices.len());
        Ok(Self { id: id.to_string(), info, chip, devices, layout, pins })
    }

    /// Output file name for the firmware version.
    pub fn binary_name(&self, version: &str) -> String {
        self.info.binary_name_for(version)
    }
}

/// Identifiers of all known boards, sorted.
pub fn ids() -> &'static [&'static str] {
    boards::IDS
}

/// Loads the descriptor of a board.
///
/// The identifier is matched ignoring ASCII case; the descriptor carries
/// the canonical spelling.
pub fn load(id: &str) -> Result<Descriptor, Error> {
    let canonical = boards::IDS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(id))
        .ok_or_else(|| Error::NotFound(id.to_string()))?;
    boards::assemble(canonical).unwrap_or_else(|| Err(Error::NotFound(id.to_string())))
}

/// Loads all boards, keeping failures alongside their identifier.
pub fn load_all() -> Vec<(&'static str, Result<Descriptor, Error>)> {
    boards::IDS.iter().map(|&id| (id, load(id))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tiny;

    impl Board for Tiny {
        fn info() -> InfoSource {
            InfoSource {
                name: "Tiny",
                default_console: Some("EV_SERIAL1"),
                default_console_tx: Some("D6"),
                default_console_rx: Some("D8"),
                variables: Some(2000),
                binary_name: Some("espruino_%v_tiny.hex"),
                build: BuildSource { libraries: &["BLUETOOTH"], makefile: &["NRF_SDK12=1"], ..Default::default() },
                ..Default::default()
            }
        }

        fn chip() -> ChipSource {
            ChipSource {
                part: "NRF52832",
                family: "NRF52",
                package: "QFN48",
                ram: 64,
                flash: 512,
                speed: 64,
                usart: 1,
                spi: 1,
                i2c: 1,
                adc: 1,
                dac: 0,
                saved_code: Some(SavedCodeSource {
                    address: (120 - 3) * 4096,
                    page_size: 4096,
                    pages: 3,
                    flash_available: 512 - ((31 + 3 + 2 + 3) * 4),
                    reserved: FlashReservation { softdevice: 31, bootloader: 3, filesystem: 2, code: 3 },
                }),
            }
        }

        fn devices() -> Vec<(&'static str, DeviceSource)> {
            vec![("LED1", DeviceSource::pin("D17"))]
        }

        fn pins() -> Result<PinTable, PinError> {
            let mut pins = PinBuilder::generate(0, 31);
            pins.find("PD17")?.function(Function::Negated);
            Ok(pins.build())
        }
    }

    #[test]
    fn assembles_tiny_board() {
        let desc = Descriptor::from_board::<Tiny>("TINY").unwrap();
        assert_eq!(desc.id, "TINY");
        assert_eq!(desc.info.board_name, "TINY");
        assert_eq!(desc.chip.saved_code.flash_available, 356);
        assert_eq!(desc.devices["LED1"].pin(), Some("D17"));
        assert_eq!(desc.info.build.nrf_sdk(), Some(12));
        assert_eq!(desc.binary_name("2v20"), "espruino_2v20_tiny.hex");
        assert!(desc.layout.edges().next().is_none());
    }

    struct TooManyPins;

    impl Board for TooManyPins {
        fn info() -> InfoSource {
            Tiny::info()
        }

        fn chip() -> ChipSource {
            Tiny::chip()
        }

        fn devices() -> Vec<(&'static str, DeviceSource)> {
            Vec::new()
        }

        fn pins() -> Result<PinTable, PinError> {
            Ok(PinBuilder::generate(0, 47).build())
        }
    }

    #[test]
    fn pins_beyond_part_are_rejected() {
        let err = Descriptor::from_board::<TooManyPins>("BIG").unwrap_err();
        assert_eq!(
            err.problem(),
            Some(&Problem::PinOutOfRange { pin: "D32".into(), part: "NRF52832".into(), count: 32 })
        );
        assert!(err.to_string().starts_with("board BIG: "));
    }

    struct Unbacked;

    impl Board for Unbacked {
        fn info() -> InfoSource {
            Tiny::info()
        }

        fn chip() -> ChipSource {
            let mut chip = Tiny::chip();
            chip.saved_code = Some(SavedCodeSource {
                address: 0x6000_0000,
                page_size: 4096,
                pages: 1024,
                flash_available: 512 - ((31 + 3 + 2) * 4),
                reserved: FlashReservation { softdevice: 31, bootloader: 3, filesystem: 2, code: 0 },
            });
            chip
        }

        fn devices() -> Vec<(&'static str, DeviceSource)> {
            Tiny::devices()
        }

        fn pins() -> Result<PinTable, PinError> {
            Tiny::pins()
        }
    }

    #[test]
    fn external_storage_needs_mapped_device() {
        let err = Descriptor::from_board::<Unbacked>("UNBACKED").unwrap_err();
        assert_eq!(err.problem(), Some(&Problem::UnbackedStorage(0x6000_0000)));
    }

    #[test]
    fn unknown_board_is_not_found() {
        assert_eq!(load("NOPE").unwrap_err(), Error::NotFound("NOPE".into()));
    }
}
