//! P8 DaFit smartwatch, SDK 11 with saved code in SPI flash.
//
// BOARD-ID: SDK11_P8_SPIFLASH
//

use crate::{
    board::{Board, BuildSource, ChipSource, DeviceSource, InfoSource, LayoutSource, SavedCodeSource},
    chip::FlashReservation,
    pins::{Function, PinBuilder, PinError},
    PinTable,
};

const CSS: &str = r#"
#board {
  width: 528px;
  height: 800px;
  top: 0px;
  left : 200px;
  background-image: url(img/NRF52832DK.jpg);
}
#boardcontainer {
  height: 900px;
}

#left {
    top: 219px;
    right: 466px;
}
#right {
    top: 150px;
    left: 466px;
}

.leftpin { height: 17px; }
.rightpin { height: 17px; }
"#;

/// P8 smartwatch.
pub struct BoardImpl;

impl Board for BoardImpl {
    fn info() -> InfoSource {
        InfoSource {
            name: "P8 DaFit smartwatch",
            boardname: Some("P8"),
            default_console: Some("EV_BLUETOOTH"),
            variables: Some(2600),
            bootloader: true,
            binary_name: Some("espruino_%v_p8_SDK11_SD20_SPIFLASH.hex"),
            build: BuildSource {
                optimizeflags: "-Os",
                libraries: &["BLUETOOTH", "GRAPHICS"],
                makefile: &[
                    "DEFINES+=-DUSE_FONT_6X8 -DGRAPHICS_PALETTED_IMAGES -DGRAPHICS_ANTIALIAS",
                    r#"DEFINES+=-DBLE_HIDS_ENABLED=1 -DBLUETOOTH_NAME_PREFIX='"P8"'"#,
                    "DFU_SETTINGS=--sd-req 0x81,0x88",
                    "USE_LCD_SPI_UNBUF=1",
                    "DEFINES+= -DSPISENDMANY_BUFFER_SIZE=120 -DSPI0_USE_EASY_DMA=1",
                    "DEFINES += -DSPIFLASH_SHARED_SPI",
                    "NRF_SDK11=1",
                ],
            },
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
            // Whole external flash, mapped at the SPIFLASH base; no internal code pages.
            saved_code: Some(SavedCodeSource {
                address: 0x6000_0000,
                page_size: 4096,
                pages: 1024,
                flash_available: 512 - ((28 + 8 + 2 + 0) * 4),
                reserved: FlashReservation { softdevice: 28, bootloader: 8, filesystem: 2, code: 0 },
            }),
        }
    }

    fn devices() -> Vec<(&'static str, DeviceSource)> {
        vec![
            ("BTN1", DeviceSource::pin("D17").pinstate("IN_PULLDOWN")),
            ("LED1", DeviceSource::pin("D27")),
            ("VIBRATE", DeviceSource::pin("D16")),
            ("BAT", DeviceSource { pins: vec![("pin_charging", "D19"), ("pin_voltage", "D31")], ..Default::default() }),
            (
                "SPIFLASH",
                DeviceSource {
                    pins: vec![("pin_sck", "D2"), ("pin_mosi", "D3"), ("pin_miso", "D4"), ("pin_cs", "D5")],
                    size: Some(4096 * 1024),
                    memmap_base: Some(0x6000_0000),
                    ..Default::default()
                },
            ),
        ]
    }

    fn layout() -> LayoutSource {
        LayoutSource {
            left: &["VDD", "VDD", "RESET", "VDD", "5V", "GND", "GND", "", "", "D3", "D4", "D28", "D29", "D30", "D31"],
            right: &[
                "D27", "D26", "D2", "GND", "D25", "D24", "D23", "D22", "D20", "D19", "", "D18", "D17", "D16", "D15",
                "D14", "D13", "D12", "D11", "", "D10", "D9", "D8", "D7", "D6", "D5", "D21", "D1", "D0",
            ],
            notes: &[("D6", "Serial console RX"), ("D8", "Serial console TX")],
            css: CSS,
            ..Default::default()
        }
    }

    fn pins() -> Result<PinTable, PinError> {
        let mut pins = PinBuilder::generate(0, 31);
        for (name, ch) in [("PD2", 0), ("PD3", 1), ("PD4", 2), ("PD5", 3), ("PD28", 4), ("PD29", 5), ("PD30", 6), ("PD31", 7)] {
            pins.find(name)?.function(Function::Adc1In(ch));
        }
        // vibration motor and charge indicator
        pins.find("PD16")?.function(Function::Negated);
        pins.find("PD19")?.function(Function::Negated);

        pins.mark_all(Function::NotFiveVoltTolerant);
        Ok(pins.build())
    }
}
