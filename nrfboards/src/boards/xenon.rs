//! Particle Xenon.
//
// BOARD-ID: XENON
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
  background-image: url(img/NRF528DK.jpg);
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

/// Particle Xenon.
pub struct BoardImpl;

impl Board for BoardImpl {
    fn info() -> InfoSource {
        InfoSource {
            name: "Particle Xenon",
            link: &["https://docs.particle.io/datasheets/discontinued/xenon-datasheet/"],
            espruino_page_link: Some("nRF52840DK"),
            default_console: Some("EV_SERIAL1"),
            default_console_tx: Some("D6"),
            default_console_rx: Some("D8"),
            default_console_baudrate: Some("9600"),
            variables: Some(12500),
            bootloader: true,
            binary_name: Some("espruino_%v_xenon.hex"),
            build: BuildSource {
                optimizeflags: "-Os",
                libraries: &["BLUETOOTH", "GRAPHICS"],
                makefile: &[
                    "DEFINES += -DCONFIG_GPIO_AS_PINRESET",
                    "DFU_PRIVATE_KEY=targets/nrf5x_dfu/dfu_private_key.pem",
                    // S140 6.0.0
                    "DFU_SETTINGS=--application-version 0xff --hw-version 52 --sd-req 0xa9",
                    "BOOTLOADER_SETTINGS_FAMILY=NRF52840",
                    "DEFINES += -DNRF_USB=1 -DUSB -DUART1_ENABLED=1 -DRNG_CONFIG_POOL_SIZE=64",
                    "DEFINES += -DNRF_BL_DFU_INSECURE=1",
                    "NRF_SDK15=1",
                ],
            },
            ..Default::default()
        }
    }

    fn chip() -> ChipSource {
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
            // Bootloader at 0xF8000 takes pages 248-255, FS 246-247.
            saved_code: Some(SavedCodeSource {
                address: (246 - 20) * 4096,
                page_size: 4096,
                pages: 20,
                flash_available: 1024 - ((38 + 8 + 2 + 20) * 4),
                reserved: FlashReservation { softdevice: 38, bootloader: 8, filesystem: 2, code: 20 },
            }),
        }
    }

    fn devices() -> Vec<(&'static str, DeviceSource)> {
        vec![
            ("BTN1", DeviceSource::pin("D11").pinstate("IN_PULLDOWN")),
            ("LED1", DeviceSource::pin("D13")),
            ("LED2", DeviceSource::pin("D14")),
            ("LED3", DeviceSource::pin("D15")),
            ("RX_PIN_NUMBER", DeviceSource::pin("D8")),
            ("TX_PIN_NUMBER", DeviceSource::pin("D6")),
            (
                "SPIFLASH",
                DeviceSource {
                    pins: vec![
                        ("pin_cs", "D17"),
                        ("pin_sck", "D19"),
                        ("pin_mosi", "D20"),
                        ("pin_miso", "D21"),
                        ("pin_wp", "D22"),
                        // HOLD, must be driven high
                        ("pin_hold", "D23"),
                    ],
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
        let mut pins = PinBuilder::generate(0, 47);
        pins.find("PD0")?.function(Function::Xl1);
        pins.find("PD1")?.function(Function::Xl2);
        pins.find("PD5")?.function(Function::Rts);
        pins.find("PD6")?.function(Function::Txd);
        pins.find("PD7")?.function(Function::Cts);
        pins.find("PD8")?.function(Function::Rxd);
        pins.find("PD9")?.function(Function::Nfc1);
        pins.find("PD10")?.function(Function::Nfc2);
        for (name, ch) in [("PD2", 0), ("PD3", 1), ("PD4", 2), ("PD5", 3), ("PD28", 4), ("PD29", 5), ("PD30", 6), ("PD31", 7)] {
            pins.find(name)?.function(Function::Adc1In(ch));
        }
        // RGB LED and button
        for name in ["PD13", "PD14", "PD15", "PD11"] {
            pins.find(name)?.function(Function::Negated);
        }

        pins.mark_all(Function::NotFiveVoltTolerant);
        Ok(pins.build())
    }
}
