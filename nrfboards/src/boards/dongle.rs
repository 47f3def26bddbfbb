//! Nordic nRF52840 Dongle (PCA10059).
//
// BOARD-ID: DONGLE
//
// The QFN48 package leaves several P0/P1 pins unconnected, so only the
// routed pins are created.

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

/// nRF52840 Dongle.
pub struct BoardImpl;

impl Board for BoardImpl {
    fn info() -> InfoSource {
        InfoSource {
            name: "nRF52840 Dongle",
            link: &["https://www.nordicsemi.com/Software-and-Tools/Development-Kits/nRF52840-Dongle"],
            espruino_page_link: Some("nRF52840DONGLE"),
            default_console: Some("EV_SERIAL1"),
            default_console_tx: Some("D15"),
            default_console_rx: Some("D13"),
            default_console_baudrate: Some("9600"),
            variables: Some(12500),
            bootloader: false,
            binary_name: Some("espruino_%v_nrf52840_dongle.hex"),
            build: BuildSource {
                optimizeflags: "-Os",
                libraries: &["BLUETOOTH", "NET", "GRAPHICS", "NEOPIXEL"],
                makefile: &[
                    "DEFINES += -DCONFIG_NFCT_PINS_AS_GPIOS",
                    "DEFINES += -DESPR_LSE_ENABLE ",
                    // 23 + n * 27 bytes
                    "DEFINES += -DNRF_SDH_BLE_GATT_MAX_MTU_SIZE=131",
                    "LDFLAGS += -Xlinker --defsym=LD_APP_RAM_BASE=0x2ec0",
                    "DEFINES += -DESPR_DCDC_ENABLE=1",
                    "ESPR_BLUETOOTH_ANCS=1",
                    "DEFINES += -DCONFIG_GPIO_AS_PINRESET",
                    "DEFINES += -DBOARD_PCA10059",
                    "DEFINES += -DNRF_USB=1 -DUSB",
                    "DEFINES += -DPIN_NAMES_DIRECT=1",
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
            spi: 3,
            i2c: 2,
            adc: 1,
            dac: 0,
            // The USB bootloader starts at 0xE0000; storage must end at page 223.
            saved_code: Some(SavedCodeSource {
                address: (223 - 10) * 4096,
                page_size: 4096,
                pages: 10,
                flash_available: 1024 - ((31 + 30 + 2 + 10) * 4),
                reserved: FlashReservation { softdevice: 31, bootloader: 30, filesystem: 2, code: 10 },
            }),
        }
    }

    fn devices() -> Vec<(&'static str, DeviceSource)> {
        vec![
            ("BTN1", DeviceSource::pin("D38")), // P1.06
            ("LED1", DeviceSource::pin("D6")),
            ("LED2", DeviceSource::pin("D8")),
            ("LED3", DeviceSource::pin("D41")),
            ("LED4", DeviceSource::pin("D12")),
            ("RX_PIN_NUMBER", DeviceSource::pin("D13")),
            ("TX_PIN_NUMBER", DeviceSource::pin("D15")),
        ]
    }

    fn layout() -> LayoutSource {
        LayoutSource {
            top: &["GND", "D10", "D9", "D32", "D24", "D22", "D20", "D17", "D15", "D13"],
            bottom: &["GND", "D43", "D45", "D47", "D2", "D29", "D31", "GND", "VDD_OUT", "VBUS", ""],
            notes: &[("D13", "Serial console RX"), ("D15", "Serial console TX")],
            css: CSS,
            ..Default::default()
        }
    }

    fn pins() -> Result<PinTable, PinError> {
        let mut pins = PinBuilder::new();
        pins.find_or_create("PD0")?.function(Function::Xl1);
        pins.find_or_create("PD1")?.function(Function::Xl2);
        pins.find_or_create("PD2")?.function(Function::Adc1In(0));
        pins.find_or_create("PD4")?.function(Function::Adc1In(2));
        pins.find_or_create("PD6")?.function(Function::Negated);
        pins.find_or_create("PD8")?.function(Function::Negated);
        for name in ["PD9", "PD10", "PD11"] {
            pins.find_or_create(name)?;
        }
        pins.find_or_create("PD12")?.function(Function::Negated);
        pins.find_or_create("PD13")?.function(Function::Rxd);
        pins.find_or_create("PD14")?;
        pins.find_or_create("PD15")?.function(Function::Txd);
        // SW2 also shorts P0.19, P0.21, P0.23 and P0.25; those stay out of the table.
        for name in ["PD17", "PD18", "PD20", "PD22", "PD24", "PD26"] {
            pins.find_or_create(name)?;
        }
        pins.find_or_create("PD29")?.function(Function::Adc1In(5));
        pins.find_or_create("PD31")?.function(Function::Adc1In(7));
        for name in ["PD32", "PD33", "PD34", "PD36"] {
            pins.find_or_create(name)?;
        }
        pins.find_or_create("PD38")?.function(Function::Negated);
        pins.find_or_create("PD39")?;
        pins.find_or_create("PD41")?.function(Function::Negated);
        for name in ["PD42", "PD43", "PD45", "PD47"] {
            pins.find_or_create(name)?;
        }

        pins.mark_all(Function::NotFiveVoltTolerant);
        Ok(pins.build())
    }
}
