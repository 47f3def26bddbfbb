//! SMA Q3 smartwatch, early revision.
//
// BOARD-ID: SMAQ3_OLD
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

/// SMA Q3.
pub struct BoardImpl;

impl Board for BoardImpl {
    fn info() -> InfoSource {
        InfoSource {
            name: "SMA Q3",
            link: &[""],
            espruino_page_link: Some("SMAQ3"),
            variables: Some(10000),
            bootloader: true,
            binary_name: Some("espruino_%v_smaq3.hex"),
            build: BuildSource {
                optimizeflags: "-Os",
                libraries: &["BLUETOOTH", "TERMINAL", "GRAPHICS", "LCD_MEMLCD"],
                makefile: &[
                    "DEFINES += -DCONFIG_NFCT_PINS_AS_GPIOS",
                    "DEFINES += -DBUTTONPRESS_TO_REBOOT_BOOTLOADER",
                    "DEFINES += -DNRF_BL_DFU_ENTER_METHOD_BUTTON=1 -DNRF_BL_DFU_ENTER_METHOD_BUTTON_PIN=17",
                    "DEFINES += -DBUTTONPRESS_TO_REBOOT_BOOTLOADER",
                    r#"DEFINES+=-DBLUETOOTH_NAME_PREFIX='"Bangle.js"'"#,
                    "DEFINES+=-DCUSTOM_GETBATTERY=jswrap_banglejs_getBattery",
                    r#"DEFINES+=-DDUMP_IGNORE_VARIABLES='"g\0"'"#,
                    "DEFINES+=-DUSE_FONT_6X8 -DGRAPHICS_PALETTED_IMAGES",
                    // hardware init is never dumped; saves 1k of flash
                    "DEFINES+=-DNO_DUMP_HARDWARE_INITIALISATION",
                    "INCLUDE += -I$(ROOT)/libs/banglejs -I$(ROOT)/libs/misc",
                    "WRAPPERSOURCES += libs/banglejs/jswrap_bangle.c",
                    "SOURCES += libs/misc/nmea.c",
                    "JSMODULESOURCES += libs/js/banglejs/locale.min.js",
                    "DEFINES += -DBANGLEJS",
                    "DEFINES += -D'IS_PIN_A_BUTTON(PIN)=((PIN==17)||(PIN==40)||(PIN==41))'",
                    "DEFINES += -DSPIFLASH_SLEEP_CMD",
                    "DFU_SETTINGS=--application-version 0xff --hw-version 52 --sd-req 0xa9,0xae,0xb6",
                    "DFU_PRIVATE_KEY=targets/nrf5x_dfu/dfu_private_key.pem",
                    "BOOTLOADER_SETTINGS_FAMILY=NRF52840",
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
            package: "AQFN73",
            ram: 256,
            flash: 1024,
            speed: 64,
            usart: 2,
            spi: 1,
            i2c: 1,
            adc: 1,
            dac: 0,
            saved_code: Some(SavedCodeSource {
                address: (246 - 64) * 4096,
                page_size: 4096,
                pages: 64,
                flash_available: 1024 - ((38 + 8 + 2 + 64) * 4),
                reserved: FlashReservation { softdevice: 38, bootloader: 8, filesystem: 2, code: 64 },
            }),
        }
    }

    fn devices() -> Vec<(&'static str, DeviceSource)> {
        vec![
            ("BTN1", DeviceSource::pin("D17").pinstate("IN_PULLDOWN")),
            // backlight
            ("LED1", DeviceSource::pin("D8")),
            (
                "LCD",
                DeviceSource {
                    pins: vec![
                        ("pin_cs", "D5"),
                        ("pin_extcomin", "D6"),
                        ("pin_disp", "D7"),
                        ("pin_sck", "D26"),
                        ("pin_mosi", "D27"),
                        ("pin_bl", "D8"),
                    ],
                    controller: Some("LPM013M126"),
                    width: Some(176),
                    height: Some(176),
                    bpp: Some(3),
                    ..Default::default()
                },
            ),
            (
                "TOUCH",
                DeviceSource {
                    pins: vec![("pin_sda", "D33"), ("pin_scl", "D34"), ("pin_rst", "D35"), ("pin_irq", "D36")],
                    device: Some("CTS816S"),
                    addr: Some(0x15),
                    ..Default::default()
                },
            ),
            ("VIBRATE", DeviceSource::pin("D19")),
            (
                "GPS",
                DeviceSource {
                    pins: vec![("pin_en", "D29"), ("pin_rx", "D30"), ("pin_tx", "D31")],
                    device: Some("Casic URANUS"),
                    ..Default::default()
                },
            ),
            // charging pin is active low
            ("BAT", DeviceSource { pins: vec![("pin_charging", "D23"), ("pin_voltage", "D3")], ..Default::default() }),
            (
                "HEARTRATE",
                DeviceSource {
                    pins: vec![("pin_sda", "D24"), ("pin_scl", "D32"), ("pin_en", "D21"), ("pin_int", "D22")],
                    device: Some("VC31"),
                    addr: Some(0x33),
                    ..Default::default()
                },
            ),
            (
                "ACCEL",
                DeviceSource {
                    pins: vec![("pin_sda", "D38"), ("pin_scl", "D37")],
                    device: Some("KX023"),
                    addr: Some(0x1e),
                    ..Default::default()
                },
            ),
            (
                "MAG",
                DeviceSource {
                    pins: vec![("pin_sda", "D44"), ("pin_scl", "D45")],
                    device: Some("UNKNOWN_0C"),
                    addr: Some(0x0c),
                    ..Default::default()
                },
            ),
            (
                "SPIFLASH",
                DeviceSource {
                    pins: vec![("pin_cs", "D14"), ("pin_sck", "D16"), ("pin_mosi", "D15"), ("pin_miso", "D13")],
                    size: Some(4096 * 1024),
                    memmap_base: Some(0x6000_0000),
                    ..Default::default()
                },
            ),
        ]
    }

    fn layout() -> LayoutSource {
        LayoutSource { css: CSS, ..Default::default() }
    }

    fn pins() -> Result<PinTable, PinError> {
        let mut pins = PinBuilder::generate(0, 47);
        pins.find("PD0")?.function(Function::Xl1);
        pins.find("PD1")?.function(Function::Xl2);
        pins.find("PD9")?.function(Function::Nfc1);
        pins.find("PD10")?.function(Function::Nfc2);
        for (name, ch) in [("PD2", 0), ("PD3", 1), ("PD4", 2), ("PD5", 3), ("PD28", 4), ("PD29", 5), ("PD30", 6), ("PD31", 7)] {
            pins.find(name)?.function(Function::Adc1In(ch));
        }
        // button
        pins.find("PD17")?.function(Function::Negated);

        pins.mark_all(Function::NotFiveVoltTolerant);
        Ok(pins.build())
    }
}
