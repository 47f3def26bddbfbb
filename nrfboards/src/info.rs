//! Board identity and build configuration.

use regex::Regex;
use serde::Serialize;
use std::{collections::BTreeSet, sync::OnceLock};

use crate::{
    board::{BuildSource, InfoSource},
    error::{Fault, Problem},
    PinTable,
};

/// Placeholder in the binary name that is replaced by the firmware version.
pub const VERSION_PLACEHOLDER: &str = "%v";

/// Baud rate of serial consoles that do not state one.
pub const DEFAULT_BAUDRATE: u32 = 9600;

macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident, $err:ident { $($(#[$vmeta:meta])* $variant:ident = $text:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)*
        }

        impl $name {
            /// Name as written in board sources.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::Problem;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)*
                    other => Err($crate::error::Problem::$err(other.to_string())),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

pub(crate) use vocabulary;

vocabulary! {
    /// Feature library compiled into the firmware.
    Library, UnknownLibrary {
        Bluetooth = "BLUETOOTH",
        Net = "NET",
        Graphics = "GRAPHICS",
        Neopixel = "NEOPIXEL",
        Terminal = "TERMINAL",
        /// Memory LCD driver.
        LcdMemlcd = "LCD_MEMLCD",
        Nfc = "NFC",
        Tensorflow = "TENSORFLOW",
        Filesystem = "FILESYSTEM",
        Crypto = "CRYPTO",
        Tls = "TLS",
        Hashlib = "HASHLIB",
        Jit = "JIT",
    }
}

vocabulary! {
    /// Device the interactive console is attached to after boot.
    ConsoleKind, UnknownConsole {
        Serial1 = "EV_SERIAL1",
        Serial2 = "EV_SERIAL2",
        UsbSerial = "EV_USBSERIAL",
        Bluetooth = "EV_BLUETOOTH",
        Terminal = "EV_TERMINAL",
    }
}

impl ConsoleKind {
    /// Whether the console is a UART that needs TX and RX pins.
    pub fn is_serial(&self) -> bool {
        matches!(self, Self::Serial1 | Self::Serial2)
    }
}

/// Default console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Console {
    pub kind: ConsoleKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rx: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baudrate: Option<u32>,
}

impl Console {
    fn from_source(src: &InfoSource, kind: &str, pins: &PinTable) -> Result<Self, Fault> {
        let kind: ConsoleKind = kind.parse()?;

        let pin = |name: Option<&str>, field| -> Result<Option<String>, Fault> {
            match name {
                Some(name) => match pins.get(name) {
                    Some(pin) => Ok(Some(pin.name())),
                    None => Err(Problem::UnknownConsolePin(name.to_string()).into()),
                },
                None if kind.is_serial() => Err(Fault::Missing(field)),
                None => Ok(None),
            }
        };
        let tx = pin(src.default_console_tx, "info.default_console_tx")?;
        let rx = pin(src.default_console_rx, "info.default_console_rx")?;

        let baudrate = match src.default_console_baudrate {
            Some(baud) => match baud.trim().parse() {
                Ok(baud) if baud > 0 => Some(baud),
                _ => return Err(Problem::InvalidBaudrate(baud.to_string()).into()),
            },
            None if kind.is_serial() => Some(DEFAULT_BAUDRATE),
            None => None,
        };

        Ok(Self { kind, tx, rx, baudrate })
    }
}

/// Build configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    /// Compiler optimization flags.
    #[serde(rename = "optimizeflags")]
    pub optimize_flags: String,
    /// Enabled feature libraries.
    pub libraries: BTreeSet<Library>,
    /// Raw build-system directives, passed through unchanged.
    pub makefile: Vec<String>,
}

impl BuildConfig {
    fn from_source(src: &BuildSource) -> Result<Self, Fault> {
        let libraries = src.libraries.iter().map(|lib| lib.parse()).collect::<Result<_, Problem>>()?;

        Ok(Self {
            optimize_flags: src.optimizeflags.to_string(),
            libraries,
            makefile: src.makefile.iter().map(|d| d.to_string()).collect(),
        })
    }

    /// Whether the library is enabled.
    pub fn has(&self, library: Library) -> bool {
        self.libraries.contains(&library)
    }

    /// Major version of the nRF SDK selected by a `NRF_SDKnn=1` directive.
    pub fn nrf_sdk(&self) -> Option<u32> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"^\s*NRF_SDK(\d+)\s*=\s*1\s*$").unwrap());

        self.makefile.iter().find_map(|d| re.captures(d)?.get(1)?.as_str().parse().ok())
    }
}

/// Board identity and build options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardInfo {
    pub name: String,
    #[serde(rename = "link")]
    pub links: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub espruino_page_link: Option<String>,
    /// Board name visible to scripts.
    #[serde(rename = "boardname")]
    pub board_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_console: Option<Console>,
    /// Number of interpreter variables.
    pub variables: u32,
    pub bootloader: bool,
    /// Output file name template containing [`VERSION_PLACEHOLDER`].
    pub binary_name: String,
    pub build: BuildConfig,
}

impl BoardInfo {
    pub(crate) fn from_source(src: &InfoSource, id: &str, pins: &PinTable) -> Result<Self, Fault> {
        if src.name.trim().is_empty() {
            return Err(Fault::Missing("info.name"));
        }
        let variables = src.variables.ok_or(Fault::Missing("info.variables"))?;
        let binary_name = src.binary_name.ok_or(Fault::Missing("info.binary_name"))?;
        if !binary_name.contains(VERSION_PLACEHOLDER) {
            return Err(Problem::MissingVersionPlaceholder(binary_name.to_string()).into());
        }

        let default_console = match src.default_console {
            Some(kind) => Some(Console::from_source(src, kind, pins)?),
            None => None,
        };

        Ok(Self {
            name: src.name.to_string(),
            links: src.link.iter().filter(|l| !l.is_empty()).map(|l| l.to_string()).collect(),
            espruino_page_link: src.espruino_page_link.map(String::from),
            board_name: src.boardname.unwrap_or(id).to_string(),
            default_console,
            variables,
            bootloader: src.bootloader,
            binary_name: binary_name.to_string(),
            build: BuildConfig::from_source(&src.build)?,
        })
    }

    /// Binary file name for the firmware version.
    pub fn binary_name_for(&self, version: &str) -> String {
        self.binary_name.replace(VERSION_PLACEHOLDER, version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::PinBuilder;

    fn pins() -> PinTable {
        PinBuilder::generate(0, 31).build()
    }

    fn source() -> InfoSource {
        InfoSource {
            name: "Test board",
            link: &["https://example.com/board", ""],
            default_console: Some("EV_SERIAL1"),
            default_console_tx: Some("D6"),
            default_console_rx: Some("D8"),
            variables: Some(2000),
            binary_name: Some("fw_%v_test.hex"),
            build: BuildSource {
                optimizeflags: "-Os",
                libraries: &["BLUETOOTH", "GRAPHICS", "BLUETOOTH"],
                makefile: &["DEFINES += -DFOO", "NRF_SDK15=1"],
            },
            ..Default::default()
        }
    }

    #[test]
    fn vocabulary_round_trips_source_spelling() {
        for name in ["BLUETOOTH", "NET", "NEOPIXEL", "TENSORFLOW", "JIT"] {
            assert_eq!(name.parse::<Library>().map(|lib| lib.as_str()), Ok(name));
        }
        assert_eq!("LCD_MEMLCD".parse::<Library>(), Ok(Library::LcdMemlcd));
        assert_eq!("WIFI".parse::<Library>(), Err(Problem::UnknownLibrary("WIFI".into())));
        assert_eq!("EV_SERIAL3".parse::<ConsoleKind>(), Err(Problem::UnknownConsole("EV_SERIAL3".into())));
    }

    #[test]
    fn info_converts() {
        let info = BoardInfo::from_source(&source(), "TEST", &pins()).unwrap();
        assert_eq!(info.board_name, "TEST");
        assert_eq!(info.links, ["https://example.com/board"]);
        assert_eq!(info.build.libraries.len(), 2);
        assert!(info.build.has(Library::Graphics));
        assert_eq!(info.build.nrf_sdk(), Some(15));
        assert_eq!(info.binary_name_for("2v25"), "fw_2v25_test.hex");

        let console = info.default_console.unwrap();
        assert_eq!(console.kind, ConsoleKind::Serial1);
        assert_eq!(console.tx.as_deref(), Some("D6"));
        assert_eq!(console.baudrate, Some(DEFAULT_BAUDRATE));
    }

    #[test]
    fn bluetooth_console_needs_no_pins() {
        let src = InfoSource {
            default_console: Some("EV_BLUETOOTH"),
            default_console_tx: None,
            default_console_rx: None,
            boardname: Some("P8"),
            ..source()
        };
        let info = BoardInfo::from_source(&src, "TEST", &pins()).unwrap();
        assert_eq!(info.board_name, "P8");
        assert_eq!(info.default_console.unwrap().baudrate, None);
    }

    #[test]
    fn serial_console_requires_existing_pins() {
        let src = InfoSource { default_console_rx: None, ..source() };
        assert!(matches!(
            BoardInfo::from_source(&src, "TEST", &pins()),
            Err(Fault::Missing("info.default_console_rx"))
        ));

        let src = InfoSource { default_console_tx: Some("D40"), ..source() };
        assert!(matches!(
            BoardInfo::from_source(&src, "TEST", &pins()),
            Err(Fault::Invalid(Problem::UnknownConsolePin(pin))) if pin == "D40"
        ));

        let src = InfoSource { default_console_baudrate: Some("fast"), ..source() };
        assert!(matches!(
            BoardInfo::from_source(&src, "TEST", &pins()),
            Err(Fault::Invalid(Problem::InvalidBaudrate(_)))
        ));
    }

    #[test]
    fn required_fields_and_placeholder() {
        let src = InfoSource { variables: None, ..source() };
        assert!(matches!(BoardInfo::from_source(&src, "T", &pins()), Err(Fault::Missing("info.variables"))));

        let src = InfoSource { binary_name: Some("fw.hex"), ..source() };
        assert!(matches!(
            BoardInfo::from_source(&src, "T", &pins()),
            Err(Fault::Invalid(Problem::MissingVersionPlaceholder(_)))
        ));

        let src = InfoSource { build: BuildSource { libraries: &["WIFI"], ..Default::default() }, ..source() };
        assert!(matches!(
            BoardInfo::from_source(&src, "T", &pins()),
            Err(Fault::Invalid(Problem::UnknownLibrary(lib))) if lib == "WIFI"
        ));
    }

    #[test]
    fn sdk_is_absent_without_directive() {
        let build = BuildConfig::from_source(&BuildSource { makefile: &["NRF_SDK15=0"], ..Default::default() }).unwrap();
        assert_eq!(build.nrf_sdk(), None);
    }
}
