//! Pin table and pin derivation helper.
//!
//! Board sources derive their pin table with a [`PinBuilder`]: either all
//! GPIOs of the part are generated up front, or only the pins a board names
//! are created (restricted mode, for packages that skip pins). Function
//! markers are attached on the builder; [`PinBuilder::build`] hands out an
//! immutable [`PinTable`].

use displaydoc::Display;
use serde::{ser::SerializeStruct, Serialize, Serializer};
use std::{collections::BTreeSet, fmt, str::FromStr};
use thiserror::Error;

/// Port letter of all nRF5x GPIOs.
pub const PORT: char = 'D';

/// Function marker attached to a pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Function {
    /// 32 kHz crystal input.
    Xl1,
    /// 32 kHz crystal output.
    Xl2,
    /// Analog input channel of ADC 1.
    Adc1In(u8),
    /// UART receive.
    Rxd,
    /// UART transmit.
    Txd,
    /// UART request to send.
    Rts,
    /// UART clear to send.
    Cts,
    /// NFC antenna 1.
    Nfc1,
    /// NFC antenna 2.
    Nfc2,
    /// Active low; inverted by the firmware.
    Negated,
    /// 3.3 V only, not 5 V tolerant.
    NotFiveVoltTolerant,
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Xl1 => f.write_str("XL1"),
            Self::Xl2 => f.write_str("XL2"),
            Self::Adc1In(ch) => write!(f, "ADC1_IN{ch}"),
            Self::Rxd => f.write_str("RXD"),
            Self::Txd => f.write_str("TXD"),
            Self::Rts => f.write_str("RTS"),
            Self::Cts => f.write_str("CTS"),
            Self::Nfc1 => f.write_str("NFC1"),
            Self::Nfc2 => f.write_str("NFC2"),
            Self::Negated => f.write_str("NEGATED"),
            Self::NotFiveVoltTolerant => f.write_str("3.3"),
        }
    }
}

impl FromStr for Function {
    type Err = PinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let func = match s {
            "XL1" => Self::Xl1,
            "XL2" => Self::Xl2,
            "RXD" => Self::Rxd,
            "TXD" => Self::Txd,
            "RTS" => Self::Rts,
            "CTS" => Self::Cts,
            "NFC1" => Self::Nfc1,
            "NFC2" => Self::Nfc2,
            "NEGATED" => Self::Negated,
            "3.3" => Self::NotFiveVoltTolerant,
            other => match other.strip_prefix("ADC1_IN").map(str::parse) {
                Some(Ok(ch)) => Self::Adc1In(ch),
                _ => return Err(PinError::UnknownFunction(s.to_string())),
            },
        };
        Ok(func)
    }
}

impl Serialize for Function {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pin helper error.
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum PinError {
    /// invalid pin name {0:?}
    InvalidName(String),
    /// pin {0} not found
    NotFound(String),
    /// unknown pin function {0:?}
    UnknownFunction(String),
}

/// Splits `PD13` or `D13` into port and number.
fn parse_name(name: &str) -> Result<(char, u8), PinError> {
    let invalid = || PinError::InvalidName(name.to_string());

    let rest = name.strip_prefix('P').filter(|r| r.len() >= 2).unwrap_or(name);
    let mut chars = rest.chars();
    let port = chars.next().filter(char::is_ascii_uppercase).ok_or_else(invalid)?;
    let num = chars.as_str();
    if num.is_empty() || !num.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    Ok((port, num.parse().map_err(|_| invalid())?))
}

/// A GPIO pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    port: char,
    num: u8,
    functions: BTreeSet<Function>,
}

impl Pin {
    fn new(port: char, num: u8) -> Self {
        Self { port, num, functions: BTreeSet::new() }
    }

    /// Pin name as referenced by devices and layouts, e.g. `D13`.
    pub fn name(&self) -> String {
        format!("{}{}", self.port, self.num)
    }

    /// Port letter.
    pub fn port(&self) -> char {
        self.port
    }

    /// Pin number within the port.
    pub fn num(&self) -> u8 {
        self.num
    }

    /// Function markers, ordered.
    pub fn functions(&self) -> impl Iterator<Item = Function> + '_ {
        self.functions.iter().copied()
    }

    /// Whether the pin carries the function marker.
    pub fn has(&self, function: Function) -> bool {
        self.functions.contains(&function)
    }

    fn matches(&self, port: char, num: u8) -> bool {
        self.port == port && self.num == num
    }
}

/// Serialized as `functions = { "3.3" = 0, XL1 = 0 }`, matching the marker
/// dictionaries consumed by the header generator.
impl Serialize for Pin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Markers<'a>(&'a BTreeSet<Function>);

        impl Serialize for Markers<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_map(self.0.iter().map(|f| (f.to_string(), 0u8)))
            }
        }

        let mut s = serializer.serialize_struct("Pin", 4)?;
        s.serialize_field("name", &self.name())?;
        s.serialize_field("port", &self.port.to_string())?;
        s.serialize_field("num", &self.num)?;
        s.serialize_field("functions", &Markers(&self.functions))?;
        s.end()
    }
}

/// Ordered table of the pins of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PinTable {
    pins: Vec<Pin>,
}

impl PinTable {
    /// Looks up a pin by name (`D13` or `PD13`).
    pub fn get(&self, name: &str) -> Option<&Pin> {
        let (port, num) = parse_name(name).ok()?;
        self.pins.iter().find(|p| p.matches(port, num))
    }

    /// Whether a pin with the name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Pins in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, Pin> {
        self.pins.iter()
    }

    /// Number of pins.
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether the table has no pins.
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }
}

impl<'a> IntoIterator for &'a PinTable {
    type Item = &'a Pin;
    type IntoIter = std::slice::Iter<'a, Pin>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for PinTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.pins)
    }
}

/// Builds the pin table of one board.
#[derive(Debug, Default)]
pub struct PinBuilder {
    pins: Vec<Pin>,
}

impl PinBuilder {
    /// Empty table; pins are created by [`find_or_create`](Self::find_or_create).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequential pins `PD<first>` to `PD<last>`, both inclusive.
    pub fn generate(first: u8, last: u8) -> Self {
        Self { pins: (first..=last).map(|num| Pin::new(PORT, num)).collect() }
    }

    /// Looks up a pin that must already exist.
    pub fn find(&mut self, name: &str) -> Result<PinMut<'_>, PinError> {
        let (port, num) = parse_name(name)?;
        match self.pins.iter_mut().find(|p| p.matches(port, num)) {
            Some(pin) => Ok(PinMut(pin)),
            None => Err(PinError::NotFound(name.to_string())),
        }
    }

    /// Looks up a pin, appending it to the table if it does not exist yet.
    pub fn find_or_create(&mut self, name: &str) -> Result<PinMut<'_>, PinError> {
        let (port, num) = parse_name(name)?;
        let idx = match self.pins.iter().position(|p| p.matches(port, num)) {
            Some(idx) => idx,
            None => {
                self.pins.push(Pin::new(port, num));
                self.pins.len() - 1
            }
        };
        Ok(PinMut(&mut self.pins[idx]))
    }

    /// Attaches a function marker to every pin.
    pub fn mark_all(&mut self, function: Function) -> &mut Self {
        for pin in &mut self.pins {
            pin.functions.insert(function);
        }
        self
    }

    /// Finishes the table.
    pub fn build(self) -> PinTable {
        log::trace!("derived {} pins", self.pins.len());
        PinTable { pins: self.pins }
    }
}

/// Pin being annotated within a [`PinBuilder`].
pub struct PinMut<'a>(&'a mut Pin);

impl PinMut<'_> {
    /// Attaches a function marker.
    pub fn function(self, function: Function) -> Self {
        self.0.functions.insert(function);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_with_and_without_prefix() {
        assert_eq!(parse_name("PD13"), Ok(('D', 13)));
        assert_eq!(parse_name("D13"), Ok(('D', 13)));
        assert_eq!(parse_name("D0"), Ok(('D', 0)));
        assert!(parse_name("").is_err());
        assert!(parse_name("PD").is_err());
        assert!(parse_name("GND").is_err());
        assert!(parse_name("D1x").is_err());
        assert!(parse_name("D300").is_err());
    }

    #[test]
    fn functions_use_source_spelling() {
        for name in ["XL1", "XL2", "ADC1_IN7", "RXD", "TXD", "RTS", "CTS", "NFC1", "NFC2", "NEGATED", "3.3"] {
            let func: Function = name.parse().unwrap();
            assert_eq!(func.to_string(), name);
        }
        assert_eq!("ADC1_IN3".parse::<Function>(), Ok(Function::Adc1In(3)));
        assert_eq!("ADC2_IN0".parse::<Function>(), Err(PinError::UnknownFunction("ADC2_IN0".into())));
    }

    #[test]
    fn generate_creates_inclusive_range() {
        let table = PinBuilder::generate(0, 31).build();
        assert_eq!(table.len(), 32);
        assert_eq!(table.iter().next().unwrap().name(), "D0");
        assert_eq!(table.iter().last().unwrap().name(), "D31");
        assert!(!table.contains("D32"));
    }

    #[test]
    fn find_requires_existing_pin() {
        let mut pins = PinBuilder::generate(0, 31);
        pins.find("PD5").unwrap().function(Function::Rts).function(Function::Adc1In(3));
        assert_eq!(pins.find("PD32").err(), Some(PinError::NotFound("PD32".into())));

        let table = pins.build();
        let pin = table.get("D5").unwrap();
        assert!(pin.has(Function::Rts));
        assert!(pin.has(Function::Adc1In(3)));
        assert_eq!(pin.functions().count(), 2);
    }

    #[test]
    fn restricted_mode_only_holds_named_pins() {
        let mut pins = PinBuilder::new();
        pins.find_or_create("PD2").unwrap();
        pins.find_or_create("PD4").unwrap().function(Function::Adc1In(2));
        pins.find_or_create("PD2").unwrap().function(Function::Adc1In(0));
        pins.mark_all(Function::NotFiveVoltTolerant);
        let table = pins.build();

        let names: Vec<_> = table.iter().map(Pin::name).collect();
        assert_eq!(names, ["D2", "D4"]);
        assert!(!table.contains("D3"));
        assert!(table.get("PD2").unwrap().has(Function::Adc1In(0)));
        assert!(table.iter().all(|p| p.has(Function::NotFiveVoltTolerant)));
    }

    #[test]
    fn invalid_names_are_rejected() {
        let mut pins = PinBuilder::new();
        assert_eq!(pins.find_or_create("P13").err(), Some(PinError::InvalidName("P13".into())));
        assert!(pins.build().is_empty());
    }
}
