//! Peripherals wired to the chip.

use serde::Serialize;
use std::collections::{btree_map::Entry, BTreeMap};

use crate::{
    board::DeviceSource,
    error::{Fault, Problem},
    info::vocabulary,
    PinTable,
};

vocabulary! {
    /// Initial state of a device pin.
    PinState, UnknownPinState {
        In = "IN",
        InPullup = "IN_PULLUP",
        InPulldown = "IN_PULLDOWN",
        Out = "OUT",
        OpenDrain = "OPENDRAIN",
        OpenDrainPullup = "OPENDRAIN_PULLUP",
        AfOutput = "AF_OUTPUT",
        AfOpenDrain = "AF_OPENDRAIN",
        Analog = "ANALOG",
    }
}

/// Devices keyed by role name, e.g. `BTN1` or `SPIFLASH`.
pub type DeviceMap = BTreeMap<String, Device>;

/// A peripheral and the pins it is wired to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Pin bindings keyed by binding name (`pin`, `pin_sck`, ...).
    #[serde(flatten)]
    pub pins: BTreeMap<String, String>,
    #[serde(rename = "pinstate", skip_serializing_if = "Option::is_none")]
    pub pin_state: Option<PinState>,
    /// Attached part, e.g. `KX023`.
    #[serde(rename = "device", skip_serializing_if = "Option::is_none")]
    pub part: Option<String>,
    /// Display controller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    /// I2C address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<u8>,
    /// Size in bytes (external flash).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    /// Address the device is mapped to in software.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memmap_base: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u16>,
    /// Bits per pixel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bpp: Option<u8>,
}

impl Device {
    /// The single `pin` binding.
    pub fn pin(&self) -> Option<&str> {
        self.binding("pin")
    }

    /// Pin of the named binding.
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.pins.get(name).map(String::as_str)
    }

    /// Whether the device maps `len` bytes at `address` into the address space.
    pub fn maps(&self, address: u32, len: u64) -> bool {
        match (self.memmap_base, self.size) {
            (Some(base), Some(size)) => base == address && len <= u64::from(size),
            _ => false,
        }
    }

    fn from_source(role: &str, src: DeviceSource, pins: &PinTable) -> Result<Self, Fault> {
        let mut bindings = BTreeMap::new();
        for (name, pin) in src.pins {
            let Some(found) = pins.get(pin) else {
                return Err(Problem::UnknownDevicePin { device: role.to_string(), pin: pin.to_string() }.into());
            };
            if bindings.insert(name.to_string(), found.name()).is_some() {
                return Err(Problem::DuplicatePinRole { device: role.to_string(), role: name.to_string() }.into());
            }
        }

        Ok(Self {
            pins: bindings,
            pin_state: src.pinstate.map(str::parse::<PinState>).transpose()?,
            part: src.device.map(String::from),
            controller: src.controller.map(String::from),
            addr: src.addr,
            size: src.size,
            memmap_base: src.memmap_base,
            width: src.width,
            height: src.height,
            bpp: src.bpp,
        })
    }
}

/// Converts the literal device list of a board.
pub(crate) fn from_source(src: Vec<(&'static str, DeviceSource)>, pins: &PinTable) -> Result<DeviceMap, Fault> {
    let mut devices = DeviceMap::new();
    for (role, device) in src {
        let device = Device::from_source(role, device, pins)?;
        match devices.entry(role.to_string()) {
            Entry::Vacant(e) => {
                e.insert(device);
            }
            Entry::Occupied(_) => return Err(Problem::DuplicateDevice(role.to_string()).into()),
        }
    }
    Ok(devices)
}
