//! Loader errors.

use displaydoc::Display;
use thiserror::Error;

use crate::pins::PinError;

/// Error loading a board descriptor.
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// unknown board {0}
    NotFound(String),
    /// board {board}: required field {field} is missing
    Malformed {
        /// Board identifier.
        board: String,
        /// Dotted path of the missing field.
        field: &'static str,
    },
    /// board {board}: {problem}
    Validation {
        /// Board identifier.
        board: String,
        /// What is inconsistent.
        problem: Problem,
    },
}

impl Error {
    /// Validation problem, if this is a validation error.
    pub fn problem(&self) -> Option<&Problem> {
        match self {
            Self::Validation { problem, .. } => Some(problem),
            _ => None,
        }
    }
}

/// Inconsistency found while validating a board descriptor.
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum Problem {
    /// device {device} references unknown pin {pin}
    UnknownDevicePin { device: String, pin: String },
    /// console pin {0} does not exist
    UnknownConsolePin(String),
    /// layout label {0} names a pin that does not exist
    UnknownLayoutPin(String),
    /// device {0} is defined twice
    DuplicateDevice(String),
    /// device {device} binds {role} twice
    DuplicatePinRole { device: String, role: String },
    /// pin {pin} is beyond the {count} GPIOs of {part}
    PinOutOfRange { pin: String, part: String, count: u8 },
    /// unknown library {0:?}
    UnknownLibrary(String),
    /// unknown console {0:?}
    UnknownConsole(String),
    /// invalid baud rate {0:?}
    InvalidBaudrate(String),
    /// unknown pin state {0:?}
    UnknownPinState(String),
    /// binary name {0:?} lacks the %v version placeholder
    MissingVersionPlaceholder(String),
    /// invalid flash page size {0}
    InvalidPageSize(u32),
    /// available flash of {0} KB is negative
    NegativeFlashAvailable(i64),
    /// available flash of {available} KB exceeds the {flash} KB of flash
    FlashAvailableOverflow { available: i64, flash: u32 },
    /// available flash of {stated} KB does not match the {expected} KB left by the reserved pages
    FlashAvailableMismatch { stated: i64, expected: i64 },
    /// storage address 0x{0:08x} is not page aligned
    UnalignedStorage(u32),
    /// storage 0x{start:08x}..0x{end:08x} overlaps reserved flash
    StorageOverlap { start: u64, end: u64 },
    /// storage uses {pages} pages but {reserved} code pages are reserved
    StoragePagesMismatch { pages: u32, reserved: u32 },
    /// external storage at 0x{0:08x} is not backed by a memory-mapped device
    UnbackedStorage(u32),
    /// {0}
    Pins(#[from] PinError),
}

/// Failure while assembling a board, before the board id is attached.
#[derive(Debug)]
pub(crate) enum Fault {
    Missing(&'static str),
    Invalid(Problem),
}

impl Fault {
    pub(crate) fn into_error(self, board: &str) -> Error {
        let board = board.to_string();
        match self {
            Self::Missing(field) => Error::Malformed { board, field },
            Self::Invalid(problem) => Error::Validation { board, problem },
        }
    }
}

impl From<Problem> for Fault {
    fn from(problem: Problem) -> Self {
        Self::Invalid(problem)
    }
}

impl From<PinError> for Fault {
    fn from(err: PinError) -> Self {
        Self::Invalid(Problem::Pins(err))
    }
}
