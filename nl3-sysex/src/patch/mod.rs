//! Program and Performance patches
//!
//! A patch is a decoded parameter [`Record`] plus the metadata carried in the
//! frame header: a 16-byte name, a category byte and the OS version.

mod category;
mod performance;
mod program;

use std::fmt;

pub use category::{CATEGORIES, category_name};
pub use performance::{PERFORMANCE, Performance};
pub use program::{MORPH, PROGRAM, Program};

use crate::bits::{Record, Schema, encode};
use crate::error::Nl3Error;
use crate::sysex::{Header, checksum8};
use crate::{
    NAME_LEN, NUM_PERFORMANCE_BANKS, NUM_PERFORMANCE_SLOTS, NUM_PROGRAM_BANKS, NUM_PROGRAM_SLOTS,
    PERFORMANCE_PAYLOAD_LEN, PROGRAM_PAYLOAD_LEN,
};

// =============================================================================
// Patch kind
// =============================================================================

/// The two patch kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchKind {
    Program,
    Performance,
}

impl PatchKind {
    /// Decoded payload length, checksum included
    pub fn payload_len(self) -> usize {
        match self {
            Self::Program => PROGRAM_PAYLOAD_LEN,
            Self::Performance => PERFORMANCE_PAYLOAD_LEN,
        }
    }

    pub fn num_banks(self) -> usize {
        match self {
            Self::Program => NUM_PROGRAM_BANKS,
            Self::Performance => NUM_PERFORMANCE_BANKS,
        }
    }

    pub fn num_slots(self) -> usize {
        match self {
            Self::Program => NUM_PROGRAM_SLOTS,
            Self::Performance => NUM_PERFORMANCE_SLOTS,
        }
    }

    pub fn schema(self) -> &'static Schema {
        match self {
            Self::Program => &PROGRAM,
            Self::Performance => &PERFORMANCE,
        }
    }
}

impl fmt::Display for PatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Program => write!(f, "program"),
            Self::Performance => write!(f, "performance"),
        }
    }
}

// =============================================================================
// Version
// =============================================================================

/// OS version as transmitted: hundredths in 16 bits (118 is v1.18)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version(pub u16);

impl Version {
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Nearest representable version, saturating at the field limits
    pub fn from_f64(version: f64) -> Self {
        Self((version * 100.0).round().clamp(0.0, u16::MAX as f64) as u16)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Patch interface
// =============================================================================

/// Behaviour shared by Programs and Performances
pub trait Patch: fmt::Debug {
    fn kind(&self) -> PatchKind;

    /// Raw name bytes, NUL padded
    fn name(&self) -> &[u8; NAME_LEN];

    /// Raw category byte as carried in the header
    fn category(&self) -> u8;

    fn version(&self) -> Version;

    /// Decoded parameters
    fn data(&self) -> &Record;

    fn set_name(&mut self, name: &str) -> Result<(), Nl3Error>;

    fn set_category(&mut self, category: u8) -> Result<(), Nl3Error>;

    fn printable_category(&self) -> String;

    fn printable_name(&self) -> String {
        printable_name(self.name())
    }

    /// `name (version)` line used in listings
    fn summary(&self) -> String {
        format!("{:<16} ({})", self.printable_name(), self.version())
    }

    /// Payload bytes ready for framing, with a freshly computed checksum
    fn encode_payload(&self) -> Result<Vec<u8>, Nl3Error> {
        let mut payload = encode(self.data())?;
        if let Some((last, body)) = payload.split_last_mut() {
            *last = checksum8(body);
        }
        Ok(payload)
    }
}

/// A patch of either kind, as held by the store
#[derive(Debug, Clone, PartialEq)]
pub enum AnyPatch {
    Program(Program),
    Performance(Performance),
}

impl AnyPatch {
    /// Decode a validated payload of the given kind
    pub fn decode(kind: PatchKind, header: &Header, payload: &[u8]) -> Result<Self, Nl3Error> {
        Ok(match kind {
            PatchKind::Program => Self::Program(Program::decode(header, payload)?),
            PatchKind::Performance => Self::Performance(Performance::decode(header, payload)?),
        })
    }

    pub fn kind(&self) -> PatchKind {
        match self {
            Self::Program(_) => PatchKind::Program,
            Self::Performance(_) => PatchKind::Performance,
        }
    }

    pub fn as_patch(&self) -> &dyn Patch {
        match self {
            Self::Program(p) => p,
            Self::Performance(p) => p,
        }
    }

    pub fn as_patch_mut(&mut self) -> &mut dyn Patch {
        match self {
            Self::Program(p) => p,
            Self::Performance(p) => p,
        }
    }
}

impl From<Program> for AnyPatch {
    fn from(program: Program) -> Self {
        Self::Program(program)
    }
}

impl From<Performance> for AnyPatch {
    fn from(performance: Performance) -> Self {
        Self::Performance(performance)
    }
}

// =============================================================================
// Names
// =============================================================================

/// Validate and NUL-pad a patch name: 1-16 printable ASCII characters
pub(crate) fn encode_name(name: &str) -> Result<[u8; NAME_LEN], Nl3Error> {
    let printable = name.bytes().all(|b| (0x20..0x7F).contains(&b));
    if name.is_empty() || name.len() > NAME_LEN || !printable {
        return Err(Nl3Error::InvalidName(name.to_string()));
    }

    let mut bytes = [0u8; NAME_LEN];
    bytes[..name.len()].copy_from_slice(name.as_bytes());
    Ok(bytes)
}

/// Name with trailing NULs removed
pub(crate) fn printable_name(name: &[u8; NAME_LEN]) -> String {
    String::from_utf8_lossy(name)
        .trim_end_matches('\0')
        .to_string()
}
