//! nl3-sysex: Nord Lead 3 SysEx patch codec and patch memory
//!
//! This crate decodes and re-encodes the Clavia Nord Lead 3 System-Exclusive
//! dump format and keeps the decoded patches in an addressable, transactional
//! in-memory store.
//!
//! # Key Features
//!
//! - **Schema-driven bit codec**: one generic walk over static field tables
//! - **Byte-exact export**: a decoded dump re-encodes to the same bytes
//! - **Atomic bulk moves**: block transfers either fully apply or leave memory untouched
//! - **Lenient scanning**: foreign or corrupt frames never abort a bulk import
//!
//! # Format Overview
//!
//! A dump file is a stream of `F0 … F7` frames. Each NL3 frame carries:
//! - A 40-byte header (vendor, destination, model, message kind, bank,
//!   location, name, category, spare bytes, version × 100)
//! - The patch payload, 7-of-8 packed so every transmitted byte has its top bit clear
//! - A trailing checksum byte inside the unpacked payload
//!
//! # Usage
//!
//! ```ignore
//! use nl3_sysex::{PatchRef, PatchStore};
//!
//! let dump = std::fs::read("ProgBank1.syx").unwrap();
//! let mut store = PatchStore::new();
//! let summary = store.import_bytes(&dump, false);
//! println!("{} valid, {} invalid", summary.valid, summary.invalid);
//!
//! let patch = store.get(PatchRef::program(0, 42)).unwrap();
//! println!("{}", patch.summary());
//! ```

pub mod bits;
mod error;
pub mod memory;
pub mod patch;
pub mod sysex;

#[cfg(test)]
mod testing;

pub use bits::{Field, FieldKind, Record, Schema, SubFraming, Value};
pub use error::{FrameIssue, Nl3Error};
pub use memory::{
    ImportSummary, MemoryLocation, PatchRef, PatchStore, Source, TransferMode, bank,
    linear_index, location, valid,
};
pub use patch::{
    AnyPatch, CATEGORIES, Patch, PatchKind, Performance, Program, Version, category_name,
};
pub use sysex::{
    FrameScanner, Header, MessageKind, assemble_frame, checksum8, identify, pack_8to7, scan,
    unpack_7to8, validate,
};

// =============================================================================
// Memory Layout Constants
// =============================================================================

/// Locations per bank
pub const BANK_SIZE: usize = 128;

/// Program banks in persistent memory
pub const NUM_PROGRAM_BANKS: usize = 8;

/// Performance banks in persistent memory
pub const NUM_PERFORMANCE_BANKS: usize = 2;

/// Program staging slots (A-D)
pub const NUM_PROGRAM_SLOTS: usize = 4;

/// Performance staging slots
pub const NUM_PERFORMANCE_SLOTS: usize = 1;

// =============================================================================
// SysEx Framing Constants
// =============================================================================

/// SysEx start byte
pub const SYSEX_START: u8 = 0xF0;

/// SysEx end byte
pub const SYSEX_END: u8 = 0xF7;

/// Clavia manufacturer ID
pub const CLAVIA_ID: u8 = 0x33;

/// Nord Lead 3 model ID
pub const NL3_MODEL_ID: u8 = 0x09;

/// Destination address written on export unless configured otherwise
pub const DEFAULT_DESTINATION_ID: u8 = 0x7F;

/// Patch name length in bytes
pub const NAME_LEN: usize = 16;

/// Reserved header bytes between category and version
pub const SPARE_HEADER_LEN: usize = 15;

/// Header bytes before the packed payload (after stripping `F0`)
pub const HEADER_LEN: usize = 40;

/// Offset of the category byte
pub const CATEGORY_OFFSET: usize = 22;

/// Offset of the big-endian version × 100
pub const VERSION_OFFSET: usize = 38;

// =============================================================================
// Payload Constants
// =============================================================================

/// Decoded Program payload length, checksum included
pub const PROGRAM_PAYLOAD_LEN: usize = 191;

/// Decoded Performance payload length, checksum included
pub const PERFORMANCE_PAYLOAD_LEN: usize = 859;

/// Width of a Program embedded in a Performance (no version, no checksum)
pub const EMBEDDED_PROGRAM_BITS: u32 = 1504;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        assert_eq!(CATEGORY_OFFSET, 6 + NAME_LEN);
        assert_eq!(VERSION_OFFSET, CATEGORY_OFFSET + 1 + SPARE_HEADER_LEN);
        assert_eq!(HEADER_LEN, VERSION_OFFSET + 2);
    }

    #[test]
    fn test_payload_constants() {
        // Standalone program = embedded program + version (16) + checksum (8)
        assert_eq!(PROGRAM_PAYLOAD_LEN * 8, EMBEDDED_PROGRAM_BITS as usize + 24);
        assert!(PERFORMANCE_PAYLOAD_LEN > 4 * EMBEDDED_PROGRAM_BITS as usize / 8);
    }
}
