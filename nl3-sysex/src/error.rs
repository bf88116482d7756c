//! Error types for SysEx decoding and patch memory operations

use crate::memory::PatchRef;
use crate::patch::PatchKind;

/// Errors that can occur when decoding, encoding or relocating patches
#[derive(Debug, thiserror::Error)]
pub enum Nl3Error {
    /// Bit source exhausted in the middle of a field
    #[error("Input exhausted while reading field `{field}` of {record}")]
    TruncatedInput {
        record: &'static str,
        field: &'static str,
    },

    /// Value does not fit the declared bit width
    #[error("Value {value} does not fit field `{field}` of {record} ({bits} bits)")]
    ValueOutOfRange {
        record: &'static str,
        field: &'static str,
        value: i64,
        bits: u32,
    },

    /// Array value has the wrong element count
    #[error("Field `{field}` of {record} expects {expected} elements, got {actual}")]
    ArrayLength {
        record: &'static str,
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Value variant disagrees with the field kind
    #[error("Field `{field}` of {record} cannot hold that kind of value")]
    WrongValueKind {
        record: &'static str,
        field: &'static str,
    },

    /// No field with that name exists at this depth
    #[error("{record} has no field named `{field}`")]
    UnknownField { record: &'static str, field: String },

    /// Nested field width disagrees with its sub-record
    #[error("Field `{field}` of {record} declares {declared} bits but its record spans {actual}")]
    SchemaMismatch {
        record: &'static str,
        field: &'static str,
        declared: u32,
        actual: u32,
    },

    /// Frame matched our vendor/model but cannot hold a header
    #[error("Frame too short to carry a header ({len} bytes)")]
    FrameTooShort { len: usize },

    /// Frame failed validation; every problem found is listed
    #[error("Invalid frame: {}", join_issues(.0))]
    InvalidFrame(Vec<FrameIssue>),

    /// Reference is out of bounds for its kind and source
    #[error("Invalid location: {0}")]
    InvalidLocation(PatchRef),

    /// Reference is valid but holds no patch
    #[error("That location is not initialized: {0}")]
    Uninitialized(PatchRef),

    /// Program/Performance confusion
    #[error("Patch kind mismatch: expected {expected}, got {actual}")]
    KindMismatch {
        expected: PatchKind,
        actual: PatchKind,
    },

    /// Memory/slot confusion in a swap
    #[error("Cannot swap {0} with {1}: sources differ")]
    SourceMismatch(PatchRef, PatchRef),

    /// Copy or import would overwrite an occupied memory location
    #[error("Destination is occupied: {0}")]
    DestinationOccupied(PatchRef),

    /// A location in a transfer run is occupied
    #[error("Transfer blocked, location is occupied: {0}")]
    MemoryOccupied(PatchRef),

    /// A transfer run extends past the end of memory
    #[error("Transfer of {len} patches starting at {start} overflows memory")]
    MemoryOverflow { start: PatchRef, len: usize },

    /// The same source appears twice in a move
    #[error("Source listed more than once: {0}")]
    DuplicateSource(PatchRef),

    /// Export produced no frames
    #[error("No data to write")]
    NoDataToWrite,

    /// Name is empty, too long or not 7-bit ASCII
    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    /// Category index is not in the category table
    #[error("Invalid category: 0x{0:02X}")]
    InvalidCategory(u8),

    /// Performances do not carry a category
    #[error("Performances do not support categories")]
    CategoryNotSupported,

    /// IO error while reading a dump
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation problem with a decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameIssue {
    /// Decoded payload length differs from the kind's fixed length
    #[error("{kind} payload is {actual} bytes, expected {expected}")]
    LengthMismatch {
        kind: PatchKind,
        expected: usize,
        actual: usize,
    },
    /// Trailing checksum byte disagrees with the computed sum
    #[error("checksum mismatch: frame carries 0x{stored:02X}, computed 0x{computed:02X}")]
    ChecksumMismatch { stored: u8, computed: u8 },
    /// Message kind byte is not one we understand
    #[error("unknown message kind 0x{0:02X}")]
    UnknownMessageKind(u8),
    /// Nothing left after unpacking
    #[error("empty payload")]
    EmptyPayload,
}

fn join_issues(issues: &[FrameIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl Nl3Error {
    /// Validation issues carried by this error, if any
    pub fn frame_issues(&self) -> &[FrameIssue] {
        match self {
            Self::InvalidFrame(issues) => issues,
            _ => &[],
        }
    }
}
