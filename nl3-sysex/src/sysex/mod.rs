//! SysEx framing: frame header, 7-of-8 repacking and checksums

mod scan;

pub use scan::{FrameScanner, scan};

use crate::bits::{BitReader, BitWriter};
use crate::error::{FrameIssue, Nl3Error};
use crate::memory::Source;
use crate::patch::{PatchKind, Version};
use crate::{
    CATEGORY_OFFSET, CLAVIA_ID, HEADER_LEN, NAME_LEN, NL3_MODEL_ID, SPARE_HEADER_LEN, SYSEX_END,
    SYSEX_START, VERSION_OFFSET,
};

/// Message kind byte (offset 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MessageKind {
    ProgramFromSlot = 0x20,
    ProgramFromMemory = 0x21,
    PerformanceFromSlot = 0x28,
    PerformanceFromMemory = 0x29,
}

impl MessageKind {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x20 => Some(Self::ProgramFromSlot),
            0x21 => Some(Self::ProgramFromMemory),
            0x28 => Some(Self::PerformanceFromSlot),
            0x29 => Some(Self::PerformanceFromMemory),
            _ => None,
        }
    }

    pub fn new(kind: PatchKind, source: Source) -> Self {
        match (kind, source) {
            (PatchKind::Program, Source::StagingSlot) => Self::ProgramFromSlot,
            (PatchKind::Program, Source::Memory) => Self::ProgramFromMemory,
            (PatchKind::Performance, Source::StagingSlot) => Self::PerformanceFromSlot,
            (PatchKind::Performance, Source::Memory) => Self::PerformanceFromMemory,
        }
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    pub fn patch_kind(self) -> PatchKind {
        match self {
            Self::ProgramFromSlot | Self::ProgramFromMemory => PatchKind::Program,
            Self::PerformanceFromSlot | Self::PerformanceFromMemory => PatchKind::Performance,
        }
    }

    pub fn source(self) -> Source {
        match self {
            Self::ProgramFromSlot | Self::PerformanceFromSlot => Source::StagingSlot,
            Self::ProgramFromMemory | Self::PerformanceFromMemory => Source::Memory,
        }
    }
}

/// Fields of the 40-byte frame header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Device address; ignored when matching frames
    pub destination: u8,
    /// Raw message kind byte, see [`MessageKind`]
    pub message_kind: u8,
    pub bank: u8,
    pub location: u8,
    pub name: [u8; NAME_LEN],
    pub category: u8,
    pub version: Version,
}

impl Header {
    pub fn kind(&self) -> Option<MessageKind> {
        MessageKind::from_byte(self.message_kind)
    }
}

/// Frame contents without the `F0`/`F7` sentinels
pub(crate) fn frame_body(raw: &[u8]) -> &[u8] {
    let body = raw.strip_prefix(&[SYSEX_START]).unwrap_or(raw);
    body.strip_suffix(&[SYSEX_END]).unwrap_or(body)
}

/// Packed payload bytes following the header
pub(crate) fn packed_payload(raw: &[u8]) -> &[u8] {
    frame_body(raw).get(HEADER_LEN..).unwrap_or(&[])
}

/// Parse the header of a raw frame.
///
/// Returns `Ok(None)` when the vendor or model byte is not ours.
pub fn identify(raw: &[u8]) -> Result<Option<Header>, Nl3Error> {
    let body = frame_body(raw);
    if body.len() < 3 || body[0] != CLAVIA_ID || body[2] != NL3_MODEL_ID {
        return Ok(None);
    }
    if body.len() < HEADER_LEN {
        return Err(Nl3Error::FrameTooShort { len: raw.len() });
    }

    let mut name = [0u8; NAME_LEN];
    name.copy_from_slice(&body[6..6 + NAME_LEN]);

    Ok(Some(Header {
        destination: body[1],
        message_kind: body[3],
        bank: body[4],
        location: body[5],
        name,
        category: body[CATEGORY_OFFSET],
        version: Version(u16::from_be_bytes([
            body[VERSION_OFFSET],
            body[VERSION_OFFSET + 1],
        ])),
    }))
}

/// Concatenate the low 7 bits of every byte and keep the whole bytes
pub fn unpack_7to8(packed: &[u8]) -> Vec<u8> {
    let mut writer = BitWriter::new();
    for byte in packed {
        writer.write_bits((byte & 0x7F) as u32, 7);
    }
    let whole = writer.bit_len() / 8;
    let mut out = writer.finish();
    out.truncate(whole);
    out
}

/// Split into 7-bit groups, each sent with its top bit clear.
/// The final group is zero-padded on the right.
pub fn pack_8to7(data: &[u8]) -> Vec<u8> {
    let mut reader = BitReader::new(data);
    let mut out = Vec::with_capacity((data.len() * 8).div_ceil(7));

    while reader.bits_remaining() > 0 {
        let take = reader.bits_remaining().min(7) as u32;
        let Some(bits) = reader.read_bits(take) else {
            break;
        };
        out.push((bits << (7 - take)) as u8);
    }

    out
}

/// 8-bit wraparound sum
pub fn checksum8(data: &[u8]) -> u8 {
    data.iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
}

/// Check an unpacked payload against its message kind.
///
/// Every problem found is reported in one [`Nl3Error::InvalidFrame`].
pub fn validate(message_kind: u8, decoded: &[u8]) -> Result<(), Nl3Error> {
    let mut issues = Vec::new();

    match MessageKind::from_byte(message_kind) {
        Some(kind) => {
            let kind = kind.patch_kind();
            let expected = kind.payload_len();
            if decoded.len() != expected {
                issues.push(FrameIssue::LengthMismatch {
                    kind,
                    expected,
                    actual: decoded.len(),
                });
            }
        }
        None => issues.push(FrameIssue::UnknownMessageKind(message_kind)),
    }

    match decoded.split_last() {
        Some((&stored, body)) => {
            let computed = checksum8(body);
            if stored != computed {
                issues.push(FrameIssue::ChecksumMismatch { stored, computed });
            }
        }
        None => issues.push(FrameIssue::EmptyPayload),
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Nl3Error::InvalidFrame(issues))
    }
}

/// Build a complete `F0 … F7` frame from a header and an unpacked payload
pub fn assemble_frame(header: &Header, payload: &[u8]) -> Result<Vec<u8>, Nl3Error> {
    if header.name.iter().any(|b| *b >= 0x80) {
        return Err(Nl3Error::InvalidName(
            String::from_utf8_lossy(&header.name).into_owned(),
        ));
    }

    let packed = pack_8to7(payload);
    let mut frame = Vec::with_capacity(HEADER_LEN + packed.len() + 2);

    frame.push(SYSEX_START);
    frame.extend_from_slice(&[
        CLAVIA_ID,
        header.destination,
        NL3_MODEL_ID,
        header.message_kind,
        header.bank,
        header.location,
    ]);
    frame.extend_from_slice(&header.name);
    frame.push(header.category);
    frame.extend_from_slice(&[0; SPARE_HEADER_LEN]);
    frame.extend_from_slice(&header.version.0.to_be_bytes());
    frame.extend_from_slice(&packed);
    frame.push(SYSEX_END);

    Ok(frame)
}
