//! Fixtures shared by the unit tests

use crate::patch::{PatchKind, Version};
use crate::sysex::{Header, MessageKind, assemble_frame, checksum8};
use crate::{DEFAULT_DESTINATION_ID, NAME_LEN};

/// Small deterministic generator so fixtures are reproducible
pub(crate) struct XorShift(u32);

impl XorShift {
    pub(crate) fn new(seed: u32) -> Self {
        Self(seed.max(1))
    }

    pub(crate) fn next_u8(&mut self) -> u8 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        (x >> 24) as u8
    }
}

/// Random payload of `len` bytes whose last byte is a valid checksum
pub(crate) fn random_payload(len: usize, seed: u32) -> Vec<u8> {
    let mut rng = XorShift::new(seed);
    let mut payload: Vec<u8> = (0..len.saturating_sub(1)).map(|_| rng.next_u8()).collect();
    payload.push(checksum8(&payload));
    payload
}

pub(crate) fn name_bytes(name: &str) -> [u8; NAME_LEN] {
    let mut bytes = [0u8; NAME_LEN];
    for (dst, src) in bytes.iter_mut().zip(name.bytes()) {
        *dst = src;
    }
    bytes
}

pub(crate) fn header(kind: MessageKind, bank: u8, location: u8, name: &str) -> Header {
    Header {
        destination: DEFAULT_DESTINATION_ID,
        message_kind: kind.as_byte(),
        bank,
        location,
        name: name_bytes(name),
        category: 0x0B,
        version: Version(118),
    }
}

/// Well-formed memory frame with a random payload of the right length
pub(crate) fn memory_frame(kind: PatchKind, bank: u8, location: u8, name: &str, seed: u32) -> Vec<u8> {
    let message = match kind {
        PatchKind::Program => MessageKind::ProgramFromMemory,
        PatchKind::Performance => MessageKind::PerformanceFromMemory,
    };
    let payload = random_payload(kind.payload_len(), seed);
    assemble_frame(&header(message, bank, location, name), &payload).unwrap()
}

/// Index of the first differing byte, for readable failures
pub(crate) fn first_difference(a: &[u8], b: &[u8]) -> Option<usize> {
    a.iter()
        .zip(b)
        .position(|(x, y)| x != y)
        .or_else(|| (a.len() != b.len()).then(|| a.len().min(b.len())))
}
