//! Performance schema and patch type

use super::program::PROGRAM;
use super::{Patch, PatchKind, Version, encode_name, printable_name};
use crate::bits::{Field, Record, Schema, Value, decode};
use crate::error::Nl3Error;
use crate::sysex::Header;
use crate::{EMBEDDED_PROGRAM_BITS, NAME_LEN, PERFORMANCE_PAYLOAD_LEN};

/// Performance payload: shared control fields, then the names and parameters
/// of the four embedded Programs (slots A-D).
///
/// Slot masks (`enabled_slots`, `sustain_enable`, ...) use bit 0 for slot A.
pub static PERFORMANCE: Schema = Schema {
    name: "Performance",
    fields: &[
        Field::uint("version_number", 16),
        Field::uint("enabled_slots", 8),
        Field::uint("focused_slot", 8),
        Field::uint("midi_channel_slot_a", 8),
        Field::uint("midi_channel_slot_b", 8),
        Field::uint("midi_channel_slot_c", 8),
        Field::uint("midi_channel_slot_d", 8),
        Field::uint("audio_channel_slot_a", 8),
        Field::uint("audio_channel_slot_b", 8),
        Field::uint("audio_channel_slot_c", 8),
        Field::uint("audio_channel_slot_d", 8),
        Field::uint("splitpoint_key", 8),
        Field::uint("spare1", 7),
        Field::flag("splitpoint_enable"),
        Field::uint("sustain_enable", 8),
        Field::uint("pitchbend_enable", 8),
        Field::uint("modwheel_enable", 8),
        Field::uint("bank_slot_a", 8),
        Field::uint("program_slot_a", 8),
        Field::uint("bank_slot_b", 8),
        Field::uint("program_slot_b", 8),
        Field::uint("bank_slot_c", 8),
        Field::uint("program_slot_c", 8),
        Field::uint("bank_slot_d", 8),
        Field::uint("program_slot_d", 8),
        Field::uint("spare2", 7),
        Field::flag("morph3_source_select"),
        Field::uint("spare3", 7),
        Field::flag("midi_clock_keysync"),
        Field::uint("spare4", 7),
        Field::flag("keyboard_hold"),
        Field::uint("spare5", 8),
        Field::uint("spare6", 8),
        Field::uint("spare7", 8),
        Field::uint("spare8", 8),
        Field::uint("spare9", 8),
        Field::uint("spare10", 8),
        Field::uint("spare11", 8),
        Field::uint("spare12", 8),
        Field::uint("spare13", 8),
        Field::uint("spare14", 8),
        Field::uint("spare15", 8),
        Field::uint("midi_clock_rate", 8),
        Field::uint("bend_range_up", 8),
        Field::uint("bend_range_down", 8),
        Field::array("patchname_slot_a", 8, NAME_LEN),
        Field::array("patchname_slot_b", 8, NAME_LEN),
        Field::array("patchname_slot_c", 8, NAME_LEN),
        Field::array("patchname_slot_d", 8, NAME_LEN),
        Field::nested("patch_data_a", EMBEDDED_PROGRAM_BITS, &PROGRAM),
        Field::nested("patch_data_b", EMBEDDED_PROGRAM_BITS, &PROGRAM),
        Field::nested("patch_data_c", EMBEDDED_PROGRAM_BITS, &PROGRAM),
        Field::nested("patch_data_d", EMBEDDED_PROGRAM_BITS, &PROGRAM),
        Field::uint("checksum", 8),
    ],
};

const _: () = assert!(PERFORMANCE.bit_len(0) == (PERFORMANCE_PAYLOAD_LEN * 8) as u32);

const SLOT_NAME_FIELDS: [&str; 4] = [
    "patchname_slot_a",
    "patchname_slot_b",
    "patchname_slot_c",
    "patchname_slot_d",
];

const SLOT_DATA_FIELDS: [&str; 4] = [
    "patch_data_a",
    "patch_data_b",
    "patch_data_c",
    "patch_data_d",
];

/// A Performance: four embedded Programs plus routing and mixing
#[derive(Debug, Clone, PartialEq)]
pub struct Performance {
    name: [u8; NAME_LEN],
    /// Not editable, kept so exports reproduce the header byte
    category: u8,
    version: Version,
    data: Record,
}

impl Performance {
    /// Performance with every parameter zeroed and the payload version set
    pub fn new(name: &str, version: Version) -> Result<Self, Nl3Error> {
        let mut data = Record::zeroed(&PERFORMANCE);
        data.set("version_number", Value::Uint(version.0.into()))?;
        Ok(Self {
            name: encode_name(name)?,
            category: 0,
            version,
            data,
        })
    }

    /// Decode a validated payload, taking metadata from the frame header
    pub fn decode(header: &Header, payload: &[u8]) -> Result<Self, Nl3Error> {
        Ok(Self {
            name: header.name,
            category: header.category,
            version: header.version,
            data: decode(&PERFORMANCE, payload)?,
        })
    }

    pub fn data_mut(&mut self) -> &mut Record {
        &mut self.data
    }

    /// Name stored for slot `slot` (0 = A)
    pub fn slot_name(&self, slot: usize) -> Option<String> {
        let raw = self.data.array(SLOT_NAME_FIELDS.get(slot)?)?;
        let mut name = [0u8; NAME_LEN];
        for (dst, src) in name.iter_mut().zip(raw) {
            *dst = *src as u8;
        }
        Some(printable_name(&name))
    }

    /// Embedded Program parameters for slot `slot` (0 = A)
    pub fn slot_program(&self, slot: usize) -> Option<&Record> {
        self.data.record(SLOT_DATA_FIELDS.get(slot)?)
    }

    pub fn slot_program_mut(&mut self, slot: usize) -> Option<&mut Record> {
        self.data.record_mut(SLOT_DATA_FIELDS.get(slot)?)
    }
}

impl Patch for Performance {
    fn kind(&self) -> PatchKind {
        PatchKind::Performance
    }

    fn name(&self) -> &[u8; NAME_LEN] {
        &self.name
    }

    fn category(&self) -> u8 {
        self.category
    }

    fn version(&self) -> Version {
        self.version
    }

    fn data(&self) -> &Record {
        &self.data
    }

    fn set_name(&mut self, name: &str) -> Result<(), Nl3Error> {
        self.name = encode_name(name)?;
        Ok(())
    }

    fn set_category(&mut self, _category: u8) -> Result<(), Nl3Error> {
        Err(Nl3Error::CategoryNotSupported)
    }

    fn printable_category(&self) -> String {
        "-".to_string()
    }
}
