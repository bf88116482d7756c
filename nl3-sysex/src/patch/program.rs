//! Program schema and patch type

use super::{Patch, PatchKind, Version, category_name, encode_name};
use crate::bits::{Field, Record, Schema, Value, decode};
use crate::error::Nl3Error;
use crate::sysex::Header;
use crate::{EMBEDDED_PROGRAM_BITS, NAME_LEN, PROGRAM_PAYLOAD_LEN};

/// Signed offsets applied when a morph source is fully engaged
pub static MORPH: Schema = Schema {
    name: "MorphParams",
    fields: &[
        Field::int("lfo1_rate", 8),
        Field::int("lfo1_amount", 8),
        Field::int("lfo2_rate", 8),
        Field::int("lfo2_amount", 8),
        Field::int("mod_env_attack", 8),
        Field::int("mod_env_decay_release", 8),
        Field::int("mod_env_amount", 8),
        Field::int("osc2_fine_pitch", 8),
        Field::int("osc2_coarse_pitch", 8),
        Field::int("oscmod", 8),
        Field::int("oscmix", 8),
        Field::int("osc1_shape", 8),
        Field::int("osc2_shape", 8),
        Field::int("amp_env_attack", 8),
        Field::int("amp_env_decay", 8),
        Field::int("amp_env_sustain", 8),
        Field::int("amp_env_release", 8),
        Field::int("filt_env_attack", 8),
        Field::int("filt_env_decay", 8),
        Field::int("filt_env_sustain", 8),
        Field::int("filt_env_release", 8),
        Field::int("filt_env_amount", 8),
        Field::int("filt_frequency1", 8),
        Field::int("filt_frequency2", 8),
        Field::int("filt_resonance", 8),
        Field::int("output_level", 8),
    ],
};

/// Program payload, MSB first.
///
/// `version_number` and `checksum` exist only in a standalone Program; the
/// copies embedded in a Performance start at `osc1_shape` and end at `spare8`.
/// The chord memory note table and `spare9`..`spare12` have not been checked
/// against hardware dumps.
pub static PROGRAM: Schema = Schema {
    name: "Program",
    fields: &[
        Field::uint("version_number", 16).top_level_only(),
        Field::uint("osc1_shape", 7),
        Field::uint("osc2_coarse_pitch", 7),
        Field::uint("osc2_fine_pitch", 7),
        Field::uint("osc2_shape", 7),
        Field::uint("oscmix", 7),
        Field::uint("oscmod", 7),
        Field::uint("lfo1_rate", 7),
        Field::uint("lfo1_amount", 7),
        Field::uint("lfo2_rate", 7),
        Field::uint("lfo2_amount", 7),
        Field::uint("amp_env_attack", 7),
        Field::uint("amp_env_decay", 7),
        Field::uint("amp_env_sustain", 7),
        Field::uint("amp_env_release", 7),
        Field::uint("output_level", 7),
        Field::uint("filt_env_attack", 7),
        Field::uint("filt_env_decay", 7),
        Field::uint("filt_env_sustain", 7),
        Field::uint("filt_env_release", 7),
        Field::uint("mod_env_attack", 7),
        Field::uint("mod_env_decay_release", 7),
        Field::uint("mod_env_amount", 7),
        Field::uint("filt_env_amount", 7),
        Field::uint("filt_frequency1", 7),
        Field::uint("filt_resonance", 7),
        Field::uint("filt_frequency2", 7),
        Field::uint("unison_amount", 7),
        Field::uint("filt_dist_amount", 7),
        Field::uint("osc1_sync_tune", 7),
        Field::uint("osc2_sync_tune", 7),
        Field::uint("osc1_noise_seed", 7),
        Field::uint("osc2_noise_seed", 7),
        Field::uint("osc1_modulator_amount", 7),
        Field::uint("osc2_modulator_amount", 7),
        Field::uint("osc2_carrier_pitch", 7),
        Field::uint("osc2_noise_type", 7),
        Field::uint("osc2_modulator_pitch", 7),
        Field::uint("osc2_noise_frequency", 7),
        Field::uint("spare1", 8),
        Field::uint("spare2", 8),
        Field::uint("glide_rate", 7),
        Field::uint("arpeggio_rate", 7),
        Field::uint("vibrato_rate", 7),
        Field::uint("vibrato_amount", 7),
        Field::uint("arpeggio_sync_divisor", 7),
        Field::uint("lfo1_sync_divisor", 7),
        Field::uint("lfo2_sync_divisor", 7),
        Field::uint("transpose", 7),
        Field::uint("spare3", 8),
        Field::uint("spare4", 8),
        Field::uint("osc1_waveform", 3),
        Field::flag("osc1_sync"),
        Field::uint("osc2_waveform", 3),
        Field::flag("osc2_sync"),
        Field::flag("osc2_kbt"),
        Field::flag("osc2_partial"),
        Field::uint("oscmod_type", 3),
        Field::uint("lfo1_waveform", 3),
        Field::uint("lfo1_destination", 4),
        Field::uint("lfo1_env_kbs", 2),
        Field::flag("lfo1_mono"),
        Field::flag("lfo1_invert"),
        Field::uint("lfo2_waveform", 3),
        Field::uint("lfo2_destination", 4),
        Field::uint("lfo2_env_kbs", 2),
        Field::flag("lfo2_mono"),
        Field::flag("lfo2_invert"),
        Field::flag("mod_env_invert"),
        Field::uint("mod_env_destination", 4),
        Field::flag("mod_env_mode"),
        Field::flag("mod_env_repeat"),
        Field::uint("filt1_type", 3),
        Field::uint("filt1_slope", 2),
        Field::flag("filt_env_velocity"),
        Field::flag("filt1_kbt"),
        Field::flag("filt_env_invert"),
        Field::flag("amp_env_exp_attack"),
        Field::flag("mod_env_exp_attack"),
        Field::flag("filt_env_exp_attack"),
        Field::flag("filt_mode"),
        Field::flag("filt2_env"),
        Field::uint("filt2_type", 3),
        Field::flag("filt_bypass"),
        Field::flag("lfo1_clocksync"),
        Field::flag("lfo2_clocksync"),
        Field::flag("arpeggiator_clocksync"),
        Field::flag("oscmix_noise"),
        Field::uint("glide_mode", 2),
        Field::uint("vibrato_source", 2),
        Field::flag("mono_mode"),
        Field::flag("arpeggio_run"),
        Field::uint("spare5", 8),
        Field::flag("unison_mode"),
        Field::uint("octave_shift", 3),
        Field::flag("chord_mem_mode"),
        Field::uint("arpeggio_mode", 3),
        Field::uint("arpeggio_range", 3),
        Field::flag("arpeggio_kbd_sync"),
        Field::uint("spare6", 8),
        Field::flag("spare7"),
        Field::flag("legato_mode"),
        Field::uint("mono_allocation_mode", 2),
        Field::nested("wheel_morph_params", 208, &MORPH),
        Field::nested("a_touch_morph_params", 208, &MORPH),
        Field::nested("velocity_morph_params", 208, &MORPH),
        Field::nested("kbd_morph_params", 208, &MORPH),
        Field::uint("chord_mem_count", 5),
        Field::uint("chord_mem_position", 8),
        Field::array("chord_mem_notes", 7, 24),
        Field::uint("spare9", 8),
        Field::uint("spare10", 8),
        Field::uint("spare11", 8),
        Field::uint("spare12", 4),
        Field::uint("spare8", 8),
        Field::uint("checksum", 8).top_level_only(),
    ],
};

const _: () = assert!(MORPH.bit_len(1) == 208);
const _: () = assert!(PROGRAM.bit_len(0) == (PROGRAM_PAYLOAD_LEN * 8) as u32);
const _: () = assert!(PROGRAM.bit_len(1) == EMBEDDED_PROGRAM_BITS);

/// A standalone Program
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    name: [u8; NAME_LEN],
    category: u8,
    version: Version,
    data: Record,
}

impl Program {
    /// Program with every parameter zeroed and the payload version set
    pub fn new(name: &str, version: Version) -> Result<Self, Nl3Error> {
        let mut data = Record::zeroed(&PROGRAM);
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
            data: decode(&PROGRAM, payload)?,
        })
    }

    pub fn data_mut(&mut self) -> &mut Record {
        &mut self.data
    }
}

impl Patch for Program {
    fn kind(&self) -> PatchKind {
        PatchKind::Program
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

    fn set_category(&mut self, category: u8) -> Result<(), Nl3Error> {
        if category_name(category).is_none() {
            return Err(Nl3Error::InvalidCategory(category));
        }
        self.category = category;
        Ok(())
    }

    fn printable_category(&self) -> String {
        match category_name(self.category) {
            Some(name) => name.to_string(),
            None => format!("Unknown (0x{:02X})", self.category),
        }
    }
}
