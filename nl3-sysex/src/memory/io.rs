//! SysEx import and export for the patch store

use std::io::Read;
use std::ops::AddAssign;

use tracing::{debug, warn};

use super::patch_ref::{PatchRef, Source, linear_index};
use super::store::PatchStore;
use crate::BANK_SIZE;
use crate::error::{FrameIssue, Nl3Error};
use crate::patch::{AnyPatch, Patch, PatchKind};
use crate::sysex::{
    Header, MessageKind, assemble_frame, identify, packed_payload, scan, unpack_7to8, validate,
};

/// Frame counts from a bulk import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Frames decoded and stored
    pub valid: usize,
    /// Our frames that failed to validate, decode or store
    pub invalid: usize,
    /// Frames from other devices, skipped
    pub foreign: usize,
}

impl AddAssign for ImportSummary {
    fn add_assign(&mut self, other: Self) {
        self.valid += other.valid;
        self.invalid += other.invalid;
        self.foreign += other.foreign;
    }
}

impl PatchStore {
    // =========================================================================
    // Import
    // =========================================================================

    /// Decode one raw frame and store it at the location its header names.
    ///
    /// Returns `Ok(None)` for frames that are not ours. Slot frames always
    /// overwrite; occupied memory locations are refused unless `overwrite`.
    pub fn import_frame(&mut self, raw: &[u8], overwrite: bool) -> Result<Option<PatchRef>, Nl3Error> {
        let Some(header) = identify(raw)? else {
            return Ok(None);
        };

        let decoded = unpack_7to8(packed_payload(raw));
        validate(header.message_kind, &decoded)?;
        let Some(message) = header.kind() else {
            return Err(Nl3Error::InvalidFrame(vec![FrameIssue::UnknownMessageKind(
                header.message_kind,
            )]));
        };

        let kind = message.patch_kind();
        let dest = match message.source() {
            Source::StagingSlot => {
                let slot = match kind {
                    PatchKind::Program => header.location as usize,
                    PatchKind::Performance => 0,
                };
                PatchRef::new(kind, Source::StagingSlot, slot)
            }
            Source::Memory => PatchRef::new(
                kind,
                Source::Memory,
                linear_index(header.bank as usize, header.location as usize),
            ),
        };
        if !dest.valid() || (header.location as usize) >= BANK_SIZE {
            return Err(Nl3Error::InvalidLocation(dest));
        }

        let patch = AnyPatch::decode(kind, &header, &decoded)?;
        if dest.source == Source::Memory && !overwrite && self.is_occupied(dest) {
            return Err(Nl3Error::DestinationOccupied(dest));
        }

        debug!(
            "Loaded {dest}: {} v{} category 0x{:02X}",
            patch.as_patch().printable_name(),
            header.version,
            header.category,
        );
        self.set(dest, patch)?;
        Ok(Some(dest))
    }

    /// Import every frame in `stream`. Bad frames are counted and skipped.
    pub fn import_bytes(&mut self, stream: &[u8], overwrite: bool) -> ImportSummary {
        let mut summary = ImportSummary::default();

        for (n, frame) in scan(stream).enumerate() {
            match self.import_frame(frame, overwrite) {
                Ok(Some(_)) => summary.valid += 1,
                Ok(None) => summary.foreign += 1,
                Err(e) => {
                    warn!(frame = n, error = %e, "Skipping invalid frame");
                    summary.invalid += 1;
                }
            }
        }

        debug!(
            valid = summary.valid,
            invalid = summary.invalid,
            foreign = summary.foreign,
            "Finished parsing"
        );
        summary
    }

    /// Read `reader` to the end and import it
    pub fn import_reader<R: Read>(
        &mut self,
        mut reader: R,
        overwrite: bool,
    ) -> Result<ImportSummary, Nl3Error> {
        let mut stream = Vec::new();
        reader.read_to_end(&mut stream)?;
        Ok(self.import_bytes(&stream, overwrite))
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// One complete frame for the patch at `patch_ref`.
    ///
    /// Slot patches are written with bank 0 and the slot index as location.
    pub fn export_ref(&self, patch_ref: PatchRef) -> Result<Vec<u8>, Nl3Error> {
        let patch = self.get(patch_ref)?;
        let payload = patch.encode_payload()?;

        let (bank, location) = match patch_ref.source {
            Source::Memory => (patch_ref.bank(), patch_ref.location()),
            Source::StagingSlot => (0, patch_ref.index),
        };
        let header = Header {
            destination: self.destination_id(),
            message_kind: MessageKind::new(patch_ref.kind, patch_ref.source).as_byte(),
            bank: bank as u8,
            location: location as u8,
            name: *patch.name(),
            category: patch.category(),
            version: patch.version(),
        };

        assemble_frame(&header, &payload)
    }

    /// Every occupied location of one bank, concatenated
    pub fn export_bank(&self, kind: PatchKind, bank: usize) -> Result<Vec<u8>, Nl3Error> {
        let first = PatchRef::new(kind, Source::Memory, linear_index(bank, 0));
        if !first.valid() {
            return Err(Nl3Error::InvalidLocation(first));
        }
        let refs = self
            .occupied(kind, Source::Memory)
            .filter(|r| r.bank() == bank)
            .collect::<Vec<_>>();
        self.export_refs(&refs)
    }

    /// Every occupied memory location of `kind`
    pub fn export_all(&self, kind: PatchKind) -> Result<Vec<u8>, Nl3Error> {
        let refs = self.occupied(kind, Source::Memory).collect::<Vec<_>>();
        self.export_refs(&refs)
    }

    /// Every occupied staging slot of `kind`
    pub fn export_slots(&self, kind: PatchKind) -> Result<Vec<u8>, Nl3Error> {
        let refs = self.occupied(kind, Source::StagingSlot).collect::<Vec<_>>();
        self.export_refs(&refs)
    }

    fn export_refs(&self, refs: &[PatchRef]) -> Result<Vec<u8>, Nl3Error> {
        if refs.is_empty() {
            return Err(Nl3Error::NoDataToWrite);
        }

        let mut out = Vec::new();
        for patch_ref in refs {
            out.extend_from_slice(&self.export_ref(*patch_ref)?);
        }
        debug!(frames = refs.len(), bytes = out.len(), "Exported patches");
        Ok(out)
    }
}
