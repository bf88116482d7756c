//! In-memory patch store

use std::iter;

use tracing::debug;

use super::patch_ref::{MemoryLocation, PatchRef, Source};
use crate::error::Nl3Error;
use crate::patch::{AnyPatch, Patch, PatchKind, Performance, Program};
use crate::{BANK_SIZE, DEFAULT_DESTINATION_ID};

/// What [`PatchStore::transfer`] does with the sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    /// Sources stay in place
    Copy,
    /// Sources are emptied
    Move,
}

/// Occupancy cells for one patch kind
#[derive(Debug, Clone, PartialEq)]
struct Slots {
    memory: Vec<Option<AnyPatch>>,
    staging: Vec<Option<AnyPatch>>,
}

impl Slots {
    fn new(kind: PatchKind) -> Self {
        Self {
            memory: iter::repeat_with(|| None)
                .take(kind.num_banks() * BANK_SIZE)
                .collect(),
            staging: iter::repeat_with(|| None).take(kind.num_slots()).collect(),
        }
    }

    fn cells(&self, source: Source) -> &[Option<AnyPatch>] {
        match source {
            Source::Memory => &self.memory,
            Source::StagingSlot => &self.staging,
        }
    }

    fn cells_mut(&mut self, source: Source) -> &mut [Option<AnyPatch>] {
        match source {
            Source::Memory => &mut self.memory,
            Source::StagingSlot => &mut self.staging,
        }
    }
}

/// Every Program and Performance location, plus the staging slots
///
/// All mutation goes through `&mut self`. Operations validate before they
/// mutate, so a rejected call leaves the store unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchStore {
    programs: Slots,
    performances: Slots,
    destination_id: u8,
}

impl Default for PatchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchStore {
    pub fn new() -> Self {
        Self {
            programs: Slots::new(PatchKind::Program),
            performances: Slots::new(PatchKind::Performance),
            destination_id: DEFAULT_DESTINATION_ID,
        }
    }

    /// Destination byte written into exported frames
    pub fn with_destination_id(mut self, destination_id: u8) -> Self {
        self.destination_id = destination_id;
        self
    }

    pub fn destination_id(&self) -> u8 {
        self.destination_id
    }

    fn slots(&self, kind: PatchKind) -> &Slots {
        match kind {
            PatchKind::Program => &self.programs,
            PatchKind::Performance => &self.performances,
        }
    }

    fn slots_mut(&mut self, kind: PatchKind) -> &mut Slots {
        match kind {
            PatchKind::Program => &mut self.programs,
            PatchKind::Performance => &mut self.performances,
        }
    }

    fn cell(&self, patch_ref: PatchRef) -> Result<&Option<AnyPatch>, Nl3Error> {
        if !patch_ref.valid() {
            return Err(Nl3Error::InvalidLocation(patch_ref));
        }
        self.slots(patch_ref.kind)
            .cells(patch_ref.source)
            .get(patch_ref.index)
            .ok_or(Nl3Error::InvalidLocation(patch_ref))
    }

    fn cell_mut(&mut self, patch_ref: PatchRef) -> Result<&mut Option<AnyPatch>, Nl3Error> {
        if !patch_ref.valid() {
            return Err(Nl3Error::InvalidLocation(patch_ref));
        }
        self.slots_mut(patch_ref.kind)
            .cells_mut(patch_ref.source)
            .get_mut(patch_ref.index)
            .ok_or(Nl3Error::InvalidLocation(patch_ref))
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Patch at `patch_ref` as the store holds it
    pub fn get_any(&self, patch_ref: PatchRef) -> Result<&AnyPatch, Nl3Error> {
        self.cell(patch_ref)?
            .as_ref()
            .ok_or(Nl3Error::Uninitialized(patch_ref))
    }

    pub fn get(&self, patch_ref: PatchRef) -> Result<&dyn Patch, Nl3Error> {
        self.get_any(patch_ref).map(AnyPatch::as_patch)
    }

    pub fn get_program(&self, patch_ref: PatchRef) -> Result<&Program, Nl3Error> {
        match self.get_any(patch_ref)? {
            AnyPatch::Program(program) => Ok(program),
            other => Err(Nl3Error::KindMismatch {
                expected: PatchKind::Program,
                actual: other.kind(),
            }),
        }
    }

    pub fn get_performance(&self, patch_ref: PatchRef) -> Result<&Performance, Nl3Error> {
        match self.get_any(patch_ref)? {
            AnyPatch::Performance(performance) => Ok(performance),
            other => Err(Nl3Error::KindMismatch {
                expected: PatchKind::Performance,
                actual: other.kind(),
            }),
        }
    }

    /// True if `patch_ref` is valid and holds a patch
    pub fn is_occupied(&self, patch_ref: PatchRef) -> bool {
        matches!(self.cell(patch_ref), Ok(Some(_)))
    }

    /// Occupied refs of `kind` in `source`, in index order
    pub fn occupied(&self, kind: PatchKind, source: Source) -> impl Iterator<Item = PatchRef> + '_ {
        self.slots(kind)
            .cells(source)
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some())
            .map(move |(index, _)| PatchRef::new(kind, source, index))
    }

    // =========================================================================
    // Single-location edits
    // =========================================================================

    /// Store `patch` at `patch_ref`, replacing whatever was there
    pub fn set(&mut self, patch_ref: PatchRef, patch: impl Into<AnyPatch>) -> Result<(), Nl3Error> {
        let patch = patch.into();
        if patch.kind() != patch_ref.kind {
            return Err(Nl3Error::KindMismatch {
                expected: patch_ref.kind,
                actual: patch.kind(),
            });
        }
        *self.cell_mut(patch_ref)? = Some(patch);
        Ok(())
    }

    /// Empty `patch_ref`, returning what it held. Invalid refs are ignored.
    pub fn delete(&mut self, patch_ref: PatchRef) -> Option<AnyPatch> {
        self.cell_mut(patch_ref).ok()?.take()
    }

    /// Deep copy `src` to `dest`.
    ///
    /// Occupied memory destinations are refused; staging slots are overwritten.
    pub fn copy(&mut self, src: PatchRef, dest: PatchRef) -> Result<(), Nl3Error> {
        if src.kind != dest.kind {
            return Err(Nl3Error::KindMismatch {
                expected: dest.kind,
                actual: src.kind,
            });
        }

        let patch = self.get_any(src)?.clone();
        let cell = self.cell_mut(dest)?;
        if dest.source == Source::Memory && cell.is_some() {
            return Err(Nl3Error::DestinationOccupied(dest));
        }
        *cell = Some(patch);

        debug!(%src, %dest, "Copied patch");
        Ok(())
    }

    /// Move `src` to an empty `dest`
    pub fn move_patch(&mut self, src: PatchRef, dest: PatchRef) -> Result<(), Nl3Error> {
        self.transfer(&[src], dest, TransferMode::Move)
    }

    /// Exchange the contents of two locations of the same kind and source.
    /// Either side may be empty.
    pub fn swap(&mut self, a: PatchRef, b: PatchRef) -> Result<(), Nl3Error> {
        if a.kind != b.kind {
            return Err(Nl3Error::KindMismatch {
                expected: a.kind,
                actual: b.kind,
            });
        }
        if a.source != b.source {
            return Err(Nl3Error::SourceMismatch(a, b));
        }
        for patch_ref in [a, b] {
            if !patch_ref.valid() {
                return Err(Nl3Error::InvalidLocation(patch_ref));
            }
        }

        self.slots_mut(a.kind)
            .cells_mut(a.source)
            .swap(a.index, b.index);
        Ok(())
    }

    // =========================================================================
    // Block transfer
    // =========================================================================

    /// Copy or move `srcs[i]` to `dest + i`, all or nothing.
    ///
    /// Every source must be occupied and share `dest`'s kind, and every
    /// destination must exist and be empty, before anything is touched. A
    /// destination that is also a source counts as occupied.
    pub fn transfer(
        &mut self,
        srcs: &[PatchRef],
        dest: PatchRef,
        mode: TransferMode,
    ) -> Result<(), Nl3Error> {
        if srcs.is_empty() {
            return Ok(());
        }

        for src in srcs {
            if src.kind != dest.kind {
                return Err(Nl3Error::KindMismatch {
                    expected: dest.kind,
                    actual: src.kind,
                });
            }
        }

        for (i, src) in srcs.iter().enumerate() {
            self.get_any(*src)?;
            if mode == TransferMode::Move && srcs[..i].contains(src) {
                return Err(Nl3Error::DuplicateSource(*src));
            }
        }

        let targets = (0..srcs.len())
            .map(|i| dest.offset(i).filter(PatchRef::valid))
            .collect::<Option<Vec<_>>>()
            .ok_or(Nl3Error::MemoryOverflow {
                start: dest,
                len: srcs.len(),
            })?;

        for target in &targets {
            if self.is_occupied(*target) {
                return Err(Nl3Error::MemoryOccupied(*target));
            }
        }

        // Validated; nothing below can fail
        let mut patches = Vec::with_capacity(srcs.len());
        for src in srcs {
            let patch = match mode {
                TransferMode::Copy => self.get_any(*src)?.clone(),
                TransferMode::Move => self.delete(*src).ok_or(Nl3Error::Uninitialized(*src))?,
            };
            patches.push(patch);
        }
        for (target, patch) in targets.into_iter().zip(patches) {
            *self.cell_mut(target)? = Some(patch);
        }

        debug!(count = srcs.len(), %dest, ?mode, "Transferred patches");
        Ok(())
    }

    // =========================================================================
    // Conveniences
    // =========================================================================

    pub fn copy_program_to_slot(
        &mut self,
        location: MemoryLocation,
        slot: usize,
    ) -> Result<(), Nl3Error> {
        self.copy(
            PatchRef::at(PatchKind::Program, location),
            PatchRef::program_slot(slot),
        )
    }

    pub fn copy_slot_to_program(
        &mut self,
        slot: usize,
        location: MemoryLocation,
    ) -> Result<(), Nl3Error> {
        self.copy(
            PatchRef::program_slot(slot),
            PatchRef::at(PatchKind::Program, location),
        )
    }

    pub fn copy_performance_to_slot(&mut self, location: MemoryLocation) -> Result<(), Nl3Error> {
        self.copy(
            PatchRef::at(PatchKind::Performance, location),
            PatchRef::performance_slot(0),
        )
    }

    pub fn copy_slot_to_performance(&mut self, location: MemoryLocation) -> Result<(), Nl3Error> {
        self.copy(
            PatchRef::performance_slot(0),
            PatchRef::at(PatchKind::Performance, location),
        )
    }

    pub fn delete_program(&mut self, location: MemoryLocation) -> Option<AnyPatch> {
        self.delete(PatchRef::at(PatchKind::Program, location))
    }

    pub fn delete_performance(&mut self, location: MemoryLocation) -> Option<AnyPatch> {
        self.delete(PatchRef::at(PatchKind::Performance, location))
    }

    /// Rename the patch at `patch_ref`
    pub fn rename(&mut self, patch_ref: PatchRef, name: &str) -> Result<(), Nl3Error> {
        self.cell_mut(patch_ref)?
            .as_mut()
            .ok_or(Nl3Error::Uninitialized(patch_ref))?
            .as_patch_mut()
            .set_name(name)
    }

    /// One `bank:location name (version)` line per memory location
    pub fn summaries(&self, kind: PatchKind, omit_blank: bool) -> Vec<String> {
        self.slots(kind)
            .memory
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_some() || !omit_blank)
            .map(|(index, cell)| {
                let location = MemoryLocation::new(super::bank(index), super::location(index));
                match cell {
                    Some(patch) => format!("{location} {}", patch.as_patch().summary()),
                    None => format!("{location} ** Uninitialized"),
                }
            })
            .collect()
    }
}
