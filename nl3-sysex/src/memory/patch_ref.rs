//! Patch addressing

use std::fmt;

use crate::BANK_SIZE;
use crate::patch::PatchKind;

/// Where a patch lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Persistent banked memory
    Memory,
    /// Transient working registers for the active patches
    StagingSlot,
}

/// Bank of a linear memory index
pub fn bank(index: usize) -> usize {
    index / BANK_SIZE
}

/// Location within the bank of a linear memory index
pub fn location(index: usize) -> usize {
    index % BANK_SIZE
}

/// Linear memory index of a bank/location pair. Saturates, so an
/// unrepresentable address stays out of range instead of wrapping.
pub fn linear_index(bank: usize, location: usize) -> usize {
    bank.saturating_mul(BANK_SIZE).saturating_add(location)
}

/// Whether `index` addresses an existing location for `kind` in `source`
pub fn valid(kind: PatchKind, source: Source, index: usize) -> bool {
    match source {
        Source::Memory => index < kind.num_banks() * BANK_SIZE,
        Source::StagingSlot => index < kind.num_slots(),
    }
}

/// A bank/location pair in persistent memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryLocation {
    pub bank: usize,
    pub location: usize,
}

impl MemoryLocation {
    pub fn new(bank: usize, location: usize) -> Self {
        Self { bank, location }
    }

    pub fn index(self) -> usize {
        linear_index(self.bank, self.location)
    }
}

impl fmt::Display for MemoryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{:03}", self.bank, self.location)
    }
}

/// Address of a patch: kind, source and linear index
///
/// A pure value; it says nothing about whether the location is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchRef {
    pub kind: PatchKind,
    pub source: Source,
    pub index: usize,
}

impl PatchRef {
    pub fn new(kind: PatchKind, source: Source, index: usize) -> Self {
        Self {
            kind,
            source,
            index,
        }
    }

    pub fn program(bank: usize, location: usize) -> Self {
        Self::new(PatchKind::Program, Source::Memory, linear_index(bank, location))
    }

    pub fn performance(bank: usize, location: usize) -> Self {
        Self::new(
            PatchKind::Performance,
            Source::Memory,
            linear_index(bank, location),
        )
    }

    pub fn program_slot(slot: usize) -> Self {
        Self::new(PatchKind::Program, Source::StagingSlot, slot)
    }

    pub fn performance_slot(slot: usize) -> Self {
        Self::new(PatchKind::Performance, Source::StagingSlot, slot)
    }

    pub fn at(kind: PatchKind, location: MemoryLocation) -> Self {
        Self::new(kind, Source::Memory, location.index())
    }

    pub fn bank(&self) -> usize {
        bank(self.index)
    }

    pub fn location(&self) -> usize {
        location(self.index)
    }

    pub fn valid(&self) -> bool {
        valid(self.kind, self.source, self.index)
    }

    /// The ref `n` locations further on, same kind and source.
    /// `None` if the index does not fit in a `usize`.
    pub fn offset(&self, n: usize) -> Option<Self> {
        let index = self.index.checked_add(n)?;
        Some(Self { index, ..*self })
    }
}

impl fmt::Display for PatchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Source::Memory => write!(
                f,
                "{} in memory location {}:{:03}",
                self.kind,
                self.bank(),
                self.location()
            ),
            Source::StagingSlot => write!(f, "{} in slot {}", self.kind, self.index),
        }
    }
}
