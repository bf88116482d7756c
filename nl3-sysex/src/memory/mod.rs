//! Patch memory: addressing, the transactional store, and SysEx import/export

mod io;
mod patch_ref;
mod store;
#[cfg(test)]
mod tests;

pub use io::ImportSummary;
pub use patch_ref::{MemoryLocation, PatchRef, Source, bank, linear_index, location, valid};
pub use store::{PatchStore, TransferMode};
