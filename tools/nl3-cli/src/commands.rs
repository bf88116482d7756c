//! Subcommand implementations

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use std::fs::File;
use std::path::{Path, PathBuf};

use nl3_sysex::{
    BANK_SIZE, ImportSummary, MemoryLocation, PatchKind, PatchRef, PatchStore, TransferMode,
};

use crate::config::Config;

/// Patch kind selector for the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Program,
    Performance,
}

impl From<KindArg> for PatchKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Program => PatchKind::Program,
            KindArg::Performance => PatchKind::Performance,
        }
    }
}

/// Parse `bank:location`, e.g. `1:042`
pub fn parse_location(s: &str) -> Result<MemoryLocation> {
    let (bank, location) = s
        .split_once(':')
        .with_context(|| format!("Expected bank:location, got {s:?}"))?;
    let bank = bank
        .trim()
        .parse()
        .with_context(|| format!("Invalid bank in {s:?}"))?;
    let location: usize = location
        .trim()
        .parse()
        .with_context(|| format!("Invalid location in {s:?}"))?;
    if location >= BANK_SIZE {
        bail!("Location {location} is out of range (0-{})", BANK_SIZE - 1);
    }
    Ok(MemoryLocation::new(bank, location))
}

/// Load every dump file into a fresh store
pub fn load_store(files: &[PathBuf], config: &Config, overwrite: bool) -> Result<PatchStore> {
    let mut store = PatchStore::new().with_destination_id(config.sysex.destination_id);
    let overwrite = overwrite || config.import.overwrite;
    let mut total = ImportSummary::default();

    for path in files {
        let file = File::open(path).with_context(|| format!("Failed to open {:?}", path))?;
        let summary = store
            .import_reader(file, overwrite)
            .with_context(|| format!("Failed to read {:?}", path))?;
        tracing::info!(
            "Loaded {:?}: {} valid, {} invalid, {} foreign",
            path,
            summary.valid,
            summary.invalid,
            summary.foreign
        );
        total += summary;
    }

    if files.len() > 1 {
        tracing::info!("Total: {} valid, {} invalid", total.valid, total.invalid);
    }
    Ok(store)
}

/// Listing lines for the selected kinds
pub fn summary(store: &PatchStore, kind: Option<KindArg>, omit_blank: bool) -> Vec<String> {
    let kinds = match kind {
        Some(kind) => vec![PatchKind::from(kind)],
        None => vec![PatchKind::Program, PatchKind::Performance],
    };

    let mut lines = Vec::new();
    for kind in kinds {
        let entries = store.summaries(kind, omit_blank);
        if entries.is_empty() && omit_blank {
            continue;
        }
        lines.push(format!("***** {}S *****", kind.to_string().to_uppercase()));
        lines.extend(entries);
    }
    lines
}

/// What to include in an export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    Bank(usize),
    Slots,
}

pub fn export(
    store: &PatchStore,
    kind: PatchKind,
    scope: ExportScope,
    output: &Path,
) -> Result<()> {
    let bytes = match scope {
        ExportScope::All => store.export_all(kind),
        ExportScope::Bank(bank) => store.export_bank(kind, bank),
        ExportScope::Slots => store.export_slots(kind),
    }
    .with_context(|| format!("Nothing exported for {kind} ({scope:?})"))?;

    std::fs::write(output, &bytes).with_context(|| format!("Failed to write {:?}", output))?;
    tracing::info!("Wrote {} bytes to {:?}", bytes.len(), output);
    Ok(())
}

/// Relocate `count` consecutive locations starting at `from` to `to`
pub fn transfer(
    store: &mut PatchStore,
    kind: PatchKind,
    from: MemoryLocation,
    count: usize,
    to: MemoryLocation,
    mode: TransferMode,
) -> Result<()> {
    let first = PatchRef::at(kind, from);
    let srcs = (0..count)
        .map(|i| first.offset(i))
        .collect::<Option<Vec<_>>>()
        .with_context(|| format!("{count} locations from {from} run past the end of memory"))?;
    let dest = PatchRef::at(kind, to);

    store
        .transfer(&srcs, dest, mode)
        .with_context(|| format!("{mode:?} of {count} {kind}s from {from} to {to} rejected"))?;
    tracing::info!("{mode:?}: {count} {kind}s from {from} to {to}");
    Ok(())
}
