//! Tests for addressing, the patch store and import/export

use super::*;
use crate::error::Nl3Error;
use crate::patch::{AnyPatch, Patch, PatchKind, Performance, Program, Version};
use crate::sysex::{MessageKind, assemble_frame, identify};
use crate::testing::{first_difference, header, memory_frame, random_payload};
use crate::{NUM_PERFORMANCE_BANKS, NUM_PROGRAM_BANKS, PROGRAM_PAYLOAD_LEN};

fn program(name: &str) -> Program {
    Program::new(name, Version(118)).unwrap()
}

fn performance(name: &str) -> Performance {
    Performance::new(name, Version(118)).unwrap()
}

/// Bank 0 fully populated, like a factory bank dump
fn populated(kind: PatchKind) -> PatchStore {
    let mut store = PatchStore::new();
    for loc in 0..128 {
        let name = format!("Patch {loc:03}");
        let patch: AnyPatch = match kind {
            PatchKind::Program => program(&name).into(),
            PatchKind::Performance => performance(&name).into(),
        };
        store
            .set(PatchRef::new(kind, Source::Memory, linear_index(0, loc)), patch)
            .unwrap();
    }
    store
}

fn ref_list(kind: PatchKind, bank: usize, start: usize, count: usize) -> Vec<PatchRef> {
    (start..start + count)
        .map(|loc| PatchRef::new(kind, Source::Memory, linear_index(bank, loc)))
        .collect()
}

fn name_at(store: &PatchStore, patch_ref: PatchRef) -> String {
    store.get(patch_ref).unwrap().printable_name()
}

// =============================================================================
// Addressing
// =============================================================================

#[test]
fn test_bank_location_arithmetic() {
    assert_eq!(linear_index(2, 42), 298);
    assert_eq!(bank(298), 2);
    assert_eq!(location(298), 42);
    assert_eq!(MemoryLocation::new(2, 42).index(), 298);
}

#[test]
fn test_address_arithmetic_saturates() {
    assert_eq!(linear_index(usize::MAX, 0), usize::MAX);
    assert_eq!(linear_index(1, usize::MAX), usize::MAX);
    assert!(!PatchRef::program(usize::MAX, 3).valid());

    let last = PatchRef::new(PatchKind::Program, Source::Memory, usize::MAX);
    assert_eq!(last.offset(0), Some(last));
    assert_eq!(last.offset(1), None);
    assert_eq!(PatchRef::program(0, 1).offset(2), Some(PatchRef::program(0, 3)));
}

#[test]
fn test_validity_bounds() {
    use PatchKind::{Performance, Program};

    assert!(valid(Program, Source::Memory, NUM_PROGRAM_BANKS * 128 - 1));
    assert!(!valid(Program, Source::Memory, NUM_PROGRAM_BANKS * 128));
    assert!(valid(Performance, Source::Memory, NUM_PERFORMANCE_BANKS * 128 - 1));
    assert!(!valid(Performance, Source::Memory, NUM_PERFORMANCE_BANKS * 128));
    assert!(valid(Program, Source::StagingSlot, 3));
    assert!(!valid(Program, Source::StagingSlot, 4));
    assert!(valid(Performance, Source::StagingSlot, 0));
    assert!(!valid(Performance, Source::StagingSlot, 1));
}

#[test]
fn test_ref_display() {
    assert_eq!(
        PatchRef::program(2, 42).to_string(),
        "program in memory location 2:042"
    );
    assert_eq!(PatchRef::performance_slot(0).to_string(), "performance in slot 0");
    assert_eq!(MemoryLocation::new(1, 7).to_string(), "1:007");
}

// =============================================================================
// Get / set / delete
// =============================================================================

#[test]
fn test_get_errors() {
    let store = PatchStore::new();
    let bad = PatchRef::program(NUM_PROGRAM_BANKS, 0);
    assert!(matches!(store.get(bad), Err(Nl3Error::InvalidLocation(r)) if r == bad));

    let empty = PatchRef::program(0, 0);
    assert!(matches!(store.get(empty), Err(Nl3Error::Uninitialized(r)) if r == empty));
}

#[test]
fn test_set_checks_kind_and_bounds() {
    let mut store = PatchStore::new();
    assert!(matches!(
        store.set(PatchRef::performance(0, 0), program("Wrong")),
        Err(Nl3Error::KindMismatch {
            expected: PatchKind::Performance,
            actual: PatchKind::Program
        })
    ));
    assert!(matches!(
        store.set(PatchRef::program_slot(4), program("Nowhere")),
        Err(Nl3Error::InvalidLocation(_))
    ));
    assert_eq!(store, PatchStore::new());

    let target = PatchRef::program(3, 9);
    store.set(target, program("First")).unwrap();
    store.set(target, program("Second")).unwrap();
    assert_eq!(name_at(&store, target), "Second");
    assert_eq!(store.get_program(target).unwrap().printable_name(), "Second");
    assert!(store.get_performance(target).is_err());
}

#[test]
fn test_delete_is_idempotent() {
    let mut store = populated(PatchKind::Program);
    let target = MemoryLocation::new(0, 42);

    assert!(store.delete_program(target).is_some());
    assert!(store.delete_program(target).is_none());
    assert!(matches!(
        store.get(PatchRef::at(PatchKind::Program, target)),
        Err(Nl3Error::Uninitialized(_))
    ));
    assert!(store.delete(PatchRef::program(99, 0)).is_none());
}

#[test]
fn test_delete_performance() {
    let mut store = populated(PatchKind::Performance);
    assert!(store.delete_performance(MemoryLocation::new(0, 42)).is_some());
    assert!(!store.is_occupied(PatchRef::performance(0, 42)));
    assert!(store.is_occupied(PatchRef::performance(0, 43)));
}

// =============================================================================
// Copy
// =============================================================================

#[test]
fn test_copy_program_to_slot_overwrites() {
    let mut store = populated(PatchKind::Program);

    store.copy_program_to_slot(MemoryLocation::new(0, 42), 1).unwrap();
    assert_eq!(name_at(&store, PatchRef::program_slot(1)), "Patch 042");

    store.copy_program_to_slot(MemoryLocation::new(0, 43), 1).unwrap();
    assert_eq!(name_at(&store, PatchRef::program_slot(1)), "Patch 043");

    let err = store
        .copy_program_to_slot(MemoryLocation::new(1, 42), 1)
        .unwrap_err();
    assert!(matches!(err, Nl3Error::Uninitialized(_)));
    assert_eq!(name_at(&store, PatchRef::program_slot(1)), "Patch 043");
}

#[test]
fn test_copy_slot_to_program_refuses_occupied_memory() {
    let mut store = populated(PatchKind::Program);
    store.copy_program_to_slot(MemoryLocation::new(0, 42), 1).unwrap();

    store.copy_slot_to_program(1, MemoryLocation::new(1, 42)).unwrap();
    assert_eq!(name_at(&store, PatchRef::program(1, 42)), "Patch 042");

    let err = store
        .copy_slot_to_program(1, MemoryLocation::new(0, 43))
        .unwrap_err();
    assert!(matches!(err, Nl3Error::DestinationOccupied(r) if r == PatchRef::program(0, 43)));
    assert_eq!(name_at(&store, PatchRef::program(0, 43)), "Patch 043");

    let err = store
        .copy_slot_to_program(0, MemoryLocation::new(2, 0))
        .unwrap_err();
    assert!(matches!(err, Nl3Error::Uninitialized(_)));
}

#[test]
fn test_copy_performance_through_slot() {
    let mut store = populated(PatchKind::Performance);

    store.copy_performance_to_slot(MemoryLocation::new(0, 42)).unwrap();
    store.copy_performance_to_slot(MemoryLocation::new(0, 43)).unwrap();
    assert_eq!(name_at(&store, PatchRef::performance_slot(0)), "Patch 043");

    store.copy_slot_to_performance(MemoryLocation::new(1, 42)).unwrap();
    assert_eq!(name_at(&store, PatchRef::performance(1, 42)), "Patch 043");

    store.delete(PatchRef::performance_slot(0));
    let err = store
        .copy_slot_to_performance(MemoryLocation::new(1, 43))
        .unwrap_err();
    assert!(matches!(err, Nl3Error::Uninitialized(_)));
}

#[test]
fn test_copy_is_deep_and_kind_checked() {
    let mut store = populated(PatchKind::Program);
    let src = PatchRef::program(0, 5);
    let dest = PatchRef::program(4, 5);

    store.copy(src, dest).unwrap();
    store.rename(dest, "Changed").unwrap();
    assert_eq!(name_at(&store, src), "Patch 005");
    assert_eq!(name_at(&store, dest), "Changed");

    assert!(matches!(
        store.copy(src, PatchRef::performance(0, 0)),
        Err(Nl3Error::KindMismatch { .. })
    ));
}

// =============================================================================
// Swap
// =============================================================================

#[test]
fn test_swap_occupied_and_empty() {
    let mut store = populated(PatchKind::Program);

    // Two occupied locations
    let a = PatchRef::program(0, 42);
    let b = PatchRef::program(0, 43);
    store.swap(a, b).unwrap();
    assert_eq!(name_at(&store, a), "Patch 043");
    assert_eq!(name_at(&store, b), "Patch 042");

    // Occupied with empty, then back
    let c = PatchRef::program(1, 42);
    store.swap(a, c).unwrap();
    assert!(!store.is_occupied(a));
    assert_eq!(name_at(&store, c), "Patch 043");
    store.swap(a, c).unwrap();
    assert_eq!(name_at(&store, a), "Patch 043");
    assert!(!store.is_occupied(c));
}

#[test]
fn test_swap_rejections_leave_store_unchanged() {
    let mut store = populated(PatchKind::Performance);
    let before = store.clone();
    let a = PatchRef::performance(0, 42);

    assert!(matches!(
        store.swap(a, PatchRef::program(1, 42)),
        Err(Nl3Error::KindMismatch { .. })
    ));
    assert!(matches!(
        store.swap(a, PatchRef::performance_slot(0)),
        Err(Nl3Error::SourceMismatch(..))
    ));
    assert!(matches!(
        store.swap(PatchRef::performance(NUM_PERFORMANCE_BANKS, 42), a),
        Err(Nl3Error::InvalidLocation(_))
    ));
    assert!(matches!(
        store.swap(a, PatchRef::performance(NUM_PERFORMANCE_BANKS, 42)),
        Err(Nl3Error::InvalidLocation(_))
    ));
    assert_eq!(store, before);
}

// =============================================================================
// Transfer
// =============================================================================

#[test]
fn test_move_programs_between_banks() {
    let mut store = populated(PatchKind::Program);
    let start = 42;
    let count = 27;

    let srcs = ref_list(PatchKind::Program, 0, start, count);
    let dest = PatchRef::program(1, start);
    let summaries: Vec<String> = srcs
        .iter()
        .map(|src| store.get(*src).unwrap().summary())
        .collect();
    store.transfer(&srcs, dest, TransferMode::Move).unwrap();

    for (i, src) in srcs.iter().enumerate() {
        assert!(!store.is_occupied(*src));
        let moved = store.get(dest.offset(i).unwrap()).unwrap();
        assert_eq!(moved.summary(), summaries[i]);
        assert_eq!(moved.printable_name(), format!("Patch {:03}", start + i));
    }

    // Back towards the end of memory, one past the last valid run
    let srcs = ref_list(PatchKind::Program, 1, start, count);
    let before = store.clone();
    let overflow = PatchRef::new(
        PatchKind::Program,
        Source::Memory,
        (NUM_PROGRAM_BANKS + 1) * 128 - count + 1,
    );
    let err = store
        .transfer(&srcs, overflow, TransferMode::Move)
        .unwrap_err();
    assert!(matches!(err, Nl3Error::MemoryOverflow { len: 27, .. }));
    assert_eq!(store, before);

    // Into the occupied end of bank 0
    let err = store
        .transfer(&srcs, PatchRef::program(0, 127), TransferMode::Move)
        .unwrap_err();
    assert!(matches!(err, Nl3Error::MemoryOccupied(r) if r == PatchRef::program(0, 127)));
    assert_eq!(store, before);
}

#[test]
fn test_move_run_that_just_fits() {
    let mut store = populated(PatchKind::Program);
    let srcs = ref_list(PatchKind::Program, 0, 0, 27);
    let last_fit = PatchRef::new(
        PatchKind::Program,
        Source::Memory,
        NUM_PROGRAM_BANKS * 128 - 27,
    );
    store.transfer(&srcs, last_fit, TransferMode::Move).unwrap();
    assert_eq!(
        name_at(&store, PatchRef::program(NUM_PROGRAM_BANKS - 1, 127)),
        "Patch 026"
    );
}

#[test]
fn test_transfer_to_unrepresentable_index() {
    let mut store = populated(PatchKind::Program);
    let before = store.clone();
    let srcs = ref_list(PatchKind::Program, 0, 0, 2);

    for index in [usize::MAX, usize::MAX - 1] {
        let dest = PatchRef::new(PatchKind::Program, Source::Memory, index);
        let err = store.transfer(&srcs, dest, TransferMode::Move).unwrap_err();
        assert!(matches!(err, Nl3Error::MemoryOverflow { len: 2, .. }));
    }
    assert_eq!(store, before);
}

#[test]
fn test_move_performances_overlapping_sources() {
    let mut store = populated(PatchKind::Performance);
    let start = 42;
    let count = 27;

    let srcs = ref_list(PatchKind::Performance, 0, start, count);
    store
        .transfer(&srcs, PatchRef::performance(1, start), TransferMode::Move)
        .unwrap();

    let srcs = ref_list(PatchKind::Performance, 1, start, count);
    let before = store.clone();

    let overflow = PatchRef::new(
        PatchKind::Performance,
        Source::Memory,
        (NUM_PERFORMANCE_BANKS + 1) * 128 - count + 1,
    );
    assert!(matches!(
        store.transfer(&srcs, overflow, TransferMode::Move),
        Err(Nl3Error::MemoryOverflow { .. })
    ));

    // Destination run overlaps the sources themselves
    let overlap = PatchRef::performance(1, start + count - 1);
    assert!(matches!(
        store.transfer(&srcs, overlap, TransferMode::Move),
        Err(Nl3Error::MemoryOccupied(r)) if r == overlap
    ));
    assert_eq!(store, before);
}

#[test]
fn test_transfer_source_checks() {
    let mut store = populated(PatchKind::Program);
    let before = store.clone();
    let dest = PatchRef::program(2, 0);

    let mixed = [PatchRef::program(0, 1), PatchRef::performance(0, 1)];
    assert!(matches!(
        store.transfer(&mixed, dest, TransferMode::Copy),
        Err(Nl3Error::KindMismatch { .. })
    ));

    let with_empty = [PatchRef::program(0, 1), PatchRef::program(1, 1)];
    assert!(matches!(
        store.transfer(&with_empty, dest, TransferMode::Copy),
        Err(Nl3Error::Uninitialized(_))
    ));

    let with_invalid = [PatchRef::program(0, 1), PatchRef::program(NUM_PROGRAM_BANKS, 1)];
    assert!(matches!(
        store.transfer(&with_invalid, dest, TransferMode::Copy),
        Err(Nl3Error::InvalidLocation(_))
    ));

    let duplicated = [PatchRef::program(0, 1), PatchRef::program(0, 1)];
    assert!(matches!(
        store.transfer(&duplicated, dest, TransferMode::Move),
        Err(Nl3Error::DuplicateSource(_))
    ));
    assert_eq!(store, before);

    // Copying the same source twice is fine
    store
        .transfer(&duplicated, dest, TransferMode::Copy)
        .unwrap();
    assert_eq!(name_at(&store, dest.offset(1).unwrap()), "Patch 001");
    assert!(store.is_occupied(PatchRef::program(0, 1)));
}

#[test]
fn test_transfer_empty_list_is_noop() {
    let mut store = populated(PatchKind::Program);
    let before = store.clone();
    store
        .transfer(&[], PatchRef::program(0, 0), TransferMode::Move)
        .unwrap();
    assert_eq!(store, before);
}

#[test]
fn test_move_patch_into_slot() {
    let mut store = populated(PatchKind::Program);
    store
        .move_patch(PatchRef::program(0, 9), PatchRef::program_slot(2))
        .unwrap();
    assert!(!store.is_occupied(PatchRef::program(0, 9)));
    assert_eq!(name_at(&store, PatchRef::program_slot(2)), "Patch 009");
}

// =============================================================================
// Listing
// =============================================================================

#[test]
fn test_summaries() {
    let mut store = PatchStore::new();
    store.set(PatchRef::program(2, 2), program("BladeRun ZON")).unwrap();

    let lines = store.summaries(PatchKind::Program, true);
    assert_eq!(lines, vec!["2:002 BladeRun ZON     (1.18)".to_string()]);

    let all = store.summaries(PatchKind::Program, false);
    assert_eq!(all.len(), NUM_PROGRAM_BANKS * 128);
    assert_eq!(all[0], "0:000 ** Uninitialized");
}

// =============================================================================
// Import / export
// =============================================================================

#[test]
fn test_import_memory_frame() {
    let mut store = PatchStore::new();
    let frame = memory_frame(PatchKind::Program, 2, 2, "BladeRun ZON", 9);

    let stored = store.import_frame(&frame, false).unwrap();
    assert_eq!(stored, Some(PatchRef::program(2, 2)));

    let patch = store.get(PatchRef::program(2, 2)).unwrap();
    assert_eq!(patch.printable_name(), "BladeRun ZON");
    assert_eq!(patch.version().as_f64(), 1.18);
    assert_eq!(patch.category(), 0x0B);
}

#[test]
fn test_import_refuses_occupied_memory_unless_overwrite() {
    let mut store = PatchStore::new();
    let first = memory_frame(PatchKind::Performance, 1, 3, "First", 1);
    let second = memory_frame(PatchKind::Performance, 1, 3, "Second", 2);

    store.import_frame(&first, false).unwrap();
    assert!(matches!(
        store.import_frame(&second, false),
        Err(Nl3Error::DestinationOccupied(_))
    ));
    assert_eq!(name_at(&store, PatchRef::performance(1, 3)), "First");

    store.import_frame(&second, true).unwrap();
    assert_eq!(name_at(&store, PatchRef::performance(1, 3)), "Second");
}

#[test]
fn test_import_slot_frames() {
    let mut store = PatchStore::new();
    let payload = random_payload(PROGRAM_PAYLOAD_LEN, 4);

    let hdr = header(MessageKind::ProgramFromSlot, 0, 2, "Slot C");
    let frame = assemble_frame(&hdr, &payload).unwrap();
    assert_eq!(
        store.import_frame(&frame, false).unwrap(),
        Some(PatchRef::program_slot(2))
    );
    // Slots always overwrite
    assert!(store.import_frame(&frame, false).is_ok());

    let hdr = header(MessageKind::ProgramFromSlot, 0, 4, "No Slot E");
    let frame = assemble_frame(&hdr, &payload).unwrap();
    assert!(matches!(
        store.import_frame(&frame, false),
        Err(Nl3Error::InvalidLocation(_))
    ));

    let perf = memory_frame(PatchKind::Performance, 0, 0, "Perf", 4);
    let mut perf_slot = perf.clone();
    perf_slot[4] = MessageKind::PerformanceFromSlot.as_byte();
    perf_slot[6] = 77;
    assert_eq!(
        store.import_frame(&perf_slot, false).unwrap(),
        Some(PatchRef::performance_slot(0))
    );
}

#[test]
fn test_import_foreign_and_kind_mismatched_frames() {
    let mut store = PatchStore::new();
    assert_eq!(store.import_frame(&[0xF0, 0x43, 0x10, 0x4C, 0xF7], false).unwrap(), None);

    // Program header, Performance-sized payload
    let mut frame = memory_frame(PatchKind::Performance, 0, 0, "Mismatch", 3);
    frame[4] = MessageKind::ProgramFromMemory.as_byte();
    let err = store.import_frame(&frame, false).unwrap_err();
    assert!(matches!(
        err.frame_issues(),
        [crate::FrameIssue::LengthMismatch { .. }]
    ));
    assert_eq!(store, PatchStore::new());
}

#[test]
fn test_import_bytes_counts_frames() {
    let mut stream = vec![0x00, 0x01];
    stream.extend(memory_frame(PatchKind::Program, 0, 1, "Good One", 1));
    stream.extend([0xF0, 0x41, 0x10, 0x42, 0xF7]);
    let mut bad = memory_frame(PatchKind::Program, 0, 2, "Bad One", 2);
    let n = bad.len();
    bad[n - 2] ^= 0x40;
    stream.extend(bad);
    stream.extend(memory_frame(PatchKind::Performance, 1, 127, "Good Two", 3));

    let mut store = PatchStore::new();
    let summary = store.import_bytes(&stream, false);
    assert_eq!(
        summary,
        ImportSummary {
            valid: 2,
            invalid: 1,
            foreign: 1
        }
    );
    assert!(store.is_occupied(PatchRef::program(0, 1)));
    assert!(!store.is_occupied(PatchRef::program(0, 2)));
    assert!(store.is_occupied(PatchRef::performance(1, 127)));

    let again = store.import_reader(&stream[..], true).unwrap();
    assert_eq!(again.valid, 2);
}

#[test]
fn test_export_ref_reproduces_frame() {
    for kind in [PatchKind::Program, PatchKind::Performance] {
        let frame = memory_frame(kind, 1, 100, "Round Trip", 21);
        let mut store = PatchStore::new();
        let stored = store.import_frame(&frame, false).unwrap().unwrap();

        let exported = store.export_ref(stored).unwrap();
        assert_eq!(first_difference(&frame, &exported), None, "{kind}");
    }
}

#[test]
fn test_export_slot_uses_slot_index_as_location() {
    let mut store = PatchStore::new().with_destination_id(0x00);
    store.set(PatchRef::program_slot(3), program("Slot D")).unwrap();

    let frame = store.export_ref(PatchRef::program_slot(3)).unwrap();
    let hdr = identify(&frame).unwrap().unwrap();
    assert_eq!(hdr.destination, 0x00);
    assert_eq!(hdr.kind(), Some(MessageKind::ProgramFromSlot));
    assert_eq!((hdr.bank, hdr.location), (0, 3));

    let mut copy = PatchStore::new();
    assert_eq!(
        copy.import_frame(&frame, false).unwrap(),
        Some(PatchRef::program_slot(3))
    );
}

#[test]
fn test_export_fresh_patch_versions_agree() {
    let mut store = PatchStore::new();
    store.set(PatchRef::program(0, 0), program("Fresh")).unwrap();
    store
        .set(PatchRef::performance(1, 5), performance("Fresh"))
        .unwrap();

    for (patch_ref, schema) in [
        (PatchRef::program(0, 0), &crate::patch::PROGRAM),
        (PatchRef::performance(1, 5), &crate::patch::PERFORMANCE),
    ] {
        let frame = store.export_ref(patch_ref).unwrap();
        let hdr = identify(&frame).unwrap().unwrap();
        let payload = crate::sysex::unpack_7to8(crate::sysex::packed_payload(&frame));
        let data = crate::bits::decode(schema, &payload).unwrap();
        assert_eq!(hdr.version, Version(118));
        assert_eq!(data.uint("version_number"), Some(u32::from(hdr.version.0)));
    }
}

#[test]
fn test_export_collections() {
    let mut store = PatchStore::new();
    assert!(matches!(
        store.export_all(PatchKind::Program),
        Err(Nl3Error::NoDataToWrite)
    ));

    store.set(PatchRef::program(0, 1), program("A")).unwrap();
    store.set(PatchRef::program(0, 2), program("B")).unwrap();
    store.set(PatchRef::program(5, 0), program("C")).unwrap();

    let bank0 = store.export_bank(PatchKind::Program, 0).unwrap();
    assert_eq!(crate::scan(&bank0).count(), 2);
    assert_eq!(crate::scan(&store.export_all(PatchKind::Program).unwrap()).count(), 3);
    assert!(matches!(
        store.export_bank(PatchKind::Program, 1),
        Err(Nl3Error::NoDataToWrite)
    ));
    assert!(matches!(
        store.export_bank(PatchKind::Program, NUM_PROGRAM_BANKS),
        Err(Nl3Error::InvalidLocation(_))
    ));
    assert!(matches!(
        store.export_slots(PatchKind::Program),
        Err(Nl3Error::NoDataToWrite)
    ));

    let mut reloaded = PatchStore::new();
    let summary = reloaded.import_bytes(&bank0, false);
    assert_eq!(summary.valid, 2);
    assert_eq!(name_at(&reloaded, PatchRef::program(0, 2)), "B");
}

#[test]
fn test_export_bank_out_of_range() {
    let store = populated(PatchKind::Program);
    for bank in [NUM_PROGRAM_BANKS, usize::MAX / 128, usize::MAX] {
        assert!(matches!(
            store.export_bank(PatchKind::Program, bank),
            Err(Nl3Error::InvalidLocation(_))
        ));
    }
}

#[test]
fn test_export_uninitialized() {
    let store = PatchStore::new();
    assert!(matches!(
        store.export_ref(PatchRef::performance(0, 1)),
        Err(Nl3Error::Uninitialized(_))
    ));
}
