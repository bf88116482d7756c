//! End-to-end import/export through the public API

use nl3_sysex::{
    Header, MessageKind, NAME_LEN, Nl3Error, PROGRAM_PAYLOAD_LEN, Patch, PatchKind, PatchRef,
    PatchStore, TransferMode, Version, assemble_frame, checksum8, identify, scan,
};

/// Payload with a recognisable ramp and a correct trailing checksum
fn payload(len: usize, salt: u8) -> Vec<u8> {
    let mut data: Vec<u8> = (0..len - 1)
        .map(|i| (i as u8).wrapping_mul(37).wrapping_add(salt))
        .collect();
    data.push(checksum8(&data));
    data
}

fn frame(kind: MessageKind, bank: u8, location: u8, name: &str, version: u16) -> Vec<u8> {
    let mut name_bytes = [0u8; NAME_LEN];
    name_bytes[..name.len()].copy_from_slice(name.as_bytes());
    let header = Header {
        destination: 0x7F,
        message_kind: kind.as_byte(),
        bank,
        location,
        name: name_bytes,
        category: 0x07,
        version: Version(version),
    };
    let len = kind.patch_kind().payload_len();
    assemble_frame(&header, &payload(len, bank ^ location)).unwrap()
}

#[test]
fn test_good_frame_then_corrupt_checksum() {
    let good = frame(MessageKind::ProgramFromMemory, 2, 2, "BladeRun ZON", 118);

    let mut corrupt = frame(MessageKind::ProgramFromMemory, 2, 3, "Broken", 118);
    // Flip a bit of the checksum byte inside the last packed group
    let n = corrupt.len();
    corrupt[n - 2] ^= 0x40;

    let mut dump = good.clone();
    dump.extend_from_slice(&corrupt);

    let mut store = PatchStore::new();
    let summary = store.import_bytes(&dump, false);
    assert_eq!(summary.valid, 1);
    assert_eq!(summary.invalid, 1);

    let patch = store.get(PatchRef::program(2, 2)).unwrap();
    assert_eq!(patch.printable_name(), "BladeRun ZON");
    assert_eq!(patch.version().as_f64(), 1.18);
    assert!(matches!(
        store.get(PatchRef::program(2, 3)),
        Err(Nl3Error::Uninitialized(_))
    ));
}

#[test]
fn test_bank_dump_round_trips_byte_for_byte() {
    let mut dump = Vec::new();
    for location in [0u8, 1, 17, 127] {
        dump.extend(frame(
            MessageKind::PerformanceFromMemory,
            1,
            location,
            &format!("Perf {location}"),
            120,
        ));
    }

    let mut store = PatchStore::new();
    assert_eq!(store.import_bytes(&dump, false).valid, 4);

    let exported = store.export_bank(PatchKind::Performance, 1).unwrap();
    assert_eq!(exported, dump);
}

#[test]
fn test_moved_patch_exports_at_new_location() {
    let dump = frame(MessageKind::ProgramFromMemory, 0, 10, "Mover", 118);
    let mut store = PatchStore::new();
    store.import_bytes(&dump, false);

    store
        .transfer(
            &[PatchRef::program(0, 10)],
            PatchRef::program(7, 127),
            TransferMode::Move,
        )
        .unwrap();

    let exported = store.export_all(PatchKind::Program).unwrap();
    let frames: Vec<&[u8]> = scan(&exported).collect();
    assert_eq!(frames.len(), 1);

    let header = identify(frames[0]).unwrap().unwrap();
    assert_eq!((header.bank, header.location), (7, 127));
    assert_eq!(&frames[0][41..], &dump[41..]);
}

#[test]
fn test_payload_length_constant() {
    assert_eq!(PatchKind::Program.payload_len(), PROGRAM_PAYLOAD_LEN);
}
