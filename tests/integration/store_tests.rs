//! Pattern store persistence tests against the in-memory NVS mock:
//! image layout, reboot survival, and marker-driven re-initialisation.

use super::mock_hw::MemNvs;

use printlock::app::ports::StoragePort;
use printlock::store::{Pattern, PatternStore, SlotId, EMPTY, INIT_MARKER, TABLE_SLOTS};

const IMAGE_LEN: usize = 1 + TABLE_SLOTS;

fn read_image(nvs: &MemNvs) -> [u8; IMAGE_LEN] {
    let mut image = [0u8; IMAGE_LEN];
    let n = nvs.read("printlock", "table", &mut image).unwrap();
    assert_eq!(n, IMAGE_LEN, "persisted image must be marker + 128 slots");
    image
}

#[test]
fn first_open_writes_marker_and_empty_table() {
    let mut nvs = MemNvs::new();
    PatternStore::open(&mut nvs).unwrap();

    let image = read_image(&nvs);
    assert_eq!(image[0], INIT_MARKER);
    assert!(image[1..].iter().all(|&b| b == EMPTY));
}

#[test]
fn slots_are_addressed_directly_by_id() {
    let mut nvs = MemNvs::new();
    let mut store = PatternStore::open(&mut nvs).unwrap();

    store.enroll(&mut nvs, SlotId::clamped(0), Pattern::new(0x01));
    store.enroll(&mut nvs, SlotId::clamped(64), Pattern::new(0x40));
    store.enroll(&mut nvs, SlotId::clamped(127), Pattern::new(0x7F));

    let image = read_image(&nvs);
    assert_eq!(image[1], 0x01);
    assert_eq!(image[1 + 64], 0x40);
    assert_eq!(image[1 + 127], 0x7F);
}

#[test]
fn table_survives_power_cycle() {
    let mut nvs = MemNvs::new();
    {
        let mut store = PatternStore::open(&mut nvs).unwrap();
        store.enroll(&mut nvs, SlotId::clamped(12), Pattern::new(0x2A));
        store.enroll(&mut nvs, SlotId::clamped(13), Pattern::new(0x2B));
        store.delete(&mut nvs, SlotId::clamped(13));
    }

    // "Reboot": fresh open over the same storage.
    let store = PatternStore::open(&mut nvs).unwrap();
    assert_eq!(store.lookup(Pattern::new(0x2A)), Some(SlotId::clamped(12)));
    assert_eq!(store.lookup(Pattern::new(0x2B)), None);
    assert_eq!(store.table().occupied(), 1);
}

#[test]
fn marker_mismatch_reinitialises() {
    let mut nvs = MemNvs::new();
    {
        let mut store = PatternStore::open(&mut nvs).unwrap();
        store.enroll(&mut nvs, SlotId::clamped(1), Pattern::new(0x11));
    }

    // Corrupt the marker byte in place.
    let mut image = read_image(&nvs);
    image[0] = !INIT_MARKER;
    nvs.write("printlock", "table", &image).unwrap();

    let store = PatternStore::open(&mut nvs).unwrap();
    assert_eq!(store.table().occupied(), 0);
    assert_eq!(read_image(&nvs)[0], INIT_MARKER);
}

#[test]
fn truncated_image_reinitialises() {
    let mut nvs = MemNvs::new();
    nvs.write("printlock", "table", &[INIT_MARKER, 0x01, 0x02])
        .unwrap();

    let store = PatternStore::open(&mut nvs).unwrap();
    assert_eq!(store.table().occupied(), 0);
    assert_eq!(read_image(&nvs).len(), IMAGE_LEN);
}
