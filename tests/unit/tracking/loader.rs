use super::*;
use crate::tracking::wire::{CornerBox, Timestamp};

fn record(id: i32, x1: f32, y1: f32, x2: f32, y2: f32) -> TrackedFrame {
    TrackedFrame {
        id,
        rotation: 0.0,
        bounding_box: CornerBox { x1, y1, x2, y2 },
    }
}

fn write_file(dir: &tempfile::TempDir, name: &str, file: &TrackingFile) -> std::path::PathBuf {
    let path = dir.path().join(name);
    save_tracking_file(&path, file).unwrap();
    path
}

#[test]
fn load_converts_corners_to_origin_and_extent() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "one.data",
        &TrackingFile {
            frames: vec![record(10, 0.25, 0.5, 0.75, 1.0)],
            last_updated: None,
        },
    );

    let mut store = TrackStore::new();
    let summary = load_tracking_file(&path, &mut store).unwrap();
    assert_eq!(summary.accepted, 1);
    let b = store.get_value(FrameIndex(10));
    assert_eq!((b.cx, b.cy, b.width, b.height), (0.25, 0.5, 0.5, 0.5));
}

#[test]
fn negative_records_are_filtered() {
    let frames = vec![
        record(1, 0.1, 0.1, 0.2, 0.2),
        record(2, -0.1, 0.1, 0.2, 0.2),
        record(3, 0.1, 0.1, 0.2, -0.2),
        record(4, 0.3, 0.3, 0.4, 0.4),
        record(-5, 0.3, 0.3, 0.4, 0.4),
        record(6, f32::NAN, 0.3, 0.4, 0.4),
    ];
    let file = TrackingFile {
        frames,
        last_updated: None,
    };

    let mut store = TrackStore::new();
    let summary = populate_store(&file, &mut store);
    assert_eq!(summary.records, 6);
    assert_eq!(summary.accepted, 2);
    assert_eq!(summary.skipped, 4);
    assert_eq!(store.len(), 2);
    assert!(store.contains(FrameIndex(1)) && store.contains(FrameIndex(4)));
}

#[test]
fn reversed_corners_yield_non_negative_extent() {
    let file = TrackingFile {
        frames: vec![record(3, 0.8, 0.6, 0.2, 0.1)],
        last_updated: None,
    };
    let mut store = TrackStore::new();
    populate_store(&file, &mut store);
    let b = store.get_value(FrameIndex(3));
    assert!((b.cx - 0.2).abs() < 1e-6 && (b.cy - 0.1).abs() < 1e-6);
    assert!(b.width > 0.0 && b.height > 0.0);
}

#[test]
fn empty_file_loads_as_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.data");
    std::fs::write(&path, b"").unwrap();

    let mut store = TrackStore::new();
    store.add_box(FrameIndex(1), 0.0, 0.0, 0.1, 0.1);
    let summary = load_tracking_file(&path, &mut store).unwrap();
    assert_eq!(summary.records, 0);
    assert!(store.is_empty());
}

#[test]
fn load_is_a_full_replace() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        &dir,
        "b.data",
        &TrackingFile {
            frames: vec![record(7, 0.1, 0.1, 0.2, 0.2)],
            last_updated: None,
        },
    );
    let mut store = TrackStore::new();
    store.add_box(FrameIndex(100), 0.0, 0.0, 0.1, 0.1);
    load_tracking_file(&path, &mut store).unwrap();
    assert!(!store.contains(FrameIndex(100)));
    assert!(store.contains(FrameIndex(7)));
}

#[test]
fn missing_file_fails_and_leaves_store_empty() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = TrackStore::new();
    store.add_box(FrameIndex(1), 0.0, 0.0, 0.1, 0.1);
    let err = load_tracking_file(&dir.path().join("nope.data"), &mut store).unwrap_err();
    assert!(matches!(err, TrackerError::TrackingData(_)));
    assert!(store.is_empty());
}

#[test]
fn corrupt_file_fails_and_leaves_store_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.data");
    std::fs::write(&path, [0x0A, 0x40, 0x08]).unwrap();
    let mut store = TrackStore::new();
    store.add_box(FrameIndex(1), 0.0, 0.0, 0.1, 0.1);
    let err = load_tracking_file(&path, &mut store).unwrap_err();
    assert!(err.to_string().contains("parse tracking file"));
    assert!(store.is_empty());
}

#[test]
fn last_updated_is_reported() {
    let file = TrackingFile {
        frames: vec![],
        last_updated: Some(Timestamp {
            seconds: 86_400,
            nanos: 0,
        }),
    };
    let mut store = TrackStore::new();
    let summary = populate_store(&file, &mut store);
    assert_eq!(
        summary.last_updated.map(|t| t.to_rfc3339()),
        Some("1970-01-02T00:00:00+00:00".to_string())
    );
}
