use super::*;

fn frame(id: i32, x1: f32, y1: f32, x2: f32, y2: f32) -> TrackedFrame {
    TrackedFrame {
        id,
        rotation: 0.0,
        bounding_box: CornerBox { x1, y1, x2, y2 },
    }
}

#[rustfmt::skip]
fn hand_encoded_single_frame() -> Vec<u8> {
    vec![
        0x0A, 0x1D,                         // Tracker.frame, 29 bytes
        0x08, 0x0A,                         //   id = 10
        0x15, 0x00, 0x00, 0x00, 0x00,       //   rotation = 0.0
        0x1A, 0x14,                         //   bounding_box, 20 bytes
        0x0D, 0x00, 0x00, 0x80, 0x3E,       //     x1 = 0.25
        0x15, 0x00, 0x00, 0x00, 0x3F,       //     y1 = 0.5
        0x1D, 0x00, 0x00, 0x40, 0x3F,       //     x2 = 0.75
        0x25, 0x00, 0x00, 0x80, 0x3F,       //     y2 = 1.0
    ]
}

#[test]
fn decodes_protobuf_layout() {
    let file = TrackingFile::decode(&hand_encoded_single_frame()).unwrap();
    assert_eq!(file.frames, vec![frame(10, 0.25, 0.5, 0.75, 1.0)]);
    assert_eq!(file.last_updated, None);
}

#[test]
fn encoder_matches_hand_encoded_bytes() {
    let file = TrackingFile {
        frames: vec![frame(10, 0.25, 0.5, 0.75, 1.0)],
        last_updated: None,
    };
    assert_eq!(file.encode().unwrap(), hand_encoded_single_frame());
}

#[test]
fn empty_input_is_a_file_without_frames() {
    let file = TrackingFile::decode(&[]).unwrap();
    assert!(file.frames.is_empty());
}

#[test]
fn negative_ids_and_timestamp_survive_encoding() {
    let ts = Timestamp {
        seconds: 1_600_000_000,
        nanos: 250_000_000,
    };
    let file = TrackingFile {
        frames: vec![frame(-3, 0.1, 0.1, 0.2, 0.2), frame(7, -0.5, 0.0, 0.1, 0.1)],
        last_updated: Some(ts),
    };
    let back = TrackingFile::decode(&file.encode().unwrap()).unwrap();
    assert_eq!(back, file);
    let dt = back.last_updated.unwrap().to_datetime().unwrap();
    assert_eq!(dt.timestamp(), 1_600_000_000);
    assert_eq!(Timestamp::from_datetime(dt), ts);
}

#[test]
fn unknown_fields_are_skipped() {
    let mut bytes = vec![
        0x18, 0x96, 0x01, // field 3 varint
        0x25, 0x01, 0x02, 0x03, 0x04, // field 4 fixed32
        0x29, 0, 0, 0, 0, 0, 0, 0, 0, // field 5 fixed64
        0x32, 0x02, 0xAA, 0xBB, // field 6 bytes
    ];
    bytes.extend(hand_encoded_single_frame());
    let file = TrackingFile::decode(&bytes).unwrap();
    assert_eq!(file.frames.len(), 1);
}

#[test]
fn truncated_input_is_an_error() {
    let bytes = hand_encoded_single_frame();
    let err = TrackingFile::decode(&bytes[..bytes.len() - 3]).unwrap_err();
    assert!(matches!(err, TrackerError::TrackingData(_)));
    assert!(err.to_string().contains("truncated"));
}

#[test]
fn garbage_is_rejected() {
    assert!(TrackingFile::decode(b"not a tracker file").is_err());
    assert!(TrackingFile::decode(&[0xFF; 12]).is_err());
    // group wire types are not supported
    assert!(TrackingFile::decode(&[0x0B]).is_err());
    // field number zero
    assert!(TrackingFile::decode(&[0x00, 0x00]).is_err());
}

#[test]
fn known_field_with_wrong_wire_type_is_rejected() {
    // Tracker.frame sent as a varint
    let err = TrackingFile::decode(&[0x08, 0x01]).unwrap_err();
    assert!(err.to_string().contains("wire type"));
}

#[test]
fn negative_nanos_do_not_convert() {
    let ts = Timestamp {
        seconds: 0,
        nanos: -1,
    };
    assert!(ts.to_datetime().is_none());
}
