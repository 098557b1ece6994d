use super::*;
use crate::{
    animation::curve::CurvePoint,
    tracking::loader::save_tracking_file,
    tracking::wire::{CornerBox, TrackedFrame, TrackingFile},
};

fn write_tracking(dir: &tempfile::TempDir) -> String {
    let frames = [10, 20, 30]
        .into_iter()
        .map(|id| TrackedFrame {
            id,
            rotation: 0.0,
            bounding_box: CornerBox {
                x1: 0.25,
                y1: 0.25,
                x2: 0.5,
                y2: 0.5,
            },
        })
        .collect();
    let path = dir.path().join("track.data");
    save_tracking_file(
        &path,
        &TrackingFile {
            frames,
            last_updated: None,
        },
    )
    .unwrap();
    path.to_string_lossy().into_owned()
}

fn frames(t: &Tracker) -> Vec<u64> {
    t.track_store().iter().map(|(f, _)| f.0).collect()
}

#[test]
fn json_value_has_document_fields() {
    let v = Tracker::new().json_value().unwrap();
    assert_eq!(v["type"], "Tracker");
    assert_eq!(v["protobuf_data_path"], "");
    assert_eq!(v["BaseFPS"], json!({ "num": 30, "den": 1 }));
    assert_eq!(v["TimeScale"], 1.0);
    for key in ["delta_x", "delta_y", "scale_x", "scale_y", "rotation"] {
        assert!(v[key]["points"].is_array(), "{key}");
    }
    assert!(v.get("id").is_some() && v.get("layer").is_some());
}

#[test]
fn empty_document_changes_nothing() {
    let mut t = Tracker::new();
    let before = t.json().unwrap();
    t.set_json("{}").unwrap();
    t.set_json(r#"{ "TimeScale": null, "delta_x": null, "BaseFPS": null }"#)
        .unwrap();
    assert_eq!(t.json().unwrap(), before);
}

#[test]
fn fields_are_applied() {
    let mut t = Tracker::new();
    t.set_json_value(&json!({
        "id": "trk",
        "layer": 2,
        "BaseFPS": { "num": 24 },
        "delta_y": { "points": [ { "frame": 0, "value": 0.0 }, { "frame": 10, "value": 1.0 } ] },
    }))
    .unwrap();
    assert_eq!(t.base().id, "trk");
    assert_eq!(t.base().layer, 2);
    assert_eq!(t.base_fps(), Fps { num: 24, den: 1 });
    assert_eq!(t.track_store().base_fps(), Fps { num: 24, den: 1 });
    assert_eq!(t.params().delta_y.value_at(FrameIndex(5)), 0.5);
}

#[test]
fn malformed_document_fails_without_applying_anything() {
    let mut t = Tracker::new();
    let before = t.json().unwrap();

    let err = t
        .set_json_value(&json!({
            "id": "changed",
            "delta_x": { "points": [ { "frame": 0, "value": 0.7 } ] },
            "TimeScale": "fast",
        }))
        .unwrap_err();
    assert!(matches!(err, TrackerError::Config(_)));
    assert!(err.to_string().contains("invalid data types"));
    assert_eq!(t.json().unwrap(), before);

    assert!(matches!(
        t.set_json("{ not json").unwrap_err(),
        TrackerError::Config(_)
    ));
    assert!(matches!(
        t.set_json("[1, 2]").unwrap_err(),
        TrackerError::Config(_)
    ));
    assert!(t.set_json(r#"{ "BaseFPS": 30 }"#).is_err());
    assert!(t.set_json(r#"{ "BaseFPS": { "num": 30, "den": 0 } }"#).is_err());
    assert!(t.set_json(r#"{ "TimeScale": 0 }"#).is_err());
    assert!(t.set_json(r#"{ "TimeScale": -1.5 }"#).is_err());
    assert!(
        t.set_json(r#"{ "rotation": { "points": [ { "frame": 5, "value": 1 }, { "frame": 1, "value": 2 } ] } }"#)
            .is_err()
    );
    assert_eq!(t.json().unwrap(), before);
}

#[test]
fn time_scale_rescales_current_boxes_and_compounds() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = Tracker::with_tracking_data(write_tracking(&dir)).unwrap();

    t.set_json(r#"{ "TimeScale": 2.0 }"#).unwrap();
    assert_eq!(frames(&t), vec![20, 40, 60]);
    t.set_json(r#"{ "TimeScale": 2.0 }"#).unwrap();
    assert_eq!(frames(&t), vec![40, 80, 120]);
}

#[test]
fn path_in_same_document_loads_scaled_data_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_tracking(&dir);
    let mut t = Tracker::new();
    t.set_json_value(&json!({ "TimeScale": 0.5, "protobuf_data_path": path }))
        .unwrap();
    assert_eq!(frames(&t), vec![5, 10, 15]);
    assert_eq!(t.tracking_data_path(), path);
}

#[test]
fn failed_load_clears_path_but_keeps_other_fields() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = Tracker::with_tracking_data(write_tracking(&dir)).unwrap();
    let missing = dir.path().join("missing.data");

    let err = t
        .set_json_value(&json!({
            "protobuf_data_path": missing.to_string_lossy(),
            "delta_y": { "points": [ { "frame": 0, "value": 0.3 } ] },
        }))
        .unwrap_err();
    assert!(matches!(err, TrackerError::TrackingData(_)));
    assert_eq!(t.tracking_data_path(), "");
    assert!(t.track_store().is_empty());
    assert_eq!(t.params().delta_y.value_at(FrameIndex(0)), 0.3);
    assert_eq!(t.json_value().unwrap()["protobuf_data_path"], "");
}

#[test]
fn empty_path_clears_tracking_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut t = Tracker::with_tracking_data(write_tracking(&dir)).unwrap();
    t.set_json(r#"{ "protobuf_data_path": "" }"#).unwrap();
    assert!(t.track_store().is_empty());
    assert_eq!(t.tracking_data_path(), "");
}

#[test]
fn properties_report_values_at_frame() {
    let mut t = Tracker::new();
    t.base_mut().start = 1.0;
    t.base_mut().end = 3.5;
    t.params_mut().rotation =
        Curve::new(vec![CurvePoint::new(0, 0.0), CurvePoint::new(100, 90.0)]).unwrap();

    let before = t.json().unwrap();
    let sheet = t.properties(FrameIndex(50));
    assert_eq!(t.json().unwrap(), before);

    assert_eq!(sheet.len(), 11);
    let rotation = sheet.get("rotation").unwrap();
    assert_eq!(rotation.name, "Rotation");
    assert_eq!(rotation.value, json!(45.0));
    assert_eq!((rotation.min, rotation.max), (0.0, 360.0));
    assert!(rotation.keyframe);

    let duration = sheet.get("duration").unwrap();
    assert_eq!(duration.value, json!(2.5));
    assert!(duration.readonly);
    assert_eq!(sheet.get("delta_x").unwrap().name, "Displacement X-axis");
    assert_eq!(sheet.get("scale_y").unwrap().name, "Scale (Height)");
    assert_eq!(sheet.get("layer").unwrap().kind, PropertyKind::Int);
    assert_eq!(sheet.get("id").unwrap().kind, PropertyKind::String);

    let parsed: Value = serde_json::from_str(&t.properties_json(FrameIndex(50)).unwrap()).unwrap();
    assert_eq!(parsed["delta_x"]["value"], json!(0.0));
}
