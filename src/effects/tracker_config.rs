//! JSON configuration for [`Tracker`].
//!
//! Documents are validated in full before anything is applied. The only partial
//! outcome is a tracking path that fails to load: every other field is kept, the path
//! is cleared and the load error is returned.

use std::path::Path;

use serde::Deserialize as _;
use serde_json::{Value, json};

use crate::{
    animation::curve::Curve,
    effects::base::{BasePatch, invalid_json},
    effects::properties::{MAX_TIMELINE_VALUE, PropertyDescriptor, PropertyKind, PropertySheet},
    effects::tracker::Tracker,
    foundation::core::{Fps, FrameIndex},
    foundation::error::{TrackerError, TrackerResult},
};

#[derive(Debug, Default, serde::Deserialize)]
struct TrackerPatch {
    #[serde(default)]
    protobuf_data_path: Option<String>,
    #[serde(default, rename = "BaseFPS")]
    base_fps: Option<FpsPatch>,
    #[serde(default, rename = "TimeScale")]
    time_scale: Option<f64>,
    #[serde(default)]
    delta_x: Option<Curve>,
    #[serde(default)]
    delta_y: Option<Curve>,
    #[serde(default)]
    scale_x: Option<Curve>,
    #[serde(default)]
    scale_y: Option<Curve>,
    #[serde(default)]
    rotation: Option<Curve>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct FpsPatch {
    #[serde(default)]
    num: Option<u32>,
    #[serde(default)]
    den: Option<u32>,
}

impl Tracker {
    pub fn json(&self) -> TrackerResult<String> {
        serde_json::to_string_pretty(&self.json_value()?)
            .map_err(|e| TrackerError::serde(e.to_string()))
    }

    pub fn json_value(&self) -> TrackerResult<Value> {
        let mut root = self.base.json_value();
        root.insert("type".into(), Value::from(Self::CLASS_NAME));
        root.insert(
            "protobuf_data_path".into(),
            Value::from(self.tracking_data_path.clone()),
        );
        root.insert(
            "BaseFPS".into(),
            json!({ "num": self.base_fps.num, "den": self.base_fps.den }),
        );
        root.insert("TimeScale".into(), Value::from(self.time_scale));
        for (key, curve) in self.params.named() {
            let value =
                serde_json::to_value(curve).map_err(|e| TrackerError::serde(e.to_string()))?;
            root.insert(key.into(), value);
        }
        Ok(Value::Object(root))
    }

    pub fn set_json(&mut self, value: &str) -> TrackerResult<()> {
        let root: Value = serde_json::from_str(value).map_err(invalid_json)?;
        self.set_json_value(&root)
    }

    /// Applies a configuration document. Absent or `null` fields are left unchanged.
    ///
    /// Order: shared effect fields, `BaseFPS`, `TimeScale` (rescaling the current
    /// boxes), curves, then `protobuf_data_path` (reloading tracking data).
    pub fn set_json_value(&mut self, root: &Value) -> TrackerResult<()> {
        let base_patch = BasePatch::parse(root)?;
        let patch = TrackerPatch::deserialize(root).map_err(invalid_json)?;

        let base_fps = match &patch.base_fps {
            Some(p) => Fps::new(
                p.num.unwrap_or(self.base_fps.num),
                p.den.unwrap_or(self.base_fps.den),
            )
            .map_err(|e| TrackerError::config(format!("BaseFPS: {e}")))?,
            None => self.base_fps,
        };
        if let Some(ts) = patch.time_scale {
            if !ts.is_finite() || ts <= 0.0 {
                return Err(TrackerError::config(format!(
                    "TimeScale must be finite and > 0 (got {ts})"
                )));
            }
        }

        self.base.apply_patch(base_patch);
        self.set_base_fps(base_fps);
        if let Some(ts) = patch.time_scale {
            self.set_time_scale(ts)?;
        }

        let params = &mut self.params;
        for (slot, curve) in [
            (&mut params.delta_x, patch.delta_x),
            (&mut params.delta_y, patch.delta_y),
            (&mut params.scale_x, patch.scale_x),
            (&mut params.scale_y, patch.scale_y),
            (&mut params.rotation, patch.rotation),
        ] {
            if let Some(curve) = curve {
                *slot = curve;
            }
        }

        if let Some(path) = patch.protobuf_data_path {
            if path.is_empty() {
                self.clear_tracked_data();
            } else if let Err(e) = self.load_tracked_data(Path::new(&path)) {
                tracing::warn!(path = %path, error = %e, "invalid tracking data path, clearing it");
                return Err(e);
            }
        }
        Ok(())
    }

    /// Property sheet evaluated at `frame`. Never mutates the effect.
    pub fn properties(&self, frame: FrameIndex) -> PropertySheet {
        let base = &self.base;
        let mut sheet = PropertySheet::default();

        sheet.insert(
            "id",
            PropertyDescriptor::scalar("ID", base.id.clone(), PropertyKind::String, -1.0, -1.0, true),
        );
        for (key, name, value, readonly) in [
            ("position", "Position", base.position, false),
            ("start", "Start", base.start, false),
            ("end", "End", base.end, false),
            ("duration", "Duration", base.duration(), true),
        ] {
            sheet.insert(
                key,
                PropertyDescriptor::scalar(
                    name,
                    value,
                    PropertyKind::Float,
                    0.0,
                    MAX_TIMELINE_VALUE,
                    readonly,
                ),
            );
        }
        sheet.insert(
            "layer",
            PropertyDescriptor::scalar("Track", base.layer, PropertyKind::Int, 0.0, 20.0, false),
        );

        let p = &self.params;
        for (key, name, curve, min, max) in [
            ("delta_x", "Displacement X-axis", &p.delta_x, -1.0, 1.0),
            ("delta_y", "Displacement Y-axis", &p.delta_y, -1.0, 1.0),
            ("scale_x", "Scale (Width)", &p.scale_x, -1.0, 1.0),
            ("scale_y", "Scale (Height)", &p.scale_y, -1.0, 1.0),
            ("rotation", "Rotation", &p.rotation, 0.0, 360.0),
        ] {
            sheet.insert(key, PropertyDescriptor::curve(name, curve, frame, min, max));
        }
        sheet
    }

    pub fn properties_json(&self, frame: FrameIndex) -> TrackerResult<String> {
        self.properties(frame).to_json_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tracker_config.rs"]
mod tests;
