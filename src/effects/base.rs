use serde::Deserialize as _;
use serde_json::{Map, Value};

use crate::{
    effects::properties::PropertySheet,
    foundation::core::FrameIndex,
    foundation::error::{TrackerError, TrackerResult},
    render::frame::Frame,
};

/// Static description of an effect kind.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EffectInfo {
    pub class_name: String,
    pub name: String,
    pub description: String,
    pub has_audio: bool,
    pub has_video: bool,
}

/// Timeline placement shared by every effect instance.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectBase {
    pub id: String,
    pub position: f64, // seconds on the timeline
    pub layer: i32,
    pub start: f64, // seconds, trimmed start
    pub end: f64,   // seconds, trimmed end
    pub info: EffectInfo,
}

impl EffectBase {
    pub fn new(info: EffectInfo) -> Self {
        Self {
            id: String::new(),
            position: 0.0,
            layer: 0,
            start: 0.0,
            end: 0.0,
            info,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    pub fn json_value(&self) -> Map<String, Value> {
        let mut root = Map::new();
        root.insert("id".into(), Value::from(self.id.clone()));
        root.insert("position".into(), Value::from(self.position));
        root.insert("layer".into(), Value::from(self.layer));
        root.insert("start".into(), Value::from(self.start));
        root.insert("end".into(), Value::from(self.end));
        root.insert("duration".into(), Value::from(self.duration()));
        root.insert("class_name".into(), Value::from(self.info.class_name.clone()));
        root.insert("name".into(), Value::from(self.info.name.clone()));
        root.insert(
            "description".into(),
            Value::from(self.info.description.clone()),
        );
        root.insert("has_audio".into(), Value::from(self.info.has_audio));
        root.insert("has_video".into(), Value::from(self.info.has_video));
        root
    }

    /// Merges the shared fields present in a parsed patch; absent or null fields are kept.
    pub(crate) fn apply_patch(&mut self, patch: BasePatch) {
        if let Some(id) = patch.id {
            self.id = id;
        }
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(layer) = patch.layer {
            self.layer = layer;
        }
        if let Some(start) = patch.start {
            self.start = start;
        }
        if let Some(end) = patch.end {
            self.end = end;
        }
    }
}

/// Shared fields of a configuration document; every field is optional.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct BasePatch {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    position: Option<f64>,
    #[serde(default)]
    layer: Option<i32>,
    #[serde(default)]
    start: Option<f64>,
    #[serde(default)]
    end: Option<f64>,
}

impl BasePatch {
    pub(crate) fn parse(root: &Value) -> TrackerResult<Self> {
        if !root.is_object() {
            return Err(TrackerError::config(
                "effect JSON must be an object at the root",
            ));
        }
        Self::deserialize(root).map_err(invalid_json)
    }
}

pub(crate) fn invalid_json(e: serde_json::Error) -> TrackerError {
    TrackerError::config(format!(
        "JSON is invalid (missing keys or invalid data types): {e}"
    ))
}

/// A per-frame video effect hosted by the compositing pipeline.
///
/// Implementations are read-only while rendering, so one instance can serve
/// concurrent [`Effect::get_frame`] calls. Configuration changes take `&mut self`
/// and therefore never overlap with rendering.
pub trait Effect: Send + Sync {
    fn base(&self) -> &EffectBase;

    fn info(&self) -> &EffectInfo {
        &self.base().info
    }

    /// Applies the effect to `frame`, returning the same frame with mutated pixels.
    fn get_frame(&self, frame: Frame, frame_number: FrameIndex) -> Frame;

    fn json_value(&self) -> TrackerResult<Value>;

    fn set_json_value(&mut self, root: &Value) -> TrackerResult<()>;

    /// Read-only property descriptors evaluated at `frame`.
    fn properties(&self, frame: FrameIndex) -> PropertySheet;

    fn json(&self) -> TrackerResult<String> {
        serde_json::to_string_pretty(&self.json_value()?)
            .map_err(|e| TrackerError::serde(e.to_string()))
    }

    fn set_json(&mut self, value: &str) -> TrackerResult<()> {
        let root: Value = serde_json::from_str(value).map_err(invalid_json)?;
        self.set_json_value(&root)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/base.rs"]
mod tests;
