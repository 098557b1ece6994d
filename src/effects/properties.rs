use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    animation::curve::{Curve, Interp},
    foundation::core::FrameIndex,
    foundation::error::{TrackerError, TrackerResult},
};

/// Upper bound used for timeline-valued properties (30 minutes in milliseconds).
pub const MAX_TIMELINE_VALUE: f64 = 1000.0 * 60.0 * 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Float,
    Int,
    String,
}

/// One editable property as seen by an editing surface at a specific frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PropertyDescriptor {
    pub name: String,
    pub value: Value,
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    pub memo: String,
    pub min: f64,
    pub max: f64,
    pub readonly: bool,
    /// `true` when the value comes from a curve; the sheet key names the curve.
    pub keyframe: bool,
    pub points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<Interp>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closest_point_x: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_point_x: Option<u64>,
}

impl PropertyDescriptor {
    pub fn scalar(
        name: &str,
        value: impl Into<Value>,
        kind: PropertyKind,
        min: f64,
        max: f64,
        readonly: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            value: value.into(),
            kind,
            memo: String::new(),
            min,
            max,
            readonly,
            keyframe: false,
            points: 0,
            interpolation: None,
            closest_point_x: None,
            previous_point_x: None,
        }
    }

    pub fn curve(name: &str, curve: &Curve, frame: FrameIndex, min: f64, max: f64) -> Self {
        let closest = curve.closest_point(frame);
        Self {
            keyframe: true,
            points: curve.len(),
            interpolation: closest.map(|p| p.interp),
            closest_point_x: closest.map(|p| p.frame.0),
            previous_point_x: curve.previous_point(frame).map(|p| p.frame.0),
            ..Self::scalar(
                name,
                curve.value_at(frame),
                PropertyKind::Float,
                min,
                max,
                false,
            )
        }
    }
}

/// Property descriptors keyed by configuration field name.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct PropertySheet {
    entries: BTreeMap<String, PropertyDescriptor>,
}

impl PropertySheet {
    pub fn insert(&mut self, key: &str, descriptor: PropertyDescriptor) {
        self.entries.insert(key.to_string(), descriptor);
    }

    pub fn get(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn to_json_string(&self) -> TrackerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| TrackerError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/properties.rs"]
mod tests;
