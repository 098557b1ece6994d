//! Keyframed scalar curves.
//!
//! A [`Curve`] is a total function from frame index to `f64`, defined by user-placed
//! [`CurvePoint`]s. Every animated effect parameter is one `Curve`; there is no
//! per-parameter curve type.

use crate::{
    animation::ease::Ease,
    foundation::core::FrameIndex,
    foundation::error::{TrackerError, TrackerResult},
};

/// How a segment is interpolated from its left point towards the next one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Interp {
    /// Hold the left value until the next point.
    Constant,
    #[default]
    Linear,
    Eased(Ease),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CurvePoint {
    pub frame: FrameIndex,
    pub value: f64,
    #[serde(default)]
    pub interp: Interp, // applied toward next point
}

impl CurvePoint {
    pub fn new(frame: u64, value: f64) -> Self {
        Self {
            frame: FrameIndex(frame),
            value,
            interp: Interp::Linear,
        }
    }

    pub fn with_interp(mut self, interp: Interp) -> Self {
        self.interp = interp;
        self
    }
}

/// Keyframed scalar. Points are kept sorted by frame with unique frames.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawCurve")]
pub struct Curve {
    points: Vec<CurvePoint>,
    default: f64, // value when no points exist
}

#[derive(serde::Deserialize)]
struct RawCurve {
    #[serde(default)]
    points: Vec<CurvePoint>,
    #[serde(default)]
    default: f64,
}

impl TryFrom<RawCurve> for Curve {
    type Error = TrackerError;

    fn try_from(raw: RawCurve) -> TrackerResult<Self> {
        if !raw.default.is_finite() {
            return Err(TrackerError::animation("curve default must be finite"));
        }
        let mut curve = Self::new(raw.points)?;
        curve.default = raw.default;
        Ok(curve)
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl Curve {
    /// Curve with a single point at frame 0, i.e. `value` everywhere.
    pub fn constant(value: f64) -> Self {
        Self {
            points: vec![CurvePoint::new(0, value)],
            default: value,
        }
    }

    pub fn new(points: Vec<CurvePoint>) -> TrackerResult<Self> {
        if points.iter().any(|p| !p.value.is_finite()) {
            return Err(TrackerError::animation("curve point values must be finite"));
        }
        if !points.windows(2).all(|w| w[0].frame < w[1].frame) {
            return Err(TrackerError::animation(
                "curve points must be sorted by frame with unique frames",
            ));
        }
        Ok(Self {
            points,
            default: 0.0,
        })
    }

    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Inserts `point`, replacing any existing point at the same frame.
    pub fn add_point(&mut self, point: CurvePoint) -> TrackerResult<()> {
        if !point.value.is_finite() {
            return Err(TrackerError::animation("curve point values must be finite"));
        }
        match self.points.binary_search_by_key(&point.frame, |p| p.frame) {
            Ok(i) => self.points[i] = point,
            Err(i) => self.points.insert(i, point),
        }
        Ok(())
    }

    pub fn remove_point(&mut self, frame: FrameIndex) -> Option<CurvePoint> {
        let i = self.points.binary_search_by_key(&frame, |p| p.frame).ok()?;
        Some(self.points.remove(i))
    }

    pub fn value_at(&self, frame: FrameIndex) -> f64 {
        let Some(first) = self.points.first() else {
            return self.default;
        };

        let f = frame.0;
        let idx = self.points.partition_point(|p| p.frame.0 <= f);
        if idx == 0 {
            return first.value;
        }
        if idx >= self.points.len() {
            return self.points[self.points.len() - 1].value;
        }

        let a = &self.points[idx - 1];
        let b = &self.points[idx];
        let t = ((f - a.frame.0) as f64) / ((b.frame.0 - a.frame.0) as f64);
        let te = match a.interp {
            Interp::Constant => return a.value,
            Interp::Linear => t,
            Interp::Eased(ease) => ease.apply(t),
        };
        a.value + (b.value - a.value) * te
    }

    /// First point at or after `frame`, else the last point.
    pub fn closest_point(&self, frame: FrameIndex) -> Option<&CurvePoint> {
        let idx = self.points.partition_point(|p| p.frame < frame);
        self.points.get(idx).or_else(|| self.points.last())
    }

    /// Point preceding [`Curve::closest_point`], or the closest point itself at the start.
    pub fn previous_point(&self, frame: FrameIndex) -> Option<&CurvePoint> {
        let idx = self
            .points
            .partition_point(|p| p.frame < frame)
            .min(self.points.len().saturating_sub(1));
        self.points.get(idx.saturating_sub(1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/curve.rs"]
mod tests;
