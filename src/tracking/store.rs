use std::collections::BTreeMap;

use crate::{
    foundation::core::{Fps, FrameIndex},
    foundation::error::{TrackerError, TrackerResult},
};

/// Tracked region for one frame, in coordinates normalized to the frame size.
///
/// `cx`/`cy` is the anchor the loader supplies (the region's top-left corner) and is
/// used as the overlay rectangle's origin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub cx: f64,
    pub cy: f64,
    pub width: f64,
    pub height: f64,
}

/// Sparse frame-indexed store of tracked boxes.
///
/// The store is a partial function `frame -> box`; frames without tracking data simply
/// have no entry. Keys are in timeline numbering once [`TrackStore::scale_points`] has
/// been applied.
#[derive(Clone, Debug, Default)]
pub struct TrackStore {
    boxes: BTreeMap<u64, BoundingBox>,
    base_fps: Fps,
}

impl TrackStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.boxes.clear();
    }

    /// Inserts or overwrites the box at `frame`. Callers validate coordinates.
    pub fn add_box(&mut self, frame: FrameIndex, cx: f64, cy: f64, width: f64, height: f64) {
        self.boxes.insert(
            frame.0,
            BoundingBox {
                cx,
                cy,
                width,
                height,
            },
        );
    }

    pub fn contains(&self, frame: FrameIndex) -> bool {
        self.boxes.contains_key(&frame.0)
    }

    pub fn get(&self, frame: FrameIndex) -> Option<BoundingBox> {
        self.boxes.get(&frame.0).copied()
    }

    /// Returns the box stored at `frame`.
    ///
    /// # Panics
    ///
    /// Panics when `frame` has no entry; guard with [`TrackStore::contains`] or use
    /// [`TrackStore::get`].
    #[track_caller]
    pub fn get_value(&self, frame: FrameIndex) -> BoundingBox {
        match self.boxes.get(&frame.0) {
            Some(b) => *b,
            None => panic!("no tracked box at frame {frame}"),
        }
    }

    pub fn set_base_fps(&mut self, fps: Fps) {
        self.base_fps = fps;
    }

    pub fn base_fps(&self) -> Fps {
        self.base_fps
    }

    /// Timestamp of `frame` at the base rate.
    pub fn time_of(&self, frame: FrameIndex) -> f64 {
        self.base_fps.frames_to_secs(frame.0)
    }

    /// Re-keys every entry from `i` to `round(i * factor)`; box values are untouched.
    ///
    /// Rounding is half away from zero. Entries are re-keyed in ascending original
    /// order and a later entry overwrites an earlier one that lands on the same key.
    /// Returns how many entries were overwritten that way. Each call compounds with
    /// earlier ones.
    ///
    /// Collisions are a normal outcome of downsampling (`factor < 1`) a densely tracked
    /// run, and the factor comes from configuration, so they are not asserted against
    /// in any build. They are logged with `warn!` and reported through the count.
    pub fn scale_points(&mut self, factor: f64) -> TrackerResult<usize> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(TrackerError::validation(format!(
                "time scale factor must be finite and > 0 (got {factor})"
            )));
        }
        if factor == 1.0 || self.boxes.is_empty() {
            return Ok(0);
        }

        let old = std::mem::take(&mut self.boxes);
        let mut collisions = 0usize;
        for (frame, bbox) in old {
            let scaled = ((frame as f64) * factor).round() as u64;
            if self.boxes.insert(scaled, bbox).is_some() {
                collisions += 1;
            }
        }

        if collisions > 0 {
            tracing::warn!(
                factor,
                collisions,
                "time scale collapsed tracked frames onto shared indices"
            );
        }
        tracing::debug!(factor, entries = self.boxes.len(), "rescaled tracked frames");
        Ok(collisions)
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn first_frame(&self) -> Option<FrameIndex> {
        self.boxes.keys().next().copied().map(FrameIndex)
    }

    pub fn last_frame(&self) -> Option<FrameIndex> {
        self.boxes.keys().next_back().copied().map(FrameIndex)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FrameIndex, &BoundingBox)> + '_ {
        self.boxes.iter().map(|(f, b)| (FrameIndex(*f), b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracking/store.rs"]
mod tests;
