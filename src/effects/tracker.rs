//! Tracked-object overlay effect.
//!
//! Composes the sparse [`TrackStore`] (frame -> box) with five total curves
//! (frame -> value) into one partial function frame -> [`OverlayGeometry`], then
//! strokes that geometry into the frame's pixels.

use std::path::Path;

use crate::{
    animation::curve::Curve,
    effects::base::{Effect, EffectBase, EffectInfo},
    effects::properties::PropertySheet,
    foundation::core::{Fps, FrameIndex},
    foundation::error::TrackerResult,
    render::frame::Frame,
    render::overlay::{
        CurveSample, OverlayGeometry, STROKE_COLOR, STROKE_WIDTH_PX, draw_outline,
        overlay_geometry,
    },
    tracking::loader::{LoadSummary, load_tracking_file},
    tracking::store::{BoundingBox, TrackStore},
};

/// The five user-editable adjustments applied on top of the tracked box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrackerParams {
    pub delta_x: Curve,
    pub delta_y: Curve,
    pub scale_x: Curve,
    pub scale_y: Curve,
    pub rotation: Curve, // degrees
}

impl TrackerParams {
    pub fn sample(&self, frame: FrameIndex) -> CurveSample {
        CurveSample {
            delta_x: self.delta_x.value_at(frame),
            delta_y: self.delta_y.value_at(frame),
            scale_x: self.scale_x.value_at(frame),
            scale_y: self.scale_y.value_at(frame),
            rotation: self.rotation.value_at(frame),
        }
    }

    /// Curves paired with their configuration keys.
    pub fn named(&self) -> [(&'static str, &Curve); 5] {
        [
            ("delta_x", &self.delta_x),
            ("delta_y", &self.delta_y),
            ("scale_x", &self.scale_x),
            ("scale_y", &self.scale_y),
            ("rotation", &self.rotation),
        ]
    }
}

pub struct Tracker {
    pub(crate) base: EffectBase,
    pub(crate) tracked: TrackStore,
    pub(crate) params: TrackerParams,
    pub(crate) base_fps: Fps,
    pub(crate) time_scale: f64,
    pub(crate) tracking_data_path: String,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Tracker {
    pub const CLASS_NAME: &'static str = "Tracker";

    pub fn effect_info() -> EffectInfo {
        EffectInfo {
            class_name: Self::CLASS_NAME.to_string(),
            name: "Tracker".to_string(),
            description: "Track the selected bounding box through the video.".to_string(),
            has_audio: false,
            has_video: true,
        }
    }

    /// Tracker with no tracking data and identity curves.
    pub fn new() -> Self {
        Self {
            base: EffectBase::new(Self::effect_info()),
            tracked: TrackStore::new(),
            params: TrackerParams::default(),
            base_fps: Fps::default(),
            time_scale: 1.0,
            tracking_data_path: String::new(),
        }
    }

    pub fn with_tracking_data(path: impl AsRef<Path>) -> TrackerResult<Self> {
        let mut tracker = Self::new();
        tracker.load_tracked_data(path.as_ref())?;
        Ok(tracker)
    }

    /// Replaces the tracked boxes with the contents of `path`.
    ///
    /// The loaded indices are rescaled by the current time scale. On failure the
    /// store is left empty and the remembered path is cleared.
    pub fn load_tracked_data(&mut self, path: &Path) -> TrackerResult<LoadSummary> {
        match load_tracking_file(path, &mut self.tracked) {
            Ok(summary) => {
                self.tracked.set_base_fps(self.base_fps);
                self.tracked.scale_points(self.time_scale)?;
                self.tracking_data_path = path.to_string_lossy().into_owned();
                Ok(summary)
            }
            Err(e) => {
                self.tracking_data_path.clear();
                Err(e)
            }
        }
    }

    pub fn clear_tracked_data(&mut self) {
        self.tracked.clear();
        self.tracking_data_path.clear();
    }

    pub fn base(&self) -> &EffectBase {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut EffectBase {
        &mut self.base
    }

    pub fn track_store(&self) -> &TrackStore {
        &self.tracked
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut TrackerParams {
        &mut self.params
    }

    pub fn tracking_data_path(&self) -> &str {
        &self.tracking_data_path
    }

    pub fn base_fps(&self) -> Fps {
        self.base_fps
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn set_base_fps(&mut self, fps: Fps) {
        self.base_fps = fps;
        self.tracked.set_base_fps(fps);
    }

    /// Records `factor` and rescales the stored indices by it (compounding).
    pub fn set_time_scale(&mut self, factor: f64) -> TrackerResult<usize> {
        let collisions = self.tracked.scale_points(factor)?;
        self.time_scale = factor;
        Ok(collisions)
    }

    pub fn tracked_data(&self, frame: FrameIndex) -> Option<BoundingBox> {
        self.tracked.get(frame)
    }

    /// Overlay placement for `frame` on a `width` x `height` image, if the frame is tracked.
    pub fn geometry_at(
        &self,
        frame: FrameIndex,
        width: u32,
        height: u32,
    ) -> Option<OverlayGeometry> {
        let bbox = self.tracked.get(frame)?;
        Some(overlay_geometry(
            &bbox,
            &self.params.sample(frame),
            width,
            height,
        ))
    }

    /// Draws the tracked box for `frame_number` into `frame`.
    ///
    /// Frames without pixels and untracked frames are returned unchanged. Rotation is
    /// sampled into the geometry but not applied to the stroke.
    #[tracing::instrument(level = "trace", skip(self, frame))]
    pub fn render(&self, mut frame: Frame, frame_number: FrameIndex) -> Frame {
        if !frame.has_pixels() {
            return frame;
        }
        if let Some(image) = frame.image_mut() {
            let (width, height) = image.dimensions();
            if let Some(geometry) = self.geometry_at(frame_number, width, height) {
                draw_outline(image, geometry.rect, STROKE_WIDTH_PX, STROKE_COLOR);
            }
        }
        frame
    }
}

impl Effect for Tracker {
    fn base(&self) -> &EffectBase {
        &self.base
    }

    fn get_frame(&self, frame: Frame, frame_number: FrameIndex) -> Frame {
        self.render(frame, frame_number)
    }

    fn json_value(&self) -> TrackerResult<serde_json::Value> {
        Tracker::json_value(self)
    }

    fn set_json_value(&mut self, root: &serde_json::Value) -> TrackerResult<()> {
        Tracker::set_json_value(self, root)
    }

    fn properties(&self, frame: FrameIndex) -> PropertySheet {
        Tracker::properties(self, frame)
    }
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("id", &self.base.id)
            .field("tracked_frames", &self.tracked.len())
            .field("base_fps", &self.base_fps)
            .field("time_scale", &self.time_scale)
            .field("tracking_data_path", &self.tracking_data_path)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tracker.rs"]
mod tests;
