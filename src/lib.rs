//! Tracked bounding-box overlay effect for Wavyte.
//!
//! A precomputed object trajectory (one box per source frame, produced offline by an
//! object tracker) is replayed on top of video frames. Five keyframed curves nudge,
//! grow and rotate the box per frame.
//!
//! # Pipeline overview
//!
//! 1. **Load**: tracking file bytes -> [`TrackingFile`] -> [`TrackStore`] (frame -> box)
//! 2. **Adjust**: [`TrackerParams`] sampled at the frame -> [`CurveSample`]
//! 3. **Place**: box + sample + image size -> [`OverlayGeometry`] in pixels
//! 4. **Draw**: a blue outline stroked into the frame's RGBA pixels
//!
//! The effect is configured through a flat JSON document (see [`Tracker::set_json`]) and
//! describes its editable state through a [`PropertySheet`].
#![forbid(unsafe_code)]

mod animation;
mod effects;
mod foundation;
mod render;
mod tracking;

pub use animation::curve::{Curve, CurvePoint, Interp};
pub use animation::ease::Ease;
pub use effects::base::{Effect, EffectBase, EffectInfo};
pub use effects::properties::{
    MAX_TIMELINE_VALUE, PropertyDescriptor, PropertyKind, PropertySheet,
};
pub use effects::tracker::{Tracker, TrackerParams};
pub use foundation::core::{Fps, FrameIndex};
pub use foundation::error::{TrackerError, TrackerResult};
pub use render::frame::Frame;
pub use render::overlay::{
    CurveSample, OverlayGeometry, STROKE_COLOR, STROKE_WIDTH_PX, draw_outline, overlay_geometry,
};
pub use render::pipeline::{RenderThreading, render_frames};
pub use tracking::loader::{LoadSummary, load_tracking_file, populate_store, save_tracking_file};
pub use tracking::store::{BoundingBox, TrackStore};
pub use tracking::wire::{CornerBox, Timestamp, TrackedFrame, TrackingFile};
