//! Overlay geometry and rectangle drawing.
//!
//! Geometry is computed by a pure function of the tracked box and the sampled curve
//! values; only [`draw_outline`] touches pixels.

use image::{Rgba, RgbaImage};
use kurbo::Rect;

use crate::tracking::store::BoundingBox;

/// Stroke width of the drawn rectangle, in pixels.
pub const STROKE_WIDTH_PX: u32 = 2;

/// Stroke color of the drawn rectangle (opaque blue).
pub const STROKE_COLOR: Rgba<u8> = Rgba([0, 0, 255, 255]);

/// Effect curve values sampled at one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CurveSample {
    pub delta_x: f64,
    pub delta_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub rotation: f64, // degrees
}

/// Final overlay placement for one frame, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayGeometry {
    /// Rectangle with truncated integer edges, normalized to non-negative extent.
    pub rect: Rect,
    /// Sampled rotation in degrees. Reported only; the drawn rectangle is axis-aligned.
    pub rotation_deg: f64,
}

pub fn overlay_geometry(
    bbox: &BoundingBox,
    sample: &CurveSample,
    frame_width: u32,
    frame_height: u32,
) -> OverlayGeometry {
    let fw = f64::from(frame_width);
    let fh = f64::from(frame_height);

    let x = ((bbox.cx + sample.delta_x) * fw).trunc();
    let y = ((bbox.cy + sample.delta_y) * fh).trunc();
    let w = ((bbox.width + sample.scale_x) * fw).trunc();
    let h = ((bbox.height + sample.scale_y) * fh).trunc();

    OverlayGeometry {
        rect: Rect::from_origin_size((x, y), (w, h)),
        rotation_deg: sample.rotation,
    }
}

/// Paints the outline of `rect` into `image`, overwriting pixels under the stroke.
///
/// The outline covers columns `x0..x1` and rows `y0..y1` (end-exclusive, at least one
/// pixel each); the stroke grows inward from it and is clipped to the image. Edges
/// at any distance (including infinite) are accepted; a rect with a NaN edge draws
/// nothing.
pub fn draw_outline(image: &mut RgbaImage, rect: Rect, stroke_px: u32, color: Rgba<u8>) {
    if stroke_px == 0 || rect.is_nan() {
        return;
    }

    // Edges further out than one stroke width past the image only paint off-screen
    // pixels, so pulling them in to that margin keeps the integer math small.
    let t = i64::from(stroke_px);
    let margin = f64::from(stroke_px);
    let max_x = f64::from(image.width()) + margin;
    let max_y = f64::from(image.height()) + margin;
    let clamp_x = |v: f64| v.clamp(-margin, max_x) as i64;
    let clamp_y = |v: f64| v.clamp(-margin, max_y) as i64;

    let left = clamp_x(rect.x0);
    let top = clamp_y(rect.y0);
    let right = (clamp_x(rect.x1) - 1).max(left);
    let bottom = (clamp_y(rect.y1) - 1).max(top);

    fill_span(image, left, right, top, (top + t - 1).min(bottom), color);
    fill_span(image, left, right, (bottom - t + 1).max(top), bottom, color);
    fill_span(image, left, (left + t - 1).min(right), top, bottom, color);
    fill_span(image, (right - t + 1).max(left), right, top, bottom, color);
}

fn fill_span(image: &mut RgbaImage, x0: i64, x1: i64, y0: i64, y1: i64, color: Rgba<u8>) {
    let max_x = i64::from(image.width()) - 1;
    let max_y = i64::from(image.height()) - 1;
    let (x0, x1) = (x0.max(0), x1.min(max_x));
    let (y0, y1) = (y0.max(0), y1.min(max_y));
    if x0 > x1 || y0 > y1 {
        return;
    }

    for y in y0..=y1 {
        for x in x0..=x1 {
            image.put_pixel(x as u32, y as u32, color);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
