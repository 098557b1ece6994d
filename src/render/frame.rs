use image::RgbaImage;

use crate::foundation::core::FrameIndex;

/// A decoded video frame handed to effects by the host pipeline.
///
/// The image may be absent (nothing decoded yet) or zero-sized; effects pass such
/// frames through untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub number: FrameIndex,
    image: Option<RgbaImage>,
}

impl Frame {
    pub fn new(number: FrameIndex, image: RgbaImage) -> Self {
        Self {
            number,
            image: Some(image),
        }
    }

    pub fn empty(number: FrameIndex) -> Self {
        Self {
            number,
            image: None,
        }
    }

    /// Blank (transparent black) frame of the given size.
    pub fn blank(number: FrameIndex, width: u32, height: u32) -> Self {
        Self::new(number, RgbaImage::new(width, height))
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn image_mut(&mut self) -> Option<&mut RgbaImage> {
        self.image.as_mut()
    }

    pub fn set_image(&mut self, image: RgbaImage) {
        self.image = Some(image);
    }

    pub fn take_image(&mut self) -> Option<RgbaImage> {
        self.image.take()
    }

    /// `true` when there is an image with at least one pixel.
    pub fn has_pixels(&self) -> bool {
        self.image
            .as_ref()
            .is_some_and(|img| img.width() > 0 && img.height() > 0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
