//! Pixel and geometry access for captured frames.
//!
//! Rules never touch an image type directly. They ask a [`Frame`] for its
//! dimensions and for the colour at a coordinate, which keeps the evaluator
//! independent of how the frame was decoded and lets tests build frames in
//! memory.

use image::{DynamicImage, GenericImageView, Pixel, Rgb, RgbImage, RgbaImage};

/// Read-only view of a decoded frame.
pub trait Frame {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// RGB colour at `(x, y)`, or `None` when the coordinate lies outside the frame.
    ///
    /// Coordinates are signed so that rule offsets can be passed through
    /// unchanged; any negative coordinate is outside the frame.
    fn pixel(&self, x: i64, y: i64) -> Option<Rgb<u8>>;
}

/// Convert signed coordinates to an in-bounds `(u32, u32)` pair.
pub(crate) fn checked_coords(dimensions: (u32, u32), x: i64, y: i64) -> Option<(u32, u32)> {
    let x = u32::try_from(x).ok()?;
    let y = u32::try_from(y).ok()?;
    (x < dimensions.0 && y < dimensions.1).then_some((x, y))
}

impl Frame for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn pixel(&self, x: i64, y: i64) -> Option<Rgb<u8>> {
        let (x, y) = checked_coords(Frame::dimensions(self), x, y)?;
        Some(self.get_pixel(x, y).to_rgb())
    }
}

impl Frame for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn pixel(&self, x: i64, y: i64) -> Option<Rgb<u8>> {
        let (x, y) = checked_coords(Frame::dimensions(self), x, y)?;
        Some(*self.get_pixel(x, y))
    }
}

impl Frame for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn pixel(&self, x: i64, y: i64) -> Option<Rgb<u8>> {
        let (x, y) = checked_coords(Frame::dimensions(self), x, y)?;
        Some(self.get_pixel(x, y).to_rgb())
    }
}
