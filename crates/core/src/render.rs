//! Rendering seam: the canvas primitives drawables and the engine rely on.

use crate::graphic::ImageHandle;

/// Canvas drawing calls, in canvas pixel coordinates.
pub trait RenderTarget {
    /// Fill the whole canvas with the background colour.
    fn clear_background(&mut self);
    fn set_stroke_color(&mut self, r: u8, g: u8, b: u8);
    /// Subsequent shapes are drawn as outlines only.
    fn set_no_fill(&mut self);
    fn draw_circle(&mut self, x: i32, y: i32, diameter: i32);
    /// Blit `image` with its top-left corner at `(x, y)`.
    fn draw_image(&mut self, image: ImageHandle, x: i32, y: i32);
}

/// One recorded call on a [`RecordingTarget`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCall {
    ClearBackground,
    StrokeColor(u8, u8, u8),
    NoFill,
    Circle { x: i32, y: i32, diameter: i32 },
    Image { image: ImageHandle, x: i32, y: i32 },
}

/// Headless target that records every call made on it.
#[derive(Debug, Clone, Default)]
pub struct RecordingTarget {
    calls: Vec<DrawCall>,
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// Calls since the most recent `clear_background`, i.e. the last frame.
    pub fn last_frame(&self) -> &[DrawCall] {
        let start = self
            .calls
            .iter()
            .rposition(|c| *c == DrawCall::ClearBackground)
            .unwrap_or(0);
        &self.calls[start..]
    }

    /// Image blits in the last frame.
    pub fn last_frame_images(&self) -> Vec<(ImageHandle, i32, i32)> {
        self.last_frame()
            .iter()
            .filter_map(|c| match *c {
                DrawCall::Image { image, x, y } => Some((image, x, y)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderTarget for RecordingTarget {
    fn clear_background(&mut self) {
        self.calls.push(DrawCall::ClearBackground);
    }

    fn set_stroke_color(&mut self, r: u8, g: u8, b: u8) {
        self.calls.push(DrawCall::StrokeColor(r, g, b));
    }

    fn set_no_fill(&mut self) {
        self.calls.push(DrawCall::NoFill);
    }

    fn draw_circle(&mut self, x: i32, y: i32, diameter: i32) {
        self.calls.push(DrawCall::Circle { x, y, diameter });
    }

    fn draw_image(&mut self, image: ImageHandle, x: i32, y: i32) {
        self.calls.push(DrawCall::Image { image, x, y });
    }
}
