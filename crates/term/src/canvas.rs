//! TermCanvas: a [`RenderTarget`] that rasterises into a [`FrameBuffer`].
//!
//! The square logical canvas is laid over the terminal with two columns per
//! row so tiles look roughly square. The bottom row is kept for the status
//! line and never painted by canvas calls.

use crate::atlas::GlyphAtlas;
use crate::core::{ImageHandle, RenderTarget};
use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};
use crate::types::{BOARD_COLS, BOARD_ROWS, TILE_PX};

/// Terminal columns per row of a tile.
const CELL_ASPECT: i32 = 2;

const BACKDROP: Rgb = Rgb::new(12, 12, 16);
const BOARD_BG: Rgb = Rgb::new(28, 52, 34);
const DEFAULT_FILL: Rgb = Rgb::WHITE;

/// Placement of the board inside the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub origin_x: i32,
    pub origin_y: i32,
    /// Columns per tile.
    pub tile_w: i32,
    /// Rows per tile.
    pub tile_h: i32,
}

impl Viewport {
    /// Largest board that fits `cols × rows` cells. Never smaller than one
    /// row per tile; tiny terminals just clip.
    pub fn fit(cols: u16, rows: u16) -> Self {
        let cols = i32::from(cols);
        let rows = i32::from(rows);
        let tile_h = (rows / BOARD_ROWS).min(cols / (BOARD_COLS * CELL_ASPECT)).max(1);
        let tile_w = tile_h * CELL_ASPECT;
        Self {
            origin_x: ((cols - tile_w * BOARD_COLS) / 2).max(0),
            origin_y: ((rows - tile_h * BOARD_ROWS) / 2).max(0),
            tile_w,
            tile_h,
        }
    }

    /// Canvas pixel to terminal cell.
    pub fn map(&self, x: i32, y: i32) -> (i32, i32) {
        (
            self.origin_x + (x * self.tile_w).div_euclid(TILE_PX),
            self.origin_y + (y * self.tile_h).div_euclid(TILE_PX),
        )
    }

    pub fn board_width(&self) -> i32 {
        self.tile_w * BOARD_COLS
    }

    pub fn board_height(&self) -> i32 {
        self.tile_h * BOARD_ROWS
    }
}

pub struct TermCanvas {
    fb: FrameBuffer,
    atlas: GlyphAtlas,
    viewport: Viewport,
    stroke: Rgb,
    fill: Option<Rgb>,
}

impl TermCanvas {
    /// `width × height` is the whole terminal, status row included.
    pub fn new(width: u16, height: u16, atlas: GlyphAtlas) -> Self {
        Self {
            fb: FrameBuffer::new(width, height),
            atlas,
            viewport: Viewport::fit(width, height.saturating_sub(1)),
            stroke: Rgb::WHITE,
            fill: Some(DEFAULT_FILL),
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.fb.resize(width, height);
        self.viewport = Viewport::fit(width, height.saturating_sub(1));
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn framebuffer(&self) -> &FrameBuffer {
        &self.fb
    }

    pub fn framebuffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.fb
    }

    /// Row reserved for the status line, if the terminal has any rows.
    pub fn status_row(&self) -> Option<u16> {
        self.fb.height().checked_sub(1)
    }

    fn canvas_rows(&self) -> i32 {
        i32::from(self.fb.height()) - 1
    }

    fn plot(&mut self, x: i32, y: i32, cell: Cell) {
        if y < self.canvas_rows() {
            self.fb.set(x, y, cell);
        }
    }

    fn paint_bg(&mut self, x: i32, y: i32, bg: Rgb) {
        if y < self.canvas_rows() {
            if let Some(c) = self.fb.cell_mut(x, y) {
                c.style.bg = bg;
            }
        }
    }
}

impl RenderTarget for TermCanvas {
    fn clear_background(&mut self) {
        self.fb.clear(Cell::blank(BACKDROP));
        let vp = self.viewport;
        let rows = self.canvas_rows();
        let h = vp.board_height().min(rows - vp.origin_y);
        self.fb.fill_rect(
            vp.origin_x,
            vp.origin_y,
            vp.board_width(),
            h,
            Cell::blank(BOARD_BG),
        );
        // Style resets with each frame, like a fresh canvas.
        self.stroke = Rgb::WHITE;
        self.fill = Some(DEFAULT_FILL);
    }

    fn set_stroke_color(&mut self, r: u8, g: u8, b: u8) {
        self.stroke = Rgb::new(r, g, b);
    }

    fn set_no_fill(&mut self) {
        self.fill = None;
    }

    fn draw_circle(&mut self, x: i32, y: i32, diameter: i32) {
        if diameter <= 0 {
            return;
        }
        let vp = self.viewport;
        let r = diameter as f32 / 2.0;

        if let Some(fill) = self.fill {
            let (x0, y0) = vp.map(x - diameter / 2, y - diameter / 2);
            let (x1, y1) = vp.map(x + diameter / 2, y + diameter / 2);
            let px_per_col = TILE_PX as f32 / vp.tile_w as f32;
            let px_per_row = TILE_PX as f32 / vp.tile_h as f32;
            for cy in y0..y1 {
                for cx in x0..x1 {
                    // Cell centre back in canvas pixels.
                    let px = ((cx - vp.origin_x) as f32 + 0.5) * px_per_col;
                    let py = ((cy - vp.origin_y) as f32 + 0.5) * px_per_row;
                    let (dx, dy) = (px - x as f32, py - y as f32);
                    if dx * dx + dy * dy <= r * r {
                        self.paint_bg(cx, cy, fill);
                    }
                }
            }
        }

        let stroke = Cell::new('.', CellStyle::new(self.stroke, BOARD_BG).bold());
        let (ox, oy) = vp.map(x, y);
        let span_cols = r * vp.tile_w as f32 / TILE_PX as f32;
        let span_rows = r * vp.tile_h as f32 / TILE_PX as f32;
        let steps = ((span_cols + span_rows) * 8.0).ceil().max(16.0) as u32;
        for i in 0..steps {
            let theta = i as f32 / steps as f32 * std::f32::consts::TAU;
            // Keep points on the inside edge so a full-canvas circle stays on the board.
            let cx = ox + (theta.cos() * (span_cols - 1.0).max(0.0)).round() as i32;
            let cy = oy + (theta.sin() * (span_rows - 1.0).max(0.0)).round() as i32;
            let bg = self
                .fb
                .cell_mut(cx, cy)
                .map_or(BOARD_BG, |c| c.style.bg);
            let mut cell = stroke;
            cell.style.bg = bg;
            self.plot(cx, cy, cell);
        }
    }

    fn draw_image(&mut self, image: ImageHandle, x: i32, y: i32) {
        let vp = self.viewport;
        let (cx, cy) = vp.map(x, y);
        let cell = match self.atlas.sprite(image) {
            Some(sprite) => Cell::new(sprite.glyph, sprite.style),
            None => Cell::new('?', CellStyle::new(Rgb::new(255, 0, 255), Rgb::BLACK)),
        };
        let h = vp.tile_h.min(self.canvas_rows() - cy);
        self.fb.fill_rect(cx, cy, vp.tile_w, h, cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GraphicBook;
    use crate::types::{GridPos, BOUNDARY_CENTER, BOUNDARY_DIAMETER};

    fn canvas(width: u16, height: u16) -> (TermCanvas, GraphicBook) {
        let mut atlas = GlyphAtlas::new();
        let book = GraphicBook::load(&mut atlas).unwrap();
        (TermCanvas::new(width, height, atlas), book)
    }

    #[test]
    fn viewport_keeps_two_to_one_aspect() {
        let vp = Viewport::fit(100, 30);
        assert_eq!(vp.tile_h, 2);
        assert_eq!(vp.tile_w, 4);
        assert_eq!(vp.board_width(), 48);
        assert_eq!(vp.origin_x, 26);
        assert_eq!(vp.origin_y, 3);
        assert_eq!(vp.map(0, 0), (26, 3));
        assert_eq!(vp.map(40, 40), (30, 5));
    }

    #[test]
    fn image_fills_its_tile() {
        let (mut c, book) = canvas(48, 13);
        c.clear_background();
        let handle = book.road_koma.image.unwrap();
        let (x, y) = GridPos::new(3, 4).to_canvas();
        c.draw_image(handle, x, y);
        let vp = c.viewport();
        let (cx, cy) = vp.map(x, y);
        for dx in 0..vp.tile_w {
            let cell = c.framebuffer().get((cx + dx) as u16, cy as u16).unwrap();
            assert_eq!(cell.ch, '=');
        }
    }

    #[test]
    fn status_row_is_never_painted() {
        let (mut c, book) = canvas(24, 13);
        c.clear_background();
        let handle = book.test_treasure.image.unwrap();
        for gy in 0..BOARD_ROWS {
            for gx in 0..BOARD_COLS {
                let (x, y) = GridPos::new(gx, gy).to_canvas();
                c.draw_image(handle, x, y);
            }
        }
        c.set_stroke_color(255, 0, 0);
        c.draw_circle(BOUNDARY_CENTER, BOUNDARY_CENTER, BOUNDARY_DIAMETER);
        let row = c.status_row().unwrap();
        assert_eq!(c.framebuffer().row_text(row), " ".repeat(24));
    }

    #[test]
    fn boundary_circle_uses_stroke_color_without_fill() {
        let (mut c, _) = canvas(48, 13);
        c.clear_background();
        c.set_no_fill();
        c.set_stroke_color(255, 0, 0);
        c.draw_circle(BOUNDARY_CENTER, BOUNDARY_CENTER, BOUNDARY_DIAMETER);

        let red = Rgb::new(255, 0, 0);
        let dots: Vec<_> = c
            .framebuffer()
            .cells()
            .iter()
            .filter(|cell| cell.ch == '.')
            .collect();
        assert!(!dots.is_empty());
        assert!(dots.iter().all(|cell| cell.style.fg == red));
        // Centre stays board-coloured with no fill.
        let (cx, cy) = c.viewport().map(BOUNDARY_CENTER, BOUNDARY_CENTER);
        let centre = c.framebuffer().get(cx as u16, cy as u16).unwrap();
        assert_eq!(centre.style.bg, BOARD_BG);
    }

    #[test]
    fn unknown_handle_draws_placeholder() {
        let (mut c, _) = canvas(48, 13);
        c.clear_background();
        c.draw_image(ImageHandle(99), 0, 0);
        let vp = c.viewport();
        let cell = c
            .framebuffer()
            .get(vp.origin_x as u16, vp.origin_y as u16)
            .unwrap();
        assert_eq!(cell.ch, '?');
    }
}
