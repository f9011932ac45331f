//! Terminal front-end for the tile view.
//!
//! The engine draws through [`RenderTarget`](tile_view_core::RenderTarget);
//! here that target is a [`TermCanvas`] backed by a cell framebuffer, which
//! [`TerminalRenderer`] flushes to the terminal.
//!
//! - Tiles are two columns wide per row, so the board stays roughly square
//! - Images resolve to glyph sprites from a [`GlyphAtlas`]
//! - The last terminal row belongs to the [`StatusLine`]

pub mod atlas;
pub mod canvas;
pub mod fb;
pub mod input;
pub mod renderer;
pub mod status;
pub mod throttle;

pub use tile_view_core as core;
pub use tile_view_types as types;

pub use atlas::{GlyphAtlas, Sprite};
pub use canvas::{TermCanvas, Viewport};
pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use input::should_quit;
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
pub use status::StatusLine;
pub use throttle::FlushThrottle;
