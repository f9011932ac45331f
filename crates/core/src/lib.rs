//! Core module - scene state and command dispatch, no I/O
//!
//! This crate owns everything between a decoded command envelope and a call
//! on a canvas. It has **no dependency** on terminals, sockets or image files:
//! those are reached through three small traits.
//!
//! - [`ImageLoader`](graphic::ImageLoader): resolves graphic resource paths
//! - [`RenderTarget`](render::RenderTarget): canvas drawing primitives
//! - [`CommandChannel`](channel::CommandChannel): inbound/outbound envelopes
//!
//! # Module Structure
//!
//! - [`graphic`]: graphic descriptors and the [`GraphicBook`] registry
//! - [`drawable`]: static koma and treasure animations
//! - [`tiles`]: board occupancy
//! - [`scene`]: insertion-ordered drawables with finished-animation pruning
//! - [`command`]: handler bindings per command type
//! - [`engine`]: [`ViewCommandEngine`], the dispatcher and frame loop
//! - [`channel`]: stream seam plus an in-process loopback
//! - [`render`]: canvas seam plus a recording target for headless use
//!
//! # Frame Loop
//!
//! Each frame the owner drains the stream, then renders:
//!
//! 1. `poll_commands()` dispatches every pending envelope in arrival order
//! 2. `tick()` clears the canvas, draws the boundary circle, draws each
//!    scene entry, then drops animations that have finished
//!
//! # Example
//!
//! ```
//! use tile_view_core::{
//!     GraphicBook, LoopbackChannel, RecordingTarget, StaticImageLoader, ViewCommandEngine,
//! };
//! use tile_view_core::types::{CommandEnvelope, GridPos};
//!
//! let graphics = GraphicBook::load(&mut StaticImageLoader::with_graphic_data()).unwrap();
//! let mut engine = ViewCommandEngine::new(graphics);
//! engine.set_render_target(RecordingTarget::new());
//!
//! let (channel, feed) = LoopbackChannel::new();
//! engine.start_execute(Box::new(channel));
//! feed.push(CommandEnvelope::put_road(GridPos::new(1, 2))).unwrap();
//!
//! assert_eq!(engine.poll_commands(), 1);
//! engine.tick().unwrap();
//! assert_eq!(engine.scene().len(), 1);
//! ```

pub mod channel;
pub mod command;
pub mod drawable;
pub mod engine;
pub mod graphic;
pub mod render;
pub mod scene;
pub mod tiles;

pub use tile_view_types as types;

// Re-export commonly used types for convenience
pub use channel::{ChannelPoll, CommandChannel, LoopbackChannel, LoopbackFeed, StreamError};
pub use command::{CommandBinding, HandlerError, HandlerOutcome, SceneContext, COMMAND_BINDINGS};
pub use drawable::{AnimationStatus, Drawable, DrawableKind, Koma, KomaKind, TreasureAnimation};
pub use engine::{
    DispatchOutcome, DispatchStats, EngineError, StreamState, ViewCommandEngine,
    MAX_COMMANDS_PER_POLL,
};
pub use graphic::{
    load_graphic, AssetLoadError, GraphicBook, GraphicDescriptor, ImageHandle, ImageLoader,
    StaticImageLoader, GRAPHIC_DATA,
};
pub use render::{DrawCall, RecordingTarget, RenderTarget};
pub use scene::Scene;
pub use tiles::TileStatus;
