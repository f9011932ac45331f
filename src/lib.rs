//! tile-view (workspace facade crate).
//!
//! Re-exports the workspace crates as `tile_view::{adapter,core,term,types}` so
//! the runner, tests and benches share one import root.

pub use tile_view_adapter as adapter;
pub use tile_view_core as core;
pub use tile_view_term as term;
pub use tile_view_types as types;
