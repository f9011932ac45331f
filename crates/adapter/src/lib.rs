//! Adapter module - remote command stream over TCP with a JSON line protocol
//!
//! This crate connects the view to the process that drives it. The remote
//! end publishes command envelopes; the view renders what they describe.
//!
//! # Protocol Overview
//!
//! The stream is **line-delimited JSON** over a single TCP connection:
//!
//! 1. **Connection**: The view connects to the stream endpoint (default: 127.0.0.1:7780)
//! 2. **Inbound**: Each line is one command envelope, applied in arrival order
//! 3. **Outbound**: Envelopes the view sends are written back the same way
//! 4. **Shutdown**: EOF from the remote end closes the stream; the view keeps rendering
//!
//! # Envelope
//!
//! ```text
//! {"type":"PUT_ROAD","value":{"x":3,"y":4}}
//! {"type":"PUT_SETTLEMENT","value":{"x":5,"y":5}}
//! {"type":"REMOVE_ROAD"}
//! {"type":"TEST_TREASURE","target":"SPARKLE","value":{"x":6,"y":6}}
//! ```
//!
//! `type` is matched case-insensitively. Unknown types are still delivered so
//! the engine can count and log them. Lines that are not valid JSON, or lack
//! `type`, are dropped with a warning.
//!
//! # Environment Variables
//!
//! - `TILE_VIEW_STREAM_HOST`: Endpoint host (default: "127.0.0.1")
//! - `TILE_VIEW_STREAM_PORT`: Endpoint port (default: 7780)
//! - `TILE_VIEW_MAX_PENDING`: Inbound queue capacity (default: 64)
//! - `TILE_VIEW_WIRE_LOG`: Append raw traffic to this file
//! - `TILE_VIEW_MAX_LINE_BYTES`: Longest accepted inbound line (default: 65536)
//! - `TILE_VIEW_STREAM_DISABLED`: Set to "1" or "true" to run without a stream
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking, on a runtime owned by [`CommandStream`]
//! - See [`protocol`] for line framing
//! - See [`client`] for the socket pump
//!
//! # Testing
//!
//! Serve envelopes by hand with netcat:
//!
//! ```bash
//! nc -l 127.0.0.1 7780
//! {"type":"PUT_ROAD","value":{"x":3,"y":4}}
//! ```

pub mod client;
pub mod protocol;
pub mod runtime;

pub use tile_view_core as core;
pub use tile_view_types as types;

pub use client::StreamConfig;
pub use runtime::CommandStream;
