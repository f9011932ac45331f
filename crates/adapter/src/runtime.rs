//! Stream runtime integration.
//!
//! Bridges the sync frame loop with the async TCP client.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinHandle;

use crate::client::{connect, run_stream, StreamConfig};
use crate::core::{ChannelPoll, CommandChannel, StreamError};
use crate::types::CommandEnvelope;

/// Live connection to the remote command stream.
///
/// Owns its own tokio runtime; the engine polls it without blocking.
pub struct CommandStream {
    _rt: Runtime,
    inbound_rx: mpsc::Receiver<CommandEnvelope>,
    out_tx: Option<mpsc::UnboundedSender<CommandEnvelope>>,
    task: Option<JoinHandle<()>>,
    peer: SocketAddr,
    closed: bool,
}

impl CommandStream {
    /// Connect to the endpoint in `config` and start pumping it.
    pub fn connect(config: StreamConfig) -> anyhow::Result<Self> {
        let rt = Runtime::new().context("creating tokio runtime")?;
        let socket = rt.block_on(connect(&config))?;
        let peer = socket.peer_addr().context("reading peer address")?;

        let max_pending = config.max_pending.max(1);
        let (inbound_tx, inbound_rx) = mpsc::channel::<CommandEnvelope>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<CommandEnvelope>();

        let task = rt.spawn(async move {
            if let Err(error) = run_stream(config, socket, inbound_tx, out_rx).await {
                tracing::warn!(error = %format!("{:#}", error), "command stream failed");
            }
        });

        Ok(Self {
            _rt: rt,
            inbound_rx,
            out_tx: Some(out_tx),
            task: Some(task),
            peer,
            closed: false,
        })
    }

    /// Connect using environment configuration.
    ///
    /// Returns `Ok(None)` if `TILE_VIEW_STREAM_DISABLED` is set.
    pub fn connect_from_env() -> anyhow::Result<Option<Self>> {
        if StreamConfig::is_disabled() {
            return Ok(None);
        }
        Self::connect(StreamConfig::from_env()).map(Some)
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl CommandChannel for CommandStream {
    fn poll_envelope(&mut self) -> ChannelPoll {
        if self.closed {
            return ChannelPoll::Closed;
        }
        match self.inbound_rx.try_recv() {
            Ok(env) => ChannelPoll::Envelope(env),
            Err(TryRecvError::Empty) => ChannelPoll::Empty,
            Err(TryRecvError::Disconnected) => ChannelPoll::Closed,
        }
    }

    fn send_envelope(&mut self, envelope: CommandEnvelope) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::Disconnected);
        }
        let tx = self.out_tx.as_ref().ok_or(StreamError::Disconnected)?;
        tx.send(envelope).map_err(|_| StreamError::Disconnected)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.out_tx = None;
        self.inbound_rx.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
        tracing::debug!(peer = %self.peer, "command stream closed");
    }
}

impl Drop for CommandStream {
    fn drop(&mut self) {
        self.close();
    }
}
