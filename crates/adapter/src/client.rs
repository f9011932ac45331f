//! TCP client for the remote command stream
//!
//! Connects to the configured endpoint, forwards decoded envelopes into a
//! bounded queue and writes outbound envelopes back as lines.
//! Uses tokio for async networking.

use std::net::SocketAddr;

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::protocol::{encode_into, parse_line};
use crate::types::CommandEnvelope;

/// Records the wire log may fall behind by before new ones are dropped.
const WIRE_LOG_CAPACITY: usize = 1024;

/// Stream configuration
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub host: String,
    pub port: u16,
    /// Capacity of the inbound queue between the socket and the frame loop.
    pub max_pending: usize,
    /// Append every inbound/outbound line to this file when set.
    pub wire_log_path: Option<String>,
    /// Longest accepted inbound line, newline excluded. Longer lines are
    /// skipped whole.
    pub max_line_bytes: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7780,
            max_pending: 64,
            wire_log_path: None,
            max_line_bytes: 64 * 1024,
        }
    }
}

impl StreamConfig {
    /// Create from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let host = env::var("TILE_VIEW_STREAM_HOST").unwrap_or(defaults.host);
        let port = env::var("TILE_VIEW_STREAM_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);

        let max_pending = env::var("TILE_VIEW_MAX_PENDING")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_pending);

        let wire_log_path = env::var("TILE_VIEW_WIRE_LOG")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) });

        let max_line_bytes = env::var("TILE_VIEW_MAX_LINE_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&n| n > 0)
            .unwrap_or(defaults.max_line_bytes);

        Self {
            host,
            port,
            max_pending,
            wire_log_path,
            max_line_bytes,
        }
    }

    /// Whether the stream is disabled via `TILE_VIEW_STREAM_DISABLED`.
    pub fn is_disabled() -> bool {
        std::env::var("TILE_VIEW_STREAM_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid stream address {}:{}", self.host, self.port))
    }
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Inbound,
    Outbound,
}

#[derive(Debug, Clone)]
struct WireRecord {
    direction: Direction,
    bytes: Vec<u8>,
}

fn spawn_wire_log(path: String) -> mpsc::Sender<WireRecord> {
    let (tx, mut rx) = mpsc::channel::<WireRecord>(WIRE_LOG_CAPACITY);
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(error) => {
                tracing::warn!(%path, %error, "wire log unavailable");
                return;
            }
        };

        while let Some(rec) = rx.recv().await {
            let prefix: &[u8] = match rec.direction {
                Direction::Inbound => b"<< ",
                Direction::Outbound => b">> ",
            };
            if file.write_all(prefix).await.is_err() || file.write_all(&rec.bytes).await.is_err() {
                break;
            }
            if !rec.bytes.ends_with(b"\n") && file.write_all(b"\n").await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

/// Queue a record for the wire log. Returns `false` if it was dropped
/// because the log task is behind or gone.
fn log_wire(tx: &mpsc::Sender<WireRecord>, direction: Direction, bytes: &[u8]) -> bool {
    match tx.try_send(WireRecord {
        direction,
        bytes: bytes.to_vec(),
    }) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::trace!(?direction, "wire log behind; record dropped");
            false
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

enum LineRead {
    Line,
    TooLong(usize),
    Eof,
}

/// Read one `\n`-terminated line into `buf`, holding at most `max` bytes
/// plus the newline. An oversized line is consumed up to its newline and
/// reported with its length; `buf` is left empty.
async fn read_bounded_line<R>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max: usize,
) -> std::io::Result<LineRead>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let limit = max as u64 + 1;
    if (&mut *reader).take(limit).read_until(b'\n', buf).await? == 0 {
        return Ok(LineRead::Eof);
    }
    if buf.ends_with(b"\n") || buf.len() <= max {
        return Ok(LineRead::Line);
    }

    let mut skipped = buf.len();
    loop {
        buf.clear();
        let n = (&mut *reader).take(limit).read_until(b'\n', buf).await?;
        skipped += n;
        if n == 0 || buf.ends_with(b"\n") {
            break;
        }
    }
    buf.clear();
    Ok(LineRead::TooLong(skipped))
}

/// Open the TCP connection described by `config`.
pub async fn connect(config: &StreamConfig) -> anyhow::Result<TcpStream> {
    let addr = config.socket_addr()?;
    let socket = TcpStream::connect(addr)
        .await
        .with_context(|| format!("connecting to command stream at {}", addr))?;
    tracing::info!(%addr, "connected to command stream");
    Ok(socket)
}

/// Pump a connected socket until the remote end goes away.
///
/// Decoded envelopes go to `inbound_tx`; a full queue drops the envelope.
/// Envelopes received on `out_rx` are written back as lines. When this
/// returns, `inbound_tx` is dropped and the consumer sees the stream closed.
pub async fn run_stream(
    config: StreamConfig,
    socket: TcpStream,
    inbound_tx: mpsc::Sender<CommandEnvelope>,
    mut out_rx: mpsc::UnboundedReceiver<CommandEnvelope>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.wire_log_path.clone().map(spawn_wire_log);
    let (reader, mut writer) = socket.into_split();
    let mut reader = BufReader::new(reader);

    let wire_log_tx_out = wire_log_tx.clone();
    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(256);
        while let Some(envelope) = out_rx.recv().await {
            buf.clear();
            if let Err(error) = encode_into(&envelope, &mut buf) {
                tracing::warn!(%error, "outbound envelope not encodable; skipped");
                continue;
            }
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
            if let Some(tx) = wire_log_tx_out.as_ref() {
                log_wire(tx, Direction::Outbound, &buf);
            }
        }
    });

    let mut buf: Vec<u8> = Vec::with_capacity(256);
    let result = loop {
        match read_bounded_line(&mut reader, &mut buf, config.max_line_bytes).await {
            Ok(LineRead::Line) => {}
            Ok(LineRead::TooLong(len)) => {
                tracing::warn!(
                    len,
                    max = config.max_line_bytes,
                    "oversized envelope line dropped"
                );
                continue;
            }
            // Remote closed the stream
            Ok(LineRead::Eof) => break Ok(()),
            Err(e) => break Err(anyhow::Error::from(e).context("reading command stream")),
        }

        if let Some(tx) = wire_log_tx.as_ref() {
            log_wire(tx, Direction::Inbound, &buf);
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(error) => {
                tracing::warn!(%error, "non-UTF-8 envelope line dropped");
                continue;
            }
        };

        let envelope = match parse_line(line) {
            Ok(Some(env)) => env,
            Ok(None) => continue,
            Err(error) => {
                tracing::warn!(%error, "malformed envelope line dropped");
                continue;
            }
        };

        match inbound_tx.try_send(envelope) {
            Ok(()) => {}
            Err(TrySendError::Full(env)) => {
                tracing::warn!(
                    command = env.command_type.as_str(),
                    "inbound queue full; envelope dropped"
                );
            }
            Err(TrySendError::Closed(_)) => {
                // Consumer went away; nobody left to deliver to.
                break Ok(());
            }
        }
    };

    write_task.abort();
    let _ = write_task.await;
    tracing::info!("command stream ended");
    result
}
