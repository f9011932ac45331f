//! Command stream seam.
//!
//! The engine only sees a [`CommandChannel`]: a non-blocking inbound queue
//! plus an outbound sender. The network implementation lives in the adapter
//! crate; [`LoopbackChannel`] feeds sent envelopes straight back in.

use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use thiserror::Error;

use crate::types::CommandEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("no command stream attached")]
    NotAttached,
    #[error("command stream disconnected")]
    Disconnected,
}

/// Result of polling the inbound side.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelPoll {
    Envelope(CommandEnvelope),
    /// Nothing pending right now.
    Empty,
    /// The stream is gone; nothing more will arrive.
    Closed,
}

pub trait CommandChannel {
    fn poll_envelope(&mut self) -> ChannelPoll;
    fn send_envelope(&mut self, envelope: CommandEnvelope) -> Result<(), StreamError>;
    /// Unsubscribe. Later polls report `Closed`.
    fn close(&mut self);
}

/// In-process channel: everything sent is delivered back inbound.
///
/// A [`LoopbackFeed`] can inject envelopes from another thread, standing in
/// for the remote end.
pub struct LoopbackChannel {
    tx: Option<Sender<CommandEnvelope>>,
    rx: Receiver<CommandEnvelope>,
    closed: bool,
}

/// Remote-side handle of a [`LoopbackChannel`].
#[derive(Clone)]
pub struct LoopbackFeed {
    tx: Sender<CommandEnvelope>,
}

impl LoopbackFeed {
    pub fn push(&self, envelope: CommandEnvelope) -> Result<(), StreamError> {
        self.tx
            .send(envelope)
            .map_err(|_| StreamError::Disconnected)
    }
}

impl LoopbackChannel {
    pub fn new() -> (Self, LoopbackFeed) {
        let (tx, rx) = channel();
        let feed = LoopbackFeed { tx: tx.clone() };
        (
            Self {
                tx: Some(tx),
                rx,
                closed: false,
            },
            feed,
        )
    }
}

impl CommandChannel for LoopbackChannel {
    fn poll_envelope(&mut self) -> ChannelPoll {
        if self.closed {
            return ChannelPoll::Closed;
        }
        match self.rx.try_recv() {
            Ok(env) => ChannelPoll::Envelope(env),
            Err(TryRecvError::Empty) => ChannelPoll::Empty,
            Err(TryRecvError::Disconnected) => ChannelPoll::Closed,
        }
    }

    fn send_envelope(&mut self, envelope: CommandEnvelope) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::Disconnected);
        }
        let tx = self.tx.as_ref().ok_or(StreamError::Disconnected)?;
        tx.send(envelope).map_err(|_| StreamError::Disconnected)
    }

    fn close(&mut self) {
        self.closed = true;
        self.tx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommandType, GridPos};

    #[test]
    fn sent_envelopes_come_back_in_order() {
        let (mut ch, feed) = LoopbackChannel::new();
        ch.send_envelope(CommandEnvelope::put_road(GridPos::new(1, 2)))
            .unwrap();
        feed.push(CommandEnvelope::remove_road()).unwrap();

        match ch.poll_envelope() {
            ChannelPoll::Envelope(e) => assert_eq!(e.command_type, CommandType::PutRoad),
            other => panic!("unexpected poll: {:?}", other),
        }
        match ch.poll_envelope() {
            ChannelPoll::Envelope(e) => assert_eq!(e.command_type, CommandType::RemoveRoad),
            other => panic!("unexpected poll: {:?}", other),
        }
        assert_eq!(ch.poll_envelope(), ChannelPoll::Empty);
    }

    #[test]
    fn closed_once_every_sender_is_gone() {
        let (mut ch, feed) = LoopbackChannel::new();
        feed.push(CommandEnvelope::remove_road()).unwrap();
        ch.close();
        assert_eq!(ch.poll_envelope(), ChannelPoll::Closed);
        assert_eq!(
            ch.send_envelope(CommandEnvelope::remove_road()),
            Err(StreamError::Disconnected)
        );
        drop(feed);
    }

    #[test]
    fn dropping_the_feed_alone_keeps_channel_open() {
        let (mut ch, feed) = LoopbackChannel::new();
        drop(feed);
        assert_eq!(ch.poll_envelope(), ChannelPoll::Empty);
    }
}
