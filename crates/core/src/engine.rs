//! View command engine: owns the scene, dispatches commands, renders frames.
//!
//! Scheduling is cooperative. The owner calls [`ViewCommandEngine::poll_commands`]
//! and [`ViewCommandEngine::tick`] from one loop, so scene mutation and scene
//! iteration never overlap; `&mut self` enforces it.

use thiserror::Error;

use crate::channel::{ChannelPoll, CommandChannel, StreamError};
use crate::command::{
    find_binding, CommandBinding, HandlerError, HandlerOutcome, SceneContext, COMMAND_BINDINGS,
};
use crate::graphic::GraphicBook;
use crate::render::RenderTarget;
use crate::scene::Scene;
use crate::tiles::TileStatus;
use crate::types::{CommandEnvelope, BOUNDARY_CENTER, BOUNDARY_DIAMETER};

/// Upper bound on envelopes handled per `poll_commands` call, so a flooding
/// stream cannot starve the render loop.
pub const MAX_COMMANDS_PER_POLL: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("render target not bound; call set_render_target before tick")]
    RenderTargetUnbound,
    #[error("engine stopped")]
    Stopped,
}

/// What happened to one dispatched envelope.
#[derive(Debug)]
pub enum DispatchOutcome {
    Applied,
    /// Well-formed but deliberately ignored (invalid animation target).
    Filtered,
    /// No handler bound for the command type.
    Unbound,
    Failed(HandlerError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub applied: u64,
    pub filtered: u64,
    pub unbound: u64,
    pub failed: u64,
}

impl DispatchStats {
    pub fn total(&self) -> u64 {
        self.applied + self.filtered + self.unbound + self.failed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// No stream attached yet, or detached by `stop`.
    Detached,
    Live,
    /// The remote end went away. Already placed objects keep rendering.
    Disconnected,
}

pub struct ViewCommandEngine<R: RenderTarget> {
    graphics: GraphicBook,
    scene: Scene,
    tiles: TileStatus,
    bindings: &'static [CommandBinding],
    render_target: Option<R>,
    channel: Option<Box<dyn CommandChannel>>,
    stream_state: StreamState,
    stats: DispatchStats,
    frame: u64,
    stopped: bool,
}

impl<R: RenderTarget> ViewCommandEngine<R> {
    pub fn new(graphics: GraphicBook) -> Self {
        Self::with_bindings(graphics, &COMMAND_BINDINGS)
    }

    pub fn with_bindings(graphics: GraphicBook, bindings: &'static [CommandBinding]) -> Self {
        Self {
            graphics,
            scene: Scene::new(),
            tiles: TileStatus::new(),
            bindings,
            render_target: None,
            channel: None,
            stream_state: StreamState::Detached,
            stats: DispatchStats::default(),
            frame: 0,
            stopped: false,
        }
    }

    /// Bind the canvas used by [`Self::tick`]. Replaces any previous one.
    pub fn set_render_target(&mut self, target: R) {
        self.render_target = Some(target);
    }

    pub fn render_target(&self) -> Option<&R> {
        self.render_target.as_ref()
    }

    pub fn render_target_mut(&mut self) -> Option<&mut R> {
        self.render_target.as_mut()
    }

    /// Attach the command stream. Envelopes are consumed by [`Self::poll_commands`].
    pub fn start_execute(&mut self, mut channel: Box<dyn CommandChannel>) {
        if self.stopped {
            tracing::warn!("engine stopped; refusing command stream");
            channel.close();
            return;
        }
        if let Some(mut old) = self.channel.replace(channel) {
            old.close();
        }
        self.stream_state = StreamState::Live;
        tracing::info!("command stream attached");
    }

    /// Transmit an envelope on the outbound side of the stream.
    pub fn send_command(&mut self, envelope: CommandEnvelope) -> Result<(), StreamError> {
        match self.channel.as_mut() {
            Some(channel) => channel.send_envelope(envelope),
            None if self.stream_state == StreamState::Disconnected => {
                Err(StreamError::Disconnected)
            }
            None => Err(StreamError::NotAttached),
        }
    }

    /// Drain pending inbound envelopes and dispatch them in arrival order.
    ///
    /// Returns the number of envelopes handled.
    pub fn poll_commands(&mut self) -> usize {
        if self.stopped {
            return 0;
        }

        let mut handled = 0;
        while handled < MAX_COMMANDS_PER_POLL {
            let Some(channel) = self.channel.as_mut() else {
                break;
            };
            match channel.poll_envelope() {
                ChannelPoll::Envelope(env) => {
                    self.dispatch(&env);
                    handled += 1;
                }
                ChannelPoll::Empty => break,
                ChannelPoll::Closed => {
                    tracing::warn!("command stream disconnected");
                    self.channel = None;
                    self.stream_state = StreamState::Disconnected;
                    break;
                }
            }
        }
        handled
    }

    /// Run the handler bound to `envelope.command_type`.
    ///
    /// Never fails: every outcome is logged and counted.
    pub fn dispatch(&mut self, envelope: &CommandEnvelope) -> DispatchOutcome {
        let bindings = self.bindings;
        let command = envelope.command_type.as_str();

        let Some(binding) = find_binding(bindings, envelope.command_type) else {
            self.stats.unbound += 1;
            tracing::debug!(command, "no handler bound; envelope dropped");
            return DispatchOutcome::Unbound;
        };

        let mut ctx = SceneContext {
            scene: &mut self.scene,
            tiles: &mut self.tiles,
            graphics: &self.graphics,
        };
        match (binding.handler)(&mut ctx, envelope) {
            Ok(HandlerOutcome::Applied) => {
                self.stats.applied += 1;
                tracing::trace!(command, scene_len = self.scene.len(), "command applied");
                DispatchOutcome::Applied
            }
            Ok(HandlerOutcome::Filtered) => {
                self.stats.filtered += 1;
                tracing::debug!(command, target = ?envelope.target, "invalid animation target; filtered");
                DispatchOutcome::Filtered
            }
            Err(error) => {
                self.stats.failed += 1;
                tracing::warn!(command, %error, "command handler failed");
                DispatchOutcome::Failed(error)
            }
        }
    }

    /// Render one frame: clear, boundary, every scene entry, then prune
    /// finished animations.
    pub fn tick(&mut self) -> Result<(), EngineError> {
        if self.stopped {
            return Err(EngineError::Stopped);
        }
        let Some(target) = self.render_target.as_mut() else {
            return Err(EngineError::RenderTargetUnbound);
        };

        target.clear_background();
        draw_screen_edge(target);
        self.scene.draw_all(target);

        let removed = self.scene.prune_finished();
        if removed > 0 {
            tracing::trace!(removed, frame = self.frame, "finished animations pruned");
        }
        self.frame += 1;
        Ok(())
    }

    /// Unsubscribe from the stream and release the render target.
    pub fn stop(&mut self) -> Option<R> {
        if let Some(mut channel) = self.channel.take() {
            channel.close();
        }
        if self.stream_state == StreamState::Live {
            self.stream_state = StreamState::Detached;
        }
        if !self.stopped {
            tracing::info!(frames = self.frame, "view command engine stopped");
        }
        self.stopped = true;
        self.render_target.take()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tiles(&self) -> &TileStatus {
        &self.tiles
    }

    pub fn graphics(&self) -> &GraphicBook {
        &self.graphics
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn stream_state(&self) -> StreamState {
        self.stream_state
    }

    /// Ticks rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Scene revision; changes whenever the scene does.
    pub fn revision(&self) -> u64 {
        self.scene.revision()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

/// Red outline marking the edge of the playable area.
fn draw_screen_edge(target: &mut dyn RenderTarget) {
    target.set_no_fill();
    target.set_stroke_color(255, 0, 0);
    target.draw_circle(BOUNDARY_CENTER, BOUNDARY_CENTER, BOUNDARY_DIAMETER);
}
