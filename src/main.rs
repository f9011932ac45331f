//! Terminal tile view runner (default binary).
//!
//! Renders the board described by the remote command stream. The stream is
//! optional: without it the board and its boundary are still drawn.

use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use crossterm::event::{self, Event};
use tracing_subscriber::EnvFilter;

use tile_view::adapter::CommandStream;
use tile_view::core::{GraphicBook, StreamState, ViewCommandEngine};
use tile_view::term::{
    should_quit, FlushThrottle, GlyphAtlas, StatusLine, TermCanvas, TerminalRenderer,
};
use tile_view::types::TICK_MS;

/// Runner configuration
#[derive(Debug, Clone)]
struct RunnerConfig {
    tick_ms: u64,
    static_flush_ms: u64,
    trace_path: Option<String>,
}

impl RunnerConfig {
    fn from_env() -> Self {
        use std::env;

        let tick_ms = env::var("TILE_VIEW_TICK_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|&ms| ms > 0)
            .unwrap_or(u64::from(TICK_MS));
        let static_flush_ms = env::var("TILE_VIEW_STATIC_FLUSH_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(250);
        let trace_path = env::var("TILE_VIEW_TRACE_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            tick_ms,
            static_flush_ms,
            trace_path,
        }
    }
}

/// Logs go to a file, or nowhere; stdout belongs to the board.
fn init_tracing(config: &RunnerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.trace_path.as_deref() {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening trace file {}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::sink)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let config = RunnerConfig::from_env();
    init_tracing(&config)?;

    let mut atlas = GlyphAtlas::new();
    let graphics = GraphicBook::load(&mut atlas).context("loading graphics")?;

    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    let mut engine = ViewCommandEngine::new(graphics);
    engine.set_render_target(TermCanvas::new(w, h, atlas));

    match CommandStream::connect_from_env() {
        Ok(Some(stream)) => engine.start_execute(Box::new(stream)),
        Ok(None) => tracing::info!("command stream disabled"),
        Err(error) => {
            tracing::warn!(error = %format!("{:#}", error), "command stream unavailable; rendering without it");
        }
    }

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut engine, &config);

    // Always try to restore terminal state.
    engine.stop();
    let _ = term.exit();
    if let Err(error) = &result {
        tracing::error!(error = %format!("{:#}", error), "runner failed");
    }
    result
}

fn run(
    term: &mut TerminalRenderer,
    engine: &mut ViewCommandEngine<TermCanvas>,
    config: &RunnerConfig,
) -> Result<()> {
    let started = Instant::now();
    let tick_duration = Duration::from_millis(config.tick_ms);
    let mut throttle = FlushThrottle::new(config.static_flush_ms);
    let mut last_tick = Instant::now();

    loop {
        // Input with timeout until next tick.
        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if should_quit(key) => return Ok(()),
                Event::Resize(w, h) => {
                    if let Some(canvas) = engine.render_target_mut() {
                        canvas.resize(w, h);
                    }
                    term.invalidate();
                    throttle.reset();
                }
                _ => {}
            }
        }

        if last_tick.elapsed() < tick_duration {
            continue;
        }
        last_tick = Instant::now();

        engine.poll_commands();
        engine.tick()?;

        let status = StatusLine::from_engine(engine);
        let fingerprint = frame_fingerprint(engine.revision(), &status);
        let canvas = engine
            .render_target_mut()
            .ok_or_else(|| anyhow!("render target released while running"))?;
        if let Some(row) = canvas.status_row() {
            status.draw(canvas.framebuffer_mut(), row);
        }

        let now_ms = started.elapsed().as_millis() as u64;
        if throttle.should_flush(now_ms, fingerprint, status.animating) {
            term.draw_swap(canvas.framebuffer_mut())?;
        }
    }
}

/// Changes whenever anything visible on a static frame changes.
fn frame_fingerprint(revision: u64, status: &StatusLine) -> u64 {
    let stream = match status.stream {
        StreamState::Detached => 1,
        StreamState::Live => 2,
        StreamState::Disconnected => 3,
    };
    revision
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(status.stats.total().rotate_left(24))
        .wrapping_add(stream << 60)
}
