//! Bottom-row status line.

use std::fmt::Write as _;

use arrayvec::ArrayString;

use crate::core::{DispatchStats, RenderTarget, StreamState, ViewCommandEngine};
use crate::fb::{CellStyle, FrameBuffer, Rgb};

const STATUS_BG: Rgb = Rgb::new(30, 30, 30);

/// Snapshot of what the status line shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub stream: StreamState,
    pub objects: usize,
    pub animating: bool,
    pub stats: DispatchStats,
    pub frame: u64,
}

impl StatusLine {
    pub fn from_engine<R: RenderTarget>(engine: &ViewCommandEngine<R>) -> Self {
        Self {
            stream: engine.stream_state(),
            objects: engine.scene().len(),
            animating: engine.scene().is_animating(),
            stats: engine.stats(),
            frame: engine.frame(),
        }
    }

    fn stream_label(&self) -> (&'static str, Rgb) {
        match self.stream {
            StreamState::Live => ("live", Rgb::new(120, 220, 120)),
            StreamState::Detached => ("offline", Rgb::new(160, 160, 160)),
            StreamState::Disconnected => ("disconnected", Rgb::new(230, 90, 90)),
        }
    }

    /// Text after the stream label. Truncated, never reallocated.
    pub fn summary(&self) -> ArrayString<96> {
        let mut s = ArrayString::<96>::new();
        // Overflow only truncates.
        let _ = write!(
            s,
            " | objects {} | ok {} skip {} unbound {} err {}",
            self.objects,
            self.stats.applied,
            self.stats.filtered,
            self.stats.unbound,
            self.stats.failed,
        );
        if self.animating {
            let _ = s.try_push_str(" | *");
        }
        s
    }

    pub fn draw(&self, fb: &mut FrameBuffer, row: u16) {
        let y = i32::from(row);
        fb.tint_row(y, STATUS_BG);
        let (label, color) = self.stream_label();
        let text = CellStyle::new(Rgb::new(200, 200, 200), STATUS_BG);
        fb.put_str(0, y, " stream ", text);
        fb.put_str(8, y, label, CellStyle::new(color, STATUS_BG).bold());
        fb.put_str(8 + label.len() as i32, y, &self.summary(), text);
        let hint = " q quit ";
        let hint_x = i32::from(fb.width()) - hint.len() as i32;
        let used = 8 + label.len() as i32 + self.summary().len() as i32;
        if hint_x > used {
            fb.put_str(hint_x, y, hint, text.dim());
        }
    }
}
