//! Drawable objects that make up the scene.
//!
//! Two families share one contract: static koma (roads, settlements) that
//! stay until the scene is cleared, and treasure animations that advance one
//! frame per draw and finish after a fixed number of frames.

use crate::command::HandlerError;
use crate::graphic::{GraphicDescriptor, ImageHandle};
use crate::render::RenderTarget;
use crate::types::{AnimationKind, GridPos, SPARKLE_BLINK_FRAMES, TILE_PX};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawableKind {
    Static,
    Animated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KomaKind {
    Road,
    Settlement,
}

fn loaded_image(graphic: &GraphicDescriptor) -> Result<ImageHandle, HandlerError> {
    graphic.image.ok_or(HandlerError::GraphicNotLoaded {
        name: graphic.name,
    })
}

/// A placed piece. Drawn at its tile every frame until the scene is cleared.
#[derive(Debug, Clone)]
pub struct Koma {
    kind: KomaKind,
    pos: GridPos,
    image: ImageHandle,
}

impl Koma {
    /// Only the loaded image handle is kept; the descriptor is not retained.
    pub fn new(
        kind: KomaKind,
        pos: GridPos,
        graphic: &GraphicDescriptor,
    ) -> Result<Self, HandlerError> {
        Ok(Self {
            kind,
            pos,
            image: loaded_image(graphic)?,
        })
    }

    pub fn road(pos: GridPos, graphic: &GraphicDescriptor) -> Result<Self, HandlerError> {
        Self::new(KomaKind::Road, pos, graphic)
    }

    pub fn settlement(pos: GridPos, graphic: &GraphicDescriptor) -> Result<Self, HandlerError> {
        Self::new(KomaKind::Settlement, pos, graphic)
    }

    pub fn kind(&self) -> KomaKind {
        self.kind
    }

    pub fn pos(&self) -> GridPos {
        self.pos
    }

    pub fn image(&self) -> ImageHandle {
        self.image
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        let (x, y) = self.pos.to_canvas();
        target.draw_image(self.image, x, y);
    }
}

/// Frame counter of an animation. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationStatus {
    frame: u32,
    duration: u32,
}

impl AnimationStatus {
    pub fn new(duration: u32) -> Self {
        Self { frame: 0, duration }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn is_finished(&self) -> bool {
        self.frame >= self.duration
    }

    fn advance(&mut self) {
        if !self.is_finished() {
            self.frame += 1;
        }
    }
}

/// Treasure reveal animation.
#[derive(Debug, Clone)]
pub struct TreasureAnimation {
    kind: AnimationKind,
    anchor: GridPos,
    image: ImageHandle,
    status: AnimationStatus,
}

impl TreasureAnimation {
    pub fn new(
        kind: AnimationKind,
        anchor: Option<GridPos>,
        graphic: &GraphicDescriptor,
    ) -> Result<Self, HandlerError> {
        Ok(Self {
            kind,
            anchor: anchor.unwrap_or(GridPos::CENTER),
            image: loaded_image(graphic)?,
            status: AnimationStatus::new(kind.duration_frames()),
        })
    }

    pub fn kind(&self) -> AnimationKind {
        self.kind
    }

    pub fn anchor(&self) -> GridPos {
        self.anchor
    }

    pub fn status(&self) -> &AnimationStatus {
        &self.status
    }

    /// Render the current frame, then advance. Inert once finished.
    pub fn draw(&mut self, target: &mut dyn RenderTarget) {
        if self.status.is_finished() {
            return;
        }

        let (x, y) = self.anchor.to_canvas();
        let frame = self.status.frame();
        match self.kind {
            AnimationKind::Appear => {
                let rise = TILE_PX * frame as i32 / self.status.duration().max(1) as i32;
                target.draw_image(self.image, x, y - rise);
            }
            AnimationKind::Sparkle => {
                if (frame / SPARKLE_BLINK_FRAMES) % 2 == 0 {
                    target.draw_image(self.image, x, y);
                }
            }
        }

        self.status.advance();
    }
}

/// A scene entry, tagged by family.
#[derive(Debug, Clone)]
pub enum Drawable {
    Koma(Koma),
    Animation(TreasureAnimation),
}

impl Drawable {
    pub fn kind(&self) -> DrawableKind {
        match self {
            Drawable::Koma(_) => DrawableKind::Static,
            Drawable::Animation(_) => DrawableKind::Animated,
        }
    }

    /// Static entries never finish.
    pub fn is_finished(&self) -> bool {
        match self {
            Drawable::Koma(_) => false,
            Drawable::Animation(a) => a.status().is_finished(),
        }
    }

    pub fn draw(&mut self, target: &mut dyn RenderTarget) {
        match self {
            Drawable::Koma(k) => k.draw(target),
            Drawable::Animation(a) => a.draw(target),
        }
    }

    pub fn as_koma(&self) -> Option<&Koma> {
        match self {
            Drawable::Koma(k) => Some(k),
            Drawable::Animation(_) => None,
        }
    }

    pub fn as_animation(&self) -> Option<&TreasureAnimation> {
        match self {
            Drawable::Koma(_) => None,
            Drawable::Animation(a) => Some(a),
        }
    }
}

impl From<Koma> for Drawable {
    fn from(value: Koma) -> Self {
        Drawable::Koma(value)
    }
}

impl From<TreasureAnimation> for Drawable {
    fn from(value: TreasureAnimation) -> Self {
        Drawable::Animation(value)
    }
}
