//! Built-in glyph sprites standing in for image resources.
//!
//! The terminal cannot show bitmaps, so each known resource path maps to a
//! glyph and two colors. Loading hands out the sprite's slot as its handle.

use arrayvec::ArrayVec;

use crate::core::graphic::{ROAD_KOMA, SETTLEMENT_KOMA, TEST_TREASURE};
use crate::core::{AssetLoadError, ImageHandle, ImageLoader};
use crate::fb::{CellStyle, Rgb};

/// Maximum number of distinct sprites an atlas can hold.
pub const ATLAS_CAPACITY: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub path: &'static str,
    pub glyph: char,
    pub style: CellStyle,
}

const BUILTIN_SPRITES: [Sprite; 3] = [
    Sprite {
        path: ROAD_KOMA.path,
        glyph: '=',
        style: CellStyle::new(Rgb::new(240, 220, 170), Rgb::new(120, 84, 48)),
    },
    Sprite {
        path: SETTLEMENT_KOMA.path,
        glyph: '^',
        style: CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(40, 90, 170)).bold(),
    },
    Sprite {
        path: TEST_TREASURE.path,
        glyph: '$',
        style: CellStyle::new(Rgb::new(255, 215, 0), Rgb::new(90, 60, 0)).bold(),
    },
];

/// [`ImageLoader`] over the built-in sprites.
#[derive(Debug, Clone, Default)]
pub struct GlyphAtlas {
    loaded: ArrayVec<Sprite, ATLAS_CAPACITY>,
}

impl GlyphAtlas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprite(&self, handle: ImageHandle) -> Option<&Sprite> {
        self.loaded.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

impl ImageLoader for GlyphAtlas {
    fn load(&mut self, path: &str) -> Result<ImageHandle, AssetLoadError> {
        if let Some(slot) = self.loaded.iter().position(|s| s.path == path) {
            return Ok(ImageHandle(slot as u32));
        }
        let sprite = BUILTIN_SPRITES
            .iter()
            .find(|s| s.path == path)
            .ok_or_else(|| AssetLoadError::NotFound {
                path: path.to_string(),
            })?;
        let slot = self.loaded.len();
        self.loaded
            .try_push(*sprite)
            .map_err(|_| AssetLoadError::Unreadable {
                path: path.to_string(),
                reason: format!("atlas full ({} sprites)", ATLAS_CAPACITY),
            })?;
        Ok(ImageHandle(slot as u32))
    }
}
