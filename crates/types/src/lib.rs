//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the viewer.
//! Everything here is plain data: the board geometry, the command envelope
//! that arrives over the stream, and the animation kinds a treasure can take.
//!
//! # Board Geometry
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `CANVAS_SIZE` | 480 | Canvas width and height in pixels |
//! | `TILE_PX` | 40 | Tile edge in canvas pixels |
//! | `BOARD_COLS` | 12 | Tiles per row |
//! | `BOARD_ROWS` | 12 | Tiles per column |
//! | `TICK_MS` | 16 | Default frame interval (~60 FPS) |
//!
//! # Wire Shape
//!
//! One envelope per message:
//!
//! ```text
//! {"type":"PUT_ROAD","value":{"x":1,"y":2}}
//! {"type":"TEST_TREASURE","target":"APPEAR"}
//! ```
//!
//! # Examples
//!
//! ```
//! use tile_view_types::{is_animation_type, CommandEnvelope, CommandType, GridPos};
//!
//! let env: CommandEnvelope =
//!     serde_json::from_str(r#"{"type":"put_road","value":{"x":1,"y":2}}"#).unwrap();
//! assert_eq!(env.command_type, CommandType::PutRoad);
//! assert_eq!(env.position().unwrap().unwrap(), GridPos::new(1, 2));
//!
//! assert!(is_animation_type(Some("appear")));
//! assert!(!is_animation_type(Some("bogus")));
//! assert!(!is_animation_type(None));
//! ```

use serde::{Deserialize, Serialize};

/// Canvas width and height in pixels.
pub const CANVAS_SIZE: i32 = 480;

/// Tile edge length in canvas pixels.
pub const TILE_PX: i32 = 40;

/// Board width in tiles.
pub const BOARD_COLS: i32 = CANVAS_SIZE / TILE_PX;

/// Board height in tiles.
pub const BOARD_ROWS: i32 = CANVAS_SIZE / TILE_PX;

/// Default frame interval in milliseconds (16ms ≈ 60 FPS).
pub const TICK_MS: u32 = 16;

/// Centre of the playable-area boundary circle (both axes).
pub const BOUNDARY_CENTER: i32 = CANVAS_SIZE / 2;

/// Diameter of the playable-area boundary circle.
pub const BOUNDARY_DIAMETER: i32 = CANVAS_SIZE;

/// Frames in an `APPEAR` treasure animation.
pub const APPEAR_FRAMES: u32 = 48;

/// Frames in a `SPARKLE` treasure animation.
pub const SPARKLE_FRAMES: u32 = 60;

/// Half period of the sparkle blink.
pub const SPARKLE_BLINK_FRAMES: u32 = 6;

/// A tile coordinate on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    /// Centre tile, used as the default treasure anchor.
    pub const CENTER: GridPos = GridPos {
        x: BOARD_COLS / 2,
        y: BOARD_ROWS / 2,
    };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn in_bounds(&self) -> bool {
        self.x >= 0 && self.x < BOARD_COLS && self.y >= 0 && self.y < BOARD_ROWS
    }

    /// Top-left canvas pixel of this tile.
    ///
    /// ```
    /// use tile_view_types::{GridPos, TILE_PX};
    ///
    /// assert_eq!(GridPos::new(3, 4).to_canvas(), (3 * TILE_PX, 4 * TILE_PX));
    /// ```
    pub fn to_canvas(&self) -> (i32, i32) {
        (self.x * TILE_PX, self.y * TILE_PX)
    }

    /// Row-major index into a `BOARD_COLS × BOARD_ROWS` grid, if in bounds.
    pub fn index(&self) -> Option<usize> {
        if !self.in_bounds() {
            return None;
        }
        Some((self.y * BOARD_COLS + self.x) as usize)
    }
}

/// Occupancy of a single board tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TileState {
    #[default]
    Empty,
    Road,
    Settlement,
}

/// The closed set of commands the viewer understands.
///
/// Names are matched case-insensitively. `GENERATE_TREASURE` is accepted as
/// an alias of `TEST_TREASURE`. Any other name decodes to `Unrecognized`,
/// which no handler is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandType {
    PutRoad,
    RemoveRoad,
    PutSettlement,
    TestTreasure,
    Unrecognized,
}

impl CommandType {
    /// Every command type that has a handler.
    pub const ALL: [CommandType; 4] = [
        CommandType::PutRoad,
        CommandType::RemoveRoad,
        CommandType::PutSettlement,
        CommandType::TestTreasure,
    ];

    /// Parse a wire name (case-insensitive).
    ///
    /// ```
    /// use tile_view_types::CommandType;
    ///
    /// assert_eq!(CommandType::from_wire("PUT_ROAD"), CommandType::PutRoad);
    /// assert_eq!(CommandType::from_wire("generate_treasure"), CommandType::TestTreasure);
    /// assert_eq!(CommandType::from_wire("FLY_AWAY"), CommandType::Unrecognized);
    /// ```
    pub fn from_wire(s: &str) -> Self {
        if s.eq_ignore_ascii_case("PUT_ROAD") {
            Self::PutRoad
        } else if s.eq_ignore_ascii_case("REMOVE_ROAD") {
            Self::RemoveRoad
        } else if s.eq_ignore_ascii_case("PUT_SETTLEMENT") {
            Self::PutSettlement
        } else if s.eq_ignore_ascii_case("TEST_TREASURE")
            || s.eq_ignore_ascii_case("GENERATE_TREASURE")
        {
            Self::TestTreasure
        } else {
            Self::Unrecognized
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::PutRoad => "PUT_ROAD",
            CommandType::RemoveRoad => "REMOVE_ROAD",
            CommandType::PutSettlement => "PUT_SETTLEMENT",
            CommandType::TestTreasure => "TEST_TREASURE",
            CommandType::Unrecognized => "UNRECOGNIZED",
        }
    }
}

impl<'de> Deserialize<'de> for CommandType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <std::borrow::Cow<'de, str>>::deserialize(deserializer)?;
        Ok(Self::from_wire(&s))
    }
}

impl Serialize for CommandType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Animated object kinds a treasure command may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    /// Rises one tile above its anchor.
    Appear,
    /// Blinks in place.
    Sparkle,
}

impl AnimationKind {
    pub fn from_target(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("APPEAR") {
            Some(Self::Appear)
        } else if s.eq_ignore_ascii_case("SPARKLE") {
            Some(Self::Sparkle)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationKind::Appear => "APPEAR",
            AnimationKind::Sparkle => "SPARKLE",
        }
    }

    /// Number of frames before the animation is finished.
    pub fn duration_frames(&self) -> u32 {
        match self {
            AnimationKind::Appear => APPEAR_FRAMES,
            AnimationKind::Sparkle => SPARKLE_FRAMES,
        }
    }
}

/// Whether `target` names a valid animated-object kind.
pub fn is_animation_type(target: Option<&str>) -> bool {
    target.and_then(AnimationKind::from_target).is_some()
}

/// A single decoded command message.
///
/// `value` is kept as raw JSON; each handler decodes the placement it needs,
/// so a malformed placement fails that one command instead of the stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    #[serde(rename = "type")]
    pub command_type: CommandType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl CommandEnvelope {
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            value: None,
            target: None,
        }
    }

    pub fn put_road(pos: GridPos) -> Self {
        Self::new(CommandType::PutRoad).with_position(pos)
    }

    pub fn put_settlement(pos: GridPos) -> Self {
        Self::new(CommandType::PutSettlement).with_position(pos)
    }

    pub fn remove_road() -> Self {
        Self::new(CommandType::RemoveRoad)
    }

    pub fn treasure(target: &str) -> Self {
        Self::new(CommandType::TestTreasure).with_target(target)
    }

    pub fn with_position(mut self, pos: GridPos) -> Self {
        self.value = Some(serde_json::json!({ "x": pos.x, "y": pos.y }));
        self
    }

    pub fn with_target(mut self, target: &str) -> Self {
        self.target = Some(target.to_string());
        self
    }

    /// Decode `value` as a grid position. `None` when no value was sent.
    pub fn position(&self) -> Option<Result<GridPos, serde_json::Error>> {
        self.value.as_ref().map(GridPos::deserialize)
    }

    /// Animation kind named by `target`, if it is a valid one.
    pub fn animation_kind(&self) -> Option<AnimationKind> {
        self.target.as_deref().and_then(AnimationKind::from_target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_geometry_matches_canvas() {
        assert_eq!(BOARD_COLS, 12);
        assert_eq!(BOARD_ROWS, 12);
        assert_eq!(BOUNDARY_CENTER, 240);
        assert_eq!(BOUNDARY_DIAMETER, 480);
        assert!(GridPos::CENTER.in_bounds());
    }

    #[test]
    fn grid_index_rejects_out_of_board() {
        assert_eq!(GridPos::new(0, 0).index(), Some(0));
        assert_eq!(GridPos::new(1, 1).index(), Some(13));
        assert_eq!(GridPos::new(-1, 0).index(), None);
        assert_eq!(GridPos::new(0, BOARD_ROWS).index(), None);
    }

    #[test]
    fn unknown_type_decodes_as_unrecognized() {
        let env: CommandEnvelope = serde_json::from_str(r#"{"type":"MOVE_SHIP"}"#).unwrap();
        assert_eq!(env.command_type, CommandType::Unrecognized);
        assert!(env.value.is_none());
        assert!(env.target.is_none());
    }

    #[test]
    fn envelope_serializes_canonical_names() {
        let env = CommandEnvelope::put_settlement(GridPos::new(3, 4));
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(v["type"], "PUT_SETTLEMENT");
        assert_eq!(v["value"]["x"], 3);
        assert_eq!(v["value"]["y"], 4);
        assert!(v.get("target").is_none());
    }

    #[test]
    fn malformed_value_surfaces_on_position() {
        let env: CommandEnvelope =
            serde_json::from_str(r#"{"type":"PUT_ROAD","value":{"x":"one","y":2}}"#).unwrap();
        assert!(env.position().unwrap().is_err());

        let env: CommandEnvelope = serde_json::from_str(r#"{"type":"PUT_ROAD","value":null}"#).unwrap();
        assert!(env.position().is_none());
    }

    #[test]
    fn animation_predicate_is_pure() {
        for _ in 0..3 {
            assert!(is_animation_type(Some("SPARKLE")));
            assert!(!is_animation_type(Some("valid-kind")));
        }
        assert_eq!(AnimationKind::Appear.duration_frames(), APPEAR_FRAMES);
        assert_eq!(
            CommandEnvelope::treasure("sparkle").animation_kind(),
            Some(AnimationKind::Sparkle)
        );
    }
}
