//! Command bindings: which handler runs for which command type.
//!
//! Handlers receive the engine state explicitly through [`SceneContext`]
//! and report failures as [`HandlerError`] instead of unwinding.

use thiserror::Error;

use crate::drawable::{Koma, TreasureAnimation};
use crate::graphic::GraphicBook;
use crate::scene::Scene;
use crate::tiles::TileStatus;
use crate::types::{CommandEnvelope, CommandType, GridPos, TileState};

/// Mutable view of the engine handed to a handler.
pub struct SceneContext<'a> {
    pub scene: &'a mut Scene,
    pub tiles: &'a mut TileStatus,
    pub graphics: &'a GraphicBook,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{} requires a value", .command.as_str())]
    MissingValue { command: CommandType },
    #[error("{} value is malformed: {source}", .command.as_str())]
    MalformedValue {
        command: CommandType,
        #[source]
        source: serde_json::Error,
    },
    #[error("position ({x}, {y}) is off the board")]
    OutOfBoard { x: i32, y: i32 },
    #[error("graphic {name} has no loaded image")]
    GraphicNotLoaded { name: &'static str },
}

/// What a handler did with a well-formed envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    Applied,
    /// Intentionally ignored (e.g. treasure with an unknown animation target).
    Filtered,
}

pub type CommandHandler =
    fn(&mut SceneContext<'_>, &CommandEnvelope) -> Result<HandlerOutcome, HandlerError>;

#[derive(Clone, Copy)]
pub struct CommandBinding {
    pub command_type: CommandType,
    pub handler: CommandHandler,
}

impl std::fmt::Debug for CommandBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandBinding")
            .field("command_type", &self.command_type)
            .finish_non_exhaustive()
    }
}

/// One binding per command type. Lookup is first-match, so a duplicate
/// entry would shadow the later one.
pub static COMMAND_BINDINGS: [CommandBinding; 4] = [
    CommandBinding {
        command_type: CommandType::PutRoad,
        handler: exec_put_road,
    },
    CommandBinding {
        command_type: CommandType::RemoveRoad,
        handler: exec_remove_road,
    },
    CommandBinding {
        command_type: CommandType::PutSettlement,
        handler: exec_put_settlement,
    },
    CommandBinding {
        command_type: CommandType::TestTreasure,
        handler: exec_generate_treasure,
    },
];

pub fn find_binding(
    bindings: &[CommandBinding],
    command_type: CommandType,
) -> Option<&CommandBinding> {
    bindings.iter().find(|b| b.command_type == command_type)
}

fn placement(cmd: &CommandEnvelope) -> Result<GridPos, HandlerError> {
    let command = cmd.command_type;
    let pos = cmd
        .position()
        .ok_or(HandlerError::MissingValue { command })?
        .map_err(|source| HandlerError::MalformedValue { command, source })?;
    if !pos.in_bounds() {
        return Err(HandlerError::OutOfBoard { x: pos.x, y: pos.y });
    }
    Ok(pos)
}

fn exec_put_road(
    ctx: &mut SceneContext<'_>,
    cmd: &CommandEnvelope,
) -> Result<HandlerOutcome, HandlerError> {
    let pos = placement(cmd)?;
    let koma = Koma::road(pos, &ctx.graphics.road_koma)?;
    ctx.scene.push(koma);
    ctx.tiles.set(pos, TileState::Road);
    Ok(HandlerOutcome::Applied)
}

/// Clears every drawable, not only roads.
fn exec_remove_road(
    ctx: &mut SceneContext<'_>,
    _cmd: &CommandEnvelope,
) -> Result<HandlerOutcome, HandlerError> {
    ctx.scene.clear();
    ctx.tiles.clear();
    Ok(HandlerOutcome::Applied)
}

fn exec_put_settlement(
    ctx: &mut SceneContext<'_>,
    cmd: &CommandEnvelope,
) -> Result<HandlerOutcome, HandlerError> {
    let pos = placement(cmd)?;
    let koma = Koma::settlement(pos, &ctx.graphics.settlement_koma)?;
    ctx.scene.push(koma);
    ctx.tiles.set(pos, TileState::Settlement);
    Ok(HandlerOutcome::Applied)
}

fn exec_generate_treasure(
    ctx: &mut SceneContext<'_>,
    cmd: &CommandEnvelope,
) -> Result<HandlerOutcome, HandlerError> {
    let Some(kind) = cmd.animation_kind() else {
        return Ok(HandlerOutcome::Filtered);
    };
    // Anchor is optional; anything unusable falls back to the board centre.
    let anchor = match cmd.position() {
        Some(Ok(pos)) if pos.in_bounds() => Some(pos),
        _ => None,
    };
    let treasure = TreasureAnimation::new(kind, anchor, &ctx.graphics.test_treasure)?;
    ctx.scene.push(treasure);
    Ok(HandlerOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphic::StaticImageLoader;
    use crate::types::{is_animation_type, BOARD_COLS};

    #[test]
    fn every_command_type_has_exactly_one_binding() {
        for ty in CommandType::ALL {
            let n = COMMAND_BINDINGS
                .iter()
                .filter(|b| b.command_type == ty)
                .count();
            assert_eq!(n, 1, "{:?}", ty);
        }
        assert!(find_binding(&COMMAND_BINDINGS, CommandType::Unrecognized).is_none());
    }

    #[test]
    fn first_binding_wins() {
        fn noop(
            _: &mut SceneContext<'_>,
            _: &CommandEnvelope,
        ) -> Result<HandlerOutcome, HandlerError> {
            Ok(HandlerOutcome::Filtered)
        }
        let table = [
            CommandBinding {
                command_type: CommandType::PutRoad,
                handler: noop,
            },
            COMMAND_BINDINGS[0],
        ];
        let graphics = GraphicBook::load(&mut StaticImageLoader::with_graphic_data()).unwrap();
        let mut scene = Scene::new();
        let mut tiles = TileStatus::new();
        let mut ctx = SceneContext {
            scene: &mut scene,
            tiles: &mut tiles,
            graphics: &graphics,
        };
        let binding = find_binding(&table, CommandType::PutRoad).unwrap();
        let outcome =
            (binding.handler)(&mut ctx, &CommandEnvelope::put_road(GridPos::new(0, 0))).unwrap();
        assert_eq!(outcome, HandlerOutcome::Filtered);
        assert!(scene.is_empty());
    }

    #[test]
    fn placement_errors() {
        let missing = CommandEnvelope::new(CommandType::PutRoad);
        assert!(matches!(
            placement(&missing),
            Err(HandlerError::MissingValue {
                command: CommandType::PutRoad
            })
        ));

        let off = CommandEnvelope::put_road(GridPos::new(BOARD_COLS, 0));
        assert!(matches!(
            placement(&off),
            Err(HandlerError::OutOfBoard { x, y: 0 }) if x == BOARD_COLS
        ));

        let mut bad = CommandEnvelope::new(CommandType::PutSettlement);
        bad.value = Some(serde_json::json!("north"));
        let err = placement(&bad).unwrap_err();
        assert!(err.to_string().starts_with("PUT_SETTLEMENT value is malformed"));
    }

    #[test]
    fn treasure_handler_agrees_with_predicate() {
        let graphics = GraphicBook::load(&mut StaticImageLoader::with_graphic_data()).unwrap();
        for target in ["APPEAR", "sparkle", "bogus", ""] {
            let mut scene = Scene::new();
            let mut tiles = TileStatus::new();
            let mut ctx = SceneContext {
                scene: &mut scene,
                tiles: &mut tiles,
                graphics: &graphics,
            };
            let outcome =
                exec_generate_treasure(&mut ctx, &CommandEnvelope::treasure(target)).unwrap();
            let valid = is_animation_type(Some(target));
            assert_eq!(outcome == HandlerOutcome::Applied, valid);
            assert_eq!(scene.len(), usize::from(valid));
        }
    }
}
