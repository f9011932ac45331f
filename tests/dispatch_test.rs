//! Command dispatch scenarios against a headless engine.

use serde_json::json;

use tile_view::core::{
    DispatchOutcome, GraphicBook, HandlerError, KomaKind, RecordingTarget, StaticImageLoader,
    ViewCommandEngine, COMMAND_BINDINGS,
};
use tile_view::types::{CommandEnvelope, CommandType, GridPos, TileState};

fn engine() -> ViewCommandEngine<RecordingTarget> {
    let graphics = GraphicBook::load(&mut StaticImageLoader::with_graphic_data()).unwrap();
    let mut engine = ViewCommandEngine::new(graphics);
    engine.set_render_target(RecordingTarget::new());
    engine
}

fn wire(line: serde_json::Value) -> CommandEnvelope {
    serde_json::from_value(line).unwrap()
}

#[test]
fn road_then_settlement_are_kept_in_order() {
    let mut e = engine();
    e.dispatch(&wire(json!({"type": "PUT_ROAD", "value": {"x": 1, "y": 2}})));
    e.dispatch(&wire(json!({"type": "PUT_SETTLEMENT", "value": {"x": 3, "y": 4}})));

    assert_eq!(e.scene().len(), 2);
    let first = e.scene().get(0).unwrap().as_koma().unwrap();
    assert_eq!(first.kind(), KomaKind::Road);
    assert_eq!(first.pos(), GridPos::new(1, 2));
    let second = e.scene().get(1).unwrap().as_koma().unwrap();
    assert_eq!(second.kind(), KomaKind::Settlement);
    assert_eq!(second.pos(), GridPos::new(3, 4));

    assert_eq!(e.tiles().get(GridPos::new(1, 2)), Some(TileState::Road));
    assert_eq!(e.tiles().get(GridPos::new(3, 4)), Some(TileState::Settlement));
}

#[test]
fn remove_road_empties_the_scene() {
    let mut e = engine();
    e.dispatch(&CommandEnvelope::put_road(GridPos::new(0, 0)));
    e.dispatch(&wire(json!({"type": "REMOVE_ROAD"})));
    assert!(e.scene().is_empty());
    assert_eq!(e.tiles().count(TileState::Road), 0);
}

#[test]
fn remove_road_clears_settlements_and_animations_too() {
    let mut e = engine();
    e.dispatch(&CommandEnvelope::put_road(GridPos::new(0, 0)));
    e.dispatch(&CommandEnvelope::put_settlement(GridPos::new(1, 1)));
    e.dispatch(&CommandEnvelope::treasure("APPEAR"));
    assert_eq!(e.scene().len(), 3);

    e.dispatch(&CommandEnvelope::remove_road());
    assert!(e.scene().is_empty());
    assert_eq!(e.tiles().count(TileState::Empty), e.tiles().cells().len());
}

#[test]
fn scene_length_counts_placements_since_last_clear() {
    let mut e = engine();
    let script = [
        CommandEnvelope::put_road(GridPos::new(0, 0)),
        CommandEnvelope::put_settlement(GridPos::new(1, 0)),
        CommandEnvelope::remove_road(),
        CommandEnvelope::put_road(GridPos::new(2, 0)),
        CommandEnvelope::put_road(GridPos::new(3, 0)),
        CommandEnvelope::put_settlement(GridPos::new(4, 0)),
    ];
    for env in &script {
        e.dispatch(env);
    }
    assert_eq!(e.scene().len(), 3);
}

#[test]
fn command_type_is_case_insensitive_on_the_wire() {
    let mut e = engine();
    e.dispatch(&wire(json!({"type": "put_road", "value": {"x": 5, "y": 5}})));
    e.dispatch(&wire(json!({"type": "Put_Settlement", "value": {"x": 6, "y": 5}})));
    assert_eq!(e.scene().len(), 2);
}

#[test]
fn unknown_type_leaves_scene_unchanged() {
    let mut e = engine();
    e.dispatch(&CommandEnvelope::put_road(GridPos::new(0, 0)));
    let env = wire(json!({"type": "MOVE_KNIGHT", "value": {"x": 1, "y": 1}}));
    assert_eq!(env.command_type, CommandType::Unrecognized);

    assert!(matches!(e.dispatch(&env), DispatchOutcome::Unbound));
    assert_eq!(e.scene().len(), 1);
    assert_eq!(e.stats().unbound, 1);
}

#[test]
fn every_known_type_is_bound_once() {
    for ty in CommandType::ALL {
        let bound = COMMAND_BINDINGS
            .iter()
            .filter(|b| b.command_type == ty)
            .count();
        assert_eq!(bound, 1, "{}", ty.as_str());
    }
}

#[test]
fn handler_errors_are_contained() {
    let mut e = engine();
    let outcome = e.dispatch(&wire(json!({"type": "PUT_ROAD"})));
    assert!(matches!(
        outcome,
        DispatchOutcome::Failed(HandlerError::MissingValue { .. })
    ));

    let outcome = e.dispatch(&wire(json!({"type": "PUT_ROAD", "value": {"x": 12, "y": 0}})));
    assert!(matches!(
        outcome,
        DispatchOutcome::Failed(HandlerError::OutOfBoard { x: 12, y: 0 })
    ));

    let outcome = e.dispatch(&wire(json!({"type": "PUT_SETTLEMENT", "value": "north"})));
    assert!(matches!(
        outcome,
        DispatchOutcome::Failed(HandlerError::MalformedValue { .. })
    ));

    assert!(e.scene().is_empty());
    assert_eq!(e.stats().failed, 3);

    // The engine keeps working after failures.
    e.dispatch(&CommandEnvelope::put_road(GridPos::new(0, 0)));
    assert_eq!(e.scene().len(), 1);
    assert!(e.tick().is_ok());
}

#[test]
fn stats_account_for_every_dispatch() {
    let mut e = engine();
    e.dispatch(&CommandEnvelope::put_road(GridPos::new(0, 0)));
    e.dispatch(&CommandEnvelope::treasure("bogus"));
    e.dispatch(&CommandEnvelope::new(CommandType::Unrecognized));
    e.dispatch(&CommandEnvelope::new(CommandType::PutRoad));

    let stats = e.stats();
    assert_eq!(stats.applied, 1);
    assert_eq!(stats.filtered, 1);
    assert_eq!(stats.unbound, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.total(), 4);
}
