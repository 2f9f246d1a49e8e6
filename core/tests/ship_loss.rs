//! Ship loss tests.
//!
//! Tests cover: capital capture while building and in flight, capture
//! with no ship, removed players, and client sync.

use spacerace_core::{
    command::{ActionRequest, GameCommand},
    engine::{GameState, SimEngine},
    event::{Audience, SimEvent},
    spaceship::{PartClass, PartType, SpaceshipState},
};

const FRAME: [i32; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 10];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn build(run_id: &str) -> SimEngine {
    init_logging();
    SimEngine::build_test(run_id.to_string(), 11).expect("build test engine")
}

fn submit(engine: &mut SimEngine, command: GameCommand) -> Vec<SimEvent> {
    engine.submit_command(command).expect("command handled")
}

fn launch_minimal(engine: &mut SimEngine, player: usize) {
    for (part, count) in [
        (PartClass::Structural, FRAME.len()),
        (PartClass::Component, 2),
        (PartClass::Module, 3),
    ] {
        for _ in 0..count {
            submit(engine, GameCommand::SpacePartBuilt { player, part });
        }
    }
    for slot in FRAME {
        submit(engine, GameCommand::SpaceshipAction { player, request: ActionRequest::structural(slot) });
    }
    for part in [
        PartType::Fuel,
        PartType::Propulsion,
        PartType::Habitation,
        PartType::LifeSupport,
        PartType::SolarPanels,
    ] {
        submit(engine, GameCommand::SpaceshipAction { player, request: ActionRequest::part(part, 1) });
    }
    let events = submit(engine, GameCommand::SpaceshipAction { player, request: ActionRequest::launch() });
    assert!(events.iter().any(|e| matches!(e, SimEvent::SpaceshipLaunched { .. })));
}

#[test]
fn capture_in_flight_loses_the_ship() {
    let mut engine = build("loss-flight-test");
    launch_minimal(&mut engine, 1);
    engine.run_turns(10).unwrap();

    let events = submit(&mut engine, GameCommand::CapitalCaptured { player: 1 });
    let message = events
        .iter()
        .find_map(|e| match e {
            SimEvent::SpaceshipLost { player: 1, message, .. } => Some(message.clone()),
            _ => None,
        })
        .expect("SpaceshipLost event");
    assert_eq!(
        message,
        "With the capture of Hammurabi's capital, the Babylonians spaceship is lost!"
    );

    let info = engine.ship_info(1).unwrap();
    assert_eq!(info.state, SpaceshipState::None);
    assert_eq!(info.structurals, 0);
    assert_eq!(info.structure, "0".repeat(32));

    // Past the old arrival date, nothing arrives.
    engine.run_turns(40).unwrap();
    assert_eq!(engine.game_state(), GameState::Running);
    assert_eq!(engine.current_year(), Some(1950));
}

#[test]
fn capture_while_building_loses_the_parts() {
    let mut engine = build("loss-building-test");
    submit(&mut engine, GameCommand::SpacePartBuilt { player: 2, part: PartClass::Module });
    assert_eq!(engine.ship_info(2).unwrap().state, SpaceshipState::Started);

    submit(&mut engine, GameCommand::CapitalCaptured { player: 2 });
    let info = engine.ship_info(2).unwrap();
    assert_eq!(info.state, SpaceshipState::None);
    assert_eq!(info.modules, 0);

    // A new part starts over from scratch.
    let events = submit(&mut engine, GameCommand::SpacePartBuilt { player: 2, part: PartClass::Module });
    assert!(events.iter().any(|e| matches!(e, SimEvent::SpaceshipStarted { player: 2, .. })));
}

#[test]
fn capture_without_ship_changes_nothing() {
    let mut engine = build("loss-none-test");
    let events = submit(&mut engine, GameCommand::CapitalCaptured { player: 0 });
    assert!(
        !events.iter().any(|e| matches!(e, SimEvent::SpaceshipLost { .. })),
        "no ship, nothing to lose"
    );
    assert_eq!(engine.ship_info(0).unwrap().state, SpaceshipState::None);
}

#[test]
fn only_the_captured_player_loses() {
    let mut engine = build("loss-isolation-test");
    launch_minimal(&mut engine, 0);
    launch_minimal(&mut engine, 3);

    submit(&mut engine, GameCommand::CapitalCaptured { player: 0 });
    assert_eq!(engine.ship_info(3).unwrap().state, SpaceshipState::Launched);

    engine.run_turns(100).unwrap();
    assert_eq!(engine.game_state(), GameState::Over { winner: 3 });
}

#[test]
fn removed_player_cannot_win_or_build() {
    let mut engine = build("removed-test");
    launch_minimal(&mut engine, 2);

    submit(&mut engine, GameCommand::PlayerRemoved { player: 2 });
    assert_eq!(engine.ship_info(2).unwrap().state, SpaceshipState::None);

    let events = submit(&mut engine, GameCommand::SpacePartBuilt { player: 2, part: PartClass::Structural });
    assert!(!events.iter().any(|e| matches!(e, SimEvent::ShipStateChanged { .. })));
    assert!(!engine.spacerace().unwrap().player(2).unwrap().alive);

    engine.run_turns(40).unwrap();
    assert_eq!(engine.game_state(), GameState::Running);
}

#[test]
fn sync_sends_every_ship_to_one_player() {
    let mut engine = build("sync-test");
    submit(&mut engine, GameCommand::SpacePartBuilt { player: 1, part: PartClass::Component });

    let events = submit(&mut engine, GameCommand::SyncShips { player: 3 });
    let infos: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            SimEvent::ShipStateChanged { audience, info, .. } => Some((*audience, info.clone())),
            _ => None,
        })
        .collect();

    assert_eq!(infos.len(), 4);
    assert!(infos.iter().all(|(audience, _)| *audience == Audience::Player(3)));
    assert_eq!(infos[1].1.player, 1);
    assert_eq!(infos[1].1.components, 1);
    assert_eq!(infos[0].1.state, SpaceshipState::None);
}
