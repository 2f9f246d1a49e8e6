//! Spaceship placement tests.
//!
//! Tests cover: parts delivered by production, structural topology,
//! part sequencing, shared capacity pools, rejection messages, and
//! unknown action codes.

use spacerace_core::{
    command::{ActionRequest, GameCommand},
    engine::SimEngine,
    event::{Audience, SimEvent},
    spaceship::{PartClass, PartType, RejectionKind, SpaceshipState},
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn build(run_id: &str) -> SimEngine {
    init_logging();
    SimEngine::build_test(run_id.to_string(), 42).expect("build test engine")
}

fn deliver(engine: &mut SimEngine, player: usize, part: PartClass, count: u32) {
    for _ in 0..count {
        engine
            .submit_command(GameCommand::SpacePartBuilt { player, part })
            .expect("part delivered");
    }
}

fn act(engine: &mut SimEngine, player: usize, request: ActionRequest) -> Vec<SimEvent> {
    engine
        .submit_command(GameCommand::SpaceshipAction { player, request })
        .expect("action handled")
}

fn rejection(events: &[SimEvent]) -> Option<(RejectionKind, String)> {
    events.iter().find_map(|e| match e {
        SimEvent::ActionRejected { kind, message, .. } => Some((*kind, message.clone())),
        _ => None,
    })
}

fn broadcast_count(events: &[SimEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SimEvent::ShipStateChanged { audience: Audience::All, .. }))
        .count()
}

#[test]
fn first_part_starts_the_ship_and_announces_it() {
    let mut engine = build("start-test");

    let events = engine
        .submit_command(GameCommand::SpacePartBuilt { player: 0, part: PartClass::Structural })
        .unwrap();

    let started = events.iter().find_map(|e| match e {
        SimEvent::SpaceshipStarted { player, message, .. } => Some((*player, message.clone())),
        _ => None,
    });
    let (player, message) = started.expect("SpaceshipStarted event");
    assert_eq!(player, 0);
    assert!(message.contains("Romans"), "unexpected notice: {message}");
    assert_eq!(broadcast_count(&events), 1);

    let info = engine.ship_info(0).unwrap();
    assert_eq!(info.state, SpaceshipState::Started);
    assert_eq!(info.structurals, 1);

    // A second part does not announce again.
    let events = engine
        .submit_command(GameCommand::SpacePartBuilt { player: 0, part: PartClass::Module })
        .unwrap();
    assert!(!events.iter().any(|e| matches!(e, SimEvent::SpaceshipStarted { .. })));
}

/// One structural, two components, three modules: the root slot goes
/// in, the next one runs out of structurals.
#[test]
fn structural_capacity_and_prerequisite() {
    let mut engine = build("structural-test");
    deliver(&mut engine, 1, PartClass::Structural, 1);
    deliver(&mut engine, 1, PartClass::Component, 2);
    deliver(&mut engine, 1, PartClass::Module, 3);

    let events = act(&mut engine, 1, ActionRequest::structural(2));
    let (kind, _) = rejection(&events).expect("slot 2 needs slot 0");
    assert_eq!(kind, RejectionKind::TopologyViolation);

    let events = act(&mut engine, 1, ActionRequest::structural(0));
    assert!(rejection(&events).is_none());
    assert_eq!(broadcast_count(&events), 1);

    let events = act(&mut engine, 1, ActionRequest::structural(1));
    let (kind, message) = rejection(&events).expect("no structurals left");
    assert_eq!(kind, RejectionKind::CapacityExceeded);
    assert!(message.contains("Space Structurals"), "unexpected message: {message}");

    deliver(&mut engine, 1, PartClass::Structural, 1);
    let events = act(&mut engine, 1, ActionRequest::structural(1));
    assert!(rejection(&events).is_none());
    assert_eq!(engine.ship_info(1).unwrap().structure[..2].to_string(), "11");
}

#[test]
fn rejected_placement_leaves_ship_unchanged() {
    let mut engine = build("unchanged-test");
    deliver(&mut engine, 0, PartClass::Structural, 4);
    let before = engine.ship_info(0).unwrap();

    for _ in 0..3 {
        let events = act(&mut engine, 0, ActionRequest::structural(5));
        assert!(rejection(&events).is_some());
        assert_eq!(broadcast_count(&events), 0, "rejections are not broadcast");
        assert_eq!(engine.ship_info(0).unwrap(), before);
    }
}

#[test]
fn fuel_must_be_placed_in_order() {
    let mut engine = build("fuel-seq-test");
    deliver(&mut engine, 2, PartClass::Component, 2);

    let events = act(&mut engine, 2, ActionRequest::part(PartType::Fuel, 1));
    assert!(rejection(&events).is_none());
    assert_eq!(engine.ship_info(2).unwrap().fuel, 1);

    let events = act(&mut engine, 2, ActionRequest::part(PartType::Fuel, 1));
    let (kind, message) = rejection(&events).expect("duplicate sequence number");
    assert_eq!(kind, RejectionKind::InvalidSequence);
    assert!(message.contains("expected #2"), "unexpected message: {message}");
    assert_eq!(engine.ship_info(2).unwrap().fuel, 1);
}

#[test]
fn component_and_module_pools_hold() {
    let mut engine = build("pool-test");
    deliver(&mut engine, 3, PartClass::Component, 3);
    deliver(&mut engine, 3, PartClass::Module, 5);

    let requests = [
        ActionRequest::part(PartType::Fuel, 1),
        ActionRequest::part(PartType::Propulsion, 1),
        ActionRequest::part(PartType::Fuel, 2),
        ActionRequest::part(PartType::Propulsion, 2),
        ActionRequest::part(PartType::Habitation, 1),
        ActionRequest::part(PartType::LifeSupport, 1),
        ActionRequest::part(PartType::SolarPanels, 1),
        ActionRequest::part(PartType::Habitation, 2),
        ActionRequest::part(PartType::LifeSupport, 2),
        ActionRequest::part(PartType::SolarPanels, 2),
    ];
    let mut rejected = 0;
    for request in requests {
        if rejection(&act(&mut engine, 3, request)).is_some() {
            rejected += 1;
        }
        let info = engine.ship_info(3).unwrap();
        assert!(info.fuel + info.propulsion <= info.components);
        assert!(info.habitation + info.life_support + info.solar_panels <= info.modules);
    }
    // One component and one module request find the pool empty.
    assert_eq!(rejected, 2);
}

#[test]
fn module_type_limit_is_a_third_of_the_slots() {
    let mut engine = build("module-limit-test");
    deliver(&mut engine, 0, PartClass::Module, 12);

    for n in 1..=4 {
        let events = act(&mut engine, 0, ActionRequest::part(PartType::SolarPanels, n));
        assert!(rejection(&events).is_none(), "solar panel {n} should fit");
    }
    let events = act(&mut engine, 0, ActionRequest::part(PartType::SolarPanels, 5));
    let (kind, message) = rejection(&events).expect("fifth solar panel");
    assert_eq!(kind, RejectionKind::TopologyViolation);
    assert!(message.contains("Solar Panel Modules"), "unexpected message: {message}");
}

#[test]
fn player_without_ship_is_told_so() {
    let mut engine = build("no-ship-test");

    let events = act(&mut engine, 0, ActionRequest::structural(0));
    let (kind, message) = rejection(&events).expect("no ship yet");
    assert_eq!(kind, RejectionKind::InvalidStateTransition);
    assert!(message.contains("don't have a spaceship"));

    // Rejection goes only to the requester.
    let rejected = events
        .iter()
        .find(|e| matches!(e, SimEvent::ActionRejected { .. }))
        .unwrap();
    assert_eq!(rejected.audience(), Audience::Player(0));
}

#[test]
fn unknown_action_is_ignored() {
    let mut engine = build("unknown-action-test");
    deliver(&mut engine, 0, PartClass::Structural, 1);
    let before = engine.ship_info(0).unwrap();

    let events = act(&mut engine, 0, ActionRequest { action: 99, num: 0 });
    assert!(rejection(&events).is_none(), "unknown actions get no reply");
    assert_eq!(broadcast_count(&events), 0);
    assert_eq!(engine.ship_info(0).unwrap(), before);
}

#[test]
fn unknown_player_is_an_error() {
    let mut engine = build("unknown-player-test");
    let result = engine.submit_command(GameCommand::SpaceshipAction {
        player:  17,
        request: ActionRequest::launch(),
    });
    assert!(result.is_err());
}

#[test]
fn parts_beyond_slot_count_are_ignored() {
    let mut engine = build("overflow-test");
    deliver(&mut engine, 0, PartClass::Module, 12);

    let events = engine
        .submit_command(GameCommand::SpacePartBuilt { player: 0, part: PartClass::Module })
        .unwrap();
    assert_eq!(broadcast_count(&events), 0);
    assert_eq!(engine.ship_info(0).unwrap().modules, 12);
}

#[test]
fn every_event_is_logged() {
    let run_id = "log-test";
    let mut engine = build(run_id);
    deliver(&mut engine, 0, PartClass::Structural, 1);
    act(&mut engine, 0, ActionRequest::structural(0));
    act(&mut engine, 0, ActionRequest::structural(0));

    assert_eq!(engine.store.event_count(run_id, "command_received").unwrap(), 3);
    assert_eq!(engine.store.event_count(run_id, "spaceship_started").unwrap(), 1);
    assert_eq!(engine.store.event_count(run_id, "ship_state_changed").unwrap(), 2);
    assert_eq!(engine.store.event_count(run_id, "action_rejected").unwrap(), 1);
}
