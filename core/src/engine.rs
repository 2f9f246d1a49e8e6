//! The simulation engine: runs the space race turn by turn.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Calendar subsystem   (advances the year)
//!   2. SpaceRace subsystem  (resolves arrivals for the new year)
//!
//! RULES:
//!   - Subsystems execute in registration order, every turn.
//!   - Commands are handled synchronously, in the same order, at the
//!     current tick; nothing is queued between turns.
//!   - No subsystem calls another subsystem's functions directly.
//!   - All randomness flows through the RngBank.
//!   - Every emitted event is recorded in the event log.

use crate::{
    calendar_subsystem::CalendarSubsystem,
    clock::SimClock,
    command::GameCommand,
    config::SimConfig,
    error::{SimError, SimResult},
    event::{EventLogEntry, SimEvent},
    rng::{RngBank, SubsystemSlot},
    spacerace_subsystem::SpaceRaceSubsystem,
    spaceship::ShipInfo,
    store::SimStore,
    subsystem::SimSubsystem,
    types::{PlayerId, RunId, Tick, Year},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GameState {
    Running,
    Over { winner: PlayerId },
}

pub struct SimEngine {
    pub run_id:   RunId,
    pub clock:    SimClock,
    pub rng_bank: RngBank,
    pub store:    SimStore,
    seed:         u64,
    subsystems:   Vec<(SubsystemSlot, Box<dyn SimSubsystem>)>,
    state:        GameState,
    initialized:  bool,
}

impl SimEngine {
    pub fn new(run_id: RunId, seed: u64, store: SimStore) -> Self {
        Self {
            clock:       SimClock::new(run_id.clone()),
            rng_bank:    RngBank::new(seed),
            seed,
            subsystems:  Vec::new(),
            store,
            state:       GameState::Running,
            initialized: false,
            run_id,
        }
    }

    /// Build a fully wired engine with all subsystems registered.
    /// Call this instead of new() + manual register() calls.
    pub fn build(run_id: RunId, seed: u64, store: SimStore, config: &SimConfig) -> SimResult<Self> {
        config.validate()?;
        let mut engine = SimEngine::new(run_id, seed, store);

        // EXECUTION ORDER: fixed, documented, never reordered.
        engine.register(SubsystemSlot::Calendar, Box::new(CalendarSubsystem::new(config)));

        let mut order_rng = engine.rng_bank.for_subsystem(SubsystemSlot::TurnOrder);
        engine.register(
            SubsystemSlot::SpaceRace,
            Box::new(SpaceRaceSubsystem::new(config, &mut order_rng)),
        );
        Ok(engine)
    }

    /// In-memory store and `SimConfig::default_test()`.
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        Self::build_test_with_config(run_id, seed, &SimConfig::default_test())
    }

    pub fn build_test_with_config(run_id: RunId, seed: u64, config: &SimConfig) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        store.insert_run(&run_id, seed, "0.1.0-test")?;
        Self::build(run_id, seed, store, config)
    }

    /// Register a subsystem. Call in the documented execution order.
    pub fn register(&mut self, slot: SubsystemSlot, subsystem: Box<dyn SimSubsystem>) {
        self.subsystems.push((slot, subsystem));
    }

    pub fn game_state(&self) -> GameState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, GameState::Over { .. })
    }

    /// Handle one command right now. Returns every event it produced,
    /// already written to the event log.
    pub fn submit_command(&mut self, command: GameCommand) -> SimResult<Vec<SimEvent>> {
        if self.is_over() {
            return Err(SimError::GameOver);
        }
        self.ensure_initialized()?;

        let tick = self.clock.current_tick;
        let received = SimEvent::CommandReceived {
            tick,
            command_id:   uuid::Uuid::new_v4().to_string(),
            command_type: command.type_name().to_string(),
        };
        self.log_events(tick, "engine", std::slice::from_ref(&received))?;
        let mut events = vec![received];

        for i in 0..self.subsystems.len() {
            let (_, subsystem) = &mut self.subsystems[i];
            let name = subsystem.name();
            let new_events = subsystem.handle_command(tick, &command)?;
            self.log_events(tick, name, &new_events)?;
            events.extend(new_events);
        }

        Ok(events)
    }

    /// Advance one turn. This is the core simulation step.
    pub fn tick(&mut self) -> SimResult<Vec<SimEvent>> {
        assert!(!self.clock.paused, "tick() called on paused engine");
        if self.is_over() {
            return Err(SimError::GameOver);
        }
        self.ensure_initialized()?;

        let current_tick = self.clock.advance();
        let mut tick_events: Vec<SimEvent> = vec![SimEvent::TurnStarted { tick: current_tick }];

        // Each subsystem sees all events emitted so far this turn.
        for i in 0..self.subsystems.len() {
            let (slot, subsystem) = &mut self.subsystems[i];
            let mut rng = self.rng_bank.for_subsystem_at_tick(*slot, current_tick);
            let name = subsystem.name();
            let new_events = subsystem.update(current_tick, &tick_events, &mut rng)?;

            for event in &new_events {
                if let SimEvent::GameOver { winner, .. } = event {
                    self.state = GameState::Over { winner: *winner };
                }
            }
            self.log_events(current_tick, name, &new_events)?;
            tick_events.extend(new_events);
        }

        tick_events.push(SimEvent::TurnCompleted { tick: current_tick });
        Ok(tick_events)
    }

    /// Run up to n turns, stopping early if the game ends.
    /// Returns the events of every turn run.
    pub fn run_turns(&mut self, n: u64) -> SimResult<Vec<SimEvent>> {
        let mut events = Vec::new();
        self.clock.resume();
        for _ in 0..n {
            if self.is_over() {
                break;
            }
            match self.tick() {
                Ok(turn) => events.extend(turn),
                Err(e) => {
                    self.clock.pause();
                    return Err(e);
                }
            }
        }
        self.clock.pause();
        Ok(events)
    }

    /// Query events for a specific tick from the store.
    /// Used by the determinism test and replay tooling.
    pub fn store_events_for_tick(&self, run_id: &str, tick: Tick) -> SimResult<Vec<EventLogEntry>> {
        self.store.events_for_tick(run_id, tick)
    }

    pub fn calendar(&self) -> Option<&CalendarSubsystem> {
        self.subsystems
            .iter()
            .find_map(|(_, sub)| sub.as_any().downcast_ref::<CalendarSubsystem>())
    }

    pub fn spacerace(&self) -> Option<&SpaceRaceSubsystem> {
        self.subsystems
            .iter()
            .find_map(|(_, sub)| sub.as_any().downcast_ref::<SpaceRaceSubsystem>())
    }

    pub fn current_year(&self) -> Option<Year> {
        self.calendar().map(|c| c.year)
    }

    pub fn ship_info(&self, player: PlayerId) -> SimResult<ShipInfo> {
        let race = self.spacerace().ok_or_else(|| {
            SimError::Other(anyhow::anyhow!("spacerace subsystem not registered"))
        })?;
        Ok(race.player(player)?.spaceship.info(player))
    }

    /// Emit RunInitialized at tick 0 so seed differences are observable.
    fn ensure_initialized(&mut self) -> SimResult<()> {
        if self.initialized {
            return Ok(());
        }
        self.initialized = true;
        let init_event = SimEvent::RunInitialized {
            run_id: self.run_id.clone(),
            seed:   self.seed,
        };
        self.log_events(self.clock.current_tick, "engine", &[init_event])
    }

    fn log_events(&self, tick: Tick, subsystem: &str, events: &[SimEvent]) -> SimResult<()> {
        for event in events {
            let entry = EventLogEntry {
                id:         None,
                run_id:     self.run_id.clone(),
                tick,
                subsystem:  subsystem.to_string(),
                event_type: event.type_name().to_string(),
                payload:    serde_json::to_string(event)?,
            };
            self.store.append_event(&entry)?;
        }
        Ok(())
    }
}
