//! Subsystem trait and registry.
//!
//! RULE: Every subsystem implements SimSubsystem.
//! The engine calls update() on each registered subsystem
//! in registration order, at the end of every turn, and
//! handle_command() in the same order whenever a command arrives.
//! Execution order is fixed and documented in engine.rs.

use crate::{
    command::GameCommand,
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    types::Tick,
};
use std::any::Any;

/// The contract every subsystem must fulfill.
pub trait SimSubsystem: Send {
    /// Unique stable name for this subsystem.
    fn name(&self) -> &'static str;

    /// Called once per end of turn by the engine.
    ///
    /// - `tick`:      the turn being completed
    /// - `events_in`: events emitted by earlier subsystems this turn
    /// - `rng`:       this subsystem's deterministic RNG for this turn
    ///
    /// Returns a vec of new events to add to the turn's event log.
    fn update(
        &mut self,
        tick: Tick,
        events_in: &[SimEvent],
        rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>>;

    /// Called synchronously for every submitted command.
    /// Subsystems ignore commands they do not own.
    fn handle_command(&mut self, _tick: Tick, _command: &GameCommand) -> SimResult<Vec<SimEvent>> {
        Ok(vec![])
    }

    /// For downcasting in tests and tooling only.
    /// Production sim code never uses this.
    fn as_any(&self) -> &dyn Any;
}
