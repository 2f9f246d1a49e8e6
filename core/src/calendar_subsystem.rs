//! Calendar subsystem: advances the game year at the end of each turn.
//!
//! Execution: first in registration order, so later subsystems see
//!   this turn's YearAdvanced.
//! Depends on: SpacePartUnlocked commands (which part classes anyone
//!   can build), honoured only while the space race is enabled.

use crate::{
    calendar::{self, PartsAvailable},
    command::GameCommand,
    config::SimConfig,
    error::SimResult,
    event::SimEvent,
    rng::SubsystemRng,
    spaceship::PartClass,
    subsystem::SimSubsystem,
    types::{Tick, Year},
};

pub struct CalendarSubsystem {
    pub year:  Year,
    parts:     PartsAvailable,
    spacerace: bool,
}

impl CalendarSubsystem {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            year:      config.calendar.start_year,
            parts:     PartsAvailable::default(),
            spacerace: config.spacerace.enabled,
        }
    }

    pub fn parts_available(&self) -> PartsAvailable {
        self.parts
    }
}

impl SimSubsystem for CalendarSubsystem {
    fn name(&self) -> &'static str { "calendar" }

    fn update(
        &mut self,
        tick: Tick,
        _events_in: &[SimEvent],
        _rng: &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        let parts = if self.spacerace { self.parts } else { PartsAvailable::default() };
        self.year = calendar::next_year(self.year, parts);

        log::debug!("tick={tick} calendar: year={}", calendar::text_year(self.year));

        Ok(vec![SimEvent::YearAdvanced { tick, year: self.year }])
    }

    fn handle_command(&mut self, tick: Tick, command: &GameCommand) -> SimResult<Vec<SimEvent>> {
        if let GameCommand::SpacePartUnlocked { part } = command {
            match part {
                PartClass::Structural => self.parts.structural = true,
                PartClass::Component  => self.parts.component = true,
                PartClass::Module     => self.parts.module = true,
            }
            log::debug!("tick={tick} calendar: {part} now buildable");
        }
        Ok(vec![])
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
