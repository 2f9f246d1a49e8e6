//! Space race subsystem: owns every player's spaceship.
//!
//! Commands: spaceship actions (placement and launch) from players;
//!   part deliveries, capital captures, player removal and client
//!   syncs from the rest of the server. Each is handled synchronously:
//!   validate, mutate, re-derive, then emit a ShipStateChanged snapshot
//!   for the network layer to broadcast.
//! Execution: after the calendar every turn. Reads this turn's
//!   YearAdvanced and resolves spaceship arrivals.
//!
//! Arrival ties are broken by a player order shuffled once per game.

use crate::{
    arrival::resolve_arrivals,
    calendar::text_year,
    command::{ActionRequest, GameCommand, SpaceshipAction},
    config::SimConfig,
    error::{SimError, SimResult},
    event::{Audience, SimEvent},
    player::Player,
    rng::SubsystemRng,
    spaceship::{PartClass, PlacementError, SpaceshipState},
    subsystem::SimSubsystem,
    types::{PlayerId, Tick, Year},
};

pub struct SpaceRaceSubsystem {
    players:      Vec<Player>,
    turn_order:   Vec<PlayerId>,
    current_year: Year,
    enabled:      bool,
}

impl SpaceRaceSubsystem {
    /// `rng` is used once, to fix the tie-break order for the game.
    pub fn new(config: &SimConfig, rng: &mut SubsystemRng) -> Self {
        let players: Vec<Player> = config
            .players
            .iter()
            .enumerate()
            .map(|(id, p)| Player::from_config(id, p))
            .collect();

        let mut turn_order: Vec<PlayerId> = (0..players.len()).collect();
        rng.shuffle(&mut turn_order);
        log::debug!("spacerace: tie-break order {turn_order:?}");

        Self {
            players,
            turn_order,
            current_year: config.calendar.start_year,
            enabled:      config.spacerace.enabled,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> SimResult<&Player> {
        self.players.get(id).ok_or(SimError::UnknownPlayer { player: id })
    }

    fn player_mut(&mut self, id: PlayerId) -> SimResult<&mut Player> {
        self.players.get_mut(id).ok_or(SimError::UnknownPlayer { player: id })
    }

    pub fn turn_order(&self) -> &[PlayerId] {
        &self.turn_order
    }

    pub fn current_year(&self) -> Year {
        self.current_year
    }

    fn ship_changed(&self, tick: Tick, player: PlayerId, audience: Audience) -> SimEvent {
        SimEvent::ShipStateChanged {
            tick,
            audience,
            info: self.players[player].spaceship.info(player),
        }
    }

    // ── Player actions ────────────────────────────────────────

    /// The single entry point for player-issued spaceship requests.
    /// Rejections become an ActionRejected event for the requester;
    /// only an unknown player is an error.
    pub fn handle_action(
        &mut self,
        tick:    Tick,
        player:  PlayerId,
        request: ActionRequest,
    ) -> SimResult<Vec<SimEvent>> {
        let year = self.current_year;
        let p = self.player_mut(player)?;

        let Some(action) = request.decode() else {
            log::info!(
                "tick={tick} spacerace: unknown spaceship action {} from {}",
                request.action, p.name
            );
            return Ok(vec![]);
        };

        let ship = &mut p.spaceship;
        let result = if ship.state() == SpaceshipState::None {
            Err(PlacementError::NoSpaceship)
        } else {
            match action {
                SpaceshipAction::Launch => ship.launch(year).map(Some),
                SpaceshipAction::PlaceStructural { slot } => {
                    ship.place_structural(slot).map(|_| None)
                }
                SpaceshipAction::PlacePart { part, num } => {
                    ship.place_part(part, num).map(|_| None)
                }
            }
        };

        match result {
            Err(err) => {
                log::warn!("tick={tick} spacerace: rejected {action:?} from {}: {err}", p.name);
                Ok(vec![SimEvent::ActionRejected {
                    tick,
                    player,
                    kind: err.kind(),
                    message: err.to_string(),
                }])
            }
            Ok(Some(arrival_year)) => {
                let message = format!(
                    "The {} have launched a spaceship! It is estimated to arrive at Alpha Centauri in {}.",
                    p.nation_plural,
                    text_year(arrival_year),
                );
                log::info!("tick={tick} spacerace: {message}");
                Ok(vec![
                    SimEvent::SpaceshipLaunched {
                        tick,
                        player,
                        launch_year: year,
                        arrival_year,
                        message,
                    },
                    self.ship_changed(tick, player, Audience::All),
                ])
            }
            Ok(None) => {
                log::debug!("tick={tick} spacerace: {} placed {action:?}", p.name);
                Ok(vec![self.ship_changed(tick, player, Audience::All)])
            }
        }
    }

    // ── Server inputs ─────────────────────────────────────────

    /// A city finished a spaceship part for `player`. Nothing can be
    /// added to a ship once it has left.
    pub fn part_built(
        &mut self,
        tick:   Tick,
        player: PlayerId,
        part:   PartClass,
    ) -> SimResult<Vec<SimEvent>> {
        let enabled = self.enabled;
        let p = self.player_mut(player)?;
        if !enabled || !p.alive || p.spaceship.state() >= SpaceshipState::Launched {
            log::warn!("tick={tick} spacerace: ignoring {part:?} built by {}", p.name);
            return Ok(vec![]);
        }

        let started = match p.spaceship.add_part(part) {
            Ok(started) => started,
            Err(err) => {
                log::warn!("tick={tick} spacerace: {} cannot take more parts: {err}", p.name);
                return Ok(vec![]);
            }
        };

        let mut out = Vec::new();
        if started {
            let message = format!("The {} have started building a spaceship!", p.nation_plural);
            log::info!("tick={tick} spacerace: {message}");
            out.push(SimEvent::SpaceshipStarted { tick, player, message });
        }
        out.push(self.ship_changed(tick, player, Audience::All));
        Ok(out)
    }

    /// The ship is destroyed, whatever state it was in.
    pub fn spaceship_lost(&mut self, tick: Tick, player: PlayerId) -> SimResult<Vec<SimEvent>> {
        let p = self.player_mut(player)?;
        let message = format!(
            "With the capture of {}'s capital, the {} spaceship is lost!",
            p.name, p.nation_plural
        );
        p.spaceship.reset();
        log::info!("tick={tick} spacerace: {message}");

        Ok(vec![
            SimEvent::SpaceshipLost { tick, player, message },
            self.ship_changed(tick, player, Audience::All),
        ])
    }

    /// Only a ship under construction or in flight is lost with the capital.
    fn capital_captured(&mut self, tick: Tick, player: PlayerId) -> SimResult<Vec<SimEvent>> {
        let state = self.player(player)?.spaceship.state();
        match state {
            SpaceshipState::Started | SpaceshipState::Launched => self.spaceship_lost(tick, player),
            _ => Ok(vec![]),
        }
    }

    /// A dead player's ship must never win.
    fn player_removed(&mut self, tick: Tick, player: PlayerId) -> SimResult<Vec<SimEvent>> {
        let p = self.player_mut(player)?;
        p.alive = false;
        p.spaceship.reset();
        log::debug!("tick={tick} spacerace: {} removed", p.name);
        Ok(vec![self.ship_changed(tick, player, Audience::All)])
    }

    /// Every ship, addressed to one (newly connected) player.
    fn sync_ships(&self, tick: Tick, player: PlayerId) -> SimResult<Vec<SimEvent>> {
        self.player(player)?;
        Ok((0..self.players.len())
            .map(|src| self.ship_changed(tick, src, Audience::Player(player)))
            .collect())
    }

    // ── End of turn ───────────────────────────────────────────

    /// Resolve arrivals for the current year. At most one ship arrives
    /// per call, and its arrival ends the game.
    pub fn check_arrivals(&mut self, tick: Tick) -> Vec<SimEvent> {
        let ships = self
            .turn_order
            .iter()
            .map(|id| (*id, &self.players[*id].spaceship));

        let Some(winner) = resolve_arrivals(self.current_year, ships) else {
            return vec![];
        };

        let p = &mut self.players[winner.player];
        p.spaceship.mark_arrived();
        let message = format!("The {} spaceship has arrived at Alpha Centauri.", p.nation_plural);
        log::info!(
            "tick={tick} spacerace: {message} (due {:.2}, year {})",
            winner.arrival, self.current_year
        );

        vec![
            SimEvent::SpaceshipArrived {
                tick,
                player: winner.player,
                year: self.current_year,
                message,
            },
            self.ship_changed(tick, winner.player, Audience::All),
            SimEvent::GameOver { tick, winner: winner.player },
        ]
    }
}

impl SimSubsystem for SpaceRaceSubsystem {
    fn name(&self) -> &'static str { "spacerace" }

    fn update(
        &mut self,
        tick:      Tick,
        events_in: &[SimEvent],
        _rng:      &mut SubsystemRng,
    ) -> SimResult<Vec<SimEvent>> {
        for event in events_in {
            if let SimEvent::YearAdvanced { year, .. } = event {
                self.current_year = *year;
            }
        }
        Ok(self.check_arrivals(tick))
    }

    fn handle_command(&mut self, tick: Tick, command: &GameCommand) -> SimResult<Vec<SimEvent>> {
        match command {
            GameCommand::SpaceshipAction { player, request } => {
                self.handle_action(tick, *player, *request)
            }
            GameCommand::SpacePartBuilt { player, part } => self.part_built(tick, *player, *part),
            GameCommand::CapitalCaptured { player } => self.capital_captured(tick, *player),
            GameCommand::PlayerRemoved { player } => self.player_removed(tick, *player),
            GameCommand::SyncShips { player } => self.sync_ships(tick, *player),
            GameCommand::SpacePartUnlocked { .. } => Ok(vec![]),
        }
    }

    fn as_any(&self) -> &dyn std::any::Any { self }
}
