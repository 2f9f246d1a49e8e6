//! Per-player spaceship: placement state, lifecycle, and the derived
//! flight figures (mass, rates, travel time).
//!
//! Placement fields are private. Every successful mutation goes through
//! a method that validates first, writes second, and re-derives last,
//! so a rejected request never leaves a partial write behind.

use crate::{
    error::{SimError, SimResult},
    topology::{
        self, MAX_FUEL, MAX_PER_MODULE_TYPE, MAX_PROPULSION, NUM_SS_COMPONENTS, NUM_SS_MODULES,
        NUM_SS_STRUCTURALS, STRUCTURALS,
    },
    types::{PlayerId, Year},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpaceshipState {
    None,
    Started,
    Launched,
    Arrived,
}

/// The three things a city can build for a spaceship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartClass {
    Structural,
    Component,
    Module,
}

impl PartClass {
    pub fn slot_count(self) -> u32 {
        match self {
            Self::Structural => NUM_SS_STRUCTURALS as u32,
            Self::Component  => NUM_SS_COMPONENTS as u32,
            Self::Module     => NUM_SS_MODULES as u32,
        }
    }
}

impl fmt::Display for PartClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Structural => "Space Structurals",
            Self::Component  => "Space Components",
            Self::Module     => "Space Modules",
        })
    }
}

/// Placeable sub-types of components and modules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    Fuel,
    Propulsion,
    Habitation,
    LifeSupport,
    SolarPanels,
}

impl PartType {
    pub fn class(self) -> PartClass {
        match self {
            Self::Fuel | Self::Propulsion => PartClass::Component,
            _ => PartClass::Module,
        }
    }

    pub fn max_placed(self) -> u32 {
        match self {
            Self::Fuel       => MAX_FUEL,
            Self::Propulsion => MAX_PROPULSION,
            _                => MAX_PER_MODULE_TYPE,
        }
    }
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fuel        => "Fuel Components",
            Self::Propulsion  => "Propulsion Components",
            Self::Habitation  => "Habitation Modules",
            Self::LifeSupport => "Life Support Modules",
            Self::SolarPanels => "Solar Panel Modules",
        })
    }
}

/// Coarse category of a rejected request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    InvalidSequence,
    CapacityExceeded,
    TopologyViolation,
    InvalidStateTransition,
}

/// Why a placement or launch request was refused.
/// The Display text is what the requesting player is told.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("you don't have a spaceship!")]
    NoSpaceship,

    #[error("you can't modify your spaceship after launch!")]
    ModifiedAfterLaunch,

    #[error("your spaceship is already launched!")]
    AlreadyLaunched,

    #[error("your spaceship can't be launched yet!")]
    NotLaunchable,

    #[error("there is no Space Structural slot {slot}!")]
    SlotOutOfRange { slot: i32 },

    #[error("Space Structural slot {slot} is already occupied!")]
    SlotOccupied { slot: usize },

    #[error("{part} must be placed in order: expected #{expected}, got #{got}!")]
    OutOfSequence { part: PartType, expected: u32, got: i32 },

    #[error("you don't have any unplaced {class}!")]
    NoUnplacedParts { class: PartClass },

    #[error("your spaceship already has the maximum number of {part}!")]
    PartLimitReached { part: PartType },

    #[error("that Space Structural would not be connected!")]
    NotConnected { slot: usize },
}

impl PlacementError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            Self::NoSpaceship
            | Self::ModifiedAfterLaunch
            | Self::AlreadyLaunched
            | Self::NotLaunchable => RejectionKind::InvalidStateTransition,
            Self::SlotOutOfRange { .. }
            | Self::SlotOccupied { .. }
            | Self::OutOfSequence { .. } => RejectionKind::InvalidSequence,
            Self::NoUnplacedParts { .. } => RejectionKind::CapacityExceeded,
            Self::PartLimitReached { .. }
            | Self::NotConnected { .. } => RejectionKind::TopologyViolation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSpaceship {
    state: SpaceshipState,

    structurals: u32,
    components:  u32,
    modules:     u32,

    structure: [bool; NUM_SS_STRUCTURALS],

    fuel:         u32,
    propulsion:   u32,
    habitation:   u32,
    life_support: u32,
    solar_panels: u32,

    // Derived; written only by calc_derived().
    mass:         u32,
    population:   u32,
    support_rate: f64,
    energy_rate:  f64,
    success_rate: f64,
    travel_time:  f64,

    launch_year: Year,
}

impl Default for PlayerSpaceship {
    fn default() -> Self {
        Self {
            state:        SpaceshipState::None,
            structurals:  0,
            components:   0,
            modules:      0,
            structure:    [false; NUM_SS_STRUCTURALS],
            fuel:         0,
            propulsion:   0,
            habitation:   0,
            life_support: 0,
            solar_panels: 0,
            mass:         0,
            population:   0,
            support_rate: 0.0,
            energy_rate:  0.0,
            success_rate: 0.0,
            travel_time:  0.0,
            launch_year:  0,
        }
    }
}

impl PlayerSpaceship {
    /// A ship that has not been started.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ship whose cities have already delivered the given parts.
    /// Any non-zero capacity means construction has started.
    pub fn with_capacities(structurals: u32, components: u32, modules: u32) -> SimResult<Self> {
        for (class, requested) in [
            (PartClass::Structural, structurals),
            (PartClass::Component, components),
            (PartClass::Module, modules),
        ] {
            if requested > class.slot_count() {
                return Err(SimError::InvalidCapacity {
                    class: class_label(class),
                    requested,
                    max: class.slot_count(),
                });
            }
        }

        let mut ship = Self { structurals, components, modules, ..Self::default() };
        if structurals + components + modules > 0 {
            ship.state = SpaceshipState::Started;
        }
        Ok(ship)
    }

    // ── Accessors ─────────────────────────────────────────────

    pub fn state(&self) -> SpaceshipState { self.state }
    pub fn structurals(&self) -> u32 { self.structurals }
    pub fn components(&self) -> u32 { self.components }
    pub fn modules(&self) -> u32 { self.modules }
    pub fn fuel(&self) -> u32 { self.fuel }
    pub fn propulsion(&self) -> u32 { self.propulsion }
    pub fn habitation(&self) -> u32 { self.habitation }
    pub fn life_support(&self) -> u32 { self.life_support }
    pub fn solar_panels(&self) -> u32 { self.solar_panels }
    pub fn mass(&self) -> u32 { self.mass }
    pub fn population(&self) -> u32 { self.population }
    pub fn support_rate(&self) -> f64 { self.support_rate }
    pub fn energy_rate(&self) -> f64 { self.energy_rate }
    pub fn success_rate(&self) -> f64 { self.success_rate }
    pub fn travel_time(&self) -> f64 { self.travel_time }
    pub fn launch_year(&self) -> Year { self.launch_year }

    pub fn is_placed(&self, slot: usize) -> bool {
        self.structure.get(slot).copied().unwrap_or(false)
    }

    pub fn structurals_placed(&self) -> u32 {
        self.structure.iter().filter(|s| **s).count() as u32
    }

    pub fn placed(&self, part: PartType) -> u32 {
        match part {
            PartType::Fuel        => self.fuel,
            PartType::Propulsion  => self.propulsion,
            PartType::Habitation  => self.habitation,
            PartType::LifeSupport => self.life_support,
            PartType::SolarPanels => self.solar_panels,
        }
    }

    fn placed_mut(&mut self, part: PartType) -> &mut u32 {
        match part {
            PartType::Fuel        => &mut self.fuel,
            PartType::Propulsion  => &mut self.propulsion,
            PartType::Habitation  => &mut self.habitation,
            PartType::LifeSupport => &mut self.life_support,
            PartType::SolarPanels => &mut self.solar_panels,
        }
    }

    fn pool_used(&self, class: PartClass) -> u32 {
        match class {
            PartClass::Structural => self.structurals_placed(),
            PartClass::Component  => self.fuel + self.propulsion,
            PartClass::Module     => self.habitation + self.life_support + self.solar_panels,
        }
    }

    fn capacity(&self, class: PartClass) -> u32 {
        match class {
            PartClass::Structural => self.structurals,
            PartClass::Component  => self.components,
            PartClass::Module     => self.modules,
        }
    }

    /// Launch year plus travel time, once the ship is in flight.
    pub fn arrival(&self) -> Option<f64> {
        match self.state {
            SpaceshipState::Launched | SpaceshipState::Arrived => {
                Some(self.launch_year as f64 + self.travel_time)
            }
            _ => None,
        }
    }

    /// Score contribution: 100 points per 10,000 colonists, scaled by
    /// mission success. Only an arrived ship counts.
    pub fn score(&self) -> u32 {
        if self.state == SpaceshipState::Arrived {
            (100.0 * self.habitation as f64 * self.success_rate) as u32
        } else {
            0
        }
    }

    // ── Capacity (fed by city production) ─────────────────────

    /// Record one more built part of `class`.
    /// Returns true if this part started the ship.
    pub fn add_part(&mut self, class: PartClass) -> SimResult<bool> {
        let current = self.capacity(class);
        if current >= class.slot_count() {
            return Err(SimError::InvalidCapacity {
                class: class_label(class),
                requested: current + 1,
                max: class.slot_count(),
            });
        }
        match class {
            PartClass::Structural => self.structurals += 1,
            PartClass::Component  => self.components += 1,
            PartClass::Module     => self.modules += 1,
        }
        if self.state == SpaceshipState::None {
            self.state = SpaceshipState::Started;
            return Ok(true);
        }
        Ok(false)
    }

    // ── Placement ─────────────────────────────────────────────

    fn check_modifiable(&self) -> Result<(), PlacementError> {
        match self.state {
            SpaceshipState::None => Err(PlacementError::NoSpaceship),
            SpaceshipState::Started => Ok(()),
            SpaceshipState::Launched | SpaceshipState::Arrived => {
                Err(PlacementError::ModifiedAfterLaunch)
            }
        }
    }

    /// Occupy structural slot `num`. Every slot but the root needs its
    /// required structural already in place.
    pub fn place_structural(&mut self, num: i32) -> Result<(), PlacementError> {
        self.check_modifiable()?;

        let slot = usize::try_from(num)
            .ok()
            .filter(|s| *s < NUM_SS_STRUCTURALS)
            .ok_or(PlacementError::SlotOutOfRange { slot: num })?;
        if self.structure[slot] {
            return Err(PlacementError::SlotOccupied { slot });
        }
        if self.pool_used(PartClass::Structural) >= self.structurals {
            return Err(PlacementError::NoUnplacedParts { class: PartClass::Structural });
        }
        if let Some(required) = STRUCTURALS[slot].required {
            if !self.structure[required] {
                return Err(PlacementError::NotConnected { slot });
            }
        }

        self.structure[slot] = true;
        self.calc_derived();
        Ok(())
    }

    /// Place the `num`-th (1-based) part of `part`. Parts of a type go
    /// in strictly in order and draw on their class's shared pool.
    pub fn place_part(&mut self, part: PartType, num: i32) -> Result<(), PlacementError> {
        self.check_modifiable()?;

        let placed = self.placed(part);
        if i64::from(num) != i64::from(placed) + 1 {
            return Err(PlacementError::OutOfSequence { part, expected: placed + 1, got: num });
        }
        let class = part.class();
        if self.pool_used(class) >= self.capacity(class) {
            return Err(PlacementError::NoUnplacedParts { class });
        }
        if placed + 1 > part.max_placed() {
            return Err(PlacementError::PartLimitReached { part });
        }

        *self.placed_mut(part) += 1;
        self.calc_derived();
        Ok(())
    }

    pub fn place_fuel(&mut self, num: i32) -> Result<(), PlacementError> {
        self.place_part(PartType::Fuel, num)
    }

    pub fn place_propulsion(&mut self, num: i32) -> Result<(), PlacementError> {
        self.place_part(PartType::Propulsion, num)
    }

    pub fn place_habitation(&mut self, num: i32) -> Result<(), PlacementError> {
        self.place_part(PartType::Habitation, num)
    }

    pub fn place_life_support(&mut self, num: i32) -> Result<(), PlacementError> {
        self.place_part(PartType::LifeSupport, num)
    }

    pub fn place_solar_panels(&mut self, num: i32) -> Result<(), PlacementError> {
        self.place_part(PartType::SolarPanels, num)
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Launch in `year`. Returns the estimated (whole) arrival year.
    pub fn launch(&mut self, year: Year) -> Result<Year, PlacementError> {
        if self.state >= SpaceshipState::Launched {
            return Err(PlacementError::AlreadyLaunched);
        }
        if self.state != SpaceshipState::Started || self.success_rate == 0.0 {
            return Err(PlacementError::NotLaunchable);
        }

        self.state = SpaceshipState::Launched;
        self.launch_year = year;
        Ok(year + self.travel_time as Year)
    }

    pub(crate) fn mark_arrived(&mut self) {
        debug_assert_eq!(self.state, SpaceshipState::Launched);
        self.state = SpaceshipState::Arrived;
    }

    /// Back to a freshly created, unstarted ship.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // ── Derivation ────────────────────────────────────────────

    /// Recompute every derived field from the placement state.
    pub fn calc_derived(&mut self) {
        debug_assert!(self.structurals as usize <= NUM_SS_STRUCTURALS);
        debug_assert!(self.components as usize <= NUM_SS_COMPONENTS);
        debug_assert!(self.modules as usize <= NUM_SS_MODULES);
        debug_assert!(self.pool_used(PartClass::Component) <= self.components);
        debug_assert!(self.pool_used(PartClass::Module) <= self.modules);

        let mut mass: u32 = self
            .structure
            .iter()
            .enumerate()
            .filter(|(_, placed)| **placed)
            .map(|(i, _)| topology::structural_mass(i))
            .sum();

        // Only parts whose supporting structural is in place count.
        let fuel         = self.connected(self.fuel, topology::fuel_slot);
        let propulsion   = self.connected(self.propulsion, topology::propulsion_slot);
        let habitation   = self.connected(self.habitation, topology::habitation_slot);
        let life_support = self.connected(self.life_support, topology::life_support_slot);
        let solar_panels = self.connected(self.solar_panels, topology::solar_panel_slot);

        mass += 1600 * (habitation + life_support) + 400 * (solar_panels + propulsion + fuel);
        self.mass = mass;
        self.population = habitation * 10_000;

        self.support_rate = if habitation > 0 {
            life_support as f64 / habitation as f64
        } else {
            0.0
        };
        self.energy_rate = if life_support + habitation > 0 {
            2.0 * solar_panels as f64 / (life_support + habitation) as f64
        } else {
            0.0
        };
        self.success_rate = if fuel > 0 && propulsion > 0 {
            self.support_rate.min(1.0) * self.energy_rate.min(1.0)
        } else {
            0.0
        };
        self.travel_time = mass as f64 / (200.0 * propulsion.min(fuel) as f64 + 20.0);
    }

    fn connected(&self, placed: u32, slot_of: fn(usize) -> &'static topology::PartSlot) -> u32 {
        (0..placed as usize)
            .filter(|n| slot_of(*n).required.is_some_and(|r| self.structure[r]))
            .count() as u32
    }

    /// Full snapshot for delivery to clients.
    pub fn info(&self, player: PlayerId) -> ShipInfo {
        ShipInfo {
            player,
            state:        self.state,
            structurals:  self.structurals,
            components:   self.components,
            modules:      self.modules,
            structure:    self.structure.iter().map(|s| if *s { '1' } else { '0' }).collect(),
            fuel:         self.fuel,
            propulsion:   self.propulsion,
            habitation:   self.habitation,
            life_support: self.life_support,
            solar_panels: self.solar_panels,
            launch_year:  self.launch_year,
            population:   self.population,
            mass:         self.mass,
            support_rate: self.support_rate,
            energy_rate:  self.energy_rate,
            success_rate: self.success_rate,
            travel_time:  self.travel_time,
        }
    }
}

fn class_label(class: PartClass) -> &'static str {
    match class {
        PartClass::Structural => "structural",
        PartClass::Component  => "component",
        PartClass::Module     => "module",
    }
}

/// Everything a client needs to draw one player's ship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipInfo {
    pub player:       PlayerId,
    pub state:        SpaceshipState,
    pub structurals:  u32,
    pub components:   u32,
    pub modules:      u32,
    /// One '0'/'1' per structural slot.
    pub structure:    String,
    pub fuel:         u32,
    pub propulsion:   u32,
    pub habitation:   u32,
    pub life_support: u32,
    pub solar_panels: u32,
    pub launch_year:  Year,
    pub population:   u32,
    pub mass:         u32,
    pub support_rate: f64,
    pub energy_rate:  f64,
    pub success_rate: f64,
    pub travel_time:  f64,
}
