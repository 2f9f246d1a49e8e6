//! The event bus: all inter-subsystem communication, and everything
//! the outer (network) layer is asked to deliver.
//!
//! RULE: Subsystems communicate ONLY through events.
//! A subsystem may never call another subsystem's functions directly.
//! A subsystem may never read another subsystem's internal state.

use crate::{
    spaceship::{RejectionKind, ShipInfo},
    types::{PlayerId, RunId, Tick, Year},
};
use serde::{Deserialize, Serialize};

/// Who an event should be delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "to", content = "player", rename_all = "snake_case")]
pub enum Audience {
    All,
    Player(PlayerId),
    /// Internal bookkeeping; not sent to clients.
    Server,
}

/// Every event emitted during simulation.
/// Variants are appended, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Engine events ──────────────────────────────
    TurnStarted {
        tick: Tick,
    },
    TurnCompleted {
        tick: Tick,
    },
    RunInitialized {
        run_id: RunId,
        seed:   u64,
    },
    CommandReceived {
        tick:         Tick,
        command_id:   String,
        command_type: String,
    },

    // ── Calendar ───────────────────────────────────
    YearAdvanced {
        tick: Tick,
        year: Year,
    },

    // ── Space race ─────────────────────────────────
    /// Full ship snapshot to push to clients.
    ShipStateChanged {
        tick:     Tick,
        audience: Audience,
        info:     ShipInfo,
    },
    ActionRejected {
        tick:    Tick,
        player:  PlayerId,
        kind:    RejectionKind,
        message: String,
    },
    SpaceshipStarted {
        tick:    Tick,
        player:  PlayerId,
        message: String,
    },
    SpaceshipLaunched {
        tick:         Tick,
        player:       PlayerId,
        launch_year:  Year,
        arrival_year: Year,
        message:      String,
    },
    SpaceshipLost {
        tick:    Tick,
        player:  PlayerId,
        message: String,
    },
    SpaceshipArrived {
        tick:    Tick,
        player:  PlayerId,
        year:    Year,
        message: String,
    },
    GameOver {
        tick:   Tick,
        winner: PlayerId,
    },
}

impl SimEvent {
    /// Stable string name of the variant.
    /// Used for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::TurnStarted { .. }       => "turn_started",
            Self::TurnCompleted { .. }     => "turn_completed",
            Self::RunInitialized { .. }    => "run_initialized",
            Self::CommandReceived { .. }   => "command_received",
            Self::YearAdvanced { .. }      => "year_advanced",
            Self::ShipStateChanged { .. }  => "ship_state_changed",
            Self::ActionRejected { .. }    => "action_rejected",
            Self::SpaceshipStarted { .. }  => "spaceship_started",
            Self::SpaceshipLaunched { .. } => "spaceship_launched",
            Self::SpaceshipLost { .. }     => "spaceship_lost",
            Self::SpaceshipArrived { .. }  => "spaceship_arrived",
            Self::GameOver { .. }          => "game_over",
        }
    }

    pub fn audience(&self) -> Audience {
        match self {
            Self::ShipStateChanged { audience, .. } => *audience,
            Self::ActionRejected { player, .. }     => Audience::Player(*player),
            Self::YearAdvanced { .. }
            | Self::SpaceshipStarted { .. }
            | Self::SpaceshipLaunched { .. }
            | Self::SpaceshipLost { .. }
            | Self::SpaceshipArrived { .. }
            | Self::GameOver { .. } => Audience::All,
            Self::TurnStarted { .. }
            | Self::TurnCompleted { .. }
            | Self::RunInitialized { .. }
            | Self::CommandReceived { .. } => Audience::Server,
        }
    }

    /// Announcement text, for events that carry one.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::ActionRejected { message, .. }
            | Self::SpaceshipStarted { message, .. }
            | Self::SpaceshipLaunched { message, .. }
            | Self::SpaceshipLost { message, .. }
            | Self::SpaceshipArrived { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub run_id:     RunId,
    pub tick:       Tick,
    pub subsystem:  String,
    pub event_type: String,
    pub payload:    String, // JSON-serialized SimEvent
}
