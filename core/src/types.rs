//! Shared primitive types used across the entire simulation.

/// A simulation tick. One tick = one game turn.
pub type Tick = u64;

/// Index of a player in join order. Stable for the whole game.
pub type PlayerId = usize;

/// A calendar year. Negative values are BC; there is no year 0.
pub type Year = i32;

/// The canonical run identifier.
pub type RunId = String;
