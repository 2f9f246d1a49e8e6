//! Space race simulation core: spaceship construction, launch, and the
//! arrival race that ends the game, driven turn by turn.

pub mod arrival;
pub mod calendar;
pub mod calendar_subsystem;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod player;
pub mod rng;
pub mod spacerace_subsystem;
pub mod spaceship;
pub mod store;
pub mod subsystem;
pub mod topology;
pub mod types;
