//! Arrival resolution: which launched ship, if any, has reached its
//! destination by the current year.

use crate::{
    spaceship::{PlayerSpaceship, SpaceshipState},
    types::{PlayerId, Year},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrival {
    pub player:  PlayerId,
    /// Launch year plus travel time.
    pub arrival: f64,
}

/// Scan ships in tie-break order and return the earliest arrival that
/// has already happened. On equal arrival values the first one visited
/// wins, so the caller's ordering is the tie-break rule.
pub fn resolve_arrivals<'a, I>(current_year: Year, ships_in_order: I) -> Option<Arrival>
where
    I: IntoIterator<Item = (PlayerId, &'a PlayerSpaceship)>,
{
    let mut best: Option<Arrival> = None;

    for (player, ship) in ships_in_order {
        if ship.state() != SpaceshipState::Launched {
            continue;
        }
        let Some(arrival) = ship.arrival() else { continue };
        if f64::from(current_year) < arrival {
            continue;
        }
        if best.map_or(true, |b| arrival < b.arrival) {
            best = Some(Arrival { player, arrival });
        }
    }

    best
}
