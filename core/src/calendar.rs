//! Game calendar: how far the year moves each turn.
//!
//! Early eras move in big jumps. Once spaceship parts can be built the
//! calendar slows down so the race plays out over many turns.

use crate::types::Year;
use serde::{Deserialize, Serialize};

/// Which spaceship part classes anyone in the game can build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartsAvailable {
    pub structural: bool,
    pub component:  bool,
    pub module:     bool,
}

impl PartsAvailable {
    pub fn count(&self) -> u32 {
        [self.structural, self.component, self.module]
            .iter()
            .filter(|b| **b)
            .count() as u32
    }
}

/// The year after `year`. There is no year 0: 1 BC is followed by 1 AD
/// and a step that would land on 0 lands on 1 instead.
pub fn next_year(year: Year, parts: PartsAvailable) -> Year {
    let parts = parts.count();
    let mut year = if year == 1 { 0 } else { year };

    year += if year >= 1900 || (parts >= 3 && year > 0) {
        1
    } else if year >= 1750 || parts >= 2 {
        2
    } else if year >= 1500 || parts >= 1 {
        5
    } else if year >= 1000 {
        10
    } else if year >= 0 {
        20
    } else if year >= -1000 {
        25
    } else {
        50
    };

    if year == 0 { 1 } else { year }
}

/// "1850 AD" / "4000 BC".
pub fn text_year(year: Year) -> String {
    if year < 0 {
        format!("{} BC", -year)
    } else {
        format!("{year} AD")
    }
}
