//! Static spaceship plan: every slot a part can occupy, where it sits
//! on the plan grid, and which structural it hangs from.
//!
//! Structural 0 is the root of the frame and has no requirement.
//! Component slots alternate fuel (even) / propulsion (odd).
//! Module slots cycle habitation / life support / solar panels.

pub const NUM_SS_STRUCTURALS: usize = 32;
pub const NUM_SS_COMPONENTS: usize = 16;
pub const NUM_SS_MODULES: usize = 12;

/// Structurals below this index belong to the inner frame and weigh double.
pub const HEAVY_STRUCTURALS: usize = 6;

/// Per-type placement limits.
pub const MAX_FUEL: u32 = (NUM_SS_COMPONENTS / 2) as u32;
pub const MAX_PROPULSION: u32 = (NUM_SS_COMPONENTS / 2) as u32;
pub const MAX_PER_MODULE_TYPE: u32 = (NUM_SS_MODULES / 3) as u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSlot {
    pub x: u8,
    pub y: u8,
    /// Structural slot this part depends on; `None` only for the root.
    pub required: Option<usize>,
}

const fn slot(x: u8, y: u8, required: usize) -> PartSlot {
    PartSlot { x, y, required: Some(required) }
}

pub const STRUCTURALS: [PartSlot; NUM_SS_STRUCTURALS] = [
    PartSlot { x: 19, y: 13, required: None },
    slot(19, 15, 0),
    slot(19, 11, 0),
    slot(19, 17, 1),
    slot(19, 9, 2),
    slot(19, 19, 3),
    slot(17, 9, 4),
    slot(17, 19, 5),
    slot(21, 11, 2),
    slot(21, 17, 3),
    slot(15, 9, 6),
    slot(15, 19, 7),
    slot(23, 11, 8),
    slot(23, 17, 9),
    slot(13, 9, 10),
    slot(13, 19, 11),
    slot(11, 9, 14),
    slot(11, 19, 15),
    slot(9, 9, 16),
    slot(9, 19, 17),
    slot(7, 9, 18),
    slot(7, 19, 19),
    slot(19, 7, 4),
    slot(19, 21, 5),
    slot(19, 5, 22),
    slot(19, 23, 23),
    slot(21, 5, 24),
    slot(21, 23, 25),
    slot(23, 5, 26),
    slot(23, 23, 27),
    slot(5, 9, 20),
    slot(5, 19, 21),
];

pub const COMPONENTS: [PartSlot; NUM_SS_COMPONENTS] = [
    slot(21, 13, 0),
    slot(24, 13, 0),
    slot(21, 15, 1),
    slot(24, 15, 1),
    slot(21, 9, 4),
    slot(24, 9, 4),
    slot(21, 19, 5),
    slot(24, 19, 5),
    slot(21, 7, 22),
    slot(24, 7, 22),
    slot(21, 21, 23),
    slot(24, 21, 23),
    slot(21, 3, 26),
    slot(24, 3, 26),
    slot(21, 25, 27),
    slot(24, 25, 27),
];

pub const MODULES: [PartSlot; NUM_SS_MODULES] = [
    slot(16, 12, 6),
    slot(16, 16, 7),
    slot(14, 6, 10),
    slot(12, 16, 15),
    slot(12, 12, 14),
    slot(14, 22, 11),
    slot(8, 12, 18),
    slot(8, 16, 19),
    slot(6, 6, 20),
    slot(4, 16, 31),
    slot(4, 12, 30),
    slot(6, 22, 21),
];

/// Mass contributed by an occupied structural slot.
pub fn structural_mass(index: usize) -> u32 {
    if index < HEAVY_STRUCTURALS { 200 } else { 100 }
}

/// The n-th (0-based) fuel part's slot.
pub fn fuel_slot(n: usize) -> &'static PartSlot {
    &COMPONENTS[n * 2]
}

pub fn propulsion_slot(n: usize) -> &'static PartSlot {
    &COMPONENTS[n * 2 + 1]
}

pub fn habitation_slot(n: usize) -> &'static PartSlot {
    &MODULES[n * 3]
}

pub fn life_support_slot(n: usize) -> &'static PartSlot {
    &MODULES[n * 3 + 1]
}

pub fn solar_panel_slot(n: usize) -> &'static PartSlot {
    &MODULES[n * 3 + 2]
}
