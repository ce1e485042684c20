//! Unit movement profiles.

use caravel_core::Point;

use crate::tile::PlayerId;

/// The movement profile of a mobile entity, as consumed by path queries.
///
/// The engine reads this surface and never mutates it; actually spending a
/// unit's moves is the simulation's job after a path has been chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    owner: PlayerId,
    allowance: i32,
    naval: bool,
    embark: bool,
    cargo: u32,
    destination: Option<Point>,
}

impl Unit {
    /// A land unit with the given per-turn movement allowance.
    pub const fn land(owner: PlayerId, allowance: i32) -> Self {
        Self {
            owner,
            allowance,
            naval: false,
            embark: false,
            cargo: 0,
            destination: None,
        }
    }

    /// A naval unit with the given per-turn movement allowance.
    pub const fn naval(owner: PlayerId, allowance: i32) -> Self {
        Self {
            owner,
            allowance,
            naval: true,
            embark: false,
            cargo: 0,
            destination: None,
        }
    }

    /// Allow this unit to enter water tiles on its own (canoes, and the
    /// like).
    pub const fn with_embark(mut self) -> Self {
        self.embark = true;
        self
    }

    /// Set the number of cargo goods carried.
    pub const fn with_cargo(mut self, cargo: u32) -> Self {
        self.cargo = cargo;
        self
    }

    /// Set the unit's final destination, which relaxes settlement-entry
    /// rules for that one tile.
    pub const fn with_destination(mut self, p: Point) -> Self {
        self.destination = Some(p);
        self
    }

    /// Movement points granted at the start of each turn.
    #[inline]
    pub const fn movement_allowance(&self) -> i32 {
        self.allowance
    }

    /// Whether this is a naval unit.
    #[inline]
    pub const fn is_naval(&self) -> bool {
        self.naval
    }

    /// Whether the unit may enter water without a carrier.
    #[inline]
    pub const fn can_embark(&self) -> bool {
        self.embark
    }

    /// Number of cargo goods carried.
    #[inline]
    pub const fn cargo_count(&self) -> u32 {
        self.cargo
    }

    /// The owning player.
    #[inline]
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    /// The unit's final destination, if one is set.
    #[inline]
    pub const fn final_destination(&self) -> Option<Point> {
        self.destination
    }
}
