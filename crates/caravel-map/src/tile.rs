//! Tiles, settlements and id newtypes.

use std::fmt;

use caravel_core::DirSet;

use crate::terrain::Terrain;

/// Identifies a player for ownership and diplomacy queries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}

/// Identifies a settlement registered on a [`TileMap`].
///
/// [`TileMap`]: crate::TileMap
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SettlementId(pub u32);

/// What kind of settlement occupies a tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SettlementKind {
    /// A European-style colony.
    Colony,
    /// A native settlement.
    NativeSettlement,
}

/// A settlement occupying one tile of the map.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settlement {
    pub id: SettlementId,
    pub kind: SettlementKind,
    pub owner: PlayerId,
    pub name: String,
}

/// One map tile: terrain plus optional improvements, settlement and owner.
///
/// The `road` and `river` masks record which edges the improvement connects
/// across; an edge only reduces movement cost when both endpoints carry the
/// same improvement connected toward each other.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
    pub terrain: Terrain,
    pub road: DirSet,
    pub river: DirSet,
    pub settlement: Option<SettlementId>,
    pub owner: Option<PlayerId>,
}

impl Tile {
    /// A bare tile of the given terrain.
    pub const fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            road: DirSet::EMPTY,
            river: DirSet::EMPTY,
            settlement: None,
            owner: None,
        }
    }

    /// Whether any improvement on this tile connects across the given edge.
    #[inline]
    pub fn connected(&self, d: caravel_core::Direction) -> bool {
        self.road.contains(d) || self.river.contains(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caravel_core::Direction;

    #[test]
    fn bare_tile_has_nothing() {
        let t = Tile::new(Terrain::Forest);
        assert_eq!(t.terrain, Terrain::Forest);
        assert!(t.road.is_empty());
        assert!(t.river.is_empty());
        assert!(t.settlement.is_none());
        assert!(t.owner.is_none());
        assert!(!t.connected(Direction::E));
    }

    #[test]
    fn connected_checks_both_improvements() {
        let mut t = Tile::new(Terrain::Plains);
        t.road = t.road.with(Direction::N);
        t.river = t.river.with(Direction::S);
        assert!(t.connected(Direction::N));
        assert!(t.connected(Direction::S));
        assert!(!t.connected(Direction::E));
    }
}
