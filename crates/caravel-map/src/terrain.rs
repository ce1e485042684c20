//! Terrain types and helpers.

/// Terrain class of a tile.
///
/// The land/water split is fixed for a given terrain value; a tile only
/// changes class through an explicit [`TileMap::set_terrain`] edit.
///
/// [`TileMap::set_terrain`]: crate::TileMap::set_terrain
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Terrain {
    Plains,
    Grassland,
    Forest,
    Marsh,
    Hills,
    Mountains,
    Ocean,
    HighSeas,
}

impl Terrain {
    /// Whether this terrain is land (as opposed to water).
    #[inline]
    pub const fn is_land(self) -> bool {
        !matches!(self, Terrain::Ocean | Terrain::HighSeas)
    }

    /// Base cost of moving onto a tile of this terrain, in movement points.
    #[inline]
    pub const fn base_move_cost(self) -> i32 {
        match self {
            Terrain::Plains | Terrain::Grassland => 3,
            Terrain::Forest | Terrain::Marsh | Terrain::Hills => 6,
            Terrain::Mountains => 9,
            Terrain::Ocean | Terrain::HighSeas => 3,
        }
    }

    /// Character representation, for map dumps.
    pub const fn rune(self) -> char {
        match self {
            Terrain::Plains => '.',
            Terrain::Grassland => ',',
            Terrain::Forest => '"',
            Terrain::Marsh => '%',
            Terrain::Hills => '^',
            Terrain::Mountains => 'A',
            Terrain::Ocean => '~',
            Terrain::HighSeas => '=',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn land_water_split() {
        assert!(Terrain::Plains.is_land());
        assert!(Terrain::Mountains.is_land());
        assert!(!Terrain::Ocean.is_land());
        assert!(!Terrain::HighSeas.is_land());
    }

    #[test]
    fn costs_positive() {
        for t in [
            Terrain::Plains,
            Terrain::Grassland,
            Terrain::Forest,
            Terrain::Marsh,
            Terrain::Hills,
            Terrain::Mountains,
            Terrain::Ocean,
            Terrain::HighSeas,
        ] {
            assert!(t.base_move_cost() > 0);
        }
    }
}
