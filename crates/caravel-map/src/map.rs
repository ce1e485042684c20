//! The tile map: flat storage, adjacency and the movement query surface.

use caravel_core::{Direction, Point, Range};

use crate::terrain::Terrain;
use crate::tile::{PlayerId, Settlement, SettlementId, SettlementKind, Tile};

/// A rectangular grid of [`Tile`]s with 8-way adjacency.
///
/// Tiles are stored row-major over the map's [`Range`]. The map is owned and
/// mutated by the surrounding simulation; the path engine only reads it.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TileMap {
    bounds: Range,
    width: usize,
    tiles: Vec<Tile>,
    settlements: Vec<Settlement>,
}

impl TileMap {
    /// Create a `width` × `height` map filled with `fill` terrain.
    pub fn new(width: i32, height: i32, fill: Terrain) -> Self {
        let bounds = Range::new(0, 0, width.max(0), height.max(0));
        Self {
            bounds,
            width: bounds.width() as usize,
            tiles: vec![Tile::new(fill); bounds.len()],
            settlements: Vec::new(),
        }
    }

    /// The map rectangle.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    /// Whether `p` is on the map.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if !self.bounds.contains(p) {
            return None;
        }
        let x = (p.x - self.bounds.min.x) as usize;
        let y = (p.y - self.bounds.min.y) as usize;
        Some(y * self.width + x)
    }

    /// The tile at `p`, or `None` off-map.
    #[inline]
    pub fn tile(&self, p: Point) -> Option<&Tile> {
        self.idx(p).map(|i| &self.tiles[i])
    }

    #[inline]
    fn tile_mut(&mut self, p: Point) -> Option<&mut Tile> {
        self.idx(p).map(|i| &mut self.tiles[i])
    }

    /// The neighbor of `p` one step in direction `d`, or `None` off-map.
    ///
    /// Adjacency is symmetric: where both endpoints exist,
    /// `neighbor(neighbor(p, d), d.reverse()) == p`.
    #[inline]
    pub fn neighbor(&self, p: Point, d: Direction) -> Option<Point> {
        let n = p + d.delta();
        self.bounds.contains(n).then_some(n)
    }

    // -----------------------------------------------------------------------
    // Movement query surface
    // -----------------------------------------------------------------------

    /// Whether the tile at `p` is land. Off-map positions count as water.
    #[inline]
    pub fn is_land(&self, p: Point) -> bool {
        self.tile(p).is_some_and(|t| t.terrain.is_land())
    }

    /// Base cost of moving onto the tile at `p`.
    ///
    /// Off-map positions report the maximum terrain cost; callers are
    /// expected to have bounds-checked via [`TileMap::neighbor`] first.
    #[inline]
    pub fn base_move_cost(&self, p: Point) -> i32 {
        self.tile(p)
            .map_or(Terrain::Mountains.base_move_cost(), |t| {
                t.terrain.base_move_cost()
            })
    }

    /// Whether any improvement on the tile at `p` connects across edge `d`.
    #[inline]
    pub fn has_connected_improvement(&self, p: Point, d: Direction) -> bool {
        self.tile(p).is_some_and(|t| t.connected(d))
    }

    /// Whether the edge leaving `from` in direction `d` is spanned by a
    /// matching improvement: road meeting road, or river meeting river,
    /// each connected toward the other endpoint.
    pub fn edge_has_improvement(&self, from: Point, d: Direction) -> bool {
        let Some(to) = self.neighbor(from, d) else {
            return false;
        };
        let (Some(a), Some(b)) = (self.tile(from), self.tile(to)) else {
            return false;
        };
        let back = d.reverse();
        (a.road.contains(d) && b.road.contains(back))
            || (a.river.contains(d) && b.river.contains(back))
    }

    /// The settlement occupying the tile at `p`, if any.
    #[inline]
    pub fn settlement_at(&self, p: Point) -> Option<SettlementId> {
        self.tile(p).and_then(|t| t.settlement)
    }

    /// The player owning the tile at `p`, if any.
    #[inline]
    pub fn owner_at(&self, p: Point) -> Option<PlayerId> {
        self.tile(p).and_then(|t| t.owner)
    }

    /// Look up a registered settlement.
    #[inline]
    pub fn settlement(&self, id: SettlementId) -> Option<&Settlement> {
        self.settlements.get(id.0 as usize)
    }

    // -----------------------------------------------------------------------
    // Editing (simulation side)
    // -----------------------------------------------------------------------

    /// Replace the terrain at `p`. This is the only way a tile changes its
    /// land/water class. No-op off-map.
    pub fn set_terrain(&mut self, p: Point, terrain: Terrain) {
        if let Some(t) = self.tile_mut(p) {
            t.terrain = terrain;
        }
    }

    /// Claim the tile at `p` for `player`. No-op off-map.
    pub fn set_owner(&mut self, p: Point, player: PlayerId) {
        if let Some(t) = self.tile_mut(p) {
            t.owner = Some(player);
        }
    }

    /// Lay a road across the edge leaving `p` in direction `d`, connecting
    /// both endpoints toward each other. No-op if either endpoint is off-map.
    pub fn add_road(&mut self, p: Point, d: Direction) {
        let Some(n) = self.neighbor(p, d) else {
            return;
        };
        if let Some(t) = self.tile_mut(p) {
            t.road = t.road.with(d);
        }
        if let Some(t) = self.tile_mut(n) {
            t.road = t.road.with(d.reverse());
        }
    }

    /// Mark a river flowing across the edge leaving `p` in direction `d`.
    /// Symmetric like [`TileMap::add_road`].
    pub fn add_river(&mut self, p: Point, d: Direction) {
        let Some(n) = self.neighbor(p, d) else {
            return;
        };
        if let Some(t) = self.tile_mut(p) {
            t.river = t.river.with(d);
        }
        if let Some(t) = self.tile_mut(n) {
            t.river = t.river.with(d.reverse());
        }
    }

    /// Register a settlement of `kind` for `owner` on the tile at `p`.
    ///
    /// The tile gains the settlement occupant and passes to `owner`.
    /// Returns the new settlement's id, or `None` off-map.
    pub fn add_settlement(
        &mut self,
        p: Point,
        kind: SettlementKind,
        owner: PlayerId,
        name: impl Into<String>,
    ) -> Option<SettlementId> {
        self.idx(p)?;
        let id = SettlementId(self.settlements.len() as u32);
        self.settlements.push(Settlement {
            id,
            kind,
            owner,
            name: name.into(),
        });
        let t = self.tile_mut(p)?;
        t.settlement = Some(id);
        t.owner = Some(owner);
        Some(id)
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn map_round_trip() {
        let mut map = TileMap::new(4, 3, Terrain::Grassland);
        map.add_road(Point::new(1, 1), Direction::E);
        map.add_settlement(
            Point::new(2, 2),
            SettlementKind::NativeSettlement,
            PlayerId(1),
            "village",
        );
        let json = serde_json::to_string(&map).unwrap();
        let back: TileMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bounds(), map.bounds());
        assert_eq!(back.tile(Point::new(1, 1)), map.tile(Point::new(1, 1)));
        assert_eq!(back.settlement_at(Point::new(2, 2)), Some(SettlementId(0)));
    }
}
