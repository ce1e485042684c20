//! The 8-way compass: [`Direction`] and the [`DirSet`] bitmask.

use std::fmt;

use crate::geom::Point;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the eight compass directions connecting a tile to its neighbors.
///
/// The discriminants are bit positions for [`DirSet`]. [`Direction::ALL`]
/// is the canonical enumeration order; search code expands neighbors in this
/// exact order so that equal-cost ties resolve identically across runs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    N = 0,
    NE = 1,
    E = 2,
    SE = 3,
    S = 4,
    SW = 5,
    W = 6,
    NW = 7,
}

impl Direction {
    /// All eight directions in canonical (clockwise from north) order.
    pub const ALL: [Direction; 8] = [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ];

    /// Coordinate offset of one step in this direction.
    /// Y grows south, so north is (0, -1).
    #[inline]
    pub const fn delta(self) -> Point {
        match self {
            Direction::N => Point::new(0, -1),
            Direction::NE => Point::new(1, -1),
            Direction::E => Point::new(1, 0),
            Direction::SE => Point::new(1, 1),
            Direction::S => Point::new(0, 1),
            Direction::SW => Point::new(-1, 1),
            Direction::W => Point::new(-1, 0),
            Direction::NW => Point::new(-1, -1),
        }
    }

    /// The opposite direction. Involutive: `d.reverse().reverse() == d`.
    #[inline]
    pub const fn reverse(self) -> Direction {
        match self {
            Direction::N => Direction::S,
            Direction::NE => Direction::SW,
            Direction::E => Direction::W,
            Direction::SE => Direction::NW,
            Direction::S => Direction::N,
            Direction::SW => Direction::NE,
            Direction::W => Direction::E,
            Direction::NW => Direction::SE,
        }
    }

    /// The direction from `from` to an 8-way adjacent `to`, or `None` if the
    /// two points are not adjacent (or are equal).
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        let d = to - from;
        Direction::ALL.into_iter().find(|dir| dir.delta() == d)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
            Direction::NW => "NW",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// DirSet
// ---------------------------------------------------------------------------

/// Bitmask over the eight [`Direction`]s.
///
/// Tiles use this to record which edges a road or river connects across.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DirSet(pub u8);

impl DirSet {
    pub const EMPTY: Self = Self(0);

    /// A set containing a single direction.
    #[inline]
    pub const fn single(d: Direction) -> Self {
        Self(1 << d as u8)
    }

    /// Whether `d` is in the set.
    #[inline]
    pub const fn contains(self, d: Direction) -> bool {
        self.0 & (1 << d as u8) != 0
    }

    /// The set with `d` added.
    #[inline]
    pub const fn with(self, d: Direction) -> Self {
        Self(self.0 | (1 << d as u8))
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for DirSet {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverse_is_involutive() {
        for d in Direction::ALL {
            assert_eq!(d.reverse().reverse(), d);
        }
    }

    #[test]
    fn reverse_negates_delta() {
        for d in Direction::ALL {
            let fwd = d.delta();
            let back = d.reverse().delta();
            assert_eq!(fwd + back, Point::ZERO, "{d} vs {}", d.reverse());
        }
    }

    #[test]
    fn all_deltas_distinct() {
        for a in Direction::ALL {
            for b in Direction::ALL {
                if a != b {
                    assert_ne!(a.delta(), b.delta());
                }
            }
        }
    }

    #[test]
    fn between_adjacent() {
        let p = Point::new(4, 4);
        for d in Direction::ALL {
            assert_eq!(Direction::between(p, p + d.delta()), Some(d));
        }
        assert_eq!(Direction::between(p, p), None);
        assert_eq!(Direction::between(p, Point::new(7, 4)), None);
    }

    #[test]
    fn dirset_operations() {
        let s = DirSet::single(Direction::N).with(Direction::SE);
        assert!(s.contains(Direction::N));
        assert!(s.contains(Direction::SE));
        assert!(!s.contains(Direction::S));
        assert!(!s.is_empty());
        assert!(DirSet::EMPTY.is_empty());

        let t = s | DirSet::single(Direction::W);
        assert!(t.contains(Direction::W));
        assert!(t.contains(Direction::N));
    }
}
