//! Random world generation for demos and test fixtures.
//!
//! Uses a drunk-walk approach to raise continents out of an all-ocean map,
//! then sprinkles rougher terrain over the interior.

use caravel_core::Point;
use rand::{Rng, RngExt};

use crate::map::TileMap;
use crate::terrain::Terrain;

/// World generator parameterized over an rng, so fixtures can be seeded.
pub struct WorldGen<R: Rng> {
    pub rng: R,
}

impl<R: Rng> WorldGen<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a `width` × `height` map with roughly `land_fraction` of its
    /// tiles raised to land.
    pub fn generate(&mut self, width: i32, height: i32, land_fraction: f64) -> TileMap {
        let mut map = TileMap::new(width, height, Terrain::Ocean);
        if width <= 0 || height <= 0 {
            return map;
        }

        let total = (width as usize) * (height as usize);
        let target = ((total as f64) * land_fraction.clamp(0.0, 1.0)) as usize;
        let mut raised = 0usize;

        // Drunk walks from random interior seeds until enough land exists.
        let mut p = self.interior_point(width, height);
        let mut stuck = 0u32;
        while raised < target && stuck < 10_000 {
            if map.is_land(p) {
                stuck += 1;
            } else {
                map.set_terrain(p, Terrain::Plains);
                raised += 1;
                stuck = 0;
            }
            p = self.step(p, width, height);
            // Occasionally teleport to a fresh seed to form islands.
            if self.rng.random_range(0..100u32) < 2 {
                p = self.interior_point(width, height);
            }
        }

        // Rough up the interior.
        for p in map.bounds() {
            if !map.is_land(p) {
                continue;
            }
            match self.rng.random_range(0..10u32) {
                0 => map.set_terrain(p, Terrain::Forest),
                1 => map.set_terrain(p, Terrain::Hills),
                2 => map.set_terrain(p, Terrain::Grassland),
                3 if self.rng.random_range(0..3u32) == 0 => {
                    map.set_terrain(p, Terrain::Mountains);
                }
                _ => {}
            }
        }

        // Deep water along the east and west borders.
        for y in 0..height {
            for x in [0, width - 1] {
                let p = Point::new(x, y);
                if !map.is_land(p) {
                    map.set_terrain(p, Terrain::HighSeas);
                }
            }
        }

        map
    }

    fn interior_point(&mut self, width: i32, height: i32) -> Point {
        let x = if width > 2 {
            self.rng.random_range(1..width - 1)
        } else {
            0
        };
        let y = if height > 2 {
            self.rng.random_range(1..height - 1)
        } else {
            0
        };
        Point::new(x, y)
    }

    /// One random cardinal step, clamped one tile inside the border.
    fn step(&mut self, p: Point, width: i32, height: i32) -> Point {
        let q = match self.rng.random_range(0..4u32) {
            0 => Point::new(p.x + 1, p.y),
            1 => Point::new(p.x - 1, p.y),
            2 => Point::new(p.x, p.y + 1),
            _ => Point::new(p.x, p.y - 1),
        };
        Point::new(
            q.x.clamp(1, (width - 2).max(0)),
            q.y.clamp(1, (height - 2).max(0)),
        )
    }
}
