//! World state consumed by the caravel movement engine.
//!
//! This crate holds the map-side collaborators of a path query:
//!
//! - [`TileMap`]: tiles with 8-way adjacency, terrain, improvements,
//!   settlements and ownership.
//! - [`Unit`]: the movement profile of a mobile entity (allowance, land or
//!   naval, embarkation, cargo).
//! - [`Rules`] and [`Relations`]: game-rule configuration and diplomatic
//!   state queried by movement legality checks.
//! - [`mapgen`]: a small random world generator for demos and test fixtures.
//!
//! The engine never mutates any of these; the surrounding turn-based
//! simulation owns them for the whole session.

pub mod mapgen;
mod map;
mod rules;
mod terrain;
mod tile;
mod unit;

pub use map::TileMap;
pub use rules::{Relations, Rules};
pub use terrain::Terrain;
pub use tile::{PlayerId, Settlement, SettlementId, SettlementKind, Tile};
pub use unit::Unit;
