//! Read-only world view threaded through a path query.

use caravel_map::{Relations, Rules, TileMap};

/// Borrowed world state a query evaluates against.
///
/// The engine only reads through this view; the map, rules and relations
/// must not be mutated while a query is in flight (the turn-based
/// simulation's single-writer discipline guarantees this).
#[derive(Copy, Clone)]
pub struct SearchContext<'a> {
    pub map: &'a TileMap,
    pub rules: &'a Rules,
    pub relations: &'a Relations,
}

impl<'a> SearchContext<'a> {
    pub fn new(map: &'a TileMap, rules: &'a Rules, relations: &'a Relations) -> Self {
        Self {
            map,
            rules,
            relations,
        }
    }
}
