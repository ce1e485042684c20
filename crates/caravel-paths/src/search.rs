//! The best-first path search.

use std::collections::BinaryHeap;

use caravel_core::{Direction, Point};
use caravel_map::Unit;
use log::{debug, trace};

use crate::context::SearchContext;
use crate::cost::{CostPolicy, ILLEGAL_MOVE};
use crate::error::QueryError;
use crate::goal::{GoalDecider, GoalExpr};
use crate::node::{NodeArena, NodeId, Path, PathNode, search_key};

/// What a query is searching for: a concrete tile, or anything a goal
/// decider accepts.
#[derive(Debug)]
pub enum Target {
    Tile(Point),
    Goal(GoalDecider),
}

/// One path query. Consumed by [`PathFinder::find_path`], so the goal
/// decider it carries can never leak into a second search.
#[derive(Debug)]
pub struct PathQuery<'a> {
    pub unit: &'a Unit,
    pub from: Point,
    pub target: Target,
    pub policy: CostPolicy,
    /// Naval transport evaluated as the mover on water edges when the unit
    /// cannot embark by itself.
    pub carrier: Option<&'a Unit>,
    /// Give up on nodes beyond this many turns out.
    pub max_turns: Option<i32>,
    /// Defensive cap on node expansions; a map-size-derived default applies
    /// when unset.
    pub max_expansions: Option<usize>,
    /// When a ceiling cuts the search short of the goal, return the closest
    /// node reached instead of no path.
    pub best_effort: bool,
}

impl<'a> PathQuery<'a> {
    /// A query for the cheapest route to one tile.
    pub fn to_tile(unit: &'a Unit, from: Point, to: Point) -> Self {
        Self {
            unit,
            from,
            target: Target::Tile(to),
            policy: CostPolicy::Standard,
            carrier: None,
            max_turns: None,
            max_expansions: None,
            best_effort: false,
        }
    }

    /// A query for the nearest node the goal decider accepts.
    pub fn to_goal(unit: &'a Unit, from: Point, goal: GoalDecider) -> Self {
        Self {
            unit,
            from,
            target: Target::Goal(goal),
            policy: CostPolicy::Standard,
            carrier: None,
            max_turns: None,
            max_expansions: None,
            best_effort: false,
        }
    }

    pub fn with_policy(mut self, policy: CostPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_carrier(mut self, carrier: &'a Unit) -> Self {
        self.carrier = Some(carrier);
        self
    }

    pub fn with_max_turns(mut self, turns: i32) -> Self {
        self.max_turns = Some(turns);
        self
    }

    pub fn with_max_expansions(mut self, cap: usize) -> Self {
        self.max_expansions = Some(cap);
        self
    }

    pub fn best_effort(mut self) -> Self {
        self.best_effort = true;
        self
    }
}

/// Reference into the node arena, ordered by key for use in `BinaryHeap`.
#[derive(Clone, Copy, Eq, PartialEq)]
struct FrontierRef {
    id: NodeId,
    key: i64,
}

impl Ord for FrontierRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest key first.
        other.key.cmp(&self.key)
    }
}

impl PartialOrd for FrontierRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// The search engine. Owns the node arena and best-known-key table so that
/// repeated queries reuse their allocations.
///
/// One `PathFinder` runs one query at a time (`&mut self`); concurrent
/// callers each need their own, along with their own decider instances.
pub struct PathFinder {
    arena: NodeArena,
    best: Vec<i64>,
    marks: Vec<u32>,
    generation: u32,
}

impl Default for PathFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl PathFinder {
    pub fn new() -> Self {
        Self {
            arena: NodeArena::new(),
            best: Vec::new(),
            marks: Vec::new(),
            generation: 0,
        }
    }

    /// Find the cheapest route satisfying `query`, or `Ok(None)` when the
    /// goal is unreachable (a normal outcome, not an error).
    ///
    /// Fails only on malformed invocations, currently an off-map origin.
    pub fn find_path(
        &mut self,
        ctx: &SearchContext<'_>,
        query: PathQuery<'_>,
    ) -> Result<Option<Path>, QueryError> {
        let PathQuery {
            unit,
            from,
            target,
            policy,
            carrier,
            max_turns,
            max_expansions,
            best_effort,
        } = query;

        let bounds = ctx.map.bounds();
        if !bounds.contains(from) {
            return Err(QueryError::OriginOffMap {
                origin: from,
                bounds,
            });
        }

        let width = bounds.width() as usize;
        let len = bounds.len();
        if self.best.len() < len {
            self.best.resize(len, i64::MAX);
            self.marks.resize(len, 0);
        }
        self.generation = self.generation.wrapping_add(1);
        let cur_gen = self.generation;

        let target_tile = match target {
            Target::Tile(p) => Some(p),
            Target::Goal(_) => None,
        };
        let mut goal = match target {
            Target::Tile(p) => GoalDecider::new(GoalExpr::AtTile(p)),
            Target::Goal(g) => g,
        };
        let mut decider = policy.decider();

        let idx = |p: Point| -> usize {
            ((p.y - bounds.min.y) as usize) * width + (p.x - bounds.min.x) as usize
        };

        self.arena.clear();
        let start_key = search_key(0, unit.movement_allowance());
        let start = self.arena.push(PathNode {
            pos: from,
            dir: None,
            cost: 0,
            turns: 0,
            moves_left: unit.movement_allowance(),
            parent: None,
        });
        let si = idx(from);
        self.marks[si] = cur_gen;
        self.best[si] = start_key;

        let mut open: BinaryHeap<FrontierRef> = BinaryHeap::new();
        open.push(FrontierRef {
            id: start,
            key: start_key,
        });

        let cap = max_expansions.unwrap_or_else(|| len.saturating_mul(8).max(64));
        let mut expansions = 0usize;
        let mut found: Option<NodeId> = None;
        // Closest approach to a tile target, for best-effort results.
        let mut closest: Option<(i32, NodeId)> = None;

        while let Some(cur) = open.pop() {
            let node = *self.arena.get(cur.id);
            let ci = idx(node.pos);

            // Skip stale entries superseded by a cheaper arrival.
            if self.marks[ci] == cur_gen && cur.key > self.best[ci] {
                continue;
            }

            if let Some(limit) = max_turns {
                if node.turns > limit {
                    // Keys are turns-major; everything still queued is at
                    // least this far out.
                    trace!("turn ceiling {limit} reached at {}", node.pos);
                    break;
                }
            }

            if goal.check(ctx, unit, &self.arena, cur.id) && !goal.has_sub_goals() {
                found = Some(cur.id);
                break;
            }

            if let Some(t) = target_tile {
                let d = node.pos.king_distance(t);
                if closest.is_none_or(|(best_d, _)| d < best_d) {
                    closest = Some((d, cur.id));
                }
            }

            expansions += 1;
            if expansions > cap {
                debug!("expansion cap {cap} hit searching from {from}");
                break;
            }

            for d in Direction::ALL {
                let Some(np) = ctx.map.neighbor(node.pos, d) else {
                    continue;
                };
                let mover = edge_mover(ctx, unit, carrier, np);

                let turns_before = decider.new_turns();
                let c = decider.cost(ctx, mover, node.pos, np, node.moves_left);
                if c == ILLEGAL_MOVE {
                    continue;
                }
                let turns = node.turns + (decider.new_turns() - turns_before);
                let moves_left = decider.moves_left();
                let key = search_key(turns, moves_left);

                let ni = idx(np);
                if self.marks[ni] == cur_gen && self.best[ni] <= key {
                    continue;
                }
                self.marks[ni] = cur_gen;
                self.best[ni] = key;

                let id = self.arena.push(PathNode {
                    pos: np,
                    dir: Some(d),
                    cost: node.cost + c,
                    turns,
                    moves_left,
                    parent: Some(cur.id),
                });
                open.push(FrontierRef { id, key });
            }
        }

        let chosen = found
            // A sub-goal search keeps its best acceptance for the end.
            .or_else(|| goal.goal())
            // A ceiling cut us short: partial routes only on request.
            .or_else(|| {
                if best_effort {
                    closest.map(|(_, id)| id)
                } else {
                    None
                }
            });

        Ok(chosen.map(|id| self.arena.reconstruct(id)))
    }
}

/// The unit evaluated for one edge: the carrier stands in on water edges
/// the unit cannot enter by itself.
fn edge_mover<'q>(
    ctx: &SearchContext<'_>,
    unit: &'q Unit,
    carrier: Option<&'q Unit>,
    to: Point,
) -> &'q Unit {
    match carrier {
        Some(c)
            if c.is_naval() && !unit.is_naval() && !unit.can_embark() && !ctx.map.is_land(to) =>
        {
            c
        }
        _ => unit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{BaseCostDecider, CostDecider};
    use caravel_map::{PlayerId, Relations, Rules, SettlementKind, Terrain, TileMap};

    const ME: PlayerId = PlayerId(0);
    const THEM: PlayerId = PlayerId(1);

    struct World {
        map: TileMap,
        rules: Rules,
        relations: Relations,
    }

    impl World {
        fn plains(w: i32, h: i32) -> Self {
            Self {
                map: TileMap::new(w, h, Terrain::Plains),
                rules: Rules::default(),
                relations: Relations::new(),
            }
        }

        fn ctx(&self) -> SearchContext<'_> {
            SearchContext::new(&self.map, &self.rules, &self.relations)
        }
    }

    #[test]
    fn one_step_diagonal_on_plains() {
        // 10×15 all-plains, allowance 4, (1,1) to the diagonal neighbor.
        let w = World::plains(10, 15);
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(1, 1), Point::new(2, 2)),
            )
            .unwrap()
            .unwrap();
        let plains = Terrain::Plains.base_move_cost();
        assert_eq!(path.moves(), 1);
        assert_eq!(path.total_cost(), plains);
        assert_eq!(path.last().moves_left, 4 - plains);
        assert_eq!(path.last().turns, 0);
        assert_eq!(path.last().dir, Some(Direction::SE));
    }

    #[test]
    fn origin_equal_to_target() {
        let w = World::plains(5, 5);
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let p = Point::new(2, 2);
        let path = pf
            .find_path(&w.ctx(), PathQuery::to_tile(&unit, p, p))
            .unwrap()
            .unwrap();
        assert_eq!(path.moves(), 0);
        assert_eq!(path.total_cost(), 0);
    }

    #[test]
    fn off_map_origin_is_an_error() {
        let w = World::plains(5, 5);
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let err = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(-1, 2), Point::new(2, 2)),
            )
            .unwrap_err();
        assert!(matches!(err, QueryError::OriginOffMap { .. }));
    }

    #[test]
    fn unreachable_goal_is_none_not_error() {
        let mut w = World::plains(9, 5);
        // A water channel splits the map.
        for y in 0..5 {
            w.map.set_terrain(Point::new(4, y), Terrain::Ocean);
        }
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let r = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(1, 2), Point::new(7, 2)),
            )
            .unwrap();
        assert!(r.is_none());
    }

    #[test]
    fn carrier_ferries_across_the_channel() {
        let mut w = World::plains(9, 5);
        for y in 0..5 {
            w.map.set_terrain(Point::new(4, y), Terrain::Ocean);
        }
        let unit = Unit::land(ME, 4);
        let ship = Unit::naval(ME, 6);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(1, 2), Point::new(7, 2)).with_carrier(&ship),
            )
            .unwrap()
            .expect("carrier should open the water edges");
        assert_eq!(path.last().pos, Point::new(7, 2));
        assert!(path.steps().iter().any(|s| !w.map.is_land(s.pos)));
    }

    #[test]
    fn goal_search_with_carrier_reaches_island_colony() {
        let mut w = World::plains(9, 5);
        for y in 0..5 {
            w.map.set_terrain(Point::new(4, y), Terrain::Ocean);
        }
        w.map
            .add_settlement(Point::new(7, 2), SettlementKind::Colony, ME, "haven");
        let unit = Unit::land(ME, 4);
        let ship = Unit::naval(ME, 6);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_goal(
                    &unit,
                    Point::new(1, 2),
                    GoalDecider::new(GoalExpr::OwnColony),
                )
                .with_carrier(&ship),
            )
            .unwrap()
            .unwrap();
        assert_eq!(path.last().pos, Point::new(7, 2));
        assert!(path.steps().iter().any(|s| !w.map.is_land(s.pos)));
    }

    #[test]
    fn road_detour_beats_rough_ground() {
        // Forest everywhere; a roaded corridor along the top edge.
        let mut w = World::plains(8, 5);
        for p in w.map.bounds() {
            w.map.set_terrain(p, Terrain::Forest);
        }
        for x in 0..7 {
            w.map.set_terrain(Point::new(x, 0), Terrain::Plains);
            w.map.add_road(Point::new(x, 0), Direction::E);
        }
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(0, 0), Point::new(7, 0)),
            )
            .unwrap()
            .unwrap();
        // Seven road steps at cost 1 each, inside two turns of allowance 4.
        assert_eq!(path.moves(), 7);
        assert_eq!(path.total_cost(), 7);
        assert!(path.total_turns() <= 1);
        assert!(path.steps().iter().all(|s| s.pos.y == 0));
    }

    #[test]
    fn replaying_a_path_reproduces_the_bookkeeping() {
        let mut w = World::plains(12, 6);
        w.map.set_terrain(Point::new(4, 2), Terrain::Forest);
        w.map.set_terrain(Point::new(5, 2), Terrain::Hills);
        w.map.set_terrain(Point::new(6, 3), Terrain::Marsh);
        w.map.add_road(Point::new(8, 2), Direction::E);
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(1, 2), Point::new(10, 2)),
            )
            .unwrap()
            .unwrap();

        let mut replay = BaseCostDecider::new();
        let mut left = unit.movement_allowance();
        for pair in path.steps().windows(2) {
            let c = replay.cost(&w.ctx(), &unit, pair[0].pos, pair[1].pos, left);
            assert_ne!(c, ILLEGAL_MOVE);
            left = replay.moves_left();
            assert_eq!(replay.moves_left(), pair[1].moves_left);
            assert_eq!(replay.new_turns(), pair[1].turns);
        }
        assert_eq!(replay.moves_left(), path.last().moves_left);
        assert_eq!(replay.new_turns(), path.last().turns);
    }

    #[test]
    fn avoid_settlements_routes_around_own_colony() {
        let mut w = World::plains(7, 3);
        // My colony sits on the straight line; open ground above and below.
        w.map
            .add_settlement(Point::new(3, 1), SettlementKind::Colony, ME, "mine");
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();

        let around = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(1, 1), Point::new(5, 1))
                    .with_policy(CostPolicy::AvoidSettlements),
            )
            .unwrap()
            .unwrap();
        assert!(around.steps().iter().all(|s| s.pos != Point::new(3, 1)));
        assert_eq!(around.last().pos, Point::new(5, 1));
    }

    #[test]
    fn avoid_settlements_refuses_a_forced_corridor() {
        // One-tile-high corridor: no way around the colony.
        let mut w = World::plains(7, 1);
        w.map
            .add_settlement(Point::new(3, 0), SettlementKind::Colony, ME, "mine");
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();

        // Standard rules pass straight through an own colony.
        let through = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(1, 0), Point::new(5, 0)),
            )
            .unwrap()
            .unwrap();
        assert!(through.steps().iter().any(|s| s.pos == Point::new(3, 0)));

        // Avoiding settlements leaves no route at all.
        let blocked = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(1, 0), Point::new(5, 0))
                    .with_policy(CostPolicy::AvoidSettlements),
            )
            .unwrap();
        assert!(blocked.is_none());
    }

    #[test]
    fn trade_policy_opens_foreign_settlement() {
        let mut w = World::plains(6, 3);
        let village = Point::new(4, 1);
        w.map
            .add_settlement(village, SettlementKind::NativeSettlement, THEM, "village");
        w.relations.add_contact(ME, THEM);
        let unit = Unit::land(ME, 4).with_cargo(2);
        let mut pf = PathFinder::new();

        let refused = pf
            .find_path(&w.ctx(), PathQuery::to_tile(&unit, Point::new(1, 1), village))
            .unwrap();
        // Standard rules only admit it as an explicit final destination,
        // which this unit does not have set.
        assert!(refused.is_none());

        let admitted = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_tile(&unit, Point::new(1, 1), village)
                    .with_policy(CostPolicy::AvoidIllegal),
            )
            .unwrap();
        assert!(admitted.is_some());
    }

    #[test]
    fn composed_goals_find_the_expected_nodes() {
        let mut w = World::plains(12, 8);
        let colony = Point::new(9, 6);
        let camp = Point::new(3, 2);
        w.map
            .add_settlement(colony, SettlementKind::Colony, ME, "mine");
        w.map
            .add_settlement(camp, SettlementKind::NativeSettlement, THEM, "camp");
        // The trade policy is what lets the search step onto the foreign
        // camp tile at all.
        w.relations.add_contact(ME, THEM);
        let unit = Unit::land(ME, 4).with_cargo(1);
        let from = Point::new(1, 1);

        // OR over {native settlement, colony}: the camp is closer.
        for children in [
            vec![GoalExpr::NativeSettlement, GoalExpr::AnyColony],
            vec![GoalExpr::AnyColony, GoalExpr::NativeSettlement],
        ] {
            let mut pf = PathFinder::new();
            let path = pf
                .find_path(
                    &w.ctx(),
                    PathQuery::to_goal(&unit, from, GoalDecider::new(GoalExpr::Any(children)))
                        .with_policy(CostPolicy::AvoidIllegal),
                )
                .unwrap()
                .unwrap();
            assert_eq!(path.last().pos, camp);
        }

        // AND over {owned by THEM, has settlement}: only the camp matches
        // even though the colony is also a settlement.
        for children in [
            vec![GoalExpr::OwnedBy(THEM), GoalExpr::AnySettlement],
            vec![GoalExpr::AnySettlement, GoalExpr::OwnedBy(THEM)],
        ] {
            let mut pf = PathFinder::new();
            let path = pf
                .find_path(
                    &w.ctx(),
                    PathQuery::to_goal(&unit, from, GoalDecider::new(GoalExpr::All(children)))
                        .with_policy(CostPolicy::AvoidIllegal),
                )
                .unwrap()
                .unwrap();
            assert_eq!(path.last().pos, camp);
        }
    }

    #[test]
    fn sub_goal_search_returns_nearest_colony() {
        let mut w = World::plains(14, 5);
        w.map
            .add_settlement(Point::new(12, 2), SettlementKind::Colony, ME, "far");
        w.map
            .add_settlement(Point::new(4, 2), SettlementKind::Colony, ME, "near");
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let path = pf
            .find_path(
                &w.ctx(),
                PathQuery::to_goal(
                    &unit,
                    Point::new(1, 2),
                    GoalDecider::new(GoalExpr::OwnColony).with_sub_goals(),
                ),
            )
            .unwrap()
            .unwrap();
        assert_eq!(path.last().pos, Point::new(4, 2));
    }

    #[test]
    fn turn_ceiling_yields_no_partial_path() {
        let w = World::plains(20, 3);
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let query = PathQuery::to_tile(&unit, Point::new(0, 1), Point::new(19, 1)).with_max_turns(1);
        assert!(pf.find_path(&w.ctx(), query).unwrap().is_none());
    }

    #[test]
    fn best_effort_returns_closest_approach() {
        let w = World::plains(20, 3);
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let query = PathQuery::to_tile(&unit, Point::new(0, 1), Point::new(19, 1))
            .with_max_turns(1)
            .best_effort();
        let path = pf.find_path(&w.ctx(), query).unwrap().unwrap();
        // Partial: it moved toward the target but stopped within the ceiling.
        assert!(path.moves() > 0);
        assert!(path.last().pos.x < 19);
        assert!(path.last().turns <= 1);
    }

    #[test]
    fn repeated_runs_are_identical() {
        let mut w = World::plains(10, 10);
        w.map.set_terrain(Point::new(5, 5), Terrain::Hills);
        w.map.set_terrain(Point::new(4, 5), Terrain::Forest);
        let unit = Unit::land(ME, 4);
        fn query(u: &Unit) -> PathQuery<'_> {
            PathQuery::to_tile(u, Point::new(1, 1), Point::new(8, 8))
        }
        let mut pf = PathFinder::new();
        let a = pf.find_path(&w.ctx(), query(&unit)).unwrap().unwrap();
        let b = pf.find_path(&w.ctx(), query(&unit)).unwrap().unwrap();
        assert_eq!(a, b);

        let mut fresh = PathFinder::new();
        let c = fresh.find_path(&w.ctx(), query(&unit)).unwrap().unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn expansion_cap_terminates_the_search() {
        let w = World::plains(30, 30);
        let unit = Unit::land(ME, 4);
        let mut pf = PathFinder::new();
        let query = PathQuery::to_tile(&unit, Point::new(0, 0), Point::new(29, 29))
            .with_max_expansions(3);
        assert!(pf.find_path(&w.ctx(), query).unwrap().is_none());
    }
}
