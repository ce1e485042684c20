//! Per-edge movement legality and cost.
//!
//! A [`CostDecider`] answers one question, many times per query: may this
//! mover cross this edge, and for how many movement points? Illegality is a
//! value ([`ILLEGAL_MOVE`]), never an error, so the search's inner loop is
//! free of exceptional control flow.
//!
//! Deciders are stateful: each successful call folds the edge into the
//! instance's running `moves_left` / `new_turns` counters, so walking a path
//! tile by tile through one fresh instance yields the turn bookkeeping for
//! the whole walk. One instance serves exactly one query; [`CostPolicy`]
//! builds them fresh.

use caravel_core::{Direction, Point};
use caravel_map::Unit;
use log::trace;

use crate::context::SearchContext;

/// Sentinel cost for a forbidden edge traversal.
pub const ILLEGAL_MOVE: i32 = i32::MAX;

/// Pluggable per-edge legality and cost, with per-search turn accounting.
pub trait CostDecider {
    /// Cost of moving `mover` from `from` to the adjacent `to` with
    /// `moves_left` points remaining this turn, or [`ILLEGAL_MOVE`].
    ///
    /// On success the decider's running counters are updated; read them via
    /// [`CostDecider::moves_left`] and [`CostDecider::new_turns`].
    fn cost(
        &mut self,
        ctx: &SearchContext<'_>,
        mover: &Unit,
        from: Point,
        to: Point,
        moves_left: i32,
    ) -> i32;

    /// Movement points remaining after the last successful call.
    fn moves_left(&self) -> i32;

    /// Turns consumed so far by this decider's successful calls.
    fn new_turns(&self) -> i32;
}

// ---------------------------------------------------------------------------
// Shared evaluation
// ---------------------------------------------------------------------------

/// How settlement tiles gate entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SettlementRule {
    /// Foreign settlements are impassable; the mover's own are open.
    Foreign,
    /// Every settlement is impassable, friend or foe.
    All,
    /// Foreign settlements open up for benign trade visits.
    Trade,
}

/// Legality and raw (budget-independent) cost of one edge.
fn evaluate(
    ctx: &SearchContext<'_>,
    mover: &Unit,
    from: Point,
    to: Point,
    rule: SettlementRule,
) -> i32 {
    if mover.movement_allowance() <= 0 {
        return ILLEGAL_MOVE;
    }
    let Some(d) = Direction::between(from, to) else {
        return ILLEGAL_MOVE;
    };
    if !ctx.map.contains(to) {
        return ILLEGAL_MOVE;
    }

    // Terrain / unit compatibility.
    let land = ctx.map.is_land(to);
    let settlement = ctx.map.settlement_at(to);
    if mover.is_naval() {
        if land && settlement.is_none() {
            return ILLEGAL_MOVE;
        }
    } else if !land && !mover.can_embark() {
        return ILLEGAL_MOVE;
    }

    // Settlement access. The mover's explicit final destination is always
    // enterable.
    if let Some(id) = settlement {
        if mover.final_destination() != Some(to) && settlement_blocked(ctx, mover, id, rule) {
            return ILLEGAL_MOVE;
        }
    }

    let base = if ctx.map.edge_has_improvement(from, d) {
        1
    } else {
        ctx.map.base_move_cost(to)
    };
    // Never charge more than a full turn's allowance for a single edge.
    base.min(mover.movement_allowance())
}

fn settlement_blocked(
    ctx: &SearchContext<'_>,
    mover: &Unit,
    id: caravel_map::SettlementId,
    rule: SettlementRule,
) -> bool {
    if rule == SettlementRule::All {
        return true;
    }
    let Some(settlement) = ctx.map.settlement(id) else {
        // Dangling id on the tile; treat as blocked rather than guess.
        return true;
    };
    if settlement.owner == mover.owner() {
        return false;
    }
    if rule == SettlementRule::Foreign {
        return true;
    }
    // Trade rule: a benign visit needs prior contact, plus either goods to
    // trade or a ruleset that admits empty traders. An active war does not
    // by itself bar gift-giving.
    let contact = ctx.relations.has_contact(mover.owner(), settlement.owner);
    let trade = mover.cargo_count() > 0 || ctx.rules.empty_traders_allowed;
    if contact && trade && ctx.relations.at_war(mover.owner(), settlement.owner) {
        trace!("{} may enter {} despite the war", mover.owner(), settlement.name);
    }
    !(contact && trade)
}

/// Stateless single-edge probe: legality and base cost of one edge under the
/// default settlement rule, decoupled from any running turn budget.
pub fn edge_cost(ctx: &SearchContext<'_>, mover: &Unit, from: Point, to: Point) -> i32 {
    evaluate(ctx, mover, from, to, SettlementRule::Foreign)
}

// ---------------------------------------------------------------------------
// Turn budget
// ---------------------------------------------------------------------------

/// Running per-search movement budget.
#[derive(Copy, Clone, Debug, Default)]
struct Budget {
    moves_left: i32,
    new_turns: i32,
}

impl Budget {
    /// Fold one legal edge into the budget and return the points actually
    /// charged.
    ///
    /// With no points left the move waits for a fresh turn; with some points
    /// left but fewer than the cost, the mover spends its whole remainder to
    /// complete the move in one step.
    fn apply(&mut self, mover: &Unit, mut cost: i32, moves_left: i32) -> i32 {
        let mut left = moves_left.max(0);
        if cost > left {
            if left == 0 {
                self.new_turns += 1;
                left = mover.movement_allowance();
            } else {
                cost = left;
            }
        }
        self.moves_left = left - cost;
        cost
    }
}

// ---------------------------------------------------------------------------
// Decider variants
// ---------------------------------------------------------------------------

impl Budget {
    fn charge(
        &mut self,
        ctx: &SearchContext<'_>,
        mover: &Unit,
        from: Point,
        to: Point,
        moves_left: i32,
        rule: SettlementRule,
    ) -> i32 {
        let raw = evaluate(ctx, mover, from, to, rule);
        if raw == ILLEGAL_MOVE {
            return ILLEGAL_MOVE;
        }
        self.apply(mover, raw, moves_left)
    }
}

/// The default decider: standard terrain rules, foreign settlements closed,
/// the mover's own settlements open.
#[derive(Debug, Default)]
pub struct BaseCostDecider {
    budget: Budget,
}

impl BaseCostDecider {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CostDecider for BaseCostDecider {
    fn cost(
        &mut self,
        ctx: &SearchContext<'_>,
        mover: &Unit,
        from: Point,
        to: Point,
        moves_left: i32,
    ) -> i32 {
        self.budget
            .charge(ctx, mover, from, to, moves_left, SettlementRule::Foreign)
    }

    fn moves_left(&self) -> i32 {
        self.budget.moves_left
    }

    fn new_turns(&self) -> i32 {
        self.budget.new_turns
    }
}

/// Routes around settlements entirely: every settlement tile is impassable
/// unless it is the mover's explicit final destination.
#[derive(Debug, Default)]
pub struct AvoidSettlements {
    budget: Budget,
}

impl AvoidSettlements {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CostDecider for AvoidSettlements {
    fn cost(
        &mut self,
        ctx: &SearchContext<'_>,
        mover: &Unit,
        from: Point,
        to: Point,
        moves_left: i32,
    ) -> i32 {
        self.budget
            .charge(ctx, mover, from, to, moves_left, SettlementRule::All)
    }

    fn moves_left(&self) -> i32 {
        self.budget.moves_left
    }

    fn new_turns(&self) -> i32 {
        self.budget.new_turns
    }
}

/// Permits otherwise-blocked settlement entry when the visit is benign and
/// legal under current game rules: prior diplomatic contact, and cargo
/// aboard or an empty-traders-allowed ruleset.
#[derive(Debug, Default)]
pub struct AvoidIllegal {
    budget: Budget,
}

impl AvoidIllegal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CostDecider for AvoidIllegal {
    fn cost(
        &mut self,
        ctx: &SearchContext<'_>,
        mover: &Unit,
        from: Point,
        to: Point,
        moves_left: i32,
    ) -> i32 {
        self.budget
            .charge(ctx, mover, from, to, moves_left, SettlementRule::Trade)
    }

    fn moves_left(&self) -> i32 {
        self.budget.moves_left
    }

    fn new_turns(&self) -> i32 {
        self.budget.new_turns
    }
}

/// Which decider variant a query uses. Builds a fresh instance per query,
/// preserving the one-instance-per-search invariant.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CostPolicy {
    #[default]
    Standard,
    AvoidSettlements,
    AvoidIllegal,
}

impl CostPolicy {
    /// A fresh decider for one query.
    pub fn decider(self) -> Box<dyn CostDecider> {
        match self {
            CostPolicy::Standard => Box::new(BaseCostDecider::new()),
            CostPolicy::AvoidSettlements => Box::new(AvoidSettlements::new()),
            CostPolicy::AvoidIllegal => Box::new(AvoidIllegal::new()),
        }
    }
}
