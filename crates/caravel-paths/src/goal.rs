//! Goal acceptance: when should the search stop, and where?

use caravel_core::Point;
use caravel_map::{PlayerId, SettlementKind, Unit};

use crate::context::SearchContext;
use crate::node::{NodeArena, NodeId, search_key};

/// A goal predicate tree: leaf tests composed with AND/OR.
///
/// Composition is evaluated recursively against a single candidate node, so
/// an [`GoalExpr::All`] node only ever accepts when every child accepts the
/// *same* tile, and an [`GoalExpr::Any`] node surfaces that tile as soon as
/// one child accepts it. There is no way to mix different children's
/// candidates into an incoherent composed goal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GoalExpr {
    /// Exactly this tile.
    AtTile(Point),
    /// Any settlement, whoever owns it.
    AnySettlement,
    /// Any colony.
    AnyColony,
    /// A colony belonging to the searching unit's owner.
    OwnColony,
    /// A colony belonging to the given player.
    ColonyOf(PlayerId),
    /// Any native settlement.
    NativeSettlement,
    /// A tile owned by the given player.
    OwnedBy(PlayerId),
    /// Every child accepts.
    All(Vec<GoalExpr>),
    /// At least one child accepts.
    Any(Vec<GoalExpr>),
}

impl GoalExpr {
    /// Whether the tile at `pos` satisfies this predicate for `unit`.
    pub fn accepts(&self, ctx: &SearchContext<'_>, unit: &Unit, pos: Point) -> bool {
        match self {
            GoalExpr::AtTile(p) => pos == *p,
            GoalExpr::AnySettlement => ctx.map.settlement_at(pos).is_some(),
            GoalExpr::AnyColony => self.settlement_kind(ctx, pos) == Some(SettlementKind::Colony),
            GoalExpr::OwnColony => {
                self.settlement_kind(ctx, pos) == Some(SettlementKind::Colony)
                    && self.settlement_owner(ctx, pos) == Some(unit.owner())
            }
            GoalExpr::ColonyOf(player) => {
                self.settlement_kind(ctx, pos) == Some(SettlementKind::Colony)
                    && self.settlement_owner(ctx, pos) == Some(*player)
            }
            GoalExpr::NativeSettlement => {
                self.settlement_kind(ctx, pos) == Some(SettlementKind::NativeSettlement)
            }
            GoalExpr::OwnedBy(player) => ctx.map.owner_at(pos) == Some(*player),
            GoalExpr::All(children) => children.iter().all(|c| c.accepts(ctx, unit, pos)),
            GoalExpr::Any(children) => children.iter().any(|c| c.accepts(ctx, unit, pos)),
        }
    }

    fn settlement_kind(&self, ctx: &SearchContext<'_>, pos: Point) -> Option<SettlementKind> {
        let id = ctx.map.settlement_at(pos)?;
        ctx.map.settlement(id).map(|s| s.kind)
    }

    fn settlement_owner(&self, ctx: &SearchContext<'_>, pos: Point) -> Option<PlayerId> {
        let id = ctx.map.settlement_at(pos)?;
        ctx.map.settlement(id).map(|s| s.owner)
    }
}

/// Decides whether a visited node is an acceptable destination, and keeps
/// the best acceptance seen so far.
///
/// Carries per-search state; use a fresh instance per query.
#[derive(Clone, Debug)]
pub struct GoalDecider {
    expr: GoalExpr,
    sub_goals: bool,
    goal: Option<NodeId>,
    goal_key: i64,
}

impl GoalDecider {
    pub fn new(expr: GoalExpr) -> Self {
        Self {
            expr,
            sub_goals: false,
            goal: None,
            goal_key: i64::MAX,
        }
    }

    /// Mark this search as having sub-goals: continued search after an
    /// initial acceptance may still find a better candidate, so the engine
    /// must not stop at the first hit.
    pub fn with_sub_goals(mut self) -> Self {
        self.sub_goals = true;
        self
    }

    /// Evaluate the candidate node. On acceptance the candidate is recorded
    /// as the goal if it beats (or first sets) the best one seen.
    pub fn check(
        &mut self,
        ctx: &SearchContext<'_>,
        unit: &Unit,
        arena: &NodeArena,
        id: NodeId,
    ) -> bool {
        let node = arena.get(id);
        if !self.expr.accepts(ctx, unit, node.pos) {
            return false;
        }
        let key = search_key(node.turns, node.moves_left);
        if key < self.goal_key {
            self.goal = Some(id);
            self.goal_key = key;
        }
        true
    }

    /// The best accepted goal node so far, if any.
    pub fn goal(&self) -> Option<NodeId> {
        self.goal
    }

    /// Whether the engine should keep searching after an acceptance.
    pub fn has_sub_goals(&self) -> bool {
        self.sub_goals
    }
}
