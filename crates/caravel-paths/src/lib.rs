//! Turn-aware movement-cost and path-search engine.
//!
//! This crate decides whether a unit may cross a given map edge, at what
//! cost, and what the cheapest route between two points is, while tracking
//! multi-turn movement budgets within a single query:
//!
//! - **Cost deciders** ([`CostDecider`], [`CostPolicy`]): pluggable per-edge
//!   legality and cost, with per-search `moves_left` / `new_turns` counters.
//! - **Goal deciders** ([`GoalDecider`], [`GoalExpr`]): pluggable node
//!   acceptance, composable with AND/OR semantics.
//! - **The search** ([`PathFinder::find_path`]): a best-first loop over a
//!   flat node arena, keyed so cross-turn cost comparisons stay consistent.
//!
//! Decider instances carry per-search mutable state and must be fresh for
//! every query; [`PathQuery`] is consumed by [`PathFinder::find_path`] and
//! [`CostPolicy`] builds a fresh decider inside the call, so the discipline
//! holds without caller care. A `PathFinder` may be reused serially;
//! concurrent queries each need their own.

mod context;
mod cost;
mod error;
mod goal;
mod node;
mod search;

pub use context::SearchContext;
pub use cost::{
    AvoidIllegal, AvoidSettlements, BaseCostDecider, CostDecider, CostPolicy, ILLEGAL_MOVE,
    edge_cost,
};
pub use error::QueryError;
pub use goal::{GoalDecider, GoalExpr};
pub use node::{NodeArena, NodeId, Path, PathNode, PathStep};
pub use search::{PathFinder, PathQuery, Target};
