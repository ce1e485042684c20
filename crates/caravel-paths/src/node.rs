//! Search nodes, the flat node arena, and reconstructed paths.

use caravel_core::{Direction, Point};

/// Frontier ordering key: turns-major, with movement spent inside the turn
/// as the tiebreak (more moves left ranks earlier). The key is monotone
/// non-decreasing along any legal edge, so comparisons stay consistent
/// across turn boundaries.
pub(crate) fn search_key(turns: i32, moves_left: i32) -> i64 {
    ((turns as i64) << 32) - moves_left as i64
}

/// Index of a [`PathNode`] in a [`NodeArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

/// One step of search state: where the search is, what it has spent getting
/// there, and which node it came from.
///
/// Nodes are immutable once pushed into the arena. Predecessor links are
/// arena indices, so the chain from any node back to the origin is acyclic
/// by construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    /// Tile this node stands on.
    pub pos: Point,
    /// Direction taken to arrive here; `None` for the origin.
    pub dir: Option<Direction>,
    /// Cumulative movement cost from the origin.
    pub cost: i32,
    /// Whole turns consumed getting here beyond the current one.
    pub turns: i32,
    /// Movement points left on arrival.
    pub moves_left: i32,
    /// Predecessor node, `None` for the origin.
    pub parent: Option<NodeId>,
}

/// Flat arena of [`PathNode`]s for one search.
///
/// Cleared and refilled per query; reconstruction walks parent indices.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<PathNode>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Append a node, returning its id.
    pub fn push(&mut self, node: PathNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// The node with the given id.
    ///
    /// Ids are only ever minted by [`NodeArena::push`] on this arena within
    /// the current query, so the index is always in bounds.
    #[inline]
    pub fn get(&self, id: NodeId) -> &PathNode {
        &self.nodes[id.0 as usize]
    }

    /// Follow predecessor links from `goal` back to the origin and return
    /// the forward-ordered path.
    pub fn reconstruct(&self, goal: NodeId) -> Path {
        let mut steps = Vec::new();
        let mut cur = Some(goal);
        while let Some(id) = cur {
            let n = self.get(id);
            steps.push(PathStep {
                pos: n.pos,
                dir: n.dir,
                cost: n.cost,
                turns: n.turns,
                moves_left: n.moves_left,
            });
            cur = n.parent;
        }
        steps.reverse();
        Path { steps }
    }
}

/// One tile of a reconstructed route, with the bookkeeping recorded when the
/// search arrived there.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathStep {
    pub pos: Point,
    /// Direction of travel into this tile; `None` for the origin step.
    pub dir: Option<Direction>,
    pub cost: i32,
    pub turns: i32,
    pub moves_left: i32,
}

/// A forward-ordered route, origin first.
///
/// Only [`NodeArena::reconstruct`] builds these, so a path always holds at
/// least its origin step.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    steps: Vec<PathStep>,
}

impl Path {
    /// The steps of the route, origin first.
    pub fn steps(&self) -> &[PathStep] {
        &self.steps
    }

    /// Number of moves in the path (steps excluding the origin).
    pub fn moves(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// The origin step.
    pub fn first(&self) -> &PathStep {
        &self.steps[0]
    }

    /// The final step.
    pub fn last(&self) -> &PathStep {
        &self.steps[self.steps.len() - 1]
    }

    /// Total movement cost of the route.
    pub fn total_cost(&self) -> i32 {
        self.last().cost
    }

    /// Whole turns consumed beyond the current one.
    pub fn total_turns(&self) -> i32 {
        self.last().turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_key_orders_by_turns_then_moves() {
        // Same turn: more moves left wins.
        assert!(search_key(0, 3) < search_key(0, 1));
        // Turns dominate regardless of moves left.
        assert!(search_key(0, 0) < search_key(1, 10));
        // Spending moves within a turn never decreases the key.
        assert!(search_key(2, 4) < search_key(2, 0));
    }

    fn node(x: i32, y: i32, cost: i32, parent: Option<NodeId>) -> PathNode {
        PathNode {
            pos: Point::new(x, y),
            dir: parent.map(|_| Direction::E),
            cost,
            turns: 0,
            moves_left: 3,
            parent,
        }
    }

    #[test]
    fn arena_push_get() {
        let mut arena = NodeArena::new();
        let a = arena.push(node(0, 0, 0, None));
        let b = arena.push(node(1, 0, 3, Some(a)));
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(b).parent, Some(a));
        assert_eq!(arena.get(a).pos, Point::new(0, 0));
    }

    #[test]
    fn reconstruct_is_forward_ordered() {
        let mut arena = NodeArena::new();
        let a = arena.push(node(0, 0, 0, None));
        let b = arena.push(node(1, 0, 3, Some(a)));
        let c = arena.push(node(2, 0, 6, Some(b)));
        let path = arena.reconstruct(c);
        assert_eq!(path.moves(), 2);
        assert_eq!(path.first().pos, Point::new(0, 0));
        assert_eq!(path.first().dir, None);
        assert_eq!(path.last().pos, Point::new(2, 0));
        assert_eq!(path.total_cost(), 6);
    }

    #[test]
    fn single_node_path() {
        let mut arena = NodeArena::new();
        let a = arena.push(node(4, 4, 0, None));
        let path = arena.reconstruct(a);
        assert_eq!(path.moves(), 0);
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn reconstructed_path_always_holds_its_origin() {
        let mut arena = NodeArena::new();
        let a = arena.push(node(0, 0, 0, None));
        let b = arena.push(node(1, 0, 3, Some(a)));
        for id in [a, b] {
            let path = arena.reconstruct(id);
            assert!(!path.steps().is_empty());
            assert_eq!(path.steps()[0].pos, Point::new(0, 0));
            assert_eq!(path.first(), &path.steps()[0]);
            assert_eq!(path.last(), path.steps().last().unwrap());
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_round_trip() {
        let path = Path {
            steps: vec![
                PathStep {
                    pos: Point::new(1, 1),
                    dir: None,
                    cost: 0,
                    turns: 0,
                    moves_left: 4,
                },
                PathStep {
                    pos: Point::new(2, 2),
                    dir: Some(Direction::SE),
                    cost: 3,
                    turns: 0,
                    moves_left: 1,
                },
            ],
        };
        let json = serde_json::to_string(&path).unwrap();
        let back: Path = serde_json::from_str(&json).unwrap();
        assert_eq!(path, back);
    }
}
