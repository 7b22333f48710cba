use std::cmp::Ordering;

use fixedbitset::FixedBitSet;
use petgraph::graph::NodeIndex;

use crate::model::Point;
use crate::routing::graph::RoutingGraph;

#[derive(Copy, Clone, Debug)]
pub(super) struct State {
    /// Estimated total cost through this node
    pub(super) cost: f64,
    pub(super) node: NodeIndex,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

// Implement Ord for State to use in BinaryHeap
impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap by cost (reversed from standard Rust BinaryHeap)
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-search bookkeeping kept outside the graph, so searches never
/// observe each other's costs.
#[derive(Debug, Default)]
pub(crate) struct SearchOverlay {
    pub(super) visited: FixedBitSet,
    pub(super) parent: Vec<Option<NodeIndex>>,
    /// Cost of the best known path from the start
    pub(super) local: Vec<f64>,
    /// `local` plus the heuristic to the goal
    pub(super) global: Vec<f64>,
}

impl SearchOverlay {
    pub(super) fn reset(&mut self, node_count: usize) {
        self.visited.clear();
        self.visited.grow(node_count);

        self.parent.clear();
        self.parent.resize(node_count, None);

        self.local.clear();
        self.local.resize(node_count, f64::INFINITY);

        self.global.clear();
        self.global.resize(node_count, f64::INFINITY);
    }

    /// Walks parents back from `end` until a node without a parent.
    /// For an unreachable goal this is just `[end]`.
    pub(super) fn solution(&self, graph: &RoutingGraph, end: NodeIndex) -> Vec<Point> {
        let mut points = vec![graph.node(end).point];
        let mut current = end;
        while let Some(previous) = self.parent[current.index()] {
            points.push(graph.node(previous).point);
            current = previous;
        }
        points.reverse();
        points
    }
}
