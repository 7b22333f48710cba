use std::collections::BinaryHeap;

use super::state::{SearchOverlay, State};
use crate::model::Point;
use crate::routing::graph::RoutingGraph;

/// A* over the routing graph with reusable search buffers
#[derive(Debug, Default)]
pub struct PathSolver {
    overlay: SearchOverlay,
    heap: BinaryHeap<State>,
}

impl PathSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest path from `start` to `end` as a point sequence.
    ///
    /// Returns an empty sequence when either coordinate has no node. When the
    /// goal cannot be reached the sequence does not begin at `start`; callers
    /// compare both endpoints to detect that.
    pub fn solve(&mut self, graph: &RoutingGraph, start: Point, end: Point) -> Vec<Point> {
        let (Some(start_idx), Some(end_idx)) = (graph.node_index(start), graph.node_index(end))
        else {
            return Vec::new();
        };

        let overlay = &mut self.overlay;
        overlay.reset(graph.node_count());
        self.heap.clear();

        let heuristic = |point: Point| point.distance(end);

        overlay.local[start_idx.index()] = 0.0;
        overlay.global[start_idx.index()] = heuristic(start);
        self.heap.push(State {
            cost: overlay.global[start_idx.index()],
            node: start_idx,
        });

        while let Some(State { node, .. }) = self.heap.pop() {
            // Stale heap entries are skipped instead of removed eagerly
            if overlay.visited.contains(node.index()) {
                continue;
            }
            overlay.visited.insert(node.index());

            // Costs are final once a node is settled under a consistent heuristic
            if node == end_idx {
                break;
            }

            let local = overlay.local[node.index()];
            for (next, length) in graph.edges(node) {
                let next_node = graph.node(next);
                if next_node.obstacle || overlay.visited.contains(next.index()) {
                    continue;
                }

                let candidate = local + length;
                if candidate < overlay.local[next.index()] {
                    overlay.parent[next.index()] = Some(node);
                    overlay.local[next.index()] = candidate;
                    overlay.global[next.index()] = candidate + heuristic(next_node.point);
                    self.heap.push(State {
                        cost: overlay.global[next.index()],
                        node: next,
                    });
                }
            }
        }

        overlay.solution(graph, end_idx)
    }
}

/// One-off search with its own buffers, safe to run from several threads
/// against the same graph.
pub fn solve(graph: &RoutingGraph, start: Point, end: Point) -> Vec<Point> {
    PathSolver::new().solve(graph, start, end)
}
