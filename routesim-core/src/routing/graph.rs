//! Navigable point graph built from street polylines
//!
//! Every street segment is split by a synthetic midpoint node. Blocking a
//! street marks its midpoints as obstacles, which cuts the street without
//! touching the junction nodes other streets pass through.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use log::{debug, info};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::model::{Point, PointRegistry, Street};

/// Graph vertex
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub point: Point,
    /// Obstacles are never entered by a search
    pub obstacle: bool,
    /// Inserted by the builder rather than authored
    pub synthetic: bool,
}

/// Node arena with a coordinate index. Edge weights are Euclidean lengths.
#[derive(Debug, Clone, Default)]
pub struct RoutingGraph {
    pub(crate) graph: DiGraph<GraphNode, f64>,
    index: HashMap<Point, NodeIndex>,
}

impl RoutingGraph {
    /// Builds the graph from the known points and the street polylines.
    ///
    /// Synthetic points left over from an earlier build are dropped first, so
    /// rebuilding from the same input yields the same graph. New midpoints are
    /// appended to `points` and recorded on the street that created them.
    pub fn build(points: &mut PointRegistry, streets: &mut BTreeMap<String, Street>) -> Self {
        points.clear_synthetic();

        let mut graph = Self::default();
        for point in points.iter() {
            graph.ensure_node(point, false);
        }

        for street in streets.values_mut() {
            street.synthetic.clear();
            for segment in street.segments.clone() {
                graph.link_through_midpoint(segment.from, segment.to, street, points);
                graph.link_through_midpoint(segment.to, segment.from, street, points);
            }
            debug!(
                "Street '{}' owns {} midpoint nodes",
                street.name,
                street.synthetic.len()
            );
        }

        let synthetic = graph
            .graph
            .node_weights()
            .filter(|node| node.synthetic)
            .count();
        info!(
            "Built routing graph with {} nodes ({synthetic} synthetic) and {} edges",
            graph.node_count(),
            graph.graph.edge_count()
        );

        graph
    }

    /// Connects `endpoint` to the midpoint of (`endpoint`, `other`),
    /// creating the midpoint node when no node sits at that coordinate yet.
    fn link_through_midpoint(
        &mut self,
        endpoint: Point,
        other: Point,
        street: &mut Street,
        points: &mut PointRegistry,
    ) {
        let endpoint_idx = self.ensure_node(endpoint, false);
        let other_idx = self.ensure_node(other, false);

        let mid = endpoint.midpoint(other);
        if mid == endpoint || mid == other {
            // Adjacent grid points have no room for a midpoint
            self.connect(endpoint_idx, other_idx);
            self.connect(other_idx, endpoint_idx);
            return;
        }

        let mid_idx = match self.index.get(&mid) {
            Some(&idx) => idx,
            None => {
                let idx = self.ensure_node(mid, true);
                self.connect(idx, endpoint_idx);
                self.connect(idx, other_idx);
                points.insert_synthetic(mid);
                if !street.synthetic.contains(&mid) {
                    street.synthetic.push(mid);
                }
                idx
            }
        };

        self.connect(endpoint_idx, mid_idx);
        self.connect(mid_idx, endpoint_idx);
    }

    fn ensure_node(&mut self, point: Point, synthetic: bool) -> NodeIndex {
        if let Some(&idx) = self.index.get(&point) {
            return idx;
        }
        let idx = self.graph.add_node(GraphNode {
            point,
            obstacle: false,
            synthetic,
        });
        self.index.insert(point, idx);
        idx
    }

    fn connect(&mut self, from: NodeIndex, to: NodeIndex) {
        if from == to || self.graph.find_edge(from, to).is_some() {
            return;
        }
        let weight = self.graph[from].point.distance(self.graph[to].point);
        self.graph.add_edge(from, to, weight);
    }

    /// Marks or clears the node at `point` as an obstacle.
    /// Returns false if there is no node at that coordinate.
    pub fn set_obstacle(&mut self, point: Point, obstacle: bool) -> bool {
        match self.index.get(&point) {
            Some(&idx) => {
                self.graph[idx].obstacle = obstacle;
                true
            }
            None => false,
        }
    }

    /// Clears every obstacle flag
    pub fn reset_obstacles(&mut self) {
        for node in self.graph.node_weights_mut() {
            node.obstacle = false;
        }
    }

    pub fn node_index(&self, point: Point) -> Option<NodeIndex> {
        self.index.get(&point).copied()
    }

    pub fn node(&self, idx: NodeIndex) -> &GraphNode {
        &self.graph[idx]
    }

    pub fn contains(&self, point: Point) -> bool {
        self.index.contains_key(&point)
    }

    pub fn is_obstacle(&self, point: Point) -> Option<bool> {
        self.node_index(point).map(|idx| self.graph[idx].obstacle)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Points reachable in one hop from `point`
    pub fn neighbours(&self, point: Point) -> Vec<Point> {
        self.node_index(point)
            .map(|idx| {
                self.graph
                    .neighbors(idx)
                    .map(|next| self.graph[next].point)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Outgoing hops of a node with their lengths
    pub(crate) fn edges(&self, idx: NodeIndex) -> impl Iterator<Item = (NodeIndex, f64)> + '_ {
        self.graph
            .edges(idx)
            .map(|edge| (edge.target(), *edge.weight()))
    }

    /// Sorted out-degrees, handy for comparing two builds
    pub fn degree_distribution(&self) -> Vec<usize> {
        let mut degrees: Vec<usize> = self
            .graph
            .node_indices()
            .map(|idx| self.graph.neighbors(idx).count())
            .collect();
        degrees.sort_unstable();
        degrees
    }
}
