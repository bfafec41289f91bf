// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{Edge, NodeIndex, Point};

/// Graph model consumed by the [RoutePlanner](crate::RoutePlanner).
///
/// Nodes are identified by their [NodeIndex], which must remain stable
/// for the lifetime of the graph. The planner never mutates the graph -
/// all per-search state is kept on the planner side.
pub trait RouteGraph {
    /// Returns the number of nodes in the graph. Valid indices are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Finds the node closest to a position in the normalized map space.
    /// Returns `None` only if the graph has no nodes suitable for routing.
    fn find_closest_node(&self, x: f32, y: f32) -> Option<NodeIndex>;

    /// Discovers neighbors of the provided node.
    ///
    /// `is_visited` reports nodes already discovered by the ongoing search.
    /// Implementations may use it to pick different neighbors, but are not
    /// required to filter them out - the planner skips visited nodes anyway.
    fn find_neighbors(
        &self,
        node: NodeIndex,
        is_visited: &dyn Fn(NodeIndex) -> bool,
    ) -> Vec<NodeIndex>;

    /// Cost of moving from one node to another.
    fn distance(&self, from: NodeIndex, to: NodeIndex) -> f32;

    /// Estimated cost of moving from one node to another. Must never overestimate
    /// the actual cost of the cheapest path, otherwise the route found
    /// might not be the shortest one.
    fn heuristic(&self, from: NodeIndex, to: NodeIndex) -> f32 {
        self.distance(from, to)
    }

    /// Multiplier converting [distances](RouteGraph::distance) into real-world units
    /// (usually meters).
    fn metric_scale(&self) -> f32;
}

/// Represents an explicit weighted, directed graph as a set of [Points](Point)
/// and [Edges](Edge) between them.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyGraph {
    nodes: Vec<(Point, Vec<Edge>)>,
    metric_scale: f32,
}

impl Default for AdjacencyGraph {
    fn default() -> Self {
        Self {
            nodes: Vec::default(),
            metric_scale: 1.0,
        }
    }
}

impl AdjacencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph whose distances are multiplied by `metric_scale`
    /// to get real-world units.
    pub fn with_metric_scale(metric_scale: f32) -> Self {
        Self {
            nodes: Vec::default(),
            metric_scale,
        }
    }

    /// Returns the number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns an iterator over all [Points](Point) in the graph, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &Point> {
        self.nodes.iter().map(|(pt, _)| pt)
    }

    /// Retrieves the position of a node with the provided index.
    pub fn get_node(&self, idx: NodeIndex) -> Option<Point> {
        self.nodes.get(idx).map(|&(pt, _)| pt)
    }

    /// Appends a new node to the graph and returns its index.
    pub fn add_node(&mut self, pt: Point) -> NodeIndex {
        self.nodes.push((pt, Vec::default()));
        self.nodes.len() - 1
    }

    /// Gets all outgoing [Edges](Edge) from a node with a given index.
    pub fn get_edges(&self, from: NodeIndex) -> &[Edge] {
        self.nodes
            .get(from)
            .map(|(_, e)| e.as_slice())
            .unwrap_or_default()
    }

    /// Gets the cost of an [Edge] from one node to another.
    /// If such an edge doesn't exist, returns [f32::INFINITY].
    pub fn get_edge(&self, from: NodeIndex, to: NodeIndex) -> f32 {
        self.get_edges(from)
            .iter()
            .find_map(|edge| if edge.to == to { Some(edge.cost) } else { None })
            .unwrap_or(f32::INFINITY)
    }

    /// Creates or updates an [Edge] from a node with a given index.
    pub fn set_edge(&mut self, from: NodeIndex, edge: Edge) {
        if let Some((_, edges)) = self.nodes.get_mut(from) {
            if let Some(candidate) = edges.iter_mut().find(|e| e.to == edge.to) {
                *candidate = edge;
            } else {
                edges.push(edge);
            }
        }
    }

    /// Creates or updates edges in both directions between two nodes.
    pub fn set_bidirectional_edge(&mut self, a: NodeIndex, b: NodeIndex, cost: f32) {
        self.set_edge(a, Edge { to: b, cost });
        self.set_edge(b, Edge { to: a, cost });
    }

    /// Removes an edge from one node to another.
    pub fn delete_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if let Some((_, edges)) = self.nodes.get_mut(from) {
            if let Some(idx) = edges.iter().position(|edge| edge.to == to) {
                edges.swap_remove(idx);
            }
        }
    }

    fn straight_line(&self, from: NodeIndex, to: NodeIndex) -> f32 {
        match (self.get_node(from), self.get_node(to)) {
            (Some(a), Some(b)) => a.distance(&b),
            _ => f32::INFINITY,
        }
    }
}

impl RouteGraph for AdjacencyGraph {
    fn node_count(&self) -> usize {
        self.len()
    }

    /// Finds the closest node to the given position.
    ///
    /// This function requires computing the distance to every node in the graph,
    /// and is not suitable for large graphs.
    fn find_closest_node(&self, x: f32, y: f32) -> Option<NodeIndex> {
        let target = Point::new(x, y);
        self.iter()
            .enumerate()
            .map(|(idx, pt)| (pt.distance(&target), idx))
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.total_cmp(b_dist))
            .map(|(_, idx)| idx)
    }

    fn find_neighbors(
        &self,
        node: NodeIndex,
        is_visited: &dyn Fn(NodeIndex) -> bool,
    ) -> Vec<NodeIndex> {
        self.get_edges(node)
            .iter()
            .map(|edge| edge.to)
            .filter(|&to| to < self.nodes.len() && !is_visited(to))
            .collect()
    }

    /// Returns the cost of the edge between two nodes, falling back to
    /// the straight-line distance if the nodes aren't directly connected.
    fn distance(&self, from: NodeIndex, to: NodeIndex) -> f32 {
        let cost = self.get_edge(from, to);
        if cost.is_finite() {
            cost
        } else {
            self.straight_line(from, to)
        }
    }

    fn heuristic(&self, from: NodeIndex, to: NodeIndex) -> f32 {
        self.straight_line(from, to)
    }

    fn metric_scale(&self) -> f32 {
        self.metric_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> AdjacencyGraph {
        let mut g = AdjacencyGraph::with_metric_scale(10.0);
        let a = g.add_node(Point::new(0.0, 0.0));
        let b = g.add_node(Point::new(3.0, 0.0));
        let c = g.add_node(Point::new(3.0, 4.0));
        g.set_bidirectional_edge(a, b, 3.0);
        g.set_edge(b, Edge { to: c, cost: 4.5 });
        g.set_edge(c, Edge { to: 7, cost: 1.0 }); // dangling
        g
    }

    #[test]
    fn edges() {
        let mut g = triangle();
        assert_eq!(g.len(), 3);
        assert_eq!(g.get_edge(0, 1), 3.0);
        assert_eq!(g.get_edge(1, 0), 3.0);
        assert_eq!(g.get_edge(1, 2), 4.5);
        assert!(g.get_edge(2, 1).is_infinite());
        assert!(g.get_edge(42, 1).is_infinite());

        g.set_edge(1, Edge { to: 2, cost: 5.0 });
        assert_eq!(g.get_edge(1, 2), 5.0);
        assert_eq!(g.get_edges(1).len(), 2);

        g.delete_edge(1, 2);
        assert!(g.get_edge(1, 2).is_infinite());
        assert_eq!(g.get_edges(1).len(), 1);
    }

    #[test]
    fn distance_and_heuristic() {
        let g = triangle();
        assert_eq!(g.distance(1, 2), 4.5);
        assert_eq!(g.heuristic(1, 2), 4.0);
        assert_eq!(g.distance(0, 2), 5.0); // no edge - straight line
        assert_eq!(g.metric_scale(), 10.0);
    }

    #[test]
    fn find_neighbors_skips_visited_and_dangling() {
        let g = triangle();
        assert_eq!(g.find_neighbors(1, &|_| false), vec![0, 2]);
        assert_eq!(g.find_neighbors(1, &|i| i == 0), vec![2]);
        assert_eq!(g.find_neighbors(2, &|_| false), Vec::<NodeIndex>::new());
    }

    #[test]
    fn find_closest_node() {
        let g = triangle();
        assert_eq!(g.find_closest_node(0.1, 0.2), Some(0));
        assert_eq!(g.find_closest_node(2.5, 0.5), Some(1));
        assert_eq!(g.find_closest_node(3.0, 10.0), Some(2));
        assert_eq!(AdjacencyGraph::new().find_closest_node(0.0, 0.0), None);
    }
}
