// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::open_list::{OpenList, QueueItem};
use crate::{AStarError, NodeIndex, RouteGraph, SearchOptions};

/// Converts a coordinate given in percent of the map extent (0-100)
/// into a fraction of the map extent (0-1).
pub fn percent_to_fraction(percent: f32) -> f32 {
    percent * 0.01
}

/// Result of a successful [RoutePlanner] search.
///
/// A route with no nodes signifies that no path exists between the endpoints.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Route {
    /// Nodes of the route, starting with the start node and ending with the end node.
    pub nodes: Vec<NodeIndex>,

    /// Length of the route, as a sum of [RouteGraph::distance] between consecutive nodes.
    pub raw_distance: f32,

    /// Length of the route in real-world units: `raw_distance * metric_scale`.
    pub distance: f32,
}

impl Route {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Phase of a [RoutePlanner] search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// Search has not started yet.
    Idle,

    /// Open list is being processed.
    Running,

    /// End node was reached, and the [Route] is available.
    Succeeded,

    /// Open list was drained without reaching the end node - no route exists.
    Exhausted,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Exhausted)
    }
}

/// Per-search state of a node which has been placed on the open list.
/// Presence in [RoutePlanner::nodes] marks a node as visited.
#[derive(Debug, Clone, Copy)]
struct NodeState {
    cost: f32,
    estimate: f32,
    parent: Option<NodeIndex>,
    closed: bool,
}

/// Uses the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm)
/// to find a route between two nodes of a [RouteGraph].
///
/// A planner answers exactly one query: create it with [RoutePlanner::new] or
/// [RoutePlanner::between] and consume it with [RoutePlanner::run]
/// (or drive it manually with [RoutePlanner::step]).
///
/// By default, a node's cost and parent are fixed when the node is first discovered,
/// and never revisited. Enable [SearchOptions::relax] to always get the shortest route.
pub struct RoutePlanner<'a, G: RouteGraph + ?Sized> {
    graph: &'a G,
    start: NodeIndex,
    end: NodeIndex,
    options: SearchOptions,
    state: SearchState,
    open_list: OpenList,
    nodes: HashMap<NodeIndex, NodeState>,
    steps: usize,
    route: Route,
}

impl<'a, G: RouteGraph + ?Sized> RoutePlanner<'a, G> {
    /// Creates a planner between the nodes closest to the provided positions,
    /// given in percent (0-100) of the map extent.
    pub fn new(
        graph: &'a G,
        start_x: f32,
        start_y: f32,
        end_x: f32,
        end_y: f32,
    ) -> Result<Self, AStarError> {
        let start = graph
            .find_closest_node(percent_to_fraction(start_x), percent_to_fraction(start_y))
            .ok_or(AStarError::EmptyGraph)?;
        let end = graph
            .find_closest_node(percent_to_fraction(end_x), percent_to_fraction(end_y))
            .ok_or(AStarError::EmptyGraph)?;
        Self::between(graph, start, end)
    }

    /// Creates a planner between two nodes with known indices.
    pub fn between(graph: &'a G, start: NodeIndex, end: NodeIndex) -> Result<Self, AStarError> {
        for idx in [start, end] {
            if idx >= graph.node_count() {
                return Err(AStarError::InvalidReference(idx));
            }
        }

        Ok(Self {
            graph,
            start,
            end,
            options: SearchOptions::default(),
            state: SearchState::Idle,
            open_list: OpenList::default(),
            nodes: HashMap::default(),
            steps: 0,
            route: Route::default(),
        })
    }

    pub fn with_options(mut self, options: SearchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn start_node(&self) -> NodeIndex {
        self.start
    }

    pub fn end_node(&self) -> NodeIndex {
        self.end
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// Returns the number of nodes expanded so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Returns true if the node has been placed on the open list during this search.
    pub fn is_visited(&self, idx: NodeIndex) -> bool {
        self.nodes.contains_key(&idx)
    }

    /// Returns the found route, available only in [SearchState::Succeeded].
    pub fn route(&self) -> Option<&Route> {
        if self.state == SearchState::Succeeded {
            Some(&self.route)
        } else {
            None
        }
    }

    /// Runs the search until completion.
    ///
    /// Returns an empty [Route] if there is no route between the two nodes.
    pub fn run(mut self) -> Result<Route, AStarError> {
        while !self.step()?.is_terminal() {}
        Ok(self.route)
    }

    /// Advances the search by a single iteration: initialization,
    /// or dequeuing (and possibly expanding) one node. Terminal states are kept.
    ///
    /// After [AStarError::StepLimitExceeded] the planner should be discarded.
    pub fn step(&mut self) -> Result<SearchState, AStarError> {
        match self.state {
            SearchState::Idle => self.initialize(),
            SearchState::Running => self.iterate()?,
            SearchState::Succeeded | SearchState::Exhausted => {}
        }
        Ok(self.state)
    }

    fn initialize(&mut self) {
        log::debug!("searching for a route from node {} to node {}", self.start, self.end);

        let estimate = self.graph.heuristic(self.start, self.end);
        self.nodes.insert(
            self.start,
            NodeState {
                cost: 0.0,
                estimate,
                parent: None,
                closed: false,
            },
        );
        self.open_list.push(self.start, 0.0, estimate);
        self.state = SearchState::Running;
    }

    fn iterate(&mut self) -> Result<(), AStarError> {
        if self.open_list.is_empty() {
            log::debug!(
                "no route from node {} to node {} ({} nodes expanded)",
                self.start,
                self.end,
                self.steps,
            );
            self.state = SearchState::Exhausted;
            return Ok(());
        }

        let item = self.open_list.select_next();

        // Only possible with relaxation - the node was re-queued with a lower cost
        if self.is_superseded(&item) {
            return Ok(());
        }

        // The goal is checked on dequeue, not on discovery
        if item.at == self.end {
            self.route = self.build_path(item.at);
            self.state = SearchState::Succeeded;
            log::debug!(
                "found route with {} nodes, {} long ({} nodes expanded)",
                self.route.nodes.len(),
                self.route.distance,
                self.steps,
            );
            return Ok(());
        }

        self.steps += 1;
        if self.steps > self.options.step_limit {
            return Err(AStarError::StepLimitExceeded);
        }

        self.expand(item.at);
        Ok(())
    }

    fn is_superseded(&self, item: &QueueItem) -> bool {
        match self.nodes.get(&item.at) {
            Some(s) => s.closed || item.cost > s.cost,
            None => true,
        }
    }

    fn expand(&mut self, current: NodeIndex) {
        let current_cost = match self.nodes.get_mut(&current) {
            Some(s) => {
                s.closed = true;
                s.cost
            }
            None => panic!("expanding node {} which was never visited", current),
        };

        let neighbors = {
            let nodes = &self.nodes;
            let relax = self.options.relax;
            let is_visited = |idx: NodeIndex| match nodes.get(&idx) {
                Some(s) => !relax || s.closed,
                None => false,
            };
            self.graph.find_neighbors(current, &is_visited)
        };

        log::trace!(
            "expanding node {} with {} neighbors ({} queued)",
            current,
            neighbors.len(),
            self.open_list.len(),
        );

        for neighbor in neighbors {
            let cost = current_cost + self.graph.distance(current, neighbor);

            match self.nodes.get_mut(&neighbor) {
                None => {
                    let estimate = self.graph.heuristic(neighbor, self.end);
                    self.nodes.insert(
                        neighbor,
                        NodeState {
                            cost,
                            estimate,
                            parent: Some(current),
                            closed: false,
                        },
                    );
                    self.open_list.push(neighbor, cost, cost + estimate);
                }

                Some(s) if self.options.relax && !s.closed && cost < s.cost => {
                    s.cost = cost;
                    s.parent = Some(current);
                    self.open_list.push(neighbor, cost, cost + s.estimate);
                }

                Some(_) => {}
            }
        }
    }

    /// Follows parents from `terminal` back to the start node.
    ///
    /// # Panics
    ///
    /// Panics if the parent chain is broken or doesn't reach the start node,
    /// which signifies a bug in the search.
    fn build_path(&self, terminal: NodeIndex) -> Route {
        let mut nodes = vec![terminal];
        let mut raw_distance: f32 = 0.0;
        let mut at = terminal;

        while at != self.start {
            let parent = match self.nodes.get(&at).and_then(|s| s.parent) {
                Some(parent) => parent,
                None => panic!("node {} has no parent, but is not the start node", at),
            };

            raw_distance += self.graph.distance(parent, at);
            nodes.push(parent);
            at = parent;

            assert!(
                nodes.len() <= self.nodes.len(),
                "parent chain of node {} does not reach the start node",
                terminal,
            );
        }

        nodes.reverse();
        return Route {
            nodes,
            raw_distance,
            distance: raw_distance * self.graph.metric_scale(),
        };
    }
}
