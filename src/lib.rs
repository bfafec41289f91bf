// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Point-to-point route planning with the [A* algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm).
//!
//! The search engine ([RoutePlanner]) works over any graph implementing [RouteGraph].
//! Two such graphs are provided: [AdjacencyGraph], an explicit weighted graph,
//! and [osm::RouteModel], a road network loaded from
//! [OpenStreetMap](https://www.openstreetmap.org/) data.
//!
//! Search state (visited flags, costs and parents) is kept by the planner itself,
//! so a graph is only ever borrowed immutably and may serve many queries at once.
//!
//! # Example
//!
//! ```no_run
//! let model = routeplanner::osm::RouteModel::from_file(
//!     &routeplanner::osm::Options::default(),
//!     "path/to/map.osm",
//! ).expect("failed to load map.osm");
//!
//! // Coordinates are given in percent of the map extent
//! let route = routeplanner::RoutePlanner::new(&model, 10.0, 10.0, 90.0, 90.0)
//!     .expect("failed to resolve route endpoints")
//!     .run()
//!     .expect("failed to find route");
//!
//! println!("Route: {:?} ({} m)", route.nodes, route.distance);
//! ```

mod astar;
mod graph;
mod kd;
pub mod osm;
mod projection;

pub use astar::{
    percent_to_fraction, AStarError, Route, RoutePlanner, SearchOptions, SearchState,
    DEFAULT_STEP_LIMIT,
};
pub use graph::{AdjacencyGraph, RouteGraph};
pub use kd::KDTree;
pub use projection::{lat_to_mercator_y, lon_to_mercator_x, EARTH_RADIUS};

/// Stable position of a node in the node storage of a [RouteGraph].
pub type NodeIndex = usize;

/// Position of a node in the normalized map space, where both
/// coordinates of the map extent span (roughly) from 0 to 1.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculates the euclidean distance between two points.
    pub fn distance(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Represents an outgoing (one-way) connection from a specific node of an [AdjacencyGraph].
///
/// `cost` must not be smaller than the straight-line distance between the two nodes,
/// otherwise the A* heuristic stops being admissible.
///
/// Due to implementation details, `to` might not exist in the graph.
/// Such edges are silently ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub to: NodeIndex,
    pub cost: f32,
}
