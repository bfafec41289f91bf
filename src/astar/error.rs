// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::NodeIndex;

/// Recommended number of allowed node expansions in a [RoutePlanner](crate::RoutePlanner)
/// search before [AStarError::StepLimitExceeded] is returned.
pub const DEFAULT_STEP_LIMIT: usize = 1_000_000;

/// Error conditions which may occur when setting up or running a
/// [RoutePlanner](crate::RoutePlanner).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AStarError {
    /// The start or end node doesn't exist in a graph.
    InvalidReference(NodeIndex),

    /// The graph has no node which could serve as a route endpoint.
    EmptyGraph,

    /// Route search has exceeded its limit of steps.
    /// Either the nodes are really far apart, or no route exists.
    ///
    /// Concluding that no route exists requires traversing the whole reachable graph,
    /// which can result in a denial-of-service. The step limit protects
    /// against resource exhaustion.
    StepLimitExceeded,
}

impl std::fmt::Display for AStarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReference(idx) => write!(f, "invalid node: {}", idx),
            Self::EmptyGraph => write!(f, "graph has no nodes to route between"),
            Self::StepLimitExceeded => write!(f, "step limit exceeded"),
        }
    }
}

impl std::error::Error for AStarError {}

/// Additional controls of a [RoutePlanner](crate::RoutePlanner) search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Limits how many nodes may be expanded during the search
    /// before returning [AStarError::StepLimitExceeded].
    pub step_limit: usize,

    /// Re-parent already discovered (but not yet expanded) nodes when a cheaper
    /// path to them is found.
    ///
    /// By default, the parent and cost of a node are fixed when it is first discovered,
    /// which is faster, but may produce routes longer than the shortest one.
    pub relax: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
            relax: false,
        }
    }
}
