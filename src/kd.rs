// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use crate::{NodeIndex, Point};

/// KDTree implements the [k-d tree data structure](https://en.wikipedia.org/wiki/K-d_tree),
/// used to speed up nearest-node lookups. Finding the closest node by scanning the whole
/// graph easily takes more time than the route search itself on large maps;
/// a k-d tree trades memory usage for CPU time.
///
/// Distances are euclidean, which matches the normalized map space of
/// [RouteModel](crate::osm::RouteModel).
#[derive(Debug, Clone)]
pub struct KDTree {
    pivot: (NodeIndex, Point),
    left: Option<Box<KDTree>>,
    right: Option<Box<KDTree>>,
}

impl KDTree {
    /// Finds the node closest to the given position, returning its index.
    pub fn find_nearest_node(&self, x: f32, y: f32) -> NodeIndex {
        self.find_nearest_node_impl(&Point::new(x, y), false).0
    }

    fn find_nearest_node_impl(&self, target: &Point, y_divides: bool) -> (NodeIndex, f32) {
        // Start by assuming that pivot is the closest
        let (mut best, pivot) = self.pivot;
        let mut best_dist = pivot.distance(target);

        // Select which branch to recurse into first
        let first_left = if y_divides {
            target.y < pivot.y
        } else {
            target.x < pivot.x
        };
        let (first, second) = if first_left {
            (&self.left, &self.right)
        } else {
            (&self.right, &self.left)
        };

        // Recurse into the first branch
        if let Some(ref branch) = first {
            let (alt, alt_dist) = branch.find_nearest_node_impl(target, !y_divides);
            if alt_dist < best_dist {
                best = alt;
                best_dist = alt_dist;
            }
        }

        // (Optionally) recurse into the second branch
        if let Some(ref branch) = second {
            // A closer node is possible in the second branch if and only if
            // the splitting axis is closer than the current best candidate.
            let dist_to_axis = if y_divides {
                (target.y - pivot.y).abs()
            } else {
                (target.x - pivot.x).abs()
            };

            if dist_to_axis < best_dist {
                let (alt, alt_dist) = branch.find_nearest_node_impl(target, !y_divides);
                if alt_dist < best_dist {
                    best = alt;
                    best_dist = alt_dist;
                }
            }
        }

        return (best, best_dist);
    }

    /// Builds a k-d tree from an iterable of node indices and their positions.
    pub fn from_iter<I: IntoIterator<Item = (NodeIndex, Point)>>(nodes: I) -> Option<Self> {
        let mut nodes = nodes.into_iter().collect::<Vec<_>>();
        Self::build(nodes.as_mut_slice())
    }

    /// Builds a k-d tree from a mutable slice of nodes. Nodes will be reordered
    /// in the slice to facilitate building the tree.
    pub fn build(nodes: &mut [(NodeIndex, Point)]) -> Option<Self> {
        Self::build_impl(nodes, false)
    }

    fn build_impl(nodes: &mut [(NodeIndex, Point)], y_divides: bool) -> Option<Self> {
        match nodes.len() {
            0 => None,
            1 => Some(Self {
                pivot: nodes[0],
                left: None,
                right: None,
            }),
            _ => {
                if y_divides {
                    nodes.sort_by(|(_, a), (_, b)| a.y.total_cmp(&b.y));
                } else {
                    nodes.sort_by(|(_, a), (_, b)| a.x.total_cmp(&b.x));
                }
                let median = nodes.len() / 2;
                let pivot = nodes[median];
                let (left, right_and_pivot) = nodes.split_at_mut(median);
                let right = &mut right_and_pivot[1..];
                Some(Self {
                    pivot,
                    left: Self::build_impl(left, !y_divides).map(Box::new),
                    right: Self::build_impl(right, !y_divides).map(Box::new),
                })
            }
        }
    }
}
