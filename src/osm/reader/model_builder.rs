// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::{model, Error, FeatureReader};
use crate::osm::{Bounds, Road, RoadKind, RouteModel};
use crate::NodeIndex;

/// Helper object used for storing state related to converting [OSM features](super::model::Feature)
/// into a [RouteModel].
#[derive(Debug, Default)]
pub(super) struct ModelBuilder {
    bounds: Option<Bounds>,
    nodes: Vec<model::Node>,
    node_positions: HashMap<i64, usize>,
    ways: Vec<(model::Way, RoadKind)>,
}

impl ModelBuilder {
    /// Add all features from the provided [FeatureReader] and build the [RouteModel].
    pub(super) fn add_features<F: FeatureReader>(
        mut self,
        mut features: F,
    ) -> Result<RouteModel, Error>
    where
        Error: From<F::Error>,
    {
        while let Some(f) = features.next_feature()? {
            self.add_feature(f);
        }
        self.build()
    }

    fn add_feature(&mut self, f: model::Feature) {
        match f {
            model::Feature::Bounds(b) => self.add_bounds(b),
            model::Feature::Node(n) => self.add_node(n),
            model::Feature::Way(w) => self.add_way(w),
        }
    }

    fn add_bounds(&mut self, b: Bounds) {
        if self.bounds.is_some() {
            log::warn!("ignoring repeated <bounds>: {:?}", b);
        } else {
            self.bounds = Some(b);
        }
    }

    fn add_node(&mut self, n: model::Node) {
        if self.node_positions.contains_key(&n.id) {
            log::warn!("ignoring duplicate node {}", n.id);
            return;
        }

        self.node_positions.insert(n.id, self.nodes.len());
        self.nodes.push(n);
    }

    fn add_way(&mut self, w: model::Way) {
        if let Some(kind) = RoadKind::from_tags(&w.tags) {
            self.ways.push((w, kind));
        }
    }

    /// Resolves node references of all roads and drops nodes not used by any road.
    fn build(self) -> Result<RouteModel, Error> {
        let Self {
            bounds,
            nodes,
            node_positions,
            ways,
        } = self;

        let mut used = vec![false; nodes.len()];
        let mut roads: Vec<Road> = Vec::with_capacity(ways.len());

        for (w, kind) in ways {
            let way_nodes = resolve_way_nodes(&node_positions, &w);
            if way_nodes.len() < 2 {
                log::warn!("ignoring way {} with less than 2 known nodes", w.id);
                continue;
            }

            way_nodes.iter().for_each(|&pos| used[pos] = true);
            roads.push(Road {
                way_id: w.id,
                kind,
                nodes: way_nodes,
            });
        }

        // Compact the node storage, so that only road nodes remain
        let mut new_index: Vec<Option<NodeIndex>> = vec![None; nodes.len()];
        let mut coords: Vec<(i64, f64, f64)> = Vec::default();
        for (pos, n) in nodes.iter().enumerate() {
            if used[pos] {
                new_index[pos] = Some(coords.len());
                coords.push((n.id, n.lat, n.lon));
            }
        }

        if coords.is_empty() {
            return Err(Error::NoNodes);
        }

        for road in roads.iter_mut() {
            road.nodes = road.nodes.iter().filter_map(|&pos| new_index[pos]).collect();
        }

        let bounds = match bounds {
            Some(b) => b,
            None => {
                log::debug!("map has no <bounds>, computing them from nodes");
                Bounds::around(coords.iter().map(|&(_, lat, lon)| (lat, lon))).widened()
            }
        };

        RouteModel::new(bounds, coords, roads)
    }
}

/// Maps OSM node ids of a way onto positions in [ModelBuilder::nodes],
/// dropping references to unknown nodes.
fn resolve_way_nodes(node_positions: &HashMap<i64, usize>, w: &model::Way) -> Vec<usize> {
    let nodes: Vec<usize> = w
        .nodes
        .iter()
        .filter_map(|id| node_positions.get(id).cloned())
        .collect();

    if nodes.len() != w.nodes.len() {
        log::warn!(
            "way {} references {} unknown nodes",
            w.id,
            w.nodes.len() - nodes.len(),
        );
    }

    nodes
}
