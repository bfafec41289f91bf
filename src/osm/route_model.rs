// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use super::{Error, Road};
use crate::{lat_to_mercator_y, lon_to_mercator_x, KDTree, NodeIndex, Point, RouteGraph};

/// Largest latitude representable in the Web Mercator projection.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// Half-extent (in degrees) given to [Bounds] around a single position.
const MIN_HALF_EXTENT: f64 = 0.000_5;

/// Geographic extent of a map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Computes the smallest bounds containing all provided (lat, lon) positions.
    pub fn around<I: IntoIterator<Item = (f64, f64)>>(positions: I) -> Self {
        positions.into_iter().fold(
            Self {
                min_lat: f64::INFINITY,
                min_lon: f64::INFINITY,
                max_lat: f64::NEG_INFINITY,
                max_lon: f64::NEG_INFINITY,
            },
            |b, (lat, lon)| Self {
                min_lat: b.min_lat.min(lat),
                min_lon: b.min_lon.min(lon),
                max_lat: b.max_lat.max(lat),
                max_lon: b.max_lon.max(lon),
            },
        )
    }

    /// Widens an axis with zero extent by half of the other axis' extent on both sides,
    /// so that bounds around nodes lying on a single parallel or meridian stay valid.
    pub fn widened(self) -> Self {
        let lat_extent = self.max_lat - self.min_lat;
        let lon_extent = self.max_lon - self.min_lon;

        let pad = |own: f64, other: f64| {
            if own > 0.0 {
                0.0
            } else if other > 0.0 {
                other * 0.5
            } else {
                MIN_HALF_EXTENT
            }
        };
        let lat_pad = pad(lat_extent, lon_extent);
        let lon_pad = pad(lon_extent, lat_extent);

        Self {
            min_lat: (self.min_lat - lat_pad).max(-MAX_MERCATOR_LAT),
            min_lon: (self.min_lon - lon_pad).max(-180.0),
            max_lat: (self.max_lat + lat_pad).min(MAX_MERCATOR_LAT),
            max_lon: (self.max_lon + lon_pad).min(180.0),
        }
    }

    /// Returns true if the bounds are finite, non-empty and projectable.
    pub fn is_valid(&self) -> bool {
        self.min_lat < self.max_lat
            && self.min_lon < self.max_lon
            && self.min_lat >= -MAX_MERCATOR_LAT
            && self.max_lat <= MAX_MERCATOR_LAT
            && self.min_lon >= -180.0
            && self.max_lon <= 180.0
    }
}

/// Represents an [OSM node](https://wiki.openstreetmap.org/wiki/Node) lying on a road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub osm_id: i64,
    pub lat: f64,
    pub lon: f64,

    /// Position in the normalized map space.
    pub position: Point,
}

/// Road network built from [OpenStreetMap](https://www.openstreetmap.org/) data.
///
/// Positions are projected with Web Mercator and normalized, so that the shorter
/// side of the map [Bounds] spans from 0 to 1. Footways are kept in the model,
/// but routes never go through them.
///
/// Neighbors of a node are found on demand: for every road going through a node,
/// the closest not-yet-visited node of that road is a neighbor.
#[derive(Debug, Clone)]
pub struct RouteModel {
    bounds: Bounds,
    nodes: Vec<Node>,
    roads: Vec<Road>,
    node_to_roads: Vec<Vec<usize>>,
    tree: KDTree,
    metric_scale: f32,
}

impl RouteModel {
    pub(crate) fn new(
        bounds: Bounds,
        coords: Vec<(i64, f64, f64)>,
        roads: Vec<Road>,
    ) -> Result<Self, Error> {
        if !bounds.is_valid() {
            return Err(Error::InvalidBounds);
        }

        let min_x = lon_to_mercator_x(bounds.min_lon);
        let min_y = lat_to_mercator_y(bounds.min_lat);
        let dx = lon_to_mercator_x(bounds.max_lon) - min_x;
        let dy = lat_to_mercator_y(bounds.max_lat) - min_y;
        let normalizer = dx.min(dy);

        let nodes: Vec<Node> = coords
            .into_iter()
            .map(|(osm_id, lat, lon)| Node {
                osm_id,
                lat,
                lon,
                position: Point::new(
                    ((lon_to_mercator_x(lon) - min_x) / normalizer) as f32,
                    ((lat_to_mercator_y(lat) - min_y) / normalizer) as f32,
                ),
            })
            .collect();

        let mut node_to_roads: Vec<Vec<usize>> = vec![Vec::default(); nodes.len()];
        for (road_idx, road) in roads.iter().enumerate() {
            if !road.kind.is_routable() {
                continue;
            }

            for &node_idx in &road.nodes {
                let node_roads = &mut node_to_roads[node_idx];
                if !node_roads.contains(&road_idx) {
                    node_roads.push(road_idx);
                }
            }
        }

        let tree = KDTree::from_iter(
            node_to_roads
                .iter()
                .enumerate()
                .filter(|(_, node_roads)| !node_roads.is_empty())
                .map(|(idx, _)| (idx, nodes[idx].position)),
        )
        .ok_or(Error::NoRoads)?;

        // Web Mercator stretches distances by 1/cos(lat)
        let mid_lat = (bounds.min_lat + bounds.max_lat) * 0.5;
        let metric_scale = (normalizer * mid_lat.to_radians().cos()) as f32;

        log::info!(
            "loaded road model with {} nodes and {} roads ({} routable)",
            nodes.len(),
            roads.len(),
            roads.iter().filter(|r| r.kind.is_routable()).count(),
        );

        Ok(Self {
            bounds,
            nodes,
            roads,
            node_to_roads,
            tree,
            metric_scale,
        })
    }

    /// Returns the number of nodes in the model.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&Node> {
        self.nodes.get(idx)
    }

    pub fn roads(&self) -> &[Road] {
        &self.roads
    }

    /// Finds the index of a node with the provided OSM id.
    ///
    /// This function does a linear scan over all nodes.
    pub fn find_node_by_osm_id(&self, osm_id: i64) -> Option<NodeIndex> {
        self.nodes.iter().position(|n| n.osm_id == osm_id)
    }

    /// Finds the node of a road closest to `node`, skipping `node` itself,
    /// nodes at the same position and visited nodes.
    fn find_neighbor_on_road(
        &self,
        road: &Road,
        node: NodeIndex,
        is_visited: &dyn Fn(NodeIndex) -> bool,
    ) -> Option<NodeIndex> {
        let here = self.nodes[node].position;
        road.nodes
            .iter()
            .cloned()
            .filter(|&idx| idx != node && !is_visited(idx))
            .map(|idx| (self.nodes[idx].position.distance(&here), idx))
            .filter(|&(dist, _)| dist > 0.0)
            .min_by(|(a_dist, _), (b_dist, _)| a_dist.total_cmp(b_dist))
            .map(|(_, idx)| idx)
    }
}

impl RouteGraph for RouteModel {
    fn node_count(&self) -> usize {
        self.len()
    }

    /// Finds the closest node lying on a routable road.
    fn find_closest_node(&self, x: f32, y: f32) -> Option<NodeIndex> {
        Some(self.tree.find_nearest_node(x, y))
    }

    fn find_neighbors(
        &self,
        node: NodeIndex,
        is_visited: &dyn Fn(NodeIndex) -> bool,
    ) -> Vec<NodeIndex> {
        match self.node_to_roads.get(node) {
            Some(node_roads) => node_roads
                .iter()
                .filter_map(|&road_idx| {
                    self.find_neighbor_on_road(&self.roads[road_idx], node, is_visited)
                })
                .collect(),
            None => Vec::default(),
        }
    }

    fn distance(&self, from: NodeIndex, to: NodeIndex) -> f32 {
        self.nodes[from].position.distance(&self.nodes[to].position)
    }

    fn metric_scale(&self) -> f32 {
        self.metric_scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::osm::test_fixtures::SIMPLE_XML;
    use crate::osm::{Options, RoadKind};
    use crate::{RoutePlanner, SearchOptions};

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr) => {
            assert!(
                (($a - $b).abs() < 1e-4),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    fn load() -> RouteModel {
        RouteModel::from_buffer(&Options::default(), SIMPLE_XML).unwrap()
    }

    fn idx(m: &RouteModel, osm_id: i64) -> NodeIndex {
        m.find_node_by_osm_id(osm_id)
            .unwrap_or_else(|| panic!("node {} not in model", osm_id))
    }

    fn osm_ids(m: &RouteModel, nodes: &[NodeIndex]) -> Vec<i64> {
        nodes.iter().map(|&i| m.nodes()[i].osm_id).collect()
    }

    #[test]
    fn nodes_and_roads() {
        let m = load();

        // Node 7 is only used by a building, node 8 is malformed
        assert_eq!(m.len(), 6);
        assert_eq!(m.find_node_by_osm_id(7), None);
        assert_eq!(m.find_node_by_osm_id(8), None);

        let kinds: Vec<RoadKind> = m.roads().iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![RoadKind::Residential, RoadKind::Primary, RoadKind::Footway]
        );
        assert_eq!(osm_ids(&m, &m.roads()[1].nodes), vec![2, 4, 5]);
        assert_eq!(m.roads()[2].way_id, 102);
    }

    #[test]
    fn projection() {
        let m = load();

        let n1 = m.nodes()[idx(&m, 1)].position;
        assert_almost_eq!(n1.x, 0.0);
        assert_almost_eq!(n1.y, 0.0);

        let n3 = m.nodes()[idx(&m, 3)].position;
        assert_almost_eq!(n3.x, 1.0);
        assert_almost_eq!(n3.y, 0.0);

        let n4 = m.nodes()[idx(&m, 4)].position;
        assert_almost_eq!(n4.x, 0.4);
        assert_almost_eq!(n4.y, 0.3);

        let n5 = m.nodes()[idx(&m, 5)].position;
        assert_almost_eq!(n5.x, 0.4);
        assert_almost_eq!(n5.y, 1.0);

        // 0.01° of longitude at the equator
        assert!((m.metric_scale() - 1113.195).abs() < 0.01);
    }

    #[test]
    fn neighbors() {
        let m = load();
        let none = |_: NodeIndex| false;

        let found = m.find_neighbors(idx(&m, 2), &none);
        assert_eq!(osm_ids(&m, &found), vec![1, 4]);

        let n1 = idx(&m, 1);
        let found = m.find_neighbors(idx(&m, 2), &|i| i == n1);
        assert_eq!(osm_ids(&m, &found), vec![3, 4]);

        // Footway 5-6 is not used
        let found = m.find_neighbors(idx(&m, 5), &none);
        assert_eq!(osm_ids(&m, &found), vec![4]);
        assert!(m.find_neighbors(idx(&m, 6), &none).is_empty());

        // All candidates visited
        assert!(m.find_neighbors(idx(&m, 5), &|_| true).is_empty());
    }

    #[test]
    fn closest_node() {
        let m = load();
        assert_eq!(m.find_closest_node(0.05, 0.01), Some(idx(&m, 1)));
        assert_eq!(m.find_closest_node(0.95, 0.05), Some(idx(&m, 3)));
        // Node 6 only lies on a footway
        assert_eq!(m.find_closest_node(0.0, 1.0), Some(idx(&m, 5)));
    }

    #[test]
    fn distance_is_symmetric() {
        let m = load();
        let (a, b) = (idx(&m, 1), idx(&m, 5));
        assert_eq!(m.distance(a, b), m.distance(b, a));
        assert_eq!(m.distance(a, a), 0.0);
        assert_eq!(m.heuristic(a, b), m.distance(a, b));
    }

    #[test]
    fn route() {
        let m = load();
        let planner = RoutePlanner::new(&m, 0.0, 0.0, 40.0, 100.0).unwrap();
        assert_eq!(planner.start_node(), idx(&m, 1));
        assert_eq!(planner.end_node(), idx(&m, 5));

        let route = planner.run().unwrap();
        assert_eq!(osm_ids(&m, &route.nodes), vec![1, 2, 4, 5]);
        assert_almost_eq!(route.raw_distance, 1.4);
        assert_eq!(route.distance, route.raw_distance * m.metric_scale());

        let relaxed = RoutePlanner::new(&m, 0.0, 0.0, 40.0, 100.0)
            .unwrap()
            .with_options(SearchOptions {
                relax: true,
                ..Default::default()
            })
            .run()
            .unwrap();
        assert_eq!(relaxed.nodes, route.nodes);
    }

    #[test]
    fn bounds_computed_from_nodes() {
        const DATA: &[u8] = br#"<osm>
  <node id="1" lat="10.0" lon="20.0"/>
  <node id="2" lat="10.02" lon="20.01"/>
  <node id="3" lat="10.01" lon="20.03"/>
  <way id="1"><nd ref="1"/><nd ref="42"/><nd ref="2"/><nd ref="3"/><tag k="highway" v="service"/></way>
</osm>"#;

        let m = RouteModel::from_buffer(&Options::default(), DATA).unwrap();
        assert_eq!(
            m.bounds(),
            Bounds {
                min_lat: 10.0,
                min_lon: 20.0,
                max_lat: 10.02,
                max_lon: 20.03,
            }
        );
        assert_eq!(m.roads()[0].nodes, vec![0, 1, 2]);
    }

    #[test]
    fn bounds_computed_from_nodes_on_one_parallel() {
        const DATA: &[u8] = br#"<osm>
  <node id="1" lat="52.0" lon="21.0"/>
  <node id="2" lat="52.0" lon="21.01"/>
  <node id="3" lat="52.0" lon="21.02"/>
  <way id="1"><nd ref="1"/><nd ref="2"/><nd ref="3"/><tag k="highway" v="residential"/></way>
</osm>"#;

        let m = RouteModel::from_buffer(&Options::default(), DATA).unwrap();
        let b = m.bounds();
        assert!(b.is_valid());
        assert_almost_eq!(b.min_lat, 51.99);
        assert_almost_eq!(b.max_lat, 52.01);
        assert_almost_eq!(b.min_lon, 21.0);
        assert_almost_eq!(b.max_lon, 21.02);

        let route = RoutePlanner::between(&m, idx(&m, 1), idx(&m, 3))
            .unwrap()
            .run()
            .unwrap();
        let osm_ids: Vec<i64> = route.nodes.iter().map(|&i| m.nodes()[i].osm_id).collect();
        assert_eq!(osm_ids, vec![1, 2, 3]);
    }

    #[test]
    fn bounds_computed_from_nodes_on_one_meridian() {
        const DATA: &[u8] = br#"<osm>
  <node id="1" lat="10.0" lon="5.0"/>
  <node id="2" lat="10.01" lon="5.0"/>
  <way id="1"><nd ref="1"/><nd ref="2"/><tag k="highway" v="primary"/></way>
</osm>"#;

        let m = RouteModel::from_buffer(&Options::default(), DATA).unwrap();
        let b = m.bounds();
        assert!(b.is_valid());
        assert_almost_eq!(b.min_lon, 4.995);
        assert_almost_eq!(b.max_lon, 5.005);
    }

    #[test]
    fn widen_bounds_around_single_position() {
        let b = Bounds::around([(1.0, 2.0)]).widened();
        assert!(b.is_valid());
        assert_almost_eq!(b.max_lat - b.min_lat, 0.001);
        assert_almost_eq!(b.max_lon - b.min_lon, 0.001);

        let valid = Bounds {
            min_lat: 0.0,
            min_lon: 0.0,
            max_lat: 1.0,
            max_lon: 2.0,
        };
        assert_eq!(valid.widened(), valid);
    }

    #[test]
    fn no_routable_roads() {
        const DATA: &[u8] = br#"<osm>
  <bounds minlat="0.0" minlon="0.0" maxlat="0.01" maxlon="0.01"/>
  <node id="1" lat="0.0" lon="0.0"/>
  <node id="2" lat="0.01" lon="0.01"/>
  <way id="1"><nd ref="1"/><nd ref="2"/><tag k="highway" v="footway"/></way>
</osm>"#;

        assert!(matches!(
            RouteModel::from_buffer(&Options::default(), DATA),
            Err(Error::NoRoads)
        ));
    }

    #[test]
    fn no_nodes() {
        const DATA: &[u8] = br#"<osm>
  <bounds minlat="0.0" minlon="0.0" maxlat="0.01" maxlon="0.01"/>
  <node id="1" lat="0.0" lon="0.0"/>
  <way id="1"><nd ref="1"/><tag k="highway" v="primary"/></way>
</osm>"#;

        assert!(matches!(
            RouteModel::from_buffer(&Options::default(), DATA),
            Err(Error::NoNodes)
        ));
    }

    #[test]
    fn bounds_validity() {
        let b = Bounds {
            min_lat: 52.0,
            min_lon: 21.0,
            max_lat: 52.1,
            max_lon: 21.1,
        };
        assert!(b.is_valid());
        assert!(!Bounds { max_lat: 52.0, ..b }.is_valid());
        assert!(!Bounds { max_lat: 89.0, ..b }.is_valid());
        assert!(!Bounds {
            min_lon: f64::NAN,
            ..b
        }
        .is_valid());
        assert!(!Bounds::around(std::iter::empty()).is_valid());
    }
}
