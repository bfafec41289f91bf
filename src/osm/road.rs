// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::NodeIndex;

/// Classification of an OSM way with a [highway](https://wiki.openstreetmap.org/wiki/Key:highway) tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadKind {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Unclassified,

    /// Paths not usable by vehicles: footways, paths, steps, pedestrian areas and bridleways.
    Footway,
}

impl RoadKind {
    /// Classifies a value of the `highway` tag. Returns `None` for values which
    /// don't describe roads (e.g. `highway=bus_stop`) or aren't supported.
    pub fn from_highway(value: &str) -> Option<Self> {
        match value {
            "motorway" => Some(Self::Motorway),
            "trunk" => Some(Self::Trunk),
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            "tertiary" => Some(Self::Tertiary),
            "residential" | "living_street" => Some(Self::Residential),
            "service" => Some(Self::Service),
            "unclassified" => Some(Self::Unclassified),
            "footway" | "bridleway" | "steps" | "path" | "pedestrian" => Some(Self::Footway),
            _ => None,
        }
    }

    /// Classifies an OSM way by its tags.
    pub fn from_tags(tags: &HashMap<String, String>) -> Option<Self> {
        tags.get("highway").and_then(|v| Self::from_highway(v))
    }

    /// Returns true if routes may go through this kind of road.
    pub fn is_routable(self) -> bool {
        self != Self::Footway
    }
}

impl std::fmt::Display for RoadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Motorway => write!(f, "motorway"),
            Self::Trunk => write!(f, "trunk"),
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
            Self::Tertiary => write!(f, "tertiary"),
            Self::Residential => write!(f, "residential"),
            Self::Service => write!(f, "service"),
            Self::Unclassified => write!(f, "unclassified"),
            Self::Footway => write!(f, "footway"),
        }
    }
}

/// Road of a [RouteModel](super::RouteModel) - a sequence of nodes along an OSM way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Road {
    pub way_id: i64,
    pub kind: RoadKind,
    pub nodes: Vec<NodeIndex>,
}
