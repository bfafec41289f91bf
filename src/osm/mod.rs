// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Road networks built from [OpenStreetMap](https://www.openstreetmap.org/) data.

mod reader;
mod road;
mod route_model;

#[cfg(test)]
mod test_fixtures;

pub use reader::{Error, FileFormat, Options};
pub use road::{Road, RoadKind};
pub use route_model::{Bounds, Node, RouteModel};
