// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

mod error;
mod open_list;
mod planner;

pub use error::{AStarError, SearchOptions, DEFAULT_STEP_LIMIT};
pub use planner::{percent_to_fraction, Route, RoutePlanner, SearchState};
