// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreetMode {
    Walk,
    Bicycle,
    Car,
}

/// The quantity minimized by a street search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingVariable {
    DurationSeconds,
    DistanceMillimeters,
}

/// Budget bounding a street search, in the unit of its routing variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLimit {
    None,
    Seconds(u32),
    Millimeters(u32),
}

/// Result of one street search : the optimized quantity per reached
/// transit stop, plus point queries at arbitrary street vertices.
pub struct StreetSearchResult {
    reached_stops: HashMap<usize, u32>,
    values_at_vertices: HashMap<usize, u32>,
}

impl StreetSearchResult {
    pub fn new(reached_stops: HashMap<usize, u32>, values_at_vertices: HashMap<usize, u32>) -> Self {
        Self {
            reached_stops,
            values_at_vertices,
        }
    }

    pub fn empty() -> Self {
        Self {
            reached_stops: HashMap::new(),
            values_at_vertices: HashMap::new(),
        }
    }

    pub fn reached_stops(&self) -> &HashMap<usize, u32> {
        &self.reached_stops
    }

    pub fn value_at_vertex(&self, vertex: usize) -> Option<u32> {
        self.values_at_vertices.get(&vertex).copied()
    }
}

/// The elementary label-setting street-network search, consumed as a
/// black box. An origin in a place with no reachable street edge yields
/// empty results, never an error.
pub trait StreetSearch {
    fn route(
        &self,
        origin: Coord,
        mode: StreetMode,
        variable: RoutingVariable,
        limit: SearchLimit,
    ) -> StreetSearchResult;

    /// Two-phase park-and-ride access : drive to a parking facility, then
    /// walk to nearby stops. Returns `None` when no parking facility is
    /// reachable from the origin.
    fn park_ride_access(&self, origin: Coord, max_car_time_seconds: u32)
        -> Option<StreetSearchResult>;
}
