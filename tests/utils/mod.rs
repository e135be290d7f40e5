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

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use gridreach::pointset::{
    LinkageBuilder, LinkedPointSet, PointLink, PointSet, PointSetError, PointSetStore,
};
use gridreach::street::{
    Coord, RoutingVariable, SearchLimit, StreetMode, StreetSearch, StreetSearchResult,
};
use gridreach::transit_data::{
    PickDropType, ServiceSet, Transfer, TransitData, TripPattern, TripSchedule,
};

/// Parses "hh:mm:ss" into seconds since the service day start.
pub fn time(hms: &str) -> u32 {
    let mut parts = hms.split(':');
    let hours: u32 = parts.next().unwrap().parse().unwrap();
    let minutes: u32 = parts.next().unwrap().parse().unwrap();
    let seconds: u32 = parts.next().unwrap().parse().unwrap();
    hours * 3600 + minutes * 60 + seconds
}

/// Fluent builder of small test networks, one pattern at a time.
pub struct NetworkBuilder {
    nb_of_stops: usize,
    patterns: Vec<TripPattern>,
    transfers: Vec<Vec<Transfer>>,
}

impl NetworkBuilder {
    pub fn new(nb_of_stops: usize) -> Self {
        Self {
            nb_of_stops,
            patterns: Vec::new(),
            transfers: vec![Vec::new(); nb_of_stops],
        }
    }

    pub fn pattern(mut self, stops: &[usize]) -> PatternBuilder {
        let original_id = self.patterns.len();
        let pattern = TripPattern::new(original_id, stops.to_vec());
        self.patterns.push(pattern);
        PatternBuilder { builder: self }
    }

    pub fn pattern_with_policy(
        mut self,
        entries: &[(usize, PickDropType, PickDropType)],
    ) -> PatternBuilder {
        let original_id = self.patterns.len();
        let entries: Vec<(usize, PickDropType, PickDropType, bool)> = entries
            .iter()
            .map(|(stop, pickup, dropoff)| (*stop, *pickup, *dropoff, true))
            .collect();
        let pattern = TripPattern::from_stop_entries(original_id, "route:test", &entries);
        self.patterns.push(pattern);
        PatternBuilder { builder: self }
    }

    pub fn transfer(mut self, from: usize, to: usize, duration: u32) -> Self {
        self.transfers[from].push(Transfer {
            to_stop: to,
            duration,
        });
        self
    }

    pub fn build(self) -> TransitData {
        TransitData::build(self.nb_of_stops, self.patterns, self.transfers)
    }
}

pub struct PatternBuilder {
    builder: NetworkBuilder,
}

impl PatternBuilder {
    /// Adds a fixed-schedule trip ; stop times are "hh:mm:ss" strings,
    /// one per pattern stop, used for both arrival and departure.
    pub fn trip(mut self, trip_id: &str, service_code: u16, stop_times: &[&str]) -> Self {
        let times: Vec<u32> = stop_times.iter().map(|hms| time(hms)).collect();
        let pattern = self.builder.patterns.last_mut().unwrap();
        pattern.add_trip(TripSchedule::scheduled(
            trip_id,
            service_code,
            times.clone(),
            times,
        ));
        self
    }

    pub fn frequency_trip(
        mut self,
        trip_id: &str,
        service_code: u16,
        offsets: &[u32],
        headway: u32,
        start: &str,
        end: &str,
    ) -> Self {
        let pattern = self.builder.patterns.last_mut().unwrap();
        pattern.add_trip(TripSchedule::frequency(
            trip_id,
            service_code,
            offsets.to_vec(),
            offsets.to_vec(),
            headway,
            time(start),
            time(end),
        ));
        self
    }

    pub fn done(self) -> NetworkBuilder {
        self.builder
    }
}

pub fn service(codes: &[u16]) -> ServiceSet {
    let mut services = ServiceSet::new();
    for code in codes {
        services.insert(*code);
    }
    services
}

/// Street search stub answering from fixed maps, empty by default, which
/// models an origin with no street connectivity.
#[derive(Default)]
pub struct StubStreetSearch {
    pub stops_by_duration: HashMap<usize, u32>,
    pub stops_by_distance: HashMap<usize, u32>,
    pub vertices_by_duration: HashMap<usize, u32>,
    pub vertices_by_distance: HashMap<usize, u32>,
    pub park_ride_stops: Option<HashMap<usize, u32>>,
}

impl StreetSearch for StubStreetSearch {
    fn route(
        &self,
        _origin: Coord,
        _mode: StreetMode,
        variable: RoutingVariable,
        _limit: SearchLimit,
    ) -> StreetSearchResult {
        match variable {
            RoutingVariable::DurationSeconds => StreetSearchResult::new(
                self.stops_by_duration.clone(),
                self.vertices_by_duration.clone(),
            ),
            RoutingVariable::DistanceMillimeters => StreetSearchResult::new(
                self.stops_by_distance.clone(),
                self.vertices_by_distance.clone(),
            ),
        }
    }

    fn park_ride_access(
        &self,
        _origin: Coord,
        _max_car_time_seconds: u32,
    ) -> Option<StreetSearchResult> {
        self.park_ride_stops
            .as_ref()
            .map(|stops| StreetSearchResult::new(stops.clone(), HashMap::new()))
    }
}

/// Serves the same prebuilt linkage for every mode.
pub struct StubLinkageBuilder {
    linked: Arc<LinkedPointSet>,
}

impl StubLinkageBuilder {
    pub fn new(linked: LinkedPointSet) -> Self {
        Self {
            linked: Arc::new(linked),
        }
    }

    /// One cell per link, each linked to the street vertex of the same
    /// index, with the given egress stops.
    pub fn simple(nb_of_cells: usize, egress_stops: Vec<Vec<(usize, u32)>>) -> Self {
        let links = (0..nb_of_cells)
            .map(|cell| {
                Some(PointLink {
                    vertex: cell,
                    offstreet_distance_mm: 0,
                })
            })
            .collect();
        Self::new(LinkedPointSet::new(links, egress_stops))
    }
}

impl LinkageBuilder for StubLinkageBuilder {
    fn link(&self, _pointset: &Arc<PointSet>, _mode: StreetMode) -> Arc<LinkedPointSet> {
        Arc::clone(&self.linked)
    }
}

/// In-memory point-set store holding gzipped objects.
pub struct MemoryStore {
    objects: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            objects: HashMap::new(),
        }
    }

    pub fn with_grid(mut self, key: &str, width: u32, height: u32, counts: &[f64]) -> Self {
        self.objects.insert(key.to_string(), gzipped_grid(width, height, counts));
        self
    }
}

impl PointSetStore for MemoryStore {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, PointSetError> {
        self.objects
            .get(key)
            .cloned()
            .ok_or_else(|| PointSetError::NotFound(key.to_string()))
    }
}

pub fn gzipped_grid(width: u32, height: u32, counts: &[f64]) -> Vec<u8> {
    assert_eq!(counts.len(), (width * height) as usize);
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&width.to_le_bytes());
    bytes.extend_from_slice(&height.to_le_bytes());
    for count in counts {
        bytes.extend_from_slice(&count.to_le_bytes());
    }
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&bytes).unwrap();
    encoder.finish().unwrap()
}
