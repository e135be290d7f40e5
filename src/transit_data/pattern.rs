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

use tracing::{debug, warn};

use super::{ServiceSet, StopBitSet};

/// Route id given to patterns synthesized by a scenario modification,
/// which have no counterpart in the source feeds.
const SCENARIO_ROUTE_ID: &str = "scenario_modification";

/// Pickup or dropoff policy at one position of a pattern.
/// Numeric values follow the gtfs stop_times codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickDropType {
    Scheduled,
    None,
    CallAgency,
    CoordinateWithDriver,
}

impl PickDropType {
    pub fn from_gtfs_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PickDropType::Scheduled),
            1 => Some(PickDropType::None),
            2 => Some(PickDropType::CallAgency),
            3 => Some(PickDropType::CoordinateWithDriver),
            _ => None,
        }
    }

    pub fn allows_boarding(&self) -> bool {
        !matches!(self, PickDropType::None)
    }

    pub fn allows_alighting(&self) -> bool {
        !matches!(self, PickDropType::None)
    }
}

/// One vehicle run along a pattern.
///
/// `arrivals` and `departures` are aligned to the pattern's `stops`,
/// in seconds since the start of the service day.
/// A schedule with a `headway` describes a frequency-based service
/// repeating over `[frequency_start, frequency_end]` instead of a
/// single fixed run.
#[derive(Debug, Clone)]
pub struct TripSchedule {
    pub trip_id: String,
    pub arrivals: Vec<u32>,
    pub departures: Vec<u32>,
    pub service_code: u16,
    pub headway_seconds: Option<u32>,
    pub frequency_start: u32,
    pub frequency_end: u32,
}

impl TripSchedule {
    pub fn scheduled(
        trip_id: impl Into<String>,
        service_code: u16,
        arrivals: Vec<u32>,
        departures: Vec<u32>,
    ) -> Self {
        debug_assert_eq!(arrivals.len(), departures.len());
        Self {
            trip_id: trip_id.into(),
            arrivals,
            departures,
            service_code,
            headway_seconds: None,
            frequency_start: 0,
            frequency_end: 0,
        }
    }

    pub fn frequency(
        trip_id: impl Into<String>,
        service_code: u16,
        arrivals: Vec<u32>,
        departures: Vec<u32>,
        headway_seconds: u32,
        frequency_start: u32,
        frequency_end: u32,
    ) -> Self {
        Self {
            trip_id: trip_id.into(),
            arrivals,
            departures,
            service_code,
            headway_seconds: Some(headway_seconds),
            frequency_start,
            frequency_end,
        }
    }

    pub fn is_frequency_based(&self) -> bool {
        self.headway_seconds.is_some()
    }
}

/// All the trips of one route sharing the same stop sequence and the same
/// pickup/dropoff policy, like a Transmodel JourneyPattern.
#[derive(Debug, Clone)]
pub struct TripPattern {
    /// Identity of this pattern in the original, unmodified network.
    /// Kept distinct from any renumbering performed by scenario
    /// modifications, so that results can be mapped back.
    pub original_id: usize,
    pub route_id: String,
    pub direction_id: Option<u8>,
    /// Stop indices, pairwise distinct within the pattern.
    pub stops: Vec<usize>,
    pub pickups: Vec<PickDropType>,
    pub dropoffs: Vec<PickDropType>,
    /// One bit per pattern position.
    pub wheelchair_accessible: StopBitSet,
    pub trip_schedules: Vec<TripSchedule>,
    pub has_frequencies: bool,
    pub has_schedules: bool,
    /// Union of the service codes on which at least one trip is active.
    pub services_active: ServiceSet,
}

impl TripPattern {
    /// Builds a pattern from stop indices alone, as done when a scenario
    /// modification inserts a brand new pattern rather than importing one.
    /// Pickup and dropoff are allowed at every stop.
    pub fn new(original_id: usize, stops: Vec<usize>) -> Self {
        let nb_of_stops = stops.len();
        let mut wheelchair_accessible = StopBitSet::with_capacity(nb_of_stops);
        for position in 0..nb_of_stops {
            wheelchair_accessible.insert(position);
        }
        Self {
            original_id,
            route_id: SCENARIO_ROUTE_ID.to_string(),
            direction_id: None,
            stops,
            pickups: vec![PickDropType::Scheduled; nb_of_stops],
            dropoffs: vec![PickDropType::Scheduled; nb_of_stops],
            wheelchair_accessible,
            trip_schedules: Vec::new(),
            has_frequencies: false,
            has_schedules: false,
            services_active: ServiceSet::new(),
        }
    }

    /// Builds a pattern from per-stop `(stop, pickup, dropoff, accessible)`
    /// entries, as produced by the network build.
    pub fn from_stop_entries(
        original_id: usize,
        route_id: impl Into<String>,
        entries: &[(usize, PickDropType, PickDropType, bool)],
    ) -> Self {
        let nb_of_stops = entries.len();
        let mut stops = Vec::with_capacity(nb_of_stops);
        let mut pickups = Vec::with_capacity(nb_of_stops);
        let mut dropoffs = Vec::with_capacity(nb_of_stops);
        let mut wheelchair_accessible = StopBitSet::with_capacity(nb_of_stops);
        for (position, (stop, pickup, dropoff, accessible)) in entries.iter().enumerate() {
            stops.push(*stop);
            pickups.push(*pickup);
            dropoffs.push(*dropoff);
            if *accessible {
                wheelchair_accessible.insert(position);
            }
        }
        Self {
            original_id,
            route_id: route_id.into(),
            direction_id: None,
            stops,
            pickups,
            dropoffs,
            wheelchair_accessible,
            trip_schedules: Vec::new(),
            has_frequencies: false,
            has_schedules: false,
            services_active: ServiceSet::new(),
        }
    }

    pub fn nb_of_positions(&self) -> usize {
        self.stops.len()
    }

    /// Appends a trip and updates the derived frequency/schedule flags
    /// and the active service set.
    pub fn add_trip(&mut self, schedule: TripSchedule) {
        debug_assert_eq!(schedule.departures.len(), self.stops.len());
        self.has_frequencies = self.has_frequencies || schedule.is_frequency_based();
        self.has_schedules = self.has_schedules || !schedule.is_frequency_based();
        self.services_active.insert(schedule.service_code);
        self.trip_schedules.push(schedule);
    }

    pub fn set_or_verify_direction(&mut self, direction_id: u8) {
        match self.direction_id {
            None => {
                self.direction_id = Some(direction_id);
                debug!(
                    "pattern has route_id {} and direction_id {}",
                    self.route_id, direction_id
                );
            }
            Some(known) if known != direction_id => {
                warn!("trips with different direction ids are in the same pattern");
            }
            Some(_) => {}
        }
    }

    /// Earliest boardable trip at `stop_offset` departing strictly after
    /// `time`, restricted to trips whose service is in `services`.
    /// Linear scan, following the schedule storage order.
    ///
    /// Returns `None` if no departure is possible.
    pub fn find_next_departure(
        &self,
        time: u32,
        stop_offset: usize,
        services: &ServiceSet,
    ) -> Option<(usize, u32)> {
        let mut best: Option<(usize, u32)> = None;
        for (trip_offset, schedule) in self.trip_schedules.iter().enumerate() {
            if !services.contains(schedule.service_code) {
                continue;
            }
            let departure_time = match schedule.headway_seconds {
                None => schedule.departures[stop_offset],
                Some(headway) => {
                    // Worst-case wait within the frequency window : the
                    // offset of the first run is unknown, so assume a full
                    // headway elapses before boarding.
                    let earliest = time.max(schedule.frequency_start);
                    let boarded = earliest.saturating_add(headway);
                    if boarded > schedule.frequency_end {
                        continue;
                    }
                    boarded + schedule.departures[stop_offset]
                }
            };
            if departure_time > time && best.map_or(true, |(_, t)| departure_time < t) {
                best = Some((trip_offset, departure_time));
            }
        }
        best
    }

    /// `true` when none of `trip_ids` run on this pattern.
    pub fn contains_no_trips(&self, trip_ids: &[&str]) -> bool {
        self.trip_schedules
            .iter()
            .all(|schedule| !trip_ids.contains(&schedule.trip_id.as_str()))
    }
}

impl std::fmt::Display for TripPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "pattern on route {} with stops {:?}",
            self.route_id, self.stops
        )
    }
}
