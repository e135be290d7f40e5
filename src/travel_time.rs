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

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::engine::{McRangeRaptorWorker, SearchParams, TransferLeg};
use crate::pointset::{LinkageBuilder, LinkedPointSet, PointSetCache, PointSetError};
use crate::propagation::propagate;
use crate::request::{dominant_street_mode, AnalysisRequest, Mode};
use crate::response::{ReducerOutput, TravelTimeReducer};
use crate::street::{RoutingVariable, SearchLimit, StreetMode, StreetSearch};
use crate::time::{seconds_of_day, UNREACHED};
use crate::transit_data::{ServiceSet, TransitData};

/// Walk access searches are distance-limited to this radius.
pub const MAX_WALK_DISTANCE_METERS: u32 = 2000;

/// Everything shared and read-only a computation routes against.
pub struct TransportNetwork {
    pub transit: TransitData,
    pub street: Box<dyn StreetSearch + Send + Sync>,
    /// Service calendar codes active for the analysis date.
    pub services: ServiceSet,
}

#[derive(Debug)]
pub enum ComputeError {
    PointSet(PointSetError),
    BadRequest(String),
}

impl fmt::Display for ComputeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComputeError::PointSet(err) => write!(f, "point set load failed : {}", err),
            ComputeError::BadRequest(detail) => write!(f, "bad request : {}", detail),
        }
    }
}

impl std::error::Error for ComputeError {}

impl From<PointSetError> for ComputeError {
    fn from(err: PointSetError) -> Self {
        ComputeError::PointSet(err)
    }
}

/// Output of the access stage, consumed by the transit stage.
struct AccessSearchOutput {
    /// One leg per transit stop reachable from the origin, with the time
    /// to reach it.
    access_legs: Vec<TransferLeg>,
    /// Travel time per destination cell without using transit.
    non_transit_times: Vec<u32>,
}

/// Computes travel times from one origin to every cell of a destination
/// point set : street access search, range-raptor transit search, then
/// propagation to the cells, as three explicit stages chained by ordinary
/// calls with typed outputs.
pub struct TravelTimeComputer<'a> {
    request: &'a AnalysisRequest,
    network: &'a TransportNetwork,
    pointsets: &'a PointSetCache,
    linkages: &'a dyn LinkageBuilder,
}

impl<'a> TravelTimeComputer<'a> {
    pub fn new(
        request: &'a AnalysisRequest,
        network: &'a TransportNetwork,
        pointsets: &'a PointSetCache,
        linkages: &'a dyn LinkageBuilder,
    ) -> Self {
        Self {
            request,
            network,
            pointsets,
            linkages,
        }
    }

    pub fn compute(&self) -> Result<ReducerOutput, ComputeError> {
        let request = self.request;
        let access_mode = dominant_street_mode(&request.access_modes);
        let direct_mode = dominant_street_mode(&request.direct_modes);

        let destinations = self.pointsets.get(&request.destination_point_set_key)?;
        let mut reducer = request.build_reducer(Arc::clone(&destinations));

        if !request.has_transit() {
            let linked = self.linkages.link(&destinations, direct_mode);
            self.compute_without_transit(direct_mode, &linked, &mut reducer);
            return Ok(reducer.finish());
        }

        // egress from transit is always on foot, so the destinations may
        // need two distinct linkages
        let linked_access = self.linkages.link(&destinations, access_mode);
        let linked_egress = self.linkages.link(&destinations, StreetMode::Walk);

        if direct_mode != access_mode {
            warn!("disparate direct modes and access modes are not supported, continuing with the access mode");
        }

        let access = self.access_stage(access_mode, &linked_access);
        debug!(
            "access search reached {} stops",
            access.access_legs.len()
        );
        let transit_times = self.transit_stage(&access.access_legs);
        propagate(
            &transit_times,
            &access.non_transit_times,
            &linked_egress,
            &mut reducer,
        );
        Ok(reducer.finish())
    }

    /// Street-only search : one duration-optimizing search from the
    /// origin, evaluated against the linked destinations. An origin with
    /// no street connectivity yields all-`UNREACHED`, never an error.
    fn compute_without_transit(
        &self,
        direct_mode: StreetMode,
        linked: &LinkedPointSet,
        reducer: &mut TravelTimeReducer,
    ) {
        let request = self.request;
        let result = self.network.street.route(
            request.origin(),
            direct_mode,
            RoutingVariable::DurationSeconds,
            SearchLimit::Seconds(request.max_trip_duration.total_seconds()),
        );
        let speed = request.speed_millimeters_per_second(direct_mode);
        let times = linked.eval(|vertex| result.value_at_vertex(vertex), speed);
        for (cell, time) in times.iter().enumerate() {
            reducer.accept(cell, &[*time]);
        }
    }

    /// Access sub-cases on the access mode : park-and-ride, walk
    /// (distance-optimized for symmetry with the precomputed egress
    /// tables), or duration-optimized for the remaining modes.
    fn access_stage(&self, access_mode: StreetMode, linked: &LinkedPointSet) -> AccessSearchOutput {
        let request = self.request;
        let street = self.network.street.as_ref();
        let speed = request.speed_millimeters_per_second(access_mode);

        if request.access_modes.contains(&Mode::CarPark) {
            // park-and-ride implies no valid non-transit path
            let non_transit_times = vec![UNREACHED; linked.len()];
            let access_legs = match street
                .park_ride_access(request.origin(), request.max_car_park_time.total_seconds())
            {
                None => {
                    debug!("no parking facility reachable from the origin");
                    Vec::new()
                }
                Some(result) => result
                    .reached_stops()
                    .iter()
                    .map(|(stop, seconds)| TransferLeg {
                        stop: *stop,
                        duration: *seconds,
                    })
                    .collect(),
            };
            return AccessSearchOutput {
                access_legs,
                non_transit_times,
            };
        }

        if access_mode == StreetMode::Walk {
            // distances divided by speed, to match how egress tables are
            // precomputed
            let result = street.route(
                request.origin(),
                StreetMode::Walk,
                RoutingVariable::DistanceMillimeters,
                SearchLimit::Millimeters(MAX_WALK_DISTANCE_METERS * 1000),
            );
            let access_legs = result
                .reached_stops()
                .iter()
                .map(|(stop, millimeters)| TransferLeg {
                    stop: *stop,
                    duration: millimeters / speed,
                })
                .collect();
            let non_transit_times = linked.eval(
                |vertex| result.value_at_vertex(vertex).map(|mm| mm / speed),
                speed,
            );
            return AccessSearchOutput {
                access_legs,
                non_transit_times,
            };
        }

        // other modes are already asymmetric with the egress tables, so a
        // plain time-bounded search is enough
        let result = street.route(
            request.origin(),
            access_mode,
            RoutingVariable::DurationSeconds,
            SearchLimit::Seconds(request.max_access_time_for_mode(access_mode).total_seconds()),
        );
        let access_legs = result
            .reached_stops()
            .iter()
            .map(|(stop, seconds)| TransferLeg {
                stop: *stop,
                duration: *seconds,
            })
            .collect();
        let non_transit_times = linked.eval(|vertex| result.value_at_vertex(vertex), speed);
        AccessSearchOutput {
            access_legs,
            non_transit_times,
        }
    }

    fn transit_stage(&self, access_legs: &[TransferLeg]) -> Vec<Vec<u32>> {
        let request = self.request;
        let params = SearchParams {
            departure_time: seconds_of_day(request.departure),
            window: request.window_seconds,
            step: request.step_seconds.max(1),
            max_trip_duration: request.max_trip_duration.total_seconds(),
            nb_of_rounds: request.max_rounds.max(1),
        };
        let mut worker = McRangeRaptorWorker::new(
            &self.network.transit,
            self.network.services.clone(),
            params,
        );
        worker.route(access_legs)
    }
}
