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

mod utils;

use std::collections::HashMap;

use gridreach::chrono::NaiveDate;
use gridreach::pointset::PointSetError;
use gridreach::request::{Mode, ReducerKind, TransitMode};
use gridreach::response::ReducerOutput;
use gridreach::time::PositiveDuration;
use gridreach::travel_time::{ComputeError, TravelTimeComputer};
use gridreach::{
    AnalysisRequest, PointSetCache, TransportNetwork, TravelTimeReducer, UNREACHED,
};
use utils::{service, MemoryStore, NetworkBuilder, StubLinkageBuilder, StubStreetSearch};

const DESTINATIONS: &str = "jobs.grid";

fn base_request(
    access_modes: Vec<Mode>,
    direct_modes: Vec<Mode>,
    transit_modes: Vec<TransitMode>,
) -> AnalysisRequest {
    AnalysisRequest {
        from_lat: 48.85,
        from_lon: 2.35,
        access_modes,
        direct_modes,
        transit_modes,
        departure: NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(9, 50, 0)
            .unwrap(),
        window_seconds: 0,
        step_seconds: 60,
        max_trip_duration: PositiveDuration::from_hms(2, 0, 0),
        max_rounds: 3,
        destination_point_set_key: DESTINATIONS.to_string(),
        percentiles: vec![50],
        reducer: ReducerKind::Surface,
        walk_speed_meters_per_second: 1.3,
        bicycle_speed_meters_per_second: 4.0,
        car_speed_meters_per_second: 20.0,
        max_access_time: PositiveDuration::from_hms(0, 30, 0),
        max_car_park_time: PositiveDuration::from_hms(0, 30, 0),
    }
}

fn network(street: StubStreetSearch) -> TransportNetwork {
    let transit = NetworkBuilder::new(2)
        .pattern(&[0, 1])
        .trip("vj:1", 0, &["10:00:00", "10:10:00"])
        .done()
        .build();
    TransportNetwork {
        transit,
        street: Box::new(street),
        services: service(&[0]),
    }
}

fn one_cell_cache() -> PointSetCache {
    PointSetCache::new(Box::new(
        MemoryStore::new().with_grid(DESTINATIONS, 1, 1, &[5.0]),
    ))
}

fn surface_values(output: ReducerOutput) -> Vec<Vec<u32>> {
    match output {
        ReducerOutput::Surface { values, .. } => values,
        _ => panic!("expected a surface output"),
    }
}

#[test]
fn walk_access_transit_and_egress_end_to_end() {
    let _log_guard = gridreach::logger::init_test_logger();
    let request = base_request(vec![Mode::Walk], vec![Mode::Walk], vec![TransitMode::Bus]);
    // 130 meters of walking at 1.3 m/s, so boarding stop 0 takes 100s
    let network = network(StubStreetSearch {
        stops_by_distance: HashMap::from([(0, 130_000)]),
        ..Default::default()
    });
    let cache = one_cell_cache();
    // the single destination cell is a 300s walk from stop 1
    let linkages = StubLinkageBuilder::simple(1, vec![vec![(1, 300)]]);

    let output = TravelTimeComputer::new(&request, &network, &cache, &linkages)
        .compute()
        .unwrap();
    // depart 09:50, alight at 10:10, walk 300s
    assert_eq!(surface_values(output), vec![vec![1500]]);
}

#[test]
fn origin_without_street_connectivity_is_not_an_error() {
    let _log_guard = gridreach::logger::init_test_logger();
    let request = base_request(vec![Mode::Walk], vec![Mode::Walk], vec![]);
    let network = network(StubStreetSearch::default());
    let cache = one_cell_cache();
    let linkages = StubLinkageBuilder::simple(1, vec![vec![]]);

    let output = TravelTimeComputer::new(&request, &network, &cache, &linkages)
        .compute()
        .unwrap();
    assert_eq!(surface_values(output), vec![vec![UNREACHED]]);
}

#[test]
fn direct_street_search_without_transit() {
    let _log_guard = gridreach::logger::init_test_logger();
    let request = base_request(vec![Mode::Walk], vec![Mode::Walk], vec![]);
    let network = network(StubStreetSearch {
        vertices_by_duration: HashMap::from([(0, 600)]),
        ..Default::default()
    });
    let cache = one_cell_cache();
    let linkages = StubLinkageBuilder::simple(1, vec![vec![]]);

    let output = TravelTimeComputer::new(&request, &network, &cache, &linkages)
        .compute()
        .unwrap();
    assert_eq!(surface_values(output), vec![vec![600]]);
}

#[test]
fn park_and_ride_without_a_parking_facility_degrades_to_unreached() {
    let _log_guard = gridreach::logger::init_test_logger();
    let request = base_request(
        vec![Mode::CarPark],
        vec![Mode::CarPark],
        vec![TransitMode::Bus],
    );
    let network = network(StubStreetSearch {
        park_ride_stops: None,
        ..Default::default()
    });
    let cache = one_cell_cache();
    let linkages = StubLinkageBuilder::simple(1, vec![vec![(1, 300)]]);

    let output = TravelTimeComputer::new(&request, &network, &cache, &linkages)
        .compute()
        .unwrap();
    assert_eq!(surface_values(output), vec![vec![UNREACHED]]);
}

#[test]
fn park_and_ride_boards_from_the_parking_walk() {
    let _log_guard = gridreach::logger::init_test_logger();
    let request = base_request(
        vec![Mode::CarPark],
        vec![Mode::CarPark],
        vec![TransitMode::Bus],
    );
    let network = network(StubStreetSearch {
        park_ride_stops: Some(HashMap::from([(0, 200)])),
        ..Default::default()
    });
    let cache = one_cell_cache();
    let linkages = StubLinkageBuilder::simple(1, vec![vec![(1, 300)]]);

    let output = TravelTimeComputer::new(&request, &network, &cache, &linkages)
        .compute()
        .unwrap();
    assert_eq!(surface_values(output), vec![vec![1500]]);
}

#[test]
fn disparate_direct_and_access_modes_still_compute() {
    let _log_guard = gridreach::logger::init_test_logger();
    let request = base_request(vec![Mode::Walk], vec![Mode::Bicycle], vec![TransitMode::Bus]);
    let network = network(StubStreetSearch {
        stops_by_distance: HashMap::from([(0, 130_000)]),
        ..Default::default()
    });
    let cache = one_cell_cache();
    let linkages = StubLinkageBuilder::simple(1, vec![vec![(1, 300)]]);

    let output = TravelTimeComputer::new(&request, &network, &cache, &linkages)
        .compute()
        .unwrap();
    assert_eq!(surface_values(output), vec![vec![1500]]);
}

#[test]
fn equivalent_mode_sets_in_any_order_compute() {
    let _log_guard = gridreach::logger::init_test_logger();
    // same mode sets, permuted ; both sides resolve to bicycle
    let request = base_request(
        vec![Mode::Walk, Mode::Bicycle],
        vec![Mode::Bicycle, Mode::Walk],
        vec![TransitMode::Bus],
    );
    let network = network(StubStreetSearch {
        stops_by_duration: HashMap::from([(0, 100)]),
        ..Default::default()
    });
    let cache = one_cell_cache();
    let linkages = StubLinkageBuilder::simple(1, vec![vec![(1, 300)]]);

    let output = TravelTimeComputer::new(&request, &network, &cache, &linkages)
        .compute()
        .unwrap();
    assert_eq!(surface_values(output), vec![vec![1500]]);
}

#[test]
fn accessibility_counts_opportunities_within_the_cutoff() {
    let _log_guard = gridreach::logger::init_test_logger();
    let mut request = base_request(vec![Mode::Walk], vec![Mode::Walk], vec![]);
    request.destination_point_set_key = "two_cells.grid".to_string();
    request.reducer = ReducerKind::Accessibility { cutoff_seconds: 600 };
    let network = network(StubStreetSearch {
        vertices_by_duration: HashMap::from([(0, 500), (1, 700)]),
        ..Default::default()
    });
    let cache = PointSetCache::new(Box::new(
        MemoryStore::new().with_grid("two_cells.grid", 2, 1, &[3.0, 4.0]),
    ));
    let linkages = StubLinkageBuilder::simple(2, vec![vec![], vec![]]);

    let output = TravelTimeComputer::new(&request, &network, &cache, &linkages)
        .compute()
        .unwrap();
    // only the first cell makes the 600s cutoff
    assert_eq!(output, ReducerOutput::Accessibility { total: 3.0 });
}

#[test]
fn missing_destination_set_fails_the_request() {
    let _log_guard = gridreach::logger::init_test_logger();
    let mut request = base_request(vec![Mode::Walk], vec![Mode::Walk], vec![]);
    request.destination_point_set_key = "nope.grid".to_string();
    let network = network(StubStreetSearch::default());
    let cache = one_cell_cache();
    let linkages = StubLinkageBuilder::simple(1, vec![vec![]]);

    let result = TravelTimeComputer::new(&request, &network, &cache, &linkages).compute();
    assert!(matches!(
        result,
        Err(ComputeError::PointSet(PointSetError::NotFound(_)))
    ));
}

#[test]
fn reducer_selection_follows_the_request() {
    let destinations = one_cell_cache().get(DESTINATIONS).unwrap();
    let request = base_request(vec![Mode::Walk], vec![Mode::Walk], vec![]);
    assert!(matches!(
        request.build_reducer(destinations),
        TravelTimeReducer::Surface(_)
    ));
}
