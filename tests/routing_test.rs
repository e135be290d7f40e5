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

use gridreach::engine::{McRangeRaptorWorker, SearchParams, TransferLeg};
use gridreach::transit_data::PickDropType;
use gridreach::UNREACHED;
use utils::{service, time, NetworkBuilder};

#[test]
fn one_ride_on_one_pattern() {
    let _log_guard = gridreach::logger::init_test_logger();
    let data = NetworkBuilder::new(3)
        .pattern(&[0, 1, 2])
        .trip("vj:1", 0, &["10:00:00", "10:05:00", "10:10:00"])
        .done()
        .build();

    let params = SearchParams::single_departure(time("09:50:00"), 7200, 2);
    let mut worker = McRangeRaptorWorker::new(&data, service(&[0]), params);
    let results = worker.route(&[TransferLeg {
        stop: 0,
        duration: 60,
    }]);

    assert_eq!(results.len(), 1);
    assert_eq!(results[0], vec![60, 900, 1200]);
}

#[test]
fn inactive_service_is_not_boarded() {
    let _log_guard = gridreach::logger::init_test_logger();
    let data = NetworkBuilder::new(3)
        .pattern(&[0, 1, 2])
        .trip("vj:1", 0, &["10:00:00", "10:05:00", "10:10:00"])
        .done()
        .build();

    let params = SearchParams::single_departure(time("09:50:00"), 7200, 2);
    let mut worker = McRangeRaptorWorker::new(&data, service(&[1]), params);
    let results = worker.route(&[TransferLeg {
        stop: 0,
        duration: 60,
    }]);

    assert_eq!(results[0], vec![60, UNREACHED, UNREACHED]);
}

#[test]
fn transfer_connects_two_patterns() {
    let _log_guard = gridreach::logger::init_test_logger();
    let data = NetworkBuilder::new(4)
        .pattern(&[0, 1])
        .trip("vj:red", 0, &["10:00:00", "10:10:00"])
        .done()
        .pattern(&[2, 3])
        .trip("vj:blue", 0, &["10:15:00", "10:25:00"])
        .done()
        .transfer(1, 2, 120)
        .build();

    let params = SearchParams::single_departure(time("09:55:00"), 7200, 3);
    let mut worker = McRangeRaptorWorker::new(&data, service(&[0]), params);
    let results = worker.route(&[TransferLeg {
        stop: 0,
        duration: 0,
    }]);

    // alight red at 10:10, transfer until 10:12, board blue at 10:15
    assert_eq!(results[0][3], time("10:25:00") - time("09:55:00"));

    let journey = worker
        .state()
        .extract_paths()
        .into_iter()
        .find(|path| path.final_stop == 3)
        .expect("a journey to the last stop");
    assert_eq!(journey.nb_of_transit_legs(), 2);
    assert_eq!(journey.legs.len(), 3);
    assert_eq!(journey.arrival_time, time("10:25:00"));
}

#[test]
fn forbidden_pickup_prevents_boarding() {
    let _log_guard = gridreach::logger::init_test_logger();
    let data = NetworkBuilder::new(2)
        .pattern_with_policy(&[
            (0, PickDropType::None, PickDropType::Scheduled),
            (1, PickDropType::Scheduled, PickDropType::Scheduled),
        ])
        .trip("vj:1", 0, &["10:00:00", "10:10:00"])
        .done()
        .build();

    let params = SearchParams::single_departure(time("09:50:00"), 7200, 2);
    let mut worker = McRangeRaptorWorker::new(&data, service(&[0]), params);
    let results = worker.route(&[TransferLeg {
        stop: 0,
        duration: 0,
    }]);

    assert_eq!(results[0][1], UNREACHED);
}

#[test]
fn range_iterations_board_strictly_later_departures() {
    let _log_guard = gridreach::logger::init_test_logger();
    let data = NetworkBuilder::new(2)
        .pattern(&[0, 1])
        .trip("vj:first", 0, &["10:00:00", "10:10:00"])
        .trip("vj:second", 0, &["10:20:00", "10:30:00"])
        .done()
        .build();

    let params = SearchParams {
        departure_time: time("09:50:00"),
        window: 1200,
        step: 600,
        max_trip_duration: 7200,
        nb_of_rounds: 2,
    };
    let mut worker = McRangeRaptorWorker::new(&data, service(&[0]), params);
    let results = worker.route(&[TransferLeg {
        stop: 0,
        duration: 0,
    }]);

    assert_eq!(results.len(), 3);
    // departing at 10:00:00 sharp misses the 10:00:00 run
    assert_eq!(results[0][1], 1200);
    assert_eq!(results[1][1], 1800);
    assert_eq!(results[2][1], 1200);
}

#[test]
fn frequency_trip_waits_a_full_headway() {
    let _log_guard = gridreach::logger::init_test_logger();
    let data = NetworkBuilder::new(2)
        .pattern(&[0, 1])
        .frequency_trip("vj:shuttle", 0, &[0, 600], 300, "10:00:00", "11:00:00")
        .done()
        .build();

    let params = SearchParams::single_departure(time("10:10:00"), 7200, 2);
    let mut worker = McRangeRaptorWorker::new(&data, service(&[0]), params);
    let results = worker.route(&[TransferLeg {
        stop: 0,
        duration: 0,
    }]);

    // worst-case headway wait of 300s, then a 600s ride
    assert_eq!(results[0][1], 900);
}

#[test]
fn no_access_legs_reach_nothing() {
    let _log_guard = gridreach::logger::init_test_logger();
    let data = NetworkBuilder::new(2)
        .pattern(&[0, 1])
        .trip("vj:1", 0, &["10:00:00", "10:10:00"])
        .done()
        .build();

    let params = SearchParams::single_departure(time("09:50:00"), 7200, 3);
    let mut worker = McRangeRaptorWorker::new(&data, service(&[0]), params);
    let results = worker.route(&[]);

    assert_eq!(results[0], vec![UNREACHED, UNREACHED]);
}
