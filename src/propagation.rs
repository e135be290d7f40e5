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

use crate::pointset::LinkedPointSet;
use crate::response::TravelTimeReducer;
use crate::time::{clamp_add, UNREACHED};

/// Hard ceiling on any propagated travel time.
pub const MAX_TRAVEL_TIME_SECONDS: u32 = 120 * 60;

/// Combines per-stop transit arrival times with the non-transit baseline
/// into one value per destination cell, per departure-time iteration.
///
/// For each cell the value is the minimum of the baseline and, over the
/// stops of the cell's egress table, stop arrival + egress walk. Values
/// beyond `MAX_TRAVEL_TIME_SECONDS` degrade to `UNREACHED`. The same
/// code path serves one or many iterations.
pub fn propagate(
    transit_times_per_iteration: &[Vec<u32>],
    non_transit_times: &[u32],
    egress_linkage: &LinkedPointSet,
    reducer: &mut TravelTimeReducer,
) {
    let nb_of_cells = egress_linkage.len();
    debug_assert_eq!(non_transit_times.len(), nb_of_cells);

    let mut values = Vec::with_capacity(transit_times_per_iteration.len().max(1));
    for cell in 0..nb_of_cells {
        values.clear();
        if transit_times_per_iteration.is_empty() {
            values.push(clamp_to_cutoff(non_transit_times[cell]));
        } else {
            for stop_times in transit_times_per_iteration {
                let mut best = non_transit_times[cell];
                for (stop, egress_walk) in egress_linkage.egress_stops(cell) {
                    best = best.min(clamp_add(stop_times[*stop], *egress_walk));
                }
                values.push(clamp_to_cutoff(best));
            }
        }
        reducer.accept(cell, &values);
    }
}

fn clamp_to_cutoff(time: u32) -> u32 {
    if time > MAX_TRAVEL_TIME_SECONDS {
        UNREACHED
    } else {
        time
    }
}
