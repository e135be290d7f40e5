use std::collections::HashMap;

use tracing::debug;

use super::arrivals::{ArrivalId, TransferLeg};
use super::cost::{CostCalculator, TransitCalculator};
use super::worker_state::McRaptorState;
use crate::time::UNREACHED;
use crate::transit_data::{ServiceSet, TransitData};

/// Handle on one trip of one pattern, cheap to copy around the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripRef {
    pub pattern: usize,
    pub trip: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct SearchParams {
    /// Earliest departure of the range, in seconds since the service day start.
    pub departure_time: u32,
    /// Width of the departure-time range. Zero means a single iteration.
    pub window: u32,
    /// Spacing between two departure-time iterations.
    pub step: u32,
    pub max_trip_duration: u32,
    /// Maximum number of rounds, roughly max transfers + 1.
    pub nb_of_rounds: usize,
}

impl SearchParams {
    pub fn single_departure(departure_time: u32, max_trip_duration: u32, nb_of_rounds: usize) -> Self {
        Self {
            departure_time,
            window: 0,
            step: 60,
            max_trip_duration,
            nb_of_rounds,
        }
    }

    pub fn nb_of_iterations(&self) -> usize {
        (self.window / self.step) as usize + 1
    }
}

struct Onboard {
    trip: usize,
    board_time: u32,
    board_position: usize,
    prev: ArrivalId,
}

/// Drives the round-based search over a range of departure times.
///
/// Each departure-time iteration resets the state, seeds it with the
/// access legs, then alternates the board/ride phase and the transfer
/// phase until the state reports no new round.
pub struct McRangeRaptorWorker<'data> {
    data: &'data TransitData,
    services: ServiceSet,
    params: SearchParams,
    state: McRaptorState<TripRef>,
}

impl<'data> McRangeRaptorWorker<'data> {
    pub fn new(data: &'data TransitData, services: ServiceSet, params: SearchParams) -> Self {
        let state = McRaptorState::new(
            params.nb_of_rounds,
            data.nb_of_stops(),
            CostCalculator::default(),
            TransitCalculator::new(params.departure_time, params.max_trip_duration),
        );
        Self {
            data,
            services,
            params,
            state,
        }
    }

    /// Runs every departure-time iteration, latest first, and returns the
    /// best transit travel time per stop for each iteration (indexed by
    /// ascending departure time). `UNREACHED` marks stops without a
    /// transit path.
    pub fn route(&mut self, access_legs: &[TransferLeg]) -> Vec<Vec<u32>> {
        let nb_of_iterations = self.params.nb_of_iterations();
        let mut results = vec![Vec::new(); nb_of_iterations];
        for iteration in (0..nb_of_iterations).rev() {
            let departure_time = self.params.departure_time + iteration as u32 * self.params.step;
            self.run_iteration(departure_time, access_legs);
            results[iteration] = self.harvest(departure_time);
        }
        debug!(
            "range raptor done : {} iterations over {} stops",
            nb_of_iterations,
            self.data.nb_of_stops()
        );
        results
    }

    /// State of the last iteration run, for path reconstruction.
    pub fn state(&self) -> &McRaptorState<TripRef> {
        &self.state
    }

    fn run_iteration(&mut self, departure_time: u32, access_legs: &[TransferLeg]) {
        self.state.setup_iteration(TransitCalculator::new(
            departure_time,
            self.params.max_trip_duration,
        ));
        for access_leg in access_legs {
            self.state
                .set_initial_time_for_iteration(access_leg, departure_time);
        }
        while self.state.is_new_round_available() {
            self.state.prepare_for_next_round();
            self.ride_transit();
            self.state.transits_for_round_complete();
            self.do_transfers();
            self.state.transfers_for_round_complete();
        }
    }

    /// Boards the patterns reachable from the stops touched in the
    /// previous round, entering each pattern at its earliest touched
    /// position, and alights along the way.
    fn ride_transit(&mut self) {
        let mut patterns_to_ride: HashMap<usize, usize> = HashMap::new();
        for stop in self.state.stops_touched_previous_round() {
            for &(pattern, position) in self.data.patterns_at(stop) {
                patterns_to_ride
                    .entry(pattern)
                    .and_modify(|first| *first = (*first).min(position))
                    .or_insert(position);
            }
        }
        for (&pattern_idx, &first_position) in &patterns_to_ride {
            Self::ride_pattern(
                self.data,
                &self.services,
                &mut self.state,
                pattern_idx,
                first_position,
            );
        }
    }

    fn ride_pattern(
        data: &TransitData,
        services: &ServiceSet,
        state: &mut McRaptorState<TripRef>,
        pattern_idx: usize,
        first_position: usize,
    ) {
        let pattern = data.pattern(pattern_idx);
        let mut onboard: Vec<Onboard> = Vec::new();

        for position in first_position..pattern.nb_of_positions() {
            let stop = pattern.stops[position];

            if pattern.dropoffs[position].allows_alighting() {
                for entry in &onboard {
                    if entry.board_position >= position {
                        continue;
                    }
                    let schedule = &pattern.trip_schedules[entry.trip];
                    let ride_duration =
                        schedule.arrivals[position] - schedule.departures[entry.board_position];
                    state.transit_to_stop(
                        entry.prev,
                        stop,
                        entry.board_time + ride_duration,
                        entry.board_time,
                        TripRef {
                            pattern: pattern_idx,
                            trip: entry.trip,
                        },
                    );
                }
            }

            let last_position = position + 1 == pattern.nb_of_positions();
            if last_position || !pattern.pickups[position].allows_boarding() {
                continue;
            }

            let candidates: Vec<(ArrivalId, u32, u32)> = state
                .list_arrivals_after_mark(stop)
                .map(|(id, arrival)| (id, arrival.arrival_time, arrival.cost))
                .collect();
            for (prev, arrival_time, prev_cost) in candidates {
                let Some((trip, board_time)) =
                    pattern.find_next_departure(arrival_time, position, services)
                else {
                    continue;
                };
                // avoid re-boarding the same trip when a cheaper or
                // earlier boarding of it is already onboard
                let redundant = onboard.iter().any(|entry| {
                    entry.trip == trip
                        && entry.board_time <= board_time
                        && state.arrival(entry.prev).cost <= prev_cost
                });
                if !redundant {
                    onboard.push(Onboard {
                        trip,
                        board_time,
                        board_position: position,
                        prev,
                    });
                }
            }
        }
    }

    fn do_transfers(&mut self) {
        let data = self.data;
        let touched: Vec<usize> = self.state.stops_touched_by_transit_current_round().collect();
        for stop in touched {
            let transfers = data.transfers_at(stop).iter().map(|transfer| TransferLeg {
                stop: transfer.to_stop,
                duration: transfer.duration,
            });
            self.state.transfer_to_stops(stop, transfers);
        }
    }

    fn harvest(&self, departure_time: u32) -> Vec<u32> {
        let mut times = vec![UNREACHED; self.data.nb_of_stops()];
        for (stop, time) in times.iter_mut().enumerate() {
            if let Some(arrival) = self.state.best_arrival_time(stop) {
                *time = arrival.saturating_sub(departure_time);
            }
        }
        times
    }
}
