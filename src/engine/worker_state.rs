use super::arrivals::{ArrivalArena, ArrivalId, ArrivalKind, StopArrival, TransferLeg};
use super::cost::{CostCalculator, TransitCalculator};
use super::pareto_front::{Criteria, ParetoFront};
use super::path::Path;

/// Tracks the state of one multi-criteria range-raptor search : the
/// Pareto-optimal arrivals at each stop, round progression, and which
/// stops changed.
///
/// Kept separate from the round-driving worker so that the algorithm stays
/// readable and the state implementation can be swapped.
///
/// One instance serves one search at a time ; between departure-time
/// iterations on the same thread it is reset with `setup_iteration`
/// rather than rebuilt.
pub struct McRaptorState<T: Clone> {
    nb_of_rounds: usize,
    cost_calculator: CostCalculator,
    transit_calculator: TransitCalculator,

    arena: ArrivalArena<T>,
    fronts: Vec<ParetoFront>,
    /// Candidates of the current round, committed at round boundaries only.
    arrivals_cache: Vec<StopArrival<T>>,

    round: usize,
    updates_exist: bool,
    touched_flags: Vec<bool>,
    touched_stops: Vec<usize>,
}

impl<T: Clone> McRaptorState<T> {
    pub fn new(
        nb_of_rounds: usize,
        nb_of_stops: usize,
        cost_calculator: CostCalculator,
        transit_calculator: TransitCalculator,
    ) -> Self {
        debug_assert!(nb_of_rounds >= 1);
        Self {
            nb_of_rounds,
            cost_calculator,
            transit_calculator,
            arena: ArrivalArena::new(),
            fronts: vec![ParetoFront::new(); nb_of_stops],
            arrivals_cache: Vec::new(),
            round: 0,
            updates_exist: false,
            touched_flags: vec![false; nb_of_stops],
            touched_stops: Vec::new(),
        }
    }

    pub fn nb_of_stops(&self) -> usize {
        self.fronts.len()
    }

    pub fn round(&self) -> usize {
        self.round
    }

    /// Resets everything for a new departure-time iteration.
    /// Must be called before any other operation of the iteration.
    pub fn setup_iteration(&mut self, new_transit_calculator: TransitCalculator) {
        self.round = 0;
        self.arrivals_cache.clear();
        self.arena.clear();
        for front in &mut self.fronts {
            front.clear();
        }
        self.transit_calculator = new_transit_calculator;
        self.start_record_changes();
    }

    /// Seeds the front at the access leg's stop. May be called several
    /// times before routing begins, once per access leg.
    pub fn set_initial_time_for_iteration(&mut self, access_leg: &TransferLeg, departure_time: u32) {
        let cost = self.cost_calculator.walk_cost(access_leg.duration);
        let arrival_time = departure_time.saturating_add(access_leg.duration);
        let criteria = Criteria { arrival_time, cost };
        let front = &mut self.fronts[access_leg.stop];
        if !front.dominates(&criteria) {
            let id = self.arena.add(StopArrival {
                stop: access_leg.stop,
                arrival_time,
                cost,
                kind: ArrivalKind::Access {
                    duration: access_leg.duration,
                },
            });
            front.add(id, criteria);
        }
        self.touch(access_leg.stop);
        self.updates_exist = true;
    }

    /// Sole termination condition of the routing loop, which is driven
    /// externally by iterating while this holds.
    pub fn is_new_round_available(&self) -> bool {
        let more_rounds_to_go = self.round < self.nb_of_rounds - 1;
        more_rounds_to_go && self.updates_exist
    }

    pub fn prepare_for_next_round(&mut self) {
        self.round += 1;
    }

    /// Stops whose front changed during the previous round.
    ///
    /// Draws from the same underlying touched-set as
    /// `stops_touched_by_transit_current_round` ; the set is re-armed by
    /// `transits_for_round_complete`, not by reading it.
    pub fn stops_touched_previous_round(&self) -> impl Iterator<Item = usize> + '_ {
        self.touched_stops.iter().copied()
    }

    pub fn stops_touched_by_transit_current_round(&self) -> impl Iterator<Item = usize> + '_ {
        self.touched_stops.iter().copied()
    }

    /// Arrivals committed at `stop` since the last round boundary.
    pub fn list_arrivals_after_mark(
        &self,
        stop: usize,
    ) -> impl Iterator<Item = (ArrivalId, &StopArrival<T>)> {
        self.fronts[stop]
            .iter_since_mark()
            .map(|(id, _)| (*id, self.arena.get(*id)))
    }

    pub fn arrival(&self, id: ArrivalId) -> &StopArrival<T> {
        self.arena.get(id)
    }

    /// Records a candidate transit arrival at `stop`. Arrivals beyond the
    /// search's time cutoff are silently discarded. The committed front is
    /// not touched here ; commit happens at the round boundary.
    pub fn transit_to_stop(
        &mut self,
        prev: ArrivalId,
        stop: usize,
        alight_time: u32,
        board_time: u32,
        trip: T,
    ) {
        if self.transit_calculator.exceeds_time_limit(alight_time) {
            return;
        }
        let previous = self.arena.get(prev);
        let cost = previous.cost
            + self
                .cost_calculator
                .transit_arrival_cost(previous.arrival_time, board_time, alight_time);
        self.arrivals_cache.push(StopArrival {
            stop,
            arrival_time: alight_time,
            cost,
            kind: ArrivalKind::Transit {
                prev,
                board_time,
                trip,
            },
        });
    }

    /// Records candidate transfer arrivals from every arrival committed at
    /// `from_stop` during the current round, one per transfer leg.
    pub fn transfer_to_stops(
        &mut self,
        from_stop: usize,
        transfers: impl IntoIterator<Item = TransferLeg>,
    ) {
        let arena = &self.arena;
        let front = &self.fronts[from_stop];
        let cost_calculator = &self.cost_calculator;
        let transit_calculator = &self.transit_calculator;
        let cache = &mut self.arrivals_cache;

        for transfer in transfers {
            for (prev, _) in front.iter_since_mark() {
                let previous = arena.get(*prev);
                let arrival_time = previous.arrival_time.saturating_add(transfer.duration);
                if transit_calculator.exceeds_time_limit(arrival_time) {
                    continue;
                }
                let cost = previous.cost + cost_calculator.walk_cost(transfer.duration);
                cache.push(StopArrival {
                    stop: transfer.stop,
                    arrival_time,
                    cost,
                    kind: ArrivalKind::Transfer {
                        prev: *prev,
                        duration: transfer.duration,
                    },
                });
            }
        }
    }

    /// Closes the transit phase of the round : re-arms touched-stop
    /// tracking, then commits the cached transit arrivals.
    pub fn transits_for_round_complete(&mut self) {
        self.start_record_changes();
        self.commit_cached_arrivals(CommitKind::Transit);
    }

    /// Closes the transfer phase. Does not re-arm tracking : transfers
    /// run after transit within the same round, and must not erase the
    /// round's touched-stop record before the caller reads it.
    pub fn transfers_for_round_complete(&mut self) {
        self.commit_cached_arrivals(CommitKind::Transfer);
    }

    /// Best retained arrival time at `stop`, or `None` when unreached.
    pub fn best_arrival_time(&self, stop: usize) -> Option<u32> {
        self.fronts[stop]
            .iter()
            .map(|(_, criteria)| criteria.arrival_time)
            .min()
    }

    /// Reconstructs every retained non-dominated path by walking each
    /// retained arrival's predecessor chain back to its access-leg root.
    pub fn extract_paths(&self) -> Vec<Path<T>> {
        let mut paths = Vec::new();
        for front in &self.fronts {
            for (id, _) in front.iter() {
                paths.push(Path::from_arrival(&self.arena, *id));
            }
        }
        paths
    }

    /* private */

    fn start_record_changes(&mut self) {
        for front in &mut self.fronts {
            front.mark();
        }
        for stop in self.touched_stops.drain(..) {
            self.touched_flags[stop] = false;
        }
        self.updates_exist = !self.arrivals_cache.is_empty();
    }

    fn commit_cached_arrivals(&mut self, kind: CommitKind) {
        let cache = std::mem::take(&mut self.arrivals_cache);
        let mut remaining = Vec::new();
        for arrival in cache {
            if CommitKind::of(&arrival) != kind {
                remaining.push(arrival);
                continue;
            }
            let criteria = Criteria {
                arrival_time: arrival.arrival_time,
                cost: arrival.cost,
            };
            let stop = arrival.stop;
            if self.fronts[stop].dominates(&criteria) {
                continue;
            }
            let id = self.arena.add(arrival);
            if self.fronts[stop].add(id, criteria) {
                self.touch(stop);
            }
        }
        self.arrivals_cache = remaining;
    }

    fn touch(&mut self, stop: usize) {
        if !self.touched_flags[stop] {
            self.touched_flags[stop] = true;
            self.touched_stops.push(stop);
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum CommitKind {
    Transit,
    Transfer,
}

impl CommitKind {
    fn of<T>(arrival: &StopArrival<T>) -> Self {
        match arrival.kind {
            ArrivalKind::Transit { .. } => CommitKind::Transit,
            // access arrivals never transit through the cache
            ArrivalKind::Access { .. } | ArrivalKind::Transfer { .. } => CommitKind::Transfer,
        }
    }
}
