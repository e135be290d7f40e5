/// A walk leg between the street network and a stop, or between two stops.
/// Used for access legs seeding an iteration as well as for transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferLeg {
    pub stop: usize,
    pub duration: u32,
}

/// Slot identifier of an arrival inside the iteration's arena.
///
/// Predecessor links are expressed with these ids rather than references,
/// so that the whole arena can be cleared between iterations without any
/// dangling-reference hazard. An arrival may only reference an id created
/// before its own, which makes predecessor chains acyclic by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrivalId(pub(crate) usize);

#[derive(Debug, Clone)]
pub enum ArrivalKind<T> {
    /// Initial arrival at a stop through an access leg.
    Access { duration: u32 },
    /// Arrival by riding `trip`, boarded at `board_time` from `prev`.
    Transit {
        prev: ArrivalId,
        board_time: u32,
        trip: T,
    },
    /// Arrival by walking a transfer leg from `prev`.
    Transfer { prev: ArrivalId, duration: u32 },
}

/// One Pareto-optimal way of reaching a stop.
#[derive(Debug, Clone)]
pub struct StopArrival<T> {
    pub stop: usize,
    pub arrival_time: u32,
    /// Accumulated generalized cost since the access leg.
    pub cost: u32,
    pub kind: ArrivalKind<T>,
}

impl<T> StopArrival<T> {
    pub fn prev(&self) -> Option<ArrivalId> {
        match &self.kind {
            ArrivalKind::Access { .. } => None,
            ArrivalKind::Transit { prev, .. } => Some(*prev),
            ArrivalKind::Transfer { prev, .. } => Some(*prev),
        }
    }
}

/// Arena owning every arrival committed during one iteration.
pub struct ArrivalArena<T> {
    arrivals: Vec<StopArrival<T>>,
}

impl<T> ArrivalArena<T> {
    pub fn new() -> Self {
        Self {
            arrivals: Vec::new(),
        }
    }

    pub fn add(&mut self, arrival: StopArrival<T>) -> ArrivalId {
        let id = ArrivalId(self.arrivals.len());
        self.arrivals.push(arrival);
        id
    }

    pub fn get(&self, id: ArrivalId) -> &StopArrival<T> {
        &self.arrivals[id.0]
    }

    pub fn clear(&mut self) {
        self.arrivals.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.arrivals.is_empty()
    }
}

impl<T> Default for ArrivalArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
