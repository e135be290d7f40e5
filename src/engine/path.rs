use super::arrivals::{ArrivalArena, ArrivalId, ArrivalKind, TransferLeg};

/// One leg of a reconstructed journey, in travel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathLeg<T> {
    Transit {
        trip: T,
        board_time: u32,
        alight_stop: usize,
        alight_time: u32,
    },
    Transfer {
        to_stop: usize,
        duration: u32,
        arrival_time: u32,
    },
}

/// A journey reconstructed from the arrival arena : the access leg that
/// started it, then the transit and transfer legs in travel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path<T> {
    pub access: TransferLeg,
    pub legs: Vec<PathLeg<T>>,
    pub final_stop: usize,
    pub arrival_time: u32,
    pub cost: u32,
}

impl<T: Clone> Path<T> {
    /// Walks the predecessor chain of `id` back to its access-leg root.
    pub(crate) fn from_arrival(arena: &ArrivalArena<T>, id: ArrivalId) -> Self {
        let last = arena.get(id);
        let final_stop = last.stop;
        let arrival_time = last.arrival_time;
        let cost = last.cost;

        let mut legs = Vec::new();
        let mut current = id;
        let access = loop {
            let arrival = arena.get(current);
            match &arrival.kind {
                ArrivalKind::Access { duration } => {
                    break TransferLeg {
                        stop: arrival.stop,
                        duration: *duration,
                    };
                }
                ArrivalKind::Transit {
                    prev,
                    board_time,
                    trip,
                } => {
                    legs.push(PathLeg::Transit {
                        trip: trip.clone(),
                        board_time: *board_time,
                        alight_stop: arrival.stop,
                        alight_time: arrival.arrival_time,
                    });
                    current = *prev;
                }
                ArrivalKind::Transfer { prev, duration } => {
                    legs.push(PathLeg::Transfer {
                        to_stop: arrival.stop,
                        duration: *duration,
                        arrival_time: arrival.arrival_time,
                    });
                    current = *prev;
                }
            }
        };
        legs.reverse();
        Path {
            access,
            legs,
            final_stop,
            arrival_time,
            cost,
        }
    }

    pub fn nb_of_transit_legs(&self) -> usize {
        self.legs
            .iter()
            .filter(|leg| matches!(leg, PathLeg::Transit { .. }))
            .count()
    }
}
