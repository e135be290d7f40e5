pub mod arrivals;
pub mod cost;
pub mod pareto_front;
pub mod path;
pub mod worker;
pub mod worker_state;

pub use arrivals::{ArrivalId, ArrivalKind, StopArrival, TransferLeg};
pub use cost::{CostCalculator, TransitCalculator};
pub use pareto_front::{Criteria, ParetoFront};
pub use path::{Path, PathLeg};
pub use worker::{McRangeRaptorWorker, SearchParams, TripRef};
pub use worker_state::McRaptorState;
