extern crate static_assertions;

pub mod engine;
pub mod logger;
pub mod pointset;
pub mod propagation;
pub mod request;
pub mod response;
pub mod street;
pub mod time;
pub mod transit_data;
pub mod travel_time;

pub use chrono;
pub use tracing;

pub use engine::{McRangeRaptorWorker, McRaptorState, SearchParams, TransferLeg, TripRef};
pub use pointset::{PointSet, PointSetCache};
pub use request::AnalysisRequest;
pub use response::{ReducerOutput, TravelTimeReducer};
pub use time::{PositiveDuration, UNREACHED};
pub use transit_data::TransitData;
pub use travel_time::{TransportNetwork, TravelTimeComputer};
