use chrono::NaiveDateTime;
use serde::Deserialize;
use std::sync::Arc;

use crate::pointset::PointSet;
use crate::response::TravelTimeReducer;
use crate::street::{Coord, StreetMode};
use crate::time::PositiveDuration;

/// A travel mode a request may allow for access or direct travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Walk,
    Bicycle,
    Car,
    /// Drive to a parking facility, then walk to nearby stops.
    CarPark,
}

impl Mode {
    pub fn street_mode(&self) -> StreetMode {
        match self {
            Mode::Walk => StreetMode::Walk,
            Mode::Bicycle => StreetMode::Bicycle,
            Mode::Car | Mode::CarPark => StreetMode::Car,
        }
    }
}

/// Transit submodes ; only emptiness matters to the pipeline, the transit
/// search itself does not filter on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitMode {
    Bus,
    Tram,
    Metro,
    Rail,
    Ferry,
}

/// Picks the street mode doing the heavy lifting in a mode set :
/// car beats bicycle beats walk. An empty set degrades to walk.
pub fn dominant_street_mode(modes: &[Mode]) -> StreetMode {
    let mut dominant = StreetMode::Walk;
    for mode in modes {
        match mode.street_mode() {
            StreetMode::Car => return StreetMode::Car,
            StreetMode::Bicycle => dominant = StreetMode::Bicycle,
            StreetMode::Walk => {}
        }
    }
    dominant
}

/// Which output the request wants out of the pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReducerKind {
    /// One travel-time (distribution) value per destination cell.
    Surface,
    /// A single opportunity-weighted indicator over all cells.
    Accessibility { cutoff_seconds: u32 },
}

fn default_step() -> u32 {
    60
}

fn default_max_rounds() -> usize {
    5
}

fn default_percentiles() -> Vec<u8> {
    vec![50]
}

fn default_walk_speed() -> f64 {
    1.3
}

fn default_bicycle_speed() -> f64 {
    4.0
}

fn default_car_speed() -> f64 {
    20.0
}

fn default_max_access_time() -> PositiveDuration {
    PositiveDuration::from_hms(0, 30, 0)
}

/// One accessibility computation : an origin, the allowed modes, a
/// departure-time range and the destination set to evaluate.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub from_lat: f64,
    pub from_lon: f64,
    pub access_modes: Vec<Mode>,
    pub direct_modes: Vec<Mode>,
    pub transit_modes: Vec<TransitMode>,
    pub departure: NaiveDateTime,
    /// Width of the departure-time range ; zero means a single iteration.
    #[serde(default)]
    pub window_seconds: u32,
    #[serde(default = "default_step")]
    pub step_seconds: u32,
    pub max_trip_duration: PositiveDuration,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    pub destination_point_set_key: String,
    #[serde(default = "default_percentiles")]
    pub percentiles: Vec<u8>,
    pub reducer: ReducerKind,
    #[serde(default = "default_walk_speed")]
    pub walk_speed_meters_per_second: f64,
    #[serde(default = "default_bicycle_speed")]
    pub bicycle_speed_meters_per_second: f64,
    #[serde(default = "default_car_speed")]
    pub car_speed_meters_per_second: f64,
    #[serde(default = "default_max_access_time")]
    pub max_access_time: PositiveDuration,
    #[serde(default = "default_max_access_time")]
    pub max_car_park_time: PositiveDuration,
}

impl AnalysisRequest {
    pub fn origin(&self) -> Coord {
        Coord {
            lat: self.from_lat,
            lon: self.from_lon,
        }
    }

    pub fn has_transit(&self) -> bool {
        !self.transit_modes.is_empty()
    }

    pub fn speed_for_mode(&self, mode: StreetMode) -> f64 {
        match mode {
            StreetMode::Walk => self.walk_speed_meters_per_second,
            StreetMode::Bicycle => self.bicycle_speed_meters_per_second,
            StreetMode::Car => self.car_speed_meters_per_second,
        }
    }

    /// Speed in integer millimeters per second, the unit used against
    /// distance-based street searches. Never zero.
    pub fn speed_millimeters_per_second(&self, mode: StreetMode) -> u32 {
        ((self.speed_for_mode(mode) * 1000.0) as u32).max(1)
    }

    pub fn max_access_time_for_mode(&self, _mode: StreetMode) -> PositiveDuration {
        self.max_access_time
    }

    /// Builds the output reducer matching this request.
    pub fn build_reducer(&self, destinations: Arc<PointSet>) -> TravelTimeReducer {
        match &self.reducer {
            ReducerKind::Surface => TravelTimeReducer::surface(destinations.len(), self.percentiles.clone()),
            ReducerKind::Accessibility { cutoff_seconds } => {
                TravelTimeReducer::accessibility(destinations, *cutoff_seconds)
            }
        }
    }
}
