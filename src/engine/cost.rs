/// Maps boardings, rides and walks into generalized cost increments.
///
/// All costs are dimensionless integer units ; factors are small integer
/// multipliers applied to seconds.
#[derive(Debug, Clone, Copy)]
pub struct CostCalculator {
    pub board_cost: u32,
    pub walk_factor: u32,
    pub wait_factor: u32,
}

impl Default for CostCalculator {
    fn default() -> Self {
        Self {
            board_cost: 300,
            walk_factor: 2,
            wait_factor: 1,
        }
    }
}

impl CostCalculator {
    pub fn walk_cost(&self, duration_seconds: u32) -> u32 {
        self.walk_factor * duration_seconds
    }

    /// Cost increment of boarding at `board_time` after having arrived at
    /// the boarding stop at `prev_arrival_time`, then riding until
    /// `alight_time`.
    pub fn transit_arrival_cost(
        &self,
        prev_arrival_time: u32,
        board_time: u32,
        alight_time: u32,
    ) -> u32 {
        let wait = board_time.saturating_sub(prev_arrival_time);
        let ride = alight_time.saturating_sub(board_time);
        self.board_cost + self.wait_factor * wait + ride
    }
}

/// Absolute time cutoff of one search.
#[derive(Debug, Clone, Copy)]
pub struct TransitCalculator {
    latest_acceptable_arrival: u32,
}

impl TransitCalculator {
    pub fn new(departure_time: u32, max_trip_duration_seconds: u32) -> Self {
        Self {
            latest_acceptable_arrival: departure_time.saturating_add(max_trip_duration_seconds),
        }
    }

    pub fn exceeds_time_limit(&self, time: u32) -> bool {
        time > self.latest_acceptable_arrival
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transit_cost_accounts_for_wait_and_ride() {
        let calculator = CostCalculator {
            board_cost: 100,
            walk_factor: 2,
            wait_factor: 3,
        };
        // waited 60s, rode 300s
        assert_eq!(
            calculator.transit_arrival_cost(1000, 1060, 1360),
            100 + 3 * 60 + 300
        );
    }

    #[test]
    fn cutoff_is_inclusive() {
        let calculator = TransitCalculator::new(1000, 600);
        assert!(!calculator.exceeds_time_limit(1600));
        assert!(calculator.exceeds_time_limit(1601));
    }
}
