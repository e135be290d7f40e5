use std::sync::Arc;

use crate::pointset::PointSet;
use crate::time::UNREACHED;

/// Result of a finished reducer.
#[derive(Debug, Clone, PartialEq)]
pub enum ReducerOutput {
    /// Per destination cell, one value per requested percentile.
    Surface {
        percentiles: Vec<u8>,
        values: Vec<Vec<u32>>,
    },
    /// Opportunity-weighted count of the cells reachable within the cutoff.
    Accessibility { total: f64 },
}

/// Strategy reducing per-destination travel-time values into the
/// requested output, selected once per request.
///
/// `accept` receives, for one destination cell, either a single travel
/// time or one value per departure-time iteration ; `finish` closes the
/// computation. The same contract serves the single-value nearest-path
/// mode and the multi-iteration distributional mode.
pub enum TravelTimeReducer {
    Surface(SurfaceReducer),
    Accessibility(AccessibilityReducer),
}

impl TravelTimeReducer {
    pub fn surface(nb_of_cells: usize, percentiles: Vec<u8>) -> Self {
        TravelTimeReducer::Surface(SurfaceReducer {
            percentiles,
            values: vec![Vec::new(); nb_of_cells],
        })
    }

    pub fn accessibility(destinations: Arc<PointSet>, cutoff_seconds: u32) -> Self {
        TravelTimeReducer::Accessibility(AccessibilityReducer {
            destinations,
            cutoff_seconds,
            total: 0.0,
        })
    }

    pub fn accept(&mut self, cell: usize, values: &[u32]) {
        match self {
            TravelTimeReducer::Surface(surface) => surface.accept(cell, values),
            TravelTimeReducer::Accessibility(accessibility) => accessibility.accept(cell, values),
        }
    }

    pub fn finish(self) -> ReducerOutput {
        match self {
            TravelTimeReducer::Surface(surface) => ReducerOutput::Surface {
                percentiles: surface.percentiles,
                values: surface.values,
            },
            TravelTimeReducer::Accessibility(accessibility) => ReducerOutput::Accessibility {
                total: accessibility.total,
            },
        }
    }
}

pub struct SurfaceReducer {
    percentiles: Vec<u8>,
    values: Vec<Vec<u32>>,
}

impl SurfaceReducer {
    fn accept(&mut self, cell: usize, values: &[u32]) {
        self.values[cell] = extract_percentiles(values, &self.percentiles);
    }
}

pub struct AccessibilityReducer {
    destinations: Arc<PointSet>,
    cutoff_seconds: u32,
    total: f64,
}

impl AccessibilityReducer {
    fn accept(&mut self, cell: usize, values: &[u32]) {
        let median = extract_percentiles(values, &[50])[0];
        if median != UNREACHED && median <= self.cutoff_seconds {
            self.total += self.destinations.opportunity_count(cell);
        }
    }
}

/// Percentile cut points of `values`. `UNREACHED` sorts last, so a cell
/// reached in too few iterations yields `UNREACHED` at high percentiles.
fn extract_percentiles(values: &[u32], percentiles: &[u8]) -> Vec<u32> {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    percentiles
        .iter()
        .map(|percentile| {
            let rank = (usize::from(*percentile) * (sorted.len() - 1) + 50) / 100;
            sorted[rank]
        })
        .collect()
}
