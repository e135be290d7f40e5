use std::sync::Arc;

use super::PointSet;
use crate::street::StreetMode;
use crate::time::{clamp_add, UNREACHED};

/// Link of one destination cell to the street network.
#[derive(Debug, Clone, Copy)]
pub struct PointLink {
    pub vertex: usize,
    pub offstreet_distance_mm: u32,
}

/// Precomputed association between a destination point set and the street
/// network for one mode : per cell, the nearest street vertex, and the
/// nearby stops usable for egress with their walk time.
pub struct LinkedPointSet {
    /// `None` when the cell has no reachable street edge.
    links: Vec<Option<PointLink>>,
    egress_stops: Vec<Vec<(usize, u32)>>,
}

impl LinkedPointSet {
    pub fn new(links: Vec<Option<PointLink>>, egress_stops: Vec<Vec<(usize, u32)>>) -> Self {
        debug_assert_eq!(links.len(), egress_stops.len());
        Self {
            links,
            egress_stops,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Travel times to every cell : the street value at the cell's linked
    /// vertex (seconds, as produced by `value_at_vertex`) plus the
    /// off-street leg at `offstreet_speed_mm_per_s`. Unlinked or
    /// unreached cells get `UNREACHED`.
    pub fn eval(
        &self,
        value_at_vertex: impl Fn(usize) -> Option<u32>,
        offstreet_speed_mm_per_s: u32,
    ) -> Vec<u32> {
        self.links
            .iter()
            .map(|link| match link {
                None => UNREACHED,
                Some(link) => match value_at_vertex(link.vertex) {
                    None => UNREACHED,
                    Some(seconds) => clamp_add(
                        seconds,
                        link.offstreet_distance_mm / offstreet_speed_mm_per_s.max(1),
                    ),
                },
            })
            .collect()
    }

    /// Stops near `cell` with their egress walk time in seconds.
    pub fn egress_stops(&self, cell: usize) -> &[(usize, u32)] {
        &self.egress_stops[cell]
    }
}

/// Builds (or retrieves from its own cache) the linkage between a point
/// set and the street network for a mode. External collaborator of the
/// travel-time pipeline.
pub trait LinkageBuilder {
    fn link(&self, pointset: &Arc<PointSet>, mode: StreetMode) -> Arc<LinkedPointSet>;
}
