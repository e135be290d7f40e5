use super::arrivals::ArrivalId;

use std::slice::Iter as SliceIter;

/// The two optimization criteria tracked per arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Criteria {
    pub arrival_time: u32,
    pub cost: u32,
}

impl Criteria {
    /// Weak dominance : `self` is at least as good as `other` on both axes.
    pub fn dominates(&self, other: &Criteria) -> bool {
        self.arrival_time <= other.arrival_time && self.cost <= other.cost
    }
}

/// Pareto front of the arrivals retained at one stop, with a mark cursor.
///
/// The mark records a point in the commit history : `iter_since_mark`
/// yields only the elements committed after the last `mark()` call, which
/// is how a round reads "what changed here since the previous round"
/// without re-scanning the whole front. Pruning keeps the cursor stable
/// by shifting it when elements below it are removed.
#[derive(Debug, Clone)]
pub struct ParetoFront {
    elements: Vec<(ArrivalId, Criteria)>,
    mark: usize,
}

impl ParetoFront {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            mark: 0,
        }
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.mark = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true` if some retained element is at least as good as `criteria`
    /// on both axes.
    pub fn dominates(&self, criteria: &Criteria) -> bool {
        self.elements
            .iter()
            .any(|(_, retained)| retained.dominates(criteria))
    }

    /// Inserts `criteria` if it is not dominated, pruning every retained
    /// element it dominates. Returns `true` if the element was inserted.
    pub fn add(&mut self, id: ArrivalId, criteria: Criteria) -> bool {
        if self.dominates(&criteria) {
            return false;
        }
        self.remove_elements_dominated_by(&criteria);
        self.elements.push((id, criteria));
        true
    }

    fn remove_elements_dominated_by(&mut self, criteria: &Criteria) {
        let mark = self.mark;
        let mut removed_below_mark = 0;
        let mut index = 0;
        self.elements.retain(|(_, retained)| {
            let keep = !criteria.dominates(retained);
            if !keep && index < mark {
                removed_below_mark += 1;
            }
            index += 1;
            keep
        });
        self.mark = mark - removed_below_mark;
    }

    /// Records the current state as the baseline for `iter_since_mark`.
    pub fn mark(&mut self) {
        self.mark = self.elements.len();
    }

    pub fn iter(&self) -> SliceIter<'_, (ArrivalId, Criteria)> {
        self.elements.iter()
    }

    pub fn iter_since_mark(&self) -> SliceIter<'_, (ArrivalId, Criteria)> {
        self.elements[self.mark..].iter()
    }
}

impl Default for ParetoFront {
    fn default() -> Self {
        Self::new()
    }
}
