// Copyright  (C) 2020, Kisio Digital and/or its affiliates. All rights reserved.
//
// This file is part of Navitia,
// the software to build cool stuff with public transport.
//
// Hope you'll enjoy and contribute to this project,
// powered by Kisio Digital (www.kisio.com).
// Help us simplify mobility and open public transport:
// a non ending quest to the responsive locomotion way of traveling!
//
// This contribution is a part of the research and development work of the
// IVA Project which aims to enhance traveler information and is carried out
// under the leadership of the Technological Research Institute SystemX,
// with the partnership and support of the transport organization authority
// Ile-De-France Mobilités (IDFM), SNCF, and public funds
// under the scope of the French Program "Investissements d’Avenir".
//
// LICENCE: This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.
//
// Stay tuned using
// twitter @navitia
// channel `#navitia` on riot https://riot.im/app/#/room/#navitia:matrix.org
// https://groups.google.com/d/forum/navitia
// www.navitia.io

pub mod pattern;

pub use pattern::{PickDropType, TripPattern, TripSchedule};

/// Set of small integer service calendar codes.
#[derive(Debug, Clone, Default)]
pub struct ServiceSet {
    words: Vec<u64>,
}

impl ServiceSet {
    pub fn new() -> Self {
        Self { words: Vec::new() }
    }

    pub fn insert(&mut self, code: u16) {
        let word = usize::from(code) / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (usize::from(code) % 64);
    }

    pub fn contains(&self, code: u16) -> bool {
        let word = usize::from(code) / 64;
        self.words
            .get(word)
            .map_or(false, |bits| bits & (1 << (usize::from(code) % 64)) != 0)
    }

    pub fn union_with(&mut self, other: &ServiceSet) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (word, bits) in other.words.iter().enumerate() {
            self.words[word] |= bits;
        }
    }
}

/// One bit per position of a pattern.
#[derive(Debug, Clone, Default)]
pub struct StopBitSet {
    words: Vec<u64>,
}

impl StopBitSet {
    pub fn with_capacity(nb_of_positions: usize) -> Self {
        Self {
            words: vec![0; (nb_of_positions + 63) / 64],
        }
    }

    pub fn insert(&mut self, position: usize) {
        let word = position / 64;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (position % 64);
    }

    pub fn contains(&self, position: usize) -> bool {
        self.words
            .get(position / 64)
            .map_or(false, |bits| bits & (1 << (position % 64)) != 0)
    }
}

/// A foot transfer between two stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    pub to_stop: usize,
    pub duration: u32,
}

/// The transit network model, immutable once built : patterns grouped with
/// their trips, transfers, and the stop -> pattern index.
///
/// Shared by reference between concurrent searches ; nothing here is
/// mutated after `build`.
pub struct TransitData {
    patterns: Vec<TripPattern>,
    nb_of_stops: usize,
    /// For each stop, the `(pattern, position)` pairs where the pattern
    /// calls at this stop.
    patterns_for_stop: Vec<Vec<(usize, usize)>>,
    /// For each stop, the outgoing foot transfers.
    transfers: Vec<Vec<Transfer>>,
}

static_assertions::assert_impl_all!(TransitData: Send, Sync);

impl TransitData {
    pub fn build(nb_of_stops: usize, patterns: Vec<TripPattern>, transfers: Vec<Vec<Transfer>>) -> Self {
        debug_assert_eq!(transfers.len(), nb_of_stops);
        let mut patterns_for_stop = vec![Vec::new(); nb_of_stops];
        for (pattern_idx, pattern) in patterns.iter().enumerate() {
            for (position, stop) in pattern.stops.iter().enumerate() {
                patterns_for_stop[*stop].push((pattern_idx, position));
            }
        }
        Self {
            patterns,
            nb_of_stops,
            patterns_for_stop,
            transfers,
        }
    }

    pub fn nb_of_stops(&self) -> usize {
        self.nb_of_stops
    }

    pub fn patterns(&self) -> &[TripPattern] {
        &self.patterns
    }

    pub fn pattern(&self, pattern_idx: usize) -> &TripPattern {
        &self.patterns[pattern_idx]
    }

    pub fn patterns_at(&self, stop: usize) -> &[(usize, usize)] {
        &self.patterns_for_stop[stop]
    }

    pub fn transfers_at(&self, stop: usize) -> &[Transfer] {
        &self.transfers[stop]
    }
}
