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

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::sync::{Arc, Condvar, Mutex};

use flate2::read::GzDecoder;
use tracing::{debug, error};

use super::{
    FreeFormPointSet, GridPointSet, PointSet, PointSetError, FREEFORM_EXTENSION, GRID_EXTENSION,
};

/// Large enough to hold every destination set of a project.
const CACHE_SIZE: usize = 200;

/// Key-addressed access to the compressed point-set objects in backing
/// storage.
pub trait PointSetStore: Send + Sync {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, PointSetError>;
}

/// Store reading gzipped objects from a local directory, one file per key.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl PointSetStore for DirectoryStore {
    fn fetch(&self, key: &str) -> Result<Vec<u8>, PointSetError> {
        let path = self.root.join(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(PointSetError::NotFound(key.to_string()))
            }
            Err(err) => Err(PointSetError::Io(err)),
        }
    }
}

enum Slot {
    /// A load is in flight ; readers block until it completes. Never
    /// evicted under capacity pressure.
    Loading(Arc<LoadOutcome>),
    Ready { pointset: Arc<PointSet>, last_use: u64 },
}

/// Shared between one in-flight load and the threads waiting on it. A
/// failure is recorded here, so every waiter of that load receives it ;
/// lookups arriving after the failed slot is removed start a fresh load.
#[derive(Default)]
struct LoadOutcome {
    error: Mutex<Option<PointSetError>>,
}

struct CacheInner {
    slots: HashMap<String, Slot>,
    /// Monotonic use counter ordering entries for eviction.
    tick: u64,
}

/// Bounded in-memory cache of point sets, loaded from backing storage
/// and decompressed transparently.
///
/// Concurrent `get`s of the same missing key collapse into a single load ;
/// other readers block until that load completes, and a failed load is
/// handed to every one of them without being cached. Least-recently-used
/// entries are evicted once the cache holds `CACHE_SIZE` ready entries.
pub struct PointSetCache {
    store: Box<dyn PointSetStore>,
    capacity: usize,
    inner: Mutex<CacheInner>,
    load_complete: Condvar,
}

impl PointSetCache {
    pub fn new(store: Box<dyn PointSetStore>) -> Self {
        Self::with_capacity(store, CACHE_SIZE)
    }

    pub fn with_capacity(store: Box<dyn PointSetStore>, capacity: usize) -> Self {
        debug_assert!(capacity >= 1);
        Self {
            store,
            capacity,
            inner: Mutex::new(CacheInner {
                slots: HashMap::new(),
                tick: 0,
            }),
            load_complete: Condvar::new(),
        }
    }

    pub fn get(&self, key: &str) -> Result<Arc<PointSet>, PointSetError> {
        let mut guard = self.inner.lock().expect("poisoned point set cache");
        loop {
            match guard.slots.get(key) {
                Some(Slot::Ready { .. }) => {
                    guard.tick += 1;
                    let tick = guard.tick;
                    if let Some(Slot::Ready { pointset, last_use }) = guard.slots.get_mut(key) {
                        *last_use = tick;
                        return Ok(Arc::clone(pointset));
                    }
                    unreachable!("slot vanished while locked");
                }
                Some(Slot::Loading(outcome)) => {
                    let outcome = Arc::clone(outcome);
                    guard = self
                        .load_complete
                        .wait(guard)
                        .expect("poisoned point set cache");
                    let failure = outcome.error.lock().expect("poisoned load outcome").clone();
                    if let Some(err) = failure {
                        return Err(err);
                    }
                    // loaded, or woken by an unrelated load ; re-examine
                    // the slot
                }
                None => {
                    let outcome = Arc::new(LoadOutcome::default());
                    guard
                        .slots
                        .insert(key.to_string(), Slot::Loading(Arc::clone(&outcome)));
                    drop(guard);
                    let loaded = self.load(key);
                    guard = self.inner.lock().expect("poisoned point set cache");
                    match loaded {
                        Ok(pointset) => {
                            let pointset = Arc::new(pointset);
                            self.evict_if_full(&mut guard);
                            guard.tick += 1;
                            let tick = guard.tick;
                            guard.slots.insert(
                                key.to_string(),
                                Slot::Ready {
                                    pointset: Arc::clone(&pointset),
                                    last_use: tick,
                                },
                            );
                            self.load_complete.notify_all();
                            return Ok(pointset);
                        }
                        Err(err) => {
                            error!("error retrieving point set {} : {}", key, err);
                            *outcome.error.lock().expect("poisoned load outcome") =
                                Some(err.clone());
                            guard.slots.remove(key);
                            self.load_complete.notify_all();
                            return Err(err);
                        }
                    }
                }
            }
        }
    }

    fn load(&self, key: &str) -> Result<PointSet, PointSetError> {
        let compressed = self.store.fetch(key)?;
        let mut bytes = Vec::new();
        GzDecoder::new(compressed.as_slice()).read_to_end(&mut bytes)?;
        debug!("loaded point set {} ({} bytes)", key, bytes.len());
        if key.ends_with(GRID_EXTENSION) {
            Ok(PointSet::Grid(GridPointSet::read(&bytes)?))
        } else if key.ends_with(FREEFORM_EXTENSION) {
            Ok(PointSet::FreeForm(FreeFormPointSet::read(&bytes)?))
        } else {
            Err(PointSetError::UnrecognizedKey(key.to_string()))
        }
    }

    fn evict_if_full(&self, inner: &mut CacheInner) {
        let ready_count = inner
            .slots
            .values()
            .filter(|slot| matches!(slot, Slot::Ready { .. }))
            .count();
        if ready_count < self.capacity {
            return;
        }
        let oldest = inner
            .slots
            .iter()
            .filter_map(|(key, slot)| match slot {
                Slot::Ready { last_use, .. } => Some((key.clone(), *last_use)),
                Slot::Loading(_) => None,
            })
            .min_by_key(|(_, last_use)| *last_use);
        if let Some((key, _)) = oldest {
            debug!("evicting point set {}", key);
            inner.slots.remove(&key);
        }
    }
}
