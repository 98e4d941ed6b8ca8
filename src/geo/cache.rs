//! Process-wide boundary layer cache with single-flight population.
//!
//! Entries are created on first use and never evicted; the lifetime is the
//! process. Reads are cheap (`Arc` clones under a short lock). First loads
//! are serialized per layer name: one caller fetches, concurrent callers
//! for the same name block on a gate and reuse the result. Distinct names
//! load independently.

use crate::error::Result;
use crate::geo::BoundaryLayer;
use ahash::AHashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Gate {
    done: Mutex<bool>,
    cv: Condvar,
}

impl Gate {
    fn wait(&self) {
        let mut done = self.done.lock().unwrap_or_else(PoisonError::into_inner);
        while !*done {
            done = self
                .cv
                .wait(done)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn open(&self) {
        *self.done.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.cv.notify_all();
    }
}

#[derive(Clone)]
enum Slot {
    Ready(Arc<BoundaryLayer>),
    Pending(Arc<Gate>),
}

/// Layer-name keyed cache; inject one instance wherever resolvers are
/// built so every chart render shares the loaded geometry.
#[derive(Default)]
pub struct LayerCache {
    inner: Mutex<AHashMap<String, Slot>>,
}

impl LayerCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, AHashMap<String, Slot>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A cached layer, if fully loaded.
    pub fn get(&self, name: &str) -> Option<Arc<BoundaryLayer>> {
        match self.lock().get(name) {
            Some(Slot::Ready(layer)) => Some(Arc::clone(layer)),
            _ => None,
        }
    }

    /// Number of fully loaded layers.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached layer for `name`, loading it with `load` on first
    /// use. A failed load leaves no entry behind: the error goes to the
    /// caller that ran the load, and anyone who was waiting starts over
    /// with their own loader.
    pub fn get_or_load<F>(&self, name: &str, load: F) -> Result<Arc<BoundaryLayer>>
    where
        F: FnOnce() -> Result<BoundaryLayer>,
    {
        loop {
            let gate = {
                let mut map = self.lock();
                match map.get(name) {
                    Some(Slot::Ready(layer)) => return Ok(Arc::clone(layer)),
                    Some(Slot::Pending(gate)) => Arc::clone(gate),
                    None => {
                        let gate = Arc::new(Gate::default());
                        map.insert(name.to_string(), Slot::Pending(Arc::clone(&gate)));
                        drop(map);
                        return match load() {
                            Ok(layer) => {
                                let layer = Arc::new(layer);
                                self.lock()
                                    .insert(name.to_string(), Slot::Ready(Arc::clone(&layer)));
                                gate.open();
                                log::debug!("cached boundary layer {name:?}");
                                Ok(layer)
                            }
                            Err(e) => {
                                self.lock().remove(name);
                                gate.open();
                                Err(e)
                            }
                        };
                    }
                }
            };
            gate.wait();
        }
    }
}
