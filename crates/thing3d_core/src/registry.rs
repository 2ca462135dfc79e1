//! Thing registry
//!
//! `Things` owns every live Thing, hands out 16-bit ids and queues
//! structural changes requested mid-frame until [`Things::apply_pending`].

use crate::thing::{Thing, ThingId};
use std::collections::HashMap;
use std::fmt;
use thing3d_physics::{Body, BodyStore};

/// Number of distinct ids a registry can hand out
pub const ID_SPACE: usize = u16::MAX as usize + 1;

/// Error type for registry operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// The registry was used before `initialize`
    Uninitialized,
    /// `initialize` was called twice
    AlreadyInitialized,
    /// No live Thing has this id
    NotFound(ThingId),
    /// Every id is taken by a live Thing
    IdSpaceExhausted,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Uninitialized => write!(f, "Thing registry not initialized"),
            RegistryError::AlreadyInitialized => write!(f, "Thing registry already initialized"),
            RegistryError::NotFound(id) => write!(f, "No thing with id {}", id),
            RegistryError::IdSpaceExhausted => write!(f, "All {} thing ids are in use", ID_SPACE),
        }
    }
}

impl std::error::Error for RegistryError {}

/// A structural change waiting for [`Things::apply_pending`]
#[derive(Debug)]
pub enum PendingOp {
    Add(Thing),
    Delete(ThingId),
}

/// Successful outcome of one applied [`PendingOp`]
#[derive(Debug, PartialEq)]
pub enum Applied {
    Added(ThingId),
    Deleted(Thing),
}

pub type RegistryResult = Result<Applied, RegistryError>;

/// Registry of all live Things
///
/// `Things::default()` is not usable until [`initialize`](Self::initialize)
/// is called; [`Things::new`] does both.
#[derive(Debug, Default)]
pub struct Things {
    things: Option<HashMap<ThingId, Thing>>,
    next_id: u16,
    pending: Vec<PendingOp>,
}

impl Things {
    /// Create an initialized, empty registry
    pub fn new() -> Self {
        Self {
            things: Some(HashMap::new()),
            ..Default::default()
        }
    }

    /// Prepare the registry for use
    pub fn initialize(&mut self) -> Result<(), RegistryError> {
        if self.things.is_some() {
            log::warn!("Thing registry initialized twice");
            return Err(RegistryError::AlreadyInitialized);
        }
        self.things = Some(HashMap::new());
        self.next_id = 0;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.things.is_some()
    }

    fn map_mut(&mut self) -> Result<&mut HashMap<ThingId, Thing>, RegistryError> {
        self.things.as_mut().ok_or_else(|| {
            log::error!("Thing registry not initialized");
            RegistryError::Uninitialized
        })
    }

    /// Insert a Thing and return its new id
    ///
    /// Ids come from a wrapping counter; ids still in use are skipped.
    pub fn add(&mut self, mut thing: Thing) -> Result<ThingId, RegistryError> {
        let Some(map) = self.things.as_mut() else {
            log::error!("Thing registry not initialized");
            return Err(RegistryError::Uninitialized);
        };
        let mut next_id = self.next_id;

        for _ in 0..ID_SPACE {
            let id = ThingId(next_id);
            next_id = next_id.wrapping_add(1);

            if !map.contains_key(&id) {
                thing.set_id(Some(id));
                map.insert(id, thing);
                self.next_id = next_id;
                log::debug!("Added thing with id {}", id);
                return Ok(id);
            }
        }

        log::error!("Cannot add thing: id space exhausted");
        Err(RegistryError::IdSpaceExhausted)
    }

    /// Remove a Thing and hand it back to the caller
    pub fn delete(&mut self, id: ThingId) -> Result<Thing, RegistryError> {
        let map = self.map_mut()?;
        match map.remove(&id) {
            Some(mut thing) => {
                thing.set_id(None);
                log::debug!("Deleted thing with id {}", id);
                Ok(thing)
            }
            None => {
                log::warn!("Attempted to delete non-existent thing with id {}", id);
                Err(RegistryError::NotFound(id))
            }
        }
    }

    /// Queue a Thing to be added by the next [`apply_pending`](Self::apply_pending)
    pub fn queue_add(&mut self, thing: Thing) {
        self.pending.push(PendingOp::Add(thing));
    }

    /// Queue a deletion for the next [`apply_pending`](Self::apply_pending)
    pub fn queue_delete(&mut self, id: ThingId) {
        self.pending.push(PendingOp::Delete(id));
    }

    /// Number of queued changes
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued changes in the order they were queued
    ///
    /// Failures are logged and reported in the result list; they don't stop
    /// later changes from applying.
    pub fn apply_pending(&mut self) -> Vec<RegistryResult> {
        let pending = std::mem::take(&mut self.pending);
        let mut results = Vec::with_capacity(pending.len());

        for op in pending {
            let result = match op {
                PendingOp::Add(thing) => self.add(thing).map(Applied::Added),
                PendingOp::Delete(id) => self.delete(id).map(Applied::Deleted),
            };
            if let Err(e) = &result {
                log::warn!("Pending registry change failed: {}", e);
            }
            results.push(result);
        }

        results
    }

    pub fn get(&self, id: ThingId) -> Option<&Thing> {
        self.things.as_ref()?.get(&id)
    }

    pub fn get_mut(&mut self, id: ThingId) -> Option<&mut Thing> {
        self.things.as_mut()?.get_mut(&id)
    }

    /// Find the first Thing with the given name
    pub fn get_by_name(&self, name: &str) -> Option<(ThingId, &Thing)> {
        self.iter().find(|(_, t)| t.name.as_deref() == Some(name))
    }

    pub fn contains(&self, id: ThingId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live Things
    pub fn len(&self) -> usize {
        self.things.as_ref().map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live Things in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (ThingId, &Thing)> {
        self.things.iter().flat_map(|m| m.iter()).map(|(id, t)| (*id, t))
    }

    /// Iterate mutably over live Things in no particular order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ThingId, &mut Thing)> {
        self.things.iter_mut().flat_map(|m| m.iter_mut()).map(|(id, t)| (*id, t))
    }
}

impl BodyStore for Things {
    type Id = ThingId;

    fn collect_ids(&self, out: &mut Vec<ThingId>) {
        if let Some(map) = &self.things {
            out.extend(map.keys().copied());
        }
    }

    fn body(&self, id: ThingId) -> Option<&Body> {
        self.get(id).map(|t| &t.body)
    }

    fn body_mut(&mut self, id: ThingId) -> Option<&mut Body> {
        self.get_mut(id).map(|t| &mut t.body)
    }

    fn for_each_body<F: FnMut(ThingId, &Body)>(&self, mut f: F) {
        for (id, thing) in self.iter() {
            f(id, &thing.body);
        }
    }
}
