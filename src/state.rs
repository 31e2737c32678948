//! Idle / active / tracked bookkeeping
//!
//! `PoolState` knows nothing about factories, hooks or locking. The pool wraps
//! it in a single mutex and every method here runs inside that critical
//! section.

use crate::errors::PoolError;
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Identity of a resource within its pool. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(u64);

impl ResourceId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Snapshot of the three collection sizes, taken under one lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolCounts {
    pub idle: usize,
    pub active: usize,
    pub all: usize,
}

struct IdleSlot<T> {
    id: ResourceId,
    resource: T,
    idle_since: Instant,
}

pub(crate) struct PoolState<T> {
    // LIFO: the most recently released resource is handed out first
    idle: Vec<IdleSlot<T>>,
    active: HashSet<ResourceId>,
    all: HashSet<ResourceId>,
    next_id: u64,
    pub disposed: bool,
}

impl<T> PoolState<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            idle: Vec::with_capacity(capacity),
            active: HashSet::with_capacity(capacity),
            all: HashSet::with_capacity(capacity),
            next_id: 0,
            disposed: false,
        }
    }

    fn next_id(&mut self) -> ResourceId {
        let id = ResourceId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn idle_len(&self) -> usize {
        self.idle.len()
    }

    pub fn counts(&self) -> PoolCounts {
        PoolCounts {
            idle: self.idle.len(),
            active: self.active.len(),
            all: self.all.len(),
        }
    }

    /// Resources the pool is accountable for: idle plus checked out
    pub fn in_service(&self) -> usize {
        self.idle.len() + self.active.len()
    }

    pub fn leaked(&self) -> bool {
        self.in_service() != self.all.len()
    }

    /// Track a freshly created resource as idle
    pub fn admit(&mut self, resource: T) -> ResourceId {
        let id = self.next_id();
        self.all.insert(id);
        self.idle.push(IdleSlot {
            id,
            resource,
            idle_since: Instant::now(),
        });
        id
    }

    /// Track a freshly created resource as already checked out
    pub fn admit_active(&mut self) -> ResourceId {
        let id = self.next_id();
        self.all.insert(id);
        self.active.insert(id);
        id
    }

    /// Pop the most recently idled resource and mark it active
    pub fn checkout(&mut self) -> Option<(ResourceId, T)> {
        let slot = self.idle.pop()?;
        self.active.insert(slot.id);
        Some((slot.id, slot.resource))
    }

    /// Check whether `id` may be released right now
    pub fn validate_release(&self, id: ResourceId) -> Result<(), PoolError> {
        if self.active.contains(&id) {
            Ok(())
        } else if self.all.contains(&id) {
            Err(PoolError::DoubleRelease { id: id.get() })
        } else {
            Err(PoolError::ForeignOrUnknownHandle { id: id.get() })
        }
    }

    /// Move `id` from active back to idle, handing the resource back on refusal
    pub fn checkin(&mut self, id: ResourceId, resource: T) -> Result<(), (PoolError, T)> {
        if let Err(e) = self.validate_release(id) {
            return Err((e, resource));
        }
        self.active.remove(&id);
        self.idle.push(IdleSlot {
            id,
            resource,
            idle_since: Instant::now(),
        });
        Ok(())
    }

    /// Drop `id` from the active set only, leaving it tracked in `all`
    pub fn forget_active(&mut self, id: ResourceId) -> bool {
        self.active.remove(&id)
    }

    /// Stop tracking `id` entirely
    pub fn retire(&mut self, id: ResourceId) -> bool {
        self.active.remove(&id);
        self.all.remove(&id)
    }

    /// Idle resources that have been idle for at least `timeout`, oldest first
    pub fn stale_idle(&self, timeout: Duration) -> Vec<(ResourceId, Instant)> {
        let mut stale: Vec<_> = self
            .idle
            .iter()
            .filter(|slot| slot.idle_since.elapsed() >= timeout)
            .map(|slot| (slot.id, slot.idle_since))
            .collect();
        stale.sort_by_key(|(_, since)| *since);
        stale
    }

    /// Remove `id` from idle and `all`, provided it has not been checked out
    /// and returned since `since` was observed
    pub fn take_idle(&mut self, id: ResourceId, since: Instant) -> Option<T> {
        let pos = self
            .idle
            .iter()
            .position(|slot| slot.id == id && slot.idle_since == since)?;
        let slot = self.idle.remove(pos);
        self.all.remove(&id);
        Some(slot.resource)
    }

    /// Clear every collection and return the idle resources
    pub fn drain(&mut self) -> Vec<(ResourceId, T)> {
        self.active.clear();
        self.all.clear();
        self.idle
            .drain(..)
            .map(|slot| (slot.id, slot.resource))
            .collect()
    }
}
