//! Hosting session boundary
//!
//! The host owns queueing and transactions. The processor only takes a
//! unit, writes attributes onto it and transfers it to one relationship.

use crate::error::SessionError;
use crate::types::{Relationship, UnitId, WorkUnit};
use std::collections::{HashSet, VecDeque};

/// Operations the processor needs from the host
pub trait ProcessSession {
    /// Next queued unit
    fn get(&mut self) -> Option<WorkUnit>;

    /// Create a fresh unit owned by this session
    fn create(&mut self) -> WorkUnit;

    /// Set an attribute, returning the updated unit
    fn put_attribute(
        &mut self,
        unit: WorkUnit,
        key: &str,
        value: &str,
    ) -> Result<WorkUnit, SessionError>;

    /// Route `unit` to `relationship`
    fn transfer(&mut self, unit: WorkUnit, relationship: Relationship) -> Result<(), SessionError>;
}

/// A unit routed within a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Unit as routed
    pub unit: WorkUnit,
    /// Destination
    pub relationship: Relationship,
}

/// Single-threaded in-memory session
///
/// Transfers stay pending until [`commit`](Self::commit); a
/// [`rollback`](Self::rollback) returns the originally taken units to the
/// queue untouched.
#[derive(Debug, Default)]
pub struct InMemorySession {
    queue: VecDeque<WorkUnit>,
    taken: Vec<WorkUnit>,
    owned: HashSet<UnitId>,
    pending: Vec<Transfer>,
    committed: Vec<Transfer>,
    closed: bool,
}

impl InMemorySession {
    /// Create an empty session
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with queued units
    #[must_use]
    pub fn with_units(units: impl IntoIterator<Item = WorkUnit>) -> Self {
        Self {
            queue: units.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Units still queued
    #[inline]
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Transfers not yet committed
    #[inline]
    #[must_use]
    pub fn pending(&self) -> &[Transfer] {
        &self.pending
    }

    /// Transfers made durable by [`commit`](Self::commit)
    #[inline]
    #[must_use]
    pub fn committed(&self) -> &[Transfer] {
        &self.committed
    }

    /// Committed units routed to `relationship`
    pub fn routed_to(&self, relationship: Relationship) -> impl Iterator<Item = &WorkUnit> {
        self.committed
            .iter()
            .filter(move |t| t.relationship == relationship)
            .map(|t| &t.unit)
    }

    /// Make pending transfers durable and start a new transaction
    pub fn commit(&mut self) {
        self.committed.append(&mut self.pending);
        self.taken.clear();
        self.owned.clear();
        self.closed = false;
    }

    /// Discard pending work and requeue the units taken since the last commit
    pub fn rollback(&mut self) {
        self.pending.clear();
        for unit in self.taken.drain(..).rev() {
            self.queue.push_front(unit);
        }
        self.owned.clear();
        self.closed = false;
    }

    /// Refuse further operations until commit or rollback
    pub fn close(&mut self) {
        self.closed = true;
    }

    fn check_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn check_owned(&self, unit: &WorkUnit) -> Result<(), SessionError> {
        if self.owned.contains(&unit.id) {
            return Ok(());
        }
        if self.pending.iter().any(|t| t.unit.id == unit.id) {
            return Err(SessionError::AlreadyTransferred(unit.id.to_string()));
        }
        Err(SessionError::UnknownUnit(unit.id.to_string()))
    }
}

impl ProcessSession for InMemorySession {
    fn get(&mut self) -> Option<WorkUnit> {
        if self.closed {
            return None;
        }
        let unit = self.queue.pop_front()?;
        self.taken.push(unit.clone());
        self.owned.insert(unit.id);
        Some(unit)
    }

    fn create(&mut self) -> WorkUnit {
        let unit = WorkUnit::new();
        self.owned.insert(unit.id);
        unit
    }

    fn put_attribute(
        &mut self,
        mut unit: WorkUnit,
        key: &str,
        value: &str,
    ) -> Result<WorkUnit, SessionError> {
        self.check_open()?;
        self.check_owned(&unit)?;
        unit.attributes.insert(key.to_string(), value.to_string());
        Ok(unit)
    }

    fn transfer(&mut self, unit: WorkUnit, relationship: Relationship) -> Result<(), SessionError> {
        self.check_open()?;
        self.check_owned(&unit)?;
        self.owned.remove(&unit.id);
        self.pending.push(Transfer { unit, relationship });
        Ok(())
    }
}
