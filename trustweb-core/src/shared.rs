//! Lock-wrapped trust graph for concurrent readers.
//!
//! Propagation only reads the graph, so any number of runs may proceed in
//! parallel. Rating takes the write lock and therefore never races a run.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::error::TrustError;
use crate::export::ParticipantRecord;
use crate::graph::TrustGraph;
use crate::id::{ParticipantHandle, ParticipantId};
use crate::propagation::{Propagation, Propagator};
use crate::rating::Rating;

/// Thread-safe wrapper around a [`TrustGraph`].
#[derive(Debug, Default)]
pub struct SharedTrustGraph {
    inner: RwLock<TrustGraph>,
}

impl SharedTrustGraph {
    /// Wrap an existing graph.
    #[must_use]
    pub fn new(graph: TrustGraph) -> Self {
        Self { inner: RwLock::new(graph) }
    }

    #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
    fn read(&self) -> RwLockReadGuard<'_, TrustGraph> {
        self.inner.read().expect("trust graph read lock poisoned")
    }

    #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
    fn write(&self) -> RwLockWriteGuard<'_, TrustGraph> {
        self.inner.write().expect("trust graph write lock poisoned")
    }

    /// Allocate a participant. See [`TrustGraph::create_participant`].
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn create_participant(&self, label: Option<&str>) -> ParticipantHandle {
        self.write().create_participant(label)
    }

    /// Create or overwrite an edge. See [`TrustGraph::rate`].
    ///
    /// # Errors
    /// Propagates validation errors from [`TrustGraph::rate`].
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn rate(
        &self,
        source: ParticipantHandle,
        target: ParticipantHandle,
        rating: f64,
    ) -> Result<(), TrustError> {
        self.write().rate(source, target, rating)
    }

    /// Direct ratings of one participant. See [`TrustGraph::direct_ratings`].
    ///
    /// # Errors
    /// Returns [`TrustError::UnknownParticipant`] for an out-of-range handle.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn direct_ratings(
        &self,
        handle: ParticipantHandle,
    ) -> Result<IndexMap<ParticipantId, Rating>, TrustError> {
        self.read().direct_ratings(handle)
    }

    /// Run propagation under the read lock.
    ///
    /// # Errors
    /// Returns [`TrustError::UnknownParticipant`] for an out-of-range handle.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn propagate(
        &self,
        source: ParticipantHandle,
        max_depth: u32,
        memoized: bool,
    ) -> Result<Propagation, TrustError> {
        let graph = self.read();
        Propagator::new(&graph).max_depth(max_depth).memoized(memoized).run(source)
    }

    /// Run `f` with shared access to the graph.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    pub fn with_graph<T>(&self, f: impl FnOnce(&TrustGraph) -> T) -> T {
        f(&*self.read())
    }

    /// Serialize the graph under the read lock.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    pub fn to_records(&self) -> Vec<ParticipantRecord> {
        self.read().to_records()
    }

    /// Unwrap the inner graph.
    ///
    /// # Panics
    /// Panics if the internal `RwLock` is poisoned.
    #[must_use]
    #[expect(clippy::expect_used, reason = "lock poisoning is unrecoverable")]
    pub fn into_inner(self) -> TrustGraph {
        self.inner.into_inner().expect("trust graph lock poisoned")
    }
}

impl From<TrustGraph> for SharedTrustGraph {
    fn from(graph: TrustGraph) -> Self {
        Self::new(graph)
    }
}
