//! The trust graph: participants and the directed, rated edges between them.
//!
//! Participants live in a dense arena and edges refer to their targets by
//! [`ParticipantHandle`], so reciprocal ratings and cycles need no shared
//! ownership.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::error::TrustError;
use crate::id::{ParticipantHandle, ParticipantId};
use crate::propagation::{Propagator, TrustMap};
use crate::rating::Rating;

/// A node of the trust graph together with its outbound ratings.
#[derive(Debug, Clone)]
pub struct Participant {
    id: ParticipantId,
    ratings: IndexMap<ParticipantHandle, Rating>,
}

impl Participant {
    fn new(id: ParticipantId) -> Self {
        Self { id, ratings: IndexMap::new() }
    }

    /// Returns the participant's id.
    #[must_use]
    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    /// Iterates outbound ratings in the order each target was first rated.
    pub fn ratings(&self) -> impl ExactSizeIterator<Item = (ParticipantHandle, Rating)> + '_ {
        self.ratings.iter().map(|(&target, &rating)| (target, rating))
    }

    /// Returns the direct rating toward `target`, if any.
    #[must_use]
    pub fn rating_for(&self, target: ParticipantHandle) -> Option<Rating> {
        self.ratings.get(&target).copied()
    }

    /// Number of participants this one has rated.
    #[must_use]
    pub fn out_degree(&self) -> usize {
        self.ratings.len()
    }
}

/// Arena of participants addressed by [`ParticipantHandle`].
///
/// Mutated only through [`TrustGraph::create_participant`],
/// [`TrustGraph::insert_participant`] and [`TrustGraph::rate`]. Participants
/// are never removed, so handles stay valid for the graph's lifetime.
#[derive(Debug, Clone, Default)]
pub struct TrustGraph {
    participants: Vec<Participant>,
    index: HashMap<ParticipantId, ParticipantHandle>,
}

impl TrustGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a participant with a fresh random id, prefixed by `label` if given.
    pub fn create_participant(&mut self, label: Option<&str>) -> ParticipantHandle {
        let mut id = ParticipantId::generate(label);
        while self.index.contains_key(&id) {
            id = ParticipantId::generate(label);
        }
        self.push(id)
    }

    /// Register a participant under a caller-supplied id.
    ///
    /// # Errors
    /// Returns [`TrustError::DuplicateParticipant`] if the id is already taken.
    pub fn insert_participant(
        &mut self,
        id: ParticipantId,
    ) -> Result<ParticipantHandle, TrustError> {
        if self.index.contains_key(&id) {
            return Err(TrustError::DuplicateParticipant { id });
        }
        Ok(self.push(id))
    }

    fn push(&mut self, id: ParticipantId) -> ParticipantHandle {
        let handle = ParticipantHandle(self.participants.len());
        self.index.insert(id.clone(), handle);
        self.participants.push(Participant::new(id));
        handle
    }

    /// Create or overwrite the edge `source -> target`.
    ///
    /// Repeated ratings of the same target replace the previous one; they are
    /// not averaged.
    ///
    /// # Errors
    /// - [`TrustError::UnknownParticipant`] if either handle is out of range for this graph.
    /// - [`TrustError::SelfTrust`] if `source` and `target` are the same participant.
    /// - [`TrustError::RatingOutOfRange`] if `rating` is outside `[-100, 100]`.
    pub fn rate(
        &mut self,
        source: ParticipantHandle,
        target: ParticipantHandle,
        rating: f64,
    ) -> Result<(), TrustError> {
        self.participant(target)?;
        let participant = self
            .participants
            .get_mut(source.0)
            .ok_or(TrustError::UnknownParticipant { handle: source })?;
        if source == target {
            return Err(TrustError::SelfTrust { id: participant.id.clone() });
        }
        let rating = Rating::new(rating)?;
        participant.ratings.insert(target, rating);
        tracing::trace!(source = %participant.id, %target, %rating, "rating recorded");
        Ok(())
    }

    /// Return the participant's own outbound ratings, keyed by target id.
    ///
    /// No propagation is performed.
    ///
    /// # Errors
    /// Returns [`TrustError::UnknownParticipant`] if `handle` is out of range for this graph.
    pub fn direct_ratings(
        &self,
        handle: ParticipantHandle,
    ) -> Result<IndexMap<ParticipantId, Rating>, TrustError> {
        let participant = self.participant(handle)?;
        Ok(participant
            .ratings()
            .map(|(target, rating)| (self.participants[target.0].id.clone(), rating))
            .collect())
    }

    /// Derive trust from `source` toward everyone reachable within `max_depth` hops.
    ///
    /// Shorthand for a plain [`Propagator`] run.
    ///
    /// # Errors
    /// Returns [`TrustError::UnknownParticipant`] if `source` is out of range for this graph.
    pub fn propagate(
        &self,
        source: ParticipantHandle,
        max_depth: u32,
    ) -> Result<TrustMap, TrustError> {
        Propagator::new(self)
            .max_depth(max_depth)
            .run(source)
            .map(|propagation| propagation.ratings)
    }

    /// Look up a participant by handle.
    ///
    /// # Errors
    /// Returns [`TrustError::UnknownParticipant`] if `handle` is out of range for this graph.
    pub fn participant(&self, handle: ParticipantHandle) -> Result<&Participant, TrustError> {
        self.participants
            .get(handle.0)
            .ok_or(TrustError::UnknownParticipant { handle })
    }

    /// Handles stored in edges always point into this arena.
    pub(crate) fn participant_at(&self, handle: ParticipantHandle) -> &Participant {
        &self.participants[handle.0]
    }

    /// Resolve an id to its handle.
    #[must_use]
    pub fn handle_of(&self, id: &ParticipantId) -> Option<ParticipantHandle> {
        self.index.get(id).copied()
    }

    /// Resolve a handle to its id.
    ///
    /// # Errors
    /// Returns [`TrustError::UnknownParticipant`] if `handle` is out of range for this graph.
    pub fn id_of(&self, handle: ParticipantHandle) -> Result<&ParticipantId, TrustError> {
        self.participant(handle).map(Participant::id)
    }

    /// Iterate every handle in creation order.
    pub fn handles(&self) -> impl ExactSizeIterator<Item = ParticipantHandle> {
        (0..self.participants.len()).map(ParticipantHandle)
    }

    /// Iterate every participant in creation order.
    pub fn participants(&self) -> impl ExactSizeIterator<Item = &Participant> {
        self.participants.iter()
    }

    /// Number of participants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Returns `true` if the graph has no participants.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Total number of rated edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.participants.iter().map(Participant::out_degree).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> (TrustGraph, ParticipantHandle, ParticipantHandle) {
        let mut graph = TrustGraph::new();
        let a = graph.create_participant(Some("a"));
        let b = graph.create_participant(Some("b"));
        (graph, a, b)
    }

    #[test]
    fn rate_then_direct_ratings_returns_value() {
        let (mut graph, a, b) = pair();
        assert_eq!(graph.rate(a, b, 42.0), Ok(()));
        let direct = graph.direct_ratings(a).unwrap_or_default();
        let b_id = graph.id_of(b).cloned().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(direct.get(&b_id).map(|r| r.value()), Some(42.0));
    }

    #[test]
    fn rate_last_write_wins() {
        let (mut graph, a, b) = pair();
        assert!(graph.rate(a, b, 10.0).is_ok());
        assert!(graph.rate(a, b, -60.0).is_ok());
        let participant = graph.participant(a).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(participant.out_degree(), 1, "overwrite must not add an edge");
        assert_eq!(participant.rating_for(b).map(Rating::value), Some(-60.0));
    }

    #[test]
    fn self_rating_is_rejected() {
        let (mut graph, a, _) = pair();
        let err = graph.rate(a, a, 10.0);
        assert!(matches!(err, Err(TrustError::SelfTrust { .. })), "got {err:?}");
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn self_check_precedes_range_check() {
        let (mut graph, a, _) = pair();
        let err = graph.rate(a, a, 500.0);
        assert!(matches!(err, Err(TrustError::SelfTrust { .. })), "got {err:?}");
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let (mut graph, a, b) = pair();
        assert!(matches!(
            graph.rate(a, b, 101.0),
            Err(TrustError::RatingOutOfRange { .. })
        ));
        assert!(matches!(
            graph.rate(a, b, -101.0),
            Err(TrustError::RatingOutOfRange { .. })
        ));
        assert!(graph.rate(a, b, 100.0).is_ok());
        assert!(graph.rate(a, b, -100.0).is_ok());
    }

    #[test]
    fn foreign_handle_is_rejected() {
        let (mut graph, a, _) = pair();
        let stray = ParticipantHandle(99);
        assert_eq!(
            graph.rate(a, stray, 5.0),
            Err(TrustError::UnknownParticipant { handle: stray })
        );
        assert_eq!(
            graph.rate(stray, a, 5.0),
            Err(TrustError::UnknownParticipant { handle: stray })
        );
        assert!(graph.direct_ratings(stray).is_err());
    }

    #[test]
    fn insert_participant_rejects_duplicates() {
        let mut graph = TrustGraph::new();
        assert!(graph.insert_participant("carol".into()).is_ok());
        assert_eq!(
            graph.insert_participant("carol".into()),
            Err(TrustError::DuplicateParticipant { id: "carol".into() })
        );
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn direct_ratings_preserve_first_insertion_order() {
        let mut graph = TrustGraph::new();
        let a = graph.create_participant(None);
        let others: Vec<_> = (0..4).map(|_| graph.create_participant(None)).collect();
        for (i, &other) in others.iter().enumerate().rev() {
            assert!(graph.rate(a, other, f64::from(u8::try_from(i).unwrap_or(0))).is_ok());
        }
        assert!(graph.rate(a, others[3], 99.0).is_ok());
        let order: Vec<_> = graph
            .direct_ratings(a)
            .unwrap_or_default()
            .into_keys()
            .collect();
        let expected: Vec<_> = others
            .iter()
            .rev()
            .filter_map(|&h| graph.id_of(h).ok().cloned())
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn handle_of_resolves_ids() {
        let (graph, a, _) = pair();
        let id = graph.id_of(a).cloned().unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(graph.handle_of(&id), Some(a));
        assert_eq!(graph.handle_of(&ParticipantId::new("nobody")), None);
    }
}
