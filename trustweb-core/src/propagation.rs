//! Depth-bounded trust propagation.
//!
//! Starting from a source participant, direct ratings are taken as-is and
//! every non-distrusted contact's own (recursively derived) view is folded in
//! through [`combine`], averaging all contributions per target.
//!
//! # Complexity
//! The plain walk recomputes a participant once per path that reaches it, so
//! the number of recursive calls grows as `O(b^(d-1))` for branching factor
//! `b` and depth `d`. Enabling [`Propagator::memoized`] caches sub-results by
//! `(participant, remaining depth)` for the duration of one run, bounding the
//! calls to `O(n * d)` without changing any output value or ordering.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::TrustError;
use crate::graph::TrustGraph;
use crate::id::{ParticipantHandle, ParticipantId};
use crate::rating::Rating;

/// Depth used when the caller does not choose one.
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Largest depth a run will explore; deeper requests are clamped to it.
///
/// The walk recurses once per level, so this also bounds stack usage.
pub const MAX_SUPPORTED_DEPTH: u32 = 16;

/// Derived trust toward one target, keyed by target id.
///
/// Direct ratings come first in edge order, followed by derived entries in
/// the order they were discovered.
pub type TrustMap = IndexMap<ParticipantId, DerivedTrust>;

type HandleMap = IndexMap<ParticipantHandle, DerivedTrust>;

/// Aggregated trust toward a single target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct DerivedTrust {
    /// Current rating: the direct rating if `fixed`, else the running mean.
    pub rating: f64,
    /// Set when the rating came from a direct edge. Fixed entries never change.
    pub fixed: bool,
    /// Number of contributions folded into `rating`.
    pub samples: u32,
}

impl DerivedTrust {
    /// An entry pinned to a direct rating.
    #[must_use]
    pub fn direct(rating: Rating) -> Self {
        Self { rating: rating.value(), fixed: true, samples: 1 }
    }

    /// An empty, unfixed entry awaiting its first sample.
    #[must_use]
    pub fn pending() -> Self {
        Self { rating: 0.0, fixed: false, samples: 0 }
    }

    /// Fold `value` into the running mean. Ignored for fixed entries.
    pub fn add_sample(&mut self, value: f64) {
        if self.fixed {
            return;
        }
        let n = f64::from(self.samples);
        self.rating = (self.rating * n + value) / (n + 1.0);
        self.samples += 1;
    }
}

/// Combine the source's rating of a friend with the friend's rating of a target.
///
/// A target is never trusted more than the friend vouching for it: if the
/// friend rates the target higher than the source rates the friend, the
/// result is capped at `friend_rating`. Otherwise the magnitude is the
/// geometric mean `sqrt(|friend_rating * friend_to_target_rating|)` and the
/// sign follows `friend_to_target_rating`.
///
/// `friend_rating` is expected to be non-negative; distrusted friends are
/// filtered out before this is called.
#[must_use]
pub fn combine(friend_rating: f64, friend_to_target_rating: f64) -> f64 {
    if friend_to_target_rating > friend_rating {
        return friend_rating;
    }
    let magnitude = (friend_rating * friend_to_target_rating).abs().sqrt();
    if friend_to_target_rating < 0.0 && magnitude > 0.0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Flatten a [`TrustMap`] into `id -> rating`.
#[must_use]
pub fn trust_values(map: &TrustMap) -> IndexMap<ParticipantId, f64> {
    map.iter().map(|(id, trust)| (id.clone(), trust.rating)).collect()
}

/// Result of one propagation run.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Propagation {
    /// Derived trust for every participant reachable within the depth bound.
    pub ratings: TrustMap,
    /// Number of per-participant expansions performed.
    pub calls: u64,
    /// Expansions served from the memo table (always 0 for plain runs).
    pub memo_hits: u64,
}

/// Configures and runs trust propagation over a borrowed graph.
///
/// Each [`run`](Propagator::run) starts from an empty result; nothing is
/// carried over between runs.
#[derive(Debug, Clone, Copy)]
pub struct Propagator<'g> {
    graph: &'g TrustGraph,
    max_depth: u32,
    memoized: bool,
}

impl<'g> Propagator<'g> {
    /// Create a plain propagator with [`DEFAULT_MAX_DEPTH`].
    #[must_use]
    pub fn new(graph: &'g TrustGraph) -> Self {
        Self { graph, max_depth: DEFAULT_MAX_DEPTH, memoized: false }
    }

    /// Set how many hops are explored.
    ///
    /// A depth of 0 behaves like 1 and anything above
    /// [`MAX_SUPPORTED_DEPTH`] behaves like [`MAX_SUPPORTED_DEPTH`].
    #[must_use]
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Reuse sub-results reached through several paths within one run.
    #[must_use]
    pub fn memoized(mut self, memoized: bool) -> Self {
        self.memoized = memoized;
        self
    }

    /// Derive trust from `source`.
    ///
    /// # Errors
    /// Returns [`TrustError::UnknownParticipant`] if `source` is out of range for the graph.
    pub fn run(&self, source: ParticipantHandle) -> Result<Propagation, TrustError> {
        let source_id = self.graph.id_of(source)?;
        let mut walk = Walk {
            graph: self.graph,
            memo: self.memoized.then(HashMap::new),
            calls: 0,
            memo_hits: 0,
        };
        let derived = walk.expand(source, self.max_depth.clamp(1, MAX_SUPPORTED_DEPTH));
        let ratings: TrustMap = derived
            .iter()
            .map(|(&target, &trust)| (self.graph.participant_at(target).id().clone(), trust))
            .collect();

        tracing::debug!(
            source = %source_id,
            max_depth = self.max_depth,
            memoized = self.memoized,
            entries = ratings.len(),
            calls = walk.calls,
            memo_hits = walk.memo_hits,
            "trust propagation complete"
        );

        Ok(Propagation { ratings, calls: walk.calls, memo_hits: walk.memo_hits })
    }
}

/// State of a single run: the recursion counters and the optional memo table.
struct Walk<'g> {
    graph: &'g TrustGraph,
    memo: Option<HashMap<(ParticipantHandle, u32), Rc<HandleMap>>>,
    calls: u64,
    memo_hits: u64,
}

impl Walk<'_> {
    fn expand(&mut self, source: ParticipantHandle, depth: u32) -> Rc<HandleMap> {
        if let Some(hit) = self.memo.as_ref().and_then(|memo| memo.get(&(source, depth))) {
            self.memo_hits += 1;
            return Rc::clone(hit);
        }
        self.calls += 1;
        let result = Rc::new(self.derive(source, depth));
        if let Some(memo) = self.memo.as_mut() {
            memo.insert((source, depth), Rc::clone(&result));
        }
        result
    }

    fn derive(&mut self, source: ParticipantHandle, depth: u32) -> HandleMap {
        let graph = self.graph;
        let participant = graph.participant_at(source);
        let mut result: HandleMap = participant
            .ratings()
            .map(|(target, rating)| (target, DerivedTrust::direct(rating)))
            .collect();
        if depth <= 1 {
            return result;
        }

        for (friend, friend_rating) in participant.ratings() {
            if friend_rating.is_distrust() {
                continue;
            }
            let child = self.expand(friend, depth - 1);
            for (&target, trust) in child.iter() {
                // A friend's view of the source is not the source's view of itself.
                if target == source {
                    continue;
                }
                let combined = combine(friend_rating.value(), trust.rating);
                result
                    .entry(target)
                    .or_insert_with(DerivedTrust::pending)
                    .add_sample(combined);
            }
        }
        result
    }
}
