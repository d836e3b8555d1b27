//! Propagation runner: generates a world and derives trust for its sources.
//!
//! Each source is propagated on the blocking pool against a shared,
//! read-locked graph, and every result is fingerprinted with SHA-256 so runs
//! can be compared for determinism.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use trustweb_core::{trust_values, ParticipantHandle, ParticipantId, SharedTrustGraph, TrustMap};

use crate::world::{self, World};
use crate::{SimConfig, SimError};

/// Outcome of propagating from one source.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct SourceRun {
    /// The participant trust was derived for.
    pub source: ParticipantId,
    /// Entries pinned to direct ratings.
    pub direct: usize,
    /// Entries inferred through intermediaries.
    pub derived: usize,
    /// Per-participant expansions performed.
    pub calls: u64,
    /// Expansions served from the memo table.
    pub memo_hits: u64,
    /// Wall-clock propagation time in microseconds.
    pub elapsed_us: u64,
    /// Hex SHA-256 of the result, see [`result_digest`].
    pub digest: String,
    /// Flattened `id -> rating` mapping.
    pub trust: IndexMap<ParticipantId, f64>,
}

/// Everything one simulation produced.
#[derive(Debug, Clone, Serialize)]
#[non_exhaustive]
pub struct SimReport {
    /// When propagation started.
    pub started_at: DateTime<Utc>,
    /// Seed that reproduces the world.
    pub seed: u64,
    /// Configuration the world was generated from.
    pub config: SimConfig,
    /// Participants in the world.
    pub participants: usize,
    /// Direct ratings in the world.
    pub edges: usize,
    /// One entry per source, in source order.
    pub runs: Vec<SourceRun>,
}

impl SimReport {
    /// Encode the report as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns [`SimError::Serialize`] if encoding fails.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Generates worlds and propagates trust over them.
#[derive(Debug, Clone)]
pub struct SimRunner {
    config: SimConfig,
}

impl SimRunner {
    /// Create a runner for the given configuration.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    /// Generate a world from the configuration and run every source.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidConfig`] if the configuration is invalid and
    /// propagates worker failures.
    pub async fn run(&self) -> Result<SimReport, SimError> {
        let world = world::generate(&self.config)?;
        self.run_world(world).await
    }

    /// Run every source of an already generated world concurrently.
    ///
    /// # Errors
    /// Returns [`SimError::Join`] if a worker panics and [`SimError::Trust`]
    /// if a source handle does not belong to the world's graph.
    pub async fn run_world(&self, world: World) -> Result<SimReport, SimError> {
        let started_at = Utc::now();
        let World { graph, sources, seed } = world;
        let participants = graph.len();
        let edges = graph.edge_count();
        let graph = Arc::new(SharedTrustGraph::new(graph));

        tracing::info!(
            participants,
            edges,
            sources = sources.len(),
            depth = self.config.depth,
            memoize = self.config.memoize,
            "starting propagation runs"
        );

        let tasks: Vec<_> = sources
            .into_iter()
            .map(|source| {
                let graph = Arc::clone(&graph);
                let (depth, memoize) = (self.config.depth, self.config.memoize);
                tokio::task::spawn_blocking(move || {
                    propagate_source(&graph, source, depth, memoize)
                })
            })
            .collect();

        let mut runs = Vec::with_capacity(tasks.len());
        for task in tasks {
            runs.push(task.await??);
        }

        Ok(SimReport {
            started_at,
            seed,
            config: self.config.clone(),
            participants,
            edges,
            runs,
        })
    }
}

fn propagate_source(
    graph: &SharedTrustGraph,
    source: ParticipantHandle,
    depth: u32,
    memoize: bool,
) -> Result<SourceRun, SimError> {
    let source_id = graph.with_graph(|g| g.id_of(source).cloned())?;
    let wall_start = Instant::now();
    let propagation = graph.propagate(source, depth, memoize)?;
    let elapsed = wall_start.elapsed();

    let ratings = &propagation.ratings;
    let direct = ratings.values().filter(|trust| trust.fixed).count();
    let digest = result_digest(ratings);

    tracing::info!(
        source = %source_id,
        direct,
        derived = ratings.len() - direct,
        calls = propagation.calls,
        elapsed_us = elapsed.as_micros(),
        %digest,
        "source propagated"
    );

    Ok(SourceRun {
        source: source_id,
        direct,
        derived: ratings.len() - direct,
        calls: propagation.calls,
        memo_hits: propagation.memo_hits,
        elapsed_us: u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX),
        digest: digest.to_string(),
        trust: trust_values(ratings),
    })
}

/// SHA-256 fingerprint of a propagation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResultDigest(pub [u8; 32]);

impl fmt::Display for ResultDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Hash a result independently of entry order.
///
/// `D(map) = SHA-256(for each entry sorted by id: id || 0x00 || rating_bits || fixed || samples)`
///
/// # Complexity
/// O(n log n) for n entries.
#[must_use]
pub fn result_digest(map: &TrustMap) -> ResultDigest {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut hasher = Sha256::new();
    for (id, trust) in entries {
        hasher.update(id.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(trust.rating.to_bits().to_be_bytes());
        hasher.update([u8::from(trust.fixed)]);
        hasher.update(trust.samples.to_be_bytes());
    }
    ResultDigest(hasher.finalize().into())
}
