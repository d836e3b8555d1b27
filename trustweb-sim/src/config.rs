//! Simulation configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use trustweb_core::MAX_SUPPORTED_DEPTH;

use crate::SimError;

/// Participants in the default demo world.
pub const DEFAULT_PARTICIPANTS: usize = 20;

/// Edge attempts per participant in the default demo world.
pub const DEFAULT_RATINGS_PER_PARTICIPANT: usize = 4;

/// Configuration for generating a world and propagating trust over it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct SimConfig {
    /// Number of participants to create.
    pub participants: usize,

    /// Edge attempts per participant; the total is `participants * ratings_per_participant`.
    pub ratings_per_participant: usize,

    /// Maximum propagation depth.
    pub depth: u32,

    /// How many distinct participants to propagate from.
    pub sources: usize,

    /// RNG seed. `None` draws one from the OS.
    pub seed: Option<u64>,

    /// Cache sub-results by `(participant, depth)` within each run.
    pub memoize: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            participants: DEFAULT_PARTICIPANTS,
            ratings_per_participant: DEFAULT_RATINGS_PER_PARTICIPANT,
            depth: trustweb_core::DEFAULT_MAX_DEPTH,
            sources: 1,
            seed: None,
            memoize: false,
        }
    }
}

impl SimConfig {
    /// Create a config for `participants` participants with the remaining defaults.
    #[must_use]
    pub fn new(participants: usize) -> Self {
        Self { participants, ..Self::default() }
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the propagation depth.
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set the number of sources.
    #[must_use]
    pub fn with_sources(mut self, sources: usize) -> Self {
        self.sources = sources;
        self
    }

    /// Set the edge attempts per participant.
    #[must_use]
    pub fn with_ratings_per_participant(mut self, ratings: usize) -> Self {
        self.ratings_per_participant = ratings;
        self
    }

    /// Enable or disable memoized propagation.
    #[must_use]
    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    /// Total number of edge attempts.
    #[must_use]
    pub fn edge_attempts(&self) -> usize {
        self.participants.saturating_mul(self.ratings_per_participant)
    }

    /// Build a config from `TRUSTWEB_*` environment variables over the defaults.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidConfig`] if a variable cannot be parsed or the
    /// resulting config fails [`SimConfig::validate`].
    pub fn from_env() -> Result<Self, SimError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Like [`SimConfig::from_env`], reading values through `lookup`.
    ///
    /// # Errors
    /// See [`SimConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SimError> {
        let defaults = Self::default();
        let config = Self {
            participants: parse_var(&lookup, "TRUSTWEB_PARTICIPANTS")?
                .unwrap_or(defaults.participants),
            ratings_per_participant: parse_var(&lookup, "TRUSTWEB_RATINGS_PER_PARTICIPANT")?
                .unwrap_or(defaults.ratings_per_participant),
            depth: parse_var(&lookup, "TRUSTWEB_DEPTH")?.unwrap_or(defaults.depth),
            sources: parse_var(&lookup, "TRUSTWEB_SOURCES")?.unwrap_or(defaults.sources),
            seed: parse_var(&lookup, "TRUSTWEB_SEED")?,
            memoize: parse_var(&lookup, "TRUSTWEB_MEMOIZE")?.unwrap_or(defaults.memoize),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the values describe a runnable simulation.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidConfig`] for a depth outside
    /// `1..=MAX_SUPPORTED_DEPTH`, zero sources, or more sources than participants.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.depth == 0 {
            return Err(SimError::InvalidConfig {
                var: "TRUSTWEB_DEPTH",
                reason: "depth must be at least 1".to_owned(),
            });
        }
        if self.depth > MAX_SUPPORTED_DEPTH {
            return Err(SimError::InvalidConfig {
                var: "TRUSTWEB_DEPTH",
                reason: format!(
                    "depth {} exceeds the maximum of {MAX_SUPPORTED_DEPTH}",
                    self.depth
                ),
            });
        }
        if self.sources == 0 {
            return Err(SimError::InvalidConfig {
                var: "TRUSTWEB_SOURCES",
                reason: "at least one source is required".to_owned(),
            });
        }
        if self.sources > self.participants {
            return Err(SimError::InvalidConfig {
                var: "TRUSTWEB_SOURCES",
                reason: format!(
                    "{} sources requested but only {} participants",
                    self.sources, self.participants
                ),
            });
        }
        Ok(())
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, SimError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(var)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e: T::Err| SimError::InvalidConfig {
                var,
                reason: format!("cannot parse {raw:?}: {e}"),
            })
        })
        .transpose()
}
