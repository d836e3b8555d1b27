//! Random world generation.
//!
//! Seeds a graph of labelled participants joined by random ratings, the way
//! a demo or benchmark collaborator loads data into the engine.

use rand::rngs::StdRng;
use rand::seq::index::sample;
use rand::{Rng, SeedableRng};
use trustweb_core::{ParticipantHandle, ParticipantId, TrustGraph};

use crate::{SimConfig, SimError};

const NAMES: [&str; 16] = [
    "ada", "bram", "cleo", "dmitri", "esme", "farid", "greta", "hugo", "ines", "jonas", "kiri",
    "lior", "mara", "nils", "odile", "pavel",
];

/// A generated graph plus the handles the run will propagate from.
#[derive(Debug, Clone)]
pub struct World {
    /// The generated trust graph.
    pub graph: TrustGraph,
    /// Distinct participants selected as propagation sources.
    pub sources: Vec<ParticipantHandle>,
    /// Seed that reproduces this world.
    pub seed: u64,
}

/// Generate a world as described by `config`.
///
/// Every edge attempt picks an ordered pair of participants at random and
/// skips it when both ends coincide; ratings are integers in `[-100, 99]` and
/// a repeated pair overwrites the earlier rating. The same seed always
/// yields the same world.
///
/// # Errors
/// Returns [`SimError::InvalidConfig`] if the config fails validation.
pub fn generate(config: &SimConfig) -> Result<World, SimError> {
    config.validate()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = StdRng::seed_from_u64(seed);
    let n = config.participants;

    tracing::info!(participants = n, seed, "creating participants");
    let mut graph = TrustGraph::new();
    let mut handles = Vec::with_capacity(n);
    for index in 0..n {
        let name = NAMES[rng.gen_range(0..NAMES.len())];
        handles.push(graph.insert_participant(ParticipantId::new(format!("{name}-{index:04}")))?);
    }

    let attempts = config.edge_attempts();
    tracing::info!(attempts, "creating edges");
    let mut skipped = 0_usize;
    if n > 1 {
        for _ in 0..attempts {
            let from = rng.gen_range(0..n);
            let to = rng.gen_range(0..n);
            if from == to {
                skipped += 1;
                continue;
            }
            let rating: i32 = rng.gen_range(-100..100);
            graph.rate(handles[from], handles[to], f64::from(rating))?;
        }
    }

    let sources = sample(&mut rng, n, config.sources)
        .into_iter()
        .map(|i| handles[i])
        .collect();

    tracing::info!(
        participants = graph.len(),
        edges = graph.edge_count(),
        skipped,
        "world generated"
    );
    Ok(World { graph, sources, seed })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_world() {
        let config = SimConfig::new(30).with_seed(11).with_sources(3);
        let a = generate(&config).unwrap_or_else(|e| panic!("{e}"));
        let b = generate(&config).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(a.graph.to_records(), b.graph.to_records());
        assert_eq!(a.sources, b.sources);
        assert_eq!(a.seed, 11);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate(&SimConfig::new(30).with_seed(1)).unwrap_or_else(|e| panic!("{e}"));
        let b = generate(&SimConfig::new(30).with_seed(2)).unwrap_or_else(|e| panic!("{e}"));
        assert_ne!(a.graph.to_records(), b.graph.to_records());
    }

    #[test]
    fn edges_never_exceed_attempts() {
        let config = SimConfig::new(10).with_seed(5).with_ratings_per_participant(6);
        let world = generate(&config).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(world.graph.len(), 10);
        assert!(world.graph.edge_count() <= config.edge_attempts());
        assert!(world.graph.edge_count() > 0);
    }

    #[test]
    fn ratings_stay_within_generated_range() {
        let world = generate(&SimConfig::new(40).with_seed(3)).unwrap_or_else(|e| panic!("{e}"));
        for participant in world.graph.participants() {
            for (target, rating) in participant.ratings() {
                let value = rating.value();
                assert!((-100.0..100.0).contains(&value), "rating {value} out of range");
                assert_eq!(value.fract(), 0.0, "generated ratings are integers");
                assert_ne!(world.graph.id_of(target).ok(), Some(participant.id()));
            }
        }
    }

    #[test]
    fn sources_are_distinct() {
        let config = SimConfig::new(8).with_seed(9).with_sources(8);
        let mut sources = generate(&config).unwrap_or_else(|e| panic!("{e}")).sources;
        sources.sort();
        sources.dedup();
        assert_eq!(sources.len(), 8);
    }

    #[test]
    fn single_participant_world_has_no_edges() {
        let world = generate(&SimConfig::new(1).with_seed(0)).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(world.graph.edge_count(), 0);
        assert_eq!(world.sources.len(), 1);
    }
}
