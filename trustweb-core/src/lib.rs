//! Web-of-trust inference over a directed, rated social graph.
//!
//! Participants rate their direct contacts in `[-100, 100]`. The propagation
//! engine derives ratings toward participants a source never rated, by
//! combining the opinions of trusted contacts up to a bounded depth.
//!
//! ```
//! use trustweb_core::TrustGraph;
//!
//! let mut graph = TrustGraph::new();
//! let alice = graph.create_participant(Some("alice"));
//! let bob = graph.create_participant(Some("bob"));
//! let carol = graph.create_participant(Some("carol"));
//! graph.rate(alice, bob, 50.0)?;
//! graph.rate(bob, carol, 30.0)?;
//!
//! let derived = graph.propagate(alice, 2)?;
//! let carol_id = graph.id_of(carol)?;
//! assert!((derived[carol_id].rating - (50.0_f64 * 30.0).sqrt()).abs() < 1e-9);
//! # Ok::<(), trustweb_core::TrustError>(())
//! ```

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod examples;
pub mod export;
pub mod graph;
pub mod id;
pub mod propagation;
pub mod rating;
pub mod shared;

pub use error::TrustError;
pub use export::{EdgeElement, GraphElements, NodeElement, ParticipantRecord, RatingRecord};
pub use graph::{Participant, TrustGraph};
pub use id::{ParticipantHandle, ParticipantId};
pub use propagation::{
    combine, trust_values, DerivedTrust, Propagation, Propagator, TrustMap, DEFAULT_MAX_DEPTH,
    MAX_SUPPORTED_DEPTH,
};
pub use rating::{Rating, MAX_RATING, MIN_RATING};
pub use shared::SharedTrustGraph;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::examples::{cycle, friend_and_enemy, friend_of_friend, two_friends};

    const EPS: f64 = 1e-9;

    fn derived(
        graph: &TrustGraph,
        source: ParticipantHandle,
        target: ParticipantHandle,
        depth: u32,
    ) -> Option<DerivedTrust> {
        let map = graph.propagate(source, depth).ok()?;
        let id = graph.id_of(target).ok()?;
        map.get(id).copied()
    }

    #[test]
    fn example_scenarios_build() {
        assert!(friend_of_friend().is_ok());
        assert!(two_friends().is_ok());
        assert!(friend_and_enemy().is_ok());
        assert!(cycle().is_ok());
    }

    #[test]
    fn friend_of_friend_is_geometric_mean() {
        let s = friend_of_friend().unwrap_or_else(|e| panic!("{e}"));
        let [user, _, stranger] = s.handles;
        let trust = derived(&s.graph, user, stranger, 2).unwrap_or_else(|| panic!("no entry"));
        assert!((trust.rating - (50.0_f64 * 30.0).sqrt()).abs() < EPS);
        assert!(!trust.fixed);
        assert_eq!(trust.samples, 1);
    }

    #[test]
    fn two_friends_are_averaged() {
        let s = two_friends().unwrap_or_else(|e| panic!("{e}"));
        let [user, _, _, stranger] = s.handles;
        let expected = ((50.0_f64 * 30.0).sqrt() + (20.0_f64 * 80.0).sqrt()) / 2.0;
        let trust = derived(&s.graph, user, stranger, 3).unwrap_or_else(|| panic!("no entry"));
        assert!((trust.rating - expected).abs() < EPS, "got {}", trust.rating);
        assert_eq!(trust.samples, 2);
    }

    #[test]
    fn distrusted_contact_is_ignored() {
        let s = friend_and_enemy().unwrap_or_else(|e| panic!("{e}"));
        let [user, _, _, stranger] = s.handles;
        let trust = derived(&s.graph, user, stranger, 2).unwrap_or_else(|| panic!("no entry"));
        assert!((trust.rating + (70.0_f64 * 10.0).sqrt()).abs() < EPS);
        assert_eq!(trust.samples, 1, "the enemy's opinion must not be sampled");
    }

    #[test]
    fn cycle_terminates_without_self_entry() {
        let s = cycle().unwrap_or_else(|e| panic!("{e}"));
        let [u0, u1, ..] = s.handles;
        for depth in 1..=8 {
            let run = Propagator::new(&s.graph).max_depth(depth).run(u0);
            let run = run.unwrap_or_else(|e| panic!("{e}"));
            let u0_id = s.graph.id_of(u0).unwrap_or_else(|e| panic!("{e}"));
            assert!(!run.ratings.contains_key(u0_id), "depth {depth}");
            assert!(run.calls <= u64::from(depth), "one expansion per level on a chain");
        }
        let direct = derived(&s.graph, u0, u1, 5).unwrap_or_else(|| panic!("no entry"));
        assert!(direct.fixed);
    }
}
