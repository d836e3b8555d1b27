//! Small canonical graphs demonstrating the propagation rules.
//!
//! Each builder returns the graph together with the handles its scenario
//! talks about.

use crate::error::TrustError;
use crate::graph::TrustGraph;
use crate::id::ParticipantHandle;

/// A named participant set over a freshly built graph.
#[derive(Debug, Clone)]
pub struct Scenario<const N: usize> {
    /// The scenario's graph.
    pub graph: TrustGraph,
    /// Participants in the order the scenario names them.
    pub handles: [ParticipantHandle; N],
}

fn build<const N: usize>(
    labels: [&str; N],
    edges: &[(usize, usize, f64)],
) -> Result<Scenario<N>, TrustError> {
    let mut graph = TrustGraph::new();
    let handles = labels.map(|label| graph.create_participant(Some(label)));
    for &(from, to, rating) in edges {
        graph.rate(handles[from], handles[to], rating)?;
    }
    Ok(Scenario { graph, handles })
}

/// `user -> friend (50) -> stranger (30)`.
///
/// Handles: `[user, friend, stranger]`.
///
/// # Errors
/// Never fails; the edges are hard-coded valid ratings.
pub fn friend_of_friend() -> Result<Scenario<3>, TrustError> {
    build(["user", "friend", "stranger"], &[(0, 1, 50.0), (1, 2, 30.0)])
}

/// Two friends vouching for the same stranger with different strength.
///
/// Handles: `[user, friend1, friend2, stranger]`.
///
/// # Errors
/// Never fails; the edges are hard-coded valid ratings.
pub fn two_friends() -> Result<Scenario<4>, TrustError> {
    build(
        ["user", "friend1", "friend2", "stranger"],
        &[(0, 1, 50.0), (1, 3, 30.0), (0, 2, 20.0), (2, 3, 80.0)],
    )
}

/// A trusted friend distrusts the stranger; a distrusted enemy likes them.
///
/// Handles: `[user, friend, enemy, stranger]`.
///
/// # Errors
/// Never fails; the edges are hard-coded valid ratings.
pub fn friend_and_enemy() -> Result<Scenario<4>, TrustError> {
    build(
        ["user", "friend", "enemy", "stranger"],
        &[(0, 1, 70.0), (1, 3, -10.0), (0, 2, -30.0), (2, 3, 30.0)],
    )
}

/// `u0 -> u1 -> u2 -> u3 -> u1`, every edge rated 60.
///
/// Handles: `[u0, u1, u2, u3]`.
///
/// # Errors
/// Never fails; the edges are hard-coded valid ratings.
pub fn cycle() -> Result<Scenario<4>, TrustError> {
    build(
        ["u0", "u1", "u2", "u3"],
        &[(0, 1, 60.0), (1, 2, 60.0), (2, 3, 60.0), (3, 1, 60.0)],
    )
}
