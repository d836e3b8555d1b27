//! Serialized forms of the graph for external tooling.
//!
//! The engine never reads these back during propagation; they exist for
//! persistence, debugging and graph renderers.

use serde::{Deserialize, Serialize};

use crate::error::TrustError;
use crate::graph::TrustGraph;
use crate::id::ParticipantId;
use crate::rating::Rating;

/// One outbound rating of a [`ParticipantRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    /// Id of the rated participant.
    pub target_id: ParticipantId,
    /// The direct rating.
    pub rating: Rating,
}

/// A participant serialized as its id plus its ratings in edge order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    /// Participant id.
    pub id: ParticipantId,
    /// Outbound ratings.
    #[serde(default)]
    pub ratings: Vec<RatingRecord>,
}

/// A node as handed to a graph renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeElement {
    /// Participant the node stands for.
    pub id: ParticipantId,
}

/// A rated edge as handed to a graph renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeElement {
    /// Source id immediately followed by target id.
    pub id: String,
    /// Participant giving the rating.
    pub source: ParticipantId,
    /// Participant being rated.
    pub target: ParticipantId,
    /// The direct rating on this edge.
    pub rating: Rating,
}

/// Node and edge listing of a whole graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphElements {
    /// One node per participant, in creation order.
    pub nodes: Vec<NodeElement>,
    /// One edge per direct rating.
    pub edges: Vec<EdgeElement>,
}

impl TrustGraph {
    /// Serialize every participant in creation order.
    #[must_use]
    pub fn to_records(&self) -> Vec<ParticipantRecord> {
        self.participants()
            .map(|participant| ParticipantRecord {
                id: participant.id().clone(),
                ratings: participant
                    .ratings()
                    .map(|(target, rating)| RatingRecord {
                        target_id: self.participant_at(target).id().clone(),
                        rating,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Rebuild a graph from records.
    ///
    /// All ids are registered before any rating is replayed, so records may
    /// reference participants that appear later in the slice. Ratings go
    /// through [`TrustGraph::rate`] and are validated again.
    ///
    /// # Errors
    /// - [`TrustError::DuplicateParticipant`] if an id appears twice.
    /// - [`TrustError::UnknownTarget`] if a rating names an id with no record.
    /// - [`TrustError::SelfTrust`] if a record rates itself.
    pub fn from_records(records: &[ParticipantRecord]) -> Result<Self, TrustError> {
        let mut graph = Self::new();
        let handles = records
            .iter()
            .map(|record| graph.insert_participant(record.id.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        for (record, &source) in records.iter().zip(&handles) {
            for entry in &record.ratings {
                let target = graph.handle_of(&entry.target_id).ok_or_else(|| {
                    TrustError::UnknownTarget {
                        source_id: record.id.clone(),
                        target_id: entry.target_id.clone(),
                    }
                })?;
                graph.rate(source, target, entry.rating.value())?;
            }
        }

        tracing::debug!(
            participants = graph.len(),
            edges = graph.edge_count(),
            "trust graph loaded from records"
        );
        Ok(graph)
    }

    /// List nodes and edges for rendering.
    #[must_use]
    pub fn elements(&self) -> GraphElements {
        let mut elements = GraphElements::default();
        for participant in self.participants() {
            elements.nodes.push(NodeElement { id: participant.id().clone() });
            for (target, rating) in participant.ratings() {
                let target = self.participant_at(target).id();
                elements.edges.push(EdgeElement {
                    id: format!("{}{}", participant.id(), target),
                    source: participant.id().clone(),
                    target: target.clone(),
                    rating,
                });
            }
        }
        elements
    }
}
