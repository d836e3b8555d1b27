use crate::id::{ParticipantHandle, ParticipantId};

/// Errors produced by the `trustweb-core` crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum TrustError {
    /// A participant tried to rate itself.
    #[error("participant {id} cannot rate itself")]
    SelfTrust { id: ParticipantId },

    /// A rating value was outside `[-100, 100]` or not a finite number.
    #[error("invalid rating {value}: must be in [-100, 100]")]
    RatingOutOfRange { value: f64 },

    /// A handle did not refer to a participant of this graph.
    #[error("unknown participant handle {handle}")]
    UnknownParticipant { handle: ParticipantHandle },

    /// A serialized rating referenced an id that is not part of the graph.
    #[error("participant {source_id} rates unknown participant {target_id}")]
    UnknownTarget {
        source_id: ParticipantId,
        target_id: ParticipantId,
    },

    /// Two participants were registered under the same id.
    #[error("duplicate participant id {id}")]
    DuplicateParticipant { id: ParticipantId },
}
