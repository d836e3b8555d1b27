use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Length of the random token appended to labelled ids.
const LABEL_TOKEN_LEN: usize = 12;

/// Globally unique identifier of a participant in the trust graph.
///
/// Opaque to the engine: only equality and hashing are relied upon.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates a `ParticipantId` from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random id.
    ///
    /// A non-empty `label` becomes a readable prefix (`alice-3f2a9c0d41b7`);
    /// otherwise the full simple-form UUID is used.
    #[must_use]
    pub fn generate(label: Option<&str>) -> Self {
        let token = Uuid::new_v4().simple().to_string();
        match label.map(str::trim).filter(|l| !l.is_empty()) {
            Some(label) => Self(format!("{label}-{}", &token[..LABEL_TOKEN_LEN])),
            None => Self(token),
        }
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Dense arena index of a participant inside one [`TrustGraph`](crate::TrustGraph).
///
/// Handles are only meaningful for the graph that issued them. An
/// out-of-range handle is rejected, but an in-range handle from another
/// graph resolves to whichever participant holds that index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticipantHandle(pub(crate) usize);

impl ParticipantHandle {
    /// Returns the raw arena index.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticipantHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
